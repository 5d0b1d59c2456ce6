//! A single pgfplots `axis`: options, inferred axis metadata and attached series.

use super::Figure;
use super::item::PlotItem;
use super::legend::Legend;
use super::types::{Axis, AxisMeta, Bound, format_number};
use crate::error::Result;
use crate::latex::to_latex;
use crate::models::SeriesRef;
use crate::options::{OptionStore, unwrap_group, wrap_group};

const RESTRICT_Z: &str = "restrict z to domain*";
const COLORBAR_STYLE: &str = "colorbar style";

/// Value ranges inferred from data are padded by this fraction on both ends.
const DATA_PADDING: f64 = 0.1;

/// One chart area.
#[derive(Debug, Clone, Default)]
pub struct Panel<'a> {
    options: OptionStore,
    axes: [AxisMeta; 3],
    items: Vec<PlotItem<'a>>,
    legend: Option<&'a Legend>,
    restrict_z_inferred: bool,
    colorbar_style_inferred: bool,
}

impl<'a> Panel<'a> {
    pub fn new(options: &str) -> Self {
        let mut panel = Self::default();
        panel.add_options(options);
        panel
    }

    /// Merge user options. Limits given here are never changed by attached series,
    /// and labels given here take precedence over series titles.
    pub fn add_options(&mut self, options: &str) {
        let parsed = OptionStore::parse(options);
        for axis in Axis::ALL {
            let meta = &mut self.axes[axis.index()];
            if let Some(v) = parsed.get(axis.min_key()) {
                meta.range.min = explicit_bound(axis.min_key(), v);
            }
            if let Some(v) = parsed.get(axis.max_key()) {
                meta.range.max = explicit_bound(axis.max_key(), v);
            }
            if let Some(label) = axis.label_key().and_then(|key| parsed.get(key)) {
                meta.label = unwrap_group(label).to_string();
            }
        }
        if parsed.is_defined(RESTRICT_Z) {
            self.restrict_z_inferred = false;
        }
        if parsed.is_defined(COLORBAR_STYLE) {
            self.colorbar_style_inferred = false;
        }
        self.options.merge(&parsed);
    }

    pub fn options(&self) -> &OptionStore {
        &self.options
    }

    /// Raw access to the option store. Changes made here bypass range and label inference.
    pub fn options_mut(&mut self) -> &mut OptionStore {
        &mut self.options
    }

    pub fn axis(&self, axis: Axis) -> &AxisMeta {
        &self.axes[axis.index()]
    }

    pub fn items(&self) -> &[PlotItem<'a>] {
        &self.items
    }

    pub fn item_mut(&mut self, index: usize) -> Option<&mut PlotItem<'a>> {
        self.items.get_mut(index)
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    pub fn legend(&self) -> Option<&'a Legend> {
        self.legend
    }

    pub fn set_legend(&mut self, legend: &'a Legend) {
        self.legend = Some(legend);
    }

    /// Attach a series and fold its labels and extents into the panel axes.
    ///
    /// Labels are first-write-wins. Ranges only widen, and limits set explicitly
    /// through the options are left alone. The y range of histograms and graphs and
    /// the colour range of 2D histograms come from the data and are padded by 10%.
    ///
    /// ### Errors
    /// `NullSeries` when the series holds no bins or points; the panel is unchanged.
    pub fn attach_series<S: Into<SeriesRef<'a>>>(
        &mut self,
        series: S,
        render_style: &str,
        plot_options: &str,
    ) -> Result<()> {
        let series = series.into();
        let axes = series.axes()?;
        log::debug!(
            "attaching '{}': x={:?} y={:?} z={:?}",
            series.name(),
            axes.x,
            axes.y,
            axes.z
        );

        self.adopt_label(Axis::X, &axes.x_label);
        self.adopt_label(Axis::Y, &axes.y_label);
        if let Some(z_label) = &axes.z_label {
            self.adopt_label(Axis::Z, z_label);
        }

        if series.is_two_dimensional() {
            self.update_colorbar();
        }

        self.widen(Axis::X, axes.x);
        let y = if axes.y_from_data { padded(axes.y) } else { axes.y };
        self.widen(Axis::Y, y);
        if let Some(z) = axes.z {
            self.widen(Axis::Z, padded(z));
            self.update_z_restriction();
        }

        self.items
            .push(PlotItem::new(series, render_style, plot_options));
        Ok(())
    }

    /// Switch an axis (x=0, y=1, z=2) between linear and logarithmic scale.
    ///
    /// ### Errors
    /// `InvalidArgument` for any other index; nothing is changed.
    pub fn set_log_mode(&mut self, axis: usize, enabled: bool) -> Result<()> {
        let axis = Axis::try_from(axis)?;
        if enabled {
            self.options.set(axis.mode_key(), "log");
        } else {
            self.options.remove(axis.mode_key());
        }
        Ok(())
    }

    /// Drop the limit options of `axis` and return what was removed. The inferred
    /// metadata is kept.
    pub(crate) fn strip_range(&mut self, axis: Axis) -> Vec<(&'static str, String)> {
        let mut keys = vec![axis.min_key(), axis.max_key()];
        if axis == Axis::Z && self.restrict_z_inferred {
            keys.push(RESTRICT_Z);
        }
        keys.into_iter()
            .filter_map(|key| self.options.remove(key).map(|value| (key, value)))
            .collect()
    }

    pub(crate) fn strip_label(&mut self, axis: Axis) -> Option<(&'static str, String)> {
        let key = axis.label_key()?;
        self.options.remove(key).map(|value| (key, value))
    }

    /// Put back an option removed by [`Panel::strip_range`] or [`Panel::strip_label`],
    /// unless it has been set again since.
    pub(crate) fn restore_option(&mut self, key: &str, value: String) {
        if !self.options.is_defined(key) {
            self.options.set(key, value);
        }
    }

    /// Markup of the attached items, in attachment order.
    pub fn render_items(&self) -> String {
        self.items.iter().map(PlotItem::render).collect()
    }

    /// Write an environment opened by `header` and closed by `footer` around `body`,
    /// using this panel's options and legend.
    pub fn render_environment(&self, header: &str, footer: &str, body: &str) -> String {
        let mut out = format!("\t{header}[\n");
        out.push_str(&self.options.render("\t\t\t"));
        if let Some(legend) = self.legend
            && !legend.style().is_empty()
        {
            out.push_str("\t\t\tlegend style={\n");
            out.push_str(&legend.style().render("\t\t\t\t"));
            out.push_str("\t\t\t},\n");
        }
        out.push_str("\t\t]\n\n");
        if let Some(legend) = self.legend {
            out.push_str(&legend.render());
        }
        out.push_str(body);
        if !footer.is_empty() {
            out.push_str(&format!("\t{footer}\n"));
        }
        out
    }

    fn adopt_label(&mut self, axis: Axis, label: &str) {
        let meta = &mut self.axes[axis.index()];
        if !meta.label.is_empty() || label.is_empty() {
            return;
        }
        meta.label = to_latex(label);
        if let Some(key) = axis.label_key()
            && !self.options.is_defined(key)
        {
            self.options.set(key, wrap_group(&meta.label));
        }
    }

    fn widen(&mut self, axis: Axis, (lo, hi): (f64, f64)) {
        let range = &mut self.axes[axis.index()].range;
        let (min_changed, max_changed) = range.expand(lo, hi);
        if min_changed && let Some(v) = range.min() {
            self.options.set(axis.min_key(), format_number(v));
        }
        if max_changed && let Some(v) = range.max() {
            self.options.set(axis.max_key(), format_number(v));
        }
    }

    /// Colorbar for 2D content, titled with the z label. Left alone once the user
    /// configures `colorbar style`.
    fn update_colorbar(&mut self) {
        if self.options.is_defined(COLORBAR_STYLE) && !self.colorbar_style_inferred {
            return;
        }
        if !self.options.is_defined("view") {
            self.options.set("view", "{0}{90}");
        }
        if !self.options.is_defined("colorbar") {
            self.options.set("colorbar", "");
        }
        let title = wrap_group(&self.axes[Axis::Z.index()].label);
        self.options
            .set(COLORBAR_STYLE, wrap_group(&format!("title={title}")));
        self.colorbar_style_inferred = true;
    }

    fn update_z_restriction(&mut self) {
        if self.options.is_defined(RESTRICT_Z) && !self.restrict_z_inferred {
            return;
        }
        let range = self.axes[Axis::Z.index()].range;
        if let (Some(lo), Some(hi)) = (range.min(), range.max()) {
            self.options
                .set(RESTRICT_Z, format!("{}:{}", format_number(lo), format_number(hi)));
            self.restrict_z_inferred = true;
        }
    }
}

impl<'a> Figure<'a> for Panel<'a> {
    fn env_header(&self) -> &'static str {
        "\\begin{axis}"
    }

    fn env_footer(&self) -> &'static str {
        "\\end{axis}"
    }

    fn frame(&self) -> &Panel<'a> {
        self
    }

    fn render_body(&self) -> String {
        self.render_items()
    }
}

/// Move both ends outwards by a fraction of their magnitude, so negative data is
/// widened rather than clipped.
fn padded((lo, hi): (f64, f64)) -> (f64, f64) {
    (lo - DATA_PADDING * lo.abs(), hi + DATA_PADDING * hi.abs())
}

fn explicit_bound(key: &str, value: &str) -> Bound {
    match value.parse::<f64>() {
        Ok(v) => Bound::Explicit(v),
        Err(_) => {
            log::warn!("non-numeric {key}={value:?} kept verbatim and excluded from range merging");
            Bound::Explicit(f64::NAN)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::PlotError;
    use crate::models::{Graph, Hist1D, Hist2D};

    fn hist(name: &str, edges: Vec<f64>, contents: Vec<f64>, x: &str) -> Hist1D {
        Hist1D::new(name, edges, contents)
            .unwrap()
            .with_titles(x, "Counts")
    }

    #[test]
    fn first_label_wins() {
        let a = hist("a", vec![0.0, 1.0], vec![1.0], "E");
        let b = hist("b", vec![0.0, 1.0], vec![1.0], "T");
        let mut panel = Panel::new("");
        panel.attach_series(&a, "", "").unwrap();
        panel.attach_series(&b, "", "").unwrap();
        assert_eq!(panel.axis(Axis::X).label, "E");
        assert_eq!(panel.options().get("xlabel"), Some("{E}"));
        assert_eq!(panel.options().get("ylabel"), Some("{Counts}"));
    }

    #[test]
    fn y_range_is_padded_content() {
        let h = hist("h", vec![0.0, 1.0, 2.0], vec![10.0, 20.0], "x");
        let mut panel = Panel::new("");
        panel.attach_series(&h, "", "").unwrap();
        assert_eq!(panel.options().get("ymin"), Some("9"));
        assert_eq!(panel.options().get("ymax"), Some("22"));
        assert_eq!(panel.options().get("xmin"), Some("0"));
        assert_eq!(panel.options().get("xmax"), Some("2"));
    }

    #[test]
    fn two_dimensional_series_enable_colorbar() {
        let h = Hist2D::new("m", vec![0.0, 1.0], vec![0.0, 2.0], vec![5.0])
            .unwrap()
            .with_titles("x", "y", "Rate");
        let mut panel = Panel::new("");
        panel.attach_series(&h, "", "").unwrap();
        let opts = panel.options();
        assert_eq!(opts.get("view"), Some("{0}{90}"));
        assert_eq!(opts.get("colorbar"), Some(""));
        assert_eq!(opts.get("colorbar style"), Some("{title={Rate}}"));
        assert_eq!(opts.get("ymax"), Some("2"));
        assert_eq!(opts.get("point meta min"), Some("4.5"));
        assert_eq!(opts.get("point meta max"), Some("5.5"));
        assert_eq!(opts.get(RESTRICT_Z), Some("4.5:5.5"));
    }

    #[test]
    fn configured_colorbar_is_left_alone() {
        let h = Hist2D::new("m", vec![0.0, 1.0], vec![0.0, 1.0], vec![1.0])
            .unwrap()
            .with_titles("x", "y", "Rate");
        let mut panel = Panel::new("colorbar style={ylabel=custom}");
        panel.attach_series(&h, "", "").unwrap();
        assert_eq!(panel.options().get("colorbar style"), Some("{ylabel=custom}"));
        assert!(!panel.options().is_defined("view"));
    }

    #[test]
    fn colorbar_title_follows_first_z_label() {
        let untitled = Hist2D::new("a", vec![0.0, 1.0], vec![0.0, 1.0], vec![1.0]).unwrap();
        let titled = Hist2D::new("b", vec![0.0, 1.0], vec![0.0, 1.0], vec![2.0])
            .unwrap()
            .with_titles("", "", "Rate");
        let mut panel = Panel::new("");
        panel.attach_series(&untitled, "", "").unwrap();
        assert_eq!(panel.options().get("colorbar style"), Some("{title={}}"));
        panel.attach_series(&titled, "", "").unwrap();
        assert_eq!(panel.axis(Axis::Z).label, "Rate");
        assert_eq!(panel.options().get("colorbar style"), Some("{title={Rate}}"));

        panel.add_options("colorbar style={title={fixed}}");
        panel.attach_series(&titled, "", "").unwrap();
        assert_eq!(panel.options().get("colorbar style"), Some("{title={fixed}}"));
    }

    #[test]
    fn negative_data_is_padded_outwards() {
        let g = Graph::new("g", vec![0.0, 1.0], vec![-10.0, -2.0]).unwrap();
        let mut panel = Panel::new("");
        panel.attach_series(&g, "", "").unwrap();
        assert_eq!(panel.options().get("ymin"), Some("-11"));
        assert_eq!(panel.options().get("ymax"), Some("-1.8"));
    }

    #[test]
    fn stripped_options_can_be_restored() {
        let h = hist("h", vec![0.0, 1.0], vec![2.0], "E");
        let mut panel = Panel::new("");
        panel.attach_series(&h, "", "").unwrap();
        let removed = panel.strip_range(Axis::X);
        assert_eq!(removed, vec![("xmin", "0".to_string()), ("xmax", "1".to_string())]);
        let (key, label) = panel.strip_label(Axis::X).unwrap();
        assert!(!panel.options().is_defined("xmin"));

        panel.options_mut().set("xmax", "5");
        for (key, value) in removed {
            panel.restore_option(key, value);
        }
        panel.restore_option(key, label);
        assert_eq!(panel.options().get("xmin"), Some("0"));
        assert_eq!(panel.options().get("xmax"), Some("5"));
        assert_eq!(panel.options().get("xlabel"), Some("{E}"));
    }

    #[test]
    fn empty_series_is_rejected_without_changes() {
        let g = Graph::new("empty", vec![], vec![]).unwrap();
        let mut panel = Panel::new("");
        let err = panel.attach_series(&g, "", "").unwrap_err();
        assert!(matches!(err, PlotError::NullSeries(_)));
        assert!(panel.is_empty());
        assert!(panel.options().is_empty());
    }

    #[test]
    fn log_mode_toggles() {
        let mut panel = Panel::new("");
        panel.set_log_mode(1, true).unwrap();
        assert_eq!(panel.options().get("ymode"), Some("log"));
        panel.set_log_mode(1, false).unwrap();
        assert!(!panel.options().is_defined("ymode"));

        let before = panel.options().clone();
        assert!(matches!(
            panel.set_log_mode(3, true),
            Err(PlotError::InvalidArgument(_))
        ));
        assert_eq!(panel.options(), &before);
    }

    #[test]
    fn render_axis_environment() {
        let h = hist("h", vec![0.0, 1.0], vec![2.0], "x");
        let mut legend = Legend::new();
        legend.add_entry("data");
        legend.style_mut().add("anchor=north");
        let mut panel = Panel::new("width=8cm");
        panel.set_legend(&legend);
        panel.attach_series(&h, "", "").unwrap();
        let out = panel.render();
        assert!(out.starts_with("\t\\begin{axis}[\n\t\t\twidth=8cm,\n\t\t\txlabel={x},\n"));
        assert!(out.contains("\t\t\tlegend style={\n\t\t\t\tanchor=north,\n\t\t\t},\n\t\t]\n\n"));
        assert!(out.contains("\t\\legend{\n\t\t{data},\n\t}\n\t\\addplot+["));
        assert!(out.ends_with("\t\\end{axis}\n"));
    }
}
