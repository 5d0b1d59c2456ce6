//! A `groupplot`: a rows x columns grid of panels sharing one environment.
//!
//! Before the grid is written, [`GridLayout::unify`] looks at all populated cells
//! and moves what they have in common to the group level:
//!
//! 1. limits of axes flagged with [`GridLayout::set_global_axis_limit_mode`],
//! 2. axis labels shared by every cell (x per column, y per row),
//! 3. tick labels, when every column (x) or row (y) shows the same range.
//!
//! The passes run in this order because the tick-label check reads the limits the
//! first pass may have removed from the cells.
//!
//! Unifying is repeatable: every run first undoes the previous one (restoring cell
//! options and dropping computed group values), so a grid can be rendered, extended
//! and rendered again.

use super::Figure;
use super::panel::Panel;
use super::types::{Axis, AxisSelector, format_number};
use crate::error::{PlotError, Result};
use crate::models::SeriesRef;
use crate::options::{OptionStore, unwrap_group, wrap_group};

const GROUP_STYLE: &str = "group style";

/// Separation used between cells whose axis labels could not be shared.
pub const WIDE_SEPARATION: &str = "2.5cm";

/// Grid of panels written as a pgfplots `groupplot`.
#[derive(Debug, Clone)]
pub struct GridLayout<'a> {
    frame: Panel<'a>,
    group_style: OptionStore,
    rows: usize,
    cols: usize,
    cells: Vec<Option<Panel<'a>>>,
    global_limits: [bool; 3],
    /// Group options written by the last `unify`, as opposed to user settings.
    computed_options: Vec<&'static str>,
    computed_style: Vec<&'static str>,
    /// Cell options removed by the last `unify`: cell id, key, value.
    stripped: Vec<(usize, &'static str, String)>,
}

impl<'a> GridLayout<'a> {
    /// Create an empty `rows` x `cols` grid. `options` apply to every cell; a
    /// `group style={...}` among them is merged into the group style.
    ///
    /// ### Errors
    /// `IndexOutOfRange` when `rows` or `cols` is zero.
    pub fn new(rows: usize, cols: usize, options: &str) -> Result<Self> {
        if rows == 0 || cols == 0 {
            return Err(PlotError::IndexOutOfRange {
                index: 0,
                limit: rows * cols,
            });
        }
        let mut frame = Panel::new(options);
        let mut group_style = OptionStore::new();
        if let Some(style) = frame.options_mut().remove(GROUP_STYLE) {
            group_style.add(unwrap_group(&style));
        }
        // pgfplots counts columns first.
        group_style.set("group size", format!("{cols} by {rows}"));

        Ok(Self {
            frame,
            group_style,
            rows,
            cols,
            cells: (0..rows * cols).map(|_| None).collect(),
            global_limits: [false; 3],
            computed_options: Vec::new(),
            computed_style: Vec::new(),
            stripped: Vec::new(),
        })
    }

    pub fn rows(&self) -> usize {
        self.rows
    }

    pub fn cols(&self) -> usize {
        self.cols
    }

    /// Group-level options (excluding the group style).
    pub fn options(&self) -> &OptionStore {
        self.frame.options()
    }

    /// Merge group options. Values given here are user settings and survive `unify`.
    pub fn add_options(&mut self, options: &str) {
        let mut parsed = OptionStore::parse(options);
        if let Some(style) = parsed.remove(GROUP_STYLE) {
            let style = OptionStore::parse(unwrap_group(&style));
            self.computed_style.retain(|key| !style.is_defined(key));
            self.group_style.merge(&style);
        }
        self.computed_options.retain(|key| !parsed.is_defined(key));
        self.frame.add_options(&parsed.to_inline());
    }

    pub fn group_style(&self) -> &OptionStore {
        &self.group_style
    }

    /// Row-major id of the cell at `row`, `col`.
    pub fn cell_index(&self, row: usize, col: usize) -> Result<usize> {
        if row >= self.rows || col >= self.cols {
            return Err(PlotError::IndexOutOfRange {
                index: row * self.cols + col,
                limit: self.cells.len(),
            });
        }
        Ok(row * self.cols + col)
    }

    /// The panel at `id`, if it has been populated.
    pub fn cell(&self, id: usize) -> Option<&Panel<'a>> {
        self.cells.get(id).and_then(Option::as_ref)
    }

    /// The panel at `id`, created empty on first access.
    pub fn cell_mut(&mut self, id: usize) -> Result<&mut Panel<'a>> {
        let limit = self.cells.len();
        let slot = self
            .cells
            .get_mut(id)
            .ok_or(PlotError::IndexOutOfRange { index: id, limit })?;
        Ok(slot.get_or_insert_with(Panel::default))
    }

    /// Attach a series to the cell `cell_id`.
    pub fn attach_series<S: Into<SeriesRef<'a>>>(
        &mut self,
        series: S,
        cell_id: usize,
        render_style: &str,
        plot_options: &str,
    ) -> Result<()> {
        self.cell_mut(cell_id)?
            .attach_series(series, render_style, plot_options)
    }

    /// Share the limits of an axis (or of all axes) across the whole grid.
    ///
    /// ### Errors
    /// `InvalidArgument` when the selector is not x/y/z (0/1/2) or `all`.
    pub fn set_global_axis_limit_mode<S>(&mut self, selector: S, enabled: bool) -> Result<()>
    where
        S: TryInto<AxisSelector>,
        PlotError: From<S::Error>,
    {
        let selector = selector.try_into()?;
        for axis in selector.axes() {
            self.global_limits[axis.index()] = enabled;
        }
        Ok(())
    }

    pub fn global_axis_limit_mode(&self, axis: Axis) -> bool {
        self.global_limits[axis.index()]
    }

    /// Run the hoisting passes and store the resulting group style.
    pub fn unify(&mut self) {
        self.reset();
        self.unify_limits();
        self.unify_labels();
        self.unify_tick_labels();
        let style = wrap_group(&self.group_style.to_inline());
        self.frame.options_mut().set(GROUP_STYLE, style);
    }

    /// Undo the previous `unify`.
    fn reset(&mut self) {
        for key in self.computed_options.drain(..) {
            self.frame.options_mut().remove(key);
        }
        for key in self.computed_style.drain(..) {
            self.group_style.remove(key);
        }
        for (id, key, value) in self.stripped.drain(..) {
            if let Some(Some(cell)) = self.cells.get_mut(id) {
                cell.restore_option(key, value);
            }
        }
    }

    /// Set a computed group style entry unless the user already chose one.
    fn set_style(&mut self, key: &'static str, value: &str) {
        if self.group_style.is_defined(key) {
            return;
        }
        self.group_style.set(key, value);
        self.computed_style.push(key);
    }

    fn strip_cells<F>(&mut self, strip: F)
    where
        F: Fn(&mut Panel<'a>) -> Vec<(&'static str, String)>,
    {
        for (id, cell) in self.cells.iter_mut().enumerate() {
            if let Some(cell) = cell {
                self.stripped
                    .extend(strip(cell).into_iter().map(|(key, value)| (id, key, value)));
            }
        }
    }

    fn populated(&self) -> impl Iterator<Item = &Panel<'a>> {
        self.cells.iter().flatten()
    }

    /// Cells grouped by the lines that share `axis`: columns for x, rows for y.
    fn lines(&self, axis: Axis) -> Vec<Vec<Option<&Panel<'a>>>> {
        let cell = |row: usize, col: usize| self.cells[row * self.cols + col].as_ref();
        match axis {
            Axis::X => (0..self.cols)
                .map(|col| (0..self.rows).map(|row| cell(row, col)).collect())
                .collect(),
            _ => (0..self.rows)
                .map(|row| (0..self.cols).map(|col| cell(row, col)).collect())
                .collect(),
        }
    }

    fn unify_limits(&mut self) {
        for axis in Axis::ALL {
            if !self.global_limits[axis.index()] {
                continue;
            }
            let finite = |v: &f64| v.is_finite();
            let lo = self
                .populated()
                .filter_map(|p| p.axis(axis).range.min())
                .filter(finite)
                .reduce(f64::min);
            let hi = self
                .populated()
                .filter_map(|p| p.axis(axis).range.max())
                .filter(finite)
                .reduce(f64::max);

            for (key, value) in [(axis.min_key(), lo), (axis.max_key(), hi)] {
                let seeded = self.frame.options_mut().get_or_insert_default(key);
                if !seeded.is_empty() {
                    log::debug!("group {key} preset to {seeded}, not recomputed");
                    continue;
                }
                match value {
                    Some(v) => {
                        *seeded = format_number(v);
                        self.computed_options.push(key);
                    }
                    None => {
                        self.frame.options_mut().remove(key);
                    }
                }
            }
            self.strip_cells(|cell| cell.strip_range(axis));
        }
    }

    fn unify_labels(&mut self) {
        let passes = [
            (Axis::X, "xlabels at", "edge bottom", "vertical sep"),
            (Axis::Y, "ylabels at", "edge left", "horizontal sep"),
        ];
        for (axis, edge_key, edge, sep_key) in passes {
            let per_line: Option<Vec<String>> = self
                .lines(axis)
                .iter()
                .map(|line| shared_value(line, |p| p.axis(axis).label.clone()))
                .collect();
            let shared = per_line.and_then(|labels| {
                let first = labels.first()?.clone();
                labels.iter().all(|l| *l == first).then_some(first)
            });

            match shared {
                Some(label) if label.is_empty() => {}
                Some(label) => {
                    log::debug!("hoisting {axis} label {label:?} to the group");
                    if let Some(key) = axis.label_key()
                        && !self.frame.options().is_defined(key)
                    {
                        self.frame.options_mut().set(key, wrap_group(&label));
                        self.computed_options.push(key);
                    }
                    self.set_style(edge_key, edge);
                    self.strip_cells(|cell| cell.strip_label(axis).into_iter().collect());
                }
                None => self.set_style(sep_key, WIDE_SEPARATION),
            }
        }
    }

    fn unify_tick_labels(&mut self) {
        let passes = [
            (Axis::X, "xticklabels at", "edge bottom"),
            (Axis::Y, "yticklabels at", "edge left"),
        ];
        for (axis, key, edge) in passes {
            let limits = |p: &Panel<'a>| {
                (
                    p.options().get(axis.min_key()).map(str::to_string),
                    p.options().get(axis.max_key()).map(str::to_string),
                )
            };
            let uniform = self
                .lines(axis)
                .iter()
                .all(|line| shared_value(line, limits).is_some());
            if uniform {
                self.set_style(key, edge);
            }
        }
    }
}

impl<'a> Figure<'a> for GridLayout<'a> {
    fn env_header(&self) -> &'static str {
        "\\begin{groupplot}"
    }

    fn env_footer(&self) -> &'static str {
        "\\end{groupplot}"
    }

    fn frame(&self) -> &Panel<'a> {
        &self.frame
    }

    fn render_body(&self) -> String {
        let mut out = String::new();
        for cell in &self.cells {
            match cell {
                Some(panel) => out.push_str(&panel.render_environment(
                    "\\nextgroupplot",
                    "",
                    &panel.render_items(),
                )),
                None => out.push_str("\t\\nextgroupplot[group/empty plot]\n\n"),
            }
        }
        out
    }

    fn preprocess(&mut self) {
        self.unify();
    }
}

/// The value `f` yields for every cell of `line`, if all cells exist and agree.
fn shared_value<'a, T, F>(line: &[Option<&Panel<'a>>], f: F) -> Option<T>
where
    T: PartialEq,
    F: Fn(&Panel<'a>) -> T,
{
    let mut shared: Option<T> = None;
    for cell in line {
        let value = f((*cell)?);
        match &shared {
            None => shared = Some(value),
            Some(s) if *s == value => {}
            Some(_) => return None,
        }
    }
    shared
}
