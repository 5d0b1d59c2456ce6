use crate::error::{PlotError, Result};
use serde::{Deserialize, Serialize};

/// One-dimensional histogram: `contents.len()` bins delimited by `edges`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Hist1D {
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub x_title: String,
    #[serde(default)]
    pub y_title: String,
    /// Bin edges in increasing order, one more than the number of bins.
    pub edges: Vec<f64>,
    pub contents: Vec<f64>,
    /// Per-bin errors; `sqrt(content)` is used when absent.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub errors: Option<Vec<f64>>,
}

impl Hist1D {
    pub fn new<S: Into<String>>(name: S, edges: Vec<f64>, contents: Vec<f64>) -> Result<Self> {
        let hist = Self {
            name: name.into(),
            x_title: String::new(),
            y_title: String::new(),
            edges,
            contents,
            errors: None,
        };
        hist.validate()?;
        Ok(hist)
    }

    /// `nbins` equal-width empty bins spanning `[low, high)`.
    pub fn uniform<S: Into<String>>(name: S, nbins: usize, low: f64, high: f64) -> Self {
        let width = (high - low) / nbins.max(1) as f64;
        Self {
            name: name.into(),
            x_title: String::new(),
            y_title: String::new(),
            edges: (0..=nbins).map(|i| low + width * i as f64).collect(),
            contents: vec![0.0; nbins],
            errors: None,
        }
    }

    pub fn with_titles<X: Into<String>, Y: Into<String>>(mut self, x: X, y: Y) -> Self {
        self.x_title = x.into();
        self.y_title = y.into();
        self
    }

    pub fn with_errors(mut self, errors: Vec<f64>) -> Self {
        self.errors = Some(errors);
        self
    }

    pub fn validate(&self) -> Result<()> {
        if self.edges.len() != self.contents.len() + 1 {
            return Err(PlotError::invalid_data(format!(
                "histogram '{}' has {} edges for {} bins",
                self.name,
                self.edges.len(),
                self.contents.len()
            )));
        }
        if self.edges.windows(2).any(|w| w[1] < w[0]) {
            return Err(PlotError::invalid_data(format!(
                "histogram '{}' has decreasing bin edges",
                self.name
            )));
        }
        if let Some(errors) = &self.errors
            && errors.len() != self.contents.len()
        {
            return Err(PlotError::invalid_data(format!(
                "histogram '{}' has {} errors for {} bins",
                self.name,
                errors.len(),
                self.contents.len()
            )));
        }
        Ok(())
    }

    pub fn n_bins(&self) -> usize {
        self.contents.len()
    }

    pub fn low_edge(&self, bin: usize) -> f64 {
        self.edges[bin]
    }

    pub fn high_edge(&self, bin: usize) -> f64 {
        self.edges[bin + 1]
    }

    pub fn center(&self, bin: usize) -> f64 {
        0.5 * (self.edges[bin] + self.edges[bin + 1])
    }

    pub fn width(&self, bin: usize) -> f64 {
        self.edges[bin + 1] - self.edges[bin]
    }

    pub fn content(&self, bin: usize) -> f64 {
        self.contents[bin]
    }

    pub fn error(&self, bin: usize) -> f64 {
        match &self.errors {
            Some(errors) => errors[bin],
            None => self.contents[bin].abs().sqrt(),
        }
    }

    /// Declared x extent: first low edge to last high edge.
    pub fn x_extent(&self) -> Option<(f64, f64)> {
        Some((*self.edges.first()?, *self.edges.last()?))
    }

    /// Smallest and largest bin content.
    pub fn content_range(&self) -> Option<(f64, f64)> {
        min_max(&self.contents)
    }
}

/// Two-dimensional histogram. `contents` is stored row by row along y:
/// the bin `(ix, iy)` lives at `iy * nx + ix`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Hist2D {
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub x_title: String,
    #[serde(default)]
    pub y_title: String,
    #[serde(default)]
    pub z_title: String,
    pub x_edges: Vec<f64>,
    pub y_edges: Vec<f64>,
    pub contents: Vec<f64>,
}

impl Hist2D {
    pub fn new<S: Into<String>>(
        name: S,
        x_edges: Vec<f64>,
        y_edges: Vec<f64>,
        contents: Vec<f64>,
    ) -> Result<Self> {
        let hist = Self {
            name: name.into(),
            x_title: String::new(),
            y_title: String::new(),
            z_title: String::new(),
            x_edges,
            y_edges,
            contents,
        };
        hist.validate()?;
        Ok(hist)
    }

    pub fn with_titles<X, Y, Z>(mut self, x: X, y: Y, z: Z) -> Self
    where
        X: Into<String>,
        Y: Into<String>,
        Z: Into<String>,
    {
        self.x_title = x.into();
        self.y_title = y.into();
        self.z_title = z.into();
        self
    }

    pub fn validate(&self) -> Result<()> {
        if self.x_edges.len() < 2 && !self.contents.is_empty()
            || self.y_edges.len() < 2 && !self.contents.is_empty()
        {
            return Err(PlotError::invalid_data(format!(
                "histogram '{}' needs at least two edges per axis",
                self.name
            )));
        }
        if self.contents.len() != self.n_bins_x() * self.n_bins_y() {
            return Err(PlotError::invalid_data(format!(
                "histogram '{}' has {} contents for {}x{} bins",
                self.name,
                self.contents.len(),
                self.n_bins_x(),
                self.n_bins_y()
            )));
        }
        Ok(())
    }

    pub fn n_bins_x(&self) -> usize {
        self.x_edges.len().saturating_sub(1)
    }

    pub fn n_bins_y(&self) -> usize {
        self.y_edges.len().saturating_sub(1)
    }

    pub fn content(&self, ix: usize, iy: usize) -> f64 {
        self.contents[iy * self.n_bins_x() + ix]
    }

    pub fn x_extent(&self) -> Option<(f64, f64)> {
        Some((*self.x_edges.first()?, *self.x_edges.last()?))
    }

    pub fn y_extent(&self) -> Option<(f64, f64)> {
        Some((*self.y_edges.first()?, *self.y_edges.last()?))
    }

    pub fn content_range(&self) -> Option<(f64, f64)> {
        min_max(&self.contents)
    }
}

/// A list of `(x, y)` points.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Graph {
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub x_title: String,
    #[serde(default)]
    pub y_title: String,
    pub x: Vec<f64>,
    pub y: Vec<f64>,
}

impl Graph {
    pub fn new<S: Into<String>>(name: S, x: Vec<f64>, y: Vec<f64>) -> Result<Self> {
        let graph = Self {
            name: name.into(),
            x_title: String::new(),
            y_title: String::new(),
            x,
            y,
        };
        graph.validate()?;
        Ok(graph)
    }

    pub fn with_titles<X: Into<String>, Y: Into<String>>(mut self, x: X, y: Y) -> Self {
        self.x_title = x.into();
        self.y_title = y.into();
        self
    }

    pub fn validate(&self) -> Result<()> {
        if self.x.len() != self.y.len() {
            return Err(PlotError::invalid_data(format!(
                "graph '{}' has {} x values and {} y values",
                self.name,
                self.x.len(),
                self.y.len()
            )));
        }
        Ok(())
    }

    pub fn len(&self) -> usize {
        self.x.len().min(self.y.len())
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    pub fn points(&self) -> impl Iterator<Item = (f64, f64)> + '_ {
        self.x.iter().copied().zip(self.y.iter().copied())
    }
}

/// Borrowed handle to one of the supported series kinds.
#[derive(Debug, Clone, Copy)]
pub enum SeriesRef<'a> {
    Hist1D(&'a Hist1D),
    Hist2D(&'a Hist2D),
    Graph(&'a Graph),
}

impl<'a> From<&'a Hist1D> for SeriesRef<'a> {
    fn from(h: &'a Hist1D) -> Self {
        SeriesRef::Hist1D(h)
    }
}

impl<'a> From<&'a Hist2D> for SeriesRef<'a> {
    fn from(h: &'a Hist2D) -> Self {
        SeriesRef::Hist2D(h)
    }
}

impl<'a> From<&'a Graph> for SeriesRef<'a> {
    fn from(g: &'a Graph) -> Self {
        SeriesRef::Graph(g)
    }
}

/// An owned series of any supported kind, as stored in chart descriptions.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum Series {
    Hist1d(Hist1D),
    Hist2d(Hist2D),
    Graph(Graph),
}

impl Series {
    pub fn validate(&self) -> Result<()> {
        match self {
            Series::Hist1d(h) => h.validate(),
            Series::Hist2d(h) => h.validate(),
            Series::Graph(g) => g.validate(),
        }
    }
}

impl<'a> From<&'a Series> for SeriesRef<'a> {
    fn from(series: &'a Series) -> Self {
        match series {
            Series::Hist1d(h) => SeriesRef::Hist1D(h),
            Series::Hist2d(h) => SeriesRef::Hist2D(h),
            Series::Graph(g) => SeriesRef::Graph(g),
        }
    }
}

/// Axis information of a series, resolved once when the series is attached.
#[derive(Debug, Clone, PartialEq)]
pub struct SeriesAxes {
    pub x_label: String,
    pub y_label: String,
    pub z_label: Option<String>,
    /// Declared x extent.
    pub x: (f64, f64),
    pub y: (f64, f64),
    /// Whether `y` comes from the data (content or point extrema) rather than a declared axis.
    pub y_from_data: bool,
    /// Content range of a two-dimensional series.
    pub z: Option<(f64, f64)>,
}

impl<'a> SeriesRef<'a> {
    pub fn name(&self) -> &'a str {
        match self {
            SeriesRef::Hist1D(h) => &h.name,
            SeriesRef::Hist2D(h) => &h.name,
            SeriesRef::Graph(g) => &g.name,
        }
    }

    pub fn is_two_dimensional(&self) -> bool {
        matches!(self, SeriesRef::Hist2D(_))
    }

    /// Extents and labels of the series; fails with `NullSeries` when it holds no data.
    pub fn axes(&self) -> Result<SeriesAxes> {
        let empty = || PlotError::NullSeries(self.name().to_string());
        match *self {
            SeriesRef::Hist1D(h) => {
                let x = h.x_extent().ok_or_else(empty)?;
                let y = h.content_range().ok_or_else(empty)?;
                Ok(SeriesAxes {
                    x_label: h.x_title.clone(),
                    y_label: h.y_title.clone(),
                    z_label: None,
                    x,
                    y,
                    y_from_data: true,
                    z: None,
                })
            }
            SeriesRef::Hist2D(h) => {
                let x = h.x_extent().ok_or_else(empty)?;
                let y = h.y_extent().ok_or_else(empty)?;
                let z = h.content_range().ok_or_else(empty)?;
                Ok(SeriesAxes {
                    x_label: h.x_title.clone(),
                    y_label: h.y_title.clone(),
                    z_label: Some(h.z_title.clone()),
                    x,
                    y,
                    y_from_data: false,
                    z: Some(z),
                })
            }
            SeriesRef::Graph(g) => {
                let x = min_max(&g.x[..g.len()]).ok_or_else(empty)?;
                let y = min_max(&g.y[..g.len()]).ok_or_else(empty)?;
                Ok(SeriesAxes {
                    x_label: g.x_title.clone(),
                    y_label: g.y_title.clone(),
                    z_label: None,
                    x,
                    y,
                    y_from_data: true,
                    z: None,
                })
            }
        }
    }
}

fn min_max(values: &[f64]) -> Option<(f64, f64)> {
    let finite = values.iter().copied().filter(|v| v.is_finite());
    finite.fold(None, |acc, v| match acc {
        None => Some((v, v)),
        Some((lo, hi)) => Some((lo.min(v), hi.max(v))),
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn hist1d_geometry() {
        let h = Hist1D::new("h", vec![0.0, 1.0, 3.0], vec![2.0, 4.0]).unwrap();
        assert_eq!(h.n_bins(), 2);
        assert_eq!(h.center(1), 2.0);
        assert_eq!(h.width(1), 2.0);
        assert_eq!(h.error(1), 2.0);
        assert_eq!(h.x_extent(), Some((0.0, 3.0)));
        assert_eq!(h.content_range(), Some((2.0, 4.0)));
    }

    #[test]
    fn mismatched_edges_are_rejected() {
        let err = Hist1D::new("bad", vec![0.0, 1.0], vec![1.0, 2.0]).unwrap_err();
        assert!(matches!(err, PlotError::InvalidData(_)));
        let err = Graph::new("g", vec![1.0], vec![]).unwrap_err();
        assert!(matches!(err, PlotError::InvalidData(_)));
    }

    #[test]
    fn empty_series_have_no_axes() {
        let g = Graph::new("none", vec![], vec![]).unwrap();
        let err = SeriesRef::from(&g).axes().unwrap_err();
        assert!(matches!(err, PlotError::NullSeries(name) if name == "none"));

        let h = Hist1D::uniform("zero", 0, 0.0, 1.0);
        assert!(matches!(
            SeriesRef::from(&h).axes(),
            Err(PlotError::NullSeries(_))
        ));
    }

    #[test]
    fn hist2d_axes_use_declared_y_and_content_z() {
        let h = Hist2D::new(
            "map",
            vec![0.0, 1.0, 2.0],
            vec![-1.0, 1.0],
            vec![3.0, 5.0],
        )
        .unwrap()
        .with_titles("x", "y", "rate");
        assert_eq!(h.content(1, 0), 5.0);
        let axes = SeriesRef::from(&h).axes().unwrap();
        assert_eq!(axes.y, (-1.0, 1.0));
        assert!(!axes.y_from_data);
        assert_eq!(axes.z, Some((3.0, 5.0)));
        assert_eq!(axes.z_label.as_deref(), Some("rate"));
    }
}
