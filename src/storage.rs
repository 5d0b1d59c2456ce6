//! Chart descriptions on disk: a JSON document naming series and figures, with
//! optional CSV files holding series data.
//!
//! ```json
//! {
//!   "preamble": "\\usepackage{pgfplots}",
//!   "series": {
//!     "energy": { "type": "hist1d", "x_title": "E", "edges": [0, 1, 2], "contents": [3, 4] },
//!     "timing": { "type": "graph_csv", "path": "timing.csv", "x_title": "t" }
//!   },
//!   "figures": [
//!     { "type": "axis", "options": "width=8cm", "log": ["y"],
//!       "items": [{ "series": "energy", "style": "E" }] },
//!     { "type": "group", "rows": 1, "cols": 2, "global_limits": ["y"],
//!       "cells": [{ "row": 0, "col": 0, "items": [{ "series": "timing" }] }] }
//!   ]
//! }
//! ```

use crate::error::{PlotError, Result};
use crate::models::{Graph, Hist1D, Hist2D, Series};
use crate::plot::{Axis, GridLayout, Legend, Panel, Picture};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fs;
use std::path::{Path, PathBuf};

/// Top-level chart description.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ChartDoc {
    #[serde(default)]
    pub preamble: String,
    /// Options of the `tikzpicture` environment.
    #[serde(default)]
    pub options: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub palette: Option<String>,
    #[serde(default)]
    pub series: BTreeMap<String, SeriesSpec>,
    #[serde(default)]
    pub figures: Vec<FigureSpec>,
}

/// A series given inline or as a CSV file.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum SeriesSpec {
    Hist1d(Hist1D),
    Hist2d(Hist2D),
    Graph(Graph),
    /// Columns `low_edge,high_edge,content[,error]`.
    Hist1dCsv {
        path: PathBuf,
        #[serde(default)]
        x_title: String,
        #[serde(default)]
        y_title: String,
    },
    /// Columns `x,y`.
    GraphCsv {
        path: PathBuf,
        #[serde(default)]
        x_title: String,
        #[serde(default)]
        y_title: String,
    },
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct NodeSpec {
    pub label: String,
    #[serde(default)]
    pub options: String,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ItemSpec {
    pub series: String,
    #[serde(default)]
    pub style: String,
    #[serde(default)]
    pub options: String,
    #[serde(default)]
    pub nodes: Vec<NodeSpec>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct LegendSpec {
    #[serde(default)]
    pub entries: Vec<String>,
    #[serde(default)]
    pub style: String,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct AxisSpec {
    #[serde(default)]
    pub options: String,
    /// Axes drawn on a log scale: `"x"`, `"y"`, `"z"` (or `0`-`2` as strings).
    #[serde(default)]
    pub log: Vec<String>,
    #[serde(default)]
    pub legend: Option<LegendSpec>,
    #[serde(default)]
    pub items: Vec<ItemSpec>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct CellSpec {
    pub row: usize,
    pub col: usize,
    #[serde(flatten)]
    pub axis: AxisSpec,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct GroupSpec {
    pub rows: usize,
    pub cols: usize,
    #[serde(default)]
    pub options: String,
    /// Axes whose limits are shared by the whole grid: `"x"`, `"y"`, `"z"` or `"all"`.
    #[serde(default)]
    pub global_limits: Vec<String>,
    #[serde(default)]
    pub cells: Vec<CellSpec>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum FigureSpec {
    Axis(AxisSpec),
    Group(GroupSpec),
}

/// Legends are keyed by figure index and, for group plots, position in `cells`.
type LegendKey = (usize, Option<usize>);

/// A loaded chart: the description plus the series and legends its figures borrow.
#[derive(Debug, Clone)]
pub struct Chart {
    pub doc: ChartDoc,
    series: BTreeMap<String, Series>,
    legends: BTreeMap<LegendKey, Legend>,
}

/// Read a JSON chart description. CSV paths are resolved relative to its directory.
pub fn load_chart<P: AsRef<Path>>(path: P) -> Result<Chart> {
    let path = path.as_ref();
    let text = fs::read_to_string(path)?;
    let base = path.parent().unwrap_or_else(|| Path::new("."));
    Chart::from_json_str(&text, base)
}

impl Chart {
    pub fn from_json_str(json: &str, base_dir: &Path) -> Result<Self> {
        let doc: ChartDoc = serde_json::from_str(json)?;
        Self::from_doc(doc, base_dir)
    }

    pub fn from_doc(doc: ChartDoc, base_dir: &Path) -> Result<Self> {
        let mut series = BTreeMap::new();
        for (name, spec) in &doc.series {
            let loaded = resolve_series(name, spec, base_dir)?;
            loaded.validate()?;
            series.insert(name.clone(), loaded);
        }
        log::debug!("loaded {} series", series.len());

        let mut legends = BTreeMap::new();
        for (i, figure) in doc.figures.iter().enumerate() {
            match figure {
                FigureSpec::Axis(spec) => {
                    if let Some(legend) = &spec.legend {
                        legends.insert((i, None), build_legend(legend));
                    }
                }
                FigureSpec::Group(group) => {
                    for (j, cell) in group.cells.iter().enumerate() {
                        if let Some(legend) = &cell.axis.legend {
                            legends.insert((i, Some(j)), build_legend(legend));
                        }
                    }
                }
            }
        }

        Ok(Self {
            doc,
            series,
            legends,
        })
    }

    pub fn series(&self, name: &str) -> Option<&Series> {
        self.series.get(name)
    }

    /// Build the picture. Panels borrow series and legends from `self`.
    pub fn picture(&self) -> Result<Picture<'_>> {
        let mut picture = Picture::new(&self.doc.options, &self.doc.preamble);
        if let Some(palette) = &self.doc.palette {
            picture.set_palette(palette);
        }
        for (i, figure) in self.doc.figures.iter().enumerate() {
            match figure {
                FigureSpec::Axis(spec) => {
                    let mut panel = Panel::new(&spec.options);
                    self.fill_panel(&mut panel, spec, (i, None))?;
                    picture.add(panel);
                }
                FigureSpec::Group(group) => {
                    let mut grid = GridLayout::new(group.rows, group.cols, &group.options)?;
                    for selector in &group.global_limits {
                        grid.set_global_axis_limit_mode(selector.as_str(), true)?;
                    }
                    for (j, cell) in group.cells.iter().enumerate() {
                        let id = grid.cell_index(cell.row, cell.col)?;
                        let panel = grid.cell_mut(id)?;
                        panel.add_options(&cell.axis.options);
                        self.fill_panel(panel, &cell.axis, (i, Some(j)))?;
                    }
                    picture.add(grid);
                }
            }
        }
        Ok(picture)
    }

    fn fill_panel<'s>(&'s self, panel: &mut Panel<'s>, spec: &AxisSpec, key: LegendKey) -> Result<()> {
        for axis in &spec.log {
            let axis: Axis = axis.parse()?;
            panel.set_log_mode(axis.index(), true)?;
        }
        if let Some(legend) = self.legends.get(&key) {
            panel.set_legend(legend);
        }
        for item in &spec.items {
            let series = self
                .series
                .get(&item.series)
                .ok_or_else(|| PlotError::UnknownSeries(item.series.clone()))?;
            panel.attach_series(series, &item.style, &item.options)?;
            let last = panel.items().len() - 1;
            if let Some(plot) = panel.item_mut(last) {
                for node in &item.nodes {
                    plot.add_node(&node.label, &node.options);
                }
            }
        }
        Ok(())
    }
}

fn build_legend(spec: &LegendSpec) -> Legend {
    let mut legend = Legend::new();
    for entry in &spec.entries {
        legend.add_entry(entry);
    }
    legend.style_mut().add(&spec.style);
    legend
}

fn resolve_series(name: &str, spec: &SeriesSpec, base_dir: &Path) -> Result<Series> {
    let mut series = match spec {
        SeriesSpec::Hist1d(h) => Series::Hist1d(h.clone()),
        SeriesSpec::Hist2d(h) => Series::Hist2d(h.clone()),
        SeriesSpec::Graph(g) => Series::Graph(g.clone()),
        SeriesSpec::Hist1dCsv {
            path,
            x_title,
            y_title,
        } => Series::Hist1d(
            load_hist1d_csv(base_dir.join(path))?.with_titles(x_title.as_str(), y_title.as_str()),
        ),
        SeriesSpec::GraphCsv {
            path,
            x_title,
            y_title,
        } => Series::Graph(
            load_graph_csv(base_dir.join(path))?.with_titles(x_title.as_str(), y_title.as_str()),
        ),
    };
    // The key in the description names the series unless it carries its own name.
    match &mut series {
        Series::Hist1d(h) if h.name.is_empty() => h.name = name.to_string(),
        Series::Hist2d(h) if h.name.is_empty() => h.name = name.to_string(),
        Series::Graph(g) if g.name.is_empty() => g.name = name.to_string(),
        _ => {}
    }
    Ok(series)
}

#[derive(Debug, Deserialize)]
struct BinRecord {
    low_edge: f64,
    high_edge: f64,
    content: f64,
    #[serde(default)]
    error: Option<f64>,
}

#[derive(Debug, Deserialize)]
struct PointRecord {
    x: f64,
    y: f64,
}

/// Read a 1D histogram from CSV with columns `low_edge,high_edge,content[,error]`.
/// Bins must be contiguous.
pub fn load_hist1d_csv<P: AsRef<Path>>(path: P) -> Result<Hist1D> {
    let path = path.as_ref();
    let mut rdr = csv::ReaderBuilder::new().trim(csv::Trim::All).from_path(path)?;
    let mut edges = Vec::new();
    let mut contents = Vec::new();
    let mut errors = Vec::new();
    for record in rdr.deserialize() {
        let bin: BinRecord = record?;
        match edges.last().copied() {
            None => edges.push(bin.low_edge),
            Some(prev) if prev != bin.low_edge => {
                return Err(PlotError::invalid_data(format!(
                    "{}: bin starting at {} does not follow {}",
                    path.display(),
                    bin.low_edge,
                    prev
                )));
            }
            Some(_) => {}
        }
        edges.push(bin.high_edge);
        contents.push(bin.content);
        errors.push(bin.error);
    }

    let stem = path
        .file_stem()
        .map(|s| s.to_string_lossy().into_owned())
        .unwrap_or_default();
    let mut hist = Hist1D::new(stem, edges, contents)?;
    // Errors are used only when every bin has one.
    if !errors.is_empty() && errors.iter().all(Option::is_some) {
        hist = hist.with_errors(errors.into_iter().flatten().collect());
    }
    Ok(hist)
}

/// Read a graph from CSV with columns `x,y`.
pub fn load_graph_csv<P: AsRef<Path>>(path: P) -> Result<Graph> {
    let path = path.as_ref();
    let mut rdr = csv::ReaderBuilder::new().trim(csv::Trim::All).from_path(path)?;
    let (mut xs, mut ys) = (Vec::new(), Vec::new());
    for record in rdr.deserialize() {
        let point: PointRecord = record?;
        xs.push(point.x);
        ys.push(point.y);
    }
    let stem = path
        .file_stem()
        .map(|s| s.to_string_lossy().into_owned())
        .unwrap_or_default();
    Graph::new(stem, xs, ys)
}
