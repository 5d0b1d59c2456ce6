//! tikzplot
//!
//! A small Rust library for composing pgfplots/TikZ figures from histograms and
//! graphs. Pairs with the `tikzplot` CLI.
//!
//! ### Features
//! - Option lists parsed brace-aware and merged last-write-wins
//! - Single axes with inferred, padded ranges and first-write-wins labels
//! - Group plots that hoist shared limits, labels and tick labels to the group
//! - JSON chart descriptions with inline or CSV series data
//!
//! ### Example
//! ```
//! use tikzplot::{Figure, GridLayout, Hist1D};
//!
//! let a = Hist1D::new("a", vec![0.0, 1.0, 2.0], vec![3.0, 5.0])?.with_titles("E", "N");
//! let b = Hist1D::new("b", vec![0.0, 1.0, 2.0], vec![1.0, 2.0])?.with_titles("E", "N");
//!
//! let mut grid = GridLayout::new(1, 2, "width=5cm")?;
//! grid.attach_series(&a, 0, "", "")?;
//! grid.attach_series(&b, 1, "E", "")?;
//! let tex = grid.render();
//! assert!(tex.contains("xlabels at=edge bottom"));
//! # Ok::<(), tikzplot::PlotError>(())
//! ```

pub mod error;
pub mod latex;
pub mod models;
pub mod options;
pub mod plot;
pub mod storage;

pub use error::{PlotError, Result};
pub use models::{Graph, Hist1D, Hist2D, Series, SeriesRef};
pub use options::OptionStore;
pub use plot::{Axis, AxisSelector, Figure, GridLayout, Legend, Panel, Picture};
pub use storage::{Chart, load_chart};
