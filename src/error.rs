//! Error type shared by the option store, panels, grids and chart loading.

use thiserror::Error;

pub type Result<T> = std::result::Result<T, PlotError>;

#[derive(Debug, Error)]
pub enum PlotError {
    /// Bad axis index or axis selector.
    #[error("invalid argument: {0}")]
    InvalidArgument(String),

    /// Cell id outside the grid, or a grid built with zero rows/columns.
    #[error("index {index} out of range (limit {limit})")]
    IndexOutOfRange { index: usize, limit: usize },

    /// A series with no bins or no points.
    #[error("series '{0}' is empty")]
    NullSeries(String),

    #[error("invalid data: {0}")]
    InvalidData(String),

    /// A chart description refers to a series it never defined.
    #[error("unknown series '{0}'")]
    UnknownSeries(String),

    #[error(transparent)]
    Io(#[from] std::io::Error),

    #[error(transparent)]
    Json(#[from] serde_json::Error),

    #[error(transparent)]
    Csv(#[from] csv::Error),
}

impl From<std::convert::Infallible> for PlotError {
    fn from(never: std::convert::Infallible) -> Self {
        match never {}
    }
}

impl PlotError {
    pub fn invalid_argument<S: Into<String>>(message: S) -> Self {
        Self::InvalidArgument(message.into())
    }

    pub fn invalid_data<S: Into<String>>(message: S) -> Self {
        Self::InvalidData(message.into())
    }
}
