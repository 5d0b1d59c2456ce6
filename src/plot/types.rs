//! Public types shared by panels and grids.

use crate::error::PlotError;
use std::fmt;
use std::str::FromStr;

/// One of the three plot axes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Axis {
    X,
    Y,
    Z,
}

impl Axis {
    pub const ALL: [Axis; 3] = [Axis::X, Axis::Y, Axis::Z];

    pub fn index(self) -> usize {
        match self {
            Axis::X => 0,
            Axis::Y => 1,
            Axis::Z => 2,
        }
    }

    /// Option holding the lower limit. The z range is the colour scale.
    pub fn min_key(self) -> &'static str {
        match self {
            Axis::X => "xmin",
            Axis::Y => "ymin",
            Axis::Z => "point meta min",
        }
    }

    pub fn max_key(self) -> &'static str {
        match self {
            Axis::X => "xmax",
            Axis::Y => "ymax",
            Axis::Z => "point meta max",
        }
    }

    /// Option holding the axis label. The z label lives in the colorbar style instead.
    pub fn label_key(self) -> Option<&'static str> {
        match self {
            Axis::X => Some("xlabel"),
            Axis::Y => Some("ylabel"),
            Axis::Z => None,
        }
    }

    pub fn mode_key(self) -> &'static str {
        match self {
            Axis::X => "xmode",
            Axis::Y => "ymode",
            Axis::Z => "zmode",
        }
    }
}

impl TryFrom<usize> for Axis {
    type Error = PlotError;

    fn try_from(index: usize) -> Result<Self, Self::Error> {
        match index {
            0 => Ok(Axis::X),
            1 => Ok(Axis::Y),
            2 => Ok(Axis::Z),
            other => Err(PlotError::invalid_argument(format!(
                "axis index {other} (expected 0, 1 or 2)"
            ))),
        }
    }
}

impl FromStr for Axis {
    type Err = PlotError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "x" | "0" => Ok(Axis::X),
            "y" | "1" => Ok(Axis::Y),
            "z" | "2" => Ok(Axis::Z),
            other => Err(PlotError::invalid_argument(format!("axis '{other}'"))),
        }
    }
}

impl fmt::Display for Axis {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Axis::X => "x",
            Axis::Y => "y",
            Axis::Z => "z",
        })
    }
}

/// Selects a single axis or every axis at once.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AxisSelector {
    One(Axis),
    All,
}

impl AxisSelector {
    pub fn axes(self) -> Vec<Axis> {
        match self {
            AxisSelector::One(axis) => vec![axis],
            AxisSelector::All => Axis::ALL.to_vec(),
        }
    }
}

impl From<Axis> for AxisSelector {
    fn from(axis: Axis) -> Self {
        AxisSelector::One(axis)
    }
}

impl TryFrom<usize> for AxisSelector {
    type Error = PlotError;

    fn try_from(index: usize) -> Result<Self, Self::Error> {
        Axis::try_from(index).map(AxisSelector::One)
    }
}

impl TryFrom<&str> for AxisSelector {
    type Error = PlotError;

    fn try_from(s: &str) -> Result<Self, Self::Error> {
        s.parse()
    }
}

impl FromStr for AxisSelector {
    type Err = PlotError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        if s.trim().eq_ignore_ascii_case("all") {
            return Ok(AxisSelector::All);
        }
        s.parse::<Axis>().map(AxisSelector::One)
    }
}

/// One end of a range.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub enum Bound {
    #[default]
    Unset,
    /// Supplied by the user; inference never touches it.
    Explicit(f64),
    /// Derived from attached series; only ever widened.
    Inferred(f64),
}

impl Bound {
    pub fn value(self) -> Option<f64> {
        match self {
            Bound::Unset => None,
            Bound::Explicit(v) | Bound::Inferred(v) => Some(v),
        }
    }

    pub fn is_explicit(self) -> bool {
        matches!(self, Bound::Explicit(_))
    }
}

/// Numeric limits of one axis.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct Range {
    pub min: Bound,
    pub max: Bound,
}

impl Range {
    /// Widen the inferred bounds to include `[lo, hi]`. Returns which bounds changed.
    pub fn expand(&mut self, lo: f64, hi: f64) -> (bool, bool) {
        let min_changed = match self.min {
            Bound::Explicit(_) => false,
            Bound::Inferred(cur) if cur <= lo => false,
            _ => {
                self.min = Bound::Inferred(lo);
                true
            }
        };
        let max_changed = match self.max {
            Bound::Explicit(_) => false,
            Bound::Inferred(cur) if cur >= hi => false,
            _ => {
                self.max = Bound::Inferred(hi);
                true
            }
        };
        (min_changed, max_changed)
    }

    pub fn min(&self) -> Option<f64> {
        self.min.value()
    }

    pub fn max(&self) -> Option<f64> {
        self.max.value()
    }
}

/// Label and range of one axis of a panel.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct AxisMeta {
    pub label: String,
    pub range: Range,
}

/// Significant digits kept when writing limits; enough to hide the rounding noise of
/// padding (`9.0 * 1.1`) without flattening small values.
const SIGNIFICANT_DIGITS: i32 = 10;

/// Format a limit the way it appears in the markup: no exponent, no trailing zeros.
pub fn format_number(v: f64) -> String {
    if v == 0.0 {
        return "0".to_string();
    }
    if !v.is_finite() {
        return v.to_string();
    }
    let magnitude = v.abs().log10().floor() as i32;
    let decimals = (SIGNIFICANT_DIGITS - 1 - magnitude).max(0) as usize;
    let s = format!("{v:.decimals$}");
    if s.contains('.') {
        s.trim_end_matches('0').trim_end_matches('.').to_string()
    } else {
        s
    }
}
