//! Bonus points values and their display form.
//!
//! The `AskPoints` column tags each points value with a mode: printed as-is,
//! filled in by the rider, or applied as a multiplier.

use log::debug;

/// `AskPoints` code for a fixed points value.
pub const PLAIN_MODE: i64 = 0;
/// `AskPoints` code for a value the rider must work out and write in.
pub const VARIABLE_MODE: i64 = 1;
/// `AskPoints` code for a multiplier applied to the rider's score.
pub const MULTIPLIER_MODE: i64 = 2;

/// A points value tagged with how the rally book should present it.
///
/// # Examples
///
/// ```
/// use rbook_core::{Points, PointsPrefixes};
///
/// let prefixes = PointsPrefixes::default();
/// let points = Points::from_code(5, 1);
/// assert_eq!(points.display(&prefixes), "V5");
/// assert!(points.asks_points());
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Points {
    /// A fixed value printed verbatim.
    Plain(i64),
    /// A value the rider computes and writes in.
    Variable(i64),
    /// A multiplier rather than an additive value.
    Multiplier(i64),
}

impl Default for Points {
    fn default() -> Self {
        Self::Plain(1)
    }
}

impl Points {
    /// Decode a raw value and its `AskPoints` mode code.
    ///
    /// Unrecognised codes are treated as plain points.
    #[must_use]
    pub fn from_code(value: i64, mode: i64) -> Self {
        match mode {
            VARIABLE_MODE => Self::Variable(value),
            MULTIPLIER_MODE => Self::Multiplier(value),
            PLAIN_MODE => Self::Plain(value),
            other => {
                debug!("unknown points mode {other}; treating {value} as plain points");
                Self::Plain(value)
            }
        }
    }

    /// The raw numeric value regardless of mode.
    #[must_use]
    pub const fn value(self) -> i64 {
        match self {
            Self::Plain(value) | Self::Variable(value) | Self::Multiplier(value) => value,
        }
    }

    /// True when the template should render an editable box for the rider.
    #[must_use]
    pub const fn asks_points(self) -> bool {
        matches!(self, Self::Variable(_))
    }

    /// Render the value with the configured mode prefix.
    #[must_use]
    pub fn display(self, prefixes: &PointsPrefixes) -> String {
        match self {
            Self::Plain(value) => value.to_string(),
            Self::Variable(value) => format!("{}{value}", prefixes.variable),
            Self::Multiplier(value) => format!("{}{value}", prefixes.multiplier),
        }
    }
}

/// Prefixes marking variable and multiplier points in the printed book.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PointsPrefixes {
    /// Prefix for [`Points::Variable`].
    pub variable: String,
    /// Prefix for [`Points::Multiplier`].
    pub multiplier: String,
}

impl Default for PointsPrefixes {
    fn default() -> Self {
        Self {
            variable: String::from("V"),
            multiplier: String::from("X"),
        }
    }
}
