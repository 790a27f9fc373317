//! Bearing to compass-point classification.
//!
//! The bins are kept as a literal table so the boundaries can be audited at a
//! glance. Two quirks of the reference table are reproduced on purpose:
//!
//! - `SW` starts at 213.25 rather than 213.75. Because `SSW` is checked first,
//!   bearings in `[213.25, 213.75)` still classify as `SSW`.
//! - A bearing is folded back by 360 at most once, so 720 becomes 360 (north)
//!   while 800 or any negative bearing below -11.25 stays unclassified.

use serde::{Serialize, Serializer};
use std::fmt;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum WindDirection {
    N,
    Nne,
    Ne,
    Ene,
    E,
    Ese,
    Se,
    Sse,
    S,
    Ssw,
    Sw,
    Wsw,
    W,
    Wnw,
    Nw,
    Nnw,
    /// A bearing was supplied but fell outside every bin.
    Undefined,
    /// No bearing was supplied at all.
    #[default]
    Unavailable,
}

/// `[lower, upper)` bins, scanned in order; the first match wins.
///
/// North is centred on both 0 and 360, so it appears at each end.
const BINS: &[(f64, f64, WindDirection)] = &[
    (-11.25, 11.25, WindDirection::N),
    (11.25, 33.75, WindDirection::Nne),
    (33.75, 56.25, WindDirection::Ne),
    (56.25, 78.75, WindDirection::Ene),
    (78.75, 101.25, WindDirection::E),
    (101.25, 123.75, WindDirection::Ese),
    (123.75, 146.25, WindDirection::Se),
    (146.25, 168.75, WindDirection::Sse),
    (168.75, 191.25, WindDirection::S),
    (191.25, 213.75, WindDirection::Ssw),
    (213.25, 236.25, WindDirection::Sw),
    (236.25, 258.75, WindDirection::Wsw),
    (258.75, 281.25, WindDirection::W),
    (281.25, 303.75, WindDirection::Wnw),
    (303.75, 326.25, WindDirection::Nw),
    (326.25, 348.75, WindDirection::Nnw),
    (348.75, 371.25, WindDirection::N),
];

impl WindDirection {
    /// Classify a bearing in degrees.
    pub fn from_degrees(degrees: f64) -> Self {
        let bearing = if degrees > 360.0 { degrees - 360.0 } else { degrees };

        BINS.iter()
            .find(|(lower, upper, _)| bearing >= *lower && bearing < *upper)
            .map(|(_, _, dir)| *dir)
            .unwrap_or(WindDirection::Undefined)
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            WindDirection::N => "N",
            WindDirection::Nne => "NNE",
            WindDirection::Ne => "NE",
            WindDirection::Ene => "ENE",
            WindDirection::E => "E",
            WindDirection::Ese => "ESE",
            WindDirection::Se => "SE",
            WindDirection::Sse => "SSE",
            WindDirection::S => "S",
            WindDirection::Ssw => "SSW",
            WindDirection::Sw => "SW",
            WindDirection::Wsw => "WSW",
            WindDirection::W => "W",
            WindDirection::Wnw => "WNW",
            WindDirection::Nw => "NW",
            WindDirection::Nnw => "NNW",
            WindDirection::Undefined => "UNDEFINED",
            WindDirection::Unavailable => "Unavailable",
        }
    }

    /// True for the sixteen real compass points.
    pub fn is_known(&self) -> bool {
        !matches!(self, WindDirection::Undefined | WindDirection::Unavailable)
    }
}

impl fmt::Display for WindDirection {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl Serialize for WindDirection {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(self.as_str())
    }
}
