//! Metro line identifiers.

use std::fmt;

use serde::{Deserialize, Serialize};

/// Error returned when parsing an unknown line code.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("invalid line code {code:?}: {reason}")]
pub struct InvalidLine {
    code: String,
    reason: &'static str,
}

/// A line of the metro network.
///
/// The set of lines is closed: numbered lines `01` to `09` and `12`, plus the
/// lettered lines `A` and `B`. Codes are the two-digit (or single-letter) form
/// used by the station dataset.
///
/// # Examples
///
/// ```
/// use metro_server::domain::Line;
///
/// let l3 = Line::parse("03").unwrap();
/// assert_eq!(l3.as_str(), "03");
///
/// // Unpadded and lowercase forms are accepted by the normalizing parser
/// assert_eq!(Line::parse_normalized("3").unwrap(), l3);
/// assert_eq!(Line::parse_normalized("a").unwrap(), Line::A);
///
/// // Unknown lines are rejected
/// assert!(Line::parse("10").is_err());
/// ```
#[derive(Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub enum Line {
    L1,
    L2,
    L3,
    L4,
    L5,
    L6,
    L7,
    L8,
    L9,
    A,
    B,
    L12,
}

impl Line {
    /// Every line, in dataset order.
    pub const ALL: [Line; 12] = [
        Line::L1,
        Line::L2,
        Line::L3,
        Line::L4,
        Line::L5,
        Line::L6,
        Line::L7,
        Line::L8,
        Line::L9,
        Line::A,
        Line::B,
        Line::L12,
    ];

    /// Parse a line from its exact dataset code (`"01"`, `"A"`, `"12"`, ...).
    pub fn parse(s: &str) -> Result<Self, InvalidLine> {
        Self::ALL
            .into_iter()
            .find(|line| line.as_str() == s)
            .ok_or_else(|| InvalidLine {
                code: s.to_string(),
                reason: "not a known metro line",
            })
    }

    /// Parse a line code, tolerating surrounding whitespace, lowercase
    /// letters and missing zero padding (`"1"` is line `01`).
    pub fn parse_normalized(s: &str) -> Result<Self, InvalidLine> {
        let trimmed = s.trim();
        if trimmed.is_empty() {
            return Err(InvalidLine {
                code: s.to_string(),
                reason: "empty line code",
            });
        }

        let upper = trimmed.to_ascii_uppercase();
        let normalized = if upper.len() == 1 && upper.as_bytes()[0].is_ascii_digit() {
            format!("0{upper}")
        } else {
            upper
        };

        Self::parse(&normalized).map_err(|_| InvalidLine {
            code: s.to_string(),
            reason: "not a known metro line",
        })
    }

    /// Returns the dataset code for this line.
    pub fn as_str(&self) -> &'static str {
        match self {
            Line::L1 => "01",
            Line::L2 => "02",
            Line::L3 => "03",
            Line::L4 => "04",
            Line::L5 => "05",
            Line::L6 => "06",
            Line::L7 => "07",
            Line::L8 => "08",
            Line::L9 => "09",
            Line::A => "A",
            Line::B => "B",
            Line::L12 => "12",
        }
    }
}

impl TryFrom<String> for Line {
    type Error = InvalidLine;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Line::parse_normalized(&value)
    }
}

impl From<Line> for String {
    fn from(line: Line) -> Self {
        line.as_str().to_string()
    }
}

impl fmt::Debug for Line {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Line({})", self.as_str())
    }
}

impl fmt::Display for Line {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}
