//! Station identifier type.

use std::borrow::Borrow;
use std::fmt;

use serde::{Deserialize, Serialize};

/// Error returned when parsing an invalid station identifier.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("invalid station identifier: {reason}")]
pub struct InvalidStationId {
    reason: &'static str,
}

/// The unique key of a station in the network (e.g. `"pantitlan"`).
///
/// Identifiers are opaque. They must be non-empty and carry no leading or
/// trailing whitespace.
///
/// # Examples
///
/// ```
/// use metro_server::domain::StationId;
///
/// let id = StationId::new("pantitlan").unwrap();
/// assert_eq!(id.as_str(), "pantitlan");
///
/// assert!(StationId::new("").is_err());
/// assert!(StationId::new(" pantitlan").is_err());
/// ```
#[derive(Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct StationId(String);

impl StationId {
    /// Create a station identifier, validating it.
    pub fn new(s: impl Into<String>) -> Result<Self, InvalidStationId> {
        let s = s.into();
        if s.is_empty() {
            return Err(InvalidStationId {
                reason: "cannot be empty",
            });
        }
        if s.trim() != s {
            return Err(InvalidStationId {
                reason: "cannot have surrounding whitespace",
            });
        }
        Ok(StationId(s))
    }

    /// Returns the identifier as a string slice.
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl TryFrom<String> for StationId {
    type Error = InvalidStationId;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        StationId::new(value)
    }
}

impl From<StationId> for String {
    fn from(id: StationId) -> Self {
        id.0
    }
}

impl Borrow<str> for StationId {
    fn borrow(&self) -> &str {
        &self.0
    }
}

impl fmt::Debug for StationId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "StationId({})", self.0)
    }
}

impl fmt::Display for StationId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}
