//! Network loading and lookup errors.

use std::path::PathBuf;

use crate::domain::{DomainError, InvalidCoordinates, InvalidLine, InvalidStationId, StationId};

/// Errors that can occur when building or querying the network.
#[derive(Debug, thiserror::Error)]
pub enum NetworkError {
    /// Identifier does not name a station in the network
    #[error("station not found: {0}")]
    NotFound(StationId),

    /// The same identifier was supplied twice
    #[error("duplicate station: {0}")]
    DuplicateStation(StationId),

    /// Dataset could not be read
    #[error("failed to read {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// Dataset is not valid JSON or does not match the expected shape
    #[error("JSON parse error: {0}")]
    Json(#[from] serde_json::Error),

    /// A station key is not a valid identifier
    #[error("invalid station key {key:?}: {source}")]
    InvalidStationId {
        key: String,
        #[source]
        source: InvalidStationId,
    },

    /// A line code is unknown
    #[error("station {station}: {source}")]
    InvalidLine {
        station: StationId,
        #[source]
        source: InvalidLine,
    },

    /// An anchor point is out of range
    #[error("station {station}: {source}")]
    InvalidCoordinates {
        station: StationId,
        #[source]
        source: InvalidCoordinates,
    },

    /// Station data fails validation
    #[error(transparent)]
    Domain(#[from] DomainError),
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::Line;

    #[test]
    fn error_display() {
        let id = StationId::new("observatorio").unwrap();

        let err = NetworkError::NotFound(id.clone());
        assert_eq!(err.to_string(), "station not found: observatorio");

        let err = NetworkError::DuplicateStation(id.clone());
        assert_eq!(err.to_string(), "duplicate station: observatorio");

        let err = NetworkError::InvalidLine {
            station: id,
            source: Line::parse("Z").unwrap_err(),
        };
        assert_eq!(
            err.to_string(),
            "station observatorio: invalid line code \"Z\": not a known metro line"
        );
    }
}
