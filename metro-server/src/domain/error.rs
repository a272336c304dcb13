//! Domain error types.
//!
//! These errors represent validation failures in the network data itself.
//! They are distinct from IO and parsing errors.

use super::StationId;

/// Domain-level errors for data validation.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum DomainError {
    /// A connection or transfer distance is negative or not a number
    #[error("station {station} has an invalid distance: {value} km")]
    InvalidDistance { station: StationId, value: f64 },
}
