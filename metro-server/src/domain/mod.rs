//! Domain types for the metro route planner.
//!
//! This module contains the validated value types the rest of the crate
//! works with. All types enforce their invariants at construction time, so
//! code that receives them can trust their validity.

mod error;
mod geo;
mod line;
mod station;
mod station_id;

pub use error::DomainError;
pub use geo::{Coordinates, EARTH_RADIUS_KM, InvalidCoordinates};
pub use line::{InvalidLine, Line};
pub use station::{Anchor, Connection, CrowdLoad, Station, StationBuilder, Transfer};
pub use station_id::{InvalidStationId, StationId};
