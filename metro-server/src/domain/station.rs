//! Stations and the records hanging off them.
//!
//! A `Station` owns its line-specific anchor points, outgoing connections,
//! transfer records and crowd figures. Stations are built once (by the loader
//! or a test) through `StationBuilder` and are immutable afterwards.

use super::error::DomainError;
use super::{Coordinates, Line, StationId};

/// Geographic position of a station on one specific line.
///
/// Interchange stations often have a distinct platform location per line.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Anchor {
    pub line: Line,
    pub coordinates: Coordinates,
}

/// A directed edge to a neighbouring station along one line.
///
/// No reverse edge is implied: a symmetric link is two records.
#[derive(Debug, Clone, PartialEq)]
pub struct Connection {
    pub target: StationId,
    pub line: Line,
    /// Track distance in kilometres.
    pub distance_km: f64,
}

/// A walking interchange between a set of lines at a station.
#[derive(Debug, Clone, PartialEq)]
pub struct Transfer {
    pub lines: Vec<Line>,
    /// Walking distance in kilometres.
    pub distance_km: f64,
}

impl Transfer {
    /// Whether this record covers changing from `from` to `to`.
    pub fn connects(&self, from: Line, to: Line) -> bool {
        self.lines.contains(&from) && self.lines.contains(&to)
    }
}

/// Average passenger load of one line at a station.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CrowdLoad {
    pub line: Line,
    pub average: u64,
}

/// A metro station.
#[derive(Debug, Clone, PartialEq)]
pub struct Station {
    id: StationId,
    display_name: Option<String>,
    lines: Vec<Line>,
    anchors: Vec<Anchor>,
    connections: Vec<Connection>,
    transfers: Vec<Transfer>,
    loads: Vec<CrowdLoad>,
    is_open: bool,
}

impl Station {
    /// Start building a station with the given identifier.
    pub fn builder(id: StationId) -> StationBuilder {
        StationBuilder {
            station: Station {
                id,
                display_name: None,
                lines: Vec::new(),
                anchors: Vec::new(),
                connections: Vec::new(),
                transfers: Vec::new(),
                loads: Vec::new(),
                is_open: true,
            },
        }
    }

    pub fn id(&self) -> &StationId {
        &self.id
    }

    /// Human-readable name, if the dataset provides one.
    pub fn display_name(&self) -> Option<&str> {
        self.display_name.as_deref()
    }

    /// Lines serving this station, in dataset order.
    pub fn lines(&self) -> &[Line] {
        &self.lines
    }

    /// Anchor points, in dataset order.
    pub fn anchors(&self) -> &[Anchor] {
        &self.anchors
    }

    pub fn connections(&self) -> &[Connection] {
        &self.connections
    }

    pub fn transfers(&self) -> &[Transfer] {
        &self.transfers
    }

    pub fn loads(&self) -> &[CrowdLoad] {
        &self.loads
    }

    pub fn is_open(&self) -> bool {
        self.is_open
    }

    /// Whether `line` serves this station.
    pub fn serves(&self, line: Line) -> bool {
        self.lines.contains(&line)
    }

    /// The anchor point for `line`, if one was recorded.
    pub fn anchor_for(&self, line: Line) -> Option<Coordinates> {
        self.anchors
            .iter()
            .find(|a| a.line == line)
            .map(|a| a.coordinates)
    }

    /// The first listed anchor point.
    pub fn first_anchor(&self) -> Option<Coordinates> {
        self.anchors.first().map(|a| a.coordinates)
    }

    /// The first connection to `target` along `line`.
    pub fn connection_to(&self, target: &StationId, line: Line) -> Option<&Connection> {
        self.connections
            .iter()
            .find(|c| c.line == line && &c.target == target)
    }

    /// Walking distance for changing from `from` to `to` here, if registered.
    pub fn transfer_distance(&self, from: Line, to: Line) -> Option<f64> {
        self.transfers
            .iter()
            .find(|t| t.connects(from, to))
            .map(|t| t.distance_km)
    }

    /// Average load recorded for `line`.
    pub fn load_on(&self, line: Line) -> Option<u64> {
        self.loads
            .iter()
            .find(|l| l.line == line)
            .map(|l| l.average)
    }
}

/// Fluent builder for `Station`.
#[derive(Debug)]
pub struct StationBuilder {
    station: Station,
}

impl StationBuilder {
    pub fn display_name(mut self, name: impl Into<String>) -> Self {
        self.station.display_name = Some(name.into());
        self
    }

    /// Add a serving line. Duplicates are ignored.
    pub fn line(mut self, line: Line) -> Self {
        if !self.station.lines.contains(&line) {
            self.station.lines.push(line);
        }
        self
    }

    pub fn anchor(mut self, line: Line, coordinates: Coordinates) -> Self {
        self.station.anchors.push(Anchor { line, coordinates });
        self
    }

    pub fn connection(mut self, target: StationId, line: Line, distance_km: f64) -> Self {
        self.station.connections.push(Connection {
            target,
            line,
            distance_km,
        });
        self
    }

    pub fn transfer(mut self, lines: Vec<Line>, distance_km: f64) -> Self {
        self.station.transfers.push(Transfer { lines, distance_km });
        self
    }

    pub fn load(mut self, line: Line, average: u64) -> Self {
        self.station.loads.push(CrowdLoad { line, average });
        self
    }

    pub fn open(mut self, is_open: bool) -> Self {
        self.station.is_open = is_open;
        self
    }

    /// Finish the station, validating every distance.
    pub fn build(self) -> Result<Station, DomainError> {
        let station = self.station;

        let distances = station
            .connections
            .iter()
            .map(|c| c.distance_km)
            .chain(station.transfers.iter().map(|t| t.distance_km));
        for value in distances {
            if !value.is_finite() || value < 0.0 {
                return Err(DomainError::InvalidDistance {
                    station: station.id.clone(),
                    value,
                });
            }
        }

        Ok(station)
    }
}
