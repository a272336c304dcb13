//! The metro network graph.
//!
//! A `Network` is an immutable, read-only multigraph of stations. It is
//! built once (usually by the JSON loader) and shared by any number of
//! concurrent searches.

mod error;
mod loader;

use std::collections::HashMap;

use tracing::warn;

use crate::domain::{Connection, Station, StationId};

pub use error::NetworkError;
pub use loader::{load_network, parse_network};

/// Dense index of a station inside one `Network`.
///
/// Indices are only meaningful for the network that produced them.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct StationIdx(usize);

impl StationIdx {
    fn index(self) -> usize {
        self.0
    }
}

/// Immutable station graph.
#[derive(Debug, Clone, Default)]
pub struct Network {
    stations: Vec<Station>,
    index: HashMap<StationId, StationIdx>,
    /// Largest average line load anywhere in the network.
    max_crowd_load: u64,
}

impl Network {
    /// Build a network from stations, keeping their order.
    ///
    /// Connections may name stations that are not present; the search treats
    /// such edges as unreachable.
    pub fn from_stations(
        stations: impl IntoIterator<Item = Station>,
    ) -> Result<Self, NetworkError> {
        let mut network = Network::default();

        for station in stations {
            let idx = StationIdx(network.stations.len());
            if network.index.insert(station.id().clone(), idx).is_some() {
                return Err(NetworkError::DuplicateStation(station.id().clone()));
            }
            network.stations.push(station);
        }

        network.max_crowd_load = network
            .stations
            .iter()
            .flat_map(|s| s.loads())
            .map(|l| l.average)
            .max()
            .unwrap_or(0);

        for (from, connection) in network.dangling_connections() {
            warn!(
                station = %from,
                target = %connection.target,
                line = %connection.line,
                "connection targets an unknown station"
            );
        }

        Ok(network)
    }

    /// Resolve an identifier to its index.
    pub fn resolve(&self, id: &StationId) -> Result<StationIdx, NetworkError> {
        self.index
            .get(id)
            .copied()
            .ok_or_else(|| NetworkError::NotFound(id.clone()))
    }

    /// Look up a station by identifier.
    pub fn station(&self, id: &StationId) -> Result<&Station, NetworkError> {
        self.resolve(id).map(|idx| self.get(idx))
    }

    /// Look up a station by index.
    ///
    /// # Panics
    ///
    /// Panics if `idx` was produced by a different network.
    pub fn get(&self, idx: StationIdx) -> &Station {
        &self.stations[idx.index()]
    }

    /// Whether `id` names a station in this network.
    pub fn contains(&self, id: &StationId) -> bool {
        self.index.contains_key(id)
    }

    /// Stations in load order.
    pub fn stations(&self) -> &[Station] {
        &self.stations
    }

    pub fn len(&self) -> usize {
        self.stations.len()
    }

    pub fn is_empty(&self) -> bool {
        self.stations.is_empty()
    }

    /// The largest per-line average load across the whole network.
    ///
    /// Used to normalize crowd factors; computed once at construction.
    pub fn max_crowd_load(&self) -> u64 {
        self.max_crowd_load
    }

    /// Connections whose target is not part of the network.
    pub fn dangling_connections(&self) -> impl Iterator<Item = (&StationId, &Connection)> {
        self.stations.iter().flat_map(move |station| {
            station
                .connections()
                .iter()
                .filter(move |c| !self.contains(&c.target))
                .map(move |c| (station.id(), c))
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::{Coordinates, Line};

    fn id(s: &str) -> StationId {
        StationId::new(s).unwrap()
    }

    fn station(name: &str, load: u64, next: &str) -> Station {
        Station::builder(id(name))
            .line(Line::L1)
            .anchor(Line::L1, Coordinates::new(19.4, -99.1).unwrap())
            .connection(id(next), Line::L1, 1.0)
            .load(Line::L1, load)
            .build()
            .unwrap()
    }

    #[test]
    fn lookup_by_id_and_index() {
        let network =
            Network::from_stations([station("a", 10, "b"), station("b", 20, "a")]).unwrap();

        assert_eq!(network.len(), 2);
        let idx = network.resolve(&id("b")).unwrap();
        assert_eq!(network.get(idx).id(), &id("b"));
        assert_eq!(network.station(&id("a")).unwrap().id(), &id("a"));
    }

    #[test]
    fn indices_follow_insertion_order() {
        let names = ["c", "a", "d", "b"];
        let network = Network::from_stations(names.map(|n| station(n, 0, "a"))).unwrap();

        for (position, name) in names.iter().enumerate() {
            let idx = network.resolve(&id(name)).unwrap();
            assert_eq!(idx.index(), position);
            assert_eq!(network.get(idx).id(), &id(name));
            assert_eq!(network.stations()[position].id(), &id(name));
        }
    }

    #[test]
    fn unknown_station_is_not_found() {
        let network = Network::from_stations([station("a", 10, "b")]).unwrap();
        let err = network.station(&id("zz")).unwrap_err();
        assert!(matches!(err, NetworkError::NotFound(ref missing) if missing == &id("zz")));
    }

    #[test]
    fn duplicate_station_rejected() {
        let err =
            Network::from_stations([station("a", 1, "b"), station("a", 2, "b")]).unwrap_err();
        assert!(matches!(err, NetworkError::DuplicateStation(_)));
    }

    #[test]
    fn max_crowd_load_over_all_stations() {
        let network = Network::from_stations([
            station("a", 10, "b"),
            station("b", 250, "c"),
            station("c", 30, "a"),
        ])
        .unwrap();
        assert_eq!(network.max_crowd_load(), 250);
    }

    #[test]
    fn max_crowd_load_defaults_to_zero() {
        let bare = Station::builder(id("a")).build().unwrap();
        let network = Network::from_stations([bare]).unwrap();
        assert_eq!(network.max_crowd_load(), 0);
    }

    #[test]
    fn dangling_connections_are_reported() {
        let network =
            Network::from_stations([station("a", 1, "b"), station("b", 1, "ghost")]).unwrap();

        let dangling: Vec<_> = network
            .dangling_connections()
            .map(|(from, c)| (from.as_str(), c.target.as_str()))
            .collect();
        assert_eq!(dangling, vec![("b", "ghost")]);
    }
}
