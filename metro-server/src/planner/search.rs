//! A* route search over (station, line) states.
//!
//! Riding into a station on one line and on another are different states:
//! staying on a line is free while changing costs a walk, so both must be
//! tracked with their own accumulated cost.

use std::cmp::{Ordering, Reverse};
use std::collections::{BinaryHeap, HashSet};
use std::fmt;
use std::time::Instant;

use chrono::NaiveDateTime;
use tracing::{debug, trace};

use crate::domain::{Line, StationId};
use crate::network::{Network, StationIdx};

use super::config::SearchConfig;
use super::cost::CostModel;
use super::heuristic::Goal;
use super::itinerary::{Itinerary, reconstruct};

/// Which end of the query an identifier belongs to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Endpoint {
    Origin,
    Destination,
}

impl fmt::Display for Endpoint {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Endpoint::Origin => f.write_str("origin"),
            Endpoint::Destination => f.write_str("destination"),
        }
    }
}

/// Error from route search.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum RouteError {
    /// Origin or destination is not in the network
    #[error("{role} station '{id}' not found")]
    StationNotFound { role: Endpoint, id: StationId },

    /// Destination has no coordinates to aim the heuristic at
    #[error("destination station '{0}' has no location data")]
    NoLocationData(StationId),

    /// Every reachable state was explored without reaching the destination
    #[error("no route found between '{origin}' and '{destination}'")]
    NoPathFound {
        origin: StationId,
        destination: StationId,
    },

    /// Invalid search request
    #[error("invalid search request: {0}")]
    InvalidRequest(String),

    /// Search exceeded its time budget
    #[error("search timed out")]
    Timeout,
}

/// Request for route search.
#[derive(Debug, Clone)]
pub struct SearchRequest {
    pub origin: StationId,
    pub destination: StationId,

    /// Trip date and time; only weekday and hour matter.
    pub departure: NaiveDateTime,

    /// Largest per-line average load across the whole network.
    pub max_crowd_load: u64,

    /// Uniform train speed for this query (km/h).
    pub speed_kmh: f64,
}

impl SearchRequest {
    /// Create a new search request.
    pub fn new(
        origin: StationId,
        destination: StationId,
        departure: NaiveDateTime,
        max_crowd_load: u64,
        speed_kmh: f64,
    ) -> Self {
        Self {
            origin,
            destination,
            departure,
            max_crowd_load,
            speed_kmh,
        }
    }

    /// Validate the search request.
    pub fn validate(&self) -> Result<(), RouteError> {
        if !self.speed_kmh.is_finite() || self.speed_kmh <= 0.0 {
            return Err(RouteError::InvalidRequest(format!(
                "travel speed must be positive, got {} km/h",
                self.speed_kmh
            )));
        }
        Ok(())
    }
}

/// Search state identity: where the traveller is and which line they are on.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub(crate) struct StateKey {
    pub(crate) station: StationIdx,
    pub(crate) line: Line,
}

/// A node of the search tree, stored in an arena and linked to its parent
/// by index.
#[derive(Debug, Clone, Copy)]
pub(crate) struct SearchNode {
    pub(crate) key: StateKey,
    /// Accumulated cost from the origin (s).
    pub(crate) g: f64,
    /// Estimated remaining cost (s).
    pub(crate) h: f64,
    /// Accumulated track distance (km).
    pub(crate) distance_km: f64,
    /// Line changes along the path so far.
    pub(crate) changes: u32,
    pub(crate) parent: Option<usize>,
}

impl SearchNode {
    fn f(&self) -> f64 {
        self.g + self.h
    }
}

/// Frontier entry ordered by `f`, then by fewer line changes, then by
/// insertion order so remaining ties pop first-in first-out.
#[derive(Debug, Clone, Copy)]
struct FrontierEntry {
    f: f64,
    changes: u32,
    seq: u64,
    node: usize,
}

impl Ord for FrontierEntry {
    fn cmp(&self, other: &Self) -> Ordering {
        self.f
            .total_cmp(&other.f)
            .then(self.changes.cmp(&other.changes))
            .then(self.seq.cmp(&other.seq))
    }
}

impl PartialOrd for FrontierEntry {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl PartialEq for FrontierEntry {
    fn eq(&self, other: &Self) -> bool {
        self.cmp(other) == Ordering::Equal
    }
}

impl Eq for FrontierEntry {}

/// Node arena plus min-priority frontier for one search.
#[derive(Default)]
struct Frontier {
    arena: Vec<SearchNode>,
    heap: BinaryHeap<Reverse<FrontierEntry>>,
    next_seq: u64,
}

impl Frontier {
    fn push(&mut self, node: SearchNode) {
        let idx = self.arena.len();
        self.arena.push(node);
        self.heap.push(Reverse(FrontierEntry {
            f: node.f(),
            changes: node.changes,
            seq: self.next_seq,
            node: idx,
        }));
        self.next_seq += 1;
    }

    fn pop(&mut self) -> Option<usize> {
        self.heap.pop().map(|Reverse(entry)| entry.node)
    }
}

/// Route planner using A*.
pub struct Planner<'a> {
    network: &'a Network,
    config: &'a SearchConfig,
}

impl<'a> Planner<'a> {
    /// Create a new planner.
    pub fn new(network: &'a Network, config: &'a SearchConfig) -> Self {
        Self { network, config }
    }

    /// Search for the minimum-time route.
    pub fn search(&self, request: &SearchRequest) -> Result<Itinerary, RouteError> {
        request.validate()?;

        let network = self.network;
        let origin_idx = network
            .resolve(&request.origin)
            .map_err(|_| RouteError::StationNotFound {
                role: Endpoint::Origin,
                id: request.origin.clone(),
            })?;
        let destination_idx =
            network
                .resolve(&request.destination)
                .map_err(|_| RouteError::StationNotFound {
                    role: Endpoint::Destination,
                    id: request.destination.clone(),
                })?;

        if origin_idx == destination_idx {
            return Ok(Itinerary::trivial(request.origin.clone()));
        }

        let destination = network.get(destination_idx);
        let destination_anchors: Vec<_> =
            destination.anchors().iter().map(|a| a.coordinates).collect();
        let goal = Goal::new(
            &destination_anchors,
            self.config.destination_anchor,
            request.speed_kmh,
        )
        .ok_or_else(|| RouteError::NoLocationData(request.destination.clone()))?;

        let costs = CostModel::new(
            self.config,
            request.speed_kmh,
            request.max_crowd_load,
            request.departure,
        );
        let deadline = self.config.timeout.map(|t| Instant::now() + t);

        let mut frontier = Frontier::default();
        let mut explored: HashSet<StateKey> = HashSet::new();

        let origin = network.get(origin_idx);
        for &line in origin.lines() {
            if let Some(anchor) = origin.anchor_for(line) {
                frontier.push(SearchNode {
                    key: StateKey {
                        station: origin_idx,
                        line,
                    },
                    g: 0.0,
                    h: goal.estimate(anchor),
                    distance_km: 0.0,
                    changes: 0,
                    parent: None,
                });
            }
        }

        while let Some(current_idx) = frontier.pop() {
            if deadline.is_some_and(|d| Instant::now() >= d) {
                debug!(expanded = explored.len(), "route search timed out");
                return Err(RouteError::Timeout);
            }

            let current = frontier.arena[current_idx];

            if current.key.station == destination_idx {
                debug!(
                    expanded = explored.len(),
                    generated = frontier.arena.len(),
                    cost_secs = current.g,
                    "route found"
                );
                return Ok(reconstruct(network, &frontier.arena, current_idx));
            }

            // Stale duplicate: the first pop of a state is authoritative.
            if !explored.insert(current.key) {
                continue;
            }

            let station = network.get(current.key.station);
            trace!(
                station = %station.id(),
                line = %current.key.line,
                g = current.g,
                h = current.h,
                "expanding"
            );

            for connection in station.connections() {
                let Ok(next_idx) = network.resolve(&connection.target) else {
                    trace!(target = %connection.target, "skipping dangling connection");
                    continue;
                };

                let key = StateKey {
                    station: next_idx,
                    line: connection.line,
                };
                if explored.contains(&key) {
                    continue;
                }

                let next = network.get(next_idx);
                let edge = match costs.edge_cost(station, next, connection.line, current.key.line)
                {
                    Ok(edge) => edge,
                    Err(reason) => {
                        trace!(%reason, "skipping edge");
                        continue;
                    }
                };

                let Some(anchor) = next
                    .anchor_for(connection.line)
                    .or_else(|| next.first_anchor())
                else {
                    trace!(station = %next.id(), "skipping station without location");
                    continue;
                };

                frontier.push(SearchNode {
                    key,
                    g: current.g + edge.total_secs(),
                    h: goal.estimate(anchor),
                    distance_km: current.distance_km + edge.distance_km,
                    changes: current.changes + u32::from(connection.line != current.key.line),
                    parent: Some(current_idx),
                });
            }
        }

        debug!(expanded = explored.len(), "frontier exhausted");
        Err(RouteError::NoPathFound {
            origin: request.origin.clone(),
            destination: request.destination.clone(),
        })
    }

    /// Search, folding every failure into a failed itinerary.
    pub fn route(&self, request: &SearchRequest) -> Itinerary {
        self.search(request)
            .unwrap_or_else(|e| Itinerary::failure(e.to_string()))
    }
}

/// Find the minimum-time route between two stations with the default
/// search configuration.
///
/// Never fails: problems are reported through `Itinerary::success` and
/// `Itinerary::message`.
pub fn search_route(
    origin: &StationId,
    destination: &StationId,
    network: &Network,
    departure: NaiveDateTime,
    max_crowd_load: u64,
    speed_kmh: f64,
) -> Itinerary {
    let config = SearchConfig::default();
    let request = SearchRequest::new(
        origin.clone(),
        destination.clone(),
        departure,
        max_crowd_load,
        speed_kmh,
    );
    Planner::new(network, &config).route(&request)
}

#[cfg(test)]
#[path = "search_tests.rs"]
mod tests;
