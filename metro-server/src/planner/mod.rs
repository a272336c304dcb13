//! Minimum-time route planner using A* search.
//!
//! This module answers: "I am at this station at this time - what is the
//! fastest way to reach my destination?"
//!
//! The search explores (station, line) states. Edge costs combine track
//! distance, the crowd level of the line for the trip's day and hour, and
//! the walk between platforms when changing line. The heuristic is the
//! straight-line distance to the destination at train speed.

mod config;
mod cost;
mod heuristic;
mod itinerary;
mod search;

pub use config::{AnchorPolicy, CrowdPolicy, PeakWindow, SearchConfig};
pub use cost::{CostModel, EdgeCost, UnreachableEdge};
pub use heuristic::estimate_secs;
pub use itinerary::{Itinerary, Step};
pub use search::{Endpoint, Planner, RouteError, SearchRequest, search_route};
