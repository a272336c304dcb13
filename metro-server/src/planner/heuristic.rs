//! Admissible remaining-time estimate for A*.
//!
//! The estimate is the straight-line (great-circle) distance to the
//! destination travelled at the query's train speed. Every real edge costs
//! at least its track distance at that speed (crowd and transfer penalties
//! only add time), so as long as track distances are no shorter than the
//! straight line between anchors the estimate never overshoots.

use crate::domain::Coordinates;

use super::config::AnchorPolicy;

/// Convert km/h to km/s.
pub(crate) fn km_per_sec(speed_kmh: f64) -> f64 {
    speed_kmh / 3600.0
}

/// Estimated seconds from `from` to `to` at `speed_kmh`.
pub fn estimate_secs(from: Coordinates, to: Coordinates, speed_kmh: f64) -> f64 {
    from.haversine_km(&to) / km_per_sec(speed_kmh)
}

/// The destination side of the heuristic, fixed for one search.
#[derive(Debug, Clone)]
pub(crate) struct Goal {
    anchors: Vec<Coordinates>,
    speed_kmh: f64,
}

impl Goal {
    /// Build the goal from the destination's anchors.
    ///
    /// Returns `None` when the destination has no anchors.
    pub(crate) fn new(anchors: &[Coordinates], policy: AnchorPolicy, speed_kmh: f64) -> Option<Self> {
        let anchors = match policy {
            AnchorPolicy::First => vec![*anchors.first()?],
            AnchorPolicy::Nearest if anchors.is_empty() => return None,
            AnchorPolicy::Nearest => anchors.to_vec(),
        };
        Some(Self { anchors, speed_kmh })
    }

    /// Estimated seconds from `from` to the destination.
    pub(crate) fn estimate(&self, from: Coordinates) -> f64 {
        self.anchors
            .iter()
            .map(|to| estimate_secs(from, *to, self.speed_kmh))
            .fold(f64::INFINITY, f64::min)
    }
}
