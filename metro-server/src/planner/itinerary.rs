//! Route results and path reconstruction.

use std::fmt;

use crate::domain::{Line, Station, StationId};
use crate::network::Network;

use super::search::SearchNode;

/// One ride between adjacent stations.
#[derive(Debug, Clone, PartialEq)]
pub struct Step {
    pub from: StationId,
    pub from_name: Option<String>,
    pub to: StationId,
    pub to_name: Option<String>,
    pub line: Line,
    pub distance_km: f64,
    /// Time for this step (s), including any line-change walk.
    pub cost_secs: f64,
    /// Whether this step rides a different line than the traveller was on,
    /// including the line the search started from at the origin.
    pub is_transfer: bool,
}

/// Outcome of a route search.
///
/// Failures carry only `success = false` and a message; no partial route is
/// ever returned.
#[derive(Debug, Clone, PartialEq)]
pub struct Itinerary {
    pub success: bool,
    pub message: String,
    /// Stations in travel order, origin first.
    pub stations: Vec<StationId>,
    pub steps: Vec<Step>,
    pub total_secs: f64,
    pub total_distance_km: f64,
    pub transfers: usize,
    /// Lines ridden, in order of first use.
    pub lines_used: Vec<Line>,
}

impl Itinerary {
    /// A failed search.
    pub fn failure(message: impl Into<String>) -> Self {
        Self {
            success: false,
            message: message.into(),
            stations: Vec::new(),
            steps: Vec::new(),
            total_secs: 0.0,
            total_distance_km: 0.0,
            transfers: 0,
            lines_used: Vec::new(),
        }
    }

    /// The zero-length route from a station to itself.
    pub fn trivial(station: StationId) -> Self {
        Self {
            success: true,
            message: "origin and destination are the same station".to_string(),
            stations: vec![station],
            ..Self::failure(String::new())
        }
    }

    /// Total time in minutes.
    pub fn total_minutes(&self) -> f64 {
        self.total_secs / 60.0
    }

    pub fn station_count(&self) -> usize {
        self.stations.len()
    }
}

impl fmt::Display for Itinerary {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if !self.success {
            return write!(f, "no route: {}", self.message);
        }

        let lines: Vec<&str> = self.lines_used.iter().map(Line::as_str).collect();
        writeln!(f, "Route found: {} stations", self.station_count())?;
        writeln!(
            f,
            "  Total time: {:.2} min ({:.1} s)",
            self.total_minutes(),
            self.total_secs
        )?;
        writeln!(f, "  Total distance: {:.2} km", self.total_distance_km)?;
        writeln!(f, "  Transfers: {}", self.transfers)?;
        write!(f, "  Lines: {}", lines.join(" -> "))?;

        for (i, step) in self.steps.iter().enumerate() {
            write!(
                f,
                "\n    {}. {} -> {} (line {}): {:.2} min ({:.2} km){}",
                i + 1,
                step.from,
                step.to,
                step.line,
                step.cost_secs / 60.0,
                step.distance_km,
                if step.is_transfer { " [TRANSFER]" } else { "" }
            )?;
        }

        Ok(())
    }
}

/// Walk the predecessor chain from `terminal` back to the origin and build
/// the itinerary.
pub(crate) fn reconstruct(network: &Network, arena: &[SearchNode], terminal: usize) -> Itinerary {
    let mut path = Vec::new();
    let mut cursor = Some(terminal);
    while let Some(idx) = cursor {
        path.push(&arena[idx]);
        cursor = arena[idx].parent;
    }
    path.reverse();

    let stations: Vec<StationId> = path
        .iter()
        .map(|node| network.get(node.key.station).id().clone())
        .collect();

    let mut steps: Vec<Step> = Vec::with_capacity(path.len().saturating_sub(1));
    for pair in path.windows(2) {
        let (prev, next) = (pair[0], pair[1]);
        let from = network.get(prev.key.station);
        let to = network.get(next.key.station);
        let line = next.key.line;

        let distance_km = from
            .connection_to(to.id(), line)
            .map(|c| c.distance_km)
            .unwrap_or(next.distance_km - prev.distance_km);

        let is_transfer = prev.key.line != line;

        steps.push(Step {
            from: from.id().clone(),
            from_name: display_name(from),
            to: to.id().clone(),
            to_name: display_name(to),
            line,
            distance_km,
            cost_secs: next.g - prev.g,
            is_transfer,
        });
    }

    let mut lines_used: Vec<Line> = Vec::new();
    for step in &steps {
        if !lines_used.contains(&step.line) {
            lines_used.push(step.line);
        }
    }

    Itinerary {
        success: true,
        message: "route found".to_string(),
        stations,
        total_secs: arena[terminal].g,
        total_distance_km: steps.iter().map(|s| s.distance_km).sum(),
        transfers: steps.iter().filter(|s| s.is_transfer).count(),
        lines_used,
        steps,
    }
}

fn display_name(station: &Station) -> Option<String> {
    station.display_name().map(str::to_string)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn id(s: &str) -> StationId {
        StationId::new(s).unwrap()
    }

    fn sample() -> Itinerary {
        Itinerary {
            success: true,
            message: "route found".to_string(),
            stations: vec![id("a"), id("b"), id("c")],
            steps: vec![
                Step {
                    from: id("a"),
                    from_name: None,
                    to: id("b"),
                    to_name: None,
                    line: Line::L1,
                    distance_km: 1.0,
                    cost_secs: 120.0,
                    is_transfer: false,
                },
                Step {
                    from: id("b"),
                    from_name: None,
                    to: id("c"),
                    to_name: None,
                    line: Line::L2,
                    distance_km: 1.5,
                    cost_secs: 180.0,
                    is_transfer: true,
                },
            ],
            total_secs: 300.0,
            total_distance_km: 2.5,
            transfers: 1,
            lines_used: vec![Line::L1, Line::L2],
        }
    }

    #[test]
    fn minutes_and_counts() {
        let itinerary = sample();
        assert_eq!(itinerary.total_minutes(), 5.0);
        assert_eq!(itinerary.station_count(), 3);
    }

    #[test]
    fn trivial_route() {
        let itinerary = Itinerary::trivial(id("a"));
        assert!(itinerary.success);
        assert_eq!(itinerary.stations, vec![id("a")]);
        assert!(itinerary.steps.is_empty());
        assert_eq!(itinerary.total_secs, 0.0);
        assert_eq!(itinerary.total_distance_km, 0.0);
        assert_eq!(itinerary.transfers, 0);
        assert!(itinerary.lines_used.is_empty());
    }

    #[test]
    fn display_success() {
        let text = sample().to_string();
        assert!(text.starts_with("Route found: 3 stations"));
        assert!(text.contains("Total time: 5.00 min (300.0 s)"));
        assert!(text.contains("Lines: 01 -> 02"));
        assert!(text.contains("1. a -> b (line 01): 2.00 min (1.00 km)\n"));
        assert!(text.ends_with("2. b -> c (line 02): 3.00 min (1.50 km) [TRANSFER]"));
    }

    #[test]
    fn display_failure() {
        let itinerary = Itinerary::failure("station not found");
        assert_eq!(itinerary.to_string(), "no route: station not found");
    }
}
