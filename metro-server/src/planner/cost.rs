//! Real, directional cost of traversing one connection.
//!
//! The cost of moving from one station to the next along a line is the
//! base travel time, stretched by the crowd factor of the origin station's
//! line, plus a walking penalty when the traveller changes line.

use chrono::NaiveDateTime;
use tracing::warn;

use crate::domain::{Line, Station, StationId};

use super::config::SearchConfig;
use super::heuristic::km_per_sec;

/// Why a connection cannot be taken.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum UnreachableEdge {
    /// The station on the far side is closed
    #[error("station {0} is closed")]
    StationClosed(StationId),

    /// No connection record links the stations on this line
    #[error("no connection from {from} to {to} on line {line}")]
    NoConnection {
        from: StationId,
        to: StationId,
        line: Line,
    },
}

/// Cost breakdown of one traversal.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct EdgeCost {
    /// Track distance of the connection (km).
    pub distance_km: f64,
    /// Travel time including the crowd penalty (s).
    pub travel_secs: f64,
    /// Walking time for a line change (s); zero when staying on the line.
    pub transfer_secs: f64,
}

impl EdgeCost {
    /// Total cost in seconds.
    pub fn total_secs(&self) -> f64 {
        self.travel_secs + self.transfer_secs
    }
}

/// Edge cost function for one query.
///
/// Fixes the query-wide inputs (speed, crowd normalization, trip time) so
/// the time-of-day factor is computed once rather than per edge.
#[derive(Debug, Clone)]
pub struct CostModel {
    speed_kmh: f64,
    walking_speed_kmh: f64,
    max_crowd_load: u64,
    time_of_day_factor: f64,
}

impl CostModel {
    pub fn new(
        config: &SearchConfig,
        speed_kmh: f64,
        max_crowd_load: u64,
        departure: NaiveDateTime,
    ) -> Self {
        Self {
            speed_kmh,
            walking_speed_kmh: config.walking_speed_kmh,
            max_crowd_load,
            time_of_day_factor: config.crowd.time_of_day_factor(departure),
        }
    }

    pub fn time_of_day_factor(&self) -> f64 {
        self.time_of_day_factor
    }

    /// `1 + (load / max_load) * time_of_day_factor`.
    ///
    /// A zero `max_crowd_load` means no station reports any load, so there is
    /// no penalty to normalize.
    pub fn crowd_factor(&self, load: u64) -> f64 {
        if self.max_crowd_load == 0 {
            return 1.0;
        }
        1.0 + (load as f64 / self.max_crowd_load as f64) * self.time_of_day_factor
    }

    /// Cost of riding `line` from `from` to `to`, having arrived at `from`
    /// on `previous_line`.
    pub fn edge_cost(
        &self,
        from: &Station,
        to: &Station,
        line: Line,
        previous_line: Line,
    ) -> Result<EdgeCost, UnreachableEdge> {
        if !to.is_open() {
            return Err(UnreachableEdge::StationClosed(to.id().clone()));
        }

        let connection =
            from.connection_to(to.id(), line)
                .ok_or_else(|| UnreachableEdge::NoConnection {
                    from: from.id().clone(),
                    to: to.id().clone(),
                    line,
                })?;

        let base_secs = connection.distance_km / km_per_sec(self.speed_kmh);

        let load = from.load_on(line).unwrap_or_else(|| {
            warn!(station = %from.id(), %line, "no crowd figure for line; assuming no load");
            0
        });
        let travel_secs = base_secs * self.crowd_factor(load);

        let transfer_secs = if line == previous_line {
            0.0
        } else {
            // Unregistered line pairs change for free.
            let walk_km = from.transfer_distance(previous_line, line).unwrap_or(0.0);
            walk_km / km_per_sec(self.walking_speed_kmh)
        };

        Ok(EdgeCost {
            distance_km: connection.distance_km,
            travel_secs,
            transfer_secs,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::Coordinates;
    use chrono::NaiveDate;

    fn id(s: &str) -> StationId {
        StationId::new(s).unwrap()
    }

    fn friday(hour: u32) -> NaiveDateTime {
        NaiveDate::from_ymd_opt(2024, 3, 15)
            .unwrap()
            .and_hms_opt(hour, 0, 0)
            .unwrap()
    }

    fn saturday(hour: u32) -> NaiveDateTime {
        NaiveDate::from_ymd_opt(2024, 3, 16)
            .unwrap()
            .and_hms_opt(hour, 0, 0)
            .unwrap()
    }

    fn point() -> Coordinates {
        Coordinates::new(19.4, -99.1).unwrap()
    }

    /// Interchange on lines 1 and 2 with a 250 m walk between them.
    fn origin(load_l1: Option<u64>) -> Station {
        let mut builder = Station::builder(id("origin"))
            .line(Line::L1)
            .line(Line::L2)
            .anchor(Line::L1, point())
            .connection(id("next"), Line::L1, 2.0)
            .connection(id("next"), Line::L2, 3.0)
            .connection(id("other"), Line::L3, 1.0)
            .transfer(vec![Line::L1, Line::L2], 0.25);
        if let Some(load) = load_l1 {
            builder = builder.load(Line::L1, load);
        }
        builder.build().unwrap()
    }

    fn next(open: bool) -> Station {
        Station::builder(id("next"))
            .line(Line::L1)
            .anchor(Line::L1, point())
            .open(open)
            .build()
            .unwrap()
    }

    fn other() -> Station {
        Station::builder(id("other")).line(Line::L3).build().unwrap()
    }

    fn model(max_load: u64, at: NaiveDateTime) -> CostModel {
        CostModel::new(&SearchConfig::default(), 36.0, max_load, at)
    }

    #[test]
    fn base_travel_time_without_crowd() {
        // 36 km/h is 100 s per km.
        let cost = model(100, friday(10))
            .edge_cost(&origin(Some(0)), &next(true), Line::L1, Line::L1)
            .unwrap();
        assert!((cost.travel_secs - 200.0).abs() < 1e-9);
        assert_eq!(cost.transfer_secs, 0.0);
        assert_eq!(cost.distance_km, 2.0);
    }

    #[test]
    fn crowd_factor_off_peak_weekday() {
        // load / max = 0.5, factor 1.5 -> 1.75
        let cost = model(100, friday(10))
            .edge_cost(&origin(Some(50)), &next(true), Line::L1, Line::L1)
            .unwrap();
        assert!((cost.total_secs() - 350.0).abs() < 1e-9);
    }

    #[test]
    fn crowd_factor_peak_weekday() {
        // load / max = 0.5, factor 3.0 -> 2.5
        let cost = model(100, friday(8))
            .edge_cost(&origin(Some(50)), &next(true), Line::L1, Line::L1)
            .unwrap();
        assert!((cost.total_secs() - 500.0).abs() < 1e-9);
    }

    #[test]
    fn crowd_factor_weekend() {
        // load / max = 0.5, factor 1.0 -> 1.5
        let cost = model(100, saturday(8))
            .edge_cost(&origin(Some(50)), &next(true), Line::L1, Line::L1)
            .unwrap();
        assert!((cost.total_secs() - 300.0).abs() < 1e-9);
    }

    #[test]
    fn missing_load_means_no_penalty() {
        let cost = model(100, friday(8))
            .edge_cost(&origin(None), &next(true), Line::L1, Line::L1)
            .unwrap();
        assert!((cost.total_secs() - 200.0).abs() < 1e-9);
    }

    #[test]
    fn zero_max_load_means_no_penalty() {
        let m = model(0, friday(8));
        assert_eq!(m.crowd_factor(0), 1.0);
        assert_eq!(m.crowd_factor(1_000), 1.0);
    }

    #[test]
    fn line_change_adds_registered_walk() {
        // Riding line 2 (3 km, no load figure) after arriving on line 1:
        // 300 s travel plus 0.25 km at 5 km/h = 180 s.
        let cost = model(100, friday(10))
            .edge_cost(&origin(Some(0)), &next(true), Line::L2, Line::L1)
            .unwrap();
        assert!((cost.travel_secs - 300.0).abs() < 1e-9);
        assert!((cost.transfer_secs - 180.0).abs() < 1e-9);
        assert_eq!(cost.distance_km, 3.0);
    }

    #[test]
    fn unregistered_line_pair_changes_for_free() {
        let cost = model(100, friday(10))
            .edge_cost(&origin(Some(0)), &other(), Line::L3, Line::L1)
            .unwrap();
        assert_eq!(cost.transfer_secs, 0.0);
        assert!((cost.travel_secs - 100.0).abs() < 1e-9);
    }

    #[test]
    fn closed_destination_is_unreachable() {
        let err = model(100, friday(10))
            .edge_cost(&origin(Some(0)), &next(false), Line::L1, Line::L1)
            .unwrap_err();
        assert_eq!(err, UnreachableEdge::StationClosed(id("next")));
    }

    #[test]
    fn missing_connection_on_line_is_unreachable() {
        let err = model(100, friday(10))
            .edge_cost(&origin(Some(0)), &next(true), Line::L5, Line::L1)
            .unwrap_err();
        assert!(matches!(err, UnreachableEdge::NoConnection { line: Line::L5, .. }));
        assert_eq!(
            err.to_string(),
            "no connection from origin to next on line 05"
        );
    }
}
