//! Cost policy and search configuration for the route planner.

use std::time::Duration;

use chrono::{Datelike, NaiveDateTime, Timelike};

/// An hour range `[start_hour, end_hour)` treated as peak time.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PeakWindow {
    pub start_hour: u32,
    pub end_hour: u32,
}

impl PeakWindow {
    pub const fn new(start_hour: u32, end_hour: u32) -> Self {
        Self {
            start_hour,
            end_hour,
        }
    }

    /// Whether `hour` falls inside this window.
    pub fn contains(&self, hour: u32) -> bool {
        (self.start_hour..self.end_hour).contains(&hour)
    }
}

/// Time-of-day multipliers applied to the crowd penalty.
///
/// On weekdays the factor is `weekday_factor` times the peak or off-peak
/// multiplier; on weekends it is `weekend_factor` regardless of the hour.
#[derive(Debug, Clone, PartialEq)]
pub struct CrowdPolicy {
    pub weekday_factor: f64,
    pub weekend_factor: f64,
    pub peak_multiplier: f64,
    pub off_peak_multiplier: f64,
    pub peak_windows: Vec<PeakWindow>,
}

impl CrowdPolicy {
    /// Whether `at` is a weekday peak hour.
    pub fn is_peak(&self, at: NaiveDateTime) -> bool {
        is_weekday(at) && self.peak_windows.iter().any(|w| w.contains(at.hour()))
    }

    /// The time-of-day factor for a trip starting at `at`.
    pub fn time_of_day_factor(&self, at: NaiveDateTime) -> f64 {
        if !is_weekday(at) {
            return self.weekend_factor;
        }

        if self.is_peak(at) {
            self.weekday_factor * self.peak_multiplier
        } else {
            self.weekday_factor * self.off_peak_multiplier
        }
    }
}

impl Default for CrowdPolicy {
    fn default() -> Self {
        Self {
            weekday_factor: 1.5,
            weekend_factor: 1.0,
            peak_multiplier: 2.0,
            off_peak_multiplier: 1.0,
            peak_windows: vec![PeakWindow::new(7, 9), PeakWindow::new(18, 20)],
        }
    }
}

fn is_weekday(at: NaiveDateTime) -> bool {
    at.weekday().number_from_monday() <= 5
}

/// How the destination's anchor point is chosen for the heuristic.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum AnchorPolicy {
    /// Always the destination's first listed anchor.
    #[default]
    First,
    /// The closest of the destination's anchors to the point being estimated.
    Nearest,
}

/// Configuration parameters for route search.
#[derive(Debug, Clone, PartialEq)]
pub struct SearchConfig {
    /// Crowd penalty multipliers.
    pub crowd: CrowdPolicy,

    /// Walking speed used to cost line changes (km/h).
    pub walking_speed_kmh: f64,

    /// Train speed in ordinary conditions (km/h).
    pub normal_speed_kmh: f64,

    /// Train speed in rain (km/h).
    pub rain_speed_kmh: f64,

    /// Destination anchor selection for the heuristic.
    pub destination_anchor: AnchorPolicy,

    /// Wall-clock budget for one search. `None` means unbounded.
    pub timeout: Option<Duration>,
}

impl SearchConfig {
    /// Train speed for the given weather.
    pub fn travel_speed_kmh(&self, raining: bool) -> f64 {
        if raining {
            self.rain_speed_kmh
        } else {
            self.normal_speed_kmh
        }
    }

    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = Some(timeout);
        self
    }

    pub fn with_destination_anchor(mut self, policy: AnchorPolicy) -> Self {
        self.destination_anchor = policy;
        self
    }
}

impl Default for SearchConfig {
    fn default() -> Self {
        Self {
            crowd: CrowdPolicy::default(),
            walking_speed_kmh: 5.0,
            normal_speed_kmh: 35.0,
            rain_speed_kmh: 25.0,
            destination_anchor: AnchorPolicy::First,
            timeout: None,
        }
    }
}
