// Configuration surface consumed by the pipeline.
use serde::{Deserialize, Serialize};

use crate::model::{Service, Visualisation};

/// Bounds applied to per-service carousel durations (ms).
pub const CAROUSEL_TIME_MIN_MS: u64 = 10_000;
pub const CAROUSEL_TIME_MAX_MS: u64 = 720_000;

/// Plain configuration values; loading/overlaying happens in the embedding
/// application.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Settings {
    /// Display time per service in carousel order (Minerva, Keeper, Bloxberg), ms.
    pub carousel_time: [u64; 3],
    /// Cap on any single pacing wait and on accumulated skipped delay, ms.
    pub event_delay_protection: u64,
    /// Default catch window for aggregation buckets, ms.
    pub default_event_buffer_timespan: u64,
    /// Smallest circle radius produced by magnitude scaling.
    pub circle_radius_min: f64,
    /// Largest circle radius produced by magnitude scaling.
    pub circle_radius_max: f64,
    /// Fixed radius for map markers; the map uses uniform indicators.
    pub geo_marker_radius: f64,
    /// Gap between a transition-start signal and the theme actually changing, ms.
    pub transition_hold: u64,
    /// Rotate through services on a timer; false pins `initial_service`.
    pub carousel_mode: bool,
    /// Service shown first (and permanently when `carousel_mode` is false).
    pub initial_service: Service,
    /// Start on the map visualisation instead of the listening one.
    pub map: bool,
    /// Alternate between the two visualisations on every carousel transition.
    pub mixed: bool,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            carousel_time: [180_000, 180_000, 180_000],
            event_delay_protection: 142,
            default_event_buffer_timespan: 142,
            circle_radius_min: 3.0,
            circle_radius_max: 300.0,
            geo_marker_radius: 10.0,
            transition_hold: 1_000,
            carousel_mode: true,
            initial_service: Service::Minerva,
            map: false,
            mixed: false,
        }
    }
}

impl Settings {
    /// Visualisation implied by the map flag.
    pub fn initial_visualisation(&self) -> Visualisation {
        if self.map {
            Visualisation::Geo
        } else {
            Visualisation::ListenTo
        }
    }

    /// Clamp every carousel duration into the accepted range.
    pub fn clamp_carousel_times(&mut self) {
        for t in &mut self.carousel_time {
            *t = (*t).clamp(CAROUSEL_TIME_MIN_MS, CAROUSEL_TIME_MAX_MS);
        }
    }

    /// Display duration for one service.
    pub fn carousel_time_for(&self, service: Service) -> u64 {
        match service {
            Service::Minerva => self.carousel_time[0],
            Service::Keeper => self.carousel_time[1],
            Service::Bloxberg => self.carousel_time[2],
        }
    }
}
