use std::fs;
use std::path::Path;

use murmur_core::{Service, Settings};

/// High-level configuration for the kiosk demo
#[derive(Clone, Debug)]
pub struct KioskConfig {
    pub settings: Settings,
    /// Cadence of synthetic batch deliveries, ms
    pub feed_interval_ms: u64,
    /// Records per synthetic batch
    pub batch_size: usize,
}

impl Default for KioskConfig {
    fn default() -> Self {
        let mut settings = Settings::default();

        if let Some(ms) = env_u64("KIOSK_CAROUSEL_TIME_MS") {
            settings.carousel_time = [ms, ms, ms];
        }
        if let Some(flag) = env_bool("KIOSK_MAP") {
            settings.map = flag;
        }
        if let Some(flag) = env_bool("KIOSK_MIXED") {
            settings.mixed = flag;
        }
        // Pinning a service disables the carousel entirely
        if let Some(service) = std::env::var("KIOSK_SERVICE")
            .ok()
            .and_then(|s| parse_service(&s))
        {
            settings.initial_service = service;
            settings.carousel_mode = false;
        }
        settings.clamp_carousel_times();

        Self {
            settings,
            feed_interval_ms: env_u64("KIOSK_FEED_INTERVAL_MS").unwrap_or(5_000),
            batch_size: env_u64("KIOSK_BATCH_SIZE").unwrap_or(12) as usize,
        }
    }
}

impl KioskConfig {
    /// Load configuration from a TOML file (path via KIOSK_CONFIG or ./kiosk.toml),
    /// overlaying values onto env-driven defaults.
    pub fn load() -> Self {
        let default = Self::default();
        let path = std::env::var("KIOSK_CONFIG").unwrap_or_else(|_| "kiosk.toml".into());
        let p = Path::new(&path);
        if !p.exists() {
            tracing::info!(target = "kiosk", path = %path, "No TOML config found; using defaults/env");
            return default;
        }
        match fs::read_to_string(p) {
            Ok(s) => match toml::from_str::<KioskToml>(&s) {
                Ok(t) => t.overlay(default),
                Err(e) => {
                    tracing::warn!(target = "kiosk", error = %e, "Failed to parse TOML; using defaults");
                    default
                }
            },
            Err(e) => {
                tracing::warn!(target = "kiosk", error = %e, "Failed to read TOML; using defaults");
                default
            }
        }
    }
}

fn env_u64(key: &str) -> Option<u64> {
    std::env::var(key).ok().and_then(|v| v.parse::<u64>().ok())
}

fn env_bool(key: &str) -> Option<bool> {
    std::env::var(key).ok().and_then(|v| v.parse::<bool>().ok())
}

fn parse_service(raw: &str) -> Option<Service> {
    match raw.to_ascii_lowercase().as_str() {
        "minerva" => Some(Service::Minerva),
        "keeper" => Some(Service::Keeper),
        "bloxberg" => Some(Service::Bloxberg),
        _ => None,
    }
}

// =========================
// TOML overlay definitions
// =========================

#[derive(Debug, Clone, Default, serde::Deserialize)]
struct KioskToml {
    pub feed_interval_ms: Option<u64>,
    pub batch_size: Option<usize>,
    pub settings: Option<SettingsToml>,
}

impl KioskToml {
    fn overlay(self, mut base: KioskConfig) -> KioskConfig {
        if let Some(v) = self.feed_interval_ms {
            base.feed_interval_ms = v;
        }
        if let Some(v) = self.batch_size {
            base.batch_size = v.max(1);
        }
        if let Some(s) = self.settings {
            s.apply(&mut base.settings);
        }
        base.settings.clamp_carousel_times();
        base
    }
}

#[derive(Debug, Clone, Default, serde::Deserialize)]
struct SettingsToml {
    pub carousel_time: Option<[u64; 3]>,
    pub event_delay_protection: Option<u64>,
    pub default_event_buffer_timespan: Option<u64>,
    pub circle_radius_min: Option<f64>,
    pub circle_radius_max: Option<f64>,
    pub geo_marker_radius: Option<f64>,
    pub transition_hold: Option<u64>,
    pub carousel_mode: Option<bool>,
    pub initial_service: Option<String>,
    pub map: Option<bool>,
    pub mixed: Option<bool>,
}

impl SettingsToml {
    fn apply(self, s: &mut Settings) {
        if let Some(v) = self.carousel_time {
            s.carousel_time = v;
        }
        if let Some(v) = self.event_delay_protection {
            s.event_delay_protection = v;
        }
        if let Some(v) = self.default_event_buffer_timespan {
            s.default_event_buffer_timespan = v;
        }
        if let Some(v) = self.circle_radius_min {
            s.circle_radius_min = v;
        }
        if let Some(v) = self.circle_radius_max {
            s.circle_radius_max = v.max(s.circle_radius_min);
        }
        if let Some(v) = self.geo_marker_radius {
            s.geo_marker_radius = v;
        }
        if let Some(v) = self.transition_hold {
            s.transition_hold = v;
        }
        if let Some(v) = self.carousel_mode {
            s.carousel_mode = v;
        }
        if let Some(v) = self.initial_service.as_deref().and_then(parse_service) {
            s.initial_service = v;
        }
        if let Some(v) = self.map {
            s.map = v;
        }
        if let Some(v) = self.mixed {
            s.mixed = v;
        }
    }
}
