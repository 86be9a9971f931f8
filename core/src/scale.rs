// Magnitude scaling: linear range remapping plus the per-category
// log-scaling bands that turn raw byte sizes and fees into circle radii.

/// Linearly rescale `value` from `[old_min, old_max]` into `[new_min, new_max]`.
///
/// No clamping is applied; callers pre-clamp `value` when a bounded result is
/// wanted. Precondition: `old_min != old_max`.
pub fn map_range(value: f64, old_min: f64, old_max: f64, new_min: f64, new_max: f64) -> f64 {
    (value - old_min) * (new_max - new_min) / (old_max - old_min) + new_min
}

/// Empirically tuned log-scaling band for one event category.
///
/// The coefficient is chosen as `min / ln(min)` so that a typical raw value
/// lands near the low end of `[min, max]` after `ln(raw) * log_coefficient`.
#[derive(Debug, Clone, Copy)]
pub struct ScaleBand {
    pub min: f64,
    pub max: f64,
    pub log_coefficient: f64,
}

impl ScaleBand {
    /// Log-scale `raw`, clamp into the band, then remap into
    /// `[radius_min, radius_max]`.
    ///
    /// Non-positive raw values clamp to the band minimum instead of
    /// propagating NaN from `ln`.
    pub fn radius(&self, raw: f64, radius_min: f64, radius_max: f64) -> f64 {
        let scaled = if raw <= 0.0 {
            self.min
        } else {
            (raw.ln() * self.log_coefficient).clamp(self.min, self.max)
        };
        map_range(scaled, self.min, self.max, radius_min, radius_max)
    }
}

/// 1st/3rd quartile of file create sizes, June 2023 sample. 2098 = 20869/ln(20869).
pub const KEEPER_FILE_CREATE: ScaleBand = ScaleBand {
    min: 20869.0,
    max: 281820.0,
    log_coefficient: 2098.0,
};

/// 1st/3rd quartile of file edit sizes, June 2023 sample. 378 = 3032/ln(3032).
pub const KEEPER_FILE_EDIT: ScaleBand = ScaleBand {
    min: 3032.0,
    max: 679936.0,
    log_coefficient: 378.0,
};

/// Block byte sizes over the full QA dataset ranged 567..=130196 with an
/// average of 819; the max is pulled toward the average. 89 = 567/ln(567).
pub const BLOXBERG_BLOCK: ScaleBand = ScaleBand {
    min: 567.0,
    max: 1200.0,
    log_coefficient: 89.0,
};

/// Transaction input bytes over the full QA dataset ranged 0..=128804 with an
/// average of 257; the max is pulled toward the average. 4 = 10/ln(10).
pub const BLOXBERG_TRANSACTION: ScaleBand = ScaleBand {
    min: 10.0,
    max: 700.0,
    log_coefficient: 4.0,
};

/// Transaction fees arrive as fractional units and are scaled up before
/// log-scaling.
pub const TRANSACTION_FEE_FACTOR: f64 = 1_000_000_000.0;

/// Block circles are doubled after mapping; decision based on user feedback.
pub const BLOCK_RADIUS_BOOST: f64 = 2.0;
