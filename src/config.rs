use chrono::{FixedOffset, Offset, Utc};
use serde::{Deserialize, Serialize};

/// Pricing parameters that are not part of the rule set. Injected into the
/// engine at construction so tests can supply arbitrary values.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct PricingConfig {
    pub currency: String,
    /// Base of the emergency linear fare used when no zone was detected.
    pub emergency_base: f64,
    /// Per-km component of the emergency fare, also the fallback rate for
    /// extra kilometers when the zone carries no rate of its own.
    pub emergency_price_per_km: f64,
    /// Floors included in the base fare; only floors beyond this count.
    pub floor_threshold: u32,
    /// UTC offset of the operating city, used when a request carries no
    /// timestamp. Surcharge windows are expressed in this local time.
    pub utc_offset_minutes: i32,
}

impl PricingConfig {
    pub fn local_offset(&self) -> FixedOffset {
        FixedOffset::east_opt(self.utc_offset_minutes * 60).unwrap_or_else(|| Utc.fix())
    }
}

impl Default for PricingConfig {
    fn default() -> Self {
        Self {
            currency: "COP".into(),
            emergency_base: 50000.0,
            emergency_price_per_km: 2500.0,
            floor_threshold: 3,
            // America/Bogota
            utc_offset_minutes: -5 * 60,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_offset_is_bogota_local_time() {
        let config = PricingConfig::default();
        assert_eq!(config.local_offset().local_minus_utc(), -5 * 3600);
    }

    #[test]
    fn out_of_range_offset_falls_back_to_utc() {
        let mut config = PricingConfig::default();
        config.utc_offset_minutes = 30 * 60;
        assert_eq!(config.local_offset().local_minus_utc(), 0);
    }
}
