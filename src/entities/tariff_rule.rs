use serde::{Deserialize, Serialize};

use crate::entities::{EquipmentType, TripType};
use crate::error::{no_distance_tier_error, Error};

/// A `[min_km, max_km)` price bracket. `max_km == None` means unbounded.
/// Tiers are stored non-overlapping and sorted ascending by `min_km`.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct DistanceTier {
    pub min_km: f64,
    pub max_km: Option<f64>,
    pub price: f64,
}

impl DistanceTier {
    pub fn covers(&self, distance_km: f64) -> bool {
        distance_km >= self.min_km
            && match self.max_km {
                Some(max) => distance_km < max,
                None => true,
            }
    }
}

#[derive(Clone, Debug, Serialize, Deserialize)]
#[serde(tag = "mode", rename_all = "snake_case")]
pub enum PricingMode {
    Fixed {
        fixed_price: f64,
    },
    PerKm {
        price_per_km: f64,
        min_price: Option<f64>,
    },
    ByDistanceTier {
        tiers: Vec<DistanceTier>,
    },
}

/// The priced half of a corridor: bound to one route rule and one
/// equipment/trip combination. At most one active tariff may exist per
/// (route rule, service) pair; the resolver rejects duplicates.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct TariffRule {
    pub id: String,
    pub route_rule_id: String,
    pub equipment: EquipmentType,
    pub trip_type: TripType,
    #[serde(flatten)]
    pub mode: PricingMode,
    pub active: bool,
}

impl TariffRule {
    /// Pure function of the rule and the distance, so the same request
    /// always reproduces the same quote.
    pub fn price(&self, distance_km: f64) -> Result<f64, Error> {
        match &self.mode {
            PricingMode::Fixed { fixed_price } => Ok(*fixed_price),
            PricingMode::PerKm {
                price_per_km,
                min_price,
            } => Ok((price_per_km * distance_km).max(min_price.unwrap_or(0.0))),
            PricingMode::ByDistanceTier { tiers } => tiers
                .iter()
                .find(|tier| tier.covers(distance_km))
                .map(|tier| tier.price)
                .ok_or_else(|| no_distance_tier_error(&self.id, distance_km)),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn tariff(mode: PricingMode) -> TariffRule {
        TariffRule {
            id: "t-1".into(),
            route_rule_id: "r-1".into(),
            equipment: EquipmentType::Rampa,
            trip_type: TripType::Sencillo,
            mode,
            active: true,
        }
    }

    fn tiered() -> TariffRule {
        tariff(PricingMode::ByDistanceTier {
            tiers: vec![
                DistanceTier {
                    min_km: 0.0,
                    max_km: Some(5.0),
                    price: 60000.0,
                },
                DistanceTier {
                    min_km: 5.0,
                    max_km: Some(15.0),
                    price: 80000.0,
                },
                DistanceTier {
                    min_km: 15.0,
                    max_km: None,
                    price: 110000.0,
                },
            ],
        })
    }

    #[test]
    fn fixed_returns_price_verbatim() {
        let rule = tariff(PricingMode::Fixed {
            fixed_price: 70000.0,
        });
        assert_eq!(rule.price(2.0).unwrap(), 70000.0);
        assert_eq!(rule.price(50.0).unwrap(), 70000.0);
    }

    #[test]
    fn per_km_applies_floor_on_short_trips() {
        let rule = tariff(PricingMode::PerKm {
            price_per_km: 3000.0,
            min_price: Some(45000.0),
        });
        assert_eq!(rule.price(2.0).unwrap(), 45000.0);
        assert_eq!(rule.price(0.0).unwrap(), 45000.0);
        assert_eq!(rule.price(20.0).unwrap(), 60000.0);
    }

    #[test]
    fn per_km_without_floor_defaults_to_zero() {
        let rule = tariff(PricingMode::PerKm {
            price_per_km: 3000.0,
            min_price: None,
        });
        assert_eq!(rule.price(0.0).unwrap(), 0.0);
    }

    #[test]
    fn tier_lower_bound_is_inclusive_upper_is_exclusive() {
        let rule = tiered();
        assert_eq!(rule.price(0.0).unwrap(), 60000.0);
        assert_eq!(rule.price(4.99).unwrap(), 60000.0);
        // at max_km the next tier applies
        assert_eq!(rule.price(5.0).unwrap(), 80000.0);
        assert_eq!(rule.price(15.0).unwrap(), 110000.0);
    }

    #[test]
    fn unbounded_tier_covers_any_distance() {
        assert_eq!(tiered().price(800.0).unwrap(), 110000.0);
    }

    #[test]
    fn gap_in_tiers_is_an_error_not_zero() {
        let rule = tariff(PricingMode::ByDistanceTier {
            tiers: vec![DistanceTier {
                min_km: 5.0,
                max_km: Some(10.0),
                price: 50000.0,
            }],
        });
        let err = rule.price(2.0).unwrap_err();
        assert_eq!(err.code, 203);
    }

    #[test]
    fn negative_distance_never_resolves_a_tier() {
        assert!(tiered().price(-1.0).is_err());
    }
}
