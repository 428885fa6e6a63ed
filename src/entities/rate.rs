use std::collections::HashMap;

use serde::{Deserialize, Serialize};

use crate::entities::{EquipmentType, OriginType, TripType};

/// Fixed distance buckets used by the denormalized rate table. Boundaries
/// are upper-inclusive: exactly 3 km is still HASTA_3KM.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum DistanceRange {
    #[serde(rename = "HASTA_3KM")]
    Hasta3Km,
    #[serde(rename = "DE_3_A_10KM")]
    De3A10Km,
    #[serde(rename = "MAS_10KM")]
    Mas10Km,
}

impl DistanceRange {
    pub fn from_km(distance_km: f64) -> Self {
        if distance_km <= 3.0 {
            Self::Hasta3Km
        } else if distance_km <= 10.0 {
            Self::De3A10Km
        } else {
            Self::Mas10Km
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            Self::Hasta3Km => "HASTA_3KM",
            Self::De3A10Km => "DE_3_A_10KM",
            Self::Mas10Km => "MAS_10KM",
        }
    }
}

/// Rate rows are keyed by a distance bucket, by the trip direction for
/// hub-to-municipality corridors, or by the flat out-of-city price when the
/// request names a destination beyond the metro perimeter.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RateBracket {
    Distance(DistanceRange),
    Origin(OriginType),
    OutOfCity,
}

impl RateBracket {
    pub fn label(&self) -> &'static str {
        match self {
            Self::Distance(range) => range.label(),
            Self::Origin(origin) => origin.label(),
            Self::OutOfCity => "FUERA_DE_CIUDAD",
        }
    }
}

#[derive(Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct RateKey {
    pub zone_slug: String,
    pub trip_type: TripType,
    pub equipment: EquipmentType,
    pub bracket: RateBracket,
}

impl RateKey {
    /// The operator-facing identification of a missing rate row.
    pub fn describe(&self) -> String {
        format!(
            "zone '{}', trip type {}, equipment {}, {}",
            self.zone_slug,
            self.trip_type.label(),
            self.equipment.label(),
            self.bracket.label(),
        )
    }
}

/// One row of the denormalized pricing table used by the metro-zone UI.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct Rate {
    pub zone_slug: String,
    pub trip_type: TripType,
    pub equipment: EquipmentType,
    pub bracket: RateBracket,
    pub price: f64,
}

/// The rate table, pre-indexed by key. Behind the resolver a hit behaves
/// like a fixed-price tariff rule, so there is a single pricing path.
pub struct RateBook {
    index: HashMap<RateKey, f64>,
}

impl RateBook {
    pub fn new(rates: Vec<Rate>) -> Self {
        let index = rates
            .into_iter()
            .map(|rate| {
                (
                    RateKey {
                        zone_slug: rate.zone_slug,
                        trip_type: rate.trip_type,
                        equipment: rate.equipment,
                        bracket: rate.bracket,
                    },
                    rate.price,
                )
            })
            .collect();

        Self { index }
    }

    pub fn find(&self, key: &RateKey) -> Option<f64> {
        self.index.get(key).copied()
    }

    /// Whether the table has any row for the zone, regardless of bracket.
    pub fn has_zone(&self, slug: &str) -> bool {
        self.index.keys().any(|key| key.zone_slug == slug)
    }
}
