use serde::{Deserialize, Serialize};

/// One endpoint of a trip. Constructed per request and never persisted.
/// A pre-resolved `zone_slug` makes zone detection a no-op.
#[derive(Clone, Debug, Default, Serialize, Deserialize)]
pub struct Location {
    pub latitude: Option<f64>,
    pub longitude: Option<f64>,
    pub address: Option<String>,
    pub zone_slug: Option<String>,
}

impl Location {
    pub fn from_address(address: impl Into<String>) -> Self {
        Self {
            address: Some(address.into()),
            ..Self::default()
        }
    }

    pub fn from_zone(slug: impl Into<String>) -> Self {
        Self {
            zone_slug: Some(slug.into()),
            ..Self::default()
        }
    }
}
