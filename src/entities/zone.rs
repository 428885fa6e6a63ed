use serde::{Deserialize, Serialize};

use crate::entities::Location;

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Classification {
    Metropolitan,
    OutsideCity,
}

/// A named pricing region. Administrators own these records; the engine
/// only reads them. The keyword list drives address classification, so
/// operators can extend detection without a rebuild.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct Zone {
    pub slug: String,
    pub name: String,
    pub classification: Classification,
    /// Fallback flat fare for trips priced outside the rate table.
    pub base_fare: Option<f64>,
    /// Fallback per-km rate, also used to price extra kilometers.
    pub price_per_km: Option<f64>,
    #[serde(default)]
    pub keywords: Vec<String>,
}

/// Read-only view over the zone records, in their fixed record order.
/// Detection is a text heuristic, not a geospatial lookup: display names
/// are tried first across all zones, then the per-zone keyword lists.
pub struct ZoneIndex {
    zones: Vec<Zone>,
}

impl ZoneIndex {
    pub fn new(zones: Vec<Zone>) -> Self {
        Self { zones }
    }

    pub fn get(&self, slug: &str) -> Option<&Zone> {
        self.zones.iter().find(|z| z.slug == slug)
    }

    pub fn all(&self) -> &[Zone] {
        &self.zones
    }

    /// Never fails: an address that matches nothing yields `None`, which
    /// callers handle explicitly (emergency fare path).
    pub fn detect(&self, location: &Location) -> Option<String> {
        if let Some(slug) = &location.zone_slug {
            return Some(slug.clone());
        }

        let address = location.address.as_deref()?;
        let needle = normalize(address);

        if needle.is_empty() {
            return None;
        }

        for zone in &self.zones {
            if needle.contains(&normalize(&zone.name)) {
                return Some(zone.slug.clone());
            }
        }

        for zone in &self.zones {
            for keyword in &zone.keywords {
                if needle.contains(&normalize(keyword)) {
                    return Some(zone.slug.clone());
                }
            }
        }

        None
    }
}

/// Lowercases and folds the Spanish diacritics that show up in addresses.
fn normalize(input: &str) -> String {
    input
        .trim()
        .chars()
        .flat_map(char::to_lowercase)
        .map(|c| match c {
            'á' | 'à' | 'ä' => 'a',
            'é' | 'è' | 'ë' => 'e',
            'í' | 'ì' | 'ï' => 'i',
            'ó' | 'ò' | 'ö' => 'o',
            'ú' | 'ù' | 'ü' => 'u',
            'ñ' => 'n',
            _ => c,
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn index() -> ZoneIndex {
        ZoneIndex::new(vec![
            Zone {
                slug: "medellin".into(),
                name: "Medellín".into(),
                classification: Classification::Metropolitan,
                base_fare: None,
                price_per_km: None,
                keywords: vec!["el poblado".into(), "laureles".into(), "belén".into()],
            },
            Zone {
                slug: "oriente".into(),
                name: "Oriente antioqueño".into(),
                classification: Classification::OutsideCity,
                base_fare: Some(100000.0),
                price_per_km: Some(3500.0),
                keywords: vec!["rionegro".into(), "la ceja".into(), "aeropuerto".into()],
            },
        ])
    }

    #[test]
    fn pre_resolved_slug_short_circuits() {
        let location = Location::from_zone("oriente");
        assert_eq!(index().detect(&location), Some("oriente".into()));
    }

    #[test]
    fn unknown_slug_is_returned_unchanged() {
        let location = Location::from_zone("no-such-zone");
        assert_eq!(index().detect(&location), Some("no-such-zone".into()));
    }

    #[test]
    fn matches_zone_display_name_ignoring_diacritics() {
        let location = Location::from_address("Calle 10 #43-12, MEDELLIN");
        assert_eq!(index().detect(&location), Some("medellin".into()));
    }

    #[test]
    fn matches_keyword() {
        let location = Location::from_address("Vereda Llanogrande, Rionegro");
        assert_eq!(index().detect(&location), Some("oriente".into()));
    }

    #[test]
    fn display_names_win_over_keywords() {
        // "aeropuerto" is an oriente keyword, but the display name match on
        // the first pass takes precedence.
        let location = Location::from_address("Medellín, cerca al aeropuerto Olaya");
        assert_eq!(index().detect(&location), Some("medellin".into()));
    }

    #[test]
    fn no_match_is_none_not_an_error() {
        let location = Location::from_address("Carrera 7, Bogotá");
        assert_eq!(index().detect(&location), None);
    }

    #[test]
    fn empty_location_is_none() {
        assert_eq!(index().detect(&Location::default()), None);
    }
}
