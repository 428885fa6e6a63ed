use chrono::{DateTime, FixedOffset};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::config::PricingConfig;
use crate::entities::{
    calculate_surcharges, select_route_rule, AppliedSurcharge, Classification, DistanceRange,
    EquipmentType, HolidayCalendar, Location, OriginType, RateBook, RateBracket, RateKey,
    RouteRule, RouteType, SurchargeContext, SurchargeOverrides, SurchargeRule, TariffRule,
    TripType, ZoneIndex, CODE_EXTRA_FLOORS, CODE_ROBOTIC_CHAIR, CODE_WAITING_HOUR,
};
use crate::error::{
    ambiguous_tariff_error, no_route_rule_error, no_tariff_rule_error, rate_not_found_error,
    validation_error, Error,
};

/// Add-on services declared with the request. Well-known codes also have
/// dedicated fields; `quantity_for` merges both forms.
#[derive(Clone, Debug, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Extras {
    #[serde(default)]
    pub robotic_chair: bool,
    pub floors: Option<u32>,
    pub waiting_hours: Option<f64>,
    #[serde(default)]
    pub services: Vec<ServiceSelection>,
}

#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct ServiceSelection {
    pub code: String,
    pub quantity: Option<f64>,
}

impl Extras {
    fn declared_quantity(&self, code: &str) -> Option<f64> {
        self.services
            .iter()
            .find(|s| s.code == code)
            .map(|s| s.quantity.unwrap_or(1.0))
    }

    /// Chargeable quantity for a service code, or `None` when the extra was
    /// not requested. Floors only count beyond the included threshold.
    pub fn quantity_for(&self, code: &str, floor_threshold: u32) -> Option<f64> {
        let declared = self.declared_quantity(code);

        match code {
            CODE_ROBOTIC_CHAIR => {
                (self.robotic_chair || declared.is_some()).then(|| 1.0)
            }
            CODE_EXTRA_FLOORS => {
                let floors = self.floors.or(declared.map(|q| q as u32))?;
                (floors > floor_threshold).then(|| (floors - floor_threshold) as f64)
            }
            CODE_WAITING_HOUR => {
                let hours = self.waiting_hours.or(declared)?;
                (hours > 0.0).then(|| hours)
            }
            _ => declared.filter(|quantity| *quantity > 0.0),
        }
    }
}

/// The engine's single input. Both HTTP request shapes are mapped onto this
/// before any lookup happens.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct QuoteRequest {
    pub equipment: EquipmentType,
    pub trip_type: TripType,
    pub origin: Location,
    pub destination: Location,
    pub scheduled_at: DateTime<FixedOffset>,
    pub distance_km: Option<f64>,
    pub origin_type: Option<OriginType>,
    pub out_of_city_destination: Option<String>,
    pub extra_km: Option<f64>,
    #[serde(default)]
    pub extras: Extras,
    #[serde(default)]
    pub overrides: SurchargeOverrides,
}

impl QuoteRequest {
    pub fn validate(&self) -> Result<(), Error> {
        if self.origin.zone_slug.is_none() && self.origin.address.is_none() {
            return Err(validation_error("origin requires a zone or an address"));
        }
        if self.distance_km.map_or(false, |d| d < 0.0) {
            return Err(validation_error("distanceKm must be non-negative"));
        }
        if self.extra_km.map_or(false, |d| d < 0.0) {
            return Err(validation_error("extraKm must be non-negative"));
        }
        if self.extras.waiting_hours.map_or(false, |h| h < 0.0) {
            return Err(validation_error("waitingHours must be non-negative"));
        }
        if self
            .extras
            .services
            .iter()
            .any(|s| s.quantity.map_or(false, |q| q < 0.0))
        {
            return Err(validation_error("service quantity must be non-negative"));
        }

        Ok(())
    }
}

#[derive(Clone, Debug, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BreakdownItem {
    pub item: String,
    pub quantity: Option<f64>,
    pub unit_price: f64,
    pub subtotal: f64,
}

/// Which rule produced the base fare, kept on the quote for audit. The
/// emergency variant marks an estimate produced without any configured rate,
/// so operators can tell it apart from a real tariff.
#[derive(Clone, Debug, Serialize, Deserialize)]
#[serde(tag = "source", rename_all = "snake_case")]
pub enum ResolvedVia {
    Rate {
        zone_slug: String,
        bracket: String,
    },
    Corridor {
        route_rule_id: String,
        tariff_rule_id: String,
        route_type: RouteType,
    },
    Emergency {
        price_per_km: f64,
    },
}

#[derive(Clone, Debug, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Quote {
    /// Reference for the caller's pricing snapshot; not persisted here.
    pub token: Uuid,
    pub currency: String,
    pub zone: Option<String>,
    pub zone_slug: Option<String>,
    pub is_out_of_city: bool,
    pub distance_km: f64,
    pub resolved_via: ResolvedVia,
    pub breakdown: Vec<BreakdownItem>,
    pub surcharges: Vec<AppliedSurcharge>,
    pub base_price: f64,
    pub surcharge_total: f64,
    pub total: f64,
}

/// Read-only snapshot of every record family a quote needs. Loaded once per
/// request; nothing in here is mutated.
pub struct PricingData {
    pub zones: ZoneIndex,
    pub rates: RateBook,
    pub route_rules: Vec<RouteRule>,
    pub tariff_rules: Vec<TariffRule>,
    pub surcharge_rules: Vec<SurchargeRule>,
    pub holidays: HolidayCalendar,
}

/// The full pricing pipeline as a pure function: detect zones, resolve the
/// rate or tariff, price, evaluate surcharges, compose the breakdown. Same
/// inputs, same quote.
pub fn compose_quote(
    request: &QuoteRequest,
    data: &PricingData,
    config: &PricingConfig,
) -> Result<Quote, Error> {
    request.validate()?;

    let origin_slug = data.zones.detect(&request.origin);
    let destination_slug = data.zones.detect(&request.destination);
    let distance_km = request.distance_km.unwrap_or(0.0);

    let primary_slug = origin_slug.clone().or_else(|| destination_slug.clone());

    let (base_price, resolved_via) = match &primary_slug {
        Some(slug) => resolve_base_price(
            request,
            data,
            slug,
            origin_slug.as_deref(),
            destination_slug.as_deref(),
            distance_km,
        )?,
        None => (
            config.emergency_base + config.emergency_price_per_km * distance_km,
            ResolvedVia::Emergency {
                price_per_km: config.emergency_price_per_km,
            },
        ),
    };

    let zone = primary_slug.as_deref().and_then(|slug| data.zones.get(slug));
    let is_out_of_city = request.out_of_city_destination.is_some()
        || zone.map_or(false, |z| z.classification == Classification::OutsideCity)
        || destination_slug
            .as_deref()
            .and_then(|slug| data.zones.get(slug))
            .map_or(false, |z| z.classification == Classification::OutsideCity);

    let mut breakdown = vec![BreakdownItem {
        item: base_item_label(&resolved_via),
        quantity: None,
        unit_price: base_price,
        subtotal: base_price,
    }];

    let mut addons_total = 0.0;
    if let Some(extra_km) = request.extra_km.filter(|km| *km > 0.0) {
        let per_km = zone
            .and_then(|z| z.price_per_km)
            .unwrap_or(config.emergency_price_per_km);
        let subtotal = per_km * extra_km;
        addons_total += subtotal;
        breakdown.push(BreakdownItem {
            item: "Kilómetros adicionales".into(),
            quantity: Some(extra_km),
            unit_price: per_km,
            subtotal,
        });
    }

    let surcharges = calculate_surcharges(
        &data.surcharge_rules,
        &SurchargeContext {
            scheduled_at: request.scheduled_at,
            extras: &request.extras,
            holidays: &data.holidays,
            overrides: request.overrides,
            base_fare: base_price,
            distance_km,
            floor_threshold: config.floor_threshold,
        },
    );

    let surcharge_total: f64 = surcharges.iter().map(|s| s.amount).sum();
    for surcharge in &surcharges {
        breakdown.push(BreakdownItem {
            item: surcharge.name.clone(),
            quantity: surcharge.quantity,
            unit_price: surcharge.unit_price,
            subtotal: surcharge.amount,
        });
    }

    Ok(Quote {
        token: Uuid::new_v4(),
        currency: config.currency.clone(),
        zone: zone.map(|z| z.name.clone()),
        zone_slug: primary_slug,
        is_out_of_city,
        distance_km,
        resolved_via,
        breakdown,
        surcharges,
        base_price,
        surcharge_total,
        total: base_price + addons_total + surcharge_total,
    })
}

/// Rate-book rows first (the pre-indexed, most specific form of tariff),
/// then corridor route rules. A miss is always a reported error, never a
/// silent default.
fn resolve_base_price(
    request: &QuoteRequest,
    data: &PricingData,
    zone_slug: &str,
    origin_slug: Option<&str>,
    destination_slug: Option<&str>,
    distance_km: f64,
) -> Result<(f64, ResolvedVia), Error> {
    let bracket = if request.out_of_city_destination.is_some() {
        RateBracket::OutOfCity
    } else if let Some(origin_type) = request.origin_type {
        RateBracket::Origin(origin_type)
    } else {
        RateBracket::Distance(DistanceRange::from_km(distance_km))
    };
    let key = RateKey {
        zone_slug: zone_slug.to_string(),
        trip_type: request.trip_type,
        equipment: request.equipment,
        bracket,
    };

    if let Some(price) = data.rates.find(&key) {
        return Ok((
            price,
            ResolvedVia::Rate {
                zone_slug: key.zone_slug,
                bracket: bracket.label().into(),
            },
        ));
    }

    match select_route_rule(&data.route_rules, origin_slug, destination_slug) {
        Some(rule) => {
            let tariffs: Vec<&TariffRule> = data
                .tariff_rules
                .iter()
                .filter(|t| {
                    t.active
                        && t.route_rule_id == rule.id
                        && t.equipment == request.equipment
                        && t.trip_type == request.trip_type
                })
                .collect();

            match tariffs.as_slice() {
                [] => Err(no_tariff_rule_error(
                    &rule.id,
                    &format!(
                        "{}/{}",
                        request.equipment.label(),
                        request.trip_type.label()
                    ),
                )),
                [tariff] => Ok((
                    tariff.price(distance_km)?,
                    ResolvedVia::Corridor {
                        route_rule_id: rule.id.clone(),
                        tariff_rule_id: tariff.id.clone(),
                        route_type: rule.route_type,
                    },
                )),
                _ => Err(ambiguous_tariff_error(&rule.id)),
            }
        }
        None if data.rates.has_zone(zone_slug) => Err(rate_not_found_error(&key.describe())),
        None => Err(no_route_rule_error(origin_slug, destination_slug)),
    }
}

fn base_item_label(resolved_via: &ResolvedVia) -> String {
    match resolved_via {
        ResolvedVia::Rate { bracket, .. } => format!("Tarifa base ({})", bracket),
        ResolvedVia::Corridor { route_rule_id, .. } => {
            format!("Tarifa por corredor ({})", route_rule_id)
        }
        ResolvedVia::Emergency { .. } => "Tarifa de emergencia (estimado)".into(),
    }
}
