use axum::extract::{Extension, Json};
use chrono::{DateTime, FixedOffset, Utc};
use serde::{Deserialize, Serialize};

use crate::api::DynAPI;
use crate::config::PricingConfig;
use crate::entities::{
    AppliedSurcharge, BreakdownItem, EquipmentType, Extras, Location, OriginType, Quote,
    QuoteRequest, ServiceSelection, SurchargeOverrides, TripType,
};
use crate::error::Error;

/// Zone-slug-driven request shape used by the metro-zone booking UI.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DetailedQuoteParams {
    zone_slug: String,
    trip_type: TripType,
    equipment_type: EquipmentType,
    origin_type: Option<OriginType>,
    distance_km: Option<f64>,
    out_of_city_destination: Option<String>,
    extra_km: Option<f64>,
    #[serde(default)]
    additional_services: Vec<ServiceSelection>,
    is_night_schedule: Option<bool>,
    is_holiday_or_sunday: Option<bool>,
}

impl DetailedQuoteParams {
    /// This shape carries no timestamp, so the time and day surcharges are
    /// decided by the caller's flags alone. An omitted flag means the
    /// surcharge does not apply; the server clock never decides.
    fn into_request(self, scheduled_at: DateTime<FixedOffset>) -> QuoteRequest {
        QuoteRequest {
            equipment: self.equipment_type,
            trip_type: self.trip_type,
            origin: Location::from_zone(self.zone_slug),
            destination: Location::default(),
            scheduled_at,
            distance_km: self.distance_km,
            origin_type: self.origin_type,
            out_of_city_destination: self.out_of_city_destination,
            extra_km: self.extra_km,
            extras: Extras {
                services: self.additional_services,
                ..Extras::default()
            },
            overrides: SurchargeOverrides {
                night: Some(self.is_night_schedule.unwrap_or(false)),
                holiday_or_sunday: Some(self.is_holiday_or_sunday.unwrap_or(false)),
            },
        }
    }
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DetailedQuoteResponse {
    zone: Option<String>,
    trip_type: TripType,
    equipment_type: EquipmentType,
    breakdown: Vec<BreakdownItem>,
    total_price: f64,
}

pub async fn create_detailed(
    Extension(api): Extension<DynAPI>,
    Extension(config): Extension<PricingConfig>,
    Json(params): Json<DetailedQuoteParams>,
) -> Result<Json<DetailedQuoteResponse>, Error> {
    let trip_type = params.trip_type;
    let equipment_type = params.equipment_type;

    let request = params.into_request(Utc::now().with_timezone(&config.local_offset()));

    let quote = api.calculate_quote(request).await?;

    Ok(Json(DetailedQuoteResponse {
        zone: quote.zone,
        trip_type,
        equipment_type,
        breakdown: quote.breakdown,
        total_price: quote.total,
    }))
}

/// Address-driven request shape: zone detection first, then the same rate
/// lookup, with time and day surcharges derived from `scheduledAt`.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AddressQuoteParams {
    origin_address: String,
    destination_address: String,
    equipment_type: EquipmentType,
    trip_type: TripType,
    distance_km: Option<f64>,
    scheduled_at: Option<DateTime<FixedOffset>>,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct AddressQuoteResponse {
    zone: Option<String>,
    zone_slug: Option<String>,
    is_out_of_city: bool,
    breakdown: Vec<BreakdownItem>,
    surcharges: Vec<AppliedSurcharge>,
    base_price: f64,
    surcharge_total: f64,
    total: f64,
}

impl From<Quote> for AddressQuoteResponse {
    fn from(quote: Quote) -> Self {
        Self {
            zone: quote.zone,
            zone_slug: quote.zone_slug,
            is_out_of_city: quote.is_out_of_city,
            breakdown: quote.breakdown,
            surcharges: quote.surcharges,
            base_price: quote.base_price,
            surcharge_total: quote.surcharge_total,
            total: quote.total,
        }
    }
}

pub async fn create_from_addresses(
    Extension(api): Extension<DynAPI>,
    Extension(config): Extension<PricingConfig>,
    Json(params): Json<AddressQuoteParams>,
) -> Result<Json<AddressQuoteResponse>, Error> {
    let request = QuoteRequest {
        equipment: params.equipment_type,
        trip_type: params.trip_type,
        origin: Location::from_address(params.origin_address),
        destination: Location::from_address(params.destination_address),
        // the seeded windows are local time, so the default must be too
        scheduled_at: params
            .scheduled_at
            .unwrap_or_else(|| Utc::now().with_timezone(&config.local_offset())),
        distance_km: params.distance_km,
        origin_type: None,
        out_of_city_destination: None,
        extra_km: None,
        extras: Extras::default(),
        overrides: SurchargeOverrides::default(),
    };

    let quote = api.calculate_quote(request).await?;

    Ok(Json(quote.into()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn noon() -> DateTime<FixedOffset> {
        DateTime::parse_from_rfc3339("2026-08-26T12:00:00-05:00").unwrap()
    }

    #[test]
    fn omitted_flags_force_time_and_day_surcharges_off() {
        let params: DetailedQuoteParams = serde_json::from_value(json!({
            "zoneSlug": "medellin",
            "tripType": "SENCILLO",
            "equipmentType": "RAMPA",
            "distanceKm": 2.0
        }))
        .unwrap();

        let request = params.into_request(noon());
        assert_eq!(request.overrides.night, Some(false));
        assert_eq!(request.overrides.holiday_or_sunday, Some(false));
    }

    #[test]
    fn explicit_flags_pass_through() {
        let params: DetailedQuoteParams = serde_json::from_value(json!({
            "zoneSlug": "medellin",
            "tripType": "SENCILLO",
            "equipmentType": "RAMPA",
            "isNightSchedule": true,
            "isHolidayOrSunday": false
        }))
        .unwrap();

        let request = params.into_request(noon());
        assert_eq!(request.overrides.night, Some(true));
        assert_eq!(request.overrides.holiday_or_sunday, Some(false));
    }
}
