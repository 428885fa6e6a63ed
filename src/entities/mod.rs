mod location;
mod quote;
mod rate;
mod route_rule;
mod service;
mod surcharge;
mod tariff_rule;
mod zone;

pub use location::Location;
pub use quote::{
    compose_quote, BreakdownItem, Extras, PricingData, Quote, QuoteRequest, ResolvedVia,
    ServiceSelection,
};
pub use rate::{DistanceRange, Rate, RateBook, RateBracket, RateKey};
pub use route_rule::{select_route_rule, RouteRule, RouteType};
pub use service::{EquipmentType, OriginType, TripType};
pub use surcharge::{
    calculate_surcharges, AmountType, AppliedSurcharge, HolidayCalendar, SurchargeCondition,
    SurchargeContext, SurchargeKind, SurchargeOverrides, SurchargeRule, TimeRange,
    CODE_EXTRA_FLOORS, CODE_ROBOTIC_CHAIR, CODE_WAITING_HOUR,
};
pub use tariff_rule::{DistanceTier, PricingMode, TariffRule};
pub use zone::{Classification, Zone, ZoneIndex};
