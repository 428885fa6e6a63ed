use std::collections::HashMap;

use chrono::{DateTime, Datelike, FixedOffset, NaiveDate, NaiveTime, Timelike};
use serde::{Deserialize, Serialize};

use crate::entities::Extras;

pub const CODE_ROBOTIC_CHAIR: &str = "SILLA_ROBOTICA";
pub const CODE_EXTRA_FLOORS: &str = "PISOS";
pub const CODE_WAITING_HOUR: &str = "HORA_ESPERA";

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SurchargeKind {
    TimeWindow,
    DayOrHoliday,
    ExtraService,
    Distance,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AmountType {
    Fixed,
    Percentage,
    PerUnit,
}

/// An "HH:MM" range in local time. `start > end` wraps midnight, e.g.
/// 19:00-06:00 covers 23:30 and 02:00 but not 12:00.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct TimeRange {
    pub start: String,
    pub end: String,
}

impl TimeRange {
    pub fn contains(&self, time: NaiveTime) -> bool {
        let (start, end) = match (parse_hhmm(&self.start), parse_hhmm(&self.end)) {
            (Some(start), Some(end)) => (start, end),
            _ => return false,
        };

        if start > end {
            time >= start || time <= end
        } else {
            time >= start && time <= end
        }
    }
}

fn parse_hhmm(value: &str) -> Option<NaiveTime> {
    NaiveTime::parse_from_str(value, "%H:%M").ok()
}

/// Condition payload stored with each rule. Only the fields relevant to the
/// rule's kind are populated.
#[derive(Clone, Debug, Default, Serialize, Deserialize)]
pub struct SurchargeCondition {
    #[serde(default)]
    pub time_ranges: Vec<TimeRange>,
    /// 0 = Sunday .. 6 = Saturday.
    #[serde(default)]
    pub days_of_week: Vec<u8>,
    #[serde(default)]
    pub include_holidays: bool,
    pub service_code: Option<String>,
    pub floor_threshold: Option<u32>,
    pub min_distance_km: Option<f64>,
}

#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct SurchargeRule {
    pub id: String,
    pub name: String,
    pub kind: SurchargeKind,
    pub amount_type: AmountType,
    pub amount: f64,
    pub unit: Option<String>,
    #[serde(default)]
    pub condition: SurchargeCondition,
    pub active: bool,
}

/// Exact-date lookup, independent of day-of-week. Consulted only by
/// day/holiday rules.
#[derive(Clone, Debug, Default, Serialize, Deserialize)]
pub struct HolidayCalendar {
    days: HashMap<NaiveDate, String>,
}

impl HolidayCalendar {
    pub fn new(days: impl IntoIterator<Item = (NaiveDate, String)>) -> Self {
        Self {
            days: days.into_iter().collect(),
        }
    }

    pub fn name_of(&self, date: NaiveDate) -> Option<&str> {
        self.days.get(&date).map(String::as_str)
    }
}

/// Manual flags from the zone-slug-driven request shape. `Some(true)` forces
/// the matching rule kind on, `Some(false)` forces it off, `None` defers to
/// the scheduled timestamp.
#[derive(Clone, Copy, Debug, Default, Serialize, Deserialize)]
pub struct SurchargeOverrides {
    pub night: Option<bool>,
    pub holiday_or_sunday: Option<bool>,
}

/// One line of the itemized recharge list.
#[derive(Clone, Debug, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AppliedSurcharge {
    pub id: String,
    pub name: String,
    pub kind: SurchargeKind,
    pub unit_price: f64,
    pub quantity: Option<f64>,
    pub amount: f64,
    pub details: String,
}

pub struct SurchargeContext<'a> {
    pub scheduled_at: DateTime<FixedOffset>,
    pub extras: &'a Extras,
    pub holidays: &'a HolidayCalendar,
    pub overrides: SurchargeOverrides,
    pub base_fare: f64,
    pub distance_km: f64,
    pub floor_threshold: u32,
}

impl SurchargeRule {
    /// A rule that does not meet its condition yields `None`; that is a
    /// normal outcome, never an error.
    pub fn evaluate(&self, ctx: &SurchargeContext) -> Option<AppliedSurcharge> {
        if !self.active {
            return None;
        }

        match self.kind {
            SurchargeKind::TimeWindow => self.evaluate_time_window(ctx),
            SurchargeKind::DayOrHoliday => self.evaluate_day_or_holiday(ctx),
            SurchargeKind::ExtraService => self.evaluate_extra_service(ctx),
            SurchargeKind::Distance => self.evaluate_distance(ctx),
        }
    }

    fn evaluate_time_window(&self, ctx: &SurchargeContext) -> Option<AppliedSurcharge> {
        let applies = match ctx.overrides.night {
            Some(forced) => forced,
            None => {
                let time = ctx.scheduled_at.time();
                self.condition.time_ranges.iter().any(|r| r.contains(time))
            }
        };

        if !applies {
            return None;
        }

        let details = format!(
            "horario {:02}:{:02}",
            ctx.scheduled_at.hour(),
            ctx.scheduled_at.minute()
        );
        Some(self.applied(ctx, None, details))
    }

    fn evaluate_day_or_holiday(&self, ctx: &SurchargeContext) -> Option<AppliedSurcharge> {
        let date = ctx.scheduled_at.date_naive();
        let weekday = ctx.scheduled_at.weekday().num_days_from_sunday() as u8;

        let holiday_name = if self.condition.include_holidays {
            ctx.holidays.name_of(date)
        } else {
            None
        };

        let applies = match ctx.overrides.holiday_or_sunday {
            Some(forced) => forced,
            None => self.condition.days_of_week.contains(&weekday) || holiday_name.is_some(),
        };

        if !applies {
            return None;
        }

        let details = match holiday_name {
            Some(name) => format!("festivo: {}", name),
            None => format!("día {}", date.format("%Y-%m-%d")),
        };
        Some(self.applied(ctx, None, details))
    }

    fn evaluate_extra_service(&self, ctx: &SurchargeContext) -> Option<AppliedSurcharge> {
        let code = self.condition.service_code.as_deref()?;
        let threshold = self
            .condition
            .floor_threshold
            .unwrap_or(ctx.floor_threshold);

        let quantity = ctx.extras.quantity_for(code, threshold)?;

        let details = match code {
            CODE_ROBOTIC_CHAIR => "silla robótica".to_string(),
            CODE_EXTRA_FLOORS => format!("{} pisos adicionales", trim_number(quantity)),
            CODE_WAITING_HOUR => format!("{} horas de espera", trim_number(quantity)),
            _ => match &self.unit {
                Some(unit) => format!("{} x {}", trim_number(quantity), unit),
                None => format!("{} x {}", trim_number(quantity), code),
            },
        };

        Some(self.applied(ctx, Some(quantity), details))
    }

    fn evaluate_distance(&self, ctx: &SurchargeContext) -> Option<AppliedSurcharge> {
        let min = self.condition.min_distance_km?;
        if ctx.distance_km <= min {
            return None;
        }

        let quantity = ctx.distance_km - min;
        let details = format!("{} km sobre {} km", trim_number(quantity), trim_number(min));
        Some(self.applied(ctx, Some(quantity), details))
    }

    fn applied(
        &self,
        ctx: &SurchargeContext,
        quantity: Option<f64>,
        details: String,
    ) -> AppliedSurcharge {
        let amount = match self.amount_type {
            AmountType::Fixed => self.amount,
            AmountType::Percentage => ctx.base_fare * self.amount / 100.0,
            AmountType::PerUnit => self.amount * quantity.unwrap_or(1.0),
        };

        AppliedSurcharge {
            id: self.id.clone(),
            name: self.name.clone(),
            kind: self.kind,
            unit_price: self.amount,
            quantity,
            amount,
            details,
        }
    }
}

/// Evaluates every active rule independently, in rule-definition order.
/// Surcharges are additive and non-exclusive: several may apply at once.
pub fn calculate_surcharges(
    rules: &[SurchargeRule],
    ctx: &SurchargeContext,
) -> Vec<AppliedSurcharge> {
    rules.iter().filter_map(|rule| rule.evaluate(ctx)).collect()
}

fn trim_number(value: f64) -> String {
    if (value.fract()).abs() < f64::EPSILON {
        format!("{}", value as i64)
    } else {
        format!("{}", value)
    }
}
