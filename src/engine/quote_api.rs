use super::Engine;

use async_trait::async_trait;
use chrono::NaiveDate;
use sqlx::{types::Json, Executor, Row};

use crate::{
    api::QuoteAPI,
    entities::{
        compose_quote, HolidayCalendar, PricingData, Quote, QuoteRequest, Rate, RateBook,
        RouteRule, SurchargeRule, TariffRule,
    },
    error::Error,
};

impl Engine {
    async fn load_rate_book(&self) -> Result<RateBook, Error> {
        let mut conn = self.pool.acquire().await?;

        let rows = conn
            .fetch_all(sqlx::query("SELECT data FROM rates ORDER BY id"))
            .await?;

        let rates = rows
            .into_iter()
            .map(|row| {
                let Json(rate): Json<Rate> = row.try_get("data")?;
                Ok(rate)
            })
            .collect::<Result<Vec<_>, sqlx::Error>>()?;

        Ok(RateBook::new(rates))
    }

    async fn load_route_rules(&self) -> Result<Vec<RouteRule>, Error> {
        let mut conn = self.pool.acquire().await?;

        let rows = conn
            .fetch_all(sqlx::query("SELECT data FROM route_rules ORDER BY id"))
            .await?;

        rows.into_iter()
            .map(|row| {
                let Json(rule): Json<RouteRule> = row.try_get("data")?;
                Ok(rule)
            })
            .collect::<Result<Vec<_>, sqlx::Error>>()
            .map_err(Into::into)
    }

    async fn load_tariff_rules(&self) -> Result<Vec<TariffRule>, Error> {
        let mut conn = self.pool.acquire().await?;

        let rows = conn
            .fetch_all(sqlx::query("SELECT data FROM tariff_rules ORDER BY id"))
            .await?;

        rows.into_iter()
            .map(|row| {
                let Json(rule): Json<TariffRule> = row.try_get("data")?;
                Ok(rule)
            })
            .collect::<Result<Vec<_>, sqlx::Error>>()
            .map_err(Into::into)
    }

    async fn load_surcharge_rules(&self) -> Result<Vec<SurchargeRule>, Error> {
        let mut conn = self.pool.acquire().await?;

        let rows = conn
            .fetch_all(sqlx::query("SELECT data FROM surcharge_rules ORDER BY id"))
            .await?;

        rows.into_iter()
            .map(|row| {
                let Json(rule): Json<SurchargeRule> = row.try_get("data")?;
                Ok(rule)
            })
            .collect::<Result<Vec<_>, sqlx::Error>>()
            .map_err(Into::into)
    }

    async fn load_holidays(&self) -> Result<HolidayCalendar, Error> {
        let mut conn = self.pool.acquire().await?;

        let rows = conn
            .fetch_all(sqlx::query("SELECT day, name FROM holidays"))
            .await?;

        let days = rows
            .into_iter()
            .map(|row| {
                let day: NaiveDate = row.try_get("day")?;
                let name: String = row.try_get("name")?;
                Ok((day, name))
            })
            .collect::<Result<Vec<_>, sqlx::Error>>()?;

        Ok(HolidayCalendar::new(days))
    }
}

#[async_trait]
impl QuoteAPI for Engine {
    /// Loads a read-only snapshot of every record family concurrently, then
    /// runs the pure pricing pipeline over it. Lookup failures propagate as
    /// transport errors; business misses come back as 404-class errors from
    /// the pipeline itself.
    #[tracing::instrument(skip(self))]
    async fn calculate_quote(&self, request: QuoteRequest) -> Result<Quote, Error> {
        let (zones, rates, route_rules, tariff_rules, surcharge_rules, holidays) = futures::try_join!(
            self.load_zone_index(),
            self.load_rate_book(),
            self.load_route_rules(),
            self.load_tariff_rules(),
            self.load_surcharge_rules(),
            self.load_holidays(),
        )?;

        let data = PricingData {
            zones,
            rates,
            route_rules,
            tariff_rules,
            surcharge_rules,
            holidays,
        };

        compose_quote(&request, &data, &self.config)
    }
}
