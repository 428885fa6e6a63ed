mod quote_api;
mod seed;
mod zone_api;

use sqlx::{Executor, Pool, Postgres};

use crate::{api::API, config::PricingConfig, error::Error};

type Database = Postgres;

/// Read-mostly pricing engine over the rule store. Holds no mutable state
/// between quote calculations; each request is a snapshot of reads followed
/// by pure arithmetic.
pub struct Engine {
    pool: Pool<Database>,
    config: PricingConfig,
}

impl Engine {
    #[tracing::instrument(name = "Engine::new", skip_all)]
    pub async fn new(pool: Pool<Database>, config: PricingConfig) -> Result<Self, Error> {
        // zone records (KV store)
        pool.execute("CREATE TABLE IF NOT EXISTS zones (slug VARCHAR PRIMARY KEY, data JSONB NOT NULL)")
            .await?;

        // corridor rules (KV store)
        pool.execute("CREATE TABLE IF NOT EXISTS route_rules (id VARCHAR PRIMARY KEY, data JSONB NOT NULL)")
            .await?;
        pool.execute("CREATE TABLE IF NOT EXISTS tariff_rules (id VARCHAR PRIMARY KEY, data JSONB NOT NULL)")
            .await?;

        // denormalized rate table used by the metro-zone UI
        pool.execute("CREATE TABLE IF NOT EXISTS rates (id SERIAL PRIMARY KEY, data JSONB NOT NULL)")
            .await?;

        // surcharge rules; id order is rule-definition order
        pool.execute("CREATE TABLE IF NOT EXISTS surcharge_rules (id VARCHAR PRIMARY KEY, data JSONB NOT NULL)")
            .await?;

        pool.execute("CREATE TABLE IF NOT EXISTS holidays (day DATE PRIMARY KEY, name VARCHAR NOT NULL)")
            .await?;

        seed::install(&pool).await?;

        Ok(Self { pool, config })
    }
}

impl API for Engine {}
