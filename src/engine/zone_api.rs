use super::Engine;

use async_trait::async_trait;
use sqlx::{types::Json, Executor, Row};

use crate::{
    api::ZoneAPI,
    entities::{Location, Zone, ZoneIndex},
    error::Error,
};

impl Engine {
    /// Zone records in fixed slug order, so keyword matching is evaluated
    /// in a documented, stable order.
    pub(super) async fn load_zone_index(&self) -> Result<ZoneIndex, Error> {
        let mut conn = self.pool.acquire().await?;

        let rows = conn
            .fetch_all(sqlx::query("SELECT data FROM zones ORDER BY slug"))
            .await?;

        let zones = rows
            .into_iter()
            .map(|row| {
                let Json(zone): Json<Zone> = row.try_get("data")?;
                Ok(zone)
            })
            .collect::<Result<Vec<_>, sqlx::Error>>()?;

        Ok(ZoneIndex::new(zones))
    }
}

#[async_trait]
impl ZoneAPI for Engine {
    #[tracing::instrument(skip(self))]
    async fn list_zones(&self) -> Result<Vec<Zone>, Error> {
        Ok(self.load_zone_index().await?.all().to_vec())
    }

    #[tracing::instrument(skip(self))]
    async fn detect_zones(
        &self,
        origin: &Location,
        destination: &Location,
    ) -> Result<(Option<String>, Option<String>), Error> {
        let zones = self.load_zone_index().await?;

        Ok((zones.detect(origin), zones.detect(destination)))
    }
}
