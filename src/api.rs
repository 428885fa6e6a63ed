use async_trait::async_trait;
use std::sync::Arc;

use crate::entities::{Location, Quote, QuoteRequest, Zone};
use crate::error::Error;

#[async_trait]
pub trait ZoneAPI {
    async fn list_zones(&self) -> Result<Vec<Zone>, Error>;

    /// Resolves both endpoints against the same zone snapshot. `None` means
    /// "no zone detected", not failure.
    async fn detect_zones(
        &self,
        origin: &Location,
        destination: &Location,
    ) -> Result<(Option<String>, Option<String>), Error>;
}

#[async_trait]
pub trait QuoteAPI {
    async fn calculate_quote(&self, request: QuoteRequest) -> Result<Quote, Error>;
}

pub trait API: ZoneAPI + QuoteAPI {}

pub type DynAPI = Arc<dyn API + Send + Sync>;
