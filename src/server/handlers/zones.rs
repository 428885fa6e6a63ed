use axum::extract::{Extension, Json};

use crate::api::DynAPI;
use crate::entities::Zone;
use crate::error::Error;

pub async fn list(Extension(api): Extension<DynAPI>) -> Result<Json<Vec<Zone>>, Error> {
    let zones = api.list_zones().await?;

    Ok(zones.into())
}
