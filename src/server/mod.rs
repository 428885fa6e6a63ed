mod handlers;

use std::net::SocketAddr;
use std::sync::Arc;

use axum::{
    extract::Extension,
    routing::{get, post},
    Router,
};

use crate::api::{DynAPI, API};
use crate::config::PricingConfig;
use crate::server::handlers::{quotes, zones};

pub async fn serve<T: API + Sync + Send + 'static>(api: T, config: PricingConfig) {
    tracing_subscriber::fmt::init();

    let api = Arc::new(api) as DynAPI;

    let app = Router::new()
        .route("/quotes/detailed", post(quotes::create_detailed))
        .route("/quotes/address", post(quotes::create_from_addresses))
        .route("/zones", get(zones::list))
        .layer(Extension(api))
        .layer(Extension(config));

    let addr = SocketAddr::from(([127, 0, 0, 1], 3000));

    tracing::info!("listening on {}", addr);

    axum::Server::bind(&addr)
        .serve(app.into_make_service())
        .await
        .unwrap();
}
