use axum::extract::Json;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use serde_json::json;
use std::env;
use std::fmt::Debug;

/// Error codes are grouped by range: 1..=99 infrastructure (500),
/// 100..=199 validation (400), 200..=299 business not-found (404).
#[derive(Debug)]
pub struct Error {
    pub code: i32,
    pub message: String,
}

impl From<env::VarError> for Error {
    fn from(err: env::VarError) -> Self {
        env_var_error(err)
    }
}

impl From<sqlx::Error> for Error {
    fn from(err: sqlx::Error) -> Self {
        database_error(err)
    }
}

impl IntoResponse for Error {
    fn into_response(self) -> Response {
        let (status, error_message) = match self.code {
            1..=99 => (StatusCode::INTERNAL_SERVER_ERROR, "Internal Server Error"),
            100..=199 => (StatusCode::BAD_REQUEST, self.message.as_str()),
            200..=299 => (StatusCode::NOT_FOUND, self.message.as_str()),
            _ => (StatusCode::BAD_REQUEST, self.message.as_str()),
        };

        let body = Json(json!({
            "code": self.code,
            "error": error_message,
        }));

        (status, body).into_response()
    }
}

pub fn env_var_error(_: env::VarError) -> Error {
    Error {
        code: 1,
        message: "environment variable error".into(),
    }
}

pub fn database_error<T: Debug>(_: T) -> Error {
    Error {
        code: 2,
        message: "database error".into(),
    }
}

// More than one active tariff bound to the same route rule and service.
// Rule configuration must be corrected; picking one by storage order would
// make quotes non-deterministic.
pub fn ambiguous_tariff_error(route_rule_id: &str) -> Error {
    Error {
        code: 3,
        message: format!(
            "more than one active tariff rule for route rule '{}'",
            route_rule_id
        ),
    }
}

pub fn validation_error(message: impl Into<String>) -> Error {
    Error {
        code: 100,
        message: message.into(),
    }
}

pub fn rate_not_found_error(description: &str) -> Error {
    Error {
        code: 200,
        message: format!("no rate configured for {}", description),
    }
}

pub fn no_route_rule_error(origin: Option<&str>, destination: Option<&str>) -> Error {
    Error {
        code: 201,
        message: format!(
            "no route rule matches origin zone '{}' and destination zone '{}'",
            origin.unwrap_or("any"),
            destination.unwrap_or("any"),
        ),
    }
}

pub fn no_tariff_rule_error(route_rule_id: &str, service: &str) -> Error {
    Error {
        code: 202,
        message: format!(
            "route rule '{}' has no active tariff for service {}",
            route_rule_id, service
        ),
    }
}

pub fn no_distance_tier_error(tariff_rule_id: &str, distance_km: f64) -> Error {
    Error {
        code: 203,
        message: format!(
            "tariff rule '{}' has no distance tier covering {} km",
            tariff_rule_id, distance_km
        ),
    }
}
