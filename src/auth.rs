use actix_web::body::MessageBody;
use actix_web::dev::{ServiceRequest, ServiceResponse};
use actix_web::middleware::Next;
use actix_web::{web, Error, ResponseError};
use serde::Deserialize;

use crate::config::Config;
use crate::error::ApiError;

pub const API_KEY_HEADER: &str = "x-api-key";

/// The shared secret guarding `/tasks`, captured once at startup.
#[derive(Debug, Clone)]
pub struct AuthConfig {
    api_key: Option<String>,
}

impl AuthConfig {
    pub fn new(api_key: Option<String>) -> Self {
        Self { api_key }
    }

    /// Decides whether a request carrying `presented` may proceed.
    pub fn admit(&self, presented: Option<&str>) -> Result<(), ApiError> {
        let Some(expected) = self.api_key.as_deref() else {
            tracing::error!("API_KEY is not configured, rejecting request");
            return Err(ApiError::Misconfigured);
        };
        match presented {
            Some(key) if key.as_bytes() == expected.as_bytes() => Ok(()),
            _ => Err(ApiError::Unauthorized),
        }
    }
}

impl From<&Config> for AuthConfig {
    fn from(config: &Config) -> Self {
        Self::new(config.api_key.clone())
    }
}

#[derive(Deserialize)]
struct ApiKeyQuery {
    api_key: Option<String>,
}

/// The `x-api-key` header, falling back to the `api_key` query parameter.
fn presented_key(req: &ServiceRequest) -> Option<String> {
    let header = req
        .headers()
        .get(API_KEY_HEADER)
        .and_then(|value| value.to_str().ok())
        .filter(|value| !value.is_empty());
    if let Some(key) = header {
        return Some(key.to_string());
    }
    web::Query::<ApiKeyQuery>::from_query(req.query_string())
        .ok()
        .and_then(|query| query.into_inner().api_key)
}

pub async fn require_api_key(
    auth: web::Data<AuthConfig>,
    req: ServiceRequest,
    next: Next<impl MessageBody + 'static>,
) -> Result<ServiceResponse<impl MessageBody>, Error> {
    if let Err(rejection) = auth.admit(presented_key(&req).as_deref()) {
        return Ok(req
            .into_response(rejection.error_response())
            .map_into_right_body());
    }
    next.call(req).await.map(ServiceResponse::map_into_left_body)
}
