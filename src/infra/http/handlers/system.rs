use axum::{
    extract::State,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use serde::Serialize;

use crate::application::envelope::{Envelope, messages};
use crate::application::error::ErrorReport;
use crate::cache::CacheStats;

use crate::infra::http::state::HttpState;

#[derive(Serialize)]
pub struct CacheCleared {
    cleared: usize,
}

#[derive(Serialize)]
pub struct CacheStatsPayload {
    cache: CacheStats,
}

#[derive(Serialize)]
pub struct HealthPayload {
    database: &'static str,
}

pub async fn health(State(state): State<HttpState>) -> Response {
    match state.health.check().await {
        Ok(()) => Envelope::ok("Service is healthy", HealthPayload { database: "up" })
            .into_response(),
        Err(err) => {
            let mut response =
                Envelope::<()>::failure(StatusCode::SERVICE_UNAVAILABLE, "Database unavailable")
                    .into_response();
            ErrorReport::from_error("infra::http::health", StatusCode::SERVICE_UNAVAILABLE, &err)
                .attach(&mut response);
            response
        }
    }
}

pub async fn clear_cache(State(state): State<HttpState>) -> Envelope<CacheCleared> {
    let cleared = state.services.cache.clear_all();
    Envelope::ok(messages::CACHE_CLEARED, CacheCleared { cleared })
}

pub async fn cache_stats(State(state): State<HttpState>) -> Envelope<CacheStatsPayload> {
    Envelope::ok(
        messages::FETCHED,
        CacheStatsPayload {
            cache: state.services.cache.stats(),
        },
    )
}

pub async fn not_found() -> Response {
    let mut response =
        Envelope::<()>::failure(StatusCode::NOT_FOUND, messages::RESOURCE_NOT_FOUND).into_response();
    ErrorReport::from_message("infra::http::fallback", StatusCode::NOT_FOUND, "no route matched")
        .attach(&mut response);
    response
}
