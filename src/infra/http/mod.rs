//! axum surface over the entity services.

mod auth;
mod error;
mod handlers;
mod middleware;
mod models;
mod state;

pub use auth::{AdminToken, require_admin};
pub use error::{JsonBody, QueryParams, RequestError};
pub use middleware::{RequestContext, log_responses, set_request_context};
pub use models::{PageQuery, lenient_int, parse_date, parse_flag, parse_id};
pub use state::{HealthCheck, HttpState};

use axum::{
    Router, middleware as axum_middleware,
    routing::{get, patch, post},
};

pub fn build_router(state: HttpState) -> Router {
    let admin = Router::new()
        .route(
            "/careers",
            get(handlers::list_careers).post(handlers::create_career),
        )
        .route(
            "/careers/{id}",
            get(handlers::get_career)
                .put(handlers::update_career)
                .delete(handlers::delete_career),
        )
        .route("/blogs", get(handlers::list_blogs).post(handlers::create_blog))
        .route(
            "/blogs/{id}",
            get(handlers::get_blog)
                .put(handlers::update_blog)
                .delete(handlers::delete_blog),
        )
        .route("/contact-us", get(handlers::list_contacts))
        .route("/contact-us/export", get(handlers::export_contacts))
        .route("/franchise", get(handlers::list_franchise))
        .route("/franchise/export", get(handlers::export_franchise))
        .route("/franchise/{id}", get(handlers::get_franchise))
        .route(
            "/franchise/{id}/status",
            patch(handlers::update_franchise_status),
        )
        .route("/payments", get(handlers::list_payments))
        .route("/payments/export", get(handlers::export_payments))
        .route("/user-logins", get(handlers::list_user_logins))
        .route("/user-logins/export", get(handlers::export_user_logins))
        .route("/users", get(handlers::list_users))
        .route("/subscriptions", get(handlers::list_subscriptions))
        .route("/cache/clear", post(handlers::clear_cache))
        .route("/cache/stats", get(handlers::cache_stats))
        .route_layer(axum_middleware::from_fn_with_state(
            state.clone(),
            require_admin,
        ));

    let public = Router::new()
        .route("/blogs", get(handlers::public_blogs))
        .route("/blogs/slug/{slug}", get(handlers::public_blog_by_slug))
        .route("/blogs/{id}", get(handlers::public_blog))
        .route("/careers", get(handlers::public_careers))
        .route("/careers/{id}", get(handlers::public_career))
        .route("/contact", post(handlers::submit_contact))
        .route("/franchise", post(handlers::submit_franchise))
        .route("/subscription", post(handlers::submit_subscription))
        .route("/user-details", post(handlers::submit_user_details));

    Router::new()
        .route("/health", get(handlers::health))
        .nest("/admin", admin)
        .nest("/public", public)
        .fallback(handlers::not_found)
        .with_state(state)
        .layer(axum_middleware::from_fn(log_responses))
        .layer(axum_middleware::from_fn(set_request_context))
}
