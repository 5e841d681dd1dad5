//! HTTP API application wiring (Axum router + service wiring).
//!
//! - `services.rs`: store and collaborator wiring
//! - `routes/`: HTTP routes + handlers (one file per domain area)
//! - `dto.rs`: request/response DTOs
//! - `errors.rs`: consistent error responses

use std::sync::Arc;

use axum::{routing::get, Extension, Router};
use tower::ServiceBuilder;
use tower_http::{services::ServeDir, trace::TraceLayer};

use crate::config::ApiConfig;
use crate::middleware;

pub mod dto;
pub mod errors;
pub mod routes;
pub mod services;

pub use services::{AppServices, build_services};

/// Build the full HTTP router (public entrypoint used by `main.rs` and the
/// black-box tests).
pub fn build_app(services: AppServices, config: ApiConfig) -> Router {
    let auth_state = middleware::AuthState {
        jwt: services.jwt.clone(),
    };
    let uploads = ServeDir::new(&config.upload_dir);
    let production = config.is_production();

    let app = Router::new()
        .route("/health", get(routes::system::health))
        .merge(routes::router())
        .nest_service("/uploads", uploads)
        .layer(Extension(services.board))
        .layer(Extension(Arc::new(config)))
        .layer(axum::middleware::from_fn_with_state(
            auth_state,
            middleware::auth_middleware,
        ));

    let app = if production {
        app.layer(axum::middleware::from_fn(middleware::hide_internal_errors))
    } else {
        app
    };

    app.layer(ServiceBuilder::new().layer(TraceLayer::new_for_http()))
}
