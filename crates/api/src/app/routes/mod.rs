use axum::Router;

pub mod applications;
pub mod common;
pub mod companies;
pub mod events;
pub mod jobs;
pub mod system;
pub mod users;

/// Router for every job board endpoint. Each handler asks the authorization
/// gate itself, so public and protected routes share one tree.
pub fn router() -> Router {
    Router::new()
        .nest("/user", users::router())
        .nest("/company", companies::router())
        .nest("/job", jobs::router())
        .nest("/application", applications::router())
        .nest("/event", events::router())
}
