use axum::{
    extract::{Extension, Path, rejection::JsonRejection},
    http::StatusCode,
    response::IntoResponse,
    routing::{get, post},
    Json, Router,
};
use chrono::Utc;

use jobboard_auth::Viewer;
use jobboard_core::EventId;
use jobboard_event_registry::CreateEvent;
use jobboard_infra::JobBoard;

use crate::app::dto::{self, EventDetailResponse, EventListItem, UserResponse};
use crate::app::errors::ApiResult;
use crate::app::routes::common::path_id;

pub fn router() -> Router {
    Router::new()
        .route("/create", post(create_event))
        .route("/", get(list_events))
        .route("/:id", get(event_details))
        .route("/:id/register", post(register_for_event))
        .route("/:id/attendees", get(event_attendees))
        .route("/:id/disable", post(disable_event))
}

pub async fn create_event(
    Extension(board): Extension<JobBoard>,
    Extension(viewer): Extension<Viewer>,
    body: Result<Json<CreateEvent>, JsonRejection>,
) -> ApiResult<impl IntoResponse> {
    let Json(cmd) = body?;
    let event = board.create_event(&viewer, cmd, Utc::now()).await?;
    Ok((StatusCode::CREATED, Json(event)))
}

pub async fn list_events(
    Extension(board): Extension<JobBoard>,
    Extension(viewer): Extension<Viewer>,
) -> ApiResult<impl IntoResponse> {
    let events = board.list_events(&viewer).await?;
    Ok(Json(dto::items(
        events.into_iter().map(EventListItem::from).collect(),
    )))
}

/// Fails with 400 once the registration deadline has passed.
pub async fn event_details(
    Extension(board): Extension<JobBoard>,
    Extension(viewer): Extension<Viewer>,
    Path(id): Path<String>,
) -> ApiResult<impl IntoResponse> {
    let id: EventId = path_id(&id)?;
    let summary = board.event_details(&viewer, id, Utc::now()).await?;
    Ok(Json(EventDetailResponse::from(summary)))
}

pub async fn register_for_event(
    Extension(board): Extension<JobBoard>,
    Extension(viewer): Extension<Viewer>,
    Path(id): Path<String>,
) -> ApiResult<impl IntoResponse> {
    let id: EventId = path_id(&id)?;
    let event = board.register_for_event(&viewer, id, Utc::now()).await?;
    Ok(Json(serde_json::json!({
        "message": "registered",
        "eventId": event.id,
        "attendeeCount": event.attendees.len(),
    })))
}

pub async fn event_attendees(
    Extension(board): Extension<JobBoard>,
    Extension(viewer): Extension<Viewer>,
    Path(id): Path<String>,
) -> ApiResult<impl IntoResponse> {
    let id: EventId = path_id(&id)?;
    let attendees = board.event_attendees(&viewer, id).await?;
    Ok(Json(dto::items(
        attendees.into_iter().map(UserResponse::from).collect(),
    )))
}

pub async fn disable_event(
    Extension(board): Extension<JobBoard>,
    Extension(viewer): Extension<Viewer>,
    Path(id): Path<String>,
) -> ApiResult<impl IntoResponse> {
    let id: EventId = path_id(&id)?;
    let event = board.disable_event(&viewer, id).await?;
    Ok(Json(event))
}
