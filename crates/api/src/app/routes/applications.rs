use axum::{
    extract::{Extension, Path, rejection::JsonRejection},
    http::StatusCode,
    response::IntoResponse,
    routing::{get, post},
    Json, Router,
};
use chrono::Utc;

use jobboard_auth::Viewer;
use jobboard_core::{ApplicationId, JobId};
use jobboard_infra::JobBoard;

use crate::app::dto::{self, ApplicantResponse, AppliedJobResponse};
use crate::app::errors::ApiResult;
use crate::app::routes::common::path_id;

pub fn router() -> Router {
    Router::new()
        .route("/apply/:id", post(apply))
        .route("/applied", get(applied_jobs))
        .route("/:id/applicants", get(job_applicants))
        .route("/status/:id/update", post(update_status))
}

/// `:id` is the job being applied to.
pub async fn apply(
    Extension(board): Extension<JobBoard>,
    Extension(viewer): Extension<Viewer>,
    Path(id): Path<String>,
) -> ApiResult<impl IntoResponse> {
    let job_id: JobId = path_id(&id)?;
    let application = board.apply(&viewer, job_id, Utc::now()).await?;
    Ok((StatusCode::CREATED, Json(application)))
}

pub async fn applied_jobs(
    Extension(board): Extension<JobBoard>,
    Extension(viewer): Extension<Viewer>,
) -> ApiResult<impl IntoResponse> {
    let applied = board.applied_jobs(&viewer).await?;
    Ok(Json(dto::items(
        applied.into_iter().map(AppliedJobResponse::from).collect(),
    )))
}

/// `:id` is the job whose applicants are listed.
pub async fn job_applicants(
    Extension(board): Extension<JobBoard>,
    Extension(viewer): Extension<Viewer>,
    Path(id): Path<String>,
) -> ApiResult<impl IntoResponse> {
    let job_id: JobId = path_id(&id)?;
    let applicants = board.job_applicants(&viewer, job_id).await?;
    Ok(Json(dto::items(
        applicants.into_iter().map(ApplicantResponse::from).collect(),
    )))
}

pub async fn update_status(
    Extension(board): Extension<JobBoard>,
    Extension(viewer): Extension<Viewer>,
    Path(id): Path<String>,
    body: Result<Json<dto::UpdateStatusRequest>, JsonRejection>,
) -> ApiResult<impl IntoResponse> {
    let id: ApplicationId = path_id(&id)?;
    let Json(body) = body?;
    let application = board.update_application_status(&viewer, id, &body.status).await?;
    Ok(Json(application))
}
