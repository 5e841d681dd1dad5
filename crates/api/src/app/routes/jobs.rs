use axum::{
    extract::{Extension, Path, Query, rejection::{JsonRejection, QueryRejection}},
    http::StatusCode,
    response::IntoResponse,
    routing::{get, patch, post, put},
    Json, Router,
};
use chrono::Utc;

use jobboard_auth::Viewer;
use jobboard_core::JobId;
use jobboard_infra::JobBoard;
use jobboard_jobs::{JobPatch, PostJob};

use crate::app::dto::{self, ApplicantResponse, JobDetailResponse};
use crate::app::errors::ApiResult;
use crate::app::routes::common::path_id;

pub fn router() -> Router {
    Router::new()
        .route("/post", post(post_job))
        .route("/get", get(list_jobs))
        .route("/get/:id", get(get_job))
        .route("/getadminjobs", get(posted_jobs))
        .route("/disable/:id", patch(disable_job))
        .route("/enable/:id", patch(enable_job))
        .route("/update/:id", put(update_job))
        .route("/:id/applicants", get(job_applicants))
}

pub async fn post_job(
    Extension(board): Extension<JobBoard>,
    Extension(viewer): Extension<Viewer>,
    body: Result<Json<PostJob>, JsonRejection>,
) -> ApiResult<impl IntoResponse> {
    let Json(cmd) = body?;
    let job = board.post_job(&viewer, cmd, Utc::now()).await?;
    Ok((StatusCode::CREATED, Json(job)))
}

/// `?keyword=` matches title or description, case-insensitively.
pub async fn list_jobs(
    Extension(board): Extension<JobBoard>,
    Extension(viewer): Extension<Viewer>,
    query: Result<Query<dto::KeywordQuery>, QueryRejection>,
) -> ApiResult<impl IntoResponse> {
    let Query(query) = query?;
    let jobs = board.list_jobs(&viewer, query.keyword.as_deref().unwrap_or("")).await?;
    Ok(Json(dto::items(jobs)))
}

pub async fn get_job(
    Extension(board): Extension<JobBoard>,
    Extension(viewer): Extension<Viewer>,
    Path(id): Path<String>,
) -> ApiResult<impl IntoResponse> {
    let id: JobId = path_id(&id)?;
    let detail = board.get_job(&viewer, id).await?;
    Ok(Json(JobDetailResponse::from(detail)))
}

/// Jobs the caller posted (every job for an admin).
pub async fn posted_jobs(
    Extension(board): Extension<JobBoard>,
    Extension(viewer): Extension<Viewer>,
) -> ApiResult<impl IntoResponse> {
    let jobs = board.posted_jobs(&viewer).await?;
    Ok(Json(dto::items(jobs)))
}

pub async fn disable_job(
    Extension(board): Extension<JobBoard>,
    Extension(viewer): Extension<Viewer>,
    Path(id): Path<String>,
) -> ApiResult<impl IntoResponse> {
    let id: JobId = path_id(&id)?;
    let job = board.disable_job(&viewer, id).await?;
    Ok(Json(job))
}

pub async fn enable_job(
    Extension(board): Extension<JobBoard>,
    Extension(viewer): Extension<Viewer>,
    Path(id): Path<String>,
) -> ApiResult<impl IntoResponse> {
    let id: JobId = path_id(&id)?;
    let job = board.enable_job(&viewer, id).await?;
    Ok(Json(job))
}

pub async fn update_job(
    Extension(board): Extension<JobBoard>,
    Extension(viewer): Extension<Viewer>,
    Path(id): Path<String>,
    body: Result<Json<JobPatch>, JsonRejection>,
) -> ApiResult<impl IntoResponse> {
    let id: JobId = path_id(&id)?;
    let Json(patch) = body?;
    let job = board.update_job(&viewer, id, patch).await?;
    Ok(Json(job))
}

pub async fn job_applicants(
    Extension(board): Extension<JobBoard>,
    Extension(viewer): Extension<Viewer>,
    Path(id): Path<String>,
) -> ApiResult<impl IntoResponse> {
    let id: JobId = path_id(&id)?;
    let applicants = board.job_applicants(&viewer, id).await?;
    Ok(Json(dto::items(
        applicants.into_iter().map(ApplicantResponse::from).collect(),
    )))
}
