use axum::{
    extract::{Extension, Multipart, Path},
    http::StatusCode,
    response::IntoResponse,
    routing::{get, post, put},
    Json, Router,
};
use chrono::Utc;

use jobboard_auth::Viewer;
use jobboard_companies::{CompanyPatch, RegisterCompany};
use jobboard_core::CompanyId;
use jobboard_infra::JobBoard;

use crate::app::dto;
use crate::app::errors::ApiResult;
use crate::app::routes::common::{MultipartForm, path_id};

pub fn router() -> Router {
    Router::new()
        .route("/register", post(register_company))
        .route("/get", get(list_companies))
        .route("/getcompany", get(list_companies))
        .route("/get/:id", get(get_company))
        .route("/update/:id", put(update_company))
        .route("/disable/:id", put(disable_company))
        .route("/activate/:id", put(activate_company))
}

/// Multipart: `companyName`, `website`, `description`, `industry`, `size`,
/// `location`, `email`, `phone`, optional `logo` file.
pub async fn register_company(
    Extension(board): Extension<JobBoard>,
    Extension(viewer): Extension<Viewer>,
    multipart: Multipart,
) -> ApiResult<impl IntoResponse> {
    let mut form = MultipartForm::read(multipart).await?;
    let cmd = RegisterCompany {
        company_name: form.text("companyName"),
        website: form.text("website"),
        description: form.text("description"),
        industry: form.text("industry"),
        size: form.text("size"),
        location: form.text("location"),
        email: form.text("email"),
        phone: form.text("phone"),
    };
    let logo = form.file("logo");
    form.finish()?;

    let company = board.register_company(&viewer, cmd, logo, Utc::now()).await?;
    Ok((StatusCode::CREATED, Json(company)))
}

/// What the list contains depends on who asks.
pub async fn list_companies(
    Extension(board): Extension<JobBoard>,
    Extension(viewer): Extension<Viewer>,
) -> ApiResult<impl IntoResponse> {
    let companies = board.list_companies(&viewer).await?;
    Ok(Json(dto::items(companies)))
}

pub async fn get_company(
    Extension(board): Extension<JobBoard>,
    Extension(viewer): Extension<Viewer>,
    Path(id): Path<String>,
) -> ApiResult<impl IntoResponse> {
    let id: CompanyId = path_id(&id)?;
    let company = board.get_company(&viewer, id).await?;
    Ok(Json(company))
}

/// Multipart, every field optional; same names as registration.
pub async fn update_company(
    Extension(board): Extension<JobBoard>,
    Extension(viewer): Extension<Viewer>,
    Path(id): Path<String>,
    multipart: Multipart,
) -> ApiResult<impl IntoResponse> {
    let id: CompanyId = path_id(&id)?;
    let mut form = MultipartForm::read(multipart).await?;
    let patch = CompanyPatch {
        company_name: form.optional("companyName"),
        website: form.optional("website"),
        description: form.optional("description"),
        industry: form.optional("industry"),
        size: form.optional("size"),
        location: form.optional("location"),
        email: form.optional("email"),
        phone: form.optional("phone"),
        logo: None,
    };
    let logo = form.file("logo");
    form.finish()?;

    let company = board.update_company(&viewer, id, patch, logo).await?;
    Ok(Json(company))
}

pub async fn disable_company(
    Extension(board): Extension<JobBoard>,
    Extension(viewer): Extension<Viewer>,
    Path(id): Path<String>,
) -> ApiResult<impl IntoResponse> {
    let id: CompanyId = path_id(&id)?;
    let company = board.disable_company(&viewer, id).await?;
    Ok(Json(company))
}

pub async fn activate_company(
    Extension(board): Extension<JobBoard>,
    Extension(viewer): Extension<Viewer>,
    Path(id): Path<String>,
) -> ApiResult<impl IntoResponse> {
    let id: CompanyId = path_id(&id)?;
    let company = board.activate_company(&viewer, id).await?;
    Ok(Json(company))
}
