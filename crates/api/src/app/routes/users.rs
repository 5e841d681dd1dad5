use std::sync::Arc;

use axum::{
    extract::{Extension, Multipart, Path, rejection::JsonRejection},
    http::StatusCode,
    response::IntoResponse,
    routing::{get, post, put},
    Json, Router,
};
use axum_extra::extract::cookie::{Cookie, CookieJar, SameSite};
use chrono::Utc;
use serde_json::json;

use jobboard_auth::{Role, Viewer};
use jobboard_core::UserId;
use jobboard_infra::JobBoard;
use jobboard_infra::services::ProfileFiles;
use jobboard_users::{Gender, ProfileUpdate, RegisterUser, parse_skills};

use crate::app::dto::{self, SessionResponse, UserResponse};
use crate::app::errors::ApiResult;
use crate::app::routes::common::{MultipartForm, path_id};
use crate::config::ApiConfig;
use crate::middleware::AUTH_COOKIE;

pub fn router() -> Router {
    Router::new()
        .route("/register", post(register))
        .route("/login", post(login))
        .route("/logout", get(logout))
        .route("/forgot-password", post(forgot_password))
        .route("/reset-password/:token", post(reset_password))
        .route("/updateProfile", post(update_profile))
        .route("/me", get(me))
        .route("/all", get(list_users))
        .route("/disable/:id", put(disable_user))
        .route("/enable/:id", put(enable_user))
}

/// Multipart: `fullname`, `email`, `phoneNumber`, `password`, `role`, optional `profilePhoto` file.
pub async fn register(
    Extension(board): Extension<JobBoard>,
    multipart: Multipart,
) -> ApiResult<impl IntoResponse> {
    let mut form = MultipartForm::read(multipart).await?;
    let role: Role = form.text("role").parse()?;
    let cmd = RegisterUser {
        fullname: form.text("fullname"),
        email: form.text("email"),
        phone_number: form.text("phoneNumber"),
        password: form.text("password"),
        role,
    };
    let photo = form.file("profilePhoto");
    form.finish()?;

    let user = board.register(cmd, photo, Utc::now()).await?;
    Ok((StatusCode::CREATED, Json(UserResponse::from(user))))
}

pub async fn login(
    Extension(board): Extension<JobBoard>,
    Extension(config): Extension<Arc<ApiConfig>>,
    jar: CookieJar,
    body: Result<Json<dto::LoginRequest>, JsonRejection>,
) -> ApiResult<impl IntoResponse> {
    let Json(body) = body?;
    let role: Role = body.role.parse()?;
    let session = board.login(&body.email, &body.password, role, Utc::now()).await?;

    let cookie = Cookie::build((AUTH_COOKIE, session.token.clone()))
        .path("/")
        .http_only(true)
        .same_site(SameSite::Strict)
        .secure(config.is_production())
        .build();
    Ok((jar.add(cookie), Json(SessionResponse::from(session))))
}

pub async fn logout(jar: CookieJar) -> impl IntoResponse {
    let jar = jar.remove(Cookie::build(AUTH_COOKIE).path("/"));
    (jar, Json(json!({ "message": "logged out" })))
}

/// Always answers the same way, whether or not the email is registered.
pub async fn forgot_password(
    Extension(board): Extension<JobBoard>,
    body: Result<Json<dto::ForgotPasswordRequest>, JsonRejection>,
) -> ApiResult<impl IntoResponse> {
    let Json(body) = body?;
    board.forgot_password(&body.email, Utc::now()).await?;
    Ok(Json(json!({
        "message": "if that email is registered, a reset link has been sent"
    })))
}

pub async fn reset_password(
    Extension(board): Extension<JobBoard>,
    Path(token): Path<String>,
    body: Result<Json<dto::ResetPasswordRequest>, JsonRejection>,
) -> ApiResult<impl IntoResponse> {
    let Json(body) = body?;
    board.reset_password(&token, &body.password, Utc::now()).await?;
    Ok(Json(json!({ "message": "password updated" })))
}

/// Multipart profile update. `skills` is comma-separated; `education` and
/// `experience` are JSON arrays; `resume` and `profilePhoto` are files.
pub async fn update_profile(
    Extension(board): Extension<JobBoard>,
    Extension(viewer): Extension<Viewer>,
    multipart: Multipart,
) -> ApiResult<impl IntoResponse> {
    let mut form = MultipartForm::read(multipart).await?;
    let update = ProfileUpdate {
        fullname: form.optional("fullname"),
        email: form.optional("email"),
        phone_number: form.optional("phoneNumber"),
        bio: form.optional("bio"),
        skills: form.optional("skills").map(|raw| parse_skills(&raw)),
        address: form.optional("address"),
        city: form.optional("city"),
        state: form.optional("state"),
        gender: form.parsed::<Gender>("gender")?,
        date_of_birth: form.date("dateOfBirth")?,
        education: form.json("education")?,
        experience: form.json("experience")?,
        resume: None,
        profile_photo: None,
    };
    let files = ProfileFiles {
        resume: form.file("resume"),
        profile_photo: form.file("profilePhoto"),
    };
    form.finish()?;

    let user = board.update_profile(&viewer, update, files).await?;
    Ok(Json(UserResponse::from(user)))
}

pub async fn me(
    Extension(board): Extension<JobBoard>,
    Extension(viewer): Extension<Viewer>,
) -> ApiResult<impl IntoResponse> {
    let user = board.me(&viewer).await?;
    Ok(Json(UserResponse::from(user)))
}

pub async fn list_users(
    Extension(board): Extension<JobBoard>,
    Extension(viewer): Extension<Viewer>,
) -> ApiResult<impl IntoResponse> {
    let users = board.list_users(&viewer).await?;
    Ok(Json(dto::items(users.into_iter().map(UserResponse::from).collect())))
}

pub async fn disable_user(
    Extension(board): Extension<JobBoard>,
    Extension(viewer): Extension<Viewer>,
    Path(id): Path<String>,
) -> ApiResult<impl IntoResponse> {
    let id: UserId = path_id(&id)?;
    let user = board.disable_user(&viewer, id).await?;
    Ok(Json(UserResponse::from(user)))
}

pub async fn enable_user(
    Extension(board): Extension<JobBoard>,
    Extension(viewer): Extension<Viewer>,
    Path(id): Path<String>,
) -> ApiResult<impl IntoResponse> {
    let id: UserId = path_id(&id)?;
    let user = board.enable_user(&viewer, id).await?;
    Ok(Json(UserResponse::from(user)))
}
