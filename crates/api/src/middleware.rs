use std::sync::Arc;

use axum::{
    extract::State,
    http::{HeaderMap, StatusCode},
    middleware::Next,
    response::Response,
};
use axum_extra::extract::cookie::CookieJar;
use chrono::Utc;

use jobboard_auth::{JwtValidator, Viewer};

use crate::app::errors;

/// Name of the cookie login sets; carries the same token as the bearer header.
pub const AUTH_COOKIE: &str = "token";

#[derive(Clone)]
pub struct AuthState {
    pub jwt: Arc<dyn JwtValidator>,
}

/// Resolve the request's [`Viewer`] and attach it as an extension.
///
/// No token means an anonymous viewer; public routes keep working. A token
/// that fails validation also continues as anonymous, but if the handler then
/// answers 401 the response says why the token was refused
/// (`token_expired` / `token_invalid`).
pub async fn auth_middleware(
    State(state): State<AuthState>,
    mut req: axum::http::Request<axum::body::Body>,
    next: Next,
) -> Response {
    let (viewer, refused) = match extract_token(req.headers()) {
        None => (Viewer::Anonymous, None),
        Some(token) => match state.jwt.validate(&token, Utc::now()) {
            Ok(claims) => (Viewer::from_token(claims.sub, &claims.role), None),
            Err(err) => {
                tracing::debug!(error = %err, "presented token refused");
                (Viewer::Anonymous, Some(err))
            }
        },
    };

    req.extensions_mut().insert(viewer);
    let response = next.run(req).await;

    match refused {
        Some(err) if response.status() == StatusCode::UNAUTHORIZED => errors::token_error_to_response(&err),
        _ => response,
    }
}

/// Replace server-error bodies with a generic message (production only).
pub async fn hide_internal_errors(req: axum::http::Request<axum::body::Body>, next: Next) -> Response {
    let response = next.run(req).await;
    let status = response.status();
    if !status.is_server_error() {
        return response;
    }
    if status == StatusCode::BAD_GATEWAY {
        errors::json_error(status, "upstream_error", "an upstream service failed")
    } else {
        errors::json_error(status, "internal_error", "internal server error")
    }
}

/// Bearer header first, then the auth cookie.
fn extract_token(headers: &HeaderMap) -> Option<String> {
    if let Some(token) = extract_bearer(headers) {
        return Some(token.to_string());
    }
    CookieJar::from_headers(headers)
        .get(AUTH_COOKIE)
        .map(|c| c.value().trim().to_string())
        .filter(|t| !t.is_empty())
}

fn extract_bearer(headers: &HeaderMap) -> Option<&str> {
    let header = headers.get(axum::http::header::AUTHORIZATION)?;
    let header = header.to_str().ok()?;
    let token = header.strip_prefix("Bearer ")?.trim();
    if token.is_empty() {
        return None;
    }
    Some(token)
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::http::{HeaderValue, header};

    #[test]
    fn bearer_header_wins_over_cookie() {
        let mut headers = HeaderMap::new();
        headers.insert(header::AUTHORIZATION, HeaderValue::from_static("Bearer abc"));
        headers.insert(header::COOKIE, HeaderValue::from_static("token=xyz"));
        assert_eq!(extract_token(&headers).as_deref(), Some("abc"));
    }

    #[test]
    fn cookie_is_used_without_a_bearer_header() {
        let mut headers = HeaderMap::new();
        headers.insert(header::COOKIE, HeaderValue::from_static("theme=dark; token=xyz"));
        assert_eq!(extract_token(&headers).as_deref(), Some("xyz"));
    }

    #[test]
    fn blank_or_foreign_schemes_are_ignored() {
        let mut headers = HeaderMap::new();
        headers.insert(header::AUTHORIZATION, HeaderValue::from_static("Basic dXNlcg=="));
        assert_eq!(extract_token(&headers), None);

        headers.insert(header::AUTHORIZATION, HeaderValue::from_static("Bearer   "));
        headers.insert(header::COOKIE, HeaderValue::from_static("token="));
        assert_eq!(extract_token(&headers), None);
    }
}
