use std::path::PathBuf;
use std::sync::Arc;

use chrono::{Duration as ChronoDuration, Utc};
use reqwest::StatusCode;
use reqwest::multipart::{Form, Part};
use serde_json::{Value, json};

use jobboard_api::{ApiConfig, app};
use jobboard_auth::{Hs256Jwt, JwtClaims, PasswordError, PasswordHasher, Role, TokenIssuer};
use jobboard_core::UserId;
use jobboard_infra::collaborators::{LocalBlobStore, RecordingMailer};
use jobboard_infra::store::InMemoryStore;
use jobboard_infra::JobBoard;

const SECRET: &str = "test-secret";
const ADMIN_EMAIL: &str = "admin@jobboard.test";
const ADMIN_PASSWORD: &str = "admin-pass";

/// Argon2 is far too slow for a debug-build test suite.
struct PlainHasher;

impl PasswordHasher for PlainHasher {
    fn hash(&self, plaintext: &str) -> Result<String, PasswordError> {
        Ok(format!("plain${plaintext}"))
    }

    fn verify(&self, plaintext: &str, digest: &str) -> Result<bool, PasswordError> {
        digest
            .strip_prefix("plain$")
            .map(|p| p == plaintext)
            .ok_or(PasswordError::MalformedHash)
    }
}

struct TestServer {
    base_url: String,
    client: reqwest::Client,
    mailer: Arc<RecordingMailer>,
    upload_dir: PathBuf,
    handle: tokio::task::JoinHandle<()>,
}

impl TestServer {
    async fn spawn() -> Self {
        Self::spawn_with("development").await
    }

    async fn spawn_with(environment: &str) -> Self {
        // Same router as prod, bound to an ephemeral port.
        let listener = tokio::net::TcpListener::bind("127.0.0.1:0")
            .await
            .expect("failed to bind ephemeral port");
        let addr = listener.local_addr().unwrap();
        let base_url = format!("http://{}", addr);
        let upload_dir = std::env::temp_dir().join(format!("jobboard-api-{}", uuid::Uuid::new_v4()));

        let config = ApiConfig {
            jwt_secret: SECRET.to_string(),
            upload_dir: upload_dir.clone(),
            public_base_url: format!("{base_url}/uploads"),
            client_url: "http://client.test".to_string(),
            admin_email: ADMIN_EMAIL.to_string(),
            admin_password: ADMIN_PASSWORD.to_string(),
            environment: environment.to_string(),
            ..ApiConfig::default()
        };

        let jwt = Arc::new(Hs256Jwt::new(SECRET));
        let mailer = Arc::new(RecordingMailer::new());
        let board = JobBoard::new(
            Arc::new(InMemoryStore::new()),
            Arc::new(PlainHasher),
            jwt.clone(),
            mailer.clone(),
            Arc::new(LocalBlobStore::new(upload_dir.clone(), config.public_base_url.clone())),
            config.service_settings(),
        );
        board
            .bootstrap_admin(&config.admin_seed(), Utc::now())
            .await
            .expect("admin seeded");

        let app = app::build_app(app::AppServices::new(board, jwt), config);
        let handle = tokio::spawn(async move {
            axum::serve(listener, app).await.unwrap();
        });

        Self {
            base_url,
            client: reqwest::Client::new(),
            mailer,
            upload_dir,
            handle,
        }
    }

    fn url(&self, path: &str) -> String {
        format!("{}{}", self.base_url, path)
    }

    async fn register(&self, email: &str, role: &str) -> reqwest::Response {
        let form = Form::new()
            .text("fullname", "Test User")
            .text("email", email.to_string())
            .text("phoneNumber", "1234567890")
            .text("password", "secret123")
            .text("role", role.to_string());
        self.client
            .post(self.url("/user/register"))
            .multipart(form)
            .send()
            .await
            .unwrap()
    }

    async fn login(&self, email: &str, password: &str, role: &str) -> reqwest::Response {
        self.client
            .post(self.url("/user/login"))
            .json(&json!({ "email": email, "password": password, "role": role }))
            .send()
            .await
            .unwrap()
    }

    /// Register + login; returns the bearer token.
    async fn user(&self, email: &str, role: &str) -> String {
        assert_eq!(self.register(email, role).await.status(), StatusCode::CREATED);
        self.token(email, "secret123", role).await
    }

    async fn token(&self, email: &str, password: &str, role: &str) -> String {
        let res = self.login(email, password, role).await;
        assert_eq!(res.status(), StatusCode::OK);
        let body: Value = res.json().await.unwrap();
        body["token"].as_str().unwrap().to_string()
    }

    async fn admin(&self) -> String {
        self.token(ADMIN_EMAIL, ADMIN_PASSWORD, "Admin").await
    }

    /// A jobseeker whose profile passes the completeness gate.
    async fn complete_jobseeker(&self, email: &str) -> String {
        let token = self.user(email, "Jobseeker").await;
        let form = Form::new()
            .text("skills", "rust, sql")
            .text("gender", "female")
            .text("education", r#"[{"degree":"BSc","institution":"FAST"}]"#)
            .part(
                "resume",
                Part::bytes(b"%PDF-1.4 resume".to_vec())
                    .file_name("cv.pdf")
                    .mime_str("application/pdf")
                    .unwrap(),
            );
        let res = self
            .client
            .post(self.url("/user/updateProfile"))
            .bearer_auth(&token)
            .multipart(form)
            .send()
            .await
            .unwrap();
        assert_eq!(res.status(), StatusCode::OK);
        token
    }

    async fn register_company(&self, token: &str, name: &str) -> reqwest::Response {
        let form = Form::new()
            .text("companyName", name.to_string())
            .text("website", "https://acme.io")
            .text("email", "hr@acme.io")
            .text("phone", "1234567890")
            .text("industry", "Software");
        self.client
            .post(self.url("/company/register"))
            .bearer_auth(token)
            .multipart(form)
            .send()
            .await
            .unwrap()
    }

    async fn post_job(&self, token: &str) -> reqwest::Response {
        self.client
            .post(self.url("/job/post"))
            .bearer_auth(token)
            .json(&json!({
                "title": "Backend Engineer",
                "jobType": "Full-time",
                "location": "Remote",
                "description": "Build APIs in Rust",
                "responsibilities": "Own services",
                "qualifications": "3 years",
                "salary": 500000,
                "niche": "Backend",
                "industry": "Software",
                "companyName": "Acme",
                "positions": 2
            }))
            .send()
            .await
            .unwrap()
    }

    /// Recruiter with company "Acme" and one open job; returns (token, job id).
    async fn recruiter_with_job(&self, email: &str) -> (String, String) {
        let token = self.user(email, "Recruiter").await;
        assert_eq!(self.register_company(&token, "Acme").await.status(), StatusCode::CREATED);
        let res = self.post_job(&token).await;
        assert_eq!(res.status(), StatusCode::CREATED);
        let job: Value = res.json().await.unwrap();
        (token, job["id"].as_str().unwrap().to_string())
    }

    async fn get(&self, path: &str, token: Option<&str>) -> reqwest::Response {
        let req = self.client.get(self.url(path));
        let req = match token {
            Some(t) => req.bearer_auth(t),
            None => req,
        };
        req.send().await.unwrap()
    }
}

impl Drop for TestServer {
    fn drop(&mut self) {
        self.handle.abort();
        let _ = std::fs::remove_dir_all(&self.upload_dir);
    }
}

fn mint_jwt(sub: UserId, role: Role, issued_at: chrono::DateTime<Utc>, ttl: ChronoDuration) -> String {
    Hs256Jwt::new(SECRET)
        .issue(&JwtClaims::new(sub, role, issued_at, ttl))
        .expect("failed to encode jwt")
}

async fn error_code(res: reqwest::Response) -> String {
    let body: Value = res.json().await.unwrap();
    body["error"].as_str().unwrap_or_default().to_string()
}

#[tokio::test]
async fn health_is_public() {
    let srv = TestServer::spawn().await;
    let res = srv.get("/health", None).await;
    assert_eq!(res.status(), StatusCode::OK);
}

#[tokio::test]
async fn auth_required_for_protected_endpoints() {
    let srv = TestServer::spawn().await;

    let res = srv.get("/user/me", None).await;
    assert_eq!(res.status(), StatusCode::UNAUTHORIZED);
    assert_eq!(error_code(res).await, "unauthenticated");

    let res = srv.get("/application/applied", None).await;
    assert_eq!(res.status(), StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn expired_and_forged_tokens_are_told_apart() {
    let srv = TestServer::spawn().await;

    let expired = mint_jwt(
        UserId::new(),
        Role::Jobseeker,
        Utc::now() - ChronoDuration::hours(2),
        ChronoDuration::hours(1),
    );
    let res = srv.get("/user/me", Some(&expired)).await;
    assert_eq!(res.status(), StatusCode::UNAUTHORIZED);
    assert_eq!(error_code(res).await, "token_expired");

    let res = srv.get("/user/me", Some("not.a.jwt")).await;
    assert_eq!(res.status(), StatusCode::UNAUTHORIZED);
    assert_eq!(error_code(res).await, "token_invalid");

    // A stale token does not lock anyone out of public pages.
    let res = srv.get("/job/get", Some(&expired)).await;
    assert_eq!(res.status(), StatusCode::OK);
}

#[tokio::test]
async fn login_sets_an_http_only_cookie_that_authenticates() {
    let srv = TestServer::spawn().await;
    assert_eq!(srv.register("jane@example.com", "Jobseeker").await.status(), StatusCode::CREATED);

    let res = srv.login("jane@example.com", "secret123", "jobseeker").await;
    assert_eq!(res.status(), StatusCode::OK);
    let cookie = res
        .headers()
        .get(reqwest::header::SET_COOKIE)
        .and_then(|v| v.to_str().ok())
        .unwrap()
        .to_string();
    assert!(cookie.starts_with("token="));
    assert!(cookie.contains("HttpOnly"));
    assert!(!cookie.contains("Secure"));

    let token_pair = cookie.split(';').next().unwrap().to_string();
    let res = srv
        .client
        .get(srv.url("/user/me"))
        .header(reqwest::header::COOKIE, token_pair)
        .send()
        .await
        .unwrap();
    assert_eq!(res.status(), StatusCode::OK);
    let me: Value = res.json().await.unwrap();
    assert_eq!(me["email"], "jane@example.com");
    assert!(me.get("passwordHash").is_none());

    let res = srv.get("/user/logout", None).await;
    assert_eq!(res.status(), StatusCode::OK);
    let cleared = res.headers().get(reqwest::header::SET_COOKIE).and_then(|v| v.to_str().ok()).unwrap();
    assert!(cleared.starts_with("token="));
}

#[tokio::test]
async fn login_failures() {
    let srv = TestServer::spawn().await;
    let _ = srv.user("rec@example.com", "Recruiter").await;

    let res = srv.login("rec@example.com", "wrong-pass", "Recruiter").await;
    assert_eq!(res.status(), StatusCode::UNAUTHORIZED);
    assert_eq!(error_code(res).await, "invalid_credentials");

    let res = srv.login("rec@example.com", "secret123", "Jobseeker").await;
    assert_eq!(res.status(), StatusCode::UNAUTHORIZED);

    let res = srv.login("rec@example.com", "secret123", "Moderator").await;
    assert_eq!(res.status(), StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn registration_validation() {
    let srv = TestServer::spawn().await;

    let res = srv.register("admin2@example.com", "Admin").await;
    assert_eq!(res.status(), StatusCode::BAD_REQUEST);

    assert_eq!(srv.register("dup@example.com", "Jobseeker").await.status(), StatusCode::CREATED);
    let res = srv.register("DUP@example.com", "Recruiter").await;
    assert_eq!(res.status(), StatusCode::CONFLICT);

    let form = Form::new()
        .text("fullname", "X")
        .text("email", "x@example.com")
        .text("phoneNumber", "123")
        .text("password", "secret123")
        .text("role", "Jobseeker");
    let res = srv
        .client
        .post(srv.url("/user/register"))
        .multipart(form)
        .send()
        .await
        .unwrap();
    assert_eq!(res.status(), StatusCode::BAD_REQUEST);
    assert_eq!(error_code(res).await, "validation_error");

    let form = Form::new()
        .text("fullname", "X")
        .text("email", "y@example.com")
        .text("phoneNumber", "1234567890")
        .text("password", "secret123")
        .text("role", "Jobseeker")
        .text("isAdmin", "true");
    let res = srv
        .client
        .post(srv.url("/user/register"))
        .multipart(form)
        .send()
        .await
        .unwrap();
    assert_eq!(res.status(), StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn password_reset_round_trip() {
    let srv = TestServer::spawn().await;
    let _ = srv.user("forgetful@example.com", "Jobseeker").await;

    let res = srv
        .client
        .post(srv.url("/user/forgot-password"))
        .json(&json!({ "email": "forgetful@example.com" }))
        .send()
        .await
        .unwrap();
    assert_eq!(res.status(), StatusCode::OK);

    let mail = srv.mailer.sent().pop().expect("reset mail sent");
    let token = mail
        .body
        .split("http://client.test/reset-password/")
        .nth(1)
        .and_then(|rest| rest.split_whitespace().next())
        .expect("reset link in body")
        .to_string();

    let res = srv
        .client
        .post(srv.url(&format!("/user/reset-password/{token}")))
        .json(&json!({ "password": "brand-new-pass" }))
        .send()
        .await
        .unwrap();
    assert_eq!(res.status(), StatusCode::OK);

    assert_eq!(
        srv.login("forgetful@example.com", "brand-new-pass", "Jobseeker").await.status(),
        StatusCode::OK
    );

    // Single use.
    let res = srv
        .client
        .post(srv.url(&format!("/user/reset-password/{token}")))
        .json(&json!({ "password": "another-pass" }))
        .send()
        .await
        .unwrap();
    assert!(res.status().is_client_error());

    // Unknown emails get the same answer and no mail.
    let before = srv.mailer.sent().len();
    let res = srv
        .client
        .post(srv.url("/user/forgot-password"))
        .json(&json!({ "email": "nobody@example.com" }))
        .send()
        .await
        .unwrap();
    assert_eq!(res.status(), StatusCode::OK);
    assert_eq!(srv.mailer.sent().len(), before);
}

#[tokio::test]
async fn uploaded_resume_is_served_back() {
    let srv = TestServer::spawn().await;
    let token = srv.complete_jobseeker("cv@example.com").await;

    let me: Value = srv.get("/user/me", Some(&token)).await.json().await.unwrap();
    let resume_url = me["profile"]["resume"].as_str().unwrap().to_string();
    assert!(resume_url.starts_with(&format!("{}/uploads/resumes/", srv.base_url)));
    assert_eq!(me["profile"]["resumeOriginalName"], "cv.pdf");

    let res = srv.client.get(&resume_url).send().await.unwrap();
    assert_eq!(res.status(), StatusCode::OK);
    assert_eq!(res.bytes().await.unwrap().as_ref(), b"%PDF-1.4 resume");
}

#[tokio::test]
async fn hiring_scenario_end_to_end() {
    let srv = TestServer::spawn().await;
    let (recruiter, job_id) = srv.recruiter_with_job("r@acme.io").await;
    let seeker = srv.complete_jobseeker("j@example.com").await;

    let job: Value = srv.get(&format!("/job/get/{job_id}"), None).await.json().await.unwrap();
    assert_eq!(job["job"]["status"], "Open");
    assert_eq!(job["company"]["name"], "Acme");

    let res = srv
        .client
        .post(srv.url(&format!("/application/apply/{job_id}")))
        .bearer_auth(&seeker)
        .send()
        .await
        .unwrap();
    assert_eq!(res.status(), StatusCode::CREATED);
    let application: Value = res.json().await.unwrap();
    assert_eq!(application["status"], "pending");
    let application_id = application["id"].as_str().unwrap().to_string();

    let job: Value = srv.get(&format!("/job/get/{job_id}"), None).await.json().await.unwrap();
    assert_eq!(job["job"]["applications"].as_array().unwrap().len(), 1);

    let res = srv
        .client
        .post(srv.url(&format!("/application/status/{application_id}/update")))
        .bearer_auth(&recruiter)
        .json(&json!({ "status": "Accepted" }))
        .send()
        .await
        .unwrap();
    assert_eq!(res.status(), StatusCode::OK);
    let updated: Value = res.json().await.unwrap();
    assert_eq!(updated["status"], "accepted");

    let res = srv
        .client
        .post(srv.url(&format!("/application/apply/{job_id}")))
        .bearer_auth(&seeker)
        .send()
        .await
        .unwrap();
    assert_eq!(res.status(), StatusCode::CONFLICT);

    let applied: Value = srv.get("/application/applied", Some(&seeker)).await.json().await.unwrap();
    assert_eq!(applied["items"][0]["job"]["id"], job_id.as_str());

    for path in [format!("/application/{job_id}/applicants"), format!("/job/{job_id}/applicants")] {
        let res = srv.get(&path, Some(&recruiter)).await;
        assert_eq!(res.status(), StatusCode::OK);
        let body: Value = res.json().await.unwrap();
        assert_eq!(body["items"][0]["applicant"]["email"], "j@example.com");
        assert!(body["items"][0]["applicant"].get("passwordHash").is_none());
    }
}

#[tokio::test]
async fn incomplete_profiles_cannot_apply() {
    let srv = TestServer::spawn().await;
    let (_, job_id) = srv.recruiter_with_job("r@acme.io").await;
    let seeker = srv.user("bare@example.com", "Jobseeker").await;

    let res = srv
        .client
        .post(srv.url(&format!("/application/apply/{job_id}")))
        .bearer_auth(&seeker)
        .send()
        .await
        .unwrap();
    assert_eq!(res.status(), StatusCode::BAD_REQUEST);
    let body: Value = res.json().await.unwrap();
    assert!(body["message"].as_str().unwrap().contains("resume"));
}

#[tokio::test]
async fn job_ownership_and_state_guards() {
    let srv = TestServer::spawn().await;
    let (owner, job_id) = srv.recruiter_with_job("owner@acme.io").await;
    let other = srv.user("other@example.com", "Recruiter").await;
    let admin = srv.admin().await;

    let disable = |token: String| {
        let req = srv
            .client
            .patch(srv.url(&format!("/job/disable/{job_id}")))
            .bearer_auth(token);
        async move { req.send().await.unwrap().status() }
    };

    assert_eq!(disable(other.clone()).await, StatusCode::FORBIDDEN);
    assert_eq!(disable(owner.clone()).await, StatusCode::OK);
    assert_eq!(disable(owner.clone()).await, StatusCode::NOT_FOUND);

    let res = srv
        .client
        .patch(srv.url(&format!("/job/enable/{job_id}")))
        .bearer_auth(&admin)
        .send()
        .await
        .unwrap();
    assert_eq!(res.status(), StatusCode::OK);

    let res = srv
        .client
        .put(srv.url(&format!("/job/update/{job_id}")))
        .bearer_auth(&owner)
        .json(&json!({ "salary": 650000, "positions": 3 }))
        .send()
        .await
        .unwrap();
    assert_eq!(res.status(), StatusCode::OK);
    let job: Value = res.json().await.unwrap();
    assert_eq!(job["positions"], 3);

    let res = srv
        .client
        .put(srv.url(&format!("/job/update/{job_id}")))
        .bearer_auth(&owner)
        .json(&json!({ "status": "Closed" }))
        .send()
        .await
        .unwrap();
    assert_eq!(res.status(), StatusCode::BAD_REQUEST);

    let res = srv
        .client
        .put(srv.url(&format!("/job/update/{job_id}")))
        .bearer_auth(&other)
        .json(&json!({ "title": "Hijacked" }))
        .send()
        .await
        .unwrap();
    assert_eq!(res.status(), StatusCode::FORBIDDEN);
}

#[tokio::test]
async fn malformed_ids_and_unknown_paths() {
    let srv = TestServer::spawn().await;

    let res = srv.get("/job/get/not-a-uuid", None).await;
    assert_eq!(res.status(), StatusCode::BAD_REQUEST);
    assert_eq!(error_code(res).await, "invalid_id");

    let res = srv.get(&format!("/job/get/{}", uuid::Uuid::now_v7()), None).await;
    assert_eq!(res.status(), StatusCode::NOT_FOUND);

    // Only the health check lives outside the area routers.
    let admin = srv.admin().await;
    for path in ["/whoami", "/me", "/users"] {
        assert_eq!(srv.get(path, Some(&admin)).await.status(), StatusCode::NOT_FOUND, "{path}");
    }
}

#[tokio::test]
async fn keyword_search_filters_the_public_list() {
    let srv = TestServer::spawn().await;
    let _ = srv.recruiter_with_job("r@acme.io").await;

    let all: Value = srv.get("/job/get", None).await.json().await.unwrap();
    assert_eq!(all["items"].as_array().unwrap().len(), 1);

    let hit: Value = srv.get("/job/get?keyword=backend", None).await.json().await.unwrap();
    assert_eq!(hit["items"].as_array().unwrap().len(), 1);

    let miss: Value = srv.get("/job/get?keyword=designer", None).await.json().await.unwrap();
    assert!(miss["items"].as_array().unwrap().is_empty());
}

#[tokio::test]
async fn company_visibility_and_lifecycle() {
    let srv = TestServer::spawn().await;
    let recruiter = srv.user("r@acme.io", "Recruiter").await;
    let res = srv.register_company(&recruiter, "Acme").await;
    assert_eq!(res.status(), StatusCode::CREATED);
    let company: Value = res.json().await.unwrap();
    assert_eq!(company["status"], "active");
    let id = company["id"].as_str().unwrap().to_string();

    // One company per recruiter.
    assert_eq!(srv.register_company(&recruiter, "Acme Two").await.status(), StatusCode::CONFLICT);
    // Jobseekers cannot register companies.
    let seeker = srv.user("j@example.com", "Jobseeker").await;
    assert_eq!(srv.register_company(&seeker, "Nope").await.status(), StatusCode::FORBIDDEN);

    let admin = srv.admin().await;
    let res = srv
        .client
        .put(srv.url(&format!("/company/disable/{id}")))
        .bearer_auth(&admin)
        .send()
        .await
        .unwrap();
    assert_eq!(res.status(), StatusCode::OK);
    let disabled: Value = res.json().await.unwrap();
    assert_eq!(disabled["status"], "disabled");

    assert_eq!(srv.get(&format!("/company/get/{id}"), Some(&seeker)).await.status(), StatusCode::NOT_FOUND);

    let seeker_list: Value = srv.get("/company/get", Some(&seeker)).await.json().await.unwrap();
    assert!(seeker_list["items"].as_array().unwrap().is_empty());
    let admin_list: Value = srv.get("/company/getcompany", Some(&admin)).await.json().await.unwrap();
    assert_eq!(admin_list["items"].as_array().unwrap().len(), 1);

    let activate = || {
        srv.client
            .put(srv.url(&format!("/company/activate/{id}")))
            .bearer_auth(&admin)
            .send()
    };
    assert_eq!(activate().await.unwrap().status(), StatusCode::OK);
    assert_eq!(activate().await.unwrap().status(), StatusCode::NOT_FOUND);

    let form = Form::new().text("location", "Karachi");
    let res = srv
        .client
        .put(srv.url(&format!("/company/update/{id}")))
        .bearer_auth(&recruiter)
        .multipart(form)
        .send()
        .await
        .unwrap();
    assert_eq!(res.status(), StatusCode::OK);
    let updated: Value = res.json().await.unwrap();
    assert_eq!(updated["location"], "Karachi");
}

#[tokio::test]
async fn event_registration_window() {
    let srv = TestServer::spawn().await;
    let recruiter = srv.user("r@acme.io", "Recruiter").await;
    let seeker = srv.user("j@example.com", "Jobseeker").await;

    let start = Utc::now() + ChronoDuration::days(10);
    let res = srv
        .client
        .post(srv.url("/event/create"))
        .bearer_auth(&recruiter)
        .json(&json!({
            "title": "Rust Meetup",
            "organizer": "Acme",
            "eventType": "Meetup",
            "description": "Talks and pizza",
            "eventDate": start.date_naive(),
            "eventStartTime": start,
            "registrationDeadline": start - ChronoDuration::days(1),
            "location": "Lahore",
            "category": "Technology"
        }))
        .send()
        .await
        .unwrap();
    assert_eq!(res.status(), StatusCode::CREATED);
    let event: Value = res.json().await.unwrap();
    let id = event["id"].as_str().unwrap().to_string();

    let register = || {
        srv.client
            .post(srv.url(&format!("/event/{id}/register")))
            .bearer_auth(&seeker)
            .send()
    };
    assert_eq!(register().await.unwrap().status(), StatusCode::OK);
    assert_eq!(register().await.unwrap().status(), StatusCode::CONFLICT);

    let attendees: Value = srv
        .get(&format!("/event/{id}/attendees"), Some(&recruiter))
        .await
        .json()
        .await
        .unwrap();
    assert_eq!(attendees["items"][0]["email"], "j@example.com");
    assert_eq!(
        srv.get(&format!("/event/{id}/attendees"), Some(&seeker)).await.status(),
        StatusCode::FORBIDDEN
    );

    let list: Value = srv.get("/event", None).await.json().await.unwrap();
    let listed = &list["items"][0];
    assert_eq!(listed["attendeeCount"], 1);
    assert!(listed.get("attendees").is_none());

    let details: Value = srv.get(&format!("/event/{id}"), None).await.json().await.unwrap();
    assert_eq!(details["title"], "Rust Meetup");
    assert_eq!(details["creator"]["email"], "r@acme.io");

    let res = srv
        .client
        .post(srv.url(&format!("/event/{id}/disable")))
        .bearer_auth(&recruiter)
        .send()
        .await
        .unwrap();
    assert_eq!(res.status(), StatusCode::OK);

    let late = srv.user("late@example.com", "Jobseeker").await;
    let res = srv
        .client
        .post(srv.url(&format!("/event/{id}/register")))
        .bearer_auth(&late)
        .send()
        .await
        .unwrap();
    assert_eq!(res.status(), StatusCode::CONFLICT);
}

#[tokio::test]
async fn admin_user_management() {
    let srv = TestServer::spawn().await;
    let seeker = srv.user("j@example.com", "Jobseeker").await;
    let admin = srv.admin().await;

    assert_eq!(srv.get("/user/all", Some(&seeker)).await.status(), StatusCode::FORBIDDEN);

    let all: Value = srv.get("/user/all", Some(&admin)).await.json().await.unwrap();
    let users = all["items"].as_array().unwrap();
    assert_eq!(users.len(), 2);
    let seeker_id = users
        .iter()
        .find(|u| u["email"] == "j@example.com")
        .and_then(|u| u["id"].as_str())
        .unwrap()
        .to_string();

    let res = srv
        .client
        .put(srv.url(&format!("/user/disable/{seeker_id}")))
        .bearer_auth(&admin)
        .send()
        .await
        .unwrap();
    assert_eq!(res.status(), StatusCode::OK);

    let res = srv.login("j@example.com", "secret123", "Jobseeker").await;
    assert_eq!(res.status(), StatusCode::FORBIDDEN);

    let res = srv
        .client
        .put(srv.url(&format!("/user/enable/{seeker_id}")))
        .bearer_auth(&admin)
        .send()
        .await
        .unwrap();
    assert_eq!(res.status(), StatusCode::OK);
    assert_eq!(srv.login("j@example.com", "secret123", "Jobseeker").await.status(), StatusCode::OK);
}

#[tokio::test]
async fn disabled_accounts_are_refused_despite_a_live_token() {
    let srv = TestServer::spawn().await;
    let (_, job_id) = srv.recruiter_with_job("r@acme.io").await;
    let seeker = srv.complete_jobseeker("j@example.com").await;
    let admin = srv.admin().await;

    let me: Value = srv.get("/user/me", Some(&seeker)).await.json().await.unwrap();
    let seeker_id = me["id"].as_str().unwrap().to_string();
    let res = srv
        .client
        .put(srv.url(&format!("/user/disable/{seeker_id}")))
        .bearer_auth(&admin)
        .send()
        .await
        .unwrap();
    assert_eq!(res.status(), StatusCode::OK);

    let apply = || {
        srv.client
            .post(srv.url(&format!("/application/apply/{job_id}")))
            .bearer_auth(&seeker)
            .send()
    };
    let res = apply().await.unwrap();
    assert_eq!(res.status(), StatusCode::FORBIDDEN);
    assert_eq!(error_code(res).await, "forbidden");
    assert_eq!(srv.get("/user/me", Some(&seeker)).await.status(), StatusCode::FORBIDDEN);
    assert_eq!(srv.get("/job/get", Some(&seeker)).await.status(), StatusCode::OK);

    let res = srv
        .client
        .put(srv.url(&format!("/user/enable/{seeker_id}")))
        .bearer_auth(&admin)
        .send()
        .await
        .unwrap();
    assert_eq!(res.status(), StatusCode::OK);
    assert_eq!(apply().await.unwrap().status(), StatusCode::CREATED);
}

#[tokio::test]
async fn production_marks_the_cookie_secure_and_keeps_client_errors() {
    let srv = TestServer::spawn_with("production").await;
    let res = srv.login(ADMIN_EMAIL, ADMIN_PASSWORD, "Admin").await;
    assert_eq!(res.status(), StatusCode::OK);
    let cookie = res
        .headers()
        .get(reqwest::header::SET_COOKIE)
        .and_then(|v| v.to_str().ok())
        .unwrap();
    assert!(cookie.contains("Secure"));

    // Client errors still carry their message.
    let res = srv.get("/job/get/not-a-uuid", None).await;
    let body: Value = res.json().await.unwrap();
    assert_eq!(body["error"], "invalid_id");
    assert!(!body["message"].as_str().unwrap().is_empty());
}
