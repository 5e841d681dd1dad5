//! API configuration.

use std::path::PathBuf;

use chrono::Duration;

use jobboard_infra::{ServiceSettings, services::AdminSeed};

const DEV_JWT_SECRET: &str = "dev-secret";
const DEV_ADMIN_PASSWORD: &str = "admin123";

/// API server configuration.
#[derive(Debug, Clone)]
pub struct ApiConfig {
    /// Server host
    pub host: String,
    /// Server port
    pub port: u16,
    /// HS256 signing key for bearer tokens and the auth cookie
    pub jwt_secret: String,
    pub token_ttl_hours: i64,
    /// Postgres URL; `None` runs on the in-memory store
    pub database_url: Option<String>,
    /// Where uploaded files land, and the URL prefix they are served under
    pub upload_dir: PathBuf,
    pub public_base_url: String,
    /// Web client base URL, used for password-reset links
    pub client_url: String,
    pub admin_name: String,
    pub admin_email: String,
    pub admin_phone: String,
    pub admin_password: String,
    /// Environment (development/production)
    pub environment: String,
}

impl Default for ApiConfig {
    fn default() -> Self {
        Self {
            host: "0.0.0.0".to_string(),
            port: 8080,
            jwt_secret: DEV_JWT_SECRET.to_string(),
            token_ttl_hours: 24,
            database_url: None,
            upload_dir: PathBuf::from("./uploads"),
            public_base_url: "http://localhost:8080/uploads".to_string(),
            client_url: "http://localhost:5173".to_string(),
            admin_name: "Administrator".to_string(),
            admin_email: "admin@jobboard.local".to_string(),
            admin_phone: "0000000000".to_string(),
            admin_password: DEV_ADMIN_PASSWORD.to_string(),
            environment: "development".to_string(),
        }
    }
}

impl ApiConfig {
    /// Create config from environment variables.
    pub fn from_env() -> Self {
        let defaults = Self::default();

        let jwt_secret = std::env::var("JWT_SECRET").unwrap_or_else(|_| {
            tracing::warn!("JWT_SECRET not set; using insecure dev default");
            defaults.jwt_secret.clone()
        });
        let admin_password = std::env::var("ADMIN_PASSWORD").unwrap_or_else(|_| {
            tracing::warn!("ADMIN_PASSWORD not set; seeding the admin with the dev default");
            defaults.admin_password.clone()
        });

        Self {
            host: std::env::var("API_HOST").unwrap_or(defaults.host),
            port: std::env::var("API_PORT")
                .ok()
                .and_then(|s| s.parse().ok())
                .unwrap_or(defaults.port),
            jwt_secret,
            token_ttl_hours: std::env::var("TOKEN_TTL_HOURS")
                .ok()
                .and_then(|s| s.parse().ok())
                .filter(|h: &i64| *h > 0)
                .unwrap_or(defaults.token_ttl_hours),
            database_url: std::env::var("DATABASE_URL").ok().filter(|s| !s.trim().is_empty()),
            upload_dir: std::env::var("UPLOAD_DIR")
                .map(PathBuf::from)
                .unwrap_or(defaults.upload_dir),
            public_base_url: std::env::var("PUBLIC_BASE_URL").unwrap_or(defaults.public_base_url),
            client_url: std::env::var("CLIENT_URL").unwrap_or(defaults.client_url),
            admin_name: std::env::var("ADMIN_NAME").unwrap_or(defaults.admin_name),
            admin_email: std::env::var("ADMIN_EMAIL").unwrap_or(defaults.admin_email),
            admin_phone: std::env::var("ADMIN_PHONE").unwrap_or(defaults.admin_phone),
            admin_password,
            environment: std::env::var("ENVIRONMENT").unwrap_or(defaults.environment),
        }
    }

    pub fn is_production(&self) -> bool {
        self.environment.eq_ignore_ascii_case("production")
    }

    pub fn bind_addr(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }

    pub fn token_ttl(&self) -> Duration {
        Duration::hours(self.token_ttl_hours)
    }

    pub fn service_settings(&self) -> ServiceSettings {
        ServiceSettings {
            token_ttl: self.token_ttl(),
            client_url: self.client_url.trim_end_matches('/').to_string(),
        }
    }

    pub fn admin_seed(&self) -> AdminSeed {
        AdminSeed {
            fullname: self.admin_name.clone(),
            email: self.admin_email.clone(),
            phone_number: self.admin_phone.clone(),
            password: self.admin_password.clone(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_describe_a_local_development_setup() {
        let config = ApiConfig::default();
        assert_eq!(config.bind_addr(), "0.0.0.0:8080");
        assert!(config.database_url.is_none());
        assert!(!config.is_production());
        assert_eq!(config.token_ttl(), Duration::hours(24));
    }

    #[test]
    fn production_is_matched_case_insensitively() {
        let config = ApiConfig {
            environment: "Production".to_string(),
            ..ApiConfig::default()
        };
        assert!(config.is_production());
    }

    #[test]
    fn service_settings_strip_trailing_slash_from_client_url() {
        let config = ApiConfig {
            client_url: "https://jobs.example.com/".to_string(),
            ..ApiConfig::default()
        };
        assert_eq!(config.service_settings().client_url, "https://jobs.example.com");
    }
}
