//! Service wiring: store, collaborators and the token validator.

use std::sync::Arc;

use anyhow::Context;

use jobboard_auth::{Argon2Hasher, Hs256Jwt, JwtValidator};
use jobboard_infra::collaborators::{LocalBlobStore, LogMailer};
use jobboard_infra::store::{InMemoryStore, JobBoardStore, PostgresStore};
use jobboard_infra::JobBoard;

use crate::config::ApiConfig;

/// Everything the router needs at runtime.
#[derive(Clone)]
pub struct AppServices {
    pub board: JobBoard,
    pub jwt: Arc<dyn JwtValidator>,
}

impl AppServices {
    pub fn new(board: JobBoard, jwt: Arc<dyn JwtValidator>) -> Self {
        Self { board, jwt }
    }
}

/// Postgres when `DATABASE_URL` is set, the in-memory store otherwise.
pub async fn build_services(config: &ApiConfig) -> anyhow::Result<AppServices> {
    let store: Arc<dyn JobBoardStore> = match &config.database_url {
        Some(url) => {
            let store = PostgresStore::connect(url)
                .await
                .context("failed to connect to postgres")?;
            tracing::info!("using postgres document store");
            Arc::new(store)
        }
        None => {
            tracing::warn!("DATABASE_URL not set; data lives in memory and is lost on restart");
            Arc::new(InMemoryStore::new())
        }
    };

    let jwt = Arc::new(Hs256Jwt::new(config.jwt_secret.as_bytes()));
    let blobs = LocalBlobStore::new(config.upload_dir.clone(), config.public_base_url.clone());
    let board = JobBoard::new(
        store,
        Arc::new(Argon2Hasher),
        jwt.clone(),
        Arc::new(LogMailer),
        Arc::new(blobs),
        config.service_settings(),
    );

    Ok(AppServices::new(board, jwt))
}
