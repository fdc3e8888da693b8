//! Application state management
//!
//! This module provides the shared application state that is passed
//! to all request handlers via Axum's state extraction.
//!
//! State is built once at startup and read-only afterwards; every field
//! is cheap to clone.

use crate::auth::{CookiePolicy, TokenCodec};
use crate::config::AppConfig;
use crate::storage::UploadStore;
use metrics_exporter_prometheus::PrometheusHandle;
use sqlx::PgPool;
use std::sync::Arc;

/// Shared application state
#[derive(Clone)]
pub struct AppState {
    /// Database connection pool
    pub db: PgPool,
    /// Application configuration
    pub config: Arc<AppConfig>,
    /// Session token codec with pre-computed keys
    pub tokens: TokenCodec,
    /// Session cookie attributes
    pub cookies: CookiePolicy,
    /// Cover image storage
    pub uploads: UploadStore,
    /// Prometheus handle, absent when no recorder is installed
    pub metrics: Option<PrometheusHandle>,
}

impl AppState {
    /// Create a new application state
    ///
    /// Derives the token signing keys from the configured secret, so call
    /// this once at startup.
    pub fn new(db: PgPool, config: AppConfig) -> Self {
        let tokens = TokenCodec::new(&config.session.secret, config.session.expiry_secs);
        let cookies = CookiePolicy::new(config.session.cookie_secure);
        let uploads = UploadStore::new(&config.uploads.dir);

        Self {
            db,
            config: Arc::new(config),
            tokens,
            cookies,
            uploads,
            metrics: None,
        }
    }

    /// Attach the Prometheus handle rendered by `/metrics`
    pub fn with_metrics(mut self, handle: PrometheusHandle) -> Self {
        self.metrics = Some(handle);
        self
    }

    /// Get a reference to the database pool
    #[inline]
    pub fn db(&self) -> &PgPool {
        &self.db
    }

    /// Get a reference to the configuration
    #[inline]
    pub fn config(&self) -> &AppConfig {
        &self.config
    }

    /// Get a reference to the session token codec
    #[inline]
    pub fn tokens(&self) -> &TokenCodec {
        &self.tokens
    }
}
