//! Application state

use metrics_exporter_prometheus::PrometheusHandle;
use salon_auth::{JwtManager, PasswordManager};
use salon_db::Database;
use std::sync::Arc;

/// Prometheus recorder handle rendered at `/metrics`
pub type MetricsHandle = PrometheusHandle;

/// Application state shared across handlers
#[derive(Clone)]
pub struct AppState {
    pub db: Database,
    pub jwt: Arc<JwtManager>,
    pub passwords: PasswordManager,
}

impl AppState {
    pub fn new(db: Database, jwt: Arc<JwtManager>, passwords: PasswordManager) -> Self {
        Self { db, jwt, passwords }
    }
}
