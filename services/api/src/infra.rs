use metrics_exporter_prometheus::PrometheusHandle;
use std::sync::atomic::AtomicBool;
use std::sync::Arc;

use invigilator_portal::config::AppConfig;
use invigilator_portal::error::AppError;
use invigilator_portal::PortalState;
use tracing::info;

/// Operational state for the health, readiness and metrics routes.
#[derive(Clone)]
pub(crate) struct AppState {
    pub(crate) readiness: Arc<AtomicBool>,
    pub(crate) metrics: Arc<PrometheusHandle>,
}

/// In-memory portal services, with the configured administrator seeded when one is set.
pub(crate) fn bootstrap_portal(config: &AppConfig) -> Result<PortalState, AppError> {
    let state = PortalState::in_memory(config);
    if let Some(seed) = &config.auth.admin {
        if state.accounts.seed_admin(seed)? {
            info!(email = %seed.email, "administrator account created");
        }
    }
    Ok(state)
}
