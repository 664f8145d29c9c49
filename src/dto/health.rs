use serde::Serialize;
use utoipa::ToSchema;

/// Whether requests can currently reach the store.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, ToSchema)]
#[serde(rename_all = "lowercase")]
pub enum HealthStatus {
    /// A store is installed and answering.
    Ok,
    /// No usable store; data endpoints answer 503.
    Degraded,
}

/// Body of `/healthcheck`.
#[derive(Debug, Serialize, ToSchema)]
pub struct HealthResponse {
    /// Current storage status.
    pub status: HealthStatus,
}

impl HealthResponse {
    /// Map the degraded flag of the shared state.
    pub fn from_degraded(degraded: bool) -> Self {
        let status = if degraded {
            HealthStatus::Degraded
        } else {
            HealthStatus::Ok
        };
        Self { status }
    }
}
