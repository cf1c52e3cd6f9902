use serde::Serialize;
use ts_rs::TS;

/// Health response payload.
#[derive(Debug, Serialize, TS)]
#[ts(
    export,
    export_to = "../../../packages/api-types/src/generated/health-response.ts"
)]
pub struct HealthResponse {
    pub status: &'static str,
    pub ready: bool,
    pub postgres: HealthDependencyStatus,
    pub redis: HealthDependencyStatus,
}

/// One runtime dependency health status.
#[derive(Debug, Serialize, TS)]
#[ts(
    export,
    export_to = "../../../packages/api-types/src/generated/health-dependency-status.ts"
)]
pub struct HealthDependencyStatus {
    pub status: &'static str,
    pub detail: Option<String>,
}

/// Success envelope without a payload.
#[derive(Debug, Serialize, TS)]
#[ts(
    export,
    export_to = "../../../packages/api-types/src/generated/message-response.ts"
)]
pub struct MessageResponse {
    pub status: u16,
    pub message: String,
}

impl MessageResponse {
    pub fn ok(message: impl Into<String>) -> Self {
        Self {
            status: 200,
            message: message.into(),
        }
    }
}
