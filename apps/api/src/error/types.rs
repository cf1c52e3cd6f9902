use std::collections::BTreeMap;

use serde::Serialize;
use ts_rs::TS;

/// API error payload.
#[derive(Debug, Serialize, TS)]
#[ts(
    export,
    export_to = "../../../packages/api-types/src/generated/error-response.ts"
)]
pub struct ErrorResponse {
    status: u16,
    message: String,
    error: ErrorDetail,
}

impl ErrorResponse {
    pub(super) fn new(status: u16, message: impl Into<String>, error: ErrorDetail) -> Self {
        Self {
            status,
            message: message.into(),
            error,
        }
    }
}

/// Error detail: a message, or messages keyed by input field.
#[derive(Debug, Serialize, TS)]
#[serde(untagged)]
#[ts(
    export,
    export_to = "../../../packages/api-types/src/generated/error-detail.ts"
)]
pub enum ErrorDetail {
    Message(String),
    Fields(BTreeMap<String, Vec<String>>),
}
