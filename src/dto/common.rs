use serde::Serialize;
use utoipa::ToSchema;

/// Acknowledgement body of the attendance actions.
#[derive(Debug, Serialize, ToSchema)]
pub struct MessageResponse {
    /// Human readable outcome.
    pub message: String,
}

impl MessageResponse {
    /// Wrap `message`.
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
        }
    }
}
