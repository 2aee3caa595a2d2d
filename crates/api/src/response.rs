//! Small response bodies shared across handlers.
//!
//! Entity payloads are handler-specific structs; only the generic
//! acknowledgements live here.

use serde::Serialize;

/// `{ "message": "..." }` acknowledgement for mutations that return no entity.
#[derive(Debug, Serialize)]
pub struct MessageResponse {
    pub message: &'static str,
}

impl MessageResponse {
    pub fn new(message: &'static str) -> Self {
        Self { message }
    }
}

/// `{ "success": true }` acknowledgement used by internal endpoints.
#[derive(Debug, Serialize)]
pub struct SuccessResponse {
    pub success: bool,
}

impl SuccessResponse {
    pub const OK: SuccessResponse = SuccessResponse { success: true };
}
