//! Request/response shapes that belong to the HTTP surface rather than to a
//! stored entity.

use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// POST /api/emotion/classify and /api/emotion/preview
#[derive(Debug, Deserialize)]
pub struct ClassifyRequest {
    #[serde(default)]
    pub text: String,
}

/// Standard delete confirmation
#[derive(Debug, Serialize, Deserialize)]
pub struct DeleteResponse {
    pub deleted: bool,
    pub id: Uuid,
}
