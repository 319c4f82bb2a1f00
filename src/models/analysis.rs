use garde::Validate;
use serde::{Deserialize, Serialize};

use crate::models::product::Product;

/// Request to analyze an outfit photo. The image is raw base64 or a
/// `data:image/...;base64,` data URL, matching what browser canvases emit.
#[derive(Debug, Deserialize, Validate)]
pub struct AnalyzeRequest {
    #[garde(length(min = 1))]
    pub image: String,
}

/// Styling advice for one photo, plus any catalog products whose tags
/// appear in the advice text. Exists only in the response payload.
#[derive(Debug, Serialize)]
pub struct AnalyzeResponse {
    pub advice: String,

    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub recommendations: Vec<Product>,
}
