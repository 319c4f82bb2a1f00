use axum::extract::State;
use axum::{Extension, Json};
use garde::Validate;

use crate::app_state::AppState;
use crate::auth::AuthedUser;
use crate::error::ApiError;
use crate::models::analysis::{AnalyzeRequest, AnalyzeResponse};
use crate::services::catalog;

/// POST /api/v1/analyze — send an outfit photo to the vision model and
/// return styling advice plus matching catalog products.
pub async fn analyze_outfit(
    State(state): State<AppState>,
    Extension(user): Extension<AuthedUser>,
    Json(payload): Json<AnalyzeRequest>,
) -> Result<Json<AnalyzeResponse>, ApiError> {
    payload
        .validate()
        .map_err(|e| ApiError::bad_request(format!("invalid analyze request: {e}")))?;

    metrics::counter!("analyze_requests_total").increment(1);
    tracing::info!(user = %user.user_id, "analyzing outfit photo");

    let advice = state.vision.analyze_outfit(&payload.image).await?;

    let tags = catalog::tags_in_text(&advice);
    let recommendations = catalog::find_products_by_tags(&tags);

    tracing::debug!(
        user = %user.user_id,
        tags = ?tags,
        recommendations = recommendations.len(),
        "outfit analysis complete"
    );

    Ok(Json(AnalyzeResponse {
        advice,
        recommendations,
    }))
}
