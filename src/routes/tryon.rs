use axum::extract::{Multipart, State};
use axum::{Extension, Json};
use std::time::Duration;

use crate::app_state::AppState;
use crate::auth::AuthedUser;
use crate::error::ApiError;
use crate::models::tryon::{ClothesType, TryOnRequest, TryOnResponse, TryOnResult};
use crate::services::tryon::{run_with_deadline, TryOnPoller};

/// Wall-clock ceiling on one submit-then-poll sequence (~4.6 minutes).
/// The remote job is not cancelled when this fires.
const OVERALL_DEADLINE: Duration = Duration::from_secs(276);

/// POST /api/v1/tryon — submit a person photo and a garment photo, wait
/// for the provider to generate the composite image.
pub async fn submit_tryon(
    State(state): State<AppState>,
    Extension(user): Extension<AuthedUser>,
    mut multipart: Multipart,
) -> Result<Json<TryOnResponse>, ApiError> {
    let mut person_image: Vec<u8> = Vec::new();
    let mut garment_image: Vec<u8> = Vec::new();
    let mut clothes_type = ClothesType::default();

    while let Some(field) = multipart
        .next_field()
        .await
        .map_err(|e| ApiError::bad_request(format!("invalid multipart body: {e}")))?
    {
        match field.name() {
            Some("custom_model") => {
                person_image = field
                    .bytes()
                    .await
                    .map_err(|e| ApiError::bad_request(format!("failed to read custom_model: {e}")))?
                    .to_vec();
            }
            Some("clothes_image") => {
                garment_image = field
                    .bytes()
                    .await
                    .map_err(|e| ApiError::bad_request(format!("failed to read clothes_image: {e}")))?
                    .to_vec();
            }
            Some("clothes_type") => {
                let text = field
                    .text()
                    .await
                    .map_err(|e| ApiError::bad_request(format!("failed to read clothes_type: {e}")))?;
                clothes_type = text
                    .parse()
                    .map_err(|_| ApiError::bad_request(format!("unknown clothes_type: {text}")))?;
            }
            _ => {}
        }
    }

    // Missing fields stay empty; the poller rejects them before any
    // provider call is made.
    let request = TryOnRequest {
        person_image,
        garment_image,
        clothes_type,
    };

    let request_id = uuid::Uuid::new_v4();
    tracing::info!(
        request_id = %request_id,
        user = %user.user_id,
        clothes_type = %clothes_type,
        "try-on request received"
    );
    metrics::counter!("tryon_jobs_total").increment(1);

    let start = std::time::Instant::now();
    let poller = TryOnPoller::new(state.tryon.clone());

    let outcome = run_with_deadline(&poller, &request, OVERALL_DEADLINE).await;

    metrics::histogram!("tryon_duration_seconds").record(start.elapsed().as_secs_f64());

    match outcome {
        Ok(output_image_url) => {
            metrics::counter!("tryon_jobs_succeeded").increment(1);
            Ok(Json(TryOnResponse {
                result: TryOnResult { output_image_url },
            }))
        }
        Err(err) => {
            metrics::counter!("tryon_jobs_failed").increment(1);
            let response = ApiError::from(err);
            tracing::warn!(
                request_id = %request_id,
                user = %user.user_id,
                status = %response.status(),
                error = ?response,
                "try-on request failed"
            );
            Err(response)
        }
    }
}
