use async_trait::async_trait;
use reqwest::multipart::{Form, Part};
use reqwest::Client;
use serde::Deserialize;
use std::time::Duration;

use crate::models::tryon::TryOnRequest;

/// Provider body code for an accepted/completed request.
const CODE_SUCCESS: i64 = 100_000;
/// Provider body code for a job still being generated.
const CODE_IN_PROGRESS: i64 = 300_102;

/// Fixed polling ceiling: 30 attempts at 2 s apart (~1 minute of polling).
pub const MAX_POLL_ATTEMPTS: u32 = 30;
pub const POLL_INTERVAL: Duration = Duration::from_secs(2);

/// Poll cadence, split out so tests can shrink it.
#[derive(Debug, Clone)]
pub struct PollPolicy {
    pub max_attempts: u32,
    pub interval: Duration,
}

impl Default for PollPolicy {
    fn default() -> Self {
        Self {
            max_attempts: MAX_POLL_ATTEMPTS,
            interval: POLL_INTERVAL,
        }
    }
}

// ── Provider wire types ─────────────────────────────────────────────────

#[derive(Debug, Deserialize)]
pub struct CreateJobResponse {
    pub code: i64,
    #[serde(default)]
    pub result: Option<CreateJobResult>,
    #[serde(default)]
    pub message: Option<ProviderMessage>,
}

#[derive(Debug, Deserialize)]
pub struct CreateJobResult {
    pub job_id: String,
}

#[derive(Debug, Deserialize)]
pub struct GetJobResponse {
    pub code: i64,
    #[serde(default)]
    pub result: Option<GetJobResult>,
    #[serde(default)]
    pub message: Option<ProviderMessage>,
}

#[derive(Debug, Deserialize)]
pub struct GetJobResult {
    #[serde(default)]
    pub output_image_url: Vec<String>,
}

#[derive(Debug, Deserialize)]
pub struct ProviderMessage {
    #[serde(default)]
    pub en: Option<String>,
}

/// Decoded state of a get-job response. The numeric provider codes are
/// interpreted here and nowhere else.
#[derive(Debug, PartialEq)]
pub enum JobState {
    Finished(Vec<String>),
    InProgress,
    Failed(String),
}

impl JobState {
    pub fn decode(response: GetJobResponse) -> Self {
        match response.code {
            CODE_SUCCESS => {
                let urls = response.result.map(|r| r.output_image_url).unwrap_or_default();
                if urls.is_empty() {
                    // Success code without an image is a provider bug; treat as failure.
                    JobState::Failed(provider_message(response.message, "try-on job returned no image"))
                } else {
                    JobState::Finished(urls)
                }
            }
            CODE_IN_PROGRESS => JobState::InProgress,
            _ => JobState::Failed(provider_message(response.message, "try-on job failed")),
        }
    }
}

fn provider_message(message: Option<ProviderMessage>, fallback: &str) -> String {
    message
        .and_then(|m| m.en)
        .unwrap_or_else(|| fallback.to_string())
}

// ── Errors ──────────────────────────────────────────────────────────────

#[derive(Debug, thiserror::Error)]
pub enum TryOnError {
    #[error("{0}")]
    Precondition(String),

    #[error("{message}")]
    Provider { message: String },

    #[error("try-on provider returned HTTP {status}")]
    Upstream { status: u16, body: String },

    #[error("request to try-on provider failed: {0}")]
    Http(#[from] reqwest::Error),

    #[error("try-on generation timed out")]
    Timeout,
}

// ── Provider seam ───────────────────────────────────────────────────────

/// Remote try-on job API. Production uses [`VModelClient`]; tests script
/// responses through an in-process fake.
#[async_trait]
pub trait TryOnProvider: Send + Sync {
    async fn create_job(&self, request: &TryOnRequest) -> Result<CreateJobResponse, TryOnError>;
    async fn get_job(&self, job_id: &str) -> Result<GetJobResponse, TryOnError>;
}

/// Client for the VModel AI virtual try-on API.
pub struct VModelClient {
    http: Client,
    base_url: String,
    api_key: String,
}

impl VModelClient {
    pub fn new(base_url: &str, api_key: &str) -> Self {
        Self {
            http: Client::new(),
            base_url: base_url.trim_end_matches('/').to_string(),
            api_key: api_key.to_string(),
        }
    }

    fn image_part(bytes: &[u8], file_name: &'static str) -> Result<Part, TryOnError> {
        let format = image::guess_format(bytes)
            .map_err(|_| TryOnError::Precondition(format!("{file_name} is not a recognizable image")))?;
        Part::bytes(bytes.to_vec())
            .file_name(file_name)
            .mime_str(format.to_mime_type())
            .map_err(TryOnError::Http)
    }

    async fn check_status(response: reqwest::Response) -> Result<reqwest::Response, TryOnError> {
        let status = response.status();
        if status.is_success() {
            return Ok(response);
        }
        let body = response.text().await.unwrap_or_default();
        Err(TryOnError::Upstream {
            status: status.as_u16(),
            body,
        })
    }
}

#[async_trait]
impl TryOnProvider for VModelClient {
    async fn create_job(&self, request: &TryOnRequest) -> Result<CreateJobResponse, TryOnError> {
        let form = Form::new()
            .part("custom_model", Self::image_part(&request.person_image, "custom_model")?)
            .part("clothes_image", Self::image_part(&request.garment_image, "clothes_image")?)
            .text("clothes_type", request.clothes_type.to_string());

        let response = self
            .http
            .post(format!("{}/create-job", self.base_url))
            .bearer_auth(&self.api_key)
            .header(reqwest::header::ACCEPT, "application/json")
            .multipart(form)
            .send()
            .await?;

        Ok(Self::check_status(response).await?.json().await?)
    }

    async fn get_job(&self, job_id: &str) -> Result<GetJobResponse, TryOnError> {
        let response = self
            .http
            .get(format!("{}/get-job/{}", self.base_url, job_id))
            .bearer_auth(&self.api_key)
            .header(reqwest::header::ACCEPT, "application/json")
            .send()
            .await?;

        Ok(Self::check_status(response).await?.json().await?)
    }
}

#[async_trait]
impl<P> TryOnProvider for std::sync::Arc<P>
where
    P: TryOnProvider + ?Sized,
{
    async fn create_job(&self, request: &TryOnRequest) -> Result<CreateJobResponse, TryOnError> {
        (**self).create_job(request).await
    }

    async fn get_job(&self, job_id: &str) -> Result<GetJobResponse, TryOnError> {
        (**self).get_job(job_id).await
    }
}

// ── Poller ──────────────────────────────────────────────────────────────

/// Submits one try-on job and polls it to a terminal state. Holds no state
/// across calls; each run owns its own job id and attempt counter.
pub struct TryOnPoller<P> {
    provider: P,
    policy: PollPolicy,
}

impl<P: TryOnProvider> TryOnPoller<P> {
    pub fn new(provider: P) -> Self {
        Self::with_policy(provider, PollPolicy::default())
    }

    pub fn with_policy(provider: P, policy: PollPolicy) -> Self {
        Self { provider, policy }
    }

    /// Run the submit-then-poll sequence, returning the provider's output
    /// image URLs (non-empty on success).
    pub async fn run(&self, request: &TryOnRequest) -> Result<Vec<String>, TryOnError> {
        validate_image(&request.person_image, "custom_model")?;
        validate_image(&request.garment_image, "clothes_image")?;

        let created = self.provider.create_job(request).await?;
        let job_id = match (created.code, created.result) {
            (CODE_SUCCESS, Some(result)) if !result.job_id.is_empty() => result.job_id,
            _ => {
                return Err(TryOnError::Provider {
                    message: provider_message(created.message, "failed to create try-on job"),
                })
            }
        };

        tracing::info!(job_id = %job_id, clothes_type = %request.clothes_type, "try-on job created");

        for attempt in 0..self.policy.max_attempts {
            let response = self.provider.get_job(&job_id).await?;

            match JobState::decode(response) {
                JobState::Finished(urls) => {
                    tracing::info!(job_id = %job_id, attempts = attempt + 1, "try-on job finished");
                    metrics::histogram!("tryon_poll_attempts").record((attempt + 1) as f64);
                    return Ok(urls);
                }
                JobState::Failed(message) => {
                    tracing::warn!(job_id = %job_id, error = %message, "try-on job failed");
                    return Err(TryOnError::Provider { message });
                }
                JobState::InProgress => {
                    tracing::debug!(job_id = %job_id, attempt = attempt + 1, "try-on job in progress");
                    if attempt + 1 < self.policy.max_attempts {
                        tokio::time::sleep(self.policy.interval).await;
                    }
                }
            }
        }

        tracing::warn!(
            max_attempts = self.policy.max_attempts,
            "try-on job did not finish within the polling budget"
        );
        Err(TryOnError::Timeout)
    }
}

/// Run one poll sequence under an overall wall-clock ceiling. Expiry maps
/// to the same timeout class as the exhausted poll budget; the remote job
/// is not cancelled and may keep running at the provider.
pub async fn run_with_deadline<P: TryOnProvider>(
    poller: &TryOnPoller<P>,
    request: &TryOnRequest,
    deadline: Duration,
) -> Result<Vec<String>, TryOnError> {
    tokio::time::timeout(deadline, poller.run(request))
        .await
        .unwrap_or(Err(TryOnError::Timeout))
}

/// Reject missing or non-image payloads before any network call is made.
fn validate_image(bytes: &[u8], field: &str) -> Result<(), TryOnError> {
    if bytes.is_empty() {
        return Err(TryOnError::Precondition(format!("missing or empty {field} image")));
    }
    image::guess_format(bytes)
        .map_err(|_| TryOnError::Precondition(format!("{field} is not a recognizable image")))?;
    Ok(())
}
