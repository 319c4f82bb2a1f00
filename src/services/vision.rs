use reqwest::Client;
use serde::Deserialize;

const ANTHROPIC_VERSION: &str = "2023-06-01";
const MAX_TOKENS: u32 = 1024;

const STYLING_PROMPT: &str = "Give styling advice for the person in this photo. \
Describe what they are wearing, what works, and what could be improved. \
Mention specific garment types and colors where relevant.";

/// Client for the Anthropic Messages API (vision).
pub struct AnthropicClient {
    http: Client,
    base_url: String,
    api_key: String,
    model: String,
}

#[derive(Debug, Deserialize)]
struct MessagesResponse {
    content: Vec<ContentBlock>,
}

#[derive(Debug, Deserialize)]
struct ContentBlock {
    #[serde(default)]
    text: Option<String>,
}

impl AnthropicClient {
    pub fn new(base_url: &str, api_key: &str, model: &str) -> Self {
        Self {
            http: Client::new(),
            base_url: base_url.trim_end_matches('/').to_string(),
            api_key: api_key.to_string(),
            model: model.to_string(),
        }
    }

    /// Send one outfit photo to the vision model and return free-text advice.
    pub async fn analyze_outfit(&self, image: &str) -> Result<String, VisionError> {
        use base64::Engine;

        let (media_type, data) = split_data_url(image);

        // Reject garbage payloads locally rather than burning a model call.
        base64::engine::general_purpose::STANDARD
            .decode(data)
            .map_err(|_| VisionError::InvalidImage)?;

        let request_body = serde_json::json!({
            "model": self.model,
            "max_tokens": MAX_TOKENS,
            "messages": [{
                "role": "user",
                "content": [{
                    "type": "image",
                    "source": {
                        "type": "base64",
                        "media_type": media_type,
                        "data": data
                    }
                }, {
                    "type": "text",
                    "text": STYLING_PROMPT
                }]
            }]
        });

        let response = self
            .http
            .post(format!("{}/v1/messages", self.base_url))
            .header("x-api-key", &self.api_key)
            .header("anthropic-version", ANTHROPIC_VERSION)
            .json(&request_body)
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(VisionError::Upstream {
                status: status.as_u16(),
                body,
            });
        }

        let parsed: MessagesResponse = response.json().await?;
        parsed
            .content
            .into_iter()
            .find_map(|block| block.text)
            .ok_or(VisionError::EmptyResponse)
    }
}

/// Split an optional `data:image/...;base64,` prefix off a base64 payload.
/// Bare base64 is assumed to be JPEG, matching what the capture UI sends.
pub fn split_data_url(image: &str) -> (&str, &str) {
    if let Some(rest) = image.strip_prefix("data:") {
        if let Some((media_type, data)) = rest.split_once(";base64,") {
            return (media_type, data);
        }
    }
    ("image/jpeg", image)
}

#[derive(Debug, thiserror::Error)]
pub enum VisionError {
    #[error("image payload is not valid base64")]
    InvalidImage,

    #[error("request to vision model failed: {0}")]
    Http(#[from] reqwest::Error),

    #[error("vision model returned HTTP {status}")]
    Upstream { status: u16, body: String },

    #[error("vision model returned no text content")]
    EmptyResponse,
}
