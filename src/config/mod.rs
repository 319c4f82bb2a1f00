use serde::Deserialize;

#[derive(Debug, Deserialize)]
pub struct AppConfig {
    /// Server bind address (e.g., "0.0.0.0:3000").
    #[serde(default = "default_bind_addr")]
    pub bind_addr: String,

    /// VModel API key for the virtual try-on job endpoints
    pub vmodel_api_key: String,

    /// Base URL of the VModel try-on API (overridable for staging)
    #[serde(default = "default_vmodel_base_url")]
    pub vmodel_base_url: String,

    /// Anthropic API key for outfit analysis
    pub anthropic_api_key: String,

    /// Anthropic API base URL
    #[serde(default = "default_anthropic_base_url")]
    pub anthropic_base_url: String,

    /// Vision model used for outfit analysis
    #[serde(default = "default_anthropic_model")]
    pub anthropic_model: String,

    /// HS256 secret used to verify session tokens minted by the identity provider
    pub session_secret: String,
}

fn default_bind_addr() -> String {
    "0.0.0.0:3000".to_string()
}

fn default_vmodel_base_url() -> String {
    "https://developer.vmodel.ai/api/vmodel/v1/ai-virtual-try-on".to_string()
}

fn default_anthropic_base_url() -> String {
    "https://api.anthropic.com".to_string()
}

fn default_anthropic_model() -> String {
    "claude-3-opus-20240229".to_string()
}

impl AppConfig {
    pub fn from_env() -> Result<Self, envy::Error> {
        dotenvy::dotenv().ok();
        envy::from_env()
    }
}
