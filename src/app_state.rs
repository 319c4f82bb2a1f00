use std::sync::Arc;

use crate::auth::SessionVerifier;
use crate::services::{tryon::VModelClient, vision::AnthropicClient};

/// Shared application state passed to all route handlers.
#[derive(Clone)]
pub struct AppState {
    pub tryon: Arc<VModelClient>,
    pub vision: Arc<AnthropicClient>,
    pub sessions: Arc<SessionVerifier>,
}

impl AppState {
    pub fn new(tryon: VModelClient, vision: AnthropicClient, sessions: SessionVerifier) -> Self {
        Self {
            tryon: Arc::new(tryon),
            vision: Arc::new(vision),
            sessions: Arc::new(sessions),
        }
    }
}
