use serde::{Deserialize, Serialize};

/// Catalog product surfaced in analysis recommendations.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Product {
    pub id: String,
    pub name: String,
    pub category: String,
    pub description: String,
    pub price: f64,
    pub image: String,
    pub tags: Vec<String>,
}
