use serde::{Deserialize, Serialize};
use crate::models::domain::Recipe;
use crate::services::CacheStats;

/// Response for the search endpoint
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SearchResponse {
    pub recipes: Vec<Recipe>,
    pub total_results: usize,
    pub scanned: usize,
}

/// A list of recipes
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RecipeListResponse {
    pub recipes: Vec<Recipe>,
    pub total_results: usize,
}

/// Rating submission outcome
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RatingResponse {
    #[serde(rename = "averageRating")]
    pub average_rating: Option<f64>,
    #[serde(rename = "ratingCount")]
    pub rating_count: usize,
}

/// Saved-list mutation outcome
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SavedRecipesResponse {
    #[serde(rename = "savedRecipes")]
    pub saved_recipes: Vec<String>,
    pub changed: bool,
}

/// Health check response
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HealthResponse {
    pub status: String,
    pub version: String,
    pub timestamp: chrono::DateTime<chrono::Utc>,
    pub cache: CacheStats,
}

/// Error response
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ErrorResponse {
    pub error: String,
    pub message: String,
    pub status_code: u16,
}
