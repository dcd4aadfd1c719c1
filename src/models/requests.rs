use serde::{Deserialize, Serialize};
use validator::Validate;
use crate::models::domain::{Ingredient, Query, Role};

/// Search mode selector
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SearchMode {
    Title,
    Ingredient,
    Preferences,
}

/// Request to search recipes
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SearchRequest {
    pub mode: SearchMode,
    #[serde(default)]
    pub text: Option<String>,
    #[serde(default)]
    pub terms: Option<Vec<String>>,
}

impl SearchRequest {
    /// Build the finder query. Preferences mode falls back to `stored`
    /// when the request carries no terms of its own.
    pub fn to_query(&self, stored: &[String]) -> Query {
        match self.mode {
            SearchMode::Title => Query::ByTitle(self.text.clone().unwrap_or_default()),
            SearchMode::Ingredient => Query::ByIngredient(self.text.clone().unwrap_or_default()),
            SearchMode::Preferences => {
                let terms = self.terms.as_deref().unwrap_or(stored);
                Query::ByPreferences(terms.iter().cloned().collect())
            }
        }
    }

    /// Whether answering this request needs the caller's stored preferences
    pub fn needs_stored_preferences(&self) -> bool {
        self.mode == SearchMode::Preferences && self.terms.is_none()
    }
}

/// Request to publish a new recipe
#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
pub struct CreateRecipeRequest {
    #[validate(length(min = 1, max = 200))]
    pub title: String,
    #[serde(default)]
    pub category: String,
    #[serde(default)]
    pub area: String,
    #[serde(default)]
    pub ingredients: Vec<Ingredient>,
    #[validate(length(min = 1))]
    pub instructions: String,
    #[serde(default)]
    pub tags: Vec<String>,
    #[serde(rename = "imageURL", default)]
    pub image_url: String,
    #[serde(default)]
    pub description: Option<String>,
}

/// Request to comment on a recipe
#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
pub struct AddCommentRequest {
    #[validate(length(min = 1, max = 2000))]
    pub content: String,
}

/// Request to rate a recipe
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RateRecipeRequest {
    pub value: i64,
}

/// Request to create the caller's account document
#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
pub struct CreateAccountRequest {
    #[validate(length(min = 1, max = 64))]
    pub username: String,
    #[serde(default)]
    pub role: Role,
    #[serde(rename = "profilePicture", default)]
    pub profile_picture: String,
}

/// Request to add food preferences
#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
pub struct UpdatePreferencesRequest {
    #[validate(length(min = 1))]
    pub preferences: Vec<String>,
}

/// Query string for listing recipes
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ListRecipesParams {
    pub category: Option<String>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_preferences_fall_back_to_stored_terms() {
        let req: SearchRequest = serde_json::from_str(r#"{"mode":"preferences"}"#).unwrap();
        let stored = vec!["Italian".to_string()];

        assert!(req.needs_stored_preferences());
        assert_eq!(
            req.to_query(&stored),
            Query::ByPreferences(["Italian".to_string()].into_iter().collect())
        );
    }

    #[test]
    fn test_explicit_terms_win() {
        let req: SearchRequest =
            serde_json::from_str(r#"{"mode":"preferences","terms":["Main"]}"#).unwrap();

        assert!(!req.needs_stored_preferences());
        assert_eq!(
            req.to_query(&["Italian".to_string()]),
            Query::ByPreferences(["Main".to_string()].into_iter().collect())
        );
    }

    #[test]
    fn test_missing_text_is_empty_query() {
        let req: SearchRequest = serde_json::from_str(r#"{"mode":"title"}"#).unwrap();
        assert_eq!(req.to_query(&[]), Query::ByTitle(String::new()));
    }
}
