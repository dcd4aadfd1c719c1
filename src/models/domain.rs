use serde::de::DeserializeOwned;
use serde::{Deserialize, Deserializer, Serialize};
use serde_json::Value;
use std::collections::BTreeSet;

/// One line of a recipe's ingredient list
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Ingredient {
    pub ingredient: String,
    #[serde(default)]
    pub measure: String,
}

impl Ingredient {
    pub fn new(ingredient: impl Into<String>, measure: impl Into<String>) -> Self {
        Self {
            ingredient: ingredient.into(),
            measure: measure.into(),
        }
    }
}

/// A single user's rating of a recipe as stored on the recipe document
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RatingEntry {
    #[serde(rename = "userEmail")]
    pub user_email: String,
    #[serde(alias = "rating")]
    pub value: u8,
}

/// A comment left on a recipe
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Comment {
    #[serde(rename = "userEmail")]
    pub user_email: String,
    pub content: String,
    #[serde(rename = "createdAt")]
    pub created_at: chrono::DateTime<chrono::Utc>,
}

/// Recipe document
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Recipe {
    pub id: String,
    #[serde(default, deserialize_with = "lenient_string")]
    pub title: String,
    #[serde(default, deserialize_with = "lenient_string")]
    pub category: String,
    #[serde(default, deserialize_with = "lenient_string")]
    pub area: String,
    #[serde(default, deserialize_with = "lenient_list")]
    pub ingredients: Vec<Ingredient>,
    #[serde(default, deserialize_with = "lenient_string")]
    pub instructions: String,
    #[serde(default, deserialize_with = "lenient_tags")]
    pub tags: BTreeSet<String>,
    #[serde(rename = "imageURL", default, deserialize_with = "lenient_string")]
    pub image_url: String,
    #[serde(rename = "averageRating", default, deserialize_with = "lenient_average")]
    pub average_rating: Option<f64>,
    #[serde(default, deserialize_with = "lenient_count")]
    pub saves: u64,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(rename = "chefEmail", default)]
    pub chef_email: Option<String>,
    #[serde(default, deserialize_with = "lenient_list")]
    pub ratings: Vec<RatingEntry>,
    #[serde(default, deserialize_with = "lenient_list")]
    pub comments: Vec<Comment>,
    #[serde(rename = "createdAt", default)]
    pub created_at: Option<chrono::DateTime<chrono::Utc>>,
}

impl Recipe {
    /// Minimal recipe with only the searchable fields set
    pub fn new(id: impl Into<String>, title: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            title: title.into(),
            category: String::new(),
            area: String::new(),
            ingredients: Vec::new(),
            instructions: String::new(),
            tags: BTreeSet::new(),
            image_url: String::new(),
            average_rating: None,
            saves: 0,
            description: None,
            chef_email: None,
            ratings: Vec::new(),
            comments: Vec::new(),
            created_at: None,
        }
    }

    /// Whether the given user authored this recipe
    pub fn is_authored_by(&self, email: &str) -> bool {
        self.chef_email.as_deref() == Some(email)
    }
}

// Stored recipe documents are written by several clients and are not
// always well-formed. Each field below degrades to its default instead of
// failing the whole document.

/// Arrays keep their well-formed entries; any other shape is an empty list.
fn lenient_list<'de, D, T>(deserializer: D) -> Result<Vec<T>, D::Error>
where
    D: Deserializer<'de>,
    T: DeserializeOwned,
{
    let items = match Value::deserialize(deserializer)? {
        Value::Array(items) => items,
        _ => return Ok(Vec::new()),
    };

    Ok(items
        .into_iter()
        .filter_map(|item| serde_json::from_value::<T>(item).ok())
        .collect())
}

fn lenient_tags<'de, D>(deserializer: D) -> Result<BTreeSet<String>, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(lenient_list::<D, String>(deserializer)?.into_iter().collect())
}

/// Strings pass through; null and non-strings become empty.
fn lenient_string<'de, D>(deserializer: D) -> Result<String, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(match Value::deserialize(deserializer)? {
        Value::String(s) => s,
        _ => String::new(),
    })
}

/// Non-negative integers pass through; negatives, fractions and other
/// shapes clamp or fall back to zero.
fn lenient_count<'de, D>(deserializer: D) -> Result<u64, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(match Value::deserialize(deserializer)? {
        Value::Number(n) => n
            .as_u64()
            .or_else(|| n.as_f64().filter(|f| f.is_finite() && *f > 0.0).map(|f| f as u64))
            .unwrap_or(0),
        _ => 0,
    })
}

fn lenient_average<'de, D>(deserializer: D) -> Result<Option<f64>, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(match Value::deserialize(deserializer)? {
        Value::Number(n) => n.as_f64(),
        _ => None,
    })
}

/// Account role
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    #[default]
    Normal,
    Chef,
}

/// User account document, keyed by email
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct UserAccount {
    #[serde(default)]
    pub uid: String,
    pub email: String,
    #[serde(default)]
    pub username: String,
    #[serde(default)]
    pub role: Role,
    #[serde(default)]
    pub preferences: Vec<String>,
    #[serde(rename = "savedRecipes", alias = "savedRecipies", default)]
    pub saved_recipes: Vec<String>,
    #[serde(rename = "profilePicture", default)]
    pub profile_picture: String,
    #[serde(rename = "createdAt", default)]
    pub created_at: Option<chrono::DateTime<chrono::Utc>>,
}

impl UserAccount {
    pub fn new(email: impl Into<String>, username: impl Into<String>, role: Role) -> Self {
        Self {
            uid: uuid::Uuid::new_v4().to_string(),
            email: email.into(),
            username: username.into(),
            role,
            preferences: Vec::new(),
            saved_recipes: Vec::new(),
            profile_picture: String::new(),
            created_at: Some(chrono::Utc::now()),
        }
    }

    pub fn is_chef(&self) -> bool {
        self.role == Role::Chef
    }

    /// Add a recipe to the saved list. Returns `true` if the list changed.
    pub fn save_recipe(&mut self, recipe_id: &str) -> bool {
        if self.saved_recipes.iter().any(|id| id == recipe_id) {
            return false;
        }
        self.saved_recipes.push(recipe_id.to_string());
        true
    }

    /// Remove a recipe from the saved list. Returns `true` if the list changed.
    pub fn unsave_recipe(&mut self, recipe_id: &str) -> bool {
        let before = self.saved_recipes.len();
        self.saved_recipes.retain(|id| id != recipe_id);
        self.saved_recipes.len() != before
    }

    /// Append new preference terms, keeping existing order and skipping blanks
    /// and duplicates. Returns the number of terms added.
    pub fn merge_preferences<I, S>(&mut self, terms: I) -> usize
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let mut added = 0;
        for term in terms {
            let term = term.as_ref().trim();
            if term.is_empty() || self.preferences.iter().any(|p| p == term) {
                continue;
            }
            self.preferences.push(term.to_string());
            added += 1;
        }
        added
    }
}

/// Identity of the caller, derived from a verified bearer token.
///
/// Handed explicitly to every operation that acts on behalf of a user.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SessionContext {
    pub user_id: String,
}

impl SessionContext {
    pub fn new(user_id: impl Into<String>) -> Self {
        Self {
            user_id: user_id.into(),
        }
    }
}

/// Search query, exactly one mode per invocation
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Query {
    ByTitle(String),
    ByIngredient(String),
    ByPreferences(BTreeSet<String>),
}
