use crate::models::{Recipe, UserAccount};
use reqwest::{Client, Method, RequestBuilder, Response, StatusCode};
use serde::de::DeserializeOwned;
use serde_json::{json, Value};
use std::time::Duration;
use thiserror::Error;

/// Default number of documents requested per page
pub const DEFAULT_PAGE_SIZE: usize = 100;

/// Errors that can occur when interacting with Appwrite
#[derive(Debug, Error)]
pub enum AppwriteError {
    #[error("HTTP request failed: {0}")]
    RequestError(#[from] reqwest::Error),

    #[error("API returned error: {0}")]
    ApiError(String),

    #[error("Not found: {0}")]
    NotFound(String),

    #[error("Document already exists: {0}")]
    Conflict(String),

    #[error("Unauthorized: invalid API key or token")]
    Unauthorized,

    #[error("Invalid response format: {0}")]
    InvalidResponse(String),
}

/// Appwrite API client
///
/// Owns every persistence call of the service:
/// - Full scans and category queries over the recipe collection
/// - Recipe creation, patching and deletion
/// - User account documents
/// - The ingredient dictionary used for preference suggestions
pub struct AppwriteClient {
    base_url: String,
    api_key: String,
    project_id: String,
    database_id: String,
    client: Client,
    collections: AppwriteCollections,
    page_size: usize,
}

/// Collection IDs in Appwrite
#[derive(Debug, Clone)]
pub struct AppwriteCollections {
    pub recipes: String,
    pub users: String,
    pub ingredients: String,
}

/// Document id of a user's account. Appwrite ids cannot hold an email,
/// so the email is mapped to a stable UUIDv5.
pub fn user_document_id(email: &str) -> String {
    uuid::Uuid::new_v5(&uuid::Uuid::NAMESPACE_OID, email.trim().to_lowercase().as_bytes())
        .simple()
        .to_string()
}

/// Convert a raw Appwrite document into a model, exposing `$id` as `id`
pub fn document_into<T: DeserializeOwned>(doc: &Value) -> Result<T, AppwriteError> {
    let mut data = doc.get("data").unwrap_or(doc).clone();

    if let Some(obj) = data.as_object_mut() {
        if !obj.contains_key("id") {
            if let Some(id) = doc.get("$id").cloned() {
                obj.insert("id".to_string(), id);
            }
        }
    }

    serde_json::from_value(data)
        .map_err(|e| AppwriteError::InvalidResponse(format!("Failed to parse document: {}", e)))
}

impl AppwriteClient {
    /// Create a new Appwrite client
    pub fn new(
        base_url: String,
        api_key: String,
        project_id: String,
        database_id: String,
        collections: AppwriteCollections,
    ) -> Result<Self, AppwriteError> {
        let client = Client::builder()
            .timeout(Duration::from_secs(30))
            .build()?;

        Ok(Self {
            base_url,
            api_key,
            project_id,
            database_id,
            client,
            collections,
            page_size: DEFAULT_PAGE_SIZE,
        })
    }

    /// Override the page size used for full scans
    pub fn with_page_size(mut self, page_size: usize) -> Self {
        self.page_size = page_size.max(1);
        self
    }

    pub fn collections(&self) -> &AppwriteCollections {
        &self.collections
    }

    fn collection_url(&self, collection: &str) -> String {
        format!(
            "{}/databases/{}/collections/{}/documents",
            self.base_url.trim_end_matches('/'),
            self.database_id,
            collection
        )
    }

    fn document_url(&self, collection: &str, document_id: &str) -> String {
        format!(
            "{}/{}",
            self.collection_url(collection),
            urlencoding::encode(document_id)
        )
    }

    fn request(&self, method: Method, url: &str) -> RequestBuilder {
        self.client
            .request(method, url)
            .header("X-Appwrite-Key", &self.api_key)
            .header("X-Appwrite-Project", &self.project_id)
    }

    /// Map non-success statuses onto the error taxonomy
    async fn check_status(response: Response, context: &str) -> Result<Response, AppwriteError> {
        let status = response.status();
        if status.is_success() {
            return Ok(response);
        }

        let body = response
            .text()
            .await
            .unwrap_or_else(|_| "Unable to read body".to_string());

        match status {
            StatusCode::UNAUTHORIZED | StatusCode::FORBIDDEN => Err(AppwriteError::Unauthorized),
            StatusCode::NOT_FOUND => Err(AppwriteError::NotFound(context.to_string())),
            StatusCode::CONFLICT => Err(AppwriteError::Conflict(context.to_string())),
            _ => {
                tracing::error!("{} failed: {} - {}", context, status, body);
                Err(AppwriteError::ApiError(format!("{}: {}", context, status)))
            }
        }
    }

    /// Fetch every document of a collection matching `filters`, page by page
    async fn list_documents(
        &self,
        collection: &str,
        filters: &[Value],
    ) -> Result<Vec<Value>, AppwriteError> {
        let url = self.collection_url(collection);
        let mut documents = Vec::new();
        let mut offset = 0usize;

        loop {
            let mut queries: Vec<Value> = filters.to_vec();
            queries.push(json!({"method": "limit", "values": [self.page_size]}));
            queries.push(json!({"method": "offset", "values": [offset]}));

            let query_string = queries
                .iter()
                .map(|q| format!("queries%5B%5D={}", urlencoding::encode(&q.to_string())))
                .collect::<Vec<_>>()
                .join("&");
            let full_url = format!("{}?{}", url, query_string);

            tracing::debug!("Listing {} documents at offset {}", collection, offset);

            let response = self.request(Method::GET, &full_url).send().await?;
            let response = Self::check_status(response, &format!("List {}", collection)).await?;
            let json: Value = response.json().await?;

            let total = json.get("total").and_then(|t| t.as_u64()).unwrap_or(0) as usize;
            let page = json
                .get("documents")
                .and_then(|d| d.as_array())
                .ok_or_else(|| AppwriteError::InvalidResponse("Missing documents array".into()))?;

            let fetched = page.len();
            documents.extend(page.iter().cloned());
            offset += fetched;

            if fetched < self.page_size || offset >= total {
                break;
            }
        }

        tracing::debug!("Fetched {} documents from {}", documents.len(), collection);
        Ok(documents)
    }

    async fn get_document(&self, collection: &str, document_id: &str) -> Result<Value, AppwriteError> {
        let url = self.document_url(collection, document_id);
        let response = self.request(Method::GET, &url).send().await?;
        let response =
            Self::check_status(response, &format!("Document {} in {}", document_id, collection)).await?;
        Ok(response.json().await?)
    }

    async fn create_document(
        &self,
        collection: &str,
        document_id: &str,
        data: Value,
    ) -> Result<Value, AppwriteError> {
        let url = self.collection_url(collection);
        let payload = json!({
            "documentId": document_id,
            "data": data,
        });

        let response = self.request(Method::POST, &url).json(&payload).send().await?;
        let response =
            Self::check_status(response, &format!("Document {} in {}", document_id, collection)).await?;

        tracing::debug!("Created document {} in {}", document_id, collection);
        Ok(response.json().await?)
    }

    async fn update_document(
        &self,
        collection: &str,
        document_id: &str,
        data: Value,
    ) -> Result<Value, AppwriteError> {
        let url = self.document_url(collection, document_id);
        let payload = json!({ "data": data });

        let response = self.request(Method::PATCH, &url).json(&payload).send().await?;
        let response =
            Self::check_status(response, &format!("Document {} in {}", document_id, collection)).await?;

        tracing::debug!("Updated document {} in {}", document_id, collection);
        Ok(response.json().await?)
    }

    async fn delete_document(&self, collection: &str, document_id: &str) -> Result<(), AppwriteError> {
        let url = self.document_url(collection, document_id);
        let response = self.request(Method::DELETE, &url).send().await?;
        Self::check_status(response, &format!("Document {} in {}", document_id, collection)).await?;

        tracing::debug!("Deleted document {} from {}", document_id, collection);
        Ok(())
    }

    /// Fetch the complete recipe catalogue.
    ///
    /// Documents that fail to parse are skipped with a warning rather than
    /// failing the whole scan.
    pub async fn list_recipes(&self) -> Result<Vec<Recipe>, AppwriteError> {
        let documents = self.list_documents(&self.collections.recipes, &[]).await?;
        Ok(parse_recipes(&documents))
    }

    pub async fn get_recipe(&self, recipe_id: &str) -> Result<Recipe, AppwriteError> {
        let doc = self.get_document(&self.collections.recipes, recipe_id).await?;
        document_into(&doc)
    }

    /// Store a new recipe under its `id`
    pub async fn create_recipe(&self, recipe: &Recipe) -> Result<Recipe, AppwriteError> {
        let mut data = serde_json::to_value(recipe)
            .map_err(|e| AppwriteError::InvalidResponse(format!("Failed to encode recipe: {}", e)))?;
        if let Some(obj) = data.as_object_mut() {
            obj.remove("id");
        }

        let doc = self
            .create_document(&self.collections.recipes, &recipe.id, data)
            .await?;
        document_into(&doc)
    }

    /// Patch selected fields of a recipe document
    pub async fn update_recipe(&self, recipe_id: &str, patch: Value) -> Result<(), AppwriteError> {
        self.update_document(&self.collections.recipes, recipe_id, patch)
            .await
            .map(|_| ())
    }

    pub async fn delete_recipe(&self, recipe_id: &str) -> Result<(), AppwriteError> {
        self.delete_document(&self.collections.recipes, recipe_id).await
    }

    pub async fn get_user(&self, email: &str) -> Result<UserAccount, AppwriteError> {
        let doc = self
            .get_document(&self.collections.users, &user_document_id(email))
            .await
            .map_err(|e| match e {
                AppwriteError::NotFound(_) => {
                    AppwriteError::NotFound(format!("Account not found for user {}", email))
                }
                other => other,
            })?;
        document_into(&doc)
    }

    pub async fn create_user(&self, account: &UserAccount) -> Result<UserAccount, AppwriteError> {
        let data = serde_json::to_value(account)
            .map_err(|e| AppwriteError::InvalidResponse(format!("Failed to encode account: {}", e)))?;
        let doc = self
            .create_document(&self.collections.users, &user_document_id(&account.email), data)
            .await?;
        document_into(&doc)
    }

    /// Patch selected fields of a user's account document
    pub async fn update_user(&self, email: &str, patch: Value) -> Result<(), AppwriteError> {
        self.update_document(&self.collections.users, &user_document_id(email), patch)
            .await
            .map(|_| ())
    }

    /// Titles of every ingredient in the ingredient dictionary
    pub async fn list_ingredient_titles(&self) -> Result<Vec<String>, AppwriteError> {
        let documents = self.list_documents(&self.collections.ingredients, &[]).await?;
        Ok(documents
            .iter()
            .filter_map(|doc| {
                doc.get("data")
                    .unwrap_or(doc)
                    .get("title")
                    .and_then(|t| t.as_str())
                    .map(str::to_string)
            })
            .collect())
    }

    /// Cheap reachability probe against the recipe collection
    pub async fn health_check(&self) -> Result<bool, AppwriteError> {
        let limit = json!({"method": "limit", "values": [1]});
        let url = format!(
            "{}?queries%5B%5D={}",
            self.collection_url(&self.collections.recipes),
            urlencoding::encode(&limit.to_string())
        );
        let response = self.request(Method::GET, &url).send().await?;
        Ok(response.status().is_success())
    }
}

fn parse_recipes(documents: &[Value]) -> Vec<Recipe> {
    documents
        .iter()
        .filter_map(|doc| match document_into::<Recipe>(doc) {
            Ok(recipe) => Some(recipe),
            Err(e) => {
                tracing::warn!(
                    "Skipping malformed recipe document {:?}: {}",
                    doc.get("$id"),
                    e
                );
                None
            }
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn create_test_client() -> AppwriteClient {
        let collections = AppwriteCollections {
            recipes: "recipes".to_string(),
            users: "users".to_string(),
            ingredients: "ingredients".to_string(),
        };

        AppwriteClient::new(
            "https://appwrite.test/v1/".to_string(),
            "test_key".to_string(),
            "test_project".to_string(),
            "test_db".to_string(),
            collections,
        )
        .unwrap()
    }

    #[test]
    fn test_appwrite_client_creation() {
        let client = create_test_client();

        assert_eq!(client.base_url, "https://appwrite.test/v1/");
        assert_eq!(client.api_key, "test_key");
        assert_eq!(client.page_size, DEFAULT_PAGE_SIZE);
    }

    #[test]
    fn test_urls() {
        let client = create_test_client();

        assert_eq!(
            client.collection_url("recipes"),
            "https://appwrite.test/v1/databases/test_db/collections/recipes/documents"
        );
        assert_eq!(
            client.document_url("recipes", "abc"),
            "https://appwrite.test/v1/databases/test_db/collections/recipes/documents/abc"
        );
    }

    #[test]
    fn test_user_document_id_is_stable() {
        let a = user_document_id("Cook@Example.com");
        let b = user_document_id("cook@example.com ");

        assert_eq!(a, b);
        assert_eq!(a.len(), 32);
        assert!(a.chars().all(|c| c.is_ascii_hexdigit()));
    }

    #[test]
    fn test_document_into_maps_dollar_id() {
        let doc = json!({
            "$id": "r1",
            "$collectionId": "recipes",
            "title": "Tomato Soup",
            "ingredients": null,
        });

        let recipe: Recipe = document_into(&doc).unwrap();
        assert_eq!(recipe.id, "r1");
        assert!(recipe.ingredients.is_empty());
    }

    #[test]
    fn test_parse_recipes_keeps_off_shape_documents_searchable() {
        let docs = vec![
            json!({
                "$id": "r1",
                "title": "Tomato Soup",
                "ingredients": [{"ingredient": "Tomato"}],
                "ratings": [{"userEmail": "a@x.com", "rating": 4}]
            }),
            json!({"$id": "r2", "ingredients": [{"ingredient": "Chicken"}]}),
            json!({"$id": "r3", "title": "Stew", "saves": -1}),
        ];

        let recipes = parse_recipes(&docs);
        let ids: Vec<_> = recipes.iter().map(|r| r.id.as_str()).collect();
        assert_eq!(ids, vec!["r1", "r2", "r3"]);
        assert_eq!(recipes[0].ratings[0].value, 4);

        let found = crate::core::find(&recipes, &crate::models::Query::ByIngredient("chick".to_string()));
        assert_eq!(found.ids(), vec!["r2"]);
    }

    #[test]
    fn test_parse_recipes_skips_malformed() {
        let docs = vec![
            json!({"$id": "r1", "title": "Soup"}),
            json!({"title": "No id"}),
            json!("not a document"),
        ];

        let recipes = parse_recipes(&docs);
        assert_eq!(recipes.len(), 1);
        assert_eq!(recipes[0].id, "r1");
    }
}
