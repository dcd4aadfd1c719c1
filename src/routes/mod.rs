// Route exports
pub mod health;
pub mod recipes;
pub mod session;
pub mod users;

use actix_web::web;
use crate::core::RecipeFinder;
use crate::error::ApiError;
use crate::models::{Recipe, SessionContext, UserAccount};
use crate::services::{AppwriteClient, Authenticator, CacheError, CacheKey, CacheManager, DocumentLocks};
use std::sync::Arc;

/// Application state shared across all handlers
#[derive(Clone)]
pub struct AppState {
    pub appwrite: Arc<AppwriteClient>,
    pub cache: Arc<CacheManager>,
    pub locks: Arc<DocumentLocks>,
    pub auth: Arc<Authenticator>,
    pub finder: RecipeFinder,
}

impl AppState {
    /// The full recipe catalogue, served from cache when warm.
    ///
    /// Cache failures only cost a store round trip; store failures surface
    /// as data-unavailable.
    pub async fn recipes(&self) -> Result<Vec<Recipe>, ApiError> {
        let key = CacheKey::recipes();
        match self.cache.get::<Vec<Recipe>>(&key).await {
            Ok(recipes) => return Ok(recipes),
            Err(CacheError::CacheMiss(_)) => {}
            Err(e) => tracing::warn!("Recipe cache read failed, falling back to store: {}", e),
        }

        let recipes = self.appwrite.list_recipes().await?;
        if let Err(e) = self.cache.set(&key, &recipes).await {
            tracing::warn!("Failed to cache recipe catalogue: {}", e);
        }

        tracing::debug!("Loaded {} recipes from store", recipes.len());
        Ok(recipes)
    }

    /// Drop the cached catalogue after any recipe write
    pub async fn invalidate_recipes(&self) {
        if let Err(e) = self.cache.delete(&CacheKey::recipes()).await {
            tracing::warn!("Failed to invalidate recipe cache: {}", e);
        }
    }

    /// Ingredient dictionary titles, cached like the catalogue
    pub async fn ingredient_titles(&self) -> Result<Vec<String>, ApiError> {
        let key = CacheKey::ingredient_titles();
        match self.cache.get::<Vec<String>>(&key).await {
            Ok(titles) => return Ok(titles),
            Err(CacheError::CacheMiss(_)) => {}
            Err(e) => tracing::warn!("Ingredient cache read failed, falling back to store: {}", e),
        }

        let titles = self.appwrite.list_ingredient_titles().await?;
        if let Err(e) = self.cache.set(&key, &titles).await {
            tracing::warn!("Failed to cache ingredient titles: {}", e);
        }
        Ok(titles)
    }

    /// The caller's account document, always read from the store
    pub async fn account(&self, session: &SessionContext) -> Result<UserAccount, ApiError> {
        Ok(self.appwrite.get_user(&session.user_id).await?)
    }
}

pub fn configure_routes(cfg: &mut web::ServiceConfig) {
    cfg.service(
        web::scope("/api/v1")
            .configure(health::configure)
            .configure(recipes::configure)
            .configure(users::configure),
    );
}
