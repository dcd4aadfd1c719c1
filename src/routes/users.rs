use actix_web::{web, HttpResponse};
use serde_json::json;
use validator::Validate;
use crate::error::ApiError;
use crate::models::{
    CreateAccountRequest, Recipe, RecipeListResponse, SavedRecipesResponse, SessionContext,
    UpdatePreferencesRequest, UserAccount,
};
use crate::routes::AppState;
use std::collections::HashMap;

/// Configure all account-related routes
pub fn configure(cfg: &mut web::ServiceConfig) {
    cfg
        .route("/users", web::post().to(create_account))
        .route("/users/me", web::get().to(get_account))
        .route("/users/me/preferences", web::put().to(update_preferences))
        .route("/users/me/saved", web::get().to(list_saved))
        .route("/users/me/saved/{recipe_id}", web::post().to(save_recipe))
        .route("/users/me/saved/{recipe_id}", web::delete().to(unsave_recipe));
}

/// Create the caller's account on first sign-in
///
/// POST /api/v1/users
async fn create_account(
    state: web::Data<AppState>,
    session: SessionContext,
    req: web::Json<CreateAccountRequest>,
) -> Result<HttpResponse, ApiError> {
    req.validate()?;

    let mut account = UserAccount::new(session.user_id.clone(), req.username.trim(), req.role);
    account.profile_picture = req.profile_picture.clone();

    let created = state.appwrite.create_user(&account).await?;

    tracing::info!("Created {:?} account for {}", created.role, session.user_id);

    Ok(HttpResponse::Created().json(created))
}

/// GET /api/v1/users/me
async fn get_account(
    state: web::Data<AppState>,
    session: SessionContext,
) -> Result<HttpResponse, ApiError> {
    let account = state.account(&session).await?;
    Ok(HttpResponse::Ok().json(account))
}

/// Add food preferences, keeping the ones already chosen
///
/// PUT /api/v1/users/me/preferences
async fn update_preferences(
    state: web::Data<AppState>,
    session: SessionContext,
    req: web::Json<UpdatePreferencesRequest>,
) -> Result<HttpResponse, ApiError> {
    req.validate()?;

    let _guard = state.locks.acquire(&state.appwrite.collections().users, &session.user_id).await;
    let mut account = state.account(&session).await?;

    let added = account.merge_preferences(&req.preferences);
    if added > 0 {
        state
            .appwrite
            .update_user(&session.user_id, json!({ "preferences": account.preferences }))
            .await?;
    }

    tracing::debug!("Added {} preferences for {}", added, session.user_id);

    Ok(HttpResponse::Ok().json(json!({ "preferences": account.preferences })))
}

/// Saved recipes resolved against the catalogue, in saved order.
///
/// Ids whose recipe no longer exists are left out.
pub fn resolve_saved(saved_ids: &[String], recipes: &[Recipe]) -> Vec<Recipe> {
    let by_id: HashMap<&str, &Recipe> = recipes.iter().map(|r| (r.id.as_str(), r)).collect();
    saved_ids
        .iter()
        .filter_map(|id| by_id.get(id.as_str()).map(|r| (*r).clone()))
        .collect()
}

/// GET /api/v1/users/me/saved
async fn list_saved(
    state: web::Data<AppState>,
    session: SessionContext,
) -> Result<HttpResponse, ApiError> {
    let account = state.account(&session).await?;
    let recipes = state.recipes().await?;
    let saved = resolve_saved(&account.saved_recipes, &recipes);

    Ok(HttpResponse::Ok().json(RecipeListResponse {
        total_results: saved.len(),
        recipes: saved,
    }))
}

/// Save a recipe to the caller's list
///
/// POST /api/v1/users/me/saved/{recipe_id}
async fn save_recipe(
    state: web::Data<AppState>,
    session: SessionContext,
    path: web::Path<String>,
) -> Result<HttpResponse, ApiError> {
    let recipe_id = path.into_inner();

    // Fails with 404 before touching the account if the recipe is gone
    state.appwrite.get_recipe(&recipe_id).await?;

    let _guard = state.locks.acquire(&state.appwrite.collections().users, &session.user_id).await;
    let mut account = state.account(&session).await?;

    // Counter first; the saved list is written only after it succeeds
    let changed = account.save_recipe(&recipe_id);
    if changed {
        adjust_saves(&state, &recipe_id, 1).await?;
        if let Err(e) = write_saved_list(&state, &session, &account).await {
            revert_saves(&state, &recipe_id, -1).await;
            return Err(e);
        }
    }

    tracing::debug!("{} saved recipe {} (changed: {})", session.user_id, recipe_id, changed);

    Ok(HttpResponse::Ok().json(SavedRecipesResponse {
        saved_recipes: account.saved_recipes,
        changed,
    }))
}

/// Remove a recipe from the caller's list
///
/// DELETE /api/v1/users/me/saved/{recipe_id}
async fn unsave_recipe(
    state: web::Data<AppState>,
    session: SessionContext,
    path: web::Path<String>,
) -> Result<HttpResponse, ApiError> {
    let recipe_id = path.into_inner();

    let _guard = state.locks.acquire(&state.appwrite.collections().users, &session.user_id).await;
    let mut account = state.account(&session).await?;

    let changed = account.unsave_recipe(&recipe_id);
    if changed {
        let counted = match adjust_saves(&state, &recipe_id, -1).await {
            Ok(_) => true,
            // The recipe may have been deleted since it was saved
            Err(ApiError::NotFound(_)) => false,
            Err(e) => return Err(e),
        };

        if let Err(e) = write_saved_list(&state, &session, &account).await {
            if counted {
                revert_saves(&state, &recipe_id, 1).await;
            }
            return Err(e);
        }
    }

    tracing::debug!("{} unsaved recipe {} (changed: {})", session.user_id, recipe_id, changed);

    Ok(HttpResponse::Ok().json(SavedRecipesResponse {
        saved_recipes: account.saved_recipes,
        changed,
    }))
}

async fn write_saved_list(
    state: &AppState,
    session: &SessionContext,
    account: &UserAccount,
) -> Result<(), ApiError> {
    state
        .appwrite
        .update_user(&session.user_id, json!({ "savedRecipes": account.saved_recipes }))
        .await?;
    Ok(())
}

/// Undo a counter change after the saved list could not be written
async fn revert_saves(state: &AppState, recipe_id: &str, delta: i64) {
    if let Err(e) = adjust_saves(state, recipe_id, delta).await {
        tracing::warn!("Failed to revert save counter of recipe {}: {}", recipe_id, e);
    }
}

/// Apply `delta` to a recipe's save counter, never going below zero
async fn adjust_saves(state: &AppState, recipe_id: &str, delta: i64) -> Result<u64, ApiError> {
    let _guard = state.locks.acquire(&state.appwrite.collections().recipes, recipe_id).await;
    let recipe = state.appwrite.get_recipe(recipe_id).await?;

    let saves = if delta >= 0 {
        recipe.saves.saturating_add(delta as u64)
    } else {
        recipe.saves.saturating_sub(delta.unsigned_abs())
    };

    state
        .appwrite
        .update_recipe(recipe_id, json!({ "saves": saves }))
        .await?;
    state.invalidate_recipes().await;

    Ok(saves)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_resolve_saved_keeps_saved_order_and_skips_missing() {
        let recipes = vec![Recipe::new("a", "A"), Recipe::new("b", "B"), Recipe::new("c", "C")];
        let saved = vec!["c".to_string(), "gone".to_string(), "a".to_string()];

        let resolved = resolve_saved(&saved, &recipes);
        let ids: Vec<_> = resolved.iter().map(|r| r.id.as_str()).collect();
        assert_eq!(ids, vec!["c", "a"]);
    }
}
