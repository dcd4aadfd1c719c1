use actix_web::{web, HttpResponse};
use serde_json::json;
use std::collections::BTreeSet;
use validator::Validate;
use crate::core::{catalog, RatingBook};
use crate::error::ApiError;
use crate::models::{
    AddCommentRequest, Comment, CreateRecipeRequest, ListRecipesParams, RateRecipeRequest,
    RatingResponse, Recipe, RecipeListResponse, SearchRequest, SearchResponse, SessionContext,
};
use crate::routes::AppState;

/// Configure all recipe-related routes
pub fn configure(cfg: &mut web::ServiceConfig) {
    cfg
        .route("/recipes/search", web::post().to(search_recipes))
        .route("/recipes", web::get().to(list_recipes))
        .route("/recipes", web::post().to(create_recipe))
        .route("/recipes/{id}", web::get().to(get_recipe))
        .route("/recipes/{id}", web::delete().to(delete_recipe))
        .route("/recipes/{id}/comments", web::post().to(add_comment))
        .route("/recipes/{id}/ratings", web::post().to(rate_recipe))
        .route("/categories", web::get().to(list_categories))
        .route("/areas", web::get().to(list_areas))
        .route("/preferences/available", web::get().to(available_preferences));
}

/// Search recipes
///
/// POST /api/v1/recipes/search
///
/// Request body:
/// ```json
/// {
///   "mode": "title|ingredient|preferences",
///   "text": "string",
///   "terms": ["string"]
/// }
/// ```
///
/// Preferences mode without `terms` searches with the caller's stored
/// preferences and therefore needs a bearer token.
async fn search_recipes(
    state: web::Data<AppState>,
    session: Option<SessionContext>,
    req: web::Json<SearchRequest>,
) -> Result<HttpResponse, ApiError> {
    let stored = if req.needs_stored_preferences() {
        let session = session.ok_or(crate::services::AuthError::MissingToken)?;
        state.account(&session).await?.preferences
    } else {
        Vec::new()
    };

    let query = req.to_query(&stored);
    let recipes = state.recipes().await?;
    let results = state.finder.find(&recipes, &query).into_vec();

    tracing::info!(
        "Search {:?} matched {} of {} recipes",
        req.mode,
        results.len(),
        recipes.len()
    );

    Ok(HttpResponse::Ok().json(SearchResponse {
        total_results: results.len(),
        scanned: recipes.len(),
        recipes: results,
    }))
}

/// List recipes, optionally restricted to one category
///
/// GET /api/v1/recipes?category={category}
async fn list_recipes(
    state: web::Data<AppState>,
    params: web::Query<ListRecipesParams>,
) -> Result<HttpResponse, ApiError> {
    let recipes = state.recipes().await?;

    let recipes: Vec<Recipe> = match params.category.as_deref() {
        Some(category) => catalog::by_category(&recipes, category)
            .into_iter()
            .cloned()
            .collect(),
        None => recipes,
    };

    Ok(HttpResponse::Ok().json(RecipeListResponse {
        total_results: recipes.len(),
        recipes,
    }))
}

/// GET /api/v1/recipes/{id}
async fn get_recipe(
    state: web::Data<AppState>,
    path: web::Path<String>,
) -> Result<HttpResponse, ApiError> {
    let recipe = state.appwrite.get_recipe(&path).await?;
    Ok(HttpResponse::Ok().json(recipe))
}

/// Publish a recipe (chefs only)
///
/// POST /api/v1/recipes
async fn create_recipe(
    state: web::Data<AppState>,
    session: SessionContext,
    req: web::Json<CreateRecipeRequest>,
) -> Result<HttpResponse, ApiError> {
    req.validate()?;

    let account = state.account(&session).await?;
    if !account.is_chef() {
        return Err(ApiError::Forbidden("Only chefs can publish recipes".to_string()));
    }

    let recipe = build_recipe(req.into_inner(), &session);
    let created = state.appwrite.create_recipe(&recipe).await?;
    state.invalidate_recipes().await;

    tracing::info!("Chef {} published recipe {}", session.user_id, created.id);

    Ok(HttpResponse::Created().json(created))
}

/// Turn a publish request into a new recipe document.
///
/// Without explicit tags, the ingredient names become the tags.
pub fn build_recipe(req: CreateRecipeRequest, session: &SessionContext) -> Recipe {
    let tags: BTreeSet<String> = if req.tags.is_empty() {
        req.ingredients
            .iter()
            .map(|i| i.ingredient.trim().to_string())
            .filter(|t| !t.is_empty())
            .collect()
    } else {
        req.tags
            .iter()
            .map(|t| t.trim().to_string())
            .filter(|t| !t.is_empty())
            .collect()
    };

    let mut recipe = Recipe::new(uuid::Uuid::new_v4().simple().to_string(), req.title.trim());
    recipe.category = req.category;
    recipe.area = req.area;
    recipe.ingredients = req.ingredients;
    recipe.instructions = req.instructions;
    recipe.tags = tags;
    recipe.image_url = req.image_url;
    recipe.description = req.description;
    recipe.chef_email = Some(session.user_id.clone());
    recipe.created_at = Some(chrono::Utc::now());
    recipe
}

/// Delete a recipe (its chef only)
///
/// DELETE /api/v1/recipes/{id}
async fn delete_recipe(
    state: web::Data<AppState>,
    session: SessionContext,
    path: web::Path<String>,
) -> Result<HttpResponse, ApiError> {
    let recipe_id = path.into_inner();

    let account = state.account(&session).await?;
    let _guard = state.locks.acquire(&state.appwrite.collections().recipes, &recipe_id).await;
    let recipe = state.appwrite.get_recipe(&recipe_id).await?;

    if !account.is_chef() || !recipe.is_authored_by(&session.user_id) {
        return Err(ApiError::Forbidden(
            "Only the chef who published a recipe can delete it".to_string(),
        ));
    }

    state.appwrite.delete_recipe(&recipe_id).await?;
    state.invalidate_recipes().await;

    tracing::info!("Chef {} deleted recipe {}", session.user_id, recipe_id);

    Ok(HttpResponse::NoContent().finish())
}

/// Comment on a recipe
///
/// POST /api/v1/recipes/{id}/comments
async fn add_comment(
    state: web::Data<AppState>,
    session: SessionContext,
    path: web::Path<String>,
    req: web::Json<AddCommentRequest>,
) -> Result<HttpResponse, ApiError> {
    req.validate()?;
    if req.content.trim().is_empty() {
        return Err(ApiError::Validation("Comment must not be blank".to_string()));
    }
    let recipe_id = path.into_inner();

    let comment = Comment {
        user_email: session.user_id.clone(),
        content: req.content.trim().to_string(),
        created_at: chrono::Utc::now(),
    };

    let _guard = state.locks.acquire(&state.appwrite.collections().recipes, &recipe_id).await;
    let mut recipe = state.appwrite.get_recipe(&recipe_id).await?;
    recipe.comments.push(comment.clone());

    state
        .appwrite
        .update_recipe(&recipe_id, json!({ "comments": recipe.comments }))
        .await?;
    state.invalidate_recipes().await;

    tracing::debug!("{} commented on recipe {}", session.user_id, recipe_id);

    Ok(HttpResponse::Created().json(comment))
}

/// Rate a recipe from 1 to 5; a new rating replaces the caller's previous one
///
/// POST /api/v1/recipes/{id}/ratings
async fn rate_recipe(
    state: web::Data<AppState>,
    session: SessionContext,
    path: web::Path<String>,
    req: web::Json<RateRecipeRequest>,
) -> Result<HttpResponse, ApiError> {
    let recipe_id = path.into_inner();

    let _guard = state.locks.acquire(&state.appwrite.collections().recipes, &recipe_id).await;
    let recipe = state.appwrite.get_recipe(&recipe_id).await?;

    let mut book = RatingBook::from_entries(&recipe.ratings);
    book.submit(&session.user_id, req.value)?;
    let average = book.average();

    state
        .appwrite
        .update_recipe(
            &recipe_id,
            json!({
                "ratings": book.to_entries(),
                "averageRating": average,
            }),
        )
        .await?;
    state.invalidate_recipes().await;

    tracing::debug!(
        "{} rated recipe {} with {}, average now {:?}",
        session.user_id,
        recipe_id,
        req.value,
        average
    );

    Ok(HttpResponse::Ok().json(RatingResponse {
        average_rating: average,
        rating_count: book.len(),
    }))
}

/// GET /api/v1/categories
async fn list_categories(state: web::Data<AppState>) -> Result<HttpResponse, ApiError> {
    let recipes = state.recipes().await?;
    Ok(HttpResponse::Ok().json(json!({ "categories": catalog::categories(&recipes) })))
}

/// GET /api/v1/areas
async fn list_areas(state: web::Data<AppState>) -> Result<HttpResponse, ApiError> {
    let recipes = state.recipes().await?;
    Ok(HttpResponse::Ok().json(json!({ "areas": catalog::areas(&recipes) })))
}

/// Terms a user can choose as preferences
///
/// GET /api/v1/preferences/available
async fn available_preferences(state: web::Data<AppState>) -> Result<HttpResponse, ApiError> {
    let titles = state.ingredient_titles().await?;
    let recipes = state.recipes().await?;

    Ok(HttpResponse::Ok().json(json!({
        "preferences": catalog::available_preferences(&titles, &recipes),
    })))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::Ingredient;

    fn request(tags: Vec<String>) -> CreateRecipeRequest {
        CreateRecipeRequest {
            title: " Pesto Pasta ".to_string(),
            category: "Pasta".to_string(),
            area: "Italian".to_string(),
            ingredients: vec![Ingredient::new("Basil", "1 cup"), Ingredient::new(" Pine Nuts ", "2 tbsp")],
            instructions: "Blend and toss.".to_string(),
            tags,
            image_url: String::new(),
            description: None,
        }
    }

    #[test]
    fn test_build_recipe_derives_tags_from_ingredients() {
        let session = SessionContext::new("chef@example.com");
        let recipe = build_recipe(request(vec![]), &session);

        assert_eq!(recipe.title, "Pesto Pasta");
        assert!(recipe.tags.contains("Basil"));
        assert!(recipe.tags.contains("Pine Nuts"));
        assert!(recipe.is_authored_by("chef@example.com"));
        assert_eq!(recipe.saves, 0);
        assert!(!recipe.id.is_empty());
    }

    #[test]
    fn test_build_recipe_keeps_explicit_tags() {
        let session = SessionContext::new("chef@example.com");
        let recipe = build_recipe(request(vec!["quick".to_string(), " ".to_string()]), &session);

        assert_eq!(recipe.tags.len(), 1);
        assert!(recipe.tags.contains("quick"));
    }
}
