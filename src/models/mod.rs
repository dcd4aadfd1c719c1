// Model exports
pub mod domain;
pub mod requests;
pub mod responses;

pub use domain::{Comment, Ingredient, Query, RatingEntry, Recipe, Role, SessionContext, UserAccount};
pub use requests::{
    AddCommentRequest, CreateAccountRequest, CreateRecipeRequest, ListRecipesParams,
    RateRecipeRequest, SearchMode, SearchRequest, UpdatePreferencesRequest,
};
pub use responses::{
    ErrorResponse, HealthResponse, RatingResponse, RecipeListResponse, SavedRecipesResponse,
    SearchResponse,
};
