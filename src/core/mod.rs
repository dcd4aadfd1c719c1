// Core algorithm exports
pub mod catalog;
pub mod filters;
pub mod finder;
pub mod ratings;

pub use catalog::{areas, available_preferences, by_category, categories};
pub use filters::{matches_any_ingredient_term, matches_area, matches_category, matches_ingredient, matches_title};
pub use finder::{find, RecipeFinder, ResultSet};
pub use ratings::{RatingBook, RatingError};
