//! Tangerines - recipe search and sharing service
//!
//! This library provides the recipe finder used by the Tangerines app along
//! with the HTTP service around it. Search is a pure in-memory pass over the
//! recipe catalogue; persistence is delegated to a hosted document store.

pub mod config;
pub mod core;
pub mod error;
pub mod models;
pub mod routes;
pub mod services;

// Re-export commonly used types
pub use crate::core::{find, RecipeFinder, ResultSet};
pub use models::{Ingredient, Query, Recipe, SessionContext, UserAccount};

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_library_exports() {
        let recipes = vec![Recipe::new("1", "Tomato Soup")];
        let result = find(&recipes, &Query::ByTitle("tomato".to_string()));
        assert_eq!(result.len(), 1);
    }
}
