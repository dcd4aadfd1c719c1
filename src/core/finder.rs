use crate::core::filters::{
    matches_any_ingredient_term, matches_area, matches_category, matches_ingredient,
    matches_title, substring_terms,
};
use crate::models::{Query, Recipe};
use std::collections::{BTreeSet, HashSet};

/// Ordered, id-unique collection of recipes.
///
/// Insertion of an id that is already present is ignored, so each recipe
/// keeps the position of its first occurrence.
#[derive(Debug, Clone, Default)]
pub struct ResultSet {
    recipes: Vec<Recipe>,
    seen: HashSet<String>,
}

impl ResultSet {
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert a recipe, returning `false` if its id was already present
    pub fn insert(&mut self, recipe: &Recipe) -> bool {
        if self.seen.contains(&recipe.id) {
            return false;
        }
        self.seen.insert(recipe.id.clone());
        self.recipes.push(recipe.clone());
        true
    }

    pub fn extend<'a, I>(&mut self, recipes: I)
    where
        I: IntoIterator<Item = &'a Recipe>,
    {
        for recipe in recipes {
            self.insert(recipe);
        }
    }

    pub fn len(&self) -> usize {
        self.recipes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.recipes.is_empty()
    }

    pub fn ids(&self) -> Vec<&str> {
        self.recipes.iter().map(|r| r.id.as_str()).collect()
    }

    pub fn as_slice(&self) -> &[Recipe] {
        &self.recipes
    }

    pub fn into_vec(self) -> Vec<Recipe> {
        self.recipes
    }
}

/// Stateless recipe search over an already-fetched catalogue
#[derive(Debug, Clone, Copy, Default)]
pub struct RecipeFinder;

impl RecipeFinder {
    pub fn new() -> Self {
        Self
    }

    /// Run `query` against `recipes`.
    ///
    /// Empty title/ingredient text and an empty preference set all produce
    /// an empty result set.
    pub fn find(&self, recipes: &[Recipe], query: &Query) -> ResultSet {
        match query {
            Query::ByTitle(text) => self.by_title(recipes, text),
            Query::ByIngredient(text) => self.by_ingredient(recipes, text),
            Query::ByPreferences(terms) => self.by_preferences(recipes, terms),
        }
    }

    fn by_title(&self, recipes: &[Recipe], text: &str) -> ResultSet {
        let mut results = ResultSet::new();
        if text.trim().is_empty() {
            return results;
        }

        let text_lower = text.to_lowercase();
        results.extend(recipes.iter().filter(|r| matches_title(r, &text_lower)));
        results
    }

    fn by_ingredient(&self, recipes: &[Recipe], text: &str) -> ResultSet {
        let mut results = ResultSet::new();
        if text.trim().is_empty() {
            return results;
        }

        let text_lower = text.to_lowercase();
        results.extend(recipes.iter().filter(|r| matches_ingredient(r, &text_lower)));
        results
    }

    /// Union of area, category and ingredient matches, merged in that order
    fn by_preferences(&self, recipes: &[Recipe], terms: &BTreeSet<String>) -> ResultSet {
        let mut results = ResultSet::new();
        if terms.is_empty() {
            return results;
        }

        let terms_lower = substring_terms(terms);

        results.extend(recipes.iter().filter(|r| matches_area(r, terms)));
        results.extend(recipes.iter().filter(|r| matches_category(r, terms)));
        results.extend(
            recipes
                .iter()
                .filter(|r| matches_any_ingredient_term(r, &terms_lower)),
        );

        tracing::trace!(
            "Preference search over {} recipes with {} terms matched {}",
            recipes.len(),
            terms.len(),
            results.len()
        );

        results
    }
}

/// Convenience wrapper around [`RecipeFinder::find`]
pub fn find(recipes: &[Recipe], query: &Query) -> ResultSet {
    RecipeFinder::new().find(recipes, query)
}
