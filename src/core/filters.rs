use crate::models::Recipe;
use std::collections::BTreeSet;

/// Case-insensitive, unanchored substring test.
///
/// `needle_lower` must already be lower-cased; callers lower-case the query
/// once and reuse it for every recipe.
#[inline]
pub fn contains_ignore_case(haystack: &str, needle_lower: &str) -> bool {
    haystack.to_lowercase().contains(needle_lower)
}

/// Title contains the (lower-cased) search text
#[inline]
pub fn matches_title(recipe: &Recipe, text_lower: &str) -> bool {
    contains_ignore_case(&recipe.title, text_lower)
}

/// Any ingredient name contains the (lower-cased) search text
#[inline]
pub fn matches_ingredient(recipe: &Recipe, text_lower: &str) -> bool {
    recipe
        .ingredients
        .iter()
        .any(|item| contains_ignore_case(&item.ingredient, text_lower))
}

/// Area is one of the terms (exact, case-sensitive)
#[inline]
pub fn matches_area(recipe: &Recipe, terms: &BTreeSet<String>) -> bool {
    terms.contains(&recipe.area)
}

/// Category is one of the terms (exact, case-sensitive)
#[inline]
pub fn matches_category(recipe: &Recipe, terms: &BTreeSet<String>) -> bool {
    terms.contains(&recipe.category)
}

/// Any ingredient name contains any of the (lower-cased) terms
pub fn matches_any_ingredient_term(recipe: &Recipe, terms_lower: &[String]) -> bool {
    if terms_lower.is_empty() {
        return false;
    }

    recipe.ingredients.iter().any(|item| {
        let name = item.ingredient.to_lowercase();
        terms_lower.iter().any(|term| name.contains(term.as_str()))
    })
}

/// Lower-case preference terms for substring matching, dropping blank ones.
///
/// A blank term would be a substring of every ingredient name.
pub fn substring_terms(terms: &BTreeSet<String>) -> Vec<String> {
    terms
        .iter()
        .filter(|term| !term.trim().is_empty())
        .map(|term| term.to_lowercase())
        .collect()
}
