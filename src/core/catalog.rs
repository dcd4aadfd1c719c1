//! Listings derived from the full recipe catalogue: food categories,
//! cuisines and the terms a user can pick as preferences.

use crate::models::Recipe;
use std::collections::HashSet;

/// Collect unique non-empty values in first-seen order
fn unique_in_order<'a, I>(values: I) -> Vec<String>
where
    I: IntoIterator<Item = &'a str>,
{
    let mut seen = HashSet::new();
    values
        .into_iter()
        .filter(|v| !v.is_empty())
        .filter(|v| seen.insert(*v))
        .map(str::to_string)
        .collect()
}

/// Unique recipe categories
pub fn categories(recipes: &[Recipe]) -> Vec<String> {
    unique_in_order(recipes.iter().map(|r| r.category.as_str()))
}

/// Unique cuisine areas
pub fn areas(recipes: &[Recipe]) -> Vec<String> {
    unique_in_order(recipes.iter().map(|r| r.area.as_str()))
}

/// Recipes in exactly the given category, input order
pub fn by_category<'a>(recipes: &'a [Recipe], category: &str) -> Vec<&'a Recipe> {
    recipes.iter().filter(|r| r.category == category).collect()
}

/// Terms offered as preferences: single-word ingredient titles followed by
/// every cuisine area in the catalogue.
pub fn available_preferences<S: AsRef<str>>(ingredient_titles: &[S], recipes: &[Recipe]) -> Vec<String> {
    let single_words = ingredient_titles
        .iter()
        .map(|t| t.as_ref().trim())
        .filter(|t| !t.is_empty() && !t.contains(char::is_whitespace));

    let areas = recipes.iter().map(|r| r.area.as_str());

    unique_in_order(single_words.chain(areas))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn recipe(id: &str, area: &str, category: &str) -> Recipe {
        let mut recipe = Recipe::new(id, format!("Recipe {}", id));
        recipe.area = area.to_string();
        recipe.category = category.to_string();
        recipe
    }

    fn catalogue() -> Vec<Recipe> {
        vec![
            recipe("1", "Italian", "Pasta"),
            recipe("2", "Indian", "Curry"),
            recipe("3", "Italian", "Dessert"),
            recipe("4", "", "Pasta"),
        ]
    }

    #[test]
    fn test_categories_unique_in_order() {
        assert_eq!(categories(&catalogue()), vec!["Pasta", "Curry", "Dessert"]);
    }

    #[test]
    fn test_areas_skip_empty() {
        assert_eq!(areas(&catalogue()), vec!["Italian", "Indian"]);
    }

    #[test]
    fn test_by_category() {
        let recipes = catalogue();
        let ids: Vec<_> = by_category(&recipes, "Pasta").iter().map(|r| r.id.as_str()).collect();
        assert_eq!(ids, vec!["1", "4"]);
        assert!(by_category(&recipes, "pasta").is_empty());
    }

    #[test]
    fn test_available_preferences() {
        let titles = ["Chicken", "Olive Oil", " Garlic ", "Chicken", ""];
        let prefs = available_preferences(&titles, &catalogue());
        assert_eq!(prefs, vec!["Chicken", "Garlic", "Italian", "Indian"]);
    }
}
