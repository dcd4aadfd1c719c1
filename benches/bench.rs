// Criterion benchmarks for Tangerines

use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion};
use std::collections::BTreeSet;
use tangerines::core::{catalog, RecipeFinder};
use tangerines::models::{Ingredient, Query, Recipe};

const AREAS: &[&str] = &["Italian", "Indian", "Mexican", "British", "Thai", "Japanese"];
const CATEGORIES: &[&str] = &["Main", "Soup", "Dessert", "Starter", "Side"];
const INGREDIENTS: &[&str] = &[
    "Tomato", "Chicken", "Basil", "Rice", "Beef", "Lime", "Chickpeas", "Garlic", "Onion", "Ginger",
];

fn create_recipe(id: usize) -> Recipe {
    let mut recipe = Recipe::new(id.to_string(), format!("{} dish number {}", AREAS[id % AREAS.len()], id));
    recipe.area = AREAS[id % AREAS.len()].to_string();
    recipe.category = CATEGORIES[id % CATEGORIES.len()].to_string();
    recipe.ingredients = (0..(id % 8 + 1))
        .map(|k| Ingredient::new(INGREDIENTS[(id + k * 7) % INGREDIENTS.len()], "1 cup"))
        .collect();
    recipe
}

fn create_catalogue(size: usize) -> Vec<Recipe> {
    (0..size).map(create_recipe).collect()
}

fn bench_find(c: &mut Criterion) {
    let finder = RecipeFinder::new();
    let preferences: BTreeSet<String> = ["Thai", "Dessert", "garlic", "lime"]
        .iter()
        .map(|s| s.to_string())
        .collect();

    let queries = [
        ("by_title", Query::ByTitle("number 4".to_string())),
        ("by_ingredient", Query::ByIngredient("chick".to_string())),
        ("by_preferences", Query::ByPreferences(preferences)),
    ];

    let mut group = c.benchmark_group("find");

    for catalogue_size in [10, 100, 1000, 5000].iter() {
        let recipes = create_catalogue(*catalogue_size);

        for (name, query) in queries.iter() {
            group.bench_with_input(BenchmarkId::new(*name, catalogue_size), catalogue_size, |b, _| {
                b.iter(|| finder.find(black_box(&recipes), black_box(query)))
            });
        }
    }

    group.finish();
}

fn bench_available_preferences(c: &mut Criterion) {
    let recipes = create_catalogue(1000);
    let titles: Vec<String> = INGREDIENTS
        .iter()
        .cycle()
        .take(500)
        .enumerate()
        .map(|(i, t)| if i % 3 == 0 { format!("{} Paste", t) } else { t.to_string() })
        .collect();

    c.bench_function("available_preferences_1000_recipes", |b| {
        b.iter(|| catalog::available_preferences(black_box(&titles), black_box(&recipes)))
    });
}

criterion_group!(benches, bench_find, bench_available_preferences);

criterion_main!(benches);
