use serde_json::{json, Map, Value};
use std::collections::HashSet;

use castsense::words::{dedupe_by_stem, TRENDING_WORD_LIMIT};
use castsense::{normalize_grid, rank_tiers, sample_recommendations, HOURS_PER_DAY};

fn object(value: Value) -> Map<String, Value> {
    value.as_object().expect("object literal").clone()
}

fn strings(words: &[&str]) -> Vec<String> {
    words.iter().map(|word| word.to_string()).collect()
}

#[test]
fn dedupe_collapses_inflection_variants() {
    let words = strings(&["running", "run", "Runs", "jump"]);
    let unique = dedupe_by_stem(&words);

    assert_eq!(unique, vec!["running".to_string(), "jump".to_string()]);
    assert!(unique.len() <= words.len());
}

#[test]
fn dedupe_keeps_first_occurrence_as_representative() {
    let words = strings(&["Apple", "apple", "apples", "banana", "Bananas"]);
    let unique = dedupe_by_stem(&words);

    assert_eq!(unique, vec!["Apple".to_string(), "banana".to_string()]);
}

#[test]
fn dedupe_outputs_have_distinct_stems() {
    use rust_stemmers::{Algorithm, Stemmer};

    let words = strings(&[
        "build", "building", "builds", "ship", "shipped", "launch", "launching",
    ]);
    let unique = dedupe_by_stem(&words);

    let stemmer = Stemmer::create(Algorithm::English);
    let stems: HashSet<String> = unique
        .iter()
        .map(|word| stemmer.stem(&word.to_lowercase()).into_owned())
        .collect();
    assert_eq!(stems.len(), unique.len());
}

#[test]
fn dedupe_empty_input_yields_empty_output() {
    assert!(dedupe_by_stem(&[]).is_empty());
}

#[test]
fn dedupe_preserves_input_order_for_unrelated_words() {
    let words = strings(&["zebra", "apple", "mango"]);
    assert_eq!(dedupe_by_stem(&words), words);
    assert!(words.len() <= TRENDING_WORD_LIMIT);
}

#[test]
fn rank_tiers_orders_by_percentage_descending() {
    let counts = object(json!({"a": 10, "b": 5}));
    let percentages = object(json!({"a": 40.0, "b": 60.0}));

    let standings = rank_tiers(&counts, &percentages);

    assert_eq!(standings.len(), 2);
    assert_eq!(standings[0].name, "b");
    assert_eq!(standings[0].count, 5);
    assert!((standings[0].percentage - 60.0).abs() < 1e-9);
    assert_eq!(standings[1].name, "a");
    assert_eq!(standings[1].count, 10);
}

#[test]
fn rank_tiers_defaults_missing_percentage_to_zero() {
    let counts = object(json!({"a": 10, "b": 5}));
    let percentages = object(json!({"b": 25.0}));

    let standings = rank_tiers(&counts, &percentages);

    assert_eq!(standings[0].name, "b");
    assert_eq!(standings[1].name, "a");
    assert!((standings[1].percentage - 0.0).abs() < 1e-9);
}

#[test]
fn rank_tiers_keeps_incoming_order_for_ties() {
    let counts = object(json!({"a": 1, "b": 2, "c": 3}));
    let percentages = object(json!({"a": 20.0, "b": 20.0, "c": 20.0}));

    let standings = rank_tiers(&counts, &percentages);

    let names: Vec<&str> = standings.iter().map(|tier| tier.name.as_str()).collect();
    assert_eq!(names, vec!["a", "b", "c"]);
}

#[test]
fn normalize_grid_zero_fills_missing_and_null_hours() {
    let row = object(json!({
        "monday_hourly_counts": {"0": 5, "3": null}
    }));

    let grid = normalize_grid(&row);

    let monday = grid.get("monday").expect("monday present");
    assert_eq!(monday.len(), HOURS_PER_DAY);
    assert_eq!(monday[0], 5);
    for hour in 1..HOURS_PER_DAY {
        assert_eq!(monday[hour], 0);
    }
}

#[test]
fn normalize_grid_does_not_invent_days() {
    let row = object(json!({
        "monday_hourly_counts": {"9": 2},
        "friday_hourly_counts": {"18": 7}
    }));

    let grid = normalize_grid(&row);

    assert_eq!(grid.len(), 2);
    assert!(grid.contains_key("monday"));
    assert!(grid.contains_key("friday"));
    assert!(!grid.contains_key("tuesday"));
}

#[test]
fn sample_returns_one_pick_per_category() {
    let categories = object(json!({"x": [1, 2], "y": [3]}));

    let picks = sample_recommendations(&categories, 4);

    assert_eq!(picks.len(), 2);
    let names: HashSet<&str> = picks.iter().map(|pick| pick.category.as_str()).collect();
    assert_eq!(names.len(), 2);
}

#[test]
fn sample_caps_at_limit() {
    let categories = object(json!({
        "a": [1], "b": [2], "c": [3], "d": [4], "e": [5]
    }));

    let picks = sample_recommendations(&categories, 4);

    assert_eq!(picks.len(), 4);
    let names: HashSet<&str> = picks.iter().map(|pick| pick.category.as_str()).collect();
    assert_eq!(names.len(), 4);
}

#[test]
fn sample_skips_empty_categories() {
    let categories = object(json!({"empty": [], "full": ["pick-me"]}));

    let picks = sample_recommendations(&categories, 4);

    assert_eq!(picks.len(), 1);
    assert_eq!(picks[0].category, "full");
    assert_eq!(picks[0].pick, json!("pick-me"));
}

#[test]
fn sample_of_nothing_is_empty() {
    let picks = sample_recommendations(&Map::new(), 4);
    assert!(picks.is_empty());
}

#[test]
fn sample_picks_values_from_their_own_category() {
    let categories = object(json!({"x": ["x1", "x2"], "y": ["y1"]}));

    for _ in 0..20 {
        for pick in sample_recommendations(&categories, 4) {
            let options = categories[&pick.category].as_array().unwrap();
            assert!(options.contains(&pick.pick));
        }
    }
}
