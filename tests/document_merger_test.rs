use std::collections::HashMap;

use serde_json::json;

use tripdraft::models::itinerary::{DayPlan, ItineraryDocument};
use tripdraft::services::document_merger::merge;

fn day(number: u32, theme: &str) -> DayPlan {
    DayPlan {
        day: number,
        theme: theme.to_string(),
        ..Default::default()
    }
}

fn sample_document() -> ItineraryDocument {
    ItineraryDocument {
        id: Some("plan-42".to_string()),
        title: "Five days in Kyoto".to_string(),
        overview: "Temples, food streets and a day trip to Nara".to_string(),
        total_budget: 1450.0,
        duration: 3,
        daily_plan: vec![
            day(1, "Arrival and Gion"),
            day(2, "Arashiyama bamboo grove"),
            day(3, "Nara day trip"),
        ],
        budget_breakdown: Some(HashMap::from([
            ("accommodation".to_string(), json!(600)),
            ("food".to_string(), json!(450)),
            ("activities".to_string(), json!(400)),
        ])),
        created_at: None,
        updated_at: None,
    }
}

#[test]
fn day_object_without_day_field_replaces_fallback_day() {
    let original = sample_document();
    let parsed = json!({"theme": "x", "morning": "y"});

    let merged = merge(&original, &parsed, 3);

    let entry = merged
        .daily_plan
        .iter()
        .find(|plan| plan.day == 3)
        .expect("day 3 should still exist");
    assert_eq!(entry.theme, "x");
    assert_eq!(entry.morning, "y");
    assert_eq!(entry.afternoon, "");
    assert_eq!(entry.daily_cost, 0.0);
    assert_eq!(merged.daily_plan.len(), 3);
}

#[test]
fn explicit_day_field_wins_over_fallback() {
    let original = sample_document();
    let parsed = json!({"day": 2, "theme": "Rainy day museums"});

    let merged = merge(&original, &parsed, 3);

    assert_eq!(merged.daily_plan[1].theme, "Rainy day museums");
    assert_eq!(merged.daily_plan[2].theme, "Nara day trip");
}

#[test]
fn day_zero_is_honored_not_treated_as_missing() {
    let original = sample_document();
    let parsed = json!({"day": 0, "theme": "Pre-trip packing"});

    let merged = merge(&original, &parsed, 3);

    assert_eq!(merged.daily_plan[2].theme, "Nara day trip");
    let appended = merged.daily_plan.last().unwrap();
    assert_eq!(appended.day, 0);
    assert_eq!(appended.theme, "Pre-trip packing");
}

#[test]
fn non_numeric_day_falls_back() {
    let original = sample_document();
    let parsed = json!({"day": "soon", "theme": "Onsen afternoon"});

    let merged = merge(&original, &parsed, 2);

    assert_eq!(merged.daily_plan[1].day, 2);
    assert_eq!(merged.daily_plan[1].theme, "Onsen afternoon");
}

#[test]
fn multi_day_response_replaces_and_appends() {
    let original = sample_document();
    let parsed = json!({
        "dailyPlan": [
            {"day": 2, "theme": "A"},
            {"day": 99, "theme": "B"}
        ]
    });

    let merged = merge(&original, &parsed, 1);

    assert_eq!(merged.daily_plan.len(), 4);
    assert_eq!(merged.daily_plan[0].theme, "Arrival and Gion");
    assert_eq!(merged.daily_plan[1].theme, "A");
    assert_eq!(merged.daily_plan[2].theme, "Nara day trip");
    assert_eq!(merged.daily_plan[3].day, 99);
    assert_eq!(merged.daily_plan[3].theme, "B");
}

#[test]
fn merge_does_not_mutate_the_original() {
    let original = sample_document();
    let before = original.clone();

    let _ = merge(&original, &json!({"day": 2, "theme": "changed"}), 2);

    assert_eq!(original, before);
}

#[test]
fn re_merge_is_idempotent() {
    let original = sample_document();
    let parsed = json!({"day": 2, "theme": "Street food crawl", "dailyCost": 80});

    let once = merge(&original, &parsed, 2);
    let twice = merge(&once, &parsed, 2);

    assert_eq!(once.daily_plan, twice.daily_plan);
    assert_eq!(once.daily_plan.len(), 3);
}

#[test]
fn duplicate_day_numbers_replace_first_match_only() {
    let mut original = sample_document();
    original.daily_plan = vec![day(2, "first"), day(2, "second")];

    let merged = merge(&original, &json!({"day": 2, "theme": "new"}), 2);

    assert_eq!(merged.daily_plan[0].theme, "new");
    assert_eq!(merged.daily_plan[1].theme, "second");
}

#[test]
fn budget_recompute_coerces_non_numeric_to_zero() {
    let mut original = sample_document();
    original.budget_breakdown = Some(HashMap::from([
        ("a".to_string(), json!(10)),
        ("b".to_string(), json!(20.5)),
        ("c".to_string(), json!("bad")),
    ]));

    let merged = merge(&original, &json!({"theme": "quiet day"}), 1);

    assert_eq!(merged.total_budget, 30.5);
}

#[test]
fn budget_breakdown_merges_shallowly_and_recomputes_total() {
    let original = sample_document();
    let parsed = json!({
        "day": 2,
        "theme": "Market tour",
        "budgetBreakdown": {"food": 500, "shopping": 120}
    });

    let merged = merge(&original, &parsed, 2);

    let breakdown = merged.budget_breakdown.as_ref().unwrap();
    assert_eq!(breakdown["food"], json!(500));
    assert_eq!(breakdown["shopping"], json!(120));
    assert_eq!(breakdown["accommodation"], json!(600));
    assert_eq!(breakdown["activities"], json!(400));
    assert_eq!(merged.total_budget, 1620.0);
}

#[test]
fn document_without_breakdown_keeps_total_untouched() {
    let mut original = sample_document();
    original.budget_breakdown = None;
    original.total_budget = 999.0;

    let merged = merge(&original, &json!({"theme": "free walking tour"}), 1);

    assert_eq!(merged.total_budget, 999.0);
    assert!(merged.budget_breakdown.is_none());
}

#[test]
fn nested_day_fields_come_through_the_merge() {
    let original = sample_document();
    let parsed = json!({
        "day": 1,
        "theme": "Slow morning",
        "meals": {"breakfast": "Nishiki market", "dinner": "Izakaya"},
        "accommodation": {"name": "Ryokan Sakura", "price": 180.0, "roomType": "tatami"},
        "transportation": {"details": "City bus day pass", "cost": 6.0},
        "dailyCost": 240.0
    });

    let merged = merge(&original, &parsed, 1);

    let entry = &merged.daily_plan[0];
    assert_eq!(entry.meals.breakfast, "Nishiki market");
    assert_eq!(entry.meals.lunch, "");
    assert_eq!(entry.accommodation.name.as_deref(), Some("Ryokan Sakura"));
    assert_eq!(entry.accommodation.price, Some(180.0));
    assert_eq!(entry.accommodation.room_type.as_deref(), Some("tatami"));
    assert_eq!(entry.transportation.cost, Some(6.0));
    assert_eq!(entry.daily_cost, 240.0);
}
