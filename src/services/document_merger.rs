use chrono::Utc;
use serde_json::Value;

use crate::models::itinerary::{DayPlan, ItineraryDocument};

/// Apply a parsed model response onto an existing itinerary, returning a new
/// document. The original is never mutated; callers may keep showing it
/// while this runs.
///
/// The parsed value is classified in order: a `dailyPlan` array (multi-day),
/// an object with an explicit `day` field, or a bare day object that falls
/// back to `fallback_day`. There are no error cases: the upstream source is
/// an LLM, so malformed fields degrade to empty/zero instead of rejecting.
pub fn merge(original: &ItineraryDocument, parsed: &Value, fallback_day: u32) -> ItineraryDocument {
    let mut result = original.clone();

    if let Some(entries) = parsed.get("dailyPlan").and_then(Value::as_array) {
        for entry in entries {
            let day = coerce_day(entry.get("day"), fallback_day);
            upsert_day(&mut result.daily_plan, DayPlan::from_value(entry, day));
        }
    } else if let Some(day) = parsed.get("day") {
        // Present-but-falsy day values (0 included) are honored.
        let day = coerce_day(Some(day), fallback_day);
        upsert_day(&mut result.daily_plan, DayPlan::from_value(parsed, day));
    } else if parsed.is_object() {
        upsert_day(
            &mut result.daily_plan,
            DayPlan::from_value(parsed, fallback_day),
        );
    }

    if let Some(breakdown) = parsed.get("budgetBreakdown").and_then(Value::as_object) {
        let target = result.budget_breakdown.get_or_insert_with(Default::default);
        for (category, amount) in breakdown {
            target.insert(category.clone(), amount.clone());
        }
    }

    if let Some(breakdown) = &result.budget_breakdown {
        // Non-numeric amounts count as 0 so the sum stays stable.
        result.total_budget = breakdown
            .values()
            .map(|amount| amount.as_f64().unwrap_or(0.0))
            .sum();
    }

    result.updated_at = Some(Utc::now());
    result
}

// Day numbers are non-negative; anything else counts as non-numeric and
// substitutes the fallback.
fn coerce_day(value: Option<&Value>, fallback_day: u32) -> u32 {
    let number = match value {
        Some(Value::Number(n)) => n.as_f64(),
        Some(Value::String(s)) => s.trim().parse::<f64>().ok(),
        _ => None,
    };
    number
        .filter(|day| *day >= 0.0)
        .map(|day| day as u32)
        .unwrap_or(fallback_day)
}

// Replace the first entry with a matching day number, or append. Duplicate
// day numbers are a caller error; first match wins.
fn upsert_day(daily_plan: &mut Vec<DayPlan>, plan: DayPlan) {
    match daily_plan.iter().position(|existing| existing.day == plan.day) {
        Some(index) => daily_plan[index] = plan,
        None => daily_plan.push(plan),
    }
}
