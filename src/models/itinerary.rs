use std::collections::HashMap;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::Value;

/// The full trip record being edited. Wire format is camelCase JSON, the
/// shape the persistence endpoints and the AI planner both speak.
///
/// `total_budget` should equal the sum of `budget_breakdown` whenever the
/// breakdown is present; the merge step recomputes it after every mutation,
/// but nothing enforces it at the type level.
#[derive(Debug, Deserialize, Serialize, Clone, Default, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct ItineraryDocument {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,
    #[serde(default)]
    pub title: String,
    #[serde(default)]
    pub overview: String,
    #[serde(default)]
    pub total_budget: f64,
    #[serde(default)]
    pub duration: u32,
    #[serde(default)]
    pub daily_plan: Vec<DayPlan>,
    // Open key set (accommodation/food/transportation/activities/shopping/other
    // and whatever else the model invents). Values stay raw JSON because the
    // model sometimes emits non-numeric amounts.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub budget_breakdown: Option<HashMap<String, Value>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub created_at: Option<DateTime<Utc>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub updated_at: Option<DateTime<Utc>>,
}

/// One day of the itinerary. `day` is 1-based and acts as the upsert key;
/// duplicates are a caller error but must not break the merge.
#[derive(Debug, Deserialize, Serialize, Clone, Default, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct DayPlan {
    #[serde(default)]
    pub day: u32,
    #[serde(default)]
    pub theme: String,
    #[serde(default)]
    pub morning: String,
    #[serde(default)]
    pub afternoon: String,
    #[serde(default)]
    pub evening: String,
    #[serde(default)]
    pub meals: Meals,
    #[serde(default)]
    pub accommodation: Accommodation,
    #[serde(default)]
    pub transportation: Transportation,
    #[serde(default)]
    pub daily_cost: f64,
}

#[derive(Debug, Deserialize, Serialize, Clone, Default, PartialEq)]
pub struct Meals {
    #[serde(default)]
    pub breakfast: String,
    #[serde(default)]
    pub lunch: String,
    #[serde(default)]
    pub dinner: String,
}

#[derive(Debug, Deserialize, Serialize, Clone, Default, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct Accommodation {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub address: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub room_type: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub price: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub booking_link: Option<String>,
}

#[derive(Debug, Deserialize, Serialize, Clone, Default, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct Transportation {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub details: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub cost: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub booking_link: Option<String>,
}

impl DayPlan {
    /// Build a day plan from arbitrary model output. The AI reply is
    /// unreliable, so missing or mistyped fields degrade to empty strings and
    /// zeros instead of failing. The caller supplies the resolved day number.
    pub fn from_value(value: &Value, day: u32) -> Self {
        Self {
            day,
            theme: text_field(value, "theme"),
            morning: text_field(value, "morning"),
            afternoon: text_field(value, "afternoon"),
            evening: text_field(value, "evening"),
            meals: value
                .get("meals")
                .map(Meals::from_value)
                .unwrap_or_default(),
            accommodation: value
                .get("accommodation")
                .map(Accommodation::from_value)
                .unwrap_or_default(),
            transportation: value
                .get("transportation")
                .map(Transportation::from_value)
                .unwrap_or_default(),
            daily_cost: value
                .get("dailyCost")
                .and_then(Value::as_f64)
                .unwrap_or(0.0),
        }
    }
}

impl Meals {
    fn from_value(value: &Value) -> Self {
        Self {
            breakfast: text_field(value, "breakfast"),
            lunch: text_field(value, "lunch"),
            dinner: text_field(value, "dinner"),
        }
    }
}

impl Accommodation {
    fn from_value(value: &Value) -> Self {
        Self {
            name: optional_text(value, "name"),
            address: optional_text(value, "address"),
            room_type: optional_text(value, "roomType"),
            price: value.get("price").and_then(Value::as_f64),
            booking_link: optional_text(value, "bookingLink"),
        }
    }
}

impl Transportation {
    fn from_value(value: &Value) -> Self {
        Self {
            details: optional_text(value, "details"),
            cost: value.get("cost").and_then(Value::as_f64),
            booking_link: optional_text(value, "bookingLink"),
        }
    }
}

fn text_field(value: &Value, key: &str) -> String {
    optional_text(value, key).unwrap_or_default()
}

fn optional_text(value: &Value, key: &str) -> Option<String> {
    value.get(key).and_then(Value::as_str).map(str::to_string)
}
