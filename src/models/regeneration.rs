use std::fmt;

use serde::{Deserialize, Serialize};

use super::itinerary::ItineraryDocument;

/// One request to regenerate a single day of an itinerary. Transient: built
/// by the caller, consumed by a single service run, never persisted.
#[derive(Debug, Deserialize, Serialize, Clone)]
#[serde(rename_all = "camelCase")]
pub struct RegenerationRequest {
    pub target_day: u32,
    #[serde(default)]
    pub tags: Vec<String>,
    pub source_document: ItineraryDocument,
}

/// Lifecycle of one regeneration run. Owned by the run itself; there is no
/// persistence and no sharing across requests.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TaskState {
    Created,
    Submitted,
    Polling,
    Completed,
    Failed,
    TimedOut,
}

impl fmt::Display for TaskState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            TaskState::Created => "created",
            TaskState::Submitted => "submitted",
            TaskState::Polling => "polling",
            TaskState::Completed => "completed",
            TaskState::Failed => "failed",
            TaskState::TimedOut => "timed_out",
        };
        write!(f, "{}", label)
    }
}
