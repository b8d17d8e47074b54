use std::error::Error;
use std::fmt;
use std::time::Duration;

use log::{debug, warn};
use tokio::time::sleep;

use crate::models::itinerary::ItineraryDocument;
use crate::models::regeneration::{RegenerationRequest, TaskState};
use crate::services::chat_service::{ChatOperations, ChatServiceError, ChatTaskStatus};
use crate::services::{document_merger, response_extractor};

const DEFAULT_POLL_INTERVAL_MS: u64 = 1_000;
const MAX_POLL_ATTEMPTS: u32 = 90;
const MAX_CONSECUTIVE_TRANSPORT_RETRIES: u32 = 5;

#[derive(Clone)]
pub struct RegenerationConfig {
    pub poll_interval: Duration,
    pub max_poll_attempts: u32,
    pub max_consecutive_transport_retries: u32,
}

impl Default for RegenerationConfig {
    fn default() -> Self {
        Self {
            poll_interval: Duration::from_millis(DEFAULT_POLL_INTERVAL_MS),
            max_poll_attempts: MAX_POLL_ATTEMPTS,
            max_consecutive_transport_retries: MAX_CONSECUTIVE_TRANSPORT_RETRIES,
        }
    }
}

#[derive(Debug)]
pub enum RegenerationError {
    Submission(String),
    Transport(ChatServiceError),
    GenerationFailed,
    Timeout,
    NoAnswer,
    Extraction(String),
}

impl fmt::Display for RegenerationError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            RegenerationError::Submission(msg) => {
                write!(f, "Failed to submit regeneration request: {}", msg)
            }
            RegenerationError::Transport(err) => {
                write!(f, "Lost contact with the AI planner: {}", err)
            }
            RegenerationError::GenerationFailed => write!(f, "AI generation reported failure"),
            RegenerationError::Timeout => write!(f, "AI reply timeout"),
            RegenerationError::NoAnswer => write!(f, "No answer message in AI reply"),
            RegenerationError::Extraction(msg) => {
                write!(f, "Could not read a day plan from the AI reply: {}", msg)
            }
        }
    }
}

impl Error for RegenerationError {}

/// Drives one end-to-end regeneration of a single itinerary day: build the
/// prompt, submit it, poll the task on a fixed cadence, fetch the answer,
/// extract its JSON payload and merge it into the source document.
///
/// One run issues its network calls strictly in sequence and has no
/// cancellation channel; the poll ceiling is the only bound on duration.
/// Deduplicating concurrent runs for the same day is the caller's job.
pub struct RegenerationService<C: ChatOperations> {
    chat: C,
    config: RegenerationConfig,
}

impl<C: ChatOperations> RegenerationService<C> {
    pub fn new(chat: C) -> Self {
        Self {
            chat,
            config: RegenerationConfig::default(),
        }
    }

    pub fn with_config(chat: C, config: RegenerationConfig) -> Self {
        Self { chat, config }
    }

    /// Run one regeneration. `on_progress` is called synchronously with a
    /// human-readable line at each meaningful transition; on failure the
    /// last progress line doubles as error context for the caller's UI.
    pub async fn run(
        &self,
        request: &RegenerationRequest,
        mut on_progress: impl FnMut(&str),
    ) -> Result<ItineraryDocument, RegenerationError> {
        let mut state = TaskState::Created;
        let prompt = build_prompt(request);

        on_progress(&format!(
            "Asking the AI planner to redo day {}",
            request.target_day
        ));

        let handle = self
            .chat
            .submit(&prompt)
            .await
            .map_err(|e| RegenerationError::Submission(e.to_string()))?;
        if handle.task_id.is_empty() {
            return Err(RegenerationError::Submission(
                "chat service returned no task identifier".to_string(),
            ));
        }
        advance(&mut state, TaskState::Submitted);
        on_progress("Request accepted, waiting for the AI planner");

        advance(&mut state, TaskState::Polling);
        let mut consecutive_transport_errors: u32 = 0;
        let mut completed = false;

        for attempt in 1..=self.config.max_poll_attempts {
            sleep(self.config.poll_interval).await;

            match self.chat.status(&handle).await {
                Ok(status) => {
                    consecutive_transport_errors = 0;
                    on_progress(&format!(
                        "Waiting for AI reply (attempt {}/{}, status {})",
                        attempt, self.config.max_poll_attempts, status
                    ));
                    match status {
                        ChatTaskStatus::Completed => {
                            completed = true;
                            break;
                        }
                        ChatTaskStatus::Failed => {
                            advance(&mut state, TaskState::Failed);
                            return Err(RegenerationError::GenerationFailed);
                        }
                        // in_progress or anything unrecognized: keep polling.
                        _ => {}
                    }
                }
                Err(err) => {
                    consecutive_transport_errors += 1;
                    warn!(
                        "status poll {} failed ({} consecutive): {}",
                        attempt, consecutive_transport_errors, err
                    );
                    if consecutive_transport_errors > self.config.max_consecutive_transport_retries
                    {
                        advance(&mut state, TaskState::Failed);
                        return Err(RegenerationError::Transport(err));
                    }
                }
            }
        }

        if !completed {
            advance(&mut state, TaskState::TimedOut);
            return Err(RegenerationError::Timeout);
        }

        let messages = self
            .chat
            .messages(&handle)
            .await
            .map_err(RegenerationError::Transport)?;

        let answer = messages
            .iter()
            .find(|message| message.role == "assistant" && message.kind == "answer")
            .ok_or(RegenerationError::NoAnswer)?;
        on_progress("Answer received from the AI planner");

        let text = response_extractor::extract_text(&answer.content);
        let parsed = response_extractor::extract_json_object(&text)?;
        on_progress("Parsed the regenerated day plan");

        let merged = document_merger::merge(&request.source_document, &parsed, request.target_day);
        advance(&mut state, TaskState::Completed);
        on_progress(&format!(
            "Day {} updated in the itinerary",
            request.target_day
        ));

        Ok(merged)
    }
}

fn advance(state: &mut TaskState, next: TaskState) {
    debug!("regeneration task: {} -> {}", state, next);
    *state = next;
}

fn build_prompt(request: &RegenerationRequest) -> String {
    let document_json = serde_json::to_string(&request.source_document)
        .unwrap_or_else(|_| "{}".to_string());
    let focus = if request.tags.is_empty() {
        "the traveler's original preferences".to_string()
    } else {
        request.tags.join(", ")
    };

    format!(
        "You are a travel planner. Here is the current itinerary as JSON:\n{}\n\n\
         Regenerate day {} of this itinerary with a focus on: {}. \
         Keep the same destination and a similar budget level. \
         Reply with a single JSON object for the regenerated day using the same \
         field names as the dailyPlan entries (day, theme, morning, afternoon, \
         evening, meals, accommodation, transportation, dailyCost), and include \
         an updated budgetBreakdown if the daily cost changed.",
        document_json, request.target_day, focus
    )
}
