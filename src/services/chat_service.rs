use std::env;
use std::error::Error;
use std::fmt;

use log::debug;
use reqwest::Client;
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use serde_json::Value;

#[derive(Debug, Serialize)]
pub struct ChatSubmitRequest {
    #[serde(rename = "agentId")]
    pub agent_id: String,
    #[serde(rename = "userId")]
    pub user_id: String,
    pub message: String,
    pub stream: bool,
}

/// Opaque handle for one generation task, echoed back on every status and
/// message-list call.
#[derive(Debug, Deserialize, Serialize, Clone)]
pub struct ChatTaskHandle {
    #[serde(rename = "taskId", default)]
    pub task_id: String,
    #[serde(rename = "conversationId", default)]
    pub conversation_id: String,
}

#[derive(Debug, Deserialize)]
struct ChatStatusResponse {
    #[serde(default)]
    status: String,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ChatTaskStatus {
    InProgress,
    Completed,
    Failed,
    /// Anything the backend reports that we do not recognize. Not terminal;
    /// callers keep polling.
    Other(String),
}

impl ChatTaskStatus {
    fn from_wire(status: &str) -> Self {
        match status {
            "in_progress" => ChatTaskStatus::InProgress,
            "completed" => ChatTaskStatus::Completed,
            "failed" => ChatTaskStatus::Failed,
            other => ChatTaskStatus::Other(other.to_string()),
        }
    }
}

impl fmt::Display for ChatTaskStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ChatTaskStatus::InProgress => write!(f, "in_progress"),
            ChatTaskStatus::Completed => write!(f, "completed"),
            ChatTaskStatus::Failed => write!(f, "failed"),
            ChatTaskStatus::Other(status) => write!(f, "{}", status),
        }
    }
}

#[derive(Debug, Deserialize, Serialize, Clone)]
pub struct ChatMessage {
    #[serde(default)]
    pub role: String,
    #[serde(rename = "type", default)]
    pub kind: String,
    pub content: MessageContent,
}

/// The chat backend is loose about message content: sometimes a bare string,
/// sometimes a list of typed parts, sometimes an object wrapping a `text`
/// field. Anything else lands in `Unknown` so the caller still gets
/// something to (fail to) parse downstream.
#[derive(Debug, Deserialize, Serialize, Clone)]
#[serde(untagged)]
pub enum MessageContent {
    PlainText(String),
    PartList(Vec<MessagePart>),
    TextWrapper { text: String },
    Unknown(Value),
}

#[derive(Debug, Deserialize, Serialize, Clone)]
pub struct MessagePart {
    #[serde(rename = "type", default)]
    pub kind: String,
    #[serde(default)]
    pub text: String,
}

#[derive(Debug)]
pub enum ChatServiceError {
    EnvironmentError(String),
    HttpError(reqwest::Error),
    ResponseError(String),
}

impl fmt::Display for ChatServiceError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ChatServiceError::EnvironmentError(msg) => write!(f, "Environment error: {}", msg),
            ChatServiceError::HttpError(err) => write!(f, "HTTP error: {}", err),
            ChatServiceError::ResponseError(msg) => write!(f, "Response error: {}", msg),
        }
    }
}

impl Error for ChatServiceError {}

impl From<reqwest::Error> for ChatServiceError {
    fn from(err: reqwest::Error) -> Self {
        ChatServiceError::HttpError(err)
    }
}

/// Seam between the regeneration service and the external chat backend.
/// The production implementation is [`HttpChatClient`]; tests script their
/// own.
pub trait ChatOperations {
    async fn submit(&self, message: &str) -> Result<ChatTaskHandle, ChatServiceError>;
    async fn status(&self, handle: &ChatTaskHandle) -> Result<ChatTaskStatus, ChatServiceError>;
    async fn messages(&self, handle: &ChatTaskHandle)
        -> Result<Vec<ChatMessage>, ChatServiceError>;
}

#[derive(Clone)]
pub struct HttpChatClient {
    client: Client,
    base_url: String,
    agent_id: String,
    user_id: String,
}

impl HttpChatClient {
    pub fn new(client: Client, base_url: String, agent_id: String, user_id: String) -> Self {
        Self {
            client,
            base_url,
            agent_id,
            user_id,
        }
    }

    /// Build a client from the environment. The reqwest client itself is
    /// constructed by the application entry point and injected here.
    pub fn from_env(client: Client) -> Result<Self, ChatServiceError> {
        let base_url = env::var("CHAT_API_BASE_URL").map_err(|_| {
            ChatServiceError::EnvironmentError("CHAT_API_BASE_URL not set".to_string())
        })?;

        let agent_id = env::var("CHAT_AGENT_ID").map_err(|_| {
            ChatServiceError::EnvironmentError("CHAT_AGENT_ID not set".to_string())
        })?;

        let user_id = env::var("CHAT_USER_ID").unwrap_or_else(|_| "traveler".to_string());

        Ok(Self::new(client, base_url, agent_id, user_id))
    }

    async fn post_json<T: Serialize, R: DeserializeOwned>(
        &self,
        path: &str,
        body: &T,
    ) -> Result<R, ChatServiceError> {
        let url = format!("{}/{}", self.base_url.trim_end_matches('/'), path);

        let response = self.client.post(&url).json(body).send().await?;

        let status = response.status();
        if !status.is_success() {
            let error_text = response
                .text()
                .await
                .unwrap_or_else(|_| "Unknown error".to_string());
            return Err(ChatServiceError::ResponseError(format!(
                "{} request failed with status {}: {}",
                path, status, error_text
            )));
        }

        response.json::<R>().await.map_err(|e| {
            ChatServiceError::ResponseError(format!("Failed to parse {} response: {}", path, e))
        })
    }
}

impl ChatOperations for HttpChatClient {
    async fn submit(&self, message: &str) -> Result<ChatTaskHandle, ChatServiceError> {
        let request = ChatSubmitRequest {
            agent_id: self.agent_id.clone(),
            user_id: self.user_id.clone(),
            message: message.to_string(),
            stream: false,
        };

        let handle: ChatTaskHandle = self.post_json("chat", &request).await?;
        debug!(
            "chat task submitted: task {} conversation {}",
            handle.task_id, handle.conversation_id
        );
        Ok(handle)
    }

    async fn status(&self, handle: &ChatTaskHandle) -> Result<ChatTaskStatus, ChatServiceError> {
        let response: ChatStatusResponse = self.post_json("chat/status", handle).await?;
        Ok(ChatTaskStatus::from_wire(&response.status))
    }

    async fn messages(
        &self,
        handle: &ChatTaskHandle,
    ) -> Result<Vec<ChatMessage>, ChatServiceError> {
        self.post_json("chat/messages", handle).await
    }
}
