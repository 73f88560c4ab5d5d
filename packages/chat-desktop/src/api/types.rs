//! API types for the chat server

use serde::{Deserialize, Serialize};

// ============================================================================
// Project Settings
// ============================================================================

/// A preconfigured quick action offered before the user types
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Default)]
pub struct Starter {
    pub label: String,
    pub message: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub icon: Option<String>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub commands: Vec<String>,
    #[serde(default, alias = "toggleCommands", skip_serializing_if = "Vec::is_empty")]
    pub toggle_commands: Vec<String>,
}

impl Starter {
    /// Element id used for the rendered button, e.g. `starter-write-a-poem`
    pub fn element_id(&self) -> String {
        format!("starter-{}", self.label.trim().to_lowercase().replace(' ', "-"))
    }
}

/// A chat directive that modifies message handling
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Default)]
pub struct Command {
    pub id: String,
    /// Shown next to the command chip
    #[serde(default)]
    pub description: String,
}

/// Catalog entry for a toggleable command
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Default)]
pub struct ToggleCommand {
    pub id: String,
    #[serde(default)]
    pub persistent: bool,
}

/// A binary chat option bundled into outgoing messages
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Toggleable {
    pub id: String,
    pub active: bool,
    pub persistent: bool,
}

/// Authenticated user
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct User {
    pub identifier: String,
}

/// Response of `GET /project/settings`
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
#[serde(rename_all = "camelCase")]
pub struct ProjectSettings {
    #[serde(default)]
    pub starters: Vec<Starter>,
    #[serde(default)]
    pub commands: Vec<Command>,
    #[serde(default)]
    pub toggle_commands: Vec<ToggleCommand>,
    #[serde(default)]
    pub user: Option<User>,
}

// ============================================================================
// Message Types
// ============================================================================

/// Metadata attached to a user message
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Default)]
pub struct MessageMetadata {
    /// Where the message was submitted from
    pub location: String,
}

/// A user message ready for dispatch
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct OutgoingMessage {
    pub thread_id: String,
    pub id: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub command: Option<String>,
    pub toggleables: Vec<String>,
    pub name: String,
    #[serde(rename = "type")]
    pub kind: String,
    pub output: String,
    pub created_at: String,
    pub metadata: MessageMetadata,
}

/// A file reference sent along with a message
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Attachment {
    pub id: String,
}

/// Request body for `POST /message`
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SendMessageRequest {
    pub message: OutgoingMessage,
    pub file_references: Vec<Attachment>,
}

// ============================================================================
// Thread Types
// ============================================================================

/// Thread entry shown in the history list
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ThreadSummary {
    pub id: String,
    #[serde(default)]
    pub name: Option<String>,
    pub created_at: String,
}

#[derive(Debug, Clone, Serialize, Default)]
pub struct Pagination {
    pub first: u32,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub cursor: Option<String>,
}

#[derive(Debug, Clone, Serialize, Default)]
pub struct ThreadFilter {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub search: Option<String>,
}

/// Request body for `POST /project/threads`
#[derive(Debug, Clone, Serialize, Default)]
pub struct ListThreadsRequest {
    pub pagination: Pagination,
    pub filter: ThreadFilter,
}

/// Response of `POST /project/threads`; only the first page is read
#[derive(Debug, Clone, Deserialize, Default)]
pub struct ThreadPage {
    #[serde(default)]
    pub data: Vec<ThreadSummary>,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DeleteThreadRequest {
    pub thread_id: String,
}

// ============================================================================
// Sidebar Payloads
// ============================================================================

/// Element displayed in the element sidebar
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Element {
    pub id: String,
    pub name: String,
    #[serde(rename = "type", default)]
    pub kind: String,
    #[serde(default)]
    pub content: Option<String>,
    #[serde(default)]
    pub url: Option<String>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct SidebarElementsPayload {
    #[serde(default)]
    pub elements: Vec<Element>,
    #[serde(default)]
    pub key: Option<String>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct InfoPanelPayload {
    #[serde(default)]
    pub title: Option<String>,
    /// Insertion order is kept through serde_json's `preserve_order`
    #[serde(default)]
    pub data: serde_json::Map<String, serde_json::Value>,
}

impl InfoPanelPayload {
    /// Flatten the data map into display rows
    pub fn rows(&self) -> Vec<(String, String)> {
        self.data
            .iter()
            .map(|(key, value)| {
                let value = match value {
                    serde_json::Value::String(s) => s.clone(),
                    other => other.to_string(),
                };
                (key.clone(), value)
            })
            .collect()
    }
}

// ============================================================================
// Server Events (from SSE)
// ============================================================================

/// Server event types
#[derive(Debug, Clone)]
pub enum ServerEvent {
    /// Thread created
    ThreadCreated(ThreadSummary),
    /// Thread renamed or otherwise updated
    ThreadUpdated(ThreadSummary),
    /// Thread deleted
    ThreadDeleted(String),
    /// Server started processing a message
    TaskStart,
    /// Server finished processing a message
    TaskEnd,
    /// Command catalog replaced
    CommandsSet(Vec<Command>),
    /// Toggle command catalog replaced
    ToggleCommandsSet(Vec<ToggleCommand>),
    /// Info panel content replaced
    InfoPanelSet {
        title: Option<String>,
        data: Vec<(String, String)>,
    },
    /// Element sidebar title set (opens the sidebar)
    SidebarTitle(String),
    /// Element sidebar elements set
    SidebarElements {
        elements: Vec<Element>,
        key: Option<String>,
    },
    /// Connection status changed
    ConnectionStatus(bool),
    /// Keepalive ping
    Keepalive,
}
