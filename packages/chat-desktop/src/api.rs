//! HTTP client for the chat server
//!
//! Provides async methods for the project, thread and message endpoints.

pub mod client;
pub mod types;

pub use client::*;

use anyhow::Result;
use gpui::*;
use std::sync::Arc;
use tokio::runtime::Runtime;

use crate::starter::{EndpointBuilder, MessageSender};
use types::{Attachment, OutgoingMessage, SendMessageRequest};

/// Global API client state with Tokio runtime for HTTP operations
#[derive(Clone)]
pub struct ApiState {
    pub client: ChatClient,
    /// Tokio runtime handle for HTTP operations
    pub runtime: Arc<Runtime>,
}

impl ApiState {
    fn new(server_url: &str, access_token: Option<String>) -> Result<Self> {
        // Create a dedicated Tokio runtime for HTTP operations
        let runtime = Runtime::new()?;

        // Create the reqwest client within the Tokio runtime context
        let client = runtime.block_on(async {
            let client = ChatClient::new(server_url);
            match access_token {
                Some(token) => client.with_access_token(token),
                None => client,
            }
        });

        Ok(Self {
            client,
            runtime: Arc::new(runtime),
        })
    }
}

impl Global for ApiState {}

impl MessageSender for ApiState {
    fn send_message(&self, message: OutgoingMessage, attachments: Vec<Attachment>) {
        let client = self.client.clone();
        let message_id = message.id.clone();
        let request = SendMessageRequest {
            message,
            file_references: attachments,
        };

        self.runtime.spawn(async move {
            match client.send_message(request).await {
                Ok(()) => tracing::debug!("Message {} delivered", message_id),
                Err(e) => tracing::error!("Failed to send message {}: {}", message_id, e),
            }
        });
    }
}

impl EndpointBuilder for ApiState {
    fn build_endpoint(&self, path: &str) -> String {
        self.client.build_endpoint(path)
    }
}

/// Initialize the API client
pub fn init(cx: &mut App, server_url: &str, access_token: Option<String>) -> Result<()> {
    cx.set_global(ApiState::new(server_url, access_token)?);
    tracing::debug!("API client initialized for {}", server_url);
    Ok(())
}
