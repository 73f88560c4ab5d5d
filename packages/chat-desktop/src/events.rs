//! Real-time event subscription and handling
//!
//! This module manages the SSE connection to the chat server and applies
//! server events to the application state.

use futures::StreamExt;
use gpui::*;
use std::pin::pin;
use std::time::Duration;

use crate::api::types::ServerEvent;
use crate::api::ApiState;
use crate::state::AppState;

const INITIAL_RETRY_DELAY: Duration = Duration::from_millis(100);
const MAX_RETRY_DELAY: Duration = Duration::from_secs(30);

/// Start the event subscription loop
///
/// Spawns a task that keeps an SSE connection open and reconnects with
/// exponential backoff when it drops.
pub fn start_event_loop(cx: &mut App) {
    let api_state = cx.global::<ApiState>();
    let client = api_state.client.clone();
    let runtime = api_state.runtime.clone();

    tracing::info!("Starting event subscription loop");

    cx.spawn(async move |cx| {
        let mut retry_delay = INITIAL_RETRY_DELAY;

        loop {
            tracing::debug!("Connecting to event stream...");

            let _ = cx.update(|cx| {
                cx.global_mut::<AppState>().connecting = true;
                cx.refresh_windows();
            });

            // Subscribe to events using the Tokio runtime
            let client_clone = client.clone();
            let subscribe_result = runtime
                .spawn(async move { client_clone.subscribe_events().await })
                .await;

            match subscribe_result {
                Ok(Ok(stream)) => {
                    retry_delay = INITIAL_RETRY_DELAY;

                    let _ = cx.update(|cx| {
                        cx.global_mut::<AppState>().set_connected(true);
                        cx.refresh_windows();
                        tracing::info!("Connected to server event stream");
                    });

                    let mut stream = pin!(stream);

                    while let Some(event_result) = stream.next().await {
                        match event_result {
                            Ok(event) => {
                                let _ = cx.update(|cx| {
                                    handle_event(event, cx.global_mut::<AppState>());
                                    cx.refresh_windows();
                                });
                            }
                            Err(e) => {
                                tracing::warn!("Event stream error: {}", e);
                                break;
                            }
                        }
                    }

                    tracing::warn!("Event stream ended, will reconnect...");
                }
                Ok(Err(e)) => {
                    tracing::warn!("Failed to subscribe to events: {}", e);
                }
                Err(e) => {
                    tracing::warn!("Failed to spawn subscribe task: {}", e);
                }
            }

            let _ = cx.update(|cx| {
                cx.global_mut::<AppState>().set_connected(false);
                cx.refresh_windows();
            });

            tracing::debug!("Reconnecting in {:?}...", retry_delay);
            cx.background_executor().timer(retry_delay).await;

            retry_delay = next_retry_delay(retry_delay);
        }
    })
    .detach();
}

fn next_retry_delay(current: Duration) -> Duration {
    (current * 2).min(MAX_RETRY_DELAY)
}

/// Apply a single server event to the state
pub(crate) fn handle_event(event: ServerEvent, state: &mut AppState) {
    match event {
        ServerEvent::ThreadCreated(thread) => {
            tracing::debug!("Thread created: {}", thread.id);
            // The first message of a new chat creates its thread
            if state.active_thread_id.is_none() && !state.messages.is_empty() {
                state.active_thread_id = Some(thread.id.clone());
            }
            state.upsert_thread(thread);
        }

        ServerEvent::ThreadUpdated(thread) => {
            tracing::debug!("Thread updated: {}", thread.id);
            state.upsert_thread(thread);
        }

        ServerEvent::ThreadDeleted(thread_id) => {
            tracing::debug!("Thread deleted: {}", thread_id);
            state.remove_thread(&thread_id);
        }

        ServerEvent::TaskStart => {
            tracing::trace!("Task started");
            state.set_loading(true);
        }

        ServerEvent::TaskEnd => {
            tracing::trace!("Task ended");
            state.set_loading(false);
        }

        ServerEvent::CommandsSet(commands) => {
            tracing::debug!("Command catalog updated: {} commands", commands.len());
            state.set_commands(commands);
        }

        ServerEvent::ToggleCommandsSet(toggle_commands) => {
            tracing::debug!("Toggle catalog updated: {} toggles", toggle_commands.len());
            state.set_toggle_commands(toggle_commands);
        }

        ServerEvent::InfoPanelSet { title, data } => {
            tracing::debug!("Info panel set with {} rows", data.len());
            state.set_info_panel(title, data);
        }

        ServerEvent::SidebarTitle(title) => {
            tracing::debug!("Element sidebar title: {}", title);
            state.element_sidebar.set_title(title);
        }

        ServerEvent::SidebarElements { elements, key } => {
            tracing::debug!("Element sidebar: {} elements (key {:?})", elements.len(), key);
            state.element_sidebar.set_elements(elements, key);
        }

        ServerEvent::ConnectionStatus(connected) => {
            tracing::info!("Connection status: {}", connected);
            state.set_connected(connected);
        }

        ServerEvent::Keepalive => {
            tracing::trace!("Keepalive received");
        }
    }
}
