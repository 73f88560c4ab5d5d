//! Chat server HTTP client with event stream support

use anyhow::{anyhow, Result};
use futures::{Stream, StreamExt};
use reqwest::{Client, RequestBuilder, Response};
use serde::{de::DeserializeOwned, Serialize};

use super::types::*;

/// HTTP client for the chat server
#[derive(Debug, Clone)]
pub struct ChatClient {
    base_url: String,
    client: Client,
    access_token: Option<String>,
}

impl ChatClient {
    /// Create a new client with the given base URL
    pub fn new(base_url: &str) -> Self {
        Self {
            base_url: base_url.trim_end_matches('/').to_string(),
            client: Client::new(),
            access_token: None,
        }
    }

    /// Attach a bearer token to every request
    pub fn with_access_token(mut self, token: String) -> Self {
        self.access_token = Some(token);
        self
    }

    /// Get the base URL
    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// Resolve a server-relative path into an absolute URL
    pub fn build_endpoint(&self, path: &str) -> String {
        if path.starts_with('/') {
            format!("{}{}", self.base_url, path)
        } else {
            format!("{}/{}", self.base_url, path)
        }
    }

    // ========================================================================
    // Internal HTTP Methods
    // ========================================================================

    fn authorize(&self, request: RequestBuilder) -> RequestBuilder {
        match self.access_token {
            Some(ref token) => request.bearer_auth(token),
            None => request,
        }
    }

    async fn check(response: Response) -> Result<Response> {
        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(anyhow!("Request failed: {} {}", status, body));
        }
        Ok(response)
    }

    /// Make a GET request
    async fn get<T: DeserializeOwned>(&self, path: &str) -> Result<T> {
        let request = self.authorize(self.client.get(self.build_endpoint(path)));
        let response = Self::check(request.send().await?).await?;
        Ok(response.json().await?)
    }

    /// Make a POST request
    async fn post<T: DeserializeOwned, B: Serialize>(&self, path: &str, body: &B) -> Result<T> {
        let request = self.authorize(self.client.post(self.build_endpoint(path)).json(body));
        let response = Self::check(request.send().await?).await?;
        Ok(response.json().await?)
    }

    /// Make a POST request, ignoring the response body
    async fn post_empty<B: Serialize>(&self, path: &str, body: &B) -> Result<()> {
        let request = self.authorize(self.client.post(self.build_endpoint(path)).json(body));
        Self::check(request.send().await?).await?;
        Ok(())
    }

    /// Make a DELETE request with a JSON body
    async fn delete<B: Serialize>(&self, path: &str, body: &B) -> Result<()> {
        let request = self.authorize(self.client.delete(self.build_endpoint(path)).json(body));
        Self::check(request.send().await?).await?;
        Ok(())
    }

    // ========================================================================
    // Health API
    // ========================================================================

    /// Check if the server is reachable
    pub async fn health(&self) -> Result<bool> {
        match self.client.get(self.build_endpoint("/health")).send().await {
            Ok(response) => Ok(response.status().is_success()),
            Err(_) => Ok(false),
        }
    }

    // ========================================================================
    // Project API
    // ========================================================================

    /// Fetch starters, command catalogs and the current user
    pub async fn project_settings(&self) -> Result<ProjectSettings> {
        self.get("/project/settings").await
    }

    /// List threads, newest first
    pub async fn list_threads(&self, request: ListThreadsRequest) -> Result<ThreadPage> {
        self.post("/project/threads", &request).await
    }

    /// Delete a thread
    pub async fn delete_thread(&self, thread_id: &str) -> Result<()> {
        let request = DeleteThreadRequest {
            thread_id: thread_id.to_string(),
        };
        self.delete("/project/thread", &request).await
    }

    // ========================================================================
    // Message API
    // ========================================================================

    /// Submit a user message
    pub async fn send_message(&self, request: SendMessageRequest) -> Result<()> {
        self.post_empty("/message", &request).await
    }

    // ========================================================================
    // Event Subscription
    // ========================================================================

    /// Subscribe to server events via SSE
    pub async fn subscribe_events(&self) -> Result<impl Stream<Item = Result<ServerEvent>>> {
        let request = self.authorize(
            self.client
                .get(self.build_endpoint("/events"))
                .header("Accept", "text/event-stream"),
        );
        let response = request.send().await?;

        if !response.status().is_success() {
            return Err(anyhow!("Event subscription failed: {}", response.status()));
        }

        Ok(parse_server_events(response.bytes_stream()))
    }
}

// ============================================================================
// Stream Parsing
// ============================================================================

/// Parse the server event stream
///
/// Bytes are buffered until a blank line closes a frame, so multibyte
/// characters split across chunks decode intact. Carriage returns are
/// dropped, which turns CRLF line endings into LF.
fn parse_server_events<S, B, E>(chunks: S) -> impl Stream<Item = Result<ServerEvent>>
where
    S: Stream<Item = std::result::Result<B, E>>,
    B: AsRef<[u8]>,
    E: std::fmt::Display,
{
    async_stream::stream! {
        let mut chunks = std::pin::pin!(chunks);
        let mut buffer: Vec<u8> = Vec::new();

        while let Some(chunk) = chunks.next().await {
            match chunk {
                Ok(bytes) => {
                    buffer.extend(bytes.as_ref().iter().copied().filter(|b| *b != b'\r'));

                    while let Some(message) = next_frame(&mut buffer) {
                        if let Some(event) = parse_server_event_message(&message) {
                            yield Ok(event);
                        }
                    }
                }
                Err(e) => {
                    yield Err(anyhow!("Event stream error: {}", e));
                    break;
                }
            }
        }
    }
}

/// Remove the first complete frame from the buffer
fn next_frame(buffer: &mut Vec<u8>) -> Option<String> {
    let pos = buffer.windows(2).position(|w| w == b"\n\n")?;
    let frame: Vec<u8> = buffer.drain(..pos + 2).take(pos).collect();
    Some(String::from_utf8_lossy(&frame).into_owned())
}

/// Parse a single SSE message into a server event
pub(crate) fn parse_server_event_message(message: &str) -> Option<ServerEvent> {
    let mut event_type = None;
    let mut data: Option<String> = None;

    for line in message.lines() {
        if let Some(value) = line.strip_prefix("event:") {
            event_type = Some(value.trim().to_string());
        } else if let Some(value) = line.strip_prefix("data:") {
            // Multi-line data fields are joined with newlines
            let value = value.trim();
            data = Some(match data {
                Some(existing) => format!("{}\n{}", existing, value),
                None => value.to_string(),
            });
        }
    }

    let event_type = event_type?;
    let data = data.unwrap_or_default();

    match event_type.as_str() {
        "thread.created" => serde_json::from_str(&data).ok().map(ServerEvent::ThreadCreated),
        "thread.updated" => serde_json::from_str(&data).ok().map(ServerEvent::ThreadUpdated),
        "thread.deleted" => serde_json::from_str::<ThreadDeletedEvent>(&data)
            .ok()
            .map(|e| ServerEvent::ThreadDeleted(e.thread_id)),
        "task.start" => Some(ServerEvent::TaskStart),
        "task.end" => Some(ServerEvent::TaskEnd),
        "commands.set" => serde_json::from_str(&data).ok().map(ServerEvent::CommandsSet),
        "toggle_commands.set" => serde_json::from_str(&data)
            .ok()
            .map(ServerEvent::ToggleCommandsSet),
        "info_panel.set" => serde_json::from_str::<InfoPanelPayload>(&data)
            .ok()
            .map(|p| ServerEvent::InfoPanelSet {
                data: p.rows(),
                title: p.title,
            }),
        "sidebar.title" => serde_json::from_str::<String>(&data)
            .ok()
            .map(ServerEvent::SidebarTitle),
        "sidebar.elements" => serde_json::from_str::<SidebarElementsPayload>(&data)
            .ok()
            .map(|p| ServerEvent::SidebarElements {
                elements: p.elements,
                key: p.key,
            }),
        "connection.status" => serde_json::from_str::<ConnectionStatusEvent>(&data)
            .ok()
            .map(|e| ServerEvent::ConnectionStatus(e.connected)),
        "keepalive" => Some(ServerEvent::Keepalive),
        _ => {
            tracing::trace!("Unknown server event type: {}", event_type);
            None
        }
    }
}

// Event wrapper types to match the server's JSON structure

#[derive(serde::Deserialize)]
#[serde(rename_all = "camelCase")]
struct ThreadDeletedEvent {
    thread_id: String,
}

#[derive(serde::Deserialize)]
struct ConnectionStatusEvent {
    connected: bool,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn build_endpoint_joins_paths() {
        let client = ChatClient::new("http://localhost:8000/");
        assert_eq!(
            client.build_endpoint("/public/logo.png"),
            "http://localhost:8000/public/logo.png"
        );
        assert_eq!(client.build_endpoint("health"), "http://localhost:8000/health");
    }

    #[test]
    fn parses_thread_events() {
        let created = parse_server_event_message(
            "event: thread.created\ndata: {\"id\":\"t1\",\"name\":\"Hello\",\"createdAt\":\"2024-05-01T10:00:00Z\"}",
        );
        match created {
            Some(ServerEvent::ThreadCreated(thread)) => {
                assert_eq!(thread.id, "t1");
                assert_eq!(thread.name.as_deref(), Some("Hello"));
            }
            other => panic!("unexpected event: {:?}", other),
        }

        let deleted = parse_server_event_message("event: thread.deleted\ndata: {\"threadId\":\"t1\"}");
        assert!(matches!(deleted, Some(ServerEvent::ThreadDeleted(id)) if id == "t1"));
    }

    #[test]
    fn parses_info_panel_in_order() {
        let event = parse_server_event_message(
            "event: info_panel.set\ndata: {\"title\":\"Order\",\"data\":{\"zeta\":\"1\",\"alpha\":2}}",
        );
        match event {
            Some(ServerEvent::InfoPanelSet { title, data }) => {
                assert_eq!(title.as_deref(), Some("Order"));
                assert_eq!(
                    data,
                    vec![
                        ("zeta".to_string(), "1".to_string()),
                        ("alpha".to_string(), "2".to_string()),
                    ]
                );
            }
            other => panic!("unexpected event: {:?}", other),
        }
    }

    #[test]
    fn parses_sidebar_events() {
        let title = parse_server_event_message("event: sidebar.title\ndata: \"Sources\"");
        assert!(matches!(title, Some(ServerEvent::SidebarTitle(t)) if t == "Sources"));

        let elements = parse_server_event_message(
            "event: sidebar.elements\ndata: {\"elements\":[{\"id\":\"e1\",\"name\":\"doc\",\"type\":\"text\",\"content\":\"hi\"}],\"key\":\"k\"}",
        );
        match elements {
            Some(ServerEvent::SidebarElements { elements, key }) => {
                assert_eq!(elements.len(), 1);
                assert_eq!(elements[0].kind, "text");
                assert_eq!(key.as_deref(), Some("k"));
            }
            other => panic!("unexpected event: {:?}", other),
        }
    }

    #[test]
    fn parses_catalog_events() {
        let commands = parse_server_event_message(
            "event: commands.set\ndata: [{\"id\":\"search\",\"description\":\"Search the web\"}]",
        );
        assert!(matches!(commands, Some(ServerEvent::CommandsSet(c)) if c[0].id == "search"));

        let toggles = parse_server_event_message(
            "event: toggle_commands.set\ndata: [{\"id\":\"deep\",\"persistent\":true}]",
        );
        assert!(matches!(toggles, Some(ServerEvent::ToggleCommandsSet(t)) if t[0].persistent));
    }

    fn collect_events(chunks: Vec<&'static [u8]>) -> Vec<ServerEvent> {
        let stream = futures::stream::iter(
            chunks.into_iter().map(Ok::<&'static [u8], std::io::Error>),
        );
        futures::executor::block_on(parse_server_events(stream).collect::<Vec<_>>())
            .into_iter()
            .map(|event| event.unwrap())
            .collect()
    }

    #[test]
    fn multibyte_text_split_across_chunks() {
        let raw = "event: sidebar.title\ndata: \"信息面板\"\n\nevent: keepalive\n\n".as_bytes();
        let split = raw.iter().position(|b| *b == 0xE4).unwrap() + 1;
        let (head, tail) = raw.split_at(split);

        let events = collect_events(vec![head, tail]);

        assert_eq!(events.len(), 2);
        assert!(matches!(&events[0], ServerEvent::SidebarTitle(t) if t == "信息面板"));
        assert!(matches!(events[1], ServerEvent::Keepalive));
    }

    #[test]
    fn crlf_frames_are_recognized() {
        let events = collect_events(vec![
            &b"event: task.start\r\ndata: {}\r\n\r"[..],
            &b"\nevent: task.end\r\n\r\n"[..],
        ]);

        assert_eq!(events.len(), 2);
        assert!(matches!(events[0], ServerEvent::TaskStart));
        assert!(matches!(events[1], ServerEvent::TaskEnd));
    }

    #[test]
    fn ignores_unknown_and_untyped_messages() {
        assert!(parse_server_event_message("event: mystery\ndata: {}").is_none());
        assert!(parse_server_event_message("data: {}").is_none());
        assert!(matches!(
            parse_server_event_message("event: keepalive"),
            Some(ServerEvent::Keepalive)
        ));
    }
}
