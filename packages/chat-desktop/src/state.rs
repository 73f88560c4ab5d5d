//! Centralized application state management
//!
//! This module provides the single source of truth for the chat client:
//! catalogs, the selected command and toggles, threads and sidebar panels.

use gpui::*;

use crate::api::types::{
    Command, Element, OutgoingMessage, ProjectSettings, Starter, ThreadSummary, ToggleCommand,
    Toggleable, User,
};
use crate::starter::StarterContext;

// ============================================================================
// Application State
// ============================================================================

/// Centralized application state
#[derive(Debug, Clone)]
pub struct AppState {
    // Connection state
    pub server_url: String,
    pub connected: bool,
    pub connecting: bool,
    /// Server is processing a message
    pub loading: bool,

    pub user: Option<User>,

    // Starters and command catalogs
    pub starters: Vec<Starter>,
    pub commands: Vec<Command>,
    pub toggle_commands: Vec<ToggleCommand>,
    pub selected_command: Option<Command>,
    pub toggleables: Vec<Toggleable>,

    // Thread state
    pub threads: Vec<ThreadSummary>,
    pub threads_loading: bool,
    pub active_thread_id: Option<String>,
    pub thread_search_query: String,

    // Messages sent from this client in the current thread
    pub messages: Vec<OutgoingMessage>,

    // UI State
    pub sidebar_collapsed: bool,
    pub search_open: bool,
    pub current_theme_id: String,

    // Server-driven panels
    pub info_panel: Option<InfoPanel>,
    pub element_sidebar: ElementSidebar,
}

impl Default for AppState {
    fn default() -> Self {
        Self {
            server_url: crate::config::DEFAULT_SERVER_URL.to_string(),
            connected: false,
            connecting: false,
            loading: false,

            user: None,

            starters: Vec::new(),
            commands: Vec::new(),
            toggle_commands: Vec::new(),
            selected_command: None,
            toggleables: Vec::new(),

            threads: Vec::new(),
            threads_loading: true,
            active_thread_id: None,
            thread_search_query: String::new(),

            messages: Vec::new(),

            sidebar_collapsed: false,
            search_open: false,
            current_theme_id: crate::theme::DEFAULT_THEME_ID.to_string(),

            info_panel: None,
            element_sidebar: ElementSidebar::default(),
        }
    }
}

impl Global for AppState {}

// ============================================================================
// Supporting Types
// ============================================================================

/// Key/value card shown in the left sidebar
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct InfoPanel {
    /// Localized default is used when absent
    pub title: Option<String>,
    pub entries: Vec<(String, String)>,
}

/// Right-hand panel the server fills with elements
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ElementSidebar {
    pub title: Option<String>,
    pub elements: Vec<Element>,
    pub key: Option<String>,
    pub open: bool,
}

impl ElementSidebar {
    /// Set the title and open the sidebar
    pub fn set_title(&mut self, title: String) {
        self.title = Some(title);
        self.open = true;
    }

    /// Replace the elements; an empty list closes the sidebar
    ///
    /// When the sidebar is already open under the same key the current
    /// elements are kept.
    pub fn set_elements(&mut self, elements: Vec<Element>, key: Option<String>) {
        if elements.is_empty() {
            *self = Self::default();
            return;
        }
        if self.open && key.is_some() && self.key == key {
            return;
        }
        self.elements = elements;
        self.key = key;
        self.open = true;
    }

    pub fn close(&mut self) {
        *self = Self::default();
    }
}

// ============================================================================
// State Actions
// ============================================================================

impl AppState {
    /// Set connection status
    pub fn set_connected(&mut self, connected: bool) {
        self.connected = connected;
        self.connecting = false;
        if !connected {
            self.loading = false;
        }
    }

    pub fn set_loading(&mut self, loading: bool) {
        self.loading = loading;
    }

    /// Apply project settings fetched from the server
    ///
    /// Local starters from the config file are used only when the server
    /// provides none.
    pub fn apply_project_settings(&mut self, settings: ProjectSettings) {
        if !settings.starters.is_empty() {
            self.starters = settings.starters;
        }
        self.set_commands(settings.commands);
        self.toggle_commands = settings.toggle_commands;
        if settings.user.is_some() {
            self.user = settings.user;
        }
    }

    /// Replace the command catalog, dropping a selection that no longer exists
    pub fn set_commands(&mut self, commands: Vec<Command>) {
        if let Some(ref selected) = self.selected_command {
            if !commands.iter().any(|c| c.id == selected.id) {
                self.selected_command = None;
            }
        }
        self.commands = commands;
    }

    pub fn set_toggle_commands(&mut self, toggle_commands: Vec<ToggleCommand>) {
        self.toggle_commands = toggle_commands;
    }

    /// Set threads list
    pub fn set_threads(&mut self, threads: Vec<ThreadSummary>) {
        self.threads = threads;
        self.threads_loading = false;
    }

    /// Insert a new thread at the top, or update it if already known
    pub fn upsert_thread(&mut self, thread: ThreadSummary) {
        if let Some(existing) = self.threads.iter_mut().find(|t| t.id == thread.id) {
            *existing = thread;
        } else {
            self.threads.insert(0, thread);
        }
    }

    /// Remove a thread by ID
    pub fn remove_thread(&mut self, thread_id: &str) {
        self.threads.retain(|t| t.id != thread_id);
        if self.active_thread_id.as_deref() == Some(thread_id) {
            self.new_chat();
        }
    }

    /// Switch to an existing thread
    pub fn set_active_thread(&mut self, thread_id: Option<String>) {
        if self.active_thread_id != thread_id {
            self.messages.clear();
        }
        self.active_thread_id = thread_id;
    }

    /// Start a fresh conversation
    pub fn new_chat(&mut self) {
        self.active_thread_id = None;
        self.messages.clear();
        self.element_sidebar.close();
    }

    /// Record a message sent from this client
    pub fn push_local_message(&mut self, message: OutgoingMessage) {
        self.messages.push(message);
    }

    /// Toggle sidebar
    pub fn toggle_sidebar(&mut self) {
        self.sidebar_collapsed = !self.sidebar_collapsed;
    }

    pub fn open_search(&mut self) {
        self.search_open = true;
    }

    pub fn close_search(&mut self) {
        self.search_open = false;
        self.thread_search_query.clear();
    }

    /// Set theme
    pub fn set_theme(&mut self, theme_id: String) {
        self.current_theme_id = theme_id;
    }

    /// Replace the info panel; no rows hides it
    pub fn set_info_panel(&mut self, title: Option<String>, entries: Vec<(String, String)>) {
        if entries.is_empty() {
            self.info_panel = None;
            return;
        }
        self.info_panel = Some(InfoPanel { title, entries });
    }

    /// Get filtered threads based on search query
    pub fn filtered_threads(&self) -> Vec<&ThreadSummary> {
        if self.thread_search_query.is_empty() {
            self.threads.iter().collect()
        } else {
            let query = self.thread_search_query.to_lowercase();
            self.threads
                .iter()
                .filter(|t| {
                    t.name
                        .as_ref()
                        .map(|n| n.to_lowercase().contains(&query))
                        .unwrap_or(false)
                        || t.id.to_lowercase().contains(&query)
                })
                .collect()
        }
    }

    /// Show starters only before anything was said in the thread
    pub fn shows_starters(&self) -> bool {
        self.active_thread_id.is_none() && self.messages.is_empty() && !self.starters.is_empty()
    }

    /// Pseudo-URL of the current view, recorded on outgoing messages
    pub fn location(&self) -> String {
        match self.active_thread_id {
            Some(ref id) => format!("{}/thread/{}", self.server_url, id),
            None => format!("{}/", self.server_url),
        }
    }
}

impl StarterContext for AppState {
    fn selected_command(&self) -> Option<&Command> {
        self.selected_command.as_ref()
    }

    fn set_selected_command(&mut self, command: Command) {
        self.selected_command = Some(command);
    }

    fn toggleables(&self) -> &[Toggleable] {
        &self.toggleables
    }

    fn set_toggleables(&mut self, toggleables: Vec<Toggleable>) {
        self.toggleables = toggleables;
    }

    fn commands(&self) -> &[Command] {
        &self.commands
    }

    fn toggle_commands(&self) -> &[ToggleCommand] {
        &self.toggle_commands
    }

    fn is_loading(&self) -> bool {
        self.loading
    }

    fn is_connected(&self) -> bool {
        self.connected
    }

    fn user_identifier(&self) -> Option<&str> {
        self.user.as_ref().map(|u| u.identifier.as_str())
    }

    fn location(&self) -> String {
        AppState::location(self)
    }

    fn thread_id(&self) -> Option<&str> {
        self.active_thread_id.as_deref()
    }
}

// ============================================================================
// State Initialization
// ============================================================================

/// Initialize the application state from the loaded configuration
pub fn init(cx: &mut App, config: &crate::config::AppConfig) {
    let state = AppState {
        server_url: config.server_url.trim_end_matches('/').to_string(),
        starters: config.starters.clone(),
        current_theme_id: config.theme.clone(),
        user: config
            .user_name
            .clone()
            .map(|identifier| User { identifier }),
        ..Default::default()
    };
    cx.set_global(state);
    tracing::debug!("Application state initialized");
}

#[cfg(test)]
mod tests {
    use super::*;
    use core::prelude::v1::test;

    fn element(id: &str) -> Element {
        Element {
            id: id.to_string(),
            name: id.to_string(),
            kind: "text".to_string(),
            content: Some("body".to_string()),
            url: None,
        }
    }

    fn thread(id: &str, name: Option<&str>) -> ThreadSummary {
        ThreadSummary {
            id: id.to_string(),
            name: name.map(str::to_string),
            created_at: "2024-05-01T10:00:00Z".to_string(),
        }
    }

    #[test]
    fn sidebar_title_opens() {
        let mut sidebar = ElementSidebar::default();
        sidebar.set_title("Sources".to_string());
        assert!(sidebar.open);
        assert_eq!(sidebar.title.as_deref(), Some("Sources"));
    }

    #[test]
    fn sidebar_same_key_keeps_elements() {
        let mut sidebar = ElementSidebar::default();
        sidebar.set_elements(vec![element("a")], Some("k".to_string()));
        sidebar.set_elements(vec![element("b")], Some("k".to_string()));
        assert_eq!(sidebar.elements, vec![element("a")]);

        sidebar.set_elements(vec![element("c")], Some("other".to_string()));
        assert_eq!(sidebar.elements, vec![element("c")]);

        sidebar.set_elements(vec![element("d")], None);
        sidebar.set_elements(vec![element("e")], None);
        assert_eq!(sidebar.elements, vec![element("e")]);
    }

    #[test]
    fn sidebar_empty_elements_close() {
        let mut sidebar = ElementSidebar::default();
        sidebar.set_title("Sources".to_string());
        sidebar.set_elements(vec![element("a")], None);
        sidebar.set_elements(Vec::new(), None);
        assert_eq!(sidebar, ElementSidebar::default());
    }

    #[test]
    fn info_panel_hides_when_empty() {
        let mut state = AppState::default();
        state.set_info_panel(None, vec![("Plan".to_string(), "Pro".to_string())]);
        let panel = state.info_panel.clone().unwrap();
        assert!(panel.title.is_none());
        assert_eq!(panel.entries.len(), 1);

        state.set_info_panel(Some("Account".to_string()), Vec::new());
        assert!(state.info_panel.is_none());
    }

    #[test]
    fn filtered_threads_match_name_or_id() {
        let mut state = AppState::default();
        state.set_threads(vec![
            thread("abc", Some("Trip planning")),
            thread("def", None),
            thread("xyz", Some("Recipes")),
        ]);

        state.thread_search_query = "TRIP".to_string();
        let ids: Vec<&str> = state.filtered_threads().iter().map(|t| t.id.as_str()).collect();
        assert_eq!(ids, vec!["abc"]);

        state.thread_search_query = "de".to_string();
        let ids: Vec<&str> = state.filtered_threads().iter().map(|t| t.id.as_str()).collect();
        assert_eq!(ids, vec!["def"]);
    }

    #[test]
    fn upsert_and_remove_threads() {
        let mut state = AppState::default();
        state.upsert_thread(thread("a", None));
        state.upsert_thread(thread("b", None));
        state.upsert_thread(thread("a", Some("Renamed")));
        assert_eq!(state.threads.len(), 2);
        assert_eq!(state.threads[0].id, "b");
        assert_eq!(state.threads[1].name.as_deref(), Some("Renamed"));

        state.set_active_thread(Some("a".to_string()));
        state.remove_thread("a");
        assert!(state.active_thread_id.is_none());
        assert_eq!(state.threads.len(), 1);
    }

    #[test]
    fn removed_command_clears_selection() {
        let mut state = AppState::default();
        state.set_commands(vec![Command {
            id: "search".to_string(),
            ..Default::default()
        }]);
        state.selected_command = state.commands.first().cloned();
        state.set_commands(Vec::new());
        assert!(state.selected_command.is_none());
    }

    #[test]
    fn location_follows_active_thread() {
        let mut state = AppState {
            server_url: "http://localhost:8000".to_string(),
            ..Default::default()
        };
        assert_eq!(StarterContext::location(&state), "http://localhost:8000/");
        state.set_active_thread(Some("t1".to_string()));
        assert_eq!(StarterContext::location(&state), "http://localhost:8000/thread/t1");
    }

    #[test]
    fn disconnect_clears_loading() {
        let mut state = AppState::default();
        state.set_connected(true);
        state.set_loading(true);
        state.set_connected(false);
        assert!(!state.loading);
    }

    #[test]
    fn starters_only_on_empty_thread() {
        let mut state = AppState::default();
        assert!(!state.shows_starters());
        state.starters.push(Starter {
            label: "Hi".to_string(),
            message: "Hello".to_string(),
            ..Default::default()
        });
        assert!(state.shows_starters());
        state.set_active_thread(Some("t".to_string()));
        assert!(!state.shows_starters());
    }
}
