//! Starter activation
//!
//! A starter pre-fills a chat message and may select a command and replace
//! the non-persistent toggle options before the message is sent. State is
//! reached through [`StarterContext`] so the logic stays independent of the
//! UI framework; dispatch goes through [`MessageSender`].
//!
//! Unresolved command or toggle ids are skipped without an error.

use std::collections::HashSet;

use chrono::{SecondsFormat, Utc};
use uuid::Uuid;

use crate::api::types::{
    Attachment, Command, MessageMetadata, OutgoingMessage, Starter, ToggleCommand, Toggleable,
};

/// Author name used when no user is signed in
pub const FALLBACK_AUTHOR: &str = "User";

/// Type tag of messages typed (or started) by the user
pub const USER_MESSAGE_TYPE: &str = "user_message";

/// Read/update handles for the chat state a starter touches
pub trait StarterContext {
    fn selected_command(&self) -> Option<&Command>;
    fn set_selected_command(&mut self, command: Command);
    fn toggleables(&self) -> &[Toggleable];
    fn set_toggleables(&mut self, toggleables: Vec<Toggleable>);
    fn commands(&self) -> &[Command];
    fn toggle_commands(&self) -> &[ToggleCommand];
    fn is_loading(&self) -> bool;
    fn is_connected(&self) -> bool;
    fn user_identifier(&self) -> Option<&str>;
    /// Where the message is submitted from
    fn location(&self) -> String;
    fn thread_id(&self) -> Option<&str>;
}

/// Message transport; delivery is not awaited by the caller
pub trait MessageSender {
    fn send_message(&self, message: OutgoingMessage, attachments: Vec<Attachment>);
}

/// Turns a server-relative path into a fetchable URL
pub trait EndpointBuilder {
    fn build_endpoint(&self, path: &str) -> String;
}

/// Result of clicking a starter
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Activation {
    /// Chat is loading or offline; nothing happened
    Disabled,
    /// Message handed to the sender
    Sent { message_id: String },
}

/// Starters are inert while the chat is busy or offline
pub fn is_disabled(ctx: &impl StarterContext) -> bool {
    ctx.is_loading() || !ctx.is_connected()
}

/// Look up the starter's first command in the catalog
pub fn resolve_command<'a>(starter: &Starter, catalog: &'a [Command]) -> Option<&'a Command> {
    let id = starter.commands.first()?;
    catalog.iter().find(|cmd| &cmd.id == id)
}

/// Keep persistent toggles and activate the requested ones
///
/// Requested ids missing from the catalog are skipped. A requested id that is
/// already present as a persistent toggle replaces it, and an id requested
/// twice is only added once.
pub fn merge_toggleables(
    existing: &[Toggleable],
    requested: &[String],
    catalog: &[ToggleCommand],
) -> Vec<Toggleable> {
    let mut added: Vec<Toggleable> = Vec::with_capacity(requested.len());
    let mut seen = HashSet::new();

    for id in requested {
        if !seen.insert(id.as_str()) {
            continue;
        }
        if let Some(toggle) = catalog.iter().find(|cmd| &cmd.id == id) {
            added.push(Toggleable {
                id: toggle.id.clone(),
                active: true,
                persistent: toggle.persistent,
            });
        }
    }

    existing
        .iter()
        .filter(|t| t.persistent)
        .filter(|t| !added.iter().any(|a| a.id == t.id))
        .cloned()
        .chain(added.clone())
        .collect()
}

/// Build the message a starter sends
///
/// `selected_command` is read after command resolution, so it is the
/// starter's own command when that resolved and the prior selection otherwise.
pub fn build_message(
    starter: &Starter,
    selected_command: Option<&str>,
    author: Option<&str>,
    location: String,
    thread_id: Option<&str>,
) -> OutgoingMessage {
    let command = selected_command.map(str::to_string);

    OutgoingMessage {
        thread_id: thread_id.unwrap_or_default().to_string(),
        id: Uuid::new_v4().to_string(),
        command,
        toggleables: starter.toggle_commands.clone(),
        name: author
            .filter(|a| !a.is_empty())
            .unwrap_or(FALLBACK_AUTHOR)
            .to_string(),
        kind: USER_MESSAGE_TYPE.to_string(),
        output: starter.message.clone(),
        created_at: Utc::now().to_rfc3339_opts(SecondsFormat::Millis, true),
        metadata: MessageMetadata { location },
    }
}

/// Apply a starter to the chat state and send its message
pub fn activate(
    starter: &Starter,
    ctx: &mut impl StarterContext,
    sender: &impl MessageSender,
) -> Activation {
    if is_disabled(ctx) {
        return Activation::Disabled;
    }

    if let Some(command) = resolve_command(starter, ctx.commands()).cloned() {
        ctx.set_selected_command(command);
    }

    if !starter.toggle_commands.is_empty() {
        let merged = merge_toggleables(
            ctx.toggleables(),
            &starter.toggle_commands,
            ctx.toggle_commands(),
        );
        ctx.set_toggleables(merged);
    }

    let message = build_message(
        starter,
        ctx.selected_command().map(|cmd| cmd.id.as_str()),
        ctx.user_identifier(),
        ctx.location(),
        ctx.thread_id(),
    );
    let message_id = message.id.clone();

    tracing::debug!(
        "Starter '{}' sending message {} (command: {:?})",
        starter.label,
        message_id,
        message.command
    );
    sender.send_message(message, Vec::new());

    Activation::Sent { message_id }
}

// ============================================================================
// Icons
// ============================================================================

/// How a starter icon is drawn
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum IconSource {
    /// Image fetched from this URL
    Image(String),
    /// Named glyph
    Glyph(String),
}

impl IconSource {
    /// Whether an icon string points at an image rather than naming a glyph
    pub fn is_image_reference(icon: &str) -> bool {
        icon.starts_with("http")
            || icon.starts_with('/')
            || icon.starts_with("./")
            || icon.starts_with("../")
    }

    /// Classify an icon, resolving `/public` paths against the server
    pub fn resolve(icon: &str, endpoints: &impl EndpointBuilder) -> Self {
        if !Self::is_image_reference(icon) {
            return IconSource::Glyph(icon.to_string());
        }
        if icon.starts_with("/public") {
            IconSource::Image(endpoints.build_endpoint(icon))
        } else {
            IconSource::Image(icon.to_string())
        }
    }
}

/// Icon for a starter, if it has one
pub fn starter_icon(starter: &Starter, endpoints: &impl EndpointBuilder) -> Option<IconSource> {
    starter
        .icon
        .as_deref()
        .map(|icon| IconSource::resolve(icon, endpoints))
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::cell::RefCell;

    #[derive(Default)]
    struct TestContext {
        selected: Option<Command>,
        toggleables: Vec<Toggleable>,
        commands: Vec<Command>,
        toggle_commands: Vec<ToggleCommand>,
        loading: bool,
        connected: bool,
        user: Option<String>,
        thread_id: Option<String>,
    }

    impl StarterContext for TestContext {
        fn selected_command(&self) -> Option<&Command> {
            self.selected.as_ref()
        }
        fn set_selected_command(&mut self, command: Command) {
            self.selected = Some(command);
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
            self.user.as_deref()
        }
        fn location(&self) -> String {
            "chat://localhost/".to_string()
        }
        fn thread_id(&self) -> Option<&str> {
            self.thread_id.as_deref()
        }
    }

    #[derive(Default)]
    struct RecordingSender {
        sent: RefCell<Vec<(OutgoingMessage, Vec<Attachment>)>>,
    }

    impl MessageSender for RecordingSender {
        fn send_message(&self, message: OutgoingMessage, attachments: Vec<Attachment>) {
            self.sent.borrow_mut().push((message, attachments));
        }
    }

    struct TestEndpoints;

    impl EndpointBuilder for TestEndpoints {
        fn build_endpoint(&self, path: &str) -> String {
            format!("http://server{}", path)
        }
    }

    fn command(id: &str) -> Command {
        Command {
            id: id.to_string(),
            ..Default::default()
        }
    }

    fn toggle_command(id: &str, persistent: bool) -> ToggleCommand {
        ToggleCommand {
            id: id.to_string(),
            persistent,
        }
    }

    fn toggle(id: &str, active: bool, persistent: bool) -> Toggleable {
        Toggleable {
            id: id.to_string(),
            active,
            persistent,
        }
    }

    fn starter(commands: &[&str], toggles: &[&str]) -> Starter {
        Starter {
            label: "Plan a trip".to_string(),
            message: "Help me plan a weekend trip".to_string(),
            icon: None,
            commands: commands.iter().map(|s| s.to_string()).collect(),
            toggle_commands: toggles.iter().map(|s| s.to_string()).collect(),
        }
    }

    fn online() -> TestContext {
        TestContext {
            connected: true,
            commands: vec![command("search"), command("image")],
            toggle_commands: vec![toggle_command("c", false), toggle_command("a", true)],
            ..Default::default()
        }
    }

    #[test]
    fn plain_starter_leaves_state_and_reuses_selection() {
        let mut ctx = online();
        ctx.selected = Some(command("image"));
        ctx.toggleables = vec![toggle("b", true, false)];
        let sender = RecordingSender::default();

        let outcome = activate(&starter(&[], &[]), &mut ctx, &sender);

        assert!(matches!(outcome, Activation::Sent { .. }));
        assert_eq!(ctx.selected, Some(command("image")));
        assert_eq!(ctx.toggleables, vec![toggle("b", true, false)]);

        let sent = sender.sent.borrow();
        let (message, attachments) = &sent[0];
        assert_eq!(message.command.as_deref(), Some("image"));
        assert!(message.toggleables.is_empty());
        assert!(attachments.is_empty());
    }

    #[test]
    fn plain_starter_without_selection_sends_no_command() {
        let mut ctx = online();
        let sender = RecordingSender::default();

        activate(&starter(&[], &[]), &mut ctx, &sender);

        assert_eq!(sender.sent.borrow()[0].0.command, None);
    }

    #[test]
    fn known_command_becomes_selected() {
        let mut ctx = online();
        ctx.selected = Some(command("image"));
        let sender = RecordingSender::default();

        activate(&starter(&["search", "image"], &[]), &mut ctx, &sender);

        assert_eq!(ctx.selected, Some(command("search")));
        assert_eq!(sender.sent.borrow()[0].0.command.as_deref(), Some("search"));
    }

    #[test]
    fn unknown_command_keeps_prior_selection() {
        let mut ctx = online();
        ctx.selected = Some(command("image"));
        let sender = RecordingSender::default();

        activate(&starter(&["missing"], &[]), &mut ctx, &sender);

        assert_eq!(ctx.selected, Some(command("image")));
        assert_eq!(sender.sent.borrow()[0].0.command.as_deref(), Some("image"));
    }

    #[test]
    fn toggles_keep_persistent_and_add_requested() {
        let existing = vec![toggle("a", true, true), toggle("b", true, false)];
        let catalog = vec![toggle_command("c", false)];

        let merged = merge_toggleables(&existing, &["c".to_string()], &catalog);

        assert_eq!(merged, vec![toggle("a", true, true), toggle("c", true, false)]);
    }

    #[test]
    fn requested_toggle_replaces_persistent_duplicate() {
        let existing = vec![toggle("a", false, true), toggle("x", true, true)];
        let catalog = vec![toggle_command("a", true)];

        let merged = merge_toggleables(
            &existing,
            &["a".to_string(), "a".to_string(), "nope".to_string()],
            &catalog,
        );

        assert_eq!(merged, vec![toggle("x", true, true), toggle("a", true, true)]);
    }

    #[test]
    fn starter_toggles_sent_raw_and_state_replaced() {
        let mut ctx = online();
        ctx.toggleables = vec![toggle("a", true, true), toggle("b", true, false)];
        let sender = RecordingSender::default();

        activate(&starter(&[], &["c", "unknown"]), &mut ctx, &sender);

        assert_eq!(ctx.toggleables, vec![toggle("a", true, true), toggle("c", true, false)]);
        assert_eq!(sender.sent.borrow()[0].0.toggleables, vec!["c", "unknown"]);
    }

    #[test]
    fn message_fields() {
        let mut ctx = online();
        ctx.user = Some("ada".to_string());
        ctx.thread_id = Some("thread-1".to_string());
        let sender = RecordingSender::default();

        activate(&starter(&[], &[]), &mut ctx, &sender);

        let sent = sender.sent.borrow();
        let message = &sent[0].0;
        assert_eq!(message.name, "ada");
        assert_eq!(message.kind, USER_MESSAGE_TYPE);
        assert_eq!(message.output, "Help me plan a weekend trip");
        assert_eq!(message.thread_id, "thread-1");
        assert_eq!(message.metadata.location, "chat://localhost/");
        assert!(chrono::DateTime::parse_from_rfc3339(&message.created_at).is_ok());
    }

    #[test]
    fn anonymous_author_falls_back() {
        let mut ctx = online();
        let sender = RecordingSender::default();

        activate(&starter(&[], &[]), &mut ctx, &sender);

        assert_eq!(sender.sent.borrow()[0].0.name, FALLBACK_AUTHOR);
        assert_eq!(sender.sent.borrow()[0].0.thread_id, "");

        ctx.user = Some(String::new());
        activate(&starter(&[], &[]), &mut ctx, &sender);
        assert_eq!(sender.sent.borrow()[1].0.name, FALLBACK_AUTHOR);

        let message = build_message(&starter(&[], &[]), None, Some(""), String::new(), None);
        assert_eq!(message.name, FALLBACK_AUTHOR);
    }

    #[test]
    fn message_ids_are_unique() {
        let mut ctx = online();
        let sender = RecordingSender::default();
        let s = starter(&[], &[]);

        for _ in 0..200 {
            activate(&s, &mut ctx, &sender);
        }

        let ids: HashSet<String> = sender.sent.borrow().iter().map(|(m, _)| m.id.clone()).collect();
        assert_eq!(ids.len(), 200);
    }

    #[test]
    fn disabled_starter_does_nothing() {
        let sender = RecordingSender::default();

        let mut loading = online();
        loading.loading = true;
        assert_eq!(
            activate(&starter(&["search"], &["c"]), &mut loading, &sender),
            Activation::Disabled
        );
        assert!(loading.selected.is_none());

        let mut offline = online();
        offline.connected = false;
        assert_eq!(activate(&starter(&[], &[]), &mut offline, &sender), Activation::Disabled);

        assert!(sender.sent.borrow().is_empty());
    }

    #[test]
    fn icon_classification() {
        assert!(IconSource::is_image_reference("https://x/y.png"));
        assert!(IconSource::is_image_reference("/icons/foo.svg"));
        assert!(IconSource::is_image_reference("./a.png"));
        assert!(IconSource::is_image_reference("../a.png"));
        assert!(!IconSource::is_image_reference("mdi-star"));
    }

    #[test]
    fn public_icons_resolve_through_server() {
        assert_eq!(
            IconSource::resolve("/public/logo.png", &TestEndpoints),
            IconSource::Image("http://server/public/logo.png".to_string())
        );
        assert_eq!(
            IconSource::resolve("/icons/foo.svg", &TestEndpoints),
            IconSource::Image("/icons/foo.svg".to_string())
        );
        assert_eq!(
            IconSource::resolve("mdi-star", &TestEndpoints),
            IconSource::Glyph("mdi-star".to_string())
        );
    }

    #[test]
    fn starter_without_icon_has_none() {
        assert_eq!(starter_icon(&starter(&[], &[]), &TestEndpoints), None);
    }

    #[test]
    fn element_id_slug() {
        let s = Starter {
            label: "  Write a Poem ".to_string(),
            ..Default::default()
        };
        assert_eq!(s.element_id(), "starter-write-a-poem");
    }
}
