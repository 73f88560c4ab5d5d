//! Root view of the application
//!
//! AppRoot composes the sidebar, the chat area, the element sidebar and the
//! search overlay. It owns the handlers every inline component calls back
//! into, plus the keyboard action handlers.

use gpui::prelude::*;
use gpui::*;
use std::cell::RefCell;

use crate::api::types::{
    Attachment, ListThreadsRequest, OutgoingMessage, Pagination, Starter, ThreadFilter,
};
use crate::api::ApiState;
use crate::components::element_sidebar::render_element_sidebar;
use crate::components::search::{render_search_dialog, QueryChanged, SearchInput};
use crate::components::sidebar::Sidebar;
use crate::i18n::I18n;
use crate::keyboard::{Cancel, CloseElementSidebar, NewChat, SearchChats, ToggleSidebar, ToggleTheme};
use crate::starter::{self, Activation, MessageSender};
use crate::state::AppState;
use crate::theme::{self, Theme};
use crate::views::chat::ChatView;

/// Threads requested on startup
const THREAD_PAGE_SIZE: u32 = 35;

// ============================================================================
// Root View
// ============================================================================

pub struct AppRoot {
    focus_handle: FocusHandle,
    search_input: Entity<SearchInput>,
}

impl AppRoot {
    pub fn new(window: &mut Window, cx: &mut Context<Self>) -> Self {
        let focus_handle = cx.focus_handle();
        focus_handle.focus(window);

        let search_input = cx.new(|cx| SearchInput::new(cx));

        cx.subscribe(&search_input, |_this, _input, event: &QueryChanged, cx| {
            cx.global_mut::<AppState>().thread_search_query = event.query.clone();
            cx.notify();
        })
        .detach();

        Self::start_background_tasks(cx);

        Self {
            focus_handle,
            search_input,
        }
    }

    fn start_background_tasks(cx: &mut Context<Self>) {
        let api_state = cx.global::<ApiState>();
        let client = api_state.client.clone();
        let runtime = api_state.runtime.clone();

        cx.spawn(async move |_this, cx| {
            let client_health = client.clone();
            let healthy = runtime
                .spawn(async move { client_health.health().await.unwrap_or(false) })
                .await
                .unwrap_or(false);

            if !healthy {
                tracing::warn!("Chat server at {} is not reachable", client.base_url());
                let _ = cx.update(|cx| {
                    cx.global_mut::<AppState>().set_threads(Vec::new());
                    cx.refresh_windows();
                });
                return;
            }

            // Project settings: starters and command catalogs
            let client_settings = client.clone();
            match runtime
                .spawn(async move { client_settings.project_settings().await })
                .await
                .unwrap_or_else(|e| Err(anyhow::anyhow!("spawn failed: {}", e)))
            {
                Ok(settings) => {
                    tracing::info!(
                        "Loaded project settings ({} starters, {} commands)",
                        settings.starters.len(),
                        settings.commands.len()
                    );
                    let _ = cx.update(|cx| {
                        cx.global_mut::<AppState>().apply_project_settings(settings);
                        cx.refresh_windows();
                    });
                }
                Err(e) => tracing::warn!("Failed to load project settings: {}", e),
            }

            // First page of threads
            let request = ListThreadsRequest {
                pagination: Pagination {
                    first: THREAD_PAGE_SIZE,
                    cursor: None,
                },
                filter: ThreadFilter::default(),
            };
            let threads = match runtime
                .spawn(async move { client.list_threads(request).await })
                .await
                .unwrap_or_else(|e| Err(anyhow::anyhow!("spawn failed: {}", e)))
            {
                Ok(page) => page.data,
                Err(e) => {
                    tracing::warn!("Failed to list threads: {}", e);
                    Vec::new()
                }
            };

            let _ = cx.update(|cx| {
                cx.global_mut::<AppState>().set_threads(threads);
                cx.refresh_windows();
            });
        })
        .detach();
    }

    // ------------------------------------------------------------------------
    // Callbacks used by inline components
    // ------------------------------------------------------------------------

    pub fn toggle_sidebar(&mut self, cx: &mut Context<Self>) {
        cx.global_mut::<AppState>().toggle_sidebar();
        cx.notify();
    }

    pub fn new_chat(&mut self, cx: &mut Context<Self>) {
        cx.global_mut::<AppState>().new_chat();
        cx.notify();
    }

    pub fn select_thread(&mut self, thread_id: String, cx: &mut Context<Self>) {
        tracing::debug!("Selecting thread {}", thread_id);
        cx.global_mut::<AppState>().set_active_thread(Some(thread_id));
        cx.notify();
    }

    /// Delete a thread on the server, dropping it locally once confirmed
    pub fn delete_thread(&mut self, thread_id: String, cx: &mut Context<Self>) {
        let api_state = cx.global::<ApiState>();
        let client = api_state.client.clone();
        let runtime = api_state.runtime.clone();

        cx.spawn(async move |this, cx| {
            let id = thread_id.clone();
            let result = runtime
                .spawn(async move { client.delete_thread(&id).await })
                .await
                .unwrap_or_else(|e| Err(anyhow::anyhow!("spawn failed: {}", e)));

            match result {
                Ok(()) => {
                    let _ = this.update(cx, |_this, cx| {
                        cx.global_mut::<AppState>().remove_thread(&thread_id);
                        cx.notify();
                    });
                }
                Err(e) => tracing::error!("Failed to delete thread {}: {}", thread_id, e),
            }
        })
        .detach();
    }

    pub fn open_search(&mut self, window: &mut Window, cx: &mut Context<Self>) {
        cx.global_mut::<AppState>().open_search();
        self.search_input.update(cx, |input, cx| input.focus(window, cx));
        cx.notify();
    }

    pub fn close_search(&mut self, window: &mut Window, cx: &mut Context<Self>) {
        cx.global_mut::<AppState>().close_search();
        self.search_input.update(cx, |input, cx| input.clear(cx));
        self.focus_handle.focus(window);
        cx.notify();
    }

    pub fn close_element_sidebar(&mut self, cx: &mut Context<Self>) {
        cx.global_mut::<AppState>().element_sidebar.close();
        cx.notify();
    }

    /// Apply a starter and echo the message it sent into the chat area
    pub fn activate_starter(&mut self, starter: &Starter, cx: &mut Context<Self>) {
        let api = cx.global::<ApiState>().clone();
        let sender = LocalEcho::new(&api);

        let activation = starter::activate(starter, cx.global_mut::<AppState>(), &sender);
        if let Activation::Sent { .. } = activation {
            let state = cx.global_mut::<AppState>();
            for message in sender.into_sent() {
                state.push_local_message(message);
            }
        }

        cx.notify();
    }

    // ------------------------------------------------------------------------
    // Action handlers
    // ------------------------------------------------------------------------

    fn on_toggle_sidebar(&mut self, _: &ToggleSidebar, _window: &mut Window, cx: &mut Context<Self>) {
        self.toggle_sidebar(cx);
    }

    fn on_new_chat(&mut self, _: &NewChat, _window: &mut Window, cx: &mut Context<Self>) {
        self.new_chat(cx);
    }

    fn on_search_chats(&mut self, _: &SearchChats, window: &mut Window, cx: &mut Context<Self>) {
        self.open_search(window, cx);
    }

    fn on_toggle_theme(&mut self, _: &ToggleTheme, _window: &mut Window, cx: &mut Context<Self>) {
        if let Some(theme_id) = theme::toggle_theme_mode(cx) {
            tracing::info!("Switched theme to {}", theme_id);
            cx.global_mut::<AppState>().set_theme(theme_id);
        }
        cx.notify();
    }

    fn on_close_element_sidebar(
        &mut self,
        _: &CloseElementSidebar,
        _window: &mut Window,
        cx: &mut Context<Self>,
    ) {
        self.close_element_sidebar(cx);
    }

    fn on_cancel(&mut self, _: &Cancel, window: &mut Window, cx: &mut Context<Self>) {
        if cx.global::<AppState>().search_open {
            self.close_search(window, cx);
        }
    }

    // ------------------------------------------------------------------------
    // Rendering
    // ------------------------------------------------------------------------

    fn render_header(&self, cx: &Context<Self>) -> impl IntoElement {
        let theme = cx.global::<Theme>();
        let state = cx.global::<AppState>();
        let i18n = cx.global::<I18n>();

        let title = state
            .active_thread_id
            .as_ref()
            .and_then(|id| state.threads.iter().find(|t| &t.id == id))
            .map(|t| t.name.clone().unwrap_or_else(|| i18n.t("threads.untitled")))
            .unwrap_or_else(|| i18n.t("app.name"));

        let (status_label, status_color) = if state.connected {
            (i18n.t("status.connected"), theme.success)
        } else if state.connecting {
            (i18n.t("status.connecting"), theme.warning)
        } else {
            (i18n.t("status.disconnected"), theme.error)
        };

        div()
            .h(px(48.0))
            .px(px(16.0))
            .flex()
            .items_center()
            .justify_between()
            .border_b_1()
            .border_color(theme.border)
            .child(
                div()
                    .text_lg()
                    .font_weight(FontWeight::BOLD)
                    .text_ellipsis()
                    .child(title),
            )
            .child(
                div()
                    .flex()
                    .items_center()
                    .gap(px(4.0))
                    .child(div().w(px(6.0)).h(px(6.0)).rounded_full().bg(status_color))
                    .child(
                        div()
                            .text_xs()
                            .text_color(theme.text_muted)
                            .child(status_label),
                    ),
            )
    }

    fn render_search_overlay(&self, cx: &mut Context<Self>) -> impl IntoElement {
        div()
            .id("search-overlay")
            .absolute()
            .inset_0()
            .bg(Hsla { h: 0.0, s: 0.0, l: 0.0, a: 0.5 })
            .flex()
            .justify_center()
            .pt(px(96.0))
            .on_click(cx.listener(|this, _event, window, cx| {
                this.close_search(window, cx);
            }))
            .child(render_search_dialog(&self.search_input, cx))
    }
}

impl Render for AppRoot {
    fn render(&mut self, _window: &mut Window, cx: &mut Context<Self>) -> impl IntoElement {
        let theme = cx.global::<Theme>();
        let background = theme.background;
        let background_panel = theme.background_panel;
        let text = theme.text;

        let state = cx.global::<AppState>();
        let sidebar_collapsed = state.sidebar_collapsed;
        let search_open = state.search_open;
        let element_sidebar = state
            .element_sidebar
            .open
            .then(|| state.element_sidebar.clone());

        let sidebar = Sidebar::render_inline(sidebar_collapsed, cx);
        let header = self.render_header(cx);
        let chat = ChatView::render_inline(cx);

        div()
            .key_context("AppRoot")
            .track_focus(&self.focus_handle)
            .on_action(cx.listener(Self::on_toggle_sidebar))
            .on_action(cx.listener(Self::on_new_chat))
            .on_action(cx.listener(Self::on_search_chats))
            .on_action(cx.listener(Self::on_toggle_theme))
            .on_action(cx.listener(Self::on_close_element_sidebar))
            .on_action(cx.listener(Self::on_cancel))
            .relative()
            .flex()
            .flex_row()
            .size_full()
            .bg(background)
            .text_color(text)
            .child(sidebar)
            .child(
                div()
                    .flex_1()
                    .flex()
                    .flex_col()
                    .bg(background_panel)
                    .child(header)
                    .child(chat),
            )
            .when_some(element_sidebar, |el, sidebar| {
                el.child(render_element_sidebar(&sidebar, cx))
            })
            .when(search_open, |el| el.child(self.render_search_overlay(cx)))
    }
}

// ============================================================================
// Local echo
// ============================================================================

/// Sender that forwards to the server and keeps a copy of what it sent
struct LocalEcho<'a> {
    inner: &'a ApiState,
    sent: RefCell<Vec<OutgoingMessage>>,
}

impl<'a> LocalEcho<'a> {
    fn new(inner: &'a ApiState) -> Self {
        Self {
            inner,
            sent: RefCell::new(Vec::new()),
        }
    }

    fn into_sent(self) -> Vec<OutgoingMessage> {
        self.sent.into_inner()
    }
}

impl MessageSender for LocalEcho<'_> {
    fn send_message(&self, message: OutgoingMessage, attachments: Vec<Attachment>) {
        self.sent.borrow_mut().push(message.clone());
        self.inner.send_message(message, attachments);
    }
}
