//! Thread search dialog
//!
//! A single-line query field plus the matching threads.

use gpui::prelude::*;
use gpui::*;

use crate::app::AppRoot;
use crate::i18n::I18n;
use crate::state::AppState;
use crate::theme::Theme;

/// Emitted whenever the query text changes
#[derive(Clone)]
pub struct QueryChanged {
    pub query: String,
}

/// Query field; typing appends, backspace removes the last character
pub struct SearchInput {
    focus_handle: FocusHandle,
    query: String,
}

impl SearchInput {
    pub fn new(cx: &mut Context<Self>) -> Self {
        Self {
            focus_handle: cx.focus_handle(),
            query: String::new(),
        }
    }

    pub fn focus(&self, window: &mut Window, cx: &mut Context<Self>) {
        self.focus_handle.focus(window);
    }

    pub fn clear(&mut self, cx: &mut Context<Self>) {
        self.query.clear();
        cx.notify();
    }

    fn set_query(&mut self, query: String, cx: &mut Context<Self>) {
        if query == self.query {
            return;
        }
        self.query = query;
        cx.emit(QueryChanged {
            query: self.query.clone(),
        });
        cx.notify();
    }

    fn on_key(&mut self, event: &KeyDownEvent, cx: &mut Context<Self>) {
        let keystroke = &event.keystroke;
        if keystroke.modifiers.control || keystroke.modifiers.platform {
            return;
        }

        let mut query = self.query.clone();
        match keystroke.key.as_str() {
            "backspace" => {
                query.pop();
            }
            "space" => query.push(' '),
            _ => match keystroke.key_char {
                Some(ref typed) if !typed.chars().any(char::is_control) => query.push_str(typed),
                _ => return,
            },
        }
        self.set_query(query, cx);
    }
}

impl EventEmitter<QueryChanged> for SearchInput {}

impl Render for SearchInput {
    fn render(&mut self, window: &mut Window, cx: &mut Context<Self>) -> impl IntoElement {
        let theme = cx.global::<Theme>();
        let focused = self.focus_handle.is_focused(window);
        let placeholder = cx.global::<I18n>().t("search.placeholder");

        div()
            .id("thread-search-input")
            .track_focus(&self.focus_handle)
            .w_full()
            .px(px(12.0))
            .py(px(8.0))
            .rounded(px(8.0))
            .bg(theme.background_element)
            .border_1()
            .border_color(if focused { theme.primary } else { theme.border })
            .flex()
            .items_center()
            .cursor_text()
            .on_key_down(cx.listener(|this, event, _window, cx| this.on_key(event, cx)))
            .when(self.query.is_empty(), |el| {
                el.child(div().text_color(theme.text_muted).child(placeholder))
            })
            .when(!self.query.is_empty(), |el| el.child(self.query.clone()))
            .when(focused, |el| el.child(div().w(px(2.0)).h(px(16.0)).bg(theme.primary)))
    }
}

/// Modal with the query field and matching threads
pub fn render_search_dialog(input: &Entity<SearchInput>, cx: &mut Context<AppRoot>) -> impl IntoElement {
    let state = cx.global::<AppState>();
    let theme = cx.global::<Theme>();
    let i18n = cx.global::<I18n>();
    let hover_bg = theme.background_element;

    let matches: Vec<(String, String)> = state
        .filtered_threads()
        .into_iter()
        .map(|t| {
            (
                t.id.clone(),
                t.name.clone().unwrap_or_else(|| i18n.t("threads.untitled")),
            )
        })
        .collect();
    let no_results = i18n.t("search.no_results");

    div()
        .id("search-dialog")
        .w(px(480.0))
        .max_h(px(480.0))
        .bg(theme.background_panel)
        .border_1()
        .border_color(theme.border)
        .rounded(px(12.0))
        .shadow_lg()
        .p(px(12.0))
        .flex()
        .flex_col()
        .gap(px(8.0))
        // Keep clicks inside the dialog from reaching the overlay
        .on_click(|_event, _window, cx| cx.stop_propagation())
        .child(input.clone())
        .child(
            div()
                .id("search-results")
                .flex()
                .flex_col()
                .gap(px(2.0))
                .overflow_y_scroll()
                .when(matches.is_empty(), |el| {
                    el.child(
                        div()
                            .px(px(8.0))
                            .py(px(6.0))
                            .text_sm()
                            .text_color(theme.text_muted)
                            .child(no_results),
                    )
                })
                .children(matches.into_iter().map(|(thread_id, title)| {
                    let id_for_click = thread_id.clone();
                    div()
                        .id(SharedString::from(format!("search-result-{}", thread_id)))
                        .px(px(8.0))
                        .py(px(6.0))
                        .rounded(px(6.0))
                        .cursor_pointer()
                        .hover(move |style| style.bg(hover_bg))
                        .on_click(cx.listener(move |this, _event, window, cx| {
                            this.select_thread(id_for_click.clone(), cx);
                            this.close_search(window, cx);
                        }))
                        .child(div().text_sm().text_ellipsis().child(title))
                })),
        )
}
