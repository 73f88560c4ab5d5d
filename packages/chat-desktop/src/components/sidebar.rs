//! Sidebar component
//!
//! Left sidebar with the collapse, search and new-chat triggers above the
//! info panel and the thread history. Renders inline within the parent
//! AppRoot context and keeps no state of its own.

use gpui::prelude::*;
use gpui::*;

use crate::app::AppRoot;
use crate::components::info_panel::render_info_panel;
use crate::components::thread_history::ThreadHistory;
use crate::i18n::I18n;
use crate::state::AppState;
use crate::theme::Theme;

/// Sidebar rendering functions
pub struct Sidebar;

impl Sidebar {
    /// Render the sidebar inline within the AppRoot context
    pub fn render_inline(collapsed: bool, cx: &mut Context<AppRoot>) -> impl IntoElement {
        let theme = cx.global::<Theme>();

        if collapsed {
            return div()
                .w(px(56.0))
                .h_full()
                .flex()
                .flex_col()
                .items_center()
                .gap(px(4.0))
                .py(px(12.0))
                .bg(theme.background)
                .border_r_1()
                .border_color(theme.border)
                .child(Self::render_collapse_trigger(collapsed, cx))
                .child(Self::render_new_chat_trigger(cx))
                .into_any_element();
        }

        div()
            .w(px(260.0))
            .h_full()
            .flex()
            .flex_col()
            .bg(theme.background)
            .border_r_1()
            .border_color(theme.border)
            .child(Self::render_header(collapsed, cx))
            .child(Self::render_body(cx))
            .into_any_element()
    }

    fn render_header(collapsed: bool, cx: &mut Context<AppRoot>) -> impl IntoElement {
        div()
            .py(px(12.0))
            .px(px(8.0))
            .flex()
            .items_center()
            .justify_between()
            .child(Self::render_collapse_trigger(collapsed, cx))
            .child(
                div()
                    .flex()
                    .items_center()
                    .child(Self::render_search_trigger(cx))
                    .child(Self::render_new_chat_trigger(cx)),
            )
    }

    fn render_body(cx: &mut Context<AppRoot>) -> impl IntoElement {
        let info_panel = {
            let state = cx.global::<AppState>();
            let theme = cx.global::<Theme>();
            let i18n = cx.global::<I18n>();
            state
                .info_panel
                .as_ref()
                .map(|panel| render_info_panel(panel, theme, i18n))
        };

        div()
            .flex_1()
            .flex()
            .flex_col()
            .overflow_hidden()
            .children(info_panel)
            .child(
                div()
                    .id("thread-history-scroll")
                    .flex_1()
                    .overflow_y_scroll()
                    .child(ThreadHistory::render_inline(cx)),
            )
    }

    fn render_trigger(
        id: &'static str,
        glyph: &'static str,
        tooltip: SharedString,
        cx: &Context<AppRoot>,
    ) -> Stateful<Div> {
        let theme = cx.global::<Theme>();
        let hover_bg = theme.background_element;

        div()
            .id(id)
            .w(px(32.0))
            .h(px(32.0))
            .rounded(px(6.0))
            .flex()
            .items_center()
            .justify_center()
            .text_color(theme.text_muted)
            .cursor_pointer()
            .hover(move |style| style.bg(hover_bg))
            .tooltip(move |_window, cx| {
                let label = tooltip.clone();
                cx.new(|_| TriggerTooltip { label }).into()
            })
            .child(glyph)
    }

    fn render_collapse_trigger(collapsed: bool, cx: &mut Context<AppRoot>) -> impl IntoElement {
        let label: SharedString = {
            let i18n = cx.global::<I18n>();
            if collapsed {
                i18n.t("sidebar.expand").into()
            } else {
                i18n.t("sidebar.collapse").into()
            }
        };

        Self::render_trigger("sidebar-trigger", if collapsed { ">>" } else { "<<" }, label, cx)
            .on_click(cx.listener(|this, _event, _window, cx| {
                this.toggle_sidebar(cx);
            }))
    }

    fn render_search_trigger(cx: &mut Context<AppRoot>) -> impl IntoElement {
        let label: SharedString = cx.global::<I18n>().t("sidebar.search").into();

        Self::render_trigger("search-trigger", "⌕", label, cx).on_click(cx.listener(
            |this, _event, window, cx| {
                this.open_search(window, cx);
            },
        ))
    }

    fn render_new_chat_trigger(cx: &mut Context<AppRoot>) -> impl IntoElement {
        let label: SharedString = cx.global::<I18n>().t("sidebar.new_chat").into();

        Self::render_trigger("new-chat-trigger", "+", label, cx).on_click(cx.listener(
            |this, _event, _window, cx| {
                this.new_chat(cx);
            },
        ))
    }
}

struct TriggerTooltip {
    label: SharedString,
}

impl Render for TriggerTooltip {
    fn render(&mut self, _window: &mut Window, cx: &mut Context<Self>) -> impl IntoElement {
        let theme = cx.global::<Theme>();

        div()
            .px(px(8.0))
            .py(px(4.0))
            .rounded(px(4.0))
            .bg(theme.background_element)
            .border_1()
            .border_color(theme.border)
            .text_xs()
            .child(self.label.clone())
    }
}
