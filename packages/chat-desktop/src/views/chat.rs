//! Chat area
//!
//! Shows the starter grid on an empty thread and the messages this client
//! sent otherwise. The selected command and active toggles sit above as chips.

use gpui::prelude::*;
use gpui::*;

use crate::api::types::OutgoingMessage;
use crate::api::ApiState;
use crate::app::AppRoot;
use crate::components::starter::StarterButton;
use crate::i18n::I18n;
use crate::starter::{is_disabled, starter_icon};
use crate::state::AppState;
use crate::theme::Theme;

/// Chat area rendering functions
pub struct ChatView;

impl ChatView {
    /// Render the chat area inline within the AppRoot context
    pub fn render_inline(cx: &mut Context<AppRoot>) -> impl IntoElement {
        let state = cx.global::<AppState>();
        let shows_starters = state.shows_starters();
        let has_messages = !state.messages.is_empty();

        let body = if shows_starters {
            Self::render_starters(cx).into_any_element()
        } else if has_messages {
            Self::render_messages(cx).into_any_element()
        } else {
            Self::render_empty(cx).into_any_element()
        };

        div()
            .flex_1()
            .flex()
            .flex_col()
            .overflow_hidden()
            .child(Self::render_status_bar(cx))
            .child(body)
    }

    fn render_status_bar(cx: &Context<AppRoot>) -> impl IntoElement {
        let state = cx.global::<AppState>();
        let theme = cx.global::<Theme>();
        let i18n = cx.global::<I18n>();

        let notice = if !state.connected {
            Some((
                i18n.format("chat.disconnected", &[("url", state.server_url.as_str())]),
                theme.error,
            ))
        } else if state.loading {
            Some((i18n.t("chat.loading"), theme.warning))
        } else {
            None
        };

        let command = state
            .selected_command
            .as_ref()
            .map(|c| {
                (
                    i18n.format("chat.command", &[("command", c.id.as_str())]),
                    c.description.clone(),
                )
            });
        let active_toggles: Vec<String> = state
            .toggleables
            .iter()
            .filter(|t| t.active)
            .map(|t| t.id.clone())
            .collect();

        let chip_bg = theme.primary.opacity(0.15);
        let chip_text = theme.primary;

        div()
            .px(px(20.0))
            .pt(px(12.0))
            .flex()
            .flex_wrap()
            .items_center()
            .gap(px(8.0))
            .when_some(notice, |el, (text, color)| {
                el.child(
                    div()
                        .flex()
                        .items_center()
                        .gap(px(6.0))
                        .child(div().w(px(6.0)).h(px(6.0)).rounded_full().bg(color))
                        .child(div().text_xs().text_color(theme.text_muted).child(text)),
                )
            })
            .when_some(command, |el, (command, description)| {
                el.child(
                    div()
                        .px(px(8.0))
                        .py(px(2.0))
                        .rounded(px(4.0))
                        .bg(chip_bg)
                        .text_xs()
                        .text_color(chip_text)
                        .child(command),
                )
                .when(!description.is_empty(), |el| {
                    el.child(div().text_xs().text_color(theme.text_muted).child(description))
                })
            })
            .children(active_toggles.into_iter().map(|id| {
                div()
                    .px(px(8.0))
                    .py(px(2.0))
                    .rounded(px(4.0))
                    .border_1()
                    .border_color(chip_text)
                    .text_xs()
                    .text_color(chip_text)
                    .child(id)
            }))
    }

    fn render_starters(cx: &mut Context<AppRoot>) -> impl IntoElement {
        let (starters, disabled, greeting) = {
            let state = cx.global::<AppState>();
            let api = cx.global::<ApiState>();
            let starters: Vec<_> = state
                .starters
                .iter()
                .map(|s| (s.clone(), starter_icon(s, api)))
                .collect();
            (starters, is_disabled(state), cx.global::<I18n>().t("chat.greeting"))
        };

        let buttons: Vec<AnyElement> = starters
            .iter()
            .map(|(starter, icon)| {
                StarterButton::render_inline(starter, icon.clone(), disabled, cx).into_any_element()
            })
            .collect();

        div()
            .id("starters")
            .flex_1()
            .flex()
            .flex_col()
            .items_center()
            .justify_center()
            .gap(px(24.0))
            .p(px(20.0))
            .child(
                div()
                    .text_xl()
                    .font_weight(FontWeight::MEDIUM)
                    .child(greeting),
            )
            .child(
                div()
                    .flex()
                    .flex_wrap()
                    .justify_center()
                    .gap(px(8.0))
                    .max_w(px(720.0))
                    .children(buttons),
            )
    }

    fn render_messages(cx: &Context<AppRoot>) -> impl IntoElement {
        let state = cx.global::<AppState>();
        let theme = cx.global::<Theme>();

        div()
            .id("messages-scroll")
            .flex_1()
            .overflow_y_scroll()
            .p(px(20.0))
            .flex()
            .flex_col()
            .gap(px(16.0))
            .children(state.messages.iter().map(|msg| Self::render_message(msg, theme)))
    }

    fn render_message(message: &OutgoingMessage, theme: &Theme) -> impl IntoElement {
        div().w_full().flex().justify_end().child(
            div()
                .max_w(rems(48.0))
                .px(px(16.0))
                .py(px(12.0))
                .rounded(px(16.0))
                .bg(theme.primary.opacity(0.15))
                .flex()
                .flex_col()
                .gap(px(4.0))
                .when_some(message.command.clone(), |el, command| {
                    el.child(
                        div()
                            .text_xs()
                            .font_weight(FontWeight::MEDIUM)
                            .text_color(theme.primary)
                            .child(format!("/{}", command)),
                    )
                })
                .child(div().child(message.output.clone())),
        )
    }

    fn render_empty(cx: &Context<AppRoot>) -> impl IntoElement {
        let theme = cx.global::<Theme>();
        let i18n = cx.global::<I18n>();

        div()
            .flex_1()
            .flex()
            .items_center()
            .justify_center()
            .child(
                div()
                    .text_color(theme.text_muted)
                    .child(i18n.t("chat.no_starters")),
            )
    }
}
