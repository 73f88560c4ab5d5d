//! Info panel component
//!
//! Server-pushed key/value card above the thread history.

use gpui::prelude::*;
use gpui::*;

use crate::i18n::I18n;
use crate::state::InfoPanel;
use crate::theme::Theme;

pub fn render_info_panel(panel: &InfoPanel, theme: &Theme, i18n: &I18n) -> impl IntoElement {
    let title = panel
        .title
        .clone()
        .unwrap_or_else(|| i18n.t("info_panel.title"));

    div()
        .mx(px(8.0))
        .mb(px(8.0))
        .p(px(10.0))
        .rounded(px(8.0))
        .bg(theme.background_element)
        .border_1()
        .border_color(theme.border_subtle)
        .flex()
        .flex_col()
        .gap(px(6.0))
        .child(
            div()
                .text_sm()
                .font_weight(FontWeight::SEMIBOLD)
                .child(title),
        )
        .children(panel.entries.iter().map(|(key, value)| {
            div()
                .flex()
                .justify_between()
                .gap(px(8.0))
                .text_xs()
                .child(div().text_color(theme.text_muted).child(key.clone()))
                .child(div().text_ellipsis().child(value.clone()))
        }))
}
