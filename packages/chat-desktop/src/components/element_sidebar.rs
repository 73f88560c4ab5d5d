//! Element sidebar component
//!
//! Right-hand panel whose title and elements are set by the server.

use gpui::prelude::*;
use gpui::*;

use crate::app::AppRoot;
use crate::i18n::I18n;
use crate::state::ElementSidebar;
use crate::theme::Theme;

pub fn render_element_sidebar(sidebar: &ElementSidebar, cx: &mut Context<AppRoot>) -> impl IntoElement {
    let theme = cx.global::<Theme>();
    let i18n = cx.global::<I18n>();
    let hover_bg = theme.background_element;

    div()
        .w(px(320.0))
        .h_full()
        .flex()
        .flex_col()
        .bg(theme.background)
        .border_l_1()
        .border_color(theme.border)
        .child(
            div()
                .h(px(48.0))
                .px(px(12.0))
                .flex()
                .items_center()
                .justify_between()
                .border_b_1()
                .border_color(theme.border)
                .child(
                    div()
                        .font_weight(FontWeight::SEMIBOLD)
                        .text_ellipsis()
                        .child(sidebar.title.clone().unwrap_or_default()),
                )
                .child(
                    div()
                        .id("close-element-sidebar")
                        .px(px(8.0))
                        .py(px(4.0))
                        .rounded(px(6.0))
                        .text_sm()
                        .text_color(theme.text_muted)
                        .cursor_pointer()
                        .hover(move |style| style.bg(hover_bg))
                        .on_click(cx.listener(|this, _event, _window, cx| {
                            this.close_element_sidebar(cx);
                        }))
                        .child(i18n.t("element_sidebar.close")),
                ),
        )
        .child(
            div()
                .id("element-sidebar-scroll")
                .flex_1()
                .overflow_y_scroll()
                .p(px(12.0))
                .flex()
                .flex_col()
                .gap(px(12.0))
                .children(sidebar.elements.iter().map(|element| {
                    let body = element
                        .content
                        .clone()
                        .or_else(|| element.url.clone())
                        .unwrap_or_default();
                    div()
                        .flex()
                        .flex_col()
                        .gap(px(4.0))
                        .child(
                            div()
                                .text_xs()
                                .font_weight(FontWeight::MEDIUM)
                                .text_color(theme.text_muted)
                                .child(element.name.clone()),
                        )
                        .child(div().text_sm().child(body))
                })),
        )
}
