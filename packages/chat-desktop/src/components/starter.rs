//! Starter button component
//!
//! Outline pill with an optional icon and the starter's label. Clicking it
//! hands the starter to [`AppRoot::activate_starter`].

use gpui::prelude::*;
use gpui::*;

use crate::api::types::Starter;
use crate::app::AppRoot;
use crate::starter::IconSource;
use crate::theme::Theme;

pub struct StarterButton;

impl StarterButton {
    pub fn render_inline(
        starter: &Starter,
        icon: Option<IconSource>,
        disabled: bool,
        cx: &mut Context<AppRoot>,
    ) -> impl IntoElement {
        let theme = cx.global::<Theme>();
        let hover_bg = theme.background_element;
        let starter_for_click = starter.clone();

        div()
            .id(SharedString::from(starter.element_id()))
            .px(px(14.0))
            .py(px(8.0))
            .rounded(px(24.0))
            .border_1()
            .border_color(theme.border)
            .flex()
            .items_center()
            .gap(px(8.0))
            .max_w(px(280.0))
            .when(disabled, |el| el.opacity(0.5))
            .when(!disabled, |el| {
                el.cursor_pointer()
                    .hover(move |style| style.bg(hover_bg))
                    .on_click(cx.listener(move |this, _event, _window, cx| {
                        this.activate_starter(&starter_for_click, cx);
                    }))
            })
            .when_some(icon, |el, icon| el.child(Self::render_icon(icon, theme)))
            .child(
                div()
                    .text_sm()
                    .text_color(theme.text_muted)
                    .text_ellipsis()
                    .child(starter.label.clone()),
            )
    }

    fn render_icon(icon: IconSource, theme: &Theme) -> AnyElement {
        match icon {
            IconSource::Image(url) => img(url)
                .w(px(20.0))
                .h(px(20.0))
                .rounded(px(6.0))
                .into_any_element(),
            IconSource::Glyph(name) => {
                let glyph = glyph_initial(&name);
                div()
                    .w(px(20.0))
                    .h(px(20.0))
                    .rounded(px(6.0))
                    .bg(theme.accent.opacity(0.2))
                    .text_color(theme.accent)
                    .text_xs()
                    .font_weight(FontWeight::BOLD)
                    .flex()
                    .items_center()
                    .justify_center()
                    .child(glyph)
                    .into_any_element()
            }
        }
    }
}

/// Badge text for a named icon: first letter of its last word (`mdi-star` → `S`)
fn glyph_initial(name: &str) -> String {
    name.rsplit(|c: char| c == '-' || c == '_')
        .find(|word| !word.is_empty())
        .and_then(|word| word.chars().next())
        .map(|c| c.to_uppercase().collect())
        .unwrap_or_default()
}

#[cfg(test)]
mod tests {
    use super::*;
    use core::prelude::v1::test;

    #[test]
    fn glyph_uses_last_word() {
        assert_eq!(glyph_initial("mdi-star"), "S");
        assert_eq!(glyph_initial("lightbulb"), "L");
        assert_eq!(glyph_initial("arrow_up-"), "U");
        assert_eq!(glyph_initial(""), "");
    }
}
