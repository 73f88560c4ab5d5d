//! Keyboard bindings for the chat client

use gpui::*;

// Register action types
actions!(
    starter_chat,
    [
        ToggleSidebar,
        NewChat,
        SearchChats,
        ToggleTheme,
        CloseElementSidebar,
        Cancel,
    ]
);

/// Initialize keyboard bindings
pub fn init(cx: &mut App) {
    cx.bind_keys([
        KeyBinding::new("ctrl-b", ToggleSidebar, None),
        KeyBinding::new("ctrl-shift-o", NewChat, None),
        KeyBinding::new("ctrl-k", SearchChats, None),
        KeyBinding::new("ctrl-shift-t", ToggleTheme, None),
        KeyBinding::new("ctrl-shift-e", CloseElementSidebar, None),
        KeyBinding::new("escape", Cancel, None),
    ]);

    tracing::debug!("Keyboard bindings initialized");
}
