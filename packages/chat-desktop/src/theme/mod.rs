//! Theme system for the chat client
//!
//! A small set of built-in dark and light palettes, selectable by id.

mod colors;
mod themes;

pub use colors::*;
pub use themes::*;

use gpui::*;
use std::collections::HashMap;

pub const DEFAULT_THEME_ID: &str = "midnight";

// ============================================================================
// Theme Structure
// ============================================================================

/// Colors used by the client's views
#[derive(Debug, Clone)]
pub struct Theme {
    pub id: &'static str,
    pub name: &'static str,
    pub is_dark: bool,

    pub primary: Hsla,
    pub accent: Hsla,

    // Status colors
    pub error: Hsla,
    pub warning: Hsla,
    pub success: Hsla,

    // Text colors
    pub text: Hsla,
    pub text_muted: Hsla,

    // Background colors
    pub background: Hsla,
    pub background_panel: Hsla,
    pub background_element: Hsla,

    // Border colors
    pub border: Hsla,
    pub border_subtle: Hsla,
}

impl Default for Theme {
    fn default() -> Self {
        themes::midnight()
    }
}

impl Global for Theme {}

// ============================================================================
// Theme Registry
// ============================================================================

/// Registry of all available themes
pub struct ThemeRegistry {
    themes: HashMap<&'static str, fn() -> Theme>,
}

impl Default for ThemeRegistry {
    fn default() -> Self {
        Self::new()
    }
}

impl ThemeRegistry {
    pub fn new() -> Self {
        let mut registry = Self {
            themes: HashMap::new(),
        };

        registry.register("midnight", themes::midnight);
        registry.register("midnight-light", themes::midnight_light);
        registry.register("forest", themes::forest);
        registry.register("forest-light", themes::forest_light);

        registry
    }

    fn register(&mut self, id: &'static str, theme_fn: fn() -> Theme) {
        self.themes.insert(id, theme_fn);
    }

    /// Get a theme by ID
    pub fn get(&self, id: &str) -> Option<Theme> {
        self.themes.get(id).map(|f| f())
    }

    pub fn len(&self) -> usize {
        self.themes.len()
    }
}

impl Global for ThemeRegistry {}

// ============================================================================
// Theme Initialization
// ============================================================================

/// Initialize the theme system with the configured theme
pub fn init(theme_id: &str, cx: &mut App) {
    let registry = ThemeRegistry::new();
    let theme = match registry.get(theme_id) {
        Some(theme) => theme,
        None => {
            tracing::warn!("Theme not found: {}, using {}", theme_id, DEFAULT_THEME_ID);
            Theme::default()
        }
    };

    tracing::debug!("Theme system initialized with {} themes", registry.len());
    cx.set_global(registry);
    cx.set_global(theme);
}

/// Set the current theme by ID
pub fn set_theme_by_id(id: &str, cx: &mut App) -> bool {
    let registry = cx.global::<ThemeRegistry>();
    if let Some(theme) = registry.get(id) {
        cx.set_global(theme);
        tracing::info!("Theme changed to: {}", id);
        true
    } else {
        tracing::warn!("Theme not found: {}", id);
        false
    }
}

/// Id of the light/dark counterpart of a theme
pub fn counterpart_id(id: &str) -> String {
    match id.strip_suffix("-light") {
        Some(dark) => dark.to_string(),
        None => format!("{}-light", id),
    }
}

/// Toggle between light and dark variants of the current theme
pub fn toggle_theme_mode(cx: &mut App) -> Option<String> {
    let new_id = counterpart_id(cx.global::<Theme>().id);
    set_theme_by_id(&new_id, cx).then_some(new_id)
}
