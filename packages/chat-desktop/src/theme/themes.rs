//! Built-in theme definitions

use super::colors::hex;
use super::Theme;

pub fn midnight() -> Theme {
    Theme {
        id: "midnight",
        name: "Midnight",
        is_dark: true,

        primary: hex("#7aa2f7"),
        accent: hex("#bb9af7"),

        error: hex("#f7768e"),
        warning: hex("#e0af68"),
        success: hex("#9ece6a"),

        text: hex("#dfe3ee"),
        text_muted: hex("#7c8296"),

        background: hex("#11131a"),
        background_panel: hex("#171a23"),
        background_element: hex("#20242f"),

        border: hex("#2c3140"),
        border_subtle: hex("#232733"),
    }
}

pub fn midnight_light() -> Theme {
    Theme {
        id: "midnight-light",
        name: "Midnight Light",
        is_dark: false,

        primary: hex("#3760bf"),
        accent: hex("#7847bd"),

        error: hex("#c64343"),
        warning: hex("#8c6c3e"),
        success: hex("#587539"),

        text: hex("#1f2330"),
        text_muted: hex("#6172b0"),

        background: hex("#f5f6fa"),
        background_panel: hex("#eceef5"),
        background_element: hex("#e1e4ee"),

        border: hex("#c8ccda"),
        border_subtle: hex("#dcdfea"),
    }
}

pub fn forest() -> Theme {
    Theme {
        id: "forest",
        name: "Forest",
        is_dark: true,

        primary: hex("#a7c080"),
        accent: hex("#d699b6"),

        error: hex("#e67e80"),
        warning: hex("#dbbc7f"),
        success: hex("#83c092"),

        text: hex("#d3c6aa"),
        text_muted: hex("#859289"),

        background: hex("#232a2e"),
        background_panel: hex("#2d353b"),
        background_element: hex("#343f44"),

        border: hex("#475258"),
        border_subtle: hex("#3d484d"),
    }
}

pub fn forest_light() -> Theme {
    Theme {
        id: "forest-light",
        name: "Forest Light",
        is_dark: false,

        primary: hex("#8da101"),
        accent: hex("#df69ba"),

        error: hex("#f85552"),
        warning: hex("#dfa000"),
        success: hex("#35a77c"),

        text: hex("#5c6a72"),
        text_muted: hex("#939f91"),

        background: hex("#fdf6e3"),
        background_panel: hex("#f4f0d9"),
        background_element: hex("#efebd4"),

        border: hex("#e0dcc7"),
        border_subtle: hex("#e6e2cc"),
    }
}
