//! Hex color parsing for theme definitions

use gpui::Hsla;

/// Parse `#RGB`, `#RRGGBB` or `#RRGGBBAA`; anything else is opaque black
pub fn hex(color: &str) -> Hsla {
    let digits = color.trim_start_matches('#');

    let expanded: String = if digits.len() == 3 {
        digits.chars().flat_map(|c| [c, c]).collect()
    } else {
        digits.to_string()
    };

    let channel = |i: usize, default: u8| {
        expanded
            .get(i..i + 2)
            .and_then(|pair| u8::from_str_radix(pair, 16).ok())
            .unwrap_or(default)
    };

    match expanded.len() {
        6 => rgba_to_hsla(channel(0, 0), channel(2, 0), channel(4, 0), 255),
        8 => rgba_to_hsla(channel(0, 0), channel(2, 0), channel(4, 0), channel(6, 255)),
        _ => rgba_to_hsla(0, 0, 0, 255),
    }
}

fn rgba_to_hsla(r: u8, g: u8, b: u8, a: u8) -> Hsla {
    let [r, g, b, a] = [r, g, b, a].map(|c| c as f32 / 255.0);

    let max = r.max(g).max(b);
    let min = r.min(g).min(b);
    let l = (max + min) / 2.0;

    if max == min {
        return Hsla { h: 0.0, s: 0.0, l, a };
    }

    let d = max - min;
    let s = if l > 0.5 {
        d / (2.0 - max - min)
    } else {
        d / (max + min)
    };
    let h = if max == r {
        (g - b) / d + if g < b { 6.0 } else { 0.0 }
    } else if max == g {
        (b - r) / d + 2.0
    } else {
        (r - g) / d + 4.0
    };

    Hsla { h: h / 6.0, s, l, a }
}
