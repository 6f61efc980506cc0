//! ANSI styling for module output.
//!
//! A style spec is a space separated list of directives: `reset`, `bold`,
//! `nobold`, `fg:<color>` and `bg:<color>`. Colours are `null` (directive is
//! skipped), `#rrggbb` / `#rrggbbaa` truecolor, a 256-colour palette index, or
//! one of the named palette entries below.

const STANDARD: [&str; 8] = [
    "black", "red", "green", "yellow", "blue", "magenta", "cyan", "white",
];

const BRIGHT: [&str; 8] = [
    "bright-black",
    "bright-red",
    "bright-green",
    "bright-yellow",
    "bright-blue",
    "bright-magenta",
    "bright-cyan",
    "bright-white",
];

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Channel {
    Foreground,
    Background,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Color {
    /// Terminal default for the channel (`none`).
    Default,
    /// Position in the 16-entry palette; 8..16 are the bright variants.
    Palette(u8),
    Indexed(u8),
    Rgb(u8, u8, u8),
}

impl Color {
    /// Parse a colour argument. `None` for `null` and for anything unrecognised.
    pub fn parse(arg: &str) -> Option<Self> {
        if arg == "null" {
            return None;
        }
        if let Some(hex) = arg.strip_prefix('#') {
            return parse_hex(hex);
        }
        if !arg.is_empty() && arg.chars().all(|c| c.is_ascii_digit()) {
            return arg.parse::<u8>().ok().map(Color::Indexed);
        }
        if arg == "none" {
            return Some(Color::Default);
        }
        if let Some(i) = STANDARD.iter().position(|name| *name == arg) {
            return Some(Color::Palette(i as u8));
        }
        BRIGHT
            .iter()
            .position(|name| *name == arg)
            .map(|i| Color::Palette(i as u8 + 8))
    }

    pub fn escape(&self, channel: Channel) -> String {
        let (base, bright, extended, default) = match channel {
            Channel::Foreground => (30, 90, 38, 39),
            Channel::Background => (40, 100, 48, 49),
        };
        match *self {
            Color::Default => format!("\x1b[{}m", default),
            Color::Palette(i) if i < 8 => format!("\x1b[{}m", base + i as u16),
            Color::Palette(i) => format!("\x1b[{}m", bright + (i as u16 - 8)),
            Color::Indexed(n) => format!("\x1b[{};5;{}m", extended, n),
            Color::Rgb(r, g, b) => format!("\x1b[{};2;{};{};{}m", extended, r, g, b),
        }
    }
}

fn parse_hex(hex: &str) -> Option<Color> {
    if !(hex.len() == 6 || hex.len() == 8) || !hex.chars().all(|c| c.is_ascii_hexdigit()) {
        return None;
    }
    // Alpha, when present, has no terminal equivalent and is ignored.
    let r = u8::from_str_radix(&hex[0..2], 16).ok()?;
    let g = u8::from_str_radix(&hex[2..4], 16).ok()?;
    let b = u8::from_str_radix(&hex[4..6], 16).ok()?;
    Some(Color::Rgb(r, g, b))
}

fn directive_escape(directive: &str) -> Option<String> {
    match directive {
        "reset" => Some("\x1b[0m".to_string()),
        "bold" => Some("\x1b[1m".to_string()),
        "nobold" => Some("\x1b[22m".to_string()),
        _ => {
            let (channel, arg) = if let Some(arg) = directive.strip_prefix("fg:") {
                (Channel::Foreground, arg)
            } else if let Some(arg) = directive.strip_prefix("bg:") {
                (Channel::Background, arg)
            } else {
                return None;
            };
            Color::parse(arg).map(|color| color.escape(channel))
        }
    }
}

/// Apply a style spec to `text`.
///
/// Directives are walked from last to first, each prepending its escape code,
/// so the escapes end up in the same order as the directives were written.
pub fn style(text: &str, spec: &str) -> String {
    let mut out = text.to_string();
    for directive in spec.split(' ').rev() {
        if let Some(code) = directive_escape(directive) {
            out.insert_str(0, &code);
        }
    }
    out
}

/// Build a `fg:`/`bg:` directive from an optional colour; `None` becomes `null`.
pub fn color_directive(channel: Channel, color: Option<&str>) -> String {
    let prefix = match channel {
        Channel::Foreground => "fg",
        Channel::Background => "bg",
    };
    format!("{}:{}", prefix, color.unwrap_or("null"))
}
