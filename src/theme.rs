use iced::Color;
use serde::{Deserialize, Deserializer, Serializer};

// ─── SWATCHES ───────────────────────────────────────────────────

/// Preset colors offered by the fixed-color picker.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Swatch {
    Green,
    Teal,
    Blue,
    Indigo,
    Violet,
    Pink,
    Orange,
    Amber,
}

impl Swatch {
    pub const ALL: &[Swatch] = &[
        Swatch::Green,
        Swatch::Teal,
        Swatch::Blue,
        Swatch::Indigo,
        Swatch::Violet,
        Swatch::Pink,
        Swatch::Orange,
        Swatch::Amber,
    ];

    pub fn name(&self) -> &'static str {
        match self {
            Swatch::Green => "Green",
            Swatch::Teal => "Teal",
            Swatch::Blue => "Blue",
            Swatch::Indigo => "Indigo",
            Swatch::Violet => "Violet",
            Swatch::Pink => "Pink",
            Swatch::Orange => "Orange",
            Swatch::Amber => "Amber",
        }
    }

    pub fn color(&self) -> Color {
        match self {
            Swatch::Green => hex(0x0b, 0xc5, 0x68),
            Swatch::Teal => hex(0x1a, 0xbc, 0x9c),
            Swatch::Blue => hex(0x34, 0x98, 0xdb),
            Swatch::Indigo => hex(0x5c, 0x6b, 0xc0),
            Swatch::Violet => hex(0x9b, 0x59, 0xb6),
            Swatch::Pink => hex(0xe8, 0x43, 0x93),
            Swatch::Orange => hex(0xe6, 0x7e, 0x22),
            Swatch::Amber => hex(0xff, 0xbf, 0x00),
        }
    }
}

// ─── PALETTE ────────────────────────────────────────────────────

/// All semantic colors the dashboard uses.
#[derive(Debug, Clone, Copy)]
pub struct Palette {
    pub bg: Color,
    pub top_bar_bg: Color,
    pub panel_bg: Color,
    pub border: Color,
    pub label: Color,
    pub text: Color,
    pub bar_bg: Color,
    pub accent: Color,
    pub error: Color,
    // Load tiers
    pub low: Color,
    pub mid: Color,
    pub high: Color,
}

impl Default for Palette {
    fn default() -> Self {
        Palette {
            bg:         hex(0x1b, 0x26, 0x36),
            top_bar_bg: hex(0x15, 0x1e, 0x2b),
            panel_bg:   hex(0x22, 0x22, 0x22),
            border:     hex(0xee, 0xee, 0xee),
            label:      hex(0xa6, 0xad, 0xc8),
            text:       hex(0xee, 0xee, 0xee),
            bar_bg:     hex(0x44, 0x44, 0x44),
            accent:     hex(0x0b, 0xc5, 0x68),
            error:      hex(0xff, 0x00, 0x00),
            low:        hex(0x0b, 0xc5, 0x68),
            mid:        hex(0xf5, 0xa6, 0x23),
            high:       hex(0xe7, 0x4c, 0x3c),
        }
    }
}

const fn hex(r: u8, g: u8, b: u8) -> Color {
    Color::from_rgb(r as f32 / 255.0, g as f32 / 255.0, b as f32 / 255.0)
}

// ─── HEX CODEC ──────────────────────────────────────────────────

/// Parse `#rrggbb` (leading `#` optional).
pub fn parse_hex(s: &str) -> Option<Color> {
    let digits = s.trim().strip_prefix('#').unwrap_or(s.trim());
    if digits.len() != 6 || !digits.chars().all(|c| c.is_ascii_hexdigit()) {
        return None;
    }
    let channel = |i: usize| u8::from_str_radix(&digits[i..i + 2], 16).ok();
    Some(hex(channel(0)?, channel(2)?, channel(4)?))
}

pub fn to_hex(color: Color) -> String {
    let channel = |v: f32| (v.clamp(0.0, 1.0) * 255.0).round() as u8;
    format!(
        "#{:02x}{:02x}{:02x}",
        channel(color.r),
        channel(color.g),
        channel(color.b)
    )
}

/// serde adapter storing colors as `#rrggbb` strings.
pub mod hex_color {
    use super::*;

    pub fn serialize<S: Serializer>(color: &Color, s: S) -> Result<S::Ok, S::Error> {
        s.serialize_str(&to_hex(*color))
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(d: D) -> Result<Color, D::Error> {
        let raw = String::deserialize(d)?;
        parse_hex(&raw)
            .ok_or_else(|| serde::de::Error::custom(format!("expected #rrggbb, got {raw:?}")))
    }
}
