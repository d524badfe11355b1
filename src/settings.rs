use iced::widget::{
    button, checkbox, column, container, pick_list, row, text, text_input, tooltip, Row, Space,
};
use iced::{Alignment, Background, Border, Color, Element, Length, Theme};
use serde::{Deserialize, Serialize};
use std::fmt;

use crate::theme::{self, Palette, Swatch};
use crate::ui::Message;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ColorMode {
    /// Every bar uses the configured fixed color.
    Single,
    /// Load-tiered coloring.
    Multi,
}

impl ColorMode {
    pub const ALL: [ColorMode; 2] = [ColorMode::Multi, ColorMode::Single];
}

impl fmt::Display for ColorMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            ColorMode::Multi => "By load",
            ColorMode::Single => "Fixed color",
        })
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Orientation {
    Horizontal,
    Vertical,
}

impl Orientation {
    pub const ALL: [Orientation; 2] = [Orientation::Horizontal, Orientation::Vertical];

    pub fn flipped(self) -> Self {
        match self {
            Orientation::Horizontal => Orientation::Vertical,
            Orientation::Vertical => Orientation::Horizontal,
        }
    }
}

impl fmt::Display for Orientation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Orientation::Horizontal => "Horizontal",
            Orientation::Vertical => "Vertical",
        })
    }
}

/// How bars are drawn. Lives for the session only and is never written back.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct DisplayConfig {
    pub compact: bool,
    pub animated: bool,
    pub color_mode: ColorMode,
    #[serde(with = "theme::hex_color")]
    pub bar_color: Color,
    pub orientation: Orientation,
}

impl Default for DisplayConfig {
    fn default() -> Self {
        Self {
            compact: true,
            animated: true,
            color_mode: ColorMode::Multi,
            bar_color: Swatch::Green.color(),
            orientation: Orientation::Horizontal,
        }
    }
}

/// One settings control changing one field.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum ConfigChange {
    Compact(bool),
    Animated(bool),
    ColorMode(ColorMode),
    BarColor(Color),
    Orientation(Orientation),
}

impl DisplayConfig {
    /// Replace exactly the field named by `change`; everything else is kept.
    pub fn apply(self, change: ConfigChange) -> Self {
        match change {
            ConfigChange::Compact(compact) => Self { compact, ..self },
            ConfigChange::Animated(animated) => Self { animated, ..self },
            ConfigChange::ColorMode(color_mode) => Self { color_mode, ..self },
            ConfigChange::BarColor(bar_color) => Self { bar_color, ..self },
            ConfigChange::Orientation(orientation) => Self { orientation, ..self },
        }
    }
}

// ─── PANEL ──────────────────────────────────────────────────────

/// Settings panel. `color_draft` is the text currently in the hex field,
/// which may not parse yet.
pub fn view_panel<'a>(
    config: &DisplayConfig,
    color_draft: &str,
    collapsed: bool,
    p: &Palette,
) -> Element<'a, Message> {
    let accent = p.accent;
    let label_c = p.label;
    let panel_bg = p.panel_bg;

    let header = button(
        row![
            text("Bar settings").size(16).color(accent),
            Space::with_width(Length::Fill),
            text(if collapsed { "▸" } else { "▾" }).size(14).color(label_c),
        ]
        .align_y(Alignment::Center),
    )
    .on_press(Message::ToggleSettingsPanel)
    .style(button::text)
    .width(Length::Fill)
    .padding(0);

    let body: Element<'a, Message> = if collapsed {
        Space::new(0, 0).into()
    } else {
        let compact = checkbox("Compact mode", config.compact)
            .on_toggle(|v| Message::Config(ConfigChange::Compact(v)))
            .size(14)
            .text_size(13);
        let animated = checkbox("Smooth animation", config.animated)
            .on_toggle(|v| Message::Config(ConfigChange::Animated(v)))
            .size(14)
            .text_size(13);
        let mode = row![
            text("Color mode:").size(13).width(110),
            pick_list(ColorMode::ALL, Some(config.color_mode), |m| {
                Message::Config(ConfigChange::ColorMode(m))
            })
            .text_size(13),
        ]
        .spacing(6)
        .align_y(Alignment::Center);
        let orientation = row![
            text("Orientation:").size(13).width(110),
            pick_list(Orientation::ALL, Some(config.orientation), |o| {
                Message::Config(ConfigChange::Orientation(o))
            })
            .text_size(13),
        ]
        .spacing(6)
        .align_y(Alignment::Center);

        let mut controls = column![compact, animated, mode, orientation].spacing(8);
        if config.color_mode == ColorMode::Single {
            controls = controls.push(color_picker(config.bar_color, color_draft, p));
        }
        controls.into()
    };

    container(column![header, body].spacing(10))
        .width(Length::Fill)
        .padding(12)
        .style(move |_: &Theme| container::Style {
            background: Some(Background::Color(panel_bg)),
            border: Border {
                color: Color::TRANSPARENT,
                width: 0.0,
                radius: 8.0.into(),
            },
            ..Default::default()
        })
        .into()
}

fn color_picker<'a>(current: Color, draft: &str, p: &Palette) -> Element<'a, Message> {
    let text_c = p.text;
    let mut swatches: Vec<Element<Message>> = Vec::new();
    for swatch in Swatch::ALL {
        let color = swatch.color();
        let is_active = theme::to_hex(color) == theme::to_hex(current);
        let btn = button(Space::new(18, 18))
            .on_press(Message::Config(ConfigChange::BarColor(color)))
            .padding(0)
            .style(move |_: &Theme, status| button::Style {
                background: Some(Background::Color(color)),
                text_color: text_c,
                border: Border {
                    color: if is_active || matches!(status, button::Status::Hovered) {
                        text_c
                    } else {
                        Color::TRANSPARENT
                    },
                    width: 2.0,
                    radius: 4.0.into(),
                },
                ..Default::default()
            });
        swatches.push(tooltip(btn, text(swatch.name()).size(11), tooltip::Position::Bottom).into());
    }

    let hex_input = text_input("#rrggbb", draft)
        .on_input(Message::ColorDraft)
        .size(13)
        .width(90);

    row![
        text("Bar color:").size(13).width(110),
        Row::with_children(swatches).spacing(4),
        hex_input,
    ]
    .spacing(6)
    .align_y(Alignment::Center)
    .into()
}
