use iced::mouse;
use iced::widget::canvas::{self, Canvas, Frame, Geometry, Path, Text};
use iced::widget::{column, text};
use iced::{Alignment, Color, Element, Length, Point, Rectangle, Renderer, Size, Theme};

use crate::settings::{ColorMode, DisplayConfig, Orientation};
use crate::theme::Palette;

/// Values below this are low load.
pub const MID_LOAD_FROM: f32 = 50.0;
/// Values at or above this are high load.
pub const HIGH_LOAD_FROM: f32 = 80.0;

const SUMMARY_HEIGHT: f32 = 24.0;
const VERTICAL_WIDTH: f32 = 20.0;

/// Map any incoming value onto [0, 100]. Non-finite values count as zero.
pub fn sanitize_percent(value: f32) -> f32 {
    if value.is_finite() {
        value.clamp(0.0, 100.0)
    } else {
        0.0
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LoadTier {
    Low,
    Mid,
    High,
}

impl LoadTier {
    /// Fixed three-step function; 50 and 80 belong to the upper tier.
    pub fn of(value: f32) -> Self {
        let v = sanitize_percent(value);
        if v < MID_LOAD_FROM {
            LoadTier::Low
        } else if v < HIGH_LOAD_FROM {
            LoadTier::Mid
        } else {
            LoadTier::High
        }
    }

    pub fn color(self, p: &Palette) -> Color {
        match self {
            LoadTier::Low => p.low,
            LoadTier::Mid => p.mid,
            LoadTier::High => p.high,
        }
    }
}

pub fn bar_color(value: f32, config: &DisplayConfig, p: &Palette) -> Color {
    match config.color_mode {
        ColorMode::Single => config.bar_color,
        ColorMode::Multi => LoadTier::of(value).color(p),
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BarVariant {
    /// Label drawn inside one tall horizontal bar (aggregate figures).
    Summary,
    /// Label above a thin bar that follows the configured orientation.
    Detail,
}

/// A single percentage bar drawn via iced Canvas.
#[derive(Debug, Clone)]
pub struct Bar {
    pub label: String,
    /// Sanitized value the label and color describe.
    pub percent: f32,
    /// Currently drawn fill; trails `percent` while a transition runs.
    pub fill: f32,
    pub color: Color,
    pub variant: BarVariant,
    pub orientation: Orientation,
    pub compact: bool,
    pub track: Color,
    pub text: Color,
}

impl Bar {
    pub fn new(
        label: impl Into<String>,
        percent: f32,
        variant: BarVariant,
        config: &DisplayConfig,
        p: &Palette,
    ) -> Self {
        let percent = sanitize_percent(percent);
        let orientation = match variant {
            BarVariant::Summary => Orientation::Horizontal,
            BarVariant::Detail => config.orientation,
        };
        Self {
            label: label.into(),
            percent,
            fill: percent,
            color: bar_color(percent, config, p),
            variant,
            orientation,
            compact: config.compact,
            track: p.bar_bg,
            text: p.text,
        }
    }

    /// Draw `fill` instead of the target value.
    pub fn with_fill(mut self, fill: f32) -> Self {
        self.fill = sanitize_percent(fill);
        self
    }

    pub fn caption(&self) -> String {
        format!("{} - {:.1}%", self.label, self.percent)
    }

    /// Widget size along (width, height).
    pub fn extent(&self) -> (Length, Length) {
        match (self.variant, self.orientation) {
            (BarVariant::Summary, _) => (Length::Fill, Length::Fixed(SUMMARY_HEIGHT)),
            (BarVariant::Detail, Orientation::Horizontal) => {
                (Length::Fill, Length::Fixed(if self.compact { 3.0 } else { 14.0 }))
            }
            (BarVariant::Detail, Orientation::Vertical) => (
                Length::Fixed(VERTICAL_WIDTH),
                Length::Fixed(if self.compact { 60.0 } else { 100.0 }),
            ),
        }
    }

    /// Filled region inside a track of `size`. Horizontal bars grow from the
    /// left edge, vertical ones from the bottom.
    pub fn fill_rect(&self, size: Size) -> Rectangle {
        let frac = self.fill / 100.0;
        match self.orientation {
            Orientation::Horizontal => Rectangle {
                x: 0.0,
                y: 0.0,
                width: size.width * frac,
                height: size.height,
            },
            Orientation::Vertical => {
                let h = size.height * frac;
                Rectangle {
                    x: 0.0,
                    y: size.height - h,
                    width: size.width,
                    height: h,
                }
            }
        }
    }

    pub fn label_size(&self) -> u16 {
        if self.compact { 12 } else { 16 }
    }

    pub fn view<'a, Message: 'a>(self) -> Element<'a, Message> {
        let (width, height) = self.extent();
        match self.variant {
            BarVariant::Summary => Canvas::new(self).width(width).height(height).into(),
            BarVariant::Detail => {
                let caption = text(self.caption()).size(self.label_size()).color(self.text);
                let spacing = if self.compact { 2 } else { 4 };
                column![caption, Canvas::new(self).width(width).height(height)]
                    .spacing(spacing)
                    .align_x(Alignment::Center)
                    .into()
            }
        }
    }
}

impl<Message> canvas::Program<Message> for Bar {
    type State = ();

    fn draw(
        &self,
        _state: &Self::State,
        renderer: &Renderer,
        _theme: &Theme,
        bounds: Rectangle,
        _cursor: mouse::Cursor,
    ) -> Vec<Geometry> {
        let mut frame = Frame::new(renderer, bounds.size());

        // Track
        frame.fill(&Path::rectangle(Point::ORIGIN, bounds.size()), self.track);

        let fill = self.fill_rect(bounds.size());
        if fill.width > 0.0 && fill.height > 0.0 {
            frame.fill(
                &Path::rectangle(Point::new(fill.x, fill.y), fill.size()),
                self.color,
            );
        }

        if self.variant == BarVariant::Summary {
            let mut label = Text::from(self.caption());
            label.position = Point::new(bounds.width / 2.0, bounds.height / 2.0);
            label.color = self.text;
            label.size = 15.0.into();
            label.horizontal_alignment = iced::alignment::Horizontal::Center;
            label.vertical_alignment = iced::alignment::Vertical::Center;
            frame.fill_text(label);
        }

        vec![frame.into_geometry()]
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::theme::Swatch;

    fn multi() -> DisplayConfig {
        DisplayConfig::default()
    }

    #[test]
    fn test_tier_boundaries() {
        assert_eq!(LoadTier::of(0.0), LoadTier::Low);
        assert_eq!(LoadTier::of(49.9), LoadTier::Low);
        assert_eq!(LoadTier::of(50.0), LoadTier::Mid);
        assert_eq!(LoadTier::of(79.9), LoadTier::Mid);
        assert_eq!(LoadTier::of(80.0), LoadTier::High);
        assert_eq!(LoadTier::of(100.0), LoadTier::High);
    }

    #[test]
    fn test_out_of_range_values_are_tolerated() {
        assert_eq!(sanitize_percent(f32::NAN), 0.0);
        assert_eq!(sanitize_percent(f32::INFINITY), 0.0);
        assert_eq!(sanitize_percent(-5.0), 0.0);
        assert_eq!(sanitize_percent(140.0), 100.0);
        assert_eq!(LoadTier::of(f32::NAN), LoadTier::Low);

        let bar = Bar::new("X", f32::NAN, BarVariant::Detail, &multi(), &Palette::default());
        assert_eq!(bar.fill_rect(Size::new(200.0, 10.0)).width, 0.0);
        assert_eq!(bar.caption(), "X - 0.0%");
    }

    #[test]
    fn test_summary_fill_width_matches_percent() {
        let p = Palette::default();
        let size = Size::new(640.0, SUMMARY_HEIGHT);
        for pct in [0.0_f32, 12.5, 45.2, 50.0, 99.9, 100.0] {
            let bar = Bar::new("CPU", pct, BarVariant::Summary, &multi(), &p);
            let rect = bar.fill_rect(size);
            assert!((rect.width - 640.0 * pct / 100.0).abs() < 0.01, "pct {pct}");
            assert_eq!(rect.height, SUMMARY_HEIGHT);
            assert_eq!(rect.x, 0.0);
        }
    }

    #[test]
    fn test_summary_ignores_vertical_orientation() {
        let config = multi().apply(crate::settings::ConfigChange::Orientation(Orientation::Vertical));
        let bar = Bar::new("CPU", 30.0, BarVariant::Summary, &config, &Palette::default());
        assert_eq!(bar.orientation, Orientation::Horizontal);
    }

    #[test]
    fn test_vertical_fill_grows_from_bottom() {
        let config = multi().apply(crate::settings::ConfigChange::Orientation(Orientation::Vertical));
        let bar = Bar::new("T0", 25.0, BarVariant::Detail, &config, &Palette::default());
        let rect = bar.fill_rect(Size::new(20.0, 100.0));
        assert!((rect.height - 25.0).abs() < 0.001);
        assert!((rect.y - 75.0).abs() < 0.001);
        assert_eq!(rect.width, 20.0);
    }

    #[test]
    fn test_compact_changes_thickness_only() {
        let p = Palette::default();
        let compact = Bar::new("T1", 40.0, BarVariant::Detail, &multi(), &p);
        let roomy_cfg = multi().apply(crate::settings::ConfigChange::Compact(false));
        let roomy = Bar::new("T1", 40.0, BarVariant::Detail, &roomy_cfg, &p);
        assert_eq!(compact.extent().1, Length::Fixed(3.0));
        assert_eq!(roomy.extent().1, Length::Fixed(14.0));
        assert_eq!(compact.caption(), roomy.caption());
    }

    #[test]
    fn test_single_mode_uses_fixed_color() {
        let p = Palette::default();
        let blue = Swatch::Blue.color();
        let config = multi()
            .apply(crate::settings::ConfigChange::ColorMode(ColorMode::Single))
            .apply(crate::settings::ConfigChange::BarColor(blue));
        for pct in [5.0, 65.0, 95.0] {
            assert_eq!(bar_color(pct, &config, &p), blue);
        }
        let back = config.apply(crate::settings::ConfigChange::ColorMode(ColorMode::Multi));
        assert_eq!(bar_color(5.0, &back, &p), p.low);
        assert_eq!(bar_color(65.0, &back, &p), p.mid);
        assert_eq!(bar_color(95.0, &back, &p), p.high);
    }

    #[test]
    fn test_with_fill_keeps_label_and_color() {
        let p = Palette::default();
        let bar = Bar::new("Memory Usage", 90.0, BarVariant::Detail, &multi(), &p).with_fill(30.0);
        assert_eq!(bar.color, p.high);
        assert_eq!(bar.caption(), "Memory Usage - 90.0%");
        assert!((bar.fill_rect(Size::new(100.0, 3.0)).width - 30.0).abs() < 0.001);
    }
}
