use iced::widget::{button, container, mouse_area, row, text, tooltip, Space};
use iced::{window, Alignment, Background, Border, Color, Element, Length, Size, Task, Theme};

use crate::settings::Orientation;
use crate::theme::Palette;
use crate::ui::Message;

/// Window-manager requests. Each maps straight onto an `iced::window` task.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WindowAction {
    Minimize,
    ToggleMaximize,
    Close,
    /// Start moving the frameless window with the pointer.
    Drag,
}

pub fn perform<T: Send + 'static>(action: WindowAction) -> Task<T> {
    let latest = window::get_latest();
    match action {
        WindowAction::Minimize => latest.and_then(|id| window::minimize(id, true)),
        WindowAction::ToggleMaximize => latest.and_then(window::toggle_maximize),
        WindowAction::Close => latest.and_then(window::close),
        WindowAction::Drag => latest.and_then(window::drag),
    }
}

pub fn request_size<T: Send + 'static>(size: Size) -> Task<T> {
    window::get_latest().and_then(move |id| window::resize(id, size))
}

/// Draggable top bar with the orientation toggle on the left and the
/// window controls on the right.
pub fn top_bar<'a>(
    orientation: Orientation,
    polling: bool,
    status: String,
    p: &Palette,
) -> Element<'a, Message> {
    let label_c = p.label;
    let bg = p.top_bar_bg;

    let rotate_hint = match orientation {
        Orientation::Horizontal => "Switch to vertical bars",
        Orientation::Vertical => "Switch to horizontal bars",
    };
    let left = row![
        control("↻", Message::ToggleOrientation, rotate_hint, p.text, p.accent),
        control(
            if polling { "⏸" } else { "▶" },
            Message::TogglePolling,
            if polling { "Pause sampling" } else { "Resume sampling" },
            p.text,
            p.accent,
        ),
        text(status).size(11).color(label_c),
    ]
    .spacing(6)
    .align_y(Alignment::Center);

    // Empty stretch in the middle moves the window.
    let grab = mouse_area(
        container(text("PcMonitor").size(12).color(label_c)).center_x(Length::Fill),
    )
    .on_press(Message::Window(WindowAction::Drag));

    let right = row![
        control("_", Message::Window(WindowAction::Minimize), "Minimize", p.text, p.accent),
        control("▢", Message::Window(WindowAction::ToggleMaximize), "Maximize/Restore", p.text, p.accent),
        control("✕", Message::Window(WindowAction::Close), "Close", p.text, p.error),
    ]
    .spacing(2)
    .align_y(Alignment::Center);

    container(
        row![left, grab, right, Space::with_width(4)]
            .align_y(Alignment::Center)
            .padding([4, 8]),
    )
    .width(Length::Fill)
    .style(move |_: &Theme| container::Style {
        background: Some(Background::Color(bg)),
        ..Default::default()
    })
    .into()
}

fn control<'a>(
    glyph: &'a str,
    on_press: Message,
    hint: &'a str,
    text_c: Color,
    hover: Color,
) -> Element<'a, Message> {
    let hover_bg = Color::from_rgba(hover.r, hover.g, hover.b, 0.35);
    let btn = button(text(glyph).size(13).color(text_c))
        .on_press(on_press)
        .padding([2, 10])
        .style(move |_: &Theme, status| button::Style {
            background: match status {
                button::Status::Hovered | button::Status::Pressed => {
                    Some(Background::Color(hover_bg))
                }
                _ => None,
            },
            text_color: text_c,
            border: Border {
                color: Color::TRANSPARENT,
                width: 0.0,
                radius: 4.0.into(),
            },
            ..Default::default()
        });
    tooltip(btn, text(hint).size(11), tooltip::Position::Bottom).into()
}
