//! Manual window resizing through a corner grip.
//!
//! [`ResizeState`] is the two-state machine; [`ResizeGrip`] is the canvas
//! program that captures the pointer and feeds it [`GripEvent`]s. Once the
//! grip has seen a press it keeps receiving moves and the release no matter
//! where the cursor is, so nothing else can interfere mid-resize.

use iced::mouse;
use iced::widget::canvas::{self, Event, Frame, Geometry, Path, Stroke};
use iced::{Color, Point, Rectangle, Renderer, Size, Theme};

pub const MIN_WIDTH: f32 = 400.0;
pub const MIN_HEIGHT: f32 = 300.0;

pub fn clamp_size(size: Size) -> Size {
    Size::new(size.width.max(MIN_WIDTH), size.height.max(MIN_HEIGHT))
}

#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub enum ResizeState {
    #[default]
    Idle,
    Resizing {
        start_pointer: Point,
        start_size: Size,
    },
}

impl ResizeState {
    pub fn is_resizing(&self) -> bool {
        matches!(self, ResizeState::Resizing { .. })
    }

    pub fn begin(&mut self, pointer: Point, window_size: Size) {
        *self = ResizeState::Resizing {
            start_pointer: pointer,
            start_size: window_size,
        };
    }

    /// Size to request for a pointer at `pointer`, or `None` when idle.
    pub fn drag(&self, pointer: Point) -> Option<Size> {
        match *self {
            ResizeState::Idle => None,
            ResizeState::Resizing { start_pointer, start_size } => Some(clamp_size(Size::new(
                start_size.width + (pointer.x - start_pointer.x),
                start_size.height + (pointer.y - start_pointer.y),
            ))),
        }
    }

    pub fn end(&mut self) {
        *self = ResizeState::Idle;
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub enum GripEvent {
    Pressed(Point),
    Moved(Point),
    Released,
}

/// Pointer capture flag kept by the canvas between events.
#[derive(Debug, Default)]
pub struct GripCapture {
    captured: bool,
}

#[derive(Debug, Clone, Copy)]
pub struct ResizeGrip {
    pub color: Color,
}

impl canvas::Program<GripEvent> for ResizeGrip {
    type State = GripCapture;

    fn update(
        &self,
        state: &mut Self::State,
        event: Event,
        bounds: Rectangle,
        cursor: mouse::Cursor,
    ) -> (canvas::event::Status, Option<GripEvent>) {
        let Event::Mouse(event) = event else {
            return (canvas::event::Status::Ignored, None);
        };
        match event {
            mouse::Event::ButtonPressed(mouse::Button::Left) if !state.captured => {
                match cursor.position_over(bounds) {
                    Some(pos) => {
                        state.captured = true;
                        (canvas::event::Status::Captured, Some(GripEvent::Pressed(pos)))
                    }
                    None => (canvas::event::Status::Ignored, None),
                }
            }
            mouse::Event::CursorMoved { position } if state.captured => {
                (canvas::event::Status::Captured, Some(GripEvent::Moved(position)))
            }
            mouse::Event::ButtonReleased(mouse::Button::Left) if state.captured => {
                state.captured = false;
                (canvas::event::Status::Captured, Some(GripEvent::Released))
            }
            _ => (canvas::event::Status::Ignored, None),
        }
    }

    fn draw(
        &self,
        _state: &Self::State,
        renderer: &Renderer,
        _theme: &Theme,
        bounds: Rectangle,
        _cursor: mouse::Cursor,
    ) -> Vec<Geometry> {
        let mut frame = Frame::new(renderer, bounds.size());
        let (w, h) = (bounds.width, bounds.height);
        // Three diagonal hatches in the corner.
        for i in 1..=3 {
            let off = i as f32 * w.min(h) / 4.0;
            let line = Path::line(Point::new(w - off, h - 1.0), Point::new(w - 1.0, h - off));
            frame.stroke(&line, Stroke::default().with_color(self.color).with_width(1.2));
        }
        vec![frame.into_geometry()]
    }

    fn mouse_interaction(
        &self,
        state: &Self::State,
        bounds: Rectangle,
        cursor: mouse::Cursor,
    ) -> mouse::Interaction {
        if state.captured {
            mouse::Interaction::Grabbing
        } else if cursor.is_over(bounds) {
            mouse::Interaction::Grab
        } else {
            mouse::Interaction::default()
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_drag_adds_delta() {
        let mut state = ResizeState::default();
        state.begin(Point::new(1000.0, 700.0), Size::new(1024.0, 768.0));
        assert!(state.is_resizing());
        assert_eq!(state.drag(Point::new(1050.0, 720.0)), Some(Size::new(1074.0, 788.0)));
        assert_eq!(state.drag(Point::new(900.0, 600.0)), Some(Size::new(924.0, 668.0)));
    }

    #[test]
    fn test_drag_clamps_to_minimum() {
        let mut state = ResizeState::default();
        state.begin(Point::new(500.0, 400.0), Size::new(520.0, 420.0));
        assert_eq!(state.drag(Point::new(0.0, 0.0)), Some(Size::new(MIN_WIDTH, MIN_HEIGHT)));
        // Only one axis under the floor.
        assert_eq!(state.drag(Point::new(600.0, 100.0)), Some(Size::new(620.0, MIN_HEIGHT)));
    }

    #[test]
    fn test_release_stops_resizing() {
        let mut state = ResizeState::default();
        state.begin(Point::ORIGIN, Size::new(800.0, 600.0));
        state.end();
        assert!(!state.is_resizing());
        assert_eq!(state.drag(Point::new(50.0, 50.0)), None);
    }

    #[test]
    fn test_idle_drag_is_none() {
        assert_eq!(ResizeState::Idle.drag(Point::new(10.0, 10.0)), None);
    }

    fn feed(
        grip: &ResizeGrip,
        capture: &mut GripCapture,
        event: mouse::Event,
        cursor: Point,
    ) -> Option<GripEvent> {
        let bounds = Rectangle::new(Point::new(784.0, 584.0), Size::new(16.0, 16.0));
        let (_, message) = <ResizeGrip as canvas::Program<GripEvent>>::update(
            grip,
            capture,
            Event::Mouse(event),
            bounds,
            mouse::Cursor::Available(cursor),
        );
        message
    }

    #[test]
    fn test_grip_keeps_pointer_until_release() {
        let grip = ResizeGrip { color: Color::WHITE };
        let mut capture = GripCapture::default();
        let press = || mouse::Event::ButtonPressed(mouse::Button::Left);
        let release = mouse::Event::ButtonReleased(mouse::Button::Left);

        // Presses elsewhere in the window are not ours.
        assert_eq!(feed(&grip, &mut capture, press(), Point::new(100.0, 100.0)), None);

        let over = Point::new(790.0, 590.0);
        assert_eq!(feed(&grip, &mut capture, press(), over), Some(GripEvent::Pressed(over)));

        // Moves far outside the grip still arrive while captured.
        let far = Point::new(1200.0, 900.0);
        let moved = mouse::Event::CursorMoved { position: far };
        assert_eq!(feed(&grip, &mut capture, moved, far), Some(GripEvent::Moved(far)));

        assert_eq!(feed(&grip, &mut capture, release, far), Some(GripEvent::Released));

        let after = Point::new(1300.0, 950.0);
        let moved = mouse::Event::CursorMoved { position: after };
        assert_eq!(feed(&grip, &mut capture, moved, after), None);
    }

    #[test]
    fn test_grip_ignores_moves_before_press() {
        let grip = ResizeGrip { color: Color::WHITE };
        let mut capture = GripCapture::default();
        let inside = Point::new(790.0, 590.0);
        let moved = mouse::Event::CursorMoved { position: inside };
        assert_eq!(feed(&grip, &mut capture, moved, inside), None);
        let release = mouse::Event::ButtonReleased(mouse::Button::Left);
        assert_eq!(feed(&grip, &mut capture, release, inside), None);
    }

    #[test]
    fn test_clamp_size() {
        assert_eq!(clamp_size(Size::new(10.0, 1000.0)), Size::new(400.0, 1000.0));
        assert_eq!(clamp_size(Size::new(1024.0, 768.0)), Size::new(1024.0, 768.0));
    }
}
