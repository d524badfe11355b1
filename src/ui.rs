use iced::widget::canvas::Canvas;
use iced::widget::{column, container, row, scrollable, text, Column, Row, Space};
use iced::{window, Alignment, Background, Border, Color, Element, Length, Size, Subscription, Task, Theme};
use std::sync::Arc;
use std::time::{Duration, Instant};

use crate::bar::Bar;
use crate::chrome::{self, WindowAction};
use crate::config::AppConfig;
use crate::dashboard::{self, DashboardBars};
use crate::error::SampleError;
use crate::metrics::{self, SharedSource, Snapshot};
use crate::poller::{Applied, Poller};
use crate::resize::{GripEvent, ResizeGrip, ResizeState};
use crate::settings::{self, ConfigChange, DisplayConfig};
use crate::theme::{self, Palette};
use crate::tween::BarTweens;

// ─── ANIMATION CONSTANTS ────────────────────────────────────────
const ANIM_TICK_MS: u64 = 33; // ~30fps while a transition runs
const GRIP_SIZE: f32 = 16.0;

// ─── MESSAGE ────────────────────────────────────────────────────

#[derive(Debug, Clone)]
pub enum Message {
    /// Poll interval elapsed.
    Tick,
    Sampled {
        seq: u64,
        result: Result<Arc<Snapshot>, SampleError>,
    },
    AnimFrame(Instant),
    Config(ConfigChange),
    /// Raw text typed into the hex color field.
    ColorDraft(String),
    ToggleSettingsPanel,
    ToggleOrientation,
    TogglePolling,
    Window(WindowAction),
    WindowResized(Size),
    Resize(GripEvent),
}

// ─── APP STATE ──────────────────────────────────────────────────

pub struct PcMonitor {
    source: SharedSource,
    poller: Poller,
    config: DisplayConfig,
    color_draft: String,
    settings_collapsed: bool,
    tweens: BarTweens,
    now: Instant,
    window_size: Size,
    resize: ResizeState,
    disk_mount: String,
    pal: Palette,
}

impl PcMonitor {
    /// Build the shell and fire the first sample right away.
    pub fn new(source: SharedSource, app: &AppConfig) -> (Self, Task<Message>) {
        let mut monitor = Self {
            source,
            poller: Poller::new(app.poll_interval()),
            config: app.display,
            color_draft: theme::to_hex(app.display.bar_color),
            settings_collapsed: false,
            tweens: BarTweens::default(),
            now: Instant::now(),
            window_size: app.window_size(),
            resize: ResizeState::default(),
            disk_mount: app.disk_mount.clone(),
            pal: Palette::default(),
        };
        let first = monitor.request_sample();
        (monitor, first)
    }

    pub fn title(&self) -> String {
        String::from("PcMonitor")
    }

    pub fn theme(&self) -> Theme {
        Theme::Dark
    }

    fn request_sample(&mut self) -> Task<Message> {
        let seq = self.poller.issue();
        tracing::debug!(seq, "requesting sample");
        Task::perform(metrics::sample_off_loop(Arc::clone(&self.source)), move |result| {
            Message::Sampled { seq, result }
        })
    }

    pub fn subscription(&self) -> Subscription<Message> {
        let resized = window::resize_events().map(|(_id, size)| Message::WindowResized(size));
        let mut subs = vec![resized];
        if self.poller.is_active() {
            subs.push(iced::time::every(self.poller.interval()).map(|_| Message::Tick));
        }
        if self.config.animated && self.tweens.is_running(Instant::now()) {
            subs.push(
                iced::time::every(Duration::from_millis(ANIM_TICK_MS)).map(Message::AnimFrame),
            );
        }
        Subscription::batch(subs)
    }

    pub fn update(&mut self, message: Message) -> Task<Message> {
        match message {
            Message::Tick => {
                if self.poller.is_active() {
                    return self.request_sample();
                }
            }
            Message::Sampled { seq, result } => {
                self.on_sampled(seq, result, Instant::now());
            }
            Message::AnimFrame(now) => {
                self.now = now;
            }
            Message::Config(change) => {
                self.apply_config(change);
            }
            Message::ColorDraft(draft) => {
                if let Some(color) = theme::parse_hex(&draft) {
                    self.apply_config(ConfigChange::BarColor(color));
                }
                self.color_draft = draft;
            }
            Message::ToggleSettingsPanel => {
                self.settings_collapsed = !self.settings_collapsed;
            }
            Message::ToggleOrientation => {
                let flipped = self.config.orientation.flipped();
                self.apply_config(ConfigChange::Orientation(flipped));
            }
            Message::TogglePolling => {
                let resumed = self.poller.set_active(!self.poller.is_active());
                tracing::info!(active = self.poller.is_active(), "polling toggled");
                if resumed {
                    return self.request_sample();
                }
            }
            Message::Window(action) => {
                return chrome::perform(action);
            }
            Message::WindowResized(size) => {
                self.window_size = size;
            }
            Message::Resize(event) => match event {
                GripEvent::Pressed(pointer) => {
                    self.resize.begin(pointer, self.window_size);
                }
                GripEvent::Moved(pointer) => {
                    if let Some(size) = self.resize.drag(pointer) {
                        return chrome::request_size(size);
                    }
                }
                GripEvent::Released => {
                    if self.resize.is_resizing() {
                        tracing::debug!(
                            width = self.window_size.width,
                            height = self.window_size.height,
                            "resize finished"
                        );
                    }
                    self.resize.end();
                }
            },
        }
        Task::none()
    }

    fn on_sampled(&mut self, seq: u64, result: Result<Arc<Snapshot>, SampleError>, now: Instant) {
        if let Err(e) = &result {
            tracing::warn!(seq, error = %e, "sample failed");
        }
        match self.poller.complete(seq, result) {
            Applied::Snapshot => {
                if let Some(snap) = self.poller.state().snapshot() {
                    tracing::debug!(
                        seq,
                        cpu = snap.cpu_usage_average,
                        threads = snap.cpu_usage_per_thread.len(),
                        "snapshot applied"
                    );
                    self.tweens.retarget(
                        snap.cpu_usage_average,
                        &snap.cpu_usage_per_thread,
                        snap.memory_usage_percent,
                        snap.disk_usage_percent,
                        now,
                        self.config.animated,
                    );
                }
                self.now = now;
            }
            Applied::Error => {}
            Applied::Stale => {
                tracing::debug!(seq, "dropping stale sample");
            }
        }
    }

    fn apply_config(&mut self, change: ConfigChange) {
        tracing::debug!(?change, "display config changed");
        self.config = self.config.apply(change);
        match change {
            ConfigChange::Animated(false) => self.tweens.finish_all(),
            ConfigChange::BarColor(color) => self.color_draft = theme::to_hex(color),
            _ => {}
        }
    }

    fn status_line(&self) -> String {
        let mut status = match self.poller.state().snapshot().and_then(|s| s.sampled_at) {
            Some(at) => format!("Updated {}", at.format("%H:%M:%S")),
            None => String::from("Waiting for data"),
        };
        if !self.poller.is_active() {
            status.push_str(" (paused)");
        }
        status
    }

    // ─── VIEW ───────────────────────────────────────────────────

    pub fn view(&self) -> Element<'_, Message> {
        let p = &self.pal;
        let top = chrome::top_bar(
            self.config.orientation,
            self.poller.is_active(),
            self.status_line(),
            p,
        );

        let state = self.poller.state();
        let mut body = Column::new().spacing(12).padding([12, 16]);
        if let Some(msg) = state.error() {
            body = body.push(text(format!("Error: {msg}")).size(14).color(p.error));
        }
        if state.is_loading() {
            body = body.push(
                container(text("Loading system information...").size(16).color(p.label))
                    .center_x(Length::Fill)
                    .padding(40),
            );
        } else if let Some(snap) = state.snapshot() {
            body = body.push(self.view_dashboard(snap));
        }

        let grip: Element<'_, GripEvent> = Canvas::new(ResizeGrip { color: p.label })
            .width(GRIP_SIZE)
            .height(GRIP_SIZE)
            .into();
        let bottom = row![Space::with_width(Length::Fill), grip.map(Message::Resize)]
            .padding([0, 2]);

        let bg = p.bg;
        container(column![
            top,
            scrollable(body).height(Length::Fill),
            bottom,
        ])
        .width(Length::Fill)
        .height(Length::Fill)
        .style(move |_: &Theme| container::Style {
            background: Some(Background::Color(bg)),
            ..Default::default()
        })
        .into()
    }

    fn view_dashboard<'a>(&'a self, snap: &'a Snapshot) -> Element<'a, Message> {
        let p = &self.pal;
        let DashboardBars { average, threads, memory, disk } =
            dashboard::build(snap, &self.tweens, self.now, &self.config, p);

        let heading = text("PC System Monitor").size(22).color(p.text);
        let panel_settings =
            settings::view_panel(&self.config, &self.color_draft, self.settings_collapsed, p);

        let cpu = column![
            text(format!("Average Usage: {:.2}%", snap.cpu_usage_average)).size(13).color(p.label),
            text(format!("Threads: {}", snap.cpu_usage_per_thread.len())).size(13).color(p.label),
            average.view(),
            self.thread_grid(threads),
        ]
        .spacing(8);

        let memory_section = column![
            text(format!("Usage: {:.2}%", snap.memory_usage_percent)).size(13).color(p.label),
            text(snap.memory_capacity()).size(13).color(p.label),
            memory.view(),
        ]
        .spacing(6);

        let disk_section = column![
            text(format!("Usage: {:.2}%", snap.disk_usage_percent)).size(13).color(p.label),
            text(snap.disk_capacity()).size(13).color(p.label),
            disk.view(),
        ]
        .spacing(6);

        column![
            heading,
            panel_settings,
            metric_card("CPU", cpu, p),
            metric_card("Memory", memory_section, p),
            metric_card(format!("Disk ({})", self.disk_mount), disk_section, p),
        ]
        .spacing(12)
        .into()
    }

    fn thread_grid<'a>(&self, threads: Vec<Bar>) -> Element<'a, Message> {
        let cols = dashboard::thread_columns(&self.config, threads.len());
        let spacing = if self.config.compact { 6 } else { 10 };
        let mut grid = Column::new().spacing(spacing);
        let mut cells: Vec<Element<'a, Message>> = Vec::with_capacity(cols);
        for bar in threads {
            cells.push(container(bar.view()).center_x(Length::Fill).into());
            if cells.len() == cols {
                grid = grid.push(Row::with_children(std::mem::take(&mut cells)).spacing(spacing));
            }
        }
        if !cells.is_empty() {
            // Keep the last row's cells as wide as the others.
            while cells.len() < cols {
                cells.push(Space::with_width(Length::Fill).into());
            }
            grid = grid.push(Row::with_children(cells).spacing(spacing));
        }
        grid.align_x(Alignment::Center).into()
    }
}

// ─── HELPERS ────────────────────────────────────────────────────

/// Titled card for one metric group, outlined in a faint accent tint.
fn metric_card<'a>(
    title: impl ToString,
    body: Column<'a, Message>,
    p: &Palette,
) -> Element<'a, Message> {
    let bg = p.panel_bg;
    let outline = Color { a: 0.35, ..p.accent };
    container(column![section_title(title, p), body].spacing(6))
        .width(Length::Fill)
        .padding([10, 14])
        .style(move |_: &Theme| container::Style {
            background: Some(Background::Color(bg)),
            border: Border {
                color: outline,
                width: 1.0,
                radius: 6.0.into(),
            },
            ..Default::default()
        })
        .into()
}

fn section_title(label: impl ToString, p: &Palette) -> Element<'static, Message> {
    text(label.to_string()).size(15).color(p.accent).into()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::metrics::MetricSource;
    use crate::poller::SAMPLE_FAILED_MESSAGE;
    use crate::settings::{ColorMode, Orientation};
    use iced::Point;

    struct Fixed;

    impl MetricSource for Fixed {
        fn sample(&mut self) -> Result<Snapshot, SampleError> {
            Ok(Snapshot::default())
        }
    }

    fn monitor() -> PcMonitor {
        let (monitor, _first) = PcMonitor::new(metrics::shared(Fixed), &AppConfig::default());
        monitor
    }

    fn snap(avg: f32, threads: Vec<f32>) -> Arc<Snapshot> {
        Arc::new(Snapshot {
            cpu_usage_average: avg,
            cpu_usage_per_thread: threads,
            memory_usage_percent: 60.0,
            disk_usage_percent: 75.0,
            ..Default::default()
        })
    }

    #[test]
    fn test_starts_loading_with_first_request_issued() {
        let mut m = monitor();
        assert!(m.poller.state().is_loading());
        // Sequence 0 went out from new(); the next one is 1.
        assert_eq!(m.poller.issue(), 1);
        assert_eq!(m.title(), "PcMonitor");
    }

    #[test]
    fn test_sample_then_failure_keeps_values() {
        let mut m = monitor();
        let _ = m.update(Message::Sampled { seq: 0, result: Ok(snap(45.2, vec![10.0, 90.0])) });
        assert!(m.poller.state().error().is_none());

        let _ = m.update(Message::Sampled {
            seq: 1,
            result: Err(SampleError::Retrieval("boom".into())),
        });
        assert_eq!(m.poller.state().error(), Some(SAMPLE_FAILED_MESSAGE));
        let kept = m.poller.state().snapshot().map(|s| s.cpu_usage_average);
        assert_eq!(kept, Some(45.2));
    }

    #[test]
    fn test_new_sample_starts_transition() {
        let mut m = monitor();
        let t0 = Instant::now();
        m.on_sampled(0, Ok(snap(10.0, vec![10.0])), t0);
        assert!(!m.tweens.is_running(t0));
        m.on_sampled(1, Ok(snap(90.0, vec![90.0])), t0);
        assert!(m.tweens.is_running(t0));

        // Animation off snaps everything.
        let _ = m.update(Message::Config(ConfigChange::Animated(false)));
        assert!(!m.tweens.is_running(t0));
        assert_eq!(m.tweens.thread_at(0, t0), Some(90.0));
    }

    #[test]
    fn test_stale_sample_is_ignored() {
        let mut m = monitor();
        let t0 = Instant::now();
        m.on_sampled(3, Ok(snap(70.0, vec![])), t0);
        m.on_sampled(2, Ok(snap(5.0, vec![])), t0);
        assert_eq!(m.poller.state().snapshot().map(|s| s.cpu_usage_average), Some(70.0));
    }

    #[test]
    fn test_color_draft_applies_only_valid_hex() {
        let mut m = monitor();
        let _ = m.update(Message::Config(ConfigChange::ColorMode(ColorMode::Single)));
        let _ = m.update(Message::ColorDraft("#3498".into()));
        assert_eq!(theme::to_hex(m.config.bar_color), "#0bc568");
        assert_eq!(m.color_draft, "#3498");

        let _ = m.update(Message::ColorDraft("#3498db".into()));
        assert_eq!(theme::to_hex(m.config.bar_color), "#3498db");
    }

    #[test]
    fn test_orientation_toggle() {
        let mut m = monitor();
        let _ = m.update(Message::ToggleOrientation);
        assert_eq!(m.config.orientation, Orientation::Vertical);
        let _ = m.update(Message::ToggleOrientation);
        assert_eq!(m.config.orientation, Orientation::Horizontal);
    }

    #[test]
    fn test_pause_and_resume() {
        let mut m = monitor();
        let _ = m.update(Message::TogglePolling);
        assert!(!m.poller.is_active());
        assert!(m.status_line().ends_with("(paused)"));
        let _ = m.update(Message::TogglePolling);
        assert!(m.poller.is_active());
        // Resuming issued request 1 immediately.
        assert_eq!(m.poller.issue(), 2);
    }

    #[test]
    fn test_tick_while_paused_issues_nothing() {
        let mut m = monitor();
        let _ = m.update(Message::TogglePolling);
        let _ = m.update(Message::Tick);
        let _ = m.update(Message::Tick);
        // Only request 0 from new() went out.
        assert_eq!(m.poller.issue(), 1);
    }

    #[test]
    fn test_tick_while_active_issues_request() {
        let mut m = monitor();
        let _ = m.update(Message::Tick);
        assert_eq!(m.poller.issue(), 2);
    }

    #[test]
    fn test_resize_grip_flow() {
        let mut m = monitor();
        let _ = m.update(Message::WindowResized(Size::new(800.0, 600.0)));
        let _ = m.update(Message::Resize(GripEvent::Pressed(Point::new(790.0, 590.0))));
        assert!(m.resize.is_resizing());
        assert_eq!(m.resize.drag(Point::new(100.0, 100.0)), Some(Size::new(400.0, 300.0)));

        let _ = m.update(Message::Resize(GripEvent::Released));
        assert!(!m.resize.is_resizing());
        assert_eq!(m.resize.drag(Point::new(900.0, 700.0)), None);
    }

    #[test]
    fn test_view_builds_for_every_state() {
        let mut m = monitor();
        let _ = m.view();
        m.on_sampled(0, Ok(snap(45.2, vec![10.0, 90.0, 55.0, 20.0])), Instant::now());
        let _ = m.view();
        let _ = m.update(Message::ToggleOrientation);
        let _ = m.view();
        m.on_sampled(1, Err(SampleError::Retrieval("boom".into())), Instant::now());
        let _ = m.view();
    }

    #[test]
    fn test_settings_panel_collapses() {
        let mut m = monitor();
        assert!(!m.settings_collapsed);
        let _ = m.update(Message::ToggleSettingsPanel);
        assert!(m.settings_collapsed);
    }
}
