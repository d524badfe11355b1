#![windows_subsystem = "windows"]

mod bar;
mod chrome;
mod config;
mod dashboard;
mod error;
mod metrics;
mod poller;
mod resize;
mod settings;
pub mod theme;
mod tween;
mod ui;

use tracing_subscriber::fmt::time::FormatTime;
use tracing_subscriber::EnvFilter;

use config::AppConfig;
use metrics::SysinfoSource;
use ui::PcMonitor;

struct LocalTimer;

impl FormatTime for LocalTimer {
    fn format_time(&self, w: &mut tracing_subscriber::fmt::format::Writer<'_>) -> std::fmt::Result {
        write!(w, "{}", chrono::Local::now().format("%Y-%m-%dT%H:%M:%S%.3f%:z"))
    }
}

fn main() -> iced::Result {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    tracing_subscriber::fmt()
        .with_timer(LocalTimer)
        .with_env_filter(filter)
        .init();

    let app_config = AppConfig::load();
    tracing::info!(
        interval_ms = app_config.poll_interval_ms,
        disk = %app_config.disk_mount,
        "starting PcMonitor"
    );
    let source = metrics::shared(SysinfoSource::new(&app_config.disk_mount));

    iced::application(PcMonitor::title, PcMonitor::update, PcMonitor::view)
        .subscription(PcMonitor::subscription)
        .theme(PcMonitor::theme)
        .window(iced::window::Settings {
            size: app_config.window_size(),
            min_size: Some(iced::Size::new(resize::MIN_WIDTH, resize::MIN_HEIGHT)),
            decorations: false,
            #[cfg(target_os = "linux")]
            platform_specific: iced::window::settings::PlatformSpecific {
                application_id: String::from("pcmonitor"),
                ..Default::default()
            },
            ..Default::default()
        })
        .run_with(move || PcMonitor::new(source, &app_config))
}
