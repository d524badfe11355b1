use std::time::Instant;

use crate::bar::{Bar, BarVariant};
use crate::metrics::Snapshot;
use crate::settings::DisplayConfig;
use crate::theme::Palette;
use crate::tween::{BarTweens, Tween};

/// Every bar for one render of a snapshot.
#[derive(Debug, Clone)]
pub struct DashboardBars {
    pub average: Bar,
    pub threads: Vec<Bar>,
    pub memory: Bar,
    pub disk: Bar,
}

/// Map a snapshot and the display settings onto bars. Fills come from the
/// running transitions when there are any, otherwise from the snapshot.
pub fn build(
    snap: &Snapshot,
    tweens: &BarTweens,
    now: Instant,
    config: &DisplayConfig,
    p: &Palette,
) -> DashboardBars {
    let drawn = |bar: Bar, tween: Option<Tween>| match tween {
        Some(t) => bar.with_fill(t.value_at(now)),
        None => bar,
    };

    let threads = snap
        .cpu_usage_per_thread
        .iter()
        .enumerate()
        .map(|(i, &usage)| {
            let bar = Bar::new(format!("T{i}"), usage, BarVariant::Detail, config, p);
            match tweens.thread_at(i, now) {
                Some(fill) => bar.with_fill(fill),
                None => bar,
            }
        })
        .collect();

    DashboardBars {
        average: drawn(
            Bar::new("CPU Avg Usage", snap.cpu_usage_average, BarVariant::Summary, config, p),
            tweens.average,
        ),
        threads,
        memory: drawn(
            Bar::new("Memory Usage", snap.memory_usage_percent, BarVariant::Detail, config, p),
            tweens.memory,
        ),
        disk: drawn(
            Bar::new("Disk Usage", snap.disk_usage_percent, BarVariant::Detail, config, p),
            tweens.disk,
        ),
    }
}

/// Columns in the per-thread grid.
pub fn thread_columns(config: &DisplayConfig, threads: usize) -> usize {
    let wanted = match config.orientation {
        crate::settings::Orientation::Horizontal => 3,
        crate::settings::Orientation::Vertical => 8,
    };
    wanted.min(threads.max(1))
}
