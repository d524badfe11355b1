use chrono::{DateTime, Local};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use std::sync::{Arc, Mutex};
use std::time::{Duration, Instant};
use sysinfo::{Disks, System, MINIMUM_CPU_UPDATE_INTERVAL};

use crate::error::SampleError;

const BYTES_PER_GB: f64 = 1024.0 * 1024.0 * 1024.0;

/// A snapshot of system metrics at a point in time.
///
/// Every field falls back to zero/empty when absent so a partially populated
/// record still renders. The aliases accept the older flat shape
/// (`cpu_usage`, `memory_usage`, `disk_usage`) that carried no capacities.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Snapshot {
    #[serde(alias = "cpu_usage")]
    pub cpu_usage_per_thread: Vec<f32>,
    pub cpu_usage_average: f32,
    pub memory_used_gb: f64,
    pub memory_total_gb: f64,
    #[serde(alias = "memory_usage")]
    pub memory_usage_percent: f32,
    pub disk_used_gb: f64,
    pub disk_total_gb: f64,
    #[serde(alias = "disk_usage")]
    pub disk_usage_percent: f32,
    #[serde(skip)]
    pub sampled_at: Option<DateTime<Local>>,
}

impl Snapshot {
    pub fn memory_capacity(&self) -> String {
        capacity_text(self.memory_used_gb, self.memory_total_gb)
    }

    pub fn disk_capacity(&self) -> String {
        capacity_text(self.disk_used_gb, self.disk_total_gb)
    }
}

/// "6.00 GB Used / 10.00 GB Total". Non-finite figures print as zero.
pub fn capacity_text(used_gb: f64, total_gb: f64) -> String {
    let finite = |v: f64| if v.is_finite() { v } else { 0.0 };
    format!(
        "{:.2} GB Used / {:.2} GB Total",
        finite(used_gb),
        finite(total_gb)
    )
}

fn bytes_to_gb(bytes: u64) -> f64 {
    bytes as f64 / BYTES_PER_GB
}

fn usage_percent(used: u64, total: u64) -> f32 {
    if total == 0 {
        0.0
    } else {
        (used as f64 / total as f64 * 100.0) as f32
    }
}

/// The one query the dashboard needs from the host.
pub trait MetricSource: Send {
    fn sample(&mut self) -> Result<Snapshot, SampleError>;
}

/// Source shared between overlapping sample requests.
pub type SharedSource = Arc<Mutex<Box<dyn MetricSource>>>;

pub fn shared(source: impl MetricSource + 'static) -> SharedSource {
    Arc::new(Mutex::new(Box::new(source)))
}

/// Run one sample on tokio's blocking pool so the event loop never waits on
/// the platform query.
pub async fn sample_off_loop(source: SharedSource) -> Result<Arc<Snapshot>, SampleError> {
    tokio::task::spawn_blocking(move || {
        let mut source = source
            .lock()
            .map_err(|e| SampleError::Unavailable(e.to_string()))?;
        source.sample().map(Arc::new)
    })
    .await
    .map_err(|e| SampleError::Task(e.to_string()))?
}

/// How long to wait before a CPU refresh so the usage delta spans at least
/// `MINIMUM_CPU_UPDATE_INTERVAL`.
fn cpu_settle_delay(since_last_refresh: Duration) -> Duration {
    MINIMUM_CPU_UPDATE_INTERVAL.saturating_sub(since_last_refresh)
}

/// `sysinfo`-backed source. CPU usage is the delta between consecutive
/// refreshes; a sample taken too soon after the previous one first waits out
/// the remainder of the minimum interval.
pub struct SysinfoSource {
    sys: System,
    disks: Disks,
    last_cpu_refresh: Instant,
    /// Mount point whose usage is reported (the root filesystem by default).
    disk_mount: PathBuf,
}

impl SysinfoSource {
    pub fn new(disk_mount: impl Into<PathBuf>) -> Self {
        let mut sys = System::new();
        sys.refresh_cpu_usage();
        sys.refresh_memory();
        Self {
            sys,
            disks: Disks::new_with_refreshed_list(),
            last_cpu_refresh: Instant::now(),
            disk_mount: disk_mount.into(),
        }
    }

    /// Used and total bytes of the configured mount, falling back to the
    /// first listed disk when the mount is not found.
    fn disk_usage(&self) -> (u64, u64) {
        let wanted: &Path = &self.disk_mount;
        self.disks
            .iter()
            .find(|d| d.mount_point() == wanted)
            .or_else(|| self.disks.iter().next())
            .map(|d| {
                let total = d.total_space();
                (total.saturating_sub(d.available_space()), total)
            })
            .unwrap_or((0, 0))
    }
}

impl MetricSource for SysinfoSource {
    fn sample(&mut self) -> Result<Snapshot, SampleError> {
        // Only ever called from the blocking pool.
        let delay = cpu_settle_delay(self.last_cpu_refresh.elapsed());
        if !delay.is_zero() {
            std::thread::sleep(delay);
        }
        self.sys.refresh_cpu_usage();
        self.last_cpu_refresh = Instant::now();
        self.sys.refresh_memory();
        self.disks.refresh();

        let cpu_usage_per_thread: Vec<f32> =
            self.sys.cpus().iter().map(|c| c.cpu_usage()).collect();
        if cpu_usage_per_thread.is_empty() {
            return Err(SampleError::Retrieval("no logical CPUs reported".into()));
        }
        let cpu_usage_average =
            cpu_usage_per_thread.iter().sum::<f32>() / cpu_usage_per_thread.len() as f32;

        let mem_total = self.sys.total_memory();
        let mem_used = self.sys.used_memory();
        let (disk_used, disk_total) = self.disk_usage();

        Ok(Snapshot {
            cpu_usage_per_thread,
            cpu_usage_average,
            memory_used_gb: bytes_to_gb(mem_used),
            memory_total_gb: bytes_to_gb(mem_total),
            memory_usage_percent: usage_percent(mem_used, mem_total),
            disk_used_gb: bytes_to_gb(disk_used),
            disk_total_gb: bytes_to_gb(disk_total),
            disk_usage_percent: usage_percent(disk_used, disk_total),
            sampled_at: Some(Local::now()),
        })
    }
}
