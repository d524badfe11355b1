use std::sync::Arc;
use std::time::Duration;

use crate::error::SampleError;
use crate::metrics::Snapshot;

/// Shown to the user whenever a sample fails; the cause goes to the log.
pub const SAMPLE_FAILED_MESSAGE: &str = "Failed to load system info.";

pub const DEFAULT_INTERVAL: Duration = Duration::from_millis(1000);

/// What the dashboard shows. Exactly one variant is live.
#[derive(Debug, Clone, Default)]
pub enum PollState {
    #[default]
    Loading,
    Ready(Arc<Snapshot>),
    /// Last sample failed. The previous good snapshot, if any, stays visible.
    Failed {
        message: String,
        last_good: Option<Arc<Snapshot>>,
    },
}

impl PollState {
    pub fn snapshot(&self) -> Option<&Arc<Snapshot>> {
        match self {
            PollState::Loading => None,
            PollState::Ready(snap) => Some(snap),
            PollState::Failed { last_good, .. } => last_good.as_ref(),
        }
    }

    pub fn error(&self) -> Option<&str> {
        match self {
            PollState::Failed { message, .. } => Some(message),
            _ => None,
        }
    }

    pub fn is_loading(&self) -> bool {
        matches!(self, PollState::Loading)
    }
}

/// Outcome of feeding a finished request back into the poller.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Applied {
    Snapshot,
    Error,
    /// A newer request already landed; this one was dropped.
    Stale,
}

/// Fixed-interval sampling state.
///
/// Requests may overlap. Every request gets a sequence number and a
/// response is only applied when it is newer than the last applied one,
/// so a slow early response can never overwrite a later one.
#[derive(Debug)]
pub struct Poller {
    interval: Duration,
    active: bool,
    next_seq: u64,
    applied_seq: Option<u64>,
    state: PollState,
}

impl Poller {
    pub fn new(interval: Duration) -> Self {
        Self {
            interval,
            active: true,
            next_seq: 0,
            applied_seq: None,
            state: PollState::Loading,
        }
    }

    pub fn interval(&self) -> Duration {
        self.interval
    }

    pub fn is_active(&self) -> bool {
        self.active
    }

    pub fn state(&self) -> &PollState {
        &self.state
    }

    /// Stop (or restart) the repeating trigger. Returns whether a request
    /// should be issued right away, which is the case when resuming.
    pub fn set_active(&mut self, active: bool) -> bool {
        let resumed = active && !self.active;
        self.active = active;
        resumed
    }

    /// Reserve the sequence number for a new request.
    pub fn issue(&mut self) -> u64 {
        let seq = self.next_seq;
        self.next_seq += 1;
        seq
    }

    pub fn complete(&mut self, seq: u64, result: Result<Arc<Snapshot>, SampleError>) -> Applied {
        if self.applied_seq.is_some_and(|last| seq <= last) {
            return Applied::Stale;
        }
        self.applied_seq = Some(seq);
        match result {
            Ok(snap) => {
                self.state = PollState::Ready(snap);
                Applied::Snapshot
            }
            Err(_) => {
                let last_good = self.state.snapshot().cloned();
                self.state = PollState::Failed {
                    message: SAMPLE_FAILED_MESSAGE.to_string(),
                    last_good,
                };
                Applied::Error
            }
        }
    }
}

impl Default for Poller {
    fn default() -> Self {
        Self::new(DEFAULT_INTERVAL)
    }
}
