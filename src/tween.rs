use std::time::{Duration, Instant};

/// Length of one fill transition.
pub const TRANSITION: Duration = Duration::from_millis(500);

/// A single value easing toward its latest target over [`TRANSITION`].
#[derive(Debug, Clone, Copy)]
pub struct Tween {
    from: f32,
    to: f32,
    started: Option<Instant>,
}

impl Tween {
    pub fn settled(value: f32) -> Self {
        Self { from: value, to: value, started: None }
    }

    /// Displayed value at `now`.
    pub fn value_at(&self, now: Instant) -> f32 {
        let Some(started) = self.started else {
            return self.to;
        };
        let t = now.saturating_duration_since(started).as_secs_f32() / TRANSITION.as_secs_f32();
        if t >= 1.0 {
            return self.to;
        }
        self.from + (self.to - self.from) * ease_in_out(t)
    }

    pub fn is_running(&self, now: Instant) -> bool {
        self.started
            .is_some_and(|s| now.saturating_duration_since(s) < TRANSITION)
    }

    /// Head for `target`, starting from wherever the bar is drawn at `now`.
    /// Without animation the value jumps.
    pub fn retarget(&mut self, target: f32, now: Instant, animated: bool) {
        if !animated {
            *self = Self::settled(target);
            return;
        }
        if (target - self.to).abs() < f32::EPSILON && !self.is_running(now) {
            return;
        }
        self.from = self.value_at(now);
        self.to = target;
        self.started = Some(now);
    }

    pub fn finish(&mut self) {
        *self = Self::settled(self.to);
    }
}

fn ease_in_out(t: f32) -> f32 {
    // Cubic, symmetric around t = 0.5.
    if t < 0.5 {
        4.0 * t * t * t
    } else {
        1.0 - (-2.0 * t + 2.0).powi(3) / 2.0
    }
}

/// Displayed values for every bar on the dashboard.
#[derive(Debug, Clone, Default)]
pub struct BarTweens {
    pub average: Option<Tween>,
    pub threads: Vec<Tween>,
    pub memory: Option<Tween>,
    pub disk: Option<Tween>,
}

impl BarTweens {
    /// Point every bar at the new targets. A bar seen for the first time, or a
    /// changed thread count, starts settled.
    pub fn retarget(
        &mut self,
        average: f32,
        threads: &[f32],
        memory: f32,
        disk: f32,
        now: Instant,
        animated: bool,
    ) {
        fn step(slot: &mut Option<Tween>, target: f32, now: Instant, animated: bool) {
            match slot {
                Some(t) => t.retarget(target, now, animated),
                None => *slot = Some(Tween::settled(target)),
            }
        }
        step(&mut self.average, average, now, animated);
        step(&mut self.memory, memory, now, animated);
        step(&mut self.disk, disk, now, animated);
        if self.threads.len() != threads.len() {
            self.threads = threads.iter().copied().map(Tween::settled).collect();
        } else {
            for (t, &target) in self.threads.iter_mut().zip(threads) {
                t.retarget(target, now, animated);
            }
        }
    }

    pub fn is_running(&self, now: Instant) -> bool {
        [self.average, self.memory, self.disk]
            .iter()
            .flatten()
            .chain(self.threads.iter())
            .any(|t| t.is_running(now))
    }

    pub fn finish_all(&mut self) {
        for t in [&mut self.average, &mut self.memory, &mut self.disk]
            .into_iter()
            .flatten()
            .chain(self.threads.iter_mut())
        {
            t.finish();
        }
    }

    pub fn thread_at(&self, idx: usize, now: Instant) -> Option<f32> {
        self.threads.get(idx).map(|t| t.value_at(now))
    }
}
