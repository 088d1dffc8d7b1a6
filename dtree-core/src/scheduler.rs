use crate::config::Config;

/// Coarse lifecycle of a growing tree.
///
/// There is no stored terminal flag: `Converged` is reported whenever
/// no further split attempt can happen under the current limits.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum GrowthState {
    /// No tick has run yet.
    Idle,
    /// At least one more split attempt is possible.
    Growing,
    /// No eligible leaf remains or the iteration budget is spent.
    Converged,
}

/// Split clock and iteration budget.
///
/// Times are absolute seconds on the caller's clock.
#[derive(Clone, Debug, Default)]
pub struct SplitScheduler {
    iteration: u32,
    last_split_at: Option<f64>,
    started: bool,
}

impl SplitScheduler {
    pub fn new() -> Self {
        Self::default()
    }

    #[inline]
    pub fn iteration(&self) -> u32 {
        self.iteration
    }

    #[inline]
    pub fn last_split_at(&self) -> Option<f64> {
        self.last_split_at
    }

    #[inline]
    pub fn started(&self) -> bool {
        self.started
    }

    #[inline]
    pub fn budget_left(&self, cfg: &Config) -> bool {
        self.iteration < cfg.max_iterations
    }

    /// Whether the interval and budget allow a split attempt at `now`.
    ///
    /// With no attempt since the last reset the clock is always due.
    pub fn split_due(&self, now: f64, cfg: &Config) -> bool {
        self.budget_left(cfg)
            && self
                .last_split_at
                .is_none_or(|t| now - t >= cfg.split_interval)
    }

    pub fn mark_started(&mut self) {
        self.started = true;
    }

    /// Records a split attempt, applied or rejected.
    pub fn record_attempt(&mut self, now: f64) {
        self.last_split_at = Some(now);
        self.iteration += 1;
    }

    /// Restarts the clock and the iteration budget.
    pub fn reset(&mut self) {
        self.iteration = 0;
        self.last_split_at = None;
    }
}

/// Fixed-period tick source driven by an external clock.
#[derive(Clone, Debug)]
pub struct TickClock {
    period: f64,
    last_tick: Option<f64>,
}

impl TickClock {
    pub fn new(period: f64) -> Self {
        Self {
            period,
            last_tick: None,
        }
    }

    #[inline]
    pub fn period(&self) -> f64 {
        self.period
    }

    pub fn set_period(&mut self, period: f64) {
        self.period = period;
    }

    /// Returns `true` once per elapsed period.
    pub fn poll(&mut self, now: f64) -> bool {
        let due = self.last_tick.is_none_or(|t| now - t >= self.period);
        if due {
            self.last_tick = Some(now);
        }
        due
    }
}
