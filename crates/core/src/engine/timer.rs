/// Countdown for one round, advanced by external ticks.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RoundTimer {
    limit_secs: u32,
    remaining_secs: u32,
}

/// State of the countdown after a tick.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TimerStatus {
    Running { remaining_secs: u32 },
    Expired,
}

impl RoundTimer {
    #[must_use]
    pub fn start(limit_secs: u32) -> Self {
        Self {
            limit_secs,
            remaining_secs: limit_secs,
        }
    }

    /// Count down one second.
    pub fn tick(&mut self) -> TimerStatus {
        self.remaining_secs = self.remaining_secs.saturating_sub(1);
        if self.remaining_secs == 0 {
            TimerStatus::Expired
        } else {
            TimerStatus::Running {
                remaining_secs: self.remaining_secs,
            }
        }
    }

    /// Reset to the full limit.
    pub fn restart(&mut self) {
        self.remaining_secs = self.limit_secs;
    }

    #[must_use]
    pub fn remaining_secs(&self) -> u32 {
        self.remaining_secs
    }

    #[must_use]
    pub fn limit_secs(&self) -> u32 {
        self.limit_secs
    }

    #[must_use]
    pub fn is_expired(&self) -> bool {
        self.remaining_secs == 0
    }
}
