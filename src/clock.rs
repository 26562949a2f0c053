use std::collections::VecDeque;
use std::time::{Duration, Instant};

/// Paces the interpreter. The driver runs whole timer ticks; the clock says
/// how many of them are due each time round the loop.
pub trait Clock {
    /// block until at least one tick is due, and say how many are
    fn wait_for_tick(&mut self) -> u32;
}

/// Wall-clock pacing using `spin_sleep`, which is far more accurate over a
/// 16ms period than `thread::sleep`. Falling behind never loses ticks: all
/// of the overdue ones are reported at once.
pub struct SpinClock {
    period: Duration,
    next_tick: Instant,
}

impl SpinClock {
    pub fn new(period: Duration) -> Self {
        SpinClock {
            period,
            next_tick: Instant::now() + period,
        }
    }
}

impl Clock for SpinClock {
    fn wait_for_tick(&mut self) -> u32 {
        let now = Instant::now();
        if now < self.next_tick {
            spin_sleep::sleep(self.next_tick - now);
        }
        let now = Instant::now();
        let mut due = 0;
        while self.next_tick <= now {
            self.next_tick += self.period;
            due += 1;
        }
        if due == 0 {
            // woke a hair early
            self.next_tick += self.period;
            due = 1;
        }
        due
    }
}

/// A clock that doesn't sleep, for tests and headless runs. Hands out the
/// scripted tick counts in order, then one tick per call.
#[derive(Debug, Default)]
pub struct ManualClock {
    script: VecDeque<u32>,
    pub calls: u64,
}

impl ManualClock {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn scripted(ticks: impl IntoIterator<Item = u32>) -> Self {
        ManualClock {
            script: ticks.into_iter().collect(),
            calls: 0,
        }
    }
}

impl Clock for ManualClock {
    fn wait_for_tick(&mut self) -> u32 {
        self.calls += 1;
        self.script.pop_front().unwrap_or(1).max(1)
    }
}
