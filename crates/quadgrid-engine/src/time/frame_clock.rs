use std::time::{Duration, Instant};

/// One tick of a [`FrameClock`].
#[derive(Debug, Copy, Clone)]
pub struct FrameTime {
    /// Zero-based frame number.
    pub index: u64,
    /// Wall-clock time since the previous tick, or since the clock started.
    pub since_last: Duration,
    pub at: Instant,
}

/// Counts redraws of the window loop.
///
/// The interval is reported as measured, never clamped: a stalled frame is
/// exactly what a benchmark wants to see.
#[derive(Debug, Clone)]
pub struct FrameClock {
    next_index: u64,
    last: Instant,
}

impl FrameClock {
    pub fn new() -> Self {
        Self {
            next_index: 0,
            last: Instant::now(),
        }
    }

    pub fn tick(&mut self) -> FrameTime {
        let at = Instant::now();
        let time = FrameTime {
            index: self.next_index,
            since_last: at.saturating_duration_since(self.last),
            at,
        };
        self.last = at;
        self.next_index += 1;
        time
    }
}

impl Default for FrameClock {
    fn default() -> Self {
        Self::new()
    }
}
