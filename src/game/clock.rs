//! Round countdown and the live-recognition debounce window.
//!
//! Both take `now` in the performance.now() millisecond domain and derive
//! everything from a start timestamp captured once, so ticks stay cheap and
//! the logic runs under native tests with synthetic clocks.

/// Counts down a fixed round length from the moment it is built.
#[derive(Debug)]
pub struct Countdown {
    start_ms: f64,
    duration_ms: f64,
}

impl Countdown {
    pub fn new(now_ms: f64, duration_ms: f64) -> Self {
        Self {
            start_ms: now_ms,
            duration_ms,
        }
    }

    /// Whole seconds left, rounded up, clamped at zero.
    pub fn remaining_secs(&self, now_ms: f64) -> u32 {
        let left = self.duration_ms - (now_ms - self.start_ms);
        if left <= 0.0 {
            0
        } else {
            (left / 1000.0).ceil() as u32
        }
    }

    pub fn expired(&self, now_ms: f64) -> bool {
        now_ms - self.start_ms >= self.duration_ms
    }
}

/// Gates live recognition: a request fires only after a quiet spell with no
/// new input, and only one request is in flight at a time. Input arriving
/// while a request is out re-arms the window for the next one.
#[derive(Debug)]
pub struct Debounce {
    quiet_ms: f64,
    last_input_ms: Option<f64>,
    dirty: bool,
    in_flight: bool,
}

impl Debounce {
    pub fn new(quiet_ms: f64) -> Self {
        Self {
            quiet_ms,
            last_input_ms: None,
            dirty: false,
            in_flight: false,
        }
    }

    /// Record a captured sample.
    pub fn note_input(&mut self, now_ms: f64) {
        self.dirty = true;
        self.last_input_ms = Some(now_ms);
    }

    /// True when a request should be issued now.
    pub fn ready(&self, now_ms: f64) -> bool {
        if !self.dirty || self.in_flight {
            return false;
        }
        match self.last_input_ms {
            Some(t) => now_ms - t >= self.quiet_ms,
            None => false,
        }
    }

    /// Mark the request as issued; clears the dirty flag.
    pub fn begin(&mut self) {
        self.in_flight = true;
        self.dirty = false;
    }

    /// Mark the in-flight request as settled (success or failure).
    pub fn finish(&mut self) {
        self.in_flight = false;
    }

    pub fn reset(&mut self) {
        self.last_input_ms = None;
        self.dirty = false;
        self.in_flight = false;
    }
}
