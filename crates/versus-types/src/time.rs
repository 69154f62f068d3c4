//! Time as seen by a single simulation tick.

/// Source of simulation time for one tick.
///
/// `elapsed_time` is monotonic seconds since the simulation started;
/// `delta_time` is the length of the current tick in seconds.
pub trait Clock {
    /// Monotonic seconds since simulation start.
    fn elapsed_time(&self) -> f64;

    /// Seconds covered by the current tick.
    fn delta_time(&self) -> f32;
}

/// A frozen clock reading handed to every block and agent in a tick.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct TickTime {
    /// Seconds since simulation start, at the end of this tick.
    pub elapsed: f64,
    /// Length of this tick in seconds.
    pub delta: f32,
}

impl TickTime {
    /// Construct a reading.
    pub const fn new(elapsed: f64, delta: f32) -> Self {
        Self { elapsed, delta }
    }
}

impl Clock for TickTime {
    fn elapsed_time(&self) -> f64 {
        self.elapsed
    }

    fn delta_time(&self) -> f32 {
        self.delta
    }
}
