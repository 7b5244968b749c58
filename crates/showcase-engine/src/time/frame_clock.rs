use std::time::{Duration, Instant};

/// Frame timing snapshot.
#[derive(Debug, Copy, Clone)]
pub struct FrameTime {
    /// Time elapsed since the previous frame tick, in seconds.
    pub dt: f32,

    /// Monotonic timestamp taken at the tick.
    pub now: Instant,

    /// Milliseconds since the clock was created. Drives animation.
    pub uptime_ms: u64,

    /// Monotonic frame counter.
    pub frame_index: u64,
}

/// Frame clock producing `FrameTime` snapshots.
///
/// Uptime is measured from a fixed origin and is never clamped, so animation
/// stays tied to wall-clock time. Delta time is clamped to avoid pathological
/// values when the process is paused by a debugger, minimized, or stalls.
#[derive(Debug, Clone)]
pub struct FrameClock {
    origin: Instant,
    last: Instant,
    frame_index: u64,
    dt_min: Duration,
    dt_max: Duration,
}

impl FrameClock {
    /// Creates a clock whose uptime starts now.
    pub fn new() -> Self {
        Self::with_origin(Instant::now())
    }

    /// Creates a clock measuring uptime from `origin`.
    pub fn with_origin(origin: Instant) -> Self {
        Self {
            origin,
            last: origin,
            frame_index: 0,
            dt_min: Duration::from_micros(100),
            dt_max: Duration::from_millis(250),
        }
    }

    /// Resets the delta-time baseline. Uptime is unaffected.
    pub fn reset(&mut self) {
        self.last = Instant::now();
    }

    /// Advances the clock and returns a new `FrameTime`.
    pub fn tick(&mut self) -> FrameTime {
        self.tick_at(Instant::now())
    }

    fn tick_at(&mut self, now: Instant) -> FrameTime {
        let dt = now
            .saturating_duration_since(self.last)
            .clamp(self.dt_min, self.dt_max);

        self.last = now;

        let ft = FrameTime {
            dt: dt.as_secs_f32(),
            now,
            uptime_ms: millis_since(self.origin, now),
            frame_index: self.frame_index,
        };

        self.frame_index = self.frame_index.wrapping_add(1);

        ft
    }
}

impl Default for FrameClock {
    fn default() -> Self {
        Self::new()
    }
}

fn millis_since(origin: Instant, now: Instant) -> u64 {
    u64::try_from(now.saturating_duration_since(origin).as_millis()).unwrap_or(u64::MAX)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn uptime_counts_from_origin() {
        let origin = Instant::now();
        let mut clock = FrameClock::with_origin(origin);
        let ft = clock.tick_at(origin + Duration::from_millis(4500));
        assert_eq!(ft.uptime_ms, 4500);
    }

    #[test]
    fn uptime_is_not_clamped_like_dt() {
        let origin = Instant::now();
        let mut clock = FrameClock::with_origin(origin);
        let ft = clock.tick_at(origin + Duration::from_secs(10));
        assert_eq!(ft.uptime_ms, 10_000);
        assert_eq!(ft.dt, 0.25);
    }

    #[test]
    fn dt_has_a_floor() {
        let origin = Instant::now();
        let mut clock = FrameClock::with_origin(origin);
        let ft = clock.tick_at(origin);
        assert_eq!(ft.dt, Duration::from_micros(100).as_secs_f32());
    }

    #[test]
    fn frame_index_and_uptime_are_monotonic() {
        let origin = Instant::now();
        let mut clock = FrameClock::with_origin(origin);
        let mut last = clock.tick_at(origin);
        for ms in [16u64, 33, 50, 1000, 5000] {
            let ft = clock.tick_at(origin + Duration::from_millis(ms));
            assert_eq!(ft.frame_index, last.frame_index + 1);
            assert!(ft.uptime_ms >= last.uptime_ms);
            last = ft;
        }
    }

    #[test]
    fn reset_keeps_uptime_origin() {
        let origin = Instant::now();
        let mut clock = FrameClock::with_origin(origin);
        clock.reset();
        let ft = clock.tick_at(origin + Duration::from_millis(10_000));
        assert_eq!(ft.uptime_ms, 10_000);
    }
}
