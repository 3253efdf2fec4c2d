//! Simulation tick timing

use std::time::{Duration, Instant};

/// How the clock produces tick deltas
#[derive(Debug, Clone, Copy, PartialEq)]
enum ClockSource {
    /// Wall-clock time between successive ticks
    Realtime { last_tick: Instant },
    /// A constant step, for replays and tests
    Fixed { step: Duration },
}

/// Produces the Δt fed into every editor tick.
///
/// Sculpting rates are expressed per second, so the clock is the only place
/// frame timing enters the engine.
#[derive(Debug, Clone)]
pub struct TickClock {
    source: ClockSource,
    delta: Duration,
    elapsed: Duration,
    tick_count: u64,
    /// Deltas larger than this are clamped (debugger pauses, hitches)
    max_delta: Duration,
}

impl TickClock {
    /// Clock driven by wall time
    pub fn realtime() -> Self {
        Self::with_source(ClockSource::Realtime { last_tick: Instant::now() })
    }

    /// Clock that advances by a constant step every tick
    pub fn fixed(step: Duration) -> Self {
        Self::with_source(ClockSource::Fixed { step })
    }

    fn with_source(source: ClockSource) -> Self {
        Self {
            source,
            delta: Duration::ZERO,
            elapsed: Duration::ZERO,
            tick_count: 0,
            max_delta: Duration::from_millis(250),
        }
    }

    /// Override the hitch clamp
    pub fn with_max_delta(mut self, max_delta: Duration) -> Self {
        self.max_delta = max_delta;
        self
    }

    /// Call once per simulation tick; returns Δt in seconds
    pub fn tick(&mut self) -> f32 {
        let raw = match &mut self.source {
            ClockSource::Realtime { last_tick } => {
                let now = Instant::now();
                let delta = now - *last_tick;
                *last_tick = now;
                delta
            }
            ClockSource::Fixed { step } => *step,
        };

        self.delta = raw.min(self.max_delta);
        self.elapsed += self.delta;
        self.tick_count += 1;
        self.delta.as_secs_f32()
    }

    /// Delta of the last tick in seconds
    pub fn delta_secs(&self) -> f32 {
        self.delta.as_secs_f32()
    }

    /// Sum of all clamped deltas so far
    pub fn elapsed(&self) -> Duration {
        self.elapsed
    }

    /// Number of ticks taken
    pub fn tick_count(&self) -> u64 {
        self.tick_count
    }
}

impl Default for TickClock {
    fn default() -> Self {
        Self::realtime()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_fixed_clock_steps() {
        let mut clock = TickClock::fixed(Duration::from_millis(20));
        for _ in 0..50 {
            clock.tick();
        }

        assert_eq!(clock.tick_count(), 50);
        assert_eq!(clock.elapsed(), Duration::from_secs(1));
        assert!((clock.delta_secs() - 0.02).abs() < 1e-6);
    }

    #[test]
    fn test_max_delta_clamps_hitches() {
        let mut clock = TickClock::fixed(Duration::from_secs(2))
            .with_max_delta(Duration::from_millis(100));

        let dt = clock.tick();
        assert!((dt - 0.1).abs() < 1e-6);
    }

    #[test]
    fn test_realtime_clock_non_negative() {
        let mut clock = TickClock::realtime();
        let dt = clock.tick();
        assert!(dt >= 0.0);
        assert_eq!(clock.tick_count(), 1);
    }
}
