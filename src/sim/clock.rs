//! Frame throttle
//!
//! Turns host timestamps into frame deltas, dropping callbacks that arrive
//! faster than [`FRAME_INTERVAL_MS`].

use crate::consts::FRAME_INTERVAL_MS;

#[derive(Debug, Clone, Default)]
pub struct FrameClock {
    last: Option<f64>,
}

impl FrameClock {
    pub fn new() -> Self {
        Self::default()
    }

    /// Delta (ms) since the last accepted frame, or `None` when too early.
    /// The first call is accepted with a zero delta.
    pub fn tick(&mut self, now_ms: f64) -> Option<f64> {
        match self.last {
            None => {
                self.last = Some(now_ms);
                Some(0.0)
            }
            Some(last) => {
                let delta = now_ms - last;
                // small tolerance for rAF jitter around the 60 Hz boundary
                if delta + 0.5 < FRAME_INTERVAL_MS {
                    return None;
                }
                self.last = Some(now_ms);
                Some(delta)
            }
        }
    }

    pub fn reset(&mut self) {
        self.last = None;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_first_frame_zero_delta() {
        let mut clock = FrameClock::new();
        assert_eq!(clock.tick(1234.0), Some(0.0));
    }

    #[test]
    fn test_throttles_fast_callbacks() {
        let mut clock = FrameClock::new();
        clock.tick(0.0);
        assert_eq!(clock.tick(5.0), None);
        assert_eq!(clock.tick(10.0), None);
        assert_eq!(clock.tick(17.0), Some(17.0));
        assert_eq!(clock.tick(50.0), Some(33.0));
    }

    #[test]
    fn test_reset() {
        let mut clock = FrameClock::new();
        clock.tick(0.0);
        clock.reset();
        assert_eq!(clock.tick(3.0), Some(0.0));
    }
}
