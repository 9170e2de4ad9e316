use std::time::{Duration, Instant};

use crate::foundation::error::{ContrailError, ContrailResult};

/// Cooperative frame pacing: sleep until the next frame deadline.
///
/// [`wait_next`](Self::wait_next) never busy-waits, and when a frame overruns
/// its slot the deadline snaps forward to `now + interval` instead of trying
/// to catch up with a burst of back-to-back frames.
#[derive(Debug)]
pub struct FrameClock {
    interval: Duration,
    next_deadline: Instant,
}

impl FrameClock {
    /// A clock targeting `fps` frames per second (~60 for display refresh).
    pub fn new(fps: f64) -> ContrailResult<Self> {
        if !fps.is_finite() || fps <= 0.0 {
            return Err(ContrailError::validation(
                "FrameClock fps must be finite and > 0",
            ));
        }
        Ok(Self::from_interval(Duration::from_secs_f64(1.0 / fps)))
    }

    pub fn from_interval(interval: Duration) -> Self {
        Self {
            interval,
            next_deadline: Instant::now() + interval,
        }
    }

    pub fn interval(&self) -> Duration {
        self.interval
    }

    /// Block until the next frame slot, yielding the thread to the host.
    pub fn wait_next(&mut self) {
        let now = Instant::now();
        if self.next_deadline > now {
            std::thread::sleep(self.next_deadline - now);
            self.next_deadline += self.interval;
        } else {
            self.next_deadline = Instant::now() + self.interval;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn rejects_non_positive_rates() {
        assert!(FrameClock::new(0.0).is_err());
        assert!(FrameClock::new(-30.0).is_err());
        assert!(FrameClock::new(f64::NAN).is_err());
    }

    #[test]
    fn sixty_fps_interval() {
        let clock = FrameClock::new(60.0).unwrap();
        let micros = clock.interval().as_micros();
        assert!((16_600..16_700).contains(&micros));
    }

    #[test]
    fn wait_covers_at_least_one_interval() {
        let interval = Duration::from_millis(5);
        let start = Instant::now();
        let mut clock = FrameClock::from_interval(interval);
        clock.wait_next();
        assert!(start.elapsed() >= interval);
    }
}
