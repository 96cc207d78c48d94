//! Decorative idle float for rendered cards.
//!
//! Each card bobs up and down forever, easing in and out, with a random
//! period and a start delay staggered by its index so the cards never move in
//! lockstep.  Purely cosmetic: nothing else depends on it.

use std::f64::consts::PI;
use std::time::Duration;

use rand::Rng;

/// Vertical travel, in terminal rows.
pub const FLOAT_AMPLITUDE: u16 = 1;
/// One leg of the float lasts between these two bounds.
pub const FLOAT_DURATION_MIN: Duration = Duration::from_secs(2);
pub const FLOAT_DURATION_MAX: Duration = Duration::from_secs(4);
/// Extra start delay per card index.
pub const FLOAT_STAGGER: Duration = Duration::from_millis(500);

/// Parameters of one card's float: repeat forever, reversing every leg.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FloatMotion {
    pub amplitude: u16,
    pub duration: Duration,
    pub delay: Duration,
}

impl FloatMotion {
    pub fn new(amplitude: u16, duration: Duration, delay: Duration) -> Self {
        Self {
            amplitude,
            duration,
            delay,
        }
    }

    /// Motion for the card at `index`, with a random leg duration.
    pub fn for_card(index: usize, rng: &mut impl Rng) -> Self {
        let duration = rng.gen_range(FLOAT_DURATION_MIN..FLOAT_DURATION_MAX);
        Self::new(FLOAT_AMPLITUDE, duration, FLOAT_STAGGER * index as u32)
    }

    /// Row offset at `elapsed` since the motion was attached.
    pub fn offset_at(&self, elapsed: Duration) -> u16 {
        let Some(running) = elapsed.checked_sub(self.delay) else {
            return 0;
        };
        if self.duration.is_zero() || self.amplitude == 0 {
            return 0;
        }

        let t = running.as_secs_f64() / self.duration.as_secs_f64();
        let leg = t.floor();
        let frac = t - leg;
        // yoyo: odd legs run backwards
        let progress = if leg as u64 % 2 == 0 { frac } else { 1.0 - frac };
        let eased = -((PI * progress).cos() - 1.0) / 2.0;

        (eased * f64::from(self.amplitude)).round() as u16
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn motion() -> FloatMotion {
        FloatMotion::new(2, Duration::from_secs(2), Duration::from_secs(1))
    }

    #[test]
    fn still_during_delay() {
        assert_eq!(motion().offset_at(Duration::ZERO), 0);
        assert_eq!(motion().offset_at(Duration::from_millis(999)), 0);
    }

    #[test]
    fn reaches_amplitude_at_end_of_first_leg() {
        assert_eq!(motion().offset_at(Duration::from_millis(2990)), 2);
    }

    #[test]
    fn comes_back_down_on_second_leg() {
        // halfway through the first leg, eased midpoint
        assert_eq!(motion().offset_at(Duration::from_secs(2)), 1);
        // end of the second leg is back at rest
        assert_eq!(motion().offset_at(Duration::from_millis(4990)), 0);
    }

    #[test]
    fn stays_within_amplitude() {
        let m = motion();
        for ms in (0..20_000).step_by(37) {
            assert!(m.offset_at(Duration::from_millis(ms)) <= m.amplitude);
        }
    }

    #[test]
    fn for_card_staggers_by_index() {
        let mut rng = rand::thread_rng();
        let motions: Vec<_> = (0..3).map(|i| FloatMotion::for_card(i, &mut rng)).collect();

        assert_eq!(motions[0].delay, Duration::ZERO);
        assert_eq!(motions[1].delay, Duration::from_millis(500));
        assert_eq!(motions[2].delay, Duration::from_millis(1000));
        for m in motions {
            assert!(m.duration >= FLOAT_DURATION_MIN && m.duration < FLOAT_DURATION_MAX);
            assert_eq!(m.amplitude, FLOAT_AMPLITUDE);
        }
    }

    #[test]
    fn zero_amplitude_never_moves() {
        let m = FloatMotion::new(0, Duration::from_secs(1), Duration::ZERO);
        assert_eq!(m.offset_at(Duration::from_millis(500)), 0);
    }
}
