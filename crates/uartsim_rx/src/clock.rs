//! Integer bit timing for a sample clock that is not a whole multiple of
//! the baud rate.
//!
//! At 180 MHz / 115200 Bd a bit lasts 1562.5 samples and half a bit
//! 781.25. Only whole samples can be counted, so each interval is handed
//! out as the integer part plus an occasional carry from a remainder
//! accumulator. Over a full accumulator cycle the handed-out ticks add up
//! to the exact fractional total.

use crate::{BAUD_RATE, SIM_SAMPLE_HZ};

/// Remainder-carry rate converter producing `whole + numerator / denominator`
/// ticks per call on average.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FracAccumulator {
    whole: u32,
    numerator: u32,
    denominator: u32,
    /// Fractional ticks owed, always in `0..denominator`.
    acc: u32,
}

impl FracAccumulator {
    /// # Panics
    /// Panics if `denominator` is zero or `numerator >= denominator`.
    pub const fn new(whole: u32, numerator: u32, denominator: u32) -> Self {
        assert!(denominator > 0, "denominator must be non-zero");
        assert!(numerator < denominator, "numerator must be a proper fraction");
        Self {
            whole,
            numerator,
            denominator,
            acc: 0,
        }
    }

    /// Ticks for the next interval: `whole`, or `whole + 1` on a carry.
    #[inline]
    pub fn advance(&mut self) -> u32 {
        self.acc += self.numerator;
        if self.acc >= self.denominator {
            self.acc -= self.denominator;
            self.whole + 1
        } else {
            self.whole
        }
    }

    #[inline]
    pub const fn phase(&self) -> u32 {
        self.acc
    }

    #[inline]
    pub const fn whole(&self) -> u32 {
        self.whole
    }

    #[inline]
    pub const fn denominator(&self) -> u32 {
        self.denominator
    }
}

const fn gcd(mut a: u32, mut b: u32) -> u32 {
    while b != 0 {
        let t = a % b;
        a = b;
        b = t;
    }
    a
}

/// Tick-interval generator for one receiver.
///
/// The full-bit accumulator counts in units of `1/baud`. The half-bit
/// remainder is reduced to lowest terms, which for the build-time
/// constants leaves a 2-bit phase counter that adds a tick every fourth
/// half bit.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SampleClock {
    bit: FracAccumulator,
    half_bit: FracAccumulator,
}

impl Default for SampleClock {
    fn default() -> Self {
        Self::new(SIM_SAMPLE_HZ, BAUD_RATE)
    }
}

impl SampleClock {
    /// # Panics
    /// Panics unless `sample_hz > baud > 0`.
    pub const fn new(sample_hz: u32, baud: u32) -> Self {
        assert!(baud > 0, "baud rate must be non-zero");
        assert!(sample_hz > baud, "sample rate must exceed baud rate");
        assert!(baud <= u32::MAX / 2, "baud rate out of range");

        let bit = FracAccumulator::new(sample_hz / baud, sample_hz % baud, baud);

        let half_den = baud * 2;
        let half_rem = sample_hz % half_den;
        let div = gcd(half_rem, half_den);
        let half_bit = FracAccumulator::new(sample_hz / half_den, half_rem / div, half_den / div);

        Self { bit, half_bit }
    }

    /// Samples spanning one bit period: 1562 or 1563, averaging 1562.5.
    #[inline]
    pub fn ticks_for_one_bit(&mut self) -> u32 {
        self.bit.advance()
    }

    /// Samples spanning half a bit period: 781 three times, then 782.
    #[inline]
    pub fn ticks_for_half_bit(&mut self) -> u32 {
        self.half_bit.advance()
    }

    pub const fn bit_accumulator(&self) -> &FracAccumulator {
        &self.bit
    }

    pub const fn half_bit_accumulator(&self) -> &FracAccumulator {
        &self.half_bit
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn one_bit_alternates_1562_1563() {
        let mut clock = SampleClock::default();
        let ticks: Vec<u32> = (0..6).map(|_| clock.ticks_for_one_bit()).collect();
        assert_eq!(ticks, vec![1562, 1563, 1562, 1563, 1562, 1563]);
    }

    #[test]
    fn one_bit_has_no_drift_over_baud_calls() {
        let mut clock = SampleClock::default();
        // Two full spans, so the second one starts mid-history.
        for _ in 0..2 {
            let total: u64 = (0..BAUD_RATE)
                .map(|_| clock.ticks_for_one_bit() as u64)
                .sum();
            let expected = (SIM_SAMPLE_HZ / BAUD_RATE) as u64 * BAUD_RATE as u64
                + (SIM_SAMPLE_HZ % BAUD_RATE) as u64;
            assert_eq!(total, expected);
            assert_eq!(total, SIM_SAMPLE_HZ as u64);
        }
    }

    #[test]
    fn half_bit_adds_one_tick_every_fourth_call() {
        let mut clock = SampleClock::default();
        let base = (SIM_SAMPLE_HZ / BAUD_RATE) / 2;
        assert_eq!(base, 781);
        for _ in 0..10 {
            let ticks: Vec<u32> = (0..4).map(|_| clock.ticks_for_half_bit()).collect();
            assert_eq!(ticks, vec![base, base, base, base + 1]);
            assert_eq!(ticks.iter().sum::<u32>(), 3125);
        }
    }

    #[test]
    fn half_bit_window_of_four_has_one_long_interval() {
        let mut clock = SampleClock::default();
        let ticks: Vec<u32> = (0..64).map(|_| clock.ticks_for_half_bit()).collect();
        for window in ticks.windows(4) {
            assert_eq!(window.iter().filter(|&&t| t == 782).count(), 1);
            assert_eq!(window.iter().filter(|&&t| t == 781).count(), 3);
        }
    }

    #[test]
    fn accumulators_stay_in_range() {
        let mut clock = SampleClock::default();
        assert_eq!(clock.bit_accumulator().denominator(), BAUD_RATE);
        assert_eq!(clock.half_bit_accumulator().denominator(), 4);
        for _ in 0..1000 {
            clock.ticks_for_one_bit();
            clock.ticks_for_half_bit();
            assert!(clock.bit_accumulator().phase() < BAUD_RATE);
            assert!(clock.half_bit_accumulator().phase() < 4);
        }
    }

    #[test]
    fn generators_are_independent() {
        let mut a = SampleClock::default();
        let mut b = SampleClock::default();
        for _ in 0..7 {
            a.ticks_for_half_bit();
        }
        let from_a: Vec<u32> = (0..8).map(|_| a.ticks_for_one_bit()).collect();
        let from_b: Vec<u32> = (0..8).map(|_| b.ticks_for_one_bit()).collect();
        assert_eq!(from_a, from_b);
    }

    #[test]
    fn generic_ratio_reduces_half_bit_fraction() {
        // 1000 / 300 = 3 + 1/3 per bit, 1000 / 600 = 1 + 2/3 per half bit.
        let mut clock = SampleClock::new(1000, 300);
        assert_eq!(clock.half_bit_accumulator().denominator(), 3);
        let bits: u32 = (0..300).map(|_| clock.ticks_for_one_bit()).sum();
        assert_eq!(bits, 1000);
        let halves: Vec<u32> = (0..3).map(|_| clock.ticks_for_half_bit()).collect();
        assert_eq!(halves, vec![1, 2, 2]);
    }

    #[test]
    fn whole_ratio_never_carries() {
        let mut acc = FracAccumulator::new(4, 0, 1);
        assert!((0..16).all(|_| acc.advance() == 4));
    }

    #[test]
    #[should_panic(expected = "sample rate must exceed baud rate")]
    fn rejects_sample_rate_below_baud() {
        let _ = SampleClock::new(9600, 115_200);
    }
}
