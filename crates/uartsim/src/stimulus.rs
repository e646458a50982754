//! Synthetic 8N1 line waveforms for exercising the receiver.
//!
//! Bit periods come from a [`SampleClock`], so a long run of frames
//! averages exactly 1562.5 samples per bit. Optional jitter moves each
//! bit boundary by up to `±jitter` samples around its ideal position
//! without letting the error build up over a stream.

use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use uartsim_rx::{Level, SampleClock, DATA_BITS};

/// Largest boundary jitter the receiver's mid-bit sampling tolerates with
/// margin to spare.
pub const MAX_JITTER: u32 = 256;

pub struct LineWriter {
    clock: SampleClock,
    jitter: u32,
    rng: StdRng,
    /// Ideal position of the end of the last segment.
    nominal_end: u64,
    levels: Vec<Level>,
}

impl Default for LineWriter {
    fn default() -> Self {
        Self::new()
    }
}

impl LineWriter {
    pub fn new() -> Self {
        Self::with_jitter(0, 0)
    }

    /// Jitter above [`MAX_JITTER`] is clamped.
    pub fn with_jitter(jitter: u32, seed: u64) -> Self {
        Self {
            clock: SampleClock::default(),
            jitter: jitter.min(MAX_JITTER),
            rng: StdRng::seed_from_u64(seed),
            nominal_end: 0,
            levels: Vec::new(),
        }
    }

    /// Hold the line high for `ticks` samples.
    pub fn idle(&mut self, ticks: u32) -> &mut Self {
        self.nominal_end += ticks as u64;
        self.fill_to(Level::IDLE, self.nominal_end);
        self
    }

    /// One bit period at `level`.
    pub fn bit(&mut self, level: Level) -> &mut Self {
        self.nominal_end += self.clock.ticks_for_one_bit() as u64;
        let end = if self.jitter == 0 {
            self.nominal_end
        } else {
            let j = self.jitter as i64;
            let offset = self.rng.gen_range(-j..=j);
            (self.nominal_end as i64 + offset).max(0) as u64
        };
        self.fill_to(level, end);
        self
    }

    pub fn frame(&mut self, byte: u8) -> &mut Self {
        self.frame_with_stop(byte, Level::High)
    }

    /// A frame whose stop bit is driven to `stop`; `Level::Low` produces
    /// a framing error at the receiver.
    pub fn frame_with_stop(&mut self, byte: u8, stop: Level) -> &mut Self {
        self.bit(Level::Low);
        for i in 0..DATA_BITS {
            self.bit(Level::from((byte >> i) & 1));
        }
        self.bit(stop)
    }

    pub fn levels(&self) -> &[Level] {
        &self.levels
    }

    pub fn into_levels(self) -> Vec<Level> {
        self.levels
    }

    // Segments are at least one sample long even if jitter pulls the
    // boundary behind the current end.
    fn fill_to(&mut self, level: Level, end: u64) {
        let len = self.levels.len() as u64;
        let count = end.saturating_sub(len).max(1);
        self.levels
            .extend(std::iter::repeat(level).take(count as usize));
    }
}
