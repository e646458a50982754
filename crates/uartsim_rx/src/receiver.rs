//! Frame decoder fed one line sample per simulator tick.
//!
//! Idle: wait for a falling edge out of a line that has been seen high at
//! least once. Receiving: count down to the middle of each data bit,
//! shift it in LSB first, then check the stop bit and go back to idle.

use uartsim_common::{Level, RxEvent, RxSink};

use crate::clock::SampleClock;
use crate::DATA_BITS;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum FrameState {
    #[default]
    Idle,
    Receiving {
        /// Samples left before the next sampling instant.
        ticks_until_sample: u32,
        /// Next data bit to sample; `DATA_BITS` means the stop bit is next.
        bit_index: u8,
        rx_byte: u8,
    },
}

/// Running counters. Observation only, never consulted while decoding.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct RxStats {
    pub ticks: u64,
    pub start_edges: u64,
    pub bytes: u64,
    pub framing_errors: u64,
}

impl RxStats {
    /// Frames that reached their stop bit, good or bad.
    pub fn frames(&self) -> u64 {
        self.bytes + self.framing_errors
    }
}

/// One UART receive channel.
pub struct Receiver {
    clock: SampleClock,
    state: FrameState,
    /// Level seen on the previous idle sample, for edge detection.
    last_level: Level,
    /// Set by the first high sample; a line that powers up low must not
    /// look like a start bit at time zero.
    seen_idle_high: bool,
    stats: RxStats,
}

impl Default for Receiver {
    fn default() -> Self {
        Self::new()
    }
}

impl Receiver {
    pub fn new() -> Self {
        Self {
            clock: SampleClock::default(),
            state: FrameState::Idle,
            last_level: Level::IDLE,
            seen_idle_high: false,
            stats: RxStats::default(),
        }
    }

    /// Advance by exactly one sample tick.
    ///
    /// Returns the event completed by this sample, if any: a decoded byte
    /// on a high stop bit or a framing error on a low one.
    pub fn sample(&mut self, level: Level) -> Option<RxEvent> {
        self.stats.ticks += 1;
        match self.state {
            FrameState::Idle => {
                self.watch_for_start(level);
                None
            }
            FrameState::Receiving { .. } => self.clock_in(level),
        }
    }

    /// Like [`Receiver::sample`], handing any event to `sink`.
    pub fn sample_into(&mut self, level: Level, sink: &mut impl RxSink) {
        if let Some(event) = self.sample(level) {
            sink.on_event(event);
        }
    }

    /// Run a whole stream of samples through the receiver.
    pub fn feed<I>(&mut self, levels: I, sink: &mut impl RxSink)
    where
        I: IntoIterator<Item = Level>,
    {
        for level in levels {
            self.sample_into(level, &mut *sink);
        }
    }

    fn watch_for_start(&mut self, level: Level) {
        if level.is_high() {
            self.seen_idle_high = true;
        }
        if self.seen_idle_high && self.last_level.is_high() && level.is_low() {
            // First data bit is centred 1.5 bit periods after the edge.
            let ticks_until_sample =
                self.clock.ticks_for_half_bit() + self.clock.ticks_for_one_bit();
            self.state = FrameState::Receiving {
                ticks_until_sample,
                bit_index: 0,
                rx_byte: 0,
            };
            self.stats.start_edges += 1;
            log::trace!(
                "start edge at tick {}, first sample in {} ticks",
                self.stats.ticks,
                ticks_until_sample
            );
        }
        self.last_level = level;
    }

    fn clock_in(&mut self, level: Level) -> Option<RxEvent> {
        let FrameState::Receiving {
            ticks_until_sample,
            bit_index,
            rx_byte,
        } = &mut self.state
        else {
            return None;
        };

        if *ticks_until_sample > 0 {
            *ticks_until_sample -= 1;
            return None;
        }

        if *bit_index < DATA_BITS {
            *rx_byte |= level.bit() << *bit_index;
            *bit_index += 1;
            *ticks_until_sample = self.clock.ticks_for_one_bit();
            return None;
        }

        let event = if level.is_high() {
            self.stats.bytes += 1;
            log::debug!("received {:#04x}", *rx_byte);
            RxEvent::Byte(*rx_byte)
        } else {
            self.stats.framing_errors += 1;
            log::warn!(
                "stop bit low at tick {}, dropping {:#04x}",
                self.stats.ticks,
                *rx_byte
            );
            RxEvent::FramingError
        };

        self.state = FrameState::Idle;
        self.last_level = level;
        Some(event)
    }

    pub fn state(&self) -> FrameState {
        self.state
    }

    pub fn is_receiving(&self) -> bool {
        matches!(self.state, FrameState::Receiving { .. })
    }

    /// Next data bit index while receiving, `None` while idle.
    pub fn bit_index(&self) -> Option<u8> {
        match self.state {
            FrameState::Receiving { bit_index, .. } => Some(bit_index),
            FrameState::Idle => None,
        }
    }

    pub fn seen_idle_high(&self) -> bool {
        self.seen_idle_high
    }

    pub fn stats(&self) -> RxStats {
        self.stats
    }
}
