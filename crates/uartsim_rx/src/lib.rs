pub mod clock;
pub mod receiver;

pub use clock::{FracAccumulator, SampleClock};
pub use receiver::{FrameState, Receiver, RxStats};
pub use uartsim_common::{Level, RxEvent, RxSink};

/// Rate at which the simulator calls `Receiver::sample`.
///
/// The simulator runs at 90 MHz and evaluates on both clock edges.
pub const SIM_SAMPLE_HZ: u32 = 180_000_000;
/// Line rate in bits per second (8N1 framing).
pub const BAUD_RATE: u32 = 115_200;
/// Data bits per frame, sent LSB first.
pub const DATA_BITS: u8 = 8;

const _: () = assert!(BAUD_RATE > 0 && SIM_SAMPLE_HZ > BAUD_RATE);
