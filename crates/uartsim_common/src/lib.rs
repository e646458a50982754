pub mod level;
pub mod sink;

pub use level::Level;
pub use sink::{ConsoleSink, EventLog, RxEvent, RxSink};

/// Diagnostic line written when a frame ends on a low stop bit.
pub const FRAMING_ERROR_MESSAGE: &str = "Stoppbit falsch!";
