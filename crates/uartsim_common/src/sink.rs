use std::io::Write;

use crate::FRAMING_ERROR_MESSAGE;

/// Something the receiver reports at the end of a frame.
#[derive(Copy, Clone, Eq, PartialEq, Hash, Debug)]
pub enum RxEvent {
    /// A correctly framed byte.
    Byte(u8),
    /// The stop bit was sampled low; the assembled byte is discarded.
    FramingError,
}

pub trait RxSink {
    fn on_event(&mut self, event: RxEvent);
}

impl<S: RxSink + ?Sized> RxSink for &mut S {
    fn on_event(&mut self, event: RxEvent) {
        (**self).on_event(event);
    }
}

/// Keeps every event in arrival order.
#[derive(Default, Debug, Clone, PartialEq, Eq)]
pub struct EventLog {
    pub events: Vec<RxEvent>,
}

impl EventLog {
    pub fn new() -> Self {
        Self::default()
    }

    /// Decoded bytes only, framing errors skipped.
    pub fn bytes(&self) -> Vec<u8> {
        self.events
            .iter()
            .filter_map(|event| match event {
                RxEvent::Byte(b) => Some(*b),
                RxEvent::FramingError => None,
            })
            .collect()
    }

    pub fn framing_errors(&self) -> usize {
        self.events
            .iter()
            .filter(|event| matches!(event, RxEvent::FramingError))
            .count()
    }
}

impl RxSink for EventLog {
    fn on_event(&mut self, event: RxEvent) {
        self.events.push(event);
    }
}

/// Terminal-style output: bytes are written raw, framing errors as a
/// diagnostic line. The writer is flushed after every event so a
/// downstream reader sees each character as soon as it is decoded.
pub struct ConsoleSink<W: Write> {
    writer: W,
}

impl<W: Write> ConsoleSink<W> {
    pub fn new(writer: W) -> Self {
        Self { writer }
    }

    pub fn into_inner(self) -> W {
        self.writer
    }

    fn emit(&mut self, event: RxEvent) -> std::io::Result<()> {
        match event {
            RxEvent::Byte(b) => self.writer.write_all(&[b])?,
            RxEvent::FramingError => writeln!(self.writer, "{}", FRAMING_ERROR_MESSAGE)?,
        }
        self.writer.flush()
    }
}

impl<W: Write> RxSink for ConsoleSink<W> {
    fn on_event(&mut self, event: RxEvent) {
        // Output is best effort; a broken pipe must not stall decoding.
        if let Err(err) = self.emit(event) {
            log::error!("failed to write {:?}: {}", event, err);
        }
    }
}
