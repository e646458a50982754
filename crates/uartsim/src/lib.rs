use anyhow::{bail, ensure, Result};
use typed_builder::TypedBuilder;
use uartsim_common::RxSink;
use uartsim_rx::{Level, Receiver, RxStats, BAUD_RATE, SIM_SAMPLE_HZ};

pub mod cli;
pub mod input;
pub mod stimulus;

use stimulus::{LineWriter, MAX_JITTER};

/// Idle-high samples ahead of the first synthesized frame: one bit period,
/// rounded up.
pub const DEFAULT_IDLE_LEAD: u32 = SIM_SAMPLE_HZ / BAUD_RATE + 1;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Source {
    /// Synthesize frames for this text.
    Text(String),
    /// `0`/`1` text file, `-` for stdin.
    Ascii(String),
    /// Logic-analyser dump, one byte per sample.
    Packed { path: String, channel: u8 },
}

#[derive(TypedBuilder, Debug, Clone)]
pub struct RunConfig {
    pub source: Source,
    #[builder(default = DEFAULT_IDLE_LEAD)]
    pub idle_lead: u32,
    /// Bit boundary jitter for synthesized input, in samples.
    #[builder(default)]
    pub jitter: u32,
    #[builder(default)]
    pub seed: u64,
    /// Byte positions of synthesized frames to send with a low stop bit.
    #[builder(default)]
    pub bad_stop: Vec<usize>,
}

/// Build the sample stream for `config`, run it through a fresh receiver
/// and hand every event to `sink`.
pub fn run(config: &RunConfig, sink: &mut impl RxSink) -> Result<RxStats> {
    let levels = match &config.source {
        Source::Text(text) => synthesize(text.as_bytes(), config)?,
        Source::Ascii(path) => input::parse_ascii(&input::read_source(path)?)?,
        Source::Packed { path, channel } => {
            input::parse_packed(&input::read_source(path)?, *channel)?
        }
    };

    log::info!(
        "feeding {} samples ({:.3} ms at {} Hz)",
        levels.len(),
        levels.len() as f64 * 1e3 / SIM_SAMPLE_HZ as f64,
        SIM_SAMPLE_HZ
    );

    let mut receiver = Receiver::new();
    receiver.feed(levels, sink);
    let stats = receiver.stats();
    if receiver.is_receiving() {
        log::warn!("input ended in the middle of a frame");
    }
    Ok(stats)
}

fn synthesize(text: &[u8], config: &RunConfig) -> Result<Vec<Level>> {
    ensure!(
        config.jitter <= MAX_JITTER,
        "jitter {} exceeds the maximum of {} samples",
        config.jitter,
        MAX_JITTER
    );
    if let Some(&index) = config.bad_stop.iter().find(|&&i| i >= text.len()) {
        bail!(
            "bad stop index {} is past the end of the {}-byte text",
            index,
            text.len()
        );
    }

    let mut line = LineWriter::with_jitter(config.jitter, config.seed);
    line.idle(config.idle_lead);
    for (index, &byte) in text.iter().enumerate() {
        if config.bad_stop.contains(&index) {
            // The next start bit needs a high-to-low edge.
            line.frame_with_stop(byte, Level::Low).bit(Level::High);
        } else {
            line.frame(byte);
        }
    }
    line.idle(DEFAULT_IDLE_LEAD);
    Ok(line.into_levels())
}
