//! Captured sample streams.
//!
//! Two formats are accepted: ASCII `0`/`1` text with one character per
//! sample, and packed logic-analyser dumps with one byte per sample where
//! a single bit carries the line.

use std::io::Read;

use anyhow::{bail, ensure, Context, Result};
use uartsim_rx::Level;

/// Read a whole file, or stdin for `-`.
pub fn read_source(path: &str) -> Result<Vec<u8>> {
    if path == "-" {
        let mut data = Vec::new();
        std::io::stdin()
            .lock()
            .read_to_end(&mut data)
            .context("failed to read samples from stdin")?;
        Ok(data)
    } else {
        std::fs::read(path).with_context(|| format!("failed to read samples from '{}'", path))
    }
}

pub fn parse_ascii(data: &[u8]) -> Result<Vec<Level>> {
    let mut levels = Vec::with_capacity(data.len());
    for (offset, &c) in data.iter().enumerate() {
        match c {
            b'0' => levels.push(Level::Low),
            b'1' => levels.push(Level::High),
            c if c.is_ascii_whitespace() => {}
            c => bail!(
                "invalid sample {:?} at byte {}, expected '0' or '1'",
                c as char,
                offset
            ),
        }
    }
    Ok(levels)
}

pub fn parse_packed(data: &[u8], channel: u8) -> Result<Vec<Level>> {
    ensure!(channel < 8, "channel {} out of range 0..=7", channel);
    let mask = 1u8 << channel;
    Ok(data.iter().map(|&b| Level::from(b & mask)).collect())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn ascii_skips_whitespace() {
        let levels = parse_ascii(b"1 10\n0\t1\r\n").unwrap();
        assert_eq!(
            levels,
            vec![Level::High, Level::High, Level::Low, Level::Low, Level::High]
        );
    }

    #[test]
    fn ascii_reports_offset_of_bad_byte() {
        let err = parse_ascii(b"110x1").unwrap_err();
        assert!(err.to_string().contains("at byte 3"), "{}", err);
    }

    #[test]
    fn packed_picks_one_channel() {
        let data = [0b0000_0100, 0b0000_0000, 0b1111_1011, 0b0000_0101];
        assert_eq!(
            parse_packed(&data, 2).unwrap(),
            vec![Level::High, Level::Low, Level::Low, Level::High]
        );
        assert_eq!(
            parse_packed(&data, 0).unwrap(),
            vec![Level::Low, Level::Low, Level::High, Level::High]
        );
    }

    #[test]
    fn packed_rejects_bad_channel() {
        assert!(parse_packed(&[0xFF], 8).is_err());
    }

    #[test]
    fn missing_file_names_the_path() {
        let err = read_source("/definitely/not/here.bin").unwrap_err();
        assert!(format!("{:#}", err).contains("/definitely/not/here.bin"));
    }
}
