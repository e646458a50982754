use anyhow::{anyhow, bail, Context, Result};

use crate::{RunConfig, Source};

pub const USAGE: &str = "\
usage: uartsim text <STRING> [--jitter N] [--seed N] [--bad-stop INDEX]...
       uartsim ascii [PATH|-]
       uartsim packed [PATH|-] [CHANNEL]";

pub fn parse_args<I>(args: I) -> Result<RunConfig>
where
    I: IntoIterator<Item = String>,
{
    let mut args = args.into_iter();
    let mode = args
        .next()
        .ok_or_else(|| anyhow!("missing mode\n{}", USAGE))?;

    match mode.as_str() {
        "text" => {
            let text = args
                .next()
                .ok_or_else(|| anyhow!("missing text to send\n{}", USAGE))?;
            let mut jitter: u32 = 0;
            let mut seed: u64 = 0;
            let mut bad_stop: Vec<usize> = Vec::new();
            while let Some(flag) = args.next() {
                let value = args
                    .next()
                    .ok_or_else(|| anyhow!("missing value for '{}'", flag))?;
                match flag.as_str() {
                    "--jitter" => jitter = parse_number(&flag, &value)?,
                    "--seed" => seed = parse_number(&flag, &value)?,
                    "--bad-stop" => bad_stop.push(parse_number(&flag, &value)?),
                    other => bail!("unknown option '{}'\n{}", other, USAGE),
                }
            }
            Ok(RunConfig::builder()
                .source(Source::Text(text))
                .jitter(jitter)
                .seed(seed)
                .bad_stop(bad_stop)
                .build())
        }
        "ascii" => {
            let path = args.next().unwrap_or_else(|| "-".to_string());
            reject_extra(args)?;
            Ok(RunConfig::builder().source(Source::Ascii(path)).build())
        }
        "packed" => {
            let path = args.next().unwrap_or_else(|| "-".to_string());
            let channel: u8 = match args.next() {
                Some(value) => parse_number("CHANNEL", &value)?,
                None => 0,
            };
            if channel > 7 {
                bail!("channel {} out of range 0..=7", channel);
            }
            reject_extra(args)?;
            Ok(RunConfig::builder()
                .source(Source::Packed { path, channel })
                .build())
        }
        "-h" | "--help" | "help" => bail!("{}", USAGE),
        other => bail!("unknown mode '{}'\n{}", other, USAGE),
    }
}

fn parse_number<T>(name: &str, value: &str) -> Result<T>
where
    T: std::str::FromStr,
    T::Err: std::error::Error + Send + Sync + 'static,
{
    value
        .parse()
        .with_context(|| format!("invalid value '{}' for {}", value, name))
}

fn reject_extra(mut args: impl Iterator<Item = String>) -> Result<()> {
    match args.next() {
        Some(extra) => bail!("unexpected argument '{}'\n{}", extra, USAGE),
        None => Ok(()),
    }
}
