//! Command-line parsing for the dashboard binary.

use std::path::PathBuf;

use crate::history::TimeRange;

#[derive(Debug, Default, PartialEq)]
pub struct ParsedArgs {
    pub url: Option<String>,
    pub tls_ca: Option<String>,
    pub profile: Option<String>,
    pub interval_secs: Option<u64>,
    pub range: Option<TimeRange>,
    pub traffic: Option<usize>,
    pub log_file: Option<PathBuf>,
    pub compact: bool,
    pub save: bool,
    pub dry_run: bool,
}

pub fn usage(prog: &str) -> String {
    format!(
        "Usage: {prog} [--profile NAME|-P NAME] [--tls-ca CERT_PEM|-t CERT_PEM] [--interval SECS|-i SECS] \
         [--range 1m|5m|15m] [--traffic N] [--log-file PATH] [--compact] [--save] [--dry-run] [http://HOST:PORT]"
    )
}

fn parse_interval(v: &str) -> Result<u64, String> {
    match v.parse::<u64>() {
        Ok(n) if n > 0 => Ok(n),
        _ => Err(format!("invalid --interval value: {v}")),
    }
}

fn parse_traffic(v: &str) -> Result<usize, String> {
    match v.parse::<usize>() {
        Ok(n) if n > 0 => Ok(n),
        _ => Err(format!("invalid --traffic value: {v}")),
    }
}

/// `Err` carries the text to print: usage for `--help`, a message for bad input.
pub fn parse_args<I: IntoIterator<Item = String>>(args: I) -> Result<ParsedArgs, String> {
    let mut it = args.into_iter();
    let prog = it.next().unwrap_or_else(|| "opsdash".into());
    let mut out = ParsedArgs::default();

    let missing = |flag: &str| format!("{flag} requires a value\n{}", usage(&prog));

    while let Some(arg) = it.next() {
        // accept --flag=value alongside --flag value
        let (flag, inline) = match arg.split_once('=') {
            Some((f, v)) if f.starts_with("--") => (f.to_string(), Some(v.to_string())),
            _ => (arg.clone(), None),
        };
        let value = |it: &mut I::IntoIter| -> Result<String, String> {
            match inline.clone().or_else(|| it.next()) {
                Some(v) if !v.is_empty() => Ok(v),
                _ => Err(missing(&flag)),
            }
        };

        match flag.as_str() {
            "-h" | "--help" => return Err(usage(&prog)),
            "--tls-ca" | "-t" => out.tls_ca = Some(value(&mut it)?),
            "--profile" | "-P" => out.profile = Some(value(&mut it)?),
            "--interval" | "-i" => out.interval_secs = Some(parse_interval(&value(&mut it)?)?),
            "--range" => out.range = Some(value(&mut it)?.parse::<TimeRange>()?),
            "--traffic" => out.traffic = Some(parse_traffic(&value(&mut it)?)?),
            "--log-file" => out.log_file = Some(PathBuf::from(value(&mut it)?)),
            "--compact" => out.compact = true,
            "--save" => out.save = true,
            "--dry-run" => out.dry_run = true,
            _ if arg.starts_with('-') => {
                return Err(format!("Unknown option {arg}. {}", usage(&prog)));
            }
            _ => {
                if out.url.is_none() {
                    out.url = Some(arg);
                } else {
                    return Err(format!("Unexpected argument. {}", usage(&prog)));
                }
            }
        }
    }
    Ok(out)
}
