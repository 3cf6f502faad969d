//! Entry point for the opsdash TUI. Parses args, resolves the profile, and runs the App.

use std::env;
use std::io::{self, Write};
use std::path::PathBuf;
use std::time::Duration;

use anyhow::Context;
use opsdash::actions::DEFAULT_TRAFFIC;
use opsdash::api::ApiClient;
use opsdash::app::{App, AppConfig, DEFAULT_REFRESH};
use opsdash::cli::{parse_args, ParsedArgs};
use opsdash::history::TimeRange;
use opsdash::logging::{init_logging, LOG_FILE_ENV};
use opsdash::profiles::{
    load_profiles, normalize_url, save_profiles, ProfileEntry, ProfileRequest, ProfilesFile,
    ResolveProfile,
};
use opsdash::state::View;
use tracing::{info, warn};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let parsed = match parse_args(env::args()) {
        Ok(v) => v,
        Err(msg) if msg.starts_with("Usage:") => {
            eprintln!("{msg}");
            return Ok(());
        }
        Err(msg) => {
            eprintln!("{msg}");
            std::process::exit(2);
        }
    };

    let log_file = parsed
        .log_file
        .clone()
        .or_else(|| env::var_os(LOG_FILE_ENV).map(PathBuf::from));
    init_logging(log_file.as_deref())?;

    let Some(entry) = resolve_target(&parsed)? else {
        return Ok(());
    };

    let url = normalize_url(&entry.url);
    let time_range = match entry.range.as_deref() {
        Some(r) => r.parse::<TimeRange>().unwrap_or_else(|e| {
            eprintln!("{e}; using {}", TimeRange::default());
            TimeRange::default()
        }),
        None => TimeRange::default(),
    };
    let refresh_every = entry
        .interval_secs
        .map(Duration::from_secs)
        .unwrap_or(DEFAULT_REFRESH);

    if parsed.dry_run {
        println!(
            "target: {url} interval: {}s range: {time_range}{}",
            refresh_every.as_secs(),
            entry
                .tls_ca
                .as_deref()
                .map(|c| format!(" tls-ca: {c}"))
                .unwrap_or_default()
        );
        return Ok(());
    }

    let api = ApiClient::new(&url, entry.tls_ca.as_deref())
        .with_context(|| format!("connecting to {url}"))?;
    info!(%url, interval = refresh_every.as_secs(), range = %time_range, "resolved target");

    let mut app = App::new(
        api,
        AppConfig {
            refresh_every,
            time_range,
            traffic: parsed.traffic.unwrap_or(DEFAULT_TRAFFIC),
            view: if parsed.compact {
                View::Compact
            } else {
                View::Full
            },
        },
    );
    app.run().await
}

/// Work out what to connect to, prompting and persisting profiles as needed.
/// `None` means the user aborted or there was nothing to do.
fn resolve_target(parsed: &ParsedArgs) -> anyhow::Result<Option<ProfileEntry>> {
    let profiles_file = load_profiles();
    let req = ProfileRequest {
        profile_name: parsed.profile.clone(),
        url: parsed.url.clone(),
        tls_ca: parsed.tls_ca.clone(),
        interval_secs: parsed.interval_secs,
        range: parsed.range.map(|r| r.to_string()),
    };

    let mut profiles_mut = profiles_file.clone();
    let entry = match req.resolve(&profiles_file) {
        ResolveProfile::Direct(entry) => {
            if let Some(name) = parsed.profile.as_ref() {
                match profiles_mut.profiles.get(name) {
                    None => {
                        // new profile: save right away
                        profiles_mut.profiles.insert(name.clone(), entry.clone());
                        persist(&profiles_mut);
                    }
                    Some(existing) if *existing != entry => {
                        let overwrite = parsed.save
                            || prompt_yes_no(&format!(
                                "Overwrite existing profile '{name}'? [y/N]: "
                            ));
                        if overwrite {
                            profiles_mut.profiles.insert(name.clone(), entry.clone());
                            persist(&profiles_mut);
                        }
                    }
                    Some(_) => {}
                }
            }
            entry
        }
        ResolveProfile::Loaded(entry) => entry,
        ResolveProfile::PromptSelect(names) => {
            eprintln!("Select profile:");
            for (i, n) in names.iter().enumerate() {
                eprintln!("  {}. {}", i + 1, n);
            }
            let line = prompt_string("Enter number (or blank to abort): ")?;
            let picked = line
                .trim()
                .parse::<usize>()
                .ok()
                .and_then(|idx| idx.checked_sub(1))
                .and_then(|idx| names.get(idx))
                .and_then(|name| profiles_mut.profiles.get(name));
            match picked {
                Some(entry) => entry.clone(),
                None => return Ok(None),
            }
        }
        ResolveProfile::PromptCreate(name) => {
            eprintln!("Profile '{name}' does not exist yet.");
            let url = prompt_string("Enter URL (http://HOST:PORT): ")?;
            if url.trim().is_empty() {
                return Ok(None);
            }
            let ca = prompt_string("Enter TLS CA path (or leave blank): ")?;
            let entry = ProfileEntry {
                url: url.trim().to_string(),
                tls_ca: Some(ca.trim().to_string()).filter(|c| !c.is_empty()),
                interval_secs: parsed.interval_secs,
                range: parsed.range.map(|r| r.to_string()),
            };
            profiles_mut.profiles.insert(name, entry.clone());
            persist(&profiles_mut);
            entry
        }
        ResolveProfile::None => {
            eprintln!("No URL provided and no profiles to select.");
            return Ok(None);
        }
    };
    Ok(Some(entry))
}

fn persist(profiles: &ProfilesFile) {
    if let Err(e) = save_profiles(profiles) {
        warn!(error = %e, "could not save profiles");
        eprintln!("warning: could not save profiles: {e}");
    }
}

fn prompt_yes_no(prompt: &str) -> bool {
    match prompt_string(prompt) {
        Ok(line) => matches!(line.trim().to_ascii_lowercase().as_str(), "y" | "yes"),
        Err(_) => false,
    }
}

fn prompt_string(prompt: &str) -> io::Result<String> {
    eprint!("{prompt}");
    let _ = io::stderr().flush();
    let mut line = String::new();
    io::stdin().read_line(&mut line)?;
    Ok(line)
}
