//! Scenario replay for the site interaction controllers.
//!
//! Loads `conf/config.toml` (or the file passed with `--config`), replays a
//! TOML scenario against the in-memory page, and prints the final page
//! snapshot as JSON on stdout. Logs go to stderr.

use anyhow::{Context, Result, anyhow};
use site_interactions::config::load_config;
use site_interactions::harness::{load_scenario, replay};
use std::env;
use std::io;
use std::path::PathBuf;
use tracing::{error, info, warn};
use tracing_subscriber::{EnvFilter, fmt, prelude::*, reload};

type ReloadHandle = reload::Handle<EnvFilter, tracing_subscriber::Registry>;

const DEFAULT_CONFIG_PATH: &str = "conf/config.toml";

struct Args {
    scenario: PathBuf,
    config: PathBuf,
}

fn main() {
    let reload_handle = init_tracing();
    if let Err(err) = run(&reload_handle) {
        error!("{err:?}");
        std::process::exit(1);
    }
}

fn run(reload_handle: &ReloadHandle) -> Result<()> {
    let args = parse_args()?;
    let config = load_config(&args.config);
    set_log_level(reload_handle, config.log_level.as_filter_str());
    info!(
        scenario = %args.scenario.display(),
        config = %args.config.display(),
        level = %config.log_level,
        "Replaying scenario"
    );
    let scenario = load_scenario(&args.scenario)?;
    let snapshot = replay(&scenario, config)?;
    let json = serde_json::to_string_pretty(&snapshot).context("Failed to encode snapshot")?;
    println!("{json}");
    Ok(())
}

fn parse_args() -> Result<Args> {
    const USAGE: &str = "Usage: site-interactions <scenario.toml> [--config <config.toml>]";
    let mut scenario = None;
    let mut config = PathBuf::from(DEFAULT_CONFIG_PATH);
    let mut args = env::args().skip(1);
    while let Some(arg) = args.next() {
        match arg.as_str() {
            "--config" => {
                let path = args
                    .next()
                    .ok_or_else(|| anyhow!("--config needs a path\n{USAGE}"))?;
                config = PathBuf::from(path);
            }
            "-h" | "--help" => return Err(anyhow!(USAGE)),
            _ if scenario.is_none() => scenario = Some(PathBuf::from(arg)),
            other => return Err(anyhow!("Unexpected argument `{other}`\n{USAGE}")),
        }
    }
    let scenario = scenario.ok_or_else(|| anyhow!(USAGE))?;
    if !scenario.exists() {
        return Err(anyhow!("File not found: {}", scenario.display()));
    }
    Ok(Args { scenario, config })
}

fn init_tracing() -> ReloadHandle {
    let env_filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    let (filter_layer, handle) = reload::Layer::new(env_filter);
    tracing_subscriber::registry()
        .with(
            fmt::layer()
                .with_writer(io::stderr)
                .with_target(true)
                .with_file(true)
                .with_line_number(true)
                .with_filter(filter_layer),
        )
        .init();
    handle
}

fn set_log_level(handle: &ReloadHandle, level: &str) {
    if env::var_os("RUST_LOG").is_some() {
        return;
    }
    let parsed = EnvFilter::builder()
        .parse(level)
        .unwrap_or_else(|_| EnvFilter::new("info"));
    if let Err(err) = handle.modify(|filter| *filter = parsed) {
        warn!(%level, "Failed to update log level from config: {err}");
    } else {
        info!(%level, "Applied log level from config");
    }
}
