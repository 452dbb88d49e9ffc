// # ddns-update - one-shot GoDaddy dynamic DNS updater
//
// Thin integration layer: reads configuration, builds the IP source and the
// provider, runs the engine once and maps the outcome to an exit code. All
// update logic lives in ddns-core.
//
// ## Configuration
//
// Settings come from the process environment, falling back to an optional
// `.env` file (`--env-file`, default `.env`). Process variables win.
//
// ### Domain and credentials (required)
// - `DDNS_DOMAIN`: Domain whose A-records are managed
// - `DDNS_API_KEY`, `DDNS_API_SECRET`: GoDaddy API key pair
// - `DDNS_SHOPPER_ID`: GoDaddy customer number
//
// ### Record selection
// - `DDNS_RECORDS`: Comma-separated record names (e.g. `@,www`)
// - `DDNS_SELECTION_MODE`: `INCLUDE` (default) or `EXCLUDE`
//
// ### Endpoints and behaviour
// - `DDNS_IP_SOURCE_URL`: Public IP lookup URL (default `https://api.ipify.org`)
// - `DDNS_API_BASE_URL`: GoDaddy API base URL (default `https://api.godaddy.com/v1`)
// - `DDNS_RECORD_TTL`: TTL written with each update (default 3600)
// - `DDNS_DRY_RUN`: Log updates instead of sending them
// - `DDNS_FAIL_ON_PARTIAL_UPDATE`: Exit non-zero if any record update fails
// - `DDNS_LOG_LEVEL`: trace, debug, info (default), warn, error
//
// ## Example
//
// ```bash
// export DDNS_DOMAIN=example.com
// export DDNS_API_KEY=your_key
// export DDNS_API_SECRET=your_secret
// export DDNS_SHOPPER_ID=123456
// export DDNS_RECORDS=@,www
//
// ddns-update
// ```

use anyhow::{Context, Result, anyhow, bail};
use clap::{Parser, ValueEnum};
use ddns_core::config::parse_record_names;
use ddns_core::{
    Credentials, DdnsConfig, DdnsEngine, RunReport, SelectionMode, SelectionPolicy,
    TracingReporter,
};
use ddns_ip_http::HttpIpSource;
use ddns_provider_godaddy::GoDaddyProvider;
use std::collections::HashMap;
use std::env;
use std::io;
use std::path::{Path, PathBuf};
use std::process::ExitCode;
use std::sync::Arc;
use tracing::{Level, error, info};
use tracing_subscriber::FmtSubscriber;

/// Exit codes for the possible run results
///
/// Usage errors exit with clap's own code (2).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum DdnsExitCode {
    /// No change needed, or all updates attempted
    Success = 0,
    /// Missing or invalid configuration
    ConfigError = 1,
    /// Resolution, fetch or decision failed; nothing was updated
    RunFailed = 3,
    /// Some record updates failed and `DDNS_FAIL_ON_PARTIAL_UPDATE` is set
    PartialUpdate = 4,
}

impl From<DdnsExitCode> for ExitCode {
    fn from(code: DdnsExitCode) -> Self {
        ExitCode::from(code as u8)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
enum LogLevel {
    Trace,
    Debug,
    Info,
    Warn,
    Error,
}

impl From<LogLevel> for Level {
    fn from(level: LogLevel) -> Self {
        match level {
            LogLevel::Trace => Level::TRACE,
            LogLevel::Debug => Level::DEBUG,
            LogLevel::Info => Level::INFO,
            LogLevel::Warn => Level::WARN,
            LogLevel::Error => Level::ERROR,
        }
    }
}

/// Point the domain's GoDaddy A-records at this machine's public IPv4 address
#[derive(Debug, Parser)]
#[command(author, version, about, long_about = None)]
struct Cli {
    /// File with DDNS_* settings; a missing file is ignored
    #[arg(long, value_name = "PATH", default_value = ".env")]
    env_file: PathBuf,

    /// Log the updates that would be sent instead of sending them
    #[arg(long, short = 'd', action, default_value_t = false)]
    dry_run: bool,

    /// Log level (overrides DDNS_LOG_LEVEL)
    #[arg(long, short = 'l', value_enum, value_name = "LEVEL")]
    log_level: Option<LogLevel>,
}

/// Read `KEY=value` pairs from an env file
///
/// A missing file yields an empty map.
fn read_env_file(path: &Path) -> Result<HashMap<String, String>> {
    let iter = match dotenv::from_path_iter(path) {
        Ok(iter) => iter,
        Err(dotenv::Error::Io(e)) if e.kind() == io::ErrorKind::NotFound => {
            return Ok(HashMap::new());
        }
        Err(e) => return Err(anyhow!("Failed to open {}: {}", path.display(), e)),
    };

    iter.map(|item| item.map_err(|e| anyhow!("Failed to parse {}: {}", path.display(), e)))
        .collect()
}

/// Parse a boolean setting
fn parse_flag(key: &str, value: &str) -> Result<bool> {
    match value.trim().to_ascii_lowercase().as_str() {
        "1" | "true" | "yes" | "on" => Ok(true),
        "" | "0" | "false" | "no" | "off" => Ok(false),
        other => bail!("{} must be a boolean (true/false). Got: {}", key, other),
    }
}

/// Resolve the log level: command line first, then DDNS_LOG_LEVEL, then info
fn resolve_log_level(
    cli: Option<LogLevel>,
    lookup: impl Fn(&str) -> Option<String>,
) -> Result<LogLevel> {
    if let Some(level) = cli {
        return Ok(level);
    }
    match lookup("DDNS_LOG_LEVEL") {
        Some(value) => LogLevel::from_str(value.trim(), true).map_err(|_| {
            anyhow!(
                "DDNS_LOG_LEVEL '{}' is not valid. Valid levels: trace, debug, info, warn, error",
                value
            )
        }),
        None => Ok(LogLevel::Info),
    }
}

/// Build the run configuration from `DDNS_*` settings
fn load_config(lookup: impl Fn(&str) -> Option<String>) -> Result<DdnsConfig> {
    let required = |key: &str| -> Result<String> {
        lookup(key)
            .map(|value| value.trim().to_string())
            .filter(|value| !value.is_empty())
            .ok_or_else(|| {
                anyhow!(
                    "{} is required. Set it in the environment or the env file",
                    key
                )
            })
    };

    let credentials = Credentials::new(
        required("DDNS_API_KEY")?,
        required("DDNS_API_SECRET")?,
        required("DDNS_SHOPPER_ID")?,
    );

    let mode = SelectionMode::from_config_value(lookup("DDNS_SELECTION_MODE").as_deref());
    let names = parse_record_names(&lookup("DDNS_RECORDS").unwrap_or_default());
    let selection = SelectionPolicy::new(mode, names);

    let mut config = DdnsConfig::new(required("DDNS_DOMAIN")?, credentials, selection);

    if let Some(url) = lookup("DDNS_IP_SOURCE_URL") {
        config.ip_source.url = url.trim().to_string();
    }
    if let Some(url) = lookup("DDNS_API_BASE_URL") {
        config.provider.base_url = url.trim().to_string();
    }
    if let Some(ttl) = lookup("DDNS_RECORD_TTL") {
        config.provider.ttl = ttl
            .trim()
            .parse()
            .with_context(|| format!("DDNS_RECORD_TTL must be a positive integer. Got: {}", ttl))?;
    }
    if let Some(value) = lookup("DDNS_DRY_RUN") {
        config.provider.dry_run = parse_flag("DDNS_DRY_RUN", &value)?;
    }
    if let Some(value) = lookup("DDNS_FAIL_ON_PARTIAL_UPDATE") {
        config.engine.fail_on_partial_update = parse_flag("DDNS_FAIL_ON_PARTIAL_UPDATE", &value)?;
    }

    config.validate()?;
    Ok(config)
}

fn main() -> ExitCode {
    let cli = Cli::parse();

    let file_vars = match read_env_file(&cli.env_file) {
        Ok(vars) => vars,
        Err(e) => {
            eprintln!("Configuration error: {:#}", e);
            return DdnsExitCode::ConfigError.into();
        }
    };
    let lookup = |key: &str| env::var(key).ok().or_else(|| file_vars.get(key).cloned());

    let log_level = match resolve_log_level(cli.log_level, lookup) {
        Ok(level) => level,
        Err(e) => {
            eprintln!("Configuration error: {:#}", e);
            return DdnsExitCode::ConfigError.into();
        }
    };

    let subscriber = FmtSubscriber::builder()
        .with_max_level(Level::from(log_level))
        .finish();

    if let Err(e) = tracing::subscriber::set_global_default(subscriber) {
        eprintln!("Failed to set tracing subscriber: {}", e);
        return DdnsExitCode::ConfigError.into();
    }

    let mut config = match load_config(lookup) {
        Ok(config) => config,
        Err(e) => {
            error!("Configuration error: {:#}", e);
            return DdnsExitCode::ConfigError.into();
        }
    };
    if cli.dry_run {
        config.provider.dry_run = true;
    }

    info!(
        "Configuration loaded: {} ({} {} record(s))",
        config.domain,
        config.selection.mode,
        config.selection.names.len()
    );

    let rt = match tokio::runtime::Builder::new_current_thread()
        .enable_all()
        .build()
    {
        Ok(runtime) => runtime,
        Err(e) => {
            error!("Failed to create tokio runtime: {}", e);
            return DdnsExitCode::RunFailed.into();
        }
    };

    rt.block_on(run(config)).into()
}

/// Build the components and perform one update run
async fn run(config: DdnsConfig) -> DdnsExitCode {
    let engine = match build_engine(&config) {
        Ok(engine) => engine,
        Err(e) => {
            error!("Startup error: {}", e);
            return DdnsExitCode::ConfigError;
        }
    };

    let result = engine.run_once().await;
    match &result {
        Ok(report) => {
            info!(
                "Run finished in {} ms",
                report.elapsed().num_milliseconds()
            );
            if report.has_failures() {
                error!(
                    "{} record update(s) failed",
                    report.failed_updates().len()
                );
            }
        }
        Err(e) => error!("Run failed: {}", e),
    }

    exit_code_for(&result, config.engine.fail_on_partial_update)
}

/// Map a run result to the process exit code
///
/// Failed record updates only change the exit code when `fail_on_partial` is set.
fn exit_code_for(result: &ddns_core::Result<RunReport>, fail_on_partial: bool) -> DdnsExitCode {
    match result {
        Ok(report) if fail_on_partial && report.has_failures() => DdnsExitCode::PartialUpdate,
        Ok(_) => DdnsExitCode::Success,
        Err(_) => DdnsExitCode::RunFailed,
    }
}

fn build_engine(config: &DdnsConfig) -> ddns_core::Result<DdnsEngine> {
    let ip_source = HttpIpSource::from_config(&config.ip_source)?;
    let provider = GoDaddyProvider::from_config(config)?;

    DdnsEngine::new(
        Box::new(ip_source),
        Box::new(provider),
        Arc::new(TracingReporter),
        config,
    )
}
