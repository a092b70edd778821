// # ddns-update
//
// Thin integration layer for the one-shot updater:
// 1. Hydrate the process environment from an env file
// 2. Read configuration from environment variables
// 3. Initialise logging
// 4. Wire the HTTP IP source and the Linode provider into the engine
// 5. Run once and turn the outcome into a process exit code
//
// All DDNS logic lives in ddns-core.

use ddns_core::{DdnsEngine, Error, RunOutcome, UpdaterConfig};
use ddns_ip_http::{DEFAULT_IP_ECHO_URL, HttpIpSource};
use ddns_provider_linode::LinodeProvider;
use std::path::{Path, PathBuf};
use std::process::ExitCode;
use tracing::{Level, error, info, warn};
use tracing_subscriber::FmtSubscriber;

/// Set to skip env-file loading entirely
pub const ENV_SKIP_DOTENV: &str = "DDNS_SKIP_DOTENV";

/// Set to load a specific env file instead of `./.env`
pub const ENV_FILE: &str = "DDNS_ENV_FILE";

/// Exit codes
///
/// - 0: No change needed, record updated, or update failure outside strict mode
/// - 1: Configuration error, IP resolution failure, lookup failure
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UpdaterExitCode {
    /// Run completed
    Success = 0,
    /// Run aborted
    Failure = 1,
}

impl From<UpdaterExitCode> for ExitCode {
    fn from(code: UpdaterExitCode) -> Self {
        ExitCode::from(code as u8)
    }
}

/// Map the result of a run to an exit code
///
/// A failed write only fails the process when `strict_update` is set.
pub fn exit_code_for(
    result: &ddns_core::Result<RunOutcome>,
    strict_update: bool,
) -> UpdaterExitCode {
    match result {
        Err(_) => UpdaterExitCode::Failure,
        Ok(outcome) if outcome.is_update_failure() && strict_update => UpdaterExitCode::Failure,
        Ok(_) => UpdaterExitCode::Success,
    }
}

/// Load `DDNS_ENV_FILE` or `./.env` into the process environment
///
/// Variables already set in the environment win over the file.
///
/// # Returns
///
/// The path that was loaded, or `None` when loading was skipped or the
/// default file does not exist.
pub fn hydrate_env_file() -> ddns_core::Result<Option<PathBuf>> {
    if std::env::var_os(ENV_SKIP_DOTENV).is_some() {
        return Ok(None);
    }

    match std::env::var_os(ENV_FILE) {
        Some(path) => {
            let path = PathBuf::from(path);
            load_env_file(&path, true)?;
            Ok(Some(path))
        }
        None => {
            let path = PathBuf::from(".env");
            Ok(load_env_file(&path, false)?.then_some(path))
        }
    }
}

/// Load one env file
///
/// A missing file is an error only when `required` is set. Returns whether
/// the file was loaded.
pub fn load_env_file(path: &Path, required: bool) -> ddns_core::Result<bool> {
    match dotenvy::from_path(path) {
        Ok(()) => Ok(true),
        Err(dotenvy::Error::Io(err))
            if err.kind() == std::io::ErrorKind::NotFound && !required =>
        {
            Ok(false)
        }
        Err(err) => Err(Error::config(format!(
            "Failed to load env file {}: {}",
            path.display(),
            err
        ))),
    }
}

/// Install the global tracing subscriber
///
/// Lines go to stdout with a timestamp and level.
pub fn init_tracing(log_level: &str) -> anyhow::Result<()> {
    let level = match log_level.to_lowercase().as_str() {
        "trace" => Level::TRACE,
        "debug" => Level::DEBUG,
        "info" => Level::INFO,
        "warn" => Level::WARN,
        "error" => Level::ERROR,
        _ => Level::INFO,
    };

    let subscriber = FmtSubscriber::builder()
        .with_max_level(level)
        .with_target(false)
        .with_writer(std::io::stdout)
        .finish();

    tracing::subscriber::set_global_default(subscriber)
        .map_err(|e| anyhow::anyhow!("Failed to set tracing subscriber: {}", e))
}

/// Build the engine described by `config`
pub fn build_engine(config: &UpdaterConfig) -> ddns_core::Result<DdnsEngine> {
    let ip_source =
        HttpIpSource::new(config.ip_echo_url.as_deref().unwrap_or(DEFAULT_IP_ECHO_URL))?;

    let mut provider = LinodeProvider::new(config.api_token.clone(), config.api_timeout)?;
    if let Some(ref base_url) = config.api_base_url {
        provider = provider.with_base_url(base_url.clone());
    }

    DdnsEngine::from_config(Box::new(ip_source), Box::new(provider), config)
}

/// Run the updater once
pub async fn run(config: &UpdaterConfig) -> UpdaterExitCode {
    let engine = match build_engine(config) {
        Ok(engine) => engine,
        Err(e) => {
            error!("Failed to initialise updater: {}", e);
            return UpdaterExitCode::Failure;
        }
    };

    if config.is_dry_run() {
        warn!("Running in DRY-RUN mode - no changes will be made");
    }
    info!(
        "Checking A record {} in {}",
        config.target.host, config.target.domain
    );

    let result = engine.run_once().await;
    let code = exit_code_for(&result, config.strict_update);

    if code == UpdaterExitCode::Failure && matches!(result, Ok(RunOutcome::UpdateFailed { .. })) {
        error!("Update failed and DDNS_STRICT is set, exiting with failure");
    }

    code
}
