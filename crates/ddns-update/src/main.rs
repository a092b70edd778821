// # ddns-update - one-shot DDNS updater
//
// Resolves the public IPv4 address, compares it with a Linode-hosted A record
// and rewrites the record when they differ. Meant to be run from cron or a
// systemd timer; it runs the sequence once and exits.
//
// ## Configuration
//
// All configuration is done via environment variables, optionally sourced
// from `./.env` (or the file named by `DDNS_ENV_FILE`):
//
// - `TOKEN`: Linode API token (required)
// - `DOMAIN`: Domain name, e.g. example.com (required)
// - `HOST`: Record name inside the domain, e.g. home (required; empty selects
//   the root record)
// - `DDNS_API_URL`: Linode API base (default https://api.linode.com/v4)
// - `DDNS_IP_URL`: IP echo service (default https://api.ipify.org?format=json)
// - `DDNS_API_TIMEOUT_SECS`: Provider request timeout (default 30)
// - `DDNS_MODE`: live | dry-run
// - `DDNS_STRICT`: exit 1 when the final update fails
// - `DDNS_LOG_LEVEL`: trace | debug | info | warn | error
//
// ## Example
//
// ```bash
// export TOKEN=your_token
// export DOMAIN=example.com
// export HOST=home
//
// ddns-update
// ```

use ddns_core::UpdaterConfig;
use ddns_update::{UpdaterExitCode, hydrate_env_file, init_tracing, run};
use std::process::ExitCode;

fn main() -> ExitCode {
    // Logging is not up yet, so configuration problems go to stderr
    if let Err(e) = hydrate_env_file() {
        eprintln!("{}", e);
        return UpdaterExitCode::Failure.into();
    }

    let config = match UpdaterConfig::from_env() {
        Ok(cfg) => cfg,
        Err(e) => {
            eprintln!("{}", e);
            return UpdaterExitCode::Failure.into();
        }
    };

    if let Err(e) = init_tracing(&config.log_level) {
        eprintln!("{}", e);
        return UpdaterExitCode::Failure.into();
    }

    // Single-threaded: every call is awaited in turn
    let rt = match tokio::runtime::Builder::new_current_thread()
        .enable_all()
        .build()
    {
        Ok(runtime) => runtime,
        Err(e) => {
            tracing::error!("Failed to create tokio runtime: {}", e);
            return UpdaterExitCode::Failure.into();
        }
    };

    rt.block_on(run(&config)).into()
}
