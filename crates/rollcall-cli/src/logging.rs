//! File logging for the CLI

use std::fs::File;

use tracing::info;
use tracing_subscriber::EnvFilter;

use rollcall_core::Config;

/// Install a file subscriber when ROLLCALL_LOG names a level.
///
/// Logs go to the configured `log_file`, or `debug.log` in the data
/// directory. Nothing is installed when the variable is unset.
pub fn init_logging(config: &Config) {
    let Ok(log_level) = std::env::var("ROLLCALL_LOG") else {
        return;
    };

    let log_path = config.log_path();
    let log_file = match File::create(&log_path) {
        Ok(f) => f,
        Err(e) => {
            eprintln!("Warning: Could not create log file {:?}: {}", log_path, e);
            return;
        }
    };

    let env_filter = EnvFilter::new(format!(
        "rollcall_core={},rollcall_cli={}",
        log_level, log_level
    ));

    let _ = tracing_subscriber::fmt()
        .with_env_filter(env_filter)
        .with_target(false)
        .with_ansi(false)
        .with_writer(log_file)
        .try_init();

    info!("Logging initialized to {:?}", log_path);
}
