//! node-ip binary

use clap::Parser;
use common::logging;
use node_ip::{App, Cli, Config, ConfigEmitter, NetlinkResolver, ThreadSleeper};
use std::process::ExitCode;

fn main() -> ExitCode {
    let cli = Cli::parse();

    // Load configuration first (needed for logging settings)
    let (config, source) = match Config::load(cli.config.as_deref()) {
        Ok(loaded) => loaded,
        Err(e) => {
            let err = common::Error::from(e);
            eprintln!("error in node-ip {}: {}", cli.command.name(), err);
            return ExitCode::from(err.exit_code());
        }
    };

    logging::init(config.logging.level.as_deref(), config.log_format());

    match source {
        Some(path) => tracing::info!("Loaded configuration from {}", path.display()),
        None => tracing::debug!("No configuration file found, using defaults"),
    }

    let app = App::new(
        NetlinkResolver,
        NetlinkResolver,
        ThreadSleeper,
        ConfigEmitter::new(config.override_paths()),
    );

    let mut stdout = std::io::stdout().lock();
    match app.dispatch(&cli, &mut stdout) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("error in node-ip {}: {}", cli.command.name(), e);
            ExitCode::from(e.exit_code())
        }
    }
}
