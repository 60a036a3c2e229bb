//! Cinema - request server entry point
//!
//! ```bash
//! # Serve requests from stdin, one JSON object per line
//! cinema
//!
//! # Start in Russian with an explicit config file and debug logging
//! CINEMA_LOG=cinema=debug cinema --lang ru --config ./cinema.toml
//! ```

use cinema::config::AppConfig;
use cinema::i18n::International;
use cinema::server::Server;
use std::path::PathBuf;
use std::process::ExitCode;

const HELP: &str = "\
cinema - server-rendered web application skeleton

USAGE:
  cinema [OPTIONS]

OPTIONS:
  --config <PATH>   Load configuration from PATH instead of the default locations
  --lang <TAG>      Language to start in (overrides the configured locale)
  -h, --help        Print this help
";

struct Args {
    config: Option<PathBuf>,
    lang: Option<String>,
}

fn parse_args() -> Result<Option<Args>, pico_args::Error> {
    let mut args = pico_args::Arguments::from_env();

    if args.contains(["-h", "--help"]) {
        return Ok(None);
    }

    let parsed = Args {
        config: args.opt_value_from_str("--config")?,
        lang: args.opt_value_from_str("--lang")?,
    };

    let rest = args.finish();
    if !rest.is_empty() {
        eprintln!("Warning: unused arguments left: {:?}", rest);
    }

    Ok(Some(parsed))
}

#[tokio::main]
async fn main() -> ExitCode {
    let args = match parse_args() {
        Ok(Some(args)) => args,
        Ok(None) => {
            print!("{}", HELP);
            return ExitCode::SUCCESS;
        }
        Err(e) => {
            eprintln!("Error: {}", e);
            return ExitCode::FAILURE;
        }
    };

    let config = match &args.config {
        Some(path) => AppConfig::load_from_file(path),
        None => AppConfig::load(),
    };
    let config = match config {
        Ok(config) => config,
        Err(e) => {
            eprintln!("Error: failed to load configuration: {}", e);
            return ExitCode::FAILURE;
        }
    };

    cinema::logging::init_logging(&config.logging);
    tracing::info!(
        bundle_dir = %config.i18n.bundle_dir.display(),
        development = config.i18n.development,
        "Starting Cinema"
    );

    let international = International::from_config(&config.i18n);
    let mut server = Server::new(config, international);

    match server.bootstrap(args.lang.as_deref()).await {
        Ok(language) => tracing::info!(language, "Language loaded"),
        Err(e) => {
            tracing::error!("Failed to load startup language: {}", e);
            return ExitCode::FAILURE;
        }
    }

    if let Err(e) = server.run().await {
        tracing::error!("Server error: {}", e);
        return ExitCode::FAILURE;
    }

    ExitCode::SUCCESS
}
