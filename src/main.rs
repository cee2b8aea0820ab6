// PaySQL Server entrypoint
//!
//! Usage:
//!   paysql-server [config.toml]
//!   paysql-server issue-token <user_id> [credit]
//!
//! `issue-token` reads the config from `PAYSQL_CONFIG` (default
//! `config.toml`). Initialization and shutdown live in `lifecycle`; this file
//! only dispatches.

use anyhow::Result;
use log::info;
use paysql_configs::ServerConfig;
use paysql_server::{commands, lifecycle, logging};
use std::env;
use std::path::{Path, PathBuf};

const DEFAULT_CONFIG_PATH: &str = "config.toml";

fn load_config_or_exit(config_path: &str) -> ServerConfig {
    match ServerConfig::from_file(config_path) {
        Ok(cfg) => {
            eprintln!(
                "Loaded config from: {}",
                std::fs::canonicalize(config_path)
                    .unwrap_or_else(|_| PathBuf::from(config_path))
                    .display()
            );
            cfg
        },
        Err(e) => {
            eprintln!("FATAL: Failed to load {}: {}", config_path, e);
            eprintln!("Server cannot start without valid configuration");
            std::process::exit(1);
        },
    }
}

#[actix_web::main]
async fn main() -> Result<()> {
    let args: Vec<String> = env::args().collect();

    if args.get(1).map(String::as_str) == Some("issue-token") {
        return run_issue_token(&args[2..]).await;
    }

    let config_path = args.get(1).map(String::as_str).unwrap_or(DEFAULT_CONFIG_PATH);
    let config = load_config_or_exit(config_path);

    let server_log_path = Path::new(&config.logging.logs_path).join("server.log");
    logging::init_logging(
        &config.logging.level,
        &server_log_path.to_string_lossy(),
        config.logging.log_to_console,
        Some(&config.logging.targets),
        &config.logging.format,
    )?;

    info!("PaySQL Server v{}", env!("CARGO_PKG_VERSION"));
    info!("Host: {}  Port: {}", config.server.host, config.server.port);
    info!("Dataset: {}", config.storage.dataset_path);

    let app_context = lifecycle::bootstrap(&config).await?;
    lifecycle::run(&config, app_context).await
}

async fn run_issue_token(args: &[String]) -> Result<()> {
    let Some(user_id) = args.first() else {
        eprintln!("Usage: paysql-server issue-token <user_id> [credit]");
        std::process::exit(2);
    };
    let credit = match args.get(1) {
        Some(raw) => Some(
            raw.parse::<u64>()
                .map_err(|e| anyhow::anyhow!("Invalid credit '{}': {}", raw, e))?,
        ),
        None => None,
    };

    let config_path =
        env::var("PAYSQL_CONFIG").unwrap_or_else(|_| DEFAULT_CONFIG_PATH.to_string());
    let config = load_config_or_exit(&config_path);

    let issued = commands::issue_token(&config, user_id, credit).await?;
    eprintln!("User:    {}", user_id);
    eprintln!("Balance: {}", issued.balance);
    eprintln!("Expires: {}", issued.expires_at);
    println!("{}", issued.token);
    Ok(())
}
