//! `campboard` - CLI for the camp signup API
//!
//! This binary serves the HTTP API and provides maintenance commands for the
//! underlying database.

#![warn(missing_debug_implementations)]
#![deny(unsafe_code)]

use anyhow::Context;
use clap::Parser;

use campboard::cli::{Cli, Command, ConfigCommand, ServeCommand};
use campboard::http::HttpServer;
use campboard::{init_logging, seed, Config, Storage};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    init_logging(cli.verbosity());

    let config = Config::load_from(cli.config.clone()).context("loading configuration")?;

    match cli.command {
        Command::Serve(serve_cmd) => handle_serve(config, serve_cmd).await,
        Command::Seed(seed_cmd) => handle_seed(&config, seed_cmd.reset),
        Command::Status(status_cmd) => handle_status(&config, status_cmd.json),
        Command::Config(config_cmd) => handle_config(&config, config_cmd),
    }
}

fn open_storage(config: &Config) -> anyhow::Result<Storage> {
    let path = config.database_path();
    Storage::open(&path).with_context(|| format!("opening database {}", path.display()))
}

async fn handle_serve(mut config: Config, cmd: ServeCommand) -> anyhow::Result<()> {
    if let Some(host) = cmd.host {
        config.server.host = host;
    }
    if let Some(port) = cmd.port {
        config.server.port = port;
    }
    config.validate()?;

    let storage = open_storage(&config)?;
    HttpServer::new(&config, storage).start().await?;
    Ok(())
}

fn handle_seed(config: &Config, reset: bool) -> anyhow::Result<()> {
    let storage = open_storage(config)?;
    let stats = seed::seed(&storage, reset)?;
    println!(
        "Seeded {}: {} campers, {} activities, {} signups",
        config.database_path().display(),
        stats.campers,
        stats.activities,
        stats.signups
    );
    Ok(())
}

fn handle_status(config: &Config, json: bool) -> anyhow::Result<()> {
    let storage = open_storage(config)?;
    let stats = storage.stats()?;

    if json {
        let status = serde_json::json!({
            "database_path": config.database_path(),
            "listen": config.socket_addr(),
            "stats": stats,
        });
        println!("{}", serde_json::to_string_pretty(&status)?);
    } else {
        println!("campboard status");
        println!("----------------");
        println!("Database:      {}", config.database_path().display());
        println!("Size:          {} bytes", stats.db_size_bytes);
        println!("Listen:        {}", config.socket_addr());
        println!("Campers:       {}", stats.campers);
        println!("Activities:    {}", stats.activities);
        println!("Signups:       {}", stats.signups);
    }
    Ok(())
}

fn handle_config(config: &Config, cmd: ConfigCommand) -> anyhow::Result<()> {
    match cmd {
        ConfigCommand::Show { json } => {
            if json {
                println!("{}", serde_json::to_string_pretty(config)?);
            } else {
                println!("Current Configuration");
                println!("=====================");
                println!();
                println!("[Storage]");
                println!("  Database path:  {}", config.database_path().display());
                println!();
                println!("[Server]");
                println!("  Host:           {}", config.server.host);
                println!("  Port:           {}", config.server.port);
            }
        }
        ConfigCommand::Path => {
            println!("{}", Config::default_config_path().display());
        }
        ConfigCommand::Validate { file } => {
            let path = file.unwrap_or_else(Config::default_config_path);
            println!("Validating configuration: {}", path.display());
            match Config::load_from(Some(path)) {
                Ok(_) => println!("Configuration is valid."),
                Err(e) => println!("Configuration error: {e}"),
            }
        }
    }
    Ok(())
}
