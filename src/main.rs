mod cli;

use std::path::Path;

use anyhow::{Context, Result};
use clap::Parser;
use cli::{Cli, Commands};
use filmak_core::config::Config;

/// Config file, then environment (including `.env`).
fn load_config(path: Option<&Path>) -> Config {
    let mut config = Config::load_or_default(path);
    config.apply_env();
    config
}

async fn start_server(host: Option<String>, port: Option<u16>, config_path: Option<&Path>) -> Result<()> {
    let mut config = load_config(config_path);

    // CLI flags win over file and environment.
    if let Some(host) = host {
        config.server.host = host;
    }
    if let Some(port) = port {
        config.server.port = port;
    }

    tracing::info!("Starting Filmak {}", env!("CARGO_PKG_VERSION"));
    tracing::info!(
        "Server will listen on {}:{}",
        config.server.host,
        config.server.port
    );

    filmak_server::start(config).await?;
    Ok(())
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    // A missing .env file is fine.
    let dotenv = dotenvy::dotenv();

    // Respect RUST_LOG if set, otherwise pick defaults from the verbose flag.
    let env_filter = std::env::var("RUST_LOG").unwrap_or_else(|_| {
        if cli.verbose {
            "filmak=trace,filmak_server=trace,filmak_core=debug,tower_http=debug".to_string()
        } else {
            "filmak=info,filmak_server=info,filmak_core=info,tower_http=info".to_string()
        }
    });

    tracing_subscriber::fmt()
        .with_env_filter(&env_filter)
        .init();

    if let Ok(path) = dotenv {
        tracing::debug!("Loaded environment from {}", path.display());
    }

    match cli.command {
        Commands::Start { host, port } => {
            let rt = tokio::runtime::Runtime::new()?;
            rt.block_on(start_server(host, port, cli.config.as_deref()))
        }
        Commands::Validate {
            config: config_path,
        } => {
            let path = config_path.or(cli.config);
            validate_config(path.as_deref())
        }
        Commands::CheckSources => {
            let rt = tokio::runtime::Runtime::new()?;
            rt.block_on(check_sources(cli.config.as_deref()))
        }
        Commands::Version => {
            println!("filmak {}", env!("CARGO_PKG_VERSION"));
            Ok(())
        }
    }
}

fn validate_config(path: Option<&Path>) -> Result<()> {
    let mut config = match path {
        Some(p) => {
            println!("Validating config: {:?}", p);
            Config::load(p).with_context(|| format!("invalid config file {}", p.display()))?
        }
        None => {
            println!("No config file specified, using defaults");
            Config::default()
        }
    };
    config.apply_env();

    println!("✓ Configuration is valid");
    println!("  Server: {}:{}", config.server.host, config.server.port);
    println!(
        "  TMDB: {}",
        if config.tmdb.is_configured() { "configured" } else { "not configured" }
    );
    println!(
        "  Datastore: {}",
        if config.supabase.is_configured() {
            format!("configured (table '{}')", config.supabase.table)
        } else {
            "not configured".to_string()
        }
    );
    println!("  Placeholder fallback: {}", config.catalog.placeholder_fallback);
    println!("  Player template: {}", config.player.embed_url_template);

    let warnings = config.validate();
    if !warnings.is_empty() {
        println!("Warnings:");
        for warning in warnings {
            println!("  - {warning}");
        }
    }

    Ok(())
}

async fn check_sources(config_path: Option<&Path>) -> Result<()> {
    let config = load_config(config_path);
    let statuses = filmak_server::catalog::check_sources(&config).await;

    let mut failed = 0;
    for status in &statuses {
        let state = match (status.configured, status.reachable) {
            (false, _) => "not configured",
            (true, true) => "ok",
            (true, false) => {
                failed += 1;
                "unreachable"
            }
        };
        match &status.detail {
            Some(detail) => println!("{:<10} {state} ({detail})", status.name),
            None => println!("{:<10} {state}", status.name),
        }
    }

    if failed > 0 {
        anyhow::bail!("{failed} configured source(s) unreachable");
    }
    Ok(())
}
