//! `garaged`: the warranty code server.
//!
//! Usage:
//!   garaged -c <context-name-or-path> [--listen <addr>]
//!   garaged init --name <context> --password <password>
//!
//! The context name resolves to `/etc/garaged/<name>.toml`.
//! If a path with `/` or ending in `.toml` is given, it's used directly.

mod auth_middleware;
mod bootstrap;
mod config;
mod init;
mod login;
mod routes;

use std::path::PathBuf;
use std::sync::Arc;

use clap::{Parser, Subcommand};
use garage_core::Module;
use tracing::info;

use auth_middleware::JwtState;
use config::ServerConfig;
use routes::AppState;
use warranty::service::WarrantyService;
use warranty::WarrantyModule;

/// Warranty code server.
#[derive(Parser, Debug)]
#[command(name = "garaged", about = "Warranty code server")]
struct Cli {
    #[command(subcommand)]
    command: Option<Command>,

    /// Context name or path to config file.
    #[arg(short = 'c', long = "config")]
    config: Option<String>,

    /// Listen address.
    #[arg(long = "listen", default_value = garage_core::config::DEFAULT_LISTEN)]
    listen: String,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Write a new server config with a hashed admin password.
    Init {
        /// Context name; the file is written as `<config-dir>/<name>.toml`.
        #[arg(long)]
        name: String,

        #[arg(long, default_value = config::CONFIG_DIR)]
        config_dir: String,

        /// Defaults to `/var/lib/garaged/<name>`.
        #[arg(long)]
        data_dir: Option<String>,

        #[arg(long, default_value = "admin")]
        username: String,

        #[arg(long)]
        password: String,

        /// Overwrite an existing config file.
        #[arg(long)]
        force: bool,
    },
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "info".into()),
        )
        .init();

    let cli = Cli::parse();

    match cli.command {
        Some(Command::Init { name, config_dir, data_dir, username, password, force }) => {
            let path = init::run(&init::InitOptions {
                name,
                config_dir,
                data_dir,
                username,
                password,
                force,
            })?;
            println!("Config written to {}", path.display());
            Ok(())
        }
        None => {
            let config = cli
                .config
                .ok_or_else(|| anyhow::anyhow!("missing -c <context-name-or-path>"))?;
            serve(&config, &cli.listen).await
        }
    }
}

async fn serve(config_arg: &str, listen: &str) -> anyhow::Result<()> {
    let config_path = ServerConfig::resolve_path(config_arg);
    info!("Loading configuration from {}", config_path.display());
    let server_config = ServerConfig::load(&config_path)?;

    bootstrap::verify_config(&server_config)?;

    let data_dir = PathBuf::from(&server_config.storage.data_dir);
    std::fs::create_dir_all(&data_dir)?;

    let core_config = garage_core::ServiceConfig {
        db_path: server_config.storage.db_path.as_ref().map(PathBuf::from),
        ..garage_core::ServiceConfig::new(&data_dir, listen)
    };

    let kv: Arc<dyn garage_kv::KVStore> = Arc::new(
        garage_kv::RedbStore::open(&core_config.resolve_db_path())
            .map_err(|e| anyhow::anyhow!("failed to open KV store: {}", e))?,
    );

    let service = WarrantyService::new(kv, &server_config.catalog.base_services)
        .map_err(|e| anyhow::anyhow!("failed to initialize warranty service: {}", e))?;
    let warranty_module = WarrantyModule::new(service);
    info!("Warranty module initialized");

    let module_routes = vec![(warranty_module.name(), warranty_module.routes())];

    let app_state = AppState {
        jwt_state: Arc::new(JwtState::from_secret(&server_config.jwt.secret)),
        server_config: Arc::new(server_config),
    };

    let app = routes::build_router(app_state, module_routes);

    let listener = tokio::net::TcpListener::bind(&core_config.listen).await?;
    info!("garaged listening on {}", core_config.listen);
    axum::serve(listener, app).await?;

    Ok(())
}
