//! gorest-proxy daemon
//!
//! Local JSON front for the GoREST user-management API using an axum HTTP
//! server and the retrying `gorest-client`.

use std::path::PathBuf;
use std::sync::Arc;

use clap::Parser;
use color_eyre::Result;
use eyre::WrapErr;

mod api;
mod config;
mod factory;
mod router;
mod shutdown;
mod state;
mod telemetry;

#[cfg(test)]
mod test_support;

use crate::config::{CONFIG_ENV, Config};
use crate::state::AppState;

#[derive(Parser)]
#[command(name = "gorest-proxy")]
#[command(about = "Proxy for the GoREST user-management API", long_about = None)]
struct Args {
    /// Path to the configuration file
    #[arg(short, long, env = CONFIG_ENV)]
    config: Option<PathBuf>,

    /// Address to listen on, overriding the configuration
    #[arg(short, long)]
    bind: Option<String>,

    /// Log level, overriding the configuration
    #[arg(long)]
    log_level: Option<String>,
}

#[tokio::main]
async fn main() -> Result<()> {
    color_eyre::install()?;
    let args = Args::parse();

    let mut config = match &args.config {
        Some(path) => Config::load(path)?,
        None => Config::load_default()?,
    };
    config.apply_env();
    if let Some(bind) = args.bind {
        config.server.bind = bind;
    }
    if let Some(log_level) = args.log_level {
        config.server.log_level = log_level;
    }

    telemetry::init_tracing(&config.server)?;

    let directory = factory::build_directory(&config)?;
    let bind = config.server.bind.clone();
    let state = Arc::new(AppState::new(directory, config));
    let app = router::create_router(state);

    let listener = tokio::net::TcpListener::bind(&bind)
        .await
        .wrap_err_with(|| format!("failed to bind {bind}"))?;
    tracing::info!(%bind, "gorest-proxy listening");

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown::shutdown_signal())
        .await
        .wrap_err("server error")?;

    tracing::info!("gorest-proxy stopped");
    Ok(())
}
