/*
 *  Copyright 2025 Colliery Software
 *
 *  Licensed under the Apache License, Version 2.0 (the "License");
 *  you may not use this file except in compliance with the License.
 *  You may obtain a copy of the License at
 *
 *      http://www.apache.org/licenses/LICENSE-2.0
 *
 *  Unless required by applicable law or agreed to in writing, software
 *  distributed under the License is distributed on an "AS IS" BASIS,
 *  WITHOUT WARRANTIES OR CONDITIONS OF ANY KIND, either express or implied.
 *  See the License for the specific language governing permissions and
 *  limitations under the License.
 */

//! Server entry point.

use anyhow::Context;
use clap::Parser;
use pinakes::config::CatalogueConfig;
use pinakes_server::config::ServerConfig;
use pinakes_server::state::AppState;
use tracing_subscriber::EnvFilter;

/// HTTP API server for the Pinakes resource catalogue.
#[derive(Debug, Parser)]
#[command(name = "pinakes-server", version, about)]
struct Cli {
    /// Address to bind the HTTP listener to
    #[arg(long, default_value = pinakes_server::config::DEFAULT_BIND)]
    bind: String,

    /// Path to the catalogue TOML configuration
    #[arg(long)]
    config: Option<std::path::PathBuf>,

    /// Emit logs as JSON lines
    #[arg(long)]
    json_logs: bool,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    if cli.json_logs {
        tracing_subscriber::fmt()
            .with_env_filter(filter)
            .json()
            .init();
    } else {
        tracing_subscriber::fmt().with_env_filter(filter).init();
    }

    let catalogue_config = match &cli.config {
        Some(path) => CatalogueConfig::load(path)
            .with_context(|| format!("loading config from {}", path.display()))?,
        None => CatalogueConfig::default(),
    };
    let server_config = ServerConfig {
        bind: cli.bind,
        ..ServerConfig::default()
    };

    let (state, _workers) = AppState::build(catalogue_config);
    let app = pinakes_server::app(state, &server_config);

    let addr = server_config
        .bind_addr()
        .with_context(|| format!("invalid bind address '{}'", server_config.bind))?;
    let listener = tokio::net::TcpListener::bind(addr)
        .await
        .with_context(|| format!("binding {}", addr))?;
    tracing::info!(%addr, "pinakes-server listening");

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await
        .context("server error")?;
    Ok(())
}

async fn shutdown_signal() {
    if let Err(error) = tokio::signal::ctrl_c().await {
        tracing::error!(%error, "failed to install shutdown handler");
        return;
    }
    tracing::info!("shutdown signal received");
}
