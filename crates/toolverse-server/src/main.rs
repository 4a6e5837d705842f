// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Toolverse: entry point. Loads configuration, starts the HTTP service and
// runs until Ctrl-C.

use std::process::ExitCode;

use toolverse_core::ServerConfig;
use toolverse_server::ToolServer;
use tracing::{error, info};
use tracing_subscriber::EnvFilter;

fn init_tracing(default_filter: &str) {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_filter)),
        )
        .init();
}

#[tokio::main]
async fn main() -> ExitCode {
    let config = match ServerConfig::load() {
        Ok(config) => config,
        Err(err) => {
            init_tracing("info");
            error!(error = %err, "invalid configuration");
            return ExitCode::FAILURE;
        }
    };
    init_tracing(&config.log_filter);

    info!(
        version = env!("CARGO_PKG_VERSION"),
        bind = %config.bind_address,
        port = config.port,
        "Toolverse starting"
    );

    let mut server = ToolServer::new(config);
    if let Err(err) = server.start().await {
        error!(error = %err, "failed to start");
        return ExitCode::FAILURE;
    }

    if let Err(err) = tokio::signal::ctrl_c().await {
        error!(error = %err, "cannot listen for Ctrl-C");
    }

    match server.stop().await {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            error!(error = %err, "shutdown failed");
            ExitCode::FAILURE
        }
    }
}
