// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// HTTP listener lifecycle.
//
// `ToolServer` binds the configured address, serves the router on a Tokio
// task and shuts down gracefully when `stop` is called: the listener stops
// accepting, requests already in progress run to completion.

use std::net::SocketAddr;
use std::sync::Arc;
use std::sync::atomic::Ordering;

use thiserror::Error;
use tokio::net::TcpListener;
use tokio::sync::Notify;
use tokio::task::JoinHandle;
use toolverse_core::ServerConfig;
use toolverse_core::error::ToolverseError;
use tracing::{debug, error, info};

use crate::routes::{AppState, router};

#[derive(Debug, Error)]
pub enum ServerError {
    #[error("cannot bind {addr}: {source}")]
    Bind {
        addr: SocketAddr,
        #[source]
        source: std::io::Error,
    },

    #[error(transparent)]
    Config(#[from] ToolverseError),

    #[error("server task failed: {0}")]
    Join(#[from] tokio::task::JoinError),

    #[error("server I/O error: {0}")]
    Io(#[from] std::io::Error),
}

/// Lifecycle state of a [`ToolServer`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ServerStatus {
    Stopped,
    Running,
}

pub struct ToolServer {
    config: ServerConfig,
    state: AppState,
    status: ServerStatus,
    /// Signals the serve task to drain and exit.
    shutdown_signal: Arc<Notify>,
    task_handle: Option<JoinHandle<std::io::Result<()>>>,
    local_addr: Option<SocketAddr>,
}

impl ToolServer {
    /// A server in `Stopped` state. Call [`ToolServer::start`] to listen.
    pub fn new(config: ServerConfig) -> Self {
        Self {
            state: AppState::new(config.clone()),
            config,
            status: ServerStatus::Stopped,
            shutdown_signal: Arc::new(Notify::new()),
            task_handle: None,
            local_addr: None,
        }
    }

    pub fn status(&self) -> ServerStatus {
        self.status
    }

    /// The bound address once running. Differs from the configured one when
    /// port 0 was requested.
    pub fn local_addr(&self) -> Option<SocketAddr> {
        self.local_addr
    }

    /// Requests currently being handled.
    pub fn active_requests(&self) -> u32 {
        self.state.active_requests.load(Ordering::Relaxed)
    }

    /// Bind the listener and start serving in the background.
    ///
    /// # Errors
    ///
    /// Returns [`ServerError::Config`] if the bind address is not an IP
    /// address and [`ServerError::Bind`] if it cannot be bound.
    pub async fn start(&mut self) -> Result<SocketAddr, ServerError> {
        if self.status == ServerStatus::Running
            && let Some(addr) = self.local_addr
        {
            debug!(%addr, "server already running");
            return Ok(addr);
        }

        let addr = self.config.socket_addr()?;
        let listener = TcpListener::bind(addr)
            .await
            .map_err(|source| ServerError::Bind { addr, source })?;
        let local_addr = listener.local_addr()?;

        let app = router(self.state.clone());
        let shutdown = Arc::clone(&self.shutdown_signal);
        let handle = tokio::spawn(async move {
            axum::serve(listener, app)
                .with_graceful_shutdown(async move { shutdown.notified().await })
                .await
        });

        info!(%local_addr, "Toolverse listening");
        self.task_handle = Some(handle);
        self.local_addr = Some(local_addr);
        self.status = ServerStatus::Running;
        Ok(local_addr)
    }

    /// Stop accepting connections and wait for in-flight requests.
    pub async fn stop(&mut self) -> Result<(), ServerError> {
        if self.status != ServerStatus::Running {
            return Ok(());
        }

        info!(
            active_requests = self.active_requests(),
            "stopping Toolverse"
        );
        self.shutdown_signal.notify_one();

        if let Some(handle) = self.task_handle.take()
            && let Err(err) = handle.await?
        {
            error!(error = %err, "server exited with an error");
            return Err(err.into());
        }

        self.status = ServerStatus::Stopped;
        self.local_addr = None;
        info!("Toolverse stopped");
        Ok(())
    }
}
