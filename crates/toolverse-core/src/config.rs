// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Service configuration.

use std::io::ErrorKind;
use std::net::{IpAddr, SocketAddr};
use std::path::Path;

use serde::{Deserialize, Serialize};
use tracing::{debug, info};

use crate::error::{Result, ToolverseError};

/// Environment variable naming a JSON configuration file.
pub const CONFIG_ENV: &str = "TOOLVERSE_CONFIG";
/// Environment override for [`ServerConfig::port`].
pub const PORT_ENV: &str = "TOOLVERSE_PORT";
/// Environment override for [`ServerConfig::bind_address`].
pub const BIND_ENV: &str = "TOOLVERSE_BIND";

/// Settings for the HTTP service and the tools it hosts.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ServerConfig {
    /// Interface to listen on.
    pub bind_address: String,
    /// TCP port (default 3000).
    pub port: u16,
    /// Largest request body accepted before answering 413.
    pub max_body_bytes: usize,
    /// Compression quality used when a request omits `quality`.
    pub default_quality: u8,
    /// JPEG quality for the HEIC conversion endpoint.
    pub heic_jpeg_quality: u8,
    /// Scale factor for page thumbnails (1.0 = 72 dpi).
    pub thumbnail_scale: f32,
    /// Scale factor for the PDF-to-image tool.
    pub page_image_scale: f32,
    /// `tracing` filter used when `RUST_LOG` is not set.
    pub log_filter: String,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            bind_address: "127.0.0.1".into(),
            port: 3000,
            max_body_bytes: 64 * 1024 * 1024,
            default_quality: 80,
            heic_jpeg_quality: 90,
            thumbnail_scale: 0.5,
            page_image_scale: 2.0,
            log_filter: "info".into(),
        }
    }
}

impl ServerConfig {
    /// Read a JSON config file. Missing keys fall back to defaults.
    pub fn from_file(path: &Path) -> Result<Self> {
        let data = std::fs::read_to_string(path)?;
        let config: Self = serde_json::from_str(&data)?;
        config.validate()?;
        debug!(path = %path.display(), "configuration file loaded");
        Ok(config)
    }

    /// Resolve the effective configuration: the file named by
    /// `TOOLVERSE_CONFIG` (if set), then environment overrides.
    pub fn load() -> Result<Self> {
        let path = std::env::var(CONFIG_ENV).ok();
        Self::load_from(
            path.as_deref().map(Path::new),
            std::env::var(PORT_ENV).ok().as_deref(),
            std::env::var(BIND_ENV).ok().as_deref(),
        )
    }

    /// [`ServerConfig::load`] with its inputs spelled out. A config file
    /// that does not exist yields the defaults; one that exists but does not
    /// parse is an error.
    pub fn load_from(path: Option<&Path>, port: Option<&str>, bind: Option<&str>) -> Result<Self> {
        let mut config = match path {
            Some(path) => match Self::from_file(path) {
                Ok(config) => config,
                Err(ToolverseError::Io(err)) if err.kind() == ErrorKind::NotFound => {
                    debug!(path = %path.display(), "configuration file not found, using defaults");
                    Self::default()
                }
                Err(err) => return Err(err),
            },
            None => Self::default(),
        };
        config.apply_overrides(port, bind)?;
        info!(
            bind = %config.bind_address,
            port = config.port,
            max_body_bytes = config.max_body_bytes,
            "configuration resolved"
        );
        Ok(config)
    }

    /// Apply `TOOLVERSE_PORT` / `TOOLVERSE_BIND` style overrides.
    pub fn apply_overrides(&mut self, port: Option<&str>, bind: Option<&str>) -> Result<()> {
        if let Some(port) = port {
            self.port = port
                .trim()
                .parse()
                .map_err(|_| ToolverseError::Config(format!("invalid port {port:?}")))?;
        }
        if let Some(bind) = bind {
            self.bind_address = bind.trim().to_string();
        }
        self.validate()
    }

    /// Listener address. `bind_address` must be an IPv4 or IPv6 literal.
    pub fn socket_addr(&self) -> Result<SocketAddr> {
        let ip: IpAddr = self.bind_address.trim().parse().map_err(|_| {
            ToolverseError::Config(format!(
                "bind address {:?} is not an IP address",
                self.bind_address
            ))
        })?;
        Ok(SocketAddr::new(ip, self.port))
    }

    fn validate(&self) -> Result<()> {
        self.socket_addr()?;
        if self.max_body_bytes == 0 {
            return Err(ToolverseError::Config("max_body_bytes must be positive".into()));
        }
        if !(1..=100).contains(&self.default_quality) || !(1..=100).contains(&self.heic_jpeg_quality) {
            return Err(ToolverseError::Config("quality values must be within 1..=100".into()));
        }
        if !(self.thumbnail_scale > 0.0) || !(self.page_image_scale > 0.0) {
            return Err(ToolverseError::Config("render scales must be positive".into()));
        }
        Ok(())
    }
}
