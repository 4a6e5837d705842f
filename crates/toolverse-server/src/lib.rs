// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// toolverse-server: HTTP front for the Toolverse tools. Uploads arrive as
// multipart forms or JSON, results leave as attachments or JSON.

pub mod error;
pub mod form;
pub mod routes;
pub mod server;

pub use error::ApiError;
pub use routes::{AppState, router};
pub use server::{ServerError, ServerStatus, ToolServer};
