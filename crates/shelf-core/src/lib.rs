//! shelf-core library.
//!
//! # Conventions
//!
//! - **Errors**: classified failures are [`error::ShelfError`]; plumbing that
//!   only needs context uses `anyhow::Result`.
//! - **Logging**: use `tracing` macros (`info!`, `warn!`, `error!`, `debug!`, `trace!`).

pub mod api;
pub mod config;
pub mod db;
pub mod error;
pub mod isbn;
pub mod model;

pub use error::{ErrorCode, ShelfError};
