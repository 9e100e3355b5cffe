//! Per-invocation state shared by every subcommand.

use crate::output::{OutputMode, resolve_output_mode};
use anyhow::Result;
use rusqlite::Connection;
use shelf_core::api::BooksClient;
use shelf_core::config::{ShelfConfig, load_config, resolve_db_path};
use shelf_core::db;
use std::path::{Path, PathBuf};

/// Effective config, resolved catalog path, and output mode.
#[derive(Debug, Clone)]
pub struct Context {
    pub config: ShelfConfig,
    pub db_path: PathBuf,
    pub output: OutputMode,
}

impl Context {
    /// Load config and resolve paths from global flags.
    ///
    /// # Errors
    ///
    /// Returns an error if the config file exists but cannot be parsed.
    pub fn load(db_flag: Option<&Path>, format: Option<OutputMode>, json: bool) -> Result<Self> {
        let config = load_config()?;
        let db_path = resolve_db_path(db_flag, &config);
        let output = resolve_output_mode(format, json, config.output.as_deref());
        tracing::debug!(db = %db_path.display(), ?output, "context resolved");
        Ok(Self {
            config,
            db_path,
            output,
        })
    }

    /// Open the catalog, creating and migrating it on first use.
    ///
    /// # Errors
    ///
    /// Returns an error if the database cannot be opened or migrated.
    pub fn open_catalog(&self) -> Result<Connection> {
        db::open_catalog(&self.db_path)
    }

    /// HTTP client configured from the `[api]` section.
    pub fn client(&self) -> BooksClient {
        BooksClient::new(self.config.api.clone())
    }
}
