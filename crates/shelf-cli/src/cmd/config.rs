//! `shelf config` — print effective configuration and resolved paths.

use crate::context::Context;
use crate::output::{pretty_kv, pretty_section, render_mode};
use anyhow::Result;
use serde::Serialize;
use shelf_core::api::query::redact_key;
use shelf_core::config::{ShelfConfig, config_path, log_path};
use std::io::{self, Write};
use std::path::PathBuf;

const REDACTED: &str = "********";

#[derive(Debug, Serialize)]
struct ConfigReport {
    config_path: Option<PathBuf>,
    config_exists: bool,
    db_path: PathBuf,
    log_path: PathBuf,
    output: String,
    effective: ShelfConfig,
}

impl ConfigReport {
    fn from_context(ctx: &Context) -> Self {
        let path = config_path();
        let mut effective = ctx.config.clone();
        if effective.api.api_key.is_some() {
            effective.api.api_key = Some(REDACTED.to_string());
        }
        effective.api.endpoint = redact_key(&effective.api.endpoint);
        effective.api.max_results = effective.api.effective_max_results();
        effective.storage.db_path = Some(ctx.db_path.clone());

        Self {
            config_exists: path.as_deref().is_some_and(std::path::Path::exists),
            config_path: path,
            db_path: ctx.db_path.clone(),
            log_path: log_path(),
            output: format!("{:?}", ctx.output).to_ascii_lowercase(),
            effective,
        }
    }

    fn rows(&self) -> Vec<(&'static str, String)> {
        let api = &self.effective.api;
        vec![
            (
                "config_path",
                self.config_path
                    .as_ref()
                    .map_or_else(String::new, |p| p.display().to_string()),
            ),
            ("db_path", self.db_path.display().to_string()),
            ("log_path", self.log_path.display().to_string()),
            ("output", self.output.clone()),
            ("api.endpoint", api.endpoint.clone()),
            ("api.max_results", api.max_results.to_string()),
            ("api.timeout_secs", api.timeout_secs.to_string()),
            ("api.api_key", api.api_key.clone().unwrap_or_default()),
        ]
    }
}

fn write_text(report: &ConfigReport, w: &mut dyn Write) -> io::Result<()> {
    for (key, value) in report.rows() {
        writeln!(w, "{key}\t{value}")?;
    }
    Ok(())
}

fn write_pretty(report: &ConfigReport, w: &mut dyn Write) -> io::Result<()> {
    pretty_section(w, "Paths")?;
    let config_label = match (&report.config_path, report.config_exists) {
        (Some(path), true) => path.display().to_string(),
        (Some(path), false) => format!("{} (not found, using defaults)", path.display()),
        (None, _) => "(no config directory)".to_string(),
    };
    pretty_kv(w, "config", config_label)?;
    pretty_kv(w, "catalog", report.db_path.display().to_string())?;
    pretty_kv(w, "log", report.log_path.display().to_string())?;
    pretty_kv(w, "output", &report.output)?;
    writeln!(w)?;

    pretty_section(w, "Effective config")?;
    let rendered = toml::to_string_pretty(&report.effective).map_err(io::Error::other)?;
    write!(w, "{rendered}")
}

/// Print the effective configuration.
///
/// # Errors
///
/// Returns an error if writing to stdout fails.
pub fn run_config(ctx: &Context) -> Result<()> {
    let report = ConfigReport::from_context(ctx);
    render_mode(ctx.output, &report, write_text, write_pretty)
}
