// scour/src/commands/mod.rs
//! Command implementations for the scour CLI.

use anyhow::Result;
use std::path::PathBuf;

use scour_core::{merge_catalogs, CatalogConfig};

pub mod clean;
pub mod scan;

/// No findings, nothing wrong.
pub const EXIT_NO_FINDINGS: i32 = 0;
/// The scan reported at least one finding.
pub const EXIT_FINDINGS: i32 = 1;
/// An internal error, including per-unit scan failures.
pub const EXIT_ERROR: i32 = 2;

/// Builds the effective catalog: defaults, optional user overlay, then
/// enable/disable filtering.
pub(crate) fn load_catalog(
    config_path: &Option<PathBuf>,
    enable: &[String],
    disable: &[String],
) -> Result<CatalogConfig> {
    let defaults = CatalogConfig::load_default()?;
    let user = match config_path {
        Some(path) => Some(CatalogConfig::load_from_file(path)?),
        None => None,
    };
    let mut merged = merge_catalogs(defaults, user);
    merged.set_active_rules(enable, disable);
    Ok(merged)
}
