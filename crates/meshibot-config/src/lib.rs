// SPDX-FileCopyrightText: 2026 Meshibot Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Layered configuration for Meshibot.
//!
//! TOML files merge in XDG order with `MESHIBOT_*` environment overrides;
//! a validation pass turns structural mistakes into actionable messages
//! before the server starts.

pub mod loader;
pub mod model;
pub mod validation;

pub use loader::{load_config, load_config_from_str};
pub use model::MeshibotConfig;
pub use validation::validate;

/// Load configuration from the standard hierarchy and validate it.
///
/// Returns all validation messages at once rather than failing on the
/// first, so a misconfigured deployment is fixable in one pass.
pub fn load_and_validate() -> Result<MeshibotConfig, Vec<String>> {
    let config = load_config().map_err(|e| vec![format!("config parse error: {e}")])?;
    validate(&config)?;
    Ok(config)
}

/// Print validation errors to stderr, one per line.
pub fn render_errors(errors: &[String]) {
    for error in errors {
        eprintln!("error: {error}");
    }
}
