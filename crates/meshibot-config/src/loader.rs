// SPDX-FileCopyrightText: 2026 Meshibot Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Configuration loader using Figment for layered config merging.
//!
//! Supports XDG hierarchy: `./meshibot.toml` > `~/.config/meshibot/meshibot.toml`
//! > `/etc/meshibot/meshibot.toml` with environment overrides via the
//! `MESHIBOT_` prefix.

#![allow(clippy::result_large_err)] // figment::Error is external and cannot be boxed without wrapper

use figment::{
    providers::{Env, Format, Serialized, Toml},
    Figment,
};

use crate::model::MeshibotConfig;

/// Load configuration from the standard XDG hierarchy with env overrides.
///
/// Merge order (later overrides earlier):
/// 1. Compiled defaults
/// 2. `/etc/meshibot/meshibot.toml` (system-wide)
/// 3. `~/.config/meshibot/meshibot.toml` (user XDG config)
/// 4. `./meshibot.toml` (local directory)
/// 5. `MESHIBOT_*` environment variables
pub fn load_config() -> Result<MeshibotConfig, figment::Error> {
    Figment::new()
        .merge(Serialized::defaults(MeshibotConfig::default()))
        .merge(Toml::file("/etc/meshibot/meshibot.toml"))
        .merge(Toml::file(
            dirs::config_dir()
                .map(|d| d.join("meshibot/meshibot.toml"))
                .unwrap_or_default(),
        ))
        .merge(Toml::file("meshibot.toml"))
        .merge(env_provider())
        .extract()
}

/// Load configuration from a TOML string only (no file or env lookup).
/// Used for testing and explicit config specification.
pub fn load_config_from_str(toml_content: &str) -> Result<MeshibotConfig, figment::Error> {
    Figment::new()
        .merge(Serialized::defaults(MeshibotConfig::default()))
        .merge(Toml::string(toml_content))
        .extract()
}

/// Environment provider with explicit section-to-dot mapping.
///
/// Uses `Env::map()` rather than `Env::split("_")` so key names that
/// themselves contain underscores survive: `MESHIBOT_DIRECTORY_API_KEY`
/// must map to `directory.api_key`, not `directory.api.key`.
fn env_provider() -> Env {
    Env::prefixed("MESHIBOT_").map(|key| {
        let mapped = key
            .as_str()
            .replacen("agent_", "agent.", 1)
            .replacen("server_", "server.", 1)
            .replacen("storage_", "storage.", 1)
            .replacen("directory_", "directory.", 1)
            .replacen("feed_", "feed.", 1)
            .replacen("notify_", "notify.", 1)
            .replacen("links_", "links.", 1);
        mapped.into()
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use serial_test::serial;

    #[test]
    fn toml_string_overrides_defaults() {
        let config = load_config_from_str(
            r#"
            [server]
            port = 9000

            [directory]
            api_key = "k-123"
            max_result_pages = 5
            "#,
        )
        .unwrap();
        assert_eq!(config.server.port, 9000);
        assert_eq!(config.directory.api_key.as_deref(), Some("k-123"));
        assert_eq!(config.directory.max_result_pages, 5);
        // Untouched sections keep defaults.
        assert_eq!(config.feed.batch_size, 5);
    }

    #[test]
    fn unknown_keys_are_rejected() {
        let result = load_config_from_str(
            r#"
            [server]
            prot = 9000
            "#,
        );
        assert!(result.is_err(), "typo'd key should fail extraction");
    }

    #[test]
    #[serial]
    fn env_var_overrides_underscored_key() {
        // SAFETY: serialized test; no other thread reads the environment.
        unsafe { std::env::set_var("MESHIBOT_DIRECTORY_API_KEY", "env-key") };
        let config = load_config().unwrap();
        assert_eq!(config.directory.api_key.as_deref(), Some("env-key"));
        unsafe { std::env::remove_var("MESHIBOT_DIRECTORY_API_KEY") };
    }
}
