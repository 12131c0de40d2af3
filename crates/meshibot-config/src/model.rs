// SPDX-FileCopyrightText: 2026 Meshibot Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Configuration model structs.
//!
//! All structs use `#[serde(deny_unknown_fields)]` so a typo in a config
//! key fails at startup instead of silently using a default.

use serde::{Deserialize, Serialize};

/// Top-level Meshibot configuration.
#[derive(Debug, Clone, Default, Deserialize, Serialize)]
#[serde(deny_unknown_fields)]
pub struct MeshibotConfig {
    /// Process identity and logging.
    #[serde(default)]
    pub agent: AgentConfig,

    /// Inbound HTTP server settings.
    #[serde(default)]
    pub server: ServerConfig,

    /// SQLite storage settings.
    #[serde(default)]
    pub storage: StorageConfig,

    /// External restaurant directory settings.
    #[serde(default)]
    pub directory: DirectoryConfig,

    /// Recommendation feed settings.
    #[serde(default)]
    pub feed: FeedConfig,

    /// Notification sink settings.
    #[serde(default)]
    pub notify: NotifyConfig,

    /// User-facing link settings (search form, share target).
    #[serde(default)]
    pub links: LinksConfig,
}

/// Process identity and logging configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(deny_unknown_fields)]
pub struct AgentConfig {
    /// Display name of the bot.
    #[serde(default = "default_agent_name")]
    pub name: String,

    /// Logging level (trace, debug, info, warn, error).
    #[serde(default = "default_log_level")]
    pub log_level: String,
}

impl Default for AgentConfig {
    fn default() -> Self {
        Self {
            name: default_agent_name(),
            log_level: default_log_level(),
        }
    }
}

/// Inbound HTTP server configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(deny_unknown_fields)]
pub struct ServerConfig {
    /// Host address to bind.
    #[serde(default = "default_host")]
    pub host: String,

    /// Port to bind.
    #[serde(default = "default_port")]
    pub port: u16,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: default_host(),
            port: default_port(),
        }
    }
}

/// SQLite storage configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(deny_unknown_fields)]
pub struct StorageConfig {
    /// Path to the SQLite database file.
    #[serde(default = "default_database_path")]
    pub database_path: String,
}

impl Default for StorageConfig {
    fn default() -> Self {
        Self {
            database_path: default_database_path(),
        }
    }
}

/// External restaurant directory configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(deny_unknown_fields)]
pub struct DirectoryConfig {
    /// Directory API key. `None` fails validation at serve time.
    #[serde(default)]
    pub api_key: Option<String>,

    /// Region filter code appended to every search ("SA11" = Tokyo).
    #[serde(default = "default_region")]
    pub region: String,

    /// Maximum number of result pages to drain per search.
    #[serde(default = "default_max_result_pages")]
    pub max_result_pages: u32,

    /// How many budget brackets below the user's price the search floor
    /// extends. 0 searches only the bracket containing the price.
    #[serde(default = "default_budget_grade_range")]
    pub budget_grade_range: u32,
}

impl Default for DirectoryConfig {
    fn default() -> Self {
        Self {
            api_key: None,
            region: default_region(),
            max_result_pages: default_max_result_pages(),
            budget_grade_range: default_budget_grade_range(),
        }
    }
}

/// Recommendation feed configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(deny_unknown_fields)]
pub struct FeedConfig {
    /// Shops introduced per reply. The carousel holds at most ten cards
    /// including the trailing search-status card.
    #[serde(default = "default_batch_size")]
    pub batch_size: u32,
}

impl Default for FeedConfig {
    fn default() -> Self {
        Self {
            batch_size: default_batch_size(),
        }
    }
}

/// Notification sink configuration.
#[derive(Debug, Clone, Default, Deserialize, Serialize)]
#[serde(deny_unknown_fields)]
pub struct NotifyConfig {
    /// Endpoint the rendered reply is POSTed to, together with the reply
    /// address from the inbound event. `None` fails validation at serve
    /// time.
    #[serde(default)]
    pub reply_url: Option<String>,
}

/// User-facing link configuration.
#[derive(Debug, Clone, Default, Deserialize, Serialize)]
#[serde(deny_unknown_fields)]
pub struct LinksConfig {
    /// Search-condition form shown from carousel action buttons.
    #[serde(default)]
    pub search_form_url: Option<String>,

    /// Base URL for the share action; `?shop_id=` is appended.
    #[serde(default)]
    pub share_base_url: Option<String>,

    /// Thumbnail shown on status/fallback cards.
    #[serde(default = "default_status_image_url")]
    pub status_image_url: String,
}

fn default_agent_name() -> String {
    "meshibot".to_string()
}

fn default_log_level() -> String {
    "info".to_string()
}

fn default_host() -> String {
    "127.0.0.1".to_string()
}

fn default_port() -> u16 {
    8100
}

fn default_database_path() -> String {
    "meshibot.db".to_string()
}

fn default_region() -> String {
    "SA11".to_string()
}

fn default_max_result_pages() -> u32 {
    3
}

fn default_budget_grade_range() -> u32 {
    2
}

fn default_batch_size() -> u32 {
    5
}

fn default_status_image_url() -> String {
    "https://meshibot.example.com/static/status-card.png".to_string()
}
