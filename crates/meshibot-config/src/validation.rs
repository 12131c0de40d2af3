// SPDX-FileCopyrightText: 2026 Meshibot Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Startup validation with actionable messages.

use crate::model::MeshibotConfig;

/// Validate a loaded configuration for serving.
///
/// Collects every problem instead of stopping at the first.
pub fn validate(config: &MeshibotConfig) -> Result<(), Vec<String>> {
    let mut errors = Vec::new();

    if config.directory.api_key.as_deref().is_none_or(str::is_empty) {
        errors.push(
            "directory.api_key is required (set MESHIBOT_DIRECTORY_API_KEY or [directory] api_key)"
                .to_string(),
        );
    }

    if config.directory.max_result_pages == 0 {
        errors.push("directory.max_result_pages must be at least 1".to_string());
    }

    // Nine shop cards plus the trailing search-status card fills the
    // carousel's ten-card limit.
    if !(1..=9).contains(&config.feed.batch_size) {
        errors.push(format!(
            "feed.batch_size must be between 1 and 9, got {}",
            config.feed.batch_size
        ));
    }

    if config.server.port == 0 {
        errors.push("server.port must be non-zero".to_string());
    }

    if config.notify.reply_url.as_deref().is_none_or(str::is_empty) {
        errors.push(
            "notify.reply_url is required (the endpoint rendered replies are delivered to)"
                .to_string(),
        );
    }

    if config.storage.database_path.is_empty() {
        errors.push("storage.database_path must not be empty".to_string());
    }

    let level = config.agent.log_level.as_str();
    if !["trace", "debug", "info", "warn", "error"].contains(&level) {
        errors.push(format!(
            "agent.log_level must be one of trace/debug/info/warn/error, got {level:?}"
        ));
    }

    if errors.is_empty() { Ok(()) } else { Err(errors) }
}
