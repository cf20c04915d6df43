// SPDX-FileCopyrightText: 2026 Frontdesk Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Configuration loader using Figment for layered config merging.
//!
//! Supports XDG hierarchy: `./frontdesk.toml` > `~/.config/frontdesk/frontdesk.toml`
//! > `/etc/frontdesk/frontdesk.toml`, with environment variable overrides via
//! the `FRONTDESK_` prefix and the legacy `OPENROUTER_API_KEY` / `TTS_API_KEY`
//! variables.

#![allow(clippy::result_large_err)] // figment::Error is external and cannot be boxed without wrapper

use std::path::{Path, PathBuf};

use figment::{
    providers::{Env, Format, Serialized, Toml},
    Figment,
};

use crate::model::FrontdeskConfig;

/// System-wide config file.
pub const SYSTEM_CONFIG_PATH: &str = "/etc/frontdesk/frontdesk.toml";

/// Config file in the working directory.
pub const LOCAL_CONFIG_PATH: &str = "frontdesk.toml";

/// Top-level sections recognized in `FRONTDESK_<SECTION>_<KEY>` variables.
const ENV_SECTIONS: &[&str] = &["server", "logging", "llm", "speech", "memory", "knowledge"];

/// Path of the per-user config file, if a config directory exists.
pub fn user_config_path() -> Option<PathBuf> {
    dirs::config_dir().map(|d| d.join("frontdesk").join("frontdesk.toml"))
}

/// Load configuration from the standard XDG hierarchy with env var overrides.
///
/// Merge order (later overrides earlier):
/// 1. Compiled defaults
/// 2. `/etc/frontdesk/frontdesk.toml`
/// 3. `~/.config/frontdesk/frontdesk.toml`
/// 4. `./frontdesk.toml`
/// 5. `OPENROUTER_API_KEY`, `TTS_API_KEY`
/// 6. `FRONTDESK_*` environment variables
pub fn load_config() -> Result<FrontdeskConfig, figment::Error> {
    build_figment().extract()
}

/// Load configuration from a TOML string only (no files, no env).
pub fn load_config_from_str(toml_content: &str) -> Result<FrontdeskConfig, figment::Error> {
    Figment::new()
        .merge(Serialized::defaults(FrontdeskConfig::default()))
        .merge(Toml::string(toml_content))
        .extract()
}

/// Load configuration from an explicit file path with env var overrides.
pub fn load_config_from_path(path: &Path) -> Result<FrontdeskConfig, figment::Error> {
    tracing::debug!(path = %path.display(), "loading config from explicit path");
    Figment::new()
        .merge(Serialized::defaults(FrontdeskConfig::default()))
        .merge(Toml::file(path))
        .merge(legacy_env_provider())
        .merge(env_provider())
        .extract()
}

/// Build the Figment used for the standard hierarchy (exposed for diagnostics).
pub fn build_figment() -> Figment {
    Figment::new()
        .merge(Serialized::defaults(FrontdeskConfig::default()))
        .merge(Toml::file(SYSTEM_CONFIG_PATH))
        .merge(Toml::file(user_config_path().unwrap_or_default()))
        .merge(Toml::file(LOCAL_CONFIG_PATH))
        .merge(legacy_env_provider())
        .merge(env_provider())
}

/// Variables the original deployment documented, mapped onto their keys.
fn legacy_env_provider() -> Figment {
    Figment::new()
        .merge(
            Env::raw()
                .only(&["OPENROUTER_API_KEY"])
                .map(|_| "llm.api_key".into()),
        )
        .merge(
            Env::raw()
                .only(&["TTS_API_KEY"])
                .map(|_| "speech.api_key".into()),
        )
}

/// Create the `FRONTDESK_` provider using explicit `map()` for section-to-dot mapping.
///
/// Uses `Env::map()` rather than `Env::split("_")` because key names contain
/// underscores: `FRONTDESK_LLM_API_KEY` must map to `llm.api_key`, not
/// `llm.api.key`.
fn env_provider() -> Env {
    Env::prefixed("FRONTDESK_").map(|key| map_env_key(key.as_str()).into())
}

/// Map a lowercased, prefix-stripped env key to its dotted config path.
///
/// Keys that do not start with a known section are returned unchanged so
/// `deny_unknown_fields` reports them.
pub fn map_env_key(key: &str) -> String {
    for section in ENV_SECTIONS {
        if let Some(rest) = key
            .strip_prefix(section)
            .and_then(|r| r.strip_prefix('_'))
        {
            return format!("{section}.{rest}");
        }
    }
    key.to_string()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn maps_section_prefixed_keys() {
        assert_eq!(map_env_key("llm_api_key"), "llm.api_key");
        assert_eq!(map_env_key("knowledge_min_score"), "knowledge.min_score");
        assert_eq!(map_env_key("server_port"), "server.port");
    }

    #[test]
    fn leaves_unknown_sections_alone() {
        assert_eq!(map_env_key("bogus_key"), "bogus_key");
        // `llmx_` must not be mistaken for the `llm` section.
        assert_eq!(map_env_key("llmx_model"), "llmx_model");
    }
}
