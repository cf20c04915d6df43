// SPDX-FileCopyrightText: 2026 Frontdesk Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Post-deserialization validation for configuration values.
//!
//! Checks the constraints serde cannot express: non-empty paths, a usable
//! bind address, retrieval thresholds in range. Invalid retrieval thresholds
//! are reported here, once at startup, never at query time.

use crate::diagnostic::ConfigError;
use crate::model::{FrontdeskConfig, KnowledgeConfig};

/// Validate a deserialized configuration.
///
/// Collects every failure instead of stopping at the first one.
pub fn validate_config(config: &FrontdeskConfig) -> Result<(), Vec<ConfigError>> {
    let mut errors = Vec::new();

    let host = config.server.host.trim();
    if host.is_empty() {
        errors.push(ConfigError::validation("server.host must not be empty"));
    } else {
        let is_valid_ip = host.parse::<std::net::IpAddr>().is_ok();
        let is_valid_hostname = host
            .chars()
            .all(|c| c.is_alphanumeric() || c == '.' || c == '-');
        if !is_valid_ip && !is_valid_hostname {
            errors.push(ConfigError::validation(format!(
                "server.host `{host}` is not a valid IP address or hostname"
            )));
        }
    }

    if config.server.rate_limit == 0 {
        errors.push(ConfigError::validation("server.rate_limit must be at least 1"));
    }
    if config.server.rate_limit_window_secs == 0 {
        errors.push(ConfigError::validation(
            "server.rate_limit_window_secs must be at least 1",
        ));
    }

    if config.llm.api_url.trim().is_empty() {
        errors.push(ConfigError::validation("llm.api_url must not be empty"));
    }
    if config.llm.model.trim().is_empty() {
        errors.push(ConfigError::validation("llm.model must not be empty"));
    }
    if !(0.0..=2.0).contains(&config.llm.temperature) {
        errors.push(ConfigError::validation(format!(
            "llm.temperature must be between 0.0 and 2.0, got {}",
            config.llm.temperature
        )));
    }
    if config.llm.max_tokens == 0 {
        errors.push(ConfigError::validation("llm.max_tokens must be at least 1"));
    }
    if config.llm.timeout_secs == 0 {
        errors.push(ConfigError::validation("llm.timeout_secs must be at least 1"));
    }

    if config.speech.enabled {
        let has_key = config
            .speech
            .api_key
            .as_deref()
            .is_some_and(|k| !k.trim().is_empty());
        if !has_key {
            errors.push(ConfigError::validation(
                "speech.api_key (or TTS_API_KEY) is required when speech.enabled = true",
            ));
        }
        if config.speech.api_url.trim().is_empty() {
            errors.push(ConfigError::validation("speech.api_url must not be empty"));
        }
        if config.speech.voice_id.trim().is_empty() {
            errors.push(ConfigError::validation("speech.voice_id must not be empty"));
        }
    }

    if config.memory.dir.trim().is_empty() {
        errors.push(ConfigError::validation("memory.dir must not be empty"));
    }
    if config.memory.max_message_length == 0 {
        errors.push(ConfigError::validation(
            "memory.max_message_length must be at least 1",
        ));
    }

    validate_knowledge(&config.knowledge, &mut errors);

    if errors.is_empty() {
        Ok(())
    } else {
        Err(errors)
    }
}

fn validate_knowledge(knowledge: &KnowledgeConfig, errors: &mut Vec<ConfigError>) {
    if knowledge.dir.trim().is_empty() {
        errors.push(ConfigError::validation("knowledge.dir must not be empty"));
    }

    if !knowledge.min_score.is_finite() || knowledge.min_score < 0.0 {
        errors.push(ConfigError::validation(format!(
            "knowledge.min_score must be a non-negative number, got {}",
            knowledge.min_score
        )));
    }

    if knowledge.max_sections == 0 {
        errors.push(ConfigError::validation(
            "knowledge.max_sections must be at least 1",
        ));
    }

    let weights = [
        ("keyword_weight", knowledge.keyword_weight),
        ("title_weight", knowledge.title_weight),
        ("fuzzy_weight", knowledge.fuzzy_weight),
    ];
    let mut all_valid = true;
    for (name, value) in weights {
        if !value.is_finite() || value < 0.0 {
            all_valid = false;
            errors.push(ConfigError::validation(format!(
                "knowledge.{name} must be a non-negative number, got {value}"
            )));
        }
    }
    if all_valid {
        if weights.iter().map(|(_, w)| w).sum::<f64>() <= 0.0 {
            errors.push(ConfigError::validation(
                "knowledge weights must not all be zero",
            ));
        }
        // An exact hit must never score below a near miss.
        if knowledge.fuzzy_weight > knowledge.keyword_weight {
            errors.push(ConfigError::validation(format!(
                "knowledge.fuzzy_weight ({}) must not exceed knowledge.keyword_weight ({})",
                knowledge.fuzzy_weight, knowledge.keyword_weight
            )));
        }
    }

    if !(0.0..=1.0).contains(&knowledge.fuzzy_threshold) {
        errors.push(ConfigError::validation(format!(
            "knowledge.fuzzy_threshold must be between 0.0 and 1.0, got {}",
            knowledge.fuzzy_threshold
        )));
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn has_error(errors: &[ConfigError], needle: &str) -> bool {
        errors
            .iter()
            .any(|e| matches!(e, ConfigError::Validation { message } if message.contains(needle)))
    }

    #[test]
    fn default_config_validates() {
        assert!(validate_config(&FrontdeskConfig::default()).is_ok());
    }

    #[test]
    fn negative_min_score_fails_validation() {
        let mut config = FrontdeskConfig::default();
        config.knowledge.min_score = -0.1;
        let errors = validate_config(&config).unwrap_err();
        assert!(has_error(&errors, "knowledge.min_score"));
    }

    #[test]
    fn nan_min_score_fails_validation() {
        let mut config = FrontdeskConfig::default();
        config.knowledge.min_score = f64::NAN;
        let errors = validate_config(&config).unwrap_err();
        assert!(has_error(&errors, "knowledge.min_score"));
    }

    #[test]
    fn zero_max_sections_fails_validation() {
        let mut config = FrontdeskConfig::default();
        config.knowledge.max_sections = 0;
        let errors = validate_config(&config).unwrap_err();
        assert!(has_error(&errors, "max_sections"));
    }

    #[test]
    fn all_zero_weights_fail_validation() {
        let mut config = FrontdeskConfig::default();
        config.knowledge.keyword_weight = 0.0;
        config.knowledge.title_weight = 0.0;
        config.knowledge.fuzzy_weight = 0.0;
        let errors = validate_config(&config).unwrap_err();
        assert!(has_error(&errors, "must not all be zero"));
    }

    #[test]
    fn negative_weight_is_reported_once() {
        let mut config = FrontdeskConfig::default();
        config.knowledge.fuzzy_weight = -1.0;
        let errors = validate_config(&config).unwrap_err();
        assert_eq!(errors.len(), 1);
        assert!(has_error(&errors, "fuzzy_weight"));
    }

    #[test]
    fn fuzzy_weight_above_keyword_weight_fails() {
        let mut config = FrontdeskConfig::default();
        config.knowledge.keyword_weight = 0.1;
        config.knowledge.fuzzy_weight = 0.5;
        let errors = validate_config(&config).unwrap_err();
        assert!(has_error(&errors, "must not exceed"));
    }

    #[test]
    fn fuzzy_threshold_out_of_range_fails() {
        let mut config = FrontdeskConfig::default();
        config.knowledge.fuzzy_threshold = 1.5;
        let errors = validate_config(&config).unwrap_err();
        assert!(has_error(&errors, "fuzzy_threshold"));
    }

    #[test]
    fn speech_enabled_without_key_fails() {
        let mut config = FrontdeskConfig::default();
        config.speech.enabled = true;
        let errors = validate_config(&config).unwrap_err();
        assert!(has_error(&errors, "speech.api_key"));

        config.speech.api_key = Some("secret".to_string());
        assert!(validate_config(&config).is_ok());
    }

    #[test]
    fn collects_multiple_errors() {
        let mut config = FrontdeskConfig::default();
        config.server.host = String::new();
        config.memory.dir = " ".to_string();
        config.llm.temperature = 3.0;
        let errors = validate_config(&config).unwrap_err();
        assert_eq!(errors.len(), 3);
    }

    #[test]
    fn partial_toml_fills_defaults_and_validates() {
        let toml_str = r#"
[knowledge]
max_sections = 5
"#;
        let config: FrontdeskConfig = toml::from_str(toml_str).unwrap();
        assert_eq!(config.knowledge.max_sections, 5);
        assert_eq!(config.server.port, FrontdeskConfig::default().server.port);
        assert!(validate_config(&config).is_ok());
    }

    #[test]
    fn toml_with_bad_thresholds_is_rejected_after_parsing() {
        let toml_str = r#"
[knowledge]
fuzzy_threshold = 2.0
max_sections = 0
"#;
        let config: FrontdeskConfig = toml::from_str(toml_str).unwrap();
        let errors = validate_config(&config).unwrap_err();
        assert_eq!(errors.len(), 2);
        assert!(has_error(&errors, "fuzzy_threshold"));
        assert!(has_error(&errors, "max_sections"));
    }

    #[test]
    fn unknown_toml_key_fails_deserialization() {
        let result: Result<FrontdeskConfig, _> =
            toml::from_str("[knowledge]\nmax_section = 5\n");
        let err = result.unwrap_err().to_string();
        assert!(err.contains("max_section"), "got: {err}");
    }

    #[test]
    fn invalid_host_fails() {
        let mut config = FrontdeskConfig::default();
        config.server.host = "not a host!".to_string();
        let errors = validate_config(&config).unwrap_err();
        assert!(has_error(&errors, "server.host"));
    }
}
