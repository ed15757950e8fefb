use crate::primitives::prompt::{PromptMatcher, DEFAULT_PROMPT_PATTERN};
use crate::services::repl::tracker::DEFAULT_BELL_HINT;
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};
use std::path::Path;

/// Main configuration structure
#[derive(Debug, Clone, Default, Serialize, Deserialize, JsonSchema)]
pub struct Config {
    #[serde(default)]
    pub repl: ReplConfig,
}

/// REPL session configuration
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
pub struct ReplConfig {
    /// Regex recognising the shell prompt. Uses the built-in node prompt
    /// pattern when unset.
    #[serde(default)]
    pub prompt_pattern: Option<String>,

    /// Text shown in place of a BEL character received from the shell
    #[serde(default = "default_bell_hint")]
    pub bell_hint: String,

    /// Theme key applied to closed output regions
    #[serde(default = "default_output_face")]
    pub output_face: String,

    /// Hold back text at the end of a chunk that may be the start of a
    /// prompt, so prompts split across chunks are never tagged as output
    #[serde(default = "default_true")]
    pub hold_partial_prompts: bool,

    /// Whether completion starts enabled for new sessions
    #[serde(default = "default_true")]
    pub completion_enabled: bool,
}

fn default_bell_hint() -> String {
    DEFAULT_BELL_HINT.to_string()
}

fn default_output_face() -> String {
    "repl.output".to_string()
}

fn default_true() -> bool {
    true
}

impl Default for ReplConfig {
    fn default() -> Self {
        Self {
            prompt_pattern: None,
            bell_hint: default_bell_hint(),
            output_face: default_output_face(),
            hold_partial_prompts: true,
            completion_enabled: true,
        }
    }
}

impl ReplConfig {
    /// Build the prompt matcher for this configuration.
    ///
    /// An invalid custom pattern falls back to the built-in one.
    pub fn prompt_matcher(&self) -> PromptMatcher {
        match &self.prompt_pattern {
            Some(pattern) => PromptMatcher::with_pattern(pattern).unwrap_or_else(|e| {
                tracing::warn!(
                    "Invalid prompt pattern {:?}, using {:?}: {}",
                    pattern,
                    DEFAULT_PROMPT_PATTERN,
                    e
                );
                PromptMatcher::new()
            }),
            None => PromptMatcher::new(),
        }
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        if let Some(pattern) = &self.prompt_pattern {
            if pattern.is_empty() {
                return Err(ConfigError::ValidationError(
                    "prompt_pattern cannot be empty".to_string(),
                ));
            }
            if let Err(e) = PromptMatcher::with_pattern(pattern) {
                return Err(ConfigError::ValidationError(format!(
                    "invalid prompt_pattern: {e}"
                )));
            }
        }

        if self.output_face.is_empty() {
            return Err(ConfigError::ValidationError(
                "output_face cannot be empty".to_string(),
            ));
        }

        Ok(())
    }
}

impl Config {
    /// Load configuration from a JSON file
    pub fn load_from_file<P: AsRef<Path>>(path: P) -> Result<Self, ConfigError> {
        let contents = std::fs::read_to_string(path.as_ref())
            .map_err(|e| ConfigError::IoError(e.to_string()))?;

        let config: Config =
            serde_json::from_str(&contents).map_err(|e| ConfigError::ParseError(e.to_string()))?;

        Ok(config)
    }

    /// Save configuration to a JSON file
    pub fn save_to_file<P: AsRef<Path>>(&self, path: P) -> Result<(), ConfigError> {
        let contents = serde_json::to_string_pretty(self)
            .map_err(|e| ConfigError::SerializeError(e.to_string()))?;

        std::fs::write(path.as_ref(), contents).map_err(|e| ConfigError::IoError(e.to_string()))?;

        Ok(())
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        self.repl.validate()
    }

    /// JSON Schema of the configuration file
    pub fn json_schema() -> schemars::Schema {
        schemars::schema_for!(Config)
    }
}

/// Configuration error types
#[derive(Debug)]
pub enum ConfigError {
    IoError(String),
    ParseError(String),
    SerializeError(String),
    ValidationError(String),
}

impl std::fmt::Display for ConfigError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ConfigError::IoError(msg) => write!(f, "IO error: {msg}"),
            ConfigError::ParseError(msg) => write!(f, "Parse error: {msg}"),
            ConfigError::SerializeError(msg) => write!(f, "Serialize error: {msg}"),
            ConfigError::ValidationError(msg) => write!(f, "Validation error: {msg}"),
        }
    }
}

impl std::error::Error for ConfigError {}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config() {
        let config = Config::default();
        assert_eq!(config.repl.bell_hint, "C-q C-g RET");
        assert_eq!(config.repl.output_face, "repl.output");
        assert!(config.repl.prompt_pattern.is_none());
        assert!(config.repl.hold_partial_prompts);
        assert!(config.repl.completion_enabled);
    }

    #[test]
    fn test_empty_json_uses_defaults() {
        let config: Config = serde_json::from_str("{}").unwrap();
        assert_eq!(config.repl, ReplConfig::default());

        let config: Config = serde_json::from_str(r#"{"repl": {}}"#).unwrap();
        assert_eq!(config.repl, ReplConfig::default());
    }

    #[test]
    fn test_config_validation() {
        let mut config = Config::default();
        assert!(config.validate().is_ok());

        config.repl.prompt_pattern = Some("(unclosed".to_string());
        assert!(matches!(
            config.validate(),
            Err(ConfigError::ValidationError(_))
        ));

        config.repl.prompt_pattern = Some(String::new());
        assert!(config.validate().is_err());

        config.repl.prompt_pattern = None;
        config.repl.output_face = String::new();
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_invalid_pattern_falls_back_to_default() {
        let config = ReplConfig {
            prompt_pattern: Some("(unclosed".to_string()),
            ..Default::default()
        };
        assert_eq!(config.prompt_matcher().as_str(), DEFAULT_PROMPT_PATTERN);
    }

    #[test]
    fn test_custom_pattern_is_used() {
        let config = ReplConfig {
            prompt_pattern: Some(r"iex\([0-9]+\)> ".to_string()),
            ..Default::default()
        };
        assert!(config.prompt_matcher().contains_prompt("iex(1)> "));
    }

    #[test]
    fn test_config_save_load() {
        let temp_dir = tempfile::tempdir().unwrap();
        let config_path = temp_dir.path().join("config.json");

        let mut config = Config::default();
        config.repl.bell_hint = "^G".to_string();
        config.repl.hold_partial_prompts = false;
        config.save_to_file(&config_path).unwrap();

        let loaded = Config::load_from_file(&config_path).unwrap();
        assert_eq!(loaded.repl, config.repl);
    }

    #[test]
    fn test_load_missing_file() {
        let temp_dir = tempfile::tempdir().unwrap();
        let result = Config::load_from_file(temp_dir.path().join("missing.json"));
        assert!(matches!(result, Err(ConfigError::IoError(_))));
    }

    #[test]
    fn test_load_malformed_file() {
        let temp_dir = tempfile::tempdir().unwrap();
        let path = temp_dir.path().join("config.json");
        std::fs::write(&path, "{ not json").unwrap();
        assert!(matches!(
            Config::load_from_file(&path),
            Err(ConfigError::ParseError(_))
        ));
    }

    #[test]
    fn test_schema_lists_repl_fields() {
        let schema = serde_json::to_value(Config::json_schema()).unwrap();
        let text = schema.to_string();
        assert!(text.contains("bell_hint"));
        assert!(text.contains("hold_partial_prompts"));
    }
}
