use serde::Deserialize;
use std::fs;
use std::path::Path;

const ENV_CONFIG_PATH: &str = "INTENT_PIPELINE_CONFIG_PATH";
const DEFAULT_CONFIG_PATH: &str = "config.yaml";

const ENV_LLM_BASE_URL: &str = "LLM_BASE_URL";
const ENV_LLM_API_KEY: &str = "LLM_API_KEY";
const ENV_LLM_MODEL: &str = "LLM_MODEL";

const DEFAULT_BASE_URL: &str = "http://127.0.0.1:8000";
const DEFAULT_MODEL: &str = "gpt-4o-mini";

/// Settings for the stock OpenAI-compatible language-model client.
#[derive(Debug, Clone)]
pub struct LlmSettings {
    pub base_url: String,
    pub api_key: Option<String>,
    pub model: String,
}

impl LlmSettings {
    pub fn from_env() -> Self {
        Self {
            base_url: std::env::var(ENV_LLM_BASE_URL)
                .unwrap_or_else(|_| DEFAULT_BASE_URL.to_string()),
            api_key: std::env::var(ENV_LLM_API_KEY).ok(),
            model: std::env::var(ENV_LLM_MODEL).unwrap_or_else(|_| DEFAULT_MODEL.to_string()),
        }
    }
}

/// Tunable generation-stage knobs, loadable from the YAML config file.
#[derive(Debug, Clone, Deserialize)]
pub struct GenerationSettings {
    /// Retrieval results below this confidence are excluded from generation input.
    #[serde(default = "default_min_confidence")]
    pub min_confidence: f64,
    /// Keep at most this many chunks per retrieval result; unset = no truncation.
    #[serde(default)]
    pub top_k: Option<usize>,
    /// Sampling temperature for the final generation call. Contract-bearing
    /// stages always run at temperature 0 regardless of this value.
    #[serde(default = "default_generation_temperature")]
    pub temperature: f32,
}

fn default_min_confidence() -> f64 {
    0.2
}

fn default_generation_temperature() -> f32 {
    0.2
}

impl Default for GenerationSettings {
    fn default() -> Self {
        Self {
            min_confidence: default_min_confidence(),
            top_k: None,
            temperature: default_generation_temperature(),
        }
    }
}

/// YAML configuration file structure
#[derive(Debug, Clone, Default, Deserialize)]
pub struct ConfigFile {
    #[serde(default)]
    pub generation: Option<GenerationSettings>,
}

/// Pipeline configuration, threaded explicitly through constructors.
/// There is no process-wide singleton; callers own their config.
#[derive(Debug, Clone)]
pub struct PipelineConfig {
    pub llm: LlmSettings,
    pub generation: GenerationSettings,
}

impl Default for PipelineConfig {
    fn default() -> Self {
        Self {
            llm: LlmSettings {
                base_url: DEFAULT_BASE_URL.to_string(),
                api_key: None,
                model: DEFAULT_MODEL.to_string(),
            },
            generation: GenerationSettings::default(),
        }
    }
}

impl PipelineConfig {
    /// Load configuration from environment and the optional config file.
    pub fn from_env() -> Self {
        let config_path =
            std::env::var(ENV_CONFIG_PATH).unwrap_or_else(|_| DEFAULT_CONFIG_PATH.to_string());

        let generation = Self::load_config_file(&config_path)
            .and_then(|cf| cf.generation)
            .unwrap_or_default();

        Self {
            llm: LlmSettings::from_env(),
            generation,
        }
    }

    /// Load configuration from a YAML file, falling back to defaults on any problem.
    fn load_config_file(path: &str) -> Option<ConfigFile> {
        let path = Path::new(path);

        if !path.exists() {
            tracing::debug!(path = %path.display(), "Config file not found, using defaults");
            return None;
        }

        match fs::read_to_string(path) {
            Ok(contents) => {
                let contents = contents.trim();
                if contents.is_empty() {
                    tracing::debug!(path = %path.display(), "Config file is empty, using defaults");
                    return Some(ConfigFile::default());
                }

                match serde_yaml::from_str(contents) {
                    Ok(config) => {
                        tracing::info!(path = %path.display(), "Loaded configuration from file");
                        Some(config)
                    }
                    Err(e) => {
                        tracing::warn!(path = %path.display(), error = %e, "Failed to parse config file, using defaults");
                        None
                    }
                }
            }
            Err(e) => {
                tracing::warn!(path = %path.display(), error = %e, "Failed to read config file, using defaults");
                None
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn generation_settings_default_to_documented_values() {
        let settings = GenerationSettings::default();
        assert_eq!(settings.min_confidence, 0.2);
        assert_eq!(settings.top_k, None);
        assert_eq!(settings.temperature, 0.2);
    }

    #[test]
    fn generation_settings_parse_from_yaml() {
        let yaml = "generation:\n  min_confidence: 0.5\n  top_k: 3\n";
        let parsed: ConfigFile = serde_yaml::from_str(yaml).unwrap();
        let generation = parsed.generation.unwrap();
        assert_eq!(generation.min_confidence, 0.5);
        assert_eq!(generation.top_k, Some(3));
        assert_eq!(generation.temperature, 0.2);
    }
}
