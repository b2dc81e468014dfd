use serde::Deserialize;
use std::env;
use std::path::PathBuf;
use std::sync::OnceLock;
use thiserror::Error;

/// Default directory receiving raw uploads before they are classified.
pub const DEFAULT_UPLOAD_FOLDER: &str = "incoming_pdfs";
/// Default base directory holding one subfolder per category.
pub const DEFAULT_CLASSIFIED_FOLDER: &str = "classified_pdfs";
/// Default directory served under `/assets`.
pub const DEFAULT_ASSETS_FOLDER: &str = "assets";
/// Default request body cap for uploads (32 MiB).
pub const DEFAULT_MAX_UPLOAD_BYTES: usize = 32 * 1024 * 1024;
/// Zero-shot model used when the Hugging Face backend is selected without an override.
pub const DEFAULT_HF_CLASSIFIER_MODEL: &str = "MoritzLaurer/DeBERTa-v3-base-mnli";
/// Summarization model used when the Hugging Face backend is selected without an override.
pub const DEFAULT_HF_SUMMARIZER_MODEL: &str = "sshleifer/distilbart-cnn-12-6";
/// Model used when the Ollama backend is selected without an override.
pub const DEFAULT_OLLAMA_MODEL: &str = "llama3.2";

/// Errors encountered while loading configuration from environment variables.
#[derive(Debug, Error)]
pub enum ConfigError {
    /// Environment variable contained a value that could not be parsed.
    #[error("Invalid value for environment variable: {0}")]
    InvalidValue(String),
}

/// Runtime configuration for the document sorter.
#[derive(Debug, Clone, Deserialize)]
pub struct Config {
    /// Optional override for the HTTP server port.
    pub server_port: Option<u16>,
    /// Scratch directory uploads are written to before classification.
    pub upload_folder: PathBuf,
    /// Base directory containing one folder per category.
    pub classified_folder: PathBuf,
    /// Directory served under `/assets`.
    pub assets_folder: PathBuf,
    /// Maximum accepted request body size in bytes.
    pub max_upload_bytes: usize,
    /// What to do when the destination already holds a file with the same name.
    pub duplicate_policy: DuplicatePolicy,
    /// Backend answering zero-shot classification requests.
    pub classifier_provider: InferenceProvider,
    /// Optional model override for the classifier backend.
    pub classifier_model: Option<String>,
    /// Backend answering summarization requests.
    pub summarizer_provider: InferenceProvider,
    /// Optional model override for the summarizer backend.
    pub summarizer_model: Option<String>,
    /// Base URL of the Ollama runtime.
    pub ollama_url: Option<String>,
    /// Base URL of the Hugging Face inference endpoint.
    pub huggingface_api_url: Option<String>,
    /// Bearer token for the Hugging Face inference endpoint.
    pub huggingface_api_token: Option<String>,
}

/// Supported inference backends for the classification and summarization agents.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum InferenceProvider {
    /// Deterministic in-process heuristics for offline use; needs no model or network.
    Local,
    /// Local Ollama runtime.
    Ollama,
    /// Hugging Face Inference API running the pre-trained zero-shot and summarization models.
    #[default]
    HuggingFace,
}

/// Behavior when a classified file would land on an existing file.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DuplicatePolicy {
    /// Replace the existing file, matching a plain filesystem rename.
    #[default]
    Overwrite,
    /// Refuse the move and leave the upload in the incoming folder.
    Reject,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            server_port: None,
            upload_folder: PathBuf::from(DEFAULT_UPLOAD_FOLDER),
            classified_folder: PathBuf::from(DEFAULT_CLASSIFIED_FOLDER),
            assets_folder: PathBuf::from(DEFAULT_ASSETS_FOLDER),
            max_upload_bytes: DEFAULT_MAX_UPLOAD_BYTES,
            duplicate_policy: DuplicatePolicy::default(),
            classifier_provider: InferenceProvider::default(),
            classifier_model: None,
            summarizer_provider: InferenceProvider::default(),
            summarizer_model: None,
            ollama_url: None,
            huggingface_api_url: None,
            huggingface_api_token: None,
        }
    }
}

impl Config {
    /// Load configuration from environment variables, falling back to defaults for anything unset.
    pub fn from_env() -> Result<Self, ConfigError> {
        let defaults = Self::default();
        Ok(Self {
            server_port: parse_optional("SERVER_PORT")?,
            upload_folder: load_env_optional("UPLOAD_FOLDER")
                .map(PathBuf::from)
                .unwrap_or(defaults.upload_folder),
            classified_folder: load_env_optional("CLASSIFIED_FOLDER")
                .map(PathBuf::from)
                .unwrap_or(defaults.classified_folder),
            assets_folder: load_env_optional("ASSETS_FOLDER")
                .map(PathBuf::from)
                .unwrap_or(defaults.assets_folder),
            max_upload_bytes: parse_optional("MAX_UPLOAD_BYTES")?
                .unwrap_or(defaults.max_upload_bytes),
            duplicate_policy: parse_optional("DUPLICATE_POLICY")?
                .unwrap_or(defaults.duplicate_policy),
            classifier_provider: parse_optional("CLASSIFIER_PROVIDER")?
                .unwrap_or(defaults.classifier_provider),
            classifier_model: load_env_optional("CLASSIFIER_MODEL"),
            summarizer_provider: parse_optional("SUMMARIZER_PROVIDER")?
                .unwrap_or(defaults.summarizer_provider),
            summarizer_model: load_env_optional("SUMMARIZER_MODEL"),
            ollama_url: load_env_optional("OLLAMA_URL"),
            huggingface_api_url: load_env_optional("HUGGINGFACE_API_URL"),
            huggingface_api_token: load_env_optional("HUGGINGFACE_API_TOKEN"),
        })
    }
}

fn load_env_optional(key: &str) -> Option<String> {
    env::var(key).ok().filter(|value| !value.trim().is_empty())
}

fn parse_optional<T: std::str::FromStr>(key: &str) -> Result<Option<T>, ConfigError> {
    load_env_optional(key)
        .map(|value| {
            value
                .trim()
                .parse()
                .map_err(|_| ConfigError::InvalidValue(key.to_string()))
        })
        .transpose()
}

impl std::str::FromStr for InferenceProvider {
    type Err = ();

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "local" => Ok(Self::Local),
            "ollama" => Ok(Self::Ollama),
            "huggingface" | "hf" => Ok(Self::HuggingFace),
            _ => Err(()),
        }
    }
}

impl std::str::FromStr for DuplicatePolicy {
    type Err = ();

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "overwrite" => Ok(Self::Overwrite),
            "reject" => Ok(Self::Reject),
            _ => Err(()),
        }
    }
}

/// Global configuration cache populated during process start.
pub static CONFIG: OnceLock<Config> = OnceLock::new();

/// Load configuration from the environment and install it in the global cache.
pub fn init_config() -> Result<&'static Config, ConfigError> {
    dotenvy::dotenv().ok();
    let config = Config::from_env()?;
    tracing::debug!(
        upload_folder = %config.upload_folder.display(),
        classified_folder = %config.classified_folder.display(),
        server_port = ?config.server_port,
        classifier_provider = ?config.classifier_provider,
        summarizer_provider = ?config.summarizer_provider,
        duplicate_policy = ?config.duplicate_policy,
        "Loaded configuration"
    );
    Ok(CONFIG.get_or_init(|| config))
}
