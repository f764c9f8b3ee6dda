//! Configuration loading, validation, and management for rxnrag.
//!
//! Loads configuration from `~/.rxnrag/config.toml` with environment
//! variable overrides. Validates all settings at startup.

use rxnrag_core::{DevicePlacement, Direction, PromptVariant};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

/// The root configuration structure.
///
/// Maps directly to `~/.rxnrag/config.toml`.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct AppConfig {
    /// Vocabulary and tokenizer flavour
    #[serde(default)]
    pub tokenizer: TokenizerConfig,

    /// Embedding model and placement
    #[serde(default)]
    pub embedder: EmbedderConfig,

    /// Record store and vector index
    #[serde(default)]
    pub retriever: RetrieverConfig,

    /// Prompt template selection
    #[serde(default)]
    pub prompt: PromptConfig,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TokenizerKind {
    /// Wraps sequences in begin/end markers.
    Chemformer,
    /// Plain vocabulary lookup.
    Plain,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TokenizerConfig {
    #[serde(default = "default_tokenizer_kind")]
    pub kind: TokenizerKind,

    /// Chemformer-style JSON vocabulary, or a token list per `vocab_format`
    #[serde(default = "default_vocab_path")]
    pub vocab_path: PathBuf,

    #[serde(default)]
    pub vocab_format: VocabFormat,
}

/// How `vocab_path` is laid out.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum VocabFormat {
    /// `{"vocabulary": [...], "properties": {"special_tokens": {...}}}`
    #[default]
    Json,
    /// One token per line, line number = id, default special tokens.
    TokenList,
}

fn default_tokenizer_kind() -> TokenizerKind {
    TokenizerKind::Chemformer
}
fn default_vocab_path() -> PathBuf {
    AppConfig::data_dir().join("vocab.json")
}

impl Default for TokenizerConfig {
    fn default() -> Self {
        Self {
            kind: default_tokenizer_kind(),
            vocab_path: default_vocab_path(),
            vocab_format: VocabFormat::Json,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EmbedderConfig {
    /// Embedding model weights (`.safetensors`)
    #[serde(default = "default_model_path")]
    pub model_path: PathBuf,

    /// `default`, `cpu`, `cuda:N` or `metal:N`
    #[serde(default)]
    pub device: DevicePlacement,

    /// Truncate token sequences to this many positions (unset = no truncation)
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub max_seq_len: Option<usize>,
}

fn default_model_path() -> PathBuf {
    AppConfig::data_dir().join("embedder.safetensors")
}

impl Default for EmbedderConfig {
    fn default() -> Self {
        Self {
            model_path: default_model_path(),
            device: DevicePlacement::Default,
            max_seq_len: None,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RecordFormat {
    /// One JSON object per line.
    Jsonl,
    /// Recognized, but the retriever rejects it as not implemented.
    Csv,
    Parquet,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RetrieverConfig {
    /// Record store, row i pairs with embedding row i
    #[serde(default = "default_data_path")]
    pub data_path: PathBuf,

    #[serde(default = "default_record_format")]
    pub record_format: RecordFormat,

    /// 2-D `.npy` embedding matrix
    #[serde(default = "default_embeddings_path")]
    pub embeddings_path: PathBuf,

    /// Prebuilt index file; when set the index is loaded instead of built
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub index_path: Option<PathBuf>,

    /// HNSW graph degree (neighbors per node)
    #[serde(default = "default_connectivity")]
    pub connectivity: usize,

    /// Candidate list size while inserting
    #[serde(default = "default_expansion_add")]
    pub expansion_add: usize,

    /// Candidate list size while searching
    #[serde(default = "default_expansion_search")]
    pub expansion_search: usize,

    /// Neighbors to retrieve per query
    #[serde(default = "default_top_k")]
    pub top_k: usize,
}

fn default_data_path() -> PathBuf {
    AppConfig::data_dir().join("reactions.jsonl")
}
fn default_record_format() -> RecordFormat {
    RecordFormat::Jsonl
}
fn default_embeddings_path() -> PathBuf {
    AppConfig::data_dir().join("embeddings.npy")
}
fn default_connectivity() -> usize {
    32
}
fn default_expansion_add() -> usize {
    40
}
fn default_expansion_search() -> usize {
    16
}
fn default_top_k() -> usize {
    5
}

impl Default for RetrieverConfig {
    fn default() -> Self {
        Self {
            data_path: default_data_path(),
            record_format: default_record_format(),
            embeddings_path: default_embeddings_path(),
            index_path: None,
            connectivity: default_connectivity(),
            expansion_add: default_expansion_add(),
            expansion_search: default_expansion_search(),
            top_k: default_top_k(),
        }
    }
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct PromptConfig {
    #[serde(default)]
    pub variant: PromptVariant,

    #[serde(default)]
    pub direction: Direction,
}

impl AppConfig {
    /// Load configuration from the default path (~/.rxnrag/config.toml).
    ///
    /// Environment variables override file values:
    /// - `RXNRAG_VOCAB`, `RXNRAG_MODEL`, `RXNRAG_DEVICE`
    /// - `RXNRAG_DATA`, `RXNRAG_EMBEDDINGS`, `RXNRAG_INDEX`
    pub fn load() -> Result<Self, ConfigError> {
        Self::load_with_env(&Self::config_path())
    }

    /// Like [`AppConfig::load`], but reading the file at `path`.
    pub fn load_with_env(path: &Path) -> Result<Self, ConfigError> {
        let mut config = Self::load_from(path)?;
        config.apply_env_overrides(|key| std::env::var(key).ok())?;
        config.validate()?;
        Ok(config)
    }

    /// Load configuration from a specific file path.
    pub fn load_from(path: &Path) -> Result<Self, ConfigError> {
        if !path.exists() {
            tracing::info!("No config file found at {}, using defaults", path.display());
            return Ok(Self::default());
        }

        let content = std::fs::read_to_string(path).map_err(|e| ConfigError::ReadError {
            path: path.to_path_buf(),
            reason: e.to_string(),
        })?;

        let config: Self = toml::from_str(&content).map_err(|e| ConfigError::ParseError {
            path: path.to_path_buf(),
            reason: e.to_string(),
        })?;

        config.validate()?;
        Ok(config)
    }

    /// Apply overrides from a variable lookup (the process env in production).
    fn apply_env_overrides(
        &mut self,
        var: impl Fn(&str) -> Option<String>,
    ) -> Result<(), ConfigError> {
        if let Some(path) = var("RXNRAG_VOCAB") {
            self.tokenizer.vocab_path = path.into();
        }
        if let Some(path) = var("RXNRAG_MODEL") {
            self.embedder.model_path = path.into();
        }
        if let Some(device) = var("RXNRAG_DEVICE") {
            self.embedder.device = device
                .parse()
                .map_err(|e| ConfigError::ValidationError(format!("RXNRAG_DEVICE: {e}")))?;
        }
        if let Some(path) = var("RXNRAG_DATA") {
            self.retriever.data_path = path.into();
        }
        if let Some(path) = var("RXNRAG_EMBEDDINGS") {
            self.retriever.embeddings_path = path.into();
        }
        if let Some(path) = var("RXNRAG_INDEX") {
            self.retriever.index_path = Some(path.into());
        }
        Ok(())
    }

    /// Get the configuration directory path.
    pub fn config_dir() -> PathBuf {
        dirs_home().join(".rxnrag")
    }

    /// `~/.rxnrag/config.toml`
    pub fn config_path() -> PathBuf {
        Self::config_dir().join("config.toml")
    }

    /// Default location for vocabulary, model, records and index files.
    pub fn data_dir() -> PathBuf {
        Self::config_dir().join("data")
    }

    /// Validate the configuration.
    fn validate(&self) -> Result<(), ConfigError> {
        if self.retriever.connectivity < 2 {
            return Err(ConfigError::ValidationError(
                "retriever.connectivity must be at least 2".into(),
            ));
        }

        if self.retriever.top_k == 0 {
            return Err(ConfigError::ValidationError(
                "retriever.top_k must be > 0".into(),
            ));
        }

        if self.embedder.max_seq_len == Some(0) {
            return Err(ConfigError::ValidationError(
                "embedder.max_seq_len must be > 0 when set".into(),
            ));
        }

        Ok(())
    }

    /// Generate a default config TOML string.
    pub fn default_toml() -> String {
        let config = Self::default();
        toml::to_string_pretty(&config).unwrap_or_default()
    }
}

/// Get the user's home directory.
fn dirs_home() -> PathBuf {
    #[cfg(target_os = "windows")]
    {
        std::env::var("USERPROFILE")
            .map(PathBuf::from)
            .unwrap_or_else(|_| PathBuf::from("C:\\Users\\Default"))
    }
    #[cfg(not(target_os = "windows"))]
    {
        std::env::var("HOME")
            .map(PathBuf::from)
            .unwrap_or_else(|_| PathBuf::from("/tmp"))
    }
}

/// Configuration errors.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("Failed to read config file at {path}: {reason}")]
    ReadError { path: PathBuf, reason: String },

    #[error("Failed to parse config file at {path}: {reason}")]
    ParseError { path: PathBuf, reason: String },

    #[error("Configuration validation failed: {0}")]
    ValidationError(String),
}
