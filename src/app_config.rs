use anyhow::{anyhow, Context, Result};
use serde::{Deserialize, Serialize};
use std::default::Default;
use std::path::Path;

use crate::errors::CredentialError;

/// Application configuration module
/// This module handles the application configuration including loading,
/// validating and saving configuration settings.
/// The translation secret is deliberately absent: only the name of the
/// environment variable that carries it is configurable.
#[derive(Debug, Serialize, Deserialize, Clone)]
pub struct Config {
    /// Source language code (ISO)
    #[serde(default = "default_source_language")]
    pub source_language: String,

    /// Target language code (ISO)
    #[serde(default = "default_target_language")]
    pub target_language: String,

    /// Translation config
    #[serde(default)]
    pub translation: TranslationConfig,

    /// PDF text extraction config
    #[serde(default)]
    pub extraction: ExtractionConfig,

    /// Word document output config
    #[serde(default)]
    pub document: DocumentConfig,

    /// Web server config
    #[serde(default)]
    pub server: ServerConfig,

    /// Log level
    #[serde(default)]
    pub log_level: LogLevel,
}

/// Tone requested from the translator
#[derive(Debug, Serialize, Deserialize, Clone, Copy, PartialEq, Eq, Default)]
#[serde(rename_all = "lowercase")]
pub enum TranslationStyle {
    #[default]
    Clear,
    Literal,
    Warm,
    Academic,
}

impl TranslationStyle {
    /// All styles in the order they are offered to users
    pub const ALL: [TranslationStyle; 4] = [
        TranslationStyle::Clear,
        TranslationStyle::Literal,
        TranslationStyle::Warm,
        TranslationStyle::Academic,
    ];

    // @returns: Label shown in the UI and inserted into the prompt
    pub fn display_name(&self) -> &'static str {
        match self {
            Self::Clear => "Clear and straightforward",
            Self::Literal => "More literal / closer to Hebrew",
            Self::Warm => "Warm / chassidus-tone (still accurate)",
            Self::Academic => "Academic / formal",
        }
    }

    // @returns: Lowercase style identifier
    pub fn to_lowercase_string(&self) -> String {
        match self {
            Self::Clear => "clear".to_string(),
            Self::Literal => "literal".to_string(),
            Self::Warm => "warm".to_string(),
            Self::Academic => "academic".to_string(),
        }
    }
}

impl std::fmt::Display for TranslationStyle {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.to_lowercase_string())
    }
}

impl std::str::FromStr for TranslationStyle {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_lowercase().as_str() {
            "clear" => Ok(Self::Clear),
            "literal" => Ok(Self::Literal),
            "warm" => Ok(Self::Warm),
            "academic" => Ok(Self::Academic),
            _ => Err(anyhow!("Invalid translation style: {}", s)),
        }
    }
}

/// Translation service configuration
#[derive(Debug, Serialize, Deserialize, Clone)]
pub struct TranslationConfig {
    /// Model name (e.g., "gpt-4.1-mini")
    #[serde(default = "default_openai_model")]
    pub model: String,

    /// Service endpoint URL (for proxies or compatible servers)
    #[serde(default = "default_openai_endpoint")]
    pub endpoint: String,

    /// Name of the environment variable holding the API key
    #[serde(default = "default_api_key_env")]
    pub api_key_env: String,

    /// Request timeout in seconds
    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: u64,

    /// Default tone when the user does not pick one
    #[serde(default)]
    pub style: TranslationStyle,

    /// Default extra instructions appended to every prompt
    #[serde(default)]
    pub extra_instructions: String,

    /// Check the API key against the service before translating
    #[serde(default = "default_true")]
    pub verify_credential: bool,
}

impl Default for TranslationConfig {
    fn default() -> Self {
        Self {
            model: default_openai_model(),
            endpoint: default_openai_endpoint(),
            api_key_env: default_api_key_env(),
            timeout_secs: default_timeout_secs(),
            style: TranslationStyle::default(),
            extra_instructions: String::new(),
            verify_credential: true,
        }
    }
}

impl TranslationConfig {
    /// Read the API key from the hosting environment
    pub fn load_api_key(&self) -> std::result::Result<String, CredentialError> {
        let key = std::env::var(&self.api_key_env).unwrap_or_default();
        let key = key.trim();
        if key.is_empty() {
            return Err(CredentialError::Missing(self.api_key_env.clone()));
        }
        Ok(key.to_string())
    }
}

/// PDF text extraction settings
#[derive(Debug, Serialize, Deserialize, Clone)]
pub struct ExtractionConfig {
    /// Pages with fewer characters than this are treated as having no text.
    /// 1 means only pages with no recoverable text; 10 skips page-number-only pages too.
    #[serde(default = "default_min_text_chars")]
    pub min_text_chars: usize,
}

impl Default for ExtractionConfig {
    fn default() -> Self {
        Self {
            min_text_chars: default_min_text_chars(),
        }
    }
}

/// Word document output settings
#[derive(Debug, Serialize, Deserialize, Clone)]
pub struct DocumentConfig {
    /// Body font
    #[serde(default = "default_font_name")]
    pub font_name: String,

    /// Body font size in points
    #[serde(default = "default_font_size_pt")]
    pub font_size_pt: usize,

    /// File name offered for download
    #[serde(default = "default_output_file_name")]
    pub output_file_name: String,
}

impl Default for DocumentConfig {
    fn default() -> Self {
        Self {
            font_name: default_font_name(),
            font_size_pt: default_font_size_pt(),
            output_file_name: default_output_file_name(),
        }
    }
}

/// Web server settings
#[derive(Debug, Serialize, Deserialize, Clone)]
pub struct ServerConfig {
    /// Address the UI listens on
    #[serde(default = "default_bind_addr")]
    pub bind_addr: String,

    /// Maximum size of one upload request in bytes
    #[serde(default = "default_max_upload_bytes")]
    pub max_upload_bytes: usize,

    /// Seconds a prepared document waits for its download before it is dropped
    #[serde(default = "default_download_ttl_secs")]
    pub download_ttl_secs: u64,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            bind_addr: default_bind_addr(),
            max_upload_bytes: default_max_upload_bytes(),
            download_ttl_secs: default_download_ttl_secs(),
        }
    }
}

/// Log verbosity level
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq, Default)]
#[serde(rename_all = "lowercase")]
pub enum LogLevel {
    Error,
    Warn,
    #[default]
    Info,
    Debug,
    Trace,
}

impl LogLevel {
    pub fn to_level_filter(&self) -> log::LevelFilter {
        match self {
            LogLevel::Error => log::LevelFilter::Error,
            LogLevel::Warn => log::LevelFilter::Warn,
            LogLevel::Info => log::LevelFilter::Info,
            LogLevel::Debug => log::LevelFilter::Debug,
            LogLevel::Trace => log::LevelFilter::Trace,
        }
    }
}

fn default_source_language() -> String {
    "he".to_string()
}

fn default_target_language() -> String {
    "en".to_string()
}

fn default_openai_model() -> String {
    "gpt-4.1-mini".to_string()
}

fn default_openai_endpoint() -> String {
    "https://api.openai.com/v1".to_string()
}

fn default_api_key_env() -> String {
    "OPENAI_API_KEY".to_string()
}

fn default_timeout_secs() -> u64 {
    120
}

fn default_true() -> bool {
    true
}

fn default_min_text_chars() -> usize {
    1
}

fn default_font_name() -> String {
    "Calibri".to_string()
}

fn default_font_size_pt() -> usize {
    11
}

fn default_output_file_name() -> String {
    "translation.docx".to_string()
}

fn default_bind_addr() -> String {
    "127.0.0.1:8501".to_string()
}

fn default_max_upload_bytes() -> usize {
    50 * 1024 * 1024
}

fn default_download_ttl_secs() -> u64 {
    3600
}

impl Config {
    /// Load the configuration from a JSON file, writing defaults when it is absent
    pub fn load_or_create(path: &Path) -> Result<Self> {
        if path.exists() {
            let content = std::fs::read_to_string(path)
                .with_context(|| format!("Failed to open config file: {}", path.display()))?;
            let config: Config = serde_json::from_str(&content)
                .with_context(|| format!("Failed to parse config file: {}", path.display()))?;
            return Ok(config);
        }

        log::warn!("Config file not found at '{}', creating default config.", path.display());
        let config = Config::default();
        let config_json = serde_json::to_string_pretty(&config)
            .context("Failed to serialize default config to JSON")?;
        std::fs::write(path, config_json)
            .with_context(|| format!("Failed to write default config to file: {}", path.display()))?;

        Ok(config)
    }

    /// Validate the configuration for consistency and required values
    pub fn validate(&self) -> Result<()> {
        let _source_name = crate::language_utils::get_language_name(&self.source_language)?;
        let _target_name = crate::language_utils::get_language_name(&self.target_language)?;
        if crate::language_utils::language_codes_match(&self.source_language, &self.target_language) {
            return Err(anyhow!(
                "Source and target language must differ, both are '{}'",
                self.target_language
            ));
        }

        if self.translation.model.trim().is_empty() {
            return Err(anyhow!("Translation model must not be empty"));
        }

        url::Url::parse(&self.translation.endpoint)
            .with_context(|| format!("Invalid translation endpoint: {}", self.translation.endpoint))?;

        if self.translation.api_key_env.trim().is_empty() {
            return Err(anyhow!("api_key_env must name an environment variable"));
        }

        if self.extraction.min_text_chars == 0 {
            return Err(anyhow!("extraction.min_text_chars must be at least 1"));
        }

        if self.document.font_size_pt == 0 || self.document.font_size_pt > 72 {
            return Err(anyhow!("Font size must be between 1 and 72 points, got {}", self.document.font_size_pt));
        }

        if self.document.output_file_name.trim().is_empty() {
            return Err(anyhow!("Output file name must not be empty"));
        }

        if self.server.download_ttl_secs == 0 {
            return Err(anyhow!("server.download_ttl_secs must be at least 1"));
        }

        Ok(())
    }
}

/// Default implementation for Config
impl Default for Config {
    fn default() -> Self {
        Config {
            source_language: default_source_language(),
            target_language: default_target_language(),
            translation: TranslationConfig::default(),
            extraction: ExtractionConfig::default(),
            document: DocumentConfig::default(),
            server: ServerConfig::default(),
            log_level: LogLevel::default(),
        }
    }
}
