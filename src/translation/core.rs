/*!
 * Core translation service implementation.
 *
 * `Translator` is the seam the controller depends on: one call per page and a
 * credential check that runs before any page is touched. `TranslationService`
 * is the production implementation backed by the OpenAI client, which is
 * built once at startup and owned by the service.
 */

use async_trait::async_trait;
use log::{debug, warn};
use std::time::Instant;

use crate::app_config::{Config, TranslationStyle};
use crate::errors::{CredentialError, ProviderError, TranslationError};
use crate::language_utils;
use crate::providers::openai::{OpenAI, OpenAIRequest};
use crate::providers::Provider;
use super::prompts::TranslationPromptBuilder;

/// Per-run options chosen by the user
#[derive(Debug, Clone, Default, PartialEq)]
pub struct TranslationOptions {
    /// Requested tone
    pub style: TranslationStyle,

    /// Free-form instructions appended to the prompt
    pub extra_instructions: String,
}

impl TranslationOptions {
    pub fn new(style: TranslationStyle, extra_instructions: impl Into<String>) -> Self {
        Self {
            style,
            extra_instructions: extra_instructions.into(),
        }
    }

    /// Options seeded from the configured defaults
    pub fn from_config(config: &Config) -> Self {
        Self::new(config.translation.style, config.translation.extra_instructions.clone())
    }
}

/// Translates one page of text at a time
#[async_trait]
pub trait Translator: Send + Sync {
    /// Check that the credential is present and accepted.
    /// Called once per run before any page is translated.
    async fn verify(&self) -> Result<(), TranslationError> {
        Ok(())
    }

    /// Translate the text of a single page
    async fn translate(&self, text: &str, options: &TranslationOptions) -> Result<String, TranslationError>;

    /// Short description for logs ("OpenAI - gpt-4.1-mini")
    fn describe(&self) -> String;
}

/// Main translation service backed by the OpenAI Responses API
#[derive(Debug)]
pub struct TranslationService {
    /// Provider client
    client: OpenAI,

    /// Model name
    model: String,

    /// Display name of the source language, e.g. "Hebrew"
    source_language: String,

    /// Display name of the target language, e.g. "English"
    target_language: String,

    /// Whether `verify` contacts the service
    verify_credential: bool,
}

impl TranslationService {
    /// Create a service with an explicit API key
    pub fn new(config: &Config, api_key: impl Into<String>) -> anyhow::Result<Self> {
        let source_language = language_utils::get_language_name(&config.source_language)?;
        let target_language = language_utils::get_language_name(&config.target_language)?;

        Ok(Self {
            client: OpenAI::new(
                api_key,
                config.translation.endpoint.clone(),
                config.translation.timeout_secs,
            ),
            model: config.translation.model.clone(),
            source_language,
            target_language,
            verify_credential: config.translation.verify_credential,
        })
    }

    /// Create a service reading the API key from the configured environment variable
    pub fn from_env(config: &Config) -> Result<Self, crate::errors::AppError> {
        let api_key = config.translation.load_api_key()?;
        Ok(Self::new(config, api_key)?)
    }

    fn prompt_builder(&self, options: &TranslationOptions) -> TranslationPromptBuilder {
        TranslationPromptBuilder::new(&self.source_language, &self.target_language)
            .with_style(options.style)
            .with_extra_instructions(options.extra_instructions.clone())
    }
}

#[async_trait]
impl Translator for TranslationService {
    async fn verify(&self) -> Result<(), TranslationError> {
        if !self.verify_credential {
            return Ok(());
        }

        match self.client.test_connection().await {
            Ok(()) => Ok(()),
            Err(ProviderError::AuthenticationError(message)) => {
                Err(CredentialError::Rejected(message).into())
            }
            Err(e) => Err(e.into()),
        }
    }

    async fn translate(&self, text: &str, options: &TranslationOptions) -> Result<String, TranslationError> {
        let start_time = Instant::now();
        let prompt = self.prompt_builder(options).build(text);
        let request = OpenAIRequest::new(&self.model, prompt);

        let response = self.client.complete(request).await?;
        let translated = OpenAI::extract_text(&response);

        if let Some(usage) = &response.usage {
            debug!(
                "Page translated in {:?} ({} input / {} output / {} total tokens)",
                start_time.elapsed(),
                usage.input_tokens,
                usage.output_tokens,
                usage.total_tokens
            );
        }

        if translated.is_empty() {
            warn!("Provider returned no text for a {} character page", text.chars().count());
            return Err(TranslationError::EmptyResponse);
        }

        Ok(translated)
    }

    fn describe(&self) -> String {
        format!("OpenAI - {}", self.model)
    }
}
