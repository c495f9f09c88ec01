/*!
 * Error types for the hebdoc application.
 *
 * This module contains custom error types for different parts of the application,
 * using the thiserror crate for ergonomic error definitions.
 */

use thiserror::Error;

/// Errors that can occur when working with provider APIs
#[derive(Error, Debug)]
pub enum ProviderError {
    /// Error when making an API request fails
    #[error("API request failed: {0}")]
    RequestFailed(String),

    /// Error when parsing an API response fails
    #[error("Failed to parse API response: {0}")]
    ParseError(String),

    /// Error returned by the API itself
    #[error("API responded with error: {status_code} - {message}")]
    ApiError {
        /// HTTP status code
        status_code: u16,
        /// Error message from the API
        message: String
    },

    /// Error establishing or maintaining a connection
    #[error("Connection error: {0}")]
    ConnectionError(String),

    /// Error related to rate limiting
    #[error("Rate limit exceeded: {0}")]
    RateLimitExceeded(String),

    /// Error with authentication
    #[error("Authentication error: {0}")]
    AuthenticationError(String),
}

/// Errors raised while reading text out of an uploaded PDF
#[derive(Error, Debug)]
pub enum ExtractionError {
    /// The bytes could not be parsed as a PDF document
    #[error("Not a readable PDF: {0}")]
    Malformed(String),

    /// The document parsed but has no pages
    #[error("PDF contains no pages")]
    NoPages,
}

/// Problems with the translation service secret
#[derive(Error, Debug)]
pub enum CredentialError {
    /// The secret is not configured in the hosting environment
    #[error("Missing {0}. Add it to the environment/secrets of the host running this app.")]
    Missing(String),

    /// The service rejected the secret
    #[error("The translation service rejected the API key: {0}")]
    Rejected(String),
}

/// Errors that can occur during translation
#[derive(Error, Debug)]
pub enum TranslationError {
    /// Error from the provider API
    #[error("Provider error: {0}")]
    Provider(#[from] ProviderError),

    /// The credential is missing or invalid
    #[error("Credential error: {0}")]
    Credential(#[from] CredentialError),

    /// The provider answered but with no usable text
    #[error("Empty translation returned by the provider")]
    EmptyResponse,
}

impl TranslationError {
    /// Whether this failure invalidates the whole run rather than one page
    pub fn is_fatal(&self) -> bool {
        matches!(
            self,
            Self::Credential(_) | Self::Provider(ProviderError::AuthenticationError(_))
        )
    }
}

/// Main application error type that wraps all other errors
#[derive(Error, Debug)]
pub enum AppError {
    /// Error from a file operation
    #[error("File error: {0}")]
    File(String),

    /// Error from a provider
    #[error("Provider error: {0}")]
    Provider(#[from] ProviderError),

    /// Error from PDF extraction
    #[error("Extraction error: {0}")]
    Extraction(#[from] ExtractionError),

    /// Error with the translation credential
    #[error("Credential error: {0}")]
    Credential(#[from] CredentialError),

    /// Error from translation
    #[error("Translation error: {0}")]
    Translation(#[from] TranslationError),

    /// Error while writing the Word document
    #[error("Document error: {0}")]
    Document(String),

    /// Nothing usable was uploaded
    #[error("No input: {0}")]
    NoInput(String),

    /// Any other error
    #[error("Unknown error: {0}")]
    Unknown(String),
}

// Utility functions for error conversion
impl From<anyhow::Error> for AppError {
    fn from(error: anyhow::Error) -> Self {
        Self::Unknown(error.to_string())
    }
}

impl From<std::io::Error> for AppError {
    fn from(error: std::io::Error) -> Self {
        Self::File(error.to_string())
    }
}
