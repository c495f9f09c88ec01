/*!
 * Mock provider implementations for testing.
 *
 * This module provides mock providers that simulate different behaviors:
 * - `MockProvider::working()` - Always succeeds with translated text
 * - `MockProvider::scripted(..)` - Returns fixed responses in call order
 * - `MockProvider::failing()` - Always fails with an error
 * - `MockProvider::unauthorized()` - Rejects the credential
 * - `MockProvider::unverifiable()` - Translates, but the connection check fails
 */

use async_trait::async_trait;
use parking_lot::Mutex;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;

use crate::errors::{CredentialError, ProviderError, TranslationError};
use crate::providers::Provider;
use crate::translation::{TranslationOptions, Translator};

/// Mock request for testing
#[derive(Debug, Clone)]
pub struct MockRequest {
    /// The text to translate
    pub text: String,
    /// Source language
    pub source_language: String,
    /// Target language
    pub target_language: String,
}

/// Mock response for testing
#[derive(Debug, Clone)]
pub struct MockResponse {
    /// The translated text
    pub text: String,
}

/// Behavior mode for the mock provider
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum MockBehavior {
    /// Always succeeds with a proper translation
    Working,
    /// Fails on exactly one request (1-based)
    FailOnCall { call: usize },
    /// Always fails with an error
    Failing,
    /// Returns empty response
    Empty,
    /// Rejects the API key on verification and on every request
    Unauthorized,
    /// No API key configured at all
    MissingCredential,
    /// Translates normally but the connection check cannot reach the service
    Unverifiable,
}

/// Mock provider for testing translation behavior
#[derive(Debug)]
pub struct MockProvider {
    /// Behavior mode
    behavior: MockBehavior,
    /// Request counter shared between clones
    request_count: Arc<AtomicUsize>,
    /// Verification counter shared between clones
    verify_count: Arc<AtomicUsize>,
    /// Texts received, in call order
    received: Arc<Mutex<Vec<String>>>,
    /// Fixed responses returned in call order
    script: Option<Arc<Vec<String>>>,
}

impl MockProvider {
    /// Create a new mock provider with the specified behavior
    pub fn new(behavior: MockBehavior) -> Self {
        Self {
            behavior,
            request_count: Arc::new(AtomicUsize::new(0)),
            verify_count: Arc::new(AtomicUsize::new(0)),
            received: Arc::new(Mutex::new(Vec::new())),
            script: None,
        }
    }

    /// Create a working mock provider that always succeeds
    pub fn working() -> Self {
        Self::new(MockBehavior::Working)
    }

    /// Create a working mock that answers with `responses[n]` on the n-th call
    pub fn scripted<I, S>(responses: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let mut provider = Self::working();
        provider.script = Some(Arc::new(responses.into_iter().map(Into::into).collect()));
        provider
    }

    /// Create a mock that fails only on the given (1-based) request
    pub fn fail_on_call(call: usize) -> Self {
        Self::new(MockBehavior::FailOnCall { call })
    }

    /// Create a failing mock provider that always errors
    pub fn failing() -> Self {
        Self::new(MockBehavior::Failing)
    }

    /// Create a mock that returns empty responses
    pub fn empty() -> Self {
        Self::new(MockBehavior::Empty)
    }

    /// Create a mock whose credential is rejected
    pub fn unauthorized() -> Self {
        Self::new(MockBehavior::Unauthorized)
    }

    /// Create a mock whose connection check fails without rejecting the key
    pub fn unverifiable() -> Self {
        Self::new(MockBehavior::Unverifiable)
    }

    /// Create a mock with no credential configured
    pub fn missing_credential() -> Self {
        Self::new(MockBehavior::MissingCredential)
    }

    /// Number of translation requests made so far
    pub fn request_count(&self) -> usize {
        self.request_count.load(Ordering::SeqCst)
    }

    /// Number of credential checks made so far
    pub fn verify_count(&self) -> usize {
        self.verify_count.load(Ordering::SeqCst)
    }

    /// Texts received by `complete`, in call order
    pub fn received_texts(&self) -> Vec<String> {
        self.received.lock().clone()
    }

    fn default_translation(&self, index: usize, request: &MockRequest) -> String {
        match &self.script {
            Some(script) => script
                .get(index)
                .cloned()
                .unwrap_or_else(|| format!("[TRANSLATED to {}] {}", request.target_language, request.text)),
            None => format!("[TRANSLATED to {}] {}", request.target_language, request.text),
        }
    }
}

impl Clone for MockProvider {
    fn clone(&self) -> Self {
        Self {
            behavior: self.behavior,
            request_count: Arc::clone(&self.request_count),
            verify_count: Arc::clone(&self.verify_count),
            received: Arc::clone(&self.received),
            script: self.script.clone(),
        }
    }
}

#[async_trait]
impl Provider for MockProvider {
    type Request = MockRequest;
    type Response = MockResponse;

    async fn complete(&self, request: Self::Request) -> Result<Self::Response, ProviderError> {
        let count = self.request_count.fetch_add(1, Ordering::SeqCst);
        self.received.lock().push(request.text.clone());

        match self.behavior {
            MockBehavior::Working | MockBehavior::Unverifiable => Ok(MockResponse {
                text: self.default_translation(count, &request),
            }),

            MockBehavior::FailOnCall { call } => {
                if count + 1 == call {
                    Err(ProviderError::ApiError {
                        message: format!("Simulated failure (request #{})", count + 1),
                        status_code: 503,
                    })
                } else {
                    Ok(MockResponse {
                        text: self.default_translation(count, &request),
                    })
                }
            }

            MockBehavior::Failing => Err(ProviderError::ApiError {
                message: "Simulated provider failure".to_string(),
                status_code: 500,
            }),

            MockBehavior::Empty => Ok(MockResponse {
                text: String::new(),
            }),

            MockBehavior::Unauthorized | MockBehavior::MissingCredential => {
                Err(ProviderError::AuthenticationError("Invalid API key".to_string()))
            }
        }
    }

    async fn test_connection(&self) -> Result<(), ProviderError> {
        match self.behavior {
            MockBehavior::Unauthorized | MockBehavior::MissingCredential => {
                Err(ProviderError::AuthenticationError("Invalid API key".to_string()))
            }
            MockBehavior::Unverifiable => Err(ProviderError::ApiError {
                message: "Simulated missing /models endpoint".to_string(),
                status_code: 404,
            }),
            _ => Ok(()),
        }
    }

    fn extract_text(response: &Self::Response) -> String {
        response.text.trim().to_string()
    }
}

#[async_trait]
impl Translator for MockProvider {
    async fn verify(&self) -> Result<(), TranslationError> {
        self.verify_count.fetch_add(1, Ordering::SeqCst);
        if self.behavior == MockBehavior::MissingCredential {
            return Err(CredentialError::Missing("OPENAI_API_KEY".to_string()).into());
        }
        self.test_connection().await.map_err(|e| -> TranslationError {
            match e {
                ProviderError::AuthenticationError(message) => CredentialError::Rejected(message).into(),
                other => other.into(),
            }
        })
    }

    async fn translate(&self, text: &str, _options: &TranslationOptions) -> Result<String, TranslationError> {
        let request = MockRequest {
            text: text.to_string(),
            source_language: "he".to_string(),
            target_language: "en".to_string(),
        };
        let response = self.complete(request).await?;
        let text = Self::extract_text(&response);
        if text.is_empty() {
            return Err(TranslationError::EmptyResponse);
        }
        Ok(text)
    }

    fn describe(&self) -> String {
        format!("Mock - {:?}", self.behavior)
    }
}
