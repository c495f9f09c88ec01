/*!
 * Page translation through an AI provider.
 *
 * - `core`: the `Translator` seam and the OpenAI-backed `TranslationService`
 * - `prompts`: prompt templates and builder
 */

// Re-export main types for easier usage
pub use self::core::{TranslationOptions, TranslationService, Translator};
pub use self::prompts::{PromptTemplate, TranslationPromptBuilder};

// Submodules
pub mod core;
pub mod prompts;
