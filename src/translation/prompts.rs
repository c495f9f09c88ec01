/*!
 * Prompt templates for page translation.
 */

use crate::app_config::TranslationStyle;

/// Prompt template with `{source_language}`/`{target_language}` placeholders
#[derive(Debug, Clone)]
pub struct PromptTemplate {
    /// The template string with placeholders
    template: String,
}

impl PromptTemplate {
    /// Instructions that precede every page.
    pub const PAGE_TRANSLATOR: &'static str = "You are a careful {source_language}-to-{target_language} translator.
Translate the text accurately. Do not add commentary.
Preserve paragraph structure.";

    /// Create a new prompt template.
    pub fn new(template: &str) -> Self {
        Self {
            template: template.to_string(),
        }
    }

    /// Create the default page translator template.
    pub fn page_translator() -> Self {
        Self::new(Self::PAGE_TRANSLATOR)
    }

    /// Render the template with the given variables.
    pub fn render(&self, source_language: &str, target_language: &str) -> String {
        self.template
            .replace("{source_language}", source_language)
            .replace("{target_language}", target_language)
    }
}

impl Default for PromptTemplate {
    fn default() -> Self {
        Self::page_translator()
    }
}

/// Builds the single-message prompt sent for one page.
#[derive(Debug, Clone)]
pub struct TranslationPromptBuilder {
    template: PromptTemplate,
    source_language: String,
    target_language: String,
    style: TranslationStyle,
    extra_instructions: String,
}

impl TranslationPromptBuilder {
    /// Language arguments are display names, e.g. "Hebrew".
    pub fn new(source_language: impl Into<String>, target_language: impl Into<String>) -> Self {
        Self {
            template: PromptTemplate::default(),
            source_language: source_language.into(),
            target_language: target_language.into(),
            style: TranslationStyle::default(),
            extra_instructions: String::new(),
        }
    }

    pub fn with_template(mut self, template: PromptTemplate) -> Self {
        self.template = template;
        self
    }

    pub fn with_style(mut self, style: TranslationStyle) -> Self {
        self.style = style;
        self
    }

    pub fn with_extra_instructions(mut self, extra: impl Into<String>) -> Self {
        self.extra_instructions = extra.into();
        self
    }

    /// Render the full prompt for a page of source text
    pub fn build(&self, text: &str) -> String {
        let extra = self.extra_instructions.trim();
        let extra = if extra.is_empty() { "None" } else { extra };

        format!(
            "{}\n\nTarget style: {}\nExtra instructions: {}\n\n{} TEXT:\n{}",
            self.template.render(&self.source_language, &self.target_language),
            self.style.display_name(),
            extra,
            self.source_language.to_uppercase(),
            text
        )
        .trim()
        .to_string()
    }
}
