//! Prompt builder for rendering the answer template.

use handlebars::Handlebars;
use linkrag_core::{AppError, AppResult};
use serde::Serialize;

use crate::types::ContextDocument;

/// Default answer template.
///
/// Three substitution concerns: the document loop (content + url) and the
/// query. The instructions cover the empty-context case, where the loop
/// renders nothing and the model is expected to say that no relevant
/// information is available.
pub const DEFAULT_TEMPLATE: &str = "\
Given the information below, answer the query. Only use the provided context to \
generate the answer and list the source URLs you used. If the context contains no \
relevant information, say so and cite no URLs.

Context:
{{#each documents}}
{{content}}
URL: {{url}}

{{/each}}
Question: {{query}}
Answer:";

/// Template name under which the answer template is registered.
const TEMPLATE_NAME: &str = "answer";

#[derive(Serialize)]
struct TemplateData<'a> {
    documents: &'a [ContextDocument],
    query: &'a str,
}

/// Renders ranked context documents and a query into one prompt string.
pub struct PromptBuilder {
    handlebars: Handlebars<'static>,
}

impl PromptBuilder {
    /// Create a builder for the given template.
    ///
    /// HTML escaping is disabled: the output is a plain-text prompt, not
    /// markup.
    pub fn new(template: &str) -> AppResult<Self> {
        let mut handlebars = Handlebars::new();
        handlebars.register_escape_fn(handlebars::no_escape);

        handlebars
            .register_template_string(TEMPLATE_NAME, template)
            .map_err(|e| AppError::Prompt(format!("Failed to register template: {}", e)))?;

        Ok(Self { handlebars })
    }

    /// Render the prompt for the given context documents and query.
    pub fn render(&self, documents: &[ContextDocument], query: &str) -> AppResult<String> {
        tracing::debug!(
            "Rendering prompt with {} context documents",
            documents.len()
        );

        let data = TemplateData { documents, query };

        self.handlebars
            .render(TEMPLATE_NAME, &data)
            .map_err(|e| AppError::Prompt(format!("Failed to render template: {}", e)))
    }
}
