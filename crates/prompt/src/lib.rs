//! Prompt assembly for the linkrag pipeline.
//!
//! Renders the ranked context documents and the user query into a single
//! prompt string via a Handlebars template. Pure computation: no I/O, no
//! side effects.

pub mod builder;
pub mod types;

// Re-export main types
pub use builder::{PromptBuilder, DEFAULT_TEMPLATE};
pub use types::ContextDocument;
