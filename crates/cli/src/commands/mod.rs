//! Command handlers for the linkrag CLI.

pub mod ask;
pub mod chunks;

// Re-export command types for convenience
pub use ask::AskCommand;
pub use chunks::ChunksCommand;
