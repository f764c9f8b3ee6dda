//! # rxnrag Core
//!
//! Domain types and error definitions shared by every rxnrag crate.
//! The tokenizer, embedder, retriever and prompt crates all depend inward
//! on this one; nothing here knows about tensors, indexes or files.
//!
//! ## Contents
//!
//! - [`Direction`]: forward synthesis vs. retrosynthesis
//! - [`PromptVariant`]: which prompt template to build
//! - [`DevicePlacement`]: where inference runs
//! - [`ReactionRecord`] / [`Neighbor`]: retrieval records and ranked hits
//! - [`SmilesBatch`]: the uniform "one string or many" batch input
//! - [`error`]: bounded-context error enums

pub mod error;
pub mod direction;
pub mod variant;
pub mod placement;
pub mod record;
pub mod input;

// Re-export key types at crate root for ergonomics
pub use error::{EmbedError, Error, PromptError, Result, RetrievalError, TokenizerError};
pub use direction::Direction;
pub use variant::PromptVariant;
pub use placement::DevicePlacement;
pub use record::{Neighbor, ReactionRecord};
pub use input::SmilesBatch;
