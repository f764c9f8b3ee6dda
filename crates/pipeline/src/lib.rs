//! End-to-end retrieval-augmented prompt construction.
//!
//! [`RagPipeline`] embeds a query, retrieves its nearest stored reactions
//! and fills the configured prompt variant with them.

mod pipeline;
mod tokenizer;

pub use pipeline::{
    EXPERT_PREDICTION_FIELD, PromptRequest, RagPipeline, embedder_from_config, standalone_prompt,
    uses_retrieval,
};
pub use tokenizer::ConfiguredTokenizer;
