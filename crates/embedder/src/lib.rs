//! SMILES → vector embedding.
//!
//! [`SmilesEmbedder`] tokenizes a batch, pads it into a rectangular id matrix
//! with a mask, optionally truncates the sequence dimension, and runs an
//! [`EmbeddingModel`] on the configured device. Inference only.

pub mod batch;
pub mod device;
pub mod model;
mod embedder;

pub use batch::PaddedBatch;
pub use device::resolve_device;
pub use embedder::SmilesEmbedder;
pub use model::{EmbeddingModel, PooledEmbeddingModel};
