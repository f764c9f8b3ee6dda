//! Similar-reaction retrieval.
//!
//! A [`RecordStore`] of reactions is paired row-for-row with an
//! [`EmbeddingMatrix`]; a [`VectorIndex`] over the matrix answers k-nearest
//! queries in squared Euclidean distance. [`ReactionRetriever`] ties the
//! three together and hands back [`Neighbor`](rxnrag_core::Neighbor)s.

pub mod index;
pub mod matrix;
pub mod store;
mod retriever;

pub use index::{FlatIndex, HnswIndex, HnswOptions, SearchHits, VectorIndex};
pub use matrix::EmbeddingMatrix;
pub use retriever::ReactionRetriever;
pub use store::RecordStore;
