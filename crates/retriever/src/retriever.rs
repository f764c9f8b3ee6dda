use rxnrag_config::RetrieverConfig;
use rxnrag_core::{Neighbor, RetrievalError};
use tracing::{debug, info};

use crate::index::{HnswIndex, HnswOptions, VectorIndex};
use crate::matrix::EmbeddingMatrix;
use crate::store::RecordStore;

/// Finds the stored reactions closest to query embeddings.
///
/// Read-only after construction; the record count always equals the index
/// row count.
pub struct ReactionRetriever {
    store: RecordStore,
    index: Box<dyn VectorIndex>,
}

impl std::fmt::Debug for ReactionRetriever {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ReactionRetriever")
            .field("records", &self.store.len())
            .field("dimension", &self.index.dimension())
            .finish()
    }
}

impl ReactionRetriever {
    /// Pair a record store with an index over the same rows.
    pub fn new(store: RecordStore, index: impl VectorIndex + 'static) -> Result<Self, RetrievalError> {
        if store.len() != index.len() {
            return Err(RetrievalError::RowCountMismatch {
                records: store.len(),
                rows: index.len(),
            });
        }
        Ok(Self {
            store,
            index: Box::new(index),
        })
    }

    /// Build an HNSW index over `matrix`.
    pub fn build(
        store: RecordStore,
        matrix: &EmbeddingMatrix,
        options: &HnswOptions,
    ) -> Result<Self, RetrievalError> {
        if store.len() != matrix.rows() {
            return Err(RetrievalError::RowCountMismatch {
                records: store.len(),
                rows: matrix.rows(),
            });
        }
        Self::new(store, HnswIndex::build(matrix, options)?)
    }

    /// Load records and embeddings from configured paths. The index is
    /// loaded from `index_path` when set, otherwise built.
    pub fn from_config(config: &RetrieverConfig) -> Result<Self, RetrievalError> {
        let store = RecordStore::load(&config.data_path, config.record_format)?;
        let matrix = EmbeddingMatrix::from_npy(&config.embeddings_path)?;
        let options = HnswOptions::from(config);

        let retriever = match &config.index_path {
            Some(path) => {
                if store.len() != matrix.rows() {
                    return Err(RetrievalError::RowCountMismatch {
                        records: store.len(),
                        rows: matrix.rows(),
                    });
                }
                Self::new(store, HnswIndex::load(path, matrix.dimension(), &options)?)?
            }
            None => Self::build(store, &matrix, &options)?,
        };
        info!(
            records = retriever.len(),
            dim = retriever.dimension(),
            prebuilt = config.index_path.is_some(),
            "Reaction retriever ready"
        );
        Ok(retriever)
    }

    /// For each query row, the `min(k, len())` nearest records ascending by
    /// squared Euclidean distance. Output order follows query order.
    pub fn search(&self, queries: &[Vec<f32>], k: usize) -> Result<Vec<Vec<Neighbor>>, RetrievalError> {
        debug!(queries = queries.len(), k, "Searching reaction index");
        queries
            .iter()
            .map(|query| {
                let hits = self.index.search(query, k)?;
                hits.distances
                    .into_iter()
                    .zip(hits.rows)
                    .map(|(distance, row)| {
                        let record = self.store.get(row).cloned().ok_or_else(|| {
                            RetrievalError::Index(format!("index returned unknown row {row}"))
                        })?;
                        Ok(Neighbor {
                            distance,
                            row,
                            record,
                        })
                    })
                    .collect::<Result<Vec<Neighbor>, RetrievalError>>()
            })
            .collect()
    }

    pub fn store(&self) -> &RecordStore {
        &self.store
    }

    pub fn len(&self) -> usize {
        self.store.len()
    }

    pub fn is_empty(&self) -> bool {
        self.store.is_empty()
    }

    pub fn dimension(&self) -> usize {
        self.index.dimension()
    }
}
