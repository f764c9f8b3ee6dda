//! Nearest-neighbor indexes over embedding rows.
//!
//! Distances are squared Euclidean throughout. Keys are matrix row numbers,
//! so a hit maps straight back to its record.

use std::path::Path;

use rxnrag_config::RetrieverConfig;
use rxnrag_core::RetrievalError;
use tracing::{debug, info};
use usearch::{Index, IndexOptions, MetricKind, ScalarKind};

use crate::matrix::EmbeddingMatrix;

/// Hits for one query, ascending by distance.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct SearchHits {
    pub distances: Vec<f32>,
    pub rows: Vec<usize>,
}

impl SearchHits {
    fn from_pairs(mut pairs: Vec<(f32, usize)>) -> Self {
        pairs.sort_by(|a, b| a.0.total_cmp(&b.0));
        let (distances, rows) = pairs.into_iter().unzip();
        Self { distances, rows }
    }

    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }
}

/// Read-only k-nearest-neighbor search.
pub trait VectorIndex: Send + Sync {
    /// Up to `min(k, len())` hits, ascending distance.
    fn search(&self, query: &[f32], k: usize) -> Result<SearchHits, RetrievalError>;

    fn len(&self) -> usize;

    fn is_empty(&self) -> bool {
        self.len() == 0
    }

    fn dimension(&self) -> usize;
}

/// Squared Euclidean distance.
pub fn squared_l2(a: &[f32], b: &[f32]) -> f32 {
    a.iter().zip(b).map(|(x, y)| (x - y) * (x - y)).sum()
}

/// HNSW graph parameters.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct HnswOptions {
    pub connectivity: usize,
    pub expansion_add: usize,
    pub expansion_search: usize,
}

impl Default for HnswOptions {
    fn default() -> Self {
        Self {
            connectivity: 32,
            expansion_add: 40,
            expansion_search: 16,
        }
    }
}

impl From<&RetrieverConfig> for HnswOptions {
    fn from(config: &RetrieverConfig) -> Self {
        Self {
            connectivity: config.connectivity,
            expansion_add: config.expansion_add,
            expansion_search: config.expansion_search,
        }
    }
}

/// Approximate search over a usearch HNSW graph.
pub struct HnswIndex {
    index: Index,
    dimension: usize,
}

impl HnswIndex {
    fn empty(dimension: usize, options: &HnswOptions) -> Result<Index, RetrievalError> {
        let index_options = IndexOptions {
            dimensions: dimension,
            metric: MetricKind::L2sq,
            quantization: ScalarKind::F32,
            connectivity: options.connectivity,
            expansion_add: options.expansion_add,
            expansion_search: options.expansion_search,
            ..Default::default()
        };
        Index::new(&index_options)
            .map_err(|e| RetrievalError::Index(format!("usearch index creation failed: {e}")))
    }

    /// Insert every matrix row under its row number.
    pub fn build(matrix: &EmbeddingMatrix, options: &HnswOptions) -> Result<Self, RetrievalError> {
        let index = Self::empty(matrix.dimension(), options)?;
        index
            .reserve(matrix.rows())
            .map_err(|e| RetrievalError::Index(format!("usearch reserve failed: {e}")))?;
        for (row, vector) in matrix.iter_rows().enumerate() {
            index
                .add(row as u64, vector)
                .map_err(|e| RetrievalError::Index(format!("usearch add failed at row {row}: {e}")))?;
        }
        info!(
            rows = matrix.rows(),
            dim = matrix.dimension(),
            connectivity = options.connectivity,
            "Built HNSW index"
        );
        Ok(Self {
            index,
            dimension: matrix.dimension(),
        })
    }

    /// Load a serialized index. Its dimension must equal `dimension`.
    pub fn load(path: &Path, dimension: usize, options: &HnswOptions) -> Result<Self, RetrievalError> {
        let path_str = path_to_str(path)?;
        let index = Self::empty(dimension, options)?;
        index.load(path_str).map_err(|e| RetrievalError::ReadFailed {
            path: path.display().to_string(),
            reason: e.to_string(),
        })?;
        if index.dimensions() != dimension {
            return Err(RetrievalError::DimensionMismatch {
                expected: dimension,
                actual: index.dimensions(),
            });
        }
        info!(path = %path.display(), rows = index.size(), dim = dimension, "Loaded HNSW index");
        Ok(Self { index, dimension })
    }

    pub fn save(&self, path: &Path) -> Result<(), RetrievalError> {
        let path_str = path_to_str(path)?;
        self.index
            .save(path_str)
            .map_err(|e| RetrievalError::Index(format!("failed to save {}: {e}", path.display())))?;
        info!(path = %path.display(), rows = self.index.size(), "Saved HNSW index");
        Ok(())
    }
}

impl VectorIndex for HnswIndex {
    fn search(&self, query: &[f32], k: usize) -> Result<SearchHits, RetrievalError> {
        check_dimension(self.dimension, query)?;
        let k = k.min(self.len());
        if k == 0 {
            return Ok(SearchHits::default());
        }
        let matches = self
            .index
            .search(query, k)
            .map_err(|e| RetrievalError::Index(format!("usearch search failed: {e}")))?;
        let pairs = matches
            .distances
            .into_iter()
            .zip(matches.keys)
            .map(|(d, key)| (d, key as usize))
            .collect();
        let hits = SearchHits::from_pairs(pairs);
        debug!(k, hits = hits.len(), "HNSW search");
        Ok(hits)
    }

    fn len(&self) -> usize {
        self.index.size()
    }

    fn dimension(&self) -> usize {
        self.dimension
    }
}

/// Exact brute-force search. Fine for small stores and as a reference.
pub struct FlatIndex {
    matrix: EmbeddingMatrix,
}

impl FlatIndex {
    pub fn new(matrix: EmbeddingMatrix) -> Self {
        Self { matrix }
    }
}

impl VectorIndex for FlatIndex {
    fn search(&self, query: &[f32], k: usize) -> Result<SearchHits, RetrievalError> {
        check_dimension(self.matrix.dimension(), query)?;
        let pairs: Vec<(f32, usize)> = self
            .matrix
            .iter_rows()
            .enumerate()
            .map(|(row, v)| (squared_l2(query, v), row))
            .collect();
        let mut hits = SearchHits::from_pairs(pairs);
        hits.distances.truncate(k);
        hits.rows.truncate(k);
        Ok(hits)
    }

    fn len(&self) -> usize {
        self.matrix.rows()
    }

    fn dimension(&self) -> usize {
        self.matrix.dimension()
    }
}

fn check_dimension(expected: usize, query: &[f32]) -> Result<(), RetrievalError> {
    if query.len() != expected {
        return Err(RetrievalError::DimensionMismatch {
            expected,
            actual: query.len(),
        });
    }
    Ok(())
}

fn path_to_str(path: &Path) -> Result<&str, RetrievalError> {
    path.to_str()
        .ok_or_else(|| RetrievalError::Index(format!("non UTF-8 index path: {}", path.display())))
}
