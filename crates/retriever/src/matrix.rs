//! Dense row-major embedding matrix.

use std::path::Path;

use candle_core::{DType, Device, Tensor};
use rxnrag_core::RetrievalError;
use tracing::info;

/// `rows × dimension` f32 values, one row per record.
#[derive(Debug, Clone, PartialEq)]
pub struct EmbeddingMatrix {
    data: Vec<f32>,
    rows: usize,
    dimension: usize,
}

impl EmbeddingMatrix {
    /// Build from equal-length rows.
    pub fn from_rows(rows: Vec<Vec<f32>>) -> Result<Self, RetrievalError> {
        let dimension = rows.first().map(Vec::len).unwrap_or(0);
        if let Some((i, row)) = rows.iter().enumerate().find(|(_, r)| r.len() != dimension) {
            return Err(RetrievalError::InvalidMatrix(format!(
                "row {i} has {} columns, expected {dimension}",
                row.len()
            )));
        }
        let n = rows.len();
        Ok(Self {
            data: rows.into_iter().flatten().collect(),
            rows: n,
            dimension,
        })
    }

    /// Read a 2-D `.npy` array. Any numeric dtype is converted to f32.
    pub fn from_npy(path: &Path) -> Result<Self, RetrievalError> {
        let tensor = Tensor::read_npy(path).map_err(|e| RetrievalError::ReadFailed {
            path: path.display().to_string(),
            reason: e.to_string(),
        })?;
        let matrix = Self::from_tensor(&tensor)?;
        info!(
            path = %path.display(),
            rows = matrix.rows,
            dim = matrix.dimension,
            "Loaded embedding matrix"
        );
        Ok(matrix)
    }

    pub fn from_tensor(tensor: &Tensor) -> Result<Self, RetrievalError> {
        let (rows, dimension) = tensor.dims2().map_err(|_| {
            RetrievalError::InvalidMatrix(format!("expected a 2-D array, got shape {:?}", tensor.dims()))
        })?;
        let data = tensor
            .to_dtype(DType::F32)
            .and_then(|t| t.flatten_all())
            .and_then(|t| t.to_vec1::<f32>())
            .map_err(|e| RetrievalError::InvalidMatrix(e.to_string()))?;
        Ok(Self {
            data,
            rows,
            dimension,
        })
    }

    /// Write as a 2-D f32 `.npy` array.
    pub fn write_npy(&self, path: &Path) -> Result<(), RetrievalError> {
        Tensor::from_slice(&self.data, (self.rows, self.dimension), &Device::Cpu)
            .and_then(|t| t.write_npy(path))
            .map_err(|e| RetrievalError::Index(format!("failed to write {}: {e}", path.display())))
    }

    pub fn row(&self, i: usize) -> Option<&[f32]> {
        (i < self.rows).then(|| &self.data[i * self.dimension..(i + 1) * self.dimension])
    }

    pub fn iter_rows(&self) -> impl Iterator<Item = &[f32]> {
        // chunks_exact(0) panics; a zero-width matrix has no addressable rows.
        let width = self.dimension.max(1);
        self.data.chunks_exact(width).take(self.rows)
    }

    pub fn rows(&self) -> usize {
        self.rows
    }

    pub fn dimension(&self) -> usize {
        self.dimension
    }
}
