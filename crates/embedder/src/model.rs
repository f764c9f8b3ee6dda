//! The embedding model seam and a safetensors-backed implementation.
//!
//! The embedder treats the network as a black box: padded ids and a mask go
//! in, one vector per row comes out. [`PooledEmbeddingModel`] is the concrete
//! model shipped with the crate: a token-embedding table, masked mean pooling,
//! and an optional linear projection.

use std::collections::HashMap;
use std::path::Path;

use candle_core::{DType, Device, Tensor};
use candle_nn::{Embedding, Linear, Module};
use rxnrag_core::EmbedError;
use tracing::info;

/// Tensor names looked up in the weights file.
pub const EMBEDDINGS_WEIGHT: &str = "embeddings.weight";
pub const PROJECTION_WEIGHT: &str = "projection.weight";
pub const PROJECTION_BIAS: &str = "projection.bias";

/// A network mapping `[B, L]` token ids plus mask to `[B, D]` vectors.
///
/// Implementations must ignore positions where the mask is 0.
pub trait EmbeddingModel: Send {
    fn forward(&self, ids: &Tensor, mask: &Tensor) -> candle_core::Result<Tensor>;

    /// Output dimension `D`.
    fn dimension(&self) -> usize;

    /// Device the weights live on; input tensors are built here.
    fn device(&self) -> &Device;
}

/// Token-embedding table with masked mean pooling.
#[derive(Debug)]
pub struct PooledEmbeddingModel {
    embeddings: Embedding,
    projection: Option<Linear>,
    vocab_size: usize,
    dimension: usize,
    device: Device,
}

impl PooledEmbeddingModel {
    /// Load weights from a `.safetensors` file onto `device`.
    ///
    /// Requires `embeddings.weight` (`[vocab, hidden]`); `projection.weight`
    /// (`[dim, hidden]`) and `projection.bias` (`[dim]`) are optional.
    pub fn load(path: &Path, device: &Device) -> Result<Self, EmbedError> {
        let mut tensors: HashMap<String, Tensor> = candle_core::safetensors::load(path, device)
            .map_err(|e| {
                EmbedError::ModelLoad(format!("failed to read {}: {e}", path.display()))
            })?;

        let embeddings = tensors.remove(EMBEDDINGS_WEIGHT).ok_or_else(|| {
            EmbedError::ModelLoad(format!(
                "{} has no '{EMBEDDINGS_WEIGHT}' tensor",
                path.display()
            ))
        })?;
        let projection = tensors
            .remove(PROJECTION_WEIGHT)
            .map(|w| (w, tensors.remove(PROJECTION_BIAS)));

        let model = Self::from_tensors(embeddings, projection)?;
        info!(
            path = %path.display(),
            vocab = model.vocab_size,
            dim = model.dimension,
            projected = model.projection.is_some(),
            "Loaded embedding model"
        );
        Ok(model)
    }

    /// Build from in-memory tensors. Weights are cast to `f32`.
    pub fn from_tensors(
        embeddings: Tensor,
        projection: Option<(Tensor, Option<Tensor>)>,
    ) -> Result<Self, EmbedError> {
        let device = embeddings.device().clone();
        let embeddings = embeddings.to_dtype(DType::F32).map_err(load_err)?;
        let (vocab_size, hidden) = embeddings.dims2().map_err(|e| {
            EmbedError::ModelLoad(format!("'{EMBEDDINGS_WEIGHT}' must be 2-D: {e}"))
        })?;

        let (projection, dimension) = match projection {
            None => (None, hidden),
            Some((weight, bias)) => {
                let weight = weight.to_dtype(DType::F32).map_err(load_err)?;
                let (out_dim, in_dim) = weight.dims2().map_err(|e| {
                    EmbedError::ModelLoad(format!("'{PROJECTION_WEIGHT}' must be 2-D: {e}"))
                })?;
                if in_dim != hidden {
                    return Err(EmbedError::ModelLoad(format!(
                        "projection expects {in_dim} inputs but embeddings are {hidden}-wide"
                    )));
                }
                let bias = match bias {
                    Some(b) => {
                        let b = b.to_dtype(DType::F32).map_err(load_err)?;
                        if b.dims() != [out_dim] {
                            return Err(EmbedError::ModelLoad(format!(
                                "'{PROJECTION_BIAS}' must have shape [{out_dim}], got {:?}",
                                b.dims()
                            )));
                        }
                        Some(b)
                    }
                    None => None,
                };
                (Some(Linear::new(weight, bias)), out_dim)
            }
        };

        Ok(Self {
            embeddings: Embedding::new(embeddings, hidden),
            projection,
            vocab_size,
            dimension,
            device,
        })
    }

    pub fn vocab_size(&self) -> usize {
        self.vocab_size
    }
}

impl EmbeddingModel for PooledEmbeddingModel {
    fn forward(&self, ids: &Tensor, mask: &Tensor) -> candle_core::Result<Tensor> {
        let hidden = self.embeddings.forward(ids)?; // [B, L, H]
        let mask = mask.to_dtype(DType::F32)?.unsqueeze(2)?; // [B, L, 1]
        let summed = hidden.broadcast_mul(&mask)?.sum(1)?; // [B, H]
        // All-padding rows pool to zero instead of dividing by zero.
        let counts = mask.sum(1)?.maximum(1f32)?; // [B, 1]
        let pooled = summed.broadcast_div(&counts)?;
        match &self.projection {
            Some(linear) => linear.forward(&pooled),
            None => Ok(pooled),
        }
    }

    fn dimension(&self) -> usize {
        self.dimension
    }

    fn device(&self) -> &Device {
        &self.device
    }
}

fn load_err(e: candle_core::Error) -> EmbedError {
    EmbedError::ModelLoad(e.to_string())
}
