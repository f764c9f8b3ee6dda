//! Ragged → rectangular batching.
//!
//! Token sequences of different lengths are padded to the longest one. The
//! mask marks real tokens with 1 and filler with 0, so for every row `i`
//! and column `j`: `mask[i][j] == 1` exactly when `j < len(sequence_i)`.

use candle_core::{Device, Tensor};
use rxnrag_core::error::EmbedError;

/// A padded `[batch, seq_len]` id matrix and its attention mask, row-major.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PaddedBatch {
    ids: Vec<u32>,
    mask: Vec<u32>,
    batch_size: usize,
    seq_len: usize,
}

impl PaddedBatch {
    /// Pad `sequences` with `pad_id` up to the longest sequence.
    ///
    /// An empty batch is a usage error.
    pub fn pad(sequences: &[Vec<u32>], pad_id: u32) -> Result<Self, EmbedError> {
        if sequences.is_empty() {
            return Err(EmbedError::EmptyBatch);
        }

        let batch_size = sequences.len();
        let seq_len = sequences.iter().map(Vec::len).max().unwrap_or(0);
        let mut ids = vec![pad_id; batch_size * seq_len];
        let mut mask = vec![0u32; batch_size * seq_len];

        for (i, row) in sequences.iter().enumerate() {
            let start = i * seq_len;
            ids[start..start + row.len()].copy_from_slice(row);
            mask[start..start + row.len()].fill(1);
        }

        Ok(Self {
            ids,
            mask,
            batch_size,
            seq_len,
        })
    }

    /// Keep only the first `max_len` positions of every row.
    ///
    /// No-op when the batch is already short enough; never pads.
    pub fn truncate(&mut self, max_len: usize) {
        if max_len >= self.seq_len {
            return;
        }
        let keep = |flat: &[u32]| -> Vec<u32> {
            flat.chunks(self.seq_len)
                .flat_map(|row| row[..max_len].iter().copied())
                .collect()
        };
        self.ids = keep(&self.ids);
        self.mask = keep(&self.mask);
        self.seq_len = max_len;
    }

    pub fn batch_size(&self) -> usize {
        self.batch_size
    }

    pub fn seq_len(&self) -> usize {
        self.seq_len
    }

    pub fn ids_row(&self, i: usize) -> &[u32] {
        &self.ids[i * self.seq_len..(i + 1) * self.seq_len]
    }

    pub fn mask_row(&self, i: usize) -> &[u32] {
        &self.mask[i * self.seq_len..(i + 1) * self.seq_len]
    }

    /// Build `(ids, mask)` tensors of shape `[batch, seq_len]`, dtype `u32`.
    pub fn to_tensors(&self, device: &Device) -> candle_core::Result<(Tensor, Tensor)> {
        let shape = (self.batch_size, self.seq_len);
        let ids = Tensor::from_vec(self.ids.clone(), shape, device)?;
        let mask = Tensor::from_vec(self.mask.clone(), shape, device)?;
        Ok((ids, mask))
    }
}
