use candle_core::{DType, Device};
use parking_lot::Mutex;
use rxnrag_core::EmbedError;
use rxnrag_tokenizer::SmilesTokenizer;
use tracing::debug;

use crate::batch::PaddedBatch;
use crate::model::EmbeddingModel;

/// Turns SMILES strings into fixed-size vectors.
///
/// The model is loaded once and used for inference only. Calls on one
/// instance are serialized; separate instances share nothing.
pub struct SmilesEmbedder<T: SmilesTokenizer> {
    tokenizer: T,
    model: Mutex<Box<dyn EmbeddingModel>>,
    pad_id: u32,
    dimension: usize,
    max_seq_len: Option<usize>,
}

impl<T: SmilesTokenizer> SmilesEmbedder<T> {
    /// Fails when the tokenizer's vocabulary has no pad token.
    pub fn new(tokenizer: T, model: impl EmbeddingModel + 'static) -> Result<Self, EmbedError> {
        let pad_id = tokenizer.pad_id().ok_or(EmbedError::MissingPadToken)?;
        let dimension = model.dimension();
        Ok(Self {
            tokenizer,
            model: Mutex::new(Box::new(model)),
            pad_id,
            dimension,
            max_seq_len: None,
        })
    }

    /// Truncate every padded batch to at most `max_seq_len` positions.
    pub fn with_max_seq_len(mut self, max_seq_len: Option<usize>) -> Self {
        self.max_seq_len = max_seq_len;
        self
    }

    pub fn tokenizer(&self) -> &T {
        &self.tokenizer
    }

    pub fn dimension(&self) -> usize {
        self.dimension
    }

    pub fn max_seq_len(&self) -> Option<usize> {
        self.max_seq_len
    }

    /// Embed a batch: one `f32` row per input, in input order.
    pub fn embed<S: AsRef<str>>(&self, smiles: &[S]) -> Result<Vec<Vec<f32>>, EmbedError> {
        if smiles.is_empty() {
            return Err(EmbedError::EmptyBatch);
        }

        let encoded: Vec<Vec<u32>> = smiles
            .iter()
            .map(|s| self.tokenizer.encode(s.as_ref()))
            .collect();
        let mut batch = PaddedBatch::pad(&encoded, self.pad_id)?;
        if let Some(max_len) = self.max_seq_len {
            batch.truncate(max_len);
        }
        debug!(
            batch = batch.batch_size(),
            seq_len = batch.seq_len(),
            "Embedding SMILES batch"
        );

        let model = self.model.lock();
        let (ids, mask) = batch.to_tensors(model.device()).map_err(map_candle_err)?;
        let output = model.forward(&ids, &mask).map_err(map_candle_err)?;
        drop(model);

        let (rows, _) = output.dims2().map_err(map_candle_err)?;
        if rows != batch.batch_size() {
            return Err(EmbedError::RowMismatch {
                expected: batch.batch_size(),
                actual: rows,
            });
        }

        output
            .to_dtype(DType::F32)
            .and_then(|t| t.to_device(&Device::Cpu))
            .and_then(|t| t.to_vec2::<f32>())
            .map_err(map_candle_err)
    }
}

/// Map Candle errors to EmbedError.
fn map_candle_err(e: candle_core::Error) -> EmbedError {
    EmbedError::Inference(format!("Candle inference error: {e}"))
}

#[cfg(test)]
mod tests {
    use super::*;
    use candle_core::Tensor;
    use rxnrag_tokenizer::{SpecialTokens, VocabTokenizer, Vocabulary};

    /// Emits `[real token count, sum of real ids]` per row.
    struct CountingModel {
        device: Device,
    }

    impl EmbeddingModel for CountingModel {
        fn forward(&self, ids: &Tensor, mask: &Tensor) -> candle_core::Result<Tensor> {
            let count = mask.to_dtype(DType::F32)?.sum_keepdim(1)?;
            let id_sum = (ids * mask)?.to_dtype(DType::F32)?.sum_keepdim(1)?;
            Tensor::cat(&[&count, &id_sum], 1)
        }

        fn dimension(&self) -> usize {
            2
        }

        fn device(&self) -> &Device {
            &self.device
        }
    }

    /// Always returns a single row.
    struct OneRowModel {
        device: Device,
    }

    impl EmbeddingModel for OneRowModel {
        fn forward(&self, _ids: &Tensor, _mask: &Tensor) -> candle_core::Result<Tensor> {
            Tensor::zeros((1, 2), DType::F32, &self.device)
        }

        fn dimension(&self) -> usize {
            2
        }

        fn device(&self) -> &Device {
            &self.device
        }
    }

    fn tokenizer(with_pad: bool) -> VocabTokenizer {
        let mut tokens = vec!["?", "C", "O", "(", ")", "="];
        if with_pad {
            tokens.insert(0, "<PAD>");
        }
        let vocab = Vocabulary::from_tokens(
            tokens.into_iter().map(String::from),
            SpecialTokens::default(),
        )
        .unwrap();
        VocabTokenizer::new(vocab)
    }

    fn embedder() -> SmilesEmbedder<VocabTokenizer> {
        SmilesEmbedder::new(tokenizer(true), CountingModel { device: Device::Cpu }).unwrap()
    }

    #[test]
    fn one_row_per_input_in_order() {
        let out = embedder().embed(&["CCO", "C", "CC(=O)O"]).unwrap();
        assert_eq!(out.len(), 3);
        assert_eq!(out[0][0], 3.0);
        assert_eq!(out[1][0], 1.0);
        assert_eq!(out[2][0], 7.0);
        assert!(out.iter().all(|row| row.len() == 2));
    }

    #[test]
    fn padding_is_masked_out() {
        let e = embedder();
        let alone = e.embed(&["CO"]).unwrap();
        let batched = e.embed(&["CO", "CC(=O)O"]).unwrap();
        assert_eq!(alone[0], batched[0]);
    }

    #[test]
    fn truncation_limits_sequence_length() {
        let e = embedder().with_max_seq_len(Some(2));
        let out = e.embed(&["CCCC", "O"]).unwrap();
        assert_eq!(out[0][0], 2.0);
        assert_eq!(out[1][0], 1.0);
    }

    #[test]
    fn empty_batch_fails_fast() {
        let err = embedder().embed::<&str>(&[]).unwrap_err();
        assert!(matches!(err, EmbedError::EmptyBatch));
    }

    #[test]
    fn missing_pad_token_is_rejected() {
        let result = SmilesEmbedder::new(tokenizer(false), CountingModel { device: Device::Cpu });
        assert!(matches!(result, Err(EmbedError::MissingPadToken)));
    }

    #[test]
    fn wrong_row_count_is_reported() {
        let e = SmilesEmbedder::new(tokenizer(true), OneRowModel { device: Device::Cpu }).unwrap();
        let err = e.embed(&["C", "O"]).unwrap_err();
        assert!(matches!(err, EmbedError::RowMismatch { expected: 2, actual: 1 }));
    }

    #[test]
    fn embedder_is_shareable_across_threads() {
        fn assert_sync<S: Send + Sync>() {}
        assert_sync::<SmilesEmbedder<VocabTokenizer>>();
    }
}
