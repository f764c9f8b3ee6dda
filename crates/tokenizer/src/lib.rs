//! SMILES tokenization for rxnrag.
//!
//! [`SmilesTokenizer`] splits a SMILES string with a fixed regular expression
//! and maps tokens to vocabulary ids. Implementors only supply the id
//! mapping; tokenizing, encoding, decoding and the batch forms are shared.
//!
//! Two implementations ship here:
//! - [`VocabTokenizer`]: plain vocabulary lookup
//! - [`ChemformerTokenizer`]: wraps every sequence in begin/end markers

pub mod pattern;
pub mod vocab;
mod chemformer;

pub use chemformer::{ChemformerTokenizer, VocabTokenizer};
pub use vocab::{SpecialTokens, Vocabulary};

use rxnrag_core::SmilesBatch;

/// Capability set shared by every SMILES tokenizer.
pub trait SmilesTokenizer {
    /// Vocabulary lookup. Unknown tokens map to the unknown id; never fails.
    fn token_to_id(&self, token: &str) -> u32;

    /// Inverse lookup. Unknown ids map to the unknown token.
    fn id_to_token(&self, id: u32) -> &str;

    /// Id used to fill padded positions, if the vocabulary has one.
    fn pad_id(&self) -> Option<u32>;

    /// Split with the fixed SMILES pattern; unmatched characters are dropped.
    fn tokenize<'a>(&self, smiles: &'a str) -> Vec<&'a str> {
        pattern::tokenize(smiles)
    }

    fn encode(&self, smiles: &str) -> Vec<u32> {
        self.tokenize(smiles)
            .into_iter()
            .map(|t| self.token_to_id(t))
            .collect()
    }

    /// Concatenate the tokens for `ids` with no separator.
    fn decode(&self, ids: &[u32]) -> String {
        ids.iter().map(|&id| self.id_to_token(id)).collect()
    }

    fn batch_encode<S: AsRef<str>>(&self, smiles: &[S]) -> Vec<Vec<u32>>
    where
        Self: Sized,
    {
        smiles.iter().map(|s| self.encode(s.as_ref())).collect()
    }

    fn batch_decode<I: AsRef<[u32]>>(&self, ids: &[I]) -> Vec<String>
    where
        Self: Sized,
    {
        ids.iter().map(|seq| self.decode(seq.as_ref())).collect()
    }

    /// Encode one string or a list; the result is always a list.
    fn encode_input(&self, input: impl Into<SmilesBatch>) -> Vec<Vec<u32>>
    where
        Self: Sized,
    {
        self.batch_encode(&input.into().into_vec())
    }
}
