//! Vocabulary-backed tokenizers.

use rxnrag_core::error::TokenizerError;
use std::path::Path;

use crate::SmilesTokenizer;
use crate::vocab::Vocabulary;

/// Plain vocabulary lookup, no sequence markers.
#[derive(Debug, Clone)]
pub struct VocabTokenizer {
    vocab: Vocabulary,
}

impl VocabTokenizer {
    pub fn new(vocab: Vocabulary) -> Self {
        Self { vocab }
    }

    /// Load from a Chemformer-style JSON vocabulary file.
    pub fn from_chemformer_file(path: &Path) -> Result<Self, TokenizerError> {
        Vocabulary::from_chemformer_file(path).map(Self::new)
    }

    pub fn vocabulary(&self) -> &Vocabulary {
        &self.vocab
    }
}

impl SmilesTokenizer for VocabTokenizer {
    fn token_to_id(&self, token: &str) -> u32 {
        self.vocab.id(token).unwrap_or(self.vocab.unknown_id())
    }

    fn id_to_token(&self, id: u32) -> &str {
        self.vocab
            .token(id)
            .unwrap_or(self.vocab.special().unknown.as_str())
    }

    fn pad_id(&self) -> Option<u32> {
        self.vocab.pad_id()
    }
}

/// Chemformer tokenizer: sequences are `BEGIN tokens… END`.
///
/// With the default special tokens that is `^ … $`.
#[derive(Debug, Clone)]
pub struct ChemformerTokenizer {
    inner: VocabTokenizer,
}

impl ChemformerTokenizer {
    pub fn new(vocab: Vocabulary) -> Self {
        Self {
            inner: VocabTokenizer::new(vocab),
        }
    }

    pub fn from_file(path: &Path) -> Result<Self, TokenizerError> {
        VocabTokenizer::from_chemformer_file(path).map(|inner| Self { inner })
    }

    pub fn vocabulary(&self) -> &Vocabulary {
        self.inner.vocabulary()
    }
}

impl SmilesTokenizer for ChemformerTokenizer {
    fn token_to_id(&self, token: &str) -> u32 {
        self.inner.token_to_id(token)
    }

    fn id_to_token(&self, id: u32) -> &str {
        self.inner.id_to_token(id)
    }

    fn pad_id(&self) -> Option<u32> {
        self.inner.pad_id()
    }

    fn encode(&self, smiles: &str) -> Vec<u32> {
        let special = self.vocabulary().special();
        let tokens = self.tokenize(smiles);
        let mut ids = Vec::with_capacity(tokens.len() + 2);
        ids.push(self.token_to_id(&special.start));
        ids.extend(tokens.into_iter().map(|t| self.token_to_id(t)));
        ids.push(self.token_to_id(&special.end));
        ids
    }
}
