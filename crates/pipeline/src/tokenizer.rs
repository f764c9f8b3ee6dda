//! Tokenizer selected at runtime from configuration.

use rxnrag_config::{TokenizerConfig, TokenizerKind, VocabFormat};
use rxnrag_core::TokenizerError;
use rxnrag_tokenizer::{
    ChemformerTokenizer, SmilesTokenizer, SpecialTokens, VocabTokenizer, Vocabulary,
};

#[derive(Debug, Clone)]
pub enum ConfiguredTokenizer {
    Chemformer(ChemformerTokenizer),
    Plain(VocabTokenizer),
}

impl ConfiguredTokenizer {
    /// Kind picks sequence wrapping; format picks how the vocabulary file
    /// is read. Token lists use the default special tokens.
    pub fn from_config(config: &TokenizerConfig) -> Result<Self, TokenizerError> {
        let path = &config.vocab_path;
        Ok(match (config.kind, config.vocab_format) {
            (TokenizerKind::Chemformer, VocabFormat::Json) => {
                Self::Chemformer(ChemformerTokenizer::from_file(path)?)
            }
            (TokenizerKind::Plain, VocabFormat::Json) => {
                Self::Plain(VocabTokenizer::from_chemformer_file(path)?)
            }
            (kind, VocabFormat::TokenList) => {
                let vocab = Vocabulary::from_token_list_file(path, SpecialTokens::default())?;
                match kind {
                    TokenizerKind::Chemformer => Self::Chemformer(ChemformerTokenizer::new(vocab)),
                    TokenizerKind::Plain => Self::Plain(VocabTokenizer::new(vocab)),
                }
            }
        })
    }
}

impl SmilesTokenizer for ConfiguredTokenizer {
    fn token_to_id(&self, token: &str) -> u32 {
        match self {
            Self::Chemformer(t) => t.token_to_id(token),
            Self::Plain(t) => t.token_to_id(token),
        }
    }

    fn id_to_token(&self, id: u32) -> &str {
        match self {
            Self::Chemformer(t) => t.id_to_token(id),
            Self::Plain(t) => t.id_to_token(id),
        }
    }

    fn pad_id(&self) -> Option<u32> {
        match self {
            Self::Chemformer(t) => t.pad_id(),
            Self::Plain(t) => t.pad_id(),
        }
    }

    fn encode(&self, smiles: &str) -> Vec<u32> {
        match self {
            Self::Chemformer(t) => t.encode(smiles),
            Self::Plain(t) => t.encode(smiles),
        }
    }
}
