//! Vocabulary — the token ↔ id mapping behind every tokenizer.
//!
//! Two on-disk sources are supported:
//!
//! - **Chemformer JSON**: `{"properties": {"special_tokens": {...}}, "vocabulary": [...]}`
//!   where a token's position in `vocabulary` is its id.
//! - **Token list**: plain text, one token per line, line number = id.
//!
//! The vocabulary is built once and never mutated.

use rxnrag_core::error::TokenizerError;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::collections::HashMap;
use std::path::Path;
use tracing::{debug, info};

/// Strings bound to the four special token roles.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SpecialTokens {
    /// Begin-of-sequence marker.
    #[serde(default = "default_start")]
    pub start: String,

    /// End-of-sequence marker.
    #[serde(default = "default_end")]
    pub end: String,

    /// Filler used when padding a batch.
    #[serde(default = "default_pad")]
    pub pad: String,

    /// Substitute for out-of-vocabulary tokens.
    #[serde(default = "default_unknown")]
    pub unknown: String,
}

fn default_start() -> String {
    "^".into()
}
fn default_end() -> String {
    "$".into()
}
fn default_pad() -> String {
    "<PAD>".into()
}
fn default_unknown() -> String {
    "?".into()
}

impl Default for SpecialTokens {
    fn default() -> Self {
        Self {
            start: default_start(),
            end: default_end(),
            pad: default_pad(),
            unknown: default_unknown(),
        }
    }
}

/// An injective token → id mapping plus its inverse.
#[derive(Debug, Clone)]
pub struct Vocabulary {
    ids: HashMap<String, u32>,
    tokens: Vec<String>,
    special: SpecialTokens,
    unknown_id: u32,
}

impl Vocabulary {
    /// Build from an ordered token list. Position = id.
    ///
    /// Fails if a token repeats (the mapping must be injective) or if the
    /// unknown token is absent (lookups must always resolve).
    pub fn from_tokens<I, S>(tokens: I, special: SpecialTokens) -> Result<Self, TokenizerError>
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let tokens: Vec<String> = tokens.into_iter().map(Into::into).collect();
        let mut ids = HashMap::with_capacity(tokens.len());

        for (i, token) in tokens.iter().enumerate() {
            let id = u32::try_from(i).map_err(|_| {
                TokenizerError::InvalidVocabulary(format!("more than {} tokens", u32::MAX))
            })?;
            if ids.insert(token.clone(), id).is_some() {
                return Err(TokenizerError::InvalidVocabulary(format!(
                    "duplicate token '{token}' at position {i}"
                )));
            }
        }

        let unknown_id = *ids.get(&special.unknown).ok_or_else(|| {
            TokenizerError::MissingSpecialToken {
                role: "unknown",
                token: special.unknown.clone(),
            }
        })?;

        Ok(Self {
            ids,
            tokens,
            special,
            unknown_id,
        })
    }

    /// Parse a Chemformer-style vocabulary document.
    ///
    /// Both `vocabulary` and `properties` must be present. Missing special
    /// token entries fall back to `^`, `$`, `<PAD>`, `?`.
    pub fn from_chemformer_json(value: &Value) -> Result<Self, TokenizerError> {
        let (Some(vocabulary), Some(properties)) =
            (value.get("vocabulary"), value.get("properties"))
        else {
            return Err(TokenizerError::InvalidVocabulary(
                "Vocab file does not have the right Chemformer-specific format \
                 (expected 'vocabulary' and 'properties' keys)"
                    .into(),
            ));
        };

        let tokens: Vec<String> = serde_json::from_value(vocabulary.clone()).map_err(|e| {
            TokenizerError::InvalidVocabulary(format!("'vocabulary' must be a list of strings: {e}"))
        })?;

        let special = match properties.get("special_tokens") {
            Some(v) => serde_json::from_value::<SpecialTokens>(v.clone()).map_err(|e| {
                TokenizerError::InvalidVocabulary(format!("invalid 'special_tokens': {e}"))
            })?,
            None => SpecialTokens::default(),
        };

        Self::from_tokens(tokens, special)
    }

    /// Load a Chemformer-style JSON vocabulary file.
    pub fn from_chemformer_file(path: &Path) -> Result<Self, TokenizerError> {
        let content = read(path)?;
        let value: Value = serde_json::from_str(&content).map_err(|e| {
            TokenizerError::InvalidVocabulary(format!("{}: {e}", path.display()))
        })?;
        let vocab = Self::from_chemformer_json(&value)?;
        info!(path = %path.display(), tokens = vocab.len(), "Chemformer vocabulary loaded");
        Ok(vocab)
    }

    /// Load a plain-text token list (one token per line).
    ///
    /// Trailing `\r` is stripped; blank lines are tokens too, so a file with
    /// an empty line in the middle shifts every later id. Only a final
    /// newline is ignored.
    pub fn from_token_list_file(
        path: &Path,
        special: SpecialTokens,
    ) -> Result<Self, TokenizerError> {
        let content = read(path)?;
        let tokens = content.lines().map(|l| l.trim_end_matches('\r'));
        let vocab = Self::from_tokens(tokens, special)?;
        info!(path = %path.display(), tokens = vocab.len(), "Token list vocabulary loaded");
        Ok(vocab)
    }

    pub fn id(&self, token: &str) -> Option<u32> {
        self.ids.get(token).copied()
    }

    pub fn token(&self, id: u32) -> Option<&str> {
        self.tokens.get(id as usize).map(String::as_str)
    }

    pub fn len(&self) -> usize {
        self.tokens.len()
    }

    pub fn is_empty(&self) -> bool {
        self.tokens.is_empty()
    }

    pub fn special(&self) -> &SpecialTokens {
        &self.special
    }

    /// Always resolvable — checked at construction.
    pub fn unknown_id(&self) -> u32 {
        self.unknown_id
    }

    pub fn begin_id(&self) -> Option<u32> {
        self.id(&self.special.start)
    }

    pub fn end_id(&self) -> Option<u32> {
        self.id(&self.special.end)
    }

    pub fn pad_id(&self) -> Option<u32> {
        self.id(&self.special.pad)
    }
}

fn read(path: &Path) -> Result<String, TokenizerError> {
    debug!(path = %path.display(), "Reading vocabulary");
    std::fs::read_to_string(path).map_err(|e| TokenizerError::ReadFailed {
        path: path.display().to_string(),
        reason: e.to_string(),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn special_with_unknown(unknown: &str) -> SpecialTokens {
        SpecialTokens {
            unknown: unknown.into(),
            ..SpecialTokens::default()
        }
    }

    #[test]
    fn position_is_id() {
        let vocab = Vocabulary::from_tokens(["A", "B", "?"], special_with_unknown("?")).unwrap();
        assert_eq!(vocab.id("A"), Some(0));
        assert_eq!(vocab.id("B"), Some(1));
        assert_eq!(vocab.token(2), Some("?"));
        assert_eq!(vocab.unknown_id(), 2);
        assert_eq!(vocab.len(), 3);
    }

    #[test]
    fn duplicate_tokens_rejected() {
        let err = Vocabulary::from_tokens(["A", "A", "?"], SpecialTokens::default()).unwrap_err();
        assert!(matches!(err, TokenizerError::InvalidVocabulary(_)));
    }

    #[test]
    fn missing_unknown_token_rejected() {
        let err = Vocabulary::from_tokens(["A", "B"], SpecialTokens::default()).unwrap_err();
        assert!(matches!(
            err,
            TokenizerError::MissingSpecialToken { role: "unknown", .. }
        ));
    }

    #[test]
    fn chemformer_defaults_for_absent_special_tokens() {
        let doc = json!({
            "properties": {"special_tokens": {"pad": "<pad>"}},
            "vocabulary": ["<pad>", "?", "^", "$", "C"]
        });
        let vocab = Vocabulary::from_chemformer_json(&doc).unwrap();
        assert_eq!(vocab.special().pad, "<pad>");
        assert_eq!(vocab.special().start, "^");
        assert_eq!(vocab.special().end, "$");
        assert_eq!(vocab.pad_id(), Some(0));
        assert_eq!(vocab.begin_id(), Some(2));
        assert_eq!(vocab.end_id(), Some(3));
    }

    #[test]
    fn chemformer_without_special_tokens_key() {
        let doc = json!({"properties": {}, "vocabulary": ["?", "C"]});
        let vocab = Vocabulary::from_chemformer_json(&doc).unwrap();
        assert_eq!(vocab.special(), &SpecialTokens::default());
        assert_eq!(vocab.pad_id(), None);
    }

    #[test]
    fn chemformer_missing_top_level_keys() {
        let no_props = json!({"vocabulary": ["?"]});
        let no_vocab = json!({"properties": {}});
        assert!(matches!(
            Vocabulary::from_chemformer_json(&no_props),
            Err(TokenizerError::InvalidVocabulary(_))
        ));
        assert!(matches!(
            Vocabulary::from_chemformer_json(&no_vocab),
            Err(TokenizerError::InvalidVocabulary(_))
        ));
    }

    #[test]
    fn chemformer_vocabulary_must_be_strings() {
        let doc = json!({"properties": {}, "vocabulary": ["?", 3]});
        assert!(Vocabulary::from_chemformer_json(&doc).is_err());
    }

    #[test]
    fn token_list_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("vocab.txt");
        std::fs::write(&path, "<PAD>\r\n?\nC\nO\n").unwrap();
        let vocab = Vocabulary::from_token_list_file(&path, SpecialTokens::default()).unwrap();
        assert_eq!(vocab.len(), 4);
        assert_eq!(vocab.pad_id(), Some(0));
        assert_eq!(vocab.id("O"), Some(3));
    }

    #[test]
    fn missing_file_is_read_error() {
        let err = Vocabulary::from_chemformer_file(Path::new("/nonexistent/vocab.json")).unwrap_err();
        assert!(matches!(err, TokenizerError::ReadFailed { .. }));
    }
}
