//! Uniform batch input for tokenizer and embedder calls.
//!
//! Callers may hand over either one SMILES string or a list of them; both
//! become a batch so downstream code only ever sees lists.

use serde_json::Value;

use crate::error::TokenizerError;

/// One or more SMILES strings, always treated as a batch.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SmilesBatch {
    /// A single string, implicitly a batch of one.
    Single(String),
    /// An ordered list of strings.
    Many(Vec<String>),
}

impl SmilesBatch {
    /// Flatten into an ordered list.
    pub fn into_vec(self) -> Vec<String> {
        match self {
            Self::Single(s) => vec![s],
            Self::Many(v) => v,
        }
    }

    pub fn len(&self) -> usize {
        match self {
            Self::Single(_) => 1,
            Self::Many(v) => v.len(),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

impl From<&str> for SmilesBatch {
    fn from(s: &str) -> Self {
        Self::Single(s.to_string())
    }
}

impl From<String> for SmilesBatch {
    fn from(s: String) -> Self {
        Self::Single(s)
    }
}

impl From<Vec<String>> for SmilesBatch {
    fn from(v: Vec<String>) -> Self {
        Self::Many(v)
    }
}

impl From<&[&str]> for SmilesBatch {
    fn from(v: &[&str]) -> Self {
        Self::Many(v.iter().map(|s| s.to_string()).collect())
    }
}

impl TryFrom<&Value> for SmilesBatch {
    type Error = TokenizerError;

    /// Accepts a JSON string or an array of strings; anything else is a usage error.
    fn try_from(value: &Value) -> Result<Self, Self::Error> {
        match value {
            Value::String(s) => Ok(Self::Single(s.clone())),
            Value::Array(items) => items
                .iter()
                .map(|item| {
                    item.as_str()
                        .map(str::to_string)
                        .ok_or_else(|| TokenizerError::InvalidInput(item.to_string()))
                })
                .collect::<Result<Vec<_>, _>>()
                .map(Self::Many),
            other => Err(TokenizerError::InvalidInput(other.to_string())),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn single_string_becomes_batch_of_one() {
        let batch = SmilesBatch::from("CCO");
        assert_eq!(batch.len(), 1);
        assert_eq!(batch.into_vec(), vec!["CCO".to_string()]);
    }

    #[test]
    fn json_list_preserves_order() {
        let batch = SmilesBatch::try_from(&json!(["CCO", "c1ccccc1"])).unwrap();
        assert_eq!(batch.into_vec(), vec!["CCO", "c1ccccc1"]);
    }

    #[test]
    fn json_number_is_rejected() {
        let err = SmilesBatch::try_from(&json!(42)).unwrap_err();
        assert!(err.to_string().contains("42"));
    }

    #[test]
    fn json_list_with_non_string_is_rejected() {
        assert!(SmilesBatch::try_from(&json!(["CCO", 1])).is_err());
    }
}
