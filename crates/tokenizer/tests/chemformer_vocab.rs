//! Tokenizers loaded from vocabulary files on disk.

use rxnrag_core::TokenizerError;
use rxnrag_tokenizer::{ChemformerTokenizer, SmilesTokenizer, VocabTokenizer};
use serde_json::json;
use std::path::PathBuf;

fn write_vocab(dir: &tempfile::TempDir, doc: serde_json::Value) -> PathBuf {
    let path = dir.path().join("vocab.json");
    std::fs::write(&path, serde_json::to_string_pretty(&doc).unwrap()).unwrap();
    path
}

fn chemformer_doc() -> serde_json::Value {
    json!({
        "properties": {
            "special_tokens": {
                "pad": "<PAD>",
                "unknown": "?",
                "start": "^",
                "end": "&"
            },
            "max_length": 512
        },
        "vocabulary": [
            "<PAD>", "?", "^", "&", "<MASK>", "<SEP>",
            "C", "c", "O", "N", "(", ")", "=", "1", "[nH]", "Cl", ">>"
        ]
    })
}

#[test]
fn chemformer_file_round_trip_with_custom_end_marker() {
    let dir = tempfile::tempdir().unwrap();
    let path = write_vocab(&dir, chemformer_doc());
    let tok = ChemformerTokenizer::from_file(&path).unwrap();

    let ids = tok.encode("c1cc[nH]c1Cl");
    assert_eq!(ids.first(), Some(&2));
    assert_eq!(ids.last(), Some(&3));
    assert_eq!(tok.decode(&ids), "^c1cc[nH]c1Cl&");
}

#[test]
fn plain_tokenizer_round_trip_equals_token_concatenation() {
    let dir = tempfile::tempdir().unwrap();
    let path = write_vocab(&dir, chemformer_doc());
    let tok = VocabTokenizer::from_chemformer_file(&path).unwrap();

    for smiles in ["CC(=O)O", "c1ccccc1", "CCO>>CC=O", "ClC(Cl)Cl"] {
        let expected: String = tok.tokenize(smiles).concat();
        assert_eq!(tok.decode(&tok.encode(smiles)), expected, "{smiles}");
    }
}

#[test]
fn wrapped_round_trip_adds_markers_around_tokens() {
    let dir = tempfile::tempdir().unwrap();
    let path = write_vocab(&dir, chemformer_doc());
    let tok = ChemformerTokenizer::from_file(&path).unwrap();

    let smiles = "N C(=O) c1ccccc1";
    let tokens: String = tok.tokenize(smiles).concat();
    assert_eq!(tok.decode(&tok.encode(smiles)), format!("^{tokens}&"));
}

#[test]
fn file_without_properties_fails_construction() {
    let dir = tempfile::tempdir().unwrap();
    let path = write_vocab(&dir, json!({"vocabulary": ["?", "C"]}));
    let err = ChemformerTokenizer::from_file(&path).unwrap_err();
    assert!(matches!(err, TokenizerError::InvalidVocabulary(_)));
}

#[test]
fn file_that_is_not_json_fails_construction() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("vocab.json");
    std::fs::write(&path, "not json").unwrap();
    assert!(VocabTokenizer::from_chemformer_file(&path).is_err());
}
