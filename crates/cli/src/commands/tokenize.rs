//! `rxnrag tokenize` — Tokens and ids for SMILES strings.

use std::path::Path;

use rxnrag_core::SmilesBatch;
use rxnrag_pipeline::ConfiguredTokenizer;
use rxnrag_tokenizer::SmilesTokenizer;
use serde_json::json;

use super::load_config;

pub fn run(config: Option<&Path>, batch: SmilesBatch) -> Result<(), Box<dyn std::error::Error>> {
    let config = load_config(config)?;
    let tokenizer = ConfiguredTokenizer::from_config(&config.tokenizer)?;

    let smiles = batch.into_vec();
    let ids = tokenizer.encode_input(smiles.clone());
    for (s, ids) in smiles.iter().zip(ids) {
        let line = json!({
            "smiles": s,
            "tokens": tokenizer.tokenize(s),
            "ids": ids,
        });
        println!("{line}");
    }
    Ok(())
}
