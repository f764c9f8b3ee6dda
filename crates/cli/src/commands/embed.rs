//! `rxnrag embed` — Embedding vectors for SMILES strings.

use std::path::Path;

use rxnrag_core::SmilesBatch;
use rxnrag_pipeline::embedder_from_config;

use super::load_config;

pub fn run(config: Option<&Path>, batch: SmilesBatch) -> Result<(), Box<dyn std::error::Error>> {
    let config = load_config(config)?;
    let embedder = embedder_from_config(&config)?;

    for row in embedder.embed(&batch.into_vec())? {
        println!("{}", serde_json::to_string(&row)?);
    }
    Ok(())
}
