//! `rxnrag search` — Nearest stored reactions for one query.

use std::path::Path;

use rxnrag_pipeline::RagPipeline;
use serde_json::json;

use super::load_config;

pub fn run(
    config: Option<&Path>,
    smiles: &str,
    k: Option<usize>,
) -> Result<(), Box<dyn std::error::Error>> {
    let config = load_config(config)?;
    let pipeline = RagPipeline::from_config(&config)?;
    let k = k.unwrap_or(pipeline.top_k());

    let neighbors = pipeline.retrieve(&[smiles], k)?.into_iter().next().unwrap_or_default();
    for n in neighbors {
        let line = json!({
            "distance": n.distance,
            "row": n.row,
            "record": n.record.as_value(),
        });
        println!("{line}");
    }
    Ok(())
}
