//! `rxnrag index` — Embedding matrix and HNSW index files.

use std::path::{Path, PathBuf};

use rxnrag_pipeline::embedder_from_config;
use rxnrag_retriever::{EmbeddingMatrix, HnswIndex, HnswOptions, RecordStore};
use tracing::info;

use super::load_config;

/// Embed `field` of every record, in file order, into a `.npy` matrix.
pub fn embed(
    config: Option<&Path>,
    field: Option<String>,
    out: Option<PathBuf>,
    batch_size: usize,
) -> Result<(), Box<dyn std::error::Error>> {
    let config = load_config(config)?;
    let field = field.unwrap_or_else(|| config.prompt.direction.input_role().to_string());
    let out = out.unwrap_or_else(|| config.retriever.embeddings_path.clone());

    let store = RecordStore::load(&config.retriever.data_path, config.retriever.record_format)?;
    let inputs = store
        .iter()
        .enumerate()
        .map(|(row, record)| {
            record
                .get_str(&field)
                .ok_or_else(|| format!("record {row} has no string field '{field}'"))
        })
        .collect::<Result<Vec<&str>, _>>()?;

    let embedder = embedder_from_config(&config)?;
    let mut rows = Vec::with_capacity(inputs.len());
    for chunk in inputs.chunks(batch_size.max(1)) {
        rows.extend(embedder.embed(chunk)?);
        info!(done = rows.len(), total = inputs.len(), "Embedding records");
    }

    let matrix = EmbeddingMatrix::from_rows(rows)?;
    matrix.write_npy(&out)?;
    println!(
        "✅ Wrote {} × {} embeddings to {}",
        matrix.rows(),
        matrix.dimension(),
        out.display()
    );
    Ok(())
}

/// Build an HNSW index over the configured matrix and save it to `out`.
pub fn build(config: Option<&Path>, out: &Path) -> Result<(), Box<dyn std::error::Error>> {
    let config = load_config(config)?;
    let matrix = EmbeddingMatrix::from_npy(&config.retriever.embeddings_path)?;
    let index = HnswIndex::build(&matrix, &HnswOptions::from(&config.retriever))?;
    index.save(out)?;
    println!("✅ Indexed {} rows into {}", matrix.rows(), out.display());
    Ok(())
}
