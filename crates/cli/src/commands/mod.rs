pub mod config_cmd;
pub mod embed;
pub mod index;
pub mod prompt;
pub mod search;
pub mod tokenize;

use std::path::Path;

use rxnrag_config::AppConfig;
use rxnrag_core::SmilesBatch;
use serde_json::Value;

/// `--config` if given, else the default path; env overrides apply either way.
pub fn load_config(path: Option<&Path>) -> Result<AppConfig, Box<dyn std::error::Error>> {
    let config = match path {
        Some(path) => AppConfig::load_with_env(path),
        None => AppConfig::load(),
    };
    config.map_err(|e| format!("Failed to load config: {e}").into())
}

/// Positional SMILES as a batch. With `json`, every argument is a JSON
/// string or array of strings and the results are concatenated in order.
pub fn smiles_batch(args: &[String], json: bool) -> Result<SmilesBatch, Box<dyn std::error::Error>> {
    if !json {
        return Ok(SmilesBatch::from(args.to_vec()));
    }
    let mut smiles = Vec::new();
    for arg in args {
        let value: Value =
            serde_json::from_str(arg).map_err(|e| format!("Invalid JSON input '{arg}': {e}"))?;
        smiles.extend(SmilesBatch::try_from(&value)?.into_vec());
    }
    Ok(SmilesBatch::from(smiles))
}
