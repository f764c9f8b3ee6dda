//! `rxnrag prompt` — Build and print a prompt for one query.

use std::path::{Path, PathBuf};

use rxnrag_core::{Direction, PromptVariant};
use rxnrag_pipeline::{PromptRequest, RagPipeline, standalone_prompt, uses_retrieval};
use rxnrag_prompt::SupportExample;
use tracing::debug;

use super::load_config;

pub struct PromptArgs {
    pub input: String,
    pub variant: Option<PromptVariant>,
    pub direction: Option<Direction>,
    pub experts: Vec<String>,
    pub support: Option<PathBuf>,
}

pub fn run(config: Option<&Path>, args: PromptArgs) -> Result<(), Box<dyn std::error::Error>> {
    let mut config = load_config(config)?;
    if let Some(variant) = args.variant {
        config.prompt.variant = variant;
    }
    if let Some(direction) = args.direction {
        config.prompt.direction = direction;
    }

    let mut request = PromptRequest::new(args.input).with_expert_predictions(args.experts);
    if let Some(path) = &args.support {
        request = request.with_support_examples(read_support(path)?);
    }

    let prompt = if uses_retrieval(config.prompt.variant) {
        RagPipeline::from_config(&config)?.build_prompt(&request)?
    } else {
        debug!(variant = %config.prompt.variant, "Variant needs no retrieval, skipping model load");
        standalone_prompt(config.prompt.variant, config.prompt.direction, &request)
    };

    print!("{prompt}");
    Ok(())
}

fn read_support(path: &Path) -> Result<Vec<SupportExample>, Box<dyn std::error::Error>> {
    let content = std::fs::read_to_string(path)
        .map_err(|e| format!("Failed to read {}: {e}", path.display()))?;
    let examples = serde_json::from_str(&content)
        .map_err(|e| format!("Invalid support examples in {}: {e}", path.display()))?;
    Ok(examples)
}
