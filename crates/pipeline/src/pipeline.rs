use rxnrag_config::AppConfig;
use rxnrag_core::{Direction, Neighbor, PromptVariant, Result, RetrievalError};
use rxnrag_embedder::{PooledEmbeddingModel, SmilesEmbedder, resolve_device};
use rxnrag_prompt::{ReactionPrompt, ReactionTable, SupportExample, TableRow};
use rxnrag_retriever::ReactionRetriever;
use rxnrag_tokenizer::SmilesTokenizer;
use tracing::{debug, info, warn};

use crate::tokenizer::ConfiguredTokenizer;

/// Record field holding a stored expert-model prediction.
pub const EXPERT_PREDICTION_FIELD: &str = "expert_prediction";

/// What the caller knows about the reaction to predict.
#[derive(Debug, Clone, Default)]
pub struct PromptRequest {
    /// Query SMILES: reactants for forward, products for backward.
    pub input: String,
    /// Expert-model predictions for the query, best first.
    pub expert_predictions: Vec<String>,
    /// Curated support examples; derived from neighbors when absent.
    pub support_examples: Option<Vec<SupportExample>>,
}

impl PromptRequest {
    pub fn new(input: impl Into<String>) -> Self {
        Self {
            input: input.into(),
            ..Default::default()
        }
    }

    pub fn with_expert_predictions(mut self, predictions: Vec<String>) -> Self {
        self.expert_predictions = predictions;
        self
    }

    pub fn with_support_examples(mut self, examples: Vec<SupportExample>) -> Self {
        self.support_examples = Some(examples);
        self
    }
}

/// Embedder + retriever + prompt template.
pub struct RagPipeline<T: SmilesTokenizer> {
    embedder: SmilesEmbedder<T>,
    retriever: ReactionRetriever,
    variant: PromptVariant,
    direction: Direction,
    top_k: usize,
}

/// Tokenizer, device and model from configuration.
pub fn embedder_from_config(config: &AppConfig) -> Result<SmilesEmbedder<ConfiguredTokenizer>> {
    let tokenizer = ConfiguredTokenizer::from_config(&config.tokenizer)?;
    let device = resolve_device(config.embedder.device)?;
    let model = PooledEmbeddingModel::load(&config.embedder.model_path, &device)?;
    Ok(SmilesEmbedder::new(tokenizer, model)?.with_max_seq_len(config.embedder.max_seq_len))
}

/// Whether `variant` is filled from retrieved neighbors.
pub fn uses_retrieval(variant: PromptVariant) -> bool {
    matches!(
        variant,
        PromptVariant::Rag | PromptVariant::RagV2 | PromptVariant::RagV3 | PromptVariant::RagV4
    )
}

/// The prompt with only the request's own data filled in.
///
/// Complete for variants where [`uses_retrieval`] is false.
pub fn standalone_prompt(
    variant: PromptVariant,
    direction: Direction,
    request: &PromptRequest,
) -> ReactionPrompt {
    let mut prompt = ReactionPrompt::new(variant, direction);
    match variant {
        PromptVariant::ExpertOnly | PromptVariant::CopyExpert => {
            prompt.set_input_data(input_with_experts(request));
        }
        _ => {
            prompt.set_input_data(request.input.as_str());
        }
    }
    prompt
}

impl RagPipeline<ConfiguredTokenizer> {
    /// Load every component from configured files.
    pub fn from_config(config: &AppConfig) -> Result<Self> {
        let embedder = embedder_from_config(config)?;
        let retriever = ReactionRetriever::from_config(&config.retriever)?;

        let pipeline = Self::new(
            embedder,
            retriever,
            config.prompt.variant,
            config.prompt.direction,
            config.retriever.top_k,
        )?;
        info!(
            variant = %pipeline.variant,
            direction = %pipeline.direction,
            top_k = pipeline.top_k,
            "RAG pipeline ready"
        );
        Ok(pipeline)
    }
}

impl<T: SmilesTokenizer> RagPipeline<T> {
    /// Fails when embedder and index disagree on the vector dimension.
    pub fn new(
        embedder: SmilesEmbedder<T>,
        retriever: ReactionRetriever,
        variant: PromptVariant,
        direction: Direction,
        top_k: usize,
    ) -> Result<Self> {
        if embedder.dimension() != retriever.dimension() {
            return Err(RetrievalError::DimensionMismatch {
                expected: retriever.dimension(),
                actual: embedder.dimension(),
            }
            .into());
        }
        Ok(Self {
            embedder,
            retriever,
            variant,
            direction,
            top_k,
        })
    }

    pub fn embedder(&self) -> &SmilesEmbedder<T> {
        &self.embedder
    }

    pub fn retriever(&self) -> &ReactionRetriever {
        &self.retriever
    }

    pub fn variant(&self) -> PromptVariant {
        self.variant
    }

    pub fn direction(&self) -> Direction {
        self.direction
    }

    pub fn top_k(&self) -> usize {
        self.top_k
    }

    /// Embed `smiles` and return the `k` nearest records for each.
    pub fn retrieve<S: AsRef<str>>(&self, smiles: &[S], k: usize) -> Result<Vec<Vec<Neighbor>>> {
        let embeddings = self.embedder.embed(smiles)?;
        Ok(self.retriever.search(&embeddings, k)?)
    }

    /// Build the configured variant's prompt for one query.
    pub fn build_prompt(&self, request: &PromptRequest) -> Result<ReactionPrompt> {
        let mut prompt = standalone_prompt(self.variant, self.direction, request);

        match self.variant {
            PromptVariant::Base | PromptVariant::ExpertOnly | PromptVariant::CopyExpert => {}
            PromptVariant::Rag => {
                let neighbors = self.neighbors_of(&request.input)?;
                prompt.set_similar_reactions(&neighbors)?;
            }
            PromptVariant::RagV2 => {
                let examples = match &request.support_examples {
                    Some(examples) => examples.clone(),
                    None => self.support_from_neighbors(&self.neighbors_of(&request.input)?),
                };
                prompt
                    .set_expert_predictions(request.expert_predictions.as_slice())?
                    .set_support_examples(&examples)?;
            }
            PromptVariant::RagV3 | PromptVariant::RagV4 => {
                let neighbors = self.neighbors_of(&request.input)?;
                let table = self.table_from_neighbors(request, &neighbors);
                prompt.set_table(&table)?;
            }
        }

        debug!(variant = %self.variant, sections = prompt.sections().count(), "Built prompt");
        Ok(prompt)
    }

    fn neighbors_of(&self, input: &str) -> Result<Vec<Neighbor>> {
        Ok(self
            .retrieve(&[input], self.top_k)?
            .into_iter()
            .next()
            .unwrap_or_default())
    }

    /// One example per neighbor that stores input, outcome and expert fields.
    fn support_from_neighbors(&self, neighbors: &[Neighbor]) -> Vec<SupportExample> {
        neighbors
            .iter()
            .filter_map(|n| {
                let (input, truth, expert) = self.fields_of(n)?;
                Some(SupportExample {
                    input: input.to_string(),
                    ground_truth: truth.to_string(),
                    expert_prediction: expert.to_string(),
                })
            })
            .collect()
    }

    /// Neighbor rows first, then the masked query row.
    fn table_from_neighbors(&self, request: &PromptRequest, neighbors: &[Neighbor]) -> ReactionTable {
        let mut table = ReactionTable::new(self.direction)
            .with_distance(self.variant == PromptVariant::RagV4);
        for neighbor in neighbors {
            if let Some((input, truth, expert)) = self.fields_of(neighbor) {
                table.push(TableRow {
                    input: input.to_string(),
                    ground_truth: Some(truth.to_string()),
                    expert_prediction: expert.to_string(),
                    distance: neighbor.distance,
                });
            }
        }
        table.push(TableRow {
            input: request.input.clone(),
            ground_truth: None,
            expert_prediction: request.expert_predictions.first().cloned().unwrap_or_default(),
            distance: 0.0,
        });
        table
    }

    fn fields_of<'n>(&self, neighbor: &'n Neighbor) -> Option<(&'n str, &'n str, &'n str)> {
        let record = &neighbor.record;
        let fields = (
            record.get_str(self.direction.input_role()),
            record.get_str(self.direction.output_role()),
            record.get_str(EXPERT_PREDICTION_FIELD),
        );
        match fields {
            (Some(input), Some(truth), Some(expert)) => Some((input, truth, expert)),
            _ => {
                warn!(row = neighbor.row, "Skipping neighbor without input, outcome or expert fields");
                None
            }
        }
    }
}

fn input_with_experts(request: &PromptRequest) -> String {
    if request.expert_predictions.is_empty() {
        return request.input.clone();
    }
    format!(
        "{}\n\nExpert predictions:\n{}",
        request.input,
        request.expert_predictions.join("\n")
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn only_rag_variants_use_retrieval() {
        let retrieving: Vec<_> = PromptVariant::ALL
            .into_iter()
            .filter(|v| uses_retrieval(*v))
            .collect();
        assert_eq!(
            retrieving,
            vec![
                PromptVariant::Rag,
                PromptVariant::RagV2,
                PromptVariant::RagV3,
                PromptVariant::RagV4
            ]
        );
    }

    #[test]
    fn copy_expert_lists_predictions_after_input() {
        let request = PromptRequest::new("CCO")
            .with_expert_predictions(vec!["CC=O".into(), "CCOC".into()]);
        let prompt = standalone_prompt(PromptVariant::CopyExpert, Direction::Forward, &request);
        assert_eq!(
            prompt.section("input_data"),
            Some("CCO\n\nExpert predictions:\nCC=O\nCCOC")
        );
    }

    #[test]
    fn base_prompt_ignores_expert_predictions() {
        let request = PromptRequest::new("CCO").with_expert_predictions(vec!["CC=O".into()]);
        let prompt = standalone_prompt(PromptVariant::Base, Direction::Backward, &request);
        assert_eq!(prompt.section("input_data"), Some("CCO"));
    }
}
