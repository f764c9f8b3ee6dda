//! Render retrieval results and expert data as section bodies.

use rxnrag_core::{Direction, Neighbor, PromptError};
use serde::{Deserialize, Serialize};

/// Masked ground-truth cell.
pub const MASK: &str = "?";

/// One compact JSON record per line, nearest first.
pub fn format_similar_reactions(neighbors: &[Neighbor]) -> String {
    neighbors
        .iter()
        .map(|n| n.record.to_compact_string())
        .collect::<Vec<_>>()
        .join("\n")
}

/// A retrieved reaction with its true outcome and the expert model's guess.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SupportExample {
    pub input: String,
    pub ground_truth: String,
    pub expert_prediction: String,
}

/// Three tab-separated columns per example.
pub fn format_support_examples(examples: &[SupportExample]) -> String {
    examples
        .iter()
        .map(|e| format!("{}\t{}\t{}", e.input, e.ground_truth, e.expert_prediction))
        .collect::<Vec<_>>()
        .join("\n")
}

/// A row of the masked-cell table. `ground_truth: None` is the masked row.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TableRow {
    pub input: String,
    pub ground_truth: Option<String>,
    pub expert_prediction: String,
    /// Distance to the masked row's input; shown only in the distance column.
    #[serde(default)]
    pub distance: f32,
}

/// Rows of (input, ground truth, expert prediction[, neighbor distance]).
#[derive(Debug, Clone, PartialEq)]
pub struct ReactionTable {
    direction: Direction,
    with_distance: bool,
    rows: Vec<TableRow>,
}

impl ReactionTable {
    pub fn new(direction: Direction) -> Self {
        Self {
            direction,
            with_distance: false,
            rows: Vec::new(),
        }
    }

    /// Add the neighbor distance column.
    pub fn with_distance(mut self, with_distance: bool) -> Self {
        self.with_distance = with_distance;
        self
    }

    pub fn push(&mut self, row: TableRow) -> &mut Self {
        self.rows.push(row);
        self
    }

    pub fn rows(&self) -> &[TableRow] {
        &self.rows
    }

    pub fn has_distance(&self) -> bool {
        self.with_distance
    }

    /// Header line then one `|`-separated line per row.
    ///
    /// Exactly one row must be masked.
    pub fn render(&self) -> Result<String, PromptError> {
        let masked = self.rows.iter().filter(|r| r.ground_truth.is_none()).count();
        if masked != 1 {
            return Err(PromptError::InvalidTable(format!(
                "expected exactly one masked row, found {masked}"
            )));
        }

        let input = self.direction.input_role();
        let output = self.direction.output_role();
        let mut out = format!("{input} | ground truth {output} | expert {output}");
        if self.with_distance {
            out.push_str(" | neighbor distance");
        }
        for row in &self.rows {
            let truth = row.ground_truth.as_deref().unwrap_or(MASK);
            out.push_str(&format!("\n{} | {} | {}", row.input, truth, row.expert_prediction));
            if self.with_distance {
                out.push_str(&format!(" | {:.4}", row.distance));
            }
        }
        Ok(out)
    }
}
