use std::fmt;

use rxnrag_core::{Direction, Neighbor, PromptError, PromptVariant};

use crate::format::{ReactionTable, SupportExample, format_similar_reactions, format_support_examples};
use crate::templates::{self, EXPERT_PREDICTIONS, INPUT_DATA, SIMILAR_REACTIONS, SUPPORT_EXAMPLES};

/// A named prompt section. Names are snake_case; headers render them
/// uppercased with spaces.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Section {
    pub name: String,
    pub body: String,
}

impl Section {
    fn new(name: &str, body: String) -> Self {
        Self {
            name: name.to_string(),
            body,
        }
    }

    /// `[SIMILAR REACTIONS]` for `similar_reactions`.
    pub fn header(&self) -> String {
        format!("[{}]", self.name.replace('_', " ").to_uppercase())
    }
}

/// An ordered set of sections for one variant and direction.
///
/// Sections keep insertion order: the base sections first, then the
/// variant's placeholders. Setters only replace bodies, never reorder.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ReactionPrompt {
    variant: PromptVariant,
    direction: Direction,
    sections: Vec<Section>,
}

impl ReactionPrompt {
    pub fn new(variant: PromptVariant, direction: Direction) -> Self {
        let mut sections = vec![
            Section::new(templates::ROLE, templates::role()),
            Section::new(templates::TASK, templates::task(direction)),
            Section::new(templates::INSTRUCTION, templates::instruction(variant, direction)),
            Section::new(templates::OUTPUT_FORMAT, templates::output_format(direction)),
            Section::new(INPUT_DATA, String::new()),
        ];
        sections.extend(
            templates::extra_sections(variant)
                .iter()
                .map(|name| Section::new(name, String::new())),
        );
        Self {
            variant,
            direction,
            sections,
        }
    }

    pub fn variant(&self) -> PromptVariant {
        self.variant
    }

    pub fn direction(&self) -> Direction {
        self.direction
    }

    pub fn sections(&self) -> impl Iterator<Item = &Section> {
        self.sections.iter()
    }

    /// Body of `name`; accepts `similar_reactions` or `similar reactions`.
    pub fn section(&self, name: &str) -> Option<&str> {
        let key = normalize(name);
        self.sections
            .iter()
            .find(|s| s.name == key)
            .map(|s| s.body.as_str())
    }

    /// Replace the body of an existing section.
    pub fn set_section(
        &mut self,
        name: &str,
        body: impl Into<String>,
    ) -> Result<&mut Self, PromptError> {
        let key = normalize(name);
        let Some(section) = self.sections.iter_mut().find(|s| s.name == key) else {
            return Err(PromptError::UnknownSection {
                variant: self.variant.to_string(),
                section: key,
            });
        };
        section.body = body.into();
        Ok(self)
    }

    pub fn set_input_data(&mut self, body: impl Into<String>) -> &mut Self {
        if let Some(section) = self.sections.iter_mut().find(|s| s.name == INPUT_DATA) {
            section.body = body.into();
        }
        self
    }

    /// Fill `similar_reactions` with one record per line.
    pub fn set_similar_reactions(&mut self, neighbors: &[Neighbor]) -> Result<&mut Self, PromptError> {
        self.set_section(SIMILAR_REACTIONS, format_similar_reactions(neighbors))
    }

    /// Fill `expert_predictions` with one prediction per line.
    pub fn set_expert_predictions<S: AsRef<str>>(
        &mut self,
        predictions: &[S],
    ) -> Result<&mut Self, PromptError> {
        let body = predictions
            .iter()
            .map(AsRef::as_ref)
            .collect::<Vec<&str>>()
            .join("\n");
        self.set_section(EXPERT_PREDICTIONS, body)
    }

    pub fn set_support_examples(
        &mut self,
        examples: &[SupportExample],
    ) -> Result<&mut Self, PromptError> {
        self.set_section(SUPPORT_EXAMPLES, format_support_examples(examples))
    }

    /// Put a masked-cell table into the input data. Only the table
    /// variants take one, and v4 needs the distance column.
    pub fn set_table(&mut self, table: &ReactionTable) -> Result<&mut Self, PromptError> {
        let wants_distance = match self.variant {
            PromptVariant::RagV3 => false,
            PromptVariant::RagV4 => true,
            other => {
                return Err(PromptError::InvalidTable(format!(
                    "variant '{other}' does not take a table"
                )));
            }
        };
        if table.has_distance() != wants_distance {
            return Err(PromptError::InvalidTable(format!(
                "variant '{}' {} a neighbor distance column",
                self.variant,
                if wants_distance { "requires" } else { "does not use" }
            )));
        }
        let body = table.render()?;
        Ok(self.set_input_data(body))
    }

    /// `[HEADER]\nbody\n\n` for every section, in order.
    pub fn render(&self) -> String {
        self.sections
            .iter()
            .map(|s| format!("{}\n{}\n\n", s.header(), s.body))
            .collect()
    }
}

impl fmt::Display for ReactionPrompt {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.render())
    }
}

fn normalize(name: &str) -> String {
    name.trim().to_lowercase().replace(' ', "_")
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::format::TableRow;

    fn names(prompt: &ReactionPrompt) -> Vec<&str> {
        prompt.sections().map(|s| s.name.as_str()).collect()
    }

    #[test]
    fn base_forward_section_order_and_task() {
        let p = ReactionPrompt::new(PromptVariant::Base, Direction::Forward);
        assert_eq!(
            names(&p),
            vec!["role", "task", "instruction", "output_format", "input_data"]
        );
        assert_eq!(p.section("task"), Some("Forward synthesis prediction"));
        assert_eq!(p.section("role"), Some("You are an expert chemist."));
    }

    #[test]
    fn backward_task_label() {
        let p = ReactionPrompt::new(PromptVariant::Base, Direction::Backward);
        assert_eq!(p.section("task"), Some("Retrosynthesis prediction"));
    }

    #[test]
    fn rag_v2_backward_has_empty_placeholders_after_output_format() {
        let p = ReactionPrompt::new(PromptVariant::RagV2, Direction::Backward);
        let order = names(&p);
        let output_format = order.iter().position(|n| *n == "output_format").unwrap();
        let expert = order.iter().position(|n| *n == "expert_predictions").unwrap();
        let support = order.iter().position(|n| *n == "support_examples").unwrap();
        assert!(expert > output_format);
        assert!(support > expert);
        assert_eq!(p.section("expert predictions"), Some(""));
        assert_eq!(p.section("support examples"), Some(""));

        let text = p.render();
        assert!(text.contains("[EXPERT PREDICTIONS]\n\n\n"));
        assert!(text.contains("[SUPPORT EXAMPLES]\n\n\n"));
    }

    #[test]
    fn rag_appends_similar_reactions_last() {
        let p = ReactionPrompt::new(PromptVariant::Rag, Direction::Forward);
        assert_eq!(names(&p).last(), Some(&"similar_reactions"));
    }

    #[test]
    fn variants_without_placeholders_keep_base_sections() {
        for variant in [
            PromptVariant::Base,
            PromptVariant::ExpertOnly,
            PromptVariant::CopyExpert,
            PromptVariant::RagV3,
            PromptVariant::RagV4,
        ] {
            assert_eq!(ReactionPrompt::new(variant, Direction::Forward).sections().count(), 5);
        }
    }

    #[test]
    fn render_format_and_idempotence() {
        let mut p = ReactionPrompt::new(PromptVariant::Base, Direction::Forward);
        p.set_input_data("CCO.O=C=O");
        let first = p.render();
        let second = p.render();
        assert_eq!(first, second);
        assert_eq!(first, p.to_string());
        assert!(first.starts_with("[ROLE]\nYou are an expert chemist.\n\n[TASK]\n"));
        assert!(first.ends_with("[INPUT DATA]\nCCO.O=C=O\n\n"));
        assert!(first.contains("[OUTPUT FORMAT]\n"));
    }

    #[test]
    fn setting_undefined_section_is_error() {
        let mut p = ReactionPrompt::new(PromptVariant::Base, Direction::Forward);
        let err = p.set_similar_reactions(&[]).unwrap_err();
        assert!(matches!(
            err,
            PromptError::UnknownSection { ref section, .. } if section == "similar_reactions"
        ));
        assert!(p.set_section("data table", "x").is_err());
    }

    #[test]
    fn setters_replace_bodies_in_place() {
        let mut p = ReactionPrompt::new(PromptVariant::RagV2, Direction::Forward);
        p.set_expert_predictions(&["CC=O", "CCO"])
            .unwrap()
            .set_support_examples(&[SupportExample {
                input: "CCN".into(),
                ground_truth: "CC=N".into(),
                expert_prediction: "CCN".into(),
            }])
            .unwrap()
            .set_input_data("CCO");
        assert_eq!(p.section("expert_predictions"), Some("CC=O\nCCO"));
        assert_eq!(p.section("support_examples"), Some("CCN\tCC=N\tCCN"));
        assert_eq!(p.sections().count(), 7);
    }

    #[test]
    fn table_goes_into_input_data_for_table_variants() {
        let mut table = ReactionTable::new(Direction::Forward);
        table.push(TableRow {
            input: "CCO".into(),
            ground_truth: None,
            expert_prediction: "CC=O".into(),
            distance: 0.0,
        });

        let mut v3 = ReactionPrompt::new(PromptVariant::RagV3, Direction::Forward);
        v3.set_table(&table).unwrap();
        assert!(v3.section("input_data").unwrap().contains("CCO | ? | CC=O"));

        let mut v4 = ReactionPrompt::new(PromptVariant::RagV4, Direction::Forward);
        assert!(matches!(v4.set_table(&table), Err(PromptError::InvalidTable(_))));
        v4.set_table(&table.clone().with_distance(true)).unwrap();

        let mut rag = ReactionPrompt::new(PromptVariant::Rag, Direction::Forward);
        assert!(rag.set_table(&table).is_err());
    }
}
