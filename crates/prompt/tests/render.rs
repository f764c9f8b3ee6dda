//! Full rendered prompts.

use rxnrag_core::{Direction, Neighbor, PromptVariant, ReactionRecord};
use rxnrag_prompt::ReactionPrompt;
use serde_json::json;

#[test]
fn base_forward_prompt_renders_exactly() {
    let mut prompt = ReactionPrompt::new(PromptVariant::Base, Direction::Forward);
    prompt.set_input_data("CC(=O)O.OCC");

    let expected = "[ROLE]\n\
You are an expert chemist.\n\n\
[TASK]\n\
Forward synthesis prediction\n\n\
[INSTRUCTION]\n\
Given the input data in [INPUT DATA], perform your task and make your prediction, which must follow [OUTPUT FORMAT].\n\n\
[OUTPUT FORMAT]\n\
A single line of JSON string formatted as:\n\
{\"products\": [...]},\n\
where [...] is a list of SMILES strings.\n\n\
[INPUT DATA]\n\
CC(=O)O.OCC\n\n";
    assert_eq!(prompt.render(), expected);
}

#[test]
fn rag_prompt_lists_neighbors_in_retrieval_order() {
    let neighbors = vec![
        Neighbor {
            distance: 0.02,
            row: 7,
            record: ReactionRecord::new(json!({"reactants": "CCO", "products": "CC=O"})),
        },
        Neighbor {
            distance: 0.30,
            row: 1,
            record: ReactionRecord::new(json!({"reactants": "CCCO", "products": "CCC=O"})),
        },
    ];
    let mut prompt = ReactionPrompt::new(PromptVariant::Rag, Direction::Forward);
    prompt
        .set_input_data("OCC")
        .set_similar_reactions(&neighbors)
        .unwrap();

    let text = prompt.render();
    let section = text.split("[SIMILAR REACTIONS]\n").nth(1).unwrap();
    let lines: Vec<&str> = section.trim_end().lines().collect();
    assert_eq!(lines.len(), 2);
    assert!(lines[0].contains("\"CCO\""));
    assert!(lines[1].contains("\"CCCO\""));
    assert!(text.find("[INPUT DATA]").unwrap() < text.find("[SIMILAR REACTIONS]").unwrap());
}

#[test]
fn backward_prompt_uses_retro_fields() {
    let prompt = ReactionPrompt::new(PromptVariant::ExpertOnly, Direction::Backward);
    let text = prompt.to_string();
    assert!(text.contains("[TASK]\nRetrosynthesis prediction\n\n"));
    assert!(text.contains(r#"{"reactants": [...], "agents": [...], "solvents": [...]}"#));
    assert!(text.contains("3 to 5 alternative predictions"));
}
