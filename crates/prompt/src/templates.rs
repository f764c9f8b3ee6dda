//! Fixed section text per variant and direction.

use rxnrag_core::{Direction, PromptVariant};

pub const ROLE: &str = "role";
pub const TASK: &str = "task";
pub const INSTRUCTION: &str = "instruction";
pub const OUTPUT_FORMAT: &str = "output_format";
pub const INPUT_DATA: &str = "input_data";
pub const SIMILAR_REACTIONS: &str = "similar_reactions";
pub const EXPERT_PREDICTIONS: &str = "expert_predictions";
pub const SUPPORT_EXAMPLES: &str = "support_examples";

const ROLE_TEXT: &str = "You are an expert chemist.";

const BASE_INSTRUCTION: &str = "Given the input data in [INPUT DATA], perform your task and make \
your prediction, which must follow [OUTPUT FORMAT].";

const RAG_INSTRUCTION: &str = "Given the input data in [INPUT DATA], a list of similar reactions \
is provided in [SIMILAR REACTIONS].\nConsider these similar reactions and make you prediction, \
which must follow [OUTPUT FORMAT].";

pub fn role() -> String {
    ROLE_TEXT.to_string()
}

pub fn task(direction: Direction) -> String {
    match direction {
        Direction::Forward => "Forward synthesis prediction",
        Direction::Backward => "Retrosynthesis prediction",
    }
    .to_string()
}

pub fn output_format(direction: Direction) -> String {
    let fields = match direction {
        Direction::Forward => r#"{"products": [...]}"#,
        Direction::Backward => r#"{"reactants": [...], "agents": [...], "solvents": [...]}"#,
    };
    format!("A single line of JSON string formatted as:\n{fields},\nwhere [...] is a list of SMILES strings.")
}

pub fn instruction(variant: PromptVariant, direction: Direction) -> String {
    let input = direction.input_role();
    let output = direction.output_role();
    match variant {
        PromptVariant::Base => BASE_INSTRUCTION.to_string(),
        PromptVariant::ExpertOnly => format!(
            "Given the input data in [INPUT DATA], which includes one prediction of the {output} \
             made by an expert chemical reaction model, propose 3 to 5 alternative predictions, \
             ordered from most to least likely.\n\
             The expert prediction may be wrong; use it as a hint together with your chemistry \
             expertise. Your prediction output must follow [OUTPUT FORMAT], with one list entry \
             per alternative."
        ),
        PromptVariant::CopyExpert => format!(
            "Given the input data in [INPUT DATA], which includes the {output} predicted by an \
             expert chemical reaction model, copy the expert predictions exactly as given, \
             without adding, removing or reordering any of them.\n\
             Your output must follow [OUTPUT FORMAT]."
        ),
        PromptVariant::Rag => RAG_INSTRUCTION.to_string(),
        PromptVariant::RagV2 => format!(
            "Given the input data in [INPUT DATA], a list of expert predictions is provided in \
             [EXPERT PREDICTIONS], and a list of support examples is provided in [SUPPORT EXAMPLES].\n\
             Each line in [EXPERT PREDICTIONS] is expert-predicted {output} for the input data based \
             on an expert chemical reaction model.\n\
             Each line in [SUPPORT EXAMPLES] consists of three columns:\n\
             (1) {input} similar to the input data, retrieved from a chemical reaction database,\n\
             (2) ground truth {output} for column (1), retrieved from the same database,\n\
             (3) expert-predicted {output} for column (1), based on the same expert model used in \
             [EXPERT PREDICTIONS].\n\
             Learn from the pattern in [SUPPORT EXAMPLES] to correct or improve [EXPERT PREDICTIONS]. \
             If none of the [EXPERT PREDICTIONS] are chemically plausible or consistent with the \
             learned patterns, construct a corrected or hybrid prediction guided by [SUPPORT EXAMPLES] \
             and your chemistry expertise, Your prediction output must follow [OUTPUT FORMAT]."
        ),
        PromptVariant::RagV3 => format!(
            "{}\n\
             Learn from the complete rows how the expert predictions relate to the ground truth, \
             then predict 3 to 5 candidates for the masked ground truth, most likely first. \
             Your prediction output must follow [OUTPUT FORMAT].",
            table_description(direction, false)
        ),
        PromptVariant::RagV4 => format!(
            "{}\n\
             Rows with a smaller neighbor distance are more similar to the masked row; weight them \
             more heavily. Learn from the complete rows how the expert predictions relate to the \
             ground truth, then predict 3 to 5 candidates for the masked ground truth, most likely \
             first. Your prediction output must follow [OUTPUT FORMAT].",
            table_description(direction, true)
        ),
    }
}

fn table_description(direction: Direction, with_distance: bool) -> String {
    let input = direction.input_role();
    let output = direction.output_role();
    let columns = if with_distance { "four" } else { "three" };
    let mut text = format!(
        "[INPUT DATA] is a table whose first line is a header and whose columns are separated by '|'. \
         It has {columns} columns:\n\
         (1) {input} of a reaction,\n\
         (2) ground truth {output} for column (1),\n\
         (3) {output} predicted for column (1) by an expert chemical reaction model,"
    );
    if with_distance {
        text.push_str(
            "\n(4) neighbor distance between the row's column (1) and the masked row's column (1).",
        );
    }
    text.push_str("\nIn exactly one row the ground truth is masked as '?'.");
    text
}

/// Placeholder sections a variant appends after the base ones.
pub fn extra_sections(variant: PromptVariant) -> &'static [&'static str] {
    match variant {
        PromptVariant::Rag => &[SIMILAR_REACTIONS],
        PromptVariant::RagV2 => &[EXPERT_PREDICTIONS, SUPPORT_EXAMPLES],
        PromptVariant::Base
        | PromptVariant::ExpertOnly
        | PromptVariant::CopyExpert
        | PromptVariant::RagV3
        | PromptVariant::RagV4 => &[],
    }
}
