//! Structured prompts for reaction prediction.
//!
//! A [`ReactionPrompt`] is an ordered list of named sections rendered as
//!
//! ```text
//! [SECTION NAME]
//! body
//!
//! ```
//!
//! Every variant starts from the same base sections (role, task,
//! instruction, output format, input data); the variant picks the
//! instruction text and may append placeholder sections the caller fills
//! through the setters. Direction only changes the task label, the output
//! field names and the role wording.

pub mod format;
pub mod templates;
mod prompt;

pub use format::{
    ReactionTable, SupportExample, TableRow, format_similar_reactions, format_support_examples,
};
pub use prompt::{ReactionPrompt, Section};
