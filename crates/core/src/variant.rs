//! Prompt variant tags.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::error::PromptError;

/// Which prompt template to build.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PromptVariant {
    /// Single best-effort prediction.
    Base,
    /// Several alternatives informed by one expert prediction.
    ExpertOnly,
    /// Copy the expert predictions verbatim.
    CopyExpert,
    /// Condition on retrieved similar reactions.
    #[default]
    Rag,
    /// Expert predictions corrected with support examples.
    RagV2,
    /// One table with a masked ground-truth cell.
    RagV3,
    /// The v3 table plus a neighbor-distance column.
    RagV4,
}

impl PromptVariant {
    pub const ALL: [PromptVariant; 7] = [
        Self::Base,
        Self::ExpertOnly,
        Self::CopyExpert,
        Self::Rag,
        Self::RagV2,
        Self::RagV3,
        Self::RagV4,
    ];

    pub fn as_str(self) -> &'static str {
        match self {
            Self::Base => "base",
            Self::ExpertOnly => "expert_only",
            Self::CopyExpert => "copy_expert",
            Self::Rag => "rag",
            Self::RagV2 => "rag_v2",
            Self::RagV3 => "rag_v3",
            Self::RagV4 => "rag_v4",
        }
    }
}

impl fmt::Display for PromptVariant {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for PromptVariant {
    type Err = PromptError;

    /// Accepts `rag_v2`, `rag-v2` and `ragv2` alike.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let normalized: String = s
            .trim()
            .to_ascii_lowercase()
            .chars()
            .filter(|c| *c != '_' && *c != '-')
            .collect();
        Self::ALL
            .into_iter()
            .find(|v| v.as_str().replace('_', "") == normalized)
            .ok_or_else(|| PromptError::UnknownVariant(s.to_string()))
    }
}
