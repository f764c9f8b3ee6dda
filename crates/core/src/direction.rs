//! Reaction direction — forward synthesis or retrosynthesis.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::error::PromptError;

/// Which way the prediction runs.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Direction {
    /// Reactants → products.
    #[default]
    Forward,
    /// Products → reactants, agents and solvents.
    Backward,
}

impl Direction {
    pub fn is_forward(self) -> bool {
        matches!(self, Self::Forward)
    }

    /// Role name of the molecules given as input.
    pub fn input_role(self) -> &'static str {
        match self {
            Self::Forward => "reactants",
            Self::Backward => "products",
        }
    }

    /// Role name of the molecules to be predicted.
    pub fn output_role(self) -> &'static str {
        match self {
            Self::Forward => "products",
            Self::Backward => "reactants",
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Self::Forward => "forward",
            Self::Backward => "backward",
        }
    }
}

impl From<bool> for Direction {
    /// `true` means forward.
    fn from(forward: bool) -> Self {
        if forward { Self::Forward } else { Self::Backward }
    }
}

impl fmt::Display for Direction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Direction {
    type Err = PromptError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "forward" | "fwd" => Ok(Self::Forward),
            "backward" | "retro" | "retrosynthesis" => Ok(Self::Backward),
            other => Err(PromptError::UnknownDirection(other.to_string())),
        }
    }
}
