//! The fixed SMILES tokenization pattern.
//!
//! Alternatives are tried left to right, so multi-character tokens
//! (`%(123)`, bracket atoms, `Br`, `Cl`, `>>`) win over their single-character
//! prefixes. Characters no alternative matches (whitespace, stray letters) are
//! dropped.

use regex_lite::Regex;
use std::sync::LazyLock;

/// Priority-ordered token alternatives.
pub const SMILES_PATTERN: &str = concat!(
    r"%\([0-9]{3}\)",      // three-digit ring closure
    r"|\[[^\]]+\]",        // bracket atom
    r"|Br?|Cl?",           // two-letter organic subset
    r"|N|O|S|P|F|I",
    r"|b|c|n|o|s|p",       // aromatic
    r"|\||\(|\)|\.|=|#|-|\+|\\|/|:|~|@|\?",
    r"|>>?",               // reaction arrow / agent separator
    r"|\*|\$",
    r"|%[0-9]{2}",         // two-digit ring closure
    r"|[0-9]",
);

static SMILES_REGEX: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(SMILES_PATTERN).expect("SMILES_PATTERN is a valid regex"));

/// Split a SMILES string into token substrings.
pub fn tokenize(smiles: &str) -> Vec<&str> {
    SMILES_REGEX.find_iter(smiles).map(|m| m.as_str()).collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn acetic_acid() {
        assert_eq!(tokenize("CC(=O)O"), vec!["C", "C", "(", "=", "O", ")", "O"]);
    }

    #[test]
    fn halogens_are_single_tokens() {
        assert_eq!(tokenize("BrCCl"), vec!["Br", "C", "Cl"]);
        assert_eq!(tokenize("BC"), vec!["B", "C"]);
    }

    #[test]
    fn bracket_atoms_kept_whole() {
        assert_eq!(
            tokenize("[NH4+].[Cl-]"),
            vec!["[NH4+]", ".", "[Cl-]"]
        );
        assert_eq!(tokenize("C[C@@H](O)N"), vec!["C", "[C@@H]", "(", "O", ")", "N"]);
    }

    #[test]
    fn ring_closures() {
        assert_eq!(
            tokenize("c1ccccc1"),
            vec!["c", "1", "c", "c", "c", "c", "c", "1"]
        );
        assert_eq!(tokenize("C%12CC%12"), vec!["C", "%12", "C", "C", "%12"]);
        assert_eq!(tokenize("C%(123)C"), vec!["C", "%(123)", "C"]);
    }

    #[test]
    fn reaction_arrows() {
        assert_eq!(tokenize("CCO>>CC=O"), vec!["C", "C", "O", ">>", "C", "C", "=", "O"]);
        assert_eq!(tokenize("A>B>C"), vec![">", "B", ">", "C"]);
    }

    #[test]
    fn bonds_and_stereo() {
        assert_eq!(
            tokenize(r"F/C=C\F"),
            vec!["F", "/", "C", "=", "C", r"\", "F"]
        );
        assert_eq!(tokenize("C#N"), vec!["C", "#", "N"]);
    }

    #[test]
    fn unmatched_characters_are_dropped() {
        assert_eq!(tokenize(" C C\tO\n"), vec!["C", "C", "O"]);
        assert!(tokenize("").is_empty());
    }
}
