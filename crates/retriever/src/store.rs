//! Reaction records, row-aligned with the embedding matrix.

use std::fs::File;
use std::io::{BufRead, BufReader};
use std::path::Path;

use rxnrag_config::RecordFormat;
use rxnrag_core::{ReactionRecord, RetrievalError};
use serde_json::Value;
use tracing::info;

/// Records in file order: record `i` describes embedding row `i`.
#[derive(Debug, Clone, Default)]
pub struct RecordStore {
    records: Vec<ReactionRecord>,
}

impl RecordStore {
    pub fn new(records: Vec<ReactionRecord>) -> Self {
        Self { records }
    }

    /// Load `path` in the given format. Only JSON Lines is implemented.
    pub fn load(path: &Path, format: RecordFormat) -> Result<Self, RetrievalError> {
        match format {
            RecordFormat::Jsonl => Self::from_jsonl(path),
            other => Err(RetrievalError::UnsupportedFormat(format!("{other:?}").to_lowercase())),
        }
    }

    /// One JSON object per line. Trailing blank lines are ignored; a blank
    /// line before the last record would shift rows and is an error.
    pub fn from_jsonl(path: &Path) -> Result<Self, RetrievalError> {
        let read_failed = |e: std::io::Error| RetrievalError::ReadFailed {
            path: path.display().to_string(),
            reason: e.to_string(),
        };
        let file = File::open(path).map_err(read_failed)?;

        let mut records = Vec::new();
        let mut first_blank = None;
        for (idx, line) in BufReader::new(file).lines().enumerate() {
            let line = line.map_err(read_failed)?;
            if line.trim().is_empty() {
                first_blank.get_or_insert(idx + 1);
                continue;
            }
            if let Some(blank) = first_blank {
                return Err(RetrievalError::MalformedRecord {
                    line: blank,
                    reason: "blank line between records".into(),
                });
            }
            records.push(parse_line(&line, idx + 1)?);
        }

        info!(path = %path.display(), records = records.len(), "Loaded reaction records");
        Ok(Self { records })
    }

    pub fn get(&self, row: usize) -> Option<&ReactionRecord> {
        self.records.get(row)
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &ReactionRecord> {
        self.records.iter()
    }
}

fn parse_line(line: &str, line_no: usize) -> Result<ReactionRecord, RetrievalError> {
    let value: Value = serde_json::from_str(line).map_err(|e| RetrievalError::MalformedRecord {
        line: line_no,
        reason: e.to_string(),
    })?;
    if !value.is_object() {
        return Err(RetrievalError::MalformedRecord {
            line: line_no,
            reason: "expected a JSON object".into(),
        });
    }
    Ok(ReactionRecord::new(value))
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    fn write(contents: &str) -> tempfile::NamedTempFile {
        let mut f = tempfile::NamedTempFile::new().unwrap();
        f.write_all(contents.as_bytes()).unwrap();
        f
    }

    #[test]
    fn loads_in_file_order() {
        let f = write(
            "{\"reactants\":\"CCO\",\"products\":\"CC=O\"}\n{\"reactants\":\"C\",\"products\":\"CO\"}\n",
        );
        let store = RecordStore::from_jsonl(f.path()).unwrap();
        assert_eq!(store.len(), 2);
        assert_eq!(store.get(0).unwrap().get_str("reactants"), Some("CCO"));
        assert_eq!(store.get(1).unwrap().get_str("products"), Some("CO"));
        assert!(store.get(2).is_none());
    }

    #[test]
    fn trailing_blank_lines_are_ignored() {
        let f = write("{\"a\":1}\n{\"a\":2}\n\n   \n");
        let store = RecordStore::from_jsonl(f.path()).unwrap();
        assert_eq!(store.len(), 2);
    }

    #[test]
    fn blank_line_between_records_is_malformed() {
        let f = write("{\"a\":1}\n\n   \n{\"a\":2}\n");
        let err = RecordStore::from_jsonl(f.path()).unwrap_err();
        assert!(matches!(err, RetrievalError::MalformedRecord { line: 2, .. }));
    }

    #[test]
    fn malformed_line_reports_line_number() {
        let f = write("{\"a\":1}\n{not json}\n");
        let err = RecordStore::from_jsonl(f.path()).unwrap_err();
        assert!(matches!(err, RetrievalError::MalformedRecord { line: 2, .. }));
    }

    #[test]
    fn non_object_line_is_malformed() {
        let f = write("[1, 2]\n");
        let err = RecordStore::from_jsonl(f.path()).unwrap_err();
        assert!(matches!(err, RetrievalError::MalformedRecord { line: 1, .. }));
    }

    #[test]
    fn missing_file_is_read_error() {
        let err = RecordStore::from_jsonl(Path::new("/nonexistent/records.jsonl")).unwrap_err();
        assert!(matches!(err, RetrievalError::ReadFailed { .. }));
    }

    #[test]
    fn other_formats_are_not_implemented() {
        let f = write("{}\n");
        for format in [RecordFormat::Csv, RecordFormat::Parquet] {
            let err = RecordStore::load(f.path(), format).unwrap_err();
            assert!(matches!(err, RetrievalError::UnsupportedFormat(_)));
        }
        assert_eq!(RecordStore::load(f.path(), RecordFormat::Jsonl).unwrap().len(), 1);
    }
}
