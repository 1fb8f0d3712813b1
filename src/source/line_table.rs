use crate::{DebugResult, DebuggerError};
use serde::{Deserialize, Serialize};

/// Ordered table of the executable lines of one source.
///
/// Lines are 1-based and strictly increasing. The table is the only input the
/// breakpoint resolver needs from a source.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "Vec<u32>", into = "Vec<u32>")]
pub struct LineTable {
    lines: Vec<u32>,
}

impl LineTable {
    /// Build a table from executable line numbers, rejecting unordered input.
    pub fn new(lines: Vec<u32>) -> DebugResult<Self> {
        if lines.first() == Some(&0) {
            return Err(DebuggerError::InvalidLineTable(
                "line 0 is not a valid source line".to_string(),
            ));
        }

        if let Some(pair) = lines.windows(2).find(|pair| pair[0] >= pair[1]) {
            return Err(DebuggerError::InvalidLineTable(format!(
                "line {} follows line {}",
                pair[1], pair[0]
            )));
        }

        Ok(Self { lines })
    }

    /// Derive the table from source text with the default classifier.
    pub fn from_source_text(text: &str) -> Self {
        Self {
            lines: super::classify::executable_lines(text),
        }
    }

    /// Smallest executable line at or after `requested`.
    pub fn resolve(&self, requested: u32) -> Option<u32> {
        let idx = self.lines.partition_point(|&line| line < requested);
        self.lines.get(idx).copied()
    }

    pub fn contains(&self, line: u32) -> bool {
        self.lines.binary_search(&line).is_ok()
    }

    pub fn lines(&self) -> &[u32] {
        &self.lines
    }

    pub fn first(&self) -> Option<u32> {
        self.lines.first().copied()
    }

    pub fn last(&self) -> Option<u32> {
        self.lines.last().copied()
    }

    pub fn len(&self) -> usize {
        self.lines.len()
    }

    pub fn is_empty(&self) -> bool {
        self.lines.is_empty()
    }
}

impl TryFrom<Vec<u32>> for LineTable {
    type Error = DebuggerError;

    fn try_from(lines: Vec<u32>) -> DebugResult<Self> {
        Self::new(lines)
    }
}

impl From<LineTable> for Vec<u32> {
    fn from(table: LineTable) -> Self {
        table.lines
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn table() -> LineTable {
        LineTable::new(vec![1, 3, 6, 8, 10, 11]).unwrap()
    }

    #[test]
    fn test_executable_line_resolves_to_itself() {
        assert_eq!(table().resolve(6), Some(6));
        assert_eq!(table().resolve(11), Some(11));
    }

    #[test]
    fn test_comment_line_skips_forward_one_line() {
        assert_eq!(table().resolve(7), Some(8));
    }

    #[test]
    fn test_gap_resolves_to_nearest_following_line() {
        let table = LineTable::new(vec![2, 9]).unwrap();
        assert_eq!(table.resolve(3), Some(9));
        assert_eq!(table.resolve(1), Some(2));
        assert_eq!(table.resolve(0), Some(2));
    }

    #[test]
    fn test_past_last_line_has_no_code() {
        assert_eq!(table().resolve(12), None);
        assert_eq!(LineTable::default().resolve(1), None);
    }

    #[test]
    fn test_rejects_unordered_tables() {
        assert!(matches!(
            LineTable::new(vec![3, 3]),
            Err(DebuggerError::InvalidLineTable(_))
        ));
        assert!(LineTable::new(vec![5, 2]).is_err());
        assert!(LineTable::new(vec![0, 1]).is_err());
    }

    #[test]
    fn test_deserialize_validates() {
        let ok: LineTable = serde_json::from_str("[1, 4, 9]").unwrap();
        assert_eq!(ok.lines(), &[1, 4, 9]);
        assert!(serde_json::from_str::<LineTable>("[4, 1]").is_err());
    }
}
