//! Source positions attached to value tree nodes.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Where a node came from.
///
/// Lines and columns are stored 0-based, as produced by the front-ends.
/// [`fmt::Display`] renders them 1-based for people reading diagnostics.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(tag = "type")]
pub enum Pos {
    /// No location is known (synthetic nodes, programmatic trees).
    #[default]
    NoPos,

    /// A line/column location inside a named source.
    LineColPos {
        line: usize,
        col: usize,
        source: String,
    },
}

impl Pos {
    /// Create a line/column position.
    pub fn line_col(line: usize, col: usize, source: impl Into<String>) -> Self {
        Pos::LineColPos {
            line,
            col,
            source: source.into(),
        }
    }

    /// The source label, if this position has one.
    pub fn source(&self) -> Option<&str> {
        match self {
            Pos::NoPos => None,
            Pos::LineColPos { source, .. } => Some(source),
        }
    }

    /// The 0-based line, if known.
    pub fn line(&self) -> Option<usize> {
        match self {
            Pos::NoPos => None,
            Pos::LineColPos { line, .. } => Some(*line),
        }
    }

    pub fn is_known(&self) -> bool {
        matches!(self, Pos::LineColPos { .. })
    }
}

impl fmt::Display for Pos {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Pos::NoPos => write!(f, "<unknown position>"),
            Pos::LineColPos { line, col, source } => {
                write!(f, "{}:{}:{}", source, line + 1, col + 1)
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_display_is_one_based() {
        let pos = Pos::line_col(0, 4, "app.yml");
        assert_eq!(pos.to_string(), "app.yml:1:5");
        assert_eq!(Pos::NoPos.to_string(), "<unknown position>");
    }

    #[test]
    fn test_accessors() {
        let pos = Pos::line_col(2, 0, "app.json");
        assert_eq!(pos.source(), Some("app.json"));
        assert_eq!(pos.line(), Some(2));
        assert!(pos.is_known());
        assert_eq!(Pos::NoPos.source(), None);
        assert!(!Pos::NoPos.is_known());
    }

    #[test]
    fn test_serialization() {
        let pos = Pos::line_col(1, 2, "a.yml");
        let json = serde_json::to_value(&pos).unwrap();
        assert_eq!(json["type"], "LineColPos");
        assert_eq!(json["line"], 1);
        let back: Pos = serde_json::from_value(json).unwrap();
        assert_eq!(back, pos);
    }
}
