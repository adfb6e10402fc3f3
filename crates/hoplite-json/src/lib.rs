//! # hoplite-json
//!
//! JSON front-end for hoplite.
//!
//! `//` and `/* */` comments are allowed and blanked out first. The rest is
//! checked as strict JSON with `serde_json`, so that YAML-only syntax is
//! rejected and syntax errors point at the offending line and column. The
//! positioned tree is then built from the YAML event stream, which reads any
//! JSON document unchanged.
//!
//! ```rust
//! use hoplite_json::parse_node;
//!
//! let node = parse_node(r#"{"servers": [{"port": 80}]}"#, "app.json").unwrap();
//! let port = node.at_key("servers").at_index(0).at_key("port");
//! assert_eq!(port.path(), Some("<root>.servers[0].port"));
//! ```

mod comments;

use comments::{UnterminatedComment, strip_comments};
use hoplite_core::{Node, ParseError, Parser, Pos};

/// [`Parser`] for `.json` files.
#[derive(Debug, Clone, Copy, Default)]
pub struct JsonParser;

impl Parser for JsonParser {
    fn load(&self, input: &str, source: &str) -> Result<Node, ParseError> {
        parse_node(input, source)
    }

    fn default_file_extensions(&self) -> Vec<String> {
        vec!["json".to_string()]
    }
}

/// Parse a JSON document into a node tree labelled with `source`.
///
/// # Errors
///
/// Returns [`ParseError::Syntax`] for anything that is not strict JSON once
/// comments are removed, [`ParseError::DuplicateKey`] when an object repeats
/// a key, and [`ParseError::Empty`] for input holding only whitespace and
/// comments.
pub fn parse_node(input: &str, source: &str) -> Result<Node, ParseError> {
    let stripped = strip_comments(input).map_err(|UnterminatedComment { line, col }| {
        ParseError::Syntax {
            message: "unterminated block comment".to_string(),
            pos: Pos::line_col(line, col, source),
        }
    })?;
    let input = stripped.as_ref();

    if input.trim().is_empty() {
        return Err(ParseError::Empty {
            source_name: source.to_string(),
        });
    }

    if let Err(err) = serde_json::from_str::<serde_json::Value>(input) {
        tracing::debug!(source, %err, "invalid JSON");
        return Err(ParseError::Syntax {
            message: err.to_string(),
            pos: Pos::line_col(
                err.line().saturating_sub(1),
                err.column().saturating_sub(1),
                source,
            ),
        });
    }

    hoplite_yaml::parse_node(input, source)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_numbers() {
        let node = parse_node(r#"{"a": 1, "b": 1.0, "c": -2, "d": 1e3}"#, "t.json").unwrap();
        assert!(matches!(node.at_key("a"), Node::Long { value: 1, .. }));
        assert!(matches!(node.at_key("b"), Node::Double { .. }));
        assert!(matches!(node.at_key("c"), Node::Long { value: -2, .. }));
        assert!(matches!(node.at_key("d"), Node::Double { .. }));
    }

    #[test]
    fn test_strings_stay_strings() {
        let node = parse_node(r#"{"port": "8080", "flag": "true", "nothing": null}"#, "t.json")
            .unwrap();
        assert!(matches!(node.at_key("port"), Node::String { .. }));
        assert!(matches!(node.at_key("flag"), Node::String { .. }));
        assert!(node.at_key("nothing").is_null());
    }

    #[test]
    fn test_rejects_yaml_syntax() {
        let err = parse_node("a: 1\n", "t.json").unwrap_err();
        let ParseError::Syntax { pos, .. } = err else {
            panic!("expected a syntax error, got {:?}", err);
        };
        assert_eq!(pos, Pos::line_col(0, 0, "t.json"));
    }

    #[test]
    fn test_syntax_error_position() {
        let err = parse_node("{\n  \"a\": 1,\n  \"b\": \n}", "t.json").unwrap_err();
        let ParseError::Syntax { pos, .. } = err else {
            panic!("expected a syntax error, got {:?}", err);
        };
        assert_eq!(pos.line(), Some(3));
    }

    #[test]
    fn test_comments_are_allowed() {
        let input = "// service settings\n{\n  \"host\": \"a//b\", /* primary */\n  \"port\": 80\n}\n";
        let node = parse_node(input, "t.json").unwrap();
        assert_eq!(node.at_key("host").value_or_none(), Some("a//b".to_string()));
        assert!(matches!(node.at_key("port"), Node::Long { value: 80, .. }));

        let host = node.at_key("host").pos().line().unwrap();
        assert_eq!(node.at_key("port").pos().line(), Some(host + 1));
    }

    #[test]
    fn test_errors_after_comments_keep_their_line() {
        let err = parse_node("{\n  /* a\n  b */\n  \"a\": \n}", "t.json").unwrap_err();
        let ParseError::Syntax { pos, .. } = err else {
            panic!("expected a syntax error, got {:?}", err);
        };
        assert_eq!(pos.line(), Some(4));
    }

    #[test]
    fn test_unterminated_comment() {
        let err = parse_node("{\"a\": 1} /* trailing", "t.json").unwrap_err();
        let ParseError::Syntax { message, pos } = err else {
            panic!("expected a syntax error, got {:?}", err);
        };
        assert_eq!(message, "unterminated block comment");
        assert_eq!(pos, Pos::line_col(0, 9, "t.json"));
    }

    #[test]
    fn test_only_comments_is_empty() {
        assert!(matches!(
            parse_node("// nothing here\n", "t.json"),
            Err(ParseError::Empty { .. })
        ));
    }

    #[test]
    fn test_duplicate_keys() {
        let err = parse_node(r#"{"a": 1, "a": 2}"#, "t.json").unwrap_err();
        assert!(matches!(err, ParseError::DuplicateKey { .. }));
    }

    #[test]
    fn test_empty() {
        assert!(matches!(
            parse_node("  \n", "t.json"),
            Err(ParseError::Empty { .. })
        ));
    }
}
