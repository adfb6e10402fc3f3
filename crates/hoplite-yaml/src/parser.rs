//! Event-driven construction of value trees from YAML.

use hoplite_core::{Node, ParseError, Parser as ConfigParser, Pos, ROOT_PATH};
use indexmap::IndexMap;
use yaml_rust2::parser::{Event, MarkedEventReceiver, Parser};
use yaml_rust2::scanner::{Marker, TScalarStyle};

/// [`ConfigParser`] for `.yml` and `.yaml` files.
#[derive(Debug, Clone, Copy, Default)]
pub struct YamlParser;

impl ConfigParser for YamlParser {
    fn load(&self, input: &str, source: &str) -> Result<Node, ParseError> {
        parse_node(input, source)
    }

    fn default_file_extensions(&self) -> Vec<String> {
        vec!["yml".to_string(), "yaml".to_string()]
    }
}

/// Parse the first YAML document of `input` into a node tree.
///
/// Positions are labelled with `source`. Aliases and non-scalar keys are
/// rejected, as are duplicate keys within a mapping.
///
/// # Errors
///
/// Returns a [`ParseError`] for invalid YAML, for the unsupported constructs
/// above, and for input containing no document.
pub fn parse_node(input: &str, source: &str) -> Result<Node, ParseError> {
    let mut parser = Parser::new_from_str(input);
    let mut builder = TreeBuilder::new(source);

    parser
        .load(&mut builder, false)
        .map_err(|err| ParseError::Syntax {
            message: err.info().to_string(),
            pos: to_pos(err.marker(), source),
        })?;

    builder.finish()
}

fn to_pos(marker: &Marker, source: &str) -> Pos {
    // yaml-rust2 counts lines from 1 and columns from 0
    Pos::line_col(marker.line().saturating_sub(1), marker.col(), source)
}

/// A container still receiving children.
enum Frame {
    Sequence {
        pos: Pos,
        path: String,
        items: Vec<Node>,
    },
    Mapping {
        pos: Pos,
        path: String,
        entries: IndexMap<String, Node>,
        /// Key read but value not yet complete.
        pending_key: Option<String>,
    },
}

struct TreeBuilder {
    source: String,
    stack: Vec<Frame>,
    root: Option<Node>,
    /// First error seen; later events are ignored once set.
    error: Option<ParseError>,
}

impl TreeBuilder {
    fn new(source: &str) -> Self {
        Self {
            source: source.to_string(),
            stack: Vec::new(),
            root: None,
            error: None,
        }
    }

    fn finish(self) -> Result<Node, ParseError> {
        if let Some(error) = self.error {
            return Err(error);
        }
        self.root.ok_or(ParseError::Empty {
            source_name: self.source,
        })
    }

    fn pos(&self, marker: &Marker) -> Pos {
        to_pos(marker, &self.source)
    }

    /// `true` when the next complete node is a mapping key.
    fn expecting_key(&self) -> bool {
        matches!(
            self.stack.last(),
            Some(Frame::Mapping {
                pending_key: None,
                ..
            })
        )
    }

    /// Path of the next value to be completed.
    fn next_path(&self) -> String {
        match self.stack.last() {
            None => ROOT_PATH.to_string(),
            Some(Frame::Sequence { path, items, .. }) => Node::child_path_index(path, items.len()),
            Some(Frame::Mapping {
                path, pending_key, ..
            }) => match pending_key {
                Some(key) => Node::child_path_key(path, key),
                None => path.clone(),
            },
        }
    }

    fn push_complete(&mut self, node: Node) {
        match self.stack.last_mut() {
            None => {
                if self.root.is_none() {
                    self.root = Some(node);
                }
            }
            Some(Frame::Sequence { items, .. }) => items.push(node),
            Some(Frame::Mapping {
                entries,
                pending_key,
                ..
            }) => {
                if let Some(key) = pending_key.take() {
                    entries.insert(key, node);
                }
            }
        }
    }

    fn on_key(&mut self, key: String, marker: &Marker) {
        let pos = self.pos(marker);
        if let Some(Frame::Mapping {
            path,
            entries,
            pending_key,
            ..
        }) = self.stack.last_mut()
        {
            if entries.contains_key(&key) {
                self.error = Some(ParseError::DuplicateKey {
                    path: path.clone(),
                    key,
                    pos,
                });
            } else {
                *pending_key = Some(key);
            }
        }
    }

    fn unsupported(&mut self, message: &str, marker: &Marker) {
        self.error = Some(ParseError::Unsupported {
            message: message.to_string(),
            pos: self.pos(marker),
        });
    }

    fn on_scalar(&mut self, value: String, style: TScalarStyle, marker: &Marker) {
        if self.expecting_key() {
            self.on_key(value, marker);
            return;
        }
        let pos = self.pos(marker);
        let path = self.next_path();
        let node = if style == TScalarStyle::Plain {
            plain_scalar(value, pos, path)
        } else {
            Node::string(value, pos, path)
        };
        self.push_complete(node);
    }

    fn on_container_start(&mut self, marker: &Marker, mapping: bool) {
        if self.expecting_key() {
            self.unsupported("only scalar mapping keys are supported", marker);
            return;
        }
        let pos = self.pos(marker);
        let path = self.next_path();
        self.stack.push(if mapping {
            Frame::Mapping {
                pos,
                path,
                entries: IndexMap::new(),
                pending_key: None,
            }
        } else {
            Frame::Sequence {
                pos,
                path,
                items: Vec::new(),
            }
        });
    }

    fn on_container_end(&mut self) {
        let node = match self.stack.pop() {
            Some(Frame::Sequence { pos, path, items }) => Node::array(items, pos, path),
            Some(Frame::Mapping {
                pos, path, entries, ..
            }) => Node::map(entries, pos, path),
            None => return,
        };
        self.push_complete(node);
    }
}

impl MarkedEventReceiver for TreeBuilder {
    fn on_event(&mut self, ev: Event, marker: Marker) {
        if self.error.is_some() {
            return;
        }
        match ev {
            Event::Nothing
            | Event::StreamStart
            | Event::StreamEnd
            | Event::DocumentStart
            | Event::DocumentEnd => {}
            Event::Scalar(value, style, _anchor, _tag) => self.on_scalar(value, style, &marker),
            Event::SequenceStart(_anchor, _tag) => self.on_container_start(&marker, false),
            Event::MappingStart(_anchor, _tag) => self.on_container_start(&marker, true),
            Event::SequenceEnd | Event::MappingEnd => self.on_container_end(),
            Event::Alias(_) => self.unsupported("YAML aliases are not supported", &marker),
        }
    }
}

/// Type a plain (unquoted) scalar.
fn plain_scalar(value: String, pos: Pos, path: String) -> Node {
    if let Ok(i) = value.parse::<i64>() {
        return Node::long(i, pos, path);
    }
    // integers beyond i64 keep their text so decoders report them as out of range
    if looks_like_integer(&value) {
        return Node::string(value, pos, path);
    }
    match value.parse::<f64>() {
        Ok(f) if f.is_finite() && looks_like_float(&value) => {
            return Node::double(f, pos, path);
        }
        _ => {}
    }
    match value.as_str() {
        "true" | "True" | "TRUE" => Node::boolean(true, pos, path),
        "false" | "False" | "FALSE" => Node::boolean(false, pos, path),
        "null" | "Null" | "NULL" | "~" | "" => Node::null(pos, path),
        _ => Node::string(value, pos, path),
    }
}

fn looks_like_integer(value: &str) -> bool {
    let digits = value.strip_prefix(['+', '-']).unwrap_or(value);
    !digits.is_empty() && digits.bytes().all(|b| b.is_ascii_digit())
}

/// Rejects words such as `inf` or `NaN` that `f64::from_str` accepts.
fn looks_like_float(value: &str) -> bool {
    value.bytes().any(|b| b.is_ascii_digit())
        && value
            .bytes()
            .all(|b| b.is_ascii_digit() || matches!(b, b'+' | b'-' | b'.' | b'e' | b'E'))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn parse(input: &str) -> Node {
        parse_node(input, "test.yml").unwrap()
    }

    #[test]
    fn test_scalar_typing() {
        let node = parse("a: 42\nb: 1.5\nc: true\nd: ~\ne: hello\nf: '42'\ng: 1e3\nh: inf\n");
        assert!(matches!(node.at_key("a"), Node::Long { value: 42, .. }));
        assert!(matches!(node.at_key("b"), Node::Double { .. }));
        assert!(matches!(node.at_key("c"), Node::Boolean { value: true, .. }));
        assert!(node.at_key("d").is_null());
        assert_eq!(node.at_key("e").value_or_none(), Some("hello".to_string()));
        assert!(matches!(node.at_key("f"), Node::String { .. }));
        assert!(matches!(node.at_key("g"), Node::Double { .. }));
        assert!(matches!(node.at_key("h"), Node::String { .. }));
    }

    #[test]
    fn test_out_of_range_numbers_keep_their_text() {
        let node = parse("big: 99999999999999999999
neg: -99999999999999999999
huge: 1e400
");
        assert_eq!(
            node.at_key("big").value_or_none(),
            Some("99999999999999999999".to_string())
        );
        assert!(matches!(node.at_key("big"), Node::String { .. }));
        assert!(matches!(node.at_key("neg"), Node::String { .. }));
        assert!(matches!(node.at_key("huge"), Node::String { .. }));
    }

    #[test]
    fn test_empty_value_is_null() {
        let node = parse("a:\nb: 1\n");
        assert!(node.at_key("a").is_null());
        assert_eq!(node.at_key("a").path(), Some("<root>.a"));
    }

    #[test]
    fn test_paths() {
        let node = parse("servers:\n  - host: a\n  - host: b\n");
        assert_eq!(node.path(), Some("<root>"));
        assert_eq!(
            node.at_key("servers").at_index(1).at_key("host").path(),
            Some("<root>.servers[1].host")
        );
    }

    #[test]
    fn test_positions_follow_lines() {
        let node = parse("a: 1\nb:\n  c: 2\n");
        let a = node.at_key("a").pos().line().unwrap();
        let c = node.at_key("b").at_key("c").pos();
        assert_eq!(c.line(), Some(a + 2));
        assert_eq!(c.source(), Some("test.yml"));
        assert_eq!(node.at_key("a").pos(), &Pos::line_col(a, 3, "test.yml"));
    }

    #[test]
    fn test_key_order_preserved() {
        let node = parse("z: 1\na: 2\nm: 3\n");
        let Node::Map { entries, .. } = node else {
            panic!("expected a map");
        };
        assert_eq!(entries.keys().collect::<Vec<_>>(), vec!["z", "a", "m"]);
    }

    #[test]
    fn test_duplicate_key_rejected() {
        let err = parse_node("a: 1\nb: 2\na: 3\n", "test.yml").unwrap_err();
        assert!(matches!(
            err,
            ParseError::DuplicateKey { ref key, ref path, .. } if key == "a" && path == "<root>"
        ));
    }

    #[test]
    fn test_alias_rejected() {
        let err = parse_node("a: &x 1\nb: *x\n", "test.yml").unwrap_err();
        assert!(matches!(err, ParseError::Unsupported { .. }));
    }

    #[test]
    fn test_syntax_error_has_position() {
        let err = parse_node("a: [1, 2\n", "bad.yml").unwrap_err();
        let ParseError::Syntax { pos, .. } = err else {
            panic!("expected a syntax error, got {:?}", err);
        };
        assert_eq!(pos.source(), Some("bad.yml"));
    }

    #[test]
    fn test_empty_input() {
        assert_eq!(
            parse_node("", "empty.yml"),
            Err(ParseError::Empty {
                source_name: "empty.yml".to_string()
            })
        );
    }
}
