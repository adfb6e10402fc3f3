//! The value tree produced by front-ends and consumed by decoders.

use crate::pos::Pos;
use indexmap::IndexMap;

/// Path of the root node of every tree.
pub const ROOT_PATH: &str = "<root>";

pub(crate) static UNDEFINED: Node = Node::Undefined;
static NO_POS: Pos = Pos::NoPos;

/// A node of the parsed value tree.
///
/// Every defined node carries its position and its dot/bracket path from the
/// root (`<root>.servers[2].host`). `Undefined` is the sentinel for "nothing
/// exists at this path" and is deliberately distinct from an explicit `Null`.
#[derive(Debug, Clone, PartialEq)]
pub enum Node {
    String {
        value: String,
        pos: Pos,
        path: String,
    },
    Long {
        value: i64,
        pos: Pos,
        path: String,
    },
    Double {
        value: f64,
        pos: Pos,
        path: String,
    },
    Boolean {
        value: bool,
        pos: Pos,
        path: String,
    },
    Null {
        pos: Pos,
        path: String,
    },
    Undefined,
    Map {
        entries: IndexMap<String, Node>,
        pos: Pos,
        path: String,
    },
    Array {
        elements: Vec<Node>,
        pos: Pos,
        path: String,
    },
}

impl Node {
    pub fn string(value: impl Into<String>, pos: Pos, path: impl Into<String>) -> Self {
        Node::String {
            value: value.into(),
            pos,
            path: path.into(),
        }
    }

    pub fn long(value: i64, pos: Pos, path: impl Into<String>) -> Self {
        Node::Long {
            value,
            pos,
            path: path.into(),
        }
    }

    pub fn double(value: f64, pos: Pos, path: impl Into<String>) -> Self {
        Node::Double {
            value,
            pos,
            path: path.into(),
        }
    }

    pub fn boolean(value: bool, pos: Pos, path: impl Into<String>) -> Self {
        Node::Boolean {
            value,
            pos,
            path: path.into(),
        }
    }

    pub fn null(pos: Pos, path: impl Into<String>) -> Self {
        Node::Null {
            pos,
            path: path.into(),
        }
    }

    pub fn map(entries: IndexMap<String, Node>, pos: Pos, path: impl Into<String>) -> Self {
        Node::Map {
            entries,
            pos,
            path: path.into(),
        }
    }

    pub fn array(elements: Vec<Node>, pos: Pos, path: impl Into<String>) -> Self {
        Node::Array {
            elements,
            pos,
            path: path.into(),
        }
    }

    /// Path of the child stored under `key` of the node at `parent`.
    pub fn child_path_key(parent: &str, key: &str) -> String {
        format!("{}.{}", parent, key)
    }

    /// Path of the element at `index` of the node at `parent`.
    pub fn child_path_index(parent: &str, index: usize) -> String {
        format!("{}[{}]", parent, index)
    }

    /// Position of this node. `Undefined` has no position.
    pub fn pos(&self) -> &Pos {
        match self {
            Node::String { pos, .. }
            | Node::Long { pos, .. }
            | Node::Double { pos, .. }
            | Node::Boolean { pos, .. }
            | Node::Null { pos, .. }
            | Node::Map { pos, .. }
            | Node::Array { pos, .. } => pos,
            Node::Undefined => &NO_POS,
        }
    }

    /// Path of this node. `Undefined` has no path.
    pub fn path(&self) -> Option<&str> {
        match self {
            Node::String { path, .. }
            | Node::Long { path, .. }
            | Node::Double { path, .. }
            | Node::Boolean { path, .. }
            | Node::Null { path, .. }
            | Node::Map { path, .. }
            | Node::Array { path, .. } => Some(path),
            Node::Undefined => None,
        }
    }

    /// Look up a map entry. Absent keys and non-map nodes yield `Undefined`.
    pub fn at_key(&self, key: &str) -> &Node {
        match self {
            Node::Map { entries, .. } => entries.get(key).unwrap_or(&UNDEFINED),
            _ => &UNDEFINED,
        }
    }

    /// Look up an array element. Out-of-range indexes and non-array nodes
    /// yield `Undefined`.
    pub fn at_index(&self, index: usize) -> &Node {
        match self {
            Node::Array { elements, .. } => elements.get(index).unwrap_or(&UNDEFINED),
            _ => &UNDEFINED,
        }
    }

    pub fn is_defined(&self) -> bool {
        !matches!(self, Node::Undefined)
    }

    pub fn is_null(&self) -> bool {
        matches!(self, Node::Null { .. })
    }

    /// Number of children of a map or array; 0 for everything else.
    pub fn len(&self) -> usize {
        match self {
            Node::Map { entries, .. } => entries.len(),
            Node::Array { elements, .. } => elements.len(),
            _ => 0,
        }
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Short name of the node kind, used in diagnostics.
    pub fn type_name(&self) -> &'static str {
        match self {
            Node::String { .. } => "String",
            Node::Long { .. } => "Long",
            Node::Double { .. } => "Double",
            Node::Boolean { .. } => "Boolean",
            Node::Null { .. } => "Null",
            Node::Undefined => "Undefined",
            Node::Map { .. } => "Map",
            Node::Array { .. } => "Array",
        }
    }

    /// Textual rendering of a scalar node, `None` for containers, null and
    /// undefined.
    pub fn value_or_none(&self) -> Option<String> {
        match self {
            Node::String { value, .. } => Some(value.clone()),
            Node::Long { value, .. } => Some(value.to_string()),
            Node::Double { value, .. } => Some(value.to_string()),
            Node::Boolean { value, .. } => Some(value.to_string()),
            _ => None,
        }
    }
}
