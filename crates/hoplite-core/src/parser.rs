//! The contract between text front-ends and the engine.

use crate::node::Node;
use crate::pos::Pos;
use thiserror::Error;

/// Turns source text into a value tree.
///
/// Implementations must reject duplicate map keys, keep array order, label
/// every position with `source`, and build node paths starting at
/// [`crate::ROOT_PATH`]. Numbers with a fraction or exponent become
/// `Node::Double`, other numbers `Node::Long`.
pub trait Parser: Send + Sync {
    fn load(&self, input: &str, source: &str) -> Result<Node, ParseError>;

    /// File extensions (without the dot) this parser handles by default.
    fn default_file_extensions(&self) -> Vec<String>;
}

#[derive(Debug, Clone, PartialEq, Error)]
pub enum ParseError {
    #[error("{message}")]
    Syntax { message: String, pos: Pos },

    #[error("duplicate key '{key}' at {path}")]
    DuplicateKey { key: String, path: String, pos: Pos },

    #[error("{message}")]
    Unsupported { message: String, pos: Pos },

    #[error("{source_name} contains no document")]
    Empty { source_name: String },
}

impl ParseError {
    pub fn pos(&self) -> Pos {
        match self {
            ParseError::Syntax { pos, .. }
            | ParseError::DuplicateKey { pos, .. }
            | ParseError::Unsupported { pos, .. } => pos.clone(),
            ParseError::Empty { .. } => Pos::NoPos,
        }
    }
}
