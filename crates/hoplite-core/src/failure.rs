//! Decode failures and the non-empty failure collection.

use crate::node::{Node, ROOT_PATH};
use crate::pos::Pos;
use crate::shape::Shape;
use std::fmt;
use thiserror::Error;

/// A single reason why decoding (or loading) a configuration failed.
///
/// Wrapper kinds (`FieldFailure`, `StructuredDecodeFailure`,
/// `CollectionElementErrors`, `MultipleFailures`) keep every inner failure so
/// that nothing found during a decode is ever dropped.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum ConfigFailure {
    #[error("Missing value")]
    MissingValue,

    #[error("Null value at {path} cannot be used for a non-null field")]
    NullValueForNonNullField { path: String, pos: Pos },

    #[error("No decoder found for {shape}")]
    NoDecoderFound { shape: String },

    #[error("No structured decoder found for record {shape}")]
    NoStructuredDecoderFound { shape: String },

    #[error("Could not decode {node_type} at {path} as {shape}")]
    DecodeError {
        node_type: String,
        path: String,
        pos: Pos,
        shape: String,
    },

    #[error("Could not convert '{value}' at {path} to {shape}")]
    ConversionFailure {
        shape: String,
        value: String,
        path: String,
        pos: Pos,
    },

    #[error("Could not populate a {kind} from {node_type} at {path}")]
    UnsupportedCollectionShape {
        kind: String,
        node_type: String,
        path: String,
        pos: Pos,
    },

    #[error("{kind} at {path} has invalid elements")]
    CollectionElementErrors {
        kind: String,
        path: String,
        failures: Failures,
    },

    #[error("Field '{field}' could not be decoded")]
    FieldFailure { field: String, failures: Failures },

    #[error("Could not decode {shape} at {path}")]
    StructuredDecodeFailure {
        shape: String,
        pos: Pos,
        path: String,
        failures: Failures,
    },

    #[error("Could not construct {shape} from {args}: {reason}")]
    InvalidConstructorArguments {
        shape: String,
        args: String,
        reason: String,
    },

    #[error("Could not find config source {identifier}")]
    UnknownSource { identifier: String },

    #[error("{} config sources could not be resolved", .failures.len())]
    MultipleFailures { failures: Failures },

    #[error("Could not parse {source_name}: {message}")]
    UnparseableSource {
        source_name: String,
        message: String,
        pos: Pos,
    },

    #[error("No parser registered for extension '{extension}' of {source_name}")]
    NoParserFound {
        source_name: String,
        extension: String,
    },
}

impl ConfigFailure {
    /// The node's kind cannot be decoded into the shape at all.
    pub fn decode_error(node: &Node, shape: &Shape) -> Self {
        ConfigFailure::DecodeError {
            node_type: node.type_name().to_string(),
            path: node_path(node),
            pos: node.pos().clone(),
            shape: shape.to_string(),
        }
    }

    /// The node is the right kind but its value is not valid for the shape.
    pub fn conversion(node: &Node, shape: &Shape) -> Self {
        ConfigFailure::ConversionFailure {
            shape: shape.to_string(),
            value: node
                .value_or_none()
                .unwrap_or_else(|| node.type_name().to_string()),
            path: node_path(node),
            pos: node.pos().clone(),
        }
    }

    pub fn null_for_non_null(node: &Node) -> Self {
        ConfigFailure::NullValueForNonNullField {
            path: node_path(node),
            pos: node.pos().clone(),
        }
    }

    pub fn unsupported_collection(kind: &str, node: &Node) -> Self {
        ConfigFailure::UnsupportedCollectionShape {
            kind: kind.to_string(),
            node_type: node.type_name().to_string(),
            path: node_path(node),
            pos: node.pos().clone(),
        }
    }

    /// Stable error code, `H-<subsystem>-<number>`.
    ///
    /// Subsystem 1 is decoding, subsystem 2 is source resolution and loading.
    pub fn code(&self) -> &'static str {
        match self {
            ConfigFailure::MissingValue => "H-1-1",
            ConfigFailure::NullValueForNonNullField { .. } => "H-1-2",
            ConfigFailure::NoDecoderFound { .. } => "H-1-3",
            ConfigFailure::NoStructuredDecoderFound { .. } => "H-1-4",
            ConfigFailure::DecodeError { .. } => "H-1-5",
            ConfigFailure::ConversionFailure { .. } => "H-1-6",
            ConfigFailure::UnsupportedCollectionShape { .. } => "H-1-7",
            ConfigFailure::CollectionElementErrors { .. } => "H-1-8",
            ConfigFailure::FieldFailure { .. } => "H-1-9",
            ConfigFailure::StructuredDecodeFailure { .. } => "H-1-10",
            ConfigFailure::InvalidConstructorArguments { .. } => "H-1-11",
            ConfigFailure::UnknownSource { .. } => "H-2-1",
            ConfigFailure::MultipleFailures { .. } => "H-2-2",
            ConfigFailure::UnparseableSource { .. } => "H-2-3",
            ConfigFailure::NoParserFound { .. } => "H-2-4",
        }
    }

    pub fn kind_name(&self) -> &'static str {
        match self {
            ConfigFailure::MissingValue => "MissingValue",
            ConfigFailure::NullValueForNonNullField { .. } => "NullValueForNonNullField",
            ConfigFailure::NoDecoderFound { .. } => "NoDecoderFound",
            ConfigFailure::NoStructuredDecoderFound { .. } => "NoStructuredDecoderFound",
            ConfigFailure::DecodeError { .. } => "DecodeError",
            ConfigFailure::ConversionFailure { .. } => "ConversionFailure",
            ConfigFailure::UnsupportedCollectionShape { .. } => "UnsupportedCollectionShape",
            ConfigFailure::CollectionElementErrors { .. } => "CollectionElementErrors",
            ConfigFailure::FieldFailure { .. } => "FieldFailure",
            ConfigFailure::StructuredDecodeFailure { .. } => "StructuredDecodeFailure",
            ConfigFailure::InvalidConstructorArguments { .. } => "InvalidConstructorArguments",
            ConfigFailure::UnknownSource { .. } => "UnknownSource",
            ConfigFailure::MultipleFailures { .. } => "MultipleFailures",
            ConfigFailure::UnparseableSource { .. } => "UnparseableSource",
            ConfigFailure::NoParserFound { .. } => "NoParserFound",
        }
    }

    /// Position of the offending node, when the failure has one.
    pub fn pos(&self) -> Option<&Pos> {
        match self {
            ConfigFailure::NullValueForNonNullField { pos, .. }
            | ConfigFailure::DecodeError { pos, .. }
            | ConfigFailure::ConversionFailure { pos, .. }
            | ConfigFailure::UnsupportedCollectionShape { pos, .. }
            | ConfigFailure::StructuredDecodeFailure { pos, .. }
            | ConfigFailure::UnparseableSource { pos, .. } => Some(pos),
            _ => None,
        }
    }

    /// Tree path of the offending node, when the failure has one.
    pub fn path(&self) -> Option<&str> {
        match self {
            ConfigFailure::NullValueForNonNullField { path, .. }
            | ConfigFailure::DecodeError { path, .. }
            | ConfigFailure::ConversionFailure { path, .. }
            | ConfigFailure::UnsupportedCollectionShape { path, .. }
            | ConfigFailure::CollectionElementErrors { path, .. }
            | ConfigFailure::StructuredDecodeFailure { path, .. } => Some(path),
            _ => None,
        }
    }

    /// Inner failures of the wrapper kinds.
    pub fn children(&self) -> Option<&Failures> {
        match self {
            ConfigFailure::CollectionElementErrors { failures, .. }
            | ConfigFailure::FieldFailure { failures, .. }
            | ConfigFailure::StructuredDecodeFailure { failures, .. }
            | ConfigFailure::MultipleFailures { failures } => Some(failures),
            _ => None,
        }
    }

    /// One-line description, with the source position appended when known.
    pub fn description(&self) -> String {
        match self.pos() {
            Some(pos) if pos.is_known() => format!("{} ({})", self, pos),
            _ => self.to_string(),
        }
    }

    /// Machine-readable form of this failure and all of its inner failures.
    pub fn to_json(&self) -> serde_json::Value {
        use serde_json::json;

        let mut obj = json!({
            "code": self.code(),
            "kind": self.kind_name(),
            "message": self.to_string(),
        });

        if let Some(path) = self.path() {
            obj["path"] = json!(path);
        }
        if let Some(pos) = self.pos().filter(|pos| pos.is_known()) {
            obj["pos"] = serde_json::to_value(pos).unwrap_or(serde_json::Value::Null);
        }
        if let Some(children) = self.children() {
            obj["failures"] = children.to_json();
        }

        obj
    }

    fn write_report(&self, depth: usize, out: &mut String) {
        out.push_str(&"    ".repeat(depth));
        out.push_str("- ");
        out.push_str(&self.description());
        out.push('\n');
        if let Some(children) = self.children() {
            for child in children {
                child.write_report(depth + 1, out);
            }
        }
    }
}

fn node_path(node: &Node) -> String {
    node.path().unwrap_or(ROOT_PATH).to_string()
}

/// A non-empty, ordered collection of failures.
///
/// This is the error side of [`crate::ConfigResult`]. Order is significant:
/// failures appear in declared field / element order.
#[derive(Debug, Clone, PartialEq)]
pub struct Failures(Vec<ConfigFailure>);

impl Failures {
    pub fn one(failure: ConfigFailure) -> Self {
        Failures(vec![failure])
    }

    /// Build from a vector, `None` when it is empty.
    pub fn from_vec(failures: Vec<ConfigFailure>) -> Option<Self> {
        if failures.is_empty() {
            None
        } else {
            Some(Failures(failures))
        }
    }

    /// Append all of `other` after the failures already held.
    pub fn append(&mut self, other: Failures) {
        self.0.extend(other.0);
    }

    pub fn first(&self) -> &ConfigFailure {
        &self.0[0]
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    /// Always `false`; a `Failures` value holds at least one failure.
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn iter(&self) -> std::slice::Iter<'_, ConfigFailure> {
        self.0.iter()
    }

    pub fn as_slice(&self) -> &[ConfigFailure] {
        &self.0
    }

    pub fn into_vec(self) -> Vec<ConfigFailure> {
        self.0
    }

    /// Render every failure, nested failures indented beneath their parent.
    ///
    /// ```text
    /// - Could not decode Database at <root> (app.yml:1:1)
    ///     - Field 'port' could not be decoded
    ///         - Could not convert 'abc' at <root>.port to Long (app.yml:2:7)
    /// ```
    pub fn report(&self) -> String {
        let mut out = String::new();
        for failure in &self.0 {
            failure.write_report(0, &mut out);
        }
        out
    }

    pub fn to_json(&self) -> serde_json::Value {
        serde_json::Value::Array(self.0.iter().map(ConfigFailure::to_json).collect())
    }
}

impl From<ConfigFailure> for Failures {
    fn from(failure: ConfigFailure) -> Self {
        Failures::one(failure)
    }
}

impl IntoIterator for Failures {
    type Item = ConfigFailure;
    type IntoIter = std::vec::IntoIter<ConfigFailure>;

    fn into_iter(self) -> Self::IntoIter {
        self.0.into_iter()
    }
}

impl<'a> IntoIterator for &'a Failures {
    type Item = &'a ConfigFailure;
    type IntoIter = std::slice::Iter<'a, ConfigFailure>;

    fn into_iter(self) -> Self::IntoIter {
        self.0.iter()
    }
}

impl fmt::Display for Failures {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "Error loading config because:")?;
        writeln!(f)?;
        write!(f, "{}", self.report().trim_end())
    }
}

impl std::error::Error for Failures {}
