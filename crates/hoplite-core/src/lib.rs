//! Typed decoding of position-annotated configuration trees.
//!
//! Front-ends (see the `hoplite-yaml` and `hoplite-json` crates) parse text
//! into a [`Node`] tree where every node knows its source position and its
//! path from the root. This crate turns such a tree into typed values
//! described by a [`Shape`], reporting every problem it finds rather than
//! stopping at the first one.
//!
//! # Decoding
//!
//! ```rust
//! use hoplite_core::{DecoderRegistry, Node, Pos, RecordShape, Shape, Value, decode};
//! use indexmap::IndexMap;
//!
//! let mut entries = IndexMap::new();
//! entries.insert("port".to_string(), Node::string("abc", Pos::NoPos, "<root>.port"));
//! let node = Node::map(entries, Pos::NoPos, "<root>");
//!
//! let shape = Shape::record(
//!     RecordShape::new("Server")
//!         .field("host", Shape::string())
//!         .field("port", Shape::long()),
//! );
//!
//! let failures = decode(&node, &shape, &DecoderRegistry::defaults()).unwrap_err();
//! // Both the missing host and the bad port are reported.
//! assert!(failures.report().contains("Field 'host'"));
//! assert!(failures.report().contains("Field 'port'"));
//! ```
//!
//! # Components
//!
//! - [`node`], [`pos`]: the value tree.
//! - [`failure`], [`result`]: failures and the accumulation helpers.
//! - [`shape`], [`value`]: target descriptions and decoded values.
//! - [`decoder`], [`registry`], [`context`]: decoders and their resolution.
//! - [`mapper`], [`preprocessor`]: field name mapping and node rewriting.
//! - [`parser`], [`source`], [`loader`]: front-end contract, sources, loading.

pub mod context;
pub mod decoder;
pub mod failure;
pub mod loader;
pub mod mapper;
pub mod node;
pub mod parser;
pub mod pos;
pub mod preprocessor;
pub mod registry;
pub mod result;
pub mod shape;
pub mod source;
pub mod value;

pub use context::DecoderContext;
pub use decoder::{Decoder, NullHandling, NullHandlingDecoder};
pub use failure::{ConfigFailure, Failures};
pub use loader::{Config, ConfigLoader, ConfigLoaderBuilder};
pub use mapper::{CamelCaseParamMapper, IdentityParamMapper, KebabCaseParamMapper, ParameterMapper};
pub use node::{Node, ROOT_PATH};
pub use parser::{ParseError, Parser};
pub use pos::Pos;
pub use preprocessor::{EnvVarPreprocessor, Preprocessor};
pub use registry::DecoderRegistry;
pub use result::{ConfigResult, ConfigResultExt, fail, sequence, zip};
pub use shape::{
    Arguments, ConstructError, EnumShape, FieldShape, RecordShape, Shape, ShapeKind,
};
pub use source::{FileSource, ResourceRoots};
pub use value::{FromValue, Value, ValueError};

/// Decode `node` into `shape` using `registry` and the identity parameter
/// mapper.
pub fn decode(node: &Node, shape: &Shape, registry: &DecoderRegistry) -> ConfigResult<Value> {
    decode_with_context(node, shape, &DecoderContext::new(registry.clone()))
}

/// Decode `node` into `shape` with a fully configured context.
pub fn decode_with_context(node: &Node, shape: &Shape, ctx: &DecoderContext) -> ConfigResult<Value> {
    ctx.decode(node, shape)
}
