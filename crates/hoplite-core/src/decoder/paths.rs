use super::NullHandlingDecoder;
use crate::context::DecoderContext;
use crate::failure::ConfigFailure;
use crate::node::Node;
use crate::result::{ConfigResult, fail};
use crate::shape::{Shape, ShapeKind};
use crate::value::Value;
use std::path::PathBuf;

/// String nodes as filesystem paths. The path is not checked for existence.
#[derive(Debug, Clone, Copy, Default)]
pub struct PathDecoder;

impl NullHandlingDecoder for PathDecoder {
    fn supports(&self, shape: &Shape) -> bool {
        matches!(shape.kind(), ShapeKind::Path)
    }

    fn safe_decode(&self, node: &Node, shape: &Shape, _: &DecoderContext) -> ConfigResult<Value> {
        match node {
            Node::String { value, .. } => Ok(Value::Path(PathBuf::from(value))),
            _ => fail(ConfigFailure::decode_error(node, shape)),
        }
    }
}
