use super::NullHandlingDecoder;
use crate::context::DecoderContext;
use crate::failure::ConfigFailure;
use crate::node::Node;
use crate::result::{ConfigResult, fail};
use crate::shape::{Shape, ShapeKind};
use crate::value::Value;

/// Matches a string node against the constants of an enum shape.
///
/// Matching is exact and case-sensitive.
#[derive(Debug, Clone, Copy, Default)]
pub struct EnumDecoder;

impl NullHandlingDecoder for EnumDecoder {
    fn supports(&self, shape: &Shape) -> bool {
        matches!(shape.kind(), ShapeKind::Enum(_))
    }

    fn safe_decode(&self, node: &Node, shape: &Shape, _: &DecoderContext) -> ConfigResult<Value> {
        let ShapeKind::Enum(e) = shape.kind() else {
            return fail(ConfigFailure::decode_error(node, shape));
        };
        match node {
            Node::String { value, .. } => match e.find(value) {
                Some(constant) => Ok(Value::Enum(constant.to_string())),
                None => fail(ConfigFailure::conversion(node, shape)),
            },
            _ => fail(ConfigFailure::decode_error(node, shape)),
        }
    }
}
