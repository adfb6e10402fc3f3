//! Scalar decoders.

use super::NullHandlingDecoder;
use crate::context::DecoderContext;
use crate::failure::ConfigFailure;
use crate::node::Node;
use crate::result::{ConfigResult, fail};
use crate::shape::{Shape, ShapeKind};
use crate::value::Value;

/// Any scalar node, rendered as text.
#[derive(Debug, Clone, Copy, Default)]
pub struct StringDecoder;

impl NullHandlingDecoder for StringDecoder {
    fn supports(&self, shape: &Shape) -> bool {
        matches!(shape.kind(), ShapeKind::String)
    }

    fn safe_decode(&self, node: &Node, shape: &Shape, _: &DecoderContext) -> ConfigResult<Value> {
        match node {
            Node::String { .. } | Node::Long { .. } | Node::Double { .. } | Node::Boolean { .. } => {
                match node.value_or_none() {
                    Some(text) => Ok(Value::String(text)),
                    None => fail(ConfigFailure::decode_error(node, shape)),
                }
            }
            _ => fail(ConfigFailure::decode_error(node, shape)),
        }
    }
}

fn parse_integer(node: &Node, shape: &Shape) -> ConfigResult<i64> {
    match node {
        Node::Long { value, .. } => Ok(*value),
        Node::String { value, .. } => value
            .trim()
            .parse::<i64>()
            .map_err(|_| ConfigFailure::conversion(node, shape).into()),
        _ => fail(ConfigFailure::decode_error(node, shape)),
    }
}

#[derive(Debug, Clone, Copy, Default)]
pub struct LongDecoder;

impl NullHandlingDecoder for LongDecoder {
    fn supports(&self, shape: &Shape) -> bool {
        matches!(shape.kind(), ShapeKind::Long)
    }

    fn safe_decode(&self, node: &Node, shape: &Shape, _: &DecoderContext) -> ConfigResult<Value> {
        parse_integer(node, shape).map(Value::Long)
    }
}

/// 32-bit integers. Values outside `i32` are a conversion failure.
#[derive(Debug, Clone, Copy, Default)]
pub struct IntDecoder;

impl NullHandlingDecoder for IntDecoder {
    fn supports(&self, shape: &Shape) -> bool {
        matches!(shape.kind(), ShapeKind::Int)
    }

    fn safe_decode(&self, node: &Node, shape: &Shape, _: &DecoderContext) -> ConfigResult<Value> {
        let value = parse_integer(node, shape)?;
        match i32::try_from(value) {
            Ok(v) => Ok(Value::Long(i64::from(v))),
            Err(_) => fail(ConfigFailure::conversion(node, shape)),
        }
    }
}

#[derive(Debug, Clone, Copy, Default)]
pub struct DoubleDecoder;

impl NullHandlingDecoder for DoubleDecoder {
    fn supports(&self, shape: &Shape) -> bool {
        matches!(shape.kind(), ShapeKind::Double)
    }

    #[allow(clippy::cast_precision_loss)]
    fn safe_decode(&self, node: &Node, shape: &Shape, _: &DecoderContext) -> ConfigResult<Value> {
        match node {
            Node::Double { value, .. } => Ok(Value::Double(*value)),
            Node::Long { value, .. } => Ok(Value::Double(*value as f64)),
            Node::String { value, .. } => match value.trim().parse::<f64>() {
                // `inf` spelled out is fine, a numeral that overflows is not
                Ok(f) if f.is_finite() || !value.bytes().any(|b| b.is_ascii_digit()) => {
                    Ok(Value::Double(f))
                }
                _ => fail(ConfigFailure::conversion(node, shape)),
            },
            _ => fail(ConfigFailure::decode_error(node, shape)),
        }
    }
}

#[derive(Debug, Clone, Copy, Default)]
pub struct BooleanDecoder;

impl NullHandlingDecoder for BooleanDecoder {
    fn supports(&self, shape: &Shape) -> bool {
        matches!(shape.kind(), ShapeKind::Boolean)
    }

    fn safe_decode(&self, node: &Node, shape: &Shape, _: &DecoderContext) -> ConfigResult<Value> {
        match node {
            Node::Boolean { value, .. } => Ok(Value::Boolean(*value)),
            Node::String { value, .. } => match value.trim().to_ascii_lowercase().as_str() {
                "true" => Ok(Value::Boolean(true)),
                "false" => Ok(Value::Boolean(false)),
                _ => fail(ConfigFailure::conversion(node, shape)),
            },
            _ => fail(ConfigFailure::decode_error(node, shape)),
        }
    }
}
