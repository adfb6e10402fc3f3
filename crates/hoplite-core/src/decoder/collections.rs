//! List, set and map decoders.
//!
//! Lists and sets accept either an array node or a comma separated string
//! (`"a, b, c"`). Both forms decode every element against the element shape
//! and produce the same value.

use super::{Decoder, NullHandlingDecoder};
use crate::context::DecoderContext;
use crate::failure::ConfigFailure;
use crate::node::Node;
use crate::result::{ConfigResult, ConfigResultExt, fail, sequence};
use crate::shape::{Shape, ShapeKind};
use crate::value::Value;
use indexmap::IndexMap;
use std::sync::Arc;

/// Decode the elements of an array node, or of a comma separated string node.
///
/// The element decoder is resolved once up front; a resolution failure is
/// returned unwrapped. Array elements go through the context's preprocessors;
/// split tokens come from a string that already did.
fn decode_elements(
    kind: &str,
    node: &Node,
    element: &Shape,
    ctx: &DecoderContext,
) -> ConfigResult<Vec<Value>> {
    let decoder: Arc<dyn Decoder> = ctx.decoder(element)?;
    let path = node.path().unwrap_or_default().to_string();

    let results: Vec<ConfigResult<Value>> = match node {
        Node::Array { elements, .. } => elements
            .iter()
            .map(|e| decoder.decode(&ctx.preprocess(e), element, ctx))
            .collect(),
        Node::String { value, pos, .. } => value
            .split(',')
            .map(|token| {
                let synthetic = Node::string(token.trim(), pos.clone(), path.as_str());
                decoder.decode(&synthetic, element, ctx)
            })
            .collect(),
        _ => return fail(ConfigFailure::unsupported_collection(kind, node)),
    };

    sequence(results).wrap_failures(|failures| ConfigFailure::CollectionElementErrors {
        kind: kind.to_string(),
        path,
        failures,
    })
}

#[derive(Debug, Clone, Copy, Default)]
pub struct ListDecoder;

impl NullHandlingDecoder for ListDecoder {
    fn supports(&self, shape: &Shape) -> bool {
        matches!(shape.kind(), ShapeKind::List(_))
    }

    fn safe_decode(&self, node: &Node, shape: &Shape, ctx: &DecoderContext) -> ConfigResult<Value> {
        let ShapeKind::List(element) = shape.kind() else {
            return fail(ConfigFailure::decode_error(node, shape));
        };
        decode_elements("List", node, element, ctx).map(Value::List)
    }
}

/// Like [`ListDecoder`], with duplicates collapsed to their first occurrence.
#[derive(Debug, Clone, Copy, Default)]
pub struct SetDecoder;

impl NullHandlingDecoder for SetDecoder {
    fn supports(&self, shape: &Shape) -> bool {
        matches!(shape.kind(), ShapeKind::Set(_))
    }

    fn safe_decode(&self, node: &Node, shape: &Shape, ctx: &DecoderContext) -> ConfigResult<Value> {
        let ShapeKind::Set(element) = shape.kind() else {
            return fail(ConfigFailure::decode_error(node, shape));
        };
        decode_elements("Set", node, element, ctx).map(Value::set_of)
    }
}

/// String-keyed maps. Keys are taken literally; only map nodes are accepted.
#[derive(Debug, Clone, Copy, Default)]
pub struct MapDecoder;

impl NullHandlingDecoder for MapDecoder {
    fn supports(&self, shape: &Shape) -> bool {
        matches!(shape.kind(), ShapeKind::Map(_))
    }

    fn safe_decode(&self, node: &Node, shape: &Shape, ctx: &DecoderContext) -> ConfigResult<Value> {
        let ShapeKind::Map(value_shape) = shape.kind() else {
            return fail(ConfigFailure::decode_error(node, shape));
        };
        let Node::Map { entries, path, .. } = node else {
            return fail(ConfigFailure::unsupported_collection("Map", node));
        };
        let decoder = ctx.decoder(value_shape)?;

        let results = entries.iter().map(|(key, value)| {
            decoder
                .decode(&ctx.preprocess(value), value_shape, ctx)
                .map(|decoded| (key.clone(), decoded))
                .wrap_failures(|failures| ConfigFailure::FieldFailure {
                    field: key.clone(),
                    failures,
                })
        });

        sequence(results)
            .wrap_failures(|failures| ConfigFailure::CollectionElementErrors {
                kind: "Map".to_string(),
                path: path.clone(),
                failures,
            })
            .map(|pairs| Value::Map(pairs.into_iter().collect::<IndexMap<_, _>>()))
    }
}
