//! Decoding of record shapes from map nodes.

use super::Decoder;
use crate::context::DecoderContext;
use crate::failure::ConfigFailure;
use crate::node::{Node, ROOT_PATH};
use crate::result::{ConfigResult, ConfigResultExt, fail, sequence};
use crate::shape::{Arguments, FieldShape, RecordShape, Shape, ShapeKind};
use crate::value::Value;
use indexmap::IndexMap;

/// Binds the fields of a [`RecordShape`] from a map node.
///
/// Every field is attempted, and every failure is reported wrapped in a
/// single `StructuredDecodeFailure` for the record. Fields with a default
/// that are absent from the source are left unbound so the constructor sees
/// its own default.
///
/// Registered at the lowest priority so that any user decoder claiming a
/// specific record shape takes precedence.
#[derive(Debug, Clone, Copy, Default)]
pub struct StructuredDecoder;

impl StructuredDecoder {
    fn decode_field(
        &self,
        node: &Node,
        field: &FieldShape,
        ctx: &DecoderContext,
    ) -> ConfigResult<Option<Value>> {
        let raw = ctx.resolve_field(node, field.name());
        let processed = ctx.preprocess(raw);
        let sub = processed.as_ref();

        let defined = sub.is_defined();
        if field.has_default() && !defined {
            return Ok(None);
        }
        if field.is_nullable() && (!defined || sub.is_null()) {
            return Ok(Some(Value::Null));
        }
        if !defined {
            return fail(ConfigFailure::MissingValue);
        }
        if sub.is_null() {
            return fail(ConfigFailure::null_for_non_null(sub));
        }

        let decoder = ctx.decoder(field.shape())?;
        decoder.decode(sub, field.shape(), ctx).map(Some)
    }

    fn decode_record(
        &self,
        node: &Node,
        record: &RecordShape,
        ctx: &DecoderContext,
    ) -> ConfigResult<Value> {
        let path = node.path().unwrap_or(ROOT_PATH);
        tracing::debug!(record = record.name(), path, "decoding record");

        let results = record.fields().iter().map(|field| {
            self.decode_field(node, field, ctx)
                .map(|value| value.map(|v| (field.name().to_string(), v)))
                .wrap_failures(|failures| ConfigFailure::FieldFailure {
                    field: field.name().to_string(),
                    failures,
                })
        });

        let bound: IndexMap<String, Value> = sequence(results)
            .wrap_failures(|failures| ConfigFailure::StructuredDecodeFailure {
                shape: record.name().to_string(),
                pos: node.pos().clone(),
                path: path.to_string(),
                failures,
            })?
            .into_iter()
            .flatten()
            .collect();

        let args = Arguments::new(record, bound);
        record.instantiate(&args).map_err(|error| {
            tracing::debug!(record = record.name(), %error, "constructor rejected arguments");
            ConfigFailure::InvalidConstructorArguments {
                shape: record.name().to_string(),
                args: args.to_string(),
                reason: error.to_string(),
            }
            .into()
        })
    }
}

impl Decoder for StructuredDecoder {
    fn supports(&self, shape: &Shape) -> bool {
        shape.is_record()
    }

    fn priority(&self) -> i32 {
        i32::MIN
    }

    fn decode(&self, node: &Node, shape: &Shape, ctx: &DecoderContext) -> ConfigResult<Value> {
        let ShapeKind::Record(record) = shape.kind() else {
            return fail(ConfigFailure::decode_error(node, shape));
        };
        match node {
            Node::Undefined | Node::Null { .. } if shape.is_nullable() => Ok(Value::Null),
            Node::Map { .. } | Node::Undefined => self.decode_record(node, record, ctx),
            Node::Null { .. } => fail(ConfigFailure::null_for_non_null(node)),
            _ => fail(ConfigFailure::decode_error(node, shape)),
        }
    }
}
