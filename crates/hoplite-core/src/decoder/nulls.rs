use super::Decoder;
use crate::context::DecoderContext;
use crate::failure::ConfigFailure;
use crate::node::Node;
use crate::result::{ConfigResult, fail};
use crate::shape::Shape;
use crate::value::Value;

/// A decoder that only ever sees defined, non-null nodes.
///
/// Wrap implementations in [`NullHandling`] to register them.
pub trait NullHandlingDecoder: Send + Sync {
    fn supports(&self, shape: &Shape) -> bool;

    fn priority(&self) -> i32 {
        0
    }

    fn safe_decode(&self, node: &Node, shape: &Shape, ctx: &DecoderContext) -> ConfigResult<Value>;
}

/// Adapts a [`NullHandlingDecoder`] into a [`Decoder`].
///
/// | node      | nullable shape | non-null shape               |
/// |-----------|----------------|------------------------------|
/// | Undefined | `Value::Null`  | `MissingValue`               |
/// | Null      | `Value::Null`  | `NullValueForNonNullField`   |
/// | other     | `safe_decode`  | `safe_decode`                |
#[derive(Debug, Clone, Copy, Default)]
pub struct NullHandling<D>(pub D);

impl<D: NullHandlingDecoder> Decoder for NullHandling<D> {
    fn supports(&self, shape: &Shape) -> bool {
        self.0.supports(shape)
    }

    fn priority(&self) -> i32 {
        self.0.priority()
    }

    fn decode(&self, node: &Node, shape: &Shape, ctx: &DecoderContext) -> ConfigResult<Value> {
        match node {
            Node::Undefined if shape.is_nullable() => Ok(Value::Null),
            Node::Undefined => fail(ConfigFailure::MissingValue),
            Node::Null { .. } if shape.is_nullable() => Ok(Value::Null),
            Node::Null { .. } => fail(ConfigFailure::null_for_non_null(node)),
            _ => self.0.safe_decode(node, shape, ctx),
        }
    }

    fn name(&self) -> &'static str {
        std::any::type_name::<D>()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::pos::Pos;
    use crate::registry::DecoderRegistry;
    use crate::shape::ShapeKind;

    struct Echo;

    impl NullHandlingDecoder for Echo {
        fn supports(&self, shape: &Shape) -> bool {
            matches!(shape.kind(), ShapeKind::String)
        }

        fn safe_decode(&self, _: &Node, _: &Shape, _: &DecoderContext) -> ConfigResult<Value> {
            Ok(Value::String("decoded".to_string()))
        }
    }

    fn decode(node: &Node, shape: &Shape) -> ConfigResult<Value> {
        let ctx = DecoderContext::new(DecoderRegistry::zero());
        NullHandling(Echo).decode(node, shape, &ctx)
    }

    #[test]
    fn test_nullable_accepts_null_and_undefined() {
        let shape = Shape::string().nullable();
        assert_eq!(decode(&Node::Undefined, &shape), Ok(Value::Null));
        assert_eq!(
            decode(&Node::null(Pos::NoPos, "<root>.a"), &shape),
            Ok(Value::Null)
        );
    }

    #[test]
    fn test_non_null_rejects_null_and_undefined() {
        let shape = Shape::string();
        let err = decode(&Node::Undefined, &shape).unwrap_err();
        assert_eq!(err.first(), &ConfigFailure::MissingValue);

        let err = decode(&Node::null(Pos::NoPos, "<root>.a"), &shape).unwrap_err();
        assert_eq!(
            err.first(),
            &ConfigFailure::NullValueForNonNullField {
                path: "<root>.a".to_string(),
                pos: Pos::NoPos,
            }
        );
    }

    #[test]
    fn test_defined_nodes_are_delegated() {
        let node = Node::long(1, Pos::NoPos, "<root>");
        assert_eq!(
            decode(&node, &Shape::string()),
            Ok(Value::String("decoded".to_string()))
        );
    }
}
