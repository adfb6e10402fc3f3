//! Decoder registry with capability and priority resolution.

use crate::decoder::{
    BooleanDecoder, Decoder, DoubleDecoder, EnumDecoder, IntDecoder, ListDecoder, LongDecoder,
    MapDecoder, NullHandling, PathDecoder, SetDecoder, StringDecoder, StructuredDecoder,
};
use crate::failure::ConfigFailure;
use crate::result::{ConfigResult, fail};
use crate::shape::Shape;
use std::fmt;
use std::sync::Arc;

/// An immutable, cheaply cloned collection of decoders.
///
/// [`DecoderRegistry::register`] returns a new registry and leaves the
/// receiver untouched, so a registry can be shared freely once built.
#[derive(Clone, Default)]
pub struct DecoderRegistry {
    decoders: Arc<Vec<Arc<dyn Decoder>>>,
}

impl DecoderRegistry {
    /// A registry with no decoders.
    pub fn zero() -> Self {
        Self::default()
    }

    /// A registry holding every built-in decoder.
    pub fn defaults() -> Self {
        Self::zero()
            .register(NullHandling(StringDecoder))
            .register(NullHandling(LongDecoder))
            .register(NullHandling(IntDecoder))
            .register(NullHandling(DoubleDecoder))
            .register(NullHandling(BooleanDecoder))
            .register(NullHandling(PathDecoder))
            .register(NullHandling(EnumDecoder))
            .register(NullHandling(ListDecoder))
            .register(NullHandling(SetDecoder))
            .register(NullHandling(MapDecoder))
            .register(StructuredDecoder)
    }

    #[must_use]
    pub fn register<D: Decoder + 'static>(&self, decoder: D) -> Self {
        self.register_arc(Arc::new(decoder))
    }

    #[must_use]
    pub fn register_arc(&self, decoder: Arc<dyn Decoder>) -> Self {
        let mut decoders = Vec::with_capacity(self.decoders.len() + 1);
        decoders.extend(self.decoders.iter().cloned());
        decoders.push(decoder);
        Self {
            decoders: Arc::new(decoders),
        }
    }

    /// Pick the decoder for `shape`.
    ///
    /// Among the decoders supporting the shape, the one with the highest
    /// priority wins. Equal priorities go to the decoder registered first.
    pub fn resolve(&self, shape: &Shape) -> ConfigResult<Arc<dyn Decoder>> {
        let mut best: Option<&Arc<dyn Decoder>> = None;
        for decoder in self.decoders.iter().filter(|d| d.supports(shape)) {
            match best {
                Some(current) if decoder.priority() <= current.priority() => {}
                _ => best = Some(decoder),
            }
        }

        match best {
            Some(decoder) => {
                tracing::trace!(%shape, decoder = decoder.name(), "resolved decoder");
                Ok(Arc::clone(decoder))
            }
            None if shape.is_record() => {
                tracing::trace!(%shape, "no structured decoder");
                fail(ConfigFailure::NoStructuredDecoderFound {
                    shape: shape.to_string(),
                })
            }
            None => {
                tracing::trace!(%shape, "no decoder");
                fail(ConfigFailure::NoDecoderFound {
                    shape: shape.to_string(),
                })
            }
        }
    }

    pub fn len(&self) -> usize {
        self.decoders.len()
    }

    pub fn is_empty(&self) -> bool {
        self.decoders.is_empty()
    }
}

impl fmt::Debug for DecoderRegistry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_list()
            .entries(self.decoders.iter().map(|d| d.name()))
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::context::DecoderContext;
    use crate::node::Node;
    use crate::shape::RecordShape;
    use crate::value::Value;

    struct Fixed {
        priority: i32,
        tag: &'static str,
    }

    impl Decoder for Fixed {
        fn supports(&self, shape: &Shape) -> bool {
            shape.is_named("Tagged")
        }

        fn priority(&self) -> i32 {
            self.priority
        }

        fn decode(&self, _: &Node, _: &Shape, _: &DecoderContext) -> ConfigResult<Value> {
            Ok(Value::String(self.tag.to_string()))
        }
    }

    fn tag_of(registry: &DecoderRegistry) -> Value {
        let ctx = DecoderContext::new(registry.clone());
        let shape = Shape::named("Tagged");
        registry
            .resolve(&shape)
            .unwrap()
            .decode(&Node::Undefined, &shape, &ctx)
            .unwrap()
    }

    #[test]
    fn test_register_is_persistent() {
        let empty = DecoderRegistry::zero();
        let one = empty.register(Fixed { priority: 0, tag: "a" });
        assert_eq!(empty.len(), 0);
        assert!(empty.is_empty());
        assert_eq!(one.len(), 1);
    }

    #[test]
    fn test_ties_go_to_first_registered() {
        let registry = DecoderRegistry::zero()
            .register(Fixed { priority: 3, tag: "first" })
            .register(Fixed { priority: 3, tag: "second" });
        assert_eq!(tag_of(&registry), Value::String("first".into()));
    }

    #[test]
    fn test_missing_decoders() {
        let registry = DecoderRegistry::defaults();
        let err = registry.resolve(&Shape::named("Region")).err().unwrap();
        assert_eq!(
            err.first(),
            &ConfigFailure::NoDecoderFound {
                shape: "Region".to_string()
            }
        );

        let err = DecoderRegistry::zero()
            .resolve(&Shape::record(RecordShape::new("Db")))
            .err().unwrap();
        assert_eq!(
            err.first(),
            &ConfigFailure::NoStructuredDecoderFound {
                shape: "Db".to_string()
            }
        );
    }

    #[test]
    fn test_defaults_cover_builtin_shapes() {
        let registry = DecoderRegistry::defaults();
        for shape in [
            Shape::string(),
            Shape::long(),
            Shape::int(),
            Shape::double(),
            Shape::boolean(),
            Shape::path(),
            Shape::enumeration("E", ["A"]),
            Shape::list(Shape::string()),
            Shape::set(Shape::string()),
            Shape::map(Shape::string()),
            Shape::record(RecordShape::new("R")),
        ] {
            assert!(registry.resolve(&shape).is_ok(), "no decoder for {}", shape);
        }
    }
}
