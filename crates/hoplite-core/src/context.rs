//! The state threaded through a decode.

use crate::decoder::Decoder;
use crate::mapper::{IdentityParamMapper, ParameterMapper};
use crate::node::{Node, UNDEFINED};
use crate::preprocessor::Preprocessor;
use crate::registry::DecoderRegistry;
use crate::result::ConfigResult;
use crate::shape::Shape;
use crate::value::Value;
use std::borrow::Cow;
use std::fmt;
use std::sync::Arc;

/// Registry, parameter mappers and preprocessors used by every decoder of
/// one decode.
///
/// A context is built once and shared by reference through the whole
/// recursion; decoders never modify it.
#[derive(Clone)]
pub struct DecoderContext {
    registry: DecoderRegistry,
    param_mappers: Vec<Arc<dyn ParameterMapper>>,
    preprocessors: Vec<Arc<dyn Preprocessor>>,
}

impl DecoderContext {
    /// A context with the identity mapper and no preprocessors.
    pub fn new(registry: DecoderRegistry) -> Self {
        Self {
            registry,
            param_mappers: vec![Arc::new(IdentityParamMapper)],
            preprocessors: Vec::new(),
        }
    }

    /// A context with no mappers at all; callers add them explicitly.
    pub fn bare(registry: DecoderRegistry) -> Self {
        Self {
            registry,
            param_mappers: Vec::new(),
            preprocessors: Vec::new(),
        }
    }

    #[must_use]
    pub fn with_param_mapper(mut self, mapper: impl ParameterMapper + 'static) -> Self {
        self.param_mappers.push(Arc::new(mapper));
        self
    }

    #[must_use]
    pub fn with_preprocessor(mut self, preprocessor: impl Preprocessor + 'static) -> Self {
        self.preprocessors.push(Arc::new(preprocessor));
        self
    }

    #[must_use]
    pub fn with_param_mapper_arc(mut self, mapper: Arc<dyn ParameterMapper>) -> Self {
        self.param_mappers.push(mapper);
        self
    }

    #[must_use]
    pub fn with_preprocessor_arc(mut self, preprocessor: Arc<dyn Preprocessor>) -> Self {
        self.preprocessors.push(preprocessor);
        self
    }

    pub fn registry(&self) -> &DecoderRegistry {
        &self.registry
    }

    pub fn param_mappers(&self) -> &[Arc<dyn ParameterMapper>] {
        &self.param_mappers
    }

    pub fn preprocessors(&self) -> &[Arc<dyn Preprocessor>] {
        &self.preprocessors
    }

    /// Resolve the decoder for `shape` from the registry.
    pub fn decoder(&self, shape: &Shape) -> ConfigResult<Arc<dyn Decoder>> {
        self.registry.resolve(shape)
    }

    /// Resolve a decoder for `shape` and decode `node` with it.
    pub fn decode(&self, node: &Node, shape: &Shape) -> ConfigResult<Value> {
        self.decoder(shape)?.decode(node, shape, self)
    }

    /// The child of `node` holding field `name`.
    ///
    /// Each mapper is tried in order and the first mapped key that is present
    /// wins. `Undefined` when no mapping matches.
    pub fn resolve_field<'a>(&self, node: &'a Node, name: &str) -> &'a Node {
        self.param_mappers
            .iter()
            .map(|mapper| node.at_key(&mapper.map(name)))
            .find(|child| child.is_defined())
            .unwrap_or(&UNDEFINED)
    }

    /// Run every preprocessor over `node`, in order.
    ///
    /// Borrows `node` unless some preprocessor rewrote it. Only `node` itself
    /// is rewritten; its children are preprocessed when they are decoded.
    pub fn preprocess<'a>(&self, node: &'a Node) -> Cow<'a, Node> {
        let mut current = Cow::Borrowed(node);
        for preprocessor in &self.preprocessors {
            if let Some(rewritten) = preprocessor.process(&current) {
                current = Cow::Owned(rewritten);
            }
        }
        current
    }
}

impl fmt::Debug for DecoderContext {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("DecoderContext")
            .field("registry", &self.registry)
            .field("param_mappers", &self.param_mappers.len())
            .field("preprocessors", &self.preprocessors.len())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::mapper::{CamelCaseParamMapper, KebabCaseParamMapper};
    use crate::pos::Pos;
    use indexmap::IndexMap;

    fn node(keys: &[&str]) -> Node {
        let entries: IndexMap<String, Node> = keys
            .iter()
            .enumerate()
            .map(|(i, k)| {
                let value = i64::try_from(i).unwrap_or_default();
                ((*k).to_string(), Node::long(value, Pos::NoPos, Node::child_path_key("<root>", k)))
            })
            .collect();
        Node::map(entries, Pos::NoPos, "<root>")
    }

    fn ctx() -> DecoderContext {
        DecoderContext::new(DecoderRegistry::zero())
            .with_param_mapper(CamelCaseParamMapper)
            .with_param_mapper(KebabCaseParamMapper)
    }

    #[test]
    fn test_first_present_mapping_wins() {
        let n = node(&["max-size", "maxSize"]);
        assert_eq!(ctx().resolve_field(&n, "max_size").path(), Some("<root>.maxSize"));

        let n = node(&["max-size"]);
        assert_eq!(ctx().resolve_field(&n, "max_size").path(), Some("<root>.max-size"));

        let n = node(&["max_size", "maxSize"]);
        assert_eq!(ctx().resolve_field(&n, "max_size").path(), Some("<root>.max_size"));
    }

    #[test]
    fn test_unmatched_field_is_undefined() {
        let n = node(&["other"]);
        assert_eq!(ctx().resolve_field(&n, "max_size"), &Node::Undefined);
    }

    #[test]
    fn test_preprocess_without_preprocessors_borrows() {
        let n = node(&["a"]);
        assert!(matches!(ctx().preprocess(&n), Cow::Borrowed(_)));
    }
}
