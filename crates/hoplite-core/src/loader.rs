//! Loading typed configuration from files.
//!
//! ```rust,ignore
//! let loader = ConfigLoader::builder()
//!     .add_parser(YamlParser)
//!     .build();
//! let db: Database = loader.load_config("config/db.yml")?;
//! ```

use crate::context::DecoderContext;
use crate::decoder::Decoder;
use crate::failure::ConfigFailure;
use crate::mapper::{
    CamelCaseParamMapper, IdentityParamMapper, KebabCaseParamMapper, ParameterMapper,
};
use crate::node::Node;
use crate::parser::Parser;
use crate::preprocessor::{EnvVarPreprocessor, Preprocessor};
use crate::registry::DecoderRegistry;
use crate::result::{ConfigResult, fail};
use crate::shape::Shape;
use crate::source::{FileSource, ResourceRoots};
use crate::value::Value;
use indexmap::IndexMap;
use std::any::Any;
use std::fmt;
use std::path::Path;
use std::sync::Arc;

/// A type that can be loaded by [`ConfigLoader::load_config`].
///
/// The shape must be a record whose constructor produces `Self`.
pub trait Config: Any + Clone + Send + Sync {
    fn shape() -> Shape;
}

/// Parses sources and decodes them with a fixed context.
#[derive(Clone)]
pub struct ConfigLoader {
    context: DecoderContext,
    parsers: IndexMap<String, Arc<dyn Parser>>,
    resource_roots: ResourceRoots,
}

impl ConfigLoader {
    pub fn builder() -> ConfigLoaderBuilder {
        ConfigLoaderBuilder::default()
    }

    pub fn context(&self) -> &DecoderContext {
        &self.context
    }

    /// The parser registered for a file extension.
    pub fn parser_for(&self, ext: &str) -> Option<&Arc<dyn Parser>> {
        self.parsers.get(&ext.to_ascii_lowercase())
    }

    /// Read and parse one source with the parser for its extension.
    pub fn parse_source(&self, source: &FileSource) -> ConfigResult<Node> {
        let name = source.describe();
        let ext = source.ext().unwrap_or_default();
        let Some(parser) = self.parser_for(&ext) else {
            return fail(ConfigFailure::NoParserFound {
                source_name: name,
                extension: ext,
            });
        };

        let text = source.open()?;
        tracing::debug!(source = %name, ext = %ext, "parsing config source");
        parser.load(&text, &name).map_err(|err| {
            ConfigFailure::UnparseableSource {
                source_name: name.clone(),
                message: err.to_string(),
                pos: err.pos(),
            }
            .into()
        })
    }

    /// Resolve and parse a file path.
    pub fn load_node(&self, path: impl AsRef<Path>) -> ConfigResult<Node> {
        let sources = FileSource::from_paths([path])?;
        self.parse_sources(&sources)
    }

    /// Resolve and parse a resource name against the configured roots.
    pub fn load_resource_node(&self, name: &str) -> ConfigResult<Node> {
        let sources = self.resource_roots.resolve([name])?;
        self.parse_sources(&sources)
    }

    fn parse_sources(&self, sources: &[FileSource]) -> ConfigResult<Node> {
        match sources {
            [source] => self.parse_source(source),
            _ => fail(ConfigFailure::UnknownSource {
                identifier: sources
                    .iter()
                    .map(FileSource::describe)
                    .collect::<Vec<_>>()
                    .join(", "),
            }),
        }
    }

    pub fn decode(&self, node: &Node, shape: &Shape) -> ConfigResult<Value> {
        self.context.decode(node, shape)
    }

    pub fn load_value(&self, path: impl AsRef<Path>, shape: &Shape) -> ConfigResult<Value> {
        let node = self.load_node(path)?;
        self.decode(&node, shape)
    }

    pub fn load_config<T: Config>(&self, path: impl AsRef<Path>) -> ConfigResult<T> {
        let node = self.load_node(path)?;
        self.decode_config(&node)
    }

    pub fn load_config_resource<T: Config>(&self, name: &str) -> ConfigResult<T> {
        let node = self.load_resource_node(name)?;
        self.decode_config(&node)
    }

    /// Decode an already parsed tree into `T`.
    pub fn decode_config<T: Config>(&self, node: &Node) -> ConfigResult<T> {
        let shape = T::shape();
        let value = self.decode(node, &shape)?;
        match value.downcast::<T>() {
            Some(config) => Ok(config),
            None => fail(ConfigFailure::InvalidConstructorArguments {
                shape: shape.to_string(),
                args: value.to_string(),
                reason: format!("constructor does not produce {}", std::any::type_name::<T>()),
            }),
        }
    }
}

impl fmt::Debug for ConfigLoader {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ConfigLoader")
            .field("context", &self.context)
            .field("extensions", &self.parsers.keys().collect::<Vec<_>>())
            .field("resource_roots", &self.resource_roots)
            .finish()
    }
}

/// Assembles a [`ConfigLoader`].
///
/// Starts from the built-in decoders, the identity, camelCase and
/// kebab-case parameter mappers, the environment variable preprocessor and
/// no parsers.
pub struct ConfigLoaderBuilder {
    registry: DecoderRegistry,
    param_mappers: Vec<Arc<dyn ParameterMapper>>,
    preprocessors: Vec<Arc<dyn Preprocessor>>,
    parsers: IndexMap<String, Arc<dyn Parser>>,
    resource_roots: ResourceRoots,
}

impl Default for ConfigLoaderBuilder {
    fn default() -> Self {
        Self {
            registry: DecoderRegistry::defaults(),
            param_mappers: vec![
                Arc::new(IdentityParamMapper),
                Arc::new(CamelCaseParamMapper),
                Arc::new(KebabCaseParamMapper),
            ],
            preprocessors: vec![Arc::new(EnvVarPreprocessor::new())],
            parsers: IndexMap::new(),
            resource_roots: ResourceRoots::default(),
        }
    }
}

impl ConfigLoaderBuilder {
    /// Replace the whole registry.
    pub fn registry(mut self, registry: DecoderRegistry) -> Self {
        self.registry = registry;
        self
    }

    pub fn add_decoder(mut self, decoder: impl Decoder + 'static) -> Self {
        self.registry = self.registry.register(decoder);
        self
    }

    pub fn add_param_mapper(mut self, mapper: impl ParameterMapper + 'static) -> Self {
        self.param_mappers.push(Arc::new(mapper));
        self
    }

    pub fn add_preprocessor(mut self, preprocessor: impl Preprocessor + 'static) -> Self {
        self.preprocessors.push(Arc::new(preprocessor));
        self
    }

    pub fn clear_preprocessors(mut self) -> Self {
        self.preprocessors.clear();
        self
    }

    /// Register a parser for each of its default extensions. A later parser
    /// replaces an earlier one for the same extension.
    pub fn add_parser(self, parser: impl Parser + 'static) -> Self {
        let parser: Arc<dyn Parser> = Arc::new(parser);
        let extensions = parser.default_file_extensions();
        extensions
            .into_iter()
            .fold(self, |builder, ext| builder.add_parser_for(ext, Arc::clone(&parser)))
    }

    pub fn add_parser_for(mut self, ext: impl Into<String>, parser: Arc<dyn Parser>) -> Self {
        self.parsers.insert(ext.into().to_ascii_lowercase(), parser);
        self
    }

    pub fn resource_roots(mut self, roots: ResourceRoots) -> Self {
        self.resource_roots = roots;
        self
    }

    pub fn build(self) -> ConfigLoader {
        let context = self.param_mappers.into_iter().fold(
            DecoderContext::bare(self.registry),
            DecoderContext::with_param_mapper_arc,
        );
        let context = self
            .preprocessors
            .into_iter()
            .fold(context, DecoderContext::with_preprocessor_arc);
        tracing::debug!(
            decoders = context.registry().len(),
            parsers = self.parsers.len(),
            "built config loader"
        );
        ConfigLoader {
            context,
            parsers: self.parsers,
            resource_roots: self.resource_roots,
        }
    }
}
