//! Target shapes: descriptions of what a node should be decoded into.
//!
//! Shapes are plain data assembled by the application, usually once per
//! configuration type:
//!
//! ```rust
//! use hoplite_core::{RecordShape, Shape, Value};
//!
//! #[derive(Clone)]
//! struct Database {
//!     host: String,
//!     port: i64,
//! }
//!
//! let shape = Shape::record(
//!     RecordShape::new("Database")
//!         .field("host", Shape::string())
//!         .field_with_default("port", Shape::long(), || Value::Long(5432))
//!         .construct(|args| {
//!             Ok(Database {
//!                 host: args.get("host")?,
//!                 port: args.get("port")?,
//!             })
//!         }),
//! );
//! assert_eq!(shape.to_string(), "Database");
//! ```

use crate::value::{FromValue, Value, ValueError};
use indexmap::IndexMap;
use std::any::Any;
use std::fmt;
use std::sync::Arc;
use thiserror::Error;

/// Produces the default for a field that was absent from the source.
pub type DefaultThunk = Arc<dyn Fn() -> Value + Send + Sync>;

/// Builds the final value of a record from its bound fields.
pub type Constructor = Arc<dyn Fn(&Arguments<'_>) -> Result<Value, ConstructError> + Send + Sync>;

/// A target type, plus whether null/absent is an acceptable value for it.
#[derive(Debug, Clone, PartialEq)]
pub struct Shape {
    kind: ShapeKind,
    nullable: bool,
}

#[derive(Debug, Clone, PartialEq)]
pub enum ShapeKind {
    String,
    /// 64-bit signed integer.
    Long,
    /// 32-bit signed integer.
    Int,
    Double,
    Boolean,
    Path,
    Enum(EnumShape),
    List(Box<Shape>),
    Set(Box<Shape>),
    /// String keys to values of the inner shape.
    Map(Box<Shape>),
    Record(RecordShape),
    /// A leaf type known only to user-registered decoders.
    Named(String),
}

impl Shape {
    pub fn new(kind: ShapeKind) -> Self {
        Self {
            kind,
            nullable: false,
        }
    }

    pub fn string() -> Self {
        Self::new(ShapeKind::String)
    }

    pub fn long() -> Self {
        Self::new(ShapeKind::Long)
    }

    pub fn int() -> Self {
        Self::new(ShapeKind::Int)
    }

    pub fn double() -> Self {
        Self::new(ShapeKind::Double)
    }

    pub fn boolean() -> Self {
        Self::new(ShapeKind::Boolean)
    }

    pub fn path() -> Self {
        Self::new(ShapeKind::Path)
    }

    pub fn enumeration<I, S>(name: impl Into<String>, constants: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self::new(ShapeKind::Enum(EnumShape::new(name, constants)))
    }

    pub fn list(element: Shape) -> Self {
        Self::new(ShapeKind::List(Box::new(element)))
    }

    pub fn set(element: Shape) -> Self {
        Self::new(ShapeKind::Set(Box::new(element)))
    }

    pub fn map(value: Shape) -> Self {
        Self::new(ShapeKind::Map(Box::new(value)))
    }

    pub fn record(record: RecordShape) -> Self {
        Self::new(ShapeKind::Record(record))
    }

    pub fn named(name: impl Into<String>) -> Self {
        Self::new(ShapeKind::Named(name.into()))
    }

    /// The same shape, accepting null and absent values.
    pub fn nullable(mut self) -> Self {
        self.nullable = true;
        self
    }

    pub fn kind(&self) -> &ShapeKind {
        &self.kind
    }

    pub fn is_nullable(&self) -> bool {
        self.nullable
    }

    pub fn is_record(&self) -> bool {
        matches!(self.kind, ShapeKind::Record(_))
    }

    pub fn as_record(&self) -> Option<&RecordShape> {
        match &self.kind {
            ShapeKind::Record(record) => Some(record),
            _ => None,
        }
    }

    /// `true` if this is a [`ShapeKind::Named`] shape called `name`.
    pub fn is_named(&self, name: &str) -> bool {
        matches!(&self.kind, ShapeKind::Named(n) if n == name)
    }
}

impl fmt::Display for Shape {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.kind {
            ShapeKind::String => write!(f, "String")?,
            ShapeKind::Long => write!(f, "Long")?,
            ShapeKind::Int => write!(f, "Int")?,
            ShapeKind::Double => write!(f, "Double")?,
            ShapeKind::Boolean => write!(f, "Boolean")?,
            ShapeKind::Path => write!(f, "Path")?,
            ShapeKind::Enum(e) => write!(f, "{}", e.name)?,
            ShapeKind::List(element) => write!(f, "List<{}>", element)?,
            ShapeKind::Set(element) => write!(f, "Set<{}>", element)?,
            ShapeKind::Map(value) => write!(f, "Map<String, {}>", value)?,
            ShapeKind::Record(record) => write!(f, "{}", record.name)?,
            ShapeKind::Named(name) => write!(f, "{}", name)?,
        }
        if self.nullable {
            write!(f, "?")?;
        }
        Ok(())
    }
}

/// An enumerated type: a name and the exact textual form of each constant.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EnumShape {
    name: String,
    constants: Vec<String>,
}

impl EnumShape {
    pub fn new<I, S>(name: impl Into<String>, constants: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            name: name.into(),
            constants: constants.into_iter().map(Into::into).collect(),
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn constants(&self) -> &[String] {
        &self.constants
    }

    /// Case-sensitive lookup of a constant.
    pub fn find(&self, text: &str) -> Option<&str> {
        self.constants
            .iter()
            .find(|c| c.as_str() == text)
            .map(String::as_str)
    }
}

/// A declared field of a record.
#[derive(Clone)]
pub struct FieldShape {
    name: String,
    shape: Shape,
    default: Option<DefaultThunk>,
}

impl FieldShape {
    pub fn new(name: impl Into<String>, shape: Shape) -> Self {
        Self {
            name: name.into(),
            shape,
            default: None,
        }
    }

    pub fn with_default<F>(mut self, default: F) -> Self
    where
        F: Fn() -> Value + Send + Sync + 'static,
    {
        self.default = Some(Arc::new(default));
        self
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn shape(&self) -> &Shape {
        &self.shape
    }

    pub fn is_nullable(&self) -> bool {
        self.shape.is_nullable()
    }

    pub fn has_default(&self) -> bool {
        self.default.is_some()
    }

    pub fn default_value(&self) -> Option<Value> {
        self.default.as_ref().map(|thunk| thunk())
    }
}

impl fmt::Debug for FieldShape {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("FieldShape")
            .field("name", &self.name)
            .field("shape", &self.shape)
            .field("has_default", &self.has_default())
            .finish()
    }
}

impl PartialEq for FieldShape {
    fn eq(&self, other: &Self) -> bool {
        self.name == other.name
            && self.shape == other.shape
            && self.has_default() == other.has_default()
    }
}

/// A structured type: an ordered list of fields and, optionally, a
/// constructor that turns the bound fields into an application value.
#[derive(Clone)]
pub struct RecordShape {
    name: String,
    fields: Vec<FieldShape>,
    constructor: Option<Constructor>,
}

impl RecordShape {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            fields: Vec::new(),
            constructor: None,
        }
    }

    /// Add a field with no default.
    pub fn field(self, name: impl Into<String>, shape: Shape) -> Self {
        self.with_field(FieldShape::new(name, shape))
    }

    /// Add a field that may be absent from the source.
    pub fn field_with_default<F>(self, name: impl Into<String>, shape: Shape, default: F) -> Self
    where
        F: Fn() -> Value + Send + Sync + 'static,
    {
        self.with_field(FieldShape::new(name, shape).with_default(default))
    }

    pub fn with_field(mut self, field: FieldShape) -> Self {
        self.fields.push(field);
        self
    }

    /// Set the constructor producing a `T` from the bound fields.
    ///
    /// The result is stored as [`Value::Custom`]. An `Err` from the
    /// constructor is reported as an invalid-constructor-arguments failure.
    pub fn construct<T, F>(mut self, constructor: F) -> Self
    where
        T: Any + Send + Sync,
        F: Fn(&Arguments<'_>) -> Result<T, ConstructError> + Send + Sync + 'static,
    {
        self.constructor = Some(Arc::new(move |args| constructor(args).map(Value::custom)));
        self
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn fields(&self) -> &[FieldShape] {
        &self.fields
    }

    pub fn field_named(&self, name: &str) -> Option<&FieldShape> {
        self.fields.iter().find(|f| f.name == name)
    }

    pub fn has_constructor(&self) -> bool {
        self.constructor.is_some()
    }

    /// Run the constructor, or build a [`Value::Record`] with defaults filled
    /// in when there is none.
    pub fn instantiate(&self, args: &Arguments<'_>) -> Result<Value, ConstructError> {
        match &self.constructor {
            Some(constructor) => constructor(args),
            None => Ok(Value::Record {
                name: self.name.clone(),
                fields: args.materialize(),
            }),
        }
    }
}

impl fmt::Debug for RecordShape {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("RecordShape")
            .field("name", &self.name)
            .field("fields", &self.fields)
            .field("has_constructor", &self.has_constructor())
            .finish()
    }
}

impl PartialEq for RecordShape {
    fn eq(&self, other: &Self) -> bool {
        self.name == other.name && self.fields == other.fields
    }
}

/// Why a record constructor rejected its arguments.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum ConstructError {
    #[error("no field named '{0}'")]
    UnknownField(String),

    #[error("field '{field}': {error}")]
    Field { field: String, error: ValueError },

    #[error("field '{field}' does not hold a {expected}")]
    NotA {
        field: String,
        expected: &'static str,
    },

    #[error("{0}")]
    Invalid(String),
}

impl ConstructError {
    pub fn invalid(message: impl Into<String>) -> Self {
        ConstructError::Invalid(message.into())
    }
}

/// The fields bound while decoding a record, handed to its constructor.
///
/// Fields that had a default and were absent from the source are not bound;
/// reading one yields the field's own default.
#[derive(Debug)]
pub struct Arguments<'a> {
    record: &'a RecordShape,
    bound: IndexMap<String, Value>,
}

impl<'a> Arguments<'a> {
    pub fn new(record: &'a RecordShape, bound: IndexMap<String, Value>) -> Self {
        Self { record, bound }
    }

    /// Whether `name` was bound from the source (as opposed to defaulted).
    pub fn is_bound(&self, name: &str) -> bool {
        self.bound.contains_key(name)
    }

    pub fn bound(&self) -> &IndexMap<String, Value> {
        &self.bound
    }

    /// The bound value of `name`, or its default when unbound.
    pub fn value(&self, name: &str) -> Option<Value> {
        match self.bound.get(name) {
            Some(value) => Some(value.clone()),
            None => self
                .record
                .field_named(name)
                .and_then(FieldShape::default_value),
        }
    }

    pub fn get<T: FromValue>(&self, name: &str) -> Result<T, ConstructError> {
        let value = self
            .value(name)
            .ok_or_else(|| ConstructError::UnknownField(name.to_string()))?;
        T::from_value(value).map_err(|error| ConstructError::Field {
            field: name.to_string(),
            error,
        })
    }

    /// A nested record (or any other [`Value::Custom`]) of type `T`.
    pub fn record<T: Any + Clone>(&self, name: &str) -> Result<T, ConstructError> {
        self.optional_record(name)?
            .ok_or_else(|| ConstructError::NotA {
                field: name.to_string(),
                expected: std::any::type_name::<T>(),
            })
    }

    /// Like [`Arguments::record`], with null mapped to `None`.
    pub fn optional_record<T: Any + Clone>(&self, name: &str) -> Result<Option<T>, ConstructError> {
        let value = self
            .value(name)
            .ok_or_else(|| ConstructError::UnknownField(name.to_string()))?;
        if value.is_null() {
            return Ok(None);
        }
        value
            .downcast::<T>()
            .map(Some)
            .ok_or_else(|| ConstructError::NotA {
                field: name.to_string(),
                expected: std::any::type_name::<T>(),
            })
    }

    /// All declared fields in declared order, defaults filled in.
    pub fn materialize(&self) -> IndexMap<String, Value> {
        self.record
            .fields()
            .iter()
            .filter_map(|field| self.value(field.name()).map(|v| (field.name().to_string(), v)))
            .collect()
    }
}

impl fmt::Display for Arguments<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{{")?;
        for (i, (key, value)) in self.bound.iter().enumerate() {
            if i > 0 {
                write!(f, ", ")?;
            }
            write!(f, "{}={}", key, value)?;
        }
        write!(f, "}}")
    }
}
