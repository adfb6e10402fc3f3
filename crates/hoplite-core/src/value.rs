//! Decoded values and typed extraction.

use indexmap::IndexMap;
use std::any::Any;
use std::collections::HashMap;
use std::fmt;
use std::path::PathBuf;
use std::sync::Arc;
use thiserror::Error;

/// The output of a decoder.
///
/// Built-in decoders produce the structural variants. Records with a
/// constructor, and user decoders for their own leaf types, produce
/// [`Value::Custom`], which is extracted again with [`Value::downcast`].
#[derive(Clone)]
pub enum Value {
    Null,
    Boolean(bool),
    Long(i64),
    Double(f64),
    String(String),
    Path(PathBuf),
    /// The matched constant of an enumerated shape.
    Enum(String),
    List(Vec<Value>),
    /// Distinct elements, in order of first occurrence.
    Set(Vec<Value>),
    Map(IndexMap<String, Value>),
    /// A record decoded without a constructor.
    Record {
        name: String,
        fields: IndexMap<String, Value>,
    },
    Custom(Arc<dyn Any + Send + Sync>),
}

impl Value {
    pub fn custom<T: Any + Send + Sync>(value: T) -> Self {
        Value::Custom(Arc::new(value))
    }

    /// Build a set, dropping later duplicates.
    pub fn set_of(values: Vec<Value>) -> Self {
        let mut distinct: Vec<Value> = Vec::with_capacity(values.len());
        for value in values {
            if !distinct.contains(&value) {
                distinct.push(value);
            }
        }
        Value::Set(distinct)
    }

    /// Clone the user value out of a [`Value::Custom`] of type `T`.
    pub fn downcast<T: Any + Clone>(&self) -> Option<T> {
        match self {
            Value::Custom(any) => any.downcast_ref::<T>().cloned(),
            _ => None,
        }
    }

    pub fn is_null(&self) -> bool {
        matches!(self, Value::Null)
    }

    pub fn type_name(&self) -> &'static str {
        match self {
            Value::Null => "Null",
            Value::Boolean(_) => "Boolean",
            Value::Long(_) => "Long",
            Value::Double(_) => "Double",
            Value::String(_) => "String",
            Value::Path(_) => "Path",
            Value::Enum(_) => "Enum",
            Value::List(_) => "List",
            Value::Set(_) => "Set",
            Value::Map(_) => "Map",
            Value::Record { .. } => "Record",
            Value::Custom(_) => "Custom",
        }
    }
}

impl PartialEq for Value {
    fn eq(&self, other: &Self) -> bool {
        match (self, other) {
            (Value::Null, Value::Null) => true,
            (Value::Boolean(a), Value::Boolean(b)) => a == b,
            (Value::Long(a), Value::Long(b)) => a == b,
            (Value::Double(a), Value::Double(b)) => a == b,
            (Value::String(a), Value::String(b)) => a == b,
            (Value::Path(a), Value::Path(b)) => a == b,
            (Value::Enum(a), Value::Enum(b)) => a == b,
            (Value::List(a), Value::List(b)) => a == b,
            (Value::Set(a), Value::Set(b)) => a.len() == b.len() && a.iter().all(|v| b.contains(v)),
            (Value::Map(a), Value::Map(b)) => a == b,
            (
                Value::Record {
                    name: a,
                    fields: fa,
                },
                Value::Record {
                    name: b,
                    fields: fb,
                },
            ) => a == b && fa == fb,
            // User values have no equality of their own; identity is the best we can do.
            (Value::Custom(a), Value::Custom(b)) => Arc::ptr_eq(a, b),
            _ => false,
        }
    }
}

impl fmt::Debug for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Value::Null => write!(f, "Null"),
            Value::Boolean(b) => f.debug_tuple("Boolean").field(b).finish(),
            Value::Long(n) => f.debug_tuple("Long").field(n).finish(),
            Value::Double(n) => f.debug_tuple("Double").field(n).finish(),
            Value::String(s) => f.debug_tuple("String").field(s).finish(),
            Value::Path(p) => f.debug_tuple("Path").field(p).finish(),
            Value::Enum(s) => f.debug_tuple("Enum").field(s).finish(),
            Value::List(items) => f.debug_tuple("List").field(items).finish(),
            Value::Set(items) => f.debug_tuple("Set").field(items).finish(),
            Value::Map(entries) => f.debug_tuple("Map").field(entries).finish(),
            Value::Record { name, fields } => f
                .debug_struct("Record")
                .field("name", name)
                .field("fields", fields)
                .finish(),
            Value::Custom(_) => write!(f, "Custom(..)"),
        }
    }
}

impl fmt::Display for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Value::Null => write!(f, "null"),
            Value::Boolean(b) => write!(f, "{}", b),
            Value::Long(n) => write!(f, "{}", n),
            Value::Double(n) => write!(f, "{}", n),
            Value::String(s) => write!(f, "{:?}", s),
            Value::Path(p) => write!(f, "{:?}", p.display().to_string()),
            Value::Enum(s) => write!(f, "{}", s),
            Value::List(items) | Value::Set(items) => {
                write!(f, "[")?;
                for (i, item) in items.iter().enumerate() {
                    if i > 0 {
                        write!(f, ", ")?;
                    }
                    write!(f, "{}", item)?;
                }
                write!(f, "]")
            }
            Value::Map(entries) => write_entries(f, "", entries),
            Value::Record { name, fields } => write_entries(f, name, fields),
            Value::Custom(_) => write!(f, "<custom>"),
        }
    }
}

fn write_entries(
    f: &mut fmt::Formatter<'_>,
    prefix: &str,
    entries: &IndexMap<String, Value>,
) -> fmt::Result {
    write!(f, "{}{{", prefix)?;
    for (i, (key, value)) in entries.iter().enumerate() {
        if i > 0 {
            write!(f, ", ")?;
        }
        write!(f, "{}={}", key, value)?;
    }
    write!(f, "}}")
}

/// Why a [`Value`] could not be turned into a Rust type.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum ValueError {
    #[error("expected {expected}, got {actual}")]
    TypeMismatch {
        expected: &'static str,
        actual: &'static str,
    },

    #[error("{value} is out of range for {target}")]
    OutOfRange { value: i64, target: &'static str },
}

fn mismatch<T>(expected: &'static str, value: &Value) -> Result<T, ValueError> {
    Err(ValueError::TypeMismatch {
        expected,
        actual: value.type_name(),
    })
}

/// Conversion from a decoded [`Value`] into a Rust type.
///
/// Used by record constructors through [`crate::Arguments::get`].
pub trait FromValue: Sized {
    fn from_value(value: Value) -> Result<Self, ValueError>;
}

impl FromValue for Value {
    fn from_value(value: Value) -> Result<Self, ValueError> {
        Ok(value)
    }
}

impl FromValue for String {
    fn from_value(value: Value) -> Result<Self, ValueError> {
        match value {
            Value::String(s) | Value::Enum(s) => Ok(s),
            other => mismatch("String", &other),
        }
    }
}

impl FromValue for i64 {
    fn from_value(value: Value) -> Result<Self, ValueError> {
        match value {
            Value::Long(n) => Ok(n),
            other => mismatch("Long", &other),
        }
    }
}

impl FromValue for i32 {
    fn from_value(value: Value) -> Result<Self, ValueError> {
        match value {
            Value::Long(n) => i32::try_from(n).map_err(|_| ValueError::OutOfRange {
                value: n,
                target: "i32",
            }),
            other => mismatch("Int", &other),
        }
    }
}

impl FromValue for f64 {
    fn from_value(value: Value) -> Result<Self, ValueError> {
        match value {
            Value::Double(n) => Ok(n),
            Value::Long(n) => Ok(n as f64),
            other => mismatch("Double", &other),
        }
    }
}

impl FromValue for bool {
    fn from_value(value: Value) -> Result<Self, ValueError> {
        match value {
            Value::Boolean(b) => Ok(b),
            other => mismatch("Boolean", &other),
        }
    }
}

impl FromValue for PathBuf {
    fn from_value(value: Value) -> Result<Self, ValueError> {
        match value {
            Value::Path(p) => Ok(p),
            Value::String(s) => Ok(PathBuf::from(s)),
            other => mismatch("Path", &other),
        }
    }
}

impl<T: FromValue> FromValue for Option<T> {
    fn from_value(value: Value) -> Result<Self, ValueError> {
        match value {
            Value::Null => Ok(None),
            other => T::from_value(other).map(Some),
        }
    }
}

impl<T: FromValue> FromValue for Vec<T> {
    fn from_value(value: Value) -> Result<Self, ValueError> {
        match value {
            Value::List(items) | Value::Set(items) => items.into_iter().map(T::from_value).collect(),
            other => mismatch("List", &other),
        }
    }
}

impl<T: FromValue> FromValue for IndexMap<String, T> {
    fn from_value(value: Value) -> Result<Self, ValueError> {
        match value {
            Value::Map(entries) | Value::Record { fields: entries, .. } => entries
                .into_iter()
                .map(|(k, v)| T::from_value(v).map(|v| (k, v)))
                .collect(),
            other => mismatch("Map", &other),
        }
    }
}

impl<T: FromValue> FromValue for HashMap<String, T> {
    fn from_value(value: Value) -> Result<Self, ValueError> {
        IndexMap::<String, T>::from_value(value).map(|entries| entries.into_iter().collect())
    }
}
