use std::fmt;

use serde::{Deserialize, Serialize};

/// Structural descriptor of a value's shape.
///
/// Types are immutable once built. Two types are equal iff they have the
/// same kind and, for composite kinds, pairwise equal parameters. Items hold
/// their type by value; nothing is shared between a type and the items that
/// conform to it.
#[derive(Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Type {
    String,
    Number,
    Boolean,
    /// Ordered sequence of elements of one type.
    Array(Box<Type>),
    /// Associative container indexed by the content hash of its keys.
    Hashmap { key: Box<Type>, value: Box<Type> },
    /// Fixed set of named fields.
    Record(RecordType),
}

impl Type {
    /// Shorthand for `array<elem>`.
    pub fn array(elem: Type) -> Self {
        Self::Array(Box::new(elem))
    }

    /// Shorthand for `hashmap<key, value>`.
    pub fn hashmap(key: Type, value: Type) -> Self {
        Self::Hashmap {
            key: Box::new(key),
            value: Box::new(value),
        }
    }

    /// Shorthand for a record built from `(name, type)` pairs.
    pub fn record<I, S>(fields: I) -> Self
    where
        I: IntoIterator<Item = (S, Type)>,
        S: Into<String>,
    {
        Self::Record(RecordType::from_pairs(fields))
    }

    /// Whether `<`, `<=`, `>` and `>=` are defined between values of this type.
    pub fn is_orderable(&self) -> bool {
        matches!(self, Self::String | Self::Number)
    }

    /// Short name of the kind, without parameters.
    pub fn kind_name(&self) -> &'static str {
        match self {
            Self::String => "string",
            Self::Number => "number",
            Self::Boolean => "boolean",
            Self::Array(_) => "array",
            Self::Hashmap { .. } => "hashmap",
            Self::Record(_) => "record",
        }
    }
}

impl fmt::Display for Type {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::String | Self::Number | Self::Boolean => f.write_str(self.kind_name()),
            Self::Array(elem) => write!(f, "array<{elem}>"),
            Self::Hashmap { key, value } => write!(f, "hashmap<{key}, {value}>"),
            Self::Record(record) => write!(f, "{record}"),
        }
    }
}

/// A single named field of a [`RecordType`].
#[derive(Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct FieldType {
    pub name: String,
    pub ty: Type,
}

impl FieldType {
    pub fn new(name: impl Into<String>, ty: Type) -> Self {
        Self {
            name: name.into(),
            ty,
        }
    }
}

/// Ordered field list of a record type.
///
/// Field names are unique. Order is significant for equality and rendering.
#[derive(Clone, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct RecordType {
    fields: Vec<FieldType>,
}

impl RecordType {
    /// Create an empty record type.
    pub fn new() -> Self {
        Self::default()
    }

    /// Build from `(name, type)` pairs. A repeated name replaces the earlier
    /// declaration in place.
    pub fn from_pairs<I, S>(pairs: I) -> Self
    where
        I: IntoIterator<Item = (S, Type)>,
        S: Into<String>,
    {
        pairs
            .into_iter()
            .fold(Self::new(), |record, (name, ty)| record.with_field(name, ty))
    }

    /// Add (or replace) a field, returning the updated record type.
    pub fn with_field(mut self, name: impl Into<String>, ty: Type) -> Self {
        let name = name.into();
        match self.position(&name) {
            Some(idx) => self.fields[idx].ty = ty,
            None => self.fields.push(FieldType::new(name, ty)),
        }
        self
    }

    pub fn fields(&self) -> &[FieldType] {
        &self.fields
    }

    /// Type of the named field, if declared.
    pub fn field(&self, name: &str) -> Option<&Type> {
        self.fields.iter().find(|f| f.name == name).map(|f| &f.ty)
    }

    /// Declaration index of the named field.
    pub fn position(&self, name: &str) -> Option<usize> {
        self.fields.iter().position(|f| f.name == name)
    }

    pub fn len(&self) -> usize {
        self.fields.len()
    }

    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }
}

impl fmt::Display for RecordType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("{")?;
        for (i, field) in self.fields.iter().enumerate() {
            if i > 0 {
                f.write_str(", ")?;
            }
            write!(f, "{}: {}", field.name, field.ty)?;
        }
        f.write_str("}")
    }
}
