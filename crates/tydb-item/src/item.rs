use std::fmt;

use serde_json::Value;
use tydb_types::{Comparison, Type};

use crate::array::Array;
use crate::error::{ItemError, ItemResult};
use crate::hashmap::Hashmap;
use crate::record::Record;

/// Number of entries shown by the text rendering of a composite item.
pub(crate) const TEXT_ENTRY_LIMIT: usize = 10;

/// Largest magnitude at which every integer is exactly representable in an `f64`.
const MAX_SAFE_INTEGER: f64 = 9_007_199_254_740_992.0;

/// A typed value in the store.
///
/// The set of kinds is closed. Every kind implements the full capability
/// set; operations a kind has no meaning for fail with an
/// [`ItemError::Unsupported`] rather than being absent.
#[derive(Clone, Debug, PartialEq)]
pub enum Item {
    String(String),
    Number(f64),
    Boolean(bool),
    Array(Array),
    Record(Record),
    Hashmap(Hashmap),
}

impl Item {
    /// Build the zero value of a type.
    ///
    /// Scalars are `""`, `0` and `false`; containers are empty; records hold
    /// the zero value of every declared field.
    pub fn zero(ty: &Type) -> Self {
        match ty {
            Type::String => Self::String(String::new()),
            Type::Number => Self::Number(0.0),
            Type::Boolean => Self::Boolean(false),
            Type::Array(elem) => Self::Array(Array::new((**elem).clone())),
            Type::Hashmap { key, value } => {
                Self::Hashmap(Hashmap::new((**key).clone(), (**value).clone()))
            }
            Type::Record(record) => Self::Record(Record::new(record.clone())),
        }
    }

    /// The item's declared type.
    pub fn ty(&self) -> Type {
        match self {
            Self::String(_) => Type::String,
            Self::Number(_) => Type::Number,
            Self::Boolean(_) => Type::Boolean,
            Self::Array(array) => array.ty(),
            Self::Record(record) => record.ty(),
            Self::Hashmap(map) => map.ty(),
        }
    }

    /// JSON-compatible value of this item.
    ///
    /// Integral numbers become JSON integers. Hashmap keys that are not
    /// strings are replaced by their text rendering, which is lossy for
    /// composite keys.
    pub fn to_json(&self) -> Value {
        match self {
            Self::String(s) => Value::String(s.clone()),
            Self::Number(n) => number_json(*n),
            Self::Boolean(b) => Value::Bool(*b),
            Self::Array(array) => Value::Array(array.iter().map(Item::to_json).collect()),
            Self::Record(record) => Value::Object(
                record
                    .iter()
                    .map(|(name, value)| (name.to_string(), value.to_json()))
                    .collect(),
            ),
            Self::Hashmap(map) => Value::Object(
                map.iter()
                    .map(|(key, value)| {
                        let key = match key {
                            Self::String(s) => s.clone(),
                            other => other.to_string(),
                        };
                        (key, value.to_json())
                    })
                    .collect(),
            ),
        }
    }

    /// Compact JSON text of this item.
    pub fn render_json(&self) -> String {
        self.to_json().to_string()
    }

    /// Type-check `value` against this item's type and assign it.
    ///
    /// On failure the item is left exactly as it was.
    pub fn assign(&mut self, value: &Value) -> ItemResult<()> {
        match (self, value) {
            (Self::String(s), Value::String(v)) => {
                *s = v.clone();
                Ok(())
            }
            (Self::Number(n), Value::Number(v)) => {
                *n = v
                    .as_f64()
                    .ok_or_else(|| ItemError::shape(&Type::Number, value))?;
                Ok(())
            }
            (Self::Boolean(b), Value::Bool(v)) => {
                *b = *v;
                Ok(())
            }
            (Self::Array(array), _) => array.assign(value),
            (Self::Record(record), _) => record.assign(value),
            (Self::Hashmap(map), _) => map.assign(value),
            (item, _) => Err(ItemError::shape(&item.ty(), value)),
        }
    }

    /// Evaluate `self <op> other`.
    ///
    /// Both sides must have equal types. Equality is structural; ordering is
    /// defined for numbers and strings only.
    pub fn compare(&self, op: Comparison, other: &Item) -> ItemResult<bool> {
        let (lhs, rhs) = (self.ty(), other.ty());
        if lhs != rhs {
            return Err(ItemError::mismatch(&lhs, &rhs));
        }
        if !op.is_ordering() {
            let equal = self == other;
            return Ok(if op == Comparison::Equal { equal } else { !equal });
        }
        if !lhs.is_orderable() {
            return Err(ItemError::Unsupported {
                op: "ordering comparison",
                ty: lhs,
            });
        }
        let ordering = match (self, other) {
            // `partial_cmp` keeps `-0.0` and `0.0` equal, matching `==` and key hashing.
            (Self::Number(a), Self::Number(b)) => {
                a.partial_cmp(b).ok_or_else(|| ItemError::Unsupported {
                    op: "ordering of NaN",
                    ty: Type::Number,
                })?
            }
            (Self::String(a), Self::String(b)) => a.cmp(b),
            _ => return Err(ItemError::mismatch(&lhs, &rhs)),
        };
        Ok(op.holds(ordering))
    }

    pub fn get_field(&self, name: &str) -> ItemResult<&Item> {
        match self {
            Self::Record(record) => record.get_field(name),
            Self::Hashmap(map) => map.get_field(name),
            _ => Err(self.unsupported("field access")),
        }
    }

    pub fn get_field_mut(&mut self, name: &str) -> ItemResult<&mut Item> {
        match self {
            Self::Record(record) => record.get_field_mut(name),
            Self::Hashmap(map) => map.get_field_mut(name),
            _ => Err(self.unsupported("field access")),
        }
    }

    pub fn set_field(&mut self, name: &str, value: Item) -> ItemResult<()> {
        match self {
            Self::Record(record) => record.set_field(name, value),
            Self::Hashmap(map) => map.set_field(name, value),
            _ => Err(self.unsupported("field assignment")),
        }
    }

    pub fn get_key(&self, key: &Item) -> ItemResult<&Item> {
        match self {
            Self::Array(array) => array.get_key(key),
            Self::Record(record) => record.get_field(record_key(key)?),
            Self::Hashmap(map) => map.get_key(key),
            _ => Err(self.unsupported("key access")),
        }
    }

    pub fn get_key_mut(&mut self, key: &Item) -> ItemResult<&mut Item> {
        match self {
            Self::Array(array) => array.get_key_mut(key),
            Self::Record(record) => record.get_field_mut(record_key(key)?),
            Self::Hashmap(map) => map.get_key_mut(key),
            _ => Err(self.unsupported("key access")),
        }
    }

    pub fn set_key(&mut self, key: Item, value: Item) -> ItemResult<()> {
        match self {
            Self::Array(array) => array.set_key(&key, value),
            Self::Record(record) => record.set_field(record_key(&key)?, value),
            Self::Hashmap(map) => map.set_key(key, value),
            _ => Err(self.unsupported("key assignment")),
        }
    }

    /// Select the entries of a hashmap matching a predicate.
    ///
    /// See [`Hashmap::filter`]. Every other kind fails with `Type`.
    pub fn filter(&self, field: &str, op: Comparison, other: &Item) -> ItemResult<Item> {
        match self {
            Self::Hashmap(map) => map.filter(field, op, other).map(Self::Hashmap),
            _ => Err(self.unsupported("filter")),
        }
    }

    fn unsupported(&self, op: &'static str) -> ItemError {
        ItemError::Unsupported { op, ty: self.ty() }
    }
}

fn record_key(key: &Item) -> ItemResult<&str> {
    match key {
        Item::String(name) => Ok(name),
        other => Err(ItemError::mismatch(&Type::String, &other.ty())),
    }
}

fn number_json(n: f64) -> Value {
    if n.fract() == 0.0 && n.abs() < MAX_SAFE_INTEGER {
        Value::from(n as i64)
    } else {
        serde_json::Number::from_f64(n).map_or(Value::Null, Value::Number)
    }
}

fn write_number(f: &mut fmt::Formatter<'_>, n: f64) -> fmt::Result {
    if n.fract() == 0.0 && n.abs() < MAX_SAFE_INTEGER {
        write!(f, "{}", n as i64)
    } else {
        write!(f, "{n}")
    }
}

/// Write `open e1, e2, ... close`, stopping after [`TEXT_ENTRY_LIMIT`] entries.
pub(crate) fn write_truncated<T>(
    f: &mut fmt::Formatter<'_>,
    delimiters: (char, char),
    entries: impl IntoIterator<Item = T>,
    mut write_one: impl FnMut(&mut fmt::Formatter<'_>, T) -> fmt::Result,
) -> fmt::Result {
    write!(f, "{}", delimiters.0)?;
    for (i, entry) in entries.into_iter().enumerate() {
        if i > 0 {
            f.write_str(", ")?;
        }
        if i == TEXT_ENTRY_LIMIT {
            f.write_str("...")?;
            break;
        }
        write_one(f, entry)?;
    }
    write!(f, "{}", delimiters.1)
}

impl fmt::Display for Item {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::String(s) => f.write_str(s),
            Self::Number(n) => write_number(f, *n),
            Self::Boolean(b) => write!(f, "{b}"),
            Self::Array(array) => write!(f, "{array}"),
            Self::Record(record) => write!(f, "{record}"),
            Self::Hashmap(map) => write!(f, "{map}"),
        }
    }
}

impl From<&str> for Item {
    fn from(s: &str) -> Self {
        Self::String(s.to_string())
    }
}

impl From<String> for Item {
    fn from(s: String) -> Self {
        Self::String(s)
    }
}

impl From<f64> for Item {
    fn from(n: f64) -> Self {
        Self::Number(n)
    }
}

impl From<bool> for Item {
    fn from(b: bool) -> Self {
        Self::Boolean(b)
    }
}

impl From<Array> for Item {
    fn from(array: Array) -> Self {
        Self::Array(array)
    }
}

impl From<Record> for Item {
    fn from(record: Record) -> Self {
        Self::Record(record)
    }
}

impl From<Hashmap> for Item {
    fn from(map: Hashmap) -> Self {
        Self::Hashmap(map)
    }
}
