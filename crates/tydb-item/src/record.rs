use std::fmt;

use serde_json::Value;
use tydb_types::{RecordType, Type};

use crate::error::{ItemError, ItemResult};
use crate::item::{write_truncated, Item};

/// A fixed set of named fields, one value per declared field.
#[derive(Clone, Debug, PartialEq)]
pub struct Record {
    ty: RecordType,
    values: Vec<Item>,
}

impl Record {
    /// Create a record holding the zero value of every field.
    pub fn new(ty: RecordType) -> Self {
        let values = ty.fields().iter().map(|f| Item::zero(&f.ty)).collect();
        Self { ty, values }
    }

    pub fn record_type(&self) -> &RecordType {
        &self.ty
    }

    pub fn ty(&self) -> Type {
        Type::Record(self.ty.clone())
    }

    /// Fields in declaration order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &Item)> {
        self.ty
            .fields()
            .iter()
            .map(|f| f.name.as_str())
            .zip(self.values.iter())
    }

    pub fn get_field(&self, name: &str) -> ItemResult<&Item> {
        let idx = self.position(name)?;
        Ok(&self.values[idx])
    }

    pub fn get_field_mut(&mut self, name: &str) -> ItemResult<&mut Item> {
        let idx = self.position(name)?;
        Ok(&mut self.values[idx])
    }

    pub fn set_field(&mut self, name: &str, value: Item) -> ItemResult<()> {
        let idx = self.position(name)?;
        let declared = &self.ty.fields()[idx].ty;
        let found = value.ty();
        if *declared != found {
            return Err(ItemError::mismatch(declared, &found));
        }
        self.values[idx] = value;
        Ok(())
    }

    /// Replace every field from a JSON object.
    ///
    /// Fields absent from the object reset to their zero value; undeclared
    /// fields are rejected. All-or-nothing.
    pub fn assign(&mut self, value: &Value) -> ItemResult<()> {
        let Value::Object(source) = value else {
            return Err(ItemError::shape(&self.ty(), value));
        };
        if let Some(unknown) = source.keys().find(|k| self.ty.position(k).is_none()) {
            return Err(ItemError::NotFound(format!("field {unknown:?} in {}", self.ty)));
        }
        let values = self
            .ty
            .fields()
            .iter()
            .map(|field| {
                let mut item = Item::zero(&field.ty);
                if let Some(v) = source.get(&field.name) {
                    item.assign(v)?;
                }
                Ok(item)
            })
            .collect::<ItemResult<Vec<_>>>()?;
        self.values = values;
        Ok(())
    }

    fn position(&self, name: &str) -> ItemResult<usize> {
        self.ty
            .position(name)
            .ok_or_else(|| ItemError::NotFound(format!("field {name:?} in {}", self.ty)))
    }
}

impl fmt::Display for Record {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write_truncated(f, ('<', '>'), self.iter(), |f, (name, value)| {
            write!(f, "{name}: {value}")
        })
    }
}
