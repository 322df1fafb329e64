use std::fmt;

use serde_json::Value;
use tydb_types::Type;

use crate::error::{ItemError, ItemResult};
use crate::item::{write_truncated, Item};

/// Ordered sequence of items sharing one element type.
///
/// Elements are addressed by a Number key holding a non-negative integral
/// index.
#[derive(Clone, Debug, PartialEq)]
pub struct Array {
    elem: Type,
    items: Vec<Item>,
}

impl Array {
    /// Create an empty array of `elem`.
    pub fn new(elem: Type) -> Self {
        Self {
            elem,
            items: Vec::new(),
        }
    }

    /// Build from existing items, type-checking each one.
    pub fn from_items(elem: Type, items: Vec<Item>) -> ItemResult<Self> {
        let mut array = Self::new(elem);
        for item in items {
            array.push(item)?;
        }
        Ok(array)
    }

    pub fn ty(&self) -> Type {
        Type::array(self.elem.clone())
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &Item> {
        self.items.iter()
    }

    /// Append an element of the declared element type.
    pub fn push(&mut self, item: Item) -> ItemResult<()> {
        self.check_elem(&item)?;
        self.items.push(item);
        Ok(())
    }

    pub fn get_key(&self, key: &Item) -> ItemResult<&Item> {
        let idx = self.index_of(key)?;
        Ok(&self.items[idx])
    }

    pub fn get_key_mut(&mut self, key: &Item) -> ItemResult<&mut Item> {
        let idx = self.index_of(key)?;
        Ok(&mut self.items[idx])
    }

    /// Replace the element at an existing index.
    pub fn set_key(&mut self, key: &Item, value: Item) -> ItemResult<()> {
        self.check_elem(&value)?;
        let idx = self.index_of(key)?;
        self.items[idx] = value;
        Ok(())
    }

    /// Replace every element from a JSON array. All-or-nothing.
    pub fn assign(&mut self, value: &Value) -> ItemResult<()> {
        let Value::Array(source) = value else {
            return Err(ItemError::shape(&self.ty(), value));
        };
        let items = source
            .iter()
            .map(|v| {
                let mut item = Item::zero(&self.elem);
                item.assign(v)?;
                Ok(item)
            })
            .collect::<ItemResult<Vec<_>>>()?;
        self.items = items;
        Ok(())
    }

    fn check_elem(&self, item: &Item) -> ItemResult<()> {
        let found = item.ty();
        if found != self.elem {
            return Err(ItemError::mismatch(&self.elem, &found));
        }
        Ok(())
    }

    fn index_of(&self, key: &Item) -> ItemResult<usize> {
        let Item::Number(n) = key else {
            return Err(ItemError::mismatch(&Type::Number, &key.ty()));
        };
        let n = *n;
        if n.fract() != 0.0 || n < 0.0 || n >= self.items.len() as f64 {
            return Err(ItemError::NotFound(format!(
                "index {key} in array of length {}",
                self.items.len()
            )));
        }
        Ok(n as usize)
    }
}

impl fmt::Display for Array {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write_truncated(f, ('[', ']'), &self.items, |f, item| write!(f, "{item}"))
    }
}
