use std::collections::HashMap;
use std::fmt;

use serde_json::Value;
use tydb_types::{Comparison, Digest, Type};

use crate::error::{ItemError, ItemResult};
use crate::hasher::KeyHasher;
use crate::item::{write_truncated, Item};

/// A key and the value stored under its digest.
#[derive(Clone, Debug, PartialEq)]
struct Entry {
    key: Item,
    value: Item,
}

/// Associative container mapping typed keys to typed values.
///
/// Entries are indexed by the [`KeyHasher::KEY`] digest of their key. Each
/// digest holds both the original key and the current value in a single
/// entry, so keys and values are always inserted, overwritten and removed
/// together.
///
/// Invariants:
/// - every stored key has type `key_type` and hashes to its slot's digest
/// - every stored value has type `val_type`
#[derive(Clone, Debug, PartialEq)]
pub struct Hashmap {
    key_type: Type,
    val_type: Type,
    entries: HashMap<Digest, Entry>,
}

impl Hashmap {
    /// Create an empty hashmap.
    pub fn new(key_type: Type, val_type: Type) -> Self {
        Self::with_capacity(key_type, val_type, 0)
    }

    fn with_capacity(key_type: Type, val_type: Type, capacity: usize) -> Self {
        Self {
            key_type,
            val_type,
            entries: HashMap::with_capacity(capacity),
        }
    }

    pub fn key_type(&self) -> &Type {
        &self.key_type
    }

    pub fn val_type(&self) -> &Type {
        &self.val_type
    }

    pub fn ty(&self) -> Type {
        Type::hashmap(self.key_type.clone(), self.val_type.clone())
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Key/value pairs in unspecified order.
    pub fn iter(&self) -> impl Iterator<Item = (&Item, &Item)> {
        self.entries.values().map(|e| (&e.key, &e.value))
    }

    /// Digests and values ordered by digest.
    pub fn sorted_entries(&self) -> Vec<(&Digest, &Item)> {
        let mut entries: Vec<_> = self.entries.iter().map(|(d, e)| (d, &e.value)).collect();
        entries.sort_by_key(|(d, _)| **d);
        entries
    }

    pub fn contains_key(&self, key: &Item) -> ItemResult<bool> {
        let digest = self.locate(key)?;
        Ok(self.entries.contains_key(&digest))
    }

    /// Look up the value stored under `key`.
    pub fn get_key(&self, key: &Item) -> ItemResult<&Item> {
        let digest = self.locate(key)?;
        self.entries
            .get(&digest)
            .map(|e| &e.value)
            .ok_or_else(|| ItemError::NotFound(format!("key {key}")))
    }

    pub fn get_key_mut(&mut self, key: &Item) -> ItemResult<&mut Item> {
        let digest = self.locate(key)?;
        self.entries
            .get_mut(&digest)
            .map(|e| &mut e.value)
            .ok_or_else(|| ItemError::NotFound(format!("key {key}")))
    }

    /// Insert or overwrite the value stored under `key`.
    pub fn set_key(&mut self, key: Item, value: Item) -> ItemResult<()> {
        let digest = self.locate(&key)?;
        let found = value.ty();
        if found != self.val_type {
            return Err(ItemError::mismatch(&self.val_type, &found));
        }
        self.entries.insert(digest, Entry { key, value });
        Ok(())
    }

    /// Remove `key`, returning its value.
    pub fn remove_key(&mut self, key: &Item) -> ItemResult<Item> {
        let digest = self.locate(key)?;
        self.entries
            .remove(&digest)
            .map(|e| e.value)
            .ok_or_else(|| ItemError::NotFound(format!("key {key}")))
    }

    /// Field access is key access with a string key.
    pub fn get_field(&self, name: &str) -> ItemResult<&Item> {
        self.get_key(&Item::from(name))
    }

    pub fn get_field_mut(&mut self, name: &str) -> ItemResult<&mut Item> {
        self.get_key_mut(&Item::from(name))
    }

    pub fn set_field(&mut self, name: &str, value: Item) -> ItemResult<()> {
        self.set_key(Item::from(name), value)
    }

    /// Replace every entry from a JSON object.
    ///
    /// JSON objects only have string keys, so a hashmap with any other key
    /// type declines with [`ItemError::Declined`]. Entries are staged in a
    /// fresh map and swapped in only once every value has been assigned.
    pub fn assign(&mut self, value: &Value) -> ItemResult<()> {
        if self.key_type != Type::String {
            return Err(ItemError::Declined(format!(
                "bulk assignment needs string keys, found {} keys",
                self.key_type
            )));
        }
        let Value::Object(source) = value else {
            return Err(ItemError::shape(&self.ty(), value));
        };

        let mut staged =
            Self::with_capacity(self.key_type.clone(), self.val_type.clone(), source.len());
        for (key, raw) in source {
            let mut item = Item::zero(&self.val_type);
            item.assign(raw)?;
            staged.set_key(Item::from(key.as_str()), item)?;
        }

        tracing::debug!(entries = staged.len(), "hashmap bulk assignment");
        self.entries = staged.entries;
        Ok(())
    }

    /// Build a new hashmap holding the entries whose value satisfies
    /// `value.field <op> other`, or `value <op> other` when `field` is empty.
    ///
    /// The first failing comparison or field lookup aborts the filter.
    pub fn filter(&self, field: &str, op: Comparison, other: &Item) -> ItemResult<Hashmap> {
        let mut result = Self::with_capacity(
            self.key_type.clone(),
            self.val_type.clone(),
            self.entries.len() / 2,
        );
        for (digest, entry) in &self.entries {
            let subject = if field.is_empty() {
                &entry.value
            } else {
                entry.value.get_field(field)?
            };
            if subject.compare(op, other)? {
                result.entries.insert(*digest, entry.clone());
            }
        }
        Ok(result)
    }

    /// Type-check `key` and compute its digest.
    ///
    /// A digest already occupied by a different key is reported as a
    /// collision instead of silently aliasing the two keys.
    fn locate(&self, key: &Item) -> ItemResult<Digest> {
        let found = key.ty();
        if found != self.key_type {
            return Err(ItemError::mismatch(&self.key_type, &found));
        }
        let digest = KeyHasher::KEY.digest(key)?;
        match self.entries.get(&digest) {
            Some(entry) if entry.key != *key => Err(ItemError::Collision(format!(
                "{key} (digest {digest} already holds {})",
                entry.key
            ))),
            _ => Ok(digest),
        }
    }
}

impl fmt::Display for Hashmap {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut entries: Vec<_> = self.entries.iter().collect();
        entries.sort_by_key(|(d, _)| **d);
        write_truncated(f, ('<', '>'), entries, |f, (_, entry)| {
            write!(f, "{}: {}", entry.key, entry.value)
        })
    }
}
