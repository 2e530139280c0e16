use bytes::Bytes;
use std::collections::HashMap;
use thiserror::Error as ThisError;

pub type Key = String;
pub type Value = Bytes;

#[derive(Debug, ThisError, PartialEq, Eq)]
pub enum StoreError {
    #[error("NO TRANSACTION")]
    NoTransaction,
}

/// One position in the transaction stack: the key space as seen at that depth, plus the number
/// of keys holding each value in that same key space.
#[derive(Clone, Debug, Default, PartialEq)]
struct Layer {
    data: HashMap<Key, Value>,
    // Never holds a zero count: entries are removed as soon as the last key holding the value
    // moves away from it.
    counts: HashMap<Value, usize>,
}

impl Layer {
    fn increment(&mut self, value: Value) {
        *self.counts.entry(value).or_insert(0) += 1;
    }

    fn decrement(&mut self, value: &Value) {
        if let Some(count) = self.counts.get_mut(value) {
            *count -= 1;
            if *count == 0 {
                self.counts.remove(value);
            }
        }
    }
}

/// The Store is an in-memory key space with nested transactions. Layer 0 holds the committed
/// state and every `begin` pushes a full copy of the current top layer, so rolling back is a pop
/// and committing keeps only the top.
///
/// Alongside each layer's keys the store tracks how many keys hold each value, which makes
/// `num_equal_to` a single lookup.
#[derive(Debug, PartialEq)]
pub struct Store {
    layers: Vec<Layer>,
}

impl Store {
    pub fn new() -> Store {
        Self {
            layers: vec![Layer::default()],
        }
    }

    pub fn set(&mut self, key: Key, value: Value) {
        let layer = self.current_mut();

        match layer.data.insert(key, value.clone()) {
            Some(old) if old == value => {}
            Some(old) => {
                layer.decrement(&old);
                layer.increment(value);
            }
            None => layer.increment(value),
        }
    }

    pub fn get(&self, key: &str) -> Option<&Value> {
        self.current().data.get(key)
    }

    /// Removes `key` from the current layer, returning the value it held. Unsetting a key that
    /// is not set leaves the store untouched.
    pub fn unset(&mut self, key: &str) -> Option<Value> {
        let layer = self.current_mut();
        let old = layer.data.remove(key)?;
        layer.decrement(&old);
        Some(old)
    }

    pub fn num_equal_to(&self, value: &[u8]) -> usize {
        self.current().counts.get(value).copied().unwrap_or(0)
    }

    pub fn begin(&mut self) {
        let top = self.current().clone();
        self.layers.push(top);
    }

    pub fn rollback(&mut self) -> Result<(), StoreError> {
        if !self.in_transaction() {
            return Err(StoreError::NoTransaction);
        }

        self.layers.pop();
        Ok(())
    }

    pub fn commit(&mut self) -> Result<(), StoreError> {
        if !self.in_transaction() {
            return Err(StoreError::NoTransaction);
        }

        let top = self.layers.split_off(self.layers.len() - 1);
        self.layers = top;
        Ok(())
    }

    /// Number of open transactions.
    pub fn depth(&self) -> usize {
        self.layers.len() - 1
    }

    pub fn in_transaction(&self) -> bool {
        self.depth() > 0
    }

    /// Number of keys set in the current layer.
    pub fn len(&self) -> usize {
        self.current().data.len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    fn current(&self) -> &Layer {
        // The base layer is never popped.
        &self.layers[self.layers.len() - 1]
    }

    fn current_mut(&mut self) -> &mut Layer {
        let top = self.layers.len() - 1;
        &mut self.layers[top]
    }
}

impl Default for Store {
    fn default() -> Self {
        Self::new()
    }
}
