//! Shallow default-filling.
//!
//! `merge_object` copies every top-level entry of `source` that `target` does
//! not define. Entries already in `target` win, even when they hold `null`.

use serde_json::{Map, Value};

/// A record whose missing fields can be filled from another record.
pub trait MergeObject {
    /// Fill every field `self` leaves undefined from `source`. Top level only.
    fn merge_object(&mut self, source: &Self) -> &mut Self;
}

impl MergeObject for Map<String, Value> {
    fn merge_object(&mut self, source: &Self) -> &mut Self {
        for (key, value) in source {
            if !self.contains_key(key) {
                self.insert(key.clone(), value.clone());
            }
        }
        self
    }
}

/// Fill `target`'s undefined fields from `source` and return `target`.
pub fn merge_object<'a, T: MergeObject>(target: &'a mut T, source: &T) -> &'a mut T {
    target.merge_object(source)
}
