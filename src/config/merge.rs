// Copyright (c) 2025 - Cowboy AI, Inc.
//! Pure recursive merge of configuration documents
//!
//! # Rules
//!
//! - Mappings merge key by key, recursively
//! - Lists and scalars in the overlay replace the base value
//! - A `null` in the overlay deletes the key from the result

use serde_json::Value;

/// Merge `overlay` on top of `base`
pub fn deep_merge(base: Value, overlay: Value) -> Value {
    match (base, overlay) {
        (Value::Object(mut base), Value::Object(overlay)) => {
            for (key, value) in overlay {
                if value.is_null() {
                    base.remove(&key);
                    continue;
                }
                let merged = match base.remove(&key) {
                    Some(existing) => deep_merge(existing, value),
                    None => value,
                };
                base.insert(key, merged);
            }
            Value::Object(base)
        }
        (_, overlay) => overlay,
    }
}

/// Merge a sequence of documents, later ones taking precedence
pub fn merge_all(documents: impl IntoIterator<Item = Value>) -> Value {
    documents
        .into_iter()
        .fold(Value::Object(Default::default()), deep_merge)
}
