//! Reference scanner: finds `include` references inside a parsed document.

use std::path::Path;

use serde_yaml::Value;

use crate::domain::entities::{Reference, ReferenceKey, Segment, REFERENCE_KEY};
use crate::util::path::normalize_lexically;

/// Collect local references in document order.
///
/// A reference is a mapping whose only entry is `include: <path>` with a
/// string value. The path is resolved against `base_dir` and normalized
/// lexically; existence is not checked here.
pub fn scan(content: &Value, base_dir: &Path) -> Vec<Reference> {
    let mut references = Vec::new();
    scan_value(content, &ReferenceKey::root(), base_dir, &mut references);
    references
}

/// Target of a reference mapping, if `value` is one.
pub fn reference_target(value: &Value) -> Option<&str> {
    let Value::Mapping(mapping) = value else {
        return None;
    };
    if mapping.len() != 1 {
        return None;
    }
    match mapping.get(REFERENCE_KEY) {
        Some(Value::String(target)) => Some(target.as_str()),
        _ => None,
    }
}

fn scan_value(value: &Value, key: &ReferenceKey, base_dir: &Path, out: &mut Vec<Reference>) {
    if let Some(target) = reference_target(value) {
        out.push(Reference {
            key: key.clone(),
            path: normalize_lexically(&base_dir.join(target)),
        });
        return;
    }

    match value {
        Value::Mapping(mapping) => {
            for (k, v) in mapping {
                scan_value(v, &key.child(Segment::Key(k.clone())), base_dir, out);
            }
        }
        Value::Sequence(items) => {
            for (idx, item) in items.iter().enumerate() {
                scan_value(item, &key.child(Segment::Index(idx)), base_dir, out);
            }
        }
        Value::Tagged(tagged) => scan_value(&tagged.value, key, base_dir, out),
        Value::Null | Value::Bool(_) | Value::Number(_) | Value::String(_) => {}
    }
}
