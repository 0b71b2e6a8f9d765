//! Canonical serializer: splices composed children into their parents and
//! encodes the result as one YAML document.

use std::path::Path;

use serde_yaml::Value;
use termtree::Tree;

use crate::domain::entities::{DocumentNode, Segment};
use crate::domain::error::{DomainError, DomainResult};
use crate::util::path::relative_to;

/// Deepest collection nesting `serde_yaml` will read back.
pub const MAX_NESTING: usize = 128;

/// Encode a composed tree as a single self-contained YAML document.
///
/// Fails with `NestingTooDeep` when the merged document could not be parsed
/// again.
pub fn serialize(node: &DocumentNode) -> DomainResult<String> {
    let merged = materialize(node)?;
    let depth = nesting_depth(&merged);
    if depth > MAX_NESTING {
        return Err(DomainError::NestingTooDeep {
            path: node.source_path.clone(),
            depth,
            limit: MAX_NESTING,
        });
    }
    Ok(serde_yaml::to_string(&merged)?)
}

/// Number of nested mappings and sequences on the deepest path.
/// Tags do not add a level.
pub fn nesting_depth(value: &Value) -> usize {
    let mut deepest = 0;
    let mut pending = vec![(value, 0)];
    while let Some((value, depth)) = pending.pop() {
        match value {
            Value::Mapping(mapping) => {
                deepest = deepest.max(depth + 1);
                for (k, v) in mapping {
                    pending.push((k, depth + 1));
                    pending.push((v, depth + 1));
                }
            }
            Value::Sequence(items) => {
                deepest = deepest.max(depth + 1);
                pending.extend(items.iter().map(|v| (v, depth + 1)));
            }
            Value::Tagged(tagged) => pending.push((&tagged.value, depth)),
            _ => {}
        }
    }
    deepest
}

/// Build the merged value of a tree, children inlined at their reference keys.
pub fn materialize(node: &DocumentNode) -> DomainResult<Value> {
    let mut merged = node.content.clone();
    for (key, child) in &node.children {
        let value = materialize(child)?;
        let slot = slot_mut(&mut merged, key.segments()).ok_or_else(|| {
            DomainError::InvalidReference {
                path: node.source_path.clone(),
                key: key.to_string(),
            }
        })?;
        *slot = value;
    }
    Ok(merged)
}

fn slot_mut<'a>(value: &'a mut Value, segments: &[Segment]) -> Option<&'a mut Value> {
    let mut current = value;
    for segment in segments {
        current = match (segment, untag_mut(current)) {
            (Segment::Key(key), Value::Mapping(mapping)) => mapping.get_mut(key)?,
            (Segment::Index(idx), Value::Sequence(items)) => items.get_mut(*idx)?,
            _ => return None,
        };
    }
    Some(current)
}

fn untag_mut(value: &mut Value) -> &mut Value {
    match value {
        Value::Tagged(tagged) => untag_mut(&mut tagged.value),
        other => other,
    }
}

/// Render the reference tree, paths relative to the root document's directory.
pub fn render_tree(node: &DocumentNode) -> Tree<String> {
    let base = node.source_path.parent().unwrap_or(Path::new("/"));
    let label = node
        .source_path
        .file_name()
        .map(|n| n.to_string_lossy().to_string())
        .unwrap_or_else(|| node.source_path.display().to_string());
    Tree::new(label).with_leaves(
        node.children
            .iter()
            .map(|(key, child)| render_subtree(child, &key.to_string(), base)),
    )
}

fn render_subtree(node: &DocumentNode, key: &str, base: &Path) -> Tree<String> {
    let label = format!(
        "{} ({})",
        relative_to(&node.source_path, base).display(),
        key
    );
    Tree::new(label).with_leaves(
        node.children
            .iter()
            .map(|(k, child)| render_subtree(child, &k.to_string(), base)),
    )
}
