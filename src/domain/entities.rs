//! Domain entities: core data structures

use std::fmt;
use std::path::PathBuf;

use serde_yaml::Value;

/// Key that marks a local reference: a mapping whose only entry is
/// `include: <relative path>`.
pub const REFERENCE_KEY: &str = "include";

/// One step from a value into its nested content.
#[derive(Debug, Clone, PartialEq)]
pub enum Segment {
    /// Entry of a mapping, addressed by its key
    Key(Value),
    /// Element of a sequence, addressed by position
    Index(usize),
}

/// Location of a reference inside a document, from the document root.
///
/// The empty key addresses the whole document.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ReferenceKey(Vec<Segment>);

impl ReferenceKey {
    pub fn root() -> Self {
        Self(Vec::new())
    }

    pub fn segments(&self) -> &[Segment] {
        &self.0
    }

    pub fn is_root(&self) -> bool {
        self.0.is_empty()
    }

    /// New key one level deeper.
    pub fn child(&self, segment: Segment) -> Self {
        let mut segments = self.0.clone();
        segments.push(segment);
        Self(segments)
    }
}

impl From<Vec<Segment>> for ReferenceKey {
    fn from(segments: Vec<Segment>) -> Self {
        Self(segments)
    }
}

impl fmt::Display for ReferenceKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.0.is_empty() {
            return write!(f, ".");
        }
        for (i, segment) in self.0.iter().enumerate() {
            match segment {
                Segment::Key(Value::String(s)) if i == 0 => write!(f, "{}", s)?,
                Segment::Key(Value::String(s)) => write!(f, ".{}", s)?,
                Segment::Key(other) => write!(f, "[{}]", scalar_label(other))?,
                Segment::Index(idx) => write!(f, "[{}]", idx)?,
            }
        }
        Ok(())
    }
}

fn scalar_label(value: &Value) -> String {
    match value {
        Value::Null => "~".to_string(),
        Value::Bool(b) => b.to_string(),
        Value::Number(n) => n.to_string(),
        Value::String(s) => s.clone(),
        Value::Sequence(_) | Value::Mapping(_) | Value::Tagged(_) => "?".to_string(),
    }
}

/// Local reference found by the scanner.
#[derive(Debug, Clone, PartialEq)]
pub struct Reference {
    /// Where the reference sits inside the containing document
    pub key: ReferenceKey,
    /// Absolute, lexically normalized path of the referenced document
    pub path: PathBuf,
}

/// One parsed configuration file plus the documents it references.
#[derive(Debug, Clone, PartialEq)]
pub struct DocumentNode {
    /// Canonical path of the file this node was loaded from
    pub source_path: PathBuf,
    /// Parsed document, mapping order preserved
    pub content: Value,
    /// Referenced documents, in source-document order
    pub children: Vec<(ReferenceKey, DocumentNode)>,
}

impl DocumentNode {
    pub fn leaf(source_path: PathBuf, content: Value) -> Self {
        Self {
            source_path,
            content,
            children: Vec::new(),
        }
    }

    /// Source paths of this node and all descendants, pre-order.
    pub fn source_paths(&self) -> Vec<PathBuf> {
        let mut paths = vec![self.source_path.clone()];
        for (_, child) in &self.children {
            paths.extend(child.source_paths());
        }
        paths
    }

    /// Number of nodes in the tree rooted here.
    pub fn len(&self) -> usize {
        1 + self.children.iter().map(|(_, c)| c.len()).sum::<usize>()
    }

    pub fn is_leaf(&self) -> bool {
        self.children.is_empty()
    }
}
