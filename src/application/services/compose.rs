//! Tree composition service
//!
//! Loads a root config file and every document it references, depth-first,
//! into an owned tree of `DocumentNode`s.

use std::collections::HashSet;
use std::io;
use std::path::{Path, PathBuf};
use std::sync::Arc;

use serde_yaml::Value;
use tracing::{debug, instrument};

use crate::application::ApplicationResult;
use crate::domain::{scan, serialize, DocumentNode, DomainError, DomainResult};
use crate::infrastructure::traits::FileSystem;

/// Paths on the active recursion stack of one composition.
#[derive(Debug, Default)]
struct CompositionRun {
    stack: Vec<PathBuf>,
    visited: HashSet<PathBuf>,
}

impl CompositionRun {
    fn contains(&self, path: &Path) -> bool {
        self.visited.contains(path)
    }

    fn depth(&self) -> usize {
        self.stack.len()
    }

    fn enter(&mut self, path: PathBuf) {
        self.visited.insert(path.clone());
        self.stack.push(path);
    }

    fn leave(&mut self, path: &Path) {
        self.stack.pop();
        self.visited.remove(path);
    }

    /// Reference chain from the root to `repeated`, inclusive.
    fn chain_to(&self, repeated: &Path) -> Vec<PathBuf> {
        let mut chain = self.stack.clone();
        chain.push(repeated.to_path_buf());
        chain
    }

    fn is_empty(&self) -> bool {
        self.stack.is_empty() && self.visited.is_empty()
    }
}

/// Service for composing split config files into one tree.
pub struct ComposeService {
    fs: Arc<dyn FileSystem>,
    max_depth: usize,
}

impl ComposeService {
    /// Create a compose service.
    ///
    /// `max_depth` bounds reference nesting: the root is at depth 0, so a
    /// limit of 0 admits no references at all.
    pub fn new(fs: Arc<dyn FileSystem>, max_depth: usize) -> Self {
        Self { fs, max_depth }
    }

    /// Load `root` and all documents it references.
    ///
    /// A path referenced again while it is still being composed is a cycle.
    /// The same path referenced from unrelated branches is loaded once per
    /// reference, giving independent subtrees.
    #[instrument(skip(self))]
    pub fn compose(&self, root: &Path) -> ApplicationResult<DocumentNode> {
        let mut run = CompositionRun::default();
        let result = self.visit(root, &mut run);
        debug_assert!(run.is_empty());
        let tree = result?;
        debug!("compose: {} documents in tree", tree.len());
        Ok(tree)
    }

    /// Compose `root` and encode it as a single YAML document.
    pub fn collapse(&self, root: &Path) -> ApplicationResult<String> {
        let tree = self.compose(root)?;
        Ok(serialize(&tree)?)
    }

    /// All files in the composition, pre-order; repeated references repeat.
    pub fn files(&self, root: &Path) -> ApplicationResult<Vec<PathBuf>> {
        Ok(self.compose(root)?.source_paths())
    }

    fn visit(&self, path: &Path, run: &mut CompositionRun) -> DomainResult<DocumentNode> {
        let canonical = self.locate(path)?;

        if run.contains(&canonical) {
            return Err(DomainError::CycleDetected {
                chain: run.chain_to(&canonical),
            });
        }
        if run.depth() > self.max_depth {
            return Err(DomainError::DepthExceeded {
                path: canonical,
                limit: self.max_depth,
            });
        }

        run.enter(canonical.clone());
        let result = self.load(&canonical, run);
        run.leave(&canonical);
        result
    }

    fn locate(&self, path: &Path) -> DomainResult<PathBuf> {
        if !self.fs.is_file(path) {
            return Err(DomainError::NotFound(path.to_path_buf()));
        }
        self.fs
            .canonicalize(path)
            .map_err(|_| DomainError::NotFound(path.to_path_buf()))
    }

    fn load(&self, path: &Path, run: &mut CompositionRun) -> DomainResult<DocumentNode> {
        debug!("load: depth={} path={}", run.depth(), path.display());
        let text = self
            .fs
            .read_to_string(path)
            .map_err(|source| match source.kind() {
                io::ErrorKind::InvalidData => DomainError::Decode {
                    path: path.to_path_buf(),
                    source,
                },
                _ => DomainError::NotFound(path.to_path_buf()),
            })?;
        let content: Value = if text.trim().is_empty() {
            Value::Null
        } else {
            serde_yaml::from_str(&text).map_err(|source| DomainError::Parse {
                path: path.to_path_buf(),
                source,
            })?
        };

        let base_dir = path.parent().unwrap_or(Path::new("/"));
        let references = scan(&content, base_dir);
        let mut children = Vec::with_capacity(references.len());
        for reference in references {
            debug!("load: {} -> {}", reference.key, reference.path.display());
            let child = self.visit(&reference.path, run)?;
            children.push((reference.key, child));
        }

        Ok(DocumentNode {
            source_path: path.to_path_buf(),
            content,
            children,
        })
    }
}
