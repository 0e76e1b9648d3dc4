//! One project's view of the code: its own trees plus those of every
//! project it references, sharing a single declaration table.

use std::path::Path;
use std::sync::Arc;

use tracing::debug;

use super::binder::SemanticModel;
use super::declarations::build_symbol_table;
use super::symbols::{Symbol, SymbolId, SymbolTable};
use super::syntax::SyntaxTree;

/// Parsed trees and their declarations for one project.
///
/// The first `own_trees` trees belong to the project itself. The rest come
/// from referenced projects and only contribute declarations.
#[derive(Debug)]
pub struct Compilation {
    trees: Vec<Arc<SyntaxTree>>,
    own_trees: usize,
    table: Arc<SymbolTable>,
}

impl Compilation {
    /// Build the declaration table over `trees`.
    #[must_use]
    pub fn new(trees: Vec<Arc<SyntaxTree>>, own_trees: usize) -> Self {
        let table = Arc::new(build_symbol_table(&trees));
        debug!(
            trees = trees.len(),
            own_trees,
            symbols = table.len(),
            "Built compilation"
        );
        Self {
            own_trees: own_trees.min(trees.len()),
            trees,
            table,
        }
    }

    /// Every tree, own trees first.
    #[must_use]
    pub fn trees(&self) -> &[Arc<SyntaxTree>] {
        &self.trees
    }

    /// Trees of the project itself.
    #[must_use]
    pub fn own_trees(&self) -> &[Arc<SyntaxTree>] {
        &self.trees[..self.own_trees]
    }

    /// Index of the tree parsed from `path`.
    #[must_use]
    pub fn tree_index(&self, path: &Path) -> Option<usize> {
        self.trees.iter().position(|t| t.path() == path)
    }

    /// Binder for the tree at `tree_index`.
    #[must_use]
    pub fn semantic_model(&self, tree_index: usize) -> Option<SemanticModel<'_>> {
        (tree_index < self.trees.len()).then(|| SemanticModel::new(self, tree_index))
    }

    /// The shared declaration table.
    #[must_use]
    pub fn table(&self) -> &Arc<SymbolTable> {
        &self.table
    }

    /// Handle for a declared symbol.
    #[must_use]
    pub fn symbol(&self, id: SymbolId) -> Symbol {
        Symbol::declared(&self.table, id)
    }
}
