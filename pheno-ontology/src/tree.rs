//! Tree builder
//!
//! Unfolds the child relation below a root term into an occurrence tree for
//! hierarchical UI widgets. A term reachable through several parent chains
//! occurs once per chain, each occurrence with its own node id, so a term
//! accumulates one root-to-node path per chain.
//!
//! Numbering:
//! - node ids start at 1 in depth-first visitation order; the root itself
//!   has no node id and is never renumbered when a cycle re-reaches it
//! - a term already on the current path is not expanded again
//!
//! Siblings are visited in id order, so the numbering is deterministic.

use crate::catalog::TermCatalog;
use crate::relations::RelationIndex;
use crate::slim::Slim;
use pheno_vocab::normalize_id;
use serde::Serialize;
use std::collections::{BTreeMap, BTreeSet};

/// Occurrence node id, 1-based
pub type NodeId = u32;

static NO_PATHS: &[Vec<NodeId>] = &[];

/// One occurrence of a term in the unfolded tree
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Occurrence {
    pub node: NodeId,
    pub term_id: String,
    pub label: String,
    /// `None` for direct children of the root
    pub parent: Option<NodeId>,
    pub children: Vec<NodeId>,
}

/// Result of [`build_paths`](crate::Ontology::build_paths)
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct TreePaths {
    root: String,
    include_part_of: bool,
    /// Indexed by `node - 1`
    occurrences: Vec<Occurrence>,
    /// Node ids directly below the root
    top_nodes: Vec<NodeId>,
    /// Term id → every root-to-node path (root excluded)
    paths: BTreeMap<String, Vec<Vec<NodeId>>>,
}

impl TreePaths {
    fn empty(root: String, include_part_of: bool) -> Self {
        Self {
            root,
            include_part_of,
            ..Self::default()
        }
    }

    pub fn root(&self) -> &str {
        &self.root
    }

    pub fn includes_part_of(&self) -> bool {
        self.include_part_of
    }

    /// Number of occurrences
    pub fn len(&self) -> usize {
        self.occurrences.len()
    }

    pub fn is_empty(&self) -> bool {
        self.occurrences.is_empty()
    }

    pub fn occurrences(&self) -> &[Occurrence] {
        &self.occurrences
    }

    pub fn occurrence(&self, node: NodeId) -> Option<&Occurrence> {
        let index = (node as usize).checked_sub(1)?;
        self.occurrences.get(index)
    }

    pub fn top_nodes(&self) -> &[NodeId] {
        &self.top_nodes
    }

    /// Root-to-node paths of `term_id`, one per occurrence
    pub fn paths_of(&self, term_id: &str) -> &[Vec<NodeId>] {
        self.paths
            .get(normalize_id(term_id).as_str())
            .map(Vec::as_slice)
            .unwrap_or(NO_PATHS)
    }

    /// Node ids at which `term_id` occurs, in visitation order
    pub fn nodes_of<'a>(&'a self, term_id: &str) -> impl Iterator<Item = NodeId> + 'a {
        self.paths_of(term_id)
            .iter()
            .filter_map(|path| path.last().copied())
    }

    /// Distinct terms in the tree, sorted
    pub fn terms(&self) -> impl Iterator<Item = &str> {
        self.paths.keys().map(String::as_str)
    }

    /// Widget payload focused on `term_id`.
    ///
    /// Carries the root's children, the children of every node on the term's
    /// paths, and the term's own nodes. Returns `None` if the term does not
    /// occur in the tree.
    pub fn widget_for(&self, term_id: &str) -> Option<TreeWidget> {
        let paths = self.paths_of(term_id);
        let scroll_node = *paths.first()?.last()?;

        let mut opened: BTreeSet<NodeId> = BTreeSet::new();
        let mut selected: BTreeSet<NodeId> = BTreeSet::new();
        for path in paths {
            if let Some((&last, above)) = path.split_last() {
                selected.insert(last);
                opened.extend(above.iter().copied());
            }
        }

        let mut included: BTreeSet<NodeId> = self.top_nodes.iter().copied().collect();
        included.extend(selected.iter().copied());
        for &node in &opened {
            included.insert(node);
            if let Some(occ) = self.occurrence(node) {
                included.extend(occ.children.iter().copied());
            }
        }

        let nodes = included
            .into_iter()
            .filter_map(|node| self.occurrence(node))
            .map(|occ| TreeNode {
                node: occ.node,
                term_id: occ.term_id.clone(),
                label: occ.label.clone(),
                parent: occ.parent,
                has_children: !occ.children.is_empty(),
                opened: opened.contains(&occ.node),
                selected: selected.contains(&occ.node),
            })
            .collect();

        Some(TreeWidget {
            root: self.root.clone(),
            nodes,
            scroll_node,
        })
    }

    fn path_to(&self, node: NodeId) -> Vec<NodeId> {
        let mut path = Vec::new();
        let mut current = Some(node);
        while let Some(n) = current {
            path.push(n);
            current = self.occurrence(n).and_then(|o| o.parent);
        }
        path.reverse();
        path
    }

    /// True if `term_id` occurs on the chain from `node` up to the root
    fn on_path(&self, term_id: &str, mut node: Option<NodeId>) -> bool {
        while let Some(n) = node {
            match self.occurrence(n) {
                Some(occ) if occ.term_id == term_id => return true,
                Some(occ) => node = occ.parent,
                None => return false,
            }
        }
        false
    }
}

/// One node of a [`TreeWidget`]
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct TreeNode {
    pub node: NodeId,
    pub term_id: String,
    pub label: String,
    pub parent: Option<NodeId>,
    pub has_children: bool,
    pub opened: bool,
    pub selected: bool,
}

/// Serializable navigation payload for one focused term
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct TreeWidget {
    pub root: String,
    pub nodes: Vec<TreeNode>,
    /// Node the UI focuses by default: the term's first occurrence
    pub scroll_node: NodeId,
}

pub(crate) struct TreeBuilder<'a> {
    pub catalog: &'a TermCatalog,
    pub relations: &'a RelationIndex,
    pub slim: Option<&'a Slim>,
}

impl<'a> TreeBuilder<'a> {
    /// Visible children of `id`, in id order
    fn children(&self, id: &str, include_part_of: bool) -> Vec<&'a str> {
        let relations: &'a RelationIndex = self.relations;
        let unique: BTreeSet<&'a str> = relations
            .children(id, include_part_of)
            .filter(|child| self.slim.map_or(true, |s| s.is_visible(child, self.catalog)))
            .collect();
        unique.into_iter().collect()
    }

    /// Unfold the tree below `root_id`. Unknown roots give an empty tree.
    pub fn build(&self, root_id: &str, include_part_of: bool) -> TreePaths {
        let root = match self.catalog.resolve(root_id) {
            Some(term) => term.id.clone(),
            None => {
                tracing::debug!(root = %root_id, "tree root not in catalog");
                return TreePaths::empty(normalize_id(root_id), include_part_of);
            }
        };
        let mut tree = TreePaths::empty(root.clone(), include_part_of);

        // (term, parent occurrence); reversed pushes pop siblings in id order
        let mut stack: Vec<(&str, Option<NodeId>)> = self
            .children(&root, include_part_of)
            .into_iter()
            .rev()
            .map(|child| (child, None))
            .collect();

        while let Some((term_id, parent)) = stack.pop() {
            if term_id == root || tree.on_path(term_id, parent) {
                continue;
            }

            let node = tree.occurrences.len() as NodeId + 1;
            tree.occurrences.push(Occurrence {
                node,
                term_id: term_id.to_string(),
                label: self.catalog.label_of(term_id).to_string(),
                parent,
                children: Vec::new(),
            });
            match parent {
                Some(p) => tree.occurrences[p as usize - 1].children.push(node),
                None => tree.top_nodes.push(node),
            }
            let path = tree.path_to(node);
            tree.paths.entry(term_id.to_string()).or_default().push(path);

            stack.extend(
                self.children(term_id, include_part_of)
                    .into_iter()
                    .rev()
                    .map(|child| (child, Some(node))),
            );
        }

        tracing::info!(
            root = %tree.root,
            occurrences = tree.occurrences.len(),
            terms = tree.paths.len(),
            slim = self.slim.is_some(),
            "built tree paths"
        );
        tree
    }
}
