//! Closure engine
//!
//! Transitive ancestor and (depth-bounded) descendant closures over the
//! relation index, treating is-a and (optionally) part-of edges as the same
//! kind of reachability edge.
//!
//! # Semantics
//!
//! - A term is never its own ancestor or descendant, even when a cycle leads
//!   back to it: with `A -> B -> A`, `ancestors(A) = {B}`.
//! - Unknown ids have empty closures. This is not an error.
//! - The part-of policy is fixed per engine instance, so cache keys carry
//!   only the term id (plus the depth bound for descendants).
//!
//! Traversal uses an explicit work stack with a visited set, so malformed
//! cyclic input terminates without relying on the call stack.

use crate::cache::{CacheStats, MemoCache};
use crate::catalog::TermCatalog;
use crate::relations::RelationIndex;
use rayon::prelude::*;
use std::collections::BTreeSet;
use std::sync::Arc;

/// A sorted set of term ids
pub type TermSet = BTreeSet<String>;

/// Descendant depth bound
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum Depth {
    #[default]
    Unbounded,
    /// Maximum number of edges from the start term
    Limited(usize),
}

impl Depth {
    /// True if a node `level` edges away is within the bound
    #[inline]
    pub fn allows(self, level: usize) -> bool {
        match self {
            Depth::Unbounded => true,
            Depth::Limited(max) => level <= max,
        }
    }
}

impl From<i32> for Depth {
    /// Negative values (conventionally `-1`) mean unbounded
    fn from(value: i32) -> Self {
        if value < 0 {
            Depth::Unbounded
        } else {
            Depth::Limited(value as usize)
        }
    }
}

impl From<Option<usize>> for Depth {
    fn from(value: Option<usize>) -> Self {
        value.map_or(Depth::Unbounded, Depth::Limited)
    }
}

/// Whether obsolete terms take part in a traversal.
///
/// Once a slim is active, obsolete terms are excluded from closures: they
/// are neither reported nor expanded, and an obsolete start term has empty
/// closures.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum ObsoletePolicy {
    #[default]
    Include,
    Skip,
}

/// Cache statistics for both closure directions under both policies
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ClosureStats {
    pub ancestors: CacheStats,
    pub descendants: CacheStats,
    /// Closures computed with [`ObsoletePolicy::Skip`]
    pub live_ancestors: CacheStats,
    pub live_descendants: CacheStats,
}

#[derive(Debug, Default)]
struct ClosureCaches {
    ancestors: MemoCache<String, TermSet>,
    descendants: MemoCache<(String, Depth), TermSet>,
}

/// Memoizing closure engine bound to one catalog.
#[derive(Debug)]
pub struct ClosureEngine {
    catalog: TermCatalog,
    relations: RelationIndex,
    include_part_of: bool,
    all: ClosureCaches,
    live: ClosureCaches,
}

impl ClosureEngine {
    pub fn new(catalog: TermCatalog, relations: RelationIndex, include_part_of: bool) -> Self {
        Self {
            catalog,
            relations,
            include_part_of,
            all: ClosureCaches::default(),
            live: ClosureCaches::default(),
        }
    }

    /// Whether part-of edges are folded into closures
    pub fn includes_part_of(&self) -> bool {
        self.include_part_of
    }

    pub fn relations(&self) -> &RelationIndex {
        &self.relations
    }

    fn caches(&self, policy: ObsoletePolicy) -> &ClosureCaches {
        match policy {
            ObsoletePolicy::Include => &self.all,
            ObsoletePolicy::Skip => &self.live,
        }
    }

    /// True if `id` takes part in a traversal under `policy`
    #[inline]
    fn admits(&self, id: &str, policy: ObsoletePolicy) -> bool {
        match policy {
            ObsoletePolicy::Include => true,
            ObsoletePolicy::Skip => !self.catalog.get(id).is_some_and(|t| t.obsolete),
        }
    }

    /// Direct parents under this engine's part-of policy
    pub fn direct_parents(&self, id: &str) -> Vec<&str> {
        self.relations.parents(id, self.include_part_of).collect()
    }

    /// Direct children under this engine's part-of policy
    pub fn direct_children(&self, id: &str) -> Vec<&str> {
        self.relations.children(id, self.include_part_of).collect()
    }

    /// All ancestors of `id` (never including `id`).
    pub fn ancestors(&self, id: &str) -> Arc<TermSet> {
        self.ancestors_with(id, ObsoletePolicy::Include)
    }

    /// Ancestors of `id` under the given obsolete-term policy
    pub fn ancestors_with(&self, id: &str, policy: ObsoletePolicy) -> Arc<TermSet> {
        self.caches(policy)
            .ancestors
            .get_or_insert_with(id.to_string(), || self.compute_ancestors(id, policy))
    }

    /// True if `ancestor` is in the ancestor closure of `id`
    pub fn is_ancestor(&self, ancestor: &str, id: &str, policy: ObsoletePolicy) -> bool {
        self.ancestors_with(id, policy).contains(ancestor)
    }

    fn compute_ancestors(&self, start: &str, policy: ObsoletePolicy) -> TermSet {
        let include_part_of = self.include_part_of;
        let cache = &self.caches(policy).ancestors;
        let mut result = TermSet::new();
        if !self.admits(start, policy) {
            return result;
        }
        let mut stack: Vec<&str> = self.relations.parents(start, include_part_of).collect();

        while let Some(current) = stack.pop() {
            if current == start || result.contains(current) || !self.admits(current, policy) {
                continue;
            }
            result.insert(current.to_string());

            // A finished closure for `current` already covers everything above it
            if let Some(done) = cache.peek(&current.to_string()) {
                result.extend(done.iter().filter(|a| a.as_str() != start).cloned());
                continue;
            }
            stack.extend(self.relations.parents(current, include_part_of));
        }

        result
    }

    /// Descendants of `id` up to `depth` edges away (never including `id`).
    ///
    /// Breadth-first, so the bound counts shortest distance. Descendant sets
    /// near the roots are large; callers use a bound or restrict this to
    /// leaf-adjacent terms.
    pub fn descendants(&self, id: &str, depth: impl Into<Depth>) -> Arc<TermSet> {
        self.descendants_with(id, depth, ObsoletePolicy::Include)
    }

    /// Descendants of `id` under the given obsolete-term policy
    pub fn descendants_with(
        &self,
        id: &str,
        depth: impl Into<Depth>,
        policy: ObsoletePolicy,
    ) -> Arc<TermSet> {
        let depth = depth.into();
        self.caches(policy)
            .descendants
            .get_or_insert_with((id.to_string(), depth), || {
                self.compute_descendants(id, depth, policy)
            })
    }

    fn compute_descendants(&self, start: &str, depth: Depth, policy: ObsoletePolicy) -> TermSet {
        let include_part_of = self.include_part_of;
        let mut result = TermSet::new();
        if !self.admits(start, policy) {
            return result;
        }
        let mut frontier: Vec<&str> = vec![start];
        let mut level = 0usize;

        while !frontier.is_empty() {
            level += 1;
            if !depth.allows(level) {
                break;
            }
            let mut next = Vec::new();
            for node in frontier {
                for child in self.relations.children(node, include_part_of) {
                    if child != start
                        && self.admits(child, policy)
                        && result.insert(child.to_string())
                    {
                        next.push(child);
                    }
                }
            }
            frontier = next;
        }

        result
    }

    /// Precompute ancestors for every catalog term on the rayon pool.
    ///
    /// Read-only over the frozen catalog; results match lazy calls exactly.
    pub fn warm_ancestors(&self, policy: ObsoletePolicy) {
        let ids = self.catalog.ids();
        ids.par_iter().for_each(|id| {
            let _ = self.ancestors_with(id, policy);
        });
        tracing::debug!(terms = ids.len(), ?policy, "warmed ancestor closures");
    }

    pub fn stats(&self) -> ClosureStats {
        ClosureStats {
            ancestors: self.all.ancestors.stats(),
            descendants: self.all.descendants.stats(),
            live_ancestors: self.live.ancestors.stats(),
            live_descendants: self.live.descendants.stats(),
        }
    }
}
