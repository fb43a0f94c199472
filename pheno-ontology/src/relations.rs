//! Relation index
//!
//! Directed is-a / part-of edges between terms, stored both ways:
//! `parents` (source → targets) and `children` (target → sources).
//! Built once from the loader's edges alongside the [`TermCatalog`].
//!
//! Edge admission:
//! - the source must be a catalog term, otherwise the edge is dropped
//! - a target outside the working namespace is kept but never expanded
//!   (cross-ontology part-of targets are common)
//! - a target inside the namespace that is not in the catalog is dropped

use crate::catalog::TermCatalog;
use crate::record::{RelationEdge, RelationKind};
use hashbrown::{HashMap, HashSet};
use smallvec::SmallVec;
use std::sync::Arc;

/// A neighbor reached through one edge
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Link {
    pub id: String,
    pub kind: RelationKind,
}

impl Link {
    /// True if this link is followed under the given part-of policy
    #[inline]
    pub fn followed(&self, include_part_of: bool) -> bool {
        match self.kind {
            RelationKind::IsA => true,
            RelationKind::PartOf => include_part_of,
        }
    }
}

/// Static empty slice for missing entries
static EMPTY_LINKS: &[Link] = &[];

type Links = SmallVec<[Link; 2]>;

/// Arc-backed relation index for cheap cloning.
#[derive(Debug, Clone)]
pub struct RelationIndex {
    inner: Arc<RelationIndexInner>,
}

#[derive(Debug, Default)]
struct RelationIndexInner {
    /// source → targets ("parents")
    parents: HashMap<String, Links>,
    /// target → sources ("children")
    children: HashMap<String, Links>,
    edge_count: usize,
}

/// Counts from an index build, for logging and tests
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct RelationBuildStats {
    pub kept: usize,
    pub cross_namespace: usize,
    pub dropped_unknown_source: usize,
    pub dropped_unknown_target: usize,
    pub dropped_self_loops: usize,
    pub duplicates: usize,
}

impl RelationIndex {
    /// Build the index from classified edges.
    pub fn build(edges: &[RelationEdge], catalog: &TermCatalog) -> (Self, RelationBuildStats) {
        let mut stats = RelationBuildStats::default();
        let mut seen: HashSet<RelationEdge> = HashSet::with_capacity(edges.len());
        let mut inner = RelationIndexInner::default();

        for edge in edges {
            let edge = edge.normalized();

            if !catalog.contains(&edge.source) {
                stats.dropped_unknown_source += 1;
                continue;
            }
            if edge.source == edge.target {
                stats.dropped_self_loops += 1;
                continue;
            }
            if !catalog.contains(&edge.target) {
                if catalog.in_namespace(&edge.target) {
                    tracing::debug!(
                        source = %edge.source,
                        target = %edge.target,
                        "dropping edge to unknown in-namespace term"
                    );
                    stats.dropped_unknown_target += 1;
                    continue;
                }
                stats.cross_namespace += 1;
            }
            if !seen.insert(edge.clone()) {
                stats.duplicates += 1;
                continue;
            }

            inner
                .parents
                .entry(edge.source.clone())
                .or_default()
                .push(Link {
                    id: edge.target.clone(),
                    kind: edge.kind,
                });
            inner.children.entry(edge.target).or_default().push(Link {
                id: edge.source,
                kind: edge.kind,
            });
            stats.kept += 1;
        }

        inner.edge_count = stats.kept;
        tracing::info!(
            kept = stats.kept,
            cross_namespace = stats.cross_namespace,
            dropped = stats.dropped_unknown_source + stats.dropped_unknown_target,
            "built relation index"
        );

        (
            Self {
                inner: Arc::new(inner),
            },
            stats,
        )
    }

    /// Direct outgoing links of `id` (both kinds)
    pub fn parent_links(&self, id: &str) -> &[Link] {
        self.inner
            .parents
            .get(id)
            .map(|sv| sv.as_slice())
            .unwrap_or(EMPTY_LINKS)
    }

    /// Direct incoming links of `id` (both kinds)
    pub fn child_links(&self, id: &str) -> &[Link] {
        self.inner
            .children
            .get(id)
            .map(|sv| sv.as_slice())
            .unwrap_or(EMPTY_LINKS)
    }

    /// Direct parents under the given part-of policy
    pub fn parents<'a>(
        &'a self,
        id: &str,
        include_part_of: bool,
    ) -> impl Iterator<Item = &'a str> + 'a {
        self.parent_links(id)
            .iter()
            .filter(move |l| l.followed(include_part_of))
            .map(|l| l.id.as_str())
    }

    /// Direct children under the given part-of policy
    pub fn children<'a>(
        &'a self,
        id: &str,
        include_part_of: bool,
    ) -> impl Iterator<Item = &'a str> + 'a {
        self.child_links(id)
            .iter()
            .filter(move |l| l.followed(include_part_of))
            .map(|l| l.id.as_str())
    }

    /// Number of edges kept
    pub fn edge_count(&self) -> usize {
        self.inner.edge_count
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::OntologyConfig;
    use crate::record::TermRecord;

    fn catalog(ids: &[&str]) -> TermCatalog {
        let records: Vec<TermRecord> = ids.iter().map(|id| TermRecord::new(*id)).collect();
        TermCatalog::build(&records, &OntologyConfig::for_prefixes(["MA:"])).unwrap()
    }

    #[test]
    fn test_build_and_lookup() {
        let cat = catalog(&["MA:1", "MA:2", "MA:3"]);
        let edges = vec![
            RelationEdge::is_a("MA:2", "MA:1"),
            RelationEdge::part_of("MA:3", "MA:1"),
        ];
        let (index, stats) = RelationIndex::build(&edges, &cat);
        assert_eq!(stats.kept, 2);
        assert_eq!(index.edge_count(), 2);

        let with: Vec<&str> = index.children("MA:1", true).collect();
        assert_eq!(with, vec!["MA:2", "MA:3"]);
        let without: Vec<&str> = index.children("MA:1", false).collect();
        assert_eq!(without, vec!["MA:2"]);

        assert_eq!(index.parents("MA:3", true).collect::<Vec<_>>(), vec!["MA:1"]);
        assert_eq!(index.parents("MA:3", false).count(), 0);
        assert!(index.parent_links("MA:404").is_empty());
    }

    #[test]
    fn test_edge_admission() {
        let cat = catalog(&["MA:1", "MA:2"]);
        let edges = vec![
            // cross-namespace target kept
            RelationEdge::part_of("MA:2", "UBERON:0000062"),
            // unknown in-namespace target dropped
            RelationEdge::is_a("MA:2", "MA:999"),
            // unknown source dropped
            RelationEdge::is_a("MP:5", "MA:1"),
            RelationEdge::is_a("MA:2", "MA:2"),
            RelationEdge::is_a("MA:2", "MA:1"),
            RelationEdge::is_a("MA_2", "MA_1"),
        ];
        let (index, stats) = RelationIndex::build(&edges, &cat);
        assert_eq!(
            stats,
            RelationBuildStats {
                kept: 2,
                cross_namespace: 1,
                dropped_unknown_source: 1,
                dropped_unknown_target: 1,
                dropped_self_loops: 1,
                duplicates: 1,
            }
        );
        let parents: Vec<&str> = index.parents("MA:2", true).collect();
        assert_eq!(parents, vec!["UBERON:0000062", "MA:1"]);
        // foreign target has a child entry but is never a catalog term
        assert_eq!(index.children("UBERON:0000062", true).count(), 1);
    }
}
