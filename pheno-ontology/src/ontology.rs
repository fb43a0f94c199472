//! Ontology facade
//!
//! [`Ontology`] owns one frozen catalog and everything derived from it: the
//! relation index, the memoizing closure engine, the once-only slim and the
//! stratifier. Each instance owns its caches, so several ontologies loaded
//! in one process never interfere.
//!
//! Query inputs are normalized (`MA_0000001` and full PURLs are accepted).
//! Once a slim is active, closures skip obsolete terms: they are neither
//! reported nor expanded through.
//! Traversal queries are permissive: unknown ids give empty results. Only
//! the strict lookups (`resolve_unique`, `require_term`, `view`) return
//! errors.

use crate::catalog::{Term, TermCatalog};
use crate::closure::{ClosureEngine, ClosureStats, Depth, ObsoletePolicy, TermSet};
use crate::config::OntologyConfig;
use crate::error::{Error, Result};
use crate::record::{classify_edges, RawEdge, RelationEdge, TermRecord};
use crate::relations::RelationIndex;
use crate::slim::{Slim, SlimExtractor};
use crate::stratify::Stratifier;
use crate::tree::{TreeBuilder, TreePaths};
use crate::view::{TermView, ViewBuilder};
use pheno_vocab::normalize_id;
use std::sync::Arc;

/// A loaded ontology and its derived state
#[derive(Debug)]
pub struct Ontology {
    config: OntologyConfig,
    catalog: TermCatalog,
    relations: RelationIndex,
    closure: ClosureEngine,
    stratifier: Stratifier,
    slim: SlimExtractor,
}

impl Ontology {
    /// Build an ontology from loader records and classified edges.
    ///
    /// Builds the slim eagerly when `config.slim_seed_ids` is set.
    ///
    /// # Errors
    ///
    /// Invalid configuration, an empty record set, or a namespace filter
    /// that keeps no terms. No partial ontology is returned.
    pub fn load(
        records: &[TermRecord],
        edges: &[RelationEdge],
        config: OntologyConfig,
    ) -> Result<Self> {
        config.validate()?;

        let catalog = TermCatalog::build(records, &config)?;
        let (relations, _) = RelationIndex::build(edges, &catalog);
        let closure = ClosureEngine::new(catalog.clone(), relations.clone(), config.include_part_of);
        let stratifier = Stratifier::new(&config.top_level_ids, &config.namespace_prefixes);

        for top in stratifier.top_level_ids() {
            if !catalog.contains(top) {
                tracing::warn!(top_level = %top, "configured top-level id is not in the catalog");
            }
        }

        let ontology = Self {
            config,
            catalog,
            relations,
            closure,
            stratifier,
            slim: SlimExtractor::new(),
        };

        if let Some(seeds) = &ontology.config.slim_seed_ids {
            ontology.build_slim(seeds);
        }

        tracing::info!(
            terms = ontology.catalog.len(),
            edges = ontology.relations.edge_count(),
            top_levels = ontology.stratifier.top_level_ids().len(),
            slim = ontology.slim.is_active(),
            source = ?ontology.config.source,
            "loaded ontology"
        );
        Ok(ontology)
    }

    /// Like [`load`](Self::load), classifying property-typed edges first
    pub fn load_raw(
        records: &[TermRecord],
        edges: &[RawEdge],
        config: OntologyConfig,
    ) -> Result<Self> {
        let edges = classify_edges(edges, &config);
        Self::load(records, &edges, config)
    }

    pub fn config(&self) -> &OntologyConfig {
        &self.config
    }

    pub fn catalog(&self) -> &TermCatalog {
        &self.catalog
    }

    pub fn relations(&self) -> &RelationIndex {
        &self.relations
    }

    pub fn closure(&self) -> &ClosureEngine {
        &self.closure
    }

    pub fn stratifier(&self) -> &Stratifier {
        &self.stratifier
    }

    /// Primary id for a query input; unknown ids come back normalized
    fn primary_id(&self, id: &str) -> String {
        match self.catalog.resolve(id) {
            Some(term) => term.id.clone(),
            None => normalize_id(id),
        }
    }

    // ------------------------------------------------------------------
    // Lookup
    // ------------------------------------------------------------------

    /// Term by primary id
    pub fn term(&self, id: &str) -> Option<&Term> {
        self.catalog.get(&normalize_id(id))
    }

    /// Term by primary or alternate id (first claimant wins)
    pub fn resolve(&self, id: &str) -> Option<&Term> {
        self.catalog.resolve(id)
    }

    /// Term by primary or alternate id, rejecting ambiguous alternate ids
    pub fn resolve_unique(&self, id: &str) -> Result<Option<&Term>> {
        self.catalog.resolve_unique(id)
    }

    /// Term that must exist.
    ///
    /// # Errors
    ///
    /// [`Error::UnknownTerm`] if nothing resolves, [`Error::AmbiguousId`] if
    /// several terms claim the id.
    pub fn require_term(&self, id: &str) -> Result<&Term> {
        self.catalog
            .resolve_unique(id)?
            .ok_or_else(|| Error::unknown_term(normalize_id(id)))
    }

    // ------------------------------------------------------------------
    // Closures
    // ------------------------------------------------------------------

    /// Obsolete-term policy for closures in the current slim state
    pub fn obsolete_policy(&self) -> ObsoletePolicy {
        if self.slim.is_active() {
            ObsoletePolicy::Skip
        } else {
            ObsoletePolicy::Include
        }
    }

    /// Ancestor closure; empty for unknown ids
    pub fn ancestors(&self, id: &str) -> Arc<TermSet> {
        self.closure
            .ancestors_with(&self.primary_id(id), self.obsolete_policy())
    }

    /// Descendant closure up to `depth`; `-1` means unbounded
    pub fn descendants(&self, id: &str, depth: impl Into<Depth>) -> Arc<TermSet> {
        self.closure
            .descendants_with(&self.primary_id(id), depth, self.obsolete_policy())
    }

    /// Precompute every ancestor closure in parallel
    pub fn warm(&self) {
        self.closure.warm_ancestors(self.obsolete_policy());
    }

    pub fn stats(&self) -> ClosureStats {
        self.closure.stats()
    }

    // ------------------------------------------------------------------
    // Slim
    // ------------------------------------------------------------------

    /// Build the slim for `wanted`, restricted to the namespace prefixes.
    ///
    /// Only the first call computes; later calls return that slim.
    pub fn build_slim<I, S>(&self, wanted: I) -> Arc<Slim>
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        self.slim.build(
            wanted,
            &self.config.namespace_prefixes,
            &self.catalog,
            &self.closure,
        )
    }

    /// The active slim, if any
    pub fn slim(&self) -> Option<&Arc<Slim>> {
        self.slim.get()
    }

    /// Whether `id` is visible to derived views; always true without a slim
    pub fn is_visible(&self, id: &str) -> bool {
        self.slim
            .get()
            .map_or(true, |s| s.is_visible(id, &self.catalog))
    }

    // ------------------------------------------------------------------
    // Stratification
    // ------------------------------------------------------------------

    /// Top levels above `id`, configured order, slim-filtered
    pub fn top_levels(&self, id: &str) -> Vec<String> {
        let mut tops =
            self.stratifier
                .top_levels(&self.primary_id(id), &self.closure, self.obsolete_policy());
        tops.retain(|t| self.is_visible(t));
        tops
    }

    /// Intermediates of `id`, slim-filtered
    pub fn intermediates(&self, id: &str) -> TermSet {
        let mut mids =
            self.stratifier
                .intermediates(&self.primary_id(id), &self.closure, self.obsolete_policy());
        mids.retain(|m| self.is_visible(m));
        mids
    }

    // ------------------------------------------------------------------
    // Views and trees
    // ------------------------------------------------------------------

    fn view_builder(&self) -> ViewBuilder<'_> {
        ViewBuilder {
            catalog: &self.catalog,
            closure: &self.closure,
            stratifier: &self.stratifier,
            slim: self.slim.get().map(Arc::as_ref),
        }
    }

    /// Derived view of one term; `Ok(None)` if the id resolves to nothing.
    ///
    /// # Errors
    ///
    /// [`Error::AmbiguousId`] when the id, or an id the view must resolve,
    /// names more than one term.
    pub fn view(&self, id: &str) -> Result<Option<TermView>> {
        let Some(term) = self.catalog.resolve_unique(id)? else {
            return Ok(None);
        };
        self.view_builder().build(term).map(Some)
    }

    /// Views of every term in id order, skipping terms whose view fails
    pub fn all_views(&self) -> Vec<TermView> {
        self.view_builder().build_all()
    }

    /// Unfold the child relation below `root_id`.
    ///
    /// Restricted to slim-visible terms when a slim is active. An unknown
    /// root gives an empty tree.
    pub fn build_paths(&self, root_id: &str, include_part_of: bool) -> TreePaths {
        TreeBuilder {
            catalog: &self.catalog,
            relations: &self.relations,
            slim: self.slim.get().map(Arc::as_ref),
        }
        .build(root_id, include_part_of)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pheno_vocab::{obo, obo_in_owl, owl, rdfs};

    fn records() -> Vec<TermRecord> {
        vec![
            TermRecord::new("MA:1").annotate(rdfs::LABEL, "anatomy"),
            TermRecord::new("MA:2").annotate(rdfs::LABEL, "organ"),
            TermRecord::new("MA:3")
                .annotate(rdfs::LABEL, "heart")
                .annotate(obo_in_owl::HAS_ALTERNATIVE_ID, "MA:33"),
            TermRecord::new("MA:4").annotate(rdfs::LABEL, "kidney"),
            TermRecord::new("MA:5")
                .annotate(owl::DEPRECATED, "true")
                .annotate(obo::TERM_REPLACED_BY, "MA:3"),
        ]
    }

    fn edges() -> Vec<RelationEdge> {
        vec![
            RelationEdge::is_a("MA:2", "MA:1"),
            RelationEdge::part_of("MA:3", "MA:2"),
            RelationEdge::is_a("MA:4", "MA:2"),
            RelationEdge::is_a("MA:5", "MA:2"),
        ]
    }

    fn config() -> OntologyConfig {
        OntologyConfig::for_prefixes(["MA:"]).with_top_levels(["MA:1"])
    }

    #[test]
    fn test_send_sync() {
        fn assert_send_sync<T: Send + Sync>() {}
        assert_send_sync::<Ontology>();
    }

    #[test]
    fn test_load_failures() {
        let err = Ontology::load(&[], &edges(), config()).unwrap_err();
        assert!(matches!(err, Error::EmptySource));

        let only_mp = vec![TermRecord::new("MP:1")];
        let err = Ontology::load(&only_mp, &[], config()).unwrap_err();
        assert!(matches!(err, Error::EmptyNamespace { .. }));

        let mut bad = config();
        bad.annotation_roles.label.clear();
        let err = Ontology::load(&records(), &edges(), bad).unwrap_err();
        assert!(matches!(err, Error::InvalidConfig(_)));
    }

    #[test]
    fn test_lookups() {
        let onto = Ontology::load(&records(), &edges(), config()).unwrap();
        assert_eq!(onto.term("MA_3").map(|t| t.label.as_str()), Some("heart"));
        assert!(onto.term("MA:33").is_none());
        assert_eq!(onto.resolve("MA:33").map(|t| t.id.as_str()), Some("MA:3"));
        assert_eq!(onto.require_term("MA:33").unwrap().id, "MA:3");
        assert!(matches!(
            onto.require_term("MA:404"),
            Err(Error::UnknownTerm(id)) if id == "MA:404"
        ));
    }

    #[test]
    fn test_closures_accept_alt_and_underscore_ids() {
        let onto = Ontology::load(&records(), &edges(), config()).unwrap();
        assert_eq!(onto.ancestors("MA_3"), onto.ancestors("MA:33"));
        assert!(onto.ancestors("MA:3").contains("MA:1"));
        assert!(onto.ancestors("MA:404").is_empty());
        assert_eq!(onto.descendants("MA:1", 1).len(), 1);
        assert_eq!(onto.descendants("MA:1", -1).len(), 4);
    }

    #[test]
    fn test_eager_slim_and_filtering() {
        let onto = Ontology::load(
            &records(),
            &edges(),
            config().with_slim_seeds(["MA:5"]),
        )
        .unwrap();
        let slim = onto.slim().unwrap();
        assert!(slim.contains("MA:3"));
        assert!(!slim.contains("MA:5"));
        assert!(!onto.is_visible("MA:4"));

        // a different request keeps the first slim
        let again = onto.build_slim(["MA:4"]);
        assert!(Arc::ptr_eq(slim, &again));

        let organ = onto.view("MA:2").unwrap().unwrap();
        let children: Vec<&str> = organ.children.iter().map(|c| c.id.as_str()).collect();
        assert_eq!(children, vec!["MA:3"]);
        assert_eq!(onto.top_levels("MA:3"), vec!["MA:1"]);
        assert_eq!(onto.intermediates("MA:3").len(), 1);

        assert_eq!(onto.obsolete_policy(), ObsoletePolicy::Skip);
        assert!(!onto.descendants("MA:2", -1).contains("MA:5"));
        assert!(onto.ancestors("MA:5").is_empty());
    }

    #[test]
    fn test_separate_instances_do_not_share_state() {
        let first = Ontology::load(&records(), &edges(), config()).unwrap();
        let second = Ontology::load(&records(), &edges(), config()).unwrap();
        first.build_slim(["MA:4"]);
        first.ancestors("MA:3");
        assert!(second.slim().is_none());
        assert_eq!(second.stats().ancestors.entries, 0);
    }

    #[test]
    fn test_view_and_paths() {
        let onto = Ontology::load(&records(), &edges(), config()).unwrap();
        assert!(onto.view("MA:404").unwrap().is_none());
        assert_eq!(onto.all_views().len(), 5);

        let tree = onto.build_paths("MA:1", true);
        assert_eq!(tree.paths_of("MA:3"), &[vec![1, 2]]);
        let is_a_only = onto.build_paths("MA:1", false);
        assert!(is_a_only.paths_of("MA:3").is_empty());
    }

    #[test]
    fn test_load_raw_edges() {
        let raw = vec![
            RawEdge::new("MA:2", rdfs::SUB_CLASS_OF, "MA:1"),
            RawEdge::new("MA:3", obo::PART_OF, "MA:2"),
            RawEdge::new("MA:4", rdfs::COMMENT, "MA:2"),
        ];
        let onto = Ontology::load_raw(&records(), &raw, config()).unwrap();
        assert_eq!(onto.relations().edge_count(), 2);
    }
}
