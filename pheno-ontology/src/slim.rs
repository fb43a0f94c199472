//! Slim extraction
//!
//! A slim is the closed subset of the catalog made of the seed terms plus all
//! of their ancestors. Obsolete seeds are swapped for their replacements
//! before the closure is taken.
//!
//! The first slim built for a catalog is authoritative for the catalog's
//! lifetime. A later request with different seeds gets the existing slim
//! back (and a warning); it never recomputes.

use crate::catalog::TermCatalog;
use crate::closure::{ClosureEngine, ObsoletePolicy, TermSet};
use hashbrown::HashSet;
use once_cell::sync::OnceCell;
use pheno_vocab::normalize_id;
use std::sync::Arc;

/// A computed slim
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Slim {
    /// Seeds as requested (normalized)
    requested: TermSet,
    /// Seeds after obsolete-term substitution and cleanup
    resolved: TermSet,
    /// Prefixes the slim was restricted to (empty = all)
    prefixes: Vec<String>,
    /// Slim members: resolved in-namespace seeds and all their ancestors,
    /// never expanding through an obsolete term
    members: TermSet,
}

impl Slim {
    pub fn contains(&self, id: &str) -> bool {
        self.members.contains(id)
    }

    pub fn members(&self) -> &TermSet {
        &self.members
    }

    pub fn requested_seeds(&self) -> &TermSet {
        &self.requested
    }

    /// Seeds after obsolete substitution
    pub fn resolved_seeds(&self) -> &TermSet {
        &self.resolved
    }

    pub fn prefixes(&self) -> &[String] {
        &self.prefixes
    }

    pub fn len(&self) -> usize {
        self.members.len()
    }

    pub fn is_empty(&self) -> bool {
        self.members.is_empty()
    }

    /// Neighbor visibility while this slim is active.
    ///
    /// Obsolete terms are never visible. Otherwise an id is visible if it is
    /// a slim member or lies outside the slim's namespace prefixes; an
    /// in-namespace non-member is hidden even when a raw edge reaches it.
    pub fn is_visible(&self, id: &str, catalog: &TermCatalog) -> bool {
        if catalog.get(id).is_some_and(|t| t.obsolete) {
            return false;
        }
        self.members.contains(id) || !pheno_vocab::in_namespace(id, &self.prefixes)
    }
}

/// Substitute obsolete seeds with their replacements, then drop every
/// obsolete id.
///
/// Replacement chains (an obsolete term replaced by another obsolete term)
/// are followed; a chain that loops is cut at the first repeat.
pub(crate) fn resolve_seeds(wanted: &TermSet, catalog: &TermCatalog) -> TermSet {
    let mut seeds: TermSet = TermSet::new();
    for id in wanted {
        // secondary ids stand for their primary term
        match catalog.resolve(id) {
            Some(term) => seeds.insert(term.id.clone()),
            None => seeds.insert(id.clone()),
        };
    }

    let mut substituted: HashSet<String> = HashSet::new();
    loop {
        let pending: Vec<String> = seeds
            .iter()
            .filter(|id| {
                !substituted.contains(id.as_str())
                    && catalog.get(id).is_some_and(|t| t.obsolete)
            })
            .cloned()
            .collect();
        if pending.is_empty() {
            break;
        }
        for id in pending {
            seeds.remove(&id);
            if let Some(term) = catalog.get(&id) {
                for replacement in &term.replaced_by {
                    tracing::debug!(obsolete = %id, replacement = %replacement, "substituting slim seed");
                    seeds.insert(replacement.clone());
                }
            }
            substituted.insert(id);
        }
    }

    // cleanup: no obsolete id survives, whatever route it came in by
    seeds.retain(|id| !catalog.get(id).is_some_and(|t| t.obsolete));
    seeds
}

/// Once-only slim holder owned by an ontology instance
#[derive(Debug, Default)]
pub struct SlimExtractor {
    slim: OnceCell<Arc<Slim>>,
}

impl SlimExtractor {
    pub fn new() -> Self {
        Self::default()
    }

    /// The active slim, if one has been built
    pub fn get(&self) -> Option<&Arc<Slim>> {
        self.slim.get()
    }

    pub fn is_active(&self) -> bool {
        self.slim.get().is_some()
    }

    /// Build the slim for `wanted`, or return the one already built.
    pub fn build<I, S>(
        &self,
        wanted: I,
        prefixes: &[String],
        catalog: &TermCatalog,
        closure: &ClosureEngine,
    ) -> Arc<Slim>
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let requested: TermSet = wanted
            .into_iter()
            .map(|id| normalize_id(id.as_ref()))
            .collect();

        if let Some(existing) = self.slim.get() {
            if existing.requested != requested || existing.prefixes != prefixes {
                tracing::warn!(
                    active_seeds = existing.requested.len(),
                    ignored_seeds = requested.len(),
                    "slim already built for this catalog; ignoring new seed set"
                );
            }
            return existing.clone();
        }

        let slim = self
            .slim
            .get_or_init(|| Arc::new(compute_slim(requested, prefixes, catalog, closure)));
        slim.clone()
    }
}

fn compute_slim(
    requested: TermSet,
    prefixes: &[String],
    catalog: &TermCatalog,
    closure: &ClosureEngine,
) -> Slim {
    let resolved = resolve_seeds(&requested, catalog);

    let mut members = TermSet::new();
    for term in catalog.iter() {
        if resolved.contains(&term.id) && pheno_vocab::in_namespace(&term.id, prefixes) {
            members.insert(term.id.clone());
            members.extend(
                closure
                    .ancestors_with(&term.id, ObsoletePolicy::Skip)
                    .iter()
                    .cloned(),
            );
        }
    }

    tracing::info!(
        requested = requested.len(),
        seeds = resolved.len(),
        members = members.len(),
        "built ontology slim"
    );

    Slim {
        requested,
        resolved,
        prefixes: prefixes.to_vec(),
        members,
    }
}
