//! Top-level stratification
//!
//! Classifies each term against a configured, ordered set of top-level ids:
//! - `top_levels(t)` = ancestors(t) ∩ top-level ids, in configured order
//! - `intermediates(t)` = ancestors(t) minus top-level ids, restricted to
//!   the working namespace
//!
//! The namespace restriction means an intermediate is not simply "an
//! ancestor below a top level": an in-namespace ancestor that sits above
//! every top level is still reported, and a foreign ancestor never is.

use crate::closure::{ClosureEngine, ObsoletePolicy, TermSet};
use hashbrown::HashSet;
use pheno_vocab::normalize_id;

/// Top-level term set plus the namespace used for intermediates
#[derive(Debug, Clone, Default)]
pub struct Stratifier {
    /// Configured order, normalized, deduplicated
    top_levels: Vec<String>,
    lookup: HashSet<String>,
    namespace_prefixes: Vec<String>,
}

impl Stratifier {
    pub fn new<I, S>(top_level_ids: I, namespace_prefixes: &[String]) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let mut top_levels = Vec::new();
        let mut lookup = HashSet::new();
        for id in top_level_ids {
            let id = normalize_id(id.as_ref());
            if lookup.insert(id.clone()) {
                top_levels.push(id);
            }
        }
        Self {
            top_levels,
            lookup,
            namespace_prefixes: namespace_prefixes.to_vec(),
        }
    }

    /// Configured top-level ids, in order
    pub fn top_level_ids(&self) -> &[String] {
        &self.top_levels
    }

    pub fn is_top_level(&self, id: &str) -> bool {
        self.lookup.contains(id)
    }

    /// Top levels `id` falls under, in configured order.
    ///
    /// A term with no ancestors (a root, or a top level itself) gets none.
    pub fn top_levels(
        &self,
        id: &str,
        closure: &ClosureEngine,
        policy: ObsoletePolicy,
    ) -> Vec<String> {
        let ancestors = closure.ancestors_with(id, policy);
        self.top_levels
            .iter()
            .filter(|top| ancestors.contains(top.as_str()))
            .cloned()
            .collect()
    }

    /// Non-top-level ancestors of `id` inside the working namespace
    pub fn intermediates(
        &self,
        id: &str,
        closure: &ClosureEngine,
        policy: ObsoletePolicy,
    ) -> TermSet {
        closure
            .ancestors_with(id, policy)
            .iter()
            .filter(|a| !self.lookup.contains(a.as_str()))
            .filter(|a| pheno_vocab::in_namespace(a, &self.namespace_prefixes))
            .cloned()
            .collect()
    }

    /// Intermediates of `id` grouped under each of its top levels.
    ///
    /// An intermediate belongs to a group when the top level is one of its
    /// own ancestors; intermediates above every top level appear in no group.
    pub fn grouped_intermediates(
        &self,
        id: &str,
        closure: &ClosureEngine,
        policy: ObsoletePolicy,
    ) -> Vec<(String, TermSet)> {
        let intermediates = self.intermediates(id, closure, policy);
        self.top_levels(id, closure, policy)
            .into_iter()
            .map(|top| {
                let members = intermediates
                    .iter()
                    .filter(|i| closure.is_ancestor(&top, i, policy))
                    .cloned()
                    .collect();
                (top, members)
            })
            .collect()
    }
}
