//! Derived term view
//!
//! A [`TermView`] is the read model handed to index and UI consumers: the
//! catalog metadata of one term plus its neighbors, closure, stratification
//! and equivalents, each neighbor resolved to `(id, label)`.
//!
//! While a slim is active every neighbor list passes [`Slim::is_visible`],
//! so which neighbors a consumer sees changes without touching the
//! relation index, and closures skip obsolete terms.

use crate::catalog::{Term, TermCatalog};
use crate::closure::{ClosureEngine, ObsoletePolicy, TermSet};
use crate::error::{Error, Result};
use crate::slim::Slim;
use crate::stratify::Stratifier;
use rayon::prelude::*;
use serde::Serialize;
use std::collections::BTreeSet;

/// A neighbor reference; `label` is empty for ids outside the catalog
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Serialize)]
pub struct TermRef {
    pub id: String,
    pub label: String,
}

impl TermRef {
    fn new(id: &str, catalog: &TermCatalog) -> Self {
        Self {
            id: id.to_string(),
            label: catalog.label_of(id).to_string(),
        }
    }
}

/// Intermediates under one top level
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct TopLevelGroup {
    pub top_level: TermRef,
    pub intermediates: Vec<TermRef>,
}

/// Serializable per-term read model
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct TermView {
    pub id: String,
    pub label: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub definition: Option<String>,
    pub synonyms: BTreeSet<String>,
    pub alternate_ids: BTreeSet<String>,
    pub obsolete: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub replacement: Option<TermRef>,
    pub consider: Vec<TermRef>,
    pub parents: Vec<TermRef>,
    pub children: Vec<TermRef>,
    pub ancestors: Vec<TermRef>,
    pub intermediates: Vec<TermRef>,
    /// Configured top-level order
    pub top_levels: Vec<TermRef>,
    pub top_level_groups: Vec<TopLevelGroup>,
    pub equivalents: Vec<TermRef>,
}

/// Builds [`TermView`]s against one frozen ontology state
pub(crate) struct ViewBuilder<'a> {
    pub catalog: &'a TermCatalog,
    pub closure: &'a ClosureEngine,
    pub stratifier: &'a Stratifier,
    pub slim: Option<&'a Slim>,
}

impl<'a> ViewBuilder<'a> {
    fn policy(&self) -> ObsoletePolicy {
        match self.slim {
            Some(_) => ObsoletePolicy::Skip,
            None => ObsoletePolicy::Include,
        }
    }

    fn visible(&self, id: &str) -> bool {
        self.slim.map_or(true, |s| s.is_visible(id, self.catalog))
    }

    /// Sorted, deduplicated, slim-filtered refs
    fn refs<'i, I>(&self, ids: I) -> Vec<TermRef>
    where
        I: IntoIterator<Item = &'i str>,
    {
        let unique: BTreeSet<&str> = ids.into_iter().filter(|id| self.visible(id)).collect();
        unique
            .into_iter()
            .map(|id| TermRef::new(id, self.catalog))
            .collect()
    }

    fn set_refs(&self, ids: &TermSet) -> Vec<TermRef> {
        self.refs(ids.iter().map(String::as_str))
    }

    /// An alternate id must not also name another term
    fn check_alternate_ids(&self, term: &Term) -> Result<()> {
        for alt in &term.alternate_ids {
            let mut candidates: Vec<String> = Vec::new();
            if self.catalog.contains(alt) {
                candidates.push(alt.clone());
            }
            candidates.extend(self.catalog.alt_claimants(alt).iter().cloned());
            if candidates.len() > 1 {
                return Err(Error::AmbiguousId {
                    id: alt.clone(),
                    candidates,
                });
            }
        }
        Ok(())
    }

    /// Build the view of one catalog term.
    ///
    /// # Errors
    ///
    /// [`Error::AmbiguousId`] when one of the term's alternate ids, or its
    /// replacement id, identifies more than one catalog term.
    pub fn build(&self, term: &Term) -> Result<TermView> {
        self.check_alternate_ids(term)?;

        let replacement = match term.replacement_id() {
            Some(id) => {
                let target = self
                    .catalog
                    .resolve_unique(id)?
                    .map_or(id, |t| t.id.as_str());
                Some(TermRef::new(target, self.catalog))
            }
            None => None,
        };

        let policy = self.policy();
        let ancestors = self.closure.ancestors_with(&term.id, policy);
        let intermediates = self.stratifier.intermediates(&term.id, self.closure, policy);
        let top_levels: Vec<TermRef> = self
            .stratifier
            .top_levels(&term.id, self.closure, policy)
            .iter()
            .filter(|id| self.visible(id))
            .map(|id| TermRef::new(id, self.catalog))
            .collect();
        let top_level_groups = self
            .stratifier
            .grouped_intermediates(&term.id, self.closure, policy)
            .into_iter()
            .filter(|(top, _)| self.visible(top))
            .map(|(top, members)| TopLevelGroup {
                top_level: TermRef::new(&top, self.catalog),
                intermediates: self.set_refs(&members),
            })
            .collect();

        Ok(TermView {
            id: term.id.clone(),
            label: term.label.clone(),
            definition: term.definition.clone(),
            synonyms: term.synonyms.clone(),
            alternate_ids: term.alternate_ids.clone(),
            obsolete: term.obsolete,
            replacement,
            consider: term
                .consider_ids
                .iter()
                .map(|id| TermRef::new(id, self.catalog))
                .collect(),
            parents: self.refs(self.closure.direct_parents(&term.id)),
            children: self.refs(self.closure.direct_children(&term.id)),
            ancestors: self.set_refs(&ancestors),
            intermediates: self.set_refs(&intermediates),
            top_levels,
            top_level_groups,
            equivalents: self
                .catalog
                .foreign_equivalents(term)
                .map(|id| TermRef::new(id, self.catalog))
                .collect(),
        })
    }

    /// Views for every catalog term, in id order.
    ///
    /// A term whose view fails is logged and skipped; the rest still build.
    pub fn build_all(&self) -> Vec<TermView> {
        let views: Vec<Option<TermView>> = self
            .catalog
            .ids()
            .par_iter()
            .map(|id| {
                let term = self.catalog.get(id)?;
                match self.build(term) {
                    Ok(view) => Some(view),
                    Err(err) => {
                        tracing::warn!(term = %id, error = %err, "skipping term view");
                        None
                    }
                }
            })
            .collect();
        let built: Vec<TermView> = views.into_iter().flatten().collect();
        tracing::info!(
            views = built.len(),
            skipped = self.catalog.len() - built.len(),
            slim = self.slim.is_some(),
            "built term views"
        );
        built
    }
}
