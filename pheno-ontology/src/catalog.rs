//! Term catalog
//!
//! Immutable-after-build registry of ontology terms keyed by normalized id.
//! Built once from loader records; annotation roles are interpreted here
//! through the [`RoleResolver`] so no per-term string matching happens later.

use crate::config::{AnnotationRole, OntologyConfig, RoleResolver};
use crate::error::{Error, Result};
use crate::record::{Annotation, TermRecord};
use hashbrown::HashMap;
use pheno_vocab::normalize_id;
use serde::Serialize;
use smallvec::SmallVec;
use std::collections::BTreeSet;
use std::sync::Arc;

/// One ontology concept
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Term {
    pub id: String,
    /// First label annotation; empty if none
    pub label: String,
    pub definition: Option<String>,
    pub synonyms: BTreeSet<String>,
    pub alternate_ids: BTreeSet<String>,
    pub obsolete: bool,
    /// Every "replaced by" literal, document order
    pub replaced_by: Vec<String>,
    pub consider_ids: BTreeSet<String>,
    /// Named classes declared equivalent (any namespace)
    pub equivalent_ids: BTreeSet<String>,
}

impl Term {
    /// The single replacement id, if any.
    ///
    /// When the source carried several, the first literal is used; the
    /// ambiguity is logged at load time.
    pub fn replacement_id(&self) -> Option<&str> {
        if !self.obsolete {
            return None;
        }
        self.replaced_by.first().map(String::as_str)
    }

    fn from_annotations(
        id: String,
        annotations: &[Annotation],
        equivalent_ids: &[String],
        resolver: &RoleResolver,
    ) -> Self {
        let mut label: Option<&str> = None;
        let mut definition: Option<(usize, &str)> = None;
        let mut synonyms = BTreeSet::new();
        let mut alternate_ids = BTreeSet::new();
        let mut obsolete = false;
        let mut replaced_by: Vec<String> = Vec::new();
        let mut consider_ids = BTreeSet::new();

        for annotation in annotations {
            for &(role, priority) in resolver.roles_of(&annotation.property) {
                let value = annotation.value.as_str();
                match role {
                    AnnotationRole::Label => {
                        if label.is_none() {
                            label = Some(value);
                        }
                    }
                    AnnotationRole::Definition => {
                        // lower priority index wins; ties keep document order
                        if definition.map_or(true, |(p, _)| priority < p) {
                            definition = Some((priority, value));
                        }
                    }
                    AnnotationRole::Synonym => {
                        synonyms.insert(value.to_string());
                    }
                    AnnotationRole::Obsolete => obsolete = true,
                    AnnotationRole::ReplacedBy => {
                        let replacement = normalize_id(value);
                        if !replaced_by.contains(&replacement) {
                            replaced_by.push(replacement);
                        }
                    }
                    AnnotationRole::Consider => {
                        consider_ids.insert(normalize_id(value));
                    }
                    AnnotationRole::AltId => {
                        alternate_ids.insert(normalize_id(value));
                    }
                }
            }
        }

        if obsolete && replaced_by.len() > 1 {
            tracing::warn!(
                term = %id,
                candidates = ?replaced_by,
                chosen = %replaced_by[0],
                "obsolete term has more than one replacement; using the first"
            );
        }

        let equivalent_ids = equivalent_ids
            .iter()
            .map(|e| normalize_id(e))
            .filter(|e| e != &id)
            .collect();

        Term {
            label: label.unwrap_or_default().to_string(),
            definition: definition.map(|(_, d)| d.to_string()),
            synonyms,
            alternate_ids,
            obsolete,
            replaced_by,
            consider_ids,
            equivalent_ids,
            id,
        }
    }
}

static EMPTY_IDS: &[String] = &[];

/// Arc-backed term catalog for cheap cloning.
#[derive(Debug, Clone)]
pub struct TermCatalog {
    inner: Arc<CatalogInner>,
}

#[derive(Debug)]
struct CatalogInner {
    terms: HashMap<String, Term>,
    /// Term ids in sorted order, for deterministic iteration
    ids: Vec<String>,
    /// Alternate id → primary ids claiming it
    alt_index: HashMap<String, SmallVec<[String; 1]>>,
    namespace_prefixes: Vec<String>,
}

impl TermCatalog {
    /// Build the catalog from loader records.
    ///
    /// Records outside the configured namespace prefixes are skipped. Several
    /// records for one id are merged (annotations concatenated in order).
    ///
    /// # Errors
    ///
    /// - [`Error::EmptySource`] when `records` is empty
    /// - [`Error::EmptyNamespace`] when no record survives the prefix filter
    pub fn build(records: &[TermRecord], config: &OntologyConfig) -> Result<Self> {
        if records.is_empty() {
            return Err(Error::EmptySource);
        }

        let resolver = config.annotation_roles.resolver();

        // Merge records per normalized id, first-seen order
        let mut merged: HashMap<String, (Vec<Annotation>, Vec<String>)> = HashMap::new();
        let mut skipped = 0usize;
        let mut duplicates = 0usize;
        for record in records {
            let id = normalize_id(&record.id);
            if !config.in_namespace(&id) {
                skipped += 1;
                continue;
            }
            let entry = match merged.entry(id) {
                hashbrown::hash_map::Entry::Occupied(o) => {
                    duplicates += 1;
                    o.into_mut()
                }
                hashbrown::hash_map::Entry::Vacant(v) => v.insert((Vec::new(), Vec::new())),
            };
            entry.0.extend(record.annotations.iter().cloned());
            entry.1.extend(record.equivalent_ids.iter().cloned());
        }

        if merged.is_empty() {
            return Err(Error::EmptyNamespace {
                prefixes: config.namespace_prefixes.clone(),
            });
        }
        if duplicates > 0 {
            tracing::debug!(duplicates, "merged repeated term records");
        }

        let mut terms: HashMap<String, Term> = HashMap::with_capacity(merged.len());
        for (id, (annotations, equivalents)) in merged {
            let term = Term::from_annotations(id.clone(), &annotations, &equivalents, &resolver);
            terms.insert(id, term);
        }

        let mut ids: Vec<String> = terms.keys().cloned().collect();
        ids.sort();

        let mut alt_index: HashMap<String, SmallVec<[String; 1]>> = HashMap::new();
        for id in &ids {
            for alt in &terms[id].alternate_ids {
                alt_index.entry(alt.clone()).or_default().push(id.clone());
            }
        }

        let obsolete = terms.values().filter(|t| t.obsolete).count();
        tracing::info!(
            terms = terms.len(),
            obsolete,
            skipped,
            prefixes = ?config.namespace_prefixes,
            "built term catalog"
        );

        Ok(Self {
            inner: Arc::new(CatalogInner {
                terms,
                ids,
                alt_index,
                namespace_prefixes: config.namespace_prefixes.clone(),
            }),
        })
    }

    /// Term by primary id (already normalized)
    pub fn get(&self, id: &str) -> Option<&Term> {
        self.inner.terms.get(id)
    }

    /// True if `id` is a primary id in the catalog
    pub fn contains(&self, id: &str) -> bool {
        self.inner.terms.contains_key(id)
    }

    /// Resolve a primary or alternate id, normalizing first.
    ///
    /// Permissive: an alternate id claimed by several terms resolves to the
    /// first claimant. Use [`resolve_unique`](Self::resolve_unique) where
    /// that must be an error.
    pub fn resolve(&self, id: &str) -> Option<&Term> {
        let id = normalize_id(id);
        if let Some(term) = self.inner.terms.get(&id) {
            return Some(term);
        }
        let claimants = self.inner.alt_index.get(&id)?;
        if claimants.len() > 1 {
            tracing::debug!(id = %id, claimants = ?claimants, "alternate id is ambiguous");
        }
        claimants.first().and_then(|p| self.inner.terms.get(p))
    }

    /// Resolve an id that must identify at most one term.
    ///
    /// # Errors
    ///
    /// [`Error::AmbiguousId`] when an alternate id is claimed by more than
    /// one term.
    pub fn resolve_unique(&self, id: &str) -> Result<Option<&Term>> {
        let id = normalize_id(id);
        if let Some(term) = self.inner.terms.get(&id) {
            return Ok(Some(term));
        }
        match self.inner.alt_index.get(&id) {
            None => Ok(None),
            Some(claimants) if claimants.len() > 1 => Err(Error::AmbiguousId {
                id,
                candidates: claimants.to_vec(),
            }),
            Some(claimants) => Ok(claimants.first().and_then(|p| self.inner.terms.get(p))),
        }
    }

    /// Primary ids claiming `id` as an alternate id
    pub fn alt_claimants(&self, id: &str) -> &[String] {
        self.inner
            .alt_index
            .get(id)
            .map(|sv| sv.as_slice())
            .unwrap_or(EMPTY_IDS)
    }

    /// Label for `id`, empty for unknown or foreign ids
    pub fn label_of(&self, id: &str) -> &str {
        self.inner
            .terms
            .get(id)
            .map(|t| t.label.as_str())
            .unwrap_or("")
    }

    /// Equivalent ids that fall outside the working namespace
    pub fn foreign_equivalents<'a>(&'a self, term: &'a Term) -> impl Iterator<Item = &'a str> {
        term.equivalent_ids
            .iter()
            .map(String::as_str)
            .filter(move |e| !self.in_namespace(e))
    }

    /// True if `id` is inside the working namespace
    pub fn in_namespace(&self, id: &str) -> bool {
        pheno_vocab::in_namespace(id, &self.inner.namespace_prefixes)
    }

    /// Configured namespace prefixes
    pub fn namespace_prefixes(&self) -> &[String] {
        &self.inner.namespace_prefixes
    }

    /// All primary ids, sorted
    pub fn ids(&self) -> &[String] {
        &self.inner.ids
    }

    /// All terms in id order
    pub fn iter(&self) -> impl Iterator<Item = &Term> {
        self.inner.ids.iter().map(move |id| &self.inner.terms[id])
    }

    pub fn len(&self) -> usize {
        self.inner.terms.len()
    }

    pub fn is_empty(&self) -> bool {
        self.inner.terms.is_empty()
    }
}
