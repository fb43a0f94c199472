//! Ontology Vocabulary Constants for the Phenotype Portal
//!
//! This crate provides a centralized location for the annotation property
//! IRIs, relation property IRIs, and namespace prefixes used when loading
//! OBO-style ontologies (MA, MP, EMAPA, ...) into the term graph engine.
//!
//! # Organization
//!
//! Constants are organized by vocabulary:
//! - `rdfs` - RDFS vocabulary (http://www.w3.org/2000/01/rdf-schema#)
//! - `owl` - OWL vocabulary (http://www.w3.org/2002/07/owl#)
//! - `obo` - OBO Foundry PURLs (IAO, BFO, RO)
//! - `obo_in_owl` - oboInOwl annotation properties
//! - `prefixes` - Short-form namespace prefixes for loaded ontologies
//! - `defaults` - Default property lists per annotation role

/// RDFS vocabulary constants
pub mod rdfs {
    /// rdfs:label IRI
    pub const LABEL: &str = "http://www.w3.org/2000/01/rdf-schema#label";

    /// rdfs:subClassOf IRI
    pub const SUB_CLASS_OF: &str = "http://www.w3.org/2000/01/rdf-schema#subClassOf";

    /// rdfs:comment IRI
    pub const COMMENT: &str = "http://www.w3.org/2000/01/rdf-schema#comment";
}

/// OWL vocabulary constants
pub mod owl {
    /// owl:deprecated IRI
    pub const DEPRECATED: &str = "http://www.w3.org/2002/07/owl#deprecated";
}

/// OBO Foundry PURLs
pub mod obo {
    /// Base PURL shared by every OBO ontology term
    pub const PURL_BASE: &str = "http://purl.obolibrary.org/obo/";

    /// IAO:0000115 "definition"
    pub const DEFINITION: &str = "http://purl.obolibrary.org/obo/IAO_0000115";

    /// IAO:0100001 "term replaced by"
    pub const TERM_REPLACED_BY: &str = "http://purl.obolibrary.org/obo/IAO_0100001";

    /// IAO:0000231 "has obsolescence reason"
    pub const OBSOLESCENCE_REASON: &str = "http://purl.obolibrary.org/obo/IAO_0000231";

    /// BFO:0000050 "part of"
    pub const PART_OF: &str = "http://purl.obolibrary.org/obo/BFO_0000050";

    /// Legacy OBO relation shorthand for part_of
    pub const PART_OF_SHORT: &str = "part_of";

    /// RO:0002202 "develops from"
    pub const DEVELOPS_FROM: &str = "http://purl.obolibrary.org/obo/RO_0002202";
}

/// oboInOwl annotation properties
pub mod obo_in_owl {
    /// oboInOwl:hasExactSynonym IRI
    pub const HAS_EXACT_SYNONYM: &str = "http://www.geneontology.org/formats/oboInOwl#hasExactSynonym";

    /// oboInOwl:hasRelatedSynonym IRI
    pub const HAS_RELATED_SYNONYM: &str =
        "http://www.geneontology.org/formats/oboInOwl#hasRelatedSynonym";

    /// oboInOwl:hasBroadSynonym IRI
    pub const HAS_BROAD_SYNONYM: &str = "http://www.geneontology.org/formats/oboInOwl#hasBroadSynonym";

    /// oboInOwl:hasNarrowSynonym IRI
    pub const HAS_NARROW_SYNONYM: &str =
        "http://www.geneontology.org/formats/oboInOwl#hasNarrowSynonym";

    /// oboInOwl:hasDefinition IRI (older OBO-to-OWL conversions)
    pub const HAS_DEFINITION: &str = "http://www.geneontology.org/formats/oboInOwl#hasDefinition";

    /// oboInOwl:consider IRI
    pub const CONSIDER: &str = "http://www.geneontology.org/formats/oboInOwl#consider";

    /// oboInOwl:replacedBy IRI
    pub const REPLACED_BY: &str = "http://www.geneontology.org/formats/oboInOwl#replacedBy";

    /// oboInOwl:hasAlternativeId IRI
    pub const HAS_ALTERNATIVE_ID: &str =
        "http://www.geneontology.org/formats/oboInOwl#hasAlternativeId";

    /// oboInOwl:is_obsolete IRI
    pub const IS_OBSOLETE: &str = "http://www.geneontology.org/formats/oboInOwl#is_obsolete";
}

/// Short-form namespace prefixes
///
/// Term ids are normalized to `PREFIX:LOCAL` before any prefix comparison,
/// so these include the trailing colon.
pub mod prefixes {
    /// Adult mouse anatomy
    pub const MA: &str = "MA:";
    /// Mammalian phenotype
    pub const MP: &str = "MP:";
    /// Mouse developmental anatomy (abstract)
    pub const EMAPA: &str = "EMAPA:";
    /// Mouse pathology
    pub const MPATH: &str = "MPATH:";
    /// Uberon multi-species anatomy
    pub const UBERON: &str = "UBERON:";
    /// Cell ontology
    pub const CL: &str = "CL:";
}

/// Default property lists per annotation role
///
/// Different ontologies use different annotation properties for the same
/// role, so these are defaults only; integrators override them through
/// configuration. Order matters where a role is prioritized (definition).
pub mod defaults {
    use super::{obo, obo_in_owl, owl, rdfs};

    /// Properties whose first value is the term label
    pub const LABEL: &[&str] = &[rdfs::LABEL];

    /// Definition properties, highest priority first
    pub const DEFINITION: &[&str] = &[obo::DEFINITION, obo_in_owl::HAS_DEFINITION];

    /// Properties whose values are unioned into the synonym set
    pub const SYNONYM: &[&str] = &[
        obo_in_owl::HAS_EXACT_SYNONYM,
        obo_in_owl::HAS_RELATED_SYNONYM,
        obo_in_owl::HAS_BROAD_SYNONYM,
        obo_in_owl::HAS_NARROW_SYNONYM,
    ];

    /// Presence of any of these marks a term obsolete
    pub const OBSOLETE: &[&str] = &[
        owl::DEPRECATED,
        obo_in_owl::IS_OBSOLETE,
        obo::OBSOLESCENCE_REASON,
    ];

    /// Replacement ("replaced by") properties
    pub const REPLACED_BY: &[&str] = &[obo::TERM_REPLACED_BY, obo_in_owl::REPLACED_BY];

    /// Candidate replacement properties
    pub const CONSIDER: &[&str] = &[obo_in_owl::CONSIDER];

    /// Alternate (secondary) id properties
    pub const ALT_ID: &[&str] = &[obo_in_owl::HAS_ALTERNATIVE_ID];

    /// Relation properties read as is-a edges
    pub const IS_A: &[&str] = &[rdfs::SUB_CLASS_OF];

    /// Relation properties read as part-of edges
    pub const PART_OF: &[&str] = &[obo::PART_OF, obo::PART_OF_SHORT];
}

// ============================================================================
// Identifier helpers
// ============================================================================

/// Normalize an OBO identifier to its `PREFIX:LOCAL` short form.
///
/// - `http://purl.obolibrary.org/obo/MA_0000001` → `MA:0000001`
/// - `MA_0000001` → `MA:0000001`
/// - `MA:0000001` → unchanged
///
/// Identifiers that do not look like OBO ids (no separator, or a foreign
/// IRI) are returned unchanged apart from trimming.
pub fn normalize_id(id: &str) -> String {
    let id = id.trim();
    let local = id.strip_prefix(obo::PURL_BASE).unwrap_or(id);
    if local.contains(':') {
        return local.to_string();
    }
    match local.split_once('_') {
        Some((prefix, rest))
            if !prefix.is_empty()
                && !rest.is_empty()
                && prefix.chars().all(|c| c.is_ascii_alphanumeric()) =>
        {
            format!("{prefix}:{rest}")
        }
        _ => local.to_string(),
    }
}

/// Check whether a normalized id falls under any of `prefixes`.
///
/// An empty prefix list matches everything.
#[inline]
pub fn in_namespace<S: AsRef<str>>(id: &str, prefixes: &[S]) -> bool {
    prefixes.is_empty() || prefixes.iter().any(|p| id.starts_with(p.as_ref()))
}
