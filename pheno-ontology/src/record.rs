//! Loader-facing input types.
//!
//! The document parser lives outside this crate. It hands over one
//! [`TermRecord`] per class (raw literal annotations, not yet interpreted)
//! and the relation edges it found, either already classified
//! ([`RelationEdge`]) or still property-typed ([`RawEdge`]).

use crate::config::OntologyConfig;
use pheno_vocab::normalize_id;
use serde::{Deserialize, Serialize};

/// One literal annotation on a class
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Annotation {
    /// Annotation property id (full IRI or whatever the loader uses)
    pub property: String,
    /// Literal value
    pub value: String,
}

impl Annotation {
    pub fn new(property: impl Into<String>, value: impl Into<String>) -> Self {
        Self {
            property: property.into(),
            value: value.into(),
        }
    }
}

/// A parsed class as handed over by the loader
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct TermRecord {
    /// Term id; normalized on load
    pub id: String,
    /// Raw annotations in document order
    #[serde(default)]
    pub annotations: Vec<Annotation>,
    /// Named classes declared equivalent to this one
    #[serde(default)]
    pub equivalent_ids: Vec<String>,
}

impl TermRecord {
    pub fn new(id: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            ..Self::default()
        }
    }

    /// Builder-style annotation append
    pub fn annotate(mut self, property: impl Into<String>, value: impl Into<String>) -> Self {
        self.annotations.push(Annotation::new(property, value));
        self
    }

    /// Builder-style equivalent-class append
    pub fn equivalent_to(mut self, id: impl Into<String>) -> Self {
        self.equivalent_ids.push(id.into());
        self
    }
}

/// Relation kinds the closure understands
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RelationKind {
    IsA,
    PartOf,
}

/// A classified directed edge: `source` is narrower than / located within `target`
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct RelationEdge {
    pub source: String,
    pub kind: RelationKind,
    pub target: String,
}

impl RelationEdge {
    pub fn new(source: impl Into<String>, kind: RelationKind, target: impl Into<String>) -> Self {
        Self {
            source: source.into(),
            kind,
            target: target.into(),
        }
    }

    pub fn is_a(source: impl Into<String>, target: impl Into<String>) -> Self {
        Self::new(source, RelationKind::IsA, target)
    }

    pub fn part_of(source: impl Into<String>, target: impl Into<String>) -> Self {
        Self::new(source, RelationKind::PartOf, target)
    }

    /// Copy with both endpoints normalized
    pub(crate) fn normalized(&self) -> Self {
        Self {
            source: normalize_id(&self.source),
            kind: self.kind,
            target: normalize_id(&self.target),
        }
    }
}

/// An edge still typed by its relation property
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RawEdge {
    pub source: String,
    pub property: String,
    pub target: String,
}

impl RawEdge {
    pub fn new(
        source: impl Into<String>,
        property: impl Into<String>,
        target: impl Into<String>,
    ) -> Self {
        Self {
            source: source.into(),
            property: property.into(),
            target: target.into(),
        }
    }

    /// Classify against the configured property lists.
    ///
    /// Returns `None` for properties that are neither is-a nor part-of.
    pub fn classify(&self, config: &OntologyConfig) -> Option<RelationEdge> {
        let kind = if config.is_a_properties.iter().any(|p| p == &self.property) {
            RelationKind::IsA
        } else if config.part_of_properties.iter().any(|p| p == &self.property) {
            RelationKind::PartOf
        } else {
            return None;
        };
        Some(RelationEdge::new(&*self.source, kind, &*self.target))
    }
}

/// Classify a batch of raw edges, dropping unrecognized properties.
pub fn classify_edges<'a, I>(edges: I, config: &OntologyConfig) -> Vec<RelationEdge>
where
    I: IntoIterator<Item = &'a RawEdge>,
{
    let mut out = Vec::new();
    let mut ignored = 0usize;
    for edge in edges {
        match edge.classify(config) {
            Some(e) => out.push(e),
            None => ignored += 1,
        }
    }
    if ignored > 0 {
        tracing::debug!(ignored, kept = out.len(), "ignored edges with unmapped properties");
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use pheno_vocab::{obo, rdfs};

    #[test]
    fn test_classify() {
        let config = OntologyConfig::default();
        let is_a = RawEdge::new("MA:2", rdfs::SUB_CLASS_OF, "MA:1");
        let part_of = RawEdge::new("MA:3", obo::PART_OF, "MA:1");
        let short = RawEdge::new("MA:4", "part_of", "MA:1");
        let other = RawEdge::new("MA:5", obo::DEVELOPS_FROM, "MA:1");

        assert_eq!(is_a.classify(&config), Some(RelationEdge::is_a("MA:2", "MA:1")));
        assert_eq!(
            part_of.classify(&config),
            Some(RelationEdge::part_of("MA:3", "MA:1"))
        );
        assert_eq!(short.classify(&config).map(|e| e.kind), Some(RelationKind::PartOf));
        assert_eq!(other.classify(&config), None);

        let edges = vec![is_a, part_of, short, other];
        assert_eq!(classify_edges(&edges, &config).len(), 3);
    }

    #[test]
    fn test_extra_part_of_like_property() {
        let mut config = OntologyConfig::default();
        config.part_of_properties.push(obo::DEVELOPS_FROM.to_string());
        let edge = RawEdge::new("EMAPA:2", obo::DEVELOPS_FROM, "EMAPA:1");
        assert_eq!(edge.classify(&config).map(|e| e.kind), Some(RelationKind::PartOf));
    }

    #[test]
    fn test_normalized_edge() {
        let edge = RelationEdge::is_a("http://purl.obolibrary.org/obo/MA_0000002", "MA_0000001");
        assert_eq!(edge.normalized(), RelationEdge::is_a("MA:0000002", "MA:0000001"));
    }
}
