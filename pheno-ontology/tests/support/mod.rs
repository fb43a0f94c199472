//! Shared fixtures for pheno-ontology integration tests.

// Not every test crate uses every helper.
#![allow(dead_code)]

use pheno_ontology::{Ontology, OntologyConfig, RawEdge, RelationEdge, TermRecord};
use pheno_vocab::{obo, obo_in_owl, owl, prefixes, rdfs};

/// Full OBO PURL for a short id, the way the loader hands ids over
pub fn purl(short: &str) -> String {
    format!("{}{}", obo::PURL_BASE, short.replace(':', "_"))
}

/// Labelled record with a PURL id
pub fn labelled(short: &str, label: &str) -> TermRecord {
    TermRecord::new(purl(short)).annotate(rdfs::LABEL, label)
}

// =============================================================================
// Diamond
// =============================================================================

pub fn diamond_records() -> Vec<TermRecord> {
    ["root", "a", "b", "leaf"]
        .iter()
        .map(|id| TermRecord::new(*id).annotate(rdfs::LABEL, *id))
        .collect()
}

pub fn diamond_edges() -> Vec<RelationEdge> {
    vec![
        RelationEdge::is_a("a", "root"),
        RelationEdge::is_a("b", "root"),
        RelationEdge::is_a("leaf", "a"),
        RelationEdge::is_a("leaf", "b"),
    ]
}

pub fn diamond() -> Ontology {
    Ontology::load(&diamond_records(), &diamond_edges(), OntologyConfig::default())
        .expect("diamond loads")
}

// =============================================================================
// Adult mouse anatomy excerpt
// =============================================================================
//
//   MA:0002405 adult mouse
//   ├── MA:0002433 body region            (top level)
//   │     └── MA:0000004 thoracic cavity  ... part_of
//   └── MA:0002449 organ system           (top level)
//         └── MA:0000010 cardiovascular system
//               ├── MA:0000072 heart        (part_of, is_a UBERON:0000948)
//               │     └── MA:0000074 heart valve (part_of)
//               └── MA:0000060 blood vessel
//   MA:0000072 heart is also part_of MA:0000004 thoracic cavity
//   MA:0000073 obsolete "cardiac organ", replaced by MA:0000072
//   MA:0000099 obsolete without replacement
//   MP:0000001 out of namespace, dropped at load

pub fn anatomy_records() -> Vec<TermRecord> {
    vec![
        labelled("MA:0002405", "adult mouse"),
        labelled("MA:0002433", "body region"),
        labelled("MA:0002449", "organ system"),
        labelled("MA:0000004", "thoracic cavity"),
        labelled("MA:0000010", "cardiovascular system")
            .annotate(obo::DEFINITION, "The organ system that moves blood."),
        labelled("MA:0000072", "heart")
            .annotate(obo_in_owl::HAS_EXACT_SYNONYM, "cor")
            .annotate(obo_in_owl::HAS_ALTERNATIVE_ID, "MA:0000700")
            .equivalent_to(purl("UBERON:0000948")),
        labelled("MA:0000074", "heart valve"),
        labelled("MA:0000060", "blood vessel"),
        labelled("MA:0000073", "cardiac organ")
            .annotate(owl::DEPRECATED, "true")
            .annotate(obo::TERM_REPLACED_BY, "MA_0000072")
            .annotate(obo_in_owl::CONSIDER, "MA:0000010"),
        labelled("MA:0000099", "retired term").annotate(obo_in_owl::IS_OBSOLETE, "true"),
        labelled("MP:0000001", "mammalian phenotype"),
    ]
}

pub fn anatomy_edges() -> Vec<RawEdge> {
    let part_of = obo::PART_OF;
    let is_a = rdfs::SUB_CLASS_OF;
    vec![
        RawEdge::new(purl("MA:0002433"), part_of, purl("MA:0002405")),
        RawEdge::new(purl("MA:0002449"), part_of, purl("MA:0002405")),
        RawEdge::new(purl("MA:0000004"), part_of, purl("MA:0002433")),
        RawEdge::new(purl("MA:0000010"), is_a, purl("MA:0002449")),
        RawEdge::new(purl("MA:0000072"), part_of, purl("MA:0000010")),
        RawEdge::new(purl("MA:0000072"), part_of, purl("MA:0000004")),
        RawEdge::new(purl("MA:0000072"), is_a, purl("UBERON:0000948")),
        RawEdge::new(purl("MA:0000074"), part_of, purl("MA:0000072")),
        RawEdge::new(purl("MA:0000060"), part_of, purl("MA:0000010")),
        RawEdge::new(purl("MA:0000073"), is_a, purl("MA:0000010")),
        RawEdge::new(purl("MA:0000099"), is_a, purl("MA:0000010")),
        // unmapped relation, ignored
        RawEdge::new(purl("MA:0000074"), obo::DEVELOPS_FROM, purl("MA:0000060")),
        // unknown in-namespace target, dropped
        RawEdge::new(purl("MA:0000060"), is_a, purl("MA:9999999")),
    ]
}

pub fn anatomy_config() -> OntologyConfig {
    OntologyConfig::for_prefixes([prefixes::MA]).with_top_levels(["MA:0002433", "MA:0002449"])
}

pub fn anatomy(config: OntologyConfig) -> Ontology {
    Ontology::load_raw(&anatomy_records(), &anatomy_edges(), config).expect("anatomy loads")
}
