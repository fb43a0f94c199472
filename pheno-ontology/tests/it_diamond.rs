//! Diamond-shaped hierarchy scenarios: closure, slim, tree multiplicity.

mod support;

use pheno_ontology::{Ontology, OntologyConfig, RelationEdge, TermRecord, TermSet};
use pretty_assertions::assert_eq;
use support::{diamond, diamond_edges, diamond_records};

fn set(ids: &[&str]) -> TermSet {
    ids.iter().map(|s| s.to_string()).collect()
}

#[test]
fn diamond_ancestors() {
    let onto = diamond();
    assert_eq!(*onto.ancestors("leaf"), set(&["a", "b", "root"]));
    assert_eq!(*onto.descendants("root", -1), set(&["a", "b", "leaf"]));
    assert_eq!(*onto.descendants("root", 1), set(&["a", "b"]));
}

#[test]
fn diamond_slim_from_leaf() {
    let onto = diamond();
    let slim = onto.build_slim(["leaf"]);
    assert_eq!(*slim.members(), set(&["a", "b", "leaf", "root"]));
}

#[test]
fn diamond_tree_has_two_paths_for_leaf() {
    let onto = diamond();
    let tree = onto.build_paths("root", true);
    let paths = tree.paths_of("leaf");
    assert_eq!(paths.len(), 2);
    assert_ne!(paths[0], paths[1]);
    for path in paths {
        let leaf = *path.last().unwrap();
        assert_eq!(tree.occurrence(leaf).unwrap().term_id, "leaf");
    }
}

#[test]
fn closure_recursive_definition_holds_everywhere() {
    let onto = diamond();
    for term in onto.catalog().iter() {
        let ancestors = onto.ancestors(&term.id);
        assert!(!ancestors.contains(&term.id));

        let mut expected = TermSet::new();
        for parent in onto.closure().direct_parents(&term.id) {
            expected.insert(parent.to_string());
            expected.extend(onto.ancestors(parent).iter().cloned());
        }
        assert_eq!(*ancestors, expected, "closure of {}", term.id);
    }
}

#[test]
fn two_cycle_terminates_without_self_ancestry() {
    let records = vec![TermRecord::new("A"), TermRecord::new("B")];
    let edges = vec![RelationEdge::is_a("A", "B"), RelationEdge::is_a("B", "A")];
    let onto = Ontology::load(&records, &edges, OntologyConfig::default()).unwrap();

    assert_eq!(*onto.ancestors("A"), set(&["B"]));
    assert_eq!(*onto.descendants("A", -1), set(&["B"]));

    let tree = onto.build_paths("A", true);
    assert_eq!(tree.len(), 1);
    assert!(tree.paths_of("A").is_empty());
}

#[test]
fn top_level_partition() {
    let config = OntologyConfig::default().with_top_levels(["a", "root"]);
    let onto = Ontology::load(&diamond_records(), &diamond_edges(), config).unwrap();

    assert_eq!(onto.top_levels("leaf"), vec!["a", "root"]);
    assert_eq!(onto.intermediates("leaf"), set(&["b"]));
    assert!(onto.top_levels("root").is_empty());

    let configured: TermSet = onto.stratifier().top_level_ids().iter().cloned().collect();
    for term in onto.catalog().iter() {
        let ancestors = onto.ancestors(&term.id);
        let tops = onto.top_levels(&term.id);
        let mids = onto.intermediates(&term.id);
        for top in &tops {
            assert!(ancestors.contains(top));
            assert!(configured.contains(top));
            assert!(!mids.contains(top));
        }
    }
}

#[test]
fn warm_cache_matches_lazy_results() {
    let warm = diamond();
    warm.warm();
    let lazy = diamond();
    for term in lazy.catalog().iter() {
        assert_eq!(warm.ancestors(&term.id), lazy.ancestors(&term.id));
    }
    assert_eq!(warm.stats().ancestors.entries, 4);
}
