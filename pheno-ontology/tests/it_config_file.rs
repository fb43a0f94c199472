//! Config files driving a full load.

mod support;

use pheno_ontology::{Error, OntologyConfig};
use std::io::Write;
use support::anatomy;

fn write_config(suffix: &str, content: &str) -> tempfile::NamedTempFile {
    let mut file = tempfile::Builder::new()
        .suffix(suffix)
        .tempfile()
        .expect("tempfile");
    file.write_all(content.as_bytes()).expect("write config");
    file
}

#[test]
fn toml_config_builds_eager_slim() {
    let file = write_config(
        ".toml",
        r#"
namespace_prefixes = ["MA:"]
top_level_ids = ["MA:0002433", "MA:0002449"]
slim_seed_ids = ["MA:0000073"]
"#,
    );
    let config = OntologyConfig::from_path(file.path()).unwrap();
    assert!(config.include_part_of);

    let onto = anatomy(config);
    let slim = onto.slim().expect("slim built at load");
    assert!(slim.contains("MA:0000072"));
    assert_eq!(onto.top_levels("MA:0000072").len(), 2);
}

#[test]
fn json_config_turns_off_part_of() {
    let file = write_config(
        ".json",
        r#"{ "namespace_prefixes": ["MA:"], "include_part_of": false }"#,
    );
    let onto = anatomy(OntologyConfig::from_path(file.path()).unwrap());
    assert!(onto.slim().is_none());
    assert_eq!(onto.ancestors("MA:0000072").len(), 1);
}

#[test]
fn bad_config_names_the_path() {
    let file = write_config(".toml", "namespace_prefixes = 42");
    let err = OntologyConfig::from_path(file.path()).unwrap_err();
    match err {
        Error::Config { path, .. } => assert_eq!(path, file.path()),
        other => panic!("unexpected error: {other}"),
    }
}

#[test]
fn namespace_without_terms_fails_load() {
    let config = OntologyConfig::for_prefixes(["EMAPA:"]);
    let err = pheno_ontology::Ontology::load_raw(
        &support::anatomy_records(),
        &support::anatomy_edges(),
        config,
    )
    .unwrap_err();
    assert!(err.is_load_failure());
}
