//! GraphIndex queries against the shared carcinogenesis fixture.

use std::collections::BTreeMap;

use carcino_ontology::loader::{parse_str, RdfFormat};
use carcino_ontology::{GraphIndex, IndexError, JsonDirCache, TripleStore, Vocabulary};
use carcino_test_helpers::{iri, MINI_CARCINOGENESIS};

fn fixture() -> TripleStore {
    parse_str(MINI_CARCINOGENESIS, RdfFormat::Turtle).unwrap()
}

#[test]
fn atom_hierarchy_is_two_level_and_ordered() {
    let index = GraphIndex::in_memory(fixture());
    assert_eq!(
        *index.classes_under("Atom").unwrap(),
        vec!["Carbon", "Halide", "Hydrogen", "Nitrogen"]
    );
    let map = index.subclass_to_parent("Atom").unwrap();
    assert_eq!(
        map.subclasses(),
        ["Carbon-10", "Carbon-22", "Halogen-Cl", "Hydrogen-3", "Nitro-N"]
    );
    assert_eq!(map.parent_of("Halogen-Cl"), Some("Halide"));
    assert_eq!(map.parent_of("Carbon"), None);
}

#[test]
fn individuals_exclude_schema_declarations() {
    let index = GraphIndex::in_memory(fixture());
    let individuals = index.individuals().unwrap();
    assert_eq!(individuals.len(), 20);
    assert!(individuals.contains(&iri("d1_1")));
    assert!(!individuals.contains(&iri("Atom")));
    assert!(!individuals.contains(&iri("hasAtom")));
    assert!(!individuals.contains(&iri("charge")));
    assert!(!individuals.contains("http://dl-learner.org/carcinogenesis"));
}

#[test]
fn named_individual_marker_does_not_hide_domain_type() {
    let index = GraphIndex::in_memory(fixture());
    assert_eq!(index.type_of(&iri("d1_1")).unwrap(), "Nitro-N");
    assert_eq!(index.type_of(&iri("bond3")).unwrap(), "Bond-7");
    assert_eq!(index.type_of(&iri("mystery")).unwrap(), "Other");
    assert!(matches!(
        index.type_of(&iri("d99")),
        Err(IndexError::UnknownEntity(_))
    ));
}

#[test]
fn data_properties_and_values() {
    let index = GraphIndex::in_memory(fixture());
    assert_eq!(
        index.data_properties().unwrap(),
        ["amesTestPositive", "charge", "cytogen_ca", "salmonella"]
    );
    let ames = index.data_property_values("amesTestPositive").unwrap();
    assert_eq!(ames.get(&iri("d1")), Some(&true));
    assert_eq!(ames.get(&iri("d2")), Some(&false));
    assert_eq!(ames.get(&iri("d3")), None);
    assert!(index.data_property_values("charge").unwrap().is_empty());
}

#[test]
fn related_objects_are_sorted_and_distinct() {
    let index = GraphIndex::in_memory(fixture());
    assert_eq!(
        index.related(&iri("bond4"), "inBond"),
        vec![iri("a10"), iri("a2")]
    );
    assert!(index.related(&iri("d3"), "hasAtom").is_empty());
}

#[test]
fn json_dir_cache_serves_a_second_index() {
    let dir = tempfile::tempdir().unwrap();

    let first = GraphIndex::new(
        fixture(),
        Vocabulary::default(),
        Box::new(JsonDirCache::open(dir.path()).unwrap()),
    );
    let types: BTreeMap<String, String> = first.type_map().unwrap().clone();
    let atoms = first.subclass_to_parent("Atom").unwrap();
    let members = first.individuals_of_type("Carbon-22").unwrap();
    assert!(dir.path().join("type_map.json").exists());
    assert!(dir.path().join("subclass_parents.Atom.json").exists());

    // An empty graph can only answer from the cache.
    let second = GraphIndex::new(
        TripleStore::new(),
        Vocabulary::default(),
        Box::new(JsonDirCache::open(dir.path()).unwrap()),
    );
    assert_eq!(second.type_map().unwrap(), &types);
    assert_eq!(second.subclass_to_parent("Atom").unwrap(), atoms);
    assert_eq!(second.individuals_of_type("Carbon-22").unwrap(), members);
    assert_eq!(second.type_of(&iri("a10")).unwrap(), "Halogen-Cl");
}

#[test]
fn reload_clears_persistent_cache() {
    let dir = tempfile::tempdir().unwrap();
    let mut index = GraphIndex::new(
        fixture(),
        Vocabulary::default(),
        Box::new(JsonDirCache::open(dir.path()).unwrap()),
    );
    index.type_map().unwrap();
    index.reload(TripleStore::new()).unwrap();
    assert!(!dir.path().join("type_map.json").exists());
    assert!(index.type_map().unwrap().is_empty());
}
