//! Row-order, idempotence and schema-stability laws.

use std::sync::{Arc, OnceLock};

use carcino_features::{
    BondTypeFeatures, CompoundFeatures, CountPolicy, FeatureExtractor, PropertySelection,
};
use carcino_ontology::loader::{parse_str, RdfFormat};
use carcino_ontology::GraphIndex;
use carcino_test_helpers::{iri, MINI_CARCINOGENESIS};
use proptest::prelude::*;

const POOL: [&str; 12] = [
    "d1", "d2", "d3", "d4", "d1_1", "a10", "bond1", "bond3", "bond4", "mystery", "ghost", "d1_amine",
];

fn index() -> Arc<GraphIndex> {
    static INDEX: OnceLock<Arc<GraphIndex>> = OnceLock::new();
    Arc::clone(INDEX.get_or_init(|| {
        let store = parse_str(MINI_CARCINOGENESIS, RdfFormat::Turtle).unwrap();
        Arc::new(GraphIndex::in_memory(store))
    }))
}

fn extractors() -> Vec<Box<dyn FeatureExtractor>> {
    vec![
        Box::new(
            CompoundFeatures::new(index(), CountPolicy::Counting, &PropertySelection::default())
                .unwrap(),
        ),
        Box::new(BondTypeFeatures::new(index()).unwrap()),
    ]
}

fn batch() -> impl Strategy<Value = Vec<String>> {
    proptest::sample::subsequence(POOL.to_vec(), 0..=POOL.len())
        .prop_shuffle()
        .prop_map(|locals| locals.into_iter().map(iri).collect())
}

proptest! {
    #[test]
    fn rows_follow_input_order(ids in batch()) {
        for extractor in extractors() {
            let batch = extractor.transform(&ids).unwrap();
            prop_assert_eq!(batch.n_rows(), ids.len());
            prop_assert_eq!(batch.columns(), extractor.columns());
            for (row, id) in ids.iter().enumerate() {
                let single = extractor.transform(std::slice::from_ref(id)).unwrap();
                prop_assert_eq!(batch.row(row), single.row(0));
                let flagged = batch.issues().iter().any(|i| i.row == row);
                prop_assert_eq!(flagged, !single.issues().is_empty());
            }
        }
    }

    #[test]
    fn transform_is_idempotent(ids in batch()) {
        for extractor in extractors() {
            prop_assert_eq!(extractor.transform(&ids).unwrap(), extractor.transform(&ids).unwrap());
        }
    }
}
