//! End-to-end routing over the mini carcinogenesis fixture.

use std::sync::Arc;

use carcino_classify::{
    cross_validate, ClassifierRouter, ClassifyError, DecisionTreeClassifier, Estimator,
    EvaluationReport, PartitionKey, Prediction, ProblemScore, RouteSpec, RouterConfig, SlotState,
    TrainableClassifier, TreeParams, TypeMajorityEstimator, TypePartitioner,
};
use carcino_features::{CompoundFeatures, FeatureExtractor};
use carcino_ontology::loader::{parse_str, RdfFormat};
use carcino_ontology::{problems, GraphIndex, LearningProblem};
use carcino_test_helpers::{iris, LEARNING_PROBLEMS, MINI_CARCINOGENESIS};

fn index() -> Arc<GraphIndex> {
    let store = parse_str(MINI_CARCINOGENESIS, RdfFormat::Turtle).unwrap();
    Arc::new(GraphIndex::in_memory(store))
}

fn problem(n: &str) -> LearningProblem {
    let store = parse_str(LEARNING_PROBLEMS, RdfFormat::Turtle).unwrap();
    problems::from_store(&store)
        .into_iter()
        .find(|p| p.number() == n)
        .unwrap()
}

fn labels(predictions: &[Prediction<bool>]) -> Vec<Option<bool>> {
    predictions.iter().map(|p| p.predicted().copied()).collect()
}

#[test]
fn partitioner_routes_by_hierarchy() {
    let partitioner = TypePartitioner::new(index()).unwrap();
    let ids = iris(&["d1", "d1_1", "bond3", "d1_benzene", "d2_nitro", "mystery", "ghost"]);
    let keys: Vec<_> = ids.iter().map(|id| partitioner.key_of(id).unwrap()).collect();
    assert_eq!(
        keys,
        vec![
            Some(PartitionKey::Compound),
            Some(PartitionKey::Atom),
            Some(PartitionKey::Bond),
            Some(PartitionKey::Structure),
            Some(PartitionKey::Structure),
            None,
            None,
        ]
    );
}

#[test]
fn fitted_router_reproduces_training_labels() {
    let lp = problem("1");
    let mut router = ClassifierRouter::new(index(), &RouterConfig::default()).unwrap();
    router.fit(&lp.examples, &lp.labels).unwrap();

    assert_eq!(router.slot_state(PartitionKey::Compound), Some(SlotState::Fitted));
    assert_eq!(router.slot_state(PartitionKey::Atom), Some(SlotState::Fitted));
    assert_eq!(router.slot_state(PartitionKey::Bond), Some(SlotState::Fitted));
    assert_eq!(
        router.slot_state(PartitionKey::Structure),
        Some(SlotState::ConstantNegative)
    );

    let predicted = router.predict(&lp.examples).unwrap();
    let expected: Vec<_> = lp.labels.iter().map(|&l| Some(l)).collect();
    assert_eq!(labels(&predicted), expected);
}

#[test]
fn unrecognized_and_unknown_entities_get_no_prediction() {
    let lp = problem("1");
    let mut router = ClassifierRouter::new(index(), &RouterConfig::default()).unwrap();
    router.fit(&lp.examples, &lp.labels).unwrap();

    let predicted = router
        .predict(&iris(&["mystery", "d1_amine", "ghost"]))
        .unwrap();
    assert_eq!(labels(&predicted), vec![None, Some(false), None]);
}

#[test]
fn unfitted_router_refuses_non_empty_partitions() {
    let router = ClassifierRouter::new(index(), &RouterConfig::default()).unwrap();
    assert_eq!(
        router.slot_state(PartitionKey::Atom),
        Some(SlotState::Uninitialized)
    );
    assert!(matches!(
        router.predict(&iris(&["d1"])),
        Err(ClassifyError::NotFitted(PartitionKey::Compound))
    ));
    assert!(router.predict(&[]).unwrap().is_empty());
    assert_eq!(
        router.predict(&iris(&["mystery"])).unwrap(),
        vec![Prediction::NoPrediction]
    );
}

#[test]
fn degenerate_labels_install_constants() {
    let mut router = ClassifierRouter::new(index(), &RouterConfig::default()).unwrap();
    router
        .fit(&iris(&["d1", "d1_1"]), &[true, true])
        .unwrap();

    assert_eq!(
        router.slot_state(PartitionKey::Compound),
        Some(SlotState::ConstantPositive)
    );
    assert_eq!(
        router.slot_state(PartitionKey::Atom),
        Some(SlotState::ConstantPositive)
    );
    assert_eq!(
        router.slot_state(PartitionKey::Bond),
        Some(SlotState::ConstantNegative)
    );

    let predicted = router.predict(&iris(&["d2", "d2_1", "bond3"])).unwrap();
    assert_eq!(labels(&predicted), vec![Some(true), Some(true), Some(false)]);

    // refitting overwrites every slot
    router.fit(&iris(&["d1"]), &[false]).unwrap();
    assert_eq!(
        router.slot_state(PartitionKey::Atom),
        Some(SlotState::ConstantNegative)
    );
}

#[test]
fn zero_column_route_falls_back_to_majority() {
    let extractor: Box<dyn FeatureExtractor> = Box::new(CompoundFeatures::from_parts(vec![]));
    let tree: Box<dyn TrainableClassifier> =
        Box::new(DecisionTreeClassifier::new(TreeParams::default()));
    let routes: Vec<RouteSpec> = vec![(PartitionKey::Compound, extractor, tree)];
    let mut router = ClassifierRouter::with_routes(index(), routes).unwrap();
    router
        .fit(&iris(&["d1", "d2", "d3", "d1_1"]), &[true, true, false, false])
        .unwrap();

    assert_eq!(
        router.slot_state(PartitionKey::Compound),
        Some(SlotState::ConstantPositive)
    );
    assert_eq!(router.slot_state(PartitionKey::Atom), None);
    let predicted = router.predict(&iris(&["d4", "a2"])).unwrap();
    assert_eq!(labels(&predicted), vec![Some(true), None]);
}

#[test]
fn mismatched_training_batch_is_rejected() {
    let mut router = ClassifierRouter::new(index(), &RouterConfig::default()).unwrap();
    assert!(matches!(
        router.fit(&iris(&["d1", "d2"]), &[true]),
        Err(ClassifyError::Partition(_))
    ));
}

#[test]
fn cross_validation_report_serializes() {
    let index = index();
    let mut report = EvaluationReport::new();
    for n in ["1", "2"] {
        let lp = problem(n);
        let router_scores = cross_validate(
            || ClassifierRouter::new(Arc::clone(&index), &RouterConfig::default()),
            &lp.examples,
            &lp.labels,
            2,
        )
        .unwrap();
        assert_eq!(router_scores.folds, 2);
        for score in [router_scores.precision, router_scores.recall, router_scores.f1] {
            assert!((0.0..=1.0).contains(&score));
        }

        let naive = TypeMajorityEstimator::new(Arc::clone(&index));
        let naive_scores = cross_validate(
            || Ok(TypeMajorityEstimator::new(Arc::clone(&index))),
            &lp.examples,
            &lp.labels,
            2,
        )
        .unwrap();
        report.push(ProblemScore {
            problem: lp.iri.clone(),
            estimator: naive.name().to_string(),
            examples: lp.examples.len(),
            scores: naive_scores,
        });
    }

    assert_eq!(report.len(), 2);
    let json = serde_json::to_string(&report).unwrap();
    let back: EvaluationReport = serde_json::from_str(&json).unwrap();
    assert_eq!(back, report);
}
