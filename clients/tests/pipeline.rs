//! Index warm-up, prediction and evaluation over fixture files.

use std::fs;
use std::path::Path;

use carcino_clients::config::{DataSettings, EvaluationSettings};
use carcino_clients::{pipeline, writer, EstimatorKind, Settings};
use carcino_ontology::loader::{self, RdfFormat};
use carcino_ontology::serializer::turtle;
use carcino_ontology::{problems, GraphIndex};
use carcino_test_helpers::{iri, LEARNING_PROBLEMS, MINI_CARCINOGENESIS};

fn data(dir: &Path, cache: bool) -> DataSettings {
    let ontology = dir.join("mini.ttl");
    let problems = dir.join("problems.ttl");
    fs::write(&ontology, MINI_CARCINOGENESIS).unwrap();
    fs::write(&problems, LEARNING_PROBLEMS).unwrap();
    DataSettings {
        ontology,
        problems,
        cache_dir: cache.then(|| dir.join("cache")),
        ..DataSettings::default()
    }
}

#[test]
fn warm_fills_the_cache_directory() {
    let dir = tempfile::tempdir().unwrap();
    let data = data(dir.path(), true);
    let index = pipeline::open_index(&data).unwrap();
    let summary = pipeline::warm(&index).unwrap();

    assert_eq!(summary.individuals, 20);
    assert_eq!(summary.hierarchy["Atom"], (4, 5));
    assert_eq!(summary.hierarchy["Bond"], (3, 0));
    assert_eq!(summary.hierarchy["Structure"], (3, 2));
    assert!(summary.data_properties.contains(&"charge".to_string()));

    let cache = dir.path().join("cache");
    for artifact in ["individuals", "type_map", "data_properties"] {
        assert!(cache.join(format!("{artifact}.json")).is_file(), "{artifact}");
    }
}

#[test]
fn predictions_cover_every_remaining_individual() {
    let dir = tempfile::tempdir().unwrap();
    let data = data(dir.path(), false);
    let index = pipeline::open_index(&data).unwrap();
    let problems = pipeline::load_problems(&data.problems).unwrap();
    assert_eq!(problems.len(), 2);

    let predictions =
        pipeline::predict_remaining(&index, &problems, &Settings::default().router()).unwrap();
    assert_eq!(predictions.len(), 2);

    let lp1 = &predictions[0];
    assert_eq!(lp1.problem, problems[0].iri);
    let predicted: Vec<&str> = lp1.entries.iter().map(|(id, _)| id.as_str()).collect();
    for example in &problems[0].examples {
        assert!(!predicted.contains(&example.as_str()));
    }
    // 20 individuals, 7 examples, `mystery` has no partition
    assert_eq!(predicted.len(), 12);
    assert!(!predicted.contains(&iri("mystery").as_str()));

    let out = dir.path().join("out/predictions.ttl");
    writer::write_text(&out, &turtle::to_turtle(&predictions)).unwrap();
    let reread = loader::load_path(&out).unwrap();
    assert!(!reread.is_empty());
}

#[test]
fn evaluation_skips_problems_smaller_than_the_fold_count() {
    let dir = tempfile::tempdir().unwrap();
    let data = data(dir.path(), false);
    let index = pipeline::open_index(&data).unwrap();
    let problems = pipeline::load_problems(&data.problems).unwrap();

    for estimator in [EstimatorKind::Router, EstimatorKind::Naive] {
        let settings = EvaluationSettings {
            folds: 5,
            estimator,
        };
        let report =
            pipeline::evaluate(&index, &problems, &settings, &Settings::default().router())
                .unwrap();
        // lp_1 has 7 examples, lp_2 only 4
        assert_eq!(report.len(), 1);
        assert_eq!(report.results[0].problem, problems[0].iri);
        assert_eq!(report.results[0].examples, 7);

        let path = dir.path().join("evaluation.json");
        writer::write_json(&path, &report).unwrap();
        let json: serde_json::Value =
            serde_json::from_str(&fs::read_to_string(&path).unwrap()).unwrap();
        assert_eq!(json["results"][0]["estimator"], estimator_name(estimator));
    }
}

fn estimator_name(kind: EstimatorKind) -> &'static str {
    match kind {
        EstimatorKind::Router => "router",
        EstimatorKind::Naive => "naive",
    }
}

#[test]
fn problems_parse_from_fixture_string() {
    let store = loader::parse_str(LEARNING_PROBLEMS, RdfFormat::Turtle).unwrap();
    let parsed = problems::from_store(&store);
    let index = GraphIndex::in_memory(loader::parse_str(MINI_CARCINOGENESIS, RdfFormat::Turtle).unwrap());
    for problem in &parsed {
        for example in &problem.examples {
            assert!(index.type_of(example).is_ok(), "{example}");
        }
    }
}
