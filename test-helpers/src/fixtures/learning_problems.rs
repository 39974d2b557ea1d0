//! Learning problems over [`MINI_CARCINOGENESIS`](super::MINI_CARCINOGENESIS).

/// Two learning problems with mixed entity types.
pub const LEARNING_PROBLEMS: &str = r#"
@prefix lpres:   <https://lpbenchgen.org/resource/> .
@prefix lpprop:  <https://lpbenchgen.org/property/> .
@prefix lpclass: <https://lpbenchgen.org/class/> .
@prefix c:       <http://dl-learner.org/carcinogenesis#> .

lpres:lp_1 a lpclass:LearningProblem ;
    lpprop:includesResource c:d1, c:d1_1, c:bond1 ;
    lpprop:excludesResource c:d2, c:d2_1, c:bond3, c:d3 .

lpres:lp_2 a lpclass:LearningProblem ;
    lpprop:includesResource c:d2, c:d4 ;
    lpprop:excludesResource c:d1, c:d3 .
"#;
