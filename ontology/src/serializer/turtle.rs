//! Turtle 1.1 serializer for prediction results.
//!
//! For the i-th problem (1-based) two resources are written:
//! `lpres:result_<i>pos` listing the predicted members and
//! `lpres:result_<i>neg` listing the predicted non-members.

use std::fmt::Write as _;

use super::ProblemPrediction;
use crate::iris::{LPPROP, LPRES, XSD};

/// Serializes `predictions` to a Turtle document.
#[must_use]
pub fn to_turtle(predictions: &[ProblemPrediction]) -> String {
    let mut out = String::with_capacity(4 * 1024);

    out.push_str(&format!("@prefix lpres:  <{LPRES}> .\n"));
    out.push_str(&format!("@prefix lpprop: <{LPPROP}> .\n"));
    out.push_str(&format!("@prefix xsd:    <{XSD}> .\n"));
    out.push('\n');

    for (i, prediction) in predictions.iter().enumerate() {
        let n = i + 1;
        write_result(&mut out, &format!("result_{n}pos"), prediction, true);
        write_result(&mut out, &format!("result_{n}neg"), prediction, false);
    }
    out
}

fn write_result(out: &mut String, name: &str, prediction: &ProblemPrediction, label: bool) {
    let _ = writeln!(out, "lpres:{name}");
    let _ = writeln!(out, "  lpprop:belongsToLP {label} ;");
    let _ = write!(out, "  lpprop:pertainsTo <{}>", prediction.problem);

    let resources: Vec<String> = prediction
        .with_label(label)
        .map(|iri| format!("<{iri}>"))
        .collect();
    if resources.is_empty() {
        out.push_str(" .\n\n");
    } else {
        out.push_str(" ;\n  lpprop:resource ");
        out.push_str(&resources.join(",\n    "));
        out.push_str(" .\n\n");
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use crate::iris::{LP_BELONGS_TO, LP_PERTAINS_TO, LP_RESOURCE};
    use crate::loader::{parse_str, RdfFormat};
    use crate::model::{Literal, Node};

    fn sample() -> Vec<ProblemPrediction> {
        vec![
            ProblemPrediction {
                problem: "https://lpbenchgen.org/resource/lp_1".into(),
                entries: vec![
                    ("http://dl-learner.org/carcinogenesis#d2".into(), true),
                    ("http://dl-learner.org/carcinogenesis#d3".into(), false),
                    ("http://dl-learner.org/carcinogenesis#d4".into(), true),
                ],
            },
            ProblemPrediction {
                problem: "https://lpbenchgen.org/resource/lp_2".into(),
                entries: vec![("http://dl-learner.org/carcinogenesis#d1".into(), false)],
            },
        ]
    }

    #[test]
    fn output_parses_back() {
        let ttl = to_turtle(&sample());
        let store = parse_str(&ttl, RdfFormat::Turtle).unwrap();

        let pos = format!("{LPRES}result_1pos");
        let members: Vec<_> = store
            .objects(&pos, LP_RESOURCE)
            .filter_map(Node::as_iri)
            .collect();
        assert_eq!(members.len(), 2);
        let flag = store
            .objects(&pos, LP_BELONGS_TO)
            .find_map(Node::as_literal)
            .and_then(Literal::as_bool);
        assert_eq!(flag, Some(true));

        let neg2 = format!("{LPRES}result_2neg");
        assert_eq!(
            store.objects(&neg2, LP_PERTAINS_TO).find_map(Node::as_iri),
            Some("https://lpbenchgen.org/resource/lp_2")
        );
    }

    #[test]
    fn empty_result_has_no_resource_list() {
        let ttl = to_turtle(&sample());
        let store = parse_str(&ttl, RdfFormat::Turtle).unwrap();
        let pos2 = format!("{LPRES}result_2pos");
        assert_eq!(store.objects(&pos2, LP_RESOURCE).count(), 0);
        assert_eq!(store.objects(&pos2, LP_PERTAINS_TO).count(), 1);
    }
}
