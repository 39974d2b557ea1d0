//! IRI constants for the vocabularies the carcinogenesis graph is written in.

/// OWL namespace.
pub const OWL: &str = "http://www.w3.org/2002/07/owl#";
/// RDF namespace.
pub const RDF: &str = "http://www.w3.org/1999/02/22-rdf-syntax-ns#";
/// RDFS namespace.
pub const RDFS: &str = "http://www.w3.org/2000/01/rdf-schema#";
/// XSD namespace.
pub const XSD: &str = "http://www.w3.org/2001/XMLSchema#";

/// `rdf:type`.
pub const RDF_TYPE: &str = "http://www.w3.org/1999/02/22-rdf-syntax-ns#type";
/// `rdfs:subClassOf`.
pub const RDFS_SUBCLASS_OF: &str = "http://www.w3.org/2000/01/rdf-schema#subClassOf";
/// `owl:Class`.
pub const OWL_CLASS: &str = "http://www.w3.org/2002/07/owl#Class";
/// `owl:Ontology`.
pub const OWL_ONTOLOGY: &str = "http://www.w3.org/2002/07/owl#Ontology";
/// `owl:ObjectProperty`.
pub const OWL_OBJECT_PROPERTY: &str = "http://www.w3.org/2002/07/owl#ObjectProperty";
/// `owl:DatatypeProperty`.
pub const OWL_DATATYPE_PROPERTY: &str = "http://www.w3.org/2002/07/owl#DatatypeProperty";
/// `owl:AnnotationProperty`.
pub const OWL_ANNOTATION_PROPERTY: &str = "http://www.w3.org/2002/07/owl#AnnotationProperty";
/// `xsd:boolean`.
pub const XSD_BOOLEAN: &str = "http://www.w3.org/2001/XMLSchema#boolean";

/// Default namespace of the carcinogenesis ontology.
pub const CARCINOGENESIS: &str = "http://dl-learner.org/carcinogenesis#";

/// Learning-problem resource namespace.
pub const LPRES: &str = "https://lpbenchgen.org/resource/";
/// Learning-problem property namespace.
pub const LPPROP: &str = "https://lpbenchgen.org/property/";
/// Learning-problem class namespace.
pub const LPCLASS: &str = "https://lpbenchgen.org/class/";

/// `lpclass:LearningProblem`.
pub const LP_LEARNING_PROBLEM: &str = "https://lpbenchgen.org/class/LearningProblem";
/// `lpprop:includesResource`.
pub const LP_INCLUDES_RESOURCE: &str = "https://lpbenchgen.org/property/includesResource";
/// `lpprop:excludesResource`.
pub const LP_EXCLUDES_RESOURCE: &str = "https://lpbenchgen.org/property/excludesResource";

/// `lpprop:belongsToLP`.
pub const LP_BELONGS_TO: &str = "https://lpbenchgen.org/property/belongsToLP";
/// `lpprop:pertainsTo`.
pub const LP_PERTAINS_TO: &str = "https://lpbenchgen.org/property/pertainsTo";
/// `lpprop:resource`.
pub const LP_RESOURCE: &str = "https://lpbenchgen.org/property/resource";

/// Class IRIs whose instances are schema declarations, not individuals.
pub const DECLARATION_TYPES: [&str; 5] = [
    OWL_CLASS,
    OWL_ONTOLOGY,
    OWL_OBJECT_PROPERTY,
    OWL_DATATYPE_PROPERTY,
    OWL_ANNOTATION_PROPERTY,
];

/// Returns the local name of an IRI: the text after the last `#`, or after
/// the last `/` when the IRI has no fragment.
#[must_use]
pub fn local_name(iri: &str) -> &str {
    match iri.rfind('#') {
        Some(pos) => &iri[pos + 1..],
        None => iri.rsplit('/').next().unwrap_or(iri),
    }
}

/// Returns true if `iri` belongs to the RDF, RDFS, OWL or XSD vocabularies.
#[must_use]
pub fn is_builtin(iri: &str) -> bool {
    [OWL, RDF, RDFS, XSD].iter().any(|ns| iri.starts_with(ns))
}

/// The ontology-specific names the index and the feature extractors query.
#[derive(Debug, Clone, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
#[serde(default)]
pub struct Vocabulary {
    /// Namespace that class labels and property labels are resolved against.
    pub namespace: String,
    /// Compound → atom object property.
    pub has_atom: String,
    /// Compound → bond object property.
    pub has_bond: String,
    /// Compound → structure object property.
    pub has_structure: String,
    /// Bond → atom object property.
    pub in_bond: String,
}

impl Default for Vocabulary {
    fn default() -> Self {
        Self::with_namespace(CARCINOGENESIS)
    }
}

impl Vocabulary {
    /// Builds the carcinogenesis vocabulary rooted at `namespace`.
    #[must_use]
    pub fn with_namespace(namespace: &str) -> Self {
        Self {
            namespace: namespace.to_string(),
            has_atom: "hasAtom".to_string(),
            has_bond: "hasBond".to_string(),
            has_structure: "hasStructure".to_string(),
            in_bond: "inBond".to_string(),
        }
    }

    /// Resolves a class or property label to its full IRI.
    #[must_use]
    pub fn iri(&self, label: &str) -> String {
        format!("{}{}", self.namespace, label)
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn local_name_prefers_fragment() {
        assert_eq!(local_name("http://dl-learner.org/carcinogenesis#Atom"), "Atom");
        assert_eq!(local_name("https://lpbenchgen.org/resource/lp_3"), "lp_3");
        assert_eq!(local_name("plain"), "plain");
    }

    #[test]
    fn builtin_vocabularies_are_detected() {
        assert!(is_builtin("http://www.w3.org/2002/07/owl#NamedIndividual"));
        assert!(!is_builtin("http://dl-learner.org/carcinogenesis#Ring"));
    }

    #[test]
    fn vocabulary_resolves_labels() {
        let vocab = Vocabulary::default();
        assert_eq!(vocab.iri("Compound"), "http://dl-learner.org/carcinogenesis#Compound");
    }
}
