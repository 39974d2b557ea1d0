//! RDF document loading.
//!
//! Parsing is delegated to sophia: RDF/XML through `sophia_xml`, Turtle and
//! N-Triples through `sophia_turtle`. Every parsed statement is copied into an
//! owned [`TripleStore`].

use std::fs::File;
use std::io::{BufRead, BufReader};
use std::path::Path;

use sophia_api::source::TripleSource;
use sophia_api::term::{Term, TermKind};
use sophia_api::triple::Triple as SophiaTriple;
use tracing::{debug, info};

use crate::error::LoadError;
use crate::model::{Literal, Node, Triple, TripleStore};

/// Concrete syntax of an RDF document.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RdfFormat {
    /// RDF/XML, the syntax `carcinogenesis.owl` ships in.
    RdfXml,
    /// Turtle 1.1.
    Turtle,
    /// N-Triples.
    NTriples,
}

impl RdfFormat {
    /// Infers the syntax from a file extension.
    #[must_use]
    pub fn from_path(path: &Path) -> Option<Self> {
        let ext = path.extension()?.to_str()?.to_ascii_lowercase();
        match ext.as_str() {
            "owl" | "rdf" | "xml" => Some(RdfFormat::RdfXml),
            "ttl" => Some(RdfFormat::Turtle),
            "nt" => Some(RdfFormat::NTriples),
            _ => None,
        }
    }

    /// Human-readable syntax name.
    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            RdfFormat::RdfXml => "RDF/XML",
            RdfFormat::Turtle => "Turtle",
            RdfFormat::NTriples => "N-Triples",
        }
    }
}

/// Loads an RDF file, choosing the syntax from its extension.
///
/// # Errors
///
/// Returns [`LoadError::UnknownFormat`] for unsupported extensions,
/// [`LoadError::Io`] if the file cannot be opened and [`LoadError::Parse`]
/// if it is not valid in the inferred syntax.
pub fn load_path(path: &Path) -> Result<TripleStore, LoadError> {
    let format =
        RdfFormat::from_path(path).ok_or_else(|| LoadError::UnknownFormat(path.to_path_buf()))?;
    let file = File::open(path).map_err(|source| LoadError::Io {
        path: path.to_path_buf(),
        source,
    })?;
    info!(path = %path.display(), format = format.as_str(), "loading RDF document");
    let store = read(BufReader::new(file), format, &path.display().to_string())?;
    info!(triples = store.len(), "loaded RDF document");
    Ok(store)
}

/// Parses an in-memory RDF document.
///
/// # Errors
///
/// Returns [`LoadError::Parse`] if `text` is not valid in `format`.
pub fn parse_str(text: &str, format: RdfFormat) -> Result<TripleStore, LoadError> {
    read(text.as_bytes(), format, "<string>")
}

fn read<R: BufRead>(reader: R, format: RdfFormat, origin: &str) -> Result<TripleStore, LoadError> {
    let mut store = TripleStore::new();
    let mut skipped = 0usize;
    let mut sink = |converted: Option<Triple>| match converted {
        Some(t) => {
            store.insert(t);
        }
        None => skipped += 1,
    };

    let outcome = match format {
        RdfFormat::RdfXml => sophia_xml::parser::parse_bufread(reader)
            .for_each_triple(|t| sink(convert(&t)))
            .map_err(|e| e.to_string()),
        RdfFormat::Turtle => sophia_turtle::parser::turtle::parse_bufread(reader)
            .for_each_triple(|t| sink(convert(&t)))
            .map_err(|e| e.to_string()),
        RdfFormat::NTriples => sophia_turtle::parser::nt::parse_bufread(reader)
            .for_each_triple(|t| sink(convert(&t)))
            .map_err(|e| e.to_string()),
    };

    outcome.map_err(|message| LoadError::Parse {
        origin: origin.to_string(),
        format: format.as_str(),
        message,
    })?;

    if skipped > 0 {
        debug!(skipped, "ignored statements with quoted-triple or variable terms");
    }
    Ok(store)
}

fn convert<T: SophiaTriple>(triple: &T) -> Option<Triple> {
    let predicate = triple.p().iri()?.as_str().to_string();
    Some(Triple {
        subject: node(&triple.s())?,
        predicate,
        object: node(&triple.o())?,
    })
}

fn node<T: Term>(term: &T) -> Option<Node> {
    match term.kind() {
        TermKind::Iri => term.iri().map(|iri| Node::Iri(iri.as_str().to_string())),
        TermKind::BlankNode => term
            .bnode_id()
            .map(|id| Node::Blank(id.as_str().to_string())),
        TermKind::Literal => term.lexical_form().map(|lexical| {
            Node::Literal(Literal {
                lexical: lexical.to_string(),
                datatype: term.datatype().map(|dt| dt.as_str().to_string()),
            })
        }),
        _ => None,
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use crate::iris::{RDFS_SUBCLASS_OF, RDF_TYPE};

    const TTL: &str = r#"
@prefix rdfs: <http://www.w3.org/2000/01/rdf-schema#> .
@prefix owl:  <http://www.w3.org/2002/07/owl#> .
@prefix xsd:  <http://www.w3.org/2001/XMLSchema#> .
@prefix c:    <http://dl-learner.org/carcinogenesis#> .

c:Carbon a owl:Class ; rdfs:subClassOf c:Atom .
c:d1 a c:Compound ;
    c:amesTestPositive "true"^^xsd:boolean .
"#;

    const RDF_XML: &str = r#"<?xml version="1.0"?>
<rdf:RDF xmlns:rdf="http://www.w3.org/1999/02/22-rdf-syntax-ns#"
         xmlns:rdfs="http://www.w3.org/2000/01/rdf-schema#"
         xmlns:owl="http://www.w3.org/2002/07/owl#"
         xmlns:carcinogenesis="http://dl-learner.org/carcinogenesis#">
  <owl:Class rdf:about="http://dl-learner.org/carcinogenesis#Carbon">
    <rdfs:subClassOf rdf:resource="http://dl-learner.org/carcinogenesis#Atom"/>
  </owl:Class>
  <carcinogenesis:Compound rdf:about="http://dl-learner.org/carcinogenesis#d1">
    <carcinogenesis:amesTestPositive rdf:datatype="http://www.w3.org/2001/XMLSchema#boolean">true</carcinogenesis:amesTestPositive>
  </carcinogenesis:Compound>
</rdf:RDF>
"#;

    fn assert_same_content(store: &TripleStore) {
        let c = |l: &str| format!("http://dl-learner.org/carcinogenesis#{l}");
        assert_eq!(store.subjects(RDFS_SUBCLASS_OF, &c("Atom")).count(), 1);
        assert_eq!(store.subjects(RDF_TYPE, &c("Compound")).count(), 1);
        let value = store
            .objects(&c("d1"), &c("amesTestPositive"))
            .find_map(Node::as_literal)
            .and_then(Literal::as_bool);
        assert_eq!(value, Some(true));
    }

    #[test]
    fn parses_turtle() {
        let store = parse_str(TTL, RdfFormat::Turtle).unwrap();
        assert_eq!(store.len(), 4);
        assert_same_content(&store);
    }

    #[test]
    fn parses_rdf_xml() {
        let store = parse_str(RDF_XML, RdfFormat::RdfXml).unwrap();
        assert_same_content(&store);
    }

    #[test]
    fn rejects_malformed_turtle() {
        let err = parse_str("c:broken a", RdfFormat::Turtle).unwrap_err();
        assert!(matches!(err, LoadError::Parse { format: "Turtle", .. }));
    }

    #[test]
    fn infers_format_from_extension() {
        assert_eq!(
            RdfFormat::from_path(Path::new("data/carcinogenesis.owl")),
            Some(RdfFormat::RdfXml)
        );
        assert_eq!(
            RdfFormat::from_path(Path::new("lp.TTL")),
            Some(RdfFormat::Turtle)
        );
        assert_eq!(RdfFormat::from_path(Path::new("notes.txt")), None);
    }

    #[test]
    fn missing_file_is_io_error() {
        let err = load_path(Path::new("/nonexistent/carcinogenesis.owl")).unwrap_err();
        assert!(matches!(err, LoadError::Io { .. }));
    }
}
