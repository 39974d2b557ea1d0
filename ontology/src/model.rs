//! Owned triple model.
//!
//! Parsed RDF documents are copied into a [`TripleStore`] so that every query
//! the index issues is a hash lookup over owned strings. The store keeps a
//! subject index and a predicate index; the index layer builds everything
//! else on top of those two.

use std::collections::HashMap;

/// A literal value: lexical form plus optional datatype IRI.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Literal {
    /// Lexical form as written in the source document.
    pub lexical: String,
    /// Full IRI of the datatype, if one was given.
    pub datatype: Option<String>,
}

impl Literal {
    /// Interprets the literal as an `xsd:boolean`.
    ///
    /// Returns `None` for lexical forms outside `true`/`false`/`1`/`0`.
    #[must_use]
    pub fn as_bool(&self) -> Option<bool> {
        match self.lexical.trim() {
            "true" | "1" => Some(true),
            "false" | "0" => Some(false),
            _ => None,
        }
    }
}

/// An RDF term in subject or object position.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum Node {
    /// A named resource.
    Iri(String),
    /// A blank node, identified by its document-local label.
    Blank(String),
    /// A literal.
    Literal(Literal),
}

impl Node {
    /// Returns the IRI if this node is a named resource.
    #[must_use]
    pub fn as_iri(&self) -> Option<&str> {
        match self {
            Node::Iri(iri) => Some(iri),
            _ => None,
        }
    }

    /// Returns the literal if this node is one.
    #[must_use]
    pub fn as_literal(&self) -> Option<&Literal> {
        match self {
            Node::Literal(lit) => Some(lit),
            _ => None,
        }
    }

    /// Key used by the subject index: the IRI, or `_:label` for blank nodes.
    fn subject_key(&self) -> Option<String> {
        match self {
            Node::Iri(iri) => Some(iri.clone()),
            Node::Blank(label) => Some(format!("_:{label}")),
            Node::Literal(_) => None,
        }
    }
}

/// One `subject predicate object` statement.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Triple {
    /// Subject term.
    pub subject: Node,
    /// Full IRI of the predicate.
    pub predicate: String,
    /// Object term.
    pub object: Node,
}

impl Triple {
    /// Builds a triple whose subject and object are both IRIs.
    pub fn iris(
        subject: impl Into<String>,
        predicate: impl Into<String>,
        object: impl Into<String>,
    ) -> Self {
        Self {
            subject: Node::Iri(subject.into()),
            predicate: predicate.into(),
            object: Node::Iri(object.into()),
        }
    }

    /// Builds a triple with an IRI subject and a literal object.
    pub fn literal(
        subject: impl Into<String>,
        predicate: impl Into<String>,
        lexical: impl Into<String>,
        datatype: Option<&str>,
    ) -> Self {
        Self {
            subject: Node::Iri(subject.into()),
            predicate: predicate.into(),
            object: Node::Literal(Literal {
                lexical: lexical.into(),
                datatype: datatype.map(str::to_string),
            }),
        }
    }
}

/// In-memory triple store with subject and predicate indexes.
///
/// Duplicate statements are stored once.
#[derive(Debug, Default, Clone)]
pub struct TripleStore {
    triples: Vec<Triple>,
    by_subject: HashMap<String, Vec<usize>>,
    by_predicate: HashMap<String, Vec<usize>>,
    seen: std::collections::HashSet<Triple>,
}

impl TripleStore {
    /// Creates an empty store.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds a triple. Returns false if the statement was already present.
    pub fn insert(&mut self, triple: Triple) -> bool {
        if self.seen.contains(&triple) {
            return false;
        }
        let position = self.triples.len();
        if let Some(key) = triple.subject.subject_key() {
            self.by_subject.entry(key).or_default().push(position);
        }
        self.by_predicate
            .entry(triple.predicate.clone())
            .or_default()
            .push(position);
        self.seen.insert(triple.clone());
        self.triples.push(triple);
        true
    }

    /// Number of distinct statements.
    #[must_use]
    pub fn len(&self) -> usize {
        self.triples.len()
    }

    /// Returns true if the store holds no statements.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.triples.is_empty()
    }

    /// Iterates every statement in insertion order.
    pub fn iter(&self) -> impl Iterator<Item = &Triple> {
        self.triples.iter()
    }

    /// Objects of `subject predicate ?o`, in insertion order.
    pub fn objects<'a>(
        &'a self,
        subject: &str,
        predicate: &'a str,
    ) -> impl Iterator<Item = &'a Node> + 'a {
        self.by_subject
            .get(subject)
            .into_iter()
            .flatten()
            .map(move |&i| &self.triples[i])
            .filter(move |t| t.predicate == predicate)
            .map(|t| &t.object)
    }

    /// IRI subjects of `?s predicate <object>`, in insertion order.
    pub fn subjects<'a>(
        &'a self,
        predicate: &str,
        object: &'a str,
    ) -> impl Iterator<Item = &'a str> + 'a {
        self.with_predicate(predicate)
            .filter(move |t| t.object.as_iri() == Some(object))
            .filter_map(|t| t.subject.as_iri())
    }

    /// Every statement using `predicate`, in insertion order.
    pub fn with_predicate<'a>(&'a self, predicate: &str) -> impl Iterator<Item = &'a Triple> + 'a {
        self.by_predicate
            .get(predicate)
            .into_iter()
            .flatten()
            .map(move |&i| &self.triples[i])
    }

    /// Returns true if `subject` appears in subject position.
    #[must_use]
    pub fn has_subject(&self, subject: &str) -> bool {
        self.by_subject.contains_key(subject)
    }
}

impl Extend<Triple> for TripleStore {
    fn extend<I: IntoIterator<Item = Triple>>(&mut self, iter: I) {
        for triple in iter {
            self.insert(triple);
        }
    }
}

impl FromIterator<Triple> for TripleStore {
    fn from_iter<I: IntoIterator<Item = Triple>>(iter: I) -> Self {
        let mut store = TripleStore::new();
        store.extend(iter);
        store
    }
}
