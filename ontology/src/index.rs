//! Structural queries over the carcinogenesis graph.
//!
//! [`GraphIndex`] answers the handful of questions feature extraction and
//! type partitioning need: the class hierarchy under a base class, the most
//! specific type of every individual, direct members of a class, boolean
//! data-property values and object-property neighbours.
//!
//! Derived tables are built on first access and kept for the lifetime of
//! the index. Whole-graph tables live in [`OnceLock`] cells; tables keyed by
//! a class or property label live in a mutex-guarded memo. Every table is
//! also written through the injected [`ArtifactCache`], so a persistent
//! backend lets later processes skip the graph scans.

use std::collections::{BTreeMap, BTreeSet, HashMap, HashSet};
use std::fmt;
use std::sync::{Arc, Mutex, MutexGuard, OnceLock, PoisonError};

use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use tracing::{debug, info};

use crate::cache::{self, ArtifactCache, ArtifactKey, MemoryCache};
use crate::error::IndexError;
use crate::iris::{
    is_builtin, local_name, Vocabulary, DECLARATION_TYPES, OWL_DATATYPE_PROPERTY,
    RDFS_SUBCLASS_OF, RDF_TYPE,
};
use crate::model::{Node, TripleStore};

/// Two-level subclass → parent map under a base class.
///
/// `order` lists subclasses grouped by parent, parents in label order and
/// each parent's subclasses in label order. This is the column order the
/// feature extractors use.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SubclassMap {
    order: Vec<String>,
    parent: BTreeMap<String, String>,
}

impl SubclassMap {
    /// Subclass labels in enumeration order.
    #[must_use]
    pub fn subclasses(&self) -> &[String] {
        &self.order
    }

    /// Parent of `subclass`, if it is in the map.
    #[must_use]
    pub fn parent_of(&self, subclass: &str) -> Option<&str> {
        self.parent.get(subclass).map(String::as_str)
    }

    /// `(subclass, parent)` pairs in enumeration order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.order
            .iter()
            .filter_map(|sub| self.parent.get(sub).map(|p| (sub.as_str(), p.as_str())))
    }

    /// Number of subclasses.
    #[must_use]
    pub fn len(&self) -> usize {
        self.order.len()
    }

    /// Returns true if no class under the base has subclasses.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.order.is_empty()
    }
}

#[derive(Default)]
struct Tables {
    classes: HashMap<String, Arc<Vec<String>>>,
    subclasses: HashMap<String, Arc<SubclassMap>>,
    members: HashMap<String, Arc<BTreeSet<String>>>,
    property_values: HashMap<String, Arc<BTreeMap<String, bool>>>,
}

impl Tables {
    fn classes(&mut self) -> &mut HashMap<String, Arc<Vec<String>>> {
        &mut self.classes
    }

    fn subclasses(&mut self) -> &mut HashMap<String, Arc<SubclassMap>> {
        &mut self.subclasses
    }

    fn members(&mut self) -> &mut HashMap<String, Arc<BTreeSet<String>>> {
        &mut self.members
    }

    fn property_values(&mut self) -> &mut HashMap<String, Arc<BTreeMap<String, bool>>> {
        &mut self.property_values
    }
}

/// Cached structural index over one loaded graph.
pub struct GraphIndex {
    store: TripleStore,
    vocab: Vocabulary,
    cache: Box<dyn ArtifactCache>,
    individuals: OnceLock<BTreeSet<String>>,
    type_map: OnceLock<BTreeMap<String, String>>,
    data_properties: OnceLock<Vec<String>>,
    tables: Mutex<Tables>,
}

impl fmt::Debug for GraphIndex {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("GraphIndex")
            .field("triples", &self.store.len())
            .field("namespace", &self.vocab.namespace)
            .field("type_map_built", &self.type_map.get().is_some())
            .finish_non_exhaustive()
    }
}

impl GraphIndex {
    /// Wraps `store`, resolving labels against `vocab` and writing derived
    /// tables through `cache`.
    #[must_use]
    pub fn new(store: TripleStore, vocab: Vocabulary, cache: Box<dyn ArtifactCache>) -> Self {
        Self {
            store,
            vocab,
            cache,
            individuals: OnceLock::new(),
            type_map: OnceLock::new(),
            data_properties: OnceLock::new(),
            tables: Mutex::new(Tables::default()),
        }
    }

    /// Index with the default vocabulary and a process-local cache.
    #[must_use]
    pub fn in_memory(store: TripleStore) -> Self {
        Self::new(store, Vocabulary::default(), Box::new(MemoryCache::new()))
    }

    /// The underlying triples.
    #[must_use]
    pub fn store(&self) -> &TripleStore {
        &self.store
    }

    /// The vocabulary labels are resolved against.
    #[must_use]
    pub fn vocabulary(&self) -> &Vocabulary {
        &self.vocab
    }

    /// Replaces the graph. Every derived table is dropped and the artifact
    /// cache is cleared.
    ///
    /// # Errors
    ///
    /// Returns [`IndexError::Cache`] if the cache cannot be cleared.
    pub fn reload(&mut self, store: TripleStore) -> Result<(), IndexError> {
        self.store = store;
        self.individuals = OnceLock::new();
        self.type_map = OnceLock::new();
        self.data_properties = OnceLock::new();
        *self.lock() = Tables::default();
        self.cache.clear()?;
        info!(triples = self.store.len(), "graph index reloaded");
        Ok(())
    }

    /// Direct subclasses of `base`, ordered by label.
    ///
    /// # Errors
    ///
    /// Returns [`IndexError::Cache`] if the artifact cache fails.
    pub fn classes_under(&self, base: &str) -> Result<Arc<Vec<String>>, IndexError> {
        self.memoized(
            ArtifactKey::ClassesUnder(base.to_string()),
            Tables::classes,
            base,
            || self.direct_subclasses(base),
        )
    }

    /// Maps every subclass of every class returned by
    /// [`classes_under(base)`](Self::classes_under) to that class.
    ///
    /// When a subclass has several parents under `base`, the first parent in
    /// enumeration order wins.
    ///
    /// # Errors
    ///
    /// Returns [`IndexError::Cache`] if the artifact cache fails.
    pub fn subclass_to_parent(&self, base: &str) -> Result<Arc<SubclassMap>, IndexError> {
        self.memoized(
            ArtifactKey::SubclassParents(base.to_string()),
            Tables::subclasses,
            base,
            || {
                let mut map = SubclassMap::default();
                for class in self.direct_subclasses(base) {
                    for sub in self.direct_subclasses(&class) {
                        if !map.parent.contains_key(&sub) {
                            map.parent.insert(sub.clone(), class.clone());
                            map.order.push(sub);
                        }
                    }
                }
                map
            },
        )
    }

    /// Most specific class label of `entity`.
    ///
    /// # Errors
    ///
    /// Returns [`IndexError::UnknownEntity`] if `entity` was never observed
    /// as an individual, or [`IndexError::Cache`] if the type map could not
    /// be loaded.
    pub fn type_of(&self, entity: &str) -> Result<&str, IndexError> {
        self.type_map()?
            .get(entity)
            .map(String::as_str)
            .ok_or_else(|| IndexError::UnknownEntity(entity.to_string()))
    }

    /// Individuals with a direct `rdf:type` assertion of `class`.
    ///
    /// # Errors
    ///
    /// Returns [`IndexError::Cache`] if the artifact cache fails.
    pub fn individuals_of_type(&self, class: &str) -> Result<Arc<BTreeSet<String>>, IndexError> {
        self.memoized(
            ArtifactKey::Members(class.to_string()),
            Tables::members,
            class,
            || {
                self.store
                    .subjects(RDF_TYPE, &self.vocab.iri(class))
                    .map(str::to_string)
                    .collect()
            },
        )
    }

    /// Every individual: typed IRI subjects that are not schema declarations.
    ///
    /// # Errors
    ///
    /// Returns [`IndexError::Cache`] if the artifact cache fails.
    pub fn individuals(&self) -> Result<&BTreeSet<String>, IndexError> {
        self.cached_once(&self.individuals, ArtifactKey::Individuals, || {
            let mut declared = HashSet::new();
            let mut typed = BTreeSet::new();
            for triple in self.store.with_predicate(RDF_TYPE) {
                let Some(subject) = triple.subject.as_iri() else {
                    continue;
                };
                if triple
                    .object
                    .as_iri()
                    .is_some_and(|ty| DECLARATION_TYPES.contains(&ty))
                {
                    declared.insert(subject);
                }
                typed.insert(subject);
            }
            typed
                .into_iter()
                .filter(|s| !declared.contains(s))
                .map(str::to_string)
                .collect()
        })
    }

    /// Individual → most specific class label, for every individual.
    ///
    /// # Errors
    ///
    /// Returns [`IndexError::Cache`] if the artifact cache fails.
    pub fn type_map(&self) -> Result<&BTreeMap<String, String>, IndexError> {
        if let Some(map) = self.type_map.get() {
            return Ok(map);
        }
        let individuals = self.individuals()?;
        let map = self.cached_once(&self.type_map, ArtifactKey::TypeMap, || {
            let mut depths = HashMap::new();
            let map: BTreeMap<String, String> = individuals
                .iter()
                .filter_map(|entity| {
                    self.most_specific_type(entity, &mut depths)
                        .map(|ty| (entity.clone(), local_name(ty).to_string()))
                })
                .collect();
            info!(individuals = map.len(), "type map built");
            map
        })?;
        Ok(map)
    }

    /// Labels of every declared `owl:DatatypeProperty`, sorted.
    ///
    /// # Errors
    ///
    /// Returns [`IndexError::Cache`] if the artifact cache fails.
    pub fn data_properties(&self) -> Result<&[String], IndexError> {
        let props = self.cached_once(&self.data_properties, ArtifactKey::DataProperties, || {
            let labels: BTreeSet<&str> = self
                .store
                .subjects(RDF_TYPE, OWL_DATATYPE_PROPERTY)
                .map(local_name)
                .collect();
            labels.into_iter().map(str::to_string).collect()
        })?;
        Ok(props.as_slice())
    }

    /// Entity → value for every boolean assertion of data property
    /// `property`. Non-boolean literals are ignored.
    ///
    /// # Errors
    ///
    /// Returns [`IndexError::Cache`] if the artifact cache fails.
    pub fn data_property_values(
        &self,
        property: &str,
    ) -> Result<Arc<BTreeMap<String, bool>>, IndexError> {
        self.memoized(
            ArtifactKey::DataPropertyValues(property.to_string()),
            Tables::property_values,
            property,
            || {
                self.store
                    .with_predicate(&self.vocab.iri(property))
                    .filter_map(|t| {
                        let subject = t.subject.as_iri()?;
                        let value = t.object.as_literal()?.as_bool()?;
                        Some((subject.to_string(), value))
                    })
                    .collect()
            },
        )
    }

    /// Distinct IRI objects of `entity property ?o`, sorted.
    #[must_use]
    pub fn related(&self, entity: &str, property: &str) -> Vec<String> {
        let property = self.vocab.iri(property);
        let objects: BTreeSet<&str> = self
            .store
            .objects(entity, &property)
            .filter_map(Node::as_iri)
            .collect();
        objects.into_iter().map(str::to_string).collect()
    }

    fn lock(&self) -> MutexGuard<'_, Tables> {
        self.tables.lock().unwrap_or_else(PoisonError::into_inner)
    }

    fn direct_subclasses(&self, class: &str) -> Vec<String> {
        let class = self.vocab.iri(class);
        let labels: BTreeSet<&str> = self
            .store
            .subjects(RDFS_SUBCLASS_OF, &class)
            .map(local_name)
            .collect();
        labels.into_iter().map(str::to_string).collect()
    }

    /// Deepest non-builtin type, ties to the smallest IRI. Builtin types are
    /// only considered when nothing else is asserted.
    fn most_specific_type<'a>(
        &'a self,
        entity: &str,
        depths: &mut HashMap<&'a str, usize>,
    ) -> Option<&'a str> {
        let types: BTreeSet<&str> = self
            .store
            .objects(entity, RDF_TYPE)
            .filter_map(Node::as_iri)
            .collect();
        let domain: Vec<&str> = types.iter().copied().filter(|t| !is_builtin(t)).collect();
        let candidates = if domain.is_empty() {
            types.into_iter().collect()
        } else {
            domain
        };
        let mut best: Option<(&str, usize)> = None;
        for ty in candidates {
            let depth = class_depth(&self.store, ty, depths, &mut HashSet::new());
            if best.map_or(true, |(_, d)| depth > d) {
                best = Some((ty, depth));
            }
        }
        best.map(|(ty, _)| ty)
    }

    fn memoized<T>(
        &self,
        key: ArtifactKey,
        slot: fn(&mut Tables) -> &mut HashMap<String, Arc<T>>,
        arg: &str,
        compute: impl FnOnce() -> T,
    ) -> Result<Arc<T>, IndexError>
    where
        T: Serialize + DeserializeOwned,
    {
        if let Some(hit) = slot(&mut self.lock()).get(arg) {
            return Ok(Arc::clone(hit));
        }
        let value = Arc::new(self.fetch_or_compute(&key, compute)?);
        let mut tables = self.lock();
        Ok(Arc::clone(
            slot(&mut tables).entry(arg.to_string()).or_insert(value),
        ))
    }

    fn cached_once<'a, T>(
        &self,
        cell: &'a OnceLock<T>,
        key: ArtifactKey,
        compute: impl FnOnce() -> T,
    ) -> Result<&'a T, IndexError>
    where
        T: Serialize + DeserializeOwned,
    {
        if let Some(value) = cell.get() {
            return Ok(value);
        }
        let value = self.fetch_or_compute(&key, compute)?;
        Ok(cell.get_or_init(|| value))
    }

    fn fetch_or_compute<T>(
        &self,
        key: &ArtifactKey,
        compute: impl FnOnce() -> T,
    ) -> Result<T, IndexError>
    where
        T: Serialize + DeserializeOwned,
    {
        let name = key.name();
        if let Some(value) = cache::load(self.cache.as_ref(), &name)? {
            debug!(artifact = %name, "loaded from cache");
            return Ok(value);
        }
        let value = compute();
        cache::store(self.cache.as_ref(), &name, &value)?;
        debug!(artifact = %name, "computed");
        Ok(value)
    }
}

/// Length of the longest `rdfs:subClassOf` chain above `class`.
fn class_depth<'a>(
    store: &'a TripleStore,
    class: &'a str,
    memo: &mut HashMap<&'a str, usize>,
    visiting: &mut HashSet<&'a str>,
) -> usize {
    if let Some(&depth) = memo.get(class) {
        return depth;
    }
    if !visiting.insert(class) {
        // cycle
        return 0;
    }
    let parents: Vec<&'a str> = store
        .objects(class, RDFS_SUBCLASS_OF)
        .filter_map(Node::as_iri)
        .collect();
    let depth = parents
        .into_iter()
        .map(|p| class_depth(store, p, memo, visiting) + 1)
        .max()
        .unwrap_or(0);
    visiting.remove(class);
    memo.insert(class, depth);
    depth
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use crate::iris::{CARCINOGENESIS, OWL_CLASS};
    use crate::model::Triple;

    fn c(local: &str) -> String {
        format!("{CARCINOGENESIS}{local}")
    }

    fn small_graph() -> TripleStore {
        [
            Triple::iris(c("Atom"), RDF_TYPE, OWL_CLASS),
            Triple::iris(c("Nitrogen"), RDFS_SUBCLASS_OF, c("Atom")),
            Triple::iris(c("Carbon"), RDFS_SUBCLASS_OF, c("Atom")),
            Triple::iris(c("Nitro-N"), RDFS_SUBCLASS_OF, c("Nitrogen")),
            Triple::iris(c("Carbon-22"), RDFS_SUBCLASS_OF, c("Carbon")),
            Triple::iris(c("a1"), RDF_TYPE, c("Nitro-N")),
            Triple::iris(c("a1"), RDF_TYPE, c("Atom")),
            Triple::iris(c("a2"), RDF_TYPE, c("Carbon")),
        ]
        .into_iter()
        .collect()
    }

    #[test]
    fn classes_under_are_sorted_labels() {
        let index = GraphIndex::in_memory(small_graph());
        assert_eq!(*index.classes_under("Atom").unwrap(), vec!["Carbon", "Nitrogen"]);
        assert!(index.classes_under("Bond").unwrap().is_empty());
    }

    #[test]
    fn deepest_type_wins() {
        let index = GraphIndex::in_memory(small_graph());
        assert_eq!(index.type_of(&c("a1")).unwrap(), "Nitro-N");
        assert_eq!(index.type_of(&c("a2")).unwrap(), "Carbon");
        assert!(matches!(
            index.type_of(&c("Atom")),
            Err(IndexError::UnknownEntity(_))
        ));
    }

    #[test]
    fn first_parent_wins_on_duplicates() {
        let mut store = small_graph();
        store.insert(Triple::iris(c("Nitro-N"), RDFS_SUBCLASS_OF, c("Carbon")));
        let index = GraphIndex::in_memory(store);
        let map = index.subclass_to_parent("Atom").unwrap();
        assert_eq!(map.parent_of("Nitro-N"), Some("Carbon"));
        assert_eq!(map.subclasses(), ["Carbon-22", "Nitro-N"]);
    }

    #[test]
    fn subclass_cycles_terminate() {
        let store: TripleStore = [
            Triple::iris(c("A"), RDFS_SUBCLASS_OF, c("B")),
            Triple::iris(c("B"), RDFS_SUBCLASS_OF, c("A")),
            Triple::iris(c("x"), RDF_TYPE, c("A")),
        ]
        .into_iter()
        .collect();
        let index = GraphIndex::in_memory(store);
        assert_eq!(index.type_of(&c("x")).unwrap(), "A");
    }

    #[test]
    fn queries_are_idempotent() {
        let index = GraphIndex::in_memory(small_graph());
        let first = index.subclass_to_parent("Atom").unwrap();
        let second = index.subclass_to_parent("Atom").unwrap();
        assert!(Arc::ptr_eq(&first, &second));
        assert_eq!(
            index.individuals_of_type("Nitro-N").unwrap().iter().collect::<Vec<_>>(),
            vec![&c("a1")]
        );
    }

    #[test]
    fn reload_drops_tables() {
        let mut index = GraphIndex::in_memory(small_graph());
        assert_eq!(index.individuals().unwrap().len(), 2);
        index.reload(TripleStore::new()).unwrap();
        assert!(index.individuals().unwrap().is_empty());
        assert!(index.classes_under("Atom").unwrap().is_empty());
    }
}
