#![forbid(unsafe_code)]
#![warn(missing_docs)]
#![deny(clippy::unwrap_used)]

//! Projection substrate.
//!
//! Plugins contribute projection repositories; the pipeline dispatches every
//! compiler event to every registered repository, then freezes the substrate
//! into a read-only [`QueryContext`] that renderers query.
//!
//! A projection is a mutable record keyed by some identity, derived from a
//! subset of event variants. For a given key, updates are serial: records
//! live in a [`BTreeMap`] and each event is applied to exactly one record
//! before the next event is routed. Iteration order is the key order, so
//! query results are deterministic.

use std::any::{Any, TypeId};
use std::collections::{BTreeMap, HashMap};

use events::Event;
use thiserror::Error;

/// Errors raised by the query interface.
#[derive(Debug, Error)]
pub enum ProjectionError {
    /// No repository for the requested projection type is registered.
    #[error("No projection of type `{0}` is registered")]
    UnknownProjection(&'static str),
    /// A single record was requested, but the query matched another count.
    #[error("Expected exactly one `{projection}` record, found {found}")]
    NotExactlyOne {
        /// The queried projection type.
        projection: &'static str,
        /// Number of records the query matched.
        found: usize,
    },
}

/// Convenient result type for projection operations.
pub type Result<T> = std::result::Result<T, ProjectionError>;

/// A record type accumulated from compiler events.
///
/// `route` decides which record an event belongs to; events it maps to
/// `None` are ignored by this projection. `create` seeds the record the
/// first time its key is routed to, and `apply` folds the event in.
pub trait Projection: Sized + 'static {
    /// Identity the records are keyed by.
    type Key: Ord + Clone + 'static;

    /// The key of the record this event belongs to, if any.
    fn route(event: &Event) -> Option<Self::Key>;

    /// Seed a record for a freshly routed key.
    fn create(key: &Self::Key) -> Self;

    /// Fold one event into the record.
    fn apply(&mut self, event: &Event);
}

/// The records of one projection type.
struct Repository<P: Projection> {
    records: BTreeMap<P::Key, P>,
}

impl<P: Projection> Repository<P> {
    fn new() -> Self { Self { records: BTreeMap::new() } }

    fn dispatch(&mut self, event: &Event) {
        if let Some(key) = P::route(event) {
            self.records.entry(key.clone()).or_insert_with(|| P::create(&key)).apply(event);
        }
    }
}

/// Object-safe face of [`Repository`] used by the substrate.
trait AnyRepository {
    fn dispatch(&mut self, event: &Event);
    fn as_any(&self) -> &dyn Any;
}

impl<P: Projection> AnyRepository for Repository<P> {
    fn dispatch(&mut self, event: &Event) { Repository::dispatch(self, event) }

    fn as_any(&self) -> &dyn Any { self }
}

/// Mutable collection of projection repositories.
///
/// Repositories are registered during the plugin phase and receive every
/// event in registration order. [`Substrate::freeze`] turns the whole
/// substrate into a read-only [`QueryContext`].
#[derive(Default)]
pub struct Substrate {
    repositories: Vec<Box<dyn AnyRepository>>,
    by_type: HashMap<TypeId, usize>,
}

impl Substrate {
    /// Create an empty substrate.
    pub fn new() -> Self { Self::default() }

    /// Register a repository for projection type `P`.
    ///
    /// Registering the same type twice is a no-op; the first registration
    /// wins and keeps its position in dispatch order.
    pub fn register<P: Projection>(&mut self) {
        let type_id = TypeId::of::<P>();
        if self.by_type.contains_key(&type_id) {
            return;
        }
        self.by_type.insert(type_id, self.repositories.len());
        self.repositories.push(Box::new(Repository::<P>::new()));
    }

    /// Number of registered repositories.
    pub fn len(&self) -> usize { self.repositories.len() }

    /// `true` when no repository is registered.
    pub fn is_empty(&self) -> bool { self.repositories.is_empty() }

    /// Dispatch one event to every registered repository.
    pub fn dispatch(&mut self, event: &Event) {
        for repository in &mut self.repositories {
            repository.dispatch(event);
        }
    }

    /// Freeze the substrate into a read-only query context.
    pub fn freeze(self) -> QueryContext {
        QueryContext { repositories: self.repositories, by_type: self.by_type }
    }
}

/// Builder facade handed to plugins during the fill-in phase.
///
/// Wraps the substrate so plugins can only add repositories, not dispatch
/// or inspect events.
pub struct ContextBuilder<'a> {
    substrate: &'a mut Substrate,
}

impl<'a> ContextBuilder<'a> {
    /// Create a builder over the given substrate.
    pub fn new(substrate: &'a mut Substrate) -> Self { Self { substrate } }

    /// Register a repository for projection type `P`.
    pub fn add_projection<P: Projection>(&mut self) -> &mut Self {
        self.substrate.register::<P>();
        self
    }
}

/// Read-only access to drained projections.
pub struct QueryContext {
    repositories: Vec<Box<dyn AnyRepository>>,
    by_type: HashMap<TypeId, usize>,
}

impl QueryContext {
    /// Start a query over projection type `P`.
    pub fn select<P: Projection>(&self) -> Result<Query<'_, P>> {
        let repository = self
            .by_type
            .get(&TypeId::of::<P>())
            .and_then(|&slot| self.repositories[slot].as_any().downcast_ref::<Repository<P>>())
            .ok_or_else(|| ProjectionError::UnknownProjection(std::any::type_name::<P>()))?;
        Ok(Query { repository, filters: Vec::new() })
    }
}

/// A query over one projection type, with optional predicate filters.
pub struct Query<'a, P: Projection> {
    repository: &'a Repository<P>,
    filters: Vec<Box<dyn Fn(&P) -> bool + 'a>>,
}

impl<'a, P: Projection> Query<'a, P> {
    /// Keep only records matching the predicate.
    pub fn filter(mut self, predicate: impl Fn(&P) -> bool + 'a) -> Self {
        self.filters.push(Box::new(predicate));
        self
    }

    /// All matching records, in key order.
    pub fn all(self) -> Vec<&'a P> {
        self.repository
            .records
            .values()
            .filter(|record| self.filters.iter().all(|predicate| predicate(record)))
            .collect()
    }

    /// The matching record stored under `key`, if any.
    pub fn find(self, key: &P::Key) -> Option<&'a P> {
        self.repository
            .records
            .get(key)
            .filter(|record| self.filters.iter().all(|predicate| predicate(record)))
    }

    /// The single matching record.
    pub fn one(self) -> Result<&'a P> {
        let matches = self.all();
        match matches.as_slice() {
            &[record] => Ok(record),
            other => Err(ProjectionError::NotExactlyOne {
                projection: std::any::type_name::<P>(),
                found: other.len(),
            }),
        }
    }

    /// Number of matching records.
    pub fn count(self) -> usize { self.all().len() }
}
