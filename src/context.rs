//! Change tracking and batched saves.
//!
//! A [`UnitOfWork`] wraps a [`Store`] and tracks every entity fetched or
//! registered through it. Nothing touches storage until [`save_changes`]
//! flushes all pending inserts, updates and deletes in a single transaction.
//!
//! ```rust,no_run
//! use mmabooks_store::prelude::*;
//!
//! # fn main() -> mmabooks_store::Result<()> {
//! let mut scope = UnitOfWork::open(&StoreConfig::default())?;
//! if let Some(product) = scope.find::<Product>("A4CS")? {
//!     product.on_hand_quantity += 10;
//! }
//! scope.save_changes()?;
//! # Ok(())
//! # }
//! ```
//!
//! [`save_changes`]: UnitOfWork::save_changes

mod tracked;

use rusqlite::ffi;
use thiserror::Error;
use tracing::{debug, info};

pub use self::tracked::{EntityState, TrackedSet};
use self::tracked::Lookup;
use crate::config::StoreConfig;
use crate::entities::{Customer, Invoice, Product, State};
use crate::query::Query;
use crate::store::Store;
use crate::table::TableSchema;
use crate::value::Value;

/// The write operation a save issues for one entity.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SaveOp {
    Insert,
    Update,
    Delete,
}

impl std::fmt::Display for SaveOp {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Insert => write!(f, "insert"),
            Self::Update => write!(f, "update"),
            Self::Delete => write!(f, "delete"),
        }
    }
}

/// An enum representing the possible errors of a batched save.
#[derive(Debug, Error)]
pub enum PersistenceError {
    /// An insert collided with an existing primary key or unique index.
    #[error("duplicate key '{key}' in table '{table}'")]
    DuplicateKey { table: &'static str, key: Value },
    /// A write referenced or orphaned a row in another table.
    #[error("{op} of key '{key}' in table '{table}' violates referential integrity")]
    ReferentialIntegrity {
        table: &'static str,
        op: SaveOp,
        key: Value,
    },
    /// A statement failed for a reason other than a constraint violation.
    #[error("{op} of key '{key}' in table '{table}' failed: {source}")]
    Statement {
        table: &'static str,
        op: SaveOp,
        key: Value,
        #[source]
        source: rusqlite::Error,
    },
    /// Tried to remove an entity that was never fetched or added in this scope.
    #[error("entity with key '{key}' in table '{table}' is not tracked by this scope")]
    Detached { table: &'static str, key: Value },
    /// The surrounding transaction could not begin or commit.
    #[error("transaction failed: {0}")]
    Transaction(#[source] rusqlite::Error),
}

/// Classifies a failed statement by its extended SQLite result code.
pub(crate) fn classify(
    err: rusqlite::Error,
    table: &'static str,
    op: SaveOp,
    key: Value,
) -> PersistenceError {
    if let rusqlite::Error::SqliteFailure(code, _) = &err {
        match code.extended_code {
            ffi::SQLITE_CONSTRAINT_PRIMARYKEY | ffi::SQLITE_CONSTRAINT_UNIQUE => {
                return PersistenceError::DuplicateKey { table, key };
            }
            ffi::SQLITE_CONSTRAINT_FOREIGNKEY => {
                return PersistenceError::ReferentialIntegrity { table, op, key };
            }
            _ => {}
        }
    }
    PersistenceError::Statement {
        table,
        op,
        key,
        source: err,
    }
}

/// Gives [`UnitOfWork`] typed access to the tracked set for one entity type.
pub trait Tracks<T>
where
    T: TableSchema,
{
    fn set(&self) -> &TrackedSet<T>;

    fn set_mut(&mut self) -> &mut TrackedSet<T>;
}

/// A tracked scope over a [`Store`].
///
/// Entities fetched through the scope shadow later fetches of the same key,
/// so mutations survive re-reads within the scope. Dropping the scope without
/// calling [`UnitOfWork::save_changes`] discards all pending changes.
pub struct UnitOfWork {
    store: Store,
    states: TrackedSet<State>,
    customers: TrackedSet<Customer>,
    products: TrackedSet<Product>,
    invoices: TrackedSet<Invoice>,
}

macro_rules! impl_tracks {
    ($entity:ty, $field:ident) => {
        impl Tracks<$entity> for UnitOfWork {
            fn set(&self) -> &TrackedSet<$entity> {
                &self.$field
            }

            fn set_mut(&mut self) -> &mut TrackedSet<$entity> {
                &mut self.$field
            }
        }
    };
}

impl_tracks!(State, states);
impl_tracks!(Customer, customers);
impl_tracks!(Product, products);
impl_tracks!(Invoice, invoices);

impl UnitOfWork {
    /// Creates a scope over an already opened store.
    pub fn new(store: Store) -> Self {
        Self {
            store,
            states: TrackedSet::default(),
            customers: TrackedSet::default(),
            products: TrackedSet::default(),
            invoices: TrackedSet::default(),
        }
    }

    /// Opens a store from configuration and wraps it in a fresh scope.
    pub fn open(config: &StoreConfig) -> crate::Result<Self> {
        Ok(Self::new(Store::open(config)?))
    }

    /// The underlying store, for untracked reads.
    pub fn store(&self) -> &Store {
        &self.store
    }

    /// Registers a new entity for insertion on the next save.
    pub fn add<T>(&mut self, entity: T)
    where
        T: TableSchema,
        Self: Tracks<T>,
    {
        debug!(table = T::table_name(), key = %entity.primary_key_value(), "entity added");
        <Self as Tracks<T>>::set_mut(self).add(entity);
    }

    /// Marks a tracked entity for deletion on the next save.
    ///
    /// # Errors
    ///
    /// [`PersistenceError::Detached`] if the entity was never fetched or
    /// added through this scope.
    pub fn remove<T>(&mut self, entity: &T) -> crate::Result<()>
    where
        T: TableSchema,
        Self: Tracks<T>,
    {
        let key = entity.primary_key_value();
        debug!(table = T::table_name(), key = %key, "entity removed");
        <Self as Tracks<T>>::set_mut(self).remove(&key)?;
        Ok(())
    }

    /// Fetches an entity by primary key and tracks it.
    ///
    /// Returns `Ok(None)` when no row matches, or when the entity is already
    /// marked removed in this scope. A key already tracked is answered from
    /// the scope without touching storage.
    pub fn find<T>(&mut self, key: impl Into<Value>) -> crate::Result<Option<&mut T>>
    where
        T: TableSchema,
        Self: Tracks<T>,
    {
        let key = key.into();
        match <Self as Tracks<T>>::set(self).lookup(&key) {
            Lookup::Removed => return Ok(None),
            Lookup::Present => {}
            Lookup::Absent => match self.store.find::<T>(key.clone())? {
                Some(entity) => {
                    <Self as Tracks<T>>::set_mut(self).attach(entity);
                }
                None => return Ok(None),
            },
        }
        Ok(<Self as Tracks<T>>::set_mut(self).get_mut(&key))
    }

    /// Fetches the first entity matching a query and tracks it.
    pub fn fetch_first<T>(&mut self, query: Query<T>) -> crate::Result<Option<&mut T>>
    where
        T: TableSchema,
        Self: Tracks<T>,
    {
        match self.store.first(query)? {
            None => Ok(None),
            Some(entity) => {
                let key = entity.primary_key_value();
                <Self as Tracks<T>>::set_mut(self).attach(entity);
                Ok(<Self as Tracks<T>>::set_mut(self).get_mut(&key))
            }
        }
    }

    /// Fetches all entities matching a query and tracks each of them.
    ///
    /// Rows already tracked are replaced by their in-scope instances; rows
    /// marked removed are filtered out.
    pub fn list<T>(&mut self, query: Query<T>) -> crate::Result<Vec<T>>
    where
        T: TableSchema,
        Self: Tracks<T>,
    {
        let fetched = self.store.to_list(query)?;
        let set = <Self as Tracks<T>>::set_mut(self);
        Ok(fetched
            .into_iter()
            .filter_map(|entity| set.attach(entity))
            .collect())
    }

    /// Mutable access to an already tracked entity, without touching storage.
    pub fn get_mut<T>(&mut self, key: impl Into<Value>) -> Option<&mut T>
    where
        T: TableSchema,
        Self: Tracks<T>,
    {
        <Self as Tracks<T>>::set_mut(self).get_mut(&key.into())
    }

    /// Whether any tracked entity would produce a statement on save.
    pub fn has_pending_changes(&self) -> bool {
        self.states.has_changes()
            || self.customers.has_changes()
            || self.products.has_changes()
            || self.invoices.has_changes()
    }

    /// Flushes all pending changes in a single transaction.
    ///
    /// Deletes run first, children before parents; then inserts, parents
    /// before children; then updates. Either every statement commits or the
    /// storage is left untouched. Generated keys are written back to the
    /// tracked instances before commit.
    ///
    /// Returns the number of entities written. A scope with no pending
    /// changes saves nothing and returns zero.
    pub fn save_changes(&mut self) -> crate::Result<usize> {
        if !self.has_pending_changes() {
            debug!("no pending changes, nothing to save");
            return Ok(0);
        }

        let tx = self.store.begin().map_err(PersistenceError::Transaction)?;
        let mut affected = 0;

        affected += self.invoices.flush_deletes(&tx)?;
        affected += self.customers.flush_deletes(&tx)?;
        affected += self.products.flush_deletes(&tx)?;
        affected += self.states.flush_deletes(&tx)?;

        affected += self.states.flush_inserts(&tx)?;
        affected += self.customers.flush_inserts(&tx)?;
        affected += self.products.flush_inserts(&tx)?;
        affected += self.invoices.flush_inserts(&tx)?;

        affected += self.states.flush_updates(&tx)?;
        affected += self.customers.flush_updates(&tx)?;
        affected += self.products.flush_updates(&tx)?;
        affected += self.invoices.flush_updates(&tx)?;

        tx.commit().map_err(PersistenceError::Transaction)?;

        self.states.commit_marks();
        self.customers.commit_marks();
        self.products.commit_marks();
        self.invoices.commit_marks();

        info!(affected, "changes saved");
        Ok(affected)
    }
}
