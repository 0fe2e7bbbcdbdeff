use rusqlite::Transaction;
use tracing::debug;

use super::{PersistenceError, SaveOp, classify};
use crate::query::sql;
use crate::table::TableSchema;
use crate::value::Value;

/// Tracking state of an entity within a scope.
///
/// `Modified` is not a stored state: a fetched entity is `Unmodified` and a
/// snapshot diff at save time decides whether it needs an UPDATE.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EntityState {
    /// Fetched from storage within this scope.
    Unmodified,
    /// Marked for insertion.
    Added,
    /// Marked for deletion by primary key.
    Removed,
}

/// Result of a tracked-set lookup by key.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum Lookup {
    Present,
    Removed,
    Absent,
}

#[derive(Debug, Clone)]
struct Tracked<T> {
    current: T,
    /// Pristine copy taken at fetch time; `None` for additions.
    snapshot: Option<T>,
    state: EntityState,
}

/// The entities of one type tracked by a scope.
#[derive(Debug)]
pub struct TrackedSet<T>
where
    T: TableSchema,
{
    entries: Vec<Tracked<T>>,
}

impl<T> Default for TrackedSet<T>
where
    T: TableSchema,
{
    fn default() -> Self {
        Self {
            entries: Vec::new(),
        }
    }
}

impl<T> TrackedSet<T>
where
    T: TableSchema,
{
    fn position(&self, key: &Value) -> Option<usize> {
        self.entries
            .iter()
            .position(|entry| entry.current.primary_key_value() == *key)
    }

    /// Reports how the scope currently sees the given key.
    pub(crate) fn lookup(&self, key: &Value) -> Lookup {
        match self.position(key) {
            Some(idx) if self.entries[idx].state == EntityState::Removed => Lookup::Removed,
            Some(_) => Lookup::Present,
            None => Lookup::Absent,
        }
    }

    /// Marks an entity for insertion. Key collisions with existing rows are
    /// detected at save time, not here.
    pub(crate) fn add(&mut self, entity: T) {
        self.entries.push(Tracked {
            current: entity,
            snapshot: None,
            state: EntityState::Added,
        });
    }

    /// Attaches a fetched entity as unmodified, with a pristine snapshot.
    ///
    /// A key already tracked keeps its in-scope instance: the tracked entity
    /// shadows the freshly fetched row. Returns the scope's view of the
    /// entity, or `None` when it is marked removed.
    pub(crate) fn attach(&mut self, entity: T) -> Option<T> {
        match self.position(&entity.primary_key_value()) {
            Some(idx) => match self.entries[idx].state {
                EntityState::Removed => None,
                _ => Some(self.entries[idx].current.clone()),
            },
            None => {
                let view = entity.clone();
                self.entries.push(Tracked {
                    snapshot: Some(entity.clone()),
                    current: entity,
                    state: EntityState::Unmodified,
                });
                Some(view)
            }
        }
    }

    /// Marks a tracked entity for deletion. Removing a not-yet-saved addition
    /// collapses it to untracked, so no statement is issued for it.
    pub(crate) fn remove(&mut self, key: &Value) -> Result<(), PersistenceError> {
        match self.position(key) {
            Some(idx) if self.entries[idx].state == EntityState::Added => {
                self.entries.remove(idx);
                Ok(())
            }
            Some(idx) => {
                self.entries[idx].state = EntityState::Removed;
                Ok(())
            }
            None => Err(PersistenceError::Detached {
                table: T::table_name(),
                key: key.clone(),
            }),
        }
    }

    /// Mutable access to a tracked entity; removed entities are not visible.
    pub(crate) fn get_mut(&mut self, key: &Value) -> Option<&mut T> {
        let idx = self.position(key)?;
        let entry = &mut self.entries[idx];
        (entry.state != EntityState::Removed).then_some(&mut entry.current)
    }

    /// Whether any entry would produce a statement on save.
    pub fn has_changes(&self) -> bool {
        self.entries.iter().any(|entry| match entry.state {
            EntityState::Added | EntityState::Removed => true,
            EntityState::Unmodified => entry.snapshot.as_ref() != Some(&entry.current),
        })
    }

    pub(crate) fn flush_deletes(&self, tx: &Transaction<'_>) -> Result<usize, PersistenceError> {
        let mut affected = 0;
        for entry in self
            .entries
            .iter()
            .filter(|entry| entry.state == EntityState::Removed)
        {
            let key = entry.current.primary_key_value();
            let stmt = sql::delete_by_key::<T>(&key);
            debug!(table = T::table_name(), key = %key, "flushing delete");
            tx.execute(&stmt.sql, rusqlite::params_from_iter(stmt.params.iter()))
                .map_err(|err| classify(err, T::table_name(), SaveOp::Delete, key.clone()))?;
            affected += 1;
        }
        Ok(affected)
    }

    pub(crate) fn flush_inserts(&mut self, tx: &Transaction<'_>) -> Result<usize, PersistenceError> {
        let mut affected = 0;
        for entry in self
            .entries
            .iter_mut()
            .filter(|entry| entry.state == EntityState::Added)
        {
            let stmt = sql::insert(&entry.current);
            let key = entry.current.primary_key_value();
            debug!(table = T::table_name(), key = %key, "flushing insert");
            tx.execute(&stmt.sql, rusqlite::params_from_iter(stmt.params.iter()))
                .map_err(|err| classify(err, T::table_name(), SaveOp::Insert, key))?;
            if T::GENERATED_KEY {
                entry.current.set_generated_key(tx.last_insert_rowid());
            }
            affected += 1;
        }
        Ok(affected)
    }

    pub(crate) fn flush_updates(&self, tx: &Transaction<'_>) -> Result<usize, PersistenceError> {
        let mut affected = 0;
        for entry in self.entries.iter().filter(|entry| {
            entry.state == EntityState::Unmodified
                && entry.snapshot.as_ref() != Some(&entry.current)
        }) {
            let key = entry.current.primary_key_value();
            let stmt = sql::update_by_key(&entry.current);
            debug!(table = T::table_name(), key = %key, "flushing update");
            tx.execute(&stmt.sql, rusqlite::params_from_iter(stmt.params.iter()))
                .map_err(|err| classify(err, T::table_name(), SaveOp::Update, key.clone()))?;
            affected += 1;
        }
        Ok(affected)
    }

    /// Settles all marks after a successful commit: removed entries detach,
    /// everything else becomes unmodified with a fresh snapshot.
    pub(crate) fn commit_marks(&mut self) {
        self.entries
            .retain(|entry| entry.state != EntityState::Removed);
        for entry in &mut self.entries {
            entry.state = EntityState::Unmodified;
            entry.snapshot = Some(entry.current.clone());
        }
    }
}
