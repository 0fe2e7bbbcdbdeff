//! Connection provider and query terminal operations.
//!
//! A [`Store`] owns one blocking SQLite connection. It is the execution
//! boundary of the query layer: [`crate::query::Query`] values stay inert
//! until one of the terminals here translates them into a single SQL
//! statement and runs it.

use std::path::PathBuf;
use std::time::Duration;

use rusqlite::{Connection, params_from_iter};
use thiserror::Error;
use tracing::{debug, info};

use crate::config::StoreConfig;
use crate::query::{Filter, Join, Query, QueryError, sql};
use crate::table::TableSchema;
use crate::value::Value;

/// An enum representing possible errors raised by the connection itself.
#[derive(Debug, Error)]
pub enum StoreError {
    #[error("cannot open database at '{path}': {source}")]
    Open {
        path: PathBuf,
        #[source]
        source: rusqlite::Error,
    },
    #[error("database error: {0}")]
    Sqlite(#[from] rusqlite::Error),
}

/// A handle to one database connection.
///
/// Each logical scope (one test, one request) opens its own `Store`;
/// instances are not meant to be shared across threads.
pub struct Store {
    conn: Connection,
}

impl Store {
    /// Opens a connection according to `config` and applies the connection
    /// pragmas. Foreign keys are enforced by the store, not by application
    /// code, so `foreign_keys` is always on.
    pub fn open(config: &StoreConfig) -> crate::Result<Self> {
        let conn = match &config.database {
            Some(path) => Connection::open(path).map_err(|source| StoreError::Open {
                path: path.clone(),
                source,
            })?,
            None => Connection::open_in_memory().map_err(StoreError::Sqlite)?,
        };
        conn.busy_timeout(Duration::from_millis(config.busy_timeout_ms))
            .map_err(StoreError::Sqlite)?;
        conn.pragma_update(None, "foreign_keys", &true)
            .map_err(StoreError::Sqlite)?;

        let database = config
            .database
            .as_deref()
            .map(|path| path.display().to_string())
            .unwrap_or_else(|| ":memory:".to_string());
        info!(%database, "store opened");

        Ok(Self { conn })
    }

    /// Opens a private in-memory store.
    pub fn in_memory() -> crate::Result<Self> {
        Self::open(&StoreConfig::in_memory())
    }

    /// Executes a raw statement batch as-is. This is the pass-through the
    /// seed-reset hook uses; it is not part of the typed query surface.
    pub fn execute_raw(&self, batch: &str) -> crate::Result<()> {
        debug!(bytes = batch.len(), "executing raw batch");
        self.conn.execute_batch(batch).map_err(StoreError::Sqlite)?;
        Ok(())
    }

    /// Executes the query and collects all matching entities.
    pub fn to_list<T>(&self, query: Query<T>) -> crate::Result<Vec<T>>
    where
        T: TableSchema,
    {
        let stmt = sql::select(&query)?;
        debug!(sql = %stmt.sql, "executing select");

        let mut prepared = self.conn.prepare(&stmt.sql).map_err(QueryError::from)?;
        let rows = prepared
            .query_map(params_from_iter(stmt.params.iter()), |row| {
                T::from_row(row, 0)
            })
            .map_err(QueryError::from)?;

        let mut entities = Vec::new();
        for row in rows {
            entities.push(row.map_err(QueryError::from)?);
        }
        Ok(entities)
    }

    /// Executes the query and returns the first matching entity, if any.
    pub fn first<T>(&self, mut query: Query<T>) -> crate::Result<Option<T>>
    where
        T: TableSchema,
    {
        query.limit = Some(1);
        Ok(self.to_list(query)?.into_iter().next())
    }

    /// Looks up a single entity by primary key. A well-typed key matching no
    /// row is an absent result, not an error.
    pub fn find<T>(&self, key: impl Into<Value>) -> crate::Result<Option<T>>
    where
        T: TableSchema,
    {
        let query = Query::<T>::builder()
            .and_where(Filter::Eq(T::primary_key(), key.into()))
            .build();
        self.first(query)
    }

    /// Executes the query as a COUNT statement.
    pub fn count<T>(&self, query: Query<T>) -> crate::Result<u64>
    where
        T: TableSchema,
    {
        let stmt = sql::count(&query)?;
        debug!(sql = %stmt.sql, "executing count");

        let count: i64 = self
            .conn
            .query_row(&stmt.sql, params_from_iter(stmt.params.iter()), |row| {
                row.get(0)
            })
            .map_err(QueryError::from)?;
        Ok(count as u64)
    }

    /// Executes the query and maps each full row through `projector`.
    ///
    /// Calculated fields over decimal columns should be computed here so the
    /// arithmetic stays in `Decimal` rather than SQLite REAL.
    pub fn project<T, P>(
        &self,
        query: Query<T>,
        mut projector: impl FnMut(&T) -> P,
    ) -> crate::Result<Vec<P>>
    where
        T: TableSchema,
    {
        Ok(self.to_list(query)?.iter().map(&mut projector).collect())
    }

    /// Executes an inner join as one statement and maps each matched pair
    /// through `projector`.
    pub fn join<L, R, P>(
        &self,
        join: Join<L, R>,
        mut projector: impl FnMut(L, R) -> P,
    ) -> crate::Result<Vec<P>>
    where
        L: TableSchema,
        R: TableSchema,
    {
        let stmt = join.to_sql()?;
        debug!(sql = %stmt.sql, "executing join");

        let mut prepared = self.conn.prepare(&stmt.sql).map_err(QueryError::from)?;
        let rows = prepared
            .query_map(params_from_iter(stmt.params.iter()), |row| {
                Ok((
                    L::from_row(row, 0)?,
                    R::from_row(row, Join::<L, R>::right_offset())?,
                ))
            })
            .map_err(QueryError::from)?;

        let mut projected = Vec::new();
        for row in rows {
            let (left, right) = row.map_err(QueryError::from)?;
            projected.push(projector(left, right));
        }
        Ok(projected)
    }

    /// Begins a transaction for a batched save.
    pub(crate) fn begin(&mut self) -> rusqlite::Result<rusqlite::Transaction<'_>> {
        self.conn.transaction()
    }
}
