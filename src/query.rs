//! Lazy query descriptions and their translation to SQL.
//!
//! A [`Query`] is a pure description of filter/order/limit operations; nothing
//! touches the database until a terminal operation on [`crate::store::Store`]
//! translates it into a single SQL statement and executes it.

mod builder;
mod filter;
mod join;
pub(crate) mod sql;

use std::marker::PhantomData;

use thiserror::Error;

pub use self::builder::QueryBuilder;
pub use self::filter::Filter;
pub use self::join::Join;
use crate::table::TableSchema;

/// The result type for query operations.
pub type QueryResult<T> = Result<T, QueryError>;

/// An enum representing possible errors that can occur during query operations.
#[derive(Debug, Error)]
pub enum QueryError {
    /// Tried to reference a column that does not exist in the table schema.
    #[error("unknown column: {0}")]
    UnknownColumn(String),

    /// The underlying SQL client failed to prepare or execute the statement.
    #[error("sql error: {0}")]
    Sql(#[from] rusqlite::Error),
}

/// An enum representing the direction of ordering in a query.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OrderDirection {
    Ascending,
    Descending,
}

/// A lazy description of a read over one table.
///
/// Ties between equal order keys fall back to storage order, which is not
/// guaranteed; callers needing determinism must order by a unique key.
#[derive(Debug, Clone, PartialEq)]
pub struct Query<T>
where
    T: TableSchema,
{
    /// [`Filter`] to apply to the query.
    pub filter: Option<Filter>,
    /// Order by clauses for sorting the results.
    pub order_by: Vec<(&'static str, OrderDirection)>,
    /// Limit on the number of records to return.
    pub limit: Option<usize>,
    /// Offset for pagination.
    pub offset: Option<usize>,
    /// Marker for the table schema type.
    _marker: PhantomData<T>,
}

impl<T> Default for Query<T>
where
    T: TableSchema,
{
    fn default() -> Self {
        Self {
            filter: None,
            order_by: Vec::new(),
            limit: None,
            offset: None,
            _marker: PhantomData,
        }
    }
}

impl<T> Query<T>
where
    T: TableSchema,
{
    /// Creates a new [`QueryBuilder`] for building a query.
    pub fn builder() -> QueryBuilder<T> {
        QueryBuilder::default()
    }
}
