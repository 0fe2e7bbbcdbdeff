use std::marker::PhantomData;

use crate::query::{Filter, OrderDirection, Query};
use crate::table::TableSchema;

/// A builder for constructing database [`Query`]es.
#[derive(Debug, Clone)]
pub struct QueryBuilder<T>
where
    T: TableSchema,
{
    query: Query<T>,
    _marker: PhantomData<T>,
}

impl<T> Default for QueryBuilder<T>
where
    T: TableSchema,
{
    fn default() -> Self {
        Self {
            query: Query::default(),
            _marker: PhantomData,
        }
    }
}

impl<T> QueryBuilder<T>
where
    T: TableSchema,
{
    /// Builds and returns a [`Query`] object based on the current state of the [`QueryBuilder`].
    pub fn build(self) -> Query<T> {
        self.query
    }

    /// Adds an ascending order by clause for the specified field.
    pub fn order_by_asc(mut self, field: &'static str) -> Self {
        self.query.order_by.push((field, OrderDirection::Ascending));
        self
    }

    /// Adds a descending order by clause for the specified field.
    pub fn order_by_desc(mut self, field: &'static str) -> Self {
        self.query
            .order_by
            .push((field, OrderDirection::Descending));
        self
    }

    /// Sets a limit on the number of records to return.
    pub fn limit(mut self, limit: usize) -> Self {
        self.query.limit = Some(limit);
        self
    }

    /// Sets an offset for pagination.
    pub fn offset(mut self, offset: usize) -> Self {
        self.query.offset = Some(offset);
        self
    }

    /// Sets a filter for the query, replacing any existing filter.
    pub fn filter(mut self, filter: Option<Filter>) -> Self {
        self.query.filter = filter;
        self
    }

    /// Adds a filter to the query, combining with existing filters using AND.
    pub fn and_where(mut self, filter: Filter) -> Self {
        self.query.filter = match self.query.filter {
            Some(existing_filter) => Some(existing_filter.and(filter)),
            None => Some(filter),
        };
        self
    }

    /// Adds a filter to the query, combining with existing filters using OR.
    pub fn or_where(mut self, filter: Filter) -> Self {
        self.query.filter = match self.query.filter {
            Some(existing_filter) => Some(existing_filter.or(filter)),
            None => Some(filter),
        };
        self
    }
}
