use std::marker::PhantomData;

use crate::query::sql::{self, SqlStatement};
use crate::query::{Filter, OrderDirection, QueryResult};
use crate::table::TableSchema;

/// Which side of the join a clause refers to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Side {
    Left,
    Right,
}

/// A lazy description of an inner join between two tables.
///
/// Rows with no match on either side are excluded. The join is executed by
/// [`crate::store::Store::join`] as a single statement; the result shape is
/// the caller's projector output, not an entity.
#[derive(Debug, Clone)]
pub struct Join<L, R>
where
    L: TableSchema,
    R: TableSchema,
{
    left_key: &'static str,
    right_key: &'static str,
    /// Filter over left-side columns.
    filter: Option<Filter>,
    order_by: Vec<(Side, &'static str, OrderDirection)>,
    _marker: PhantomData<(L, R)>,
}

impl<L, R> Join<L, R>
where
    L: TableSchema,
    R: TableSchema,
{
    /// Creates a join of `L` with `R` on `L.left_key = R.right_key`.
    pub fn on(left_key: &'static str, right_key: &'static str) -> Self {
        Self {
            left_key,
            right_key,
            filter: None,
            order_by: Vec::new(),
            _marker: PhantomData,
        }
    }

    /// Adds a filter over the left table, combining with existing filters
    /// using AND.
    pub fn and_where(mut self, filter: Filter) -> Self {
        self.filter = match self.filter {
            Some(existing) => Some(existing.and(filter)),
            None => Some(filter),
        };
        self
    }

    /// Orders ascending by a left-table column.
    pub fn order_by_left_asc(mut self, field: &'static str) -> Self {
        self.order_by.push((Side::Left, field, OrderDirection::Ascending));
        self
    }

    /// Orders descending by a left-table column.
    pub fn order_by_left_desc(mut self, field: &'static str) -> Self {
        self.order_by
            .push((Side::Left, field, OrderDirection::Descending));
        self
    }

    /// Orders ascending by a right-table column.
    pub fn order_by_right_asc(mut self, field: &'static str) -> Self {
        self.order_by
            .push((Side::Right, field, OrderDirection::Ascending));
        self
    }

    /// Orders descending by a right-table column.
    pub fn order_by_right_desc(mut self, field: &'static str) -> Self {
        self.order_by
            .push((Side::Right, field, OrderDirection::Descending));
        self
    }

    /// Column offset at which the right table's columns start in result rows.
    pub(crate) fn right_offset() -> usize {
        L::columns().len()
    }

    /// Translates the join into a single INNER JOIN statement.
    pub(crate) fn to_sql(&self) -> QueryResult<SqlStatement> {
        sql::resolve(L::columns(), self.left_key)?;
        sql::resolve(R::columns(), self.right_key)?;

        let mut stmt = format!(
            "SELECT {}, {} FROM {} AS l INNER JOIN {} AS r ON l.{} = r.{}",
            sql::column_list(L::columns(), Some("l")),
            sql::column_list(R::columns(), Some("r")),
            L::table_name(),
            R::table_name(),
            self.left_key,
            self.right_key
        );
        let mut params = Vec::new();

        if let Some(filter) = &self.filter {
            stmt.push_str(" WHERE ");
            sql::write_filter(filter, L::columns(), Some("l"), &mut stmt, &mut params)?;
        }
        sql::write_order_by(
            &self
                .order_by
                .iter()
                .map(|(side, field, dir)| match side {
                    Side::Left => (L::columns(), Some("l"), *field, *dir),
                    Side::Right => (R::columns(), Some("r"), *field, *dir),
                })
                .collect::<Vec<_>>(),
            &mut stmt,
        )?;

        Ok(SqlStatement { sql: stmt, params })
    }
}

#[cfg(test)]
mod tests {

    use super::*;
    use crate::entities::{Customer, State};
    use crate::query::QueryError;
    use crate::value::Value;

    #[test]
    fn test_should_translate_inner_join() {
        let join = Join::<Customer, State>::on("state_code", "state_code")
            .order_by_right_asc("state_name");
        let stmt = join.to_sql().unwrap();
        assert_eq!(
            stmt.sql,
            "SELECT l.customer_id, l.name, l.address, l.city, l.state_code, l.zip_code, \
             r.state_code, r.state_name \
             FROM customers AS l INNER JOIN states AS r ON l.state_code = r.state_code \
             ORDER BY r.state_name ASC"
        );
        assert!(stmt.params.is_empty());
    }

    #[test]
    fn test_should_filter_left_side() {
        let join = Join::<Customer, State>::on("state_code", "state_code")
            .and_where(Filter::eq("city", "Portland"));
        let stmt = join.to_sql().unwrap();
        assert!(stmt.sql.ends_with("WHERE l.city = ?"));
        assert_eq!(stmt.params, vec![Value::from("Portland")]);
    }

    #[test]
    fn test_should_reject_unknown_join_keys() {
        let join = Join::<Customer, State>::on("not_a_column", "state_code");
        assert!(matches!(
            join.to_sql(),
            Err(QueryError::UnknownColumn(_))
        ));
    }

    #[test]
    fn test_should_offset_right_columns_past_left() {
        assert_eq!(Join::<Customer, State>::right_offset(), 6);
    }
}
