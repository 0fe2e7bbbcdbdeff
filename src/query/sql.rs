//! Translation of query descriptions into parameterized SQL statements.
//!
//! Column names are validated against the table schema here, so a filter or
//! order clause naming an unknown column fails at execution time with
//! [`QueryError::UnknownColumn`] instead of reaching the database.

use crate::query::{Filter, OrderDirection, Query, QueryError, QueryResult};
use crate::table::{ColumnDef, DataTypeKind, TableSchema};
use crate::value::Value;

/// A translated statement: SQL text plus positional parameters.
#[derive(Debug, Clone, PartialEq)]
pub(crate) struct SqlStatement {
    pub sql: String,
    pub params: Vec<Value>,
}

/// Translates a [`Query`] into a single SELECT statement.
pub(crate) fn select<T>(query: &Query<T>) -> QueryResult<SqlStatement>
where
    T: TableSchema,
{
    let mut sql = format!(
        "SELECT {} FROM {}",
        column_list(T::columns(), None),
        T::table_name()
    );
    let mut params = Vec::new();

    if let Some(filter) = &query.filter {
        sql.push_str(" WHERE ");
        write_filter(filter, T::columns(), None, &mut sql, &mut params)?;
    }
    write_order_by(
        &query
            .order_by
            .iter()
            .map(|(field, dir)| (T::columns(), None::<&str>, *field, *dir))
            .collect::<Vec<_>>(),
        &mut sql,
    )?;
    match (query.limit, query.offset) {
        (Some(limit), Some(offset)) => sql.push_str(&format!(" LIMIT {limit} OFFSET {offset}")),
        (Some(limit), None) => sql.push_str(&format!(" LIMIT {limit}")),
        // SQLite requires a LIMIT clause before OFFSET; -1 means unbounded
        (None, Some(offset)) => sql.push_str(&format!(" LIMIT -1 OFFSET {offset}")),
        (None, None) => {}
    }

    Ok(SqlStatement { sql, params })
}

/// Translates a [`Query`] into a COUNT statement. Order, limit and offset do
/// not affect the count and are ignored.
pub(crate) fn count<T>(query: &Query<T>) -> QueryResult<SqlStatement>
where
    T: TableSchema,
{
    let mut sql = format!("SELECT COUNT(*) FROM {}", T::table_name());
    let mut params = Vec::new();

    if let Some(filter) = &query.filter {
        sql.push_str(" WHERE ");
        write_filter(filter, T::columns(), None, &mut sql, &mut params)?;
    }

    Ok(SqlStatement { sql, params })
}

/// Builds the INSERT statement for an entity. Store-generated primary keys
/// are omitted from the column list so the store assigns them.
pub(crate) fn insert<T>(entity: &T) -> SqlStatement
where
    T: TableSchema,
{
    let values = entity.to_values();
    let mut names = Vec::new();
    let mut params = Vec::new();
    for (col, value) in T::columns().iter().zip(values) {
        if col.primary_key && T::GENERATED_KEY {
            continue;
        }
        names.push(col.name);
        params.push(value);
    }

    let placeholders = vec!["?"; names.len()].join(", ");
    let sql = format!(
        "INSERT INTO {} ({}) VALUES ({})",
        T::table_name(),
        names.join(", "),
        placeholders
    );

    SqlStatement { sql, params }
}

/// Builds the UPDATE statement for an entity, setting every non-key column
/// and keying on the primary key.
pub(crate) fn update_by_key<T>(entity: &T) -> SqlStatement
where
    T: TableSchema,
{
    let values = entity.to_values();
    let mut assignments = Vec::new();
    let mut params = Vec::new();
    for (col, value) in T::columns().iter().zip(values) {
        if col.primary_key {
            continue;
        }
        assignments.push(format!("{} = ?", col.name));
        params.push(value);
    }
    params.push(entity.primary_key_value());

    let sql = format!(
        "UPDATE {} SET {} WHERE {} = ?",
        T::table_name(),
        assignments.join(", "),
        T::primary_key()
    );

    SqlStatement { sql, params }
}

/// Builds the DELETE statement for a primary key.
pub(crate) fn delete_by_key<T>(key: &Value) -> SqlStatement
where
    T: TableSchema,
{
    SqlStatement {
        sql: format!(
            "DELETE FROM {} WHERE {} = ?",
            T::table_name(),
            T::primary_key()
        ),
        params: vec![key.clone()],
    }
}

/// Renders the full column list of a table, optionally qualified with a
/// table alias for joins.
pub(crate) fn column_list(columns: &[ColumnDef], qualifier: Option<&str>) -> String {
    columns
        .iter()
        .map(|col| column_ref(col, qualifier))
        .collect::<Vec<_>>()
        .join(", ")
}

fn column_ref(col: &ColumnDef, qualifier: Option<&str>) -> String {
    match qualifier {
        Some(alias) => format!("{alias}.{}", col.name),
        None => col.name.to_string(),
    }
}

pub(crate) fn resolve<'a>(columns: &'a [ColumnDef], field: &str) -> QueryResult<&'a ColumnDef> {
    columns
        .iter()
        .find(|col| col.name == field)
        .ok_or_else(|| QueryError::UnknownColumn(field.to_string()))
}

/// The comparison target for a column: decimal columns are stored as
/// canonical text, so range comparisons go through REAL on both sides.
/// Equality stays on the canonical text and is therefore exact.
fn comparison_target(col: &ColumnDef, qualifier: Option<&str>, range: bool) -> String {
    let target = column_ref(col, qualifier);
    if range && col.data_type == DataTypeKind::Decimal {
        format!("CAST({target} AS REAL)")
    } else {
        target
    }
}

/// Appends the SQL rendering of a [`Filter`] to `sql`, pushing bound values
/// onto `params`.
pub(crate) fn write_filter(
    filter: &Filter,
    columns: &[ColumnDef],
    qualifier: Option<&str>,
    sql: &mut String,
    params: &mut Vec<Value>,
) -> QueryResult<()> {
    match filter {
        // SQL `= NULL` never matches; render null equality as IS NULL
        Filter::Eq(field, Value::Null) => {
            let col = resolve(columns, field)?;
            sql.push_str(&format!("{} IS NULL", column_ref(col, qualifier)));
        }
        Filter::Ne(field, Value::Null) => {
            let col = resolve(columns, field)?;
            sql.push_str(&format!("{} IS NOT NULL", column_ref(col, qualifier)));
        }
        Filter::Eq(field, value) => {
            write_comparison(field, "=", value, columns, qualifier, sql, params)?
        }
        Filter::Ne(field, value) => {
            write_comparison(field, "<>", value, columns, qualifier, sql, params)?
        }
        Filter::Gt(field, value) => {
            write_comparison(field, ">", value, columns, qualifier, sql, params)?
        }
        Filter::Lt(field, value) => {
            write_comparison(field, "<", value, columns, qualifier, sql, params)?
        }
        Filter::Ge(field, value) => {
            write_comparison(field, ">=", value, columns, qualifier, sql, params)?
        }
        Filter::Le(field, value) => {
            write_comparison(field, "<=", value, columns, qualifier, sql, params)?
        }
        Filter::Like(field, pattern) => {
            let col = resolve(columns, field)?;
            sql.push_str(&format!(
                "{} LIKE ? ESCAPE '\\'",
                column_ref(col, qualifier)
            ));
            params.push(Value::Text(pattern.clone()));
        }
        Filter::NotNull(field) => {
            let col = resolve(columns, field)?;
            sql.push_str(&format!("{} IS NOT NULL", column_ref(col, qualifier)));
        }
        Filter::IsNull(field) => {
            let col = resolve(columns, field)?;
            sql.push_str(&format!("{} IS NULL", column_ref(col, qualifier)));
        }
        Filter::And(left, right) => {
            sql.push('(');
            write_filter(left, columns, qualifier, sql, params)?;
            sql.push_str(" AND ");
            write_filter(right, columns, qualifier, sql, params)?;
            sql.push(')');
        }
        Filter::Or(left, right) => {
            sql.push('(');
            write_filter(left, columns, qualifier, sql, params)?;
            sql.push_str(" OR ");
            write_filter(right, columns, qualifier, sql, params)?;
            sql.push(')');
        }
        Filter::Not(inner) => {
            sql.push_str("NOT (");
            write_filter(inner, columns, qualifier, sql, params)?;
            sql.push(')');
        }
    }
    Ok(())
}

fn write_comparison(
    field: &str,
    op: &str,
    value: &Value,
    columns: &[ColumnDef],
    qualifier: Option<&str>,
    sql: &mut String,
    params: &mut Vec<Value>,
) -> QueryResult<()> {
    let col = resolve(columns, field)?;
    let range = op != "=" && op != "<>";
    let target = comparison_target(col, qualifier, range);
    if range && col.data_type == DataTypeKind::Decimal {
        sql.push_str(&format!("{target} {op} CAST(? AS REAL)"));
    } else {
        sql.push_str(&format!("{target} {op} ?"));
    }
    params.push(value.clone());
    Ok(())
}

/// Appends an ORDER BY clause. Each entry carries the column table and
/// optional alias so join queries can order by either side.
pub(crate) fn write_order_by(
    entries: &[(
        &'static [ColumnDef],
        Option<&str>,
        &'static str,
        OrderDirection,
    )],
    sql: &mut String,
) -> QueryResult<()> {
    if entries.is_empty() {
        return Ok(());
    }

    let mut rendered = Vec::new();
    for (columns, qualifier, field, direction) in entries {
        let col = resolve(columns, field)?;
        let target = comparison_target(col, *qualifier, true);
        let dir = match direction {
            OrderDirection::Ascending => "ASC",
            OrderDirection::Descending => "DESC",
        };
        rendered.push(format!("{target} {dir}"));
    }
    sql.push_str(&format!(" ORDER BY {}", rendered.join(", ")));
    Ok(())
}
