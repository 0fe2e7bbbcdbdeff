//! Schema mapping: entity type → table name → column list → key accessors.
//!
//! Mapping is declared explicitly by each entity rather than discovered via
//! attributes or derives. `entities.rs` carries the hand-written impls.

use crate::value::Value;

/// Storage data type of a column.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum DataTypeKind {
    Integer,
    Text,
    /// Fixed-point decimal, stored as canonical text (see [`crate::value::encode_decimal`]).
    Decimal,
}

/// Defines a column in a database table.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct ColumnDef {
    /// The name of the column.
    pub name: &'static str,
    /// The data type of the column.
    pub data_type: DataTypeKind,
    /// Indicates if this column can contain NULL values.
    pub nullable: bool,
    /// Indicates if this column is the primary key.
    pub primary_key: bool,
    /// Foreign key definition, if any.
    pub foreign_key: Option<ForeignKeyDef>,
}

/// Defines a foreign key relationship for a column.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct ForeignKeyDef {
    /// Name of the foreign table (e.g. "states").
    pub foreign_table: &'static str,
    /// Name of the foreign column that the key points to (e.g. "state_code").
    pub foreign_column: &'static str,
}

/// Table schema representation.
///
/// It is used to define the structure of a database table and how an entity
/// maps onto its rows.
pub trait TableSchema
where
    Self: Clone + PartialEq + 'static,
{
    /// Whether the primary key is assigned by the store on insert
    /// (AUTOINCREMENT). Generated keys are read back after insert and
    /// assigned onto the in-memory entity.
    const GENERATED_KEY: bool = false;

    /// Returns the name of the table.
    fn table_name() -> &'static str;

    /// Returns the column definitions of the table.
    fn columns() -> &'static [ColumnDef];

    /// Returns the name of the primary key column.
    fn primary_key() -> &'static str;

    /// Returns the primary key value of this instance.
    fn primary_key_value(&self) -> Value;

    /// Converts itself into a vector of column [`Value`]s aligned with
    /// [`TableSchema::columns`].
    fn to_values(&self) -> Vec<Value>;

    /// Decodes an instance from a result row whose columns for this table
    /// start at `offset`. The offset lets the same decoder serve plain
    /// selects (`offset == 0`) and the right-hand side of a join.
    fn from_row(row: &rusqlite::Row<'_>, offset: usize) -> rusqlite::Result<Self>;

    /// Writes a store-generated key back onto the entity after insert.
    fn set_generated_key(&mut self, _key: i64) {}

    /// Looks up a column definition by name.
    fn column(name: &str) -> Option<&'static ColumnDef> {
        Self::columns().iter().find(|col| col.name == name)
    }
}
