//! Re-exports all the most commonly used items from this crate.

pub use rust_decimal::Decimal;

pub use crate::config::{ConfigError, StoreConfig};
pub use crate::context::{PersistenceError, SaveOp, Tracks, UnitOfWork};
pub use crate::entities::{Customer, Invoice, Product, State};
pub use crate::fixture::reset_test_data;
pub use crate::query::{Filter, Join, OrderDirection, Query, QueryBuilder, QueryError};
pub use crate::store::{Store, StoreError};
pub use crate::table::{ColumnDef, DataTypeKind, ForeignKeyDef, TableSchema};
pub use crate::value::Value;
pub use crate::{Error, Result};
