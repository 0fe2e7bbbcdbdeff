#![crate_name = "mmabooks_store"]
#![crate_type = "lib"]

//! # MMABooks Store
//!
//! A small relational data-access layer for the MMABooks catalog: customers,
//! products, states and invoices over a blocking SQLite connection.
//!
//! The crate is organized around three surfaces:
//!
//! - [`store::Store`]: one connection per logical scope, plus the terminal
//!   operations that turn a [`query::Query`] into a single SQL statement.
//! - [`context::UnitOfWork`]: a change-tracking scope. Entities fetched
//!   through it are tracked; additions, removals and in-place mutations are
//!   flushed in one transaction by
//!   [`save_changes`](context::UnitOfWork::save_changes).
//! - [`fixture::reset_test_data`]: the seed-reset hook test suites call to
//!   restore the baseline dataset.
//!
//! ```rust,no_run
//! use mmabooks_store::prelude::*;
//!
//! # fn main() -> mmabooks_store::Result<()> {
//! let mut scope = UnitOfWork::open(&StoreConfig::default())?;
//! let products = scope.list(
//!     Query::<Product>::builder()
//!         .and_where(Filter::ge("unit_price", Decimal::from(50)))
//!         .order_by_asc("product_code")
//!         .build(),
//! )?;
//! # let _ = products;
//! # Ok(())
//! # }
//! ```

use thiserror::Error;

pub mod config;
pub mod context;
pub mod entities;
pub mod fixture;
pub mod prelude;
pub mod query;
pub mod store;
pub mod table;
pub mod value;

/// MMABooks store error type
#[derive(Debug, Error)]
pub enum Error {
    #[error("Configuration error: {0}")]
    Config(#[from] self::config::ConfigError),
    #[error("Query error: {0}")]
    Query(#[from] self::query::QueryError),
    #[error("Store error: {0}")]
    Store(#[from] self::store::StoreError),
    #[error("Persistence error: {0}")]
    Persistence(#[from] self::context::PersistenceError),
}

/// MMABooks store result type
pub type Result<T> = std::result::Result<T, Error>;
