//! The entity types stored by the crate, with their hand-written schema
//! mappings.
//!
//! Column arrays are declared in storage order; `to_values` and `from_row`
//! must stay aligned with them.

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::table::{ColumnDef, DataTypeKind, ForeignKeyDef, TableSchema};
use crate::value::{self, Value};

const STATE_COLUMNS: &[ColumnDef] = &[
    ColumnDef {
        name: "state_code",
        data_type: DataTypeKind::Text,
        nullable: false,
        primary_key: true,
        foreign_key: None,
    },
    ColumnDef {
        name: "state_name",
        data_type: DataTypeKind::Text,
        nullable: false,
        primary_key: false,
        foreign_key: None,
    },
];

/// A U.S. state, referenced by customers. Lookup data only.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct State {
    pub state_code: String,
    pub state_name: String,
}

impl TableSchema for State {
    fn table_name() -> &'static str {
        "states"
    }

    fn columns() -> &'static [ColumnDef] {
        STATE_COLUMNS
    }

    fn primary_key() -> &'static str {
        "state_code"
    }

    fn primary_key_value(&self) -> Value {
        Value::Text(self.state_code.clone())
    }

    fn to_values(&self) -> Vec<Value> {
        vec![
            Value::Text(self.state_code.clone()),
            Value::Text(self.state_name.clone()),
        ]
    }

    fn from_row(row: &rusqlite::Row<'_>, offset: usize) -> rusqlite::Result<Self> {
        Ok(Self {
            state_code: row.get(offset)?,
            state_name: row.get(offset + 1)?,
        })
    }
}

const CUSTOMER_COLUMNS: &[ColumnDef] = &[
    ColumnDef {
        name: "customer_id",
        data_type: DataTypeKind::Integer,
        nullable: false,
        primary_key: true,
        foreign_key: None,
    },
    ColumnDef {
        name: "name",
        data_type: DataTypeKind::Text,
        nullable: false,
        primary_key: false,
        foreign_key: None,
    },
    ColumnDef {
        name: "address",
        data_type: DataTypeKind::Text,
        nullable: false,
        primary_key: false,
        foreign_key: None,
    },
    ColumnDef {
        name: "city",
        data_type: DataTypeKind::Text,
        nullable: false,
        primary_key: false,
        foreign_key: None,
    },
    ColumnDef {
        name: "state_code",
        data_type: DataTypeKind::Text,
        nullable: false,
        primary_key: false,
        foreign_key: Some(ForeignKeyDef {
            foreign_table: "states",
            foreign_column: "state_code",
        }),
    },
    ColumnDef {
        name: "zip_code",
        data_type: DataTypeKind::Text,
        nullable: false,
        primary_key: false,
        foreign_key: None,
    },
];

/// A customer with a billing address. The key is assigned by the store on
/// insert; a to-be-added customer carries `customer_id == 0`.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Customer {
    pub customer_id: i64,
    pub name: String,
    pub address: String,
    pub city: String,
    pub state_code: String,
    pub zip_code: String,
}

impl TableSchema for Customer {
    const GENERATED_KEY: bool = true;

    fn table_name() -> &'static str {
        "customers"
    }

    fn columns() -> &'static [ColumnDef] {
        CUSTOMER_COLUMNS
    }

    fn primary_key() -> &'static str {
        "customer_id"
    }

    fn primary_key_value(&self) -> Value {
        Value::Integer(self.customer_id)
    }

    fn to_values(&self) -> Vec<Value> {
        vec![
            Value::Integer(self.customer_id),
            Value::Text(self.name.clone()),
            Value::Text(self.address.clone()),
            Value::Text(self.city.clone()),
            Value::Text(self.state_code.clone()),
            Value::Text(self.zip_code.clone()),
        ]
    }

    fn from_row(row: &rusqlite::Row<'_>, offset: usize) -> rusqlite::Result<Self> {
        Ok(Self {
            customer_id: row.get(offset)?,
            name: row.get(offset + 1)?,
            address: row.get(offset + 2)?,
            city: row.get(offset + 3)?,
            state_code: row.get(offset + 4)?,
            zip_code: row.get(offset + 5)?,
        })
    }

    fn set_generated_key(&mut self, key: i64) {
        self.customer_id = key;
    }
}

const PRODUCT_COLUMNS: &[ColumnDef] = &[
    ColumnDef {
        name: "product_code",
        data_type: DataTypeKind::Text,
        nullable: false,
        primary_key: true,
        foreign_key: None,
    },
    ColumnDef {
        name: "description",
        data_type: DataTypeKind::Text,
        nullable: false,
        primary_key: false,
        foreign_key: None,
    },
    ColumnDef {
        name: "unit_price",
        data_type: DataTypeKind::Decimal,
        nullable: false,
        primary_key: false,
        foreign_key: None,
    },
    ColumnDef {
        name: "on_hand_quantity",
        data_type: DataTypeKind::Integer,
        nullable: false,
        primary_key: false,
        foreign_key: None,
    },
];

/// A catalog product. The code is assigned by the caller.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Product {
    pub product_code: String,
    pub description: String,
    pub unit_price: Decimal,
    pub on_hand_quantity: i64,
}

impl Product {
    /// Inventory value of the product, `unit_price * on_hand_quantity`.
    /// Computed in `Decimal`, so it stays exact.
    pub fn inventory_value(&self) -> Decimal {
        self.unit_price * Decimal::from(self.on_hand_quantity)
    }
}

impl TableSchema for Product {
    fn table_name() -> &'static str {
        "products"
    }

    fn columns() -> &'static [ColumnDef] {
        PRODUCT_COLUMNS
    }

    fn primary_key() -> &'static str {
        "product_code"
    }

    fn primary_key_value(&self) -> Value {
        Value::Text(self.product_code.clone())
    }

    fn to_values(&self) -> Vec<Value> {
        vec![
            Value::Text(self.product_code.clone()),
            Value::Text(self.description.clone()),
            Value::Decimal(self.unit_price),
            Value::Integer(self.on_hand_quantity),
        ]
    }

    fn from_row(row: &rusqlite::Row<'_>, offset: usize) -> rusqlite::Result<Self> {
        Ok(Self {
            product_code: row.get(offset)?,
            description: row.get(offset + 1)?,
            unit_price: value::decimal_column(row, offset + 2)?,
            on_hand_quantity: row.get(offset + 3)?,
        })
    }
}

const INVOICE_COLUMNS: &[ColumnDef] = &[
    ColumnDef {
        name: "invoice_id",
        data_type: DataTypeKind::Integer,
        nullable: false,
        primary_key: true,
        foreign_key: None,
    },
    ColumnDef {
        name: "customer_id",
        data_type: DataTypeKind::Integer,
        nullable: false,
        primary_key: false,
        foreign_key: Some(ForeignKeyDef {
            foreign_table: "customers",
            foreign_column: "customer_id",
        }),
    },
    ColumnDef {
        name: "invoice_date",
        data_type: DataTypeKind::Text,
        nullable: false,
        primary_key: false,
        foreign_key: None,
    },
    ColumnDef {
        name: "invoice_total",
        data_type: DataTypeKind::Decimal,
        nullable: false,
        primary_key: false,
        foreign_key: None,
    },
];

/// An invoice issued to a customer. Dates are ISO `YYYY-MM-DD` text.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Invoice {
    pub invoice_id: i64,
    pub customer_id: i64,
    pub invoice_date: String,
    pub invoice_total: Decimal,
}

impl TableSchema for Invoice {
    const GENERATED_KEY: bool = true;

    fn table_name() -> &'static str {
        "invoices"
    }

    fn columns() -> &'static [ColumnDef] {
        INVOICE_COLUMNS
    }

    fn primary_key() -> &'static str {
        "invoice_id"
    }

    fn primary_key_value(&self) -> Value {
        Value::Integer(self.invoice_id)
    }

    fn to_values(&self) -> Vec<Value> {
        vec![
            Value::Integer(self.invoice_id),
            Value::Integer(self.customer_id),
            Value::Text(self.invoice_date.clone()),
            Value::Decimal(self.invoice_total),
        ]
    }

    fn from_row(row: &rusqlite::Row<'_>, offset: usize) -> rusqlite::Result<Self> {
        Ok(Self {
            invoice_id: row.get(offset)?,
            customer_id: row.get(offset + 1)?,
            invoice_date: row.get(offset + 2)?,
            invoice_total: value::decimal_column(row, offset + 3)?,
        })
    }

    fn set_generated_key(&mut self, key: i64) {
        self.invoice_id = key;
    }
}
