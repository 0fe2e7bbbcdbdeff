//! Seed-reset hook: drops and recreates the schema, then reloads the
//! well-known seed rows.
//!
//! Test suites call [`reset_test_data`] at the start of each case so every
//! case observes the same baseline regardless of what ran before it. The
//! script runs through the raw-batch pass-through in one shot.
//!
//! Decimal literals are written in canonical form (no trailing zeros), the
//! same form [`crate::value::encode_decimal`] produces, so text equality on
//! decimal columns holds for seeded rows too.

use tracing::info;

use crate::store::Store;

const RESET_SCRIPT: &str = r#"
DROP TABLE IF EXISTS invoices;
DROP TABLE IF EXISTS customers;
DROP TABLE IF EXISTS products;
DROP TABLE IF EXISTS states;

CREATE TABLE states (
    state_code TEXT NOT NULL PRIMARY KEY,
    state_name TEXT NOT NULL
);

CREATE TABLE customers (
    customer_id INTEGER PRIMARY KEY AUTOINCREMENT,
    name TEXT NOT NULL,
    address TEXT NOT NULL,
    city TEXT NOT NULL,
    state_code TEXT NOT NULL REFERENCES states (state_code),
    zip_code TEXT NOT NULL
);

CREATE TABLE products (
    product_code TEXT NOT NULL PRIMARY KEY,
    description TEXT NOT NULL,
    unit_price TEXT NOT NULL,
    on_hand_quantity INTEGER NOT NULL
);

CREATE TABLE invoices (
    invoice_id INTEGER PRIMARY KEY AUTOINCREMENT,
    customer_id INTEGER NOT NULL REFERENCES customers (customer_id),
    invoice_date TEXT NOT NULL,
    invoice_total TEXT NOT NULL
);

INSERT INTO states (state_code, state_name) VALUES
    ('AL', 'Alabama'),
    ('CA', 'California'),
    ('NJ', 'New Jersey'),
    ('NV', 'Nevada'),
    ('OR', 'Oregon'),
    ('PA', 'Pennsylvania'),
    ('WA', 'Washington'),
    ('WI', 'Wisconsin');

INSERT INTO customers (customer_id, name, address, city, state_code, zip_code) VALUES
    (1, 'Molunguri, A', '1108 Johanna Bay Drive', 'Birmingham', 'AL', '35216-6909'),
    (2, 'Irvin Gordon Insurance', '12301 Bothell Everett Highway', 'Everett', 'WA', '98208-6356'),
    (3, 'Swenson, Vi', '102 Forest Drive', 'Camden', 'NJ', '08102'),
    (4, 'Cumberland Gardens', '5312 Wilmington Drive', 'Reno', 'NV', '89502'),
    (5, 'Strauss, Sarah', '1000 NE Multnomah Street', 'Portland', 'OR', '97232'),
    (6, 'Pasquale Services', '231 East Chestnut Street', 'Scranton', 'PA', '18510'),
    (7, 'Wallace Distributing', '11517 NE 58th Avenue', 'Vancouver', 'WA', '98686'),
    (8, 'Artemis Books', '2410 W Clybourn Street', 'Milwaukee', 'WI', '53233'),
    (9, 'Hayes, Leticia', '5440 Fountain Avenue', 'Los Angeles', 'CA', '90029'),
    (10, 'Rinaldi Imports', '208 University Avenue', 'Sacramento', 'CA', '95825');

INSERT INTO products (product_code, description, unit_price, on_hand_quantity) VALUES
    ('A4CS', 'Murach''s ASP.NET 4 Web Programming with C# 2010', '56.5', 4637),
    ('A4VB', 'Murach''s ASP.NET 4 Web Programming with VB 2010', '56.5', 2045),
    ('ADC4', 'Murach''s ADO.NET 4 Database Programming with C# 2010', '54.5', 4538),
    ('ADV4', 'Murach''s ADO.NET 4 Database Programming with VB 2010', '54.5', 2961),
    ('CRFC', 'Murach''s CICS Desk Reference', '50', 1865),
    ('CS10', 'Murach''s C# 2010', '54.5', 5136),
    ('DB1R', 'DB2 for the COBOL Programmer, Part 1 (2nd Edition)', '42', 4825),
    ('DB2R', 'DB2 for the COBOL Programmer, Part 2 (2nd Edition)', '45', 621),
    ('HTM5', 'Murach''s HTML5 and CSS3', '54.5', 3813),
    ('JAV6', 'Murach''s Java SE 6', '52.5', 3455),
    ('JSE7', 'Murach''s Java Programming', '57.5', 2820),
    ('JSP2', 'Murach''s Java Servlets and JSP (2nd Edition)', '52.5', 4999),
    ('MCB2', 'Murach''s Mainframe COBOL', '59.5', 7715),
    ('SQL2', 'Murach''s SQL Server 2008 for Developers', '52.5', 2465),
    ('VB10', 'Murach''s Visual Basic 2010', '54.5', 2193),
    ('ZJLR', 'Murach''s OS/390 and z/OS JCL', '62.5', 677);

INSERT INTO invoices (invoice_id, customer_id, invoice_date, invoice_total) VALUES
    (1, 1, '2023-10-23', '165.68'),
    (2, 1, '2023-11-09', '59.6'),
    (3, 3, '2023-10-28', '224.5'),
    (4, 7, '2023-11-01', '56.5'),
    (5, 7, '2023-11-15', '127.75'),
    (6, 9, '2023-11-18', '438.25');
"#;

/// Drops, recreates and reseeds the whole schema.
///
/// Safe to call on a fresh database and idempotent across calls.
pub fn reset_test_data(store: &Store) -> crate::Result<()> {
    store.execute_raw(RESET_SCRIPT)?;
    info!("test data reset");
    Ok(())
}
