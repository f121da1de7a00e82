use rusqlite::{params, Connection};
use std::path::Path;
use std::sync::Mutex;

use crate::config::AppConfig;
use crate::error::{AppError, AppResult};

pub struct Database {
    pub conn: Mutex<Connection>,
}

impl Database {
    pub fn open(path: &Path) -> AppResult<Self> {
        let conn = Connection::open(path)?;
        conn.execute_batch("PRAGMA journal_mode = WAL;")?;
        tracing::info!(path = %path.display(), "opened database");

        Ok(Database {
            conn: Mutex::new(conn),
        })
    }

    pub fn open_in_memory() -> AppResult<Self> {
        Ok(Database {
            conn: Mutex::new(Connection::open_in_memory()?),
        })
    }

    pub fn initialize(&self, config: &AppConfig) -> AppResult<()> {
        let conn = self
            .conn
            .lock()
            .map_err(|e| AppError::Config(format!("database lock poisoned: {e}")))?;
        initialize_conn(&conn, config)
    }
}

/// Creates the schema, applies column migrations and seeds an empty database.
pub fn initialize_conn(conn: &Connection, config: &AppConfig) -> AppResult<()> {
    conn.execute_batch(
        "
        -- Customers
        CREATE TABLE IF NOT EXISTS customers (
            id INTEGER PRIMARY KEY,
            name TEXT NOT NULL,
            company TEXT NOT NULL DEFAULT '',
            email TEXT NOT NULL DEFAULT '',
            phone TEXT NOT NULL DEFAULT '',
            address TEXT NOT NULL DEFAULT '',
            gstin TEXT,
            created_at DATETIME DEFAULT CURRENT_TIMESTAMP
        );

        -- Products with inventory
        CREATE TABLE IF NOT EXISTS products (
            id INTEGER PRIMARY KEY,
            name TEXT NOT NULL,
            brand TEXT NOT NULL DEFAULT '',
            category TEXT NOT NULL,
            stock INTEGER NOT NULL DEFAULT 0,
            price REAL NOT NULL,
            description TEXT,
            sku TEXT,
            created_at DATETIME DEFAULT CURRENT_TIMESTAMP
        );

        -- Invoices; seq backs the INV-nnn id
        CREATE TABLE IF NOT EXISTS invoices (
            id TEXT PRIMARY KEY,
            seq INTEGER NOT NULL UNIQUE,
            customer_id INTEGER NOT NULL,
            customer_name TEXT NOT NULL,
            issue_date DATE NOT NULL,
            amount REAL NOT NULL,
            status TEXT NOT NULL DEFAULT 'Pending',
            created_at DATETIME DEFAULT CURRENT_TIMESTAMP
        );

        -- Invoice line items
        CREATE TABLE IF NOT EXISTS invoice_items (
            id INTEGER PRIMARY KEY AUTOINCREMENT,
            invoice_id TEXT NOT NULL,
            position INTEGER NOT NULL,
            product_id INTEGER NOT NULL,
            description TEXT NOT NULL,
            quantity INTEGER NOT NULL,
            price REAL NOT NULL,
            FOREIGN KEY (invoice_id) REFERENCES invoices(id)
        );

        -- Users and login sessions
        CREATE TABLE IF NOT EXISTS users (
            id TEXT PRIMARY KEY,
            name TEXT NOT NULL,
            email TEXT NOT NULL UNIQUE,
            password_hash TEXT NOT NULL
        );

        CREATE TABLE IF NOT EXISTS sessions (
            token TEXT PRIMARY KEY,
            user_id TEXT NOT NULL,
            created_at DATETIME DEFAULT CURRENT_TIMESTAMP,
            FOREIGN KEY (user_id) REFERENCES users(id)
        );

        -- Settings sections as JSON
        CREATE TABLE IF NOT EXISTS settings (
            key TEXT PRIMARY KEY,
            value TEXT NOT NULL
        );

        CREATE INDEX IF NOT EXISTS idx_products_brand ON products(brand);
        CREATE INDEX IF NOT EXISTS idx_invoice_items_invoice ON invoice_items(invoice_id);
        ",
    )?;

    migrate_conn(conn)?;
    seed_demo_user(conn, config)?;
    if config.seed_fixtures {
        seed_fixtures(conn)?;
    }

    Ok(())
}

fn ensure_column(conn: &Connection, table: &str, column: &str, ddl: &str) -> AppResult<()> {
    let columns: Vec<String> = conn
        .prepare(&format!("PRAGMA table_info({table})"))?
        .query_map([], |row| row.get::<_, String>(1))?
        .collect::<Result<Vec<_>, _>>()?;

    if !columns.iter().any(|c| c == column) {
        tracing::info!(table, column, "adding missing column");
        conn.execute(ddl, [])?;
    }
    Ok(())
}

// Columns added after the first release
fn migrate_conn(conn: &Connection) -> AppResult<()> {
    ensure_column(conn, "customers", "notes", "ALTER TABLE customers ADD COLUMN notes TEXT")?;
    ensure_column(conn, "products", "min_stock", "ALTER TABLE products ADD COLUMN min_stock INTEGER")?;
    ensure_column(conn, "invoices", "notes", "ALTER TABLE invoices ADD COLUMN notes TEXT")?;
    Ok(())
}

fn seed_demo_user(conn: &Connection, config: &AppConfig) -> AppResult<()> {
    let count: i64 = conn.query_row("SELECT COUNT(*) FROM users", [], |row| row.get(0))?;
    if count > 0 {
        return Ok(());
    }

    let demo = &config.demo_user;
    let hash = bcrypt::hash(&demo.password, config.bcrypt_cost)?;
    conn.execute(
        "INSERT INTO users (id, name, email, password_hash) VALUES ('1', ?1, ?2, ?3)",
        params![demo.name, demo.email.to_lowercase(), hash],
    )?;
    tracing::info!(email = %demo.email, "seeded demo user");
    Ok(())
}

// Fixtures use fixed ids, so any existing row in these tables skips seeding.
fn seed_fixtures(conn: &Connection) -> AppResult<()> {
    let count: i64 = conn.query_row(
        "SELECT (SELECT COUNT(*) FROM customers)
              + (SELECT COUNT(*) FROM products)
              + (SELECT COUNT(*) FROM invoices)",
        [],
        |row| row.get(0),
    )?;
    if count > 0 {
        tracing::debug!(rows = count, "database not empty, skipping fixtures");
        return Ok(());
    }

    conn.execute_batch(
        "
        INSERT INTO customers (id, name, company, email, phone, address, gstin) VALUES
            (1, 'Rahul Sharma', 'Acme Corp', 'rahul@acmecorp.com', '+91 98765 43210', '123 Business Park, Mumbai', '27AAPFU0939F1ZV'),
            (2, 'Priya Patel', 'Globex Inc', 'priya@globex.com', '+91 87654 32109', '456 Tech Hub, Bangalore', '29ABCDE1234F1Z5');

        INSERT INTO products (id, name, brand, category, stock, price, description, sku, min_stock) VALUES
            (1, 'Pavilion 15', 'HP', 'Electronics', 15, 58999, 'High-performance laptop with Intel Core i5 processor', 'HP-PAV-001', 5),
            (2, 'ThinkPad E14', 'Lenovo', 'Electronics', 12, 65999, 'Business laptop with excellent build quality', 'LEN-TP-001', 3),
            (3, 'Standing Desk Pro', 'IKEA', 'Furniture', 8, 12499, 'Adjustable height standing desk for office use', 'IKEA-DESK-001', 3),
            (4, 'MX Master 3', 'Logitech', 'Accessories', 32, 7995, 'Advanced wireless mouse for professionals', 'LOG-MX3-001', 10),
            (5, 'Basic Wireless Mouse', 'Logitech', 'Accessories', 45, 999, 'Simple wireless mouse for everyday use', 'LOG-BWM-001', 15),
            (6, 'MacBook Air M2', 'Apple', 'Electronics', 5, 114900, 'Ultra-thin laptop with M2 chip', 'APL-MBA-001', 5),
            (7, 'Magic Mouse', 'Apple', 'Accessories', 18, 7900, 'Multi-touch wireless mouse', 'APL-MM-001', 5);

        INSERT INTO invoices (id, seq, customer_id, customer_name, issue_date, amount, status) VALUES
            ('INV-001', 1, 1, 'Rahul Sharma - Acme Corp', '2025-06-12', 12500, 'Paid'),
            ('INV-002', 2, 2, 'Priya Patel - Globex Inc', '2025-06-10', 8750, 'Pending'),
            ('INV-003', 3, 1, 'Rahul Sharma - Acme Corp', '2025-06-05', 15200, 'Paid'),
            ('INV-004', 4, 2, 'Priya Patel - Globex Inc', '2025-06-01', 9300, 'Overdue'),
            ('INV-005', 5, 1, 'Rahul Sharma - Acme Corp', '2025-05-28', 11800, 'Paid');

        INSERT INTO invoice_items (invoice_id, position, product_id, description, quantity, price) VALUES
            ('INV-001', 0, 1, 'Laptop - HP Pavilion', 1, 12500),
            ('INV-002', 0, 2, 'Office Desk - Standing', 1, 8750),
            ('INV-003', 0, 1, 'Laptop - HP Pavilion', 1, 15200),
            ('INV-004', 0, 3, 'Wireless Mouse', 10, 930),
            ('INV-005', 0, 2, 'Office Desk - Standing', 1, 11800);
        ",
    )?;
    tracing::info!("seeded fixture data");

    Ok(())
}

#[cfg(feature = "desktop")]
mod desktop {
    use super::Database;
    use crate::config::AppConfig;
    use crate::error::{AppError, AppResult};
    use tauri::{AppHandle, Manager};

    impl Database {
        pub fn new(app_handle: &AppHandle, config: &AppConfig) -> AppResult<Self> {
            let app_dir = app_handle
                .path()
                .app_data_dir()
                .map_err(|e| AppError::Config(format!("failed to resolve app data directory: {e}")))?;

            std::fs::create_dir_all(&app_dir)?;

            Database::open(&app_dir.join(&config.database_file))
        }
    }

    pub trait DatabaseExt {
        fn db(&self) -> &Database;
    }

    impl DatabaseExt for AppHandle {
        fn db(&self) -> &Database {
            self.state::<Database>().inner()
        }
    }
}

#[cfg(feature = "desktop")]
pub use desktop::DatabaseExt;
