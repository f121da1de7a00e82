use rusqlite::{params, Connection, OptionalExtension, Row};
use serde::{Deserialize, Serialize};

use crate::csv_import::{self, ParsedImport};
use crate::error::{AppError, AppResult};
use crate::filters::ProductFilter;
use crate::models::{NewProduct, Product, StockStatus, UpdateProduct};
use crate::money;

use super::{blank_to_none, next_id};

const SELECT_PRODUCT: &str =
    "SELECT id, name, brand, category, stock, price, description, sku, min_stock FROM products";

fn map_product(row: &Row) -> rusqlite::Result<Product> {
    let stock: i32 = row.get(4)?;
    let price: f64 = row.get(5)?;
    let min_stock: Option<i32> = row.get(8)?;
    Ok(Product {
        id: row.get(0)?,
        name: row.get(1)?,
        brand: row.get(2)?,
        category: row.get(3)?,
        stock,
        price: money::format_inr(price),
        status: StockStatus::derive(stock, min_stock),
        description: row.get(6)?,
        sku: row.get(7)?,
        min_stock,
    })
}

fn validate(name: &str, category: &str, price: f64, stock: i32) -> AppResult<()> {
    let problem = if name.trim().is_empty() {
        Some("Product name is required")
    } else if category.trim().is_empty() {
        Some("Category is required")
    } else if !price.is_finite() || price < 0.0 {
        Some("Price must be a valid positive number")
    } else if stock < 0 {
        Some("Stock must be a valid non-negative number")
    } else {
        None
    };

    match problem {
        Some(msg) => {
            tracing::warn!(product = name, reason = msg, "rejected product");
            Err(AppError::Validation(msg.to_string()))
        }
        None => Ok(()),
    }
}

pub fn list_products(conn: &Connection) -> AppResult<Vec<Product>> {
    let mut stmt = conn.prepare(&format!("{SELECT_PRODUCT} ORDER BY id"))?;
    let products = stmt
        .query_map([], map_product)?
        .collect::<Result<Vec<_>, _>>()?;
    Ok(products)
}

pub fn get_product(conn: &Connection, id: i64) -> AppResult<Product> {
    conn.query_row(&format!("{SELECT_PRODUCT} WHERE id = ?1"), [id], map_product)
        .optional()?
        .ok_or_else(|| AppError::NotFound(format!("Product {id}")))
}

pub fn create_product(conn: &Connection, product: NewProduct) -> AppResult<Product> {
    validate(&product.name, &product.category, product.price, product.stock)?;

    let id = next_id(conn, "products")?;
    conn.execute(
        "INSERT INTO products (id, name, brand, category, stock, price, description, sku, min_stock)
         VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9)",
        params![
            id,
            product.name.trim(),
            product.brand.trim(),
            product.category.trim(),
            product.stock,
            product.price,
            blank_to_none(product.description),
            blank_to_none(product.sku),
            product.min_stock,
        ],
    )?;
    tracing::info!(id, stock = product.stock, "created product");

    get_product(conn, id)
}

pub fn update_product(conn: &Connection, product: UpdateProduct) -> AppResult<Product> {
    validate(&product.name, &product.category, product.price, product.stock)?;

    let changed = conn.execute(
        "UPDATE products SET name = ?1, brand = ?2, category = ?3, stock = ?4, price = ?5,
         description = ?6, sku = ?7, min_stock = ?8 WHERE id = ?9",
        params![
            product.name.trim(),
            product.brand.trim(),
            product.category.trim(),
            product.stock,
            product.price,
            blank_to_none(product.description),
            blank_to_none(product.sku),
            product.min_stock,
            product.id,
        ],
    )?;
    if changed == 0 {
        return Err(AppError::NotFound(format!("Product {}", product.id)));
    }
    tracing::info!(id = product.id, stock = product.stock, "updated product");

    get_product(conn, product.id)
}

/// Distinct non-empty brands, sorted.
pub fn get_brands(conn: &Connection) -> AppResult<Vec<String>> {
    let mut stmt =
        conn.prepare("SELECT DISTINCT brand FROM products WHERE brand <> '' ORDER BY brand")?;
    let brands = stmt
        .query_map([], |row| row.get(0))?
        .collect::<Result<Vec<String>, _>>()?;
    Ok(brands)
}

pub fn get_products_by_brand(conn: &Connection, brand: &str) -> AppResult<Vec<Product>> {
    let mut stmt = conn.prepare(&format!("{SELECT_PRODUCT} WHERE brand = ?1 ORDER BY id"))?;
    let products = stmt
        .query_map([brand], map_product)?
        .collect::<Result<Vec<_>, _>>()?;
    Ok(products)
}

/// Low and out-of-stock products, emptiest first.
pub fn get_low_stock(conn: &Connection) -> AppResult<Vec<Product>> {
    let mut products: Vec<Product> = list_products(conn)?
        .into_iter()
        .filter(|p| p.status.needs_attention())
        .collect();
    products.sort_by_key(|p| p.stock);
    Ok(products)
}

pub fn search_products(conn: &Connection, filter: &ProductFilter) -> AppResult<Vec<Product>> {
    let products = list_products(conn)?;
    Ok(filter.apply(&products))
}

#[derive(Debug, Serialize, Deserialize, Clone)]
pub struct ImportSummary {
    pub imported: usize,
    pub rejected: usize,
    pub skipped: usize,
    pub products: Vec<Product>,
}

pub fn preview_import(text: &str) -> AppResult<ParsedImport> {
    csv_import::parse_products(text)
}

/// Adds every valid row of the upload. Invalid rows are counted, not fatal.
pub fn import_products(conn: &Connection, text: &str) -> AppResult<ImportSummary> {
    let parsed = csv_import::parse_products(text)?;

    let tx = conn.unchecked_transaction()?;
    let mut products = Vec::new();
    for row in &parsed.rows {
        if let Some(new_product) = row.to_new_product() {
            products.push(create_product(&tx, new_product)?);
        }
    }
    tx.commit()?;

    let summary = ImportSummary {
        imported: products.len(),
        rejected: parsed.invalid_count(),
        skipped: parsed.skipped_lines.len(),
        products,
    };
    tracing::info!(
        imported = summary.imported,
        rejected = summary.rejected,
        skipped = summary.skipped,
        "bulk product import finished"
    );
    Ok(summary)
}
