use crate::csv_import::{self, ParsedImport};
use crate::db::DatabaseExt;
use crate::filters::ProductFilter;
use crate::models::{NewProduct, Product, UpdateProduct};
use crate::store::inventory::{self, ImportSummary};
use tauri::AppHandle;

#[tauri::command]
pub fn get_products(app: AppHandle) -> Result<Vec<Product>, String> {
    let db = app.db();
    let conn = db.conn.lock().map_err(|e| e.to_string())?;

    inventory::list_products(&conn).map_err(String::from)
}

#[tauri::command]
pub fn get_product(app: AppHandle, id: i64) -> Result<Product, String> {
    let db = app.db();
    let conn = db.conn.lock().map_err(|e| e.to_string())?;

    inventory::get_product(&conn, id).map_err(String::from)
}

#[tauri::command]
pub fn create_product(app: AppHandle, product: NewProduct) -> Result<Product, String> {
    let db = app.db();
    let conn = db.conn.lock().map_err(|e| e.to_string())?;

    inventory::create_product(&conn, product).map_err(String::from)
}

#[tauri::command]
pub fn update_product(app: AppHandle, product: UpdateProduct) -> Result<Product, String> {
    let db = app.db();
    let conn = db.conn.lock().map_err(|e| e.to_string())?;

    inventory::update_product(&conn, product).map_err(String::from)
}

#[tauri::command]
pub fn get_brands(app: AppHandle) -> Result<Vec<String>, String> {
    let db = app.db();
    let conn = db.conn.lock().map_err(|e| e.to_string())?;

    inventory::get_brands(&conn).map_err(String::from)
}

#[tauri::command]
pub fn get_products_by_brand(app: AppHandle, brand: String) -> Result<Vec<Product>, String> {
    let db = app.db();
    let conn = db.conn.lock().map_err(|e| e.to_string())?;

    inventory::get_products_by_brand(&conn, &brand).map_err(String::from)
}

#[tauri::command]
pub fn get_low_stock(app: AppHandle) -> Result<Vec<Product>, String> {
    let db = app.db();
    let conn = db.conn.lock().map_err(|e| e.to_string())?;

    inventory::get_low_stock(&conn).map_err(String::from)
}

#[tauri::command]
pub fn search_products(app: AppHandle, filter: ProductFilter) -> Result<Vec<Product>, String> {
    let db = app.db();
    let conn = db.conn.lock().map_err(|e| e.to_string())?;

    inventory::search_products(&conn, &filter).map_err(String::from)
}

/// Parses an uploaded CSV without touching the database.
#[tauri::command]
pub fn preview_product_import(content: String) -> Result<ParsedImport, String> {
    inventory::preview_import(&content).map_err(String::from)
}

#[tauri::command]
pub fn import_products(app: AppHandle, content: String) -> Result<ImportSummary, String> {
    let db = app.db();
    let conn = db.conn.lock().map_err(|e| e.to_string())?;

    inventory::import_products(&conn, &content).map_err(String::from)
}

#[tauri::command]
pub fn get_import_template() -> String {
    csv_import::template()
}
