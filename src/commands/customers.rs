use crate::db::DatabaseExt;
use crate::filters::CustomerFilter;
use crate::models::{Customer, NewCustomer};
use crate::store::customers;
use tauri::AppHandle;

#[tauri::command]
pub fn get_customers(app: AppHandle) -> Result<Vec<Customer>, String> {
    let db = app.db();
    let conn = db.conn.lock().map_err(|e| e.to_string())?;

    customers::list_customers(&conn).map_err(String::from)
}

#[tauri::command]
pub fn get_customer(app: AppHandle, id: i64) -> Result<Customer, String> {
    let db = app.db();
    let conn = db.conn.lock().map_err(|e| e.to_string())?;

    customers::get_customer(&conn, id).map_err(String::from)
}

#[tauri::command]
pub fn create_customer(app: AppHandle, customer: NewCustomer) -> Result<Customer, String> {
    let db = app.db();
    let conn = db.conn.lock().map_err(|e| e.to_string())?;

    customers::create_customer(&conn, customer).map_err(String::from)
}

#[tauri::command]
pub fn update_customer(app: AppHandle, customer: Customer) -> Result<Customer, String> {
    let db = app.db();
    let conn = db.conn.lock().map_err(|e| e.to_string())?;

    customers::update_customer(&conn, customer).map_err(String::from)
}

#[tauri::command]
pub fn search_customers(app: AppHandle, filter: CustomerFilter) -> Result<Vec<Customer>, String> {
    let db = app.db();
    let conn = db.conn.lock().map_err(|e| e.to_string())?;

    customers::search_customers(&conn, &filter).map_err(String::from)
}
