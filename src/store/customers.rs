use rusqlite::{params, Connection, OptionalExtension, Row};

use crate::error::{AppError, AppResult};
use crate::filters::CustomerFilter;
use crate::models::{Customer, NewCustomer};

use super::{blank_to_none, next_id};

const SELECT_CUSTOMER: &str =
    "SELECT id, name, company, email, phone, address, gstin, notes FROM customers";

fn map_customer(row: &Row) -> rusqlite::Result<Customer> {
    Ok(Customer {
        id: row.get(0)?,
        name: row.get(1)?,
        company: row.get(2)?,
        email: row.get(3)?,
        phone: row.get(4)?,
        address: row.get(5)?,
        gstin: row.get(6)?,
        notes: row.get(7)?,
    })
}

fn validate(name: &str) -> AppResult<()> {
    if name.trim().is_empty() {
        tracing::warn!("rejected customer without a name");
        return Err(AppError::Validation("Customer name is required".to_string()));
    }
    Ok(())
}

pub fn list_customers(conn: &Connection) -> AppResult<Vec<Customer>> {
    let mut stmt = conn.prepare(&format!("{SELECT_CUSTOMER} ORDER BY id"))?;
    let customers = stmt
        .query_map([], map_customer)?
        .collect::<Result<Vec<_>, _>>()?;
    Ok(customers)
}

pub fn find_customer(conn: &Connection, id: i64) -> AppResult<Option<Customer>> {
    let customer = conn
        .query_row(&format!("{SELECT_CUSTOMER} WHERE id = ?1"), [id], map_customer)
        .optional()?;
    Ok(customer)
}

pub fn get_customer(conn: &Connection, id: i64) -> AppResult<Customer> {
    find_customer(conn, id)?.ok_or_else(|| AppError::NotFound(format!("Customer {id}")))
}

pub fn create_customer(conn: &Connection, customer: NewCustomer) -> AppResult<Customer> {
    validate(&customer.name)?;

    let id = next_id(conn, "customers")?;
    conn.execute(
        "INSERT INTO customers (id, name, company, email, phone, address, gstin, notes)
         VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8)",
        params![
            id,
            customer.name.trim(),
            customer.company.trim(),
            customer.email.trim(),
            customer.phone.trim(),
            customer.address.trim(),
            blank_to_none(customer.gstin),
            blank_to_none(customer.notes),
        ],
    )?;
    tracing::info!(id, "created customer");

    get_customer(conn, id)
}

pub fn update_customer(conn: &Connection, customer: Customer) -> AppResult<Customer> {
    validate(&customer.name)?;

    let changed = conn.execute(
        "UPDATE customers SET name = ?1, company = ?2, email = ?3, phone = ?4, address = ?5,
         gstin = ?6, notes = ?7 WHERE id = ?8",
        params![
            customer.name.trim(),
            customer.company.trim(),
            customer.email.trim(),
            customer.phone.trim(),
            customer.address.trim(),
            blank_to_none(customer.gstin),
            blank_to_none(customer.notes),
            customer.id,
        ],
    )?;
    if changed == 0 {
        return Err(AppError::NotFound(format!("Customer {}", customer.id)));
    }
    tracing::info!(id = customer.id, "updated customer");

    get_customer(conn, customer.id)
}

pub fn search_customers(conn: &Connection, filter: &CustomerFilter) -> AppResult<Vec<Customer>> {
    let customers = list_customers(conn)?;
    Ok(filter.apply(&customers))
}
