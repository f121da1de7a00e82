use chrono::NaiveDate;
use rusqlite::{params, Connection};

use crate::error::{AppError, AppResult};
use crate::filters::{InvoiceFilter, INVOICE_DATE_FORMAT};
use crate::models::{Invoice, InvoiceItem, InvoiceStatus, NewInvoice, UpdateInvoice};
use crate::money;

use super::blank_to_none;
use super::customers::find_customer;

pub const UNKNOWN_CUSTOMER: &str = "Unknown Customer";

struct InvoiceRow {
    id: String,
    customer_id: i64,
    customer_name: String,
    issue_date: String,
    amount: f64,
    status: String,
    notes: Option<String>,
}

fn display_date(stored: &str) -> String {
    NaiveDate::parse_from_str(stored, "%Y-%m-%d")
        .map(|d| d.format(INVOICE_DATE_FORMAT).to_string())
        .unwrap_or_else(|_| stored.to_string())
}

fn load_items(conn: &Connection, invoice_id: &str) -> AppResult<Vec<InvoiceItem>> {
    let mut stmt = conn.prepare(
        "SELECT product_id, description, quantity, price
         FROM invoice_items
         WHERE invoice_id = ?1
         ORDER BY position",
    )?;

    let items = stmt
        .query_map([invoice_id], |row| {
            let price: f64 = row.get(3)?;
            Ok(InvoiceItem {
                product_id: row.get(0)?,
                description: row.get(1)?,
                quantity: row.get(2)?,
                price: money::format_plain(price),
            })
        })?
        .collect::<Result<Vec<_>, _>>()?;
    Ok(items)
}

fn hydrate(conn: &Connection, row: InvoiceRow) -> AppResult<Invoice> {
    let items = load_items(conn, &row.id)?;
    Ok(Invoice {
        customer_id: row.customer_id,
        customer_name: row.customer_name,
        date: display_date(&row.issue_date),
        amount: money::format_inr(row.amount),
        status: InvoiceStatus::from_db(&row.status).unwrap_or(InvoiceStatus::Pending),
        items,
        notes: row.notes,
        id: row.id,
    })
}

fn query_rows(conn: &Connection, sql: &str, args: &[&dyn rusqlite::ToSql]) -> AppResult<Vec<InvoiceRow>> {
    let mut stmt = conn.prepare(sql)?;
    let rows = stmt
        .query_map(args, |row| {
            Ok(InvoiceRow {
                id: row.get(0)?,
                customer_id: row.get(1)?,
                customer_name: row.get(2)?,
                issue_date: row.get(3)?,
                amount: row.get(4)?,
                status: row.get(5)?,
                notes: row.get(6)?,
            })
        })?
        .collect::<Result<Vec<_>, _>>()?;
    Ok(rows)
}

const SELECT_INVOICE: &str =
    "SELECT id, customer_id, customer_name, issue_date, amount, status, notes FROM invoices";

/// Newest first.
pub fn list_invoices(conn: &Connection) -> AppResult<Vec<Invoice>> {
    query_rows(conn, &format!("{SELECT_INVOICE} ORDER BY seq DESC"), &[])?
        .into_iter()
        .map(|row| hydrate(conn, row))
        .collect()
}

pub fn recent_invoices(conn: &Connection, limit: u32) -> AppResult<Vec<Invoice>> {
    query_rows(
        conn,
        &format!("{SELECT_INVOICE} ORDER BY seq DESC LIMIT ?1"),
        &[&limit],
    )?
    .into_iter()
    .map(|row| hydrate(conn, row))
    .collect()
}

pub fn get_invoice(conn: &Connection, id: &str) -> AppResult<Invoice> {
    let row = query_rows(conn, &format!("{SELECT_INVOICE} WHERE id = ?1"), &[&id])?
        .into_iter()
        .next()
        .ok_or_else(|| AppError::NotFound(format!("Invoice {id}")))?;
    hydrate(conn, row)
}

struct PricedItem {
    product_id: i64,
    description: String,
    quantity: i32,
    price: f64,
}

/// Drops blank rows (no product picked) and checks the rest.
fn price_items(customer_id: i64, items: &[InvoiceItem]) -> AppResult<Vec<PricedItem>> {
    if customer_id <= 0 {
        return Err(AppError::Validation("Please select a customer".to_string()));
    }

    let priced = items
        .iter()
        .filter(|item| item.product_id != 0)
        .map(|item| {
            if item.quantity <= 0 {
                return Err(AppError::Validation(format!(
                    "Quantity for {} must be at least 1",
                    item.description
                )));
            }
            let price = money::parse_amount(&item.price)
                .filter(|p| *p >= 0.0)
                .ok_or_else(|| {
                    AppError::Validation(format!("Invalid price for {}", item.description))
                })?;
            Ok(PricedItem {
                product_id: item.product_id,
                description: item.description.trim().to_string(),
                quantity: item.quantity,
                price,
            })
        })
        .collect::<AppResult<Vec<_>>>()?;

    if priced.is_empty() {
        return Err(AppError::Validation("Please add at least one item".to_string()));
    }
    Ok(priced)
}

fn total_of(items: &[PricedItem]) -> f64 {
    items.iter().map(|i| i.price * i.quantity as f64).sum()
}

fn customer_label(conn: &Connection, customer_id: i64) -> AppResult<String> {
    Ok(find_customer(conn, customer_id)?
        .map(|c| c.display_name())
        .unwrap_or_else(|| UNKNOWN_CUSTOMER.to_string()))
}

fn insert_items(conn: &Connection, invoice_id: &str, items: &[PricedItem]) -> AppResult<()> {
    for (position, item) in items.iter().enumerate() {
        conn.execute(
            "INSERT INTO invoice_items (invoice_id, position, product_id, description, quantity, price)
             VALUES (?1, ?2, ?3, ?4, ?5, ?6)",
            params![
                invoice_id,
                position as i64,
                item.product_id,
                item.description,
                item.quantity,
                item.price
            ],
        )?;
    }
    Ok(())
}

pub fn create_invoice(conn: &Connection, invoice: NewInvoice) -> AppResult<Invoice> {
    let items = price_items(invoice.customer_id, &invoice.items)?;
    let total = total_of(&items);
    let customer_name = customer_label(conn, invoice.customer_id)?;
    let date = invoice
        .date
        .unwrap_or_else(|| chrono::Local::now().date_naive());
    let status = invoice.status.unwrap_or(InvoiceStatus::Pending);

    let tx = conn.unchecked_transaction()?;

    let seq: i64 = tx.query_row("SELECT COALESCE(MAX(seq), 0) + 1 FROM invoices", [], |row| {
        row.get(0)
    })?;
    let id = format!("INV-{seq:03}");

    tx.execute(
        "INSERT INTO invoices (id, seq, customer_id, customer_name, issue_date, amount, status, notes)
         VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8)",
        params![
            id,
            seq,
            invoice.customer_id,
            customer_name,
            date.format("%Y-%m-%d").to_string(),
            total,
            status.as_str(),
            blank_to_none(invoice.notes),
        ],
    )?;
    insert_items(&tx, &id, &items)?;
    tx.commit()?;

    tracing::info!(id = %id, customer_id = invoice.customer_id, total, "created invoice");
    get_invoice(conn, &id)
}

/// Rewrites customer, items, notes and status. Id and date stay.
pub fn update_invoice(conn: &Connection, invoice: UpdateInvoice) -> AppResult<Invoice> {
    let items = price_items(invoice.customer_id, &invoice.items)?;
    let total = total_of(&items);
    let customer_name = customer_label(conn, invoice.customer_id)?;

    let tx = conn.unchecked_transaction()?;
    let changed = tx.execute(
        "UPDATE invoices SET customer_id = ?1, customer_name = ?2, amount = ?3, status = ?4, notes = ?5
         WHERE id = ?6",
        params![
            invoice.customer_id,
            customer_name,
            total,
            invoice.status.as_str(),
            blank_to_none(invoice.notes),
            invoice.id,
        ],
    )?;
    if changed == 0 {
        return Err(AppError::NotFound(format!("Invoice {}", invoice.id)));
    }
    tx.execute("DELETE FROM invoice_items WHERE invoice_id = ?1", [&invoice.id])?;
    insert_items(&tx, &invoice.id, &items)?;
    tx.commit()?;

    tracing::info!(id = %invoice.id, total, "updated invoice");
    get_invoice(conn, &invoice.id)
}

pub fn set_invoice_status(conn: &Connection, id: &str, status: InvoiceStatus) -> AppResult<Invoice> {
    let changed = conn.execute(
        "UPDATE invoices SET status = ?1 WHERE id = ?2",
        params![status.as_str(), id],
    )?;
    if changed == 0 {
        return Err(AppError::NotFound(format!("Invoice {id}")));
    }
    tracing::info!(id, status = status.as_str(), "changed invoice status");
    get_invoice(conn, id)
}

pub fn search_invoices(conn: &Connection, filter: &InvoiceFilter) -> AppResult<Vec<Invoice>> {
    let invoices = list_invoices(conn)?;
    Ok(filter.apply(&invoices))
}

