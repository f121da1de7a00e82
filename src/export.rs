//! CSV, Excel-compatible and printable HTML exports of list views.

use std::path::{Path, PathBuf};

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use crate::error::{AppError, AppResult};
use crate::models::{Customer, Invoice, Product, StockStatus};
use crate::money;

const NO_DATA: &str = "No data to export";

#[derive(Debug, Serialize, Deserialize, Clone, Copy, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum ExportFormat {
    Csv,
    Excel,
    Print,
}

impl ExportFormat {
    fn extension(&self) -> &'static str {
        match self {
            ExportFormat::Csv => "csv",
            ExportFormat::Excel => "xls",
            ExportFormat::Print => "html",
        }
    }

    fn mime_type(&self) -> &'static str {
        match self {
            ExportFormat::Csv => "text/csv;charset=utf-8",
            ExportFormat::Excel => "application/vnd.ms-excel;charset=utf-8",
            ExportFormat::Print => "text/html;charset=utf-8",
        }
    }
}

/// Whether an export covers the whole list or only what the current filter shows.
#[derive(Debug, Serialize, Deserialize, Clone, Copy, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum ExportScope {
    All,
    Filtered,
}

#[derive(Debug, Serialize, Deserialize, Clone, PartialEq)]
pub struct ExportDocument {
    pub filename: String,
    pub mime_type: String,
    pub content: String,
}

#[derive(Debug, Clone, PartialEq)]
pub struct Table {
    pub headers: Vec<String>,
    pub rows: Vec<Vec<String>>,
}

impl Table {
    fn new(headers: &[&str]) -> Self {
        Self {
            headers: headers.iter().map(|h| h.to_string()).collect(),
            rows: Vec::new(),
        }
    }

    fn ensure_rows(&self) -> AppResult<()> {
        if self.rows.is_empty() {
            return Err(AppError::Validation(NO_DATA.to_string()));
        }
        Ok(())
    }
}

fn csv_field(value: &str) -> String {
    if value.contains([',', '"', '\n', '\r']) {
        format!("\"{}\"", value.replace('"', "\"\""))
    } else {
        value.to_string()
    }
}

pub fn to_csv(table: &Table) -> AppResult<String> {
    table.ensure_rows()?;

    let lines = std::iter::once(&table.headers)
        .chain(table.rows.iter())
        .map(|row| row.iter().map(|f| csv_field(f)).collect::<Vec<_>>().join(","));
    Ok(lines.collect::<Vec<_>>().join("\n"))
}

fn is_numeric(value: &str) -> bool {
    value.parse::<f64>().map_or(false, |v| v.is_finite())
}

/// Tab separated with a UTF-8 BOM so spreadsheet apps pick the right encoding.
/// Text cells are quoted; bare numbers are not.
pub fn to_excel(table: &Table) -> AppResult<String> {
    table.ensure_rows()?;

    let cell = |value: &String| {
        if is_numeric(value) {
            value.clone()
        } else {
            format!("\"{}\"", value.replace('"', "\"\""))
        }
    };

    let mut out = String::from('\u{FEFF}');
    out.push_str(&table.headers.join("\t"));
    for row in &table.rows {
        out.push('\n');
        out.push_str(&row.iter().map(cell).collect::<Vec<_>>().join("\t"));
    }
    Ok(out)
}

pub fn escape_html(value: &str) -> String {
    let mut out = String::with_capacity(value.len());
    for c in value.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&#39;"),
            _ => out.push(c),
        }
    }
    out
}

pub fn inventory_table(products: &[Product], include_details: bool) -> Table {
    let mut headers = vec!["Product Name", "Category", "Stock", "Price", "Status"];
    if include_details {
        headers.extend(["SKU", "Description", "Min Stock"]);
    }

    let mut table = Table::new(&headers);
    for p in products {
        let mut row = vec![
            p.name.clone(),
            p.category.clone(),
            p.stock.to_string(),
            p.price.clone(),
            p.status.as_str().to_string(),
        ];
        if include_details {
            row.push(p.sku.clone().unwrap_or_default());
            row.push(p.description.clone().unwrap_or_default());
            row.push(p.min_stock.map(|m| m.to_string()).unwrap_or_default());
        }
        table.rows.push(row);
    }
    table
}

pub fn invoice_table(invoices: &[Invoice]) -> Table {
    let mut table = Table::new(&["Invoice ID", "Customer", "Date", "Amount", "Status"]);
    for i in invoices {
        table.rows.push(vec![
            i.id.clone(),
            i.customer_name.clone(),
            i.date.clone(),
            i.amount.clone(),
            i.status.as_str().to_string(),
        ]);
    }
    table
}

pub fn customer_table(customers: &[Customer]) -> Table {
    let mut table = Table::new(&["Name", "Company", "Email", "Phone", "Address", "GSTIN"]);
    for c in customers {
        table.rows.push(vec![
            c.name.clone(),
            c.company.clone(),
            c.email.clone(),
            c.phone.clone(),
            c.address.clone(),
            c.gstin.clone().unwrap_or_default(),
        ]);
    }
    table
}

struct HtmlRow {
    cells: Vec<String>,
    /// CSS class for the cell at this index.
    marked: Option<(usize, &'static str)>,
}

fn render_html(
    title: &str,
    generated_on: NaiveDate,
    summary: &[(&str, String)],
    headers: &[&str],
    rows: &[HtmlRow],
) -> String {
    let mut html = String::new();
    html.push_str("<!DOCTYPE html>\n<html>\n<head>\n");
    html.push_str(&format!("<title>{}</title>\n", escape_html(title)));
    html.push_str(
        "<style>
  body { font-family: Arial, sans-serif; margin: 20px; }
  table { width: 100%; border-collapse: collapse; margin-top: 20px; }
  th, td { border: 1px solid #ddd; padding: 8px; text-align: left; }
  th { background-color: #f2f2f2; font-weight: bold; }
  .header { text-align: center; margin-bottom: 30px; }
  .summary { margin-bottom: 20px; }
  .status-in-stock { color: #059669; }
  .status-low-stock { color: #d97706; }
  .status-out-of-stock { color: #dc2626; }
  @media print { body { margin: 0; } .no-print { display: none; } }
</style>\n</head>\n<body>\n",
    );

    html.push_str(&format!(
        "<div class=\"header\">\n<h1>{}</h1>\n<p>Generated on {}</p>\n</div>\n",
        escape_html(title),
        generated_on.format("%d/%m/%Y")
    ));

    html.push_str("<div class=\"summary\">\n");
    for (label, value) in summary {
        html.push_str(&format!(
            "<p><strong>{}:</strong> {}</p>\n",
            escape_html(label),
            escape_html(value)
        ));
    }
    html.push_str("</div>\n<table>\n<thead>\n<tr>");
    for h in headers {
        html.push_str(&format!("<th>{}</th>", escape_html(h)));
    }
    html.push_str("</tr>\n</thead>\n<tbody>\n");

    for row in rows {
        html.push_str("<tr>");
        for (idx, cell) in row.cells.iter().enumerate() {
            match row.marked {
                Some((marked, class)) if marked == idx => {
                    html.push_str(&format!("<td class=\"{class}\">{}</td>", escape_html(cell)))
                }
                _ => html.push_str(&format!("<td>{}</td>", escape_html(cell))),
            }
        }
        html.push_str("</tr>\n");
    }

    html.push_str(
        "</tbody>\n</table>\n<div class=\"no-print\" style=\"margin-top: 20px; text-align: center;\">\n\
         <button onclick=\"window.print()\">Print</button>\n\
         <button onclick=\"window.close()\">Close</button>\n</div>\n</body>\n</html>\n",
    );
    html
}

pub fn invoice_report_html(invoices: &[Invoice], generated_on: NaiveDate) -> String {
    let total: f64 = invoices.iter().map(|i| i.amount_value()).sum();
    let summary = [
        ("Total Invoices", invoices.len().to_string()),
        ("Total Amount", money::format_inr(total)),
    ];
    let rows: Vec<HtmlRow> = invoice_table(invoices)
        .rows
        .into_iter()
        .map(|cells| HtmlRow { cells, marked: None })
        .collect();

    render_html(
        "Invoice Report",
        generated_on,
        &summary,
        &["Invoice ID", "Customer", "Date", "Amount", "Status"],
        &rows,
    )
}

pub fn inventory_report_html(products: &[Product], generated_on: NaiveDate) -> String {
    let total_value: f64 = products.iter().map(|p| p.stock_value()).sum();
    let count = |status: StockStatus| products.iter().filter(|p| p.status == status).count();
    let summary = [
        ("Total Products", products.len().to_string()),
        ("Total Inventory Value", money::format_inr(total_value)),
        ("Low Stock Items", count(StockStatus::LowStock).to_string()),
        ("Out of Stock Items", count(StockStatus::OutOfStock).to_string()),
    ];

    let rows: Vec<HtmlRow> = products
        .iter()
        .map(|p| HtmlRow {
            cells: vec![
                p.name.clone(),
                p.category.clone(),
                p.stock.to_string(),
                p.price.clone(),
                p.status.as_str().to_string(),
                money::format_inr(p.stock_value()),
            ],
            marked: Some((4, p.status.css_class())),
        })
        .collect();

    render_html(
        "Inventory Report",
        generated_on,
        &summary,
        &["Product Name", "Category", "Stock", "Price", "Status", "Value"],
        &rows,
    )
}

pub fn customer_report_html(customers: &[Customer], generated_on: NaiveDate) -> String {
    let with_gstin = customers
        .iter()
        .filter(|c| c.gstin.as_deref().map_or(false, |g| !g.trim().is_empty()))
        .count();
    let summary = [
        ("Total Customers", customers.len().to_string()),
        ("Customers with GSTIN", with_gstin.to_string()),
    ];
    let table = customer_table(customers);
    let headers: Vec<&str> = table.headers.iter().map(String::as_str).collect();
    let rows: Vec<HtmlRow> = table
        .rows
        .iter()
        .map(|cells| HtmlRow {
            cells: cells.clone(),
            marked: None,
        })
        .collect();

    render_html("Customer Report", generated_on, &summary, &headers, &rows)
}

fn document(stem: &str, format: ExportFormat, today: NaiveDate, content: String) -> ExportDocument {
    ExportDocument {
        filename: format!("{stem}_{}.{}", today.format("%Y-%m-%d"), format.extension()),
        mime_type: format.mime_type().to_string(),
        content,
    }
}

pub fn export_inventory(
    products: &[Product],
    format: ExportFormat,
    include_details: bool,
    today: NaiveDate,
) -> AppResult<ExportDocument> {
    let content = match format {
        ExportFormat::Csv => to_csv(&inventory_table(products, include_details))?,
        ExportFormat::Excel => to_excel(&inventory_table(products, include_details))?,
        ExportFormat::Print => {
            if products.is_empty() {
                return Err(AppError::Validation(NO_DATA.to_string()));
            }
            inventory_report_html(products, today)
        }
    };
    Ok(document("inventory", format, today, content))
}

pub fn export_invoices(
    invoices: &[Invoice],
    format: ExportFormat,
    today: NaiveDate,
) -> AppResult<ExportDocument> {
    let content = match format {
        ExportFormat::Csv => to_csv(&invoice_table(invoices))?,
        ExportFormat::Excel => to_excel(&invoice_table(invoices))?,
        ExportFormat::Print => {
            if invoices.is_empty() {
                return Err(AppError::Validation(NO_DATA.to_string()));
            }
            invoice_report_html(invoices, today)
        }
    };
    Ok(document("invoices", format, today, content))
}

pub fn export_customers(
    customers: &[Customer],
    format: ExportFormat,
    today: NaiveDate,
) -> AppResult<ExportDocument> {
    let content = match format {
        ExportFormat::Csv => to_csv(&customer_table(customers))?,
        ExportFormat::Excel => to_excel(&customer_table(customers))?,
        ExportFormat::Print => {
            if customers.is_empty() {
                return Err(AppError::Validation(NO_DATA.to_string()));
            }
            customer_report_html(customers, today)
        }
    };
    Ok(document("customers", format, today, content))
}

fn sanitize_filename(input: &str) -> String {
    let cleaned: String = input
        .chars()
        .map(|ch| {
            if ch.is_ascii_alphanumeric() || matches!(ch, '-' | '_' | '.' | ' ') {
                ch
            } else {
                '_'
            }
        })
        .collect();
    let trimmed = cleaned.trim().trim_start_matches('.');
    if trimmed.is_empty() {
        "export".to_string()
    } else {
        trimmed.to_string()
    }
}

/// Writes the document into `dir` and returns the full path.
pub fn save_document(dir: &Path, doc: &ExportDocument) -> AppResult<PathBuf> {
    std::fs::create_dir_all(dir)?;
    let target = dir.join(sanitize_filename(&doc.filename));
    std::fs::write(&target, &doc.content)?;
    tracing::info!(path = %target.display(), bytes = doc.content.len(), "saved export");
    Ok(target)
}
