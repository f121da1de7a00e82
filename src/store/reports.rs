use std::collections::BTreeMap;

use chrono::{Datelike, Duration, NaiveDate};
use rusqlite::Connection;

use crate::error::{AppError, AppResult};
use crate::filters::InvoiceFilter;
use crate::models::{
    CustomerSummary, DashboardMetrics, InventoryReport, InvoiceStatus, MonthlySales, Report,
    ReportKind, ReportPeriod, SalesReport, StatusTotal, StockStatus, TopProduct,
};
use crate::money;

use super::{customers, inventory, invoices};

const MONTHS: [&str; 12] = [
    "Jan", "Feb", "Mar", "Apr", "May", "Jun", "Jul", "Aug", "Sep", "Oct", "Nov", "Dec",
];
const TOP_PRODUCTS: usize = 5;

pub fn dashboard_metrics(conn: &Connection) -> AppResult<DashboardMetrics> {
    let (total_sales, outstanding, total_invoices): (f64, f64, i64) = conn.query_row(
        "SELECT
            COALESCE(SUM(CASE WHEN status = 'Paid' THEN amount END), 0),
            COALESCE(SUM(CASE WHEN status IN ('Pending', 'Overdue') THEN amount END), 0),
            COUNT(*)
         FROM invoices",
        [],
        |row| Ok((row.get(0)?, row.get(1)?, row.get(2)?)),
    )?;

    let total_customers: i64 =
        conn.query_row("SELECT COUNT(*) FROM customers", [], |row| row.get(0))?;
    let total_products: i64 = conn.query_row("SELECT COUNT(*) FROM products", [], |row| row.get(0))?;
    let low_stock_products = inventory::get_low_stock(conn)?.len() as i64;

    Ok(DashboardMetrics {
        total_sales: money::format_inr(total_sales),
        outstanding: money::format_inr(outstanding),
        total_customers,
        total_products,
        low_stock_products,
        total_invoices,
    })
}

/// Invoiced totals per calendar month of `year`; months without invoices are zero.
pub fn monthly_sales(conn: &Connection, year: i32) -> AppResult<Vec<MonthlySales>> {
    let mut stmt = conn.prepare(
        "SELECT CAST(strftime('%m', issue_date) AS INTEGER), SUM(amount), COUNT(*)
         FROM invoices
         WHERE strftime('%Y', issue_date) = ?1
         GROUP BY 1",
    )?;

    let mut buckets: Vec<MonthlySales> = MONTHS
        .iter()
        .map(|m| MonthlySales {
            month: m.to_string(),
            total: 0.0,
            invoice_count: 0,
        })
        .collect();

    let rows = stmt
        .query_map([format!("{year:04}")], |row| {
            Ok((row.get::<_, i64>(0)?, row.get::<_, f64>(1)?, row.get::<_, i32>(2)?))
        })?
        .collect::<Result<Vec<_>, _>>()?;

    for (month, total, count) in rows {
        if let Some(bucket) = usize::try_from(month - 1).ok().and_then(|i| buckets.get_mut(i)) {
            bucket.total = total;
            bucket.invoice_count = count;
        }
    }

    Ok(buckets)
}

fn last_day_of_month(year: i32, month: u32) -> Option<NaiveDate> {
    let (next_year, next_month) = if month == 12 { (year + 1, 1) } else { (year, month + 1) };
    NaiveDate::from_ymd_opt(next_year, next_month, 1).map(|d| d - Duration::days(1))
}

/// Inclusive date range a period covers, relative to `today`.
pub fn period_range(period: ReportPeriod, today: NaiveDate) -> AppResult<(NaiveDate, NaiveDate)> {
    let invalid = || AppError::Validation("Invalid report period".to_string());

    let range = match period {
        ReportPeriod::Week => {
            let monday = today - Duration::days(today.weekday().num_days_from_monday() as i64);
            (monday, monday + Duration::days(6))
        }
        ReportPeriod::Month => {
            let first = today.with_day(1).ok_or_else(invalid)?;
            let last = last_day_of_month(today.year(), today.month()).ok_or_else(invalid)?;
            (first, last)
        }
        ReportPeriod::Quarter => {
            let first_month = (today.month0() / 3) * 3 + 1;
            let first = NaiveDate::from_ymd_opt(today.year(), first_month, 1).ok_or_else(invalid)?;
            let last = last_day_of_month(today.year(), first_month + 2).ok_or_else(invalid)?;
            (first, last)
        }
        ReportPeriod::Year => {
            let first = NaiveDate::from_ymd_opt(today.year(), 1, 1).ok_or_else(invalid)?;
            let last = NaiveDate::from_ymd_opt(today.year(), 12, 31).ok_or_else(invalid)?;
            (first, last)
        }
        ReportPeriod::Custom { from, to } => {
            if from > to {
                return Err(AppError::Validation(
                    "Report start date must not be after its end date".to_string(),
                ));
            }
            (from, to)
        }
    };
    Ok(range)
}

fn sales_report(conn: &Connection, from: NaiveDate, to: NaiveDate) -> AppResult<SalesReport> {
    let filter = InvoiceFilter {
        date_from: Some(from),
        date_to: Some(to),
        ..Default::default()
    };
    let in_range = invoices::search_invoices(conn, &filter)?;

    let by_status = [InvoiceStatus::Paid, InvoiceStatus::Pending, InvoiceStatus::Overdue]
        .into_iter()
        .map(|status| {
            let matching: Vec<_> = in_range.iter().filter(|i| i.status == status).collect();
            StatusTotal {
                status,
                count: matching.len() as i32,
                total: money::format_inr(matching.iter().map(|i| i.amount_value()).sum()),
            }
        })
        .collect();

    let mut products: BTreeMap<String, (i32, f64)> = BTreeMap::new();
    for item in in_range.iter().flat_map(|i| i.items.iter()) {
        let entry = products.entry(item.description.clone()).or_default();
        entry.0 += item.quantity;
        entry.1 += item.line_total().unwrap_or(0.0);
    }
    let mut ranked: Vec<(String, (i32, f64))> = products.into_iter().collect();
    ranked.sort_by(|a, b| b.1 .1.total_cmp(&a.1 .1));

    let top_products = ranked
        .into_iter()
        .take(TOP_PRODUCTS)
        .map(|(description, (quantity, revenue))| TopProduct {
            description,
            quantity,
            revenue: money::format_inr(revenue),
        })
        .collect();

    Ok(SalesReport {
        from,
        to,
        invoice_count: in_range.len() as i32,
        total: money::format_inr(in_range.iter().map(|i| i.amount_value()).sum()),
        by_status,
        top_products,
    })
}

fn inventory_report(conn: &Connection) -> AppResult<InventoryReport> {
    let products = inventory::list_products(conn)?;
    let count = |status: StockStatus| products.iter().filter(|p| p.status == status).count() as i32;

    Ok(InventoryReport {
        total_products: products.len() as i32,
        total_units: products.iter().map(|p| p.stock as i64).sum(),
        stock_value: money::format_inr(products.iter().map(|p| p.stock_value()).sum()),
        in_stock: count(StockStatus::InStock),
        low_stock: count(StockStatus::LowStock),
        out_of_stock: count(StockStatus::OutOfStock),
    })
}

fn customer_report(conn: &Connection, from: NaiveDate, to: NaiveDate) -> AppResult<Vec<CustomerSummary>> {
    let filter = InvoiceFilter {
        date_from: Some(from),
        date_to: Some(to),
        ..Default::default()
    };
    let in_range = invoices::search_invoices(conn, &filter)?;

    // customer id -> (name, count, total, outstanding)
    let mut totals: BTreeMap<i64, (String, i32, f64, f64)> = customers::list_customers(conn)?
        .into_iter()
        .map(|c| (c.id, (c.display_name(), 0, 0.0, 0.0)))
        .collect();

    for invoice in &in_range {
        let entry = totals
            .entry(invoice.customer_id)
            .or_insert_with(|| (invoice.customer_name.clone(), 0, 0.0, 0.0));
        let amount = invoice.amount_value();
        entry.1 += 1;
        entry.2 += amount;
        if invoice.status != InvoiceStatus::Paid {
            entry.3 += amount;
        }
    }

    let mut summaries: Vec<(i64, (String, i32, f64, f64))> = totals.into_iter().collect();
    summaries.sort_by(|a, b| b.1 .2.total_cmp(&a.1 .2));

    Ok(summaries
        .into_iter()
        .map(|(customer_id, (customer_name, invoice_count, total, outstanding))| CustomerSummary {
            customer_id,
            customer_name,
            invoice_count,
            total: money::format_inr(total),
            outstanding: money::format_inr(outstanding),
        })
        .collect())
}

pub fn generate_report(
    conn: &Connection,
    kind: ReportKind,
    period: ReportPeriod,
    today: NaiveDate,
) -> AppResult<Report> {
    let (from, to) = period_range(period, today)?;
    tracing::debug!(?kind, %from, %to, "generating report");

    let report = match kind {
        ReportKind::Sales => Report::Sales(sales_report(conn, from, to)?),
        ReportKind::Inventory => Report::Inventory(inventory_report(conn)?),
        ReportKind::Customer => Report::Customer {
            from,
            to,
            customers: customer_report(conn, from, to)?,
        },
    };
    Ok(report)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    #[test]
    fn test_period_ranges() {
        let today = date(2025, 6, 12); // Thursday
        assert_eq!(
            period_range(ReportPeriod::Week, today).unwrap(),
            (date(2025, 6, 9), date(2025, 6, 15))
        );
        assert_eq!(
            period_range(ReportPeriod::Month, today).unwrap(),
            (date(2025, 6, 1), date(2025, 6, 30))
        );
        assert_eq!(
            period_range(ReportPeriod::Quarter, today).unwrap(),
            (date(2025, 4, 1), date(2025, 6, 30))
        );
        assert_eq!(
            period_range(ReportPeriod::Year, today).unwrap(),
            (date(2025, 1, 1), date(2025, 12, 31))
        );
    }

    #[test]
    fn test_december_month_and_quarter() {
        let today = date(2024, 12, 3);
        assert_eq!(
            period_range(ReportPeriod::Month, today).unwrap(),
            (date(2024, 12, 1), date(2024, 12, 31))
        );
        assert_eq!(
            period_range(ReportPeriod::Quarter, today).unwrap(),
            (date(2024, 10, 1), date(2024, 12, 31))
        );
    }

    #[test]
    fn test_custom_range_must_be_ordered() {
        let bad = ReportPeriod::Custom {
            from: date(2025, 6, 2),
            to: date(2025, 6, 1),
        };
        assert!(period_range(bad, date(2025, 6, 12)).is_err());
    }
}
