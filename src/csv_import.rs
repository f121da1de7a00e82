//! Bulk product upload from CSV text.
//!
//! Rows are validated independently; a bad row carries its errors and is left
//! out of the import, it never aborts the file. Only a missing header or a
//! file without data rows is fatal.

use serde::{Deserialize, Serialize};

use crate::error::{AppError, AppResult};
use crate::models::{NewProduct, StockStatus};
use crate::money;

pub const REQUIRED_COLUMNS: [&str; 4] = ["name", "category", "price", "stock"];
pub const OPTIONAL_COLUMNS: [&str; 4] = ["description", "sku", "minstock", "brand"];
pub const VALID_CATEGORIES: [&str; 4] = ["Electronics", "Furniture", "Accessories", "Supplies"];

#[derive(Debug, Serialize, Deserialize, Clone, PartialEq)]
pub struct ParsedProduct {
    /// 1-based line in the uploaded file.
    pub line: usize,
    pub name: String,
    pub brand: String,
    pub category: String,
    /// Formatted when valid, the raw cell otherwise.
    pub price: String,
    pub stock: i32,
    pub description: Option<String>,
    pub sku: Option<String>,
    pub min_stock: Option<i32>,
    pub status: StockStatus,
    pub errors: Vec<String>,
    #[serde(skip)]
    price_value: Option<f64>,
}

impl ParsedProduct {
    pub fn is_valid(&self) -> bool {
        self.errors.is_empty()
    }

    pub fn to_new_product(&self) -> Option<NewProduct> {
        if !self.is_valid() {
            return None;
        }
        Some(NewProduct {
            name: self.name.clone(),
            brand: self.brand.clone(),
            category: self.category.clone(),
            stock: self.stock,
            price: self.price_value?,
            description: self.description.clone(),
            sku: self.sku.clone(),
            min_stock: self.min_stock,
        })
    }
}

#[derive(Debug, Serialize, Deserialize, Clone, Default)]
pub struct ParsedImport {
    pub rows: Vec<ParsedProduct>,
    /// Lines dropped because their field count differs from the header.
    pub skipped_lines: Vec<usize>,
}

impl ParsedImport {
    pub fn valid_count(&self) -> usize {
        self.rows.iter().filter(|r| r.is_valid()).count()
    }

    pub fn invalid_count(&self) -> usize {
        self.rows.len() - self.valid_count()
    }
}

/// Splits one record on commas. Double-quoted fields may contain commas and
/// `""` for a literal quote.
pub fn split_record(line: &str) -> Vec<String> {
    let mut fields = Vec::new();
    let mut current = String::new();
    let mut in_quotes = false;
    let mut chars = line.chars().peekable();

    while let Some(c) = chars.next() {
        match c {
            '"' if in_quotes && chars.peek() == Some(&'"') => {
                current.push('"');
                chars.next();
            }
            '"' => in_quotes = !in_quotes,
            ',' if !in_quotes => {
                fields.push(current.trim().to_string());
                current.clear();
            }
            _ => current.push(c),
        }
    }
    fields.push(current.trim().to_string());
    fields
}

fn non_empty(value: &str) -> Option<String> {
    if value.is_empty() {
        None
    } else {
        Some(value.to_string())
    }
}

pub fn parse_products(text: &str) -> AppResult<ParsedImport> {
    // UTF-8 byte-order mark
    let text = text.strip_prefix('\u{FEFF}').unwrap_or(text);
    let lines: Vec<(usize, &str)> = text
        .lines()
        .enumerate()
        .filter(|(_, l)| !l.trim().is_empty())
        .map(|(i, l)| (i + 1, l))
        .collect();

    if lines.len() < 2 {
        return Err(AppError::Import(
            "File must contain at least a header row and one data row".to_string(),
        ));
    }

    let headers: Vec<String> = split_record(lines[0].1)
        .into_iter()
        .map(|h| h.to_lowercase())
        .collect();

    let missing: Vec<&str> = REQUIRED_COLUMNS
        .iter()
        .copied()
        .filter(|col| !headers.iter().any(|h| h == col))
        .collect();
    if !missing.is_empty() {
        return Err(AppError::Import(format!(
            "Missing required columns: {}",
            missing.join(", ")
        )));
    }

    let mut parsed = ParsedImport::default();

    for (line_no, line) in lines.into_iter().skip(1) {
        let values = split_record(line);
        if values.len() != headers.len() {
            tracing::debug!(line = line_no, "skipping row with mismatched column count");
            parsed.skipped_lines.push(line_no);
            continue;
        }
        parsed.rows.push(parse_row(line_no, &headers, &values));
    }

    Ok(parsed)
}

fn parse_row(line: usize, headers: &[String], values: &[String]) -> ParsedProduct {
    let mut row = ParsedProduct {
        line,
        name: String::new(),
        brand: String::new(),
        category: String::new(),
        price: String::new(),
        stock: 0,
        description: None,
        sku: None,
        min_stock: None,
        status: StockStatus::OutOfStock,
        errors: Vec::new(),
        price_value: None,
    };

    for (header, value) in headers.iter().zip(values) {
        let value = value.as_str();
        match header.as_str() {
            "name" => {
                row.name = value.to_string();
                if value.is_empty() {
                    row.errors.push("Name is required".to_string());
                }
            }
            "category" => {
                row.category = value.to_string();
                if value.is_empty() {
                    row.errors.push("Category is required".to_string());
                } else if !VALID_CATEGORIES.contains(&value) {
                    row.errors.push(format!(
                        "Invalid category. Must be one of: {}",
                        VALID_CATEGORIES.join(", ")
                    ));
                }
            }
            "price" => match money::parse_amount(value).filter(|p| *p >= 0.0) {
                Some(price) => {
                    row.price = money::format_inr(price);
                    row.price_value = Some(price);
                }
                None => {
                    row.price = value.to_string();
                    row.errors.push("Price must be a valid positive number".to_string());
                }
            },
            "stock" => match value.parse::<i32>() {
                Ok(stock) if stock >= 0 => row.stock = stock,
                _ => row
                    .errors
                    .push("Stock must be a valid non-negative number".to_string()),
            },
            "description" => row.description = non_empty(value),
            "sku" => row.sku = non_empty(value),
            "brand" => row.brand = value.to_string(),
            "minstock" => {
                row.min_stock = value.parse::<i32>().ok().filter(|m| *m >= 0);
            }
            _ => {}
        }
    }

    row.status = StockStatus::derive(row.stock, row.min_stock);
    row
}

/// Header plus two sample rows, offered as a download next to the upload form.
pub fn template() -> String {
    [
        "name,category,price,stock,description,sku,minStock,brand",
        "Pavilion 15,Electronics,58999,15,High-performance laptop,HP-PAV-001,5,HP",
        "Standing Desk Pro,Furniture,12499,8,\"Adjustable height, office use\",IKEA-DESK-001,3,IKEA",
    ]
    .join("\n")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_split_record_plain_and_quoted() {
        assert_eq!(split_record("a, b ,c"), vec!["a", "b", "c"]);
        assert_eq!(
            split_record(r#"Desk,"Tall, adjustable","He said ""hi""""#),
            vec!["Desk", "Tall, adjustable", r#"He said "hi""#]
        );
        assert_eq!(split_record("a,,"), vec!["a", "", ""]);
    }

    #[test]
    fn test_ignores_byte_order_mark() {
        let parsed =
            parse_products("\u{FEFF}name,category,price,stock\nMouse,Accessories,999,45").unwrap();
        assert_eq!(parsed.valid_count(), 1);
        assert_eq!(parsed.rows[0].name, "Mouse");
    }

    #[test]
    fn test_zero_min_stock_uses_default_threshold() {
        let parsed =
            parse_products("name,category,price,stock,minstock\nHub,Accessories,10,3,0").unwrap();
        assert_eq!(parsed.rows[0].status, StockStatus::LowStock);
    }

    #[test]
    fn test_requires_header_and_data_row() {
        let err = parse_products("name,category,price,stock\n\n   \n").unwrap_err();
        assert!(err.to_string().contains("at least a header row"));
    }

    #[test]
    fn test_reports_missing_required_columns() {
        let err = parse_products("Name,Price\nMouse,100").unwrap_err();
        assert_eq!(err.to_string(), "Missing required columns: category, stock");
    }

    #[test]
    fn test_parses_valid_rows_and_derives_status() {
        let text = "NAME,Category,Price,Stock,minStock\n\
                    Mouse,Accessories,999,45,15\n\
                    Dock,Accessories,4599,3,\n\
                    Chair,Furniture,8999,0,2";
        let parsed = parse_products(text).unwrap();

        assert_eq!(parsed.rows.len(), 3);
        assert_eq!(parsed.valid_count(), 3);

        let mouse = &parsed.rows[0];
        assert_eq!(mouse.line, 2);
        assert_eq!(mouse.price, "₹999");
        assert_eq!(mouse.min_stock, Some(15));
        assert_eq!(mouse.status, StockStatus::InStock);

        assert_eq!(parsed.rows[1].min_stock, None);
        assert_eq!(parsed.rows[1].status, StockStatus::LowStock);
        assert_eq!(parsed.rows[2].status, StockStatus::OutOfStock);
    }

    #[test]
    fn test_row_level_errors() {
        let text = "name,category,price,stock\n\
                    ,Toys,-5,abc\n\
                    Lamp,Supplies,1200,4";
        let parsed = parse_products(text).unwrap();

        let bad = &parsed.rows[0];
        assert!(!bad.is_valid());
        assert_eq!(bad.errors.len(), 4);
        assert!(bad.errors[0].contains("Name is required"));
        assert!(bad.errors[1].starts_with("Invalid category"));
        assert_eq!(bad.price, "-5");
        assert!(bad.to_new_product().is_none());

        let good = parsed.rows[1].to_new_product().unwrap();
        assert_eq!(good.name, "Lamp");
        assert!((good.price - 1200.0).abs() < f64::EPSILON);
        assert_eq!(parsed.invalid_count(), 1);
    }

    #[test]
    fn test_skips_rows_with_wrong_field_count() {
        let text = "name,category,price,stock\n\
                    Mouse,Accessories,999\n\
                    \n\
                    Desk,Furniture,12499,8";
        let parsed = parse_products(text).unwrap();
        assert_eq!(parsed.skipped_lines, vec![2]);
        assert_eq!(parsed.rows.len(), 1);
        assert_eq!(parsed.rows[0].line, 4);
    }

    #[test]
    fn test_template_parses_cleanly() {
        let parsed = parse_products(&template()).unwrap();
        assert_eq!(parsed.rows.len(), 2);
        assert_eq!(parsed.valid_count(), 2);
        assert_eq!(
            parsed.rows[1].description.as_deref(),
            Some("Adjustable height, office use")
        );
        assert_eq!(parsed.rows[0].brand, "HP");
    }
}
