//! List filters. Every predicate that is set must match; unset ones match
//! everything.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use crate::models::{Customer, Invoice, InvoiceStatus, Product, StockStatus};

pub const INVOICE_DATE_FORMAT: &str = "%d %b %Y";

/// Accepts the stored display form (`12 Jun 2025`), ISO dates and `dd/mm/yyyy`.
pub fn parse_invoice_date(input: &str) -> Option<NaiveDate> {
    let input = input.trim();
    [INVOICE_DATE_FORMAT, "%Y-%m-%d", "%d/%m/%Y"]
        .iter()
        .find_map(|fmt| NaiveDate::parse_from_str(input, fmt).ok())
}

fn contains_ci(haystack: &str, needle: &str) -> bool {
    haystack.to_lowercase().contains(&needle.to_lowercase())
}

fn term(value: &Option<String>) -> Option<&str> {
    value.as_deref().map(str::trim).filter(|s| !s.is_empty())
}

fn within<T: PartialOrd>(value: T, min: Option<T>, max: Option<T>) -> bool {
    min.map_or(true, |m| value >= m) && max.map_or(true, |m| value <= m)
}

#[derive(Debug, Serialize, Deserialize, Clone, Default)]
#[serde(default)]
pub struct ProductFilter {
    pub search: Option<String>,
    pub brand: Option<String>,
    pub category: Option<String>,
    pub status: Option<StockStatus>,
    pub price_min: Option<f64>,
    pub price_max: Option<f64>,
    pub stock_min: Option<i32>,
    pub stock_max: Option<i32>,
}

impl ProductFilter {
    pub fn is_active(&self) -> bool {
        term(&self.search).is_some()
            || term(&self.brand).is_some()
            || term(&self.category).is_some()
            || self.status.is_some()
            || self.price_min.is_some()
            || self.price_max.is_some()
            || self.stock_min.is_some()
            || self.stock_max.is_some()
    }

    pub fn matches(&self, product: &Product) -> bool {
        let matches_search = term(&self.search).map_or(true, |q| {
            contains_ci(&product.name, q)
                || contains_ci(&product.brand, q)
                || contains_ci(&product.category, q)
        });
        let matches_brand = term(&self.brand).map_or(true, |b| product.brand == b);
        let matches_category = term(&self.category).map_or(true, |c| product.category == c);
        let matches_status = self.status.map_or(true, |s| product.status == s);
        let matches_price = within(product.price_value(), self.price_min, self.price_max);
        let matches_stock = within(product.stock, self.stock_min, self.stock_max);

        matches_search
            && matches_brand
            && matches_category
            && matches_status
            && matches_price
            && matches_stock
    }

    pub fn apply(&self, products: &[Product]) -> Vec<Product> {
        products.iter().filter(|p| self.matches(p)).cloned().collect()
    }
}

#[derive(Debug, Serialize, Deserialize, Clone, Default)]
#[serde(default)]
pub struct InvoiceFilter {
    pub search: Option<String>,
    pub status: Option<InvoiceStatus>,
    pub date_from: Option<NaiveDate>,
    pub date_to: Option<NaiveDate>,
    pub amount_min: Option<f64>,
    pub amount_max: Option<f64>,
    pub customer: Option<String>,
}

impl InvoiceFilter {
    pub fn is_active(&self) -> bool {
        term(&self.search).is_some()
            || self.status.is_some()
            || self.date_from.is_some()
            || self.date_to.is_some()
            || self.amount_min.is_some()
            || self.amount_max.is_some()
            || term(&self.customer).is_some()
    }

    pub fn matches(&self, invoice: &Invoice) -> bool {
        let matches_search = term(&self.search).map_or(true, |q| {
            contains_ci(&invoice.id, q) || contains_ci(&invoice.customer_name, q)
        });
        let matches_status = self.status.map_or(true, |s| invoice.status == s);
        let matches_date = if self.date_from.is_some() || self.date_to.is_some() {
            // an unreadable date cannot be placed in any range
            parse_invoice_date(&invoice.date)
                .map_or(false, |d| within(d, self.date_from, self.date_to))
        } else {
            true
        };
        let matches_amount = within(invoice.amount_value(), self.amount_min, self.amount_max);
        let matches_customer =
            term(&self.customer).map_or(true, |c| contains_ci(&invoice.customer_name, c));

        matches_search && matches_status && matches_date && matches_amount && matches_customer
    }

    pub fn apply(&self, invoices: &[Invoice]) -> Vec<Invoice> {
        invoices.iter().filter(|i| self.matches(i)).cloned().collect()
    }
}

#[derive(Debug, Serialize, Deserialize, Clone, Default)]
#[serde(default)]
pub struct CustomerFilter {
    pub search: Option<String>,
    pub company: Option<String>,
    pub location: Option<String>,
    pub has_gstin: Option<bool>,
}

impl CustomerFilter {
    pub fn is_active(&self) -> bool {
        term(&self.search).is_some()
            || term(&self.company).is_some()
            || term(&self.location).is_some()
            || self.has_gstin.is_some()
    }

    pub fn matches(&self, customer: &Customer) -> bool {
        let matches_search = term(&self.search).map_or(true, |q| {
            contains_ci(&customer.name, q)
                || contains_ci(&customer.company, q)
                || contains_ci(&customer.email, q)
        });
        let matches_company = term(&self.company).map_or(true, |c| contains_ci(&customer.company, c));
        let matches_location =
            term(&self.location).map_or(true, |l| contains_ci(&customer.address, l));
        let has_gstin = customer
            .gstin
            .as_deref()
            .map_or(false, |g| !g.trim().is_empty());
        let matches_gstin = self.has_gstin.map_or(true, |wanted| wanted == has_gstin);

        matches_search && matches_company && matches_location && matches_gstin
    }

    pub fn apply(&self, customers: &[Customer]) -> Vec<Customer> {
        customers.iter().filter(|c| self.matches(c)).cloned().collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::InvoiceItem;

    fn product(id: i64, name: &str, brand: &str, category: &str, stock: i32, price: &str) -> Product {
        Product {
            id,
            name: name.to_string(),
            brand: brand.to_string(),
            category: category.to_string(),
            stock,
            price: price.to_string(),
            status: StockStatus::derive(stock, None),
            description: None,
            sku: None,
            min_stock: None,
        }
    }

    fn invoice(id: &str, customer: &str, date: &str, amount: &str, status: InvoiceStatus) -> Invoice {
        Invoice {
            id: id.to_string(),
            customer_id: 1,
            customer_name: customer.to_string(),
            date: date.to_string(),
            amount: amount.to_string(),
            status,
            items: vec![InvoiceItem {
                product_id: 1,
                description: "Item".to_string(),
                quantity: 1,
                price: "1".to_string(),
            }],
            notes: None,
        }
    }

    fn customer(name: &str, company: &str, address: &str, gstin: Option<&str>) -> Customer {
        Customer {
            id: 1,
            name: name.to_string(),
            company: company.to_string(),
            email: format!("{}@example.com", name.to_lowercase()),
            phone: String::new(),
            address: address.to_string(),
            gstin: gstin.map(str::to_string),
            notes: None,
        }
    }

    fn catalogue() -> Vec<Product> {
        vec![
            product(1, "Pavilion 15", "HP", "Electronics", 15, "₹58,999"),
            product(2, "MacBook Air M2", "Apple", "Electronics", 4, "₹1,14,900"),
            product(3, "Magic Mouse", "Apple", "Accessories", 18, "₹7,900"),
            product(4, "Standing Desk Pro", "IKEA", "Furniture", 0, "₹12,499"),
        ]
    }

    #[test]
    fn test_parse_invoice_date_formats() {
        let expected = NaiveDate::from_ymd_opt(2025, 6, 12).unwrap();
        assert_eq!(parse_invoice_date("12 Jun 2025"), Some(expected));
        assert_eq!(parse_invoice_date("2025-06-12"), Some(expected));
        assert_eq!(parse_invoice_date("12/06/2025"), Some(expected));
        assert_eq!(parse_invoice_date("someday"), None);
    }

    #[test]
    fn test_empty_product_filter_matches_everything() {
        let filter = ProductFilter::default();
        assert!(!filter.is_active());
        assert_eq!(filter.apply(&catalogue()).len(), 4);
    }

    #[test]
    fn test_blank_search_is_inactive() {
        let filter = ProductFilter {
            search: Some("   ".to_string()),
            ..Default::default()
        };
        assert!(!filter.is_active());
        assert_eq!(filter.apply(&catalogue()).len(), 4);
    }

    #[test]
    fn test_product_search_is_case_insensitive_over_name_brand_category() {
        let by_brand = ProductFilter {
            search: Some("apple".to_string()),
            ..Default::default()
        };
        assert_eq!(by_brand.apply(&catalogue()).len(), 2);

        let by_category = ProductFilter {
            search: Some("FURN".to_string()),
            ..Default::default()
        };
        let found = by_category.apply(&catalogue());
        assert_eq!(found.len(), 1);
        assert_eq!(found[0].name, "Standing Desk Pro");
    }

    #[test]
    fn test_product_predicates_are_conjunctive() {
        let filter = ProductFilter {
            brand: Some("Apple".to_string()),
            category: Some("Electronics".to_string()),
            ..Default::default()
        };
        let found = filter.apply(&catalogue());
        assert_eq!(found.len(), 1);
        assert_eq!(found[0].id, 2);

        let none = ProductFilter {
            brand: Some("HP".to_string()),
            category: Some("Furniture".to_string()),
            ..Default::default()
        };
        assert!(none.apply(&catalogue()).is_empty());
    }

    #[test]
    fn test_product_price_range_uses_full_amount() {
        // ₹1,14,900 must not be read as 1.14 or 114
        let filter = ProductFilter {
            price_min: Some(100000.0),
            ..Default::default()
        };
        let found = filter.apply(&catalogue());
        assert_eq!(found.len(), 1);
        assert_eq!(found[0].name, "MacBook Air M2");
    }

    #[test]
    fn test_product_stock_range_and_status() {
        let filter = ProductFilter {
            stock_min: Some(1),
            stock_max: Some(15),
            ..Default::default()
        };
        let ids: Vec<i64> = filter.apply(&catalogue()).iter().map(|p| p.id).collect();
        assert_eq!(ids, vec![1, 2]);

        let out = ProductFilter {
            status: Some(StockStatus::OutOfStock),
            ..Default::default()
        };
        assert_eq!(out.apply(&catalogue())[0].id, 4);
    }

    #[test]
    fn test_invoice_date_range_is_inclusive() {
        let invoices = vec![
            invoice("INV-001", "Rahul Sharma - Acme Corp", "12 Jun 2025", "₹12,500", InvoiceStatus::Paid),
            invoice("INV-002", "Priya Patel - Globex Inc", "10 Jun 2025", "₹8,750", InvoiceStatus::Pending),
            invoice("INV-005", "Rahul Sharma - Acme Corp", "28 May 2025", "₹11,800", InvoiceStatus::Paid),
        ];
        let filter = InvoiceFilter {
            date_from: NaiveDate::from_ymd_opt(2025, 6, 10),
            date_to: NaiveDate::from_ymd_opt(2025, 6, 12),
            ..Default::default()
        };
        let ids: Vec<String> = filter.apply(&invoices).into_iter().map(|i| i.id).collect();
        assert_eq!(ids, vec!["INV-001", "INV-002"]);
    }

    #[test]
    fn test_invoice_unparseable_date_excluded_only_when_range_set() {
        let invoices = vec![invoice("INV-009", "X - Y", "not a date", "₹100", InvoiceStatus::Pending)];
        assert_eq!(InvoiceFilter::default().apply(&invoices).len(), 1);

        let ranged = InvoiceFilter {
            date_from: NaiveDate::from_ymd_opt(2000, 1, 1),
            ..Default::default()
        };
        assert!(ranged.apply(&invoices).is_empty());
    }

    #[test]
    fn test_invoice_search_status_amount_customer() {
        let invoices = vec![
            invoice("INV-001", "Rahul Sharma - Acme Corp", "12 Jun 2025", "₹12,500", InvoiceStatus::Paid),
            invoice("INV-004", "Priya Patel - Globex Inc", "01 Jun 2025", "₹9,300", InvoiceStatus::Overdue),
        ];

        let search = InvoiceFilter {
            search: Some("inv-004".to_string()),
            ..Default::default()
        };
        assert_eq!(search.apply(&invoices)[0].id, "INV-004");

        let combined = InvoiceFilter {
            status: Some(InvoiceStatus::Paid),
            amount_min: Some(10000.0),
            customer: Some("acme".to_string()),
            ..Default::default()
        };
        assert!(combined.is_active());
        let found = combined.apply(&invoices);
        assert_eq!(found.len(), 1);
        assert_eq!(found[0].id, "INV-001");

        let too_high = InvoiceFilter {
            amount_max: Some(9000.0),
            ..Default::default()
        };
        assert!(too_high.apply(&invoices).is_empty());
    }

    #[test]
    fn test_customer_filters() {
        let customers = vec![
            customer("Rahul", "Acme Corp", "123 Business Park, Mumbai", Some("27AAPFU0939F1ZV")),
            customer("Priya", "Globex Inc", "456 Tech Hub, Bangalore", Some("  ")),
            customer("Arjun", "Initech", "9 MG Road, Mumbai", None),
        ];

        let mumbai = CustomerFilter {
            location: Some("mumbai".to_string()),
            ..Default::default()
        };
        assert_eq!(mumbai.apply(&customers).len(), 2);

        let with_gstin = CustomerFilter {
            has_gstin: Some(true),
            ..Default::default()
        };
        let found = with_gstin.apply(&customers);
        assert_eq!(found.len(), 1);
        assert_eq!(found[0].name, "Rahul");

        let without_gstin_in_mumbai = CustomerFilter {
            has_gstin: Some(false),
            location: Some("Mumbai".to_string()),
            ..Default::default()
        };
        let found = without_gstin_in_mumbai.apply(&customers);
        assert_eq!(found.len(), 1);
        assert_eq!(found[0].name, "Arjun");

        let by_email = CustomerFilter {
            search: Some("priya@".to_string()),
            ..Default::default()
        };
        assert_eq!(by_email.apply(&customers)[0].company, "Globex Inc");
    }
}
