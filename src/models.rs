use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use crate::money;

pub const DEFAULT_MIN_STOCK: i32 = 5;

#[derive(Debug, Serialize, Deserialize, Clone, PartialEq)]
pub struct Customer {
    pub id: i64,
    pub name: String,
    pub company: String,
    pub email: String,
    pub phone: String,
    pub address: String,
    pub gstin: Option<String>,
    pub notes: Option<String>,
}

impl Customer {
    /// Name as it is copied onto invoices.
    pub fn display_name(&self) -> String {
        format!("{} - {}", self.name, self.company)
    }
}

#[derive(Debug, Serialize, Deserialize, Clone, Default)]
pub struct NewCustomer {
    pub name: String,
    pub company: String,
    pub email: String,
    pub phone: String,
    pub address: String,
    pub gstin: Option<String>,
    pub notes: Option<String>,
}

#[derive(Debug, Serialize, Deserialize, Clone, Copy, PartialEq, Eq, Hash)]
pub enum StockStatus {
    #[serde(rename = "In Stock")]
    InStock,
    #[serde(rename = "Low Stock")]
    LowStock,
    #[serde(rename = "Out of Stock")]
    OutOfStock,
}

impl StockStatus {
    /// A missing or zero `min_stock` falls back to `DEFAULT_MIN_STOCK`.
    pub fn derive(stock: i32, min_stock: Option<i32>) -> Self {
        let threshold = min_stock.filter(|m| *m > 0).unwrap_or(DEFAULT_MIN_STOCK);
        if stock <= 0 {
            StockStatus::OutOfStock
        } else if stock <= threshold {
            StockStatus::LowStock
        } else {
            StockStatus::InStock
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            StockStatus::InStock => "In Stock",
            StockStatus::LowStock => "Low Stock",
            StockStatus::OutOfStock => "Out of Stock",
        }
    }

    pub fn css_class(&self) -> &'static str {
        match self {
            StockStatus::InStock => "status-in-stock",
            StockStatus::LowStock => "status-low-stock",
            StockStatus::OutOfStock => "status-out-of-stock",
        }
    }

    pub fn needs_attention(&self) -> bool {
        !matches!(self, StockStatus::InStock)
    }
}

#[derive(Debug, Serialize, Deserialize, Clone, PartialEq)]
pub struct Product {
    pub id: i64,
    pub name: String,
    pub brand: String,
    pub category: String,
    pub stock: i32,
    pub price: String, // formatted, e.g. "₹58,999"
    pub status: StockStatus,
    pub description: Option<String>,
    pub sku: Option<String>,
    pub min_stock: Option<i32>,
}

impl Product {
    pub fn price_value(&self) -> f64 {
        money::parse_amount(&self.price).unwrap_or(0.0)
    }

    pub fn stock_value(&self) -> f64 {
        self.price_value() * self.stock as f64
    }
}

#[derive(Debug, Serialize, Deserialize, Clone, Default)]
pub struct NewProduct {
    pub name: String,
    pub brand: String,
    pub category: String,
    pub stock: i32,
    pub price: f64,
    pub description: Option<String>,
    pub sku: Option<String>,
    pub min_stock: Option<i32>,
}

#[derive(Debug, Serialize, Deserialize, Clone)]
pub struct UpdateProduct {
    pub id: i64,
    pub name: String,
    pub brand: String,
    pub category: String,
    pub stock: i32,
    pub price: f64,
    pub description: Option<String>,
    pub sku: Option<String>,
    pub min_stock: Option<i32>,
}

#[derive(Debug, Serialize, Deserialize, Clone, Copy, PartialEq, Eq, Hash)]
pub enum InvoiceStatus {
    Pending,
    Paid,
    Overdue,
}

impl InvoiceStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            InvoiceStatus::Pending => "Pending",
            InvoiceStatus::Paid => "Paid",
            InvoiceStatus::Overdue => "Overdue",
        }
    }

    pub fn from_db(value: &str) -> Option<Self> {
        match value {
            "Pending" => Some(InvoiceStatus::Pending),
            "Paid" => Some(InvoiceStatus::Paid),
            "Overdue" => Some(InvoiceStatus::Overdue),
            _ => None,
        }
    }
}

#[derive(Debug, Serialize, Deserialize, Clone, PartialEq)]
pub struct InvoiceItem {
    pub product_id: i64,
    pub description: String,
    pub quantity: i32,
    pub price: String, // unit price as typed, e.g. "12500"
}

impl InvoiceItem {
    pub fn line_total(&self) -> Option<f64> {
        money::parse_amount(&self.price).map(|p| p * self.quantity as f64)
    }
}

#[derive(Debug, Serialize, Deserialize, Clone, PartialEq)]
pub struct Invoice {
    pub id: String,
    pub customer_id: i64,
    pub customer_name: String,
    pub date: String, // "12 Jun 2025"
    pub amount: String,
    pub status: InvoiceStatus,
    pub items: Vec<InvoiceItem>,
    pub notes: Option<String>,
}

impl Invoice {
    pub fn amount_value(&self) -> f64 {
        money::parse_amount(&self.amount).unwrap_or(0.0)
    }
}

#[derive(Debug, Serialize, Deserialize, Clone)]
pub struct NewInvoice {
    pub customer_id: i64,
    pub items: Vec<InvoiceItem>,
    pub notes: Option<String>,
    pub date: Option<NaiveDate>,
    pub status: Option<InvoiceStatus>,
}

#[derive(Debug, Serialize, Deserialize, Clone)]
pub struct UpdateInvoice {
    pub id: String,
    pub customer_id: i64,
    pub items: Vec<InvoiceItem>,
    pub notes: Option<String>,
    pub status: InvoiceStatus,
}

#[derive(Debug, Serialize, Deserialize, Clone, PartialEq)]
pub struct User {
    pub id: String,
    pub name: String,
    pub email: String,
}

#[derive(Debug, Serialize, Deserialize, Clone)]
pub struct Session {
    pub token: String,
    pub user: User,
}

#[derive(Debug, Serialize, Deserialize, Clone, PartialEq)]
pub struct ProfileSettings {
    pub first_name: String,
    pub last_name: String,
    pub email: String,
    pub phone: String,
}

impl Default for ProfileSettings {
    fn default() -> Self {
        Self {
            first_name: "Demo".to_string(),
            last_name: "User".to_string(),
            email: "demo@example.com".to_string(),
            phone: "+91 98765 43210".to_string(),
        }
    }
}

#[derive(Debug, Serialize, Deserialize, Clone, PartialEq)]
pub struct BusinessSettings {
    pub business_name: String,
    pub gstin: String,
    pub address: String,
    pub business_type: String,
    pub currency: String,
}

impl Default for BusinessSettings {
    fn default() -> Self {
        Self {
            business_name: "Demo Business".to_string(),
            gstin: "22AAAAA0000A1Z5".to_string(),
            address: "123 Business Street, Commercial Area, Bengaluru, Karnataka, 560001"
                .to_string(),
            business_type: "Retail".to_string(),
            currency: "INR".to_string(),
        }
    }
}

#[derive(Debug, Serialize, Deserialize, Clone, PartialEq)]
pub struct NotificationSettings {
    pub invoice_emails: bool,
    pub payment_reminders: bool,
    pub low_stock_alerts: bool,
}

impl Default for NotificationSettings {
    fn default() -> Self {
        Self {
            invoice_emails: true,
            payment_reminders: true,
            low_stock_alerts: true,
        }
    }
}

#[derive(Debug, Serialize, Deserialize, Clone, Default, PartialEq)]
pub struct AppSettings {
    pub profile: ProfileSettings,
    pub business: BusinessSettings,
    pub notifications: NotificationSettings,
}

#[derive(Debug, Serialize, Deserialize, Clone, PartialEq)]
pub struct DashboardMetrics {
    pub total_sales: String,
    pub outstanding: String,
    pub total_customers: i64,
    pub total_products: i64,
    pub low_stock_products: i64,
    pub total_invoices: i64,
}

#[derive(Debug, Serialize, Deserialize, Clone, PartialEq)]
pub struct MonthlySales {
    pub month: String, // "Jan"
    pub total: f64,
    pub invoice_count: i32,
}

#[derive(Debug, Serialize, Deserialize, Clone, Copy, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum ReportKind {
    Sales,
    Inventory,
    Customer,
}

#[derive(Debug, Serialize, Deserialize, Clone, Copy, PartialEq, Eq)]
#[serde(rename_all = "lowercase", tag = "period")]
pub enum ReportPeriod {
    Week,
    Month,
    Quarter,
    Year,
    Custom { from: NaiveDate, to: NaiveDate },
}

#[derive(Debug, Serialize, Deserialize, Clone, PartialEq)]
pub struct StatusTotal {
    pub status: InvoiceStatus,
    pub count: i32,
    pub total: String,
}

#[derive(Debug, Serialize, Deserialize, Clone, PartialEq)]
pub struct TopProduct {
    pub description: String,
    pub quantity: i32,
    pub revenue: String,
}

#[derive(Debug, Serialize, Deserialize, Clone, PartialEq)]
pub struct SalesReport {
    pub from: NaiveDate,
    pub to: NaiveDate,
    pub invoice_count: i32,
    pub total: String,
    pub by_status: Vec<StatusTotal>,
    pub top_products: Vec<TopProduct>,
}

#[derive(Debug, Serialize, Deserialize, Clone, PartialEq)]
pub struct InventoryReport {
    pub total_products: i32,
    pub total_units: i64,
    pub stock_value: String,
    pub in_stock: i32,
    pub low_stock: i32,
    pub out_of_stock: i32,
}

#[derive(Debug, Serialize, Deserialize, Clone, PartialEq)]
pub struct CustomerSummary {
    pub customer_id: i64,
    pub customer_name: String,
    pub invoice_count: i32,
    pub total: String,
    pub outstanding: String,
}

#[derive(Debug, Serialize, Deserialize, Clone, PartialEq)]
#[serde(tag = "kind", rename_all = "lowercase")]
pub enum Report {
    Sales(SalesReport),
    Inventory(InventoryReport),
    Customer { from: NaiveDate, to: NaiveDate, customers: Vec<CustomerSummary> },
}
