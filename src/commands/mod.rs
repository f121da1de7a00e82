pub mod auth;
pub mod customers;
pub mod exports;
pub mod invoices;
pub mod products;
pub mod reports;
pub mod settings;
