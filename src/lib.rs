//! katalog - Frappe ERP product image attacher and catalog exporter
//!
//! Probes a remote image host for product photos and attaches them to Items,
//! and publishes a static JSON snapshot of the website catalog.

pub mod application;
pub mod cli;
pub mod domain;
pub mod error;
pub mod infrastructure;

pub use error::KatalogError;
