//! Infrastructure layer - ERP access, HTTP and configuration

pub mod config;
pub mod frappe;
pub mod probe;

#[cfg(test)]
mod loopback;

pub use config::{Config, ErpSettings, ExportSettings, FieldMap, ImageSettings, CONFIG_FILE_NAME};
pub use frappe::{Filters, FrappeBackend, FrappeClient, ListQuery, Record};
pub use probe::{HttpImageProbe, ImageProbe};
