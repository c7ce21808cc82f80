//! Application layer - Use cases and orchestration

pub mod attach_images;
pub mod export_catalog;
pub mod init;
pub mod manage_config;

pub use attach_images::{AttachImagesService, AttachReport, ItemRef};
pub use export_catalog::{ExportCatalogService, ExportReport, ExportTarget, PublishOutcome};
pub use init::InitService;
pub use manage_config::ConfigService;
