//! Domain layer - Catalog rules with no I/O

pub mod image_url;
pub mod json;
pub mod numeric;
pub mod probe;
pub mod product;
pub mod slug;
pub mod tags;

// Re-export main types
pub use image_url::normalize_file_url;
pub use json::{JsonObject, JsonValue};
pub use numeric::{as_float, as_int, as_text};
pub use probe::{
    attachment_file_name, default_storage_groups, image_url, MissTracker, StorageGroup,
};
pub use product::{render_snapshot, CatalogEntry, CatalogImage, DEFAULT_IMAGE_ROLE};
pub use slug::make_slug;
pub use tags::TagSet;
