//! Catalog entries as published to the website

use crate::domain::json::{JsonObject, JsonValue};

/// Role used when a file has none set
pub const DEFAULT_IMAGE_ROLE: &str = "gallery";

/// One public image of a product
#[derive(Debug, Clone, PartialEq)]
pub struct CatalogImage {
    pub url: String,
    pub file_id: Option<String>,
    pub file_name: String,
    pub role: String,
}

impl CatalogImage {
    pub fn to_json(&self) -> JsonValue {
        JsonObject::new()
            .with("url", self.url.as_str())
            .with("file_id", self.file_id.clone())
            .with("file_name", self.file_name.as_str())
            .with("role", self.role.as_str())
            .into()
    }
}

/// One product in the snapshot
#[derive(Debug, Clone, PartialEq)]
pub struct CatalogEntry {
    pub item_code: String,
    pub item_name: String,
    pub slug: String,
    pub external_name: String,
    pub panjang: i64,
    pub lebar: i64,
    pub tinggi: i64,
    pub berat: f64,
    pub website_description: String,
    pub cbm: f64,
    pub publish_item: i64,
    pub collection_list: Vec<String>,
    pub tags: Vec<String>,
    pub images: Vec<CatalogImage>,
}

impl CatalogEntry {
    /// Object with the key order the website expects
    pub fn to_json(&self) -> JsonValue {
        JsonObject::new()
            .with("item_code", self.item_code.as_str())
            .with("item_name", self.item_name.as_str())
            .with("slug", self.slug.as_str())
            .with("external_name", self.external_name.as_str())
            .with("panjang", self.panjang)
            .with("lebar", self.lebar)
            .with("tinggi", self.tinggi)
            .with("berat", self.berat)
            .with("website_description", self.website_description.as_str())
            .with("cbm", self.cbm)
            .with("publish_item", self.publish_item)
            .with("collection_list", self.collection_list.clone())
            .with("tags", self.tags.clone())
            .with(
                "images",
                JsonValue::Array(self.images.iter().map(CatalogImage::to_json).collect()),
            )
            .into()
    }
}

/// Render the snapshot payload, entries in the given order
pub fn render_snapshot(entries: &[CatalogEntry]) -> String {
    JsonValue::Array(entries.iter().map(CatalogEntry::to_json).collect()).to_json()
}
