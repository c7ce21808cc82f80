//! Export the website catalog snapshot

use crate::domain::{
    as_float, as_int, as_text, make_slug, normalize_file_url, render_snapshot, CatalogEntry,
    CatalogImage, TagSet, DEFAULT_IMAGE_ROLE,
};
use crate::error::Result;
use crate::infrastructure::{ExportSettings, Filters, FrappeBackend, ListQuery, Record};
use chrono::{DateTime, Utc};
use serde_json::Value;
use std::collections::HashSet;
use std::fs;
use std::path::PathBuf;
use tracing::{debug, info, warn};

const ITEM_DOCTYPE: &str = "Item";
const FILE_DOCTYPE: &str = "File";
const TAG_LINK_DOCTYPE: &str = "Tag Link";

const ITEM_LIMIT: usize = 100_000;
const TAG_LIMIT: usize = 200;
const IMAGE_LIMIT: usize = 500;
const SNAPSHOT_LIMIT: usize = 50;

/// Where the rendered snapshot goes
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ExportTarget {
    /// Replace the public File in the ERP
    Publish,
    /// Write to a local path, leaving the ERP untouched
    LocalFile(PathBuf),
    /// Hand the payload back to the caller
    Stdout,
}

/// Result of replacing the published snapshot
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PublishOutcome {
    pub deleted: usize,
    pub failed_deletes: usize,
    /// Name of the new File document
    pub file_id: Option<String>,
    pub file_url: Option<String>,
}

/// Summary of an export run
#[derive(Debug, Clone, PartialEq)]
pub struct ExportReport {
    pub products: usize,
    pub images: usize,
    pub bytes: usize,
    pub generated_at: DateTime<Utc>,
    pub target: ExportTarget,
    pub publish: Option<PublishOutcome>,
    pub payload: String,
}

/// Service building and publishing the catalog snapshot
pub struct ExportCatalogService<'a, B: FrappeBackend> {
    backend: &'a B,
    settings: &'a ExportSettings,
    erp_base: &'a str,
}

impl<'a, B: FrappeBackend> ExportCatalogService<'a, B> {
    /// Create a new export service
    pub fn new(backend: &'a B, settings: &'a ExportSettings, erp_base: &'a str) -> Self {
        Self {
            backend,
            settings,
            erp_base,
        }
    }

    fn item_query(&self) -> ListQuery {
        let fields = &self.settings.fields;
        let mut filters = Filters::new()
            .where_eq("disabled", 0)
            .where_eq(fields.include_in_website.as_str(), 1);
        if self.settings.only_publish {
            filters = filters.where_eq(fields.publish.as_str(), 1);
        }

        ListQuery::new(ITEM_DOCTYPE)
            .fields([
                "name as item_code".to_string(),
                "item_name".to_string(),
                format!("{} as external_name", fields.external_name),
                format!("{} as panjang", fields.panjang),
                format!("{} as lebar", fields.lebar),
                format!("{} as tinggi", fields.tinggi),
                format!("{} as berat", fields.berat),
                format!("{} as website_description", fields.website_description),
                format!("{} as cbm", fields.cbm),
                format!("{} as publish_item", fields.publish),
            ])
            .filters(filters)
            .limit(ITEM_LIMIT)
    }

    /// Build catalog entries for every eligible Item, sorted by code.
    ///
    /// Any backend failure aborts the whole collection.
    pub fn collect(&self) -> Result<Vec<CatalogEntry>> {
        let records = self.backend.get_list(&self.item_query())?;
        debug!(count = records.len(), "Fetched eligible items");

        let mut entries = Vec::with_capacity(records.len());
        for record in &records {
            if let Some(entry) = self.entry_from_record(record)? {
                entries.push(entry);
            }
        }

        entries.sort_by(|a, b| a.item_code.cmp(&b.item_code));
        Ok(entries)
    }

    fn entry_from_record(&self, record: &Record) -> Result<Option<CatalogEntry>> {
        let item_code = as_text(record.get("item_code"));
        if item_code.is_empty() {
            return Ok(None);
        }

        let item_name = as_text(record.get("item_name"));
        let tag_set = TagSet::from_raw(self.raw_tags(&item_code)?);
        let images = self.images(&item_code)?;

        Ok(Some(CatalogEntry {
            slug: make_slug(&item_name),
            external_name: as_text(record.get("external_name")),
            panjang: as_int(record.get("panjang"), 0),
            lebar: as_int(record.get("lebar"), 0),
            tinggi: as_int(record.get("tinggi"), 0),
            berat: as_float(record.get("berat"), 0.0),
            website_description: as_text(record.get("website_description")),
            cbm: as_float(record.get("cbm"), 0.0),
            publish_item: as_int(record.get("publish_item"), 0),
            collection_list: tag_set.collections,
            tags: tag_set.tags,
            images,
            item_code,
            item_name,
        }))
    }

    fn raw_tags(&self, item_code: &str) -> Result<Vec<String>> {
        let query = ListQuery::new(TAG_LINK_DOCTYPE)
            .fields(["tag"])
            .filters(
                Filters::new()
                    .where_eq("document_type", ITEM_DOCTYPE)
                    .where_eq("document_name", item_code),
            )
            .limit(TAG_LIMIT);

        Ok(self
            .backend
            .get_list(&query)?
            .iter()
            .map(|row| as_text(row.get("tag")))
            .collect())
    }

    fn images(&self, item_code: &str) -> Result<Vec<CatalogImage>> {
        let fields = &self.settings.fields;
        let query = ListQuery::new(FILE_DOCTYPE)
            .fields([
                "name",
                "file_url",
                "file_name",
                fields.image_role.as_str(),
            ])
            .filters(
                Filters::new()
                    .where_eq("attached_to_doctype", ITEM_DOCTYPE)
                    .where_eq("attached_to_name", item_code)
                    .where_eq("is_private", 0)
                    .where_eq(fields.image_include_in_website.as_str(), 1),
            )
            .order_by("creation asc")
            .limit(IMAGE_LIMIT);

        let mut seen = HashSet::new();
        let mut images = Vec::new();
        for file in self.backend.get_list(&query)? {
            let raw_url = as_text(file.get("file_url"));
            let Some(url) = normalize_file_url(&raw_url, self.erp_base, self.settings.allow_private)
            else {
                continue;
            };
            if !seen.insert(url.clone()) {
                continue;
            }

            let file_id = match file.get("name") {
                None | Some(Value::Null) => None,
                value => Some(as_text(value)),
            };
            let role = match as_text(file.get(fields.image_role.as_str())) {
                role if role.is_empty() => DEFAULT_IMAGE_ROLE.to_string(),
                role => role,
            };

            images.push(CatalogImage {
                url,
                file_id,
                file_name: as_text(file.get("file_name")),
                role,
            });
        }

        Ok(images)
    }

    /// Replace the public snapshot File with `payload`.
    ///
    /// Prior snapshots are deleted first; a failed delete is logged and skipped.
    pub fn publish(&self, payload: &str) -> Result<PublishOutcome> {
        let file_name = self.settings.output_filename.as_str();
        let mut outcome = PublishOutcome::default();

        let existing = self.backend.get_list(
            &ListQuery::new(FILE_DOCTYPE)
                .fields(["name"])
                .filters(
                    Filters::new()
                        .where_eq("file_name", file_name)
                        .where_eq("is_private", 0),
                )
                .limit(SNAPSHOT_LIMIT),
        )?;

        for row in &existing {
            let name = as_text(row.get("name"));
            match self.backend.delete(FILE_DOCTYPE, &name) {
                Ok(()) => outcome.deleted += 1,
                Err(err) => {
                    warn!(file = %name, error = %err, "Could not delete previous snapshot");
                    outcome.failed_deletes += 1;
                }
            }
        }

        let mut doc = Record::new();
        doc.insert("file_name".to_string(), Value::from(file_name));
        doc.insert("content".to_string(), Value::from(payload));
        doc.insert(
            "folder".to_string(),
            Value::from(self.settings.output_folder.as_str()),
        );
        doc.insert("is_private".to_string(), Value::from(0));

        let stored = self.backend.insert(FILE_DOCTYPE, &doc)?;
        self.backend.commit()?;

        outcome.file_id = stored.get("name").and_then(Value::as_str).map(str::to_string);
        outcome.file_url = stored
            .get("file_url")
            .and_then(Value::as_str)
            .map(str::to_string);
        Ok(outcome)
    }

    /// Collect, render and deliver the snapshot.
    ///
    /// The payload is fully rendered before any prior snapshot is touched, so
    /// a failed run leaves the published file as it was.
    pub fn execute(&self, target: ExportTarget) -> Result<ExportReport> {
        let generated_at = Utc::now();
        let entries = self.collect()?;
        let payload = render_snapshot(&entries);
        let images = entries.iter().map(|e| e.images.len()).sum();

        let publish = match &target {
            ExportTarget::Publish => Some(self.publish(&payload)?),
            ExportTarget::LocalFile(path) => {
                if let Some(parent) = path.parent() {
                    if !parent.as_os_str().is_empty() && !parent.exists() {
                        fs::create_dir_all(parent)?;
                    }
                }
                fs::write(path, &payload)?;
                None
            }
            ExportTarget::Stdout => None,
        };

        info!(
            products = entries.len(),
            images,
            bytes = payload.len(),
            "Catalog export finished"
        );

        Ok(ExportReport {
            products: entries.len(),
            images,
            bytes: payload.len(),
            generated_at,
            target,
            publish,
            payload,
        })
    }
}
