//! Attach product images found on the image host

use crate::domain::{as_text, attachment_file_name, image_url, MissTracker, StorageGroup};
use crate::error::{KatalogError, Result};
use crate::infrastructure::{Filters, FrappeBackend, ImageProbe, ImageSettings, ListQuery, Record};
use serde_json::Value;
use tracing::{debug, info, warn};

const ITEM_DOCTYPE: &str = "Item";
const FILE_DOCTYPE: &str = "File";
const MISS_LOG_TITLE: &str = "IMAGE EXISTS FAIL";

/// The Item an image run works on
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ItemRef {
    /// Document name, used for attachment links
    pub name: String,
    /// Item code, used in image URLs
    pub item_code: String,
}

impl ItemRef {
    pub fn new(name: impl Into<String>, item_code: impl Into<String>) -> Self {
        ItemRef {
            name: name.into(),
            item_code: item_code.into(),
        }
    }

    fn from_record(record: &Record) -> Self {
        let name = as_text(record.get("name"));
        let item_code = match as_text(record.get("item_code")) {
            code if code.is_empty() => name.clone(),
            code => code,
        };
        ItemRef { name, item_code }
    }
}

/// Outcome of probing one item
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct AttachReport {
    pub item_code: String,
    pub probes: u32,
    pub hits: u32,
    pub misses: u32,
    pub attached: u32,
    pub already_attached: u32,
    pub failed_inserts: u32,
    pub attached_urls: Vec<String>,
}

/// Service probing the image host and attaching hits to Items
pub struct AttachImagesService<'a, B: FrappeBackend, P: ImageProbe> {
    backend: &'a B,
    probe: &'a P,
    settings: &'a ImageSettings,
}

impl<'a, B: FrappeBackend, P: ImageProbe> AttachImagesService<'a, B, P> {
    /// Create a new attach service
    pub fn new(backend: &'a B, probe: &'a P, settings: &'a ImageSettings) -> Self {
        Self {
            backend,
            probe,
            settings,
        }
    }

    /// Resolve an Item by document name and attach its images
    pub fn attach_code(&self, code: &str) -> Result<AttachReport> {
        let query = ListQuery::new(ITEM_DOCTYPE)
            .fields(["name", "item_code"])
            .filters(Filters::new().where_eq("name", code))
            .limit(1);

        let item = self
            .backend
            .get_list(&query)?
            .first()
            .map(ItemRef::from_record)
            .ok_or_else(|| KatalogError::ItemNotFound(code.to_string()))?;

        Ok(self.attach(&item))
    }

    /// Attach images for every enabled Item, in name order
    pub fn attach_all(&self) -> Result<Vec<AttachReport>> {
        let query = ListQuery::new(ITEM_DOCTYPE)
            .fields(["name", "item_code"])
            .filters(Filters::new().where_eq("disabled", 0))
            .order_by("name asc")
            .limit(100_000);

        let items: Vec<ItemRef> = self
            .backend
            .get_list(&query)?
            .iter()
            .map(ItemRef::from_record)
            .filter(|item| !item.name.is_empty())
            .collect();

        info!(count = items.len(), "Attaching images for all enabled items");

        Ok(items.iter().map(|item| self.attach(item)).collect())
    }

    /// Probe every configured series for one item.
    ///
    /// Never fails: probe misses and insert failures are counted in the report.
    pub fn attach(&self, item: &ItemRef) -> AttachReport {
        let mut report = AttachReport {
            item_code: item.item_code.clone(),
            ..AttachReport::default()
        };

        for group in &self.settings.storage_groups {
            for resolution in &group.resolutions {
                self.probe_series(item, group, resolution, &mut report);
            }
        }

        info!(
            item = %item.item_code,
            probes = report.probes,
            hits = report.hits,
            attached = report.attached,
            "Image probe finished"
        );

        report
    }

    /// Probe indices `0..=max_index` of one (storage, resolution) series,
    /// stopping after `miss_threshold` consecutive misses.
    fn probe_series(
        &self,
        item: &ItemRef,
        group: &StorageGroup,
        resolution: &str,
        report: &mut AttachReport,
    ) {
        let mut tracker = MissTracker::new(self.settings.miss_threshold);

        for index in 0..=self.settings.max_index {
            let url = image_url(
                &self.settings.base_url,
                &item.item_code,
                &group.name,
                index,
                resolution,
            );
            report.probes += 1;

            if let Err(err) = self.probe.check(&url) {
                report.misses += 1;
                let exhausted = tracker.record_miss();
                self.log_miss(item, group, resolution, index, tracker.consecutive(), &url, &err);
                if exhausted {
                    break;
                }
                continue;
            }

            tracker.record_hit();
            report.hits += 1;

            let file_name = attachment_file_name(&group.name, index, resolution);
            self.attach_url(item, &url, &file_name, report);
        }
    }

    #[allow(clippy::too_many_arguments)]
    fn log_miss(
        &self,
        item: &ItemRef,
        group: &StorageGroup,
        resolution: &str,
        index: u32,
        miss: u32,
        url: &str,
        err: &KatalogError,
    ) {
        warn!(
            item = %item.item_code,
            storage = %group.name,
            resolution,
            index,
            miss,
            url,
            error = %err,
            "Image probe miss"
        );

        if self.settings.log_misses_to_erp {
            let message = format!(
                "MISS item={} storage={} res={} i={} miss={}\nurl={}\nerr={}",
                item.item_code, group.name, resolution, index, miss, url, err
            );
            if let Err(log_err) = self.backend.log_error(MISS_LOG_TITLE, &message) {
                debug!(error = %log_err, "Could not write ERP error log");
            }
        }
    }

    /// Insert a File for `url` unless the Item already has it attached
    fn attach_url(&self, item: &ItemRef, url: &str, file_name: &str, report: &mut AttachReport) {
        let filters = Filters::new()
            .where_eq("attached_to_doctype", ITEM_DOCTYPE)
            .where_eq("attached_to_name", item.name.as_str())
            .where_eq("file_url", url);

        match self.backend.exists(FILE_DOCTYPE, &filters) {
            Ok(true) => {
                report.already_attached += 1;
                return;
            }
            Ok(false) => {}
            Err(_) => {
                report.failed_inserts += 1;
                return;
            }
        }

        let mut doc = Record::new();
        doc.insert("file_name".to_string(), Value::from(file_name));
        doc.insert("file_url".to_string(), Value::from(url));
        doc.insert("is_private".to_string(), Value::from(0));
        doc.insert("attached_to_doctype".to_string(), Value::from(ITEM_DOCTYPE));
        doc.insert("attached_to_name".to_string(), Value::from(item.name.as_str()));

        match self.backend.insert(FILE_DOCTYPE, &doc) {
            Ok(_) => {
                report.attached += 1;
                report.attached_urls.push(url.to_string());
            }
            Err(_) => report.failed_inserts += 1,
        }
    }
}
