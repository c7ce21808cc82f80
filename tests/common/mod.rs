#![allow(dead_code)]

use assert_cmd::Command;
use katalog::domain::StorageGroup;
use katalog::error::{KatalogError, Result};
use katalog::infrastructure::{FrappeBackend, ImageProbe, ImageSettings, ListQuery, Record};
use serde_json::Value;
use std::cell::{Cell, RefCell};
use std::collections::{BTreeMap, HashSet};

pub fn katalog_cmd() -> Command {
    let mut cmd = Command::cargo_bin("katalog").unwrap();
    cmd.env_remove("KATALOG_CONFIG");
    cmd.env_remove("RUST_LOG");
    cmd
}

/// Build a record from a `json!` object literal
pub fn record(value: Value) -> Record {
    value.as_object().cloned().expect("record must be a JSON object")
}

pub fn not_found(what: &str) -> KatalogError {
    KatalogError::Api {
        status: 404,
        message: format!("{} not found", what),
    }
}

/// In-memory stand-in for the ERP
#[derive(Default)]
pub struct FakeBackend {
    tables: RefCell<BTreeMap<String, Vec<Record>>>,
    next_id: Cell<u32>,
    pub fail_inserts: Cell<bool>,
    pub fail_deletes: RefCell<HashSet<String>>,
    /// get_list fails when a query filter equals this (field, value)
    pub fail_list_on: RefCell<Option<(String, Value)>>,
    pub error_log: RefCell<Vec<(String, String)>>,
    pub commits: Cell<u32>,
    pub queries: RefCell<Vec<ListQuery>>,
}

impl FakeBackend {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn seed(&self, doctype: &str, row: Value) {
        self.tables
            .borrow_mut()
            .entry(doctype.to_string())
            .or_default()
            .push(record(row));
    }

    pub fn rows(&self, doctype: &str) -> Vec<Record> {
        self.tables
            .borrow()
            .get(doctype)
            .cloned()
            .unwrap_or_default()
    }

    fn project(row: &Record, fields: &[String]) -> Record {
        let mut out = Record::new();
        for field in fields {
            let (source, alias) = match field.split_once(" as ") {
                Some((source, alias)) => (source.trim(), alias.trim()),
                None => (field.as_str(), field.as_str()),
            };
            out.insert(
                alias.to_string(),
                row.get(source).cloned().unwrap_or(Value::Null),
            );
        }
        out
    }
}

impl FrappeBackend for FakeBackend {
    fn get_list(&self, query: &ListQuery) -> Result<Vec<Record>> {
        self.queries.borrow_mut().push(query.clone());

        if let Some((field, value)) = &*self.fail_list_on.borrow() {
            if query.filters.iter().any(|(k, v)| k == field.as_str() && v == value) {
                return Err(KatalogError::Api {
                    status: 500,
                    message: "simulated list failure".to_string(),
                });
            }
        }

        let mut rows: Vec<Record> = self
            .rows(&query.doctype)
            .into_iter()
            .filter(|row| query.filters.iter().all(|(k, v)| row.get(k) == Some(v)))
            .collect();

        if let Some(order_by) = &query.order_by {
            let field = order_by.split_whitespace().next().unwrap_or("name").to_string();
            rows.sort_by(|a, b| {
                let a = a.get(&field).and_then(Value::as_str).unwrap_or("");
                let b = b.get(&field).and_then(Value::as_str).unwrap_or("");
                a.cmp(b)
            });
        }

        Ok(rows
            .iter()
            .take(query.limit)
            .map(|row| Self::project(row, &query.fields))
            .collect())
    }

    fn insert(&self, doctype: &str, doc: &Record) -> Result<Record> {
        if self.fail_inserts.get() {
            return Err(KatalogError::Api {
                status: 417,
                message: "simulated insert failure".to_string(),
            });
        }

        let id = self.next_id.get() + 1;
        self.next_id.set(id);

        let mut stored = doc.clone();
        stored
            .entry("name".to_string())
            .or_insert_with(|| Value::from(format!("{}-{:04}", doctype, id)));
        stored.insert("creation".to_string(), Value::from(format!("2099-01-01 00:00:{:02}", id)));
        if doctype == "File" && !stored.contains_key("file_url") {
            let file_name = stored
                .get("file_name")
                .and_then(Value::as_str)
                .map(str::to_string)
                .unwrap_or_default();
            stored.insert("file_url".to_string(), Value::from(format!("/files/{}", file_name)));
        }

        self.tables
            .borrow_mut()
            .entry(doctype.to_string())
            .or_default()
            .push(stored.clone());
        Ok(stored)
    }

    fn delete(&self, doctype: &str, name: &str) -> Result<()> {
        if self.fail_deletes.borrow().contains(name) {
            return Err(KatalogError::Api {
                status: 409,
                message: format!("{} is linked", name),
            });
        }

        let mut tables = self.tables.borrow_mut();
        let rows = tables.entry(doctype.to_string()).or_default();
        let before = rows.len();
        rows.retain(|row| row.get("name").and_then(Value::as_str) != Some(name));
        if rows.len() == before {
            return Err(not_found(name));
        }
        Ok(())
    }

    fn log_error(&self, title: &str, message: &str) -> Result<()> {
        self.error_log
            .borrow_mut()
            .push((title.to_string(), message.to_string()));
        Ok(())
    }

    fn commit(&self) -> Result<()> {
        self.commits.set(self.commits.get() + 1);
        Ok(())
    }
}

/// Image host answering only for a fixed set of URLs
#[derive(Default)]
pub struct FakeProbe {
    hits: HashSet<String>,
    pub calls: RefCell<Vec<String>>,
}

impl FakeProbe {
    pub fn with_hits<I, S>(hits: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        FakeProbe {
            hits: hits.into_iter().map(Into::into).collect(),
            calls: RefCell::new(Vec::new()),
        }
    }
}

impl ImageProbe for FakeProbe {
    fn check(&self, url: &str) -> Result<()> {
        self.calls.borrow_mut().push(url.to_string());
        if self.hits.contains(url) {
            Ok(())
        } else {
            Err(KatalogError::ImageUnavailable {
                url: url.to_string(),
                status: 404,
            })
        }
    }
}

pub const IMAGE_BASE: &str = "https://img.test/product-img/";

/// Image settings probing a single (depan, detail) series
pub fn single_series_settings() -> ImageSettings {
    ImageSettings {
        base_url: IMAGE_BASE.to_string(),
        max_index: 10,
        miss_threshold: 2,
        timeout_secs: 5,
        log_misses_to_erp: false,
        storage_groups: vec![StorageGroup::new("depan", &["detail"])],
    }
}

pub fn url(code: &str, storage: &str, suffix: &str, resolution: &str) -> String {
    format!("{}{}_{}{}_{}.jpg", IMAGE_BASE, code, storage, suffix, resolution)
}
