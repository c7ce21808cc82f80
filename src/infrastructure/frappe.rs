//! Frappe backend: record access over the REST API

use crate::error::{KatalogError, Result};
use crate::infrastructure::config::ErpSettings;
use reqwest::blocking::{Client, Response};
use reqwest::{header, Url};
use serde::Deserialize;
use serde_json::{Map, Value};
use std::time::Duration;
use tracing::{debug, warn};

/// A record as returned by the ERP (field name to value)
pub type Record = Map<String, Value>;

/// Equality filters, serialized as a Frappe filter object
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Filters(Vec<(String, Value)>);

impl Filters {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a `field = value` condition
    pub fn where_eq(mut self, field: impl Into<String>, value: impl Into<Value>) -> Self {
        self.0.push((field.into(), value.into()));
        self
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &Value)> {
        self.0.iter().map(|(k, v)| (k.as_str(), v))
    }

    pub fn to_value(&self) -> Value {
        Value::Object(self.0.iter().cloned().collect())
    }
}

/// A `get_list` request
#[derive(Debug, Clone, PartialEq)]
pub struct ListQuery {
    pub doctype: String,
    /// Field names; `"field as alias"` renames a column
    pub fields: Vec<String>,
    pub filters: Filters,
    pub order_by: Option<String>,
    pub limit: usize,
}

impl ListQuery {
    pub fn new(doctype: impl Into<String>) -> Self {
        ListQuery {
            doctype: doctype.into(),
            fields: vec!["name".to_string()],
            filters: Filters::new(),
            order_by: None,
            limit: 20,
        }
    }

    pub fn fields<I, S>(mut self, fields: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.fields = fields.into_iter().map(Into::into).collect();
        self
    }

    pub fn filters(mut self, filters: Filters) -> Self {
        self.filters = filters;
        self
    }

    pub fn order_by(mut self, order_by: impl Into<String>) -> Self {
        self.order_by = Some(order_by.into());
        self
    }

    pub fn limit(mut self, limit: usize) -> Self {
        self.limit = limit;
        self
    }
}

/// Abstract access to ERP records
pub trait FrappeBackend {
    /// List records of a doctype matching the query
    fn get_list(&self, query: &ListQuery) -> Result<Vec<Record>>;

    /// Insert a new document and return it as stored
    fn insert(&self, doctype: &str, doc: &Record) -> Result<Record>;

    /// Delete a document by name
    fn delete(&self, doctype: &str, name: &str) -> Result<()>;

    /// Record an entry in the ERP error log
    fn log_error(&self, title: &str, message: &str) -> Result<()>;

    /// Make previous writes durable
    fn commit(&self) -> Result<()>;

    /// Check whether any document matches the filters
    fn exists(&self, doctype: &str, filters: &Filters) -> Result<bool> {
        let query = ListQuery::new(doctype).filters(filters.clone()).limit(1);
        Ok(!self.get_list(&query)?.is_empty())
    }
}

#[derive(Debug, Deserialize)]
struct DataResponse<T> {
    data: T,
}

#[derive(Debug, Default, Deserialize)]
struct ErrorResponse {
    #[serde(default)]
    exception: Option<String>,
    #[serde(default)]
    exc_type: Option<String>,
    #[serde(default)]
    message: Option<Value>,
    #[serde(default, rename = "_server_messages")]
    server_messages: Option<String>,
}

impl ErrorResponse {
    /// Best human-readable message in a Frappe error body
    fn summary(&self) -> Option<String> {
        if let Some(raw) = &self.server_messages {
            // A JSON list of JSON-encoded objects, each with a "message" key
            let messages: Vec<String> = serde_json::from_str::<Vec<String>>(raw)
                .unwrap_or_default()
                .iter()
                .filter_map(|m| serde_json::from_str::<Value>(m).ok())
                .filter_map(|v| v.get("message").and_then(Value::as_str).map(str::to_string))
                .collect();
            if !messages.is_empty() {
                return Some(messages.join("; "));
            }
        }
        if let Some(exception) = &self.exception {
            return Some(exception.clone());
        }
        if let Some(Value::String(message)) = &self.message {
            return Some(message.clone());
        }
        self.exc_type.clone()
    }
}

/// REST implementation of FrappeBackend
#[derive(Debug, Clone)]
pub struct FrappeClient {
    client: Client,
    base_url: Url,
}

impl FrappeClient {
    /// Create a client for the configured site
    pub fn new(settings: &ErpSettings) -> Result<Self> {
        let base_url = Url::parse(&settings.base_url).map_err(|e| {
            KatalogError::Config(format!("Invalid erp.base_url '{}': {}", settings.base_url, e))
        })?;

        let mut headers = header::HeaderMap::new();
        headers.insert(
            header::ACCEPT,
            header::HeaderValue::from_static("application/json"),
        );
        if !settings.api_key.is_empty() {
            let token = format!("token {}:{}", settings.api_key, settings.api_secret);
            let mut value = header::HeaderValue::from_str(&token).map_err(|_| {
                KatalogError::Config("API key or secret contains invalid characters".to_string())
            })?;
            value.set_sensitive(true);
            headers.insert(header::AUTHORIZATION, value);
        }

        let client = Client::builder()
            .user_agent(concat!("katalog/", env!("CARGO_PKG_VERSION")))
            .default_headers(headers)
            .timeout(Duration::from_secs(settings.timeout_secs))
            .build()?;

        Ok(FrappeClient { client, base_url })
    }

    /// `{base}/api/resource/{doctype}[/{name}]` with segments percent-encoded
    fn resource_url(&self, doctype: &str, name: Option<&str>) -> Result<Url> {
        let mut url = self.base_url.clone();
        {
            let mut segments = url.path_segments_mut().map_err(|_| {
                KatalogError::Config(format!("erp.base_url cannot be a base: {}", self.base_url))
            })?;
            segments.pop_if_empty().extend(["api", "resource", doctype]);
            if let Some(name) = name {
                segments.push(name);
            }
        }
        Ok(url)
    }

    /// Turn a non-success response into an Api error
    fn check(response: Response) -> Result<Response> {
        let status = response.status();
        if status.is_success() {
            return Ok(response);
        }

        let body = response.text().unwrap_or_default();
        let message = serde_json::from_str::<ErrorResponse>(&body)
            .ok()
            .and_then(|e| e.summary())
            .unwrap_or_else(|| {
                status
                    .canonical_reason()
                    .unwrap_or("unexpected response")
                    .to_string()
            });

        warn!(status = status.as_u16(), %message, "ERP request failed");
        Err(KatalogError::Api {
            status: status.as_u16(),
            message,
        })
    }
}

impl FrappeBackend for FrappeClient {
    fn get_list(&self, query: &ListQuery) -> Result<Vec<Record>> {
        let url = self.resource_url(&query.doctype, None)?;
        let fields = serde_json::to_string(&query.fields)?;
        let filters = serde_json::to_string(&query.filters.to_value())?;
        let limit = query.limit.to_string();

        let mut params = vec![
            ("fields", fields.as_str()),
            ("filters", filters.as_str()),
            ("limit_page_length", limit.as_str()),
        ];
        if let Some(order_by) = &query.order_by {
            params.push(("order_by", order_by.as_str()));
        }

        debug!(doctype = %query.doctype, %filters, limit = query.limit, "get_list");

        let response = Self::check(self.client.get(url).query(&params).send()?)?;
        let body: DataResponse<Vec<Record>> = response.json()?;
        Ok(body.data)
    }

    fn insert(&self, doctype: &str, doc: &Record) -> Result<Record> {
        let url = self.resource_url(doctype, None)?;

        debug!(%doctype, "insert");

        let response = Self::check(self.client.post(url).json(doc).send()?)?;
        let body: DataResponse<Record> = response.json()?;
        Ok(body.data)
    }

    fn delete(&self, doctype: &str, name: &str) -> Result<()> {
        let url = self.resource_url(doctype, Some(name))?;

        debug!(%doctype, %name, "delete");

        Self::check(self.client.delete(url).send()?)?;
        Ok(())
    }

    fn log_error(&self, title: &str, message: &str) -> Result<()> {
        let mut doc = Record::new();
        doc.insert("method".to_string(), Value::from(title));
        doc.insert("error".to_string(), Value::from(message));
        self.insert("Error Log", &doc).map(|_| ())
    }

    fn commit(&self) -> Result<()> {
        // Each REST request runs in its own committed transaction
        Ok(())
    }
}
