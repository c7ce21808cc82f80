//! File URL normalization for the public catalog

const PRIVATE_PREFIX: &str = "/private/files/";

/// Turn a stored `file_url` into an absolute URL usable by a static site.
///
/// Returns `None` when the file cannot be served publicly: empty values,
/// relative paths, and private files unless `allow_private` is set.
pub fn normalize_file_url(raw: &str, erp_base: &str, allow_private: bool) -> Option<String> {
    let url = raw.trim();
    if url.is_empty() {
        return None;
    }

    if url.starts_with("http://") || url.starts_with("https://") {
        return Some(url.to_string());
    }

    if url.starts_with(PRIVATE_PREFIX) {
        return allow_private.then(|| format!("{}{}", erp_base, url));
    }

    if url.starts_with('/') {
        return Some(format!("{}{}", erp_base, url));
    }

    None
}
