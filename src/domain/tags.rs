//! Tag and collection split for tag-link rows

use std::collections::HashSet;

/// Prefix marking a tag as a collection membership (matched case-insensitively)
pub const COLLECTION_PREFIX: &str = "col:";

/// Tags of one product, split into collections and plain tags
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TagSet {
    pub collections: Vec<String>,
    pub tags: Vec<String>,
}

/// Return the collection name when `tag` carries the collection prefix.
fn collection_name(tag: &str) -> Option<&str> {
    let prefix = tag.get(..COLLECTION_PREFIX.len())?;
    if prefix.eq_ignore_ascii_case(COLLECTION_PREFIX) {
        Some(tag[COLLECTION_PREFIX.len()..].trim())
    } else {
        None
    }
}

impl TagSet {
    /// Split raw tag strings into collections and tags.
    ///
    /// Both lists are deduplicated case-insensitively, keeping the first
    /// spelling seen. Prefixed tags never land in the plain list, even when
    /// their remainder is empty.
    pub fn from_raw<I, S>(raw: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let mut set = TagSet::default();
        let mut seen_collections = HashSet::new();
        let mut seen_tags = HashSet::new();

        for tag in raw {
            let tag = tag.as_ref().trim();
            if tag.is_empty() {
                continue;
            }

            match collection_name(tag) {
                Some(name) => {
                    if !name.is_empty() && seen_collections.insert(name.to_lowercase()) {
                        set.collections.push(name.to_string());
                    }
                }
                None => {
                    if seen_tags.insert(tag.to_lowercase()) {
                        set.tags.push(tag.to_string());
                    }
                }
            }
        }

        set
    }
}
