//! Image probe plan: storage positions, resolutions and URL naming

use serde::{Deserialize, Serialize};

/// A storage position (camera angle) and the resolutions shot for it
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StorageGroup {
    pub name: String,
    pub resolutions: Vec<String>,
}

impl StorageGroup {
    pub fn new(name: &str, resolutions: &[&str]) -> Self {
        StorageGroup {
            name: name.to_string(),
            resolutions: resolutions.iter().map(|r| r.to_string()).collect(),
        }
    }
}

/// Storage positions probed when the config does not list any
pub fn default_storage_groups() -> Vec<StorageGroup> {
    const STANDARD: &[&str] = &["detail", "gallery", "box", "story"];
    vec![
        StorageGroup::new("depan", STANDARD),
        StorageGroup::new("kiri", STANDARD),
        StorageGroup::new("kanan", STANDARD),
        StorageGroup::new("belakang", STANDARD),
        StorageGroup::new(
            "sudut",
            &["detail", "gallery", "box", "story", "hero", "thumbnail", "hbanner"],
        ),
        StorageGroup::new("interior", &["detail", "gallery", "hero"]),
        StorageGroup::new("exterior", &["detail", "gallery", "hero"]),
    ]
}

/// Numeric token for a probe index: empty for 0, two digits otherwise
pub fn index_suffix(index: u32) -> String {
    if index == 0 {
        String::new()
    } else {
        format!("{:02}", index)
    }
}

/// Remote URL for one probe, e.g. `{base}CHAIR-01_depan02_gallery.jpg`
pub fn image_url(
    base_url: &str,
    item_code: &str,
    storage: &str,
    index: u32,
    resolution: &str,
) -> String {
    format!(
        "{}{}_{}{}_{}.jpg",
        base_url,
        item_code,
        storage,
        index_suffix(index),
        resolution
    )
}

/// Capitalize the first letter of every word and lowercase the rest.
fn title_case(s: &str) -> String {
    let mut out = String::with_capacity(s.len());
    let mut prev_alpha = false;
    for c in s.chars() {
        if prev_alpha {
            out.extend(c.to_lowercase());
        } else {
            out.extend(c.to_uppercase());
        }
        prev_alpha = c.is_alphabetic();
    }
    out
}

/// Display name for an attached image, e.g. `Depan02 Gallery.jpg`
pub fn attachment_file_name(storage: &str, index: u32, resolution: &str) -> String {
    format!(
        "{}{} {}.jpg",
        title_case(storage),
        index_suffix(index),
        title_case(resolution)
    )
}

/// Consecutive-miss counter for one (storage, resolution) series
#[derive(Debug, Clone)]
pub struct MissTracker {
    consecutive: u32,
    threshold: u32,
}

impl MissTracker {
    pub fn new(threshold: u32) -> Self {
        MissTracker {
            consecutive: 0,
            threshold,
        }
    }

    /// A hit resets the streak
    pub fn record_hit(&mut self) {
        self.consecutive = 0;
    }

    /// Record a miss and report whether the series should stop
    pub fn record_miss(&mut self) -> bool {
        self.consecutive += 1;
        self.consecutive >= self.threshold
    }

    pub fn consecutive(&self) -> u32 {
        self.consecutive
    }
}
