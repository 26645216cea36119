use serde::{Deserialize, Serialize};

/// One tag definition as served by the tag endpoint.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TagEntry {
    #[serde(default)]
    pub name: String,
    pub code: String,
    pub label: String,
}

/// Ordered list of tag definitions, cached and replaced as a whole.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct TagMap {
    entries: Vec<TagEntry>,
}

impl TagMap {
    pub fn new(entries: Vec<TagEntry>) -> Self {
        TagMap { entries }
    }

    pub fn entries(&self) -> &[TagEntry] {
        &self.entries
    }

    /// Label of the first entry with this code.
    pub fn label_for(&self, code: &str) -> Option<&str> {
        self.entries
            .iter()
            .find(|entry| entry.code == code)
            .map(|entry| entry.label.as_str())
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

impl From<Vec<TagEntry>> for TagMap {
    fn from(entries: Vec<TagEntry>) -> Self {
        TagMap::new(entries)
    }
}

/// Whether the in-memory tag map has been populated yet.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum TagLoadState {
    NotLoaded,
    Loaded,
}
