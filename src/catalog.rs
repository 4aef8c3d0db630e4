//! The intent catalog: tag -> candidate responses.
//!
//! The catalog is read from a JSON document shaped like
//!
//! ```json
//! { "intents": [ { "tag": "greeting", "patterns": ["hi"], "responses": ["Hello!"] } ] }
//! ```
//!
//! Only `tag` and `responses` are consumed; any other field is ignored.

use std::collections::HashMap;

use serde::{Deserialize, Serialize};

use crate::error::{LoadError, LoadResult};

/// One intent and the responses it may produce.
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct IntentEntry {
    tag: String,
    responses: Vec<String>,
}

impl IntentEntry {
    /// Create an entry; the tag must be non-empty and there must be at least
    /// one response.
    pub fn new<T, I, S>(tag: T, responses: I) -> LoadResult<Self>
    where
        T: Into<String>,
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let tag = tag.into();
        let responses: Vec<String> = responses.into_iter().map(Into::into).collect();
        if tag.is_empty() {
            return Err(LoadError::schema("intent tag must not be empty"));
        }
        if responses.is_empty() {
            return Err(LoadError::schema(format!("intent {tag:?} has no responses")));
        }
        Ok(Self { tag, responses })
    }

    /// The intent tag.
    pub fn tag(&self) -> &str {
        &self.tag
    }

    /// Candidate responses, never empty.
    pub fn responses(&self) -> &[String] {
        &self.responses
    }
}

#[derive(Deserialize)]
struct RawCatalog {
    intents: Option<Vec<RawEntry>>,
}

#[derive(Deserialize)]
struct RawEntry {
    tag: Option<String>,
    responses: Option<Vec<String>>,
}

/// An ordered, immutable collection of intents with unique tags.
#[derive(Clone, Debug, Default)]
pub struct IntentCatalog {
    entries: Vec<IntentEntry>,
    index: HashMap<String, usize>,
}

impl IntentCatalog {
    /// Build a catalog from entries, rejecting duplicate tags.
    pub fn from_entries(entries: Vec<IntentEntry>) -> LoadResult<Self> {
        let mut index = HashMap::with_capacity(entries.len());
        for (position, entry) in entries.iter().enumerate() {
            if index.insert(entry.tag.clone(), position).is_some() {
                return Err(LoadError::schema(format!(
                    "duplicate intent tag {:?}",
                    entry.tag
                )));
            }
        }
        Ok(Self { entries, index })
    }

    /// Parse a catalog document.
    ///
    /// Malformed JSON is reported as [`LoadError::Corrupt`]; well-formed JSON of
    /// the wrong shape as [`LoadError::SchemaInvalid`].
    pub fn from_json_str(source: &str, json: &str) -> LoadResult<Self> {
        let value: serde_json::Value =
            serde_json::from_str(json).map_err(|e| LoadError::corrupt(source, e.to_string()))?;
        let raw: RawCatalog =
            serde_json::from_value(value).map_err(|e| LoadError::schema(e.to_string()))?;
        let raw_entries = raw
            .intents
            .ok_or_else(|| LoadError::schema("missing \"intents\" list"))?;

        let entries = raw_entries
            .into_iter()
            .enumerate()
            .map(|(position, raw)| {
                let tag = raw.tag.ok_or_else(|| {
                    LoadError::schema(format!("intent entry {position} has no \"tag\""))
                })?;
                let responses = raw.responses.unwrap_or_default();
                IntentEntry::new(tag, responses)
            })
            .collect::<LoadResult<Vec<_>>>()?;

        Self::from_entries(entries)
    }

    /// Parse a catalog document from raw bytes.
    pub fn from_bytes(source: &str, bytes: &[u8]) -> LoadResult<Self> {
        let json = std::str::from_utf8(bytes)
            .map_err(|e| LoadError::corrupt(source, format!("not valid UTF-8: {e}")))?;
        Self::from_json_str(source, json)
    }

    /// Look up an entry by exact, case-sensitive tag.
    pub fn get(&self, tag: &str) -> Option<&IntentEntry> {
        self.index.get(tag).map(|&position| &self.entries[position])
    }

    /// Check whether the catalog has an entry for `tag`.
    pub fn contains(&self, tag: &str) -> bool {
        self.index.contains_key(tag)
    }

    /// Tags in catalog order.
    pub fn tags(&self) -> impl Iterator<Item = &str> {
        self.entries.iter().map(|entry| entry.tag.as_str())
    }

    /// Entries in catalog order.
    pub fn iter(&self) -> impl Iterator<Item = &IntentEntry> {
        self.entries.iter()
    }

    /// Number of intents.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// True when the catalog has no intents.
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}
