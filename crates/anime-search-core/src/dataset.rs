//! Read-only anime catalog.
//!
//! The catalog is a JSON array of [`AnimeRecord`] objects. It is loaded once at
//! startup and shared behind an `Arc` afterwards; nothing mutates it.

use serde::{Deserialize, Deserializer, Serialize};
use std::fmt;
use std::path::{Path, PathBuf};
use thiserror::Error;
use tracing::{info, warn};

/// Errors that can occur while loading the dataset
#[derive(Debug, Error)]
pub enum LoadError {
    /// The dataset file is missing or unreadable
    #[error("failed to read dataset {}: {source}", path.display())]
    Read {
        /// Path that was attempted
        path: PathBuf,
        /// Underlying I/O error
        #[source]
        source: std::io::Error,
    },
    /// The document is not a JSON array of well-formed records
    #[error("malformed dataset: {0}")]
    Malformed(#[from] serde_json::Error),
}

/// Episode count as it appears in the document: a number or free text
/// such as `"12 + OVA"`.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
#[serde(untagged)]
pub enum Episodes {
    /// Plain episode count
    Count(u64),
    /// Anything else, rendered verbatim
    Text(String),
}

impl Default for Episodes {
    fn default() -> Self {
        Self::Text(String::new())
    }
}

impl fmt::Display for Episodes {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Count(n) => write!(f, "{n}"),
            Self::Text(s) => f.write_str(s),
        }
    }
}

/// One catalog entry
#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
pub struct AnimeRecord {
    /// Display title, used for substring lookup
    pub title: String,
    /// Cover image URL or Telegram file id
    #[serde(default, deserialize_with = "null_as_default")]
    pub image: String,
    /// Short plot summary
    #[serde(default, deserialize_with = "null_as_default")]
    pub synopsis: String,
    /// Audio/subtitle language description
    #[serde(default, deserialize_with = "null_as_default")]
    pub language: String,
    /// Episode count
    #[serde(default, deserialize_with = "null_as_default")]
    pub episodes: Episodes,
    /// Subbed streaming link
    #[serde(default, deserialize_with = "null_as_default")]
    pub sub: String,
    /// Dubbed streaming link
    #[serde(default, deserialize_with = "null_as_default")]
    pub dub: String,
    /// Download link
    #[serde(default, deserialize_with = "null_as_default")]
    pub download: String,
    /// Official or info website
    #[serde(default, deserialize_with = "null_as_default")]
    pub website: String,
}

/// Explicit `null` reads the same as a missing field.
fn null_as_default<'de, D, T>(deserializer: D) -> Result<T, D::Error>
where
    D: Deserializer<'de>,
    T: Default + Deserialize<'de>,
{
    Ok(Option::<T>::deserialize(deserializer)?.unwrap_or_default())
}

/// Ordered, immutable collection of anime records
#[derive(Debug, Clone, Default)]
pub struct Dataset {
    records: Vec<AnimeRecord>,
}

impl Dataset {
    /// Load the dataset from a JSON file
    ///
    /// # Errors
    ///
    /// Returns [`LoadError::Read`] if the file cannot be read and
    /// [`LoadError::Malformed`] if it is not a valid array of records.
    pub fn load(path: impl AsRef<Path>) -> Result<Self, LoadError> {
        let path = path.as_ref();
        let raw = std::fs::read_to_string(path).map_err(|source| LoadError::Read {
            path: path.to_path_buf(),
            source,
        })?;

        let dataset = Self::from_json_str(&raw)?;
        if dataset.is_empty() {
            warn!("Dataset {} contains no records", path.display());
        } else {
            info!(
                "Loaded {} anime records from {}",
                dataset.len(),
                path.display()
            );
        }
        Ok(dataset)
    }

    /// Parse a dataset from an in-memory JSON document
    ///
    /// # Errors
    ///
    /// Returns [`LoadError::Malformed`] if the document does not describe an
    /// array of records with at least a `title` each.
    pub fn from_json_str(raw: &str) -> Result<Self, LoadError> {
        let records: Vec<AnimeRecord> = serde_json::from_str(raw)?;
        Ok(Self { records })
    }

    /// Build a dataset from already parsed records, keeping their order
    #[must_use]
    pub const fn from_records(records: Vec<AnimeRecord>) -> Self {
        Self { records }
    }

    /// Number of records
    #[must_use]
    pub fn len(&self) -> usize {
        self.records.len()
    }

    /// Returns true if the dataset has no records
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    /// Record at a 1-based position, as shown to users
    #[must_use]
    pub fn get(&self, position: usize) -> Option<&AnimeRecord> {
        position
            .checked_sub(1)
            .and_then(|index| self.records.get(index))
    }

    /// Iterate records in document order
    pub fn iter(&self) -> std::slice::Iter<'_, AnimeRecord> {
        self.records.iter()
    }
}

impl<'a> IntoIterator for &'a Dataset {
    type Item = &'a AnimeRecord;
    type IntoIter = std::slice::Iter<'a, AnimeRecord>;

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}
