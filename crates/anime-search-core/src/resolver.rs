//! Query interpretation
//!
//! A query is either a 1-based position in the dataset (`"3"`, `" 12 "`) or a
//! piece of a title. Titles are matched case-insensitively in dataset order and
//! the first hit wins.

use crate::dataset::{AnimeRecord, Dataset};
use std::num::IntErrorKind;

/// Result of resolving a query
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Resolution<'a> {
    /// A record matched, with its 1-based position
    Found {
        /// The matched record
        record: &'a AnimeRecord,
        /// Position shown to users
        position: usize,
    },
    /// The query was a number outside `1..=len`
    InvalidSelection(i64),
    /// No title contains the query
    NotFound,
}

/// Resolve free text against the dataset.
///
/// # Examples
///
/// ```
/// use anime_search_core::dataset::Dataset;
/// use anime_search_core::resolver::{resolve, Resolution};
///
/// let dataset = Dataset::from_json_str(r#"[{"title": "Naruto"}, {"title": "Bleach"}]"#)?;
/// assert!(matches!(resolve(&dataset, "2"), Resolution::Found { position: 2, .. }));
/// assert!(matches!(resolve(&dataset, "BLEA"), Resolution::Found { position: 2, .. }));
/// assert_eq!(resolve(&dataset, "0"), Resolution::InvalidSelection(0));
/// assert_eq!(resolve(&dataset, "Zzzznotreal"), Resolution::NotFound);
/// # Ok::<(), anime_search_core::dataset::LoadError>(())
/// ```
#[must_use]
pub fn resolve<'a>(dataset: &'a Dataset, query: &str) -> Resolution<'a> {
    match parse_selection(query) {
        Some(n) => select(dataset, n),
        None => find_by_title(dataset, query),
    }
}

/// Parse a query as an integer selection.
///
/// Surrounding whitespace is ignored. Integers that overflow `i64` still count
/// as numeric and saturate so they land outside any valid range.
fn parse_selection(query: &str) -> Option<i64> {
    match query.trim().parse::<i64>() {
        Ok(n) => Some(n),
        Err(e) => match e.kind() {
            IntErrorKind::PosOverflow => Some(i64::MAX),
            IntErrorKind::NegOverflow => Some(i64::MIN),
            _ => None,
        },
    }
}

fn select(dataset: &Dataset, n: i64) -> Resolution<'_> {
    usize::try_from(n)
        .ok()
        .and_then(|position| {
            dataset
                .get(position)
                .map(|record| Resolution::Found { record, position })
        })
        .unwrap_or(Resolution::InvalidSelection(n))
}

fn find_by_title<'a>(dataset: &'a Dataset, query: &str) -> Resolution<'a> {
    let needle = query.to_lowercase();
    dataset
        .iter()
        .enumerate()
        .find(|(_, record)| record.title.to_lowercase().contains(&needle))
        .map_or(Resolution::NotFound, |(index, record)| Resolution::Found {
            record,
            position: index + 1,
        })
}
