#![deny(missing_docs)]
//! Anime search core library.
//!
//! Dataset loading, channel membership policy, query resolution and reply
//! formatting, independent of any messaging transport.

/// Core configuration loading.
pub mod config;
/// Anime dataset and its loader.
pub mod dataset;
/// Channel membership lookup and access policy.
pub mod membership;
/// Reply rendering for users.
pub mod reply;
/// Query interpretation against the dataset.
pub mod resolver;
/// Gate + resolver + formatter pipeline.
pub mod search;
