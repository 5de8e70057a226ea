// src/error.rs

use std::path::PathBuf;
use thiserror::Error;

/// Errors that can occur while building or loading the lookup table.
#[derive(Debug, Error)]
pub enum Error {
    /// Failed to construct the HTTP client.
    #[error("building HTTP client: {0}")]
    Client(#[source] reqwest::Error),

    /// Network-level failure (DNS, TLS, connect, non-success status, body
    /// read). Never absorbed; aborts the whole build.
    #[error("GET {url} failed: {source}")]
    Transport {
        url: String,
        #[source]
        source: reqwest::Error,
    },

    /// Page fetched but its tables do not match the expected UN/LOCODE
    /// layout. The only error the lookup builder absorbs per country.
    #[error(transparent)]
    Malformed(#[from] MalformedPage),

    /// Cache file exists but cannot be read. Deliberately distinct from a
    /// cache miss; a rebuild would clobber a file we could not even open.
    #[error("reading cache {path}: {source}")]
    CacheIo {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// Cache file exists but is not a valid lookup CSV.
    #[error("cache {path} is not a valid lookup table: {source}")]
    CacheFormat {
        path: PathBuf,
        #[source]
        source: csv::Error,
    },

    /// Failure while writing the cache file.
    #[error("writing cache {path}: {source}")]
    CacheWrite {
        path: PathBuf,
        #[source]
        source: csv::Error,
    },
}

/// A per-country page whose table grid cannot be normalized.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum MalformedPage {
    /// The grid ends before the header row, typically a country with no
    /// LOCODE table at all.
    #[error("table has {rows} rows, header expected at row {header_row}")]
    TooFewRows { rows: usize, header_row: usize },

    /// The header row exists but its LOCODE column reads something else.
    #[error("header column reads {found:?} where {expected:?} was expected")]
    HeaderMismatch {
        expected: &'static str,
        found: String,
    },
}

pub type Result<T> = std::result::Result<T, Error>;
