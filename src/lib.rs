//! Scrapes the per-country UN/LOCODE reference tables published by UNECE,
//! normalizes them into one master lookup table, and caches the result as
//! CSV so repeat runs skip the network.

use std::path::PathBuf;

pub mod error;
pub mod extract;
pub mod fetch;
pub mod lookup;
pub mod normalize;
pub mod store;

pub use error::{Error, MalformedPage, Result};

/// Run-level configuration. There are no CLI flags or env knobs beyond
/// `RUST_LOG`; callers construct this directly.
#[derive(Debug, Clone)]
pub struct Config {
    /// Verify TLS certificates. Turning this off is an accepted
    /// reduced-security posture for hosts with broken chains.
    pub verify_tls: bool,
    /// Where the master lookup CSV is cached between runs.
    pub cache_path: PathBuf,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            verify_tls: true,
            cache_path: PathBuf::from("outputs/unlocode_lookup.csv"),
        }
    }
}
