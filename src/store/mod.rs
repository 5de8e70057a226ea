// src/store/mod.rs

use std::fs::{self, File};
use std::io;
use std::path::Path;

use tracing::info;

use crate::error::{Error, Result};
use crate::lookup::Lookup;
use crate::normalize::LocodeRecord;

/// Persist the lookup table as CSV (header row included). Writes to a
/// sibling `.tmp` file and renames over the final path, so an interrupted
/// write never leaves a partial cache behind.
pub fn save(path: &Path, records: &[LocodeRecord]) -> Result<()> {
    let tmp = path.with_extension("csv.tmp");
    let wrap = |source: csv::Error| Error::CacheWrite {
        path: path.to_path_buf(),
        source,
    };

    let mut writer = csv::Writer::from_path(&tmp).map_err(wrap)?;
    for record in records {
        writer.serialize(record).map_err(wrap)?;
    }
    writer.flush().map_err(|e| wrap(csv::Error::from(e)))?;
    drop(writer);

    fs::rename(&tmp, path).map_err(|e| wrap(csv::Error::from(e)))?;
    info!(path = %path.display(), records = records.len(), "lookup saved");
    Ok(())
}

/// Read a previously persisted lookup table.
pub fn load(path: &Path) -> Result<Vec<LocodeRecord>> {
    let file = File::open(path).map_err(|source| Error::CacheIo {
        path: path.to_path_buf(),
        source,
    })?;
    read_records(file, path)
}

/// Return the cached lookup if the file exists, otherwise run `build`, save
/// its result, and return it.
///
/// Only `NotFound` counts as a cache miss. A file we cannot open surfaces as
/// [`Error::CacheIo`] and unparseable content as [`Error::CacheFormat`];
/// neither triggers a silent rebuild over the existing file.
pub fn load_or_build<F>(path: &Path, build: F) -> Result<Lookup>
where
    F: FnOnce() -> Result<Lookup>,
{
    match File::open(path) {
        Ok(file) => {
            info!(path = %path.display(), "loading cached lookup");
            let records = read_records(file, path)?;
            Ok(Lookup {
                records,
                skipped: Vec::new(),
            })
        }
        Err(e) if e.kind() == io::ErrorKind::NotFound => {
            info!(path = %path.display(), "no cached lookup, building");
            let lookup = build()?;
            save(path, &lookup.records)?;
            Ok(lookup)
        }
        Err(source) => Err(Error::CacheIo {
            path: path.to_path_buf(),
            source,
        }),
    }
}

fn read_records(file: File, path: &Path) -> Result<Vec<LocodeRecord>> {
    let mut reader = csv::Reader::from_reader(file);
    let mut records = Vec::new();
    for row in reader.deserialize() {
        let record: LocodeRecord = row.map_err(|source| Error::CacheFormat {
            path: path.to_path_buf(),
            source,
        })?;
        records.push(record);
    }
    Ok(records)
}
