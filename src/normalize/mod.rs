// src/normalize/mod.rs

use serde::{Deserialize, Serialize};

use crate::error::MalformedPage;
use crate::extract::Grid;

/// Label the normalizer requires in the header's LOCODE column before it
/// trusts the rest of the layout.
const LOCODE_HEADER: &str = "LOCODE";

/// Where the UN/LOCODE fields live in a per-country grid. The defaults match
/// the UNECE page layout: three front-matter rows, the header at row 3, data
/// from row 4, and the leading change-marker column discarded.
#[derive(Debug, Clone)]
pub struct ColumnMap {
    pub header_row: usize,
    pub locode: usize,
    pub name: usize,
    pub name_wo_diacritics: usize,
    pub subdivision: usize,
    pub function: usize,
    pub status: usize,
}

impl Default for ColumnMap {
    fn default() -> Self {
        Self {
            header_row: 3,
            locode: 1,
            name: 2,
            name_wo_diacritics: 3,
            subdivision: 4,
            function: 5,
            status: 6,
        }
    }
}

/// One normalized row of the lookup table. `locode` is compacted (all
/// whitespace removed, interior included); `function` holds the individual
/// function-flag characters with the filler dashes dropped.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LocodeRecord {
    #[serde(rename = "LOCODE")]
    pub locode: String,
    #[serde(rename = "Name")]
    pub name: String,
    #[serde(rename = "NameWoDiacritics")]
    pub name_wo_diacritics: String,
    #[serde(rename = "SubDiv")]
    pub subdivision: String,
    #[serde(rename = "Function", with = "function_flags")]
    pub function: Vec<char>,
    #[serde(rename = "Status")]
    pub status: String,
}

/// `Function` round-trips as the plain concatenation of its flag characters.
/// Lossless: every flag is exactly one non-dash character.
mod function_flags {
    use serde::{Deserialize, Deserializer, Serializer};

    pub fn serialize<S: Serializer>(flags: &[char], serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(&flags.iter().collect::<String>())
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(deserializer: D) -> Result<Vec<char>, D::Error> {
        Ok(String::deserialize(deserializer)?.chars().collect())
    }
}

/// Normalize a raw per-country grid into lookup records.
///
/// Front-matter rows before the header are discarded. A grid too short to
/// reach the header row fails with [`MalformedPage::TooFewRows`]; callers
/// iterating countries are expected to absorb that per page, not abort the
/// batch. Data rows shorter than the column map are padded with empty cells.
pub fn normalize(grid: &Grid, map: &ColumnMap) -> Result<Vec<LocodeRecord>, MalformedPage> {
    let header = grid.get(map.header_row).ok_or(MalformedPage::TooFewRows {
        rows: grid.len(),
        header_row: map.header_row,
    })?;

    let label = cell(header, map.locode);
    if !label.trim().eq_ignore_ascii_case(LOCODE_HEADER) {
        return Err(MalformedPage::HeaderMismatch {
            expected: LOCODE_HEADER,
            found: label,
        });
    }

    let records = grid[map.header_row + 1..]
        .iter()
        .map(|row| LocodeRecord {
            locode: compact(&cell(row, map.locode)),
            name: cell(row, map.name),
            name_wo_diacritics: cell(row, map.name_wo_diacritics),
            subdivision: cell(row, map.subdivision),
            function: function_flag_list(&cell(row, map.function)),
            status: cell(row, map.status),
        })
        .collect();

    Ok(records)
}

fn cell(row: &[String], index: usize) -> String {
    row.get(index).cloned().unwrap_or_default()
}

/// Remove all whitespace, interior included. "GB LON" becomes "GBLON".
fn compact(text: &str) -> String {
    text.split_whitespace().collect()
}

/// Drop the dash placeholders and keep each remaining character as one flag.
fn function_flag_list(text: &str) -> Vec<char> {
    text.chars().filter(|c| *c != '-').collect()
}
