// src/lookup/mod.rs

use std::collections::{BTreeSet, HashSet};

use reqwest::blocking::Client;
use tracing::{debug, warn};

use crate::error::Result;
use crate::extract;
use crate::fetch;
use crate::normalize::{self, ColumnMap, LocodeRecord};

/// The master lookup table plus the country codes dropped while building it.
#[derive(Debug, Default, Clone, PartialEq)]
pub struct Lookup {
    /// Records in country iteration order, row order preserved per country.
    pub records: Vec<LocodeRecord>,
    /// Codes whose pages fetched fine but had no usable LOCODE table.
    pub skipped: Vec<String>,
}

/// Build the master lookup by fetching and normalizing one page per country
/// code, in input order.
///
/// `fetch_page` returns the page body for one code. A transport error from it
/// aborts the whole build; a [`MalformedPage`](crate::error::MalformedPage)
/// outcome from normalization skips that code with one diagnostic and the
/// loop continues. The closure seam keeps the continue-on-malformed /
/// abort-on-transport policy enforced by type and testable without a network.
pub fn build_lookup<F>(codes: &[String], map: &ColumnMap, mut fetch_page: F) -> Result<Lookup>
where
    F: FnMut(&str) -> Result<String>,
{
    let mut lookup = Lookup::default();
    for code in codes {
        let html = fetch_page(code)?;
        let grid = extract::extract_tables(&html);
        match normalize::normalize(&grid, map) {
            Ok(mut records) => {
                debug!(code = %code, records = records.len(), "country normalized");
                lookup.records.append(&mut records);
            }
            Err(err) => {
                warn!(code = %code, error = %err, "skipping country");
                lookup.skipped.push(code.clone());
            }
        }
    }
    Ok(lookup)
}

/// [`build_lookup`] over live per-country pages.
pub fn build_lookup_http(client: &Client, codes: &[String], map: &ColumnMap) -> Result<Lookup> {
    build_lookup(codes, map, |code| {
        fetch::get_text(client, &fetch::country_page_url(code))
    })
}

/// Requested codes with no matching 2-character LOCODE prefix in the table.
/// Comparison is case-insensitive; the returned set keeps the caller's
/// spelling.
pub fn missing_codes(records: &[LocodeRecord], requested: &[String]) -> BTreeSet<String> {
    let prefixes: HashSet<String> = records
        .iter()
        .filter_map(|record| record.locode.get(..2))
        .map(|prefix| prefix.to_ascii_lowercase())
        .collect();
    requested
        .iter()
        .filter(|code| !prefixes.contains(&code.to_ascii_lowercase()))
        .cloned()
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::Error;

    /// A page in the UNECE shape: three front-matter rows, header at row 3,
    /// then one row per (locode, name, function) triple.
    fn country_page(rows: &[(&str, &str, &str)]) -> String {
        let mut html = String::from(
            "<html><body><table>\
            <tr><td>UN/LOCODE</td></tr>\
            <tr><td></td></tr>\
            <tr><td>legend</td></tr>\
            <tr><td>Ch</td><td>LOCODE</td><td>Name</td><td>NameWoDia</td>\
            <td>Subdiv</td><td>Function</td><td>Status</td></tr>",
        );
        for (locode, name, function) in rows {
            html.push_str(&format!(
                "<tr><td></td><td>{locode}</td><td>{name}</td><td>{name}</td>\
                <td></td><td>{function}</td><td>AI</td></tr>"
            ));
        }
        html.push_str("</table></body></html>");
        html
    }

    /// A page whose only table is two rows, i.e. no usable LOCODE table.
    fn stub_page() -> String {
        "<html><body><table>\
        <tr><td>nothing</td></tr><tr><td>to see</td></tr>\
        </table></body></html>"
            .to_string()
    }

    fn codes(list: &[&str]) -> Vec<String> {
        list.iter().map(|c| c.to_string()).collect()
    }

    /// A reqwest error without touching the network: an invalid request URL.
    fn transport_error(url: &str) -> Error {
        let source = Client::new().get("not a url").send().unwrap_err();
        Error::Transport {
            url: url.to_string(),
            source,
        }
    }

    #[test]
    fn malformed_country_is_skipped_and_the_loop_continues() {
        let requested = codes(&["gb", "xx", "fr"]);
        let lookup = build_lookup(&requested, &ColumnMap::default(), |code| {
            Ok(match code {
                "gb" => country_page(&[("GB LON", "London", "1234----")]),
                "fr" => country_page(&[("FR PAR", "Paris", "--3-----")]),
                _ => stub_page(),
            })
        })
        .unwrap();

        assert_eq!(lookup.skipped, vec!["xx".to_string()]);
        let locodes: Vec<&str> = lookup.records.iter().map(|r| r.locode.as_str()).collect();
        assert_eq!(locodes, vec!["GBLON", "FRPAR"]);
        assert_eq!(lookup.records[0].function, vec!['1', '2', '3', '4']);
        assert!(!lookup
            .records
            .iter()
            .any(|r| r.locode.starts_with("XX") || r.locode.starts_with("xx")));
    }

    #[test]
    fn transport_failure_aborts_the_build() {
        let requested = codes(&["gb", "fr"]);
        let result = build_lookup(&requested, &ColumnMap::default(), |code| match code {
            "gb" => Ok(country_page(&[("GBLON", "London", "1-------")])),
            other => Err(transport_error(&fetch::country_page_url(other))),
        });
        assert!(matches!(result, Err(Error::Transport { .. })));
    }

    #[test]
    fn rows_keep_country_iteration_order() {
        let requested = codes(&["fr", "gb"]);
        let lookup = build_lookup(&requested, &ColumnMap::default(), |code| {
            Ok(match code {
                "fr" => country_page(&[("FRPAR", "Paris", "1-------"), ("FRLYS", "Lyon", "-2------")]),
                _ => country_page(&[("GBLON", "London", "1234----")]),
            })
        })
        .unwrap();
        let locodes: Vec<&str> = lookup.records.iter().map(|r| r.locode.as_str()).collect();
        assert_eq!(locodes, vec!["FRPAR", "FRLYS", "GBLON"]);
    }

    #[test]
    fn missing_codes_reports_absent_prefixes() {
        let lookup = build_lookup(&codes(&["gb", "fr"]), &ColumnMap::default(), |code| {
            Ok(match code {
                "gb" => country_page(&[("GBLON", "London", "1-------")]),
                _ => country_page(&[("FRPAR", "Paris", "1-------")]),
            })
        })
        .unwrap();

        let requested = codes(&["gb", "fr", "xx"]);
        let missing = missing_codes(&lookup.records, &requested);
        assert_eq!(missing, BTreeSet::from(["xx".to_string()]));
    }

    #[test]
    fn missing_codes_ignores_case() {
        let lookup = build_lookup(&codes(&["GB"]), &ColumnMap::default(), |_| {
            Ok(country_page(&[("GBLON", "London", "1-------")]))
        })
        .unwrap();
        assert!(missing_codes(&lookup.records, &codes(&["GB"])).is_empty());
        assert!(missing_codes(&lookup.records, &codes(&["gb"])).is_empty());
    }
}
