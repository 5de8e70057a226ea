// src/fetch/mod.rs

use reqwest::blocking::Client;
use tracing::debug;

use crate::error::{Error, Result};
use crate::extract::{self, Grid};

/// Per-country pages live under this base, keyed by lowercased alpha-2 code.
pub const LOCODE_PAGE_BASE: &str = "https://service.unece.org/trade/locode";

/// Reference page listing ISO alpha-2 country codes.
pub const COUNTRY_CODES_URL: &str = "https://www.iban.com/country-codes";

/// One row of the country-code reference table.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CountryCode {
    pub country_name: String,
    pub alpha_2_code: String,
}

/// Build the blocking HTTP client. `verify_tls: false` accepts invalid
/// certificates; the UNECE host has shipped broken chains before, so the
/// toggle stays a caller decision rather than a hardcoded default.
pub fn build_client(verify_tls: bool) -> Result<Client> {
    Client::builder()
        .danger_accept_invalid_certs(!verify_tls)
        .build()
        .map_err(Error::Client)
}

/// URL of the UN/LOCODE page for one country, code lowercased.
pub fn country_page_url(alpha_2_code: &str) -> String {
    format!("{}/{}.htm", LOCODE_PAGE_BASE, alpha_2_code.to_lowercase())
}

/// GET a page body as text. Non-success statuses and transport failures both
/// surface as [`Error::Transport`].
pub fn get_text(client: &Client, url: &str) -> Result<String> {
    debug!(%url, "fetching");
    let wrap = |source| Error::Transport {
        url: url.to_string(),
        source,
    };
    client
        .get(url)
        .send()
        .map_err(wrap)?
        .error_for_status()
        .map_err(wrap)?
        .text()
        .map_err(wrap)
}

/// Fetch the country-code reference page and extract `(name, alpha-2)` pairs.
pub fn fetch_country_codes(client: &Client) -> Result<Vec<CountryCode>> {
    let html = get_text(client, COUNTRY_CODES_URL)?;
    Ok(country_codes_from_grid(extract::extract_tables(&html)))
}

/// The first grid row is the header; columns {0,1} of the rest are the
/// country name and its alpha-2 code. Rows without both cells are dropped.
/// No cleaning beyond cell trim; callers lowercase codes when building URLs.
pub fn country_codes_from_grid(grid: Grid) -> Vec<CountryCode> {
    grid.into_iter()
        .skip(1)
        .filter_map(|row| {
            let mut cells = row.into_iter();
            let country_name = cells.next()?;
            let alpha_2_code = cells.next()?;
            Some(CountryCode {
                country_name,
                alpha_2_code,
            })
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn country_page_url_lowercases_the_code() {
        assert_eq!(
            country_page_url("GB"),
            "https://service.unece.org/trade/locode/gb.htm"
        );
        assert_eq!(
            country_page_url("fr"),
            "https://service.unece.org/trade/locode/fr.htm"
        );
    }

    #[test]
    fn country_codes_skip_header_and_short_rows() {
        let grid = vec![
            vec!["Country".to_string(), "Alpha-2 code".to_string()],
            vec![
                "United Kingdom".to_string(),
                "GB".to_string(),
                "GBR".to_string(),
            ],
            vec!["France".to_string(), "FR".to_string()],
            vec!["dangling".to_string()],
        ];
        let codes = country_codes_from_grid(grid);
        assert_eq!(
            codes,
            vec![
                CountryCode {
                    country_name: "United Kingdom".to_string(),
                    alpha_2_code: "GB".to_string(),
                },
                CountryCode {
                    country_name: "France".to_string(),
                    alpha_2_code: "FR".to_string(),
                },
            ]
        );
    }
}
