use std::fs;

use anyhow::Result;
use tracing::{info, warn};
use tracing_subscriber::{fmt, EnvFilter};
use unlocode_scraper::{fetch, lookup, normalize::ColumnMap, store, Config};

fn main() -> Result<()> {
    let env = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    fmt::Subscriber::builder().with_env_filter(env).init();
    info!("startup");

    let config = Config::default();
    if let Some(dir) = config.cache_path.parent() {
        fs::create_dir_all(dir)?;
    }
    let client = fetch::build_client(config.verify_tls)?;

    // The code list drives both the build and the completeness check, so it
    // is fetched even when the lookup itself comes from the cache.
    let countries = fetch::fetch_country_codes(&client)?;
    info!(count = countries.len(), "country codes fetched");
    let codes: Vec<String> = countries
        .into_iter()
        .map(|country| country.alpha_2_code)
        .collect();

    let map = ColumnMap::default();
    let table = store::load_or_build(&config.cache_path, || {
        lookup::build_lookup_http(&client, &codes, &map)
    })?;
    info!(
        records = table.records.len(),
        skipped = table.skipped.len(),
        "lookup ready"
    );

    let missing = lookup::missing_codes(&table.records, &codes);
    if missing.is_empty() {
        info!("all requested country codes present in the lookup");
    } else {
        warn!(?missing, "country codes absent from the lookup");
    }

    Ok(())
}
