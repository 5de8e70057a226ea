// src/extract/mod.rs

use once_cell::sync::Lazy;
use scraper::{ElementRef, Html, Selector};

/// A generic row/column text table pulled out of markup, before any header
/// semantics are assigned.
pub type Grid = Vec<Vec<String>>;

static TABLE_SELECTOR: Lazy<Selector> =
    Lazy::new(|| Selector::parse("table").expect("Invalid CSS selector for tables"));
static ROW_SELECTOR: Lazy<Selector> =
    Lazy::new(|| Selector::parse("tr").expect("Invalid CSS selector for table rows"));
static CELL_SELECTOR: Lazy<Selector> =
    Lazy::new(|| Selector::parse("td").expect("Invalid CSS selector for data cells"));

/// Convert one `<table>` element into a grid: one row per `<tr>`, one cell
/// per `<td>` with surrounding whitespace trimmed. `<th>` cells are not
/// collected, so header-only rows come out empty. Never fails; a table with
/// no rows or cells yields an empty or short grid.
pub fn parse_table(table: ElementRef<'_>) -> Grid {
    table
        .select(&ROW_SELECTOR)
        .map(|row| {
            row.select(&CELL_SELECTOR)
                .map(|cell| cell.text().collect::<String>().trim().to_string())
                .collect()
        })
        .collect()
}

/// Parse every `<table>` on a page and concatenate the grids vertically, in
/// discovery order. A page with no tables yields an empty grid.
pub fn extract_tables(html: &str) -> Grid {
    let document = Html::parse_document(html);
    let mut grid = Grid::new();
    for table in document.select(&TABLE_SELECTOR) {
        grid.extend(parse_table(table));
    }
    grid
}
