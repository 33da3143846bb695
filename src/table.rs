//! Station-code table extraction
//!
//! The source page lists every station code in a styled table. Retired
//! codes are either struck through (`<del>` in the code cell) or carry a
//! dagger in the remarks column; both are dropped.

use anyhow::{anyhow, bail, Result};
use scraper::{ElementRef, Html, Selector};
use std::sync::OnceLock;

use crate::html::{normalized_text, static_selector};
use crate::types::{
    StationRow, StationTable, HANJA_NAME_COLUMN, LOCAL_NAME_COLUMN, MIN_COLUMNS, STATUS_COLUMN,
};

/// Marker in the remarks column for retired stations
pub const RETIRED_MARKER: char = '†';

static ROW_SELECTOR: OnceLock<Selector> = OnceLock::new();
static CELL_SELECTOR: OnceLock<Selector> = OnceLock::new();
static DEL_SELECTOR: OnceLock<Selector> = OnceLock::new();

/// Where the station table lives on the source page
#[derive(Debug, Clone)]
pub struct TableLocator {
    /// CSS selector matching candidate tables
    pub selector: String,
    /// Which match to use (0-based)
    pub index: usize,
}

fn strip_whitespace(text: &str) -> String {
    text.chars().filter(|c| !c.is_whitespace()).collect()
}

fn is_struck_through(cell: ElementRef) -> bool {
    cell.select(static_selector(&DEL_SELECTOR, "del")).next().is_some()
}

/// Turn one `<tr>` into a row, or `None` for a retired one
fn extract_row(row: ElementRef, row_index: usize) -> Result<Option<StationRow>> {
    let cells: Vec<ElementRef> = row.select(static_selector(&CELL_SELECTOR, "td")).collect();
    if cells.len() < MIN_COLUMNS {
        bail!(
            "Station table row {} has {} cells, expected at least {}",
            row_index,
            cells.len(),
            MIN_COLUMNS
        );
    }

    if is_struck_through(cells[0]) || normalized_text(cells[STATUS_COLUMN]).contains(RETIRED_MARKER)
    {
        return Ok(None);
    }

    let mut values = Vec::with_capacity(cells.len());
    for (index, cell) in cells.iter().enumerate() {
        // Already screened above; kept as a second guard on the code cell
        if index == 0 && is_struck_through(*cell) {
            return Ok(None);
        }
        let text = normalized_text(*cell);
        values.push(match index {
            LOCAL_NAME_COLUMN | HANJA_NAME_COLUMN => strip_whitespace(&text),
            _ => text,
        });
    }
    Ok(Some(StationRow::new(values)))
}

/// Extract the header and all active station rows from the source page.
///
/// A missing table or a row too short to hold a station is an error for
/// the whole document.
pub fn extract_stations(html: &str, locator: &TableLocator) -> Result<StationTable> {
    let document = Html::parse_document(html);
    let table_selector = Selector::parse(&locator.selector)
        .map_err(|e| anyhow!("Invalid table selector `{}`: {}", locator.selector, e))?;

    let table = document
        .select(&table_selector)
        .nth(locator.index)
        .ok_or_else(|| {
            anyhow!(
                "Station table `{}` #{} not found on source page",
                locator.selector,
                locator.index
            )
        })?;

    let mut extracted = Vec::new();
    for (row_index, row) in table.select(static_selector(&ROW_SELECTOR, "tr")).enumerate() {
        if let Some(station) = extract_row(row, row_index)? {
            extracted.push(station);
        }
    }

    let mut rows = extracted.into_iter();
    let header = rows
        .next()
        .ok_or_else(|| anyhow!("Station table has no header row"))?
        .into_cells();
    let rows = rows.collect();

    Ok(StationTable { header, rows })
}

#[cfg(test)]
mod tests {
    use super::*;

    const DECOY: &str = r#"<table class="stations"><tr><td>decoy</td></tr></table>"#;

    fn locator() -> TableLocator {
        TableLocator {
            selector: "table.stations".to_string(),
            index: 1,
        }
    }

    fn page(rows: &str) -> String {
        format!(
            r#"<html><body>{}<table class="stations"><tbody>
            <tr><td>역코드</td><td>역명</td><td>한자</td><td>노선</td><td>비고</td></tr>
            {}
            </tbody></table></body></html>"#,
            DECOY, rows
        )
    }

    #[test]
    fn test_extracts_header_and_rows() {
        let html = page(
            r#"<tr><td>0001</td><td>서울</td><td>서울</td><td>경부선</td><td></td></tr>
               <tr><td>0002</td><td>용산</td><td>龍山</td><td>경부선</td><td></td></tr>"#,
        );
        let table = extract_stations(&html, &locator()).unwrap();
        assert_eq!(table.header, vec!["역코드", "역명", "한자", "노선", "비고"]);
        assert_eq!(table.rows.len(), 2);
        assert_eq!(table.rows[0].code(), "0001");
        assert_eq!(table.rows[1].hanja_name(), "龍山");
    }

    #[test]
    fn test_dagger_row_is_dropped() {
        let html = page(
            r#"<tr><td>0001</td><td>서울</td><td>서울</td><td>경부선</td><td></td></tr>
               <tr><td>0003</td><td>폐역</td><td>廢驛</td><td>경부선</td><td>2004년 폐지 †</td></tr>"#,
        );
        let table = extract_stations(&html, &locator()).unwrap();
        assert_eq!(table.rows.len(), 1);
        assert_eq!(table.rows[0].local_name(), "서울");
    }

    #[test]
    fn test_struck_code_is_dropped_without_dagger() {
        let html = page(
            r#"<tr><td><del>0004</del></td><td>구역</td><td>舊驛</td><td>중앙선</td><td></td></tr>
               <tr><td>0005</td><td>신역</td><td>新驛</td><td>중앙선</td><td></td></tr>"#,
        );
        let table = extract_stations(&html, &locator()).unwrap();
        assert_eq!(table.rows.len(), 1);
        assert_eq!(table.rows[0].code(), "0005");
    }

    #[test]
    fn test_whitespace_stripped_only_in_name_columns() {
        let html = page(
            r#"<tr><td>0006</td><td> 서 울 </td><td>서 울</td><td>경부 고속선</td><td>환승  가능</td></tr>"#,
        );
        let table = extract_stations(&html, &locator()).unwrap();
        let row = &table.rows[0];
        assert_eq!(row.local_name(), "서울");
        assert_eq!(row.hanja_name(), "서울");
        assert_eq!(row.line_name(), "경부 고속선");
        assert_eq!(row.cells()[4], "환승 가능");
    }

    #[test]
    fn test_extra_columns_carried_through() {
        let html = page(
            r#"<tr><td>0007</td><td>부산</td><td>釜山</td><td>경부선</td><td></td><td>extra</td></tr>"#,
        );
        let table = extract_stations(&html, &locator()).unwrap();
        assert_eq!(table.rows[0].cells().last().unwrap(), "extra");
    }

    #[test]
    fn test_missing_table_is_fatal() {
        let html = format!("<html><body>{}</body></html>", DECOY);
        assert!(extract_stations(&html, &locator()).is_err());
    }

    #[test]
    fn test_short_row_is_fatal() {
        let html = page(r#"<tr><td>0008</td><td>대전</td></tr>"#);
        assert!(extract_stations(&html, &locator()).is_err());
    }
}
