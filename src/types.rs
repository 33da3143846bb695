//! Station table rows, coordinates and the merged output row

use thiserror::Error;

use crate::dms::DmsError;
use crate::net::FetchError;

/// Column holding the station code
pub const CODE_COLUMN: usize = 0;
/// Column holding the station name in Hangul
pub const LOCAL_NAME_COLUMN: usize = 1;
/// Column holding the station name in Hanja
pub const HANJA_NAME_COLUMN: usize = 2;
/// Column holding the line name
pub const LINE_COLUMN: usize = 3;
/// Remarks column where retired stations carry a dagger
pub const STATUS_COLUMN: usize = 4;

/// Minimum number of cells a source table row must have
pub const MIN_COLUMNS: usize = STATUS_COLUMN + 1;

/// One surviving row of the station-code table.
///
/// Cells are kept in source order; columns beyond the known ones are
/// carried through verbatim.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StationRow {
    cells: Vec<String>,
}

impl StationRow {
    /// Wrap extracted cells. The table extractor rejects shorter rows
    /// before getting here.
    pub(crate) fn new(cells: Vec<String>) -> Self {
        debug_assert!(cells.len() >= MIN_COLUMNS);
        Self { cells }
    }

    pub fn code(&self) -> &str {
        &self.cells[CODE_COLUMN]
    }

    pub fn local_name(&self) -> &str {
        &self.cells[LOCAL_NAME_COLUMN]
    }

    pub fn hanja_name(&self) -> &str {
        &self.cells[HANJA_NAME_COLUMN]
    }

    pub fn line_name(&self) -> &str {
        &self.cells[LINE_COLUMN]
    }

    pub fn cells(&self) -> &[String] {
        &self.cells
    }

    pub fn into_cells(self) -> Vec<String> {
        self.cells
    }
}

/// Header plus station rows, in source order
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StationTable {
    pub header: Vec<String>,
    pub rows: Vec<StationRow>,
}

/// Decimal-degree latitude/longitude pair
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Coordinate {
    pub latitude: f64,
    pub longitude: f64,
}

impl Coordinate {
    /// Latitude within [-90, 90] and longitude within [-180, 180]
    pub fn in_range(&self) -> bool {
        (-90.0..=90.0).contains(&self.latitude) && (-180.0..=180.0).contains(&self.longitude)
    }

    /// `latitude,longitude` as written to the coordinate column
    pub fn csv_field(&self) -> String {
        format!("{},{}", self.latitude, self.longitude)
    }
}

/// Why a station ended up without coordinates
#[derive(Debug, Error)]
pub enum Unresolved {
    #[error("detail page unavailable: {0}")]
    NotFound(#[source] FetchError),

    #[error("no `{0}` element on detail page")]
    MalformedMarkup(&'static str),

    #[error("unreadable coordinate text: {0}")]
    MalformedCoordinateText(#[source] DmsError),
}

/// A station row with its coordinate column appended
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OutputRow {
    fields: Vec<String>,
}

impl OutputRow {
    /// Append one coordinate field: `lat,lng`, or empty when unresolved
    pub fn merge(row: &StationRow, coordinate: Option<&Coordinate>) -> Self {
        let mut fields = row.cells().to_vec();
        fields.push(coordinate.map(Coordinate::csv_field).unwrap_or_default());
        Self { fields }
    }

    pub fn fields(&self) -> &[String] {
        &self.fields
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn row(cells: &[&str]) -> StationRow {
        StationRow::new(cells.iter().map(|s| s.to_string()).collect())
    }

    #[test]
    fn test_accessors_follow_column_layout() {
        let r = row(&["0001", "서울", "서울", "경부선", "", "extra"]);
        assert_eq!(r.code(), "0001");
        assert_eq!(r.local_name(), "서울");
        assert_eq!(r.hanja_name(), "서울");
        assert_eq!(r.line_name(), "경부선");
        assert_eq!(r.cells().len(), 6);
    }

    #[test]
    fn test_merge_appends_coordinates() {
        let r = row(&["0001", "서울", "서울", "경부선", ""]);
        let c = Coordinate {
            latitude: 37.5,
            longitude: 126.25,
        };
        let out = OutputRow::merge(&r, Some(&c));
        assert_eq!(out.fields().len(), 6);
        assert_eq!(out.fields()[5], "37.5,126.25");
    }

    #[test]
    fn test_merge_unresolved_keeps_columns() {
        let r = row(&["0001", "서울", "서울", "경부선", "비고"]);
        let out = OutputRow::merge(&r, None);
        assert_eq!(&out.fields()[..5], r.cells());
        assert_eq!(out.fields().len(), 6);
        assert_eq!(out.fields()[5], "");
    }

    #[test]
    fn test_coordinate_range() {
        let seoul = Coordinate {
            latitude: 37.55,
            longitude: 126.97,
        };
        assert!(seoul.in_range());
        let edge = Coordinate {
            latitude: -90.0,
            longitude: 180.0,
        };
        assert!(edge.in_range());
        let bad_lat = Coordinate {
            latitude: 95.0,
            longitude: 126.97,
        };
        assert!(!bad_lat.in_range());
        let bad_lng = Coordinate {
            latitude: 37.55,
            longitude: -181.0,
        };
        assert!(!bad_lng.in_range());
    }
}
