//! Station table -> page keys -> coordinates -> CSV

use anyhow::{Context, Result};
use tracing::{debug, info, warn};

use crate::coords::CoordinateFetcher;
use crate::dms::{format_dms, Axis};
use crate::net::PageSource;
use crate::resolve::NameResolver;
use crate::table::{extract_stations, TableLocator};
use crate::types::{OutputRow, StationTable};
use crate::writer::TeeWriter;

/// Header appended for the coordinate fields
pub const COORDINATE_HEADER: &str = "좌표";

/// Where to read from
#[derive(Debug, Clone)]
pub struct Sources {
    pub table_url: String,
    pub table: TableLocator,
    pub wiki_base_url: String,
}

/// Counts for the closing log line
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct RunSummary {
    pub stations: usize,
    pub unresolved: usize,
}

pub struct Pipeline<'a, S: PageSource> {
    source: &'a S,
    resolver: &'a NameResolver,
    sources: &'a Sources,
}

impl<'a, S: PageSource> Pipeline<'a, S> {
    pub fn new(source: &'a S, resolver: &'a NameResolver, sources: &'a Sources) -> Self {
        Self {
            source,
            resolver,
            sources,
        }
    }

    /// Fetch and parse the station-code table. Any failure here is fatal.
    pub fn extract(&self) -> Result<StationTable> {
        let html = self
            .source
            .fetch_page(&self.sources.table_url)
            .with_context(|| format!("Failed to fetch station table: {}", self.sources.table_url))?;
        let table = extract_stations(&html, &self.sources.table)?;
        info!("Found {} active stations", table.rows.len());
        Ok(table)
    }

    /// Enrich every station with coordinates and write the rows in order.
    ///
    /// Lookup failures only blank the coordinate fields of that station;
    /// write failures abort.
    pub fn enrich(&self, table: &StationTable, writer: &mut TeeWriter) -> Result<RunSummary> {
        let fetcher = CoordinateFetcher::new(self.source, self.sources.wiki_base_url.as_str());
        let total = table.rows.len();
        let mut summary = RunSummary {
            stations: total,
            unresolved: 0,
        };

        let mut header = table.header.clone();
        header.push(COORDINATE_HEADER.to_string());
        writer.write_row(&header)?;

        for (i, row) in table.rows.iter().enumerate() {
            let page_key = self.resolver.resolve(row.local_name());
            let coordinate = match fetcher.fetch(&page_key) {
                Ok(c) => {
                    debug!(
                        "[{:03}/{:03}] {} {}({}) {} -> {} {}",
                        i + 1,
                        total,
                        row.code(),
                        row.local_name(),
                        row.hanja_name(),
                        row.line_name(),
                        format_dms(c.latitude, Axis::Latitude),
                        format_dms(c.longitude, Axis::Longitude)
                    );
                    Some(c)
                }
                Err(reason) => {
                    warn!(
                        "[{:03}/{:03}] {} {} {} -> {}: {}",
                        i + 1,
                        total,
                        row.code(),
                        row.local_name(),
                        row.line_name(),
                        page_key,
                        reason
                    );
                    summary.unresolved += 1;
                    None
                }
            };

            writer.write_row(OutputRow::merge(row, coordinate.as_ref()).fields())?;
        }

        writer.finish()?;
        Ok(summary)
    }
}
