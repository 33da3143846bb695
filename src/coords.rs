//! Coordinate lookup on a station's Wikipedia page

use scraper::{Html, Selector};
use std::sync::OnceLock;
use tracing::warn;

use crate::dms::parse_dms;
use crate::html::{normalized_text, static_selector};
use crate::net::PageSource;
use crate::types::{Coordinate, Unresolved};

const GEO_BLOCK: &str = ".geo-dms";
const LATITUDE: &str = ".latitude";
const LONGITUDE: &str = ".longitude";

static GEO_SELECTOR: OnceLock<Selector> = OnceLock::new();
static LATITUDE_SELECTOR: OnceLock<Selector> = OnceLock::new();
static LONGITUDE_SELECTOR: OnceLock<Selector> = OnceLock::new();

/// Read the coordinate block out of a detail page
pub fn parse_coordinate_page(html: &str) -> Result<Coordinate, Unresolved> {
    let document = Html::parse_document(html);

    let geo = document
        .select(static_selector(&GEO_SELECTOR, GEO_BLOCK))
        .next()
        .ok_or(Unresolved::MalformedMarkup(GEO_BLOCK))?;
    let latitude = geo
        .select(static_selector(&LATITUDE_SELECTOR, LATITUDE))
        .next()
        .ok_or(Unresolved::MalformedMarkup(LATITUDE))?;
    let longitude = geo
        .select(static_selector(&LONGITUDE_SELECTOR, LONGITUDE))
        .next()
        .ok_or(Unresolved::MalformedMarkup(LONGITUDE))?;

    let coordinate = Coordinate {
        latitude: parse_dms(&normalized_text(latitude))
            .map_err(Unresolved::MalformedCoordinateText)?,
        longitude: parse_dms(&normalized_text(longitude))
            .map_err(Unresolved::MalformedCoordinateText)?,
    };
    // kept as read; the page itself is wrong
    if !coordinate.in_range() {
        warn!(
            "Coordinate out of range: {}, {}",
            coordinate.latitude, coordinate.longitude
        );
    }
    Ok(coordinate)
}

/// Fetches detail pages and turns them into coordinates
pub struct CoordinateFetcher<'a, S: PageSource> {
    source: &'a S,
    base_url: String,
}

impl<'a, S: PageSource> CoordinateFetcher<'a, S> {
    pub fn new(source: &'a S, base_url: impl Into<String>) -> Self {
        let base_url = base_url.into();
        Self {
            source,
            base_url: base_url.trim_end_matches('/').to_string(),
        }
    }

    pub fn page_url(&self, page_key: &str) -> String {
        format!("{}/{}", self.base_url, page_key)
    }

    /// One attempt per station; every failure becomes an `Unresolved`
    pub fn fetch(&self, page_key: &str) -> Result<Coordinate, Unresolved> {
        let html = self
            .source
            .fetch_page(&self.page_url(page_key))
            .map_err(Unresolved::NotFound)?;
        parse_coordinate_page(&html)
    }
}
