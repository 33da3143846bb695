//! Degree-minute-second coordinate text as shown on Korean Wikipedia
//!
//! Strings look like `북위 37° 33′ 39″`: a hemisphere token followed by
//! whole degrees, whole minutes and possibly fractional seconds.

use regex::Regex;
use std::sync::OnceLock;
use thiserror::Error;

static DMS_REGEX: OnceLock<Regex> = OnceLock::new();

#[derive(Debug, Error, PartialEq)]
pub enum DmsError {
    #[error("unknown hemisphere in `{0}`")]
    UnknownHemisphere(String),
    #[error("no degree/minute/second pattern in `{0}`")]
    Pattern(String),
    #[error("bad number in `{0}`")]
    Number(String),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Hemisphere {
    North,
    South,
    East,
    West,
}

impl Hemisphere {
    const ALL: [Hemisphere; 4] = [
        Hemisphere::North,
        Hemisphere::South,
        Hemisphere::East,
        Hemisphere::West,
    ];

    pub fn token(&self) -> &'static str {
        match self {
            Hemisphere::North => "북위",
            Hemisphere::South => "남위",
            Hemisphere::East => "동경",
            Hemisphere::West => "서경",
        }
    }

    pub fn sign(&self) -> f64 {
        match self {
            Hemisphere::North | Hemisphere::East => 1.0,
            Hemisphere::South | Hemisphere::West => -1.0,
        }
    }

    fn from_prefix(text: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|h| text.starts_with(h.token()))
    }
}

/// Which axis a value belongs to; only needed when formatting
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Axis {
    Latitude,
    Longitude,
}

impl Axis {
    fn hemisphere(&self, value: f64) -> Hemisphere {
        match (self, value < 0.0) {
            (Axis::Latitude, false) => Hemisphere::North,
            (Axis::Latitude, true) => Hemisphere::South,
            (Axis::Longitude, false) => Hemisphere::East,
            (Axis::Longitude, true) => Hemisphere::West,
        }
    }
}

/// Parse a DMS string into signed decimal degrees.
///
/// North and east are positive, south and west negative. The parser does
/// not know which axis it is reading.
pub fn parse_dms(dms: &str) -> Result<f64, DmsError> {
    let trimmed = dms.trim();
    let hemisphere = Hemisphere::from_prefix(trimmed)
        .ok_or_else(|| DmsError::UnknownHemisphere(trimmed.to_string()))?;

    let regex = DMS_REGEX
        .get_or_init(|| Regex::new(r"(\d+)°\s*(\d+)′\s*([\d.]+)″").expect("valid DMS regex"));
    let caps = regex
        .captures(trimmed)
        .ok_or_else(|| DmsError::Pattern(trimmed.to_string()))?;

    let number = |i: usize| -> Result<f64, DmsError> {
        caps[i]
            .parse::<f64>()
            .map_err(|_| DmsError::Number(trimmed.to_string()))
    };
    let degrees = number(1)?;
    let minutes = number(2)?;
    let seconds = number(3)?;

    Ok(hemisphere.sign() * (degrees + minutes / 60.0 + seconds / 3600.0))
}

/// Render decimal degrees back into DMS text with the axis' hemisphere token
pub fn format_dms(value: f64, axis: Axis) -> String {
    let hemisphere = axis.hemisphere(value);
    let total_seconds = value.abs() * 3600.0;
    let degrees = (total_seconds / 3600.0).floor();
    // clamp rounding residue so no field goes negative
    let remainder = (total_seconds - degrees * 3600.0).max(0.0);
    let minutes = (remainder / 60.0).floor();
    let seconds = (remainder - minutes * 60.0).max(0.0);
    format!(
        "{}{}°{}′{}″",
        hemisphere.token(),
        degrees as u32,
        minutes as u32,
        seconds
    )
}
