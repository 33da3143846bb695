//! Station name to Wikipedia page title resolution
//!
//! Many short station names collide with districts or same-named stations
//! elsewhere, so a curated override table maps them to the right page.
//! Everything else gets the station suffix appended.

use anyhow::{Context, Result};
use serde::Deserialize;
use std::collections::HashMap;
use std::fs;
use std::path::Path;

/// Suffix appended to names without an override
pub const STATION_SUFFIX: &str = "역";

/// Built-in disambiguation list
pub const DEFAULT_OVERRIDES: &[(&str, &str)] = &[
    ("가야", "가야역_(한국철도공사)"),
    ("강구", "강구역_(영덕)"),
    ("고양기지", "행신역"),
    ("구룡", "구룡역_(순천)"),
    ("구모량", "모량역"),
    ("구부조", "부조역"),
    ("구포", "구포역_(한국철도공사)"),
    ("금곡", "금곡역_(남양주)"),
    ("금호", "금호역_(영천)"),
    ("기성", "기성역_(울진)"),
    ("남포", "남포역_(보령)"),
    ("내포", "내포역_(예산)"),
    ("녹동", "녹동역_(봉화)"),
    ("대곡", "대곡역_(고양)"),
    ("대공원", "대공원역_(과천)"),
    ("도안", "도안역_(증평)"),
    ("동래", "동래역_(한국철도공사)"),
    ("백원", "백원역_(상주)"),
    ("범일", "범일역_(한국철도공사)"),
    ("봉화", "봉화역_(봉화)"),
    ("부산진", "부산진역_(한국철도공사)"),
    ("부전", "부전역_(한국철도공사)"),
    ("사상", "사상역_(한국철도공사)"),
    ("삼산(중앙선)", "삼산역"),
    ("상동", "상동역_(밀양)"),
    ("성산", "성산역_(순천)"),
    ("송정", "송정역_(부산)"),
    ("수서(고속선)", "수서역"),
    ("수서(분당선)", "수서역"),
    ("순천", "순천역_(전라남도)"),
    ("신기", "신기역_(삼척)"),
    ("신원", "신원역_(양평)"),
    ("신진영", "진영역"),
    ("신촌", "신촌역_(경의선)"),
    ("쌍룡", "쌍룡역_(영월)"),
    ("안평", "안평역_(장성)"),
    ("양원", "양원역_(봉화)"),
    ("양평", "양평역_(양평)"),
    ("연산", "연산역_(논산)"),
    ("연풍", "연풍역_(괴산)"),
    ("용문", "용문역_(양평)"),
    ("운천", "운천역_(파주)"),
    ("일신", "일신역_(양평)"),
    ("장흥", "장흥역_(양주)"),
    ("제천순환", "제천역"),
    ("좌천", "좌천역_(한국철도공사)"),
    ("중동", "중동역_(부천)"),
    ("중앙", "중앙역_(안산)"),
    ("진부(오대산)", "진부역"),
    ("판교", "판교역_(서천)"),
    ("판교(경기)", "판교역_(성남)"),
    ("판교(충남)", "판교역_(서천)"),
    ("화명", "화명역_(한국철도공사)"),
    ("화정", "화정역_(고양)"),
    ("효자", "효자역_(포항)"),
];

/// Override file layout (CONL)
///
/// ```text
/// suffix = 역
/// stations
///   가야 = 가야역_(한국철도공사)
/// ```
#[derive(Debug, Default, Deserialize)]
#[serde(deny_unknown_fields)]
struct OverrideFile {
    suffix: Option<String>,
    #[serde(default)]
    stations: HashMap<String, String>,
}

/// Maps a station's local name to the page key used for coordinate lookup
#[derive(Debug, Clone)]
pub struct NameResolver {
    overrides: HashMap<String, String>,
    suffix: String,
}

impl NameResolver {
    pub fn new(overrides: HashMap<String, String>, suffix: impl Into<String>) -> Self {
        Self {
            overrides,
            suffix: suffix.into(),
        }
    }

    /// Resolver backed by the built-in override table
    pub fn builtin() -> Self {
        let overrides = DEFAULT_OVERRIDES
            .iter()
            .map(|(name, page)| (name.to_string(), page.to_string()))
            .collect();
        Self::new(overrides, STATION_SUFFIX)
    }

    /// Load an override table from a CONL file, replacing the built-in one
    pub fn from_conl_path(path: &Path) -> Result<Self> {
        let content = fs::read_to_string(path)
            .with_context(|| format!("Failed to read override file: {}", path.display()))?;
        Self::from_conl_str(&content)
            .with_context(|| format!("Failed to parse override file: {}", path.display()))
    }

    pub fn from_conl_str(content: &str) -> Result<Self> {
        let file: OverrideFile = serde_conl::from_str(content)?;
        Ok(Self::new(
            file.stations,
            file.suffix.unwrap_or_else(|| STATION_SUFFIX.to_string()),
        ))
    }

    /// Page key for `name`. Never fails.
    pub fn resolve(&self, name: &str) -> String {
        match self.overrides.get(name) {
            Some(page) => page.clone(),
            None => format!("{}{}", name, self.suffix),
        }
    }

    pub fn override_count(&self) -> usize {
        self.overrides.len()
    }
}
