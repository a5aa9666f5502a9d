//! Shared data structures exchanged between the core, the command shell, and persistence.

use std::fmt;
use std::str::FromStr;

use chrono::NaiveDate;
use serde::{Deserialize, Deserializer, Serialize};

/// Ordinal of a volume inside its series. Always positive, 1-based.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct VolumeId(u32);

impl VolumeId {
    pub fn new(value: u32) -> Self {
        Self(value)
    }

    pub fn get(self) -> u32 {
        self.0
    }
}

impl fmt::Display for VolumeId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Slug identifying a series, e.g. `super-onze`.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct SeriesId(String);

impl SeriesId {
    pub fn new(value: impl Into<String>) -> Self {
        Self(value.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for SeriesId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Key of the persisted document a collection lives under.
///
/// Every session using the same key shares one document; the key is the only
/// partition the store knows about.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct OwnerKey(String);

impl OwnerKey {
    pub fn new(value: impl Into<String>) -> Self {
        Self(value.into())
    }

    /// Conventional key for the shared collection of a series (`admin-<series>`).
    pub fn for_series(series: &SeriesId) -> Self {
        Self(format!("admin-{}", series.as_str()))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for OwnerKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// One trackable book of a series.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Volume {
    /// Stable identity inside the collection; toggles address volumes by it.
    pub id: VolumeId,
    /// Display ordinal; equal to `id` for every generated volume.
    pub number: u32,
    pub title: String,
    /// Whether the volume is on the shelf. The only field that changes after generation.
    pub owned: bool,
    pub cover_url: String,
    /// Synopsis shown in the detail view.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    /// Written as `YYYY-MM-DD`. Dates that cannot be read back load as `None`.
    #[serde(
        default,
        skip_serializing_if = "Option::is_none",
        deserialize_with = "lenient_date"
    )]
    pub release_date: Option<NaiveDate>,
}

/// Accepts `YYYY-MM-DD`, optionally followed by a time part. Anything else, including
/// non-string values, becomes `None` instead of failing the whole document.
fn lenient_date<'de, D>(deserializer: D) -> Result<Option<NaiveDate>, D::Error>
where
    D: Deserializer<'de>,
{
    let raw = serde_json::Value::deserialize(deserializer)?;
    Ok(raw.as_str().and_then(parse_release_date))
}

fn parse_release_date(raw: &str) -> Option<NaiveDate> {
    let raw = raw.trim();
    let date = raw.get(..10).unwrap_or(raw);
    NaiveDate::parse_from_str(date, "%Y-%m-%d").ok()
}

/// Status half of the view criteria.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum StatusFilter {
    #[default]
    All,
    Owned,
    Missing,
}

impl StatusFilter {
    pub const ALL: [StatusFilter; 3] =
        [StatusFilter::All, StatusFilter::Owned, StatusFilter::Missing];

    pub fn as_str(self) -> &'static str {
        match self {
            StatusFilter::All => "all",
            StatusFilter::Owned => "owned",
            StatusFilter::Missing => "missing",
        }
    }

    pub fn admits(self, volume: &Volume) -> bool {
        match self {
            StatusFilter::All => true,
            StatusFilter::Owned => volume.owned,
            StatusFilter::Missing => !volume.owned,
        }
    }
}

impl fmt::Display for StatusFilter {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Error returned when a status filter name is not one of `all`, `owned`, `missing`.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("unknown status filter `{0}` (expected all, owned or missing)")]
pub struct UnknownFilter(pub String);

impl FromStr for StatusFilter {
    type Err = UnknownFilter;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "all" => Ok(StatusFilter::All),
            "owned" => Ok(StatusFilter::Owned),
            "missing" => Ok(StatusFilter::Missing),
            _ => Err(UnknownFilter(s.to_string())),
        }
    }
}

/// Transient view criteria. Never persisted; every session starts from the default.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct Criteria {
    pub status: StatusFilter,
    pub search: String,
}

impl Criteria {
    pub fn new(status: StatusFilter, search: impl Into<String>) -> Self {
        Self { status, search: search.into() }
    }
}

/// Aggregate progress of a whole collection.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Stats {
    pub owned_count: usize,
    /// `total_count - owned_count`.
    pub missing_count: usize,
    /// Length of the whole collection, independent of any filter or search.
    pub total_count: usize,
    /// `owned / total` as a whole percent rounded half up; 0 for an empty collection.
    pub completion_percentage: u32,
}

impl Stats {
    /// Number of volumes a given status filter would show with an empty search.
    pub fn count_for(&self, filter: StatusFilter) -> usize {
        match filter {
            StatusFilter::All => self.total_count,
            StatusFilter::Owned => self.owned_count,
            StatusFilter::Missing => self.missing_count,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn volume_serializes_with_camel_case_fields() {
        let volume = Volume {
            id: VolumeId::new(3),
            number: 3,
            title: "Naruto - Volume 3".into(),
            owned: true,
            cover_url: "covers/naruto/003.jpg".into(),
            description: None,
            release_date: NaiveDate::from_ymd_opt(2000, 3, 1),
        };

        let json = serde_json::to_value(&volume).unwrap();
        assert_eq!(json["id"], 3);
        assert_eq!(json["coverUrl"], "covers/naruto/003.jpg");
        assert_eq!(json["releaseDate"], "2000-03-01");
        assert!(json.get("description").is_none());
    }

    #[test]
    fn unreadable_release_dates_load_as_none() {
        let volume = |date: serde_json::Value| {
            serde_json::from_value::<Volume>(serde_json::json!({
                "id": 1,
                "number": 1,
                "title": "Naruto - Volume 1",
                "owned": false,
                "coverUrl": "covers/naruto/001.jpg",
                "releaseDate": date,
            }))
            .unwrap()
            .release_date
        };

        assert_eq!(volume("2000-03-01".into()), NaiveDate::from_ymd_opt(2000, 3, 1));
        assert_eq!(volume("2001-02-01T00:00:00Z".into()), NaiveDate::from_ymd_opt(2001, 2, 1));
        assert_eq!(volume("1 de março de 2000".into()), None);
        assert_eq!(volume("2000-13-40".into()), None);
        assert_eq!(volume(serde_json::Value::Null), None);
        assert_eq!(volume(20000301.into()), None);
    }

    #[test]
    fn status_filter_parses_case_insensitively() {
        assert_eq!("Owned".parse::<StatusFilter>().unwrap(), StatusFilter::Owned);
        assert_eq!(" missing ".parse::<StatusFilter>().unwrap(), StatusFilter::Missing);
        assert!("read".parse::<StatusFilter>().is_err());
    }

    #[test]
    fn owner_key_follows_series_convention() {
        let key = OwnerKey::for_series(&SeriesId::new("pokemon"));
        assert_eq!(key.as_str(), "admin-pokemon");
    }
}
