//! Default collections for series without persisted state.

use chrono::NaiveDate;

use crate::catalog::{Catalog, SeriesInfo, title_from_slug};
use crate::collection::Collection;
use crate::types::{OwnerKey, SeriesId, Volume, VolumeId};

const FALLBACK_FIRST_YEAR: i32 = 2000;

/// Build the fresh collection of a series: ordinals `1..=total`, nothing owned.
///
/// Every other field is a function of the series id and the ordinal, so two calls with
/// the same arguments produce equal collections.
pub fn generate(series: &SeriesId, total: u32) -> Collection {
    let info = Catalog::builtin().find(series);
    let volumes = (1..=total).map(|number| volume(series, info, number)).collect();
    Collection::new(OwnerKey::for_series(series), volumes)
}

/// Generate using the catalog's volume count, or `fallback_total` for unknown series.
pub fn generate_default(series: &SeriesId, fallback_total: u32) -> Collection {
    let total =
        Catalog::builtin().find(series).map(|info| info.total_volumes).unwrap_or(fallback_total);
    generate(series, total)
}

fn volume(series: &SeriesId, info: Option<&SeriesInfo>, number: u32) -> Volume {
    let index = number - 1;
    let series_title = info
        .map(|info| info.title.to_string())
        .unwrap_or_else(|| title_from_slug(series.as_str()));
    let cover_url = match info {
        Some(info) => format!("{}&{index}", info.volume_cover_base),
        None => format!("covers/{}/{number:03}.jpg", series.as_str()),
    };
    let first_year = info.map(|info| info.first_release_year).unwrap_or(FALLBACK_FIRST_YEAR);

    Volume {
        id: VolumeId::new(number),
        number,
        title: format!("{series_title} - Volume {number}"),
        owned: false,
        cover_url,
        description: Some(format!("Volume {number} of the {series_title} series.")),
        release_date: release_date(first_year, index),
    }
}

/// One volume a month starting January of `first_year`.
fn release_date(first_year: i32, index: u32) -> Option<NaiveDate> {
    let year = first_year + (index / 12) as i32;
    NaiveDate::from_ymd_opt(year, index % 12 + 1, 1)
}
