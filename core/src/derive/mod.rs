//! Read-only views and progress statistics computed from a collection.
//!
//! Everything here is a pure function of the collection and the active criteria: filters
//! decide which volumes are displayed, never the reported progress.

use serde::Serialize;

use crate::collection::Collection;
use crate::types::{Criteria, Stats, Volume};

/// Filtered volumes in collection order plus whole-collection stats.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct View<'a> {
    pub volumes: Vec<&'a Volume>,
    pub stats: Stats,
}

impl View<'_> {
    /// View shown while a collection has not finished loading.
    pub fn empty() -> Self {
        Self { volumes: Vec::new(), stats: Stats::default() }
    }
}

pub fn derive_view<'a>(collection: &'a Collection, criteria: &Criteria) -> View<'a> {
    let needle = criteria.search.to_lowercase();
    let volumes = collection
        .volumes
        .iter()
        .filter(|volume| criteria.status.admits(volume))
        .filter(|volume| matches_search(volume, &criteria.search, &needle))
        .collect();

    View { volumes, stats: stats(collection) }
}

/// Title matches case-insensitively; the ordinal matches against the raw term.
fn matches_search(volume: &Volume, raw: &str, lowered: &str) -> bool {
    volume.title.to_lowercase().contains(lowered) || volume.number.to_string().contains(raw)
}

pub fn stats(collection: &Collection) -> Stats {
    let total_count = collection.len();
    let owned_count = collection.volumes.iter().filter(|volume| volume.owned).count();
    Stats {
        owned_count,
        missing_count: total_count - owned_count,
        total_count,
        completion_percentage: completion_percentage(owned_count, total_count),
    }
}

/// `round(owned / total * 100)` with halves rounded up; 0 for an empty collection.
pub fn completion_percentage(owned: usize, total: usize) -> u32 {
    if total == 0 {
        return 0;
    }
    let owned = owned.min(total) as u64;
    let total = total as u64;
    ((owned * 200 + total) / (2 * total)) as u32
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::{OwnerKey, StatusFilter, VolumeId};

    fn collection(owned: &[bool]) -> Collection {
        let volumes = owned
            .iter()
            .enumerate()
            .map(|(idx, &owned)| {
                let n = idx as u32 + 1;
                Volume {
                    id: VolumeId::new(n),
                    number: n,
                    title: format!("Volume {n}"),
                    owned,
                    cover_url: String::new(),
                    description: None,
                    release_date: None,
                }
            })
            .collect();
        Collection::new(OwnerKey::new("admin-test"), volumes)
    }

    fn numbers(view: &View<'_>) -> Vec<u32> {
        view.volumes.iter().map(|volume| volume.number).collect()
    }

    #[test]
    fn owned_filter_keeps_order_and_whole_stats() {
        let c = collection(&[true, false, true, false]);
        let view = derive_view(&c, &Criteria::new(StatusFilter::Owned, ""));

        assert_eq!(numbers(&view), vec![1, 3]);
        assert_eq!(
            view.stats,
            Stats { owned_count: 2, missing_count: 2, total_count: 4, completion_percentage: 50 }
        );
    }

    #[test]
    fn numeric_search_matches_ordinal() {
        let c = collection(&[false; 20]);
        let view = derive_view(&c, &Criteria::new(StatusFilter::All, "12"));
        assert_eq!(numbers(&view), vec![12]);

        let partial = derive_view(&c, &Criteria::new(StatusFilter::All, "1"));
        assert_eq!(numbers(&partial), vec![1, 10, 11, 12, 13, 14, 15, 16, 17, 18, 19]);
    }

    #[test]
    fn search_without_match_leaves_stats_alone() {
        let c = collection(&[true, false, false]);
        let view = derive_view(&c, &Criteria::new(StatusFilter::All, "xyz"));

        assert!(view.volumes.is_empty());
        assert_eq!(view.stats, stats(&c));
        assert_eq!(view.stats.total_count, 3);
    }

    #[test]
    fn title_search_ignores_case() {
        let c = collection(&[false, true]);
        let view = derive_view(&c, &Criteria::new(StatusFilter::All, "VOLUME 2"));
        assert_eq!(numbers(&view), vec![2]);
    }

    #[test]
    fn status_and_search_combine_with_and() {
        let c = collection(&[true, false, true, false, true, false, true, false, true, false, true]);
        let view = derive_view(&c, &Criteria::new(StatusFilter::Missing, "1"));
        assert_eq!(numbers(&view), vec![10]);
    }

    #[test]
    fn owned_and_missing_views_partition_the_collection() {
        let c = collection(&[true, true, false, true, false]);
        let owned = derive_view(&c, &Criteria::new(StatusFilter::Owned, "")).volumes.len();
        let missing = derive_view(&c, &Criteria::new(StatusFilter::Missing, "")).volumes.len();
        let all = derive_view(&c, &Criteria::default());

        assert_eq!(owned + missing, all.volumes.len());
        assert_eq!(owned, all.stats.owned_count);
        assert_eq!(missing, all.stats.count_for(StatusFilter::Missing));
    }

    #[test]
    fn percentage_rounds_half_up_and_handles_empty() {
        assert_eq!(completion_percentage(0, 0), 0);
        assert_eq!(completion_percentage(1, 3), 33);
        assert_eq!(completion_percentage(2, 3), 67);
        assert_eq!(completion_percentage(1, 8), 13);
        assert_eq!(completion_percentage(34, 34), 100);
        assert_eq!(stats(&collection(&[])).completion_percentage, 0);
    }
}
