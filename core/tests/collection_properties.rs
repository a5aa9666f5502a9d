use vault_core::derive::derive_view;
use vault_core::generate::generate;
use vault_core::{Collection, Criteria, OwnerKey, SeriesId, StatusFilter, Volume, VolumeId};

fn volume(number: u32, title: &str, owned: bool) -> Volume {
    Volume {
        id: VolumeId::new(number),
        number,
        title: title.to_string(),
        owned,
        cover_url: format!("covers/test/{number:03}.jpg"),
        description: None,
        release_date: None,
    }
}

fn collection(owned: &[bool]) -> Collection {
    let volumes = owned
        .iter()
        .enumerate()
        .map(|(idx, owned)| {
            let number = idx as u32 + 1;
            volume(number, &format!("Volume {number}"), *owned)
        })
        .collect();
    Collection::new(OwnerKey::new("admin-test"), volumes)
}

fn numbers(view: &vault_core::View<'_>) -> Vec<u32> {
    view.volumes.iter().map(|v| v.number).collect()
}

#[test]
fn owned_filter_scenario() {
    let c = collection(&[true, false, true, false]);
    let view = derive_view(&c, &Criteria::new(StatusFilter::Owned, ""));
    assert_eq!(numbers(&view), vec![1, 3]);
    assert_eq!(view.stats.owned_count, 2);
    assert_eq!(view.stats.total_count, 4);
    assert_eq!(view.stats.completion_percentage, 50);
}

#[test]
fn numeric_search_and_empty_result_keep_stats() {
    let mut c = collection(&[false; 12]);
    c.volumes[0].owned = true;
    let all = derive_view(&c, &Criteria::default()).stats;

    let hit = derive_view(&c, &Criteria::new(StatusFilter::All, "12"));
    assert_eq!(numbers(&hit), vec![12]);

    let miss = derive_view(&c, &Criteria::new(StatusFilter::All, "xyz"));
    assert!(miss.volumes.is_empty());
    assert_eq!(miss.stats, all);
}

#[test]
fn search_is_case_insensitive_on_titles_only() {
    let c = Collection::new(
        OwnerKey::new("admin-naruto"),
        vec![volume(1, "Naruto - Volume 1", false), volume(2, "Naruto - Volume 2", true)],
    );
    let view = derive_view(&c, &Criteria::new(StatusFilter::Missing, "NARUTO"));
    assert_eq!(numbers(&view), vec![1]);
}

#[test]
fn stats_ignore_filters_and_partition_the_collection() {
    let c = collection(&[true, true, false, true, false, false, false]);
    for status in StatusFilter::ALL {
        for search in ["", "1", "volume", "nothing"] {
            let view = derive_view(&c, &Criteria::new(status, search));
            assert_eq!(view.stats.total_count, c.len());
        }
    }

    let owned = derive_view(&c, &Criteria::new(StatusFilter::Owned, "")).volumes.len();
    let missing = derive_view(&c, &Criteria::new(StatusFilter::Missing, "")).volumes.len();
    let stats = derive_view(&c, &Criteria::default()).stats;
    assert_eq!(owned + missing, stats.total_count);
    assert_eq!(stats.owned_count + stats.missing_count, stats.total_count);
    assert_eq!(stats.completion_percentage, 43);
}

#[test]
fn double_toggle_restores_and_miss_is_noop() {
    let c = collection(&[true, false, false]);
    for id in 1..=3 {
        let id = VolumeId::new(id);
        let once = vault_core::toggle_owned(&c, id);
        assert_ne!(once, c);
        assert_eq!(vault_core::toggle_owned(&once, id), c);
    }
    assert_eq!(vault_core::toggle_owned(&c, VolumeId::new(42)), c);
}

#[test]
fn generated_super_onze_collection() {
    let c = generate(&SeriesId::new("super-onze"), 34);
    let numbers: Vec<u32> = c.volumes.iter().map(|v| v.number).collect();
    assert_eq!(numbers, (1..=34).collect::<Vec<_>>());
    assert!(c.volumes.iter().all(|v| !v.owned));
    assert_eq!(derive_view(&c, &Criteria::default()).stats.completion_percentage, 0);
    assert!(c.validate().is_ok());
}
