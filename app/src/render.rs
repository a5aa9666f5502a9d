//! Plain-text rendering of command results.

use std::fmt::Write as _;

use vault_core::StatusFilter;

use crate::commands::{CollectionPage, SeriesEntry, ToggleOutcome, ToggleReport, VolumeDetail};

pub fn series(entries: &[SeriesEntry]) -> String {
    let mut out = String::new();
    for entry in entries {
        let _ = writeln!(
            out,
            "{:<12} {:<22} {:>4} volumes  {}",
            entry.id, entry.title, entry.total_volumes, entry.years
        );
    }
    out
}

pub fn collection(page: &CollectionPage) -> String {
    let mut out = String::new();
    let stats = &page.stats;
    let _ = writeln!(out, "{}", page.title);
    let _ = writeln!(
        out,
        "{}/{} volumes ({}%)",
        stats.owned_count, stats.total_count, stats.completion_percentage
    );

    let bar = StatusFilter::ALL
        .iter()
        .map(|filter| {
            let marker = if *filter == page.criteria.status { "*" } else { "" };
            format!("[{marker}{filter} {}]", stats.count_for(*filter))
        })
        .collect::<Vec<_>>()
        .join(" ");
    let _ = writeln!(out, "{bar}");
    if !page.criteria.search.is_empty() {
        let _ = writeln!(out, "search: {}", page.criteria.search);
    }
    let _ = writeln!(out);

    if page.volumes.is_empty() {
        let _ = writeln!(out, "no volumes found");
        return out;
    }
    for volume in &page.volumes {
        let status = if volume.owned { "owned" } else { "missing" };
        let _ = writeln!(out, "#{:<4} {}  [{status}]", volume.number, volume.title);
    }
    out
}

pub fn volume(detail: &VolumeDetail) -> String {
    let mut out = String::new();
    let volume = &detail.volume;
    let _ = writeln!(out, "{}", volume.title);
    if let Some(released) = &detail.released {
        let _ = writeln!(out, "Released: {released}");
    }
    if let Some(description) = &volume.description {
        let _ = writeln!(out, "\n{description}\n");
    }
    let _ = writeln!(out, "Series:  {}", detail.series);
    let _ = writeln!(out, "Volume:  #{}", volume.number);
    let _ = writeln!(out, "Status:  {}", detail.status);
    let _ = writeln!(out, "Format:  {}", detail.format);
    let _ = writeln!(out, "Cover:   {}", volume.cover_url);
    out
}

pub fn toggles(report: &ToggleReport) -> String {
    let mut out = String::new();
    if report.cancelled {
        return out;
    }
    for line in &report.results {
        let _ = match line.outcome {
            ToggleOutcome::Toggled { owned, saved } => writeln!(
                out,
                "#{} {}{}",
                line.number,
                if owned { "owned" } else { "missing" },
                if saved { "" } else { " (not saved)" }
            ),
            ToggleOutcome::NotFound => writeln!(out, "#{} not found", line.number),
        };
    }
    for notice in &report.notices {
        let _ = writeln!(out, "warning: {notice}");
    }
    let stats = &report.stats;
    let _ = writeln!(
        out,
        "{}/{} volumes ({}%)",
        stats.owned_count, stats.total_count, stats.completion_percentage
    );
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use vault_core::{Criteria, Stats};

    #[test]
    fn empty_page_says_no_volumes_found() {
        let page = CollectionPage {
            series: "naruto".into(),
            title: "Naruto".into(),
            generated: false,
            criteria: Criteria::new(StatusFilter::Owned, "zzz"),
            stats: Stats {
                owned_count: 0,
                missing_count: 4,
                total_count: 4,
                completion_percentage: 0,
            },
            volumes: Vec::new(),
        };
        let text = collection(&page);
        assert!(text.contains("0/4 volumes (0%)"));
        assert!(text.contains("[*owned 0]"));
        assert!(text.contains("[missing 4]"));
        assert!(text.trim_end().ends_with("no volumes found"));
    }

    #[test]
    fn cancelled_toggle_prints_nothing() {
        let report = ToggleReport {
            series: "naruto".into(),
            cancelled: true,
            results: Vec::new(),
            notices: Vec::new(),
            stats: Stats::default(),
        };
        assert!(toggles(&report).is_empty());
    }
}
