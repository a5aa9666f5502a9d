//! Built-in series known to the vault and carousel-style navigation over them.

use serde::Serialize;

use crate::types::SeriesId;

/// Static description of a series.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SeriesInfo {
    pub id: &'static str,
    pub title: &'static str,
    pub total_volumes: u32,
    pub cover_image: &'static str,
    pub tagline: &'static str,
    pub years: &'static str,
    /// Per-volume covers append `&<index>` to this URL.
    pub volume_cover_base: &'static str,
    pub first_release_year: i32,
}

const SERIES: &[SeriesInfo] = &[
    SeriesInfo {
        id: "super-onze",
        title: "Super Onze",
        total_volumes: 34,
        cover_image: "https://images.unsplash.com/photo-1578662996442-48f60103fc96?w=400&h=600&fit=crop&auto=format&q=80",
        tagline: "The football saga that won over a generation",
        years: "2000-2014",
        volume_cover_base: "https://images.unsplash.com/photo-1578662996442-48f60103fc96?w=300&h=400&fit=crop&auto=format&q=80",
        first_release_year: 2020,
    },
    SeriesInfo {
        id: "naruto",
        title: "Naruto",
        total_volumes: 72,
        cover_image: "https://images.unsplash.com/photo-1606664515524-ed2f786a0bd6?w=400&h=600&fit=crop&auto=format&q=80",
        tagline: "The ninja who dreams of becoming Hokage",
        years: "1999-2014",
        volume_cover_base: "https://images.unsplash.com/photo-1606664515524-ed2f786a0bd6?w=300&h=400&fit=crop&auto=format&q=80",
        first_release_year: 2000,
    },
    SeriesInfo {
        id: "one-piece",
        title: "One Piece",
        total_volumes: 105,
        cover_image: "https://images.unsplash.com/photo-1612198188060-c7c2a3b66eae?w=400&h=600&fit=crop&auto=format&q=80",
        tagline: "The adventures of the Straw Hat Pirates",
        years: "1997-present",
        volume_cover_base: "https://images.unsplash.com/photo-1612198188060-c7c2a3b66eae?w=300&h=400&fit=crop&auto=format&q=80",
        first_release_year: 1997,
    },
    SeriesInfo {
        id: "pokemon",
        title: "Pokémon Adventures",
        total_volumes: 64,
        cover_image: "covers/pokemon/hero.jpg",
        tagline: "Trainers, rivals and the journey to catch them all",
        years: "1997-present",
        volume_cover_base: "covers/pokemon/volume.jpg?v=1",
        first_release_year: 2013,
    },
];

#[derive(Debug, Clone, Copy)]
pub struct Catalog {
    series: &'static [SeriesInfo],
}

impl Default for Catalog {
    fn default() -> Self {
        Self::builtin()
    }
}

impl Catalog {
    pub fn builtin() -> Self {
        Self { series: SERIES }
    }

    pub fn series(&self) -> &'static [SeriesInfo] {
        self.series
    }

    pub fn len(&self) -> usize {
        self.series.len()
    }

    pub fn is_empty(&self) -> bool {
        self.series.is_empty()
    }

    pub fn find(&self, id: &SeriesId) -> Option<&'static SeriesInfo> {
        self.series.iter().find(|info| info.id == id.as_str())
    }

    pub fn position(&self, id: &SeriesId) -> Option<usize> {
        self.series.iter().position(|info| info.id == id.as_str())
    }

    /// Index after `index`, wrapping to the first series.
    pub fn next(&self, index: usize) -> usize {
        if self.series.is_empty() { 0 } else { (index + 1) % self.series.len() }
    }

    /// Index before `index`, wrapping to the last series.
    pub fn previous(&self, index: usize) -> usize {
        let len = self.series.len();
        if len == 0 { 0 } else { (index % len + len - 1) % len }
    }
}

/// Human title for an id without a catalog entry: `super-onze` becomes `Super Onze`.
pub fn title_from_slug(slug: &str) -> String {
    slug.split(['-', '_'])
        .filter(|word| !word.is_empty())
        .map(|word| {
            let mut chars = word.chars();
            match chars.next() {
                Some(first) => first.to_uppercase().chain(chars).collect::<String>(),
                None => String::new(),
            }
        })
        .collect::<Vec<_>>()
        .join(" ")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn finds_builtin_series() {
        let catalog = Catalog::builtin();
        let info = catalog.find(&SeriesId::new("naruto")).expect("naruto");
        assert_eq!(info.total_volumes, 72);
        assert!(catalog.find(&SeriesId::new("bleach")).is_none());
    }

    #[test]
    fn navigation_wraps_around() {
        let catalog = Catalog::builtin();
        let last = catalog.len() - 1;
        assert_eq!(catalog.next(last), 0);
        assert_eq!(catalog.previous(0), last);
        assert_eq!(catalog.previous(catalog.next(1)), 1);
    }

    #[test]
    fn slug_titles_are_capitalised() {
        assert_eq!(title_from_slug("super-onze"), "Super Onze");
        assert_eq!(title_from_slug("dragon_ball--z"), "Dragon Ball Z");
        assert_eq!(title_from_slug(""), "");
    }
}
