use std::fs;
use std::path::{Path, PathBuf};

use chrono::{Datelike, NaiveDate};
use serde::Deserialize;
use uuid::Uuid;

use crate::calendar::ValidRange;
use crate::error::{Error, Result};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct MediaId(Uuid);

impl MediaId {
    pub fn new() -> Self {
        Self(Uuid::new_v4())
    }
}

impl Default for MediaId {
    fn default() -> Self {
        Self::new()
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct MediaItem {
    #[serde(skip)]
    pub id: MediaId,
    pub url: PathBuf,
    pub date: NaiveDate,
    pub caption: String,
    #[serde(default)]
    pub detail: Option<String>,
}

impl MediaItem {
    pub fn new(
        url: impl Into<PathBuf>,
        date: NaiveDate,
        caption: impl Into<String>,
        detail: Option<&str>,
    ) -> Self {
        Self {
            id: MediaId::new(),
            url: url.into(),
            date,
            caption: caption.into(),
            detail: detail.map(str::to_owned),
        }
    }

    pub fn caption_word_count(&self) -> usize {
        self.caption.split_whitespace().count()
    }
}

/// Ordered, read-only list of media items. Never empty.
#[derive(Debug, Clone)]
pub struct Catalog {
    items: Vec<MediaItem>,
}

impl Catalog {
    pub fn new(items: Vec<MediaItem>) -> Result<Self> {
        if items.is_empty() {
            return Err(Error::EmptyCatalog);
        }
        Ok(Self { items })
    }

    pub fn from_json(json: &str) -> Result<Self> {
        let items: Vec<MediaItem> = serde_json::from_str(json)?;
        Self::new(items)
    }

    /// Relative item urls are resolved against the file's directory.
    pub fn load_from_path(path: &Path) -> Result<Self> {
        let content = fs::read_to_string(path)?;
        let mut catalog = Self::from_json(&content)?;
        if let Some(base) = path.parent() {
            for item in &mut catalog.items {
                if item.url.is_relative() {
                    item.url = base.join(&item.url);
                }
            }
        }
        log::info!(
            "loaded {} media items from {}",
            catalog.items.len(),
            path.display()
        );
        Ok(catalog)
    }

    /// Loads the configured catalog, or the built-in sample when none is
    /// configured or the file cannot be used.
    pub fn load_or_sample(path: Option<&Path>) -> Self {
        let Some(path) = path else {
            return Self::sample();
        };
        Self::load_from_path(path).unwrap_or_else(|err| {
            log::warn!("using sample catalog, {} is unusable: {err}", path.display());
            Self::sample()
        })
    }

    pub fn sample() -> Self {
        let item = |y, m, d, url: &str, caption: &str, detail: &str| {
            let date = NaiveDate::from_ymd_opt(y, m, d).unwrap_or_default();
            MediaItem::new(url, date, caption, Some(detail))
        };
        Self {
            items: vec![
                item(2023, 12, 15, "media/10.jpg", "Waterpark Day", "media/hero.mp4"),
                item(2024, 3, 1, "media/4.jpg", "College Move-In Day", "media/video_with_4_ref.mp4"),
                item(2024, 5, 15, "media/5.jpg", "Game Night in Atlanta", "media/video_with_5_ref.mp4"),
                item(2024, 8, 1, "media/6.jpg", "Switzerland Sunrise", "media/video_with_6_ref.mp4"),
                item(2024, 10, 15, "media/7.jpg", "Georgia Tech Orientation", "media/video_with_7_ref.mp4"),
                item(2025, 1, 1, "media/8.jpg", "Family Gathering", "media/video_with_8_ref.mp4"),
                item(2025, 4, 15, "media/9.jpg", "Anniversary Celebration", "media/video_with_9_ref.mp4"),
            ],
        }
    }

    pub fn items(&self) -> &[MediaItem] {
        &self.items
    }

    pub fn get(&self, index: usize) -> Option<&MediaItem> {
        self.items.get(index)
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    /// Items dated in the given month that are also inside `range`.
    pub fn memories_in_month(&self, year: i32, month: u32, range: &ValidRange) -> usize {
        self.items
            .iter()
            .filter(|item| item.date.year() == year && item.date.month() == month)
            .filter(|item| range.contains(item.date))
            .count()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    fn d(y: i32, m: u32, day: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, day).expect("valid date")
    }

    #[test]
    fn empty_catalog_is_rejected() {
        assert!(matches!(Catalog::new(Vec::new()), Err(Error::EmptyCatalog)));
        assert!(matches!(Catalog::from_json("[]"), Err(Error::EmptyCatalog)));
    }

    #[test]
    fn json_catalog_parses_optional_detail() {
        let json = r#"[
            {"url": "a.jpg", "date": "2024-03-01", "caption": "First"},
            {"url": "b.jpg", "date": "2024-05-15", "caption": "Second", "detail": "b.mp4"}
        ]"#;
        let catalog = Catalog::from_json(json).expect("catalog should parse");
        assert_eq!(catalog.len(), 2);
        assert_eq!(catalog.items()[0].detail, None);
        assert_eq!(catalog.items()[1].detail.as_deref(), Some("b.mp4"));
        assert_eq!(catalog.items()[1].date, d(2024, 5, 15));
        assert_ne!(catalog.items()[0].id, catalog.items()[1].id);
    }

    #[test]
    fn malformed_json_reports_parse_error() {
        assert!(matches!(
            Catalog::from_json("{not json"),
            Err(Error::CatalogParse(_))
        ));
    }

    #[test]
    fn load_from_path_resolves_relative_urls() {
        let dir = tempdir().expect("failed to create temp dir");
        let path = dir.path().join("catalog.json");
        fs::write(
            &path,
            r#"[{"url": "pics/a.jpg", "date": "2024-03-01", "caption": "A"}]"#,
        )
        .expect("failed to write catalog");

        let catalog = Catalog::load_from_path(&path).expect("catalog should load");
        assert_eq!(catalog.items()[0].url, dir.path().join("pics/a.jpg"));
    }

    #[test]
    fn unusable_catalog_falls_back_to_sample() {
        let dir = tempdir().expect("failed to create temp dir");
        let path = dir.path().join("catalog.json");
        fs::write(&path, "[]").expect("failed to write catalog");

        assert_eq!(Catalog::load_or_sample(Some(&path)).len(), Catalog::sample().len());
        assert_eq!(Catalog::load_or_sample(None).len(), 7);
    }

    #[test]
    fn memories_in_month_respects_range() {
        let catalog = Catalog::sample();
        let range = ValidRange::new(d(2024, 1, 1), d(2025, 10, 31)).unwrap();
        assert_eq!(catalog.memories_in_month(2024, 3, &range), 1);
        assert_eq!(catalog.memories_in_month(2023, 12, &range), 0);
        assert_eq!(catalog.memories_in_month(2024, 4, &range), 0);
    }

    #[test]
    fn caption_word_count_ignores_extra_whitespace() {
        let item = MediaItem::new("x.jpg", d(2024, 1, 1), "  Game  Night in Atlanta ", None);
        assert_eq!(item.caption_word_count(), 4);
    }
}
