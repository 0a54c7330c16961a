use std::path::Path;

use anyhow::{Context, Result};
use serde::Deserialize;

/// URL shape of the listing source. The page-index semantics follow the
/// target site: indices are 0-based and `max_page` is inclusive.
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct ListingSource {
    pub domain: String,
    pub path: Vec<String>,
    pub page_param: String,
}

impl Default for ListingSource {
    fn default() -> Self {
        Self {
            domain: "www.topuniversities.com".into(),
            path: vec![
                "university-rankings".into(),
                "world-university-rankings".into(),
                "2024".into(),
            ],
            page_param: "page".into(),
        }
    }
}

/// CSS selectors for everything the extractor touches. These are the first
/// thing to break when the site changes markup, so none of them is
/// compiled-in.
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct Selectors {
    /// Element whose appearance marks the listing as fully rendered.
    pub wait_for: String,
    pub row: String,
    pub name_link: String,
    pub score: String,
    pub location: String,
    pub tuition_badge: String,
    pub programs_badge: String,
    /// Label substring stripped from the tuition badge text.
    pub tuition_label: String,
}

impl Default for Selectors {
    fn default() -> Self {
        Self {
            wait_for: ".uni-link".into(),
            row: ".api-ranking-css.normal-row".into(),
            name_link: ".uni-link".into(),
            score: ".overall-score-span".into(),
            location: ".location".into(),
            tuition_badge: "div.single-badge[data-href=\"expenses_Tab\"] h3".into(),
            programs_badge: "div.single-badge[data-href=\"ug-tab\"] h3".into(),
            tuition_label: "Average tuition fee".into(),
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct ScrapeConfig {
    /// Inclusive upper page index; 0 scrapes a single page.
    pub max_page: u32,
    /// Detail fetches in flight per listing page.
    pub concurrency: usize,
    pub fetch_timeout_secs: u64,
    pub wait_timeout_secs: u64,
    pub records_file: String,
    pub schema_file: String,
    pub source: ListingSource,
    pub selectors: Selectors,
}

impl Default for ScrapeConfig {
    fn default() -> Self {
        Self {
            max_page: 0,
            concurrency: 10,
            fetch_timeout_secs: 30,
            wait_timeout_secs: 30,
            records_file: "universities.json".into(),
            schema_file: "schema.json".into(),
            source: ListingSource::default(),
            selectors: Selectors::default(),
        }
    }
}

impl ScrapeConfig {
    /// Load from a JSON file, or fall back to the built-in defaults. Fields
    /// missing from the file keep their defaults.
    pub fn load(path: Option<&Path>) -> Result<Self> {
        match path {
            Some(p) => {
                let raw = std::fs::read_to_string(p)
                    .with_context(|| format!("failed to read config {}", p.display()))?;
                serde_json::from_str(&raw)
                    .with_context(|| format!("failed to parse config {}", p.display()))
            }
            None => Ok(Self::default()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_cover_a_single_page() {
        let cfg = ScrapeConfig::default();
        assert_eq!(cfg.max_page, 0);
        assert_eq!(cfg.source.domain, "www.topuniversities.com");
        assert_eq!(cfg.selectors.row, ".api-ranking-css.normal-row");
    }

    #[test]
    fn partial_json_overrides_keep_remaining_defaults() {
        let cfg: ScrapeConfig = serde_json::from_str(
            r#"{ "max_page": 3, "source": { "domain": "rankings.example.org" } }"#,
        )
        .unwrap();
        assert_eq!(cfg.max_page, 3);
        assert_eq!(cfg.source.domain, "rankings.example.org");
        assert_eq!(cfg.source.page_param, "page");
        assert_eq!(cfg.selectors.tuition_label, "Average tuition fee");
    }
}
