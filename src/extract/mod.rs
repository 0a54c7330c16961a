pub mod details;
pub mod row;

use anyhow::{anyhow, Result};
use scraper::{ElementRef, Selector};

use crate::config::Selectors;

/// Configured selectors parsed once up front, so a bad selector fails the
/// run before any navigation instead of on every row.
pub struct CompiledSelectors {
    pub wait_for: String,
    pub row: Selector,
    pub name_link: Selector,
    pub score: Selector,
    pub location: Selector,
    pub tuition_badge: Selector,
    pub programs_badge: Selector,
    pub tuition_label: String,
}

impl CompiledSelectors {
    pub fn compile(raw: &Selectors) -> Result<Self> {
        Ok(Self {
            wait_for: raw.wait_for.clone(),
            row: parse_selector(&raw.row)?,
            name_link: parse_selector(&raw.name_link)?,
            score: parse_selector(&raw.score)?,
            location: parse_selector(&raw.location)?,
            tuition_badge: parse_selector(&raw.tuition_badge)?,
            programs_badge: parse_selector(&raw.programs_badge)?,
            tuition_label: raw.tuition_label.clone(),
        })
    }
}

fn parse_selector(selector: &str) -> Result<Selector> {
    Selector::parse(selector).map_err(|e| anyhow!("invalid selector `{}`: {}", selector, e))
}

pub(crate) fn element_text(el: ElementRef) -> String {
    el.text().collect::<String>().trim().to_string()
}
