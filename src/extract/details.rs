use regex::Regex;
use scraper::Html;
use tracing::warn;

use super::{element_text, CompiledSelectors};

/// Placeholder stored when the tuition badge is missing or the detail page
/// could not be fetched.
pub const TUITION_UNAVAILABLE: &str = "Not available";

/// Optional fields pulled from one detail page.
#[derive(Debug, Default)]
pub struct DetailFields {
    pub tuition_fee: Option<String>,
    pub undergraduate_programs: Option<u32>,
}

impl DetailFields {
    /// Fallback when the detail page is unreachable.
    pub fn unavailable() -> Self {
        Self::default()
    }
}

/// Extract the two supplementary badges from a fetched detail page. The
/// badges sit in the raw markup, so a static parse is enough here.
pub fn extract(html: &str, sel: &CompiledSelectors, name: &str) -> DetailFields {
    let doc = Html::parse_document(html);

    let tuition_fee = doc.select(&sel.tuition_badge).next().map(|el| {
        element_text(el)
            .replace(&sel.tuition_label, "")
            .trim()
            .to_string()
    });

    let undergraduate_programs = doc.select(&sel.programs_badge).next().and_then(|el| {
        let text = element_text(el);
        let count = leading_int(&text);
        if count.is_none() {
            warn!("No parseable undergraduate program count for {}", name);
        }
        count
    });

    DetailFields {
        tuition_fee,
        undergraduate_programs,
    }
}

/// Leading integer of the badge text, e.g. "40 Undergraduate programs" -> 40.
fn leading_int(text: &str) -> Option<u32> {
    let re = Regex::new(r"^\d+").unwrap();
    re.find(text)?.as_str().parse().ok()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::Selectors;
    use crate::extract::row::{build_record, RowFields};

    fn fixture(name: &str) -> String {
        std::fs::read_to_string(format!("tests/fixtures/{}.html", name)).unwrap()
    }

    fn selectors() -> CompiledSelectors {
        CompiledSelectors::compile(&Selectors::default()).unwrap()
    }

    #[test]
    fn strips_tuition_label_and_parses_program_count() {
        let d = extract(&fixture("detail_full"), &selectors(), "MIT");
        assert_eq!(d.tuition_fee.as_deref(), Some("57,986 USD"));
        assert_eq!(d.undergraduate_programs, Some(40));
    }

    #[test]
    fn missing_tuition_badge_becomes_the_absent_marker() {
        let d = extract(&fixture("detail_no_tuition"), &selectors(), "NUS");
        assert_eq!(d.tuition_fee, None);
        assert_eq!(d.undergraduate_programs, Some(12));

        let fields = RowFields {
            name: "National University of Singapore (NUS)".into(),
            score: "92.7".into(),
            city: "Singapore".into(),
            country: "".into(),
            detail_page_url: "https://www.topuniversities.com/universities/nus".into(),
        };
        let record = build_record(fields, d);
        assert_eq!(record.tuition_fee, TUITION_UNAVAILABLE);
    }

    #[test]
    fn non_numeric_program_count_is_omitted() {
        let d = extract(&fixture("detail_bad_count"), &selectors(), "MIT");
        assert_eq!(d.tuition_fee.as_deref(), Some("57,986 USD"));
        assert_eq!(d.undergraduate_programs, None);
    }

    #[test]
    fn leading_int_takes_the_number_prefix_only() {
        assert_eq!(leading_int("120+ programs"), Some(120));
        assert_eq!(leading_int("Not disclosed"), None);
        assert_eq!(leading_int(""), None);
    }
}
