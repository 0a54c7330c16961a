use scraper::{ElementRef, Html};
use tracing::warn;
use url::Url;

use super::details::{DetailFields, TUITION_UNAVAILABLE};
use super::{element_text, CompiledSelectors};
use crate::ids;
use crate::store::Record;

/// Primary fields read from one listing row.
#[derive(Debug, Clone)]
pub struct RowFields {
    pub name: String,
    pub score: String,
    pub city: String,
    pub country: String,
    pub detail_page_url: String,
}

/// Enumerate listing rows and read their primary fields. A malformed row
/// (missing name link, score or location) is skipped with a diagnostic so
/// one broken row cannot take down the rest of the page.
pub fn listing_rows(html: &str, sel: &CompiledSelectors, base: &Url) -> Vec<RowFields> {
    let doc = Html::parse_document(html);
    let mut rows = Vec::new();
    for row in doc.select(&sel.row) {
        match row_fields(row, sel, base) {
            Some(fields) => rows.push(fields),
            None => warn!("Skipping listing row with missing fields"),
        }
    }
    rows
}

fn row_fields(row: ElementRef, sel: &CompiledSelectors, base: &Url) -> Option<RowFields> {
    let link = row.select(&sel.name_link).next()?;
    let name = element_text(link);
    if name.is_empty() {
        return None;
    }
    let href = link.value().attr("href")?;
    let detail_page_url = base.join(href).ok()?.to_string();
    let score = element_text(row.select(&sel.score).next()?);
    let location = element_text(row.select(&sel.location).next()?);

    // Locations read "City, Country". No comma leaves the country empty;
    // extra commas end up in the country part.
    let (city, country) = match location.split_once(',') {
        Some((city, rest)) => (city.trim().to_string(), rest.trim().to_string()),
        None => (location, String::new()),
    };

    Some(RowFields {
        name,
        score,
        city,
        country,
        detail_page_url,
    })
}

/// Assemble the final record for one row, merging in the detail-page fields.
pub fn build_record(fields: RowFields, details: DetailFields) -> Record {
    Record {
        id: ids::generate_id(&fields.name),
        name: fields.name,
        score: fields.score,
        city: fields.city,
        country: fields.country,
        detail_page_url: fields.detail_page_url,
        tuition_fee: details
            .tuition_fee
            .unwrap_or_else(|| TUITION_UNAVAILABLE.to_string()),
        undergraduate_programs: details.undergraduate_programs,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::Selectors;

    fn fixture(name: &str) -> String {
        std::fs::read_to_string(format!("tests/fixtures/{}.html", name)).unwrap()
    }

    fn selectors() -> CompiledSelectors {
        CompiledSelectors::compile(&Selectors::default()).unwrap()
    }

    fn base() -> Url {
        Url::parse("https://www.topuniversities.com").unwrap()
    }

    #[test]
    fn reads_primary_fields_from_listing_rows() {
        let rows = listing_rows(&fixture("listing"), &selectors(), &base());
        assert_eq!(rows.len(), 2);

        let mit = &rows[0];
        assert_eq!(mit.name, "Massachusetts Institute of Technology (MIT)");
        assert_eq!(mit.score, "100");
        assert_eq!(mit.city, "Cambridge");
        assert_eq!(mit.country, "United States");
        assert_eq!(
            mit.detail_page_url,
            "https://www.topuniversities.com/universities/massachusetts-institute-technology-mit"
        );

        let cam = &rows[1];
        assert_eq!(cam.name, "University of Cambridge");
        assert_eq!(cam.country, "United Kingdom");
    }

    #[test]
    fn address_without_comma_leaves_country_empty() {
        let rows = listing_rows(&fixture("listing_no_comma"), &selectors(), &base());
        assert_eq!(rows.len(), 1);
        assert_eq!(rows[0].city, "Singapore");
        assert_eq!(rows[0].country, "");
    }

    #[test]
    fn malformed_rows_are_skipped() {
        let rows = listing_rows(&fixture("listing_malformed"), &selectors(), &base());
        assert_eq!(rows.len(), 1);
        assert_eq!(rows[0].name, "University of Cambridge");
    }

    #[test]
    fn record_gets_id_from_trimmed_name() {
        let fields = RowFields {
            name: "University of Cambridge".into(),
            score: "99.2".into(),
            city: "Cambridge".into(),
            country: "United Kingdom".into(),
            detail_page_url: "https://example.com/u/cambridge".into(),
        };
        let record = build_record(
            fields,
            DetailFields {
                tuition_fee: Some("22,000 GBP".into()),
                undergraduate_programs: Some(30),
            },
        );
        assert_eq!(record.id, "e92e8268f85cf011");
        assert_eq!(record.tuition_fee, "22,000 GBP");
        assert_eq!(record.undergraduate_programs, Some(30));
    }

    #[test]
    fn missing_details_fall_back_to_documented_absence() {
        let fields = RowFields {
            name: "University of Cambridge".into(),
            score: "99.2".into(),
            city: "Cambridge".into(),
            country: "United Kingdom".into(),
            detail_page_url: "https://example.com/u/cambridge".into(),
        };
        let record = build_record(fields, DetailFields::unavailable());
        assert_eq!(record.tuition_fee, "Not available");
        assert_eq!(record.undergraduate_programs, None);
    }
}
