//! schema.org `JobPosting` from JSON-LD blocks.

use std::sync::LazyLock;

use scraper::Selector;
use serde_json::Value;
use tracing::debug;

use super::{PageSnapshot, SiteAdapter};
use crate::html::{decode_entities, html_to_markdown};
use crate::types::job::{coerce_date, coerce_salary, coerce_text, JobType, ParsedJobData};

static LD_JSON: LazyLock<Selector> = LazyLock::new(|| {
    Selector::parse(r#"script[type="application/ld+json"]"#).expect("valid selector")
});

/// Company used when a `JobPosting` has no `hiringOrganization.name`.
const UNKNOWN_COMPANY: &str = "Unknown Company";

/// Reads the first `JobPosting` found in any JSON-LD block.
pub struct SchemaOrgAdapter;

impl SiteAdapter for SchemaOrgAdapter {
    fn name(&self) -> &str {
        "schema.org"
    }

    fn extract(&self, page: &PageSnapshot) -> Option<ParsedJobData> {
        page.document().select(&LD_JSON).find_map(|script| {
            let raw = script.text().collect::<String>();
            match serde_json::from_str::<Value>(raw.trim()) {
                Ok(value) => find_job_posting(&value).map(map_posting),
                Err(e) => {
                    debug!(error = %e, "skipping invalid JSON-LD block");
                    None
                }
            }
        })
    }
}

/// Depth-first search over objects, arrays and `@graph`.
fn find_job_posting(value: &Value) -> Option<&Value> {
    match value {
        Value::Array(items) => items.iter().find_map(find_job_posting),
        Value::Object(map) => {
            if is_job_posting(value) {
                return Some(value);
            }
            map.get("@graph").and_then(find_job_posting)
        }
        _ => None,
    }
}

fn is_job_posting(value: &Value) -> bool {
    match value.get("@type") {
        Some(Value::String(t)) => t == "JobPosting",
        Some(Value::Array(types)) => types.iter().any(|t| t.as_str() == Some("JobPosting")),
        _ => false,
    }
}

fn map_posting(posting: &Value) -> ParsedJobData {
    let company = posting
        .get("hiringOrganization")
        .and_then(|org| match org {
            Value::String(_) => coerce_text(org),
            _ => org.get("name").and_then(coerce_text),
        })
        .unwrap_or_else(|| UNKNOWN_COMPANY.to_string());

    let description = posting
        .get("description")
        .and_then(coerce_text)
        .map(|d| html_to_markdown(&decode_entities(&d)))
        .filter(|d| !d.is_empty());

    let (salary_min, salary_max, salary_currency) = posting
        .get("baseSalary")
        .map(map_salary)
        .unwrap_or_default();

    ParsedJobData {
        title: posting.get("title").and_then(coerce_text),
        company: Some(company),
        location: posting.get("jobLocation").and_then(map_location),
        job_type: posting.get("employmentType").and_then(map_employment_type),
        salary_min,
        salary_max,
        salary_currency,
        description,
        requirements: posting
            .get("qualifications")
            .or_else(|| posting.get("experienceRequirements"))
            .and_then(coerce_text),
        benefits: posting.get("jobBenefits").and_then(coerce_text),
        original_content: None,
        posted_date: posting.get("datePosted").and_then(coerce_date),
        deadline: posting.get("validThrough").and_then(coerce_date),
        application_url: posting.get("url").and_then(coerce_text),
    }
}

fn map_location(location: &Value) -> Option<String> {
    if let Value::Array(places) = location {
        return places.iter().find_map(map_location);
    }

    let address = location.get("address").unwrap_or(location);
    if let Some(text) = address.as_str() {
        return coerce_text(&Value::String(text.to_string()));
    }

    let parts: Vec<String> = ["addressLocality", "addressRegion", "addressCountry"]
        .iter()
        .filter_map(|key| {
            let part = address.get(*key)?;
            // addressCountry may itself be a Country object
            part.get("name").and_then(coerce_text).or_else(|| coerce_text(part))
        })
        .collect();

    (!parts.is_empty()).then(|| parts.join(", "))
}

fn map_employment_type(value: &Value) -> Option<JobType> {
    match value {
        Value::Array(types) => types.iter().find_map(map_employment_type),
        Value::String(s) => JobType::parse(s),
        _ => None,
    }
}

/// `(min, max, currency)` from a `MonetaryAmount`.
fn map_salary(salary: &Value) -> (Option<f64>, Option<f64>, Option<String>) {
    let currency = salary
        .get("currency")
        .and_then(coerce_text)
        .map(|c| c.to_uppercase());

    let (min, max) = match salary.get("value") {
        Some(value @ Value::Object(_)) => {
            let single = value.get("value").and_then(coerce_salary);
            (
                value.get("minValue").and_then(coerce_salary).or(single),
                value.get("maxValue").and_then(coerce_salary).or(single),
            )
        }
        Some(value) => {
            let single = coerce_salary(value);
            (single, single)
        }
        None => (None, None),
    };

    (min, max, currency)
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;

    fn page_with(ld: &str) -> PageSnapshot {
        let html = format!(
            r#"<html><head><title>Jobs</title><script type="application/ld+json">{}</script></head><body></body></html>"#,
            ld
        );
        PageSnapshot::parse(&html, None)
    }

    #[test]
    fn test_basic_job_posting() {
        let page = page_with(
            r#"{
                "@context": "https://schema.org",
                "@type": "JobPosting",
                "title": "Senior Engineer",
                "hiringOrganization": {"@type": "Organization", "name": "Acme Co"},
                "description": "&lt;p&gt;Build &lt;b&gt;things&lt;/b&gt;.&lt;/p&gt;"
            }"#,
        );

        let job = SchemaOrgAdapter.extract(&page).unwrap();
        assert_eq!(job.title.as_deref(), Some("Senior Engineer"));
        assert_eq!(job.company.as_deref(), Some("Acme Co"));
        assert_eq!(job.description.as_deref(), Some("Build things."));
    }

    #[test]
    fn test_full_field_mapping() {
        let page = page_with(
            r#"{
                "@type": "JobPosting",
                "title": "Barista",
                "hiringOrganization": {"name": "Flat White Ltd"},
                "jobLocation": {"@type": "Place", "address": {
                    "addressLocality": "Wellington",
                    "addressRegion": "Wellington",
                    "addressCountry": {"@type": "Country", "name": "NZ"}
                }},
                "employmentType": ["PART_TIME", "TEMPORARY"],
                "baseSalary": {"@type": "MonetaryAmount", "currency": "nzd",
                    "value": {"@type": "QuantitativeValue", "minValue": 26, "maxValue": 30, "unitText": "HOUR"}},
                "datePosted": "2024-04-02",
                "validThrough": "2024-05-01T23:59:59+12:00",
                "url": "https://cafe.example/jobs/7"
            }"#,
        );

        let job = SchemaOrgAdapter.extract(&page).unwrap();
        assert_eq!(job.location.as_deref(), Some("Wellington, Wellington, NZ"));
        assert_eq!(job.job_type, Some(JobType::PartTime));
        assert_eq!(job.salary_min, Some(26.0));
        assert_eq!(job.salary_max, Some(30.0));
        assert_eq!(job.salary_currency.as_deref(), Some("NZD"));
        assert_eq!(job.posted_date, NaiveDate::from_ymd_opt(2024, 4, 2));
        assert_eq!(job.deadline, NaiveDate::from_ymd_opt(2024, 5, 1));
        assert_eq!(job.application_url.as_deref(), Some("https://cafe.example/jobs/7"));
    }

    #[test]
    fn test_job_posting_inside_graph() {
        let page = page_with(
            r#"{"@context": "https://schema.org", "@graph": [
                {"@type": "WebPage", "name": "Careers"},
                {"@type": ["JobPosting"], "title": "Nurse", "hiringOrganization": {"name": "Health NZ"}}
            ]}"#,
        );

        let job = SchemaOrgAdapter.extract(&page).unwrap();
        assert_eq!(job.title.as_deref(), Some("Nurse"));
        assert_eq!(job.company.as_deref(), Some("Health NZ"));
    }

    #[test]
    fn test_missing_organization_uses_placeholder() {
        let page = page_with(r#"[{"@type": "JobPosting", "title": "Cook"}]"#);
        let job = SchemaOrgAdapter.extract(&page).unwrap();
        assert_eq!(job.company.as_deref(), Some(UNKNOWN_COMPANY));
    }

    #[test]
    fn test_invalid_json_is_not_a_match() {
        let html = r#"<html><head>
            <script type="application/ld+json">{ "@type": "JobPosting", "title": </script>
            <script type="application/ld+json">{"@type": "JobPosting", "title": "Welder", "hiringOrganization": {"name": "Steelworks"}}</script>
        </head></html>"#;
        let page = PageSnapshot::parse(html, None);
        let job = SchemaOrgAdapter.extract(&page).unwrap();
        assert_eq!(job.title.as_deref(), Some("Welder"));

        let page = page_with("{ not json");
        assert!(SchemaOrgAdapter.extract(&page).is_none());
    }

    #[test]
    fn test_other_types_are_ignored() {
        let page = page_with(r#"{"@type": "Organization", "name": "Acme"}"#);
        assert!(SchemaOrgAdapter.extract(&page).is_none());
    }
}
