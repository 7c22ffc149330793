//! The canonical job record and its normalization rules.

use chrono::{DateTime, NaiveDate};
use serde::{Deserialize, Serialize};
use serde_json::Value;

/// Currency assumed when a salary is present without one.
pub const DEFAULT_CURRENCY: &str = "NZD";

/// Employment type, limited to the set the rest of the product understands.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum JobType {
    FullTime,
    PartTime,
    Contract,
    Internship,
    Casual,
}

impl JobType {
    /// Map free-form employment type text onto the fixed set.
    ///
    /// Accepts the enum spellings as well as schema.org `employmentType`
    /// values (`FULL_TIME`, `CONTRACTOR`, ...). Anything else is `None`.
    pub fn parse(raw: &str) -> Option<Self> {
        let key: String = raw
            .trim()
            .to_lowercase()
            .chars()
            .filter(|c| c.is_ascii_alphanumeric())
            .collect();

        match key.as_str() {
            "fulltime" | "permanent" | "permanentfulltime" => Some(Self::FullTime),
            "parttime" | "permanentparttime" => Some(Self::PartTime),
            "contract" | "contractor" | "contracttemp" | "temporary" | "temp" | "fixedterm" => {
                Some(Self::Contract)
            }
            "internship" | "intern" | "graduate" => Some(Self::Internship),
            "casual" | "perdiem" | "casualvacation" => Some(Self::Casual),
            _ => None,
        }
    }

    /// The wire spelling.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::FullTime => "full-time",
            Self::PartTime => "part-time",
            Self::Contract => "contract",
            Self::Internship => "internship",
            Self::Casual => "casual",
        }
    }
}

/// Structured job posting produced by the extraction pipeline.
///
/// Every field is optional at the type level; [`ParsedJobData::is_viable`]
/// is the predicate that separates a usable record from a failed parse.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ParsedJobData {
    #[serde(default)]
    pub title: Option<String>,
    #[serde(default)]
    pub company: Option<String>,
    #[serde(default)]
    pub location: Option<String>,
    #[serde(default)]
    pub job_type: Option<JobType>,
    #[serde(default)]
    pub salary_min: Option<f64>,
    #[serde(default)]
    pub salary_max: Option<f64>,
    #[serde(default)]
    pub salary_currency: Option<String>,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub requirements: Option<String>,
    #[serde(default)]
    pub benefits: Option<String>,
    #[serde(default)]
    pub original_content: Option<String>,
    #[serde(default)]
    pub posted_date: Option<NaiveDate>,
    #[serde(default)]
    pub deadline: Option<NaiveDate>,
    #[serde(default)]
    pub application_url: Option<String>,
}

impl ParsedJobData {
    /// Title and company are both present and non-blank.
    pub fn is_viable(&self) -> bool {
        self.missing_required().is_empty()
    }

    /// Names of the required fields that are absent.
    pub fn missing_required(&self) -> Vec<&'static str> {
        let mut missing = Vec::new();
        if is_blank(&self.title) {
            missing.push("title");
        }
        if is_blank(&self.company) {
            missing.push("company");
        }
        missing
    }

    /// Whether any salary figure is present.
    pub fn has_salary(&self) -> bool {
        self.salary_min.is_some() || self.salary_max.is_some()
    }

    /// Set `application_url` if the record does not already carry one.
    pub fn with_application_url_fallback(mut self, url: &str) -> Self {
        if is_blank(&self.application_url) {
            self.application_url = Some(url.to_string());
        }
        self
    }

    /// Fill every empty field from `other`, keeping values already set.
    pub fn fill_missing_from(mut self, other: &ParsedJobData) -> Self {
        fn fill<T: Clone>(slot: &mut Option<T>, from: &Option<T>) {
            if slot.is_none() {
                slot.clone_from(from);
            }
        }

        fill(&mut self.title, &other.title);
        fill(&mut self.company, &other.company);
        fill(&mut self.location, &other.location);
        fill(&mut self.job_type, &other.job_type);
        fill(&mut self.salary_min, &other.salary_min);
        fill(&mut self.salary_max, &other.salary_max);
        fill(&mut self.salary_currency, &other.salary_currency);
        fill(&mut self.description, &other.description);
        fill(&mut self.requirements, &other.requirements);
        fill(&mut self.benefits, &other.benefits);
        fill(&mut self.posted_date, &other.posted_date);
        fill(&mut self.deadline, &other.deadline);
        fill(&mut self.application_url, &other.application_url);
        self
    }

    /// Apply currency defaulting and min/max ordering.
    pub fn normalized(mut self, default_currency: &str) -> Self {
        if let (Some(min), Some(max)) = (self.salary_min, self.salary_max) {
            if min > max {
                self.salary_min = Some(max);
                self.salary_max = Some(min);
            }
        }
        if self.has_salary() && is_blank(&self.salary_currency) {
            self.salary_currency = Some(default_currency.to_string());
        }
        self
    }
}

fn is_blank(value: &Option<String>) -> bool {
    value.as_deref().map_or(true, |s| s.trim().is_empty())
}

/// Loosely typed record as a language model returns it.
///
/// Every field is a raw JSON value so one badly typed field never
/// sinks the whole record; [`RawJobRecord::into_job`] does the coercion.
#[derive(Debug, Clone, Default, Deserialize)]
pub(crate) struct RawJobRecord {
    #[serde(default)]
    pub title: Value,
    #[serde(default)]
    pub company: Value,
    #[serde(default)]
    pub location: Value,
    #[serde(default)]
    pub job_type: Value,
    #[serde(default)]
    pub salary_min: Value,
    #[serde(default)]
    pub salary_max: Value,
    #[serde(default)]
    pub salary_currency: Value,
    #[serde(default)]
    pub description: Value,
    #[serde(default)]
    pub requirements: Value,
    #[serde(default)]
    pub benefits: Value,
    #[serde(default)]
    pub posted_date: Value,
    #[serde(default)]
    pub deadline: Value,
    #[serde(default)]
    pub application_url: Value,
}

impl RawJobRecord {
    pub fn into_job(self, default_currency: &str) -> ParsedJobData {
        ParsedJobData {
            title: coerce_text(&self.title),
            company: coerce_text(&self.company),
            location: coerce_text(&self.location),
            job_type: coerce_text(&self.job_type).and_then(|s| JobType::parse(&s)),
            salary_min: coerce_salary(&self.salary_min),
            salary_max: coerce_salary(&self.salary_max),
            salary_currency: coerce_text(&self.salary_currency).map(|c| c.to_uppercase()),
            description: coerce_text(&self.description),
            requirements: coerce_text(&self.requirements),
            benefits: coerce_text(&self.benefits),
            original_content: None,
            posted_date: coerce_date(&self.posted_date),
            deadline: coerce_date(&self.deadline),
            application_url: coerce_text(&self.application_url),
        }
        .normalized(default_currency)
    }
}

/// Trimmed text; arrays of strings are joined line by line.
pub(crate) fn coerce_text(value: &Value) -> Option<String> {
    let text = match value {
        Value::String(s) => s.trim().to_string(),
        Value::Number(n) => n.to_string(),
        Value::Array(items) => items
            .iter()
            .filter_map(coerce_text)
            .collect::<Vec<_>>()
            .join("\n"),
        _ => return None,
    };

    match text.as_str() {
        "" | "null" | "N/A" | "n/a" => None,
        _ => Some(text),
    }
}

/// Numbers pass through; strings like `"$85,000"` or `"85k"` are coerced.
pub(crate) fn coerce_salary(value: &Value) -> Option<f64> {
    match value {
        Value::Number(n) => n.as_f64().filter(|v| v.is_finite() && *v > 0.0),
        Value::String(s) => parse_salary_text(s),
        _ => None,
    }
}

pub(crate) fn parse_salary_text(raw: &str) -> Option<f64> {
    let lower = raw.trim().to_lowercase();
    let start = lower.find(|c: char| c.is_ascii_digit())?;
    let rest = &lower[start..];
    let end = rest
        .find(|c: char| !(c.is_ascii_digit() || c == ',' || c == '.'))
        .unwrap_or(rest.len());

    // First figure only: "85k-95k" reads as 85 000.
    let number: String = rest[..end].chars().filter(|c| *c != ',').collect();
    let multiplier = if rest[end..].trim_start().starts_with('k') {
        1_000.0
    } else {
        1.0
    };

    number
        .trim_end_matches('.')
        .parse::<f64>()
        .ok()
        .map(|v| v * multiplier)
        .filter(|v| v.is_finite() && *v > 0.0)
}

/// `YYYY-MM-DD` or RFC 3339; anything else is dropped.
pub(crate) fn coerce_date(value: &Value) -> Option<NaiveDate> {
    let raw = value.as_str()?.trim();
    NaiveDate::parse_from_str(raw, "%Y-%m-%d")
        .ok()
        .or_else(|| DateTime::parse_from_rfc3339(raw).ok().map(|d| d.date_naive()))
        .or_else(|| raw.get(..10).and_then(|d| NaiveDate::parse_from_str(d, "%Y-%m-%d").ok()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_job_type_synonyms() {
        assert_eq!(JobType::parse("Full-Time"), Some(JobType::FullTime));
        assert_eq!(JobType::parse("FULL_TIME"), Some(JobType::FullTime));
        assert_eq!(JobType::parse("part time"), Some(JobType::PartTime));
        assert_eq!(JobType::parse("CONTRACTOR"), Some(JobType::Contract));
        assert_eq!(JobType::parse("intern"), Some(JobType::Internship));
        assert_eq!(JobType::parse("casual"), Some(JobType::Casual));
        assert_eq!(JobType::parse("volunteer"), None);
    }

    #[test]
    fn test_job_type_serializes_kebab_case() {
        let json = serde_json::to_string(&JobType::FullTime).unwrap();
        assert_eq!(json, "\"full-time\"");
        assert_eq!(JobType::PartTime.as_str(), "part-time");
    }

    #[test]
    fn test_viability_requires_title_and_company() {
        let mut job = ParsedJobData {
            title: Some("Engineer".into()),
            ..Default::default()
        };
        assert_eq!(job.missing_required(), vec!["company"]);

        job.company = Some("   ".into());
        assert!(!job.is_viable());

        job.company = Some("Acme".into());
        assert!(job.is_viable());
    }

    #[test]
    fn test_raw_record_coercion() {
        let raw: RawJobRecord = serde_json::from_value(json!({
            "title": "  Senior Engineer ",
            "company": "Acme Co",
            "job_type": "Full Time",
            "salary_min": "$85,000",
            "salary_max": "120k",
            "requirements": ["Rust", "Postgres"],
            "posted_date": "2024-03-01T09:00:00Z",
            "deadline": "next friday",
            "location": ""
        }))
        .unwrap();

        let job = raw.into_job(DEFAULT_CURRENCY);
        assert_eq!(job.title.as_deref(), Some("Senior Engineer"));
        assert_eq!(job.job_type, Some(JobType::FullTime));
        assert_eq!(job.salary_min, Some(85_000.0));
        assert_eq!(job.salary_max, Some(120_000.0));
        assert_eq!(job.salary_currency.as_deref(), Some("NZD"));
        assert_eq!(job.requirements.as_deref(), Some("Rust\nPostgres"));
        assert_eq!(job.posted_date, NaiveDate::from_ymd_opt(2024, 3, 1));
        assert_eq!(job.deadline, None);
        assert_eq!(job.location, None);
    }

    #[test]
    fn test_salary_text_takes_first_figure() {
        assert_eq!(parse_salary_text("85k-95k"), Some(85_000.0));
        assert_eq!(parse_salary_text("NZ$ 72,500.00 per year"), Some(72_500.0));
        assert_eq!(parse_salary_text("competitive"), None);
    }

    #[test]
    fn test_unknown_job_type_becomes_null() {
        let raw: RawJobRecord = serde_json::from_value(json!({
            "title": "Chef",
            "company": "Cafe",
            "job_type": "seasonal-ish"
        }))
        .unwrap();
        assert_eq!(raw.into_job(DEFAULT_CURRENCY).job_type, None);
    }

    #[test]
    fn test_currency_left_alone_without_salary() {
        let job = ParsedJobData::default().normalized(DEFAULT_CURRENCY);
        assert_eq!(job.salary_currency, None);
    }

    #[test]
    fn test_explicit_currency_kept() {
        let job = ParsedJobData {
            salary_max: Some(90_000.0),
            salary_currency: Some("AUD".into()),
            ..Default::default()
        }
        .normalized(DEFAULT_CURRENCY);
        assert_eq!(job.salary_currency.as_deref(), Some("AUD"));
    }

    #[test]
    fn test_swapped_salary_range_is_ordered() {
        let job = ParsedJobData {
            salary_min: Some(120_000.0),
            salary_max: Some(80_000.0),
            ..Default::default()
        }
        .normalized(DEFAULT_CURRENCY);
        assert_eq!(job.salary_min, Some(80_000.0));
        assert_eq!(job.salary_max, Some(120_000.0));
    }

    #[test]
    fn test_fill_missing_keeps_existing_values() {
        let primary = ParsedJobData {
            title: Some("From LLM".into()),
            ..Default::default()
        };
        let secondary = ParsedJobData {
            title: Some("From adapter".into()),
            company: Some("Acme".into()),
            ..Default::default()
        };
        let merged = primary.fill_missing_from(&secondary);
        assert_eq!(merged.title.as_deref(), Some("From LLM"));
        assert_eq!(merged.company.as_deref(), Some("Acme"));
    }

    #[test]
    fn test_application_url_fallback() {
        let job = ParsedJobData::default().with_application_url_fallback("https://jobs.example/1");
        assert_eq!(job.application_url.as_deref(), Some("https://jobs.example/1"));

        let job = ParsedJobData {
            application_url: Some("https://apply.example".into()),
            ..Default::default()
        }
        .with_application_url_fallback("https://jobs.example/1");
        assert_eq!(job.application_url.as_deref(), Some("https://apply.example"));
    }

    #[test]
    fn test_record_round_trips_through_wire_format() {
        let json = json!({
            "title": "Engineer",
            "company": "Acme",
            "job_type": "part-time",
            "posted_date": "2024-05-01"
        });
        let job: ParsedJobData = serde_json::from_value(json).unwrap();
        assert_eq!(job.job_type, Some(JobType::PartTime));
        assert_eq!(job.location, None);
        let back = serde_json::to_value(&job).unwrap();
        assert_eq!(back["posted_date"], "2024-05-01");
    }
}
