//! CSS-selector adapters for known job boards.

use super::{PageSnapshot, SiteAdapter};
use crate::types::job::ParsedJobData;

/// Selector-driven adapter for one job board.
///
/// Each selector list is tried in order and the first non-empty text
/// wins. A page only matches when a title is found; a missing company
/// falls back to `default_employer`.
#[derive(Debug, Clone)]
pub struct DomainAdapter {
    pub name: &'static str,
    /// Host substrings this adapter applies to
    pub hosts: &'static [&'static str],
    pub title: &'static [&'static str],
    pub company: &'static [&'static str],
    pub location: &'static [&'static str],
    pub description: &'static [&'static str],
    /// Company label used when no company selector matched
    pub default_employer: &'static str,
}

impl SiteAdapter for DomainAdapter {
    fn name(&self) -> &str {
        self.name
    }

    fn applies_to(&self, page: &PageSnapshot) -> bool {
        page.host()
            .is_some_and(|host| self.hosts.iter().any(|h| host.contains(h)))
    }

    fn extract(&self, page: &PageSnapshot) -> Option<ParsedJobData> {
        let title = page.first_text(self.title)?;
        let company = page
            .first_text(self.company)
            .unwrap_or_else(|| self.default_employer.to_string());

        Some(ParsedJobData {
            title: Some(title),
            company: Some(company),
            location: page.first_text(self.location),
            description: page.first_text(self.description),
            ..Default::default()
        })
    }
}

pub const LINKEDIN: DomainAdapter = DomainAdapter {
    name: "linkedin",
    hosts: &["linkedin.com"],
    title: &[
        "h1.top-card-layout__title",
        ".job-details-jobs-unified-top-card__job-title",
        "h1[data-test-id='job-title']",
        ".jobs-unified-top-card__job-title",
    ],
    company: &[
        ".job-details-jobs-unified-top-card__company-name",
        ".topcard__org-name-link",
        "a[data-test-id='job-poster-name']",
        ".jobs-unified-top-card__company-name",
    ],
    location: &[
        ".job-details-jobs-unified-top-card__bullet",
        ".topcard__flavor--bullet",
        "[data-test-id='job-location']",
        ".jobs-unified-top-card__bullet",
    ],
    description: &[
        ".show-more-less-html__markup",
        ".jobs-box__html-content",
        ".jobs-description__container",
        "[data-test-id='job-description']",
    ],
    default_employer: "LinkedIn Employer",
};

pub const SEEK: DomainAdapter = DomainAdapter {
    name: "seek",
    hosts: &["seek.co.nz", "seek.com.au"],
    title: &["[data-automation='job-detail-title']"],
    company: &["[data-automation='advertiser-name']"],
    location: &["[data-automation='job-detail-location']"],
    description: &["[data-automation='jobAdDetails']"],
    default_employer: "Seek Employer",
};

pub const INDEED: DomainAdapter = DomainAdapter {
    name: "indeed",
    hosts: &["indeed.com", "indeed.co.nz"],
    title: &[
        "h1[data-testid='jobsearch-JobInfoHeader-title']",
        ".jobsearch-JobInfoHeader-title",
    ],
    company: &[
        "[data-testid='inlineHeader-companyName']",
        "[data-company-name='true']",
    ],
    location: &[
        "[data-testid='inlineHeader-companyLocation']",
        "[data-testid='job-location']",
    ],
    description: &["#jobDescriptionText"],
    default_employer: "Indeed Employer",
};

pub const TRADE_ME: DomainAdapter = DomainAdapter {
    name: "trademe-jobs",
    hosts: &["trademe.co.nz"],
    title: &["h1.tm-jobs-listing__title", "tm-jobs-listing h1"],
    company: &[
        ".tm-jobs-listing__company-name",
        "[data-testid='company-name']",
    ],
    location: &[".tm-jobs-listing__location", "[data-testid='location']"],
    description: &[".tm-markdown", ".tm-jobs-listing__description"],
    default_employer: "Trade Me Employer",
};

/// The job boards registered by default, in evaluation order.
pub fn default_domain_adapters() -> Vec<DomainAdapter> {
    vec![LINKEDIN, SEEK, INDEED, TRADE_ME]
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::adapters::{AdapterSet, Confidence};

    #[test]
    fn test_seek_page() {
        let html = r#"<html><body>
            <h1 data-automation="job-detail-title">Site Manager</h1>
            <span data-automation="advertiser-name">Hawkins Construction</span>
            <span data-automation="job-detail-location">Auckland CBD, Auckland</span>
            <div data-automation="jobAdDetails"><p>Run our sites.</p></div>
        </body></html>"#;

        let found = AdapterSet::default().run(html, Some("https://www.seek.co.nz/job/7700123"));
        assert_eq!(found.adapter, "seek");
        assert_eq!(found.confidence, Confidence::High);
        assert_eq!(found.data.title.as_deref(), Some("Site Manager"));
        assert_eq!(found.data.company.as_deref(), Some("Hawkins Construction"));
        assert_eq!(found.data.location.as_deref(), Some("Auckland CBD, Auckland"));
        assert_eq!(found.data.description.as_deref(), Some("Run our sites."));
    }

    #[test]
    fn test_linkedin_default_employer() {
        let html = r#"<html><body>
            <h1 class="top-card-layout__title">Data Analyst</h1>
        </body></html>"#;

        let found = AdapterSet::default().run(html, Some("https://nz.linkedin.com/jobs/view/1"));
        assert_eq!(found.adapter, "linkedin");
        assert_eq!(found.data.company.as_deref(), Some("LinkedIn Employer"));
    }

    #[test]
    fn test_host_gate() {
        let html = r#"<h1 data-automation="job-detail-title">Site Manager</h1>"#;
        let page = PageSnapshot::parse(html, Some("https://jobs.example.com/1"));
        assert!(!SEEK.applies_to(&page));

        let page = PageSnapshot::parse(html, None);
        assert!(!SEEK.applies_to(&page));
    }

    #[test]
    fn test_no_title_is_not_a_match() {
        let page = PageSnapshot::parse(
            "<html><body><p>Listing removed</p></body></html>",
            Some("https://www.indeed.com/viewjob?jk=1"),
        );
        assert!(INDEED.applies_to(&page));
        assert!(INDEED.extract(&page).is_none());
    }

    #[test]
    fn test_error_page_heading_is_not_a_title() {
        let html = r#"<html><head><title>Page not found | SEEK</title></head>
            <body><h1>Page not found</h1></body></html>"#;

        let found = AdapterSet::default().run(html, Some("https://www.seek.co.nz/job/404"));
        assert_ne!(found.adapter, "seek");
        assert_eq!(found.confidence, Confidence::Low);

        let page = PageSnapshot::parse(
            "<html><body><h1>Sorry, this listing has closed</h1></body></html>",
            Some("https://www.trademe.co.nz/a/jobs/listing/1"),
        );
        assert!(TRADE_ME.applies_to(&page));
        assert!(TRADE_ME.extract(&page).is_none());
    }

    #[test]
    fn test_trade_me_listing() {
        let html = r#"<html><body><tm-jobs-listing>
            <h1>Dairy Farm Assistant</h1>
            <div class="tm-jobs-listing__company-name">Waikato Milk Co</div>
        </tm-jobs-listing></body></html>"#;

        let found = AdapterSet::default().run(html, Some("https://www.trademe.co.nz/a/jobs/listing/2"));
        assert_eq!(found.adapter, "trademe-jobs");
        assert_eq!(found.confidence, Confidence::High);
        assert_eq!(found.data.title.as_deref(), Some("Dairy Farm Assistant"));
        assert_eq!(found.data.company.as_deref(), Some("Waikato Milk Co"));
    }
}
