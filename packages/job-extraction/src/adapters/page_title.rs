use super::{PageSnapshot, SiteAdapter};
use crate::types::job::ParsedJobData;

/// Company placeholder for the title-only record.
const UNKNOWN: &str = "Unknown";

/// Last-resort adapter: the page `<title>` (or `og:title`) as job title.
pub struct PageTitleAdapter;

impl SiteAdapter for PageTitleAdapter {
    fn name(&self) -> &str {
        "page-title"
    }

    fn extract(&self, page: &PageSnapshot) -> Option<ParsedJobData> {
        let title = page
            .first_text(&["title"])
            .or_else(|| page.first_attr("meta[property='og:title']", "content"));

        Some(ParsedJobData {
            title,
            company: Some(UNKNOWN.to_string()),
            ..Default::default()
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_title_tag() {
        let page = PageSnapshot::parse("<html><head><title>Chef | Cafe</title></head></html>", None);
        let job = PageTitleAdapter.extract(&page).unwrap();
        assert_eq!(job.title.as_deref(), Some("Chef | Cafe"));
        assert_eq!(job.company.as_deref(), Some("Unknown"));
    }

    #[test]
    fn test_title_entities_and_whitespace() {
        let page = PageSnapshot::parse(
            "<html><head><title>\n  Barista &amp; Cook |  Cafe </title></head></html>",
            None,
        );
        let job = PageTitleAdapter.extract(&page).unwrap();
        assert_eq!(job.title.as_deref(), Some("Barista & Cook | Cafe"));
    }

    #[test]
    fn test_og_title_and_plain_text() {
        let page = PageSnapshot::parse(
            r#"<html><head><meta property="og:title" content="Night Porter"></head></html>"#,
            None,
        );
        assert_eq!(
            PageTitleAdapter.extract(&page).unwrap().title.as_deref(),
            Some("Night Porter")
        );

        let page = PageSnapshot::parse("just some pasted text", None);
        let job = PageTitleAdapter.extract(&page).unwrap();
        assert_eq!(job.title, None);
    }
}
