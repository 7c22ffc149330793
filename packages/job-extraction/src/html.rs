//! HTML helpers shared by the adapters and the prompt builder.

use std::sync::LazyLock;

use regex::Regex;

macro_rules! pattern {
    ($name:ident, $re:expr) => {
        static $name: LazyLock<Regex> = LazyLock::new(|| Regex::new($re).expect("valid regex"));
    };
}

pattern!(SCRIPT, r"(?is)<script[^>]*>.*?</script>");
pattern!(STYLE, r"(?is)<style[^>]*>.*?</style>");
pattern!(NOSCRIPT, r"(?is)<noscript[^>]*>.*?</noscript>");
pattern!(COMMENT, r"(?s)<!--.*?-->");
pattern!(H1, r"(?is)<h1[^>]*>(.*?)</h1>");
pattern!(H2, r"(?is)<h2[^>]*>(.*?)</h2>");
pattern!(H3, r"(?is)<h3[^>]*>(.*?)</h3>");
pattern!(PARAGRAPH, r"(?is)<p[^>]*>(.*?)</p>");
pattern!(BREAK, r"(?i)<br\s*/?>");
pattern!(LINK, r#"(?is)<a[^>]*href=["']([^"']+)["'][^>]*>(.*?)</a>"#);
pattern!(LIST_ITEM, r"(?is)<li[^>]*>(.*?)</li>");
pattern!(BLOCK_END, r"(?i)</(div|section|article|ul|ol|tr|table|header|footer)>");
pattern!(TAG, r"<[^>]+>");
pattern!(BLANK_LINES, r"\n[ \t]*(\n[ \t]*){2,}");
pattern!(SPACES, r"[ \t]{2,}");
pattern!(HTML_MARKER, r"(?i)<(!doctype|html|head|body|div|p|script|meta)[\s>]");

/// Whether `content` reads as an HTML document or fragment.
pub fn looks_like_html(content: &str) -> bool {
    HTML_MARKER.is_match(content)
}

/// Convert HTML to markdown (simplified).
///
/// Good enough to hand to a language model: scripts and styles go,
/// headings, paragraphs, links and list items keep their shape.
pub fn html_to_markdown(html: &str) -> String {
    let mut text = SCRIPT.replace_all(html, "").into_owned();
    text = STYLE.replace_all(&text, "").into_owned();
    text = NOSCRIPT.replace_all(&text, "").into_owned();
    text = COMMENT.replace_all(&text, "").into_owned();

    text = H1.replace_all(&text, "\n# $1\n").into_owned();
    text = H2.replace_all(&text, "\n## $1\n").into_owned();
    text = H3.replace_all(&text, "\n### $1\n").into_owned();

    text = PARAGRAPH.replace_all(&text, "$1\n\n").into_owned();
    text = BREAK.replace_all(&text, "\n").into_owned();
    text = LINK.replace_all(&text, "[$2]($1)").into_owned();
    text = LIST_ITEM.replace_all(&text, "- $1\n").into_owned();
    text = BLOCK_END.replace_all(&text, "\n").into_owned();

    text = TAG.replace_all(&text, "").into_owned();
    text = decode_entities(&text);
    text = SPACES.replace_all(&text, " ").into_owned();
    text = BLANK_LINES.replace_all(&text, "\n\n").into_owned();

    text.trim().to_string()
}

/// Collapse runs of whitespace into single spaces.
pub fn clean_text(text: &str) -> String {
    text.split_whitespace().collect::<Vec<_>>().join(" ")
}

/// Cut `text` to at most `max_chars` characters.
pub fn truncate_chars(text: &str, max_chars: usize) -> &str {
    match text.char_indices().nth(max_chars) {
        Some((idx, _)) => &text[..idx],
        None => text,
    }
}

/// Decode the handful of entities job boards actually emit.
pub(crate) fn decode_entities(text: &str) -> String {
    text.replace("&nbsp;", " ")
        .replace("&lt;", "<")
        .replace("&gt;", ">")
        .replace("&quot;", "\"")
        .replace("&#39;", "'")
        .replace("&#x27;", "'")
        .replace("&apos;", "'")
        .replace("&amp;", "&")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_html_to_markdown() {
        let html = r#"
            <html><head><style>body { color: red; }</style>
            <script>window.tracking = true;</script></head>
            <body>
            <h1>Senior Engineer</h1>
            <p>Join <b>Acme</b> &amp; friends.</p>
            <ul><li>Rust</li><li>Postgres</li></ul>
            <a href="https://acme.example/apply">Apply</a>
            </body></html>
        "#;

        let md = html_to_markdown(html);

        assert!(md.contains("# Senior Engineer"));
        assert!(md.contains("Join Acme & friends."));
        assert!(md.contains("- Rust"));
        assert!(md.contains("[Apply](https://acme.example/apply)"));
        assert!(!md.contains("tracking"));
        assert!(!md.contains("color"));
    }

    #[test]
    fn test_looks_like_html() {
        assert!(looks_like_html("<!DOCTYPE html><html></html>"));
        assert!(looks_like_html("<div class=\"job\">text</div>"));
        assert!(!looks_like_html("Senior Engineer at Acme. Salary 100k < 120k."));
    }

    #[test]
    fn test_truncate_chars_on_boundary() {
        assert_eq!(truncate_chars("héllo", 2), "hé");
        assert_eq!(truncate_chars("abc", 10), "abc");
    }
}
