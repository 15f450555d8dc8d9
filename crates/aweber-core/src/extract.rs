//! Plain-text extraction from broadcast HTML.
//!
//! Email markup is frequently malformed, so parsing goes through html5ever
//! (via `scraper`), which recovers from anything and never fails. Two things
//! are pulled out of a document:
//!
//! - the preview ("preheader") line shown by inbox lists before opening,
//!   taken from `<meta name="x-preheader">` or else from the first element
//!   whose class mentions `preheader`;
//! - the body text: every text node outside `<script>` and `<style>`,
//!   trimmed, joined by blank lines.

use scraper::{Html, Node};

/// Meta tag carrying an explicit preview line.
const PREHEADER_META: &str = "x-preheader";

/// Class substring marking hidden preview blocks, compared lowercase.
const PREHEADER_CLASS: &str = "preheader";

/// Separator placed between text segments of the body.
const SEGMENT_SEPARATOR: &str = "\n\n";

/// Preview line and body text of one HTML document.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ExtractedContent {
    /// Preview/preheader line, if the document has one.
    pub preview: Option<String>,
    /// Body text.
    pub body: String,
}

impl ExtractedContent {
    /// Parses `html` and extracts preview and body.
    #[must_use]
    pub fn from_html(html: &str) -> Self {
        if html.is_empty() {
            return Self::default();
        }
        let document = Html::parse_document(html);
        Self {
            preview: find_preview(&document),
            body: body_text(&document),
        }
    }

    /// Report rendering: a preview header and rule when present, then the body.
    #[must_use]
    pub fn render(&self) -> String {
        match &self.preview {
            Some(preview) => format!("**Preview Text:** {preview}\n\n---\n\n{}", self.body),
            None => self.body.clone(),
        }
    }
}

/// Renders the text content of a broadcast body.
///
/// `None` and empty input yield an empty string.
#[must_use]
pub fn clean_html(html: Option<&str>) -> String {
    html.map(ExtractedContent::from_html)
        .unwrap_or_default()
        .render()
}

fn find_preview(document: &Html) -> Option<String> {
    meta_preview(document).or_else(|| class_preview(document))
}

/// Content of the first `x-preheader` meta tag. Later tags are not consulted.
fn meta_preview(document: &Html) -> Option<String> {
    document
        .tree
        .root()
        .descendants()
        .filter_map(|node| node.value().as_element())
        .find(|el| el.name() == "meta" && el.attr("name") == Some(PREHEADER_META))
        .and_then(|el| el.attr("content"))
        .map(str::trim)
        .filter(|content| !content.is_empty())
        .map(ToString::to_string)
}

/// Text of the first element whose class contains `preheader` and has any text.
fn class_preview(document: &Html) -> Option<String> {
    document
        .tree
        .root()
        .descendants()
        .filter(|node| {
            node.value()
                .as_element()
                .and_then(|el| el.attr("class"))
                .is_some_and(|class| class.to_lowercase().contains(PREHEADER_CLASS))
        })
        .map(|node| {
            node.descendants()
                .filter_map(|n| n.value().as_text())
                .map(|text| text.trim())
                .collect::<String>()
        })
        .find(|text| !text.is_empty())
}

fn body_text(document: &Html) -> String {
    let segments: Vec<&str> = document
        .tree
        .root()
        .descendants()
        .filter_map(|node| {
            let text = node.value().as_text()?;
            let hidden = node.ancestors().any(|a| is_non_content(a.value()));
            let text = text.trim();
            (!hidden && !text.is_empty()).then_some(text)
        })
        .collect();
    segments.join(SEGMENT_SEPARATOR)
}

fn is_non_content(node: &Node) -> bool {
    node.as_element()
        .is_some_and(|el| matches!(el.name(), "script" | "style"))
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    #[test]
    fn test_empty_input() {
        assert_eq!(clean_html(None), "");
        assert_eq!(clean_html(Some("")), "");
    }

    #[test]
    fn test_body_segments() {
        let html = "<html><body><h1>Hello</h1><p>First <b>bold</b></p>\n<p>  </p></body></html>";
        assert_eq!(clean_html(Some(html)), "Hello\n\nFirst\n\nbold");
    }

    #[test]
    fn test_script_and_style_removed() {
        let html = r"<html><head><style>.x { color: red }</style>
            <script>var tracking = 1;</script></head>
            <body><p>Visible</p><script>alert('no')</script></body></html>";
        assert_eq!(clean_html(Some(html)), "Visible");
    }

    #[test]
    fn test_comments_are_not_text() {
        let html = "<body><!-- [if mso]> hidden <![endif] --><p>Shown</p></body>";
        assert_eq!(clean_html(Some(html)), "Shown");
    }

    #[test]
    fn test_meta_preview() {
        let html = r#"<html><head><meta name="x-preheader" content="  Big news inside  "></head>
            <body><div class="preheader">Other teaser</div><p>Body</p></body></html>"#;
        let content = ExtractedContent::from_html(html);
        assert_eq!(content.preview.as_deref(), Some("Big news inside"));
        assert_eq!(
            content.render(),
            "**Preview Text:** Big news inside\n\n---\n\nOther teaser\n\nBody"
        );
    }

    #[test]
    fn test_empty_meta_falls_back_to_class() {
        let html = r#"<head><meta name="x-preheader" content=" "></head>
            <body><span class="Hidden-PREHEADER-text"> Teaser <i>here</i> </span><p>Body</p></body>"#;
        let content = ExtractedContent::from_html(html);
        assert_eq!(content.preview.as_deref(), Some("Teaserhere"));
    }

    #[test]
    fn test_class_without_text_is_skipped() {
        let html = r#"<body><div class="preheader">   </div><div class="preheader-2">Second</div></body>"#;
        let content = ExtractedContent::from_html(html);
        assert_eq!(content.preview.as_deref(), Some("Second"));
    }

    #[test]
    fn test_no_preview() {
        let content = ExtractedContent::from_html("<p class=\"header\">Top</p>");
        assert!(content.preview.is_none());
        assert_eq!(content.render(), "Top");
    }

    #[test]
    fn test_entities_decoded() {
        assert_eq!(clean_html(Some("<p>Fish &amp; chips&nbsp;</p>")), "Fish & chips");
    }

    #[test]
    fn test_malformed_markup() {
        let html = "<div><p>Unclosed <b>bold</div><p>next</span>";
        assert_eq!(clean_html(Some(html)), "Unclosed\n\nbold\n\nnext");
    }

    fn word() -> impl Strategy<Value = String> {
        "[a-zA-Z0-9]{1,12}( [a-zA-Z0-9]{1,12}){0,3}"
    }

    proptest! {
        #[test]
        fn prop_meta_preview_wins(meta in word(), teaser in word(), body in word()) {
            let html = format!(
                r#"<html><head><meta name="x-preheader" content=" {meta} "></head><body><div class="preheader">{teaser}</div><p>{body}</p></body></html>"#
            );
            let content = ExtractedContent::from_html(&html);
            prop_assert_eq!(content.preview, Some(meta.trim().to_string()));
        }

        #[test]
        fn prop_class_preview_any_case(
            teaser in word(),
            class in "(PreHeader|preheader|PREHEADER|x-preheader-y)",
        ) {
            let html = format!(r#"<body><p>Intro</p><span class="{class}"> {teaser} </span></body>"#);
            let content = ExtractedContent::from_html(&html);
            prop_assert_eq!(content.preview, Some(teaser.trim().to_string()));
        }

        #[test]
        fn prop_script_text_never_in_body(secret_tail in "[a-z]{8}", body in word()) {
            let secret = format!("zzsecret{secret_tail}");
            let html = format!(
                "<head><style>.{secret} {{}}</style></head><body><script>var {secret};</script><p>{body}</p></body>"
            );
            let text = clean_html(Some(&html));
            prop_assert!(!text.contains(&secret));
            prop_assert_eq!(text, body.trim().to_string());
        }
    }
}
