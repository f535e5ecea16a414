//! Lyrics extraction from lyrics-site pages
//!
//! The site wraps the lyrics in a bare `<div>` whose first child is an HTML
//! comment warning scrapers off. Both strategies anchor on that comment, so a
//! layout change makes them return `None` rather than garbage.
//!
//! Line breaks: each `<br>` becomes one `\n`, and a line ending directly after
//! it is absorbed, so `a<br>b` and `a<br>\nb` both give `a\nb`.

use once_cell::sync::Lazy;
use regex::Regex;
use scraper::{ElementRef, Html, Node};
use serde::{Deserialize, Serialize};

pub const MARKER: &str = "Usage of azlyrics.com content";

static LYRICS_BLOCK: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"(?s)<div>\s*<!--\s*Usage of azlyrics\.com content.*?-->\s*(.*?)\s*</div>")
        .expect("valid lyrics block pattern")
});
static LINE_BREAK: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"(?i)<br\s*/?\s*>(\r?\n)?").expect("valid line break pattern"));
static TAG: Lazy<Regex> = Lazy::new(|| Regex::new(r"<[^>]*>").expect("valid tag pattern"));

pub trait LyricsExtractor: Send + Sync {
    fn extract(&self, html: &str) -> Option<String>;
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ExtractorKind {
    #[default]
    Regex,
    Dom,
}

impl ExtractorKind {
    pub fn build(self) -> Box<dyn LyricsExtractor> {
        match self {
            ExtractorKind::Regex => Box::new(RegexExtractor),
            ExtractorKind::Dom => Box::new(DomExtractor),
        }
    }

    pub fn parse(value: &str) -> Option<Self> {
        match value.trim().to_lowercase().as_str() {
            "regex" => Some(ExtractorKind::Regex),
            "dom" | "html" => Some(ExtractorKind::Dom),
            _ => None,
        }
    }
}

/// Pattern-based extraction over the raw markup.
#[derive(Debug, Clone, Copy, Default)]
pub struct RegexExtractor;

impl LyricsExtractor for RegexExtractor {
    fn extract(&self, html: &str) -> Option<String> {
        let fragment = LYRICS_BLOCK.captures(html)?.get(1)?.as_str();

        let text = LINE_BREAK.replace_all(fragment, "\n");
        let text = TAG.replace_all(&text, "");
        // Only &quot; is decoded; the site escapes nothing else in practice.
        let text = text.replace("&quot;", "\"");

        finish(text)
    }
}

/// Tree-based extraction; entities are decoded by the HTML parser.
#[derive(Debug, Clone, Copy, Default)]
pub struct DomExtractor;

impl LyricsExtractor for DomExtractor {
    fn extract(&self, html: &str) -> Option<String> {
        let document = Html::parse_document(html);

        for node in document.tree.root().descendants() {
            let Node::Comment(comment) = node.value() else {
                continue;
            };
            if !comment.contains(MARKER) {
                continue;
            }
            let in_div = node
                .parent()
                .and_then(ElementRef::wrap)
                .is_some_and(|parent| parent.value().name() == "div");
            if !in_div {
                continue;
            }

            let mut collector = TextCollector::default();
            for sibling in node.next_siblings() {
                for child in sibling.descendants() {
                    match child.value() {
                        Node::Text(text) => collector.text(text),
                        Node::Element(element) if element.name() == "br" => collector.line_break(),
                        _ => {}
                    }
                }
            }
            return finish(collector.out.trim().to_string());
        }

        None
    }
}

#[derive(Default)]
struct TextCollector {
    out: String,
    after_break: bool,
}

impl TextCollector {
    fn line_break(&mut self) {
        self.out.push('\n');
        self.after_break = true;
    }

    fn text(&mut self, text: &str) {
        let text = if self.after_break {
            text.strip_prefix("\r\n")
                .or_else(|| text.strip_prefix('\n'))
                .unwrap_or(text)
        } else {
            text
        };
        self.after_break = false;
        self.out.push_str(text);
    }
}

fn finish(mut text: String) -> Option<String> {
    if text.is_empty() {
        return None;
    }
    if !text.ends_with('\n') {
        text.push('\n');
    }
    Some(text)
}

#[cfg(test)]
mod tests {
    use super::*;

    const NOTICE: &str = "<!-- Usage of azlyrics.com content by any third-party lyrics provider is prohibited by our licensing agreement. Sorry about that. -->";

    fn page(body: &str) -> String {
        format!(
            "<html><body><div class=\"ringtone\"></div><b>\"Song\"</b><br>\n<div>\n{}\n{}\n</div>\n<div class=\"noprint\">ads</div></body></html>",
            NOTICE, body
        )
    }

    fn both() -> [Box<dyn LyricsExtractor>; 2] {
        [ExtractorKind::Regex.build(), ExtractorKind::Dom.build()]
    }

    #[test]
    fn test_extract_single_break_and_quotes() {
        let html = format!("<div>{}Line one<br>Line two&quot;quoted&quot;</div>", NOTICE);
        for extractor in both() {
            assert_eq!(
                extractor.extract(&html).as_deref(),
                Some("Line one\nLine two\"quoted\"\n")
            );
        }
    }

    #[test]
    fn test_extract_site_layout() {
        let html = page("First line<br>\nSecond line<br/>\nThird line<br />\n<i>[Chorus]</i><br>\nLast line");
        for extractor in both() {
            assert_eq!(
                extractor.extract(&html).as_deref(),
                Some("First line\nSecond line\nThird line\n[Chorus]\nLast line\n")
            );
        }
    }

    #[test]
    fn test_adjacent_breaks_keep_blank_line() {
        let html = page("Verse end<br>\n<br>\nNext verse");
        for extractor in both() {
            assert_eq!(
                extractor.extract(&html).as_deref(),
                Some("Verse end\n\nNext verse\n")
            );
        }
    }

    #[test]
    fn test_trailing_newline_not_duplicated() {
        let html = page("Only line<br>");
        for extractor in both() {
            assert_eq!(extractor.extract(&html).as_deref(), Some("Only line\n"));
        }
    }

    #[test]
    fn test_missing_marker() {
        let html = "<html><body><div>Just some text</div></body></html>";
        for extractor in both() {
            assert_eq!(extractor.extract(html), None);
        }
    }

    #[test]
    fn test_empty_block() {
        let html = page("");
        for extractor in both() {
            assert_eq!(extractor.extract(&html), None);
        }
    }

    #[test]
    fn test_regex_only_decodes_quot() {
        let html = page("Rock &amp; roll &quot;forever&quot;");
        assert_eq!(
            RegexExtractor.extract(&html).as_deref(),
            Some("Rock &amp; roll \"forever\"\n")
        );
    }

    #[test]
    fn test_extractor_kind_parse() {
        assert_eq!(ExtractorKind::parse("Regex"), Some(ExtractorKind::Regex));
        assert_eq!(ExtractorKind::parse("dom"), Some(ExtractorKind::Dom));
        assert_eq!(ExtractorKind::parse("xpath"), None);
    }
}
