// src/convert/rich_text.rs
//! Rendering rich text spans into inline markup.
//!
//! `render_spans` is a pure function: concatenation preserves span
//! order, and the annotation wraps apply in one fixed precedence,
//! innermost to outermost — code, bold, italic, strikethrough,
//! underline, link. The order is a contract, not an artifact of
//! evaluation: the same annotation set always renders the same string.

use crate::types::{RichTextSpan, SpanKind};
use url::Url;

/// The markdown flavor conversions target.
///
/// GitHub-flavored output leans on raw HTML where markdown has no
/// syntax (underline, toggles); pure CommonMark avoids HTML and drops
/// what it cannot express.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum MarkdownDialect {
    #[default]
    Github,
    CommonMark,
}

/// Renders an ordered span array to inline markup.
pub fn render_spans(spans: &[RichTextSpan], dialect: MarkdownDialect) -> String {
    spans
        .iter()
        .filter(|span| !span.is_empty())
        .map(|span| render_span(span, dialect))
        .collect()
}

fn render_span(span: &RichTextSpan, dialect: MarkdownDialect) -> String {
    let mut result = match &span.kind {
        SpanKind::Text { content, .. } => content.clone(),
        SpanKind::Equation { expression } => format!("${}$", expression),
        SpanKind::Mention => span.plain_text.clone(),
    };

    // Fixed wrap precedence, innermost to outermost.
    if span.annotations.code {
        result = format!("`{}`", result);
    }

    if span.annotations.bold {
        result = format!("**{}**", result);
    }

    if span.annotations.italic {
        result = format!("*{}*", result);
    }

    if span.annotations.strikethrough {
        result = format!("~~{}~~", result);
    }

    if span.annotations.underline {
        // Underline has no markdown syntax; only the HTML-tolerant
        // dialect renders it.
        if dialect == MarkdownDialect::Github {
            result = format!("<u>{}</u>", result);
        }
    }

    // The already-decorated text becomes the link label.
    if let Some(url) = link_target(span) {
        result = format!("[{}]({})", result, url);
    }

    result
}

/// The span's link target, if it carries a usable one.
///
/// `href` wins over the text-level link; invalid or non-HTTP targets
/// degrade to unlinked text rather than emitting a broken link.
fn link_target(span: &RichTextSpan) -> Option<String> {
    let raw = match (&span.href, &span.kind) {
        (Some(href), _) => href.as_str(),
        (None, SpanKind::Text { link: Some(l), .. }) => l.url.as_str(),
        _ => return None,
    };

    let parsed = Url::parse(raw).ok()?;
    if parsed.scheme() != "http" && parsed.scheme() != "https" {
        return None;
    }
    Some(parsed.to_string())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::Annotations;

    fn span(text: &str, annotations: Annotations) -> RichTextSpan {
        RichTextSpan::styled(text, annotations)
    }

    #[test]
    fn code_nests_inside_bold() {
        let spans = vec![span(
            "text",
            Annotations {
                bold: true,
                code: true,
                ..Default::default()
            },
        )];
        assert_eq!(render_spans(&spans, MarkdownDialect::Github), "**`text`**");
    }

    #[test]
    fn full_annotation_stack_keeps_the_fixed_order() {
        let spans = vec![span(
            "x",
            Annotations {
                bold: true,
                italic: true,
                strikethrough: true,
                underline: true,
                code: true,
            },
        )];
        assert_eq!(
            render_spans(&spans, MarkdownDialect::Github),
            "<u>~~***`x`***~~</u>"
        );
    }

    #[test]
    fn commonmark_drops_underline_but_keeps_the_rest() {
        let spans = vec![span(
            "x",
            Annotations {
                underline: true,
                bold: true,
                ..Default::default()
            },
        )];
        assert_eq!(render_spans(&spans, MarkdownDialect::CommonMark), "**x**");
    }

    #[test]
    fn link_wraps_the_decorated_text() {
        let mut s = RichTextSpan::linked("docs", "https://example.com/docs");
        s.annotations.bold = true;
        assert_eq!(
            render_spans(&[s], MarkdownDialect::Github),
            "[**docs**](https://example.com/docs)"
        );
    }

    #[test]
    fn invalid_hrefs_degrade_to_unlinked_text() {
        let mut s = RichTextSpan::plain("note");
        s.href = Some("notion://deep-link".to_string());
        assert_eq!(render_spans(&[s], MarkdownDialect::Github), "note");
    }

    #[test]
    fn span_order_is_preserved() {
        let spans = vec![
            RichTextSpan::plain("Hello "),
            span(
                "world",
                Annotations {
                    italic: true,
                    ..Default::default()
                },
            ),
        ];
        assert_eq!(render_spans(&spans, MarkdownDialect::Github), "Hello *world*");
    }

    #[test]
    fn equations_render_inline_from_the_expression() {
        let s = RichTextSpan {
            kind: SpanKind::Equation {
                expression: "E = mc^2".to_string(),
            },
            plain_text: "E = mc^2".to_string(),
            href: None,
            annotations: Annotations::default(),
        };
        assert_eq!(render_spans(&[s], MarkdownDialect::Github), "$E = mc^2$");
    }

    #[test]
    fn empty_spans_render_nothing() {
        let spans = vec![RichTextSpan::plain(""), RichTextSpan::plain("a")];
        assert_eq!(render_spans(&spans, MarkdownDialect::Github), "a");
    }
}
