// src/types/rich_text.rs
//! Rich text spans — one run of text carrying its own annotation state.
//!
//! Span order within a containing array is semantically significant: it is
//! the rendering order, and nothing in this crate reorders spans.

use serde::{Deserialize, Serialize};

/// The content variant of a span.
///
/// `plain_text` on the containing span is the fallback rendering for any
/// variant, which is what lets mentions and equations degrade gracefully.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum SpanKind {
    Text {
        content: String,
        link: Option<Link>,
    },
    Mention,
    Equation {
        expression: String,
    },
}

/// An inline link target attached at the text level.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Link {
    pub url: String,
}

/// Stylistic flags attached to a span.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct Annotations {
    pub bold: bool,
    pub italic: bool,
    pub strikethrough: bool,
    pub underline: bool,
    pub code: bool,
}

impl Annotations {
    /// Whether any flag is set.
    pub fn any(&self) -> bool {
        self.bold || self.italic || self.strikethrough || self.underline || self.code
    }
}

/// Rich text span with formatting annotations.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RichTextSpan {
    pub kind: SpanKind,
    pub plain_text: String,
    pub href: Option<String>,
    pub annotations: Annotations,
}

impl RichTextSpan {
    /// Create a plain text span — the most common variant.
    ///
    /// The vocabulary for constructing rich text in builders and tests.
    /// Instead of four fields with `None`s, just:
    /// ```ignore
    /// RichTextSpan::plain("hello")
    /// ```
    pub fn plain(text: &str) -> Self {
        Self {
            kind: SpanKind::Text {
                content: text.to_string(),
                link: None,
            },
            plain_text: text.to_string(),
            href: None,
            annotations: Annotations::default(),
        }
    }

    /// Plain text with annotation flags, for builders and tests.
    pub fn styled(text: &str, annotations: Annotations) -> Self {
        Self {
            annotations,
            ..Self::plain(text)
        }
    }

    /// A span linking to `url`.
    pub fn linked(text: &str, url: &str) -> Self {
        Self {
            kind: SpanKind::Text {
                content: text.to_string(),
                link: Some(Link {
                    url: url.to_string(),
                }),
            },
            plain_text: text.to_string(),
            href: Some(url.to_string()),
            annotations: Annotations::default(),
        }
    }

    /// Whether this span renders to nothing.
    pub fn is_empty(&self) -> bool {
        self.plain_text.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn plain_constructor_carries_text_through() {
        let span = RichTextSpan::plain("hello");
        assert_eq!(span.plain_text, "hello");
        assert!(matches!(span.kind, SpanKind::Text { ref content, .. } if content == "hello"));
        assert!(!span.annotations.any());
    }

    #[test]
    fn linked_constructor_sets_both_link_and_href() {
        let span = RichTextSpan::linked("docs", "https://example.com/docs");
        assert_eq!(span.href.as_deref(), Some("https://example.com/docs"));
        assert!(
            matches!(span.kind, SpanKind::Text { link: Some(ref l), .. } if l.url == "https://example.com/docs")
        );
    }
}
