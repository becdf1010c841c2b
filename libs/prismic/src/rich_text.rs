//! Rendering of structured text fields to HTML.
//!
//! Span offsets count UTF-16 code units, as the editor produces them.

use askama_escape::{escape, Html};
use serde::Deserialize;

use crate::link;

#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
pub struct RichTextBlock {
    #[serde(rename = "type")]
    pub kind: String,
    #[serde(default)]
    pub text: String,
    #[serde(default)]
    pub spans: Vec<Span>,
    #[serde(default)]
    pub url: Option<String>,
    #[serde(default)]
    pub alt: Option<String>,
    #[serde(default)]
    pub oembed: Option<Embed>,
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct Span {
    pub start: usize,
    pub end: usize,
    #[serde(rename = "type")]
    pub kind: String,
    #[serde(default)]
    pub data: Option<Link>,
}

#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
pub struct Embed {
    #[serde(default)]
    pub html: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(tag = "link_type")]
pub enum Link {
    Web {
        url: String,
        #[serde(default)]
        target: Option<String>,
    },
    Document {
        #[serde(rename = "type")]
        document_type: String,
        #[serde(default)]
        uid: Option<String>,
    },
    Media {
        url: String,
    },
    #[serde(other)]
    Any,
}

impl Link {
    fn href(&self) -> Option<String> {
        match self {
            Link::Web { url, .. } | Link::Media { url } => Some(url.clone()),
            Link::Document { document_type, uid } => {
                Some(link::resolve(document_type, uid.as_deref()))
            }
            Link::Any => None,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum ListKind {
    Unordered,
    Ordered,
}

impl RichTextBlock {
    fn list_kind(&self) -> Option<ListKind> {
        match self.kind.as_str() {
            "list-item" => Some(ListKind::Unordered),
            "o-list-item" => Some(ListKind::Ordered),
            _ => None,
        }
    }

    /// HTML of this block alone. List items render as `<li>` without their
    /// surrounding list.
    pub fn as_html(&self) -> String {
        let inner = render_text(&self.text, &self.spans);
        match self.kind.as_str() {
            "heading1" | "heading2" | "heading3" | "heading4" | "heading5"
            | "heading6" => {
                let level = &self.kind["heading".len()..];
                format!("<h{level}>{inner}</h{level}>")
            }
            "preformatted" => format!("<pre>{inner}</pre>"),
            "list-item" | "o-list-item" => format!("<li>{inner}</li>"),
            "image" => format!(
                "<p class=\"block-img\"><img src=\"{}\" alt=\"{}\" /></p>",
                escape(self.url.as_deref().unwrap_or_default(), Html),
                escape(self.alt.as_deref().unwrap_or_default(), Html),
            ),
            "embed" => format!(
                "<div data-oembed=\"{}\">{}</div>",
                escape(self.url.as_deref().unwrap_or_default(), Html),
                self.oembed
                    .as_ref()
                    .and_then(|embed| embed.html.as_deref())
                    .unwrap_or_default(),
            ),
            _ => format!("<p>{inner}</p>"),
        }
    }
}

/// One HTML fragment per block; consecutive list items of the same kind are
/// grouped into a single `<ul>` or `<ol>` fragment.
pub fn fragments(blocks: &[RichTextBlock]) -> Vec<String> {
    let mut fragments = vec![];
    let mut list: Option<(ListKind, String)> = None;

    for block in blocks {
        match (block.list_kind(), list.as_mut()) {
            (Some(kind), Some((open, items))) if *open == kind => {
                items.push_str(&block.as_html());
            }
            (Some(kind), _) => {
                if let Some(done) = list.take() {
                    fragments.push(close_list(done));
                }
                list = Some((kind, block.as_html()));
            }
            (None, _) => {
                if let Some(done) = list.take() {
                    fragments.push(close_list(done));
                }
                fragments.push(block.as_html());
            }
        }
    }
    if let Some(done) = list {
        fragments.push(close_list(done));
    }

    fragments
}

fn close_list((kind, items): (ListKind, String)) -> String {
    match kind {
        ListKind::Unordered => format!("<ul>{items}</ul>"),
        ListKind::Ordered => format!("<ol>{items}</ol>"),
    }
}

fn open_tag(span: &Span) -> String {
    match span.kind.as_str() {
        "strong" => "<strong>".to_string(),
        "em" => "<em>".to_string(),
        "hyperlink" => {
            let href =
                span.data.as_ref().and_then(Link::href).unwrap_or_default();
            let target = match &span.data {
                Some(Link::Web {
                    target: Some(target),
                    ..
                }) => format!(
                    " target=\"{}\" rel=\"noopener\"",
                    escape(target, Html)
                ),
                _ => String::new(),
            };
            format!("<a href=\"{}\"{}>", escape(&href, Html), target)
        }
        label => format!("<span class=\"{}\">", escape(label, Html)),
    }
}

fn close_tag(span: &Span) -> &'static str {
    match span.kind.as_str() {
        "strong" => "</strong>",
        "em" => "</em>",
        "hyperlink" => "</a>",
        _ => "</span>",
    }
}

fn render_text(text: &str, spans: &[Span]) -> String {
    let mut spans: Vec<&Span> =
        spans.iter().filter(|span| span.start < span.end).collect();
    // outer spans first when several start at the same offset
    spans.sort_by(|a, b| a.start.cmp(&b.start).then(b.end.cmp(&a.end)));

    let mut html = String::new();
    let mut plain = String::new();
    let mut open: Vec<&Span> = vec![];
    let mut pending = spans.into_iter().peekable();
    let mut offset = 0;
    let mut chars = text.chars();

    loop {
        let closing = open.iter().any(|span| span.end <= offset);
        let opening = pending.peek().is_some_and(|span| span.start <= offset);
        if closing || opening {
            flush(&mut html, &mut plain);
        }
        // an ended span closes everything opened after it; the ones still
        // running are reopened right away
        if let Some(first_ended) =
            open.iter().position(|span| span.end <= offset)
        {
            let closed = open.split_off(first_ended);
            for span in closed.iter().rev() {
                html.push_str(close_tag(span));
            }
            for span in closed.into_iter().filter(|span| span.end > offset) {
                html.push_str(&open_tag(span));
                open.push(span);
            }
        }
        while let Some(span) = pending.next_if(|span| span.start <= offset) {
            html.push_str(&open_tag(span));
            open.push(span);
        }

        let Some(c) = chars.next() else {
            break;
        };
        plain.push(c);
        offset += c.len_utf16();
    }

    flush(&mut html, &mut plain);
    for span in open.iter().rev() {
        html.push_str(close_tag(span));
    }

    html
}

fn flush(html: &mut String, plain: &mut String) {
    if plain.is_empty() {
        return;
    }
    let escaped = escape(plain, Html).to_string();
    html.push_str(&escaped.replace('\n', "<br />"));
    plain.clear();
}
