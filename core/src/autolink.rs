//! GFM extended autolinks: bare `http(s)://` and `www.` URLs in text become
//! links. pulldown-cmark only understands `<url>` autolinks, so this runs as
//! an event pass between parsing and HTML generation.

use std::collections::VecDeque;
use std::ops::Range;
use std::sync::LazyLock;

use pulldown_cmark::CowStr;
use pulldown_cmark::Event;
use pulldown_cmark::LinkType;
use pulldown_cmark::Tag;
use pulldown_cmark::TagEnd;
use regex_lite::Regex;

#[allow(clippy::expect_used)]
static URL_CANDIDATE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?:(?i:https?)://|www\.)[^\s<]+").expect("valid autolink regex")
});

/// Opening or closing raw `<a>` / `<code>` tags inside inline HTML.
#[allow(clippy::expect_used)]
static RAW_SUPPRESSING_TAG: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?i)<(/?)(?:a|code)(?:[\s/>]|$)").expect("valid raw tag regex")
});

/// Characters that end a URL candidate without being part of it.
const TRAILING_PUNCTUATION: &[char] = &['?', '!', '.', ',', ':', '*', '_', '~', '\'', '"'];

/// Characters that may directly precede a URL candidate.
const LEADING_DELIMITERS: &[char] = &['*', '_', '~', '('];

#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) struct AutoLink {
    pub(crate) range: Range<usize>,
    pub(crate) href: String,
}

/// Wraps a pulldown-cmark event stream and splits text events around bare
/// URLs. Text inside links, images, and code blocks is passed through as is,
/// and so is text inside raw `<a>` and `<code>` elements.
pub(crate) struct Autolinker<'a, I> {
    inner: I,
    pending: VecDeque<Event<'a>>,
    suppress_depth: usize,
    // Inline HTML elements never outlive the block holding them.
    raw_html_depth: usize,
}

impl<'a, I> Autolinker<'a, I>
where
    I: Iterator<Item = Event<'a>>,
{
    pub(crate) fn new(inner: I) -> Self {
        Self {
            inner,
            pending: VecDeque::new(),
            suppress_depth: 0,
            raw_html_depth: 0,
        }
    }

    fn track_raw_html(&mut self, html: &str) {
        for tag in RAW_SUPPRESSING_TAG.captures_iter(html) {
            let closing = tag.get(1).is_some_and(|slash| !slash.as_str().is_empty());
            if closing {
                self.raw_html_depth = self.raw_html_depth.saturating_sub(1);
            } else {
                self.raw_html_depth += 1;
            }
        }
    }

    fn queue_linked_text(&mut self, text: &str, links: Vec<AutoLink>) {
        let mut cursor = 0;
        for AutoLink { range, href } in links {
            if range.start > cursor {
                self.pending
                    .push_back(Event::Text(text[cursor..range.start].to_string().into()));
            }
            self.pending.push_back(Event::Start(Tag::Link {
                link_type: LinkType::Autolink,
                dest_url: href.into(),
                title: CowStr::Borrowed(""),
                id: CowStr::Borrowed(""),
            }));
            self.pending
                .push_back(Event::Text(text[range.clone()].to_string().into()));
            self.pending.push_back(Event::End(TagEnd::Link));
            cursor = range.end;
        }
        if cursor < text.len() {
            self.pending
                .push_back(Event::Text(text[cursor..].to_string().into()));
        }
    }
}

impl<'a, I> Iterator for Autolinker<'a, I>
where
    I: Iterator<Item = Event<'a>>,
{
    type Item = Event<'a>;

    fn next(&mut self) -> Option<Self::Item> {
        if let Some(event) = self.pending.pop_front() {
            return Some(event);
        }

        let event = self.inner.next()?;
        match event {
            Event::Start(Tag::Link { .. } | Tag::Image { .. } | Tag::CodeBlock(_)) => {
                self.suppress_depth += 1;
                Some(event)
            }
            Event::End(TagEnd::Link | TagEnd::Image | TagEnd::CodeBlock) => {
                self.suppress_depth = self.suppress_depth.saturating_sub(1);
                Some(event)
            }
            Event::Start(
                Tag::Paragraph | Tag::Heading { .. } | Tag::Item | Tag::TableCell,
            )
            | Event::End(
                TagEnd::Paragraph | TagEnd::Heading(_) | TagEnd::Item | TagEnd::TableCell,
            ) => {
                self.raw_html_depth = 0;
                Some(event)
            }
            Event::InlineHtml(ref html) => {
                self.track_raw_html(html);
                Some(event)
            }
            Event::Text(text) if self.suppress_depth == 0 && self.raw_html_depth == 0 => {
                let links = find_links(&text);
                if links.is_empty() {
                    return Some(Event::Text(text));
                }
                self.queue_linked_text(&text, links);
                self.pending.pop_front()
            }
            other => Some(other),
        }
    }
}

/// Finds every extended autolink in `text`, in order.
pub(crate) fn find_links(text: &str) -> Vec<AutoLink> {
    URL_CANDIDATE
        .find_iter(text)
        .filter(|candidate| starts_at_boundary(text, candidate.start()))
        .filter_map(|candidate| {
            let start = candidate.start();
            let end = trim_link_end(text, start, candidate.end());
            let link = &text[start..end];
            let is_www = link.starts_with("www.");
            let host_start = if is_www {
                0
            } else {
                link.find("://").map_or(link.len(), |idx| idx + 3)
            };
            if !is_valid_domain(host_of(&link[host_start..])) {
                return None;
            }
            let href = if is_www {
                format!("http://{link}")
            } else {
                link.to_string()
            };
            Some(AutoLink {
                range: start..end,
                href,
            })
        })
        .collect()
}

fn starts_at_boundary(text: &str, start: usize) -> bool {
    text[..start]
        .chars()
        .next_back()
        .is_none_or(|c| c.is_whitespace() || LEADING_DELIMITERS.contains(&c))
}

/// Walks `end` back over characters that GFM does not treat as part of a
/// trailing URL.
fn trim_link_end(text: &str, start: usize, mut end: usize) -> usize {
    loop {
        let link = &text[start..end];
        let Some(last) = link.chars().next_back() else {
            return end;
        };
        if TRAILING_PUNCTUATION.contains(&last) {
            end -= last.len_utf8();
        } else if last == ')' && link.matches(')').count() > link.matches('(').count() {
            end -= 1;
        } else if last == ';' {
            match trailing_entity_len(link) {
                Some(len) => end -= len,
                None => return end,
            }
        } else {
            return end;
        }
    }
}

/// Length of a trailing `&name;` entity reference, if `link` ends with one.
fn trailing_entity_len(link: &str) -> Option<usize> {
    let body = link.strip_suffix(';')?;
    let amp = body.rfind('&')?;
    let name = &body[amp + 1..];
    let is_entity = !name.is_empty() && name.chars().all(|c| c.is_ascii_alphanumeric());
    is_entity.then(|| link.len() - amp)
}

fn host_of(rest: &str) -> &str {
    rest.split(['/', '?', '#', ':']).next().unwrap_or_default()
}

/// Period-separated segments of alphanumerics, `-` and `_`, at least two of
/// them, with no `_` in the last two.
fn is_valid_domain(host: &str) -> bool {
    let segments: Vec<&str> = host.split('.').collect();
    if segments.len() < 2 {
        return false;
    }
    let well_formed = segments.iter().all(|segment| {
        !segment.is_empty()
            && segment
                .chars()
                .all(|c| c.is_alphanumeric() || matches!(c, '-' | '_'))
    });
    well_formed
        && segments
            .iter()
            .rev()
            .take(2)
            .all(|segment| !segment.contains('_'))
}
