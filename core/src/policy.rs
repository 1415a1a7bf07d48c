//! Allow-list sanitization policy for rendered chat HTML.
//!
//! The tables below are the whole policy: an element survives only if it is
//! listed in [`ALLOWED_TAGS`], and an attribute survives only if it is listed
//! for its element in [`ALLOWED_ATTRIBUTES`]. Disallowed elements are
//! unwrapped (their children stay in place), except `script` and `style`,
//! which are dropped together with their content.

use std::borrow::Cow;
use std::collections::HashMap;
use std::collections::HashSet;
use std::sync::LazyLock;

use ammonia::Builder;

/// Elements that may appear in rendered output.
pub const ALLOWED_TAGS: &[&str] = &[
    // inline
    "a", "br", "code", "del", "em", "strong",
    // block
    "blockquote", "li", "ol", "p", "pre", "ul",
];

/// Attributes permitted per element. Elements not listed here keep no
/// attributes at all.
pub const ALLOWED_ATTRIBUTES: &[(&str, &[&str])] = &[
    ("a", &["href", "target", "rel"]),
    ("code", &["class"]),
];

/// Browsing context every link opens in.
pub const LINK_TARGET: &str = "_blank";

/// Relationship set on every link so the opened page gets no handle on the
/// opener.
pub const LINK_REL: &str = "noopener noreferrer";

/// Elements whose content is dropped along with the element.
const CLEAN_CONTENT_TAGS: &[&str] = &["script", "style"];

/// Prefix pulldown-cmark puts on the class of fenced code blocks.
const LANGUAGE_CLASS_PREFIX: &str = "language-";

static SANITIZER: LazyLock<Builder<'static>> = LazyLock::new(build_sanitizer);

/// Runs `html` through the chat allow-list and returns the cleaned fragment.
///
/// Every surviving `<a>` carries `target="_blank"` and
/// `rel="noopener noreferrer"`, whatever the input said.
pub fn sanitize_html(html: &str) -> String {
    SANITIZER.clean(html).to_string()
}

/// Returns `true` when `tag` may appear in sanitized output.
pub fn is_allowed_tag(tag: &str) -> bool {
    ALLOWED_TAGS.contains(&tag)
}

/// Returns `true` when `attribute` may appear on `tag` in sanitized output.
pub fn is_allowed_attribute(tag: &str, attribute: &str) -> bool {
    ALLOWED_ATTRIBUTES
        .iter()
        .find(|(name, _)| *name == tag)
        .is_some_and(|(_, attributes)| attributes.contains(&attribute))
}

fn build_sanitizer() -> Builder<'static> {
    let tags: HashSet<&'static str> = ALLOWED_TAGS.iter().copied().collect();

    // `target` and `rel` on anchors are written by the sanitizer itself and
    // must never be copied over from the input.
    let tag_attributes: HashMap<&'static str, HashSet<&'static str>> = ALLOWED_ATTRIBUTES
        .iter()
        .map(|(tag, attributes)| {
            let passthrough = attributes
                .iter()
                .copied()
                .filter(|attribute| !is_forced_attribute(tag, attribute))
                .collect();
            (*tag, passthrough)
        })
        .collect();

    let mut builder = Builder::default();
    builder
        .tags(tags)
        .clean_content_tags(CLEAN_CONTENT_TAGS.iter().copied().collect())
        .tag_attributes(tag_attributes)
        .generic_attributes(HashSet::new())
        .attribute_filter(filter_attribute)
        .set_tag_attribute_value("a", "target", LINK_TARGET)
        .link_rel(Some(LINK_REL))
        .strip_comments(true);
    builder
}

fn is_forced_attribute(tag: &str, attribute: &str) -> bool {
    tag == "a" && matches!(attribute, "target" | "rel")
}

/// Narrows the values of attributes that passed the allow-list.
fn filter_attribute<'u>(element: &str, attribute: &str, value: &'u str) -> Option<Cow<'u, str>> {
    match (element, attribute) {
        ("a", "href") => Some(escape_href(value)),
        ("code", "class") => language_class(value).map(Cow::Borrowed),
        _ => Some(Cow::Borrowed(value)),
    }
}

/// Percent-encodes angle brackets so a URL can never carry markup, even
/// through serializers that leave them raw inside attribute values.
fn escape_href(value: &str) -> Cow<'_, str> {
    if !value.contains(['<', '>']) {
        return Cow::Borrowed(value);
    }
    Cow::Owned(value.replace('<', "%3C").replace('>', "%3E"))
}

/// Keeps `class` on `<code>` only when it is a single `language-*` token, the
/// form fenced code blocks produce.
fn language_class(value: &str) -> Option<&str> {
    let value = value.trim();
    let language = value.strip_prefix(LANGUAGE_CLASS_PREFIX)?;
    let valid = !language.is_empty()
        && language
            .chars()
            .all(|c| c.is_ascii_alphanumeric() || matches!(c, '-' | '_' | '+' | '#' | '.'));
    valid.then_some(value)
}
