//! Markdown rendering and HTML sanitization.
//!
//! The canonical model stores lightweight markup together with its sanitized
//! HTML rendering. Rendering, sanitizing and converting back are delegated to
//! a [`MarkupRenderer`]; [`CommonMarkRenderer`] is the default.

use std::borrow::Cow;
use std::collections::{HashMap, HashSet};
use std::sync::OnceLock;

use ammonia::{Builder, UrlRelative};
use pulldown_cmark::{html, Options, Parser};
use regex::Regex;

use crate::dictionary::validate::file_location;

/// Which element whitelist applies to a markup field.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Whitelist {
    /// `description` and `@summary`.
    Rich,
    /// `image-source`, `audio-source` and `video-source`.
    Source,
}

/// Sanitized HTML and a note for every kind of content removed.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct Sanitized {
    pub html: String,
    pub removed: Vec<String>,
}

impl Sanitized {
    pub fn is_clean(&self) -> bool {
        self.removed.is_empty()
    }
}

/// Markdown/HTML collaborator contract.
pub trait MarkupRenderer {
    /// Renders lightweight markup to HTML.
    fn to_html(&self, markup: &str) -> String;

    /// Filters `html` through `whitelist`. `bundled` lists the file names
    /// `img` elements may reference besides absolute URIs.
    fn sanitize(&self, html: &str, whitelist: Whitelist, bundled: &[String]) -> Sanitized;

    /// Converts (sanitized) HTML back to lightweight markup.
    fn to_markup(&self, html: &str) -> String;
}

/// CommonMark renderer backed by `pulldown-cmark` and `ammonia`.
#[derive(Debug, Default, Clone, Copy)]
pub struct CommonMarkRenderer;

const RICH_TAGS: &[&str] = &[
    "p", "br", "em", "strong", "a", "img", "ul", "ol", "li", "blockquote", "code", "pre", "ruby",
    "rb", "rt", "rp", "h1", "h2", "h3", "h4", "h5", "h6", "hr", "del",
];
const SOURCE_TAGS: &[&str] = &["p", "br", "a", "em", "strong"];

static TAG: OnceLock<Regex> = OnceLock::new();
static ATTRIBUTE: OnceLock<Regex> = OnceLock::new();
static BLOCK_END: OnceLock<Regex> = OnceLock::new();
static LINE_BREAK: OnceLock<Regex> = OnceLock::new();
static LIST_ITEM: OnceLock<Regex> = OnceLock::new();
static ANY_TAG: OnceLock<Regex> = OnceLock::new();
static NUMERIC_ENTITY: OnceLock<Regex> = OnceLock::new();

fn tag_regex() -> &'static Regex {
    TAG.get_or_init(|| Regex::new(r"<([a-zA-Z][a-zA-Z0-9]*)").expect("Invalid tag pattern"))
}

fn attribute_regex() -> &'static Regex {
    ATTRIBUTE.get_or_init(|| Regex::new(r"<[a-zA-Z][^>]*>").expect("Invalid element pattern"))
}

fn count_tags(html: &str) -> HashMap<String, usize> {
    let mut counts = HashMap::new();
    for cap in tag_regex().captures_iter(html) {
        *counts.entry(cap[1].to_ascii_lowercase()).or_insert(0) += 1;
    }
    counts
}

fn count_attributes(html: &str) -> usize {
    attribute_regex()
        .find_iter(html)
        .map(|m| m.as_str().matches("=\"").count())
        .sum()
}

fn is_allowed_src(value: &str, bundled: &[String]) -> bool {
    bundled.iter().any(|name| name == value)
        || url::Url::parse(value)
            .map(|u| file_location::ALLOWED_SCHEMES.contains(&u.scheme()))
            .unwrap_or(false)
}

impl CommonMarkRenderer {
    fn builder(whitelist: Whitelist, bundled: &[String]) -> Builder<'static> {
        let mut builder = Builder::empty();
        let mut attributes: HashMap<&'static str, HashSet<&'static str>> = HashMap::new();
        attributes.insert("a", ["href", "title"].into_iter().collect());

        match whitelist {
            Whitelist::Rich => {
                builder.tags(RICH_TAGS.iter().copied().collect());
                attributes.insert("img", ["src", "alt", "title"].into_iter().collect());
                attributes.insert("code", ["class"].into_iter().collect());
            }
            Whitelist::Source => {
                builder.tags(SOURCE_TAGS.iter().copied().collect());
            }
        }

        let bundled = bundled.to_vec();
        builder
            .tag_attributes(attributes)
            .url_schemes(["https", "http", "tag", "urn", "mailto"].into_iter().collect())
            .url_relative(UrlRelative::PassThrough)
            .link_rel(None)
            .clean_content_tags(["script", "style"].into_iter().collect())
            .attribute_filter(move |element, attribute, value| {
                if element == "img" && attribute == "src" && !is_allowed_src(value, &bundled) {
                    return None;
                }
                Some(Cow::Borrowed(value))
            });
        builder
    }
}

impl MarkupRenderer for CommonMarkRenderer {
    fn to_html(&self, markup: &str) -> String {
        let parser = Parser::new_ext(markup, Options::ENABLE_STRIKETHROUGH);
        let mut out = String::new();
        html::push_html(&mut out, parser);
        out
    }

    fn sanitize(&self, html: &str, whitelist: Whitelist, bundled: &[String]) -> Sanitized {
        let cleaned = Self::builder(whitelist, bundled).clean(html).to_string();

        let before = count_tags(html);
        let after = count_tags(&cleaned);
        let mut removed: Vec<String> = before
            .iter()
            .filter_map(|(tag, count)| {
                let kept = after.get(tag).copied().unwrap_or(0);
                (kept < *count).then(|| format!("removed {} <{}> element(s)", count - kept, tag))
            })
            .collect();
        removed.sort();

        let attributes_before = count_attributes(html);
        let attributes_after = count_attributes(&cleaned);
        if attributes_after < attributes_before && removed.is_empty() {
            removed.push(format!(
                "removed {} attribute(s)",
                attributes_before - attributes_after
            ));
        }

        Sanitized {
            html: cleaned,
            removed,
        }
    }

    fn to_markup(&self, html: &str) -> String {
        let block_end = BLOCK_END.get_or_init(|| {
            Regex::new(r"(?i)</(?:p|h[1-6]|blockquote|pre|ul|ol)>").expect("Invalid block pattern")
        });
        let line_break = LINE_BREAK
            .get_or_init(|| Regex::new(r"(?i)<br\s*/?>|</li>").expect("Invalid break pattern"));
        let list_item =
            LIST_ITEM.get_or_init(|| Regex::new(r"(?i)<li[^>]*>").expect("Invalid list pattern"));
        let any_tag = ANY_TAG.get_or_init(|| Regex::new(r"<[^>]*>").expect("Invalid tag pattern"));

        let text = block_end.replace_all(html, "\n\n");
        let text = line_break.replace_all(&text, "\n");
        let text = list_item.replace_all(&text, "- ");
        let text = any_tag.replace_all(&text, "");
        let text = unescape_entities(&text);

        let mut lines: Vec<&str> = text.lines().map(str::trim_end).collect();
        lines.dedup_by(|a, b| a.is_empty() && b.is_empty());
        lines.join("\n").trim().to_string()
    }
}

/// Unescapes the named entities HTML serializers emit plus numeric references.
pub fn unescape_entities(text: &str) -> String {
    let numeric = NUMERIC_ENTITY.get_or_init(|| {
        Regex::new(r"&#(?:x([0-9a-fA-F]+)|([0-9]+));").expect("Invalid entity pattern")
    });
    let text = numeric.replace_all(text, |cap: &regex::Captures| {
        let code = match (cap.get(1), cap.get(2)) {
            (Some(hex), _) => u32::from_str_radix(hex.as_str(), 16).ok(),
            (_, Some(dec)) => dec.as_str().parse().ok(),
            _ => None,
        };
        code.and_then(char::from_u32)
            .map(String::from)
            .unwrap_or_default()
    });
    text.replace("&lt;", "<")
        .replace("&gt;", ">")
        .replace("&quot;", "\"")
        .replace("&#39;", "'")
        .replace("&nbsp;", " ")
        .replace("&amp;", "&")
}
