//! Attribute-table extraction: technical-detail tables and detail bullet lists merged into
//! one [`ProductDetails`] map.

use crate::locator::{next_sibling_named, node_text, select_all, select_first, select_within};
use crate::text::normalize;
use crate::types::{DetailValue, ProductDetails, KEY_FEATURES};
use regex::{Regex, RegexBuilder};
use scraper::{ElementRef, Html};
use tracing::debug;

/// Where a platform keeps its attribute tables and bullet lists.
#[derive(Debug, Clone, Copy)]
pub struct DetailRegions {
    /// `<tr><th>key</th><td>value</td></tr>` tables, processed in order.
    pub tables: &'static [&'static str],
    /// Plain bullets whose text goes straight into "Key Features".
    pub feature_bullets: &'static str,
    /// Containers of key/value bullets; the first one present is used.
    pub bullet_blocks: &'static [&'static str],
    /// Item selectors inside the bullet block; the first that matches anything is used.
    pub bullet_items: &'static [&'static str],
}

/// Normalize a raw (label, value) pair scraped from a table row or bullet.
///
/// Either side may come back empty, meaning the pair carries nothing usable.
/// Only exact occurrences of the label are stripped from the value, so a
/// value that merely starts with the same letters is left intact.
pub fn clean_pair(raw_key: &str, raw_value: &str) -> (String, String) {
    let mut key = normalize(raw_key);
    let mut value = normalize(raw_value);

    if value.is_empty() {
        if let Some((k, v)) = key.split_once(':') {
            let (k, v) = (k.trim().to_string(), v.trim().to_string());
            key = k;
            value = v;
        }
    }

    if let Some(stripped) = key.strip_suffix(':') {
        key = stripped.trim_end().to_string();
    }

    if !key.is_empty() {
        value = strip_label_echo(&key, &value);
    }

    if value.to_lowercase() == key.to_lowercase() {
        value.clear();
    }

    (key.trim().to_string(), value.trim().to_string())
}

/// Remove repeated `"<key>:"` / `"<key>"` prefixes and a `": <key>"` suffix.
fn strip_label_echo(key: &str, value: &str) -> String {
    let escaped = regex::escape(key);
    let (Some(leading), Some(trailing)) = (
        case_insensitive(&format!(r"^{escaped}(?:\s*:\s*|\s+|$)")),
        case_insensitive(&format!(r"\s*:\s*{escaped}\s*:?$")),
    ) else {
        return value.to_string();
    };

    let mut value = trailing.replace(value, "").trim().to_string();
    loop {
        let next = leading.replace(&value, "").trim().to_string();
        if next == value {
            return value;
        }
        value = next;
    }
}

fn case_insensitive(pattern: &str) -> Option<Regex> {
    RegexBuilder::new(pattern).case_insensitive(true).build().ok()
}

fn insert_pair(details: &mut ProductDetails, raw_key: &str, raw_value: &str) -> bool {
    let (key, value) = clean_pair(raw_key, raw_value);
    if key.is_empty() || value.is_empty() {
        return false;
    }
    details.insert(key, DetailValue::Text(value));
    true
}

fn collect_table(table: ElementRef<'_>, details: &mut ProductDetails) {
    for row in select_within(table, "tr") {
        let header = select_within(row, "th").into_iter().next();
        let cell = select_within(row, "td").into_iter().next();
        if let (Some(header), Some(cell)) = (header, cell) {
            insert_pair(details, &node_text(header, ""), &node_text(cell, ""));
        }
    }
}

/// Spans of `item` that contain no nested span.
fn leaf_spans<'a>(item: ElementRef<'a>) -> Vec<ElementRef<'a>> {
    select_within(item, "span")
        .into_iter()
        .filter(|span| {
            !span
                .descendants()
                .skip(1)
                .filter_map(ElementRef::wrap)
                .any(|el| el.value().name() == "span")
        })
        .collect()
}

/// Try the key/value patterns of one bullet in turn; `false` when none applied.
fn collect_bullet(item: ElementRef<'_>, details: &mut ProductDetails) -> bool {
    let spans = leaf_spans(item);
    if spans.len() >= 2 && insert_pair(details, &node_text(spans[0], " "), &node_text(spans[1], " ")) {
        return true;
    }

    if let Some(label) = select_within(item, "span.a-text-bold").into_iter().next() {
        let value = next_sibling_named(label, "span")
            .map(|v| node_text(v, " "))
            .unwrap_or_default();
        if insert_pair(details, &node_text(label, " "), &value) {
            return true;
        }
    }

    let text = node_text(item, " ");
    if let Some((key, value)) = text.split_once(':') {
        let key = key.trim_end_matches(['\u{200e}', '\u{200f}']).trim();
        if !key.is_empty() && insert_pair(details, key, value) {
            return true;
        }
    }
    false
}

/// Merge every detail region of `doc` into one map.
///
/// Regions are processed tables first, then bullets, and a later region
/// overwrites an earlier value for the same key. Bullets that match no
/// key/value pattern end up in the "Key Features" list.
pub fn collect_details(doc: &Html, regions: &DetailRegions) -> ProductDetails {
    let mut details = ProductDetails::new();

    for css in regions.tables {
        if let Some(table) = select_first(doc, css) {
            collect_table(table, &mut details);
        }
    }

    let mut features: Vec<String> = select_all(doc, regions.feature_bullets)
        .into_iter()
        .map(|span| normalize(&node_text(span, " ")))
        .filter(|t| !t.is_empty())
        .collect();

    let block = regions.bullet_blocks.iter().find_map(|css| select_first(doc, css));
    if let Some(block) = block {
        let items = regions
            .bullet_items
            .iter()
            .map(|css| select_within(block, css))
            .find(|items| !items.is_empty())
            .unwrap_or_default();
        for item in items {
            if collect_bullet(item, &mut details) {
                continue;
            }
            let text = normalize(&node_text(item, " "));
            if !text.is_empty() {
                features.push(text);
            }
        }
    }

    if !features.is_empty() {
        details.insert(KEY_FEATURES, DetailValue::List(features));
    }
    debug!("Collected {} detail entries", details.len());
    details
}
