//! Per-field extractors. Each one walks its locators in priority order and
//! stops at the first usable value.

use crate::locator::{first_success, select_within, Locator};
use crate::text::{clean_text, extract_price, extract_rating};
use crate::tree_path::TreePath;
use scraper::Html;
use tracing::{debug, warn};

/// Availability reported when no availability locator matches at all.
pub const DEFAULT_AVAILABILITY: &str = "In Stock";

/// Number of bullet or paragraph items joined into a description.
const DESCRIPTION_ITEMS: usize = 3;

/// A numeric field and the raw text it was read from.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct NumericField {
    pub value: Option<f64>,
    /// Last text that was tried, even if it did not parse.
    pub text: Option<String>,
}

pub fn find_title(doc: &Html, locators: &[Locator]) -> Option<String> {
    first_success(doc, locators, |loc, el| loc.read(el))
}

pub fn find_price(doc: &Html, locators: &[Locator]) -> NumericField {
    find_numeric(doc, locators, extract_price)
}

pub fn find_rating(doc: &Html, locators: &[Locator]) -> NumericField {
    find_numeric(doc, locators, extract_rating)
}

fn find_numeric(doc: &Html, locators: &[Locator], parse: fn(&str) -> Option<f64>) -> NumericField {
    let mut last_text = None;
    let value = first_success(doc, locators, |loc, el| {
        let text = loc.read(el)?;
        let value = parse(&text);
        last_text = Some(text);
        value
    });
    NumericField { value, text: last_text }
}

/// Image URL from the locators, then from `fallback`; empty when neither finds one.
pub fn find_image(doc: &Html, locators: &[Locator], fallback: Option<&str>) -> String {
    if let Some(src) = first_success(doc, locators, |loc, el| loc.read(el)) {
        return src;
    }

    let Some(raw_path) = fallback else {
        return String::new();
    };
    let path = match raw_path.parse::<TreePath>() {
        Ok(path) => path,
        Err(e) => {
            warn!("Skipping image fallback: {}", e);
            return String::new();
        }
    };
    match path.select_first(doc).and_then(|img| img.value().attr("src")) {
        Some(src) => {
            debug!("Image found through tree path fallback");
            src.trim().to_string()
        }
        None => String::new(),
    }
}

/// Availability text, or [`DEFAULT_AVAILABILITY`] when no locator matched an element.
///
/// Returns `None` when elements matched but none of them had any text.
pub fn find_availability(doc: &Html, locators: &[Locator]) -> Option<String> {
    let mut matched = false;
    let found = first_success(doc, locators, |loc, el| {
        matched = true;
        loc.read(el)
    });
    match found {
        Some(text) => Some(text),
        None if !matched => Some(DEFAULT_AVAILABILITY.to_string()),
        None => None,
    }
}

/// First few `li`/`p` items of the first container that has any, joined with `" | "`.
pub fn find_description(doc: &Html, locators: &[Locator]) -> Option<String> {
    first_success(doc, locators, |_, container| {
        let items: Vec<String> = select_within(container, "li, p")
            .into_iter()
            .map(|item| clean_text(&item.text().collect::<String>()))
            .filter(|t| !t.is_empty())
            .take(DESCRIPTION_ITEMS)
            .collect();
        (!items.is_empty()).then(|| items.join(" | "))
    })
}
