//! Locators and the ordered "first success wins" evaluation shared by every field.

use crate::text::clean_text;
use scraper::{ElementRef, Html, Selector};
use tracing::{debug, warn};

/// What to read from a located element.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Read {
    /// Whitespace-collapsed text content.
    Text,
    /// First non-empty attribute among the listed names.
    Attrs(&'static [&'static str]),
    /// Text content, or the named attribute when the text is empty.
    TextOrAttr(&'static str),
}

/// A place in the document where a field value may live.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Locator {
    pub selector: &'static str,
    pub read: Read,
}

impl Locator {
    pub const fn text(selector: &'static str) -> Self {
        Self { selector, read: Read::Text }
    }

    pub const fn attrs(selector: &'static str, names: &'static [&'static str]) -> Self {
        Self { selector, read: Read::Attrs(names) }
    }

    pub const fn text_or_attr(selector: &'static str, name: &'static str) -> Self {
        Self { selector, read: Read::TextOrAttr(name) }
    }

    /// First element matching the selector.
    pub fn find<'a>(&self, doc: &'a Html) -> Option<ElementRef<'a>> {
        select_first(doc, self.selector)
    }

    /// Value of `el` according to [`Read`]; `None` when it is empty.
    pub fn read(&self, el: ElementRef<'_>) -> Option<String> {
        let value = match self.read {
            Read::Text => clean_text(&el.text().collect::<String>()),
            Read::Attrs(names) => names
                .iter()
                .filter_map(|name| el.value().attr(name))
                .map(str::trim)
                .find(|v| !v.is_empty())
                .unwrap_or_default()
                .to_string(),
            Read::TextOrAttr(name) => {
                let text = clean_text(&el.text().collect::<String>());
                if text.is_empty() {
                    el.value().attr(name).map(clean_text).unwrap_or_default()
                } else {
                    text
                }
            }
        };
        (!value.is_empty()).then_some(value)
    }
}

/// Walk `locators` in order and return the first value `attempt` accepts.
///
/// Only the first element matching each locator is offered to `attempt`.
/// Locators whose selector matches nothing are skipped.
pub fn first_success<'a, T>(
    doc: &'a Html,
    locators: &[Locator],
    mut attempt: impl FnMut(&Locator, ElementRef<'a>) -> Option<T>,
) -> Option<T> {
    for locator in locators {
        let Some(el) = locator.find(doc) else { continue };
        if let Some(value) = attempt(locator, el) {
            debug!("Locator '{}' matched", locator.selector);
            return Some(value);
        }
    }
    None
}

pub(crate) fn parse_selector(css: &str) -> Option<Selector> {
    match Selector::parse(css) {
        Ok(selector) => Some(selector),
        Err(e) => {
            warn!("Invalid CSS selector '{}': {:?}", css, e);
            None
        }
    }
}

pub fn select_first<'a>(doc: &'a Html, css: &str) -> Option<ElementRef<'a>> {
    let selector = parse_selector(css)?;
    doc.select(&selector).next()
}

pub fn select_all<'a>(doc: &'a Html, css: &str) -> Vec<ElementRef<'a>> {
    match parse_selector(css) {
        Some(selector) => doc.select(&selector).collect(),
        None => Vec::new(),
    }
}

/// Descendants of `el` matching `css`, in document order.
pub fn select_within<'a>(el: ElementRef<'a>, css: &str) -> Vec<ElementRef<'a>> {
    match parse_selector(css) {
        Some(selector) => el.select(&selector).collect(),
        None => Vec::new(),
    }
}

/// Text nodes of `el`, each trimmed, empties dropped, joined with `separator`.
pub fn node_text(el: ElementRef<'_>, separator: &str) -> String {
    el.text()
        .map(str::trim)
        .filter(|t| !t.is_empty())
        .collect::<Vec<_>>()
        .join(separator)
}

/// Next sibling element of `el` with the given tag name.
pub fn next_sibling_named<'a>(el: ElementRef<'a>, tag: &str) -> Option<ElementRef<'a>> {
    el.next_siblings()
        .filter_map(ElementRef::wrap)
        .find(|sib| sib.value().name() == tag)
}

#[cfg(test)]
mod tests {
    use super::*;

    const HTML: &str = r#"
        <html><body>
            <h1 class="empty">   </h1>
            <h1 class="name">Acme <b>Widget</b></h1>
            <img id="lazy" src="" data-src="/img/lazy.jpg">
            <i id="stars" aria-label="4.2 out of 5 stars"></i>
            <div id="pair"><b>Brand</b> text <span>Acme</span></div>
        </body></html>
    "#;

    #[test]
    fn test_first_success_in_order() {
        let doc = Html::parse_document(HTML);
        let locators = [
            Locator::text("#missing"),
            Locator::text("h1.empty"),
            Locator::text("h1.name"),
            Locator::text("h1"),
        ];

        let mut tried = Vec::new();
        let found = first_success(&doc, &locators, |loc, el| {
            tried.push(loc.selector);
            loc.read(el)
        });

        assert_eq!(found.as_deref(), Some("Acme Widget"));
        assert_eq!(tried, vec!["h1.empty", "h1.name"]);
    }

    #[test]
    fn test_invalid_selector_is_skipped() {
        let doc = Html::parse_document(HTML);
        let locators = [Locator::text("h1[["), Locator::text("h1.name")];
        let found = first_success(&doc, &locators, |loc, el| loc.read(el));
        assert_eq!(found.as_deref(), Some("Acme Widget"));
    }

    #[test]
    fn test_read_modes() {
        let doc = Html::parse_document(HTML);

        let img = Locator::attrs("#lazy", &["src", "data-src"]);
        assert_eq!(img.find(&doc).and_then(|el| img.read(el)).as_deref(), Some("/img/lazy.jpg"));

        let stars = Locator::text_or_attr("#stars", "aria-label");
        assert_eq!(
            stars.find(&doc).and_then(|el| stars.read(el)).as_deref(),
            Some("4.2 out of 5 stars")
        );
    }

    #[test]
    fn test_node_text_and_siblings() {
        let doc = Html::parse_document(HTML);
        let pair = select_first(&doc, "#pair").unwrap();
        assert_eq!(node_text(pair, " "), "Brand text Acme");
        assert_eq!(node_text(pair, ""), "BrandtextAcme");

        let bold = select_first(&doc, "#pair b").unwrap();
        let value = next_sibling_named(bold, "span").unwrap();
        assert_eq!(node_text(value, " "), "Acme");
        assert!(next_sibling_named(value, "span").is_none());
    }
}
