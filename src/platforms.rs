//! Platform registry: which shops are known, which are implemented, and the
//! selector tables that drive extraction for the implemented ones.

use crate::details::{collect_details, DetailRegions};
use crate::error::ScrapeError;
use crate::extract::{find_availability, find_description, find_image, find_price, find_rating, find_title};
use crate::locator::Locator;
use crate::types::{PlatformInfo, ProductRecord, NOT_FOUND};
use scraper::Html;
use serde::Serialize;
use std::fmt;
use std::str::FromStr;
use tracing::info;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Platform {
    Amazon,
    Flipkart,
    Myntra,
    Ajio,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Capability {
    Implemented,
    ComingSoon,
}

/// Ordered locators for every product field of one platform.
#[derive(Debug)]
pub struct SelectorTable {
    pub title: &'static [Locator],
    pub price: &'static [Locator],
    pub rating: &'static [Locator],
    pub image: &'static [Locator],
    /// Absolute tree path tried when no image locator yields a source.
    pub image_fallback: Option<&'static str>,
    pub availability: &'static [Locator],
    pub description: &'static [Locator],
    pub details: DetailRegions,
}

const IMAGE_ATTRS: &[&str] = &["src", "data-src"];

static AMAZON: SelectorTable = SelectorTable {
    title: &[
        Locator::text("#productTitle"),
        Locator::text("h1.a-size-large.product-title-word-break"),
        Locator::text("span#productTitle"),
    ],
    price: &[
        Locator::text("span.a-price-whole"),
        Locator::text("span.a-price .a-offscreen"),
        Locator::text("#priceblock_dealprice"),
        Locator::text("#priceblock_saleprice"),
        Locator::text("#priceblock_ourprice"),
        Locator::text("span.a-color-price"),
    ],
    rating: &[
        Locator::text_or_attr("span.a-icon-alt", "aria-label"),
        Locator::text_or_attr("#acrPopover", "aria-label"),
        Locator::text_or_attr("span.a-icon.a-icon-star", "aria-label"),
    ],
    image: &[
        Locator::attrs("#landingImage", IMAGE_ATTRS),
        Locator::attrs("#imgBlkFront", IMAGE_ATTRS),
        Locator::attrs("#main-image", IMAGE_ATTRS),
        Locator::attrs("img#productImage", IMAGE_ATTRS),
    ],
    image_fallback: Some(
        "/html/body/div[1]/div[1]/div/div[5]/div[3]/div[1]/div[1]/div/div/div[2]/div[1]/div[1]/ul/li[1]/span/span/div/img",
    ),
    availability: &[
        Locator::text("#availability span"),
        Locator::text("#availability"),
        Locator::text(".a-color-success"),
    ],
    description: &[
        Locator::text("#feature-bullets ul"),
        Locator::text("#productDescription"),
        Locator::text(".a-unordered-list.a-vertical.a-spacing-mini"),
    ],
    details: DetailRegions {
        tables: &["#productDetails_techSpec_section_1", "#productDetails_detailBullets_sections1"],
        feature_bullets: "#feature-bullets ul li span",
        bullet_blocks: &["#detailBullets_feature_div", "#detailBulletsWrapper_feature_div"],
        bullet_items: &["ul.detail-bullet-list > li", "ul li"],
    },
};

impl Platform {
    /// Registry order, as listed to callers.
    pub const ALL: [Platform; 4] = [Platform::Amazon, Platform::Flipkart, Platform::Myntra, Platform::Ajio];

    pub fn as_str(self) -> &'static str {
        match self {
            Platform::Amazon => "amazon",
            Platform::Flipkart => "flipkart",
            Platform::Myntra => "myntra",
            Platform::Ajio => "ajio",
        }
    }

    pub fn capability(self) -> Capability {
        match self {
            Platform::Amazon => Capability::Implemented,
            Platform::Flipkart | Platform::Myntra | Platform::Ajio => Capability::ComingSoon,
        }
    }

    pub fn is_available(self) -> bool {
        self.capability() == Capability::Implemented
    }

    /// Selector table, present only for implemented platforms.
    pub fn selectors(self) -> Option<&'static SelectorTable> {
        match self {
            Platform::Amazon => Some(&AMAZON),
            Platform::Flipkart | Platform::Myntra | Platform::Ajio => None,
        }
    }
}

impl fmt::Display for Platform {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Platform::Amazon => "Amazon",
            Platform::Flipkart => "Flipkart",
            Platform::Myntra => "Myntra",
            Platform::Ajio => "Ajio",
        };
        f.write_str(name)
    }
}

impl FromStr for Platform {
    type Err = ScrapeError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let wanted = s.trim().to_ascii_lowercase();
        Platform::ALL
            .into_iter()
            .find(|p| p.as_str() == wanted)
            .ok_or(ScrapeError::UnsupportedPlatform(wanted))
    }
}

/// Comma-separated keys of every known platform.
pub fn supported_platforms() -> String {
    Platform::ALL.map(Platform::as_str).join(", ")
}

pub fn list_platforms() -> Vec<PlatformInfo> {
    Platform::ALL
        .into_iter()
        .map(|p| PlatformInfo {
            name: p,
            status: p.capability(),
            available: p.is_available(),
        })
        .collect()
}

fn or_not_found(value: Option<String>) -> String {
    value.unwrap_or_else(|| NOT_FOUND.to_string())
}

/// Build a [`ProductRecord`] from a fetched page.
///
/// Fields that cannot be found fall back to their sentinels; only an
/// unimplemented platform is an error here.
pub fn extract_product(platform: Platform, html: &str, source_url: &str) -> Result<ProductRecord, ScrapeError> {
    let table = platform.selectors().ok_or(ScrapeError::NotImplemented(platform))?;
    let doc = Html::parse_document(html);

    let price = find_price(&doc, table.price);
    let rating = find_rating(&doc, table.rating);
    let record = ProductRecord {
        title: or_not_found(find_title(&doc, table.title)),
        price: price.value,
        price_text: or_not_found(price.text),
        rating: rating.value,
        rating_text: or_not_found(rating.text),
        image: find_image(&doc, table.image, table.image_fallback),
        availability: or_not_found(find_availability(&doc, table.availability)),
        description: or_not_found(find_description(&doc, table.description)),
        details: collect_details(&doc, &table.details),
        source_url: source_url.to_string(),
    };

    info!(
        "Extracted {} product '{}' (price: {:?}, {} details)",
        platform,
        record.title,
        record.price,
        record.details.len()
    );
    Ok(record)
}
