use crate::platforms::{Capability, Platform};
use serde::ser::SerializeMap;
use serde::{Deserialize, Serialize, Serializer};

/// Key under which freeform feature bullets are collected.
pub const KEY_FEATURES: &str = "Key Features";

/// Sentinel for text fields that could not be found on the page.
pub const NOT_FOUND: &str = "N/A";

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum DetailValue {
    Text(String),
    List(Vec<String>),
}

impl DetailValue {
    pub fn as_text(&self) -> Option<&str> {
        match self {
            DetailValue::Text(s) => Some(s),
            DetailValue::List(_) => None,
        }
    }

    pub fn as_list(&self) -> Option<&[String]> {
        match self {
            DetailValue::List(items) => Some(items),
            DetailValue::Text(_) => None,
        }
    }
}

/// Attribute table scraped from a product page.
///
/// Keeps insertion order. Re-inserting a key replaces its value in place,
/// so the last writer wins while the key keeps its first position.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ProductDetails {
    entries: Vec<(String, DetailValue)>,
}

impl ProductDetails {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&mut self, key: impl Into<String>, value: DetailValue) {
        let key = key.into();
        match self.entries.iter_mut().find(|(k, _)| *k == key) {
            Some(entry) => entry.1 = value,
            None => self.entries.push((key, value)),
        }
    }

    pub fn get(&self, key: &str) -> Option<&DetailValue> {
        self.entries.iter().find(|(k, _)| k == key).map(|(_, v)| v)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &DetailValue)> {
        self.entries.iter().map(|(k, v)| (k.as_str(), v))
    }
}

impl Serialize for ProductDetails {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(self.entries.len()))?;
        for (key, value) in &self.entries {
            map.serialize_entry(key, value)?;
        }
        map.end()
    }
}

/// Structured result of one product page scrape.
#[derive(Debug, Clone, Serialize)]
pub struct ProductRecord {
    pub title: String,
    pub price: Option<f64>,
    pub price_text: String,
    /// 0-5 scale.
    pub rating: Option<f64>,
    pub rating_text: String,
    /// Empty when no image was found.
    pub image: String,
    pub availability: String,
    pub description: String,
    pub details: ProductDetails,
    #[serde(rename = "url")]
    pub source_url: String,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct ScrapeParams {
    pub platform: String,
    pub url: String,
}

#[derive(Debug, Serialize)]
pub struct ScrapeResponse {
    pub success: bool,
    pub platform: Platform,
    pub data: ProductRecord,
}

#[derive(Debug, Clone, Serialize)]
pub struct PlatformInfo {
    pub name: Platform,
    pub status: Capability,
    pub available: bool,
}

#[derive(Debug, Serialize)]
pub struct PlatformsResponse {
    pub platforms: Vec<PlatformInfo>,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct ErrorResponse {
    pub error: String,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_details_last_writer_keeps_position() {
        let mut details = ProductDetails::new();
        details.insert("Brand", DetailValue::Text("Acme".into()));
        details.insert("Colour", DetailValue::Text("Red".into()));
        details.insert("Brand", DetailValue::Text("Acme Corp".into()));

        assert_eq!(details.len(), 2);
        let keys: Vec<&str> = details.iter().map(|(k, _)| k).collect();
        assert_eq!(keys, vec!["Brand", "Colour"]);
        assert_eq!(details.get("Brand").and_then(DetailValue::as_text), Some("Acme Corp"));
    }

    #[test]
    fn test_details_serialize_as_object() {
        let mut details = ProductDetails::new();
        details.insert("Weight", DetailValue::Text("1 kg".into()));
        details.insert(KEY_FEATURES, DetailValue::List(vec!["Durable".into(), "Light".into()]));

        let json = serde_json::to_string(&details).unwrap();
        assert_eq!(json, r#"{"Weight":"1 kg","Key Features":["Durable","Light"]}"#);
    }
}
