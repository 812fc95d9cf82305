use regex::Regex;
use std::sync::LazyLock;

static WHITESPACE: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"\s+").expect("valid regex"));
static NON_NUMERIC: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"[^0-9.]").expect("valid regex"));
static RATING_TOKEN: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"[0-9]+\.?[0-9]*").expect("valid regex"));

/// Bidi and zero-width marks that retail pages sprinkle around labels.
const INVISIBLE_MARKS: &[char] = &['\u{200b}', '\u{200e}', '\u{200f}', '\u{202a}', '\u{202c}', '\u{feff}'];

/// Collapse every whitespace run (newlines included) to one space and trim.
pub fn clean_text(raw: &str) -> String {
    WHITESPACE.replace_all(raw, " ").trim().to_string()
}

/// Like [`clean_text`], but also drops invisible direction marks.
pub fn normalize(raw: &str) -> String {
    let visible: String = raw.chars().filter(|c| !INVISIBLE_MARKS.contains(c)).collect();
    clean_text(&visible)
}

/// Parse a price out of free text such as `"₹1,299.00"` or `"$29.99"`.
///
/// Everything except ASCII digits and `.` is thrown away before parsing, so
/// currency symbols, thousands separators and non-Latin digits never matter. A leftover like
/// `"1.299.00"` is not a number and yields `None`.
pub fn extract_price(raw: &str) -> Option<f64> {
    let digits = NON_NUMERIC.replace_all(raw, "");
    if digits.is_empty() {
        return None;
    }
    digits.parse::<f64>().ok()
}

/// First numeric token of `raw`, scaled down by ten when it is above 5.
///
/// `"4.5 out of 5 stars"` gives 4.5 and a bare `"45"` gives 4.5 as well.
pub fn extract_rating(raw: &str) -> Option<f64> {
    let token = RATING_TOKEN.find(raw)?;
    let rating = token.as_str().parse::<f64>().ok()?;
    if rating > 5.0 {
        Some(rating / 10.0)
    } else {
        Some(rating)
    }
}
