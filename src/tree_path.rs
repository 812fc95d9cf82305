//! Absolute element paths such as `/html/body/div[2]/img`.
//!
//! Used as a structural last resort when no CSS locator finds a value. A step
//! without an index matches every child with that tag; `tag[n]` keeps only the
//! n-th such child (1-based).

use scraper::{ElementRef, Html};
use std::str::FromStr;
use thiserror::Error;

#[derive(Debug, Error, PartialEq, Eq)]
pub enum TreePathError {
    #[error("tree path must be absolute (start with '/'): {0}")]
    NotAbsolute(String),
    #[error("invalid tree path step '{0}'")]
    InvalidStep(String),
}

#[derive(Debug, Clone, PartialEq, Eq)]
struct Step {
    tag: String,
    position: Option<usize>,
}

impl Step {
    fn parse(raw: &str) -> Result<Self, TreePathError> {
        let invalid = || TreePathError::InvalidStep(raw.to_string());
        let (tag, position) = match raw.split_once('[') {
            Some((tag, rest)) => {
                let index = rest.strip_suffix(']').ok_or_else(invalid)?;
                let position = index.parse::<usize>().map_err(|_| invalid())?;
                if position == 0 {
                    return Err(invalid());
                }
                (tag, Some(position))
            }
            None => (raw, None),
        };
        if tag.is_empty() || !tag.chars().all(|c| c.is_ascii_alphanumeric() || c == '-') {
            return Err(invalid());
        }
        Ok(Self { tag: tag.to_ascii_lowercase(), position })
    }

    /// Children of `parent` selected by this step.
    fn children<'a>(&self, parent: ElementRef<'a>) -> Vec<ElementRef<'a>> {
        parent
            .children()
            .filter_map(ElementRef::wrap)
            .filter(|el| el.value().name() == self.tag)
            .enumerate()
            .filter(|(i, _)| self.position.map_or(true, |p| p == i + 1))
            .map(|(_, el)| el)
            .collect()
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TreePath {
    steps: Vec<Step>,
}

impl FromStr for TreePath {
    type Err = TreePathError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let rest = s
            .trim()
            .strip_prefix('/')
            .ok_or_else(|| TreePathError::NotAbsolute(s.to_string()))?;
        let steps = rest
            .split('/')
            .map(Step::parse)
            .collect::<Result<Vec<_>, _>>()?;
        Ok(Self { steps })
    }
}

impl TreePath {
    /// All elements reached by the path, in document order.
    pub fn select<'a>(&self, doc: &'a Html) -> Vec<ElementRef<'a>> {
        let Some((first, rest)) = self.steps.split_first() else {
            return Vec::new();
        };
        let root = doc.root_element();
        if root.value().name() != first.tag || first.position.map_or(false, |p| p != 1) {
            return Vec::new();
        }

        let mut current = vec![root];
        for step in rest {
            current = current.into_iter().flat_map(|el| step.children(el)).collect();
            if current.is_empty() {
                break;
            }
        }
        current
    }

    pub fn select_first<'a>(&self, doc: &'a Html) -> Option<ElementRef<'a>> {
        self.select(doc).into_iter().next()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const HTML: &str = r#"<html><body>
        <div id="a"><p>one</p></div>
        <div id="b"><p>two</p><p>three</p><span><img src="/x.png"></span></div>
    </body></html>"#;

    #[test]
    fn test_parse_errors() {
        assert_eq!(
            "html/body".parse::<TreePath>(),
            Err(TreePathError::NotAbsolute("html/body".into()))
        );
        assert_eq!(
            "/html/div[0]".parse::<TreePath>(),
            Err(TreePathError::InvalidStep("div[0]".into()))
        );
        assert_eq!(
            "/html/div[x".parse::<TreePath>(),
            Err(TreePathError::InvalidStep("div[x".into()))
        );
        assert!("/html//div".parse::<TreePath>().is_err());
    }

    #[test]
    fn test_select_positional_and_wildcard() {
        let doc = Html::parse_document(HTML);

        let second: TreePath = "/html/body/div[2]/p[2]".parse().unwrap();
        let found = second.select(&doc);
        assert_eq!(found.len(), 1);
        assert_eq!(found[0].text().collect::<String>(), "three");

        let every: TreePath = "/html/body/div/p".parse().unwrap();
        let texts: Vec<String> = every.select(&doc).iter().map(|e| e.text().collect()).collect();
        assert_eq!(texts, vec!["one", "two", "three"]);

        let img: TreePath = "/html/body/div[2]/span/img".parse().unwrap();
        assert_eq!(img.select_first(&doc).and_then(|e| e.value().attr("src")), Some("/x.png"));
    }

    #[test]
    fn test_select_misses() {
        let doc = Html::parse_document(HTML);
        let missing: TreePath = "/html/body/div[3]/p".parse().unwrap();
        assert!(missing.select(&doc).is_empty());
        let wrong_root: TreePath = "/body/div".parse().unwrap();
        assert!(wrong_root.select(&doc).is_empty());
    }

    #[test]
    fn test_matches_outlive_path() {
        let doc = Html::parse_document(HTML);
        let paragraphs = {
            let path: TreePath = "/html/body/div[2]/p".parse().unwrap();
            path.select(&doc)
        };
        let texts: Vec<String> = paragraphs.iter().map(|p| p.text().collect()).collect();
        assert_eq!(texts, ["two", "three"]);
    }
}
