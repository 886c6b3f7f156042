//! Thin DOM query helpers over `scraper`
//!
//! The extractor is written against this query-all/text/attribute capability
//! set rather than raw `scraper` calls.

use crate::page::PageError;
use scraper::{ElementRef, Selector};

/// Parses a CSS selector, mapping a parse failure to a reportable error.
pub fn selector(css: &str) -> Result<Selector, PageError> {
    Selector::parse(css).map_err(|_| PageError::Selector(css.to_string()))
}

/// First element matching `selector` within `scope`, if any.
pub fn select_first<'a>(scope: ElementRef<'a>, selector: &Selector) -> Option<ElementRef<'a>> {
    scope.select(selector).next()
}

/// All elements matching `selector` within `scope`.
pub fn select_all<'a>(scope: ElementRef<'a>, selector: &Selector) -> Vec<ElementRef<'a>> {
    scope.select(selector).collect()
}

/// The concatenated, trimmed text content of an element.
pub fn text(element: ElementRef<'_>) -> String {
    element.text().collect::<String>().trim().to_string()
}

/// An attribute value of an element, if present.
pub fn attribute(element: ElementRef<'_>, name: &str) -> Option<String> {
    element.value().attr(name).map(str::to_string)
}

#[cfg(test)]
mod tests {
    use super::*;
    use scraper::Html;

    #[test]
    fn test_selector_parse_failure() {
        assert!(selector("div.ok").is_ok());
        assert!(selector(":::").is_err());
    }

    #[test]
    fn test_select_and_text() {
        let html = Html::parse_document(
            r#"<div class="all"><div class="a_ico"><a href="/x"> Dexon </a></div>
               <div class="a_ico"><a href="/y">Quark</a></div></div>"#,
        );
        let root = html.root_element();
        let card_selector = selector("div.a_ico").unwrap();
        let anchor_selector = selector("a").unwrap();

        let cards = select_all(root, &card_selector);
        assert_eq!(cards.len(), 2);

        let first_link = select_first(cards[0], &anchor_selector).unwrap();
        assert_eq!(text(first_link), "Dexon");
        assert_eq!(attribute(first_link, "href"), Some("/x".to_string()));
        assert_eq!(attribute(first_link, "download"), None);
    }

    #[test]
    fn test_select_first_missing() {
        let html = Html::parse_document("<div></div>");
        let sel = selector("span.absent").unwrap();
        assert!(select_first(html.root_element(), &sel).is_none());
    }
}
