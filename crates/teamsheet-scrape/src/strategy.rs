//! Layered extraction strategies
//!
//! Source markup is untrusted and unversioned, so nothing here assumes a
//! single stable page shape. An extractor locates an anchor element and
//! then runs an ordered list of [`ExtractStrategy`] functions against it,
//! taking the first result that passes the caller's plausibility check.
//! All strategies missing means that one anchor yields nothing; the rest
//! of the document is unaffected.

use scraper::ElementRef;
use tracing::debug;

/// One way of pulling text out of the document near an anchor element.
pub struct ExtractStrategy {
    /// Strategy name, for logging
    pub name: &'static str,
    /// Pure try-extract function; `None` means "this shape is absent"
    pub run: fn(&ElementRef) -> Option<String>,
}

/// Run `strategies` in order against `anchor`; return the first trimmed,
/// non-empty result accepted by `plausible`.
pub fn first_plausible(
    anchor: &ElementRef,
    strategies: &[ExtractStrategy],
    plausible: &dyn Fn(&str) -> bool,
) -> Option<String> {
    for strategy in strategies {
        match (strategy.run)(anchor) {
            Some(text) => {
                let text = text.trim().to_string();
                if !text.is_empty() && plausible(&text) {
                    return Some(text);
                }
                debug!(event = "scrape.strategy_implausible", strategy = strategy.name);
            }
            None => {
                debug!(event = "scrape.strategy_miss", strategy = strategy.name);
            }
        }
    }
    None
}

/// Concatenated text content of an element.
pub fn element_text(el: &ElementRef) -> String {
    el.text().collect::<String>()
}

/// Element siblings that follow `el` in document order.
pub fn following_siblings<'a>(el: &ElementRef<'a>) -> impl Iterator<Item = ElementRef<'a>> {
    el.next_siblings().filter_map(ElementRef::wrap)
}

/// Case-insensitive class membership check.
pub fn has_class(el: &ElementRef, class: &str) -> bool {
    el.value().classes().any(|c| c.eq_ignore_ascii_case(class))
}
