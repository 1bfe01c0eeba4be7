//! Asset reference discovery in HTML documents

use crate::types::{AssetCategory, AssetReference};
use scraper::{Html, Selector};
use std::sync::LazyLock;

// Constant selectors; parsing cannot fail.
#[allow(clippy::expect_used)]
static LINK_SELECTOR: LazyLock<Selector> =
    LazyLock::new(|| Selector::parse("link[rel][href]").expect("valid selector"));

#[allow(clippy::expect_used)]
static SCRIPT_SELECTOR: LazyLock<Selector> =
    LazyLock::new(|| Selector::parse("script[src]").expect("valid selector"));

/// Find every stylesheet and external script referenced by `html`
///
/// Parsing is tolerant: malformed markup is recovered by the HTML5 tree
/// builder rather than rejected. Stylesheets come first in document order,
/// followed by scripts in document order. Elements with an empty location are
/// skipped; duplicates are kept.
pub fn extract_references(html: &[u8]) -> Vec<AssetReference> {
    let text = String::from_utf8_lossy(html);
    let document = Html::parse_document(&text);

    let stylesheets = document
        .select(&LINK_SELECTOR)
        .filter(|element| {
            element
                .value()
                .attr("rel")
                .is_some_and(is_stylesheet_relation)
        })
        .filter_map(|element| element.value().attr("href"))
        .filter_map(|href| non_empty(href, AssetCategory::Stylesheet));

    let scripts = document
        .select(&SCRIPT_SELECTOR)
        .filter_map(|element| element.value().attr("src"))
        .filter_map(|src| non_empty(src, AssetCategory::Script));

    stylesheets.chain(scripts).collect()
}

/// `rel` is a space-separated, case-insensitive token list
fn is_stylesheet_relation(rel: &str) -> bool {
    rel.split_ascii_whitespace()
        .any(|token| token.eq_ignore_ascii_case("stylesheet"))
}

fn non_empty(location: &str, category: AssetCategory) -> Option<AssetReference> {
    let location = location.trim();
    if location.is_empty() {
        None
    } else {
        Some(AssetReference::new(location, category))
    }
}
