//! Anchor extraction from browser bookmark exports (Netscape bookmark HTML).

use scraper::{Html, Selector};
use tracing::debug;

use crate::domain::entities::RawLink;

/// All `(title, href)` pairs with a non-empty title and an `http` prefix, in document order.
pub fn extract_links(html: &str) -> Vec<RawLink> {
    let document = Html::parse_document(html);
    let link_selector = match Selector::parse("a[href]") {
        Ok(s) => s,
        Err(_) => return vec![],
    };

    let links: Vec<RawLink> = document
        .select(&link_selector)
        .filter_map(|el| {
            let url = el.value().attr("href")?;
            let title = el.text().collect::<String>();
            let title = title.trim();
            (!title.is_empty() && url.starts_with("http")).then(|| RawLink::new(title, url))
        })
        .collect();
    debug!("extract_links: {} links", links.len());
    links
}
