//! Search-results page extraction.
//!
//! Parsing is synchronous and returns owned data, so the non-`Send` DOM never
//! outlives the call.

use scraper::{ElementRef, Html, Selector};
use url::Url;

use crate::config::{ConfigError, SearchSelectors};
use crate::models::{ExtractedItem, SourceId};

/// Everything read from one search-results page.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct SearchPage {
    pub cards: Vec<ExtractedItem>,
    /// Highest page number shown by the pagination indicators.
    pub total_pages: Option<u32>,
}

/// Compiled selectors for reading search-results pages.
#[derive(Debug)]
pub struct SearchPageParser {
    base_url: Url,
    source_id_attr: String,
    card: Selector,
    title: Selector,
    price: Selector,
    link: Selector,
    image: Selector,
    pagination: Selector,
}

fn compile(field: &'static str, selector: &str) -> Result<Selector, ConfigError> {
    Selector::parse(selector).map_err(|e| ConfigError::InvalidSelector {
        field,
        selector: selector.to_string(),
        message: e.to_string(),
    })
}

impl SearchPageParser {
    pub fn new(selectors: &SearchSelectors, base_url: &str) -> Result<Self, ConfigError> {
        let base_url = Url::parse(base_url).map_err(|source| ConfigError::InvalidBaseUrl {
            url: base_url.to_string(),
            source,
        })?;

        Ok(Self {
            base_url,
            source_id_attr: selectors.source_id_attr.clone(),
            card: compile("card", &selectors.card)?,
            title: compile("title", &selectors.title)?,
            price: compile("price", &selectors.price)?,
            link: compile("link", &selectors.link)?,
            image: compile("image", &selectors.image)?,
            pagination: compile("pagination", &selectors.pagination)?,
        })
    }

    /// Extract listing cards and the page count from a results page.
    pub fn parse(&self, html: &str) -> SearchPage {
        let document = Html::parse_document(html);

        let cards = document
            .select(&self.card)
            .map(|card| self.extract_card(card))
            .collect();

        // Labels such as "Previous" or "..." don't parse and are skipped.
        let total_pages = document
            .select(&self.pagination)
            .filter_map(|el| collapse_text(el).parse::<u32>().ok())
            .max();

        SearchPage { cards, total_pages }
    }

    fn extract_card(&self, card: ElementRef<'_>) -> ExtractedItem {
        let title = card
            .select(&self.title)
            .map(collapse_text)
            .collect::<Vec<_>>()
            .join(" ");

        let raw_price_text = card
            .select(&self.price)
            .flat_map(|el| el.text())
            .collect::<String>();

        let link = card
            .select(&self.link)
            .filter_map(|el| el.value().attr("href"))
            .find_map(|href| self.resolve(href));

        let images = card
            .select(&self.image)
            .filter_map(|el| el.value().attr("src"))
            .filter_map(|src| self.resolve(src))
            .collect();

        ExtractedItem {
            source_id: self.source_id(card),
            title: title.trim().to_string(),
            link,
            images,
            raw_price_text: raw_price_text.trim().to_string(),
        }
    }

    /// The id sits on the card itself or on the nearest result container
    /// around it.
    fn source_id(&self, card: ElementRef<'_>) -> SourceId {
        let ancestors = card.ancestors().filter_map(ElementRef::wrap);
        let attr = std::iter::once(card)
            .chain(ancestors)
            .filter_map(|el| el.value().attr(&self.source_id_attr))
            .find(|id| !id.trim().is_empty());
        SourceId::from_attr(attr)
    }

    fn resolve(&self, href: &str) -> Option<String> {
        let href = href.trim();
        if href.is_empty() || href.starts_with('#') || href.starts_with("javascript:") {
            return None;
        }
        self.base_url.join(href).ok().map(String::from)
    }
}

fn collapse_text(el: ElementRef<'_>) -> String {
    el.text()
        .flat_map(str::split_whitespace)
        .collect::<Vec<_>>()
        .join(" ")
}
