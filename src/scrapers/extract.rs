//! HTML → value extraction for cwlagos pages.
//!
//! Nothing here performs I/O; the crawler feeds page bodies in and folds the
//! returned values into its result.

use crate::models::{Category, Listing};
use crate::scrapers::types::CompiledSchema;
use scraper::{ElementRef, Html, Selector};
use tracing::{debug, warn};
use url::Url;

/// Value the site prints in a meta block when the field is unknown
const PLACEHOLDER: &str = "-";

/// Cards found on one listing page plus the link to the following page
#[derive(Debug, Clone, Default)]
pub struct ListingPage {
    pub listings: Vec<Listing>,
    pub next_page: Option<String>,
}

/// Which fixed column a card meta block feeds
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MetaField {
    Beds,
    Baths,
    AreaSqm,
}

impl MetaField {
    fn marker(self) -> &'static str {
        match self {
            MetaField::Beds => "Beds",
            MetaField::Baths => "Baths",
            MetaField::AreaSqm => "sqm",
        }
    }

    fn label(self) -> &'static str {
        match self {
            MetaField::Beds => "Beds:",
            MetaField::Baths => "Baths:",
            MetaField::AreaSqm => "sqm:",
        }
    }
}

/// Collect the location categories linked from the index page
pub fn parse_categories(html: &str, page_url: &Url, schema: &CompiledSchema) -> Vec<Category> {
    let document = Html::parse_document(html);

    document
        .select(&schema.category_link)
        .map(|link| Category {
            name: select_text(link, &schema.category_name),
            url: link
                .value()
                .attr("href")
                .and_then(|href| resolve_href(page_url, href)),
        })
        .collect()
}

/// Extract every card on a listing page and the next-page link, if any
pub fn parse_listing_page(html: &str, page_url: &Url, schema: &CompiledSchema) -> ListingPage {
    let document = Html::parse_document(html);

    let listings = document
        .select(&schema.card)
        .map(|card| parse_card(card, page_url, schema))
        .collect();

    let next_page = document
        .select(&schema.next_page)
        .next()
        .and_then(|link| link.value().attr("href"))
        .and_then(|href| resolve_href(page_url, href));

    ListingPage { listings, next_page }
}

fn parse_card(card: ElementRef, page_url: &Url, schema: &CompiledSchema) -> Listing {
    let mut listing = Listing {
        price_raw: select_text(card, &schema.price),
        title: select_text(card, &schema.title),
        location: select_text(card, &schema.location),
        status: select_text(card, &schema.status),
        availability: select_text(card, &schema.availability),
        property_type: select_text(card, &schema.property_type),
        author: select_text(card, &schema.author),
        post_date: select_text(card, &schema.post_date),
        listing_url: card
            .select(&schema.detail_link)
            .next()
            .and_then(|link| link.value().attr("href"))
            .and_then(|href| resolve_href(page_url, href)),
        ..Default::default()
    };

    for meta in card.select(&schema.meta) {
        let text = stripped_text(meta);
        match classify_meta(&text) {
            Some((MetaField::Beds, value)) => listing.beds = value,
            Some((MetaField::Baths, value)) => listing.baths = value,
            Some((MetaField::AreaSqm, value)) => listing.area_sqm = value,
            None => debug!("Ignoring unrecognised meta block {:?}", text),
        }
    }

    listing
}

/// Classify a meta block by its marker and strip the label.
///
/// Markers are tried in the order Beds, Baths, sqm. The site's `-`
/// placeholder comes back as `None`.
pub fn classify_meta(text: &str) -> Option<(MetaField, Option<String>)> {
    let field = [MetaField::Beds, MetaField::Baths, MetaField::AreaSqm]
        .into_iter()
        .find(|field| text.contains(field.marker()))?;

    let value = text.replace(field.label(), "");
    let value = value.trim();
    let value = (value != PLACEHOLDER).then(|| value.to_string());

    Some((field, value))
}

/// Amenity labels from every checklist on a detail page, in page order
pub fn parse_amenities(html: &str, schema: &CompiledSchema) -> Vec<String> {
    let document = Html::parse_document(html);

    let mut amenities: Vec<String> = Vec::new();
    for list in document.select(&schema.amenity_list) {
        for label in list.text().map(str::trim).filter(|s| !s.is_empty()) {
            if !amenities.iter().any(|a| a == label) {
                amenities.push(label.to_string());
            }
        }
    }
    amenities
}

/// Text of the first match under `parent`, `None` if nothing matches
fn select_text(parent: ElementRef, selector: &Selector) -> Option<String> {
    parent.select(selector).next().map(stripped_text)
}

/// Concatenation of the element's text nodes, each trimmed
fn stripped_text(element: ElementRef) -> String {
    element
        .text()
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .collect()
}

/// Absolute form of `href`; empty and fragment-only links count as absent
fn resolve_href(base: &Url, href: &str) -> Option<String> {
    let href = href.trim();
    if href.is_empty() || href.starts_with('#') {
        return None;
    }

    match base.join(href) {
        Ok(url) => Some(url.to_string()),
        Err(e) => {
            warn!("Skipping unusable link {:?} on {}: {}", href, base, e);
            None
        }
    }
}
