use anyhow::{anyhow, Result};
use scraper::Selector;

/// CSS selectors describing where each field lives in the site's markup
#[derive(Debug, Clone)]
pub struct ListingSchema {
    /// Category links on the index page
    pub category_link: String,
    /// Category name, inside a category link
    pub category_name: String,
    /// Property card on a listing page
    pub card: String,
    pub price: String,
    pub title: String,
    pub location: String,
    pub status: String,
    pub availability: String,
    pub property_type: String,
    /// Beds / baths / area blocks inside a card
    pub meta: String,
    pub author: String,
    pub post_date: String,
    /// Image link carrying the detail page URL
    pub detail_link: String,
    /// Pagination link to the following listing page
    pub next_page: String,
    /// Checklists of amenities on a detail page
    pub amenity_list: String,
}

impl Default for ListingSchema {
    fn default() -> Self {
        Self {
            category_link: "a.location-banner-inner".to_string(),
            category_name: "h4.title".to_string(),
            card: "article.property-item".to_string(),
            price: "div.property-price".to_string(),
            title: "h2.property-title".to_string(),
            location: "div.property-location a".to_string(),
            status: "a.status-property-label".to_string(),
            availability: "a.label-property-label".to_string(),
            property_type: "a.type-property".to_string(),
            meta: "div.property-meta".to_string(),
            author: "div.name-author".to_string(),
            post_date: "div.property-postdate".to_string(),
            detail_link: "a.property-image".to_string(),
            next_page: "a.next.page-numbers".to_string(),
            amenity_list: "ul.list-check".to_string(),
        }
    }
}

/// A `ListingSchema` with every selector parsed once up front
#[derive(Debug, Clone)]
pub struct CompiledSchema {
    pub category_link: Selector,
    pub category_name: Selector,
    pub card: Selector,
    pub price: Selector,
    pub title: Selector,
    pub location: Selector,
    pub status: Selector,
    pub availability: Selector,
    pub property_type: Selector,
    pub meta: Selector,
    pub author: Selector,
    pub post_date: Selector,
    pub detail_link: Selector,
    pub next_page: Selector,
    pub amenity_list: Selector,
}

impl ListingSchema {
    pub fn compile(&self) -> Result<CompiledSchema> {
        Ok(CompiledSchema {
            category_link: selector(&self.category_link)?,
            category_name: selector(&self.category_name)?,
            card: selector(&self.card)?,
            price: selector(&self.price)?,
            title: selector(&self.title)?,
            location: selector(&self.location)?,
            status: selector(&self.status)?,
            availability: selector(&self.availability)?,
            property_type: selector(&self.property_type)?,
            meta: selector(&self.meta)?,
            author: selector(&self.author)?,
            post_date: selector(&self.post_date)?,
            detail_link: selector(&self.detail_link)?,
            next_page: selector(&self.next_page)?,
            amenity_list: selector(&self.amenity_list)?,
        })
    }
}

fn selector(css: &str) -> Result<Selector> {
    Selector::parse(css).map_err(|e| anyhow!("Invalid selector {:?}: {}", css, e))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_schema_compiles() {
        assert!(ListingSchema::default().compile().is_ok());
    }

    #[test]
    fn broken_selector_is_reported() {
        let schema = ListingSchema {
            card: "article[".to_string(),
            ..Default::default()
        };
        let err = schema.compile().unwrap_err();
        assert!(err.to_string().contains("article["));
    }
}
