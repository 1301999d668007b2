/// A location grouping on the index page, each with its own paginated listings
#[derive(Debug, Clone, PartialEq)]
pub struct Category {
    pub name: Option<String>,
    pub url: Option<String>,
}

impl Category {
    pub fn display_name(&self) -> &str {
        self.name.as_deref().unwrap_or("<unnamed>")
    }
}

/// One property listing as scraped from a listing card and its detail page
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Listing {
    /// Price exactly as displayed, e.g. "₦ 250,000,000"
    pub price_raw: Option<String>,
    pub title: Option<String>,
    pub location: Option<String>,
    pub status: Option<String>,
    pub availability: Option<String>,
    pub property_type: Option<String>,
    pub beds: Option<String>,
    pub baths: Option<String>,
    pub area_sqm: Option<String>,
    pub author: Option<String>,
    pub post_date: Option<String>,
    pub listing_url: Option<String>,
    /// Amenity labels from the detail page, in page order without repeats
    pub amenities: Vec<String>,
}

impl Listing {
    /// Flag an amenity; repeated labels are kept once
    pub fn add_amenity(&mut self, label: impl Into<String>) {
        let label = label.into();
        if !self.amenities.contains(&label) {
            self.amenities.push(label);
        }
    }

    pub fn has_amenity(&self, label: &str) -> bool {
        self.amenities.iter().any(|a| a == label)
    }
}
