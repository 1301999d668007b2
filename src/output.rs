use crate::models::Listing;
use anyhow::{Context, Result};
use std::path::Path;
use tracing::{debug, info};

/// Columns every row carries, in output order
pub const FIXED_COLUMNS: [&str; 12] = [
    "price_raw",
    "title",
    "location",
    "status",
    "availability",
    "property_type",
    "beds",
    "baths",
    "area(sqm)",
    "author",
    "post-date",
    "listing_url",
];

/// Cell value for a flagged amenity
const FLAG_SET: &str = "True";

/// Flat view over the scraped listings: fixed columns followed by one
/// column per amenity seen anywhere in the crawl
#[derive(Debug)]
pub struct ListingTable<'a> {
    listings: &'a [Listing],
    amenity_columns: Vec<&'a str>,
}

impl<'a> ListingTable<'a> {
    pub fn new(listings: &'a [Listing]) -> Self {
        let mut amenity_columns: Vec<&'a str> = Vec::new();

        for amenity in listings.iter().flat_map(|l| l.amenities.iter()) {
            if FIXED_COLUMNS.contains(&amenity.as_str()) {
                debug!("Amenity {:?} clashes with a fixed column, leaving it out", amenity);
                continue;
            }
            if !amenity_columns.contains(&amenity.as_str()) {
                amenity_columns.push(amenity);
            }
        }

        Self {
            listings,
            amenity_columns,
        }
    }

    pub fn headers(&self) -> Vec<&str> {
        FIXED_COLUMNS
            .iter()
            .copied()
            .chain(self.amenity_columns.iter().copied())
            .collect()
    }

    pub fn amenity_columns(&self) -> &[&'a str] {
        &self.amenity_columns
    }

    pub fn len(&self) -> usize {
        self.listings.len()
    }

    /// Cells for one listing, aligned with `headers()`; empty means absent
    pub fn row(&self, listing: &'a Listing) -> Vec<&'a str> {
        let fixed = [
            &listing.price_raw,
            &listing.title,
            &listing.location,
            &listing.status,
            &listing.availability,
            &listing.property_type,
            &listing.beds,
            &listing.baths,
            &listing.area_sqm,
            &listing.author,
            &listing.post_date,
            &listing.listing_url,
        ];

        fixed
            .into_iter()
            .map(|value| value.as_deref().unwrap_or(""))
            .chain(self.amenity_columns.iter().map(|column| {
                if listing.has_amenity(column) {
                    FLAG_SET
                } else {
                    ""
                }
            }))
            .collect()
    }

    /// Render the whole table as CSV
    pub fn to_csv(&self) -> Result<Vec<u8>> {
        let mut wtr = csv::Writer::from_writer(Vec::new());

        wtr.write_record(self.headers())
            .context("Failed to write CSV header")?;
        for listing in self.listings {
            wtr.write_record(self.row(listing))
                .context("Failed to write CSV row")?;
        }

        wtr.into_inner()
            .map_err(|e| anyhow::anyhow!("Failed to flush CSV output: {}", e.error()))
    }
}

/// Write all listings to `path`, replacing any previous file
pub async fn write_listings(listings: &[Listing], path: &Path) -> Result<()> {
    let table = ListingTable::new(listings);
    let csv = table.to_csv()?;

    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        tokio::fs::create_dir_all(parent)
            .await
            .with_context(|| format!("Failed to create directory {}", parent.display()))?;
    }

    tokio::fs::write(path, csv)
        .await
        .with_context(|| format!("Failed to write {}", path.display()))?;

    info!(
        "💾 Saved {} listings ({} amenity columns) to {}",
        table.len(),
        table.amenity_columns().len(),
        path.display()
    );

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn listing(title: &str, amenities: &[&str]) -> Listing {
        let mut listing = Listing {
            title: Some(title.to_string()),
            price_raw: Some("₦ 5,000,000".to_string()),
            ..Default::default()
        };
        for amenity in amenities {
            listing.add_amenity(*amenity);
        }
        listing
    }

    #[test]
    fn amenity_columns_are_the_union_in_first_seen_order() {
        let listings = vec![
            listing("A", &["Gym", "Pool"]),
            listing("B", &[]),
            listing("C", &["Pool", "Elevator"]),
        ];
        let table = ListingTable::new(&listings);

        assert_eq!(table.amenity_columns(), &["Gym", "Pool", "Elevator"]);
        assert_eq!(table.headers().len(), FIXED_COLUMNS.len() + 3);
        assert_eq!(&table.headers()[12..], &["Gym", "Pool", "Elevator"]);
    }

    #[test]
    fn non_advertising_listing_has_empty_amenity_cells() {
        let listings = vec![listing("A", &["Gym"]), listing("B", &[])];
        let table = ListingTable::new(&listings);

        assert_eq!(table.row(&listings[0]).last(), Some(&"True"));
        assert_eq!(table.row(&listings[1]).last(), Some(&""));
    }

    #[test]
    fn absent_fields_render_empty_but_keep_their_column() {
        let listings = vec![Listing::default()];
        let table = ListingTable::new(&listings);

        assert_eq!(table.headers()[0], "price_raw");
        assert_eq!(table.row(&listings[0]), vec![""; FIXED_COLUMNS.len()]);
    }

    #[test]
    fn amenity_named_like_a_fixed_column_is_dropped() {
        let listings = vec![listing("A", &["title", "Gym"])];
        let table = ListingTable::new(&listings);

        assert_eq!(table.amenity_columns(), &["Gym"]);
        assert_eq!(table.row(&listings[0])[1], "A");
    }

    #[test]
    fn csv_quotes_embedded_commas() {
        let listings = vec![listing("A", &["Gym"])];
        let csv = String::from_utf8(ListingTable::new(&listings).to_csv().unwrap()).unwrap();
        let mut lines = csv.lines();

        assert_eq!(
            lines.next(),
            Some("price_raw,title,location,status,availability,property_type,beds,baths,area(sqm),author,post-date,listing_url,Gym")
        );
        assert_eq!(lines.next(), Some("\"₦ 5,000,000\",A,,,,,,,,,,,True"));
        assert_eq!(lines.next(), None);
    }

    #[tokio::test]
    async fn write_creates_parent_and_overwrites() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("data").join("raw").join("listings.csv");

        write_listings(&[listing("First", &[])], &path).await.unwrap();
        write_listings(&[listing("Second", &[])], &path).await.unwrap();

        let contents = std::fs::read_to_string(&path).unwrap();
        assert!(contents.contains("Second"));
        assert!(!contents.contains("First"));
    }

    #[tokio::test]
    async fn empty_crawl_writes_header_only() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("empty.csv");

        write_listings(&[], &path).await.unwrap();

        let contents = std::fs::read_to_string(&path).unwrap();
        assert_eq!(contents.lines().count(), 1);
        assert!(contents.starts_with("price_raw,"));
    }
}
