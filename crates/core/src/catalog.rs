//! Photo catalog and collection filtering.
//!
//! The catalog is immutable sample data: twelve photographs spread across five
//! collections, plus the `all` pseudo-collection used as the unfiltered view.

use serde::{Deserialize, Serialize};

use crate::types::{CollectionId, PhotoId, Price};

/// A photograph available for print.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Photo {
    pub id: PhotoId,
    pub image_url: String,
    pub title: String,
    pub description: String,
    /// Starting price shown on the gallery card.
    pub price: Price,
    pub collection: Option<CollectionId>,
}

/// A named group of photos, used as a gallery filter.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Collection {
    pub id: CollectionId,
    pub name: String,
    pub description: Option<String>,
    /// Background image for the collection banner.
    pub header_image: Option<String>,
}

impl Collection {
    /// Returns `true` for the unfiltered `all` pseudo-collection.
    #[must_use]
    pub fn is_all(&self) -> bool {
        self.id.is_all()
    }
}

/// Read-only catalog of photos and collections.
#[derive(Debug, Clone)]
pub struct Catalog {
    photos: Vec<Photo>,
    collections: Vec<Collection>,
}

impl Catalog {
    /// Build a catalog from explicit data.
    #[must_use]
    pub const fn new(photos: Vec<Photo>, collections: Vec<Collection>) -> Self {
        Self {
            photos,
            collections,
        }
    }

    /// The storefront's sample catalog.
    #[must_use]
    pub fn sample() -> Self {
        Self::new(sample_photos(), sample_collections())
    }

    /// Every photo, in catalog order.
    #[must_use]
    pub fn photos(&self) -> &[Photo] {
        &self.photos
    }

    /// Every collection, `all` first.
    #[must_use]
    pub fn collections(&self) -> &[Collection] {
        &self.collections
    }

    /// Look up a photo by ID.
    #[must_use]
    pub fn photo(&self, id: &str) -> Option<&Photo> {
        self.photos.iter().find(|p| p.id.as_str() == id)
    }

    /// Look up a collection by ID.
    #[must_use]
    pub fn collection(&self, id: &str) -> Option<&Collection> {
        self.collections.iter().find(|c| c.id.as_str() == id)
    }

    /// Photos matching a collection filter.
    ///
    /// `all` yields every photo. Any other ID yields exactly the photos whose
    /// collection equals it, so an unknown ID yields nothing.
    pub fn filter<'a>(&'a self, collection_id: &'a str) -> impl Iterator<Item = &'a Photo> + 'a {
        let show_all = collection_id == CollectionId::ALL;
        self.photos.iter().filter(move |photo| {
            show_all
                || photo
                    .collection
                    .as_ref()
                    .is_some_and(|c| c.as_str() == collection_id)
        })
    }

    /// The first `count` photos, for the home page hero strip.
    #[must_use]
    pub fn featured(&self, count: usize) -> &[Photo] {
        let end = count.min(self.photos.len());
        self.photos.get(..end).unwrap_or_default()
    }
}

// =============================================================================
// Sample Data
// =============================================================================

fn unsplash(photo: &str, width: u32) -> String {
    format!(
        "https://images.unsplash.com/photo-{photo}?ixlib=rb-4.0.3&auto=format&fit=crop&w={width}&q=80"
    )
}

fn photo(
    id: &str,
    unsplash_id: &str,
    width: u32,
    title: &str,
    description: &str,
    cents: i64,
    collection: &str,
) -> Photo {
    Photo {
        id: PhotoId::new(id),
        image_url: unsplash(unsplash_id, width),
        title: title.to_owned(),
        description: description.to_owned(),
        price: Price::from_cents(cents),
        collection: Some(CollectionId::new(collection)),
    }
}

fn sample_photos() -> Vec<Photo> {
    vec![
        photo(
            "photo-1",
            "1506905925346-21bda4d32df4",
            2070,
            "Mountain Landscape",
            "Serene mountain vista captured at dawn",
            7999,
            "landscapes",
        ),
        photo(
            "photo-2",
            "1470071459604-3b5ec3a7fe05",
            1974,
            "Forest Path",
            "Mystical forest trail in morning fog",
            8999,
            "landscapes",
        ),
        photo(
            "photo-3",
            "1501785888041-af3ef285b470",
            2070,
            "Coastal Sunset",
            "Dramatic sunset over rocky coastline",
            9999,
            "landscapes",
        ),
        photo(
            "photo-4",
            "1441974231531-c6227db76b6e",
            2071,
            "Woodland Stream",
            "Peaceful stream flowing through ancient forest",
            7499,
            "landscapes",
        ),
        photo(
            "photo-5",
            "1470770841072-f978cf4d019e",
            2070,
            "Mountain Lake",
            "Pristine alpine lake reflecting mountain peaks",
            10999,
            "landscapes",
        ),
        photo(
            "photo-6",
            "1472214103451-9374bd1c798e",
            2070,
            "Prairie Sunset",
            "Golden hour over vast prairie landscape",
            6999,
            "landscapes",
        ),
        photo(
            "photo-7",
            "1583121274602-3e2820c69888",
            2070,
            "Lion Portrait",
            "Majestic lion in the African savanna",
            11999,
            "wildlife",
        ),
        photo(
            "photo-8",
            "1564349683136-77e08dba1ef3",
            1972,
            "Panda Eating",
            "Giant panda enjoying bamboo in its natural habitat",
            9999,
            "wildlife",
        ),
        photo(
            "photo-9",
            "1504006833117-8886a355efbf",
            1974,
            "Elegant Woman",
            "Studio portrait with dramatic lighting",
            12999,
            "portraits",
        ),
        photo(
            "photo-10",
            "1517841905240-472988babdf9",
            1974,
            "Urban Portrait",
            "Stylish portrait in an urban setting",
            8999,
            "portraits",
        ),
        photo(
            "photo-11",
            "1514565131-fce0801e5785",
            2069,
            "City Skyline",
            "Modern city skyline at blue hour",
            10999,
            "urban",
        ),
        photo(
            "photo-12",
            "1506259091721-347e791bab0f",
            2070,
            "Abstract Light",
            "Abstract light patterns in long exposure",
            7999,
            "abstract",
        ),
    ]
}

fn collection(id: &str, name: &str, description: &str, header: &str, width: u32) -> Collection {
    Collection {
        id: CollectionId::new(id),
        name: name.to_owned(),
        description: Some(description.to_owned()),
        header_image: Some(unsplash(header, width)),
    }
}

fn sample_collections() -> Vec<Collection> {
    vec![
        Collection {
            id: CollectionId::new(CollectionId::ALL),
            name: "All Photos".to_owned(),
            description: None,
            header_image: None,
        },
        collection(
            "landscapes",
            "Landscapes",
            "Beautiful natural scenery",
            "1506905925346-21bda4d32df4",
            2070,
        ),
        collection(
            "wildlife",
            "Wildlife",
            "Animals in their natural habitat",
            "1583121274602-3e2820c69888",
            2070,
        ),
        collection(
            "portraits",
            "Portraits",
            "Captivating human subjects",
            "1504006833117-8886a355efbf",
            2070,
        ),
        collection(
            "urban",
            "Urban",
            "City life and architecture",
            "1514565131-fce0801e5785",
            2069,
        ),
        collection(
            "abstract",
            "Abstract",
            "Conceptual and abstract imagery",
            "1506259091721-347e791bab0f",
            2070,
        ),
    ]
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn test_sample_sizes() {
        let catalog = Catalog::sample();
        assert_eq!(catalog.photos().len(), 12);
        assert_eq!(catalog.collections().len(), 6);
        assert!(catalog.collections().first().unwrap().is_all());
    }

    #[test]
    fn test_filter_all_returns_everything() {
        let catalog = Catalog::sample();
        assert_eq!(catalog.filter("all").count(), catalog.photos().len());
    }

    #[test]
    fn test_filter_matches_collection_only() {
        let catalog = Catalog::sample();
        for collection in catalog.collections().iter().filter(|c| !c.is_all()) {
            let id = collection.id.as_str();
            let matched: Vec<_> = catalog.filter(id).collect();
            assert!(!matched.is_empty(), "{id} should not be empty");
            assert!(
                matched
                    .iter()
                    .all(|p| p.collection.as_ref().unwrap().as_str() == id)
            );
        }
        assert_eq!(catalog.filter("landscapes").count(), 6);
        assert_eq!(catalog.filter("wildlife").count(), 2);
    }

    #[test]
    fn test_filter_unknown_collection_is_empty() {
        let catalog = Catalog::sample();
        assert_eq!(catalog.filter("botanicals").count(), 0);
    }

    #[test]
    fn test_photo_without_collection_only_in_all() {
        let mut loose = Catalog::sample().photos().first().unwrap().clone();
        loose.collection = None;
        let catalog = Catalog::new(vec![loose], Vec::new());
        assert_eq!(catalog.filter("all").count(), 1);
        assert_eq!(catalog.filter("landscapes").count(), 0);
    }

    #[test]
    fn test_lookup() {
        let catalog = Catalog::sample();
        let photo = catalog.photo("photo-7").unwrap();
        assert_eq!(photo.title, "Lion Portrait");
        assert_eq!(photo.price, Price::from_cents(11999));
        assert!(catalog.photo("photo-99").is_none());
        assert_eq!(catalog.collection("urban").unwrap().name, "Urban");
    }

    #[test]
    fn test_featured_is_bounded() {
        let catalog = Catalog::sample();
        assert_eq!(catalog.featured(4).len(), 4);
        assert_eq!(catalog.featured(100).len(), 12);
    }
}
