use std::collections::HashSet;
use std::fmt;
use std::path::Path;

use crate::models::filter::{DurationBucket, FilterCriteria, FilterOptions, PriceBucket};
use crate::models::tour::{TourRecord, TourSuggestion};
use crate::services::pricing_service::PricingService;

const BUNDLED_TOURS: &str = include_str!("../data/tours.json");

/// Activity choices offered by the tours page, in display order.
pub const ACTIVITIES: [&str; 6] = ["All", "Hiking", "History", "Wildlife", "Luxury", "Culinary"];

#[derive(Debug)]
pub enum CatalogError {
    Io(std::io::Error),
    Parse(serde_json::Error),
    InvalidPrice { id: u32, price: String },
    InvalidDuration { id: u32, duration: String },
    DuplicateId(u32),
}

impl fmt::Display for CatalogError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CatalogError::Io(err) => write!(f, "Failed to read catalog: {}", err),
            CatalogError::Parse(err) => write!(f, "Failed to parse catalog: {}", err),
            CatalogError::InvalidPrice { id, price } => {
                write!(f, "Tour {} has an unparseable price: {:?}", id, price)
            }
            CatalogError::InvalidDuration { id, duration } => {
                write!(f, "Tour {} has an unparseable duration: {:?}", id, duration)
            }
            CatalogError::DuplicateId(id) => write!(f, "Duplicate tour id: {}", id),
        }
    }
}

impl std::error::Error for CatalogError {}

impl From<std::io::Error> for CatalogError {
    fn from(err: std::io::Error) -> Self {
        CatalogError::Io(err)
    }
}

impl From<serde_json::Error> for CatalogError {
    fn from(err: serde_json::Error) -> Self {
        CatalogError::Parse(err)
    }
}

/// A tour with its price and day count already recovered from the display strings.
#[derive(Debug, Clone)]
pub struct CatalogEntry {
    pub tour: TourRecord,
    pub unit_price: u64,
    pub days: u32,
}

/// The read-only tour catalog, loaded once at startup.
#[derive(Debug, Clone)]
pub struct Catalog {
    entries: Vec<CatalogEntry>,
}

impl Catalog {
    pub fn bundled() -> Result<Self, CatalogError> {
        Self::from_json(BUNDLED_TOURS)
    }

    pub fn from_path(path: impl AsRef<Path>) -> Result<Self, CatalogError> {
        let raw = std::fs::read_to_string(path)?;
        Self::from_json(&raw)
    }

    pub fn from_json(raw: &str) -> Result<Self, CatalogError> {
        let tours: Vec<TourRecord> = serde_json::from_str(raw)?;
        Self::from_tours(tours)
    }

    /// Build a catalog, rejecting records whose price or duration does not parse.
    pub fn from_tours(tours: Vec<TourRecord>) -> Result<Self, CatalogError> {
        let mut seen = HashSet::new();
        let mut entries = Vec::with_capacity(tours.len());

        for tour in tours {
            if !seen.insert(tour.id) {
                return Err(CatalogError::DuplicateId(tour.id));
            }
            let unit_price = PricingService::parse_price(&tour.price)
                .filter(|price| *price > 0)
                .ok_or_else(|| CatalogError::InvalidPrice {
                    id: tour.id,
                    price: tour.price.clone(),
                })?;
            let days = PricingService::parse_duration_days(&tour.duration)
                .filter(|days| *days > 0)
                .ok_or_else(|| CatalogError::InvalidDuration {
                    id: tour.id,
                    duration: tour.duration.clone(),
                })?;
            entries.push(CatalogEntry {
                tour,
                unit_price,
                days,
            });
        }

        Ok(Self { entries })
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn tours(&self) -> impl Iterator<Item = &TourRecord> {
        self.entries.iter().map(|entry| &entry.tour)
    }

    pub fn find(&self, id: u32) -> Option<&CatalogEntry> {
        self.entries.iter().find(|entry| entry.tour.id == id)
    }

    /// Tours matching every active criterion, in catalog order.
    pub fn filter(&self, criteria: &FilterCriteria) -> Vec<&TourRecord> {
        self.entries
            .iter()
            .filter(|entry| {
                matches_criteria(&entry.tour, Some(entry.unit_price), Some(entry.days), criteria)
            })
            .map(|entry| &entry.tour)
            .collect()
    }

    /// Search-bar suggestions: title or location contains the query.
    pub fn quick_search(&self, query: &str) -> Vec<TourSuggestion> {
        if query.is_empty() {
            return Vec::new();
        }
        let needle = query.to_lowercase();
        self.tours()
            .filter(|tour| {
                tour.title.to_lowercase().contains(&needle)
                    || tour.location.to_lowercase().contains(&needle)
            })
            .map(TourSuggestion::from)
            .collect()
    }

    pub fn filter_options(&self) -> FilterOptions {
        FilterOptions {
            activities: ACTIVITIES.iter().map(|a| a.to_string()).collect(),
            durations: DurationBucket::ALL.iter().map(|b| b.label()).collect(),
            price_ranges: PriceBucket::ALL.iter().map(|b| b.label()).collect(),
        }
    }
}

/// Filter an arbitrary tour list. Records whose price or duration cannot be
/// parsed never match an active price or duration bucket.
pub fn filter_tours<'a>(tours: &'a [TourRecord], criteria: &FilterCriteria) -> Vec<&'a TourRecord> {
    tours
        .iter()
        .filter(|tour| {
            matches_criteria(
                tour,
                PricingService::parse_price(&tour.price),
                PricingService::parse_duration_days(&tour.duration),
                criteria,
            )
        })
        .collect()
}

fn matches_criteria(
    tour: &TourRecord,
    unit_price: Option<u64>,
    days: Option<u32>,
    criteria: &FilterCriteria,
) -> bool {
    let matches_search = criteria.search.is_empty() || {
        let needle = criteria.search.to_lowercase();
        tour.title.to_lowercase().contains(&needle)
            || tour.description.to_lowercase().contains(&needle)
    };

    let matches_activity = criteria
        .active_activity()
        .map_or(true, |activity| tour.activity == activity);

    let matches_duration = criteria.duration == DurationBucket::Any
        || days.map_or(false, |days| criteria.duration.contains(days));

    let matches_price = criteria.price == PriceBucket::Any
        || unit_price.map_or(false, |price| criteria.price.contains(price));

    matches_search && matches_activity && matches_duration && matches_price
}

#[cfg(test)]
mod tests {
    use super::*;

    fn tour(id: u32, title: &str, price: &str, duration: &str, activity: &str) -> TourRecord {
        serde_json::from_value(serde_json::json!({
            "id": id,
            "title": title,
            "description": format!("{} in the Himalaya", title),
            "price": price,
            "duration": duration,
            "location": "Nepal",
            "groupSize": "2-10 people",
            "activity": activity,
            "image": "https://example.com/tour.jpg"
        }))
        .unwrap()
    }

    fn sample() -> Vec<TourRecord> {
        vec![
            tour(1, "Kathmandu Heritage Walk", "$799", "5 Days", "History"),
            tour(2, "Langtang Valley Trek", "$1,299", "10 Days", "Hiking"),
            tour(3, "Annapurna Circuit Trek", "$1,899", "12 Days", "Hiking"),
            tour(4, "Everest Base Camp Trek", "$2,299", "14 Days", "Hiking"),
        ]
    }

    fn ids(tours: &[&TourRecord]) -> Vec<u32> {
        tours.iter().map(|t| t.id).collect()
    }

    #[test]
    fn test_bundled_catalog_loads() {
        let catalog = Catalog::bundled().expect("bundled catalog");
        assert_eq!(catalog.len(), 15);
        let everest = catalog.find(1).unwrap();
        assert_eq!(everest.unit_price, 2299);
        assert_eq!(everest.days, 14);
    }

    #[test]
    fn test_unfiltered_is_identity() {
        let catalog = Catalog::from_tours(sample()).unwrap();
        let result = catalog.filter(&FilterCriteria::default());
        assert_eq!(ids(&result), vec![1, 2, 3, 4]);
    }

    #[test]
    fn test_price_bucket_keeps_order() {
        let catalog = Catalog::from_tours(sample()).unwrap();
        let criteria = FilterCriteria {
            price: PriceBucket::From1000To2000,
            ..Default::default()
        };
        assert_eq!(ids(&catalog.filter(&criteria)), vec![2, 3]);
    }

    #[test]
    fn test_search_is_case_insensitive_on_title_and_description() {
        let catalog = Catalog::from_tours(sample()).unwrap();
        let criteria = FilterCriteria {
            search: "EVEREST".to_string(),
            ..Default::default()
        };
        assert_eq!(ids(&catalog.filter(&criteria)), vec![4]);

        let criteria = FilterCriteria {
            search: "himalaya".to_string(),
            ..Default::default()
        };
        assert_eq!(catalog.filter(&criteria).len(), 4);
    }

    #[test]
    fn test_activity_match_is_exact() {
        let catalog = Catalog::from_tours(sample()).unwrap();
        let criteria = FilterCriteria {
            activity: Some("hiking".to_string()),
            ..Default::default()
        };
        assert!(catalog.filter(&criteria).is_empty());

        let criteria = FilterCriteria {
            activity: Some("Hiking".to_string()),
            ..Default::default()
        };
        assert_eq!(ids(&catalog.filter(&criteria)), vec![2, 3, 4]);

        let criteria = FilterCriteria {
            activity: Some(" Hiking".to_string()),
            ..Default::default()
        };
        assert!(catalog.filter(&criteria).is_empty());
    }

    #[test]
    fn test_criteria_are_conjunctive_and_narrowing() {
        let catalog = Catalog::from_tours(sample()).unwrap();
        let hiking = FilterCriteria {
            activity: Some("Hiking".to_string()),
            ..Default::default()
        };
        let hiking_long = FilterCriteria {
            duration: DurationBucket::EightToFourteen,
            price: PriceBucket::Over2000,
            ..hiking.clone()
        };
        let broad = ids(&catalog.filter(&hiking));
        let narrow = ids(&catalog.filter(&hiking_long));
        assert_eq!(narrow, vec![4]);
        assert!(narrow.iter().all(|id| broad.contains(id)));
    }

    #[test]
    fn test_empty_catalog() {
        let catalog = Catalog::from_tours(Vec::new()).unwrap();
        assert!(catalog.filter(&FilterCriteria::default()).is_empty());
    }

    #[test]
    fn test_rejects_bad_records() {
        let mut tours = sample();
        tours[0].price = "TBD".to_string();
        assert!(matches!(
            Catalog::from_tours(tours),
            Err(CatalogError::InvalidPrice { id: 1, .. })
        ));

        let mut tours = sample();
        tours[1].id = 1;
        assert!(matches!(
            Catalog::from_tours(tours),
            Err(CatalogError::DuplicateId(1))
        ));
    }

    #[test]
    fn test_filter_tours_on_raw_slice() {
        let mut tours = sample();
        tours[0].price = "TBD".to_string();
        let criteria = FilterCriteria {
            price: PriceBucket::Under1000,
            ..Default::default()
        };
        assert!(filter_tours(&tours, &criteria).is_empty());
        assert_eq!(filter_tours(&tours, &FilterCriteria::default()).len(), 4);
    }

    #[test]
    fn test_quick_search_matches_location() {
        let catalog = Catalog::bundled().unwrap();
        let hits = catalog.quick_search("annapurna region");
        assert!(hits.len() >= 3);
        assert!(catalog.quick_search("").is_empty());
    }
}
