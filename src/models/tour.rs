use chrono::NaiveDate;
use serde::{Deserialize, Deserializer, Serialize};

// Catalog ids arrive either as integers or as numeric strings ("7")
fn deserialize_tour_id<'de, D>(deserializer: D) -> Result<u32, D::Error>
where
    D: Deserializer<'de>,
{
    let value: serde_json::Value = serde_json::Value::deserialize(deserializer)?;
    match value {
        serde_json::Value::Number(n) => n
            .as_u64()
            .and_then(|id| u32::try_from(id).ok())
            .ok_or_else(|| serde::de::Error::custom(format!("invalid tour id: {}", n))),
        serde_json::Value::String(s) => s
            .trim()
            .parse::<u32>()
            .map_err(|_| serde::de::Error::custom(format!("invalid tour id: {}", s))),
        other => Err(serde::de::Error::custom(format!(
            "invalid tour id: {}",
            other
        ))),
    }
}

// Review counts are sometimes exported as floats
fn deserialize_optional_rounded_u32<'de, D>(deserializer: D) -> Result<Option<u32>, D::Error>
where
    D: Deserializer<'de>,
{
    let value: Option<serde_json::Value> = Option::deserialize(deserializer)?;
    match value {
        Some(serde_json::Value::Number(n)) => {
            if let Some(i) = n.as_u64() {
                Ok(u32::try_from(i).ok())
            } else if let Some(f) = n.as_f64() {
                Ok(Some(f.round().max(0.0) as u32))
            } else {
                Ok(None)
            }
        }
        _ => Ok(None),
    }
}

/// A single offering in the tour catalog.
///
/// `price` and `duration` stay in their display form ("$2,299", "14 Days");
/// numeric values are recovered through [`crate::services::pricing_service`].
#[derive(Debug, Deserialize, Serialize, Clone, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct TourRecord {
    #[serde(deserialize_with = "deserialize_tour_id")]
    pub id: u32,
    pub title: String,
    pub description: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub detailed_description: Option<String>,
    pub price: String,
    pub duration: String,
    pub location: String,
    pub group_size: String,
    pub activity: String,
    pub image: String,
    #[serde(default)]
    pub highlights: Vec<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub difficulty: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub best_time: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub altitude: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub accommodation: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub meals: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub rating: Option<f32>,
    #[serde(
        deserialize_with = "deserialize_optional_rounded_u32",
        default,
        skip_serializing_if = "Option::is_none"
    )]
    pub reviews: Option<u32>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub itinerary: Vec<String>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub included: Vec<String>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub excluded: Vec<String>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub permits: Vec<String>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub equipment: Vec<String>,
    /// Fixed departures; when absent a weekly schedule is generated.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub available_dates: Option<Vec<NaiveDate>>,
}

/// Lightweight view returned by the search-bar suggestions.
#[derive(Debug, Serialize, Clone)]
#[serde(rename_all = "camelCase")]
pub struct TourSuggestion {
    pub id: u32,
    pub title: String,
    pub location: String,
    pub price: String,
    pub image: String,
}

impl From<&TourRecord> for TourSuggestion {
    fn from(tour: &TourRecord) -> Self {
        Self {
            id: tour.id,
            title: tour.title.clone(),
            location: tour.location.clone(),
            price: tour.price.clone(),
            image: tour.image.clone(),
        }
    }
}
