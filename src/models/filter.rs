use serde::{Deserialize, Serialize};

#[derive(Debug, Serialize, Deserialize, Clone, Copy, PartialEq, Eq, Default)]
pub enum DurationBucket {
    #[default]
    #[serde(rename = "All", alias = "")]
    Any,
    #[serde(rename = "1-3 Days")]
    UpToThree,
    #[serde(rename = "4-7 Days")]
    FourToSeven,
    #[serde(rename = "8-14 Days")]
    EightToFourteen,
    #[serde(rename = "15+ Days")]
    FifteenPlus,
}

impl DurationBucket {
    pub const ALL: [DurationBucket; 5] = [
        DurationBucket::Any,
        DurationBucket::UpToThree,
        DurationBucket::FourToSeven,
        DurationBucket::EightToFourteen,
        DurationBucket::FifteenPlus,
    ];

    pub fn label(&self) -> &'static str {
        match self {
            DurationBucket::Any => "All",
            DurationBucket::UpToThree => "1-3 Days",
            DurationBucket::FourToSeven => "4-7 Days",
            DurationBucket::EightToFourteen => "8-14 Days",
            DurationBucket::FifteenPlus => "15+ Days",
        }
    }

    /// Whether a tour lasting `days` falls in this bucket.
    pub fn contains(&self, days: u32) -> bool {
        match self {
            DurationBucket::Any => true,
            DurationBucket::UpToThree => days <= 3,
            DurationBucket::FourToSeven => (4..=7).contains(&days),
            DurationBucket::EightToFourteen => (8..=14).contains(&days),
            DurationBucket::FifteenPlus => days >= 15,
        }
    }
}

#[derive(Debug, Serialize, Deserialize, Clone, Copy, PartialEq, Eq, Default)]
pub enum PriceBucket {
    #[default]
    #[serde(rename = "All", alias = "")]
    Any,
    #[serde(rename = "Under $1000")]
    Under1000,
    #[serde(rename = "$1000-$2000")]
    From1000To2000,
    #[serde(rename = "Over $2000")]
    Over2000,
}

impl PriceBucket {
    pub const ALL: [PriceBucket; 4] = [
        PriceBucket::Any,
        PriceBucket::Under1000,
        PriceBucket::From1000To2000,
        PriceBucket::Over2000,
    ];

    pub fn label(&self) -> &'static str {
        match self {
            PriceBucket::Any => "All",
            PriceBucket::Under1000 => "Under $1000",
            PriceBucket::From1000To2000 => "$1000-$2000",
            PriceBucket::Over2000 => "Over $2000",
        }
    }

    /// Whether a whole-dollar `price` falls in this bucket.
    pub fn contains(&self, price: u64) -> bool {
        match self {
            PriceBucket::Any => true,
            PriceBucket::Under1000 => price < 1000,
            PriceBucket::From1000To2000 => (1000..=2000).contains(&price),
            PriceBucket::Over2000 => price > 2000,
        }
    }
}

/// User-entered catalog filters. Every field defaults to "no filter".
#[derive(Debug, Serialize, Deserialize, Clone, Default, PartialEq)]
#[serde(default)]
pub struct FilterCriteria {
    pub search: String,
    pub activity: Option<String>,
    pub duration: DurationBucket,
    pub price: PriceBucket,
}

impl FilterCriteria {
    /// The activity to match on, or `None` when the filter is unset or "All".
    /// Matched exactly as sent; only `""` and `"All"` switch the filter off.
    pub fn active_activity(&self) -> Option<&str> {
        match self.activity.as_deref() {
            None | Some("") | Some("All") => None,
            Some(activity) => Some(activity),
        }
    }
}

/// The choices a client offers for each filter.
#[derive(Debug, Serialize, Clone)]
#[serde(rename_all = "camelCase")]
pub struct FilterOptions {
    pub activities: Vec<String>,
    pub durations: Vec<&'static str>,
    pub price_ranges: Vec<&'static str>,
}
