//! Trip domain records as exported by the trip-management backend
//!
//! The backend payloads are loosely typed: ids arrive as strings or numbers,
//! coordinates and costs as numeric strings, and list fields are sometimes
//! missing or `null`. Deserialization is lenient at this boundary so a single
//! odd record never prevents the rest of a snapshot from loading.

use serde::de::DeserializeOwned;
use serde::{Deserialize, Deserializer, Serialize};
use serde_json::Value;

/// A user-planned journey with its nested accommodations, activities and legs
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct Trip {
    #[serde(default, deserialize_with = "text_or_number")]
    pub id: Option<String>,
    #[serde(default, deserialize_with = "text_or_number")]
    pub trip_id: Option<String>,
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub destination: Option<String>,
    /// ISO date or datetime
    #[serde(default)]
    pub start_date: Option<String>,
    /// ISO date or datetime
    #[serde(default)]
    pub end_date: Option<String>,
    #[serde(default, deserialize_with = "number_only")]
    pub budget: Option<f64>,
    #[serde(default, deserialize_with = "number_only")]
    pub spent: Option<f64>,
    #[serde(default)]
    pub creator_username: Option<String>,
    #[serde(default, deserialize_with = "lenient_list")]
    pub participant_usernames: Option<Vec<String>>,
    /// Free-form preference payload, never interpreted here
    #[serde(default)]
    pub preferences: Option<Value>,
    #[serde(default, deserialize_with = "lenient_list")]
    pub accommodations: Option<Vec<Accommodation>>,
    #[serde(default, deserialize_with = "lenient_list")]
    pub activity_list: Option<Vec<Activity>>,
    #[serde(default, deserialize_with = "lenient_list")]
    pub travel_list: Option<Vec<Travel>>,
    #[serde(default, deserialize_with = "count_only")]
    pub babies: Option<u32>,
    #[serde(default, deserialize_with = "count_only")]
    pub pets: Option<u32>,
}

impl Trip {
    /// Accommodations, empty when the list is absent
    pub fn accommodations(&self) -> &[Accommodation] {
        self.accommodations.as_deref().unwrap_or(&[])
    }

    /// Activities, empty when the list is absent
    pub fn activities(&self) -> &[Activity] {
        self.activity_list.as_deref().unwrap_or(&[])
    }

    /// Travel legs, empty when the list is absent
    pub fn travels(&self) -> &[Travel] {
        self.travel_list.as_deref().unwrap_or(&[])
    }

    /// Identity used for deduplication and lookup: `id`, then `tripId`
    pub fn key(&self) -> Option<&str> {
        self.id.as_deref().or(self.trip_id.as_deref())
    }
}

/// A place to stay, priced per night
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct Accommodation {
    #[serde(default, deserialize_with = "text_or_number")]
    pub id: Option<String>,
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub address: String,
    #[serde(default, deserialize_with = "text_or_number")]
    pub latitude: Option<String>,
    #[serde(default, deserialize_with = "text_or_number")]
    pub longitude: Option<String>,
    #[serde(default)]
    pub check_in_date: Option<String>,
    #[serde(default)]
    pub check_out_date: Option<String>,
    /// Nightly rate per adult
    #[serde(default, deserialize_with = "number_only")]
    pub price_for_adult: Option<f64>,
    /// Nightly rate per child
    #[serde(default, deserialize_with = "number_only")]
    pub price_for_child: Option<f64>,
    /// Nightly rate per pet
    #[serde(default, deserialize_with = "number_only")]
    pub price_for_pet: Option<f64>,
    #[serde(default)]
    pub allows_pets: Option<bool>,
}

impl Accommodation {
    /// Sum of the nightly rates that are present
    pub fn nightly_rate(&self) -> f64 {
        [self.price_for_adult, self.price_for_child, self.price_for_pet]
            .into_iter()
            .flatten()
            .sum()
    }
}

/// Activity category; unknown labels collapse into `Other`
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum ActivityCategory {
    Sightseeing,
    Food,
    Sport,
    Entertainment,
    #[default]
    Other,
}

impl ActivityCategory {
    pub const ALL: [ActivityCategory; 5] = [
        ActivityCategory::Sightseeing,
        ActivityCategory::Food,
        ActivityCategory::Sport,
        ActivityCategory::Entertainment,
        ActivityCategory::Other,
    ];

    pub fn from_label(label: &str) -> Self {
        match label.trim().to_ascii_lowercase().as_str() {
            "sightseeing" => Self::Sightseeing,
            "food" => Self::Food,
            "sport" => Self::Sport,
            "entertainment" => Self::Entertainment,
            _ => Self::Other,
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            Self::Sightseeing => "sightseeing",
            Self::Food => "food",
            Self::Sport => "sport",
            Self::Entertainment => "entertainment",
            Self::Other => "other",
        }
    }
}

impl<'de> Deserialize<'de> for ActivityCategory {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let value = Option::<Value>::deserialize(deserializer)?;
        Ok(match value {
            Some(Value::String(label)) => Self::from_label(&label),
            _ => Self::Other,
        })
    }
}

/// A planned itinerary item
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct Activity {
    #[serde(default, deserialize_with = "text_or_number")]
    pub id: Option<String>,
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub category: ActivityCategory,
    /// Only JSON numbers count; numeric strings are not coerced
    #[serde(default, deserialize_with = "number_only")]
    pub cost: Option<f64>,
    #[serde(default)]
    pub activity_date: Option<String>,
}

/// One point-to-point leg of a trip
///
/// Distance, duration and cost stay human-readable text; they are parsed
/// where they are used.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct Travel {
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub transport: String,
    #[serde(default, deserialize_with = "text_or_number")]
    pub from_lat: Option<String>,
    #[serde(default, deserialize_with = "text_or_number")]
    pub from_lng: Option<String>,
    #[serde(default, deserialize_with = "text_or_number")]
    pub to_lat: Option<String>,
    #[serde(default, deserialize_with = "text_or_number")]
    pub to_lng: Option<String>,
    #[serde(default)]
    pub departure_date: Option<String>,
    #[serde(default)]
    pub arrival_date: Option<String>,
    /// e.g. "12 hours 25 mins"
    #[serde(default)]
    pub estimated_duration: Option<String>,
    /// e.g. "1,275 km"
    #[serde(default, deserialize_with = "text_or_number")]
    pub distance: Option<String>,
    #[serde(default, deserialize_with = "text_or_number")]
    pub estimated_cost: Option<String>,
}

// ========== lenient field readers ==========

/// Accept a JSON number; anything else reads as absent
fn number_only<'de, D: Deserializer<'de>>(deserializer: D) -> Result<Option<f64>, D::Error> {
    let value = Option::<Value>::deserialize(deserializer)?;
    Ok(value.and_then(|v| v.as_f64()))
}

/// Accept a non-negative integral JSON number
fn count_only<'de, D: Deserializer<'de>>(deserializer: D) -> Result<Option<u32>, D::Error> {
    let value = Option::<Value>::deserialize(deserializer)?;
    Ok(value
        .and_then(|v| v.as_u64())
        .and_then(|n| u32::try_from(n).ok()))
}

/// Accept a string or a number, keeping it as text
fn text_or_number<'de, D: Deserializer<'de>>(deserializer: D) -> Result<Option<String>, D::Error> {
    let value = Option::<Value>::deserialize(deserializer)?;
    Ok(match value {
        Some(Value::String(s)) => Some(s),
        Some(Value::Number(n)) => Some(n.to_string()),
        _ => None,
    })
}

/// Non-array values read as absent; unreadable elements are dropped
fn lenient_list<'de, D, T>(deserializer: D) -> Result<Option<Vec<T>>, D::Error>
where
    D: Deserializer<'de>,
    T: DeserializeOwned,
{
    let value = Option::<Value>::deserialize(deserializer)?;
    Ok(match value {
        Some(Value::Array(items)) => Some(
            items
                .into_iter()
                .filter_map(|item| serde_json::from_value(item).ok())
                .collect(),
        ),
        _ => None,
    })
}
