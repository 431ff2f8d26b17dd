use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::errors::{Result, TripError};

/// ========================================
/// Trip request / itinerary data model
/// ========================================

pub const MIN_DAYS: u32 = 1;
pub const MAX_DAYS: u32 = 30;

/// One submission of the trip form. Built fresh per user action and never
/// mutated afterwards. Deserialization goes through [`ItineraryRequest::new`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "RawRequest")]
pub struct ItineraryRequest {
    source_city: String,
    destination_city: String,
    day_count: u32,
    preferences: String,
}

#[derive(Deserialize)]
struct RawRequest {
    source_city: String,
    destination_city: String,
    day_count: u32,
    preferences: String,
}

impl TryFrom<RawRequest> for ItineraryRequest {
    type Error = TripError;

    fn try_from(raw: RawRequest) -> Result<Self> {
        Self::new(&raw.source_city, &raw.destination_city, raw.day_count, &raw.preferences)
    }
}

impl ItineraryRequest {
    pub fn new(
        source_city: &str,
        destination_city: &str,
        day_count: u32,
        preferences: &str,
    ) -> Result<Self> {
        let source_city = source_city.trim();
        let destination_city = destination_city.trim();
        let preferences = preferences.trim();

        if source_city.is_empty() || destination_city.is_empty() || preferences.is_empty() {
            return Err(TripError::Validation("Please complete all the fields.".into()));
        }
        if !(MIN_DAYS..=MAX_DAYS).contains(&day_count) {
            return Err(TripError::Validation(format!(
                "Number of days must be between {MIN_DAYS} and {MAX_DAYS} (got {day_count})."
            )));
        }

        Ok(Self {
            source_city: source_city.to_string(),
            destination_city: destination_city.to_string(),
            day_count,
            preferences: preferences.to_string(),
        })
    }

    pub fn source_city(&self) -> &str {
        &self.source_city
    }

    pub fn destination_city(&self) -> &str {
        &self.destination_city
    }

    pub fn day_count(&self) -> u32 {
        self.day_count
    }

    pub fn preferences(&self) -> &str {
        &self.preferences
    }
}

/// How the generation service is asked to delimit days.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum OutputFormat {
    /// Free markdown with `Day X: [Title]` headings.
    #[default]
    Headings,
    /// Each day additionally opens with a `[[DAY n]]` marker line.
    Tagged,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DaySection {
    pub index: u32,
    pub title: String,
    pub body: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "status", rename_all = "lowercase")]
pub enum DaySlot {
    Section(DaySection),
    /// No heading for this day index was found in the generated text.
    Absent,
}

impl DaySlot {
    pub fn section(&self) -> Option<&DaySection> {
        match self {
            DaySlot::Section(s) => Some(s),
            DaySlot::Absent => None,
        }
    }

    pub fn is_absent(&self) -> bool {
        matches!(self, DaySlot::Absent)
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Itinerary {
    pub request: ItineraryRequest,
    pub generated_at: DateTime<Utc>,
    pub provider: String,
    pub model: String,
    pub format: OutputFormat,
    pub days: Vec<(u32, DaySlot)>,
    /// Day indices whose matched heading carried a longer numeral (e.g. day 1
    /// picked up "Day 10").
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub ambiguous: Vec<u32>,
}

impl Itinerary {
    pub fn found(&self) -> usize {
        self.days.iter().filter(|(_, d)| !d.is_absent()).count()
    }

    pub fn missing(&self) -> usize {
        self.days.len() - self.found()
    }
}
