//! Day-by-day travel itineraries from a generative language model.
//!
//! A trip request is rendered into a prompt, sent once to a text-generation
//! [`provider`], and the returned text is bucketed into per-day sections by
//! [`split`].

pub mod assets;
pub mod cli;
pub mod config;
pub mod errors;
pub mod log;
pub mod planner;
pub mod prompt;
pub mod provider;
pub mod split;
pub mod ux;
pub mod wire;

pub use errors::{Result, TripError};
pub use planner::{plan_trip, Generation, PlanOptions};
pub use split::{split, split_tagged};
pub use wire::{DaySection, DaySlot, Itinerary, ItineraryRequest, OutputFormat};
