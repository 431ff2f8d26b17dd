use clap::{Parser, ValueEnum};
use serde::{Deserialize, Serialize};

use crate::wire::{MAX_DAYS, MIN_DAYS};

#[derive(ValueEnum, Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ProviderKind {
    #[default]
    #[value(alias = "google")]
    Gemini,
    #[value(name = "openai", alias = "open-ai")]
    OpenAI,
    Ollama,
}

#[derive(Parser, Debug)]
#[command(name = "trip_planner", version, about = "Plan your journey in seconds: day-by-day travel itineraries from a generative language model")]
pub struct Args {
    /// Source city (asked interactively when omitted)
    #[arg(long)]
    pub source: Option<String>,

    /// Destination city (asked interactively when omitted)
    #[arg(long)]
    pub destination: Option<String>,

    #[arg(long, default_value_t = 3, value_parser = clap::value_parser!(u32).range(MIN_DAYS as i64..=MAX_DAYS as i64))]
    pub days: u32,

    /// Free-text preferences, e.g. "nature, nightlife, food, history"
    #[arg(long)]
    pub preferences: Option<String>,

    #[arg(long, value_enum)]
    pub provider: Option<ProviderKind>,

    #[arg(long)]
    pub model: Option<String>,

    #[arg(long)]
    pub config: Option<String>,

    /// Ask the model for `[[DAY n]]` markers instead of relying on headings only
    #[arg(long, default_value_t = false)]
    pub structured: bool,

    /// Print the parsed itinerary as JSON
    #[arg(long, default_value_t = false)]
    pub json: bool,

    /// Also write the itinerary as markdown to this file
    #[arg(long)]
    pub output: Option<String>,

    #[arg(long, default_value_t = false)]
    pub save_request: bool,

    #[arg(long, default_value_t = false)]
    pub save_response: bool,

    #[arg(long, default_value_t = false)]
    pub no_animation: bool,

    #[arg(long, default_value_t = false)]
    pub debug: bool,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_full_form() {
        let args = Args::try_parse_from([
            "trip_planner", "--source", "Pune", "--destination", "Udaipur", "--days", "5",
            "--preferences", "lakes", "--provider", "ollama", "--structured",
        ])
        .unwrap();
        assert_eq!(args.source.as_deref(), Some("Pune"));
        assert_eq!(args.days, 5);
        assert_eq!(args.provider, Some(ProviderKind::Ollama));
        assert!(args.structured);
    }

    #[test]
    fn days_default_and_range() {
        let args = Args::try_parse_from(["trip_planner"]).unwrap();
        assert_eq!(args.days, 3);
        assert!(Args::try_parse_from(["trip_planner", "--days", "0"]).is_err());
        assert!(Args::try_parse_from(["trip_planner", "--days", "31"]).is_err());
        assert!(Args::try_parse_from(["trip_planner", "--days", "30"]).is_ok());
    }

    #[test]
    fn provider_aliases() {
        let args = Args::try_parse_from(["trip_planner", "--provider", "google"]).unwrap();
        assert_eq!(args.provider, Some(ProviderKind::Gemini));
        let args = Args::try_parse_from(["trip_planner", "--provider", "open-ai"]).unwrap();
        assert_eq!(args.provider, Some(ProviderKind::OpenAI));
        let args = Args::try_parse_from(["trip_planner", "--provider", "openai"]).unwrap();
        assert_eq!(args.provider, Some(ProviderKind::OpenAI));
    }
}
