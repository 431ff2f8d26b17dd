use regex::{Captures, Regex};
use std::sync::OnceLock;

use crate::wire::{ItineraryRequest, OutputFormat};

pub const DEFAULT_CURRENCY: &str = "Indian Rupees (₹)";

fn day_checklist(currency: &str) -> String {
    format!(
r#"For each day, include:
- A title for the day (e.g., "Exploring Old Town")
- Morning, afternoon, and evening plans with specific attractions or activities
- Names of local restaurants or cafés for meals
- Suggested hotels with 1-2 budget options
- Transportation details (e.g., Uber, walking, train) between major points
- Local tips (e.g., cultural etiquette, weather, packing suggestions)
- Estimated cost breakdown for the day in {currency}
- Any hidden gems or offbeat suggestions"#
    )
}

pub fn tagged_rules() -> &'static str {
r#"Day markers (MANDATORY):
- Put a line containing exactly `[[DAY n]]` (n = day number, e.g. `[[DAY 1]]`) immediately before each day's heading.
- Emit each marker once, in ascending order, and never inside the day's content."#
}

/// Default travel-planner prompt for one trip request.
pub fn itinerary_prompt(req: &ItineraryRequest, format: OutputFormat, currency: &str) -> String {
    let mut prompt = format!(
"You are a world-class travel planner.

Create a detailed and structured {days}-day travel itinerary from {source} to {destination} based on the following traveler preferences: {preferences}.

{checklist}

Format each day clearly under a heading: \"Day X: [Title]\"
Use markdown to structure the response (with bullet points, subheadings).
Keep the writing friendly, detailed, and practical.",
        days = req.day_count(),
        source = req.source_city(),
        destination = req.destination_city(),
        preferences = req.preferences(),
        checklist = day_checklist(currency),
    );

    if format == OutputFormat::Tagged {
        prompt.push_str("\n\n");
        prompt.push_str(tagged_rules());
    }
    prompt
}

fn placeholder_regex() -> &'static Regex {
    static PLACEHOLDER: OnceLock<Regex> = OnceLock::new();
    PLACEHOLDER.get_or_init(|| Regex::new(r"\{([a-z_]+)\}").expect("placeholder pattern is valid"))
}

/// Renders a caller-supplied template. `{source}`, `{destination}`, `{days}`,
/// `{preferences}` and `{currency}` are substituted; any other `{name}` is
/// left as written.
pub fn render_template(template: &str, req: &ItineraryRequest, currency: &str) -> String {
    placeholder_regex()
        .replace_all(template, |caps: &Captures| match &caps[1] {
            "source" => req.source_city().to_string(),
            "destination" => req.destination_city().to_string(),
            "days" => req.day_count().to_string(),
            "preferences" => req.preferences().to_string(),
            "currency" => currency.to_string(),
            _ => caps[0].to_string(),
        })
        .into_owned()
}
