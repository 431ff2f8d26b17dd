use chrono::Utc;
use tracing::{info, instrument};

use crate::errors::Result;
use crate::prompt;
use crate::provider::Provider;
use crate::split;
use crate::wire::{Itinerary, ItineraryRequest, OutputFormat};

#[derive(Debug, Clone)]
pub struct PlanOptions {
    pub format: OutputFormat,
    pub currency: String,
    /// Replaces the built-in prompt when set.
    pub prompt_template: Option<String>,
}

impl Default for PlanOptions {
    fn default() -> Self {
        Self {
            format: OutputFormat::Headings,
            currency: prompt::DEFAULT_CURRENCY.into(),
            prompt_template: None,
        }
    }
}

/// Prompt text for `req` under `opts`.
pub fn build_prompt(req: &ItineraryRequest, opts: &PlanOptions) -> String {
    match &opts.prompt_template {
        Some(t) => {
            let mut p = prompt::render_template(t, req, &opts.currency);
            if opts.format == OutputFormat::Tagged {
                p.push_str("\n\n");
                p.push_str(prompt::tagged_rules());
            }
            p
        }
        None => prompt::itinerary_prompt(req, opts.format, &opts.currency),
    }
}

/// Generated text together with the itinerary parsed from it.
#[derive(Debug, Clone)]
pub struct Generation {
    pub prompt: String,
    pub raw: String,
    pub itinerary: Itinerary,
}

/// One submission: prompt, a single call to the provider, then the split.
#[instrument(skip_all, fields(provider = provider.name(), days = req.day_count()))]
pub async fn plan_trip(
    provider: &dyn Provider,
    req: &ItineraryRequest,
    opts: &PlanOptions,
) -> Result<Generation> {
    let prompt = build_prompt(req, opts);
    let raw = provider.generate(&prompt).await?;

    let split::Parsed { days, ambiguous } = split::parse(&raw, req.day_count(), opts.format);

    let itinerary = Itinerary {
        request: req.clone(),
        generated_at: Utc::now(),
        provider: provider.name().to_string(),
        model: provider.model().to_string(),
        format: opts.format,
        days,
        ambiguous,
    };
    info!(found = itinerary.found(), missing = itinerary.missing(), "itinerary parsed");

    Ok(Generation { prompt, raw, itinerary })
}
