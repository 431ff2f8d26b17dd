use clap::Parser;
use fs_err as fs;
use std::path::Path;
use std::time::Duration;
use uuid::Uuid;

use trip_planner::cli::Args;
use trip_planner::config::Config;
use trip_planner::wire::ItineraryRequest;
use trip_planner::{assets, log, planner, provider, ux, TripError};

fn fail(err: &TripError) -> ! {
    eprintln!("{}", ux::error_line(err));
    std::process::exit(1);
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let args = Args::parse();
    log::init_tracing(args.debug);

    // Configuration problems (including a missing credential) stop us before
    // the form is shown.
    let mut cfg = Config::load(&args)?;
    cfg.resolve_api_key(|name| std::env::var(name).ok())?;
    let prov = provider::make_provider(&cfg)?;

    let animation = match reqwest::Client::builder().timeout(Duration::from_secs(5)).build() {
        Ok(client) => assets::fetch_animation(&client, &cfg.animation_url).await,
        Err(_) => None,
    };
    if !args.json {
        ux::show_banner(animation.as_ref());
    }

    let source = ux::field_or_prompt(args.source.clone(), "📍 Source City")?;
    let destination = ux::field_or_prompt(args.destination.clone(), "🏙️ Destination City")?;
    let preferences = ux::field_or_prompt(
        args.preferences.clone(),
        "💡 Preferences (e.g., nature, nightlife, food, history)",
    )?;

    let req = match ItineraryRequest::new(&source, &destination, args.days, &preferences) {
        Ok(r) => r,
        Err(e) => fail(&e),
    };

    let opts = planner::PlanOptions {
        format: cfg.format,
        currency: cfg.currency.clone(),
        prompt_template: cfg.prompt_template.clone(),
    };

    let spinner = (!args.json).then(|| ux::spinner(assets::tick_interval(animation.as_ref())));
    let result = planner::plan_trip(prov.as_ref(), &req, &opts).await;
    if let Some(pb) = spinner {
        pb.finish_and_clear();
    }
    let generation = match result {
        Ok(g) => g,
        Err(e) => fail(&e),
    };

    let run = Uuid::new_v4();
    let saved = log::save_run(Path::new(&cfg.out_dir), run, &generation, args.save_request, args.save_response)?;
    for line in log::describe(&saved) {
        eprintln!("saved: {line}");
    }

    if let Some(out) = &args.output {
        fs::write(out, ux::to_markdown(&generation.itinerary))?;
        eprintln!("markdown written to {out}");
    }

    if args.json {
        println!("{}", serde_json::to_string_pretty(&generation.itinerary)?);
    } else {
        ux::print_itinerary(&generation.itinerary);
    }

    Ok(())
}
