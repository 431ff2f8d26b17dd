use colored::Colorize;
use indicatif::{ProgressBar, ProgressStyle};
use std::fmt::Write as _;
use std::io::{self, BufRead, Write};
use std::time::Duration;

use crate::assets::Animation;
use crate::errors::TripError;
use crate::wire::{DaySlot, Itinerary};

pub fn show_banner(animation: Option<&Animation>) {
    println!("\n{}", "🧳 AI Trip Planner".bold().blue());
    println!("{}", "Plan your journey in seconds ✨".cyan());
    if let Some(a) = animation {
        if !a.name.is_empty() {
            println!("{}", format!("({} · {:.0} fps)", a.name, a.frame_rate).dimmed());
        }
    }
    println!();
}

/// Reads one trimmed line from `input` after printing `label`.
pub fn read_field<R: BufRead>(input: &mut R, label: &str) -> io::Result<String> {
    print!("{label}: ");
    io::stdout().flush()?;
    let mut s = String::new();
    input.read_line(&mut s)?;
    Ok(s.trim().to_string())
}

/// Uses `given` when present, otherwise asks on stdin.
pub fn field_or_prompt(given: Option<String>, label: &str) -> io::Result<String> {
    match given {
        Some(v) => Ok(v),
        None => read_field(&mut io::stdin().lock(), label),
    }
}

pub fn spinner(tick: Duration) -> ProgressBar {
    let pb = ProgressBar::new_spinner();
    if let Ok(style) = ProgressStyle::with_template("{spinner:.cyan} {msg}") {
        pb.set_style(style.tick_chars("🌍🌎🌏✓"));
    }
    pb.set_message("🧠 Thinking... generating your dream trip!");
    pb.enable_steady_tick(tick);
    pb
}

pub fn not_found_notice(index: u32) -> String {
    format!("Day {index} not found in the response.")
}

pub fn print_itinerary(it: &Itinerary) {
    println!("{}", "🎉 Your trip itinerary is ready!".green().bold());
    println!("\n{}\n", "🗓️  Your Detailed Itinerary".bold());

    for (index, slot) in &it.days {
        match slot {
            DaySlot::Section(s) => {
                println!("{}", format!("📅 {}", s.title).bold().blue());
                println!("{}\n", s.body);
            }
            DaySlot::Absent => {
                println!("{}\n", format!("⚠️  {}", not_found_notice(*index)).yellow());
            }
        }
    }

    for index in &it.ambiguous {
        println!(
            "{}",
            format!("note: Day {index} matched a heading with a longer day number; its section may belong to another day.")
                .dimmed()
        );
    }
}

pub fn to_markdown(it: &Itinerary) -> String {
    let req = &it.request;
    let mut md = String::new();
    let _ = writeln!(md, "# Trip: {} → {}\n", req.source_city(), req.destination_city());
    let _ = writeln!(
        md,
        "_{} days · preferences: {} · generated {} by {} ({})_\n",
        req.day_count(),
        req.preferences(),
        it.generated_at.format("%Y-%m-%d %H:%M UTC"),
        it.provider,
        it.model
    );
    for (index, slot) in &it.days {
        match slot {
            DaySlot::Section(s) => {
                let _ = writeln!(md, "## {}\n\n{}\n", s.title, s.body);
            }
            DaySlot::Absent => {
                let _ = writeln!(md, "## Day {index}\n\n> {}\n", not_found_notice(*index));
            }
        }
    }
    md
}

/// Terminal rendering of a failed submission.
pub fn error_line(err: &TripError) -> String {
    if err.is_validation() {
        format!("⚠️  {err}")
    } else {
        format!("❌ Error: {err}")
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::split;
    use crate::wire::{ItineraryRequest, OutputFormat};
    use chrono::{TimeZone, Utc};
    use std::io::Cursor;

    fn itinerary() -> Itinerary {
        let raw = "Day 1: Arrival\nVisit the fort.\nDay 3: Lakes\nBoat ride.";
        Itinerary {
            request: ItineraryRequest::new("Delhi", "Udaipur", 3, "lakes").unwrap(),
            generated_at: Utc.with_ymd_and_hms(2024, 5, 1, 9, 30, 0).unwrap(),
            provider: "gemini".into(),
            model: "gemini-1.5-pro".into(),
            format: OutputFormat::Headings,
            days: split::split(raw, 3),
            ambiguous: Vec::new(),
        }
    }

    #[test]
    fn markdown_lists_every_day() {
        let md = to_markdown(&itinerary());
        assert!(md.starts_with("# Trip: Delhi → Udaipur\n"));
        assert!(md.contains("generated 2024-05-01 09:30 UTC by gemini (gemini-1.5-pro)"));
        assert!(md.contains("## Day 1\n\nArrival\nVisit the fort.\n"));
        assert!(md.contains("## Day 2\n\n> Day 2 not found in the response.\n"));
        assert!(md.contains("## Day 3\n\nLakes\nBoat ride.\n"));
    }

    #[test]
    fn reads_trimmed_field() {
        let mut input = Cursor::new("  Jaipur  \n");
        assert_eq!(read_field(&mut input, "Destination").unwrap(), "Jaipur");
        let mut empty = Cursor::new("");
        assert_eq!(read_field(&mut empty, "Source").unwrap(), "");
    }

    #[test]
    fn error_lines_by_kind() {
        let v = TripError::Validation("Please complete all the fields.".into());
        assert_eq!(error_line(&v), "⚠️  Please complete all the fields.");
        let p = TripError::Provider("bad key".into());
        assert_eq!(error_line(&p), "❌ Error: provider error: bad key");
    }
}
