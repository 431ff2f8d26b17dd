//! Buckets generated itinerary text into per-day sections.
//!
//! The generation service is asked to head each day with `Day X: [Title]`.
//! Nothing guarantees it does, so every function here is best-effort: a day
//! that cannot be located comes back as [`DaySlot::Absent`] and nothing fails.

use regex::Regex;
use std::sync::OnceLock;
use tracing::warn;

use crate::wire::{DaySection, DaySlot, OutputFormat};

/// Literal heading marker the generated text is partitioned on.
pub const HEADING_MARKER: &str = "Day ";

fn day_title(index: u32) -> String {
    format!("{HEADING_MARKER}{index}")
}

/// Fragments following each occurrence of the heading marker; whatever
/// precedes the first marker is dropped.
fn fragments(text: &str) -> impl Iterator<Item = &str> {
    text.split(HEADING_MARKER).skip(1)
}

/// First fragment (in text order) whose trimmed start is the numeral of `index`.
/// "1" also matches "10", "12", ... and the earliest fragment wins.
fn locate<'a>(text: &'a str, numeral: &str) -> Option<&'a str> {
    fragments(text).find(|f| f.trim_start().starts_with(numeral))
}

/// Drops the numeral and the heading separator, returning the trimmed rest.
fn section_body(fragment: &str, numeral: &str) -> String {
    let rest = fragment.trim_start();
    let rest = rest.strip_prefix(numeral).unwrap_or(rest).trim_start();
    let rest = rest.strip_prefix(':').unwrap_or(rest);
    rest.trim().to_string()
}

fn has_longer_numeral(fragment: &str, numeral: &str) -> bool {
    fragment
        .trim_start()
        .get(numeral.len()..)
        .and_then(|rest| rest.chars().next())
        .is_some_and(|c| c.is_ascii_digit())
}

/// Heading-split result for one day, plus whether the chosen fragment
/// carried a longer numeral than the day itself.
fn heading_slot(text: &str, index: u32) -> (DaySlot, bool) {
    let numeral = index.to_string();
    match locate(text, &numeral) {
        Some(fragment) => (
            DaySlot::Section(DaySection {
                index,
                title: day_title(index),
                body: section_body(fragment, &numeral),
            }),
            has_longer_numeral(fragment, &numeral),
        ),
        None => (DaySlot::Absent, false),
    }
}

fn warn_ambiguous(index: u32) {
    warn!(day = index, "day heading matched a longer numeral; section may belong to another day");
}

/// Splits `text` into exactly `day_count` entries, ordered by day index.
///
/// Matching is by numeral prefix, so with more than nine days the heading for
/// day 10 can be picked up for day 1 when it appears first. That behavior is
/// kept as is; affected days are reported through [`ambiguous_days`] and a
/// warning.
pub fn split(text: &str, day_count: u32) -> Vec<(u32, DaySlot)> {
    (1..=day_count)
        .map(|index| {
            let (slot, ambiguous) = heading_slot(text, index);
            if ambiguous {
                warn_ambiguous(index);
            }
            (index, slot)
        })
        .collect()
}

/// Day indices for which [`split`] selected a heading with a longer numeral
/// than the day itself (e.g. `Day 12` chosen for day 1).
pub fn ambiguous_days(text: &str, day_count: u32) -> Vec<u32> {
    (1..=day_count)
        .filter(|index| {
            let numeral = index.to_string();
            locate(text, &numeral).is_some_and(|f| has_longer_numeral(f, &numeral))
        })
        .collect()
}

fn marker_regex() -> &'static Regex {
    static MARKER: OnceLock<Regex> = OnceLock::new();
    MARKER.get_or_init(|| {
        Regex::new(r"(?m)^[ \t]*\[\[DAY[ \t]+(\d+)\]\][ \t]*\r?$").expect("marker pattern is valid")
    })
}

fn heading_line_regex() -> &'static Regex {
    static HEADING: OnceLock<Regex> = OnceLock::new();
    HEADING.get_or_init(|| Regex::new(r"(?m)^[ \t#*]*Day (\d+)").expect("heading pattern is valid"))
}

/// Cuts a tagged block at the first line-leading `Day <m>` heading for a day
/// other than `index`, so an unmarked day is not swallowed by the one before.
fn own_block(block: &str, index: u32) -> &str {
    heading_line_regex()
        .captures_iter(block)
        .find(|caps| caps[1].parse::<u32>().map_or(true, |n| n != index))
        .and_then(|caps| caps.get(0))
        .map_or(block, |m| &block[..m.start()])
}

/// Removes a leading `Day <index>` heading (markdown emphasis allowed) from a
/// tagged block, keeping the title text that follows it.
fn strip_tagged_heading(block: &str, index: u32) -> String {
    let trimmed = block.trim();
    let unmarked = trimmed.trim_start_matches(|c: char| c == '#' || c == '*' || c == ' ');
    let Some(rest) = unmarked.strip_prefix(HEADING_MARKER) else {
        return trimmed.to_string();
    };
    let numeral = index.to_string();
    match rest.strip_prefix(numeral.as_str()) {
        Some(after) if !after.starts_with(|c: char| c.is_ascii_digit()) => {
            let after = after.trim_start_matches('*').trim_start();
            let after = after.strip_prefix(':').unwrap_or(after);
            after.trim_start_matches('*').trim().to_string()
        }
        _ => trimmed.to_string(),
    }
}

/// Splits text that uses `[[DAY n]]` marker lines.
///
/// Returns `None` when the text carries no marker at all, so callers can fall
/// back to [`split`]. Markers are matched by exact number; the first marker
/// for a day wins. A block ends at the next marker or at a heading line for
/// another day. Days without a marker are `Absent` here; [`parse`] fills
/// them from the heading split.
pub fn split_tagged(text: &str, day_count: u32) -> Option<Vec<(u32, DaySlot)>> {
    let markers: Vec<(u32, usize, usize)> = marker_regex()
        .captures_iter(text)
        .filter_map(|caps| {
            let whole = caps.get(0)?;
            let n = caps.get(1)?.as_str().parse::<u32>().ok()?;
            Some((n, whole.start(), whole.end()))
        })
        .collect();

    if markers.is_empty() {
        return None;
    }

    let days = (1..=day_count)
        .map(|index| {
            let slot = markers
                .iter()
                .position(|(n, _, _)| *n == index)
                .map(|pos| {
                    let start = markers[pos].2;
                    let end = markers.get(pos + 1).map(|m| m.1).unwrap_or(text.len());
                    DaySlot::Section(DaySection {
                        index,
                        title: day_title(index),
                        body: strip_tagged_heading(own_block(&text[start..end], index), index),
                    })
                })
                .unwrap_or(DaySlot::Absent);
            (index, slot)
        })
        .collect();

    Some(days)
}

/// Per-day sections together with the days whose heading match was ambiguous.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Parsed {
    pub days: Vec<(u32, DaySlot)>,
    pub ambiguous: Vec<u32>,
}

fn heading_parse(text: &str, day_count: u32) -> Parsed {
    let mut ambiguous = Vec::new();
    let days = (1..=day_count)
        .map(|index| {
            let (slot, amb) = heading_slot(text, index);
            if amb {
                warn_ambiguous(index);
                ambiguous.push(index);
            }
            (index, slot)
        })
        .collect();
    Parsed { days, ambiguous }
}

/// Splits according to the format the generation service was asked for.
///
/// In the tagged format, marked days use their marker block and every other
/// day falls back to the heading split.
pub fn parse(text: &str, day_count: u32, format: OutputFormat) -> Parsed {
    let tagged = match format {
        OutputFormat::Headings => return heading_parse(text, day_count),
        OutputFormat::Tagged => split_tagged(text, day_count),
    };
    let Some(tagged) = tagged else {
        warn!("no [[DAY n]] markers in response; falling back to heading split");
        return heading_parse(text, day_count);
    };

    let mut ambiguous = Vec::new();
    let days = tagged
        .into_iter()
        .map(|(index, slot)| match slot {
            DaySlot::Absent => {
                let (slot, amb) = heading_slot(text, index);
                if amb {
                    warn_ambiguous(index);
                    ambiguous.push(index);
                }
                (index, slot)
            }
            found => (index, found),
        })
        .collect();
    Parsed { days, ambiguous }
}
