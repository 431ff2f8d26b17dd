use fs_err as fs;
use humansize::{format_size, DECIMAL};
use serde_json::to_string_pretty;
use std::path::{Path, PathBuf};
use tracing::info;
use tracing_subscriber::EnvFilter;
use uuid::Uuid;

use crate::errors::Result;
use crate::planner::Generation;

/// Logs go to stderr so stdout stays clean for `--json`. `RUST_LOG` wins over
/// the `--debug` default.
pub fn init_tracing(debug: bool) {
    let default = if debug { "trip_planner=debug,info" } else { "warn" };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default));
    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(debug)
        .try_init();
}

/// Files written for one run.
#[derive(Debug)]
pub struct SavedPaths {
    pub dir: PathBuf,
    pub request: Option<PathBuf>,
    pub response: Option<PathBuf>,
    pub itinerary: Option<PathBuf>,
}

pub fn run_dir(out_dir: &Path, run: Uuid) -> PathBuf {
    out_dir.join("runs").join(run.to_string())
}

fn write(path: PathBuf, contents: &str) -> Result<PathBuf> {
    fs::write(&path, contents)?;
    info!(path = %path.display(), size = %format_size(contents.len(), DECIMAL), "artifact saved");
    Ok(path)
}

/// Saves the prompt (`request.txt`), the raw generated text (`response.txt`)
/// and the parsed itinerary (`itinerary.json`) under `<out_dir>/runs/<run>/`.
pub fn save_run(
    out_dir: &Path,
    run: Uuid,
    generation: &Generation,
    save_request: bool,
    save_response: bool,
) -> Result<SavedPaths> {
    let dir = run_dir(out_dir, run);
    let mut saved = SavedPaths { dir: dir.clone(), request: None, response: None, itinerary: None };
    if !save_request && !save_response {
        return Ok(saved);
    }
    fs::create_dir_all(&dir)?;

    if save_request {
        saved.request = Some(write(dir.join("request.txt"), &generation.prompt)?);
    }
    if save_response {
        saved.response = Some(write(dir.join("response.txt"), &generation.raw)?);
        saved.itinerary = Some(write(dir.join("itinerary.json"), &to_string_pretty(&generation.itinerary)?)?);
    }
    Ok(saved)
}

pub fn describe(saved: &SavedPaths) -> Vec<String> {
    [&saved.request, &saved.response, &saved.itinerary]
        .into_iter()
        .flatten()
        .map(|p| {
            let size = fs::metadata(p).map(|m| format_size(m.len(), DECIMAL)).unwrap_or_else(|_| "?".into());
            format!("{} ({size})", p.display())
        })
        .collect()
}
