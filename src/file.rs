// src/file.rs

use std::{fs, io, path::{Path, PathBuf}};

use crate::bracket::Game;
use crate::config::options::ExportOptions;
use crate::csv::rows_to_string;

pub const EXPORT_HEADERS: [&str; 9] = [
    "Week", "Round", "Conference", "Away", "Away Seed", "Home", "Home Seed", "Winner", "Id",
];

fn export_row(g: &Game) -> Vec<String> {
    let seed = |s: Option<u8>| s.map(|v| v.to_string()).unwrap_or_default();
    vec![
        g.week.to_string(),
        g.round().map(|r| s!(r.label())).unwrap_or_default(),
        s!(g.conference.as_str()),
        g.away_team.clone(),
        seed(g.away_seed),
        g.home_team.clone(),
        seed(g.home_seed),
        g.winner.clone().unwrap_or_default(),
        g.id.clone(),
    ]
}

/// Export text for `games` (already filtered/sorted by the caller).
pub fn export_string(games: &[&Game], include_headers: bool, sep: char) -> String {
    let rows: Vec<Vec<String>> = games.iter().map(|g| export_row(g)).collect();
    let headers: Vec<String> = EXPORT_HEADERS.iter().map(|h| s!(*h)).collect();
    rows_to_string(&rows, include_headers.then_some(headers.as_slice()), sep)
}

/// Write one season's bracket per `ExportOptions`. Returns the path written.
pub fn write_bracket_export(
    export: &ExportOptions,
    season: u16,
    games: &[&Game],
) -> Result<PathBuf, Box<dyn std::error::Error>> {
    let path = export.out_path(season);
    if let Some(parent) = path.parent() {
        if !parent.as_os_str().is_empty() {
            ensure_directory(parent)?;
        }
    }
    fs::write(&path, export_string(games, export.include_headers, export.delim()))?;
    logf!("Export: {} games to {}", games.len(), path.display());
    Ok(path)
}

/// Ensure a directory exists (mkdir -p).
pub fn ensure_directory(dir: &Path) -> io::Result<()> {
    if dir.as_os_str().is_empty() {
        return Ok(());
    }
    fs::create_dir_all(dir)
}
