// src/import.rs
//
// Seeded teams from operator-supplied data: a `.json` / `.csv` file or an
// inline JSON string. Roster invariants are checked later, by `Roster`.

use std::error::Error;
use std::fs;
use std::path::Path;

use serde::Deserialize;

use crate::csv::Table;
use crate::league::Conference;
use crate::roster::SeededTeam;

/// One team as written by hand; seed may be a number or a numeric string.
#[derive(Debug, Deserialize)]
struct RawTeam {
    team_name: String,
    #[serde(default)]
    team_abbreviation: Option<String>,
    conference: String,
    seed: RawSeed,
}

#[derive(Debug, Deserialize)]
#[serde(untagged)]
enum RawSeed {
    Num(u8),
    Text(String),
}

#[derive(Debug, Deserialize)]
#[serde(untagged)]
enum RawDoc {
    List(Vec<RawTeam>),
    Wrapped { teams: Vec<RawTeam> },
}

fn to_seeded(i: usize, name: &str, abbr: Option<&str>, conf: &str, seed: Option<u8>) -> Result<SeededTeam, Box<dyn Error>> {
    let conference: Conference = conf
        .parse()
        .map_err(|e| format!("team #{}: {e}", i + 1))?;
    let seed = seed.ok_or_else(|| format!("team #{} ({name}): missing or invalid seed", i + 1))?;
    Ok(SeededTeam::new(name, abbr, conference, seed))
}

/// Array of team objects, or `{ "teams": [...] }`.
pub fn teams_from_json(text: &str) -> Result<Vec<SeededTeam>, Box<dyn Error>> {
    let raw = match serde_json::from_str::<RawDoc>(text)? {
        RawDoc::List(v) | RawDoc::Wrapped { teams: v } => v,
    };
    raw.iter()
        .enumerate()
        .map(|(i, t)| {
            let seed = match &t.seed {
                RawSeed::Num(n) => Some(*n),
                RawSeed::Text(s) => s.trim().parse().ok(),
            };
            to_seeded(i, &t.team_name, t.team_abbreviation.as_deref(), &t.conference, seed)
        })
        .collect()
}

/// Header row with `team_name,team_abbreviation,conference,seed` (any order).
pub fn teams_from_csv(text: &str) -> Result<Vec<SeededTeam>, Box<dyn Error>> {
    let Some(table) = Table::parse(text, ',') else {
        return Ok(Vec::new());
    };
    for col in ["team_name", "conference", "seed"] {
        if table.column(col).is_none() {
            return Err(format!("CSV header is missing '{col}'").into());
        }
    }
    table
        .rows
        .iter()
        .enumerate()
        .map(|(i, row)| {
            to_seeded(
                i,
                table.cell(row, "team_name"),
                Some(table.cell(row, "team_abbreviation")),
                table.cell(row, "conference"),
                table.cell(row, "seed").parse().ok(),
            )
        })
        .collect()
}

pub fn load_teams_file(path: &Path) -> Result<Vec<SeededTeam>, Box<dyn Error>> {
    let ext = path
        .extension()
        .and_then(|e| e.to_str())
        .map(|e| e.to_ascii_lowercase())
        .unwrap_or_default();
    if ext != "json" && ext != "csv" {
        return Err(format!("Unsupported file format: {} (use .json or .csv)", path.display()).into());
    }
    let text = fs::read_to_string(path)
        .map_err(|e| format!("Cannot read {}: {e}", path.display()))?;
    let teams = if ext == "json" { teams_from_json(&text)? } else { teams_from_csv(&text)? };
    logf!("Import: {} teams from {}", teams.len(), path.display());
    Ok(teams)
}
