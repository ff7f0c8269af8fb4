// src/specs/espn.rs
//! ESPN playoff standings (`/nfl/standings/_/view/playoff`).
//!
//! Ground truth is the `__espnfitt__` hydration blob:
//! `…standings.groups[] → { name|abbreviation|conference, standings.entries[] }`
//! where each entry carries `team.displayName` and a `playoffSeed` (directly or
//! as a stat). When the blob is absent the rendered standings tables are read
//! instead.
//!
//! The scoreboard feed (`site.api.espn.com`) is read separately to pick up
//! ESPN's own game ids for generated matchups.

use serde_json::Value;

use crate::bracket::Round;
use crate::config::consts::{ESPN_API_HOST, ESPN_HOST, ESPN_PLAYOFF_PATH, ESPN_SCOREBOARD_PATH, MAX_SEED};
use crate::core::html::{attr_value, open_tag, tag_blocks, tag_spans, text_of};
use crate::core::sanitize::seed_digit;
use crate::league::Conference;
use crate::roster::SeededTeam;

use super::{as_seed, conference_in, finish, json_after_marker, seed_field, seeded, str_field};

pub const HOST: &str = ESPN_HOST;
pub const PATH: &str = ESPN_PLAYOFF_PATH;
pub const SCOREBOARD_HOST: &str = ESPN_API_HOST;

const MARKERS: [&str; 4] = [
    "window['__espnfitt__']",
    "window[\"__espnfitt__\"]",
    "window.__espnfitt__",
    "__espnfitt__",
];

/// Seeded teams on the page, sorted by (conference, seed).
pub fn parse(doc: &str) -> Vec<SeededTeam> {
    let from_json = json_after_marker(doc, &MARKERS)
        .map(|v| from_blob(&v))
        .unwrap_or_default();
    if !from_json.is_empty() {
        logd!("ESPN: {} teams from embedded JSON", from_json.len());
        return finish(from_json);
    }
    logw!("ESPN: embedded standings JSON missing, falling back to tables");
    finish(from_tables(doc))
}

/* ---------------- Embedded JSON ---------------- */

fn find_standings(v: &Value) -> Option<&Value> {
    match v {
        Value::Object(m) => {
            if m.get("groups").is_some_and(Value::is_array) {
                return Some(v);
            }
            if let Some(s) = m.get("standings") {
                if s.get("groups").is_some_and(Value::is_array) {
                    return Some(s);
                }
            }
            m.values().find_map(find_standings)
        }
        Value::Array(a) => a.iter().find_map(find_standings),
        _ => None,
    }
}

fn group_conference(group: &Value) -> Option<Conference> {
    ["name", "abbreviation", "conference"]
        .iter()
        .filter_map(|k| group.get(*k)?.as_str())
        .find_map(|s| s.trim().to_ascii_uppercase().parse().ok())
}

fn entry_seed(entry: &Value) -> Option<u8> {
    if let Some(s) = seed_field(entry, &["playoffSeed", "seed"]) {
        return Some(s);
    }
    entry.get("stats")?.as_array()?.iter().find_map(|stat| {
        let is_seed = ["name", "type"]
            .iter()
            .any(|k| stat.get(*k).and_then(Value::as_str) == Some("playoffSeed"));
        if !is_seed {
            return None;
        }
        stat.get("value")
            .and_then(as_seed)
            .or_else(|| stat.get("displayValue").and_then(as_seed))
    })
}

fn from_blob(blob: &Value) -> Vec<SeededTeam> {
    let Some(groups) = find_standings(blob).and_then(|s| s.get("groups")?.as_array()) else {
        return Vec::new();
    };
    let mut out = Vec::new();
    for group in groups {
        let Some(conference) = group_conference(group) else {
            continue;
        };
        let entries = group
            .get("standings")
            .and_then(|s| s.get("entries"))
            .and_then(Value::as_array);
        for entry in entries.into_iter().flatten() {
            let team = entry.get("team").unwrap_or(&Value::Null);
            let (Some(name), Some(seed)) = (
                str_field(team, &["displayName", "name", "fullName"]),
                entry_seed(entry),
            ) else {
                continue;
            };
            let abbr = str_field(team, &["abbreviation", "shortDisplayName"]);
            out.extend(seeded(&name, abbr.as_deref(), conference, seed));
        }
    }
    out
}

/* ---------------- HTML tables ---------------- */

/// One pass over `<table>` blocks. Conference comes from the text between the
/// previous table and this one, else from the table's header cells.
fn from_tables(doc: &str) -> Vec<SeededTeam> {
    let mut out = Vec::new();
    let mut prev_end = 0usize;

    for (start, end) in tag_spans(doc, "table") {
        let table = &doc[start..end];
        let lead = text_of(&doc[prev_end..start]);
        prev_end = end;

        let header_text = tag_blocks(table, "th")
            .into_iter()
            .map(text_of)
            .collect::<Vec<_>>()
            .join(" ");
        let Some(conference) = last_conference(&lead).or_else(|| conference_in(&header_text)) else {
            continue;
        };

        let mut position = 0u8;
        for row in tag_blocks(table, "tr") {
            if row.to_ascii_lowercase().contains("<th") {
                continue;
            }
            let Some(name) = team_link_text(row) else {
                continue;
            };
            let cells = tag_blocks(row, "td");
            if cells.len() < 2 {
                continue;
            }
            let seed = cells
                .iter()
                .find_map(|c| seed_digit(&text_of(c)).filter(|s| (1..=MAX_SEED).contains(s)));
            let seed = match seed {
                Some(s) => s,
                None => {
                    position += 1;
                    if position > MAX_SEED {
                        continue;
                    }
                    position
                }
            };
            out.extend(seeded(&name, None, conference, seed));
        }
    }
    out
}

/// The conference named last before the table (closest heading wins).
fn last_conference(text: &str) -> Option<Conference> {
    let up = text.to_ascii_uppercase();
    match (up.rfind("AFC"), up.rfind("NFC")) {
        (Some(a), Some(n)) => Some(if a > n { Conference::Afc } else { Conference::Nfc }),
        (Some(_), None) => Some(Conference::Afc),
        (None, Some(_)) => Some(Conference::Nfc),
        (None, None) => None,
    }
}

fn team_link_text(row: &str) -> Option<String> {
    tag_blocks(row, "a")
        .into_iter()
        .filter(|a| attr_value(open_tag(a), "href").is_some_and(|h| h.contains("/nfl/team/")))
        .map(text_of)
        .find(|t| !t.is_empty())
}

/* ---------------- Scoreboard ---------------- */

/// One scheduled game from the scoreboard feed.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ScheduledGame {
    pub id: String,
    pub kickoff: String,
    pub home_team: String,
    pub away_team: String,
}

/// `YYYYMMDD` days the round is usually played. Playoffs of season `s` fall
/// in January/February of `s + 1`.
pub fn scoreboard_dates(season: u16, round: Round) -> Vec<String> {
    let year = u32::from(season) + 1;
    let days: [&str; 4] = match round {
        Round::WildCard => ["0109", "0110", "0111", "0112"],
        Round::Divisional => ["0118", "0119", "0120", "0121"],
        Round::ConferenceChampionship => ["0125", "0126", "0127", "0128"],
        Round::SuperBowl => ["0208", "0209", "0210", "0211"],
    };
    days.iter().map(|d| format!("{year}{d}")).collect()
}

pub fn scoreboard_path(date: &str) -> String {
    format!("{ESPN_SCOREBOARD_PATH}?dates={date}")
}

/// Games in a scoreboard document: `events[].competitions[]` with an id and
/// a kickoff date. Games whose teams are not both named yet (TBD) are skipped.
pub fn parse_scoreboard(doc: &Value) -> Vec<ScheduledGame> {
    let mut out = Vec::new();
    let events = doc.get("events").and_then(Value::as_array).into_iter().flatten();
    for event in events {
        let comps = event.get("competitions").and_then(Value::as_array).into_iter().flatten();
        for comp in comps {
            let Some(id) = str_field(comp, &["id"]).or_else(|| str_field(event, &["id"])) else {
                continue;
            };
            let Some(kickoff) = str_field(comp, &["date"]).or_else(|| str_field(event, &["date"])) else {
                continue;
            };
            let competitors = comp.get("competitors").and_then(Value::as_array);
            let Some([a, b]) = competitors.map(Vec::as_slice) else {
                continue;
            };
            let side = |want: &str| {
                [a, b]
                    .into_iter()
                    .find(|c| c.get("homeAway").and_then(Value::as_str) == Some(want))
                    .and_then(|c| str_field(c.get("team")?, &["displayName"]))
            };
            if let (Some(home_team), Some(away_team)) = (side("home"), side("away")) {
                out.push(ScheduledGame { id, kickoff, home_team, away_team });
            }
        }
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn seed_from_stats_list() {
        let entry = serde_json::json!({
            "team": {"displayName": "Houston Texans"},
            "stats": [{"name": "wins", "value": 10}, {"type": "playoffSeed", "displayValue": "4"}]
        });
        assert_eq!(entry_seed(&entry), Some(4));
    }

    #[test]
    fn closest_heading_decides_conference() {
        assert_eq!(last_conference("AFC Standings ... NFC Standings"), Some(Conference::Nfc));
    }

    #[test]
    fn scoreboard_dates_use_the_following_january() {
        let dates = scoreboard_dates(2024, Round::WildCard);
        assert_eq!(dates, ["20250109", "20250110", "20250111", "20250112"]);
        assert_eq!(scoreboard_dates(2024, Round::SuperBowl)[0], "20250208");
    }

    #[test]
    fn scoreboard_skips_unnamed_competitors() {
        let doc = serde_json::json!({"events": [{
            "id": "401",
            "date": "2025-01-26T20:00Z",
            "competitions": [{
                "competitors": [
                    {"homeAway": "home", "team": {"displayName": "TBD"}},
                    {"homeAway": "away", "team": {}}
                ]
            }]
        }]});
        assert!(parse_scoreboard(&doc).is_empty());
    }
}
