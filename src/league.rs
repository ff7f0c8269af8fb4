// src/league.rs
//
// The fixed 32-team reference list. Identity is by full name everywhere in
// the crate; abbreviations are display/lookup helpers only.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum Conference {
    #[serde(rename = "AFC")]
    Afc,
    #[serde(rename = "NFC")]
    Nfc,
}

impl Conference {
    pub const BOTH: [Conference; 2] = [Conference::Afc, Conference::Nfc];

    pub fn as_str(self) -> &'static str {
        match self {
            Conference::Afc => "AFC",
            Conference::Nfc => "NFC",
        }
    }

    pub fn other(self) -> Conference {
        match self {
            Conference::Afc => Conference::Nfc,
            Conference::Nfc => Conference::Afc,
        }
    }
}

impl fmt::Display for Conference {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Conference {
    type Err = String;
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_uppercase().as_str() {
            "AFC" => Ok(Conference::Afc),
            "NFC" => Ok(Conference::Nfc),
            other => Err(format!("Unknown conference: {other}")),
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Team {
    pub name: &'static str,
    pub abbreviation: &'static str,
    pub conference: Conference,
}

const fn team(name: &'static str, abbreviation: &'static str, conference: Conference) -> Team {
    Team { name, abbreviation, conference }
}

use Conference::{Afc, Nfc};

/// Grouped by division, NFC first.
pub static NFL_TEAMS: [Team; 32] = [
    team("Arizona Cardinals", "ARI", Nfc),
    team("Los Angeles Rams", "LAR", Nfc),
    team("San Francisco 49ers", "SF", Nfc),
    team("Seattle Seahawks", "SEA", Nfc),

    team("Atlanta Falcons", "ATL", Nfc),
    team("Carolina Panthers", "CAR", Nfc),
    team("New Orleans Saints", "NO", Nfc),
    team("Tampa Bay Buccaneers", "TB", Nfc),

    team("Chicago Bears", "CHI", Nfc),
    team("Detroit Lions", "DET", Nfc),
    team("Green Bay Packers", "GB", Nfc),
    team("Minnesota Vikings", "MIN", Nfc),

    team("Dallas Cowboys", "DAL", Nfc),
    team("New York Giants", "NYG", Nfc),
    team("Philadelphia Eagles", "PHI", Nfc),
    team("Washington Commanders", "WSH", Nfc),

    team("Baltimore Ravens", "BAL", Afc),
    team("Cincinnati Bengals", "CIN", Afc),
    team("Cleveland Browns", "CLE", Afc),
    team("Pittsburgh Steelers", "PIT", Afc),

    team("Buffalo Bills", "BUF", Afc),
    team("Miami Dolphins", "MIA", Afc),
    team("New England Patriots", "NE", Afc),
    team("New York Jets", "NYJ", Afc),

    team("Denver Broncos", "DEN", Afc),
    team("Kansas City Chiefs", "KC", Afc),
    team("Las Vegas Raiders", "LV", Afc),
    team("Los Angeles Chargers", "LAC", Afc),

    team("Houston Texans", "HOU", Afc),
    team("Indianapolis Colts", "IND", Afc),
    team("Jacksonville Jaguars", "JAX", Afc),
    team("Tennessee Titans", "TEN", Afc),
];

pub fn find(name: &str) -> Option<&'static Team> {
    NFL_TEAMS.iter().find(|t| t.name == name)
}

/// Case-insensitive match on full name or abbreviation.
pub fn find_loose(text: &str) -> Option<&'static Team> {
    let t = text.trim();
    NFL_TEAMS
        .iter()
        .find(|team| team.name.eq_ignore_ascii_case(t) || team.abbreviation.eq_ignore_ascii_case(t))
}

/// Best-effort match for scraped text: full name, abbreviation, or the
/// nickname alone ("Chiefs").
pub fn resolve(text: &str) -> Option<&'static Team> {
    let t = text.trim();
    if t.is_empty() {
        return None;
    }
    find_loose(t).or_else(|| {
        NFL_TEAMS.iter().find(|team| {
            team.name
                .rsplit(' ')
                .next()
                .is_some_and(|nick| nick.eq_ignore_ascii_case(t))
        })
    })
}

pub fn conference_teams(conference: Conference) -> impl Iterator<Item = &'static Team> {
    NFL_TEAMS.iter().filter(move |t| t.conference == conference)
}

/// Reference abbreviation, or last word of the name cut to three letters.
pub fn abbreviation_for(name: &str) -> String {
    if let Some(t) = find(name) {
        return s!(t.abbreviation);
    }
    name.split_whitespace()
        .last()
        .map(|w| w.chars().take(3).collect::<String>().to_uppercase())
        .unwrap_or_default()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn sixteen_per_conference() {
        assert_eq!(conference_teams(Afc).count(), 16);
        assert_eq!(conference_teams(Nfc).count(), 16);
    }

    #[test]
    fn abbreviation_lookup_and_fallback() {
        assert_eq!(abbreviation_for("Kansas City Chiefs"), "KC");
        assert_eq!(abbreviation_for("Springfield Atoms"), "ATO");
        assert_eq!(abbreviation_for(""), "");
    }

    #[test]
    fn loose_lookup() {
        assert_eq!(find_loose("phi").map(|t| t.name), Some("Philadelphia Eagles"));
        assert_eq!(find_loose("buffalo bills").map(|t| t.conference), Some(Afc));
        assert_eq!(resolve("49ers").map(|t| t.abbreviation), Some("SF"));
        assert_eq!(resolve("Springfield"), None);
    }
}
