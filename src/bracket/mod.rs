// src/bracket/mod.rs
//! # Bracket advancement
//!
//! Pure rules that turn a conference's seeded roster plus the previous
//! round's winners into the next round's games.
//!
//! ## Layout
//! - this file: `Round`, `GameConference`, `Game` and the rule tables;
//! - `engine`: one function per round, each over in-memory maps/lists only;
//! - `advance`: the per-round driver that feeds both conferences through the
//!   engine and explains missing games (`AdvanceIssue`).
//!
//! ## Rules
//! - Lower seed number = better team = home team.
//! - The one exception is the Super Bowl: NFC champion home, AFC away, no seeds.
//! - Incomplete input never produces a guessed game; the pairing is skipped.
//!
//! Nothing here touches the store or the network. Persistence and previews
//! live in `games`/`runner`.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::core::sanitize::slug;
use crate::league::Conference;

pub mod advance;
pub mod engine;

pub use advance::{generate_round, AdvanceIssue, RoundOutcome};
pub use engine::{
    generate_conference_championship, generate_divisional, generate_super_bowl, generate_wild_card,
};

/// Wild Card pairings (better seed first). Seed 1 has the bye.
pub const WILD_CARD_PAIRS: [(u8, u8); 3] = [(2, 7), (3, 6), (4, 5)];

/// The bye seed that hosts the Divisional round's worst remaining winner.
pub const BYE_SEED: u8 = 1;

/// Designated home side of the Super Bowl.
pub const SUPER_BOWL_HOME: Conference = Conference::Nfc;

#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum Round {
    WildCard,
    Divisional,
    ConferenceChampionship,
    SuperBowl,
}

impl Round {
    pub const ALL: [Round; 4] = [
        Round::WildCard,
        Round::Divisional,
        Round::ConferenceChampionship,
        Round::SuperBowl,
    ];

    /// Playoff week, 1..=4.
    pub fn week(self) -> u8 {
        match self {
            Round::WildCard => 1,
            Round::Divisional => 2,
            Round::ConferenceChampionship => 3,
            Round::SuperBowl => 4,
        }
    }

    pub fn from_week(week: u8) -> Option<Round> {
        Round::ALL.into_iter().find(|r| r.week() == week)
    }

    pub fn previous(self) -> Option<Round> {
        Round::from_week(self.week().checked_sub(1)?)
    }

    pub fn label(self) -> &'static str {
        match self {
            Round::WildCard => "Wild Card",
            Round::Divisional => "Divisional",
            Round::ConferenceChampionship => "Conference Championship",
            Round::SuperBowl => "Super Bowl",
        }
    }
}

impl fmt::Display for Round {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum GameConference {
    #[serde(rename = "AFC")]
    Afc,
    #[serde(rename = "NFC")]
    Nfc,
    #[serde(rename = "SUPER_BOWL")]
    SuperBowl,
}

impl GameConference {
    pub fn as_str(self) -> &'static str {
        match self {
            GameConference::Afc => "AFC",
            GameConference::Nfc => "NFC",
            GameConference::SuperBowl => "SUPER_BOWL",
        }
    }

    pub fn conference(self) -> Option<Conference> {
        match self {
            GameConference::Afc => Some(Conference::Afc),
            GameConference::Nfc => Some(Conference::Nfc),
            GameConference::SuperBowl => None,
        }
    }
}

impl From<Conference> for GameConference {
    fn from(c: Conference) -> Self {
        match c {
            Conference::Afc => GameConference::Afc,
            Conference::Nfc => GameConference::Nfc,
        }
    }
}

impl fmt::Display for GameConference {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for GameConference {
    type Err = String;
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_uppercase().as_str() {
            "AFC" => Ok(GameConference::Afc),
            "NFC" => Ok(GameConference::Nfc),
            "SUPER_BOWL" | "SUPER BOWL" | "SB" => Ok(GameConference::SuperBowl),
            other => Err(format!("Unknown game conference: {other}")),
        }
    }
}

/// One playoff game. Home/away are team names.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Game {
    pub id: String,
    pub season: u16,
    pub week: u8,
    pub conference: GameConference,
    pub home_team: String,
    pub away_team: String,
    pub home_seed: Option<u8>,
    pub away_seed: Option<u8>,
    pub winner: Option<String>,
}

impl Game {
    /// New undecided game carrying the deterministic composite id.
    pub fn new(
        season: u16,
        round: Round,
        conference: GameConference,
        home: (&str, Option<u8>),
        away: (&str, Option<u8>),
    ) -> Self {
        let week = round.week();
        Self {
            id: Game::composite_id(season, week, home.0, away.0),
            season,
            week,
            conference,
            home_team: s!(home.0),
            away_team: s!(away.0),
            home_seed: home.1,
            away_seed: away.1,
            winner: None,
        }
    }

    /// `"{season}-{week}-{home}-{away}"` with slugged names.
    pub fn composite_id(season: u16, week: u8, home: &str, away: &str) -> String {
        format!("{season}-{week}-{}-{}", slug(home), slug(away))
    }

    /// Swap in an id from an outside feed. Blank ids keep the composite.
    pub fn with_external_id(mut self, id: &str) -> Self {
        if !id.trim().is_empty() {
            self.id = s!(id.trim());
        }
        self
    }

    pub fn round(&self) -> Option<Round> {
        Round::from_week(self.week)
    }

    /// Plain `"Away @ Home"`.
    pub fn matchup(&self) -> String {
        join!(&self.away_team, " @ ", &self.home_team)
    }
}

/// `"(7) Away @ (2) Home"`; seeds omitted when absent.
impl fmt::Display for Game {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let side = |seed: Option<u8>, name: &str| match seed {
            Some(s) => format!("({s}) {name}"),
            None => s!(name),
        };
        write!(
            f,
            "{} @ {}",
            side(self.away_seed, &self.away_team),
            side(self.home_seed, &self.home_team)
        )?;
        if let Some(w) = &self.winner {
            write!(f, "  → {w}")?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn round_weeks_chain() {
        assert_eq!(Round::from_week(3), Some(Round::ConferenceChampionship));
        assert_eq!(Round::SuperBowl.previous(), Some(Round::ConferenceChampionship));
        assert_eq!(Round::WildCard.previous(), None);
        assert_eq!(Round::from_week(5), None);
    }

    #[test]
    fn display_away_at_home() {
        let g = Game::new(
            2024,
            Round::WildCard,
            GameConference::Nfc,
            ("Philadelphia Eagles", Some(2)),
            ("Green Bay Packers", Some(7)),
        );
        assert_eq!(g.to_string(), "(7) Green Bay Packers @ (2) Philadelphia Eagles");
        assert_eq!(g.matchup(), "Green Bay Packers @ Philadelphia Eagles");
        assert_eq!(g.id, "2024-1-philadelphia-eagles-green-bay-packers");
    }
}
