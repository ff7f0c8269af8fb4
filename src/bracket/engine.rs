// src/bracket/engine.rs
//
// One generator per round. Inputs are a conference's seed → team map and the
// winners of the previous round; output is the round's games. Missing or
// inconsistent input yields fewer (or no) games, never an error.

use std::collections::{BTreeMap, HashMap};

use crate::league::Conference;

use super::{Game, GameConference, Round, BYE_SEED, SUPER_BOWL_HOME, WILD_CARD_PAIRS};

type Side<'a> = (&'a str, Option<u8>);

/// Winner name → seed, built once per call.
fn seed_lookup(teams_by_seed: &BTreeMap<u8, String>) -> HashMap<&str, u8> {
    teams_by_seed.iter().map(|(seed, name)| (name.as_str(), *seed)).collect()
}

/// Better (lower) seed hosts. `None` when both sides are the same team.
fn seeded_game(
    season: u16,
    round: Round,
    conference: Conference,
    a: (&str, u8),
    b: (&str, u8),
) -> Option<Game> {
    if a.0 == b.0 {
        return None;
    }
    let (home, away) = if a.1 <= b.1 { (a, b) } else { (b, a) };
    let home: Side = (home.0, Some(home.1));
    let away: Side = (away.0, Some(away.1));
    Some(Game::new(season, round, conference.into(), home, away))
}

/// Winners resolved to seeds, de-duplicated, worst seed first.
/// `None` when any winner is not on the roster.
fn resolve_winners<'a>(
    lookup: &HashMap<&'a str, u8>,
    winners: &[String],
) -> Option<Vec<(&'a str, u8)>> {
    let mut out: Vec<(&'a str, u8)> = Vec::with_capacity(winners.len());
    for w in winners {
        let (name, seed) = lookup.get_key_value(w.as_str())?;
        if !out.iter().any(|(n, _)| n == name) {
            out.push((*name, *seed));
        }
    }
    out.sort_by(|a, b| b.1.cmp(&a.1));
    Some(out)
}

/// Week 1: (2,7), (3,6), (4,5). A pairing is emitted only when both seeds
/// have a team.
pub fn generate_wild_card(
    season: u16,
    conference: Conference,
    teams_by_seed: &BTreeMap<u8, String>,
) -> Vec<Game> {
    WILD_CARD_PAIRS
        .iter()
        .filter_map(|&(high, low)| {
            let home = teams_by_seed.get(&high)?;
            let away = teams_by_seed.get(&low)?;
            seeded_game(season, Round::WildCard, conference, (home.as_str(), high), (away.as_str(), low))
        })
        .collect()
}

/// Week 2: the bye seed hosts the worst remaining winner; the other two
/// winners meet with the better seed at home.
///
/// A listed bye team is ignored (it did not win a game). With more than three
/// distinct game winners the input is not a standard bracket and nothing is
/// produced.
pub fn generate_divisional(
    season: u16,
    conference: Conference,
    teams_by_seed: &BTreeMap<u8, String>,
    week1_winners: &[String],
) -> Vec<Game> {
    let Some(top) = teams_by_seed.get(&BYE_SEED) else {
        return Vec::new();
    };
    if week1_winners.is_empty() {
        return Vec::new();
    }
    let lookup = seed_lookup(teams_by_seed);
    let Some(mut winners) = resolve_winners(&lookup, week1_winners) else {
        return Vec::new();
    };
    winners.retain(|(name, _)| *name != top.as_str());
    if winners.is_empty() || winners.len() > WILD_CARD_PAIRS.len() {
        return Vec::new();
    }

    let mut games = Vec::with_capacity(2);
    let worst = winners.remove(0);
    games.extend(seeded_game(season, Round::Divisional, conference, (top.as_str(), BYE_SEED), worst));

    if let [a, b] = winners.as_slice() {
        games.extend(seeded_game(season, Round::Divisional, conference, *a, *b));
    }
    games
}

/// Week 3: exactly two winners, better seed at home.
pub fn generate_conference_championship(
    season: u16,
    conference: Conference,
    teams_by_seed: &BTreeMap<u8, String>,
    week2_winners: &[String],
) -> Vec<Game> {
    if week2_winners.len() != 2 {
        return Vec::new();
    }
    let lookup = seed_lookup(teams_by_seed);
    let resolved: Option<Vec<(&str, u8)>> = week2_winners
        .iter()
        .map(|w| lookup.get_key_value(w.as_str()).map(|(n, s)| (*n, *s)))
        .collect();
    match resolved.as_deref() {
        Some(&[a, b]) => seeded_game(season, Round::ConferenceChampionship, conference, a, b)
            .into_iter()
            .collect(),
        _ => Vec::new(),
    }
}

/// Week 4: NFC champion home, AFC champion away, no seeds.
pub fn generate_super_bowl(season: u16, champions: &BTreeMap<Conference, String>) -> Vec<Game> {
    let (Some(home), Some(away)) = (
        champions.get(&SUPER_BOWL_HOME),
        champions.get(&SUPER_BOWL_HOME.other()),
    ) else {
        return Vec::new();
    };
    if home == away {
        return Vec::new();
    }
    vec![Game::new(
        season,
        Round::SuperBowl,
        GameConference::SuperBowl,
        (home.as_str(), None),
        (away.as_str(), None),
    )]
}

#[cfg(test)]
mod tests {
    use super::*;

    fn roster(names: &[(u8, &str)]) -> BTreeMap<u8, String> {
        names.iter().map(|(s, n)| (*s, s!(*n))).collect()
    }

    fn winners(names: &[&str]) -> Vec<String> {
        names.iter().map(|n| s!(*n)).collect()
    }

    #[test]
    fn wild_card_skips_partial_pairs() {
        let r = roster(&[(1, "A"), (2, "B"), (3, "C"), (6, "F")]);
        let games = generate_wild_card(2024, Conference::Afc, &r);
        assert_eq!(games.len(), 1);
        assert_eq!((games[0].home_team.as_str(), games[0].away_team.as_str()), ("C", "F"));
    }

    #[test]
    fn divisional_ignores_listed_bye_team() {
        let r = roster(&[(1, "A"), (2, "B"), (3, "C"), (4, "D"), (5, "E"), (6, "F"), (7, "G")]);
        let games = generate_divisional(2024, Conference::Nfc, &r, &winners(&["A", "B", "D", "G"]));
        assert_eq!(games.len(), 2);
        assert_eq!(games[0].away_team, "G");
    }

    #[test]
    fn divisional_with_two_winners_only_hosts_bye_game() {
        let r = roster(&[(1, "A"), (2, "B"), (3, "C"), (6, "F")]);
        let games = generate_divisional(2024, Conference::Nfc, &r, &winners(&["B", "F"]));
        assert_eq!(games.len(), 1);
        assert_eq!((games[0].home_team.as_str(), games[0].away_team.as_str()), ("A", "F"));
    }

    #[test]
    fn divisional_rejects_too_many_winners() {
        let r = roster(&[(1, "A"), (2, "B"), (3, "C"), (4, "D"), (5, "E"), (6, "F"), (7, "G")]);
        let games = generate_divisional(2024, Conference::Nfc, &r, &winners(&["B", "C", "D", "E"]));
        assert!(games.is_empty());
    }

    #[test]
    fn championship_rejects_same_team_twice() {
        let r = roster(&[(2, "B"), (4, "D")]);
        assert!(generate_conference_championship(2024, Conference::Afc, &r, &winners(&["B", "B"])).is_empty());
    }

    #[test]
    fn super_bowl_needs_two_distinct_champions() {
        let mut champs = BTreeMap::new();
        champs.insert(Conference::Afc, s!("X"));
        champs.insert(Conference::Nfc, s!("X"));
        assert!(generate_super_bowl(2024, &champs).is_empty());
    }
}
