// src/scrape.rs
//
// Standings fetch: network (or a saved page) → raw capture → page spec.
// Scoreboard lookup: ESPN game ids for a round's matchups.

use std::error::Error;
use std::fs;
use std::path::Path;

use crate::bracket::Round;
use crate::config::options::Source;
use crate::core::net;
use crate::progress::Progress;
use crate::roster::SeededTeam;
use crate::specs;
use crate::specs::espn::ScheduledGame;
use crate::store::Store;

/// Run the page spec for `source` over a document.
pub fn parse_standings(source: Source, doc: &str) -> Result<Vec<SeededTeam>, Box<dyn Error>> {
    match source {
        Source::Espn => Ok(specs::espn::parse(doc)),
        Source::Nfl => Ok(specs::nfl::parse(doc)),
        other => Err(format!("{} is not a standings page source", other.label()).into()),
    }
}

fn endpoint(source: Source) -> Result<(&'static str, &'static str), Box<dyn Error>> {
    match source {
        Source::Espn => Ok((specs::espn::HOST, specs::espn::PATH)),
        Source::Nfl => Ok((specs::nfl::HOST, specs::nfl::PATH)),
        other => Err(format!("{} has no standings page", other.label()).into()),
    }
}

/// Fetch the standings page, keep the raw body in the store, parse it.
/// With `html_file` set, that saved page is parsed instead of fetching.
pub fn fetch_standings(
    source: Source,
    season: u16,
    html_file: Option<&Path>,
    store: &Store,
    mut progress: Option<&mut dyn Progress>,
) -> Result<Vec<SeededTeam>, Box<dyn Error>> {
    if let Some(p) = progress.as_deref_mut() {
        p.begin(2);
    }

    let doc = match html_file {
        Some(path) => {
            if let Some(p) = progress.as_deref_mut() {
                p.log(&format!("Reading saved page {}", path.display()));
            }
            fs::read_to_string(path).map_err(|e| format!("Cannot read {}: {e}", path.display()))?
        }
        None => {
            let (host, path) = endpoint(source)?;
            if let Some(p) = progress.as_deref_mut() {
                p.log(&format!("Fetching {host}{path}"));
            }
            logf!("Scrape: GET {host}{path} for season {season}");
            let body = net::http_get(host, path).inspect_err(|e| loge!("Scrape: {e}"))?;
            match store.save_response(source.key(), season, &body) {
                Ok(saved) => logf!("Scrape: saved response to {}", saved.display()),
                Err(e) => logw!("Scrape: could not save response: {e}"),
            }
            body
        }
    };
    if let Some(p) = progress.as_deref_mut() {
        p.step("page loaded");
    }

    let teams = parse_standings(source, &doc)?;
    logf!("Scrape: {} parsed {} seeded teams", source.label(), teams.len());
    if let Some(p) = progress.as_deref_mut() {
        p.step(&format!("{} seeded teams parsed", teams.len()));
        p.finish();
    }
    if teams.is_empty() {
        return Err(format!(
            "Could not find playoff teams on the {} page (layout changed?). Use --teams-file or --teams instead.",
            source.label()
        )
        .into());
    }
    Ok(teams)
}

/* ---------------- Game ids ---------------- */

/// Where generated games get their feed ids from.
pub trait GameIdLookup {
    fn scheduled(&self, season: u16, round: Round) -> Result<Vec<ScheduledGame>, Box<dyn Error>>;
}

/// ESPN's public scoreboard, one request per day of the round's window.
/// A day that fails is logged and skipped.
pub struct EspnScoreboard;

impl GameIdLookup for EspnScoreboard {
    fn scheduled(&self, season: u16, round: Round) -> Result<Vec<ScheduledGame>, Box<dyn Error>> {
        let host = specs::espn::SCOREBOARD_HOST;
        let mut out: Vec<ScheduledGame> = Vec::new();
        let mut failures = 0;
        let dates = specs::espn::scoreboard_dates(season, round);
        for date in &dates {
            let path = specs::espn::scoreboard_path(date);
            match net::http_get_json(host, &path) {
                Ok(doc) => {
                    for g in specs::espn::parse_scoreboard(&doc) {
                        if !out.iter().any(|o| o.id == g.id) {
                            out.push(g);
                        }
                    }
                }
                Err(e) => {
                    logw!("Scoreboard {date}: {e}");
                    failures += 1;
                }
            }
        }
        if failures == dates.len() {
            return Err(format!("ESPN scoreboard unreachable for {season} {round}").into());
        }
        logf!("Scoreboard: {} scheduled games for {season} {round}", out.len());
        Ok(out)
    }
}
