// src/specs/mod.rs
//! # Standings page specs
//!
//! One module per standings page. A spec knows where the playoff seeds live in
//! that page's document and how to pull them out; it does not fetch, cache or
//! decide what to do with the result (`scrape` and `runner` do that).
//!
//! ## Extraction order
//! 1. Embedded JSON (the page's hydration blob), found by its assignment marker
//!    and cut out with a balanced-brace scan, then searched recursively.
//! 2. HTML fallback over `core::html` tag blocks when the blob is missing or
//!    does not contain seeds.
//!
//! ## Conventions
//! - Only seeds 1..=7 and conferences AFC/NFC are kept.
//! - Names are canonicalized against the league table when they match it
//!   (full name, abbreviation or nickname); unknown names pass through.
//! - `finish` de-duplicates by (name, conference, seed) and sorts by
//!   (conference, seed); every spec returns through it.
//!
//! Specs are plain functions over `&str` so fixtures can be parsed offline.

pub mod espn;
pub mod nfl;

use std::collections::HashSet;

use serde_json::Value;

use crate::config::consts::{MAX_SEED, MIN_SEED};
use crate::league::{self, Conference};
use crate::roster::SeededTeam;

/// The `{…}` starting at byte `start`, braces balanced outside string literals.
pub fn balanced_object(s: &str, start: usize) -> Option<&str> {
    let bytes = s.as_bytes();
    if bytes.get(start) != Some(&b'{') {
        return None;
    }
    let mut depth = 0usize;
    let mut in_str = false;
    let mut escaped = false;
    for (i, &b) in bytes.iter().enumerate().skip(start) {
        if in_str {
            if escaped {
                escaped = false;
            } else if b == b'\\' {
                escaped = true;
            } else if b == b'"' {
                in_str = false;
            }
            continue;
        }
        match b {
            b'"' => in_str = true,
            b'{' => depth += 1,
            b'}' => {
                depth -= 1;
                if depth == 0 {
                    return Some(&s[start..=i]);
                }
            }
            _ => {}
        }
    }
    None
}

/// First JSON object assigned after any of `markers` (`marker = {…}` or
/// `marker: {…}`) that parses.
pub fn json_after_marker(doc: &str, markers: &[&str]) -> Option<Value> {
    for marker in markers {
        let mut from = 0usize;
        while let Some(rel) = doc[from..].find(marker) {
            let after = from + rel + marker.len();
            from = after;
            let rest = &doc[after..];
            let trimmed = rest.trim_start();
            let Some(op) = trimmed.chars().next() else { continue };
            if op != '=' && op != ':' {
                continue;
            }
            let value_part = trimmed[1..].trim_start();
            let start = doc.len() - value_part.len();
            if let Some(obj) = balanced_object(doc, start) {
                match serde_json::from_str::<Value>(obj) {
                    Ok(v) => return Some(v),
                    Err(e) => logd!("specs: JSON after '{marker}' did not parse: {e}"),
                }
            }
        }
    }
    None
}

/// First non-empty string among `keys`.
pub fn str_field(v: &Value, keys: &[&str]) -> Option<String> {
    keys.iter()
        .filter_map(|k| v.get(*k)?.as_str())
        .map(str::trim)
        .find(|s| !s.is_empty())
        .map(|s| s.to_string())
}

/// A seed from a JSON number (`3`, `3.0`) or numeric string (`"3"`), in range.
/// Fractional values (`3.5`) are not seeds.
pub fn as_seed(v: &Value) -> Option<u8> {
    let f = match v {
        Value::Number(n) => match n.as_u64() {
            Some(u) => return in_seed_range(u),
            None => n.as_f64()?,
        },
        Value::String(s) => s.trim().parse::<f64>().ok()?,
        _ => return None,
    };
    if !f.is_finite() || f.fract() != 0.0 || f < 0.0 {
        return None;
    }
    in_seed_range(f as u64)
}

fn in_seed_range(n: u64) -> Option<u8> {
    u8::try_from(n).ok().filter(|s| (MIN_SEED..=MAX_SEED).contains(s))
}

/// First key among `keys` that holds a usable seed.
pub fn seed_field(v: &Value, keys: &[&str]) -> Option<u8> {
    keys.iter().find_map(|k| v.get(*k).and_then(as_seed))
}

/// AFC/NFC from a label: exact match first, then whichever appears first.
pub fn conference_in(text: &str) -> Option<Conference> {
    let up = text.to_ascii_uppercase();
    if let Ok(c) = up.trim().parse() {
        return Some(c);
    }
    match (up.find("AFC"), up.find("NFC")) {
        (Some(a), Some(n)) => Some(if a < n { Conference::Afc } else { Conference::Nfc }),
        (Some(_), None) => Some(Conference::Afc),
        (None, Some(_)) => Some(Conference::Nfc),
        (None, None) => None,
    }
}

/// Build a record when name and seed are usable; canonical name when known.
pub fn seeded(name: &str, abbr: Option<&str>, conference: Conference, seed: u8) -> Option<SeededTeam> {
    let name = name.trim();
    if name.is_empty() || !(MIN_SEED..=MAX_SEED).contains(&seed) {
        return None;
    }
    Some(match league::resolve(name) {
        Some(t) => SeededTeam::new(t.name, Some(t.abbreviation), conference, seed),
        None => SeededTeam::new(name, abbr, conference, seed),
    })
}

/// De-duplicate by (name, conference, seed); sort by (conference, seed).
pub fn finish(teams: Vec<SeededTeam>) -> Vec<SeededTeam> {
    let mut seen = HashSet::new();
    let mut out: Vec<SeededTeam> = teams
        .into_iter()
        .filter(|t| seen.insert((t.team_name.clone(), t.conference, t.seed)))
        .collect();
    out.sort_by_key(|t| (t.conference, t.seed));
    out
}
