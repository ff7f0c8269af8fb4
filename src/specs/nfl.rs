// src/specs/nfl.rs
//! NFL.com playoff picture (`/standings/playoff-picture`).
//!
//! The Next.js `__NEXT_DATA__` payload is searched for the first list of team
//! objects (`teams`, `playoffTeams`, `standings`). The HTML fallback walks the
//! conference sections and their `/teams/` links.

use serde_json::Value;

use crate::config::consts::{MAX_SEED, NFL_HOST, NFL_PLAYOFF_PATH};
use crate::core::html::{attr_value, inner_after_open_tag, open_tag, tag_blocks, tag_spans, text_of};
use crate::league::Conference;
use crate::roster::SeededTeam;

use super::{conference_in, finish, json_after_marker, seed_field, seeded, str_field};

pub const HOST: &str = NFL_HOST;
pub const PATH: &str = NFL_PLAYOFF_PATH;

pub fn parse(doc: &str) -> Vec<SeededTeam> {
    let from_json = next_data(doc).map(|v| from_blob(&v)).unwrap_or_default();
    if !from_json.is_empty() {
        logd!("NFL: {} teams from __NEXT_DATA__", from_json.len());
        return finish(from_json);
    }
    logw!("NFL: __NEXT_DATA__ had no seeds, falling back to conference sections");
    finish(from_sections(doc))
}

/// `<script id="__NEXT_DATA__">{…}</script>`, else `__NEXT_DATA__ = {…}`.
fn next_data(doc: &str) -> Option<Value> {
    let tagged = tag_blocks(doc, "script")
        .into_iter()
        .find(|b| attr_value(open_tag(b), "id") == Some("__NEXT_DATA__"))
        .and_then(|b| serde_json::from_str(inner_after_open_tag(b).trim()).ok());
    tagged.or_else(|| json_after_marker(doc, &["__NEXT_DATA__"]))
}

fn looks_like_team(v: &Value) -> bool {
    ["team", "name", "abbreviation"].iter().any(|k| v.get(*k).is_some())
}

fn find_team_list(v: &Value) -> Option<&Vec<Value>> {
    match v {
        Value::Object(m) => {
            for key in ["teams", "playoffTeams"] {
                if let Some(list) = m.get(key).and_then(Value::as_array).filter(|l| !l.is_empty()) {
                    return Some(list);
                }
            }
            if let Some(s) = m.get("standings") {
                let list = s.as_array().or_else(|| s.get("teams").and_then(Value::as_array));
                if let Some(list) = list.filter(|l| !l.is_empty()) {
                    return Some(list);
                }
            }
            m.values().find_map(find_team_list)
        }
        Value::Array(a) => {
            if a.first().is_some_and(looks_like_team) {
                return Some(a);
            }
            a.iter().find_map(find_team_list)
        }
        _ => None,
    }
}

fn from_blob(blob: &Value) -> Vec<SeededTeam> {
    let Some(list) = find_team_list(blob) else {
        return Vec::new();
    };
    let mut out = Vec::new();
    for item in list {
        let team = item.get("team").filter(|t| t.is_object()).unwrap_or(item);
        let Some(name) = str_field(team, &["displayName", "name", "fullName", "teamName"]) else {
            continue;
        };
        let conference = str_field(team, &["conference"])
            .or_else(|| str_field(item, &["conference"]))
            .and_then(|c| c.trim().parse::<Conference>().ok());
        let seed = seed_field(team, &["seed"])
            .or_else(|| seed_field(item, &["seed"]))
            .or_else(|| seed_field(team, &["playoffSeed"]));
        let (Some(conference), Some(seed)) = (conference, seed) else {
            continue;
        };
        let abbr = str_field(team, &["abbreviation", "abbr"]);
        out.extend(seeded(&name, abbr.as_deref(), conference, seed));
    }
    out
}

/* ---------------- HTML sections ---------------- */

fn is_conference_section(open: &str) -> bool {
    attr_value(open, "class").is_some_and(|c| {
        let c = c.to_ascii_lowercase();
        c.contains("conference") || c.contains("afc") || c.contains("nfc")
    })
}

/// Each matching `<section>`/`<div>` runs until the next one starts. Up to
/// seven `/teams/` links per section; the seed is the last lone digit 1-7 in
/// the text just before a link, else the link's position.
fn from_sections(doc: &str) -> Vec<SeededTeam> {
    let mut starts: Vec<usize> = ["section", "div"]
        .iter()
        .flat_map(|tag| section_starts(doc, tag))
        .collect();
    starts.sort_unstable();
    starts.dedup();

    let mut out = Vec::new();
    for (i, &start) in starts.iter().enumerate() {
        let end = starts.get(i + 1).copied().unwrap_or(doc.len());
        let section = &doc[start..end];
        let Some(conference) = conference_in(&text_of(section)) else {
            continue;
        };

        let mut prev_end = 0usize;
        let mut taken = 0u8;
        for (a_s, a_e) in tag_spans(section, "a") {
            let link = &section[a_s..a_e];
            let lead = &section[prev_end..a_s];
            prev_end = a_e;
            if !attr_value(open_tag(link), "href").is_some_and(|h| h.contains("/teams/")) {
                continue;
            }
            let name = text_of(link);
            if name.is_empty() {
                continue;
            }
            taken += 1;
            if taken > MAX_SEED {
                break;
            }
            let seed = nearby_seed(&text_of(lead)).unwrap_or(taken);
            out.extend(seeded(&name, None, conference, seed));
        }
    }
    out
}

/// Byte offsets of `<tag …>` openings whose class marks a conference section.
fn section_starts(doc: &str, tag: &str) -> Vec<usize> {
    let lc = doc.to_ascii_lowercase();
    let needle = join!("<", tag);
    let mut out = Vec::new();
    let mut from = 0usize;
    while let Some(rel) = lc[from..].find(&needle) {
        let at = from + rel;
        from = at + needle.len();
        let after = lc.as_bytes().get(from).copied().unwrap_or(b'>');
        if !(after == b'>' || after.is_ascii_whitespace()) {
            continue;
        }
        if is_conference_section(open_tag(&doc[at..])) {
            out.push(at);
        }
    }
    out
}

fn nearby_seed(text: &str) -> Option<u8> {
    text.split(|c: char| !c.is_ascii_alphanumeric())
        .filter_map(|w| w.parse::<u8>().ok())
        .filter(|s| (1..=MAX_SEED).contains(s))
        .last()
}
