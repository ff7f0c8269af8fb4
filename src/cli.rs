// src/cli.rs
use std::error::Error;
use std::io::{self, BufRead, Write};
use std::path::PathBuf;

use crate::bracket::Round;
use crate::config::options::{parse_season, AppOptions, ExportFormat, MergeMode, Source};
use crate::league::{self, Conference};
use crate::progress::Progress;
use crate::runner;
use crate::scrape::{EspnScoreboard, GameIdLookup};
use crate::store::Store;

#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Command {
    Populate,
    Generate,
    Winner,
    Show,
    Export,
    ListTeams,
    Help,
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct CliArgs {
    pub command: Command,
    pub options: AppOptions,
    pub week: Option<u8>,
    pub game: Option<String>,
    pub team: Option<String>,
}

/// Prints each step to stderr.
struct CliProgress;

impl Progress for CliProgress {
    fn log(&mut self, msg: &str) {
        eprintln!("{msg}");
    }
    fn step(&mut self, label: &str) {
        eprintln!("  ✓ {label}");
    }
}

pub fn run() -> Result<(), Box<dyn Error>> {
    let args = parse_args(std::env::args().skip(1))?;
    run_with(args, &Store::default())
}

pub fn run_with(args: CliArgs, store: &Store) -> Result<(), Box<dyn Error>> {
    let season = args.options.season;
    let mut prompt = prompt_yes_no;

    match args.command {
        Command::Help => eprintln!("{}", include_str!("cli_help.txt")),

        Command::ListTeams => {
            for conf in Conference::BOTH {
                for t in league::conference_teams(conf) {
                    println!("{},{},{}", conf, t.abbreviation, t.name);
                }
            }
        }

        Command::Populate => {
            let mut progress = CliProgress;
            let out = runner::populate(&args.options, store, &mut prompt, Some(&mut progress))?;
            println!("{}", out.preview);
            if let Some(p) = &out.preview_path {
                println!("Preview JSON saved to: {}", p.display());
            }
            match out.report {
                Some(r) => println!(
                    "Saved {season}: {} inserted, {} updated, {} removed",
                    r.inserted, r.updated, r.removed
                ),
                None => println!("Insertion cancelled."),
            }
        }

        Command::Generate => {
            let round = match args.week {
                Some(w) => Round::from_week(w).ok_or_else(|| format!("Week must be 1-4, got {w}"))?,
                None => runner::current_round(&store.load_games(season)?, season),
            };
            println!("Generating {round} (week {}) for {season}", round.week());
            let skip = args.options.populate.skip_approval;
            let mut approve = |preview: &str| skip || prompt(preview);
            let lookup = EspnScoreboard;
            let ids = args.options.espn_game_ids.then_some(&lookup as &dyn GameIdLookup);
            let out = runner::generate(season, round, store, ids, &mut approve)?;
            for issue in &out.outcome.issues {
                println!("  ! {issue}");
            }
            match (out.outcome.games.is_empty(), out.report) {
                (true, _) => println!("No games generated."),
                (false, Some(r)) => {
                    print!("{}", out.preview);
                    println!(
                        "{}: {} inserted, {} updated, {} unchanged, {} stale removed",
                        plural!(r.total(), "game"), r.inserted, r.updated, r.unchanged, r.removed
                    );
                }
                (false, None) => println!("Nothing saved."),
            }
        }

        Command::Winner => {
            let game = args.game.as_deref().ok_or("winner needs --game <id>")?;
            let team = args.team.as_deref().ok_or("winner needs --team <name>")?;
            let g = runner::record_winner(season, game, team, store)?;
            println!("Recorded: {g}");
        }

        Command::Show => print!("{}", runner::bracket_summary(season, store)?),

        Command::Export => {
            let path = runner::export_bracket(season, &args.options.export, store)?;
            println!("Wrote {}", path.display());
        }
    }
    Ok(())
}

/// `(yes/no)` on stdin after showing `preview`. EOF counts as no.
fn prompt_yes_no(preview: &str) -> bool {
    println!("{preview}");
    let stdin = io::stdin();
    loop {
        print!("\nDo you want to save these changes? (yes/no): ");
        let _ = io::stdout().flush();
        let mut line = s!();
        match stdin.lock().read_line(&mut line) {
            Ok(0) | Err(_) => return false,
            Ok(_) => {}
        }
        match line.trim().to_ascii_lowercase().as_str() {
            "yes" | "y" => return true,
            "no" | "n" => return false,
            _ => println!("Please enter 'yes' or 'no'"),
        }
    }
}

pub fn parse_args<I>(args: I) -> Result<CliArgs, Box<dyn Error>>
where
    I: IntoIterator<Item = String>,
{
    let mut args = args.into_iter();
    let mut out = CliArgs {
        command: Command::Help,
        options: AppOptions::default(),
        week: None,
        game: None,
        team: None,
    };
    let mut command_seen = false;

    while let Some(a) = args.next() {
        let mut value = |flag: &str| args.next().ok_or_else(|| format!("Missing value for {flag}"));
        match a.as_str() {
            "--season" | "-s" => out.options.season = parse_season(&value(&a)?)?,
            "--source" => out.options.populate.source = value(&a)?.parse::<Source>()?,
            "--teams-file" => {
                out.options.populate.teams_file = Some(PathBuf::from(value(&a)?));
                out.options.populate.source = Source::File;
            }
            "--teams" => {
                out.options.populate.teams_inline = Some(value(&a)?);
                out.options.populate.source = Source::Manual;
            }
            "--html" => out.options.populate.html_file = Some(PathBuf::from(value(&a)?)),
            "--update" => out.options.populate.mode = MergeMode::Update,
            "--yes" | "-y" => out.options.populate.skip_approval = true,
            "--save-preview" => out.options.populate.save_preview = true,
            "--no-espn-ids" => out.options.espn_game_ids = false,
            "--week" | "-w" => {
                let v = value(&a)?;
                out.week = Some(v.parse().map_err(|_| format!("Week must be 1-4, got {v}"))?);
            }
            "--game" | "-g" => out.game = Some(value(&a)?),
            "--team" | "-t" => out.team = Some(value(&a)?),
            "-o" | "--out" => out.options.export.set_path(&value(&a)?),
            "--format" => out.options.export.format = value(&a)?.parse::<ExportFormat>()?,
            "--no-headers" => out.options.export.include_headers = false,
            "-h" | "--help" => {
                out.command = Command::Help;
                return Ok(out);
            }
            cmd if !command_seen && !cmd.starts_with('-') => {
                out.command = match cmd {
                    "populate" => Command::Populate,
                    "generate" => Command::Generate,
                    "winner" => Command::Winner,
                    "show" => Command::Show,
                    "export" => Command::Export,
                    "list-teams" => Command::ListTeams,
                    "help" => Command::Help,
                    other => return Err(format!("Unknown command: {other}").into()),
                };
                command_seen = true;
            }
            _ => return Err(format!("Unknown arg: {a}").into()),
        }
    }
    Ok(out)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn parse(line: &str) -> CliArgs {
        parse_args(line.split_whitespace().map(String::from)).unwrap()
    }

    #[test]
    fn populate_flags() {
        let a = parse("populate --season 2024 --teams-file teams.csv --update --yes");
        assert_eq!(a.command, Command::Populate);
        assert_eq!(a.options.season, 2024);
        assert_eq!(a.options.populate.source, Source::File);
        assert_eq!(a.options.populate.mode, MergeMode::Update);
        assert!(a.options.populate.skip_approval);
    }

    #[test]
    fn generate_week_and_unknown_args() {
        assert_eq!(parse("generate -w 2").week, Some(2));
        assert!(parse("generate").options.espn_game_ids);
        assert!(!parse("generate --no-espn-ids").options.espn_game_ids);
        assert!(parse_args(["generate", "--bogus"].map(String::from)).is_err());
        assert!(parse_args(["frobnicate"].map(String::from)).is_err());
        assert!(parse_args(["--season"].map(String::from)).is_err());
    }

    #[test]
    fn no_args_is_help() {
        assert_eq!(parse("").command, Command::Help);
    }
}
