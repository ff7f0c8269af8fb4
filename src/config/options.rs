// src/config/options.rs
use std::ffi::OsString;
use std::fmt;
use std::path::{Path, PathBuf};
use std::str::FromStr;

use super::consts::*;

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct AppOptions {
    pub season: u16,
    pub populate: PopulateOptions,
    pub export: ExportOptions,
    /// Look up ESPN game ids when generating a round.
    pub espn_game_ids: bool,
}

impl Default for AppOptions {
    fn default() -> Self {
        Self {
            season: DEFAULT_SEASON,
            populate: PopulateOptions::default(),
            export: ExportOptions::default(),
            espn_game_ids: true,
        }
    }
}

/// Where the seeded teams come from.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Source {
    Espn,
    Nfl,
    /// `--teams-file` (JSON or CSV)
    File,
    /// `--teams '<json>'`
    Manual,
}

impl Source {
    pub fn label(self) -> &'static str {
        match self {
            Source::Espn => "ESPN",
            Source::Nfl => "NFL.com",
            Source::File => "File",
            Source::Manual => "Manual",
        }
    }

    /// Lowercase key used in file names and on the command line.
    pub fn key(self) -> &'static str {
        match self {
            Source::Espn => "espn",
            Source::Nfl => "nfl",
            Source::File => "file",
            Source::Manual => "manual",
        }
    }
}

impl FromStr for Source {
    type Err = String;
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "espn" => Ok(Source::Espn),
            "nfl" => Ok(Source::Nfl),
            "file" => Ok(Source::File),
            "manual" => Ok(Source::Manual),
            other => Err(format!("Unknown source: {other} (expected espn|nfl|file|manual)")),
        }
    }
}

impl fmt::Display for Source {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// How a new roster lands on top of what is already stored for the season.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum MergeMode {
    /// Delete the season's rows, insert the new set.
    Replace,
    /// Upsert by (conference, seed); untouched seeds stay.
    Update,
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct PopulateOptions {
    pub source: Source,
    pub teams_file: Option<PathBuf>,
    pub teams_inline: Option<String>,
    /// Parse a saved standings page instead of fetching it.
    pub html_file: Option<PathBuf>,
    pub mode: MergeMode,
    pub skip_approval: bool,
    pub save_preview: bool,
}

impl Default for PopulateOptions {
    fn default() -> Self {
        Self {
            source: Source::Espn,
            teams_file: None,
            teams_inline: None,
            html_file: None,
            mode: MergeMode::Replace,
            skip_approval: false,
            save_preview: false,
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ExportFormat {
    Csv,
    Tsv,
}

impl ExportFormat {
    pub fn ext(&self) -> &'static str {
        match self { ExportFormat::Csv => "csv", ExportFormat::Tsv => "tsv" }
    }
    pub fn delim(&self) -> char {
        match self { ExportFormat::Csv => ',', ExportFormat::Tsv => '\t' }
    }
}

impl FromStr for ExportFormat {
    type Err = String;
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "csv" => Ok(ExportFormat::Csv),
            "tsv" => Ok(ExportFormat::Tsv),
            other => Err(format!("Unknown format: {other}")),
        }
    }
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ExportOptions {
    pub format: ExportFormat,
    pub include_headers: bool,
    out_path: OutputPath,
}

impl Default for ExportOptions {
    fn default() -> Self {
        Self {
            format: ExportFormat::Csv,
            include_headers: true,
            out_path: OutputPath::default(),
        }
    }
}

impl ExportOptions {
    /// `<dir>/<stem>-<season>.<ext>`; the format always decides the extension.
    pub fn out_path(&self, season: u16) -> PathBuf {
        let stem = self.out_path.file_stem.to_string_lossy();
        let name = join!(&*stem, "-", &season.to_string(), ".", self.format.ext());
        self.out_path.dir.join(name)
    }

    /// Parse operator text into dir + stem. A pasted extension is ignored.
    pub fn set_path(&mut self, text: &str) {
        let p = Path::new(text.trim());
        if let Some(parent) = p.parent() {
            self.out_path.dir = parent.to_path_buf();
        }
        if let Some(stem) = p.file_stem() {
            self.out_path.file_stem = stem.to_os_string();
        }
    }

    pub fn delim(&self) -> char {
        self.format.delim()
    }
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct OutputPath {
    dir: PathBuf,
    file_stem: OsString, // without extension or season suffix
}

impl Default for OutputPath {
    fn default() -> Self {
        Self {
            dir: PathBuf::from(DEFAULT_OUT_DIR),
            file_stem: OsString::from(DEFAULT_FILE),
        }
    }
}

/// Accepts a season typed by the operator.
pub fn parse_season(text: &str) -> Result<u16, String> {
    let v: u16 = text
        .trim()
        .parse()
        .map_err(|_| format!("Not a season year: {}", text.trim()))?;
    if !(MIN_SEASON..=MAX_SEASON).contains(&v) {
        return Err(format!("Season must be between {MIN_SEASON} and {MAX_SEASON}"));
    }
    Ok(v)
}
