// src/config/consts.rs

// Net config
pub const ESPN_HOST: &str = "www.espn.com";
pub const ESPN_PLAYOFF_PATH: &str = "/nfl/standings/_/view/playoff";
pub const ESPN_API_HOST: &str = "site.api.espn.com";
pub const ESPN_SCOREBOARD_PATH: &str = "/apis/site/v2/sports/football/nfl/scoreboard";
pub const NFL_HOST: &str = "www.nfl.com";
pub const NFL_PLAYOFF_PATH: &str = "/standings/playoff-picture";
pub const USER_AGENT: &str =
    "Mozilla/5.0 (Windows NT 10.0; Win64; x64) AppleWebKit/537.36 (KHTML, like Gecko) Chrome/120.0.0.0 Safari/537.36";
pub const HTTP_TIMEOUT_SECS: u64 = 15;

// Local store (stands in for the hosted tables)
pub const STORE_DIR: &str = ".store";
pub const LOG_FILE: &str = "debug.log";
pub const PLAYOFF_TEAMS_FILE: &str = "playoff_teams.csv";
pub const GAMES_FILE: &str = "games.csv";

// Seeding
pub const MIN_SEED: u8 = 1;
pub const MAX_SEED: u8 = 7;

// Seasons accepted from operator input
pub const MIN_SEASON: u16 = 2020;
pub const MAX_SEASON: u16 = 2100;
pub const DEFAULT_SEASON: u16 = 2025;

// Export
pub const DEFAULT_OUT_DIR: &str = "out";
pub const DEFAULT_FILE: &str = "bracket";
