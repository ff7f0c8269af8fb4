// src/config/state.rs
use super::options::AppOptions;
use crate::bracket::Round;

#[derive(Clone, Debug)]
pub struct GuiState {
    pub window_w: u32,
    pub window_h: u32,

    /// Active tab index into router::PAGES
    pub current_page_index: usize,

    /// Season text box (committed into options.season on Enter / focus loss)
    pub season_text: String,

    /// Bracket page -> round being shown
    pub bracket_round: Round,

    /// Bracket page -> show game id column
    pub bracket_show_ids: bool,
}

impl Default for GuiState {
    fn default() -> Self {
        Self {
            window_w: 1000,
            window_h: 680,
            current_page_index: 0,
            season_text: s!(),
            bracket_round: Round::WildCard,
            bracket_show_ids: false,
        }
    }
}

#[derive(Clone, Debug, Default)]
pub struct AppState {
    pub options: AppOptions,
    pub gui: GuiState,
}
