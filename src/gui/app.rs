// src/gui/app.rs
use std::{
    error::Error,
    sync::{Arc, Mutex},
};

use eframe::egui;

use crate::{
    bracket::{AdvanceIssue, Game},
    config::{options::parse_season, state::AppState},
    roster::{Roster, SeededTeam},
    runner::GeneratePlan,
    store::Store,
};

use super::{components, pages::Page, router};

pub fn run(options: eframe::NativeOptions) -> Result<(), Box<dyn Error>> {
    eframe::run_native(
        "NFL Playoff Bracket",
        options,
        Box::new(|_cc| Ok(Box::new(App::new(AppState::default(), Store::default())))),
    )?;
    Ok(())
}

pub struct App {
    // single source of truth (UI thread only)
    pub state: AppState,
    pub store: Store,

    // seeding being edited for state.options.season (saved on demand)
    pub roster: Roster,

    // last fetched or imported standings, not yet applied
    pub standings: Vec<SeededTeam>,

    // every stored game; pages filter by season/round
    pub games: Vec<Game>,
    pub issues: Vec<AdvanceIssue>,
    // generated round shown for confirmation, not yet written
    pub pending: Option<GeneratePlan>,

    // populate inputs
    pub teams_file_text: String,
    pub html_file_text: String,

    // output text field UX (we map this <-> ExportOptions)
    pub out_path_text: String,
    pub out_path_dirty: bool,

    pub status: Arc<Mutex<String>>,
}

impl App {
    pub fn new(mut state: AppState, store: Store) -> Self {
        let season = state.options.season;
        state.gui.season_text = season.to_string();
        let out_path_text = state.options.export.out_path(season).to_string_lossy().into_owned();

        let mut app = Self {
            state,
            store,
            roster: Roster::new(season),
            standings: Vec::new(),
            games: Vec::new(),
            issues: Vec::new(),
            pending: None,
            teams_file_text: s!(),
            html_file_text: s!(),
            out_path_text,
            out_path_dirty: false,
            status: Arc::new(Mutex::new(s!("Idle"))),
        };
        app.reload_season();
        logf!("Init: season={}, store={}", season, app.store.dir().display());
        app
    }

    /* ---------- tiny helpers ---------- */

    #[inline]
    pub fn season(&self) -> u16 { self.state.options.season }

    #[inline]
    pub fn current_index(&self) -> usize { self.state.gui.current_page_index }

    #[inline]
    pub fn current_page(&self) -> &'static dyn Page {
        let pages = router::all_pages();
        pages[self.current_index().min(pages.len() - 1)]
    }

    pub fn status<T: Into<String>>(&self, msg: T) {
        if let Ok(mut s) = self.status.lock() {
            *s = msg.into();
        }
    }

    pub fn status_text(&self) -> String {
        self.status.lock().map(|s| s.clone()).unwrap_or_default()
    }

    /// Switch tabs and let the new page refresh what it shows.
    pub fn set_current_index(&mut self, idx: usize) {
        let prev = self.current_page().label();
        self.state.gui.current_page_index = idx;
        let page = self.current_page();
        logf!("UI: Tab switch {} → {}", prev, page.label());
        page.on_enter(self);
    }

    /// Stored roster and games for the selected season.
    pub fn reload_season(&mut self) {
        let season = self.season();
        match self.store.load_roster(season) {
            Ok(r) => {
                logd!("Store: {} seeded teams for {}", r.len(), season);
                self.roster = r;
            }
            Err(e) => {
                loge!("Store: roster load failed for {season}: {e}");
                self.roster = Roster::new(season);
                self.status(format!("Could not load seeding: {e}"));
            }
        }
        self.reload_games();
        self.issues.clear();
        self.pending = None;
    }

    pub fn reload_games(&mut self) {
        match self.store.load_games(self.season()) {
            Ok(g) => self.games = g,
            Err(e) => {
                loge!("Store: games load failed: {e}");
                self.status(format!("Could not load games: {e}"));
            }
        }
    }

    /// Apply the season text box. Bad input restores the previous season.
    pub fn commit_season_text(&mut self) {
        match parse_season(&self.state.gui.season_text) {
            Ok(season) if season != self.season() => {
                logf!("UI: Season {} → {}", self.season(), season);
                self.state.options.season = season;
                if !self.out_path_dirty {
                    self.out_path_text = self.state.options.export.out_path(season).to_string_lossy().into_owned();
                }
                self.reload_season();
                self.status(format!("Season {season}"));
            }
            Ok(_) => {}
            Err(e) => {
                self.state.gui.season_text = self.season().to_string();
                self.status(e);
            }
        }
    }
}

impl eframe::App for App {
    fn update(&mut self, ctx: &egui::Context, _frame: &mut eframe::Frame) {
        egui::TopBottomPanel::top("tabs").show(ctx, |ui| {
            components::tabs::draw(ui, self);
        });

        egui::TopBottomPanel::bottom("status").show(ctx, |ui| {
            components::status_bar::draw(ui, self);
        });

        egui::CentralPanel::default().show(ctx, |ui| {
            let page = self.current_page();
            ui.heading(format!("{} · {}", page.label(), self.season()));
            ui.separator();
            page.draw(ui, self);
        });
    }
}
