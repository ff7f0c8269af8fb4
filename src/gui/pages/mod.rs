// src/gui/pages/mod.rs
use eframe::egui;

use super::app::App;

pub mod bracket;
pub mod seeding;
pub mod standings;

pub trait Page: Send + Sync + 'static {
    fn label(&self) -> &'static str;

    /// Page body, drawn in the central panel every frame.
    fn draw(&self, ui: &mut egui::Ui, app: &mut App);

    /// Called when the tab becomes active.
    fn on_enter(&self, _app: &mut App) {}
}
