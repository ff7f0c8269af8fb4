// src/gui/components/mod.rs
pub mod export_bar;
pub mod status_bar;
pub mod tabs;
