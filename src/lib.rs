// src/lib.rs

#[macro_use]
pub mod macros;
#[macro_use]
pub mod log;

pub mod bracket;
pub mod cli;
pub mod config;
pub mod core;
pub mod csv;
pub mod file;
pub mod games;
pub mod gui;
pub mod import;
pub mod league;
pub mod progress;
pub mod roster;
pub mod runner;
pub mod scrape;
pub mod specs;
pub mod store;
