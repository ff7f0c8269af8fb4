// src/bin/cli.rs
use color_eyre::eyre::eyre;
use nfl_bracket::cli;

fn main() -> color_eyre::Result<()> {
    color_eyre::install()?;
    cli::run().map_err(|e| {
        nfl_bracket::loge!("CLI: {e}");
        eyre!("{e}")
    })
}
