//! cadenza - vocal range game in the terminal
//!
//! Run with: cargo run

mod app;
mod ui;

use app::Cadenza;

fn main() -> color_eyre::Result<()> {
    color_eyre::install()?;

    let mut terminal = ratatui::init();
    let result = Cadenza::new().run(&mut terminal);
    ratatui::restore();
    result
}
