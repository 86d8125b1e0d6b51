use anyhow::Result;
use pocketcalc::config::Config;
use pocketcalc::logging::init_tracing;

#[cfg(not(any(feature = "tui", feature = "line")))]
compile_error!("enable the `tui` or the `line` feature");

fn main() -> Result<()> {
    init_tracing();
    run(Config::default())
}

#[cfg(feature = "tui")]
fn run(config: Config) -> Result<()> {
    pocketcalc::tui_mode::run_tui(config)
}

#[cfg(all(feature = "line", not(feature = "tui")))]
fn run(config: Config) -> Result<()> {
    pocketcalc::line_mode::run_line(config)
}
