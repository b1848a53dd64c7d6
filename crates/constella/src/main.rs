use clap::Parser;
use constella_config::Config;

mod app;
mod cli;
mod host;
mod logging;

use app::App;
use cli::Cli;

fn main() -> color_eyre::Result<()> {
    color_eyre::install()?;
    let cli = Cli::parse();

    let log_path = logging::init(cli.verbose)?;

    let mut config = match &cli.config {
        Some(path) => Config::load_from(path)?,
        None => Config::load()?,
    };
    cli.apply(&mut config);
    config.validate()?;
    tracing::info!(
        log = ?log_path,
        theme = config.theme.name(),
        particles = config.field.particle_count,
        "starting constella"
    );

    let terminal = ratatui::init();
    let result = App::new(&config).run(terminal);
    ratatui::restore();
    result
}
