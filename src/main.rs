mod config;
mod error;
mod feed;
mod interface;
mod navigator;
mod resolver;
mod session;
mod source;
mod video;
mod youtube;

use error::ConfigError;
use interface::ui;

use crossterm::{
    execute,
    terminal::{disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen},
};
use log::{error, info, LevelFilter};
use simplelog::{ConfigBuilder, WriteLogger};
use std::fs::File;
use tui::{backend::CrosstermBackend, Terminal};

const LOG_FILE: &str = "kidtube.log";

/// Logs go to a file next to the config, the terminal belongs to the interface.
async fn init_logging() -> Result<(), ConfigError> {
    let level = if std::env::var_os("KIDTUBE_DEBUG").is_some() {
        LevelFilter::Debug
    } else {
        LevelFilter::Info
    };

    let path = config::ensure_config_dir_exists().await?.join(LOG_FILE);
    let file = File::create(path).map_err(ConfigError::OpenLogFile)?;
    let config = ConfigBuilder::new()
        .add_filter_allow_str(env!("CARGO_CRATE_NAME"))
        .build();

    // Only fails if a logger is already set.
    let _ = WriteLogger::init(level, config, file);
    Ok(())
}

#[tokio::main]
async fn main() {
    if let Err(error) = init_logging().await {
        eprintln!("Logging disabled: {}", error);
    }
    info!("Starting");

    enable_raw_mode().expect("Failed to setup interface");
    let mut stdout = std::io::stdout();
    execute!(stdout, EnterAlternateScreen).expect("Failed to setup interface");

    let backend = CrosstermBackend::new(stdout);
    let mut terminal = Terminal::new(backend).expect("Failed to setup interface");

    let result = ui::run(&mut terminal).await;

    disable_raw_mode().expect("Failed to clean up");
    execute!(terminal.backend_mut(), LeaveAlternateScreen).expect("Failed to clean up");
    terminal.show_cursor().expect("Failed to clean up");

    if let Err(error) = result {
        error!("Interface failed: {}", error);
        eprintln!("Interface failed: {}", error);
        std::process::exit(1);
    }
}
