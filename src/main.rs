use anyhow::{Context, Result};
use clap::Parser;
use eframe::egui;
use kiri::{logging, Browser, CommandTable, Config};
use std::path::PathBuf;
use tracing::{info, warn};

/// Keyboard driven browser shell with vim-like modes
#[derive(Parser, Debug)]
#[command(name = "kiri", version, about)]
struct Cli {
    /// Addresses, files or search terms to open in tabs
    urls: Vec<String>,

    /// Configuration file (defaults to the platform config directory)
    #[arg(long, value_name = "FILE")]
    config: Option<PathBuf>,

    /// Command table (.toml or .json), overrides the configuration
    #[arg(long, value_name = "FILE")]
    commands: Option<PathBuf>,

    /// Log filter, e.g. `kiri=debug` (overrides KIRI_LOG)
    #[arg(long, value_name = "FILTER")]
    log: Option<String>,

    /// Print the resolved command table and exit
    #[arg(long)]
    dump_commands: bool,
}

fn load_commands(path: Option<&PathBuf>) -> Result<CommandTable> {
    match path {
        Some(path) => CommandTable::load(path)
            .with_context(|| format!("failed to load command table {}", path.display())),
        None => CommandTable::builtin().context("built-in command table is invalid"),
    }
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    logging::init(cli.log.as_deref());

    let config = match &cli.config {
        Some(path) => Config::load_from(path),
        None => {
            if let Err(e) = Config::create_default() {
                warn!(error = %e, "could not write the default config file");
            }
            Config::load()
        }
    };
    let table = load_commands(cli.commands.as_ref().or(config.commands.path.as_ref()))?;

    if cli.dump_commands {
        for entry in table.iter() {
            let shortcut = entry.shortcut.map(|c| c.to_string()).unwrap_or_default();
            println!(
                "{:<16} {:<10} {:<12} {}",
                entry.name, shortcut, entry.long_cmd, entry.state
            );
        }
        return Ok(());
    }

    info!(commands = table.len(), "starting kiri");
    let options = eframe::NativeOptions {
        viewport: egui::ViewportBuilder::default()
            .with_inner_size([config.window.width, config.window.height])
            .with_title("Kiri"),
        ..Default::default()
    };

    let urls = cli.urls;
    eframe::run_native(
        "Kiri",
        options,
        Box::new(move |cc| Ok(Box::new(Browser::new(cc, config, table, urls)))),
    )
    .map_err(|e| anyhow::anyhow!("failed to run the window: {e}"))
}
