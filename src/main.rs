//! Tabsmith CLI entry point.
//!
//! Edits the saved tab set one action per invocation, or interactively via
//! `tabsmith shell`, and emits the standalone HTML document.

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use std::io::{self, Read, Write};
use std::path::PathBuf;

use tabsmith::application::editor::Editor;
use tabsmith::application::tabs::TabStore;
use tabsmith::commands::{self, Command};
use tabsmith::generator::ComponentKind;
use tabsmith::infra::app_config::{self, AppConfig};
use tabsmith::infra::clipboard::SystemClipboard;
use tabsmith::infra::storage::FileStore;

#[derive(Parser, Debug)]
#[command(name = "tabsmith")]
#[command(version)]
#[command(about = "Build interactive tabs and export them as one self-contained HTML file", long_about = None)]
struct Args {
    /// Config file (defaults to the platform config directory)
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    /// Directory holding the saved tabs
    #[arg(long, global = true)]
    data_dir: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Show the tabs, marking the active one
    List,

    /// Append a tab and make it active
    Add,

    /// Remove the active tab
    Remove,

    /// Make the tab at POSITION active (1-based)
    Select { position: usize },

    /// Rename the active tab (omit TEXT to clear the title)
    Title {
        #[arg(default_value = "")]
        text: String,
    },

    /// Replace the active tab's content
    Content {
        /// New content; read from --file or stdin when omitted
        text: Option<String>,

        #[arg(short, long, conflicts_with = "text")]
        file: Option<PathBuf>,
    },

    /// Generate the standalone HTML document
    Generate {
        /// Write to this file instead of stdout
        #[arg(short, long)]
        output: Option<PathBuf>,

        #[arg(long, default_value_t = ComponentKind::InteractiveTabs)]
        component: ComponentKind,
    },

    /// Copy the generated document to the clipboard
    ///
    /// On Linux the text is served until another application takes the
    /// clipboard or `copy_hold_ms` (config) runs out; without a clipboard
    /// manager it disappears after that.
    Copy,

    /// Forget the saved tabs and start over
    Reset,

    /// Print the effective configuration
    ShowConfig {
        /// Also write it to the config file
        #[arg(long)]
        write: bool,
    },

    /// Edit interactively, one command per line
    Shell,
}

fn main() -> Result<()> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("warn")).init();

    let args = Args::parse();

    let config_path = args.config.clone().unwrap_or_else(app_config::config_path);
    let config = app_config::load_config_from(&config_path);

    let command = match args.command {
        Commands::ShowConfig { write } => return show_config(&config, &config_path, write),
        Commands::Shell => None,
        Commands::List => Some(Command::List),
        Commands::Add => Some(Command::Add),
        Commands::Remove => Some(Command::Remove),
        Commands::Select { position } => Some(Command::Select(position)),
        Commands::Title { text } => Some(Command::Title(text)),
        Commands::Content { text, file } => Some(Command::Content(read_content(text, file)?)),
        Commands::Generate { output, component } => Some(Command::Generate { output, component }),
        Commands::Copy => Some(Command::Copy),
        Commands::Reset => Some(Command::Reset),
    };

    let data_dir = args
        .data_dir
        .unwrap_or_else(|| config.resolve_data_dir());
    log::debug!("Using data directory {}", data_dir.display());

    let store = TabStore::load(FileStore::in_dir(&data_dir));
    let clipboard = match command {
        Some(Command::Copy) => SystemClipboard::holding_for(config.copy_hold()),
        _ => SystemClipboard::new(),
    };
    let mut editor = Editor::with_config(store, clipboard, &config);

    let stdout = io::stdout();
    let mut out = stdout.lock();

    let Some(command) = command else {
        writeln!(out, "{}", commands::SHELL_HELP)?;
        let stdin = io::stdin();
        return commands::run_shell(&mut editor, stdin.lock(), &mut out);
    };

    commands::execute(&mut editor, command, &mut out)?;
    out.flush()?;
    Ok(())
}

fn read_content(text: Option<String>, file: Option<PathBuf>) -> Result<String> {
    if let Some(text) = text {
        return Ok(text);
    }
    if let Some(path) = file {
        return std::fs::read_to_string(&path)
            .with_context(|| format!("Failed to read {}", path.display()));
    }

    let mut content = String::new();
    io::stdin()
        .lock()
        .read_to_string(&mut content)
        .context("Failed to read content from stdin")?;
    Ok(content)
}

fn show_config(config: &AppConfig, path: &std::path::Path, write: bool) -> Result<()> {
    println!("# {}", path.display());
    println!(
        "{}",
        toml::to_string_pretty(config).context("Failed to serialize config")?
    );
    println!("# data directory: {}", config.resolve_data_dir().display());
    if write {
        app_config::save_config_to(config, path)
            .with_context(|| format!("Failed to write {}", path.display()))?;
        println!("# written");
    }
    Ok(())
}
