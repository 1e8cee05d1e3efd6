//! recedit - An interactive CSV record editor for the terminal.
//!
//! # Usage
//!
//! ```bash
//! recedit papers.csv
//! recedit papers.csv --field Year --field Reviewer
//! recedit papers.csv -o reviewed.csv --log-file recedit.log
//! ```

use std::fs::File;
use std::path::{Path, PathBuf};
use std::sync::Mutex;

use anyhow::{Context, Result};
use clap::Parser;
use tracing_subscriber::EnvFilter;

use recedit::app::App;
use recedit::config::{
    ConfigFlags, clear_config_flags, global_config_path, load_config_flags, local_override_path,
    save_config_flags,
};
use recedit::session::DEFAULT_EXPORT_NAME;

/// Step through the records of a CSV table and edit selected fields
#[derive(Parser, Debug)]
#[command(name = "recedit", version, about, long_about = None)]
struct Cli {
    /// CSV file to edit (first row is the header)
    #[arg(value_name = "FILE")]
    file: PathBuf,

    /// Where `x` writes the edited table [default: updated_data.csv]
    #[arg(short, long, value_name = "PATH")]
    output: Option<PathBuf>,

    /// Column to edit; repeat for several. Skips the field selector when valid
    #[arg(short, long = "field", value_name = "NAME")]
    fields: Vec<String>,

    /// Write logs to this file instead of stderr
    #[arg(long, value_name = "PATH")]
    log_file: Option<PathBuf>,

    /// Do not capture the mouse
    #[arg(long)]
    no_mouse: bool,

    /// Save current command-line flags as defaults
    #[arg(long)]
    save: bool,

    /// Clear saved defaults
    #[arg(long)]
    clear: bool,
}

fn init_logging(log_file: Option<&Path>) -> Result<()> {
    let filter = EnvFilter::from_default_env().add_directive(tracing::Level::WARN.into());
    match log_file {
        Some(path) => {
            let file = File::create(path)
                .with_context(|| format!("Failed to create log file {}", path.display()))?;
            tracing_subscriber::fmt()
                .with_env_filter(filter)
                .with_ansi(false)
                .with_writer(Mutex::new(file))
                .init();
        }
        None => {
            tracing_subscriber::fmt().with_env_filter(filter).init();
        }
    }
    Ok(())
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    let global_path = global_config_path();
    let local_path = local_override_path();
    let cli_flags = ConfigFlags {
        output: cli.output,
        fields: cli.fields,
        log_file: cli.log_file,
        no_mouse: cli.no_mouse,
    };

    if cli.clear {
        clear_config_flags(&global_path)?;
    }
    if cli.save {
        save_config_flags(&global_path, &cli_flags)?;
    }

    let file_flags = if cli.clear {
        ConfigFlags::default()
    } else {
        let global_flags = load_config_flags(&global_path)?;
        let local_flags = load_config_flags(&local_path)?;
        global_flags.union(&local_flags)
    };
    let effective = file_flags.union(&cli_flags);

    init_logging(effective.log_file.as_deref())?;
    tracing::debug!(?effective, "effective flags");

    // Verify file exists
    if !cli.file.exists() {
        anyhow::bail!("File not found: {}", cli.file.display());
    }

    // Run the application
    let mut app = App::new(cli.file)
        .with_output_path(
            effective
                .output
                .unwrap_or_else(|| PathBuf::from(DEFAULT_EXPORT_NAME)),
        )
        .with_fields(effective.fields)
        .with_mouse(!effective.no_mouse)
        .with_config_paths(
            Some(global_path),
            local_path.exists().then_some(local_path),
        );

    app.run().context("Application error")
}
