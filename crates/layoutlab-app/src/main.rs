//! Main application entry point (native).

use clap::{Parser, Subcommand, ValueEnum};
use layoutlab_app::{App, AppConfig, AppResult, ShortcutRegistry};
use layoutlab_core::storage::{FileStorage, Storage, default_storage};
use layoutlab_render::{Exporter, HtmlExporter, JsonExporter};
use std::path::{Path, PathBuf};
use std::process::ExitCode;

#[derive(Parser, Debug)]
#[command(name = "layoutlab", version, about = "Load, check and export LayoutLab layouts")]
struct Cli {
    /// JSON configuration file.
    #[arg(long, env = "LAYOUTLAB_CONFIG")]
    config: Option<PathBuf>,

    /// Directory for saved layouts (defaults to the platform data dir).
    #[arg(long, env = "LAYOUTLAB_STORE")]
    store: Option<PathBuf>,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Export a layout file as JSON or HTML.
    Export {
        input: PathBuf,
        #[arg(long, value_enum, default_value_t = Format::Html)]
        format: Format,
        /// Output file; `-` writes to stdout.
        #[arg(short, long)]
        output: Option<PathBuf>,
        /// HTML page title.
        #[arg(long)]
        title: Option<String>,
    },
    /// Rewrite a layout with every element clamped and re-ordered.
    Normalize {
        input: PathBuf,
        #[arg(short, long)]
        output: Option<PathBuf>,
    },
    /// Summarise a layout file.
    Check { input: PathBuf },
    /// Store a layout file as the saved layout.
    Save { input: PathBuf },
    /// Write the saved layout to a file.
    Restore {
        #[arg(short, long)]
        output: Option<PathBuf>,
    },
    /// List editor keyboard shortcuts.
    Shortcuts,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
enum Format {
    Json,
    Html,
}

impl Format {
    fn exporter(self) -> Box<dyn Exporter> {
        match self {
            Format::Json => Box::new(JsonExporter::new()),
            Format::Html => Box::new(HtmlExporter::new()),
        }
    }
}

fn write_output(path: Option<&Path>, content: &str) -> AppResult<()> {
    match path {
        None => println!("{content}"),
        Some(p) if p == Path::new("-") => println!("{content}"),
        Some(p) => {
            std::fs::write(p, content)?;
            log::info!("Wrote {}", p.display());
        }
    }
    Ok(())
}

fn storage_app(config: AppConfig, store: Option<PathBuf>) -> AppResult<App> {
    let storage: Box<dyn Storage> = match store {
        Some(dir) => Box::new(FileStorage::new(dir)?),
        None => default_storage()?,
    };
    Ok(App::with_storage(config, storage))
}

fn run(cli: Cli) -> AppResult<()> {
    let mut config = match &cli.config {
        Some(path) => AppConfig::load(path)?,
        None => AppConfig::default(),
    };

    match cli.command {
        Command::Export {
            input,
            format,
            output,
            title,
        } => {
            if let Some(title) = title {
                config.title = title;
            }
            let mut app = App::new(config);
            app.open(&input)?;
            let exporter = format.exporter();
            let content = app.export(exporter.as_ref())?;
            let output = output.unwrap_or_else(|| app.output_path(&input, exporter.as_ref()));
            write_output(Some(&output), &content)?;
        }
        Command::Normalize { input, output } => {
            let mut app = App::new(config);
            app.open(&input)?;
            write_output(output.as_deref(), &app.normalized()?)?;
        }
        Command::Check { input } => {
            let mut app = App::new(config);
            app.open(&input)?;
            print!("{}", app.report());
        }
        Command::Save { input } => {
            let mut app = storage_app(config, cli.store)?;
            app.open(&input)?;
            app.save()?;
            log::info!("Saved {} as {:?}", input.display(), app.config().editor.storage_key);
        }
        Command::Restore { output } => {
            let mut app = storage_app(config, cli.store)?;
            let restored = app.restore()?;
            log::info!("Restored {restored} elements");
            write_output(output.as_deref(), &app.normalized()?)?;
        }
        Command::Shortcuts => ShortcutRegistry::print_all(),
    }
    Ok(())
}

fn main() -> ExitCode {
    env_logger::init();
    let cli = Cli::parse();
    match run(cli) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            log::error!("{e}");
            eprintln!("layoutlab: {e}");
            ExitCode::FAILURE
        }
    }
}
