mod config;
mod differ;
mod directive;
mod editor;
mod i18n;
mod logging;
mod prompt;
mod resource;
mod text;
mod workflow;

use anyhow::{bail, Context, Result};
use clap::{ArgGroup, Parser, Subcommand};
use colored::*;
use std::io::IsTerminal;
use std::path::{Path, PathBuf};

use config::Config;
use differ::Differ;
use directive::{format_directive, DocumentKind};
use editor::FileDocument;
use i18n::I18n;
use prompt::{PresetPrompter, TerminalPrompter};
use workflow::{Localization, Localizer, NoticeLevel, Outcome};

#[derive(Parser)]
#[command(name = "lct")]
#[command(author, version, about = "Move hard-coded UI strings into Laravel translation files")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Extract the selected text into both translation files and replace it with a lookup
    #[command(group(ArgGroup::new("selection").required(true).args(["range", "text"])))]
    Localize {
        /// Document containing the text
        file: PathBuf,
        /// Selection as LINE:COL-LINE:COL (1-based, end exclusive)
        #[arg(long, short = 'r')]
        range: Option<String>,
        /// Select the first occurrence of this text
        #[arg(long, short = 't')]
        text: Option<String>,
        /// Translation key (skips the key prompt)
        #[arg(long, short = 'k')]
        key: Option<String>,
        /// Translated value (skips the value prompt)
        #[arg(long, short = 'v')]
        value: Option<String>,
        /// Document language id, e.g. "blade" or "php" [default: from file name]
        #[arg(long)]
        language_id: Option<String>,
        /// Project root [default: nearest folder with .lct.toml or artisan]
        #[arg(long, short = 'w')]
        workspace: Option<PathBuf>,
        /// Show what would change without writing anything
        #[arg(long)]
        dry_run: bool,
        /// Print a JSON report instead of notices
        #[arg(long)]
        json: bool,
    },
    /// Print the lookup directive for a key
    Directive {
        key: String,
        /// Document language id, e.g. "blade"
        #[arg(long, default_value = "php")]
        language_id: String,
        /// Project root [default: current directory]
        #[arg(long, short = 'w')]
        workspace: Option<PathBuf>,
    },
    /// Write the default configuration to <workspace>/.lct.toml
    Init {
        /// Project root [default: current directory]
        #[arg(long, short = 'w')]
        workspace: Option<PathBuf>,
        /// Overwrite an existing configuration file
        #[arg(long)]
        force: bool,
    },
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    logging::init()?;

    match cli.command {
        Commands::Localize {
            file,
            range,
            text,
            key,
            value,
            language_id,
            workspace,
            dry_run,
            json,
        } => {
            let workspace = match workspace {
                Some(dir) => dir,
                None => find_workspace(&file)?,
            };
            // Read on every invocation, never cached between runs
            let config = Config::load(&workspace)?;
            let i18n = I18n::new(&config.get_effective_language());
            tracing::debug!(workspace = %workspace.display(), "resolved workspace");

            let mut document = FileDocument::open(&file, language_id, &i18n)?;
            if let Some(spec) = range {
                document.select_range(&spec, &i18n)?;
            } else if let Some(needle) = text {
                document.select_text(&needle, &i18n)?;
            }

            let simple = config.use_simple_prompts() || !std::io::stdin().is_terminal();
            let mut prompter = PresetPrompter::new(key, value, TerminalPrompter::new(simple));

            let localization = Localizer::new(&config.resources, &workspace, &i18n)
                .with_dry_run(dry_run)
                .run(&mut document, &mut prompter)?;

            if json {
                println!("{}", serde_json::to_string_pretty(&localization)?);
            } else {
                print_localization(&localization, &i18n);
            }
        }
        Commands::Directive {
            key,
            language_id,
            workspace,
        } => {
            let workspace = current_or(workspace)?;
            let config = Config::load(&workspace)?;
            let kind = DocumentKind::from_language_id(&language_id);
            println!("{}", format_directive(&key, &kind, &config.resources.namespace()));
        }
        Commands::Init { workspace, force } => {
            let workspace = current_or(workspace)?;
            let config = Config::load(&workspace)?;
            let i18n = I18n::new(&config.get_effective_language());
            let path = Config::workspace_path(&workspace);
            let shown = path.display().to_string();

            if path.exists() && !force {
                bail!(i18n.t_format("config_exists", &[&shown]));
            }
            Config::default()
                .save(&path)
                .with_context(|| i18n.t_format("error_save_config", &[&shown]))?;
            println!("{}", i18n.t_format("config_written", &[&shown]).green());
        }
    }

    Ok(())
}

fn print_localization(localization: &Localization, i18n: &I18n) {
    if let Outcome::Localized(report) = &localization.outcome {
        if report.document_saved.is_none() {
            print!("{}", Differ::diff_resources(&report.resources, i18n));
        }
    }

    for notice in &localization.notices {
        match notice.level {
            NoticeLevel::Info => println!("{}", notice.message.green()),
            NoticeLevel::Warning => println!("{}", notice.message.yellow().bold()),
        }
    }
}

fn current_or(workspace: Option<PathBuf>) -> Result<PathBuf> {
    match workspace {
        Some(dir) => Ok(dir),
        None => Ok(std::env::current_dir()?),
    }
}

/// Nearest ancestor of the document holding `.lct.toml` or Laravel's
/// `artisan`, else the current directory.
fn find_workspace(document: &Path) -> Result<PathBuf> {
    let absolute = if document.is_absolute() {
        document.to_path_buf()
    } else {
        std::env::current_dir()?.join(document)
    };

    for dir in absolute.ancestors().skip(1) {
        if dir.join(config::WORKSPACE_CONFIG_FILE).is_file() || dir.join("artisan").is_file() {
            return Ok(dir.to_path_buf());
        }
    }
    Ok(std::env::current_dir()?)
}
