//! Main application entry point.
//!
//! `figurine` drives the editor core without a UI: it creates, inspects and
//! replays scripted edits on documents.

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use figurine_app::{DocumentSummary, Script, Session, ShortcutRegistry, load_config};
use figurine_core::{DocumentStore, EditorConfig, FileStorage};
use std::path::{Path, PathBuf};

/// Figurine editor core driver
#[derive(Parser, Debug)]
#[command(name = "figurine")]
#[command(about = "Headless driver for the Figurine vector editor core")]
#[command(version)]
struct Cli {
    /// Editor configuration file (JSON)
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    /// Directory for the local save slot (defaults to the platform data dir)
    #[arg(long, global = true)]
    data_dir: Option<PathBuf>,

    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Create an empty document
    New {
        /// Document name
        #[arg(long, default_value = "Untitled")]
        name: String,
        /// Output file or directory
        #[arg(short, long)]
        out: Option<PathBuf>,
    },
    /// Replay a scripted editing session
    Replay {
        /// Session script (JSON)
        script: PathBuf,
        /// Document to start from instead of an empty one
        #[arg(short, long, conflicts_with = "from_local")]
        input: Option<PathBuf>,
        /// Start from the document in the local save slot
        #[arg(long)]
        from_local: bool,
        /// Output file or directory
        #[arg(short, long)]
        out: Option<PathBuf>,
        /// Also write the result to the local save slot
        #[arg(long)]
        save_local: bool,
    },
    /// Print a summary of a document file
    Info {
        /// Document file (JSON or .figma)
        file: PathBuf,
    },
    /// List keyboard shortcuts
    Shortcuts,
}

fn main() -> Result<()> {
    env_logger::init();

    let cli = Cli::parse();
    let config = load_config(cli.config.as_deref())?;

    match cli.command {
        Some(Commands::New { name, out }) => {
            let mut store = DocumentStore::with_config(config);
            store.set_file_name(name);
            write_document(&store, out.as_deref())
        }
        Some(Commands::Replay {
            script,
            input,
            from_local,
            out,
            save_local,
        }) => replay(
            config,
            &script,
            input.as_deref(),
            from_local,
            out.as_deref(),
            save_local,
            cli.data_dir,
        ),
        Some(Commands::Info { file }) => {
            let store = open(config, &file)?;
            println!("{}", DocumentSummary::of(&store));
            Ok(())
        }
        Some(Commands::Shortcuts) => {
            ShortcutRegistry::print_all();
            Ok(())
        }
        None => {
            let mut cmd = <Cli as clap::CommandFactory>::command();
            cmd.print_help()?;
            println!();
            Ok(())
        }
    }
}

fn storage(data_dir: Option<PathBuf>) -> Result<FileStorage> {
    let storage = match data_dir {
        Some(dir) => FileStorage::new(dir),
        None => FileStorage::default_location(),
    };
    storage.context("Failed to open local storage")
}

fn open(config: EditorConfig, path: &Path) -> Result<DocumentStore> {
    let json = std::fs::read_to_string(path)
        .with_context(|| format!("Failed to read {}", path.display()))?;
    let mut store = DocumentStore::with_config(config);
    store
        .open_file(&json)
        .with_context(|| format!("Failed to open {}", path.display()))?;
    Ok(store)
}

fn replay(
    config: EditorConfig,
    script: &Path,
    input: Option<&Path>,
    from_local: bool,
    out: Option<&Path>,
    save_local: bool,
    data_dir: Option<PathBuf>,
) -> Result<()> {
    let script = Script::from_path(script)?;
    let mut store = match input {
        Some(path) => open(config, path)?,
        None => DocumentStore::with_config(config),
    };
    if from_local {
        store
            .load_local(&storage(data_dir.clone())?)
            .context("Failed to load the local save slot")?;
    }

    let mut session = Session::new(store.config());
    let report = session.run(&mut store, &script);
    println!("Replayed {} step(s), {} without effect", report.steps, report.ignored);
    println!("{}", DocumentSummary::of(&store));

    if save_local {
        let storage = storage(data_dir)?;
        store.save_file(&storage).context("Failed to save locally")?;
        println!("Saved to {}", storage.base_path().display());
    }
    if out.is_some() || !save_local {
        write_document(&store, out)?;
    }
    Ok(())
}

/// Write the document as a download would. A directory target receives the
/// default file name.
fn write_document(store: &DocumentStore, out: Option<&Path>) -> Result<()> {
    let (name, bytes) = store.save_file_as().context("Failed to serialize document")?;
    let path = match out {
        Some(path) if path.is_dir() => path.join(&name),
        Some(path) => path.to_path_buf(),
        None => PathBuf::from(&name),
    };
    std::fs::write(&path, bytes).with_context(|| format!("Failed to write {}", path.display()))?;
    log::info!("Wrote {}", path.display());
    println!("Wrote {}", path.display());
    Ok(())
}
