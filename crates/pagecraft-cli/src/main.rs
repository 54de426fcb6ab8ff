//! Pagecraft CLI - inspect, validate, and query page files

use std::fs;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result, bail};
use clap::{Parser, Subcommand};
use pagecraft_dom::BindingKind;
use pagecraft_engine::{Config, Editor};
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(name = "pagecraft")]
#[command(about = "Pagecraft page file tool", version = pagecraft_engine::VERSION)]
struct Cli {
    /// Editor configuration (JSON)
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Summarize a page: elements, tags, events, bindings, data sources
    Inspect {
        /// Path to the page file
        file: PathBuf,
    },
    /// Decode a page strictly; fails on the first malformed node
    Validate {
        /// Path to the page file
        file: PathBuf,
    },
    /// Print the first element with a tag
    Find {
        /// Path to the page file
        file: PathBuf,
        /// Tag to look for
        #[arg(long)]
        tag: String,
    },
    /// Decode and re-serialize a page, dropping malformed nodes
    Normalize {
        /// Path to the page file
        file: PathBuf,
        /// Write here instead of stdout
        #[arg(long, short)]
        output: Option<PathBuf>,
    },
}

fn main() -> Result<()> {
    // Initialize logging
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();
    let config = load_config(cli.config.as_deref())?;

    match cli.command {
        Commands::Inspect { file } => {
            let editor = load_page(&file, config)?;
            print!("{}", Summary::of(&editor));
        }
        Commands::Validate { file } => {
            let config = Config {
                strict_decode: true,
                ..config
            };
            let editor = load_page(&file, config)?;
            println!("{}: ok ({} elements)", file.display(), editor.stats().element_count);
        }
        Commands::Find { file, tag } => {
            let editor = load_page(&file, config)?;
            let root = editor.root();
            let Some(element) = root.find_by_tag(&tag) else {
                bail!("no element tagged `{}` in {}", tag, file.display());
            };
            println!("{}", serde_json::to_string_pretty(&element.serialize())?);
        }
        Commands::Normalize { file, output } => {
            let editor = load_page(&file, config)?;
            for err in editor.load_errors() {
                tracing::warn!("dropped {}", err);
            }
            let text = serde_json::to_string_pretty(&editor.serialize())?;
            match output {
                Some(path) => fs::write(&path, text).with_context(|| format!("writing {}", path.display()))?,
                None => println!("{text}"),
            }
        }
    }

    Ok(())
}

fn load_config(path: Option<&Path>) -> Result<Config> {
    let Some(path) = path else {
        return Ok(Config::default());
    };
    let text = fs::read_to_string(path).with_context(|| format!("reading config {}", path.display()))?;
    serde_json::from_str(&text).with_context(|| format!("parsing config {}", path.display()))
}

fn load_page(path: &Path, config: Config) -> Result<Editor> {
    tracing::info!("Loading: {}", path.display());
    let text = fs::read_to_string(path).with_context(|| format!("reading {}", path.display()))?;
    Editor::load(&text, config).with_context(|| format!("decoding {}", path.display()))
}

/// Counts reported by `inspect`
#[derive(Debug, Default, PartialEq, Eq)]
struct Summary {
    elements: usize,
    tags: Vec<String>,
    events: usize,
    actions: usize,
    bindings: [usize; 3],
    repeated: usize,
    data_sources: usize,
    dropped: usize,
}

impl Summary {
    fn of(editor: &Editor) -> Self {
        let root = editor.root();
        let mut summary = Summary {
            data_sources: editor.sources().sources().len(),
            dropped: editor.load_errors().len(),
            ..Summary::default()
        };
        for element in root.iter() {
            summary.elements += 1;
            if let Some(tag) = &element.tag {
                summary.tags.push(tag.clone());
            }
            summary.events += element.events.len();
            summary.actions += element.events.iter().map(|e| e.actions.len()).sum::<usize>();
            for (i, kind) in BindingKind::ALL.iter().enumerate() {
                if element.bindings.contains_key(kind) {
                    summary.bindings[i] += 1;
                }
            }
            if element.repeat_from.is_some() {
                summary.repeated += 1;
            }
        }
        summary
    }
}

impl std::fmt::Display for Summary {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        writeln!(f, "elements:     {}", self.elements)?;
        writeln!(f, "tags:         {}", self.tags.join(", "))?;
        writeln!(f, "events:       {} ({} actions)", self.events, self.actions)?;
        let bindings: Vec<String> = BindingKind::ALL
            .iter()
            .zip(self.bindings)
            .map(|(kind, count)| format!("{} {}", kind.as_str(), count))
            .collect();
        writeln!(f, "bindings:     {}", bindings.join(", "))?;
        writeln!(f, "repeated:     {}", self.repeated)?;
        writeln!(f, "data sources: {}", self.data_sources)?;
        if self.dropped > 0 {
            writeln!(f, "dropped:      {}", self.dropped)?;
        }
        Ok(())
    }
}
