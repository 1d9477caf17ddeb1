use std::io::Read;
use std::path::PathBuf;

use clap::{Parser, Subcommand};
use miette::{IntoDiagnostic, Result};
use quire_editor_core::sanitize::{clean_generic, is_foreign_origin_markup};
use quire_editor_core::{
    Editor, EditorConfig, ViewState, encode_entities, format, normalize_for_comparison, sanitize,
};

#[derive(Parser)]
#[command(version, about = "Quire - rich-text markup cleanup and source view tools", long_about = None)]
#[command(propagate_version = true)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Clean pasted markup the way the editor does
    Sanitize {
        /// Input file (stdin when omitted)
        file: Option<PathBuf>,

        /// Skip the word-processor cleanup stage
        #[arg(long)]
        generic_only: bool,
    },
    /// Print `foreign` if the markup came from a word processor, else `native`
    Detect {
        /// Input file (stdin when omitted)
        file: Option<PathBuf>,
    },
    /// Pretty-print markup with block indentation
    Format {
        /// Input file (stdin when omitted)
        file: Option<PathBuf>,
    },
    /// Normalize markup for comparison
    Normalize {
        /// Input file (stdin when omitted)
        file: Option<PathBuf>,
    },
    /// Escape text for inclusion in markup
    Encode {
        /// Input file (stdin when omitted)
        file: Option<PathBuf>,
    },
    /// Load markup into an editor and print its source view
    Source {
        /// Input file (stdin when omitted)
        file: Option<PathBuf>,

        /// Pretty-print regardless of the config
        #[arg(long)]
        pretty: bool,

        /// Editor config file (.json or .toml)
        #[arg(long, env = "QUIRE_CONFIG")]
        config: Option<PathBuf>,
    },
}

fn main() -> Result<()> {
    init_miette();
    init_tracing();

    let cli = Cli::parse();

    match cli.command {
        Commands::Sanitize { file, generic_only } => {
            let input = read_input(file.as_ref())?;
            let output = if generic_only {
                clean_generic(&input)
            } else {
                sanitize(&input)
            };
            println!("{output}");
        }
        Commands::Detect { file } => {
            let input = read_input(file.as_ref())?;
            let origin = if is_foreign_origin_markup(&input) {
                "foreign"
            } else {
                "native"
            };
            println!("{origin}");
        }
        Commands::Format { file } => {
            let input = read_input(file.as_ref())?;
            println!("{}", format::format(&input));
        }
        Commands::Normalize { file } => {
            let input = read_input(file.as_ref())?;
            print!("{}", normalize_for_comparison(&input));
        }
        Commands::Encode { file } => {
            let input = read_input(file.as_ref())?;
            print!("{}", encode_entities(&input));
        }
        Commands::Source {
            file,
            pretty,
            config,
        } => {
            let input = read_input(file.as_ref())?;
            let config = load_config(config.as_ref(), pretty)?;
            println!("{}", source_view(config, &input)?.trim_end());
        }
    }

    Ok(())
}

/// Run markup through a rendered-to-source switch and return the source text.
fn source_view(config: EditorConfig, html: &str) -> Result<String> {
    let mut editor = Editor::in_memory(EditorConfig {
        initial_view: ViewState::Editor,
        ..config
    });
    editor.set_value(html);
    editor.switch_view(ViewState::Source)?;
    Ok(editor.source_text().to_owned())
}

fn load_config(path: Option<&PathBuf>, pretty: bool) -> Result<EditorConfig> {
    let mut config = match path {
        Some(path) => {
            tracing::debug!("Loading config from {}", path.display());
            EditorConfig::from_path(path)?
        }
        None => EditorConfig::default(),
    };
    if pretty {
        config.pretty_print_source = true;
    }
    Ok(config)
}

fn read_input(file: Option<&PathBuf>) -> Result<String> {
    match file {
        Some(path) => {
            if !path.exists() {
                return Err(miette::miette!("Input file not found: {}", path.display()));
            }
            std::fs::read_to_string(path).into_diagnostic()
        }
        None => {
            let mut input = String::new();
            std::io::stdin()
                .read_to_string(&mut input)
                .into_diagnostic()?;
            Ok(input)
        }
    }
}

fn init_tracing() {
    tracing_subscriber::fmt()
        .with_writer(std::io::stderr)
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("warn")),
        )
        .init();
}

fn init_miette() {
    miette::set_hook(Box::new(|_| {
        Box::new(
            miette::MietteHandlerOpts::new()
                .terminal_links(true)
                .with_cause_chain()
                .color(true)
                .context_lines(5)
                .tab_width(2)
                .break_words(true)
                .build(),
        )
    }))
    .expect("couldn't set the miette hook");
    miette::set_panic_hook();
}
