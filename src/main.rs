//! termloc: resolve RDF terms to exact character ranges in serialized
//! graph text (Turtle, TriG, JSON-LD) for editor highlighting.

mod classify;
mod commands;
mod context;
mod diagnostics;
mod dialect;
mod document;
mod error;
mod highlight;
mod locator;
mod prefixes;
mod quadmatch;
mod snapshot;
mod textscan;
mod types;
mod variants;
mod watch;

use std::path::PathBuf;
use std::process::ExitCode;

use clap::{Parser, Subcommand};

use crate::commands::LocateArgs;
use crate::error::Error;
use crate::types::GraphModel;

/// Command-line entry surface.
#[derive(Parser)]
#[command(name = "termloc", about = "Locate RDF terms in serialized graph text")]
struct Cli {
    /// Selected subcommand.
    #[command(subcommand)]
    command: Commands,
}

/// All termloc subcommands.
#[derive(Subcommand)]
enum Commands {
    /// Show the statement block a subject IRI resolves to
    Context {
        /// Graph file to inspect
        file: PathBuf,
        /// Subject IRI whose block to find
        subject: String,
    },
    /// Locate a term in a graph file and print its ranges
    Locate(LocateCliArgs),
    /// Manage the configured prefix table
    Prefix {
        /// Prefix table operation.
        #[command(subcommand)]
        action: PrefixAction,
    },
    /// Walk a directory and report graph files, or locate a term in each
    Scan {
        /// Root directory, defaulting to the current one
        root: Option<PathBuf>,
        /// Term IRI to locate in every graph file
        term: Option<String>,
    },
    /// Print the spellings that would be searched for a term
    Variants {
        /// Term IRI to expand
        term: String,
        /// Graph file supplying declared prefixes and dialect
        #[arg(long)]
        file: Option<PathBuf>,
    },
    /// Locate once, then re-locate whenever the file changes
    Watch(LocateCliArgs),
}

/// Shared arguments of `locate` and `watch`.
#[derive(clap::Args)]
struct LocateCliArgs {
    /// Focus-node or shape subject IRI scoping the search
    #[arg(long)]
    context: Option<String>,
    /// Graph file to search
    file: PathBuf,
    /// Print the result as JSON
    #[arg(long)]
    json: bool,
    /// Which kind of graph the file holds
    #[arg(long, value_enum, default_value = "data")]
    model: ModelArg,
    /// Prefix TOML file overriding the `.termloc.toml` lookup
    #[arg(long)]
    prefixes: Option<PathBuf>,
    /// Quad snapshot sidecar produced by the host's parser
    #[arg(long)]
    quads: Option<PathBuf>,
    /// Term IRI to locate
    term: String,
}

impl LocateCliArgs {
    /// Convert parsed CLI arguments into the command layer's input.
    fn into_args(self) -> LocateArgs {
        return LocateArgs {
            context: self.context,
            file: self.file,
            json: self.json,
            model: self.model.graph_model(),
            prefix_file: self.prefixes,
            quads: self.quads,
            term: self.term,
        };
    }
}

/// CLI spelling of the graph model.
#[derive(Clone, Copy, clap::ValueEnum)]
enum ModelArg {
    /// A data graph
    Data,
    /// A SHACL shapes graph
    Shapes,
}

impl ModelArg {
    /// The engine-side model this argument selects.
    fn graph_model(self) -> GraphModel {
        return match self {
            ModelArg::Data => GraphModel::Data,
            ModelArg::Shapes => GraphModel::Shapes,
        };
    }
}

/// Prefix table subcommands.
#[derive(Subcommand)]
enum PrefixAction {
    /// Add or replace a prefix mapping
    Add {
        /// Prefix label, without the trailing colon
        label: String,
        /// Namespace IRI the label expands to
        namespace: String,
    },
    /// List all configured prefixes
    List,
    /// Remove a prefix mapping
    Remove {
        /// Prefix label to remove
        label: String,
    },
}

fn main() -> ExitCode {
    let cli = Cli::parse();

    let outcome: Result<ExitCode, Error> = match cli.command {
        Commands::Context { file, subject } => commands::show_context(&file, &subject),
        Commands::Locate(args) => commands::locate(&args.into_args()),
        Commands::Prefix { action } => match action {
            PrefixAction::Add { label, namespace } => {
                prefixes::cmd_add(&label, &namespace).map(|()| return ExitCode::SUCCESS)
            },
            PrefixAction::List => prefixes::cmd_list().map(|()| return ExitCode::SUCCESS),
            PrefixAction::Remove { label } => {
                prefixes::cmd_remove(&label).map(|()| return ExitCode::SUCCESS)
            },
        },
        Commands::Scan { root, term } => commands::scan(
            root.as_deref().unwrap_or(std::path::Path::new(".")),
            term.as_deref(),
        ),
        Commands::Variants { term, file } => {
            commands::show_variants(&term, file.as_deref()).map(|()| return ExitCode::SUCCESS)
        },
        Commands::Watch(args) => watch::run(&args.into_args()),
    };

    return match outcome {
        Ok(code) => code,
        Err(e) => {
            diagnostics::print_error(&e);
            ExitCode::FAILURE
        },
    };
}
