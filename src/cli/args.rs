//! CLI argument definitions using clap

use std::path::PathBuf;

use clap::{Parser, Subcommand, ValueEnum, ValueHint};

/// Build, flatten and rearrange JSON trees
#[derive(Parser, Debug)]
#[command(name = "treeshift")]
#[command(author, version, about, long_about = None)]
#[command(propagate_version = true)]
pub struct Cli {
    /// Verbosity: -v info, -vv debug, -vvv trace
    #[arg(short, long, global = true, action = clap::ArgAction::Count)]
    pub verbose: u8,

    /// Directory searched for .treeshift.toml (default: cwd)
    #[arg(short = 'C', long, global = true, value_hint = ValueHint::DirPath)]
    pub project_dir: Option<PathBuf>,

    #[command(subcommand)]
    pub command: Option<Commands>,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Nest flat records (id + parent id) into a tree
    Build {
        /// JSON array of records, `-` for stdin
        #[arg(value_hint = ValueHint::FilePath)]
        file: PathBuf,
        /// Fail on cycles and dangling parent ids
        #[arg(long)]
        strict: bool,
    },

    /// Check flat records for circular parent links
    Check {
        /// JSON array of records, `-` for stdin
        #[arg(value_hint = ValueHint::FilePath)]
        file: PathBuf,
    },

    /// List visible rows of a nested tree in display order
    Flatten {
        /// Nested tree JSON, `-` for stdin
        #[arg(value_hint = ValueHint::FilePath)]
        file: PathBuf,
        /// Hide the children of this node (repeatable)
        #[arg(long = "collapse", value_name = "ID")]
        collapse: Vec<String>,
        /// Ignore --collapse and list every node
        #[arg(long)]
        all: bool,
        /// Mark rows below this node as part of a drag
        #[arg(long, value_name = "ID")]
        drag: Option<String>,
        /// Emit rows as JSON
        #[arg(long)]
        json: bool,
    },

    /// Move one node relative to another
    Move {
        /// Nested tree JSON, `-` for stdin
        #[arg(value_hint = ValueHint::FilePath)]
        file: PathBuf,
        /// Path of the dragged node, e.g. `1/1-2`
        #[arg(long)]
        dragged: String,
        /// Path of the drop target
        #[arg(long)]
        target: String,
        /// Where the dragged node lands relative to the target
        #[arg(long, value_enum, default_value_t = IntentKind::After)]
        intent: IntentKind,
        /// Write the result here instead of stdout
        #[arg(short, long, value_hint = ValueHint::FilePath)]
        output: Option<PathBuf>,
    },

    /// Print a nested tree as text
    Show {
        /// Nested tree JSON, `-` for stdin
        #[arg(value_hint = ValueHint::FilePath)]
        file: PathBuf,
    },

    /// Manage settings
    Config {
        #[command(subcommand)]
        command: ConfigCommands,
    },

    /// Generate shell completions
    Completion {
        /// Shell type
        #[arg(value_enum)]
        shell: clap_complete::Shell,
    },
}

/// Drop position relative to the target.
#[derive(ValueEnum, Clone, Copy, Debug, PartialEq, Eq)]
pub enum IntentKind {
    /// Directly above the target, same parent
    Before,
    /// Directly below the target, same parent
    After,
    /// Last child of the target
    Inside,
}

#[derive(Subcommand, Debug)]
pub enum ConfigCommands {
    /// Show merged config
    Show,

    /// Show config paths
    Path,

    /// Print a config template
    Template,
}
