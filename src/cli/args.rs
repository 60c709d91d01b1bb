//! CLI argument definitions using clap

use std::path::PathBuf;

use clap::{Args, Parser, Subcommand, ValueHint};

/// Render and search labeled trees built from outlines or directories
#[derive(Parser, Debug)]
#[command(name = "multitree")]
#[command(author, version, about, long_about = None)]
#[command(propagate_version = true)]
pub struct Cli {
    /// Increase log verbosity (-d info, -dd debug, -ddd trace)
    #[arg(short, long, global = true, action = clap::ArgAction::Count)]
    pub debug: u8,

    /// Directory holding a local .multitree.toml
    #[arg(short = 'C', long, global = true, value_hint = ValueHint::DirPath)]
    pub config_dir: Option<PathBuf>,

    #[command(subcommand)]
    pub command: Option<Commands>,
}

/// Overrides for the configured render settings
#[derive(Args, Debug, Clone, Default)]
pub struct StyleArgs {
    /// Draw with ASCII instead of box-drawing characters
    #[arg(long)]
    pub ascii: bool,

    /// Print tabs and newlines in labels verbatim
    #[arg(long)]
    pub no_escape: bool,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Render an indented outline as a tree
    Render {
        /// Outline file, '-' for stdin
        #[arg(value_hint = ValueHint::FilePath)]
        file: PathBuf,
        /// Spaces per indentation level
        #[arg(long)]
        indent: Option<usize>,
        #[command(flatten)]
        style: StyleArgs,
    },

    /// Render a directory hierarchy
    Dir {
        /// Directory to list
        #[arg(default_value = ".", value_hint = ValueHint::DirPath)]
        path: PathBuf,
        /// Levels to descend
        #[arg(long)]
        max_depth: Option<usize>,
        /// Include entries starting with a dot
        #[arg(long)]
        hidden: bool,
        #[command(flatten)]
        style: StyleArgs,
    },

    /// Find the shallowest entry carrying a label and print its path
    Search {
        /// Outline file, '-' for stdin
        #[arg(value_hint = ValueHint::FilePath)]
        file: PathBuf,
        /// Label to look for
        value: String,
        /// Only look at the direct children of the root
        #[arg(long)]
        shallow: bool,
        /// Spaces per indentation level
        #[arg(long)]
        indent: Option<usize>,
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

#[derive(Subcommand, Debug)]
pub enum ConfigCommands {
    /// Print the effective settings as TOML
    Show,
    /// Print the global config file location
    Path,
}
