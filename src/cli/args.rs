//! CLI argument definitions using clap

use std::path::PathBuf;

use clap::{Args, Parser, Subcommand, ValueEnum, ValueHint};

use crate::domain::DomainDominance;

/// Reorganize browser bookmark exports into a topical tree and export it as a FreeMind mind map
#[derive(Parser, Debug)]
#[command(name = "bookmind")]
#[command(author, version, about, long_about = None)]
#[command(propagate_version = true)]
pub struct Cli {
    /// Increase log verbosity (-d info, -dd debug, -ddd trace)
    #[arg(short, long, global = true, action = clap::ArgAction::Count)]
    pub debug: u8,

    /// Extra config file (overrides the global config)
    #[arg(short, long, global = true, value_hint = ValueHint::FilePath)]
    pub config: Option<PathBuf>,

    #[command(subcommand)]
    pub command: Option<Commands>,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Convert a bookmark export into a FreeMind mind map
    Convert {
        /// Bookmark export (HTML)
        #[arg(value_hint = ValueHint::FilePath)]
        input: PathBuf,

        /// Output file (default: <output_dir>/bookmarks_reorganized_<date>.mm)
        #[arg(short, long, value_hint = ValueHint::FilePath)]
        output: Option<PathBuf>,

        #[command(flatten)]
        hierarchy: HierarchyArgs,

        /// Drop bookmarks. Folders left empty are dropped too, so this is refused
        #[arg(long)]
        no_bookmarks: bool,

        /// Replace folders with flattened wrappers
        #[arg(long)]
        no_folders: bool,
    },

    /// Print the organized hierarchy as a tree
    Tree {
        /// Bookmark export (HTML)
        #[arg(value_hint = ValueHint::FilePath)]
        input: PathBuf,

        #[command(flatten)]
        hierarchy: HierarchyArgs,
    },

    /// Show bookmark counts per category
    Stats {
        /// Bookmark export (HTML)
        #[arg(value_hint = ValueHint::FilePath)]
        input: PathBuf,
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

/// Hierarchy overrides shared by `convert` and `tree`.
#[derive(Args, Debug, Clone, Default)]
pub struct HierarchyArgs {
    /// Maximum folder depth
    #[arg(long, value_parser = clap::value_parser!(u8).range(2..=8))]
    pub vertical: Option<u8>,

    /// Maximum groups per level
    #[arg(long, value_parser = clap::value_parser!(u8).range(3..=15))]
    pub horizontal: Option<u8>,

    /// Dominant-domain threshold
    #[arg(long, value_enum)]
    pub dominance: Option<DominanceArg>,
}

#[derive(ValueEnum, Debug, Clone, Copy, PartialEq, Eq)]
pub enum DominanceArg {
    /// Any domain with 2+ bookmarks gets its own folder
    Literal,
    /// A domain needs 15% of the folder being split
    Relative,
}

impl From<DominanceArg> for DomainDominance {
    fn from(arg: DominanceArg) -> Self {
        match arg {
            DominanceArg::Literal => DomainDominance::Literal,
            DominanceArg::Relative => DomainDominance::Relative,
        }
    }
}

#[derive(Subcommand, Debug)]
pub enum ConfigCommands {
    /// Show merged config
    Show,

    /// Print config template
    Init,

    /// Show config paths
    Path,
}
