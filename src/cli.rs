//! Command-line interface definitions.
//!
//! Defines all CLI arguments and subcommands using clap.

use clap::{Parser, Subcommand};
use std::path::PathBuf;

/// Folio static site generator CLI
#[derive(Parser, Debug, Clone)]
#[command(version, about, long_about = None, arg_required_else_help = true)]
pub struct Cli {
    /// Project root (default: current directory)
    #[arg(short, long)]
    pub root: Option<PathBuf>,

    /// Config file name, relative to the root
    #[arg(short = 'C', long, default_value = "folio.toml")]
    pub config: PathBuf,

    /// Content directory path (relative to project root)
    #[arg(short, long)]
    pub content: Option<PathBuf>,

    /// Publish directory path (relative to project root)
    #[arg(short, long)]
    pub publish: Option<PathBuf>,

    /// Assets directory path (relative to project root)
    #[arg(short, long)]
    pub assets: Option<PathBuf>,

    /// subcommands
    #[command(subcommand)]
    pub command: Commands,
}

/// Available subcommands
#[derive(Subcommand, Debug, Clone)]
pub enum Commands {
    /// Init a template site
    Init {
        /// the name(path) of site directory, related to `root`
        name: Option<PathBuf>,
    },

    /// Read, build and write every document, and copy assets
    Build {
        /// Remove the publish directory before building
        #[arg(long)]
        clean: bool,
    },

    /// Create a new document
    New {
        /// Logical path, e.g. `blog/hello`
        path: String,

        /// Front-matter `title`
        #[arg(short, long)]
        title: Option<String>,

        /// Front-matter `template`
        #[arg(short = 'T', long)]
        template: Option<String>,
    },

    /// Delete a document and its published file
    Delete {
        /// Logical path, e.g. `blog/hello`
        path: String,
    },
}

impl Cli {
    pub const fn is_init(&self) -> bool {
        matches!(self.command, Commands::Init { .. })
    }
}
