//! CLI command definitions

use clap::{ArgAction, Parser, Subcommand};
use std::path::PathBuf;

#[derive(Parser, Debug)]
#[command(name = "katalog")]
#[command(about = "Product image attacher and website catalog exporter for Frappe ERP", long_about = None)]
#[command(version)]
pub struct Cli {
    /// Path to katalog.toml
    #[arg(long, global = true, env = "KATALOG_CONFIG", default_value = "katalog.toml")]
    pub config: PathBuf,

    /// Increase log verbosity (-v info, -vv debug, -vvv trace)
    #[arg(short, long, global = true, action = ArgAction::Count)]
    pub verbose: u8,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Write a default katalog.toml
    Init {
        /// Directory to write the config into
        #[arg(default_value = ".")]
        path: PathBuf,
    },

    /// View or modify configuration
    Config {
        /// Config key to get or set (e.g. images.max_index)
        key: Option<String>,

        /// Value to set (if provided, sets the key)
        value: Option<String>,

        /// List all configuration
        #[arg(short, long)]
        list: bool,
    },

    /// Probe the image host and attach found images to items
    AttachImages {
        /// Item codes (document names) to process
        #[arg(value_name = "ITEM_CODE", required_unless_present = "all", conflicts_with = "all")]
        items: Vec<String>,

        /// Process every enabled item
        #[arg(long)]
        all: bool,
    },

    /// Export the website product catalog
    Export {
        /// Only include items flagged for publishing
        #[arg(long)]
        only_publish: bool,

        /// Write the snapshot to a local file instead of publishing it
        #[arg(short, long, value_name = "PATH", conflicts_with = "dry_run")]
        output: Option<PathBuf>,

        /// Print the snapshot to stdout instead of publishing it
        #[arg(long)]
        dry_run: bool,
    },
}
