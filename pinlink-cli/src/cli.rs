//! Command line definitions

use std::path::PathBuf;

use clap::{Parser, Subcommand};

/// Deploy static sites to IPFS through the pinning service
#[derive(Debug, Parser)]
#[command(name = "pinlink")]
#[command(version = env!("CARGO_PKG_VERSION"))]
#[command(about = "Deploy sites to IPFS, bind domains, export and import CAR archives")]
pub struct Cli {
    /// Verbose logging (debug level)
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// Override the API base URL
    #[arg(long, global = true)]
    pub api_base: Option<String>,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Debug, Subcommand)]
pub enum Commands {
    /// Upload a file or directory; prompts for missing input when PATH is omitted
    Upload {
        /// File or directory to deploy
        path: Option<PathBuf>,
        /// Bind a subdomain label or a custom domain after upload
        #[arg(short, long)]
        domain: Option<String>,
        /// Treat the domain as a custom DNS domain even without a dot
        #[arg(long)]
        dns: bool,
    },
    /// Import a CAR archive
    Import {
        /// Path to a .car file
        file: PathBuf,
    },
    /// Export a CID as a CAR archive
    Export {
        /// Content identifier to export
        cid: String,
        /// Output file or directory (defaults to the downloads directory)
        #[arg(short, long)]
        output: Option<PathBuf>,
    },
    /// Store the credential used for authenticated calls
    Login {
        #[arg(long)]
        address: String,
        #[arg(long)]
        token: String,
    },
    /// Remove the stored credential
    Logout,
}
