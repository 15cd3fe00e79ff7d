//! CLI Argument Parsing
//!
//! Global flags (--json, --color) are inherited by all subcommands.

use std::path::PathBuf;

use clap::{Parser, Subcommand};

#[derive(clap::ValueEnum, Debug, Clone, Copy, PartialEq, Eq)]
pub enum ColorWhen {
    Auto,
    Always,
    Never,
}

/// pkgbridge - install, build and publish packages from git hosts
#[derive(Parser, Debug)]
#[command(name = "pkgbridge")]
#[command(author, version, about, long_about = None)]
pub struct Cli {
    /// Emit NDJSON events instead of text
    #[arg(long, global = true)]
    pub json: bool,

    /// Color output mode
    #[arg(long, global = true, value_enum)]
    pub color: Option<ColorWhen>,

    /// Configuration file (defaults to ~/.config/pkgbridge/config.toml)
    #[arg(long, global = true, value_name = "FILE")]
    pub config: Option<PathBuf>,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Install native names and source addresses (host/owner/name[@pin])
    #[command(visible_alias = "i")]
    Install {
        #[arg(required = true, value_name = "PACKAGE")]
        packages: Vec<String>,
    },

    /// Build signed packages without installing them
    ///
    /// With no arguments the current directory is built when it holds a
    /// PKGBUILD inside a git checkout.
    #[command(visible_alias = "b")]
    Build {
        #[arg(value_name = "PACKAGE")]
        packages: Vec<String>,

        /// Build this local checkout instead of references
        #[arg(long, short = 'C', conflicts_with = "packages", value_name = "DIR")]
        dir: Option<PathBuf>,

        /// Write a starter PKGBUILD into the checkout and exit
        #[arg(long, short = 't', conflicts_with_all = ["packages", "exp_key"])]
        template: bool,

        /// Print the armored public key of the signing identity and exit
        #[arg(long, short = 'e', conflicts_with_all = ["packages", "dir"])]
        exp_key: bool,
    },

    /// Write a starter PKGBUILD and README install notes for the current checkout
    #[command(visible_alias = "gen")]
    Generate {
        /// Checkout to generate into (defaults to the current directory)
        #[arg(long, short = 'C', value_name = "DIR")]
        dir: Option<PathBuf>,

        /// Replace an existing PKGBUILD
        #[arg(short, long)]
        force: bool,
    },

    /// Remove native packages and installed source packages
    #[command(visible_alias = "rm")]
    Remove {
        #[arg(required = true, value_name = "PACKAGE")]
        packages: Vec<String>,
    },

    /// Upload built packages to registry/owner/name targets
    Push {
        #[arg(required = true, value_name = "TARGET")]
        targets: Vec<String>,

        /// Ask the registry to accept a lower version
        #[arg(short, long)]
        force: bool,

        /// Directory holding built packages (defaults to the package cache)
        #[arg(long, value_name = "DIR")]
        from: Option<PathBuf>,

        /// Use plain http
        #[arg(long)]
        insecure: bool,
    },

    /// Run the registry service
    Serve {
        /// Listen address, e.g. 0.0.0.0:4572
        #[arg(long)]
        listen: Option<String>,

        /// Directory to serve and watch
        #[arg(long, value_name = "DIR")]
        dir: Option<PathBuf>,

        /// Repository name
        #[arg(long)]
        repo: Option<String>,

        /// Allow lower versions to replace indexed ones
        #[arg(long)]
        allow_downgrade: bool,
    },

    /// Show configuration
    Config {
        #[command(subcommand)]
        action: Option<ConfigAction>,
    },
}

#[derive(Subcommand, Debug, Clone, Copy, PartialEq, Eq)]
pub enum ConfigAction {
    /// Print the effective configuration as TOML
    Show,
    /// Print the configuration file location
    Path,
}
