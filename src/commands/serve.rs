//! Serve command handler
//!
//! Operational logging goes through `tracing` to stderr.

use std::path::PathBuf;

use anyhow::Result;

use pkgbridge::config::Config;
use pkgbridge::presentation::factory;

pub struct ServeArgs {
    pub listen: Option<String>,
    pub dir: Option<PathBuf>,
    pub repo: Option<String>,
    pub allow_downgrade: bool,
}

pub fn cmd_serve(mut config: Config, args: ServeArgs) -> Result<()> {
    tracing_subscriber::fmt()
        .with_writer(std::io::stderr)
        .with_ansi(false)
        .with_target(false)
        .init();

    if let Some(listen) = args.listen {
        config.registry.listen = listen;
    }
    if let Some(dir) = args.dir {
        config.registry.serve_dir = dir;
    }
    if let Some(repo) = args.repo {
        config.registry.repo_name = repo;
    }
    if args.allow_downgrade {
        config.registry.prevent_downgrade = false;
    }

    factory::registry_server(&config).serve()?;
    Ok(())
}
