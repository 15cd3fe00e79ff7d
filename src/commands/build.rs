//! Build command handler
//!
//! References are cloned and built in the work directory; without
//! references the given (or current) directory is built as-is.
//! `--template` and `--exp-key` do their one job and exit.

use std::path::PathBuf;

use anyhow::{bail, Context as _, Result};

use pkgbridge::application::{
    export_public_key, is_build_dir, BuildUseCase, Context, GenerateOptions, GenerateUseCase,
};
use pkgbridge::config::Config;
use pkgbridge::domain::ports::EventSink;
use pkgbridge::infrastructure::{Git, Gpg};
use pkgbridge::presentation::HostTools;

pub struct BuildArgs {
    pub packages: Vec<String>,
    pub dir: Option<PathBuf>,
    pub template: bool,
    pub exp_key: bool,
}

pub fn cmd_build(config: &Config, args: BuildArgs, events: &dyn EventSink) -> Result<()> {
    if args.exp_key {
        print!("{}", export_public_key(&Gpg::new())?);
        return Ok(());
    }
    if args.template {
        let dir = match args.dir {
            Some(dir) => dir,
            None => std::env::current_dir().context("unable to read current directory")?,
        };
        GenerateUseCase::new(&Git::new(), events).generate(&dir, GenerateOptions::default())?;
        return Ok(());
    }

    let local = match args.dir {
        Some(dir) => Some(dir),
        None if args.packages.is_empty() => {
            let cwd = std::env::current_dir().context("unable to read current directory")?;
            if !is_build_dir(&cwd) {
                bail!(
                    "{} is not a package checkout; give packages to build or run inside one",
                    cwd.display()
                );
            }
            Some(cwd)
        }
        None => None,
    };

    let context = Context::acquire(config)?;
    let tools = HostTools::new(context.paths());
    let use_case = BuildUseCase::new(&context, tools.ports(events));

    match local {
        Some(dir) => {
            use_case.build_dir(&dir)?;
        }
        None => {
            use_case.build(&args.packages)?;
        }
    }
    Ok(())
}
