//! Generate command handler

use std::path::PathBuf;

use anyhow::{Context as _, Result};

use pkgbridge::application::{GenerateOptions, GenerateUseCase};
use pkgbridge::domain::ports::EventSink;
use pkgbridge::infrastructure::Git;

pub fn cmd_generate(dir: Option<PathBuf>, force: bool, events: &dyn EventSink) -> Result<()> {
    let dir = match dir {
        Some(dir) => dir,
        None => std::env::current_dir().context("unable to read current directory")?,
    };
    GenerateUseCase::new(&Git::new(), events).generate(&dir, GenerateOptions { readme: true, force })?;
    Ok(())
}
