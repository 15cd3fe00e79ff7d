//! Push command handler

use std::path::PathBuf;

use anyhow::Result;

use pkgbridge::application::{PushOptions, PushUseCase};
use pkgbridge::config::Config;
use pkgbridge::domain::ports::EventSink;
use pkgbridge::infrastructure::{Gpg, HttpUploader};

pub struct PushArgs {
    pub targets: Vec<String>,
    pub force: bool,
    pub from: Option<PathBuf>,
    pub insecure: bool,
}

pub fn cmd_push(config: &Config, args: PushArgs, events: &dyn EventSink) -> Result<()> {
    let options = PushOptions {
        artifact_dir: args
            .from
            .unwrap_or_else(|| config.paths.resolve().package_cache_dir),
        protocol: if args.insecure {
            "http".to_string()
        } else {
            config.push.protocol.clone()
        },
        endpoint: config.push.endpoint.clone(),
        force: args.force,
    };

    let signer = Gpg::new();
    let uploader = HttpUploader::new()?;
    PushUseCase::new(&signer, &uploader, events).push(&args.targets, &options)?;
    Ok(())
}
