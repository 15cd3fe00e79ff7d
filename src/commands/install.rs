//! Install command handler

use anyhow::Result;

use pkgbridge::application::{Context, InstallUseCase};
use pkgbridge::config::Config;
use pkgbridge::domain::ports::EventSink;
use pkgbridge::presentation::HostTools;

pub fn cmd_install(config: &Config, packages: &[String], events: &dyn EventSink) -> Result<()> {
    let context = Context::acquire(config)?;
    let tools = HostTools::new(context.paths());

    InstallUseCase::new(&context, tools.ports(events)).install(packages)?;
    Ok(())
}
