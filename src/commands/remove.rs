use anyhow::Result;

use pkgbridge::application::{Context, RemoveUseCase};
use pkgbridge::config::Config;
use pkgbridge::domain::ports::EventSink;
use pkgbridge::presentation::HostTools;

pub fn cmd_remove(config: &Config, packages: &[String], events: &dyn EventSink) -> Result<()> {
    let context = Context::acquire(config)?;
    let tools = HostTools::new(context.paths());

    RemoveUseCase::new(tools.ports(events)).remove(packages)?;
    Ok(())
}
