//! Use Case Factory
//!
//! Wires the host command-line tools into the application ports.
//! This is the dependency injection point for the binary.

use std::sync::Arc;

use crate::application::Ports;
use crate::config::{Config, Paths};
use crate::domain::ports::EventSink;
use crate::infrastructure::{FileInstalledStore, Git, Gpg, JsonEventSink, Makepkg, Pacman, RepoAdd};
use crate::registry::RegistryServer;

use super::cli::ColorWhen;
use super::printer::{Printer, PrinterStyle};
use super::terminal::detect_capabilities;

/// Concrete adapters behind [`Ports`]
pub struct HostTools {
    pub packages: Pacman,
    pub vcs: Git,
    pub builder: Makepkg,
    pub store: FileInstalledStore,
}

impl HostTools {
    pub fn new(paths: &Paths) -> Self {
        Self {
            packages: Pacman::new(),
            vcs: Git::new(),
            builder: Makepkg::new(),
            store: FileInstalledStore::new(&paths.installed_map),
        }
    }

    pub fn ports<'a>(&'a self, events: &'a dyn EventSink) -> Ports<'a> {
        Ports {
            packages: &self.packages,
            vcs: &self.vcs,
            builder: &self.builder,
            store: &self.store,
            events,
        }
    }
}

/// NDJSON on stdout, or the terminal printer on stderr
pub fn event_sink(json: bool, color: Option<ColorWhen>) -> Box<dyn EventSink> {
    if json {
        return Box::new(JsonEventSink::stdout());
    }
    Box::new(Printer::stderr(printer_style(color)))
}

pub fn printer_style(color: Option<ColorWhen>) -> PrinterStyle {
    let mut style = PrinterStyle::from_caps(detect_capabilities());
    match color {
        Some(ColorWhen::Always) => style.color = true,
        Some(ColorWhen::Never) => style.color = false,
        Some(ColorWhen::Auto) | None => {}
    }
    style
}

/// Registry server backed by gpg and repo-add
pub fn registry_server(config: &Config) -> RegistryServer {
    RegistryServer::new(
        &config.registry,
        Arc::new(Gpg::new()),
        Arc::new(RepoAdd::new(config.registry.prevent_downgrade)),
    )
}
