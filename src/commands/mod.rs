//! Command handlers of the `pkgbridge` binary

mod build;
mod config;
mod generate;
mod install;
mod push;
mod remove;
mod serve;

pub use build::{cmd_build, BuildArgs};
pub use config::cmd_config;
pub use generate::cmd_generate;
pub use install::cmd_install;
pub use push::{cmd_push, PushArgs};
pub use remove::cmd_remove;
pub use serve::{cmd_serve, ServeArgs};
