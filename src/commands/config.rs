use std::path::Path;

use anyhow::Result;

use pkgbridge::config::{user_config_path, Config, CONFIG_ENV};
use pkgbridge::presentation::ConfigAction;

pub fn cmd_config(config: &Config, explicit: Option<&Path>, action: ConfigAction, json: bool) -> Result<()> {
    match action {
        ConfigAction::Show if json => {
            println!("{}", serde_json::to_string(config)?);
        }
        ConfigAction::Show => print!("{}", config.to_toml()),
        ConfigAction::Path => {
            let path = explicit
                .map(Path::to_path_buf)
                .or_else(|| std::env::var(CONFIG_ENV).ok().map(Into::into))
                .or_else(user_config_path);
            match path {
                Some(path) => println!("{}", path.display()),
                None => anyhow::bail!("unable to determine the configuration directory"),
            }
        }
    }
    Ok(())
}
