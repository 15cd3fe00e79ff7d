//! pkgbridge CLI
//!
//! Usage: pkgbridge <COMMAND>
//!
//! Commands:
//!   install  Install native and source packages
//!   build    Build signed packages without installing
//!   generate Write a starter PKGBUILD for the current checkout
//!   remove   Remove packages
//!   push     Upload built packages to a registry
//!   serve    Run the registry service
//!   config   Show configuration

mod commands;

use std::process::ExitCode;

use anyhow::Result;
use clap::Parser;

use pkgbridge::config::Config;
use pkgbridge::presentation::{event_sink, printer_style, render_error, Cli, Commands, ConfigAction};

use commands::{BuildArgs, PushArgs, ServeArgs};

fn main() -> ExitCode {
    let cli = Cli::parse();
    let style = printer_style(cli.color);
    match run(cli) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("{}", render_error(style, &e));
            ExitCode::FAILURE
        }
    }
}

fn run(cli: Cli) -> Result<()> {
    let config = load_config(&cli)?;
    let events = event_sink(cli.json, cli.color);

    match cli.command {
        Commands::Install { packages } => commands::cmd_install(&config, &packages, events.as_ref()),
        Commands::Build {
            packages,
            dir,
            template,
            exp_key,
        } => commands::cmd_build(
            &config,
            BuildArgs {
                packages,
                dir,
                template,
                exp_key,
            },
            events.as_ref(),
        ),
        Commands::Generate { dir, force } => commands::cmd_generate(dir, force, events.as_ref()),
        Commands::Remove { packages } => commands::cmd_remove(&config, &packages, events.as_ref()),
        Commands::Push {
            targets,
            force,
            from,
            insecure,
        } => commands::cmd_push(
            &config,
            PushArgs {
                targets,
                force,
                from,
                insecure,
            },
            events.as_ref(),
        ),
        Commands::Serve {
            listen,
            dir,
            repo,
            allow_downgrade,
        } => commands::cmd_serve(
            config,
            ServeArgs {
                listen,
                dir,
                repo,
                allow_downgrade,
            },
        ),
        Commands::Config { action } => commands::cmd_config(
            &config,
            cli.config.as_deref(),
            action.unwrap_or(ConfigAction::Show),
            cli.json,
        ),
    }
}

fn load_config(cli: &Cli) -> Result<Config> {
    let (config, warnings) = match &cli.config {
        Some(path) => {
            let (config, warnings) = Config::load_with_warnings(path)?;
            (config.with_env_overrides(), warnings)
        }
        None => Config::load_or_default()?,
    };
    for warning in warnings {
        eprintln!("warning: {}", warning);
    }
    Ok(config)
}
