// Main CLI entrypoint
// (c) 2024 Ross Younger

use std::process::ExitCode;

use anstream::{eprintln, println};
use anyhow::Context as _;
use clap::Parser;
use tabled::{settings::style::Style, Table};
use tracing::{error, warn};

use super::{args::CliArgs, styles::ERROR};
use crate::{
    config::{Manager, Settings},
    exporter,
    ipsec::{resolve_root, Configuration, Loader},
    util::setup_tracing,
};

/// Main CLI entrypoint
pub fn cli() -> anyhow::Result<ExitCode> {
    let args = CliArgs::parse();
    setup_tracing(args.trace_level(), args.log_file.as_deref())
        .inspect_err(|e| eprintln!("{e:?}"))?;

    let mut manager = Manager::new();
    if let Some(path) = &args.settings {
        manager.merge_toml_file(path);
    }
    manager.merge_environment();
    manager.merge_provider(args.overrides());

    if args.show_settings {
        println!("{manager}");
        return Ok(ExitCode::SUCCESS);
    }
    let settings: Settings = manager
        .get()
        .context("invalid settings")
        .inspect_err(|e| error!("{e:#}"))?;

    if args.list_connections {
        return list_connections(&settings);
    }

    let configuration = exporter::load(&settings).inspect_err(|e| error!("{e:#}"))?;
    run_server(&settings, &configuration)
}

fn list_connections(settings: &Settings) -> anyhow::Result<ExitCode> {
    let root = resolve_root(&settings.config_path)
        .with_context(|| format!("resolving configuration path {}", settings.config_path))?;
    let (configuration, status) = match Loader::new(root).load() {
        Ok(c) => (c, ExitCode::SUCCESS),
        Err(e) => {
            eprintln!("{ERROR}ERROR{ERROR:#} {e}, results are incomplete");
            (e.into_partial(), ExitCode::FAILURE)
        }
    };
    if !configuration.has_tunnels() {
        warn!("Found no configured connections in {}", settings.config_path);
    }
    println!("{}", connection_table(&configuration));
    Ok(status)
}

fn connection_table(configuration: &Configuration) -> String {
    Table::new(configuration.connections().to_vec())
        .with(Style::sharp())
        .to_string()
}

#[tokio::main(flavor = "current_thread")]
async fn run_server(settings: &Settings, configuration: &Configuration) -> anyhow::Result<ExitCode> {
    exporter::serve(settings, configuration)
        .await
        .map(|()| ExitCode::SUCCESS)
        .inspect_err(|e| error!("{e:#}"))
}
