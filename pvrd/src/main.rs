// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

use anyhow::{Context, Result};
use clap::{Parser, ValueEnum};
use pvr::config::{NeighborConfig, RouterConfig};
use pvr::connection_udp::NeighborConnectionUdp;
use pvr::dispatcher::Dispatcher;
use pvr_common::log::{build_logger, init_logger, init_term_logger};
use slog::Logger;
use std::fs::File;
use std::path::PathBuf;

const COMPONENT_PVRD: &str = "pvrd";

#[derive(Parser, Debug)]
#[command(version, about = "Path vector router", long_about = None)]
struct Cli {
    /// Autonomous system number for this router
    asn: u32,

    /// Neighbors as <port>-<address>-<relationship>, where relationship is
    /// one of cust, peer or prov
    #[arg(required = true)]
    neighbors: Vec<NeighborConfig>,

    /// Log record format
    #[arg(long, value_enum, default_value_t = LogFormat::Bunyan)]
    log_format: LogFormat,

    /// Write bunyan records to this file instead of stdout
    #[arg(long)]
    log_file: Option<PathBuf>,
}

#[derive(Clone, Copy, Debug, ValueEnum)]
enum LogFormat {
    Bunyan,
    Term,
}

fn logger(cli: &Cli) -> Result<Logger> {
    if let Some(path) = &cli.log_file {
        let file = File::create(path)
            .with_context(|| format!("create log file {}", path.display()))?;
        return Ok(build_logger(file));
    }
    Ok(match cli.log_format {
        LogFormat::Bunyan => init_logger(),
        LogFormat::Term => init_term_logger(),
    })
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    let log = logger(&cli)?.new(slog::o!("component" => COMPONENT_PVRD));

    let config = RouterConfig {
        asn: cli.asn,
        neighbors: cli.neighbors,
    };
    for n in &config.neighbors {
        slog::info!(log, "neighbor {n}";
            "address" => n.address,
            "relationship" => n.relationship.to_string(),
            "port" => n.port
        );
    }

    let mut dispatcher =
        Dispatcher::<NeighborConnectionUdp>::new(&config, log.clone())
            .context("router startup")?;
    dispatcher.run().context("router stopped")?;
    Ok(())
}
