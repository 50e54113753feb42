// Copyright (c) 2022-2023 The MobileCoin Foundation

//! Command line utility for interacting with the Ledger Cardano app

use std::{str::FromStr, time::Duration};

use clap::Parser;
use log::{debug, info, LevelFilter};

use ledger_lib::{Filters, Transport};

use ledger_ada::{
    transport::{Exchange, TcpOptions},
    Connect, DerivationPath, DeviceHandle, LedgerProvider, XpubInfo,
};

mod helpers;
use helpers::*;

/// Ledger command line utility
#[derive(Clone, PartialEq, Debug, Parser)]
struct Options {
    /// Transport for device connection
    #[clap(long, value_enum, default_value = "tcp", env = "LEDGER_TARGET")]
    target: Target,

    /// TCP transport options
    #[clap(flatten)]
    tcp: TcpOptions,

    /// Device index (where more than one device is available)
    #[clap(long, default_value = "0")]
    device_index: usize,

    /// APDU request timeout in seconds
    #[clap(long, default_value = "10", env = "LEDGER_TIMEOUT_S")]
    timeout_s: u64,

    /// Subcommand to execute
    #[clap(subcommand)]
    cmd: Actions,

    /// Enable verbose logging
    #[clap(long, default_value = "info", env = "LOG_LEVEL")]
    log_level: LevelFilter,
}

/// Device connection target
#[derive(Copy, Clone, PartialEq, Debug, clap::ValueEnum, strum::Display)]
#[strum(serialize_all = "snake_case")]
#[non_exhaustive]
enum Target {
    /// TCP connection for speculos simulator
    Tcp,
    /// USB-HID / BLE devices
    Ledger,
}

#[derive(Clone, PartialEq, Debug, Parser)]
#[non_exhaustive]
enum Actions {
    /// Fetch application version
    AppVersion,

    /// Fetch extended public keys for one or more derivation paths
    Xpub {
        /// Derivation paths (eg. `44'/1815'/0'`)
        #[clap(required = true, value_parser = path_from_str)]
        paths: Vec<DerivationPath>,

        /// Write keys to the provided file (`.json`)
        #[clap(long)]
        output: Option<String>,
    },
}

pub fn path_from_str(s: &str) -> anyhow::Result<DerivationPath> {
    let p = DerivationPath::from_str(s).map_err(|e| anyhow::anyhow!("{e}"))?;
    Ok(p)
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Parse command line arguments
    let args = Options::parse();

    // Setup logging
    simplelog::SimpleLogger::init(args.log_level, simplelog::Config::default())?;

    debug!("Using transport: {}", args.target);

    let timeout = Duration::from_secs(args.timeout_s);

    // Connect to device and execute command
    match args.target {
        Target::Tcp => {
            let d = LedgerProvider.connect(&args.tcp).await?;

            execute(d.with_request_timeout(timeout), args.cmd).await?;
        }
        Target::Ledger => {
            let mut p = ledger_lib::LedgerProvider::init().await;

            let devices = p.list(Filters::Any).await?;
            debug!("Found devices: {:?}", devices);

            let info = devices.get(args.device_index).cloned().ok_or_else(|| {
                anyhow::anyhow!(
                    "Invalid device index: {} ({} devices found)",
                    args.device_index,
                    devices.len()
                )
            })?;

            let h = p.connect(info).await?;

            execute(DeviceHandle::from(h).with_request_timeout(timeout), args.cmd).await?;
        }
    }

    Ok(())
}

/// Execute a command with the provided device handle, closing the session on completion
async fn execute<T: Exchange + Send>(d: DeviceHandle<T>, cmd: Actions) -> anyhow::Result<()> {
    debug!("Executing command: {:?}", cmd);

    match cmd {
        Actions::AppVersion => {
            let v = d.app_version().await?;

            info!("app version: {} (flags: {:?})", v, v.flags);
        }
        Actions::Xpub { paths, output } => {
            let keys = d.get_extended_public_keys(&paths).await?;

            let info: Vec<_> = paths
                .iter()
                .zip(keys.iter())
                .map(|(p, k)| XpubInfo::new(p, k))
                .collect();

            for i in &info {
                info!("{}", i);
            }

            if let Some(o) = output {
                write_output(&o, &info).await?;
            }
        }
    }

    d.close();

    Ok(())
}
