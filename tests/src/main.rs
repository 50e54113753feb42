// Copyright (c) 2022-2023 The MobileCoin Foundation

use std::{str::FromStr, time::Duration};

use clap::Parser;
use log::{debug, info, LevelFilter};
use strum::{Display, EnumString, EnumVariantNames};

use ledger_ada::{
    transport::{Exchange, TcpOptions},
    Connect, DerivationPath, DeviceHandle, LedgerProvider,
};
use ledger_ada_tests::{mock::MockDevice, vectors, xpub};

/// Test CLI arguments
#[derive(Clone, Debug, Parser)]
pub struct Opts {
    #[clap(subcommand)]
    pub test: Tests,

    /// Target for test execution
    #[clap(long, value_enum, default_value = "tcp", env)]
    pub target: Target,

    /// TCP transport options
    #[clap(flatten)]
    pub tcp: TcpOptions,

    /// Test vectors file (`.toml`), defaults to built-in vectors
    #[clap(long, env)]
    pub vectors: Option<String>,

    /// APDU request timeout in seconds
    #[clap(long, default_value = "10", env)]
    pub timeout_s: u64,

    /// Log level
    #[clap(long, default_value = "debug", env)]
    pub log_level: LevelFilter,

    /// Enable logging for transports
    #[clap(long)]
    pub log_transports: bool,
}

/// Test modes
#[derive(Clone, PartialEq, Debug, Parser, Display, EnumString, EnumVariantNames)]
pub enum Tests {
    /// Check extended public keys against test vectors
    Vectors,
    /// Check repeated requests return identical keys
    Idempotent {
        #[clap(long, default_value = "44'/1815'/0'")]
        path: String,
    },
    /// Check invalid paths are rejected
    RejectInvalid,
    /// Check batch requests match individual requests
    Batch,
    /// Run all tests
    All,
}

/// Test target connection
#[derive(Copy, Clone, PartialEq, Debug, clap::ValueEnum, Display, EnumString, EnumVariantNames)]
#[strum(serialize_all = "snake_case")]
#[non_exhaustive]
pub enum Target {
    /// TCP connection for speculos simulator
    Tcp,
    /// In-process mock device
    Mock,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Load command line options
    let opts = Opts::parse();

    // Setup logging
    let mut c = simplelog::ConfigBuilder::new();
    if !opts.log_transports {
        c.add_filter_ignore_str("ledger_ada::transport");
    }

    let _ = simplelog::SimpleLogger::init(opts.log_level, c.build());

    debug!("options: {:?}", opts);

    info!("Running test '{}' via {}", opts.test, opts.target);

    let timeout = Duration::from_secs(opts.timeout_s);

    // Connect to target and execute test
    match opts.target {
        Target::Tcp => {
            let d = LedgerProvider.connect(&opts.tcp).await?;

            execute(d.with_request_timeout(timeout), opts).await?;
        }
        Target::Mock => {
            let d = DeviceHandle::from(MockDevice::new());

            execute(d.with_request_timeout(timeout), opts).await?;
        }
    };

    log::info!("Test OK!");

    Ok(())
}

/// Execute a test with the provided device handle
async fn execute<T>(d: DeviceHandle<T>, opts: Opts) -> anyhow::Result<()>
where
    T: Exchange + Send,
{
    // Load vectors
    let v = match &opts.vectors {
        Some(f) => vectors::load(&tokio::fs::read_to_string(f).await?)?,
        None => vectors::TEST_VECTORS.clone(),
    };

    let paths = v
        .iter()
        .map(|v| DerivationPath::from_str(&v.path).map_err(|e| anyhow::anyhow!("{e}")))
        .collect::<Result<Vec<_>, _>>()?;

    match opts.test {
        Tests::Vectors => xpub::vectors(&d, &v).await?,
        Tests::Idempotent { path } => xpub::idempotent(&d, &path).await?,
        Tests::RejectInvalid => xpub::reject_invalid(&d).await?,
        Tests::Batch => xpub::batch(&d, &paths).await?,
        Tests::All => {
            xpub::vectors(&d, &v).await?;
            if let Some(f) = v.first() {
                xpub::idempotent(&d, &f.path).await?;
            }
            xpub::reject_invalid(&d).await?;
            xpub::batch(&d, &paths).await?;
        }
    }

    d.close();

    Ok(())
}
