// Copyright (c) 2022-2023 The MobileCoin Foundation

use std::{
    net::{IpAddr, Ipv4Addr},
    str::FromStr,
    sync::Arc,
};

use log::{debug, LevelFilter};
use portpicker::pick_unused_port;
use simplelog::SimpleLogger;
use tokio::{net::TcpListener, task::JoinHandle};

use ledger_ada::{
    transport::{TcpOptions, TcpTransport},
    Connect, DeviceHandle, LedgerProvider,
};
use ledger_ada_tests::mock::{MockDevice, MockState};

/// Setup test logging, level set via `LOG_LEVEL`
pub fn setup_logging() {
    let log_level = match std::env::var("LOG_LEVEL").map(|v| LevelFilter::from_str(&v)) {
        Ok(Ok(l)) => l,
        _ => LevelFilter::Debug,
    };

    let _ = SimpleLogger::init(log_level, simplelog::Config::default());
}

/// Setup a handle to an in-process mock device
#[allow(unused)]
pub fn setup(device: MockDevice) -> (DeviceHandle<MockDevice>, Arc<MockState>) {
    setup_logging();

    let state = device.state();

    (DeviceHandle::from(device), state)
}

/// Setup a mock device listening on a TCP APDU socket and connect to this
#[allow(unused)]
pub async fn setup_tcp(
    device: MockDevice,
) -> (DeviceHandle<TcpTransport>, JoinHandle<anyhow::Result<()>>) {
    setup_logging();

    // Find open port and start mock server
    let port = pick_unused_port().expect("no ports available");
    let addr = IpAddr::V4(Ipv4Addr::LOCALHOST);

    let listener = TcpListener::bind((addr, port))
        .await
        .expect("failed to bind listener");
    let server = ledger_ada_tests::mock::serve_tcp(listener, device);

    // Connect to mock device
    debug!("Connecting TCP APDU transport");
    let opts = TcpOptions { addr, port };
    let d = LedgerProvider
        .connect(&opts)
        .await
        .expect("APDU connection failed");

    (d, server)
}
