// Copyright (c) 2022-2023 The MobileCoin Foundation

//! Transports for exchanging raw APDUs with a device
//!
//! Device communication goes through [ledger_lib::Exchange], so any
//! `ledger-lib` device (USB/HID, BLE, TCP) may be used with a
//! [DeviceHandle](crate::DeviceHandle).

pub use ledger_lib::Exchange;

#[cfg(feature = "transport_tcp")]
pub use tcp::{TcpOptions, TcpTransport};

#[cfg(feature = "transport_tcp")]
mod tcp {
    use std::{
        net::{IpAddr, Ipv4Addr, SocketAddr},
        time::Duration,
    };

    use async_trait::async_trait;
    use ledger_lib::{
        transport::{TcpDevice, TcpInfo, TcpTransport as LedgerTcpTransport},
        Transport,
    };
    use log::{debug, warn};

    use super::Exchange;

    /// TCP transport options (speculos APDU port)
    #[derive(Clone, Debug, PartialEq, clap::Parser)]
    pub struct TcpOptions {
        /// Simulator APDU address
        #[clap(long = "tcp-addr", default_value = "127.0.0.1", env = "LEDGER_TCP_ADDR")]
        pub addr: IpAddr,

        /// Simulator APDU port
        #[clap(long = "tcp-port", default_value = "9999", env = "LEDGER_TCP_PORT")]
        pub port: u16,
    }

    impl Default for TcpOptions {
        fn default() -> Self {
            Self {
                addr: IpAddr::V4(Ipv4Addr::LOCALHOST),
                port: 9999,
            }
        }
    }

    impl TcpOptions {
        /// Fetch the APDU socket address
        pub fn socket_addr(&self) -> SocketAddr {
            SocketAddr::new(self.addr, self.port)
        }
    }

    /// TCP device wrapper, reconnecting after cancelled exchanges.
    ///
    /// A request dropped mid-exchange (eg. on timeout) leaves the response
    /// pending on the socket, so the next exchange opens a new connection
    /// rather than reading a stale response.
    pub struct TcpTransport {
        addr: SocketAddr,
        d: TcpDevice,
        /// Set while an exchange is in flight
        pending: bool,
    }

    impl TcpTransport {
        /// Connect to a TCP APDU endpoint
        pub async fn new(opts: &TcpOptions) -> Result<Self, ledger_lib::Error> {
            let addr = opts.socket_addr();
            let d = Self::connect(addr).await?;

            Ok(Self {
                addr,
                d,
                pending: false,
            })
        }

        async fn connect(addr: SocketAddr) -> Result<TcpDevice, ledger_lib::Error> {
            debug!("Connecting to {}", addr);

            let mut t = LedgerTcpTransport::new()?;
            t.connect(TcpInfo { addr }).await
        }
    }

    #[async_trait]
    impl Exchange for TcpTransport {
        async fn exchange(
            &mut self,
            command: &[u8],
            timeout: Duration,
        ) -> Result<Vec<u8>, ledger_lib::Error> {
            if self.pending {
                warn!("Previous exchange cancelled, reconnecting");
                self.d = Self::connect(self.addr).await?;
            }

            self.pending = true;
            let resp = self.d.exchange(command, timeout).await?;
            self.pending = false;

            Ok(resp)
        }
    }
}
