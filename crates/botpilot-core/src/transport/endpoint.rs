//! Endpoint parsing and transport construction.

use std::fmt;
use std::net::{TcpStream, ToSocketAddrs};
use std::path::PathBuf;
use std::str::FromStr;
use std::time::Duration;

use url::{Host, Url};

use super::{BluetoothTransport, NetworkTransport, RfcommDevice, Transport, TransportError, TransportResult};

/// Port the robot listens on for control traffic.
pub const CONTROL_PORT: u16 = 9495;

/// Port the robot streams video on.
pub const VIDEO_PORT: u16 = 9494;

pub const DEFAULT_CONNECT_TIMEOUT: Duration = Duration::from_secs(5);

/// Where the control link lives.
///
/// Written as `tcp://host[:port]` or `rfcomm:///dev/rfcommN`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Endpoint {
    Network { host: String, port: u16 },
    Rfcomm { device: PathBuf },
}

impl FromStr for Endpoint {
    type Err = TransportError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let url = Url::parse(s).map_err(|e| TransportError::InvalidEndpoint(format!("{s}: {e}")))?;
        match url.scheme() {
            "tcp" => {
                let host = match url.host() {
                    Some(Host::Domain(domain)) if !domain.is_empty() => domain.to_string(),
                    Some(Host::Ipv4(addr)) => addr.to_string(),
                    Some(Host::Ipv6(addr)) => addr.to_string(),
                    _ => {
                        return Err(TransportError::InvalidEndpoint(format!("{s}: missing host")));
                    }
                };
                Ok(Endpoint::Network {
                    host,
                    port: url.port().unwrap_or(CONTROL_PORT),
                })
            }
            "rfcomm" => {
                if url.path().is_empty() || url.path() == "/" {
                    return Err(TransportError::InvalidEndpoint(format!("{s}: missing device path")));
                }
                Ok(Endpoint::Rfcomm {
                    device: PathBuf::from(url.path()),
                })
            }
            other => Err(TransportError::InvalidEndpoint(format!(
                "{s}: unsupported scheme '{other}'"
            ))),
        }
    }
}

impl fmt::Display for Endpoint {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Endpoint::Network { host, port } if host.contains(':') => write!(f, "tcp://[{host}]:{port}"),
            Endpoint::Network { host, port } => write!(f, "tcp://{host}:{port}"),
            Endpoint::Rfcomm { device } => write!(f, "rfcomm://{}", device.display()),
        }
    }
}

/// Open the native resource behind `endpoint` and wrap it in a connected transport.
///
/// Failures here happen before any transport exists and are returned.
pub fn open_transport(endpoint: &Endpoint, timeout: Duration) -> TransportResult<Box<dyn Transport>> {
    let mut transport: Box<dyn Transport> = match endpoint {
        Endpoint::Network { host, port } => {
            let socket = connect_tcp(host, *port, timeout)?;
            Box::new(NetworkTransport::new(socket))
        }
        Endpoint::Rfcomm { device } => {
            let client = RfcommDevice::open(device)
                .map_err(|e| TransportError::Open(format!("{}: {e}", device.display())))?;
            Box::new(BluetoothTransport::new(client))
        }
    };
    transport.connect();
    log::info!("Opened {} transport to {endpoint}", transport.kind().name());
    Ok(transport)
}

fn connect_tcp(host: &str, port: u16, timeout: Duration) -> TransportResult<TcpStream> {
    let addrs = (host, port)
        .to_socket_addrs()
        .map_err(|e| TransportError::Open(format!("{host}:{port}: {e}")))?;

    let mut last_failure = format!("{host}:{port}: no addresses resolved");
    for addr in addrs {
        log::debug!("Connecting to {addr}");
        match TcpStream::connect_timeout(&addr, timeout) {
            Ok(stream) => {
                if let Err(e) = stream.set_nodelay(true) {
                    log::warn!("Could not disable Nagle on {addr}: {e}");
                }
                return Ok(stream);
            }
            Err(e) => last_failure = format!("{addr}: {e}"),
        }
    }
    Err(TransportError::Open(last_failure))
}
