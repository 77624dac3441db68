//! Byte-stream transports.
//!
//! A [`Transport`] hides whether the control link runs over a Bluetooth
//! RFCOMM channel or a TCP socket. Transports never report faults to their
//! caller: failed writes and flushes are dropped, failed reads collapse into
//! [`END_OF_STREAM`] and failed availability checks into `0`. The most recent
//! fault is kept for inspection through [`Transport::last_error`].

mod bluetooth;
mod endpoint;
mod network;
mod rfcomm;

pub use bluetooth::{BluetoothClient, BluetoothTransport};
pub use endpoint::{CONTROL_PORT, DEFAULT_CONNECT_TIMEOUT, Endpoint, VIDEO_PORT, open_transport};
pub use network::{InputStream, NetworkTransport, StreamSocket};
pub use rfcomm::RfcommDevice;

use thiserror::Error;

/// Value returned by [`Transport::read`] when no byte could be produced.
pub const END_OF_STREAM: i32 = -1;

/// Transport errors.
///
/// These are recorded, never returned, by the [`Transport`] operations. Only
/// [`open_transport`] hands them to the caller, since it runs before a
/// transport exists.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum TransportError {
    #[error("Connect failed: {0}")]
    Connect(String),
    #[error("Write failed: {0}")]
    Write(String),
    #[error("Flush failed: {0}")]
    Flush(String),
    #[error("Read failed: {0}")]
    Read(String),
    #[error("Availability check failed: {0}")]
    Available(String),
    #[error("Close failed: {0}")]
    Close(String),
    #[error("Could not open endpoint: {0}")]
    Open(String),
    #[error("Invalid endpoint: {0}")]
    InvalidEndpoint(String),
}

/// Result type for transport setup.
pub type TransportResult<T> = Result<T, TransportError>;

/// Physical medium behind a transport.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TransportKind {
    Bluetooth,
    Network,
}

impl TransportKind {
    /// Get display name for this medium.
    pub fn name(self) -> &'static str {
        match self {
            TransportKind::Bluetooth => "Bluetooth",
            TransportKind::Network => "Network",
        }
    }
}

/// Result of a single-byte read.
///
/// Splits the ambiguity of the `-1` sentinel: `Empty` means the link is up
/// but nothing has arrived, `Closed` means nothing more will arrive.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ReadOutcome {
    Byte(u8),
    Empty,
    Closed,
}

impl ReadOutcome {
    /// Collapse into the legacy integer form (`0..=255` or `-1`).
    pub fn as_sentinel(self) -> i32 {
        match self {
            ReadOutcome::Byte(b) => i32::from(b),
            ReadOutcome::Empty | ReadOutcome::Closed => END_OF_STREAM,
        }
    }

    /// The byte, if one was read.
    pub fn byte(self) -> Option<u8> {
        match self {
            ReadOutcome::Byte(b) => Some(b),
            _ => None,
        }
    }
}

/// Uniform byte-stream contract over a physical channel.
///
/// Every operation takes `&mut self`: a transport belongs to exactly one
/// connection and is driven from one thread at a time.
pub trait Transport: Send {
    /// Medium this transport runs over.
    fn kind(&self) -> TransportKind;

    /// Establish the byte stream. Never fails from the caller's perspective.
    fn connect(&mut self);

    /// Send `bytes` contiguously and in order. Faults are swallowed.
    fn write(&mut self, bytes: &[u8]);

    /// Push out buffered output. Faults are swallowed.
    fn flush(&mut self);

    /// Read the next byte, distinguishing "nothing yet" from "closed".
    fn read_outcome(&mut self) -> ReadOutcome;

    /// Read the next byte as `0..=255`, or [`END_OF_STREAM`].
    fn read(&mut self) -> i32 {
        self.read_outcome().as_sentinel()
    }

    /// Number of bytes readable without blocking; `0` when unknown.
    fn available(&mut self) -> usize;

    /// Release the native resource. Repeated calls have no further effect.
    fn close(&mut self);

    /// Whether the transport is connected and its remote end has not gone away.
    fn is_open(&self) -> bool;

    /// Most recent swallowed fault, if any.
    fn last_error(&self) -> Option<&TransportError>;
}

/// Connection lifecycle shared by the adapters.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub(crate) enum LinkState {
    /// Constructed, `connect()` not called yet.
    #[default]
    Idle,
    Connected,
    /// Terminal.
    Closed,
}

impl LinkState {
    /// Check that an I/O operation may touch the native resource.
    ///
    /// Using a transport before `connect()` is a programming error: it panics
    /// in debug builds and is logged in release builds.
    pub(crate) fn permits(self, kind: TransportKind, op: &str) -> bool {
        match self {
            LinkState::Connected => true,
            LinkState::Closed => false,
            LinkState::Idle => {
                if cfg!(debug_assertions) {
                    panic!("{} transport: {op}() called before connect()", kind.name());
                }
                log::error!("{} transport: {op}() called before connect()", kind.name());
                false
            }
        }
    }
}

/// Log and remember a fault that must not reach the caller.
pub(crate) fn swallow(slot: &mut Option<TransportError>, error: TransportError) {
    log::warn!("{error}");
    *slot = Some(error);
}
