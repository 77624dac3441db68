//! Bluetooth transport.

use std::io;

use super::{LinkState, ReadOutcome, Transport, TransportError, TransportKind, swallow};

/// A connected Bluetooth client, as provided by the native stack.
///
/// The client is paired and connected before it is handed to
/// [`BluetoothTransport`].
pub trait BluetoothClient: Send {
    /// Send bytes to the remote device.
    fn write(&mut self, bytes: &[u8]) -> io::Result<()>;

    /// Take the next received byte, or `None` if nothing is buffered.
    fn read(&mut self) -> io::Result<Option<u8>>;

    /// Number of received bytes buffered locally.
    fn available(&mut self) -> io::Result<usize>;

    /// Disconnect from the remote device.
    fn stop(&mut self) -> io::Result<()>;

    /// Whether the radio link is still up.
    fn is_connected(&self) -> bool;
}

/// Transport over an already-connected Bluetooth client.
pub struct BluetoothTransport<C: BluetoothClient> {
    client: C,
    state: LinkState,
    last_error: Option<TransportError>,
}

impl<C: BluetoothClient> BluetoothTransport<C> {
    /// Wrap a connected client.
    pub fn new(client: C) -> Self {
        Self {
            client,
            state: LinkState::Idle,
            last_error: None,
        }
    }

    /// Get a reference to the wrapped client.
    pub fn client(&self) -> &C {
        &self.client
    }
}

impl<C: BluetoothClient> Transport for BluetoothTransport<C> {
    fn kind(&self) -> TransportKind {
        TransportKind::Bluetooth
    }

    fn connect(&mut self) {
        // The client connected when it was paired; only the lifecycle moves.
        if self.state == LinkState::Idle {
            log::info!("Bluetooth transport connected");
            self.state = LinkState::Connected;
        }
    }

    fn write(&mut self, bytes: &[u8]) {
        if !self.state.permits(self.kind(), "write") {
            return;
        }
        log::trace!("Bluetooth write: {} bytes", bytes.len());
        if let Err(e) = self.client.write(bytes) {
            swallow(&mut self.last_error, TransportError::Write(e.to_string()));
        }
    }

    fn flush(&mut self) {
        // Client writes are unbuffered.
        self.state.permits(self.kind(), "flush");
    }

    fn read_outcome(&mut self) -> ReadOutcome {
        if !self.state.permits(self.kind(), "read") {
            return ReadOutcome::Closed;
        }
        match self.client.read() {
            Ok(Some(byte)) => ReadOutcome::Byte(byte),
            Ok(None) if self.client.is_connected() => ReadOutcome::Empty,
            Ok(None) => ReadOutcome::Closed,
            Err(e) => {
                swallow(&mut self.last_error, TransportError::Read(e.to_string()));
                ReadOutcome::Closed
            }
        }
    }

    fn available(&mut self) -> usize {
        if !self.state.permits(self.kind(), "available") {
            return 0;
        }
        match self.client.available() {
            Ok(count) => count,
            Err(e) => {
                swallow(&mut self.last_error, TransportError::Available(e.to_string()));
                0
            }
        }
    }

    fn close(&mut self) {
        if self.state == LinkState::Closed {
            log::debug!("Bluetooth transport already closed");
            return;
        }
        self.state = LinkState::Closed;
        if let Err(e) = self.client.stop() {
            swallow(&mut self.last_error, TransportError::Close(e.to_string()));
        }
        log::info!("Bluetooth transport closed");
    }

    fn is_open(&self) -> bool {
        self.state == LinkState::Connected && self.client.is_connected()
    }

    fn last_error(&self) -> Option<&TransportError> {
        self.last_error.as_ref()
    }
}
