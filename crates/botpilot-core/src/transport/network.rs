//! TCP/IP transport.

use std::io::{self, Read, Write};
use std::net::{Shutdown, TcpStream};

use super::{LinkState, ReadOutcome, Transport, TransportError, TransportKind, swallow};

/// Upper bound on what a single availability check reports.
const PEEK_WINDOW: usize = 4096;

/// Input half of a connected socket.
pub trait InputStream: Read + Send {
    /// Number of bytes that can be read without blocking, or `None` once the
    /// peer has closed its end and nothing is left to read.
    fn available(&mut self) -> io::Result<Option<usize>>;
}

/// A connected stream socket, as provided by the native network stack.
pub trait StreamSocket: Send {
    type Input: InputStream;
    type Output: Write + Send;

    /// Produce the input byte stream.
    fn input_stream(&self) -> io::Result<Self::Input>;

    /// Produce the output byte stream.
    fn output_stream(&self) -> io::Result<Self::Output>;

    /// Close the socket, ending both streams.
    fn close(&mut self) -> io::Result<()>;
}

impl InputStream for TcpStream {
    fn available(&mut self) -> io::Result<Option<usize>> {
        let mut window = [0u8; PEEK_WINDOW];
        self.set_nonblocking(true)?;
        let peeked = self.peek(&mut window);
        self.set_nonblocking(false)?;
        // A non-blocking peek yields `WouldBlock` while idle and `0` at end of stream.
        match peeked {
            Ok(0) => Ok(None),
            Ok(count) => Ok(Some(count)),
            Err(e) if e.kind() == io::ErrorKind::WouldBlock => Ok(Some(0)),
            Err(e) => Err(e),
        }
    }
}

impl StreamSocket for TcpStream {
    type Input = TcpStream;
    type Output = TcpStream;

    fn input_stream(&self) -> io::Result<TcpStream> {
        self.try_clone()
    }

    fn output_stream(&self) -> io::Result<TcpStream> {
        self.try_clone()
    }

    fn close(&mut self) -> io::Result<()> {
        self.shutdown(Shutdown::Both)
    }
}

/// Transport over an already-resolved stream socket.
pub struct NetworkTransport<S: StreamSocket = TcpStream> {
    socket: S,
    input: Option<S::Input>,
    output: Option<S::Output>,
    state: LinkState,
    /// Set once the peer has closed its end.
    peer_closed: bool,
    last_error: Option<TransportError>,
}

impl<S: StreamSocket> NetworkTransport<S> {
    /// Wrap a connected socket. Streams are bound by [`Transport::connect`].
    pub fn new(socket: S) -> Self {
        Self {
            socket,
            input: None,
            output: None,
            state: LinkState::Idle,
            peer_closed: false,
            last_error: None,
        }
    }

    /// Get a reference to the wrapped socket.
    pub fn socket(&self) -> &S {
        &self.socket
    }
}

impl<S: StreamSocket> Transport for NetworkTransport<S> {
    fn kind(&self) -> TransportKind {
        TransportKind::Network
    }

    fn connect(&mut self) {
        if self.state != LinkState::Idle {
            log::debug!("Network transport connect ignored in state {:?}", self.state);
            return;
        }
        let streams = self
            .socket
            .input_stream()
            .and_then(|input| Ok((input, self.socket.output_stream()?)));
        match streams {
            Ok((input, output)) => {
                self.input = Some(input);
                self.output = Some(output);
                self.state = LinkState::Connected;
                log::info!("Network transport connected");
            }
            Err(e) => {
                // Without streams the link is unusable: release the socket for good.
                swallow(&mut self.last_error, TransportError::Connect(e.to_string()));
                self.state = LinkState::Closed;
                if let Err(e) = self.socket.close() {
                    log::debug!("Network transport: closing unusable socket failed: {e}");
                }
            }
        }
    }

    fn write(&mut self, bytes: &[u8]) {
        if !self.state.permits(self.kind(), "write") {
            return;
        }
        let Some(output) = self.output.as_mut() else {
            swallow(&mut self.last_error, TransportError::Write("no output stream".into()));
            return;
        };
        log::trace!("Network write: {} bytes", bytes.len());
        if let Err(e) = output.write_all(bytes) {
            swallow(&mut self.last_error, TransportError::Write(e.to_string()));
        }
    }

    fn flush(&mut self) {
        if !self.state.permits(self.kind(), "flush") {
            return;
        }
        if let Some(output) = self.output.as_mut() {
            if let Err(e) = output.flush() {
                swallow(&mut self.last_error, TransportError::Flush(e.to_string()));
            }
        }
    }

    fn read_outcome(&mut self) -> ReadOutcome {
        if !self.state.permits(self.kind(), "read") {
            return ReadOutcome::Closed;
        }
        if self.peer_closed {
            return ReadOutcome::Closed;
        }
        let Some(input) = self.input.as_mut() else {
            return ReadOutcome::Closed;
        };
        let mut byte = [0u8; 1];
        loop {
            match input.read(&mut byte) {
                Ok(0) => {
                    self.peer_closed = true;
                    return ReadOutcome::Closed;
                }
                Ok(_) => return ReadOutcome::Byte(byte[0]),
                Err(e) if e.kind() == io::ErrorKind::Interrupted => {}
                Err(e) if e.kind() == io::ErrorKind::WouldBlock => return ReadOutcome::Empty,
                Err(e) => {
                    swallow(&mut self.last_error, TransportError::Read(e.to_string()));
                    return ReadOutcome::Closed;
                }
            }
        }
    }

    fn available(&mut self) -> usize {
        if !self.state.permits(self.kind(), "available") {
            return 0;
        }
        let Some(input) = self.input.as_mut() else {
            return 0;
        };
        match input.available() {
            Ok(Some(count)) => count,
            Ok(None) => {
                if !self.peer_closed {
                    log::info!("Network peer closed the connection");
                    self.peer_closed = true;
                }
                0
            }
            Err(e) => {
                swallow(&mut self.last_error, TransportError::Available(e.to_string()));
                0
            }
        }
    }

    fn close(&mut self) {
        if self.state == LinkState::Closed {
            log::debug!("Network transport already closed");
            return;
        }
        self.state = LinkState::Closed;
        self.input = None;
        self.output = None;
        if let Err(e) = self.socket.close() {
            swallow(&mut self.last_error, TransportError::Close(e.to_string()));
        }
        log::info!("Network transport closed");
    }

    fn is_open(&self) -> bool {
        self.state == LinkState::Connected && !self.peer_closed
    }

    fn last_error(&self) -> Option<&TransportError> {
        self.last_error.as_ref()
    }
}
