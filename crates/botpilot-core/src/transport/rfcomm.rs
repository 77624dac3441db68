//! Bluetooth client over a bound RFCOMM device node.
//!
//! On Linux, `rfcomm bind` exposes a paired serial channel as `/dev/rfcommN`.
//! The node is read and written like a file. A background thread reads the
//! node and forwards received chunks through a channel, and the client answers
//! `available()` from whatever has arrived so far. The thread's handle never
//! blocks for long, so stopping the client ends the thread and releases every
//! handle on the node.

use std::collections::VecDeque;
use std::fs::{File, OpenOptions};
use std::io::{self, Read, Write};
use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::mpsc::{Receiver, Sender, TryRecvError, channel};
use std::thread::{self, JoinHandle};
use std::time::Duration;

use super::BluetoothClient;

const READ_CHUNK: usize = 256;

/// Pause between reads while the channel is idle.
const IDLE_POLL: Duration = Duration::from_millis(20);

/// Connected RFCOMM channel.
pub struct RfcommDevice<W: Write + Send = File> {
    path: PathBuf,
    writer: Option<W>,
    /// Chunks received by the reader thread.
    chunk_rx: Option<Receiver<Vec<u8>>>,
    /// Received bytes not yet handed out.
    buffer: VecDeque<u8>,
    /// Cleared once the reader thread has exited.
    link_up: bool,
    /// Asks the reader thread to exit.
    stop_reader: Arc<AtomicBool>,
    reader: Option<JoinHandle<()>>,
}

impl RfcommDevice<File> {
    /// Open a bound RFCOMM device node such as `/dev/rfcomm0`.
    pub fn open(path: impl AsRef<Path>) -> io::Result<Self> {
        let path = path.as_ref();
        let writer = OpenOptions::new().write(true).open(path)?;
        let reader = open_reader(path)?;
        log::info!("Opened RFCOMM device {}", path.display());
        Self::from_parts(path, reader, writer)
    }
}

/// Read handle on the node that returns `WouldBlock` instead of waiting.
#[cfg(unix)]
fn open_reader(path: &Path) -> io::Result<File> {
    use std::os::unix::fs::OpenOptionsExt;

    OpenOptions::new()
        .read(true)
        .custom_flags(libc::O_NONBLOCK)
        .open(path)
}

#[cfg(not(unix))]
fn open_reader(path: &Path) -> io::Result<File> {
    Err(io::Error::new(
        io::ErrorKind::Unsupported,
        format!("{}: RFCOMM device nodes need a Unix host", path.display()),
    ))
}

impl<W: Write + Send> RfcommDevice<W> {
    /// Build a client from separate read and write handles on the same channel.
    ///
    /// `reader` must not block indefinitely: while idle it has to return
    /// `WouldBlock` or `TimedOut` (a non-blocking handle, or one with a read
    /// timeout), otherwise stopping the client waits for the next byte.
    pub fn from_parts<R>(path: impl Into<PathBuf>, reader: R, writer: W) -> io::Result<Self>
    where
        R: Read + Send + 'static,
    {
        let path = path.into();
        let (chunk_tx, chunk_rx) = channel();
        let stop_reader = Arc::new(AtomicBool::new(false));
        let handle = spawn_reader(&path, reader, chunk_tx, Arc::clone(&stop_reader))?;
        Ok(Self {
            path,
            writer: Some(writer),
            chunk_rx: Some(chunk_rx),
            buffer: VecDeque::new(),
            link_up: true,
            stop_reader,
            reader: Some(handle),
        })
    }

    /// Path of the device node.
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Move everything the reader thread has delivered into the local buffer.
    fn drain(&mut self) {
        let Some(rx) = &self.chunk_rx else {
            return;
        };
        loop {
            match rx.try_recv() {
                Ok(chunk) => self.buffer.extend(chunk),
                Err(TryRecvError::Empty) => break,
                Err(TryRecvError::Disconnected) => {
                    self.link_up = false;
                    break;
                }
            }
        }
    }

    /// Stop the reader thread and wait for it to drop its handle.
    fn join_reader(&mut self) -> io::Result<()> {
        self.stop_reader.store(true, Ordering::Release);
        if let Some(handle) = self.reader.take() {
            handle.join().map_err(|_| {
                io::Error::other(format!("RFCOMM {}: reader thread panicked", self.path.display()))
            })?;
        }
        Ok(())
    }
}

impl<W: Write + Send> Drop for RfcommDevice<W> {
    fn drop(&mut self) {
        if let Err(e) = self.join_reader() {
            log::warn!("{e}");
        }
    }
}

fn spawn_reader<R>(
    path: &Path,
    mut reader: R,
    chunk_tx: Sender<Vec<u8>>,
    stop: Arc<AtomicBool>,
) -> io::Result<JoinHandle<()>>
where
    R: Read + Send + 'static,
{
    let label = path.display().to_string();
    thread::Builder::new()
        .name(format!("rfcomm-reader:{label}"))
        .spawn(move || {
            let mut chunk = [0u8; READ_CHUNK];
            while !stop.load(Ordering::Acquire) {
                match reader.read(&mut chunk) {
                    Ok(0) => {
                        log::info!("RFCOMM {label}: end of stream");
                        break;
                    }
                    Ok(count) => {
                        log::trace!("RFCOMM {label}: received {count} bytes");
                        if chunk_tx.send(chunk[..count].to_vec()).is_err() {
                            break;
                        }
                    }
                    Err(e) if matches!(e.kind(), io::ErrorKind::WouldBlock | io::ErrorKind::TimedOut) => {
                        thread::sleep(IDLE_POLL);
                    }
                    Err(e) if e.kind() == io::ErrorKind::Interrupted => {}
                    Err(e) => {
                        log::warn!("RFCOMM {label}: read error: {e}");
                        break;
                    }
                }
            }
            log::debug!("RFCOMM {label}: reader thread exiting");
        })
}

impl<W: Write + Send> BluetoothClient for RfcommDevice<W> {
    fn write(&mut self, bytes: &[u8]) -> io::Result<()> {
        let writer = self
            .writer
            .as_mut()
            .ok_or_else(|| io::Error::new(io::ErrorKind::NotConnected, "RFCOMM channel stopped"))?;
        writer.write_all(bytes)?;
        writer.flush()
    }

    fn read(&mut self) -> io::Result<Option<u8>> {
        self.drain();
        Ok(self.buffer.pop_front())
    }

    fn available(&mut self) -> io::Result<usize> {
        self.drain();
        Ok(self.buffer.len())
    }

    fn stop(&mut self) -> io::Result<()> {
        self.writer = None;
        self.chunk_rx = None;
        self.buffer.clear();
        self.link_up = false;
        self.join_reader()?;
        log::info!("Stopped RFCOMM device {}", self.path.display());
        Ok(())
    }

    fn is_connected(&self) -> bool {
        self.link_up && self.writer.is_some()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::transport::{BluetoothTransport, ReadOutcome, Transport};
    use std::net::{TcpListener, TcpStream};
    use std::time::{Duration, Instant};

    /// A TCP pair stands in for the radio channel.
    fn channel_pair() -> (RfcommDevice<TcpStream>, TcpStream) {
        let listener = TcpListener::bind("127.0.0.1:0").unwrap();
        let local = TcpStream::connect(listener.local_addr().unwrap()).unwrap();
        let (remote, _) = listener.accept().unwrap();
        let reader = local.try_clone().unwrap();
        reader.set_read_timeout(Some(Duration::from_millis(10))).unwrap();
        let device = RfcommDevice::from_parts("/dev/rfcomm-test", reader, local).unwrap();
        (device, remote)
    }

    fn wait_until(mut ready: impl FnMut() -> bool) -> bool {
        let deadline = Instant::now() + Duration::from_secs(5);
        while Instant::now() < deadline {
            if ready() {
                return true;
            }
            thread::sleep(Duration::from_millis(5));
        }
        false
    }

    #[test]
    fn test_bytes_flow_both_ways() {
        let (mut device, mut remote) = channel_pair();

        device.write(b"left").unwrap();
        let mut sent = [0u8; 4];
        remote.read_exact(&mut sent).unwrap();
        assert_eq!(&sent, b"left");

        remote.write_all(&[1, 2, 3]).unwrap();
        assert!(wait_until(|| device.available().unwrap() == 3));
        assert_eq!(device.read().unwrap(), Some(1));
        assert_eq!(device.read().unwrap(), Some(2));
        assert_eq!(device.read().unwrap(), Some(3));
        assert_eq!(device.read().unwrap(), None);
        assert!(device.is_connected());
    }

    #[test]
    fn test_remote_hangup_disconnects() {
        let (mut device, remote) = channel_pair();
        drop(remote);

        assert!(wait_until(|| {
            let _ = device.available();
            !device.is_connected()
        }));
        assert_eq!(device.read().unwrap(), None);
    }

    #[test]
    fn test_stop_rejects_writes() {
        let (mut device, _remote) = channel_pair();
        device.stop().unwrap();

        assert!(!device.is_connected());
        assert_eq!(device.available().unwrap(), 0);
        let err = device.write(b"x").unwrap_err();
        assert_eq!(err.kind(), io::ErrorKind::NotConnected);
    }

    /// Block until the remote end of the channel sees end of stream.
    fn remote_sees_eof(remote: &mut TcpStream) -> bool {
        remote.set_read_timeout(Some(Duration::from_secs(5))).unwrap();
        let mut byte = [0u8; 1];
        matches!(remote.read(&mut byte), Ok(0))
    }

    #[test]
    fn test_stop_releases_channel() {
        let (mut device, mut remote) = channel_pair();
        device.stop().unwrap();

        assert!(device.reader.is_none());
        assert!(remote_sees_eof(&mut remote));
        device.stop().unwrap();
    }

    #[test]
    fn test_drop_releases_channel() {
        let (device, mut remote) = channel_pair();
        drop(device);

        assert!(remote_sees_eof(&mut remote));
    }

    #[test]
    fn test_transport_close_releases_channel() {
        let (device, mut remote) = channel_pair();
        let mut transport = BluetoothTransport::new(device);
        transport.connect();
        transport.close();

        assert!(remote_sees_eof(&mut remote));
        assert!(transport.last_error().is_none());
    }

    #[test]
    fn test_drives_bluetooth_transport() {
        let (device, mut remote) = channel_pair();
        let mut transport = BluetoothTransport::new(device);
        transport.connect();

        transport.write(b"go");
        let mut sent = [0u8; 2];
        remote.read_exact(&mut sent).unwrap();
        assert_eq!(&sent, b"go");

        assert_eq!(transport.read_outcome(), ReadOutcome::Empty);
        drop(remote);
        assert!(wait_until(|| transport.read_outcome() == ReadOutcome::Closed));
        transport.close();
        assert!(transport.last_error().is_none());
    }

    #[test]
    fn test_open_missing_node_fails() {
        let dir = tempfile::tempdir().unwrap();
        assert!(RfcommDevice::open(dir.path().join("rfcomm9")).is_err());
    }
}
