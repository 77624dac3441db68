//! BotPilot Core Library
//!
//! Transport adapters and the interactive widget model behind the BotPilot
//! control panel. Rendering, the Bluetooth stack and the TCP stack are
//! collaborators reached through the traits defined here.

pub mod config;
pub mod input;
pub mod painter;
pub mod transport;
pub mod widget;

pub use config::{ConfigError, PadCommands, PilotConfig};
pub use input::{MouseButton, PointerEvent};
pub use painter::{DrawCommand, FontHandle, ImageHandle, Painter, RecordingPainter};
pub use transport::{
    BluetoothClient, BluetoothTransport, Endpoint, InputStream, NetworkTransport, ReadOutcome,
    RfcommDevice, StreamSocket, Transport, TransportError, TransportKind, END_OF_STREAM,
    open_transport,
};
pub use widget::{
    Direction, LabelStyle, OverlayButton, TextButton, Widget, WidgetId, WidgetManager,
    WidgetPhase, WidgetState,
};
