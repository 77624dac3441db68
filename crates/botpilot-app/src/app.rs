//! Control-panel application state and the stdin-driven run loop.

use std::io::{self, BufRead};
use std::path::PathBuf;

use botpilot_core::input::InputParseError;
use botpilot_core::{
    ConfigError, Direction, DrawCommand, FontHandle, ImageHandle, OverlayButton, PilotConfig,
    PointerEvent, ReadOutcome, RecordingPainter, TextButton, Transport, TransportError,
    TransportKind, Widget, WidgetId, WidgetManager, open_transport,
};
use kurbo::Point;
use peniko::Color;
use thiserror::Error;

const STATUS_ORIGIN: Point = Point::new(10.0, 10.0);
const STATUS_HEIGHT: f64 = 24.0;

/// Errors that stop the application before or while it runs.
#[derive(Debug, Error)]
pub enum AppError {
    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),
    #[error("Transport error: {0}")]
    Transport(#[from] TransportError),
    #[error("IO error: {0}")]
    Io(#[from] io::Error),
}

pub type AppResult<T> = Result<T, AppError>;

/// The control panel: a four-way pad sending commands and a link status label.
pub struct Pilot {
    config: PilotConfig,
    transport: Box<dyn Transport>,
    widgets: WidgetManager,
    /// Pad buttons and the direction each one commands.
    pad: Vec<(WidgetId, Direction)>,
    /// Kept outside the manager so its text and enablement stay reachable.
    status: TextButton,
    painter: RecordingPainter,
    received: Vec<u8>,
}

impl Pilot {
    pub fn new(config: PilotConfig, transport: Box<dyn Transport>) -> Self {
        let painter = RecordingPainter::new();
        let mut widgets = WidgetManager::new();
        let center = config.pad_center();

        let pad = Direction::ALL
            .into_iter()
            .map(|direction| {
                let mut button = OverlayButton::toward(
                    direction,
                    config.pad_offset,
                    ImageHandle::new(format!("pad-{}", direction.name())),
                    ImageHandle::new(format!("pad-{}-lit", direction.name())),
                );
                button.set_center(center);
                (widgets.add(Box::new(button)), direction)
            })
            .collect();

        // Sized for the longer of the two texts it shows.
        let font = FontHandle::new("sans", 16.0);
        let mut status = TextButton::measured(
            &painter,
            "Disconnected",
            STATUS_ORIGIN,
            STATUS_HEIGHT,
            Some(font),
        );
        status.set_text("Connected");
        status.set_text_colors(
            Color::from_rgba8(0, 200, 0, 255),
            Color::from_rgba8(255, 255, 0, 255),
        );

        Self {
            config,
            transport,
            widgets,
            pad,
            status,
            painter,
            received: Vec::new(),
        }
    }

    pub fn status(&self) -> &TextButton {
        &self.status
    }

    /// Bytes received from the robot so far.
    pub fn received(&self) -> &[u8] {
        &self.received
    }

    pub fn is_disconnected(&self) -> bool {
        !self.status.is_enabled()
    }

    /// Parse one textual pointer event and apply it.
    pub fn handle_line(&mut self, line: &str) -> Result<(), InputParseError> {
        let event: PointerEvent = line.parse()?;
        self.handle_pointer(&event);
        Ok(())
    }

    /// Route a pointer event to the widgets, sending the command of every pad
    /// button it newly selects.
    pub fn handle_pointer(&mut self, event: &PointerEvent) {
        let newly_selected = self.widgets.handle_pointer(event);
        self.status
            .set_selected(self.widgets.is_pressed() && self.status.contains(event.position()));

        for id in newly_selected {
            let Some(&(_, direction)) = self.pad.iter().find(|(pad_id, _)| *pad_id == id) else {
                continue;
            };
            if self.is_disconnected() {
                log::debug!("Dropping {} command: link is down", direction.name());
                continue;
            }
            let payload = self.config.commands.payload(direction);
            self.transport.write(payload);
            self.transport.flush();
            log::debug!("Sent {} command ({} bytes)", direction.name(), payload.len());
        }
    }

    /// Drain the bytes the transport reports as available. Returns how many
    /// were read.
    pub fn poll(&mut self) -> usize {
        if self.is_disconnected() {
            return 0;
        }
        if !self.transport.is_open() {
            self.mark_disconnected();
            return 0;
        }

        let mut pending = self.transport.available();
        // The availability check is where a TCP peer's hangup shows up.
        if !self.transport.is_open() {
            self.mark_disconnected();
            return 0;
        }
        // Bluetooth reads never block, so an idle link is probed for a hangup.
        if pending == 0 && self.transport.kind() == TransportKind::Bluetooth {
            pending = 1;
        }
        let mut read = 0;
        for _ in 0..pending {
            match self.transport.read_outcome() {
                ReadOutcome::Byte(byte) => {
                    self.received.push(byte);
                    read += 1;
                }
                ReadOutcome::Empty => break,
                ReadOutcome::Closed => {
                    self.mark_disconnected();
                    break;
                }
            }
        }
        if read > 0 {
            log::debug!("Received {read} bytes");
        }
        read
    }

    /// Draw every widget and return the frame's draw commands.
    pub fn redraw(&mut self) -> Vec<DrawCommand> {
        self.widgets.draw(&mut self.painter);
        self.status.draw(&mut self.painter);
        self.painter.take()
    }

    /// Close the transport.
    pub fn shutdown(&mut self) {
        self.transport.close();
        if let Some(error) = self.transport.last_error() {
            log::warn!("Last transport error: {error}");
        }
    }

    fn mark_disconnected(&mut self) {
        log::info!("Link to robot closed");
        self.status.set_text("Disconnected");
        self.status.set_enabled(false);
        self.widgets.clear_selection();
    }
}

/// Load configuration, connect and process pointer events from stdin until it
/// ends or a `quit` line arrives.
pub fn run(config_path: Option<PathBuf>) -> AppResult<()> {
    let path = match config_path {
        Some(path) => path,
        None => PilotConfig::default_path()?,
    };
    let config = PilotConfig::load_or_default(&path)?;
    let endpoint = config.endpoint()?;
    let transport = open_transport(&endpoint, config.connect_timeout())?;
    let mut pilot = Pilot::new(config, transport);

    for line in io::stdin().lock().lines() {
        let line = line?;
        let line = line.trim();
        if line.is_empty() {
            continue;
        }
        if line == "quit" {
            break;
        }

        let was_disconnected = pilot.is_disconnected();
        if let Err(e) = pilot.handle_line(line) {
            log::warn!("Ignoring input {line:?}: {e}");
        }
        pilot.poll();
        if pilot.is_disconnected() && !was_disconnected {
            println!("status: {}", pilot.status().text());
        }

        let frame = pilot.redraw();
        log::trace!("Frame with {} draw commands", frame.len());
    }

    pilot.shutdown();
    Ok(())
}
