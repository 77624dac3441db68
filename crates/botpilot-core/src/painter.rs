//! Rendering collaborator contract.
//!
//! Widgets draw through a [`Painter`]; the windowing/rendering framework
//! implements it. [`RecordingPainter`] keeps the calls as data, for headless
//! runs and tests.

use kurbo::{Point, Rect};
use peniko::Color;

/// Handle to an image resource loaded by the rendering framework.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct ImageHandle {
    name: String,
}

impl ImageHandle {
    pub fn new(name: impl Into<String>) -> Self {
        Self { name: name.into() }
    }

    pub fn name(&self) -> &str {
        &self.name
    }
}

/// Handle to a font resource loaded by the rendering framework.
#[derive(Debug, Clone, PartialEq)]
pub struct FontHandle {
    pub family: String,
    /// Point size.
    pub size: f64,
}

impl FontHandle {
    pub fn new(family: impl Into<String>, size: f64) -> Self {
        Self {
            family: family.into(),
            size,
        }
    }
}

/// Drawing primitives the widgets rely on.
pub trait Painter {
    /// Draw `image` with its center on `center`.
    fn image_centered(&mut self, image: &ImageHandle, center: Point);

    /// Fill `rect` with a solid color, no stroke.
    fn fill_rect(&mut self, rect: Rect, color: Color);

    /// Draw `text` laid out inside `bounds`.
    fn text(&mut self, text: &str, font: Option<&FontHandle>, bounds: Rect, color: Color);

    /// Width `text` would occupy when drawn with `font`.
    fn text_width(&self, text: &str, font: Option<&FontHandle>) -> f64;
}

/// A recorded painter call.
#[derive(Debug, Clone)]
pub enum DrawCommand {
    Image {
        image: ImageHandle,
        center: Point,
    },
    FillRect {
        rect: Rect,
        color: Color,
    },
    Text {
        text: String,
        font: Option<FontHandle>,
        bounds: Rect,
        color: Color,
    },
}

/// Painter that records calls instead of rasterizing them.
#[derive(Debug, Clone)]
pub struct RecordingPainter {
    commands: Vec<DrawCommand>,
    /// Advance per character, as a fraction of the font size.
    advance_ratio: f64,
    /// Font size assumed when no font is set.
    default_font_size: f64,
}

impl Default for RecordingPainter {
    fn default() -> Self {
        Self {
            commands: Vec::new(),
            advance_ratio: 0.6,
            default_font_size: 12.0,
        }
    }
}

impl RecordingPainter {
    pub fn new() -> Self {
        Self::default()
    }

    /// Calls recorded since the last [`take`](Self::take).
    pub fn commands(&self) -> &[DrawCommand] {
        &self.commands
    }

    /// Remove and return the recorded calls.
    pub fn take(&mut self) -> Vec<DrawCommand> {
        std::mem::take(&mut self.commands)
    }
}

impl Painter for RecordingPainter {
    fn image_centered(&mut self, image: &ImageHandle, center: Point) {
        self.commands.push(DrawCommand::Image {
            image: image.clone(),
            center,
        });
    }

    fn fill_rect(&mut self, rect: Rect, color: Color) {
        self.commands.push(DrawCommand::FillRect { rect, color });
    }

    fn text(&mut self, text: &str, font: Option<&FontHandle>, bounds: Rect, color: Color) {
        self.commands.push(DrawCommand::Text {
            text: text.to_string(),
            font: font.cloned(),
            bounds,
            color,
        });
    }

    fn text_width(&self, text: &str, font: Option<&FontHandle>) -> f64 {
        let size = font.map_or(self.default_font_size, |f| f.size);
        text.chars().count() as f64 * size * self.advance_ratio
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_records_in_call_order() {
        let mut painter = RecordingPainter::new();
        painter.fill_rect(Rect::new(0.0, 0.0, 10.0, 10.0), Color::from_rgba8(0, 0, 0, 255));
        painter.image_centered(&ImageHandle::new("up"), Point::new(5.0, 5.0));

        let commands = painter.take();
        assert_eq!(commands.len(), 2);
        assert!(matches!(commands[0], DrawCommand::FillRect { .. }));
        assert!(matches!(&commands[1], DrawCommand::Image { image, .. } if image.name() == "up"));
        assert!(painter.commands().is_empty());
    }

    #[test]
    fn test_text_width_scales_with_font() {
        let painter = RecordingPainter::new();
        let small = FontHandle::new("mono", 10.0);
        let large = FontHandle::new("mono", 20.0);

        assert!((painter.text_width("abcd", Some(&small)) - 24.0).abs() < 1e-9);
        assert!((painter.text_width("abcd", Some(&large)) - 48.0).abs() < 1e-9);
        assert!(painter.text_width("", None).abs() < 1e-9);
    }
}
