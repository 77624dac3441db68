//! Rectangular text buttons.

use kurbo::{Point, Rect, Size};
use peniko::Color;
use uuid::Uuid;

use super::{Widget, WidgetId, WidgetPhase, WidgetState};
use crate::painter::{FontHandle, Painter};

/// Colors of a text button.
#[derive(Debug, Clone, Copy)]
pub struct LabelStyle {
    /// Text color while enabled and not selected
    pub text: Color,
    /// Text color while selected
    pub selected: Color,
    /// Text color while disabled
    pub disabled: Color,
    /// Fill behind the text
    pub background: Color,
}

impl Default for LabelStyle {
    fn default() -> Self {
        Self {
            text: Color::from_rgba8(255, 255, 255, 255),
            selected: Color::from_rgba8(255, 0, 0, 255),
            disabled: Color::from_rgba8(128, 128, 128, 255),
            background: Color::from_rgba8(0, 0, 0, 255),
        }
    }
}

impl LabelStyle {
    /// Text color for a given phase.
    pub fn text_color(&self, phase: WidgetPhase) -> Color {
        match phase {
            WidgetPhase::Selected => self.selected,
            WidgetPhase::Disabled => self.disabled,
            WidgetPhase::Normal => self.text,
        }
    }
}

/// A text label that acts as a button.
#[derive(Debug, Clone)]
pub struct TextButton {
    id: WidgetId,
    text: String,
    bounds: Rect,
    font: Option<FontHandle>,
    style: LabelStyle,
    state: WidgetState,
}

impl TextButton {
    /// Create a button covering `size` from its top-left corner `origin`.
    pub fn new(text: impl Into<String>, origin: Point, size: Size) -> Self {
        Self {
            id: Uuid::new_v4(),
            text: text.into(),
            bounds: Rect::from_origin_size(origin, size).abs(),
            font: None,
            style: LabelStyle::default(),
            state: WidgetState::default(),
        }
    }

    /// Create a button exactly as wide as its text renders in `font`.
    pub fn measured(
        painter: &dyn Painter,
        text: impl Into<String>,
        origin: Point,
        height: f64,
        font: Option<FontHandle>,
    ) -> Self {
        let text = text.into();
        let width = painter.text_width(&text, font.as_ref());
        let mut button = Self::new(text, origin, Size::new(width, height));
        button.font = font;
        button
    }

    /// Set the colors (builder style).
    pub fn with_style(mut self, style: LabelStyle) -> Self {
        self.style = style;
        self
    }

    /// Set the font (builder style).
    pub fn with_font(mut self, font: FontHandle) -> Self {
        self.font = Some(font);
        self
    }

    pub fn text(&self) -> &str {
        &self.text
    }

    pub fn set_text(&mut self, text: impl Into<String>) {
        self.text = text.into();
    }

    pub fn bounds(&self) -> Rect {
        self.bounds
    }

    pub fn font(&self) -> Option<&FontHandle> {
        self.font.as_ref()
    }

    pub fn set_font(&mut self, font: FontHandle) {
        self.font = Some(font);
    }

    pub fn style(&self) -> &LabelStyle {
        &self.style
    }

    pub fn set_colors(&mut self, style: LabelStyle) {
        self.style = style;
    }

    /// Replace the normal and selected text colors, keeping the rest.
    pub fn set_text_colors(&mut self, text: Color, selected: Color) {
        self.style.text = text;
        self.style.selected = selected;
    }

    pub fn is_enabled(&self) -> bool {
        self.state.is_enabled()
    }

    /// Enable or disable the button. Disabling hides, but keeps, the selection.
    pub fn set_enabled(&mut self, enabled: bool) {
        self.state.set_enabled(enabled);
    }

    /// Text color for the current state.
    pub fn text_color(&self) -> Color {
        self.style.text_color(self.state.phase())
    }
}

impl Widget for TextButton {
    fn id(&self) -> WidgetId {
        self.id
    }

    fn state(&self) -> WidgetState {
        self.state
    }

    fn set_selected(&mut self, selected: bool) {
        self.state.set_selected(selected);
    }

    /// Inclusive on every edge: border pixels belong to the button.
    fn contains(&self, point: Point) -> bool {
        (self.bounds.x0..=self.bounds.x1).contains(&point.x)
            && (self.bounds.y0..=self.bounds.y1).contains(&point.y)
    }

    fn draw(&self, painter: &mut dyn Painter) {
        painter.fill_rect(self.bounds, self.style.background);
        painter.text(&self.text, self.font.as_ref(), self.bounds, self.text_color());
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::painter::{DrawCommand, RecordingPainter};

    fn rgba(color: Color) -> [u8; 4] {
        let c = color.to_rgba8();
        [c.r, c.g, c.b, c.a]
    }

    fn sample() -> TextButton {
        // (10,10)-(110,40)
        TextButton::new("Connect", Point::new(10.0, 10.0), Size::new(100.0, 30.0))
    }

    #[test]
    fn test_contains_inside_and_outside() {
        let button = sample();
        assert!(button.contains(Point::new(50.0, 20.0)));
        assert!(!button.contains(Point::new(200.0, 20.0)));
        assert!(!button.contains(Point::new(50.0, 41.0)));
        assert!(!button.contains(Point::new(9.9, 20.0)));
    }

    #[test]
    fn test_contains_is_inclusive_on_edges() {
        let button = sample();
        for point in [
            Point::new(10.0, 10.0),
            Point::new(110.0, 10.0),
            Point::new(10.0, 40.0),
            Point::new(110.0, 40.0),
            Point::new(60.0, 40.0),
        ] {
            assert!(button.contains(point), "point {point:?}");
        }
    }

    #[test]
    fn test_negative_size_is_normalized() {
        let button = TextButton::new("x", Point::new(50.0, 50.0), Size::new(-20.0, -10.0));
        assert_eq!(button.bounds(), Rect::new(30.0, 40.0, 50.0, 50.0));
        assert!(button.contains(Point::new(40.0, 45.0)));
    }

    #[test]
    fn test_disable_masks_selection_scenario() {
        let mut button = sample();
        assert!(button.contains(Point::new(50.0, 20.0)));
        assert!(!button.contains(Point::new(200.0, 20.0)));

        button.set_selected(true);
        button.set_enabled(false);
        assert!(!button.is_selected());

        button.set_enabled(true);
        assert!(button.is_selected());
    }

    #[test]
    fn test_color_precedence() {
        let mut button = sample();
        let style = *button.style();
        assert_eq!(rgba(button.text_color()), rgba(style.text));

        button.set_selected(true);
        assert_eq!(rgba(button.text_color()), rgba(style.selected));

        button.set_enabled(false);
        assert_eq!(rgba(button.text_color()), rgba(style.disabled));

        button.set_selected(false);
        assert_eq!(rgba(button.text_color()), rgba(style.disabled));
    }

    #[test]
    fn test_draw_fills_background_then_text() {
        let mut painter = RecordingPainter::new();
        let mut button = sample().with_font(FontHandle::new("sans", 14.0));
        button.set_text("Disconnect");
        button.set_text_colors(Color::from_rgba8(0, 255, 0, 255), Color::from_rgba8(0, 0, 255, 255));
        button.set_selected(true);

        button.draw(&mut painter);

        match painter.commands() {
            [DrawCommand::FillRect { rect, color: fill }, DrawCommand::Text { text, font, bounds, color }] => {
                assert_eq!(*rect, button.bounds());
                assert_eq!(rgba(*fill), [0, 0, 0, 255]);
                assert_eq!(text, "Disconnect");
                assert_eq!(font.as_ref().map(|f| f.family.as_str()), Some("sans"));
                assert_eq!(*bounds, button.bounds());
                assert_eq!(rgba(*color), [0, 0, 255, 255]);
            }
            other => panic!("unexpected commands: {other:?}"),
        }
    }

    #[test]
    fn test_measured_width_follows_text() {
        let painter = RecordingPainter::new();
        let font = FontHandle::new("mono", 10.0);
        let button = TextButton::measured(&painter, "Stop", Point::new(0.0, 0.0), 20.0, Some(font));

        let expected = painter.text_width("Stop", button.font());
        assert!((button.bounds().width() - expected).abs() < 1e-9);
        assert!((button.bounds().height() - 20.0).abs() < 1e-9);
        assert_eq!(button.text(), "Stop");
    }
}
