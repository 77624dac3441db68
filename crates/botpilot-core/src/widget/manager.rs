//! Widget manager routing pointer input to a set of widgets.

use kurbo::Point;

use super::{Widget, WidgetId};
use crate::input::{MouseButton, PointerEvent};
use crate::painter::Painter;

/// Owns a set of widgets and keeps their selection in step with the pointer.
///
/// While the primary button is held, every widget's selection follows its own
/// hit test; releasing the button deselects everything. Exclusivity is left to
/// the widgets' geometry: overlapping widgets can be selected together.
#[derive(Default)]
pub struct WidgetManager {
    /// Widgets in insertion order, which is also draw order.
    widgets: Vec<Box<dyn Widget>>,
    /// Whether the primary button is currently held.
    pressed: bool,
}

impl WidgetManager {
    /// Create an empty widget manager.
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a widget, returning its ID.
    pub fn add(&mut self, widget: Box<dyn Widget>) -> WidgetId {
        let id = widget.id();
        self.widgets.push(widget);
        id
    }

    /// Remove a widget.
    pub fn remove(&mut self, id: WidgetId) -> Option<Box<dyn Widget>> {
        let index = self.widgets.iter().position(|w| w.id() == id)?;
        Some(self.widgets.remove(index))
    }

    pub fn get(&self, id: WidgetId) -> Option<&dyn Widget> {
        self.widgets.iter().find(|w| w.id() == id).map(|w| w.as_ref())
    }

    pub fn get_mut(&mut self, id: WidgetId) -> Option<&mut (dyn Widget + 'static)> {
        self.widgets.iter_mut().find(|w| w.id() == id).map(|w| w.as_mut())
    }

    pub fn len(&self) -> usize {
        self.widgets.len()
    }

    pub fn is_empty(&self) -> bool {
        self.widgets.is_empty()
    }

    /// Whether the primary button is currently held.
    pub fn is_pressed(&self) -> bool {
        self.pressed
    }

    /// Topmost widget containing `point`.
    pub fn hit_test(&self, point: Point) -> Option<WidgetId> {
        self.widgets.iter().rev().find(|w| w.contains(point)).map(|w| w.id())
    }

    /// IDs of all effectively selected widgets.
    pub fn selected(&self) -> Vec<WidgetId> {
        self.widgets.iter().filter(|w| w.is_selected()).map(|w| w.id()).collect()
    }

    /// Deselect every widget.
    pub fn clear_selection(&mut self) {
        for widget in &mut self.widgets {
            widget.set_selected(false);
        }
    }

    /// Apply a pointer event. Returns the widgets that became selected.
    pub fn handle_pointer(&mut self, event: &PointerEvent) -> Vec<WidgetId> {
        match *event {
            PointerEvent::Down { position, button: MouseButton::Left } => {
                self.pressed = true;
                self.track(position)
            }
            PointerEvent::Move { position } if self.pressed => self.track(position),
            PointerEvent::Up { button: MouseButton::Left, .. } => {
                self.pressed = false;
                self.clear_selection();
                Vec::new()
            }
            _ => Vec::new(),
        }
    }

    /// Draw all widgets in insertion order.
    pub fn draw(&self, painter: &mut dyn Painter) {
        for widget in &self.widgets {
            widget.draw(painter);
        }
    }

    fn track(&mut self, position: Point) -> Vec<WidgetId> {
        let mut newly_selected = Vec::new();
        for widget in &mut self.widgets {
            let was_selected = widget.is_selected();
            widget.set_selected(widget.contains(position));
            if widget.is_selected() && !was_selected {
                log::debug!("Widget {} selected at {:?}", widget.id(), position);
                newly_selected.push(widget.id());
            }
        }
        newly_selected
    }
}
