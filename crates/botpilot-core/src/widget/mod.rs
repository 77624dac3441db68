//! Interactive control-panel widgets.
//!
//! Every widget carries a [`WidgetState`] (selection plus enablement), answers
//! hit tests in screen coordinates and draws itself through a [`Painter`]:
//! - [`OverlayButton`]: image button claiming a wedge around a shared center
//! - [`TextButton`]: rectangular label button with enable/disable support
//!
//! [`WidgetManager`] routes pointer events to a set of widgets.

mod label;
mod manager;
mod overlay;
mod state;

pub use label::{LabelStyle, TextButton};
pub use manager::WidgetManager;
pub use overlay::{Direction, OverlayButton};
pub use state::{WidgetPhase, WidgetState};

use kurbo::Point;
use uuid::Uuid;

use crate::painter::Painter;

/// Unique identifier for a widget.
pub type WidgetId = Uuid;

/// Common surface of the control-panel widgets.
pub trait Widget {
    /// Get the widget's unique identifier.
    fn id(&self) -> WidgetId;

    /// Current selection/enablement.
    fn state(&self) -> WidgetState;

    /// Update the stored selection flag.
    fn set_selected(&mut self, selected: bool);

    /// Check whether `point` (screen coordinates) hits this widget.
    fn contains(&self, point: Point) -> bool;

    /// Draw the widget for its current state.
    fn draw(&self, painter: &mut dyn Painter);

    /// Effective selection; always false while disabled.
    fn is_selected(&self) -> bool {
        self.state().is_selected()
    }
}
