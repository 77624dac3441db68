//! Image buttons arranged around a shared center.

use kurbo::{Point, Vec2};
use uuid::Uuid;

use super::{Widget, WidgetId, WidgetState};
use crate::painter::{ImageHandle, Painter};

/// Side of the center an overlay button sits on.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Direction {
    Up,
    Down,
    Left,
    Right,
}

impl Direction {
    pub const ALL: [Direction; 4] = [Direction::Up, Direction::Down, Direction::Left, Direction::Right];

    /// Offset of `distance` in this direction. Positive y points up.
    pub fn offset(self, distance: f64) -> Vec2 {
        match self {
            Direction::Up => Vec2::new(0.0, distance),
            Direction::Down => Vec2::new(0.0, -distance),
            Direction::Left => Vec2::new(-distance, 0.0),
            Direction::Right => Vec2::new(distance, 0.0),
        }
    }

    pub fn name(self) -> &'static str {
        match self {
            Direction::Up => "up",
            Direction::Down => "down",
            Direction::Left => "left",
            Direction::Right => "right",
        }
    }
}

/// Image button drawn at an offset from a center point.
///
/// Instead of a rectangle, the button owns the wedge of the plane on its side
/// of the center: a point hits when its displacement along the button's axis
/// points the same way as the offset and strictly outweighs the displacement
/// along the other axis. Four buttons with opposite offsets split the plane
/// into four wedges; points on the diagonals hit none of them.
#[derive(Debug, Clone)]
pub struct OverlayButton {
    id: WidgetId,
    /// Offset from the center; positive y is up on screen.
    offset: Vec2,
    normal_image: ImageHandle,
    selected_image: ImageHandle,
    /// Set by the first `draw_at` or `set_center`.
    center: Option<Point>,
    state: WidgetState,
}

impl OverlayButton {
    pub fn new(offset: Vec2, normal_image: ImageHandle, selected_image: ImageHandle) -> Self {
        Self {
            id: Uuid::new_v4(),
            offset,
            normal_image,
            selected_image,
            center: None,
            state: WidgetState::default(),
        }
    }

    /// Button placed `distance` away from the center in `direction`.
    pub fn toward(
        direction: Direction,
        distance: f64,
        normal_image: ImageHandle,
        selected_image: ImageHandle,
    ) -> Self {
        Self::new(direction.offset(distance), normal_image, selected_image)
    }

    pub fn offset(&self) -> Vec2 {
        self.offset
    }

    pub fn center(&self) -> Option<Point> {
        self.center
    }

    /// Position the button without drawing it.
    pub fn set_center(&mut self, center: Point) {
        self.center = Some(center);
    }

    /// Position the button around `center` and draw it.
    pub fn draw_at(&mut self, painter: &mut dyn Painter, center: Point) {
        self.center = Some(center);
        self.draw(painter);
    }

    /// Where the image is drawn for a given center.
    fn image_position(&self, center: Point) -> Point {
        Point::new(center.x + self.offset.x, center.y - self.offset.y)
    }

    fn positioned_center(&self, op: &str) -> Option<Point> {
        if self.center.is_none() {
            if cfg!(debug_assertions) {
                panic!("overlay button {}: {op} before it was positioned", self.id);
            }
            log::error!("overlay button {}: {op} before it was positioned", self.id);
        }
        self.center
    }
}

impl Widget for OverlayButton {
    fn id(&self) -> WidgetId {
        self.id
    }

    fn state(&self) -> WidgetState {
        self.state
    }

    fn set_selected(&mut self, selected: bool) {
        self.state.set_selected(selected);
    }

    fn contains(&self, point: Point) -> bool {
        let Some(center) = self.positioned_center("hit-tested") else {
            return false;
        };
        let d = center - point;
        let (adx, ady) = (d.x.abs(), d.y.abs());

        (self.offset.x > 0.0 && d.x < 0.0 && adx > ady)
            || (self.offset.x < 0.0 && d.x > 0.0 && adx > ady)
            || (self.offset.y > 0.0 && d.y > 0.0 && ady > adx)
            || (self.offset.y < 0.0 && d.y < 0.0 && ady > adx)
    }

    fn draw(&self, painter: &mut dyn Painter) {
        let Some(center) = self.positioned_center("drawn") else {
            return;
        };
        let image = if self.state.is_selected() {
            &self.selected_image
        } else {
            &self.normal_image
        };
        painter.image_centered(image, self.image_position(center));
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::painter::{DrawCommand, RecordingPainter};

    const CENTER: Point = Point::new(100.0, 100.0);

    fn button(direction: Direction) -> OverlayButton {
        let mut button = OverlayButton::toward(
            direction,
            40.0,
            ImageHandle::new(direction.name()),
            ImageHandle::new(format!("{}-lit", direction.name())),
        );
        button.set_center(CENTER);
        button
    }

    fn pad() -> Vec<OverlayButton> {
        Direction::ALL.into_iter().map(button).collect()
    }

    fn hits(pad: &[OverlayButton], point: Point) -> Vec<Direction> {
        Direction::ALL
            .into_iter()
            .zip(pad)
            .filter(|(_, b)| b.contains(point))
            .map(|(d, _)| d)
            .collect()
    }

    #[test]
    fn test_each_wedge_has_one_owner() {
        let pad = pad();
        // Screen y grows downward: "up" is smaller y.
        assert_eq!(hits(&pad, Point::new(100.0, 60.0)), vec![Direction::Up]);
        assert_eq!(hits(&pad, Point::new(110.0, 20.0)), vec![Direction::Up]);
        assert_eq!(hits(&pad, Point::new(100.0, 140.0)), vec![Direction::Down]);
        assert_eq!(hits(&pad, Point::new(60.0, 100.0)), vec![Direction::Left]);
        assert_eq!(hits(&pad, Point::new(20.0, 90.0)), vec![Direction::Left]);
        assert_eq!(hits(&pad, Point::new(140.0, 100.0)), vec![Direction::Right]);
        assert_eq!(hits(&pad, Point::new(101.0, 100.0)), vec![Direction::Right]);
    }

    #[test]
    fn test_every_off_diagonal_point_has_exactly_one_owner() {
        let pad = pad();
        for x in (0..=200).step_by(7) {
            for y in (0..=200).step_by(11) {
                let point = Point::new(x as f64, y as f64);
                let d = CENTER - point;
                let expected = if d.x.abs() == d.y.abs() { 0 } else { 1 };
                assert_eq!(hits(&pad, point).len(), expected, "point {point:?}");
            }
        }
    }

    #[test]
    fn test_diagonals_and_center_hit_nothing() {
        let pad = pad();
        for point in [
            CENTER,
            Point::new(130.0, 130.0),
            Point::new(70.0, 70.0),
            Point::new(130.0, 70.0),
            Point::new(70.0, 130.0),
        ] {
            assert!(hits(&pad, point).is_empty(), "point {point:?}");
        }
    }

    #[test]
    fn test_draw_uses_image_for_state() {
        let mut painter = RecordingPainter::new();
        let mut up = button(Direction::Up);

        up.draw(&mut painter);
        up.set_selected(true);
        up.draw(&mut painter);

        let commands = painter.take();
        assert_eq!(commands.len(), 2);
        match (&commands[0], &commands[1]) {
            (
                DrawCommand::Image { image: first, center: at },
                DrawCommand::Image { image: second, .. },
            ) => {
                assert_eq!(first.name(), "up");
                assert_eq!(second.name(), "up-lit");
                assert_eq!(*at, Point::new(100.0, 60.0));
            }
            other => panic!("unexpected commands: {other:?}"),
        }
    }

    #[test]
    fn test_draw_at_positions_button() {
        let mut painter = RecordingPainter::new();
        let mut right = OverlayButton::toward(
            Direction::Right,
            25.0,
            ImageHandle::new("right"),
            ImageHandle::new("right-lit"),
        );
        assert_eq!(right.center(), None);

        right.draw_at(&mut painter, Point::new(50.0, 50.0));

        assert_eq!(right.center(), Some(Point::new(50.0, 50.0)));
        assert!(right.contains(Point::new(80.0, 55.0)));
        assert!(matches!(
            painter.commands(),
            [DrawCommand::Image { center, .. }] if *center == Point::new(75.0, 50.0)
        ));
    }

    #[cfg(debug_assertions)]
    #[test]
    #[should_panic(expected = "before it was positioned")]
    fn test_hit_test_before_positioning_panics_in_debug() {
        let left = OverlayButton::toward(
            Direction::Left,
            10.0,
            ImageHandle::new("left"),
            ImageHandle::new("left-lit"),
        );
        left.contains(Point::new(0.0, 0.0));
    }
}
