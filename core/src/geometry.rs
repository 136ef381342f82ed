//! Axis-aligned geometry shared by every simulated entity.

use serde::{Deserialize, Serialize};

/// Point in level space. The y axis grows downwards.
#[derive(Clone, Copy, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct Point {
    /// Horizontal coordinate.
    pub x: f32,
    /// Vertical coordinate.
    pub y: f32,
}

impl Point {
    /// Creates a point from its coordinates.
    #[must_use]
    pub const fn new(x: f32, y: f32) -> Self {
        Self { x, y }
    }

    /// Euclidean distance between two points.
    #[must_use]
    pub fn distance(self, other: Point) -> f32 {
        let x_diff = self.x - other.x;
        let y_diff = self.y - other.y;
        (x_diff * x_diff + y_diff * y_diff).sqrt()
    }
}

/// Amount shaved off the right and bottom edges of a collider before an
/// overlap test.
#[derive(Clone, Copy, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct Margins {
    /// Horizontal margin.
    pub x: f32,
    /// Vertical margin.
    pub y: f32,
}

impl Margins {
    /// Plain AABB test without any margin.
    pub const NONE: Margins = Margins::new(0.0, 0.0);

    /// Creates a margin pair.
    #[must_use]
    pub const fn new(x: f32, y: f32) -> Self {
        Self { x, y }
    }

    /// Margins proportional to a collider's own size.
    #[must_use]
    pub fn proportional(width: f32, height: f32, fraction: f32) -> Self {
        Self::new(width * fraction, height * fraction)
    }
}

/// Axis-aligned rectangle anchored at its top-left corner.
#[derive(Clone, Copy, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct Rect {
    /// Left edge.
    pub x: f32,
    /// Top edge.
    pub y: f32,
    /// Horizontal extent.
    pub width: f32,
    /// Vertical extent.
    pub height: f32,
}

impl Rect {
    /// Creates a rectangle from its top-left corner and size.
    #[must_use]
    pub const fn new(x: f32, y: f32, width: f32, height: f32) -> Self {
        Self {
            x,
            y,
            width,
            height,
        }
    }

    /// Top-left corner.
    #[must_use]
    pub const fn origin(&self) -> Point {
        Point::new(self.x, self.y)
    }

    /// Moves the rectangle so its top-left corner sits at `origin`.
    pub fn move_to(&mut self, origin: Point) {
        self.x = origin.x;
        self.y = origin.y;
    }

    /// Right edge.
    #[must_use]
    pub fn right(&self) -> f32 {
        self.x + self.width
    }

    /// Bottom edge.
    #[must_use]
    pub fn bottom(&self) -> f32 {
        self.y + self.height
    }

    /// Horizontal centre.
    #[must_use]
    pub fn center_x(&self) -> f32 {
        self.x + self.width / 2.0
    }

    /// Zero-margin overlap test. Touching edges do not overlap.
    #[must_use]
    pub fn overlaps(&self, other: &Rect) -> bool {
        self.overlaps_with_margins(other, Margins::NONE)
    }

    /// Overlap test where `self` is shrunk by `margins` on its far edges and
    /// `other` is shrunk by the same amount on its far edges.
    #[must_use]
    pub fn overlaps_with_margins(&self, other: &Rect, margins: Margins) -> bool {
        self.x < other.x + other.width - margins.x
            && self.x + self.width - margins.x > other.x
            && self.y < other.y + other.height - margins.y
            && self.y + self.height - margins.y > other.y
    }

    /// Swaps width and height in place, keeping the top-left corner.
    pub fn rotate_quarter(&mut self) {
        std::mem::swap(&mut self.width, &mut self.height);
    }
}

/// Anything with a top-left position that can be moved.
pub trait Positioned {
    /// Current top-left corner.
    fn position(&self) -> Point;

    /// Moves the entity to a new top-left corner.
    fn set_position(&mut self, position: Point);
}

/// Anything that takes part in overlap tests.
pub trait Collidable {
    /// Bounding box used for collisions.
    fn bounds(&self) -> Rect;

    /// Margins applied when this entity tests another one.
    fn collision_margins(&self) -> Margins {
        Margins::NONE
    }

    /// Tests whether this entity overlaps `other`, honouring this entity's margins.
    fn collides_with(&self, other: &Rect) -> bool {
        self.bounds()
            .overlaps_with_margins(other, self.collision_margins())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn touching_edges_do_not_overlap() {
        let left = Rect::new(0.0, 0.0, 10.0, 10.0);
        let right = Rect::new(10.0, 0.0, 10.0, 10.0);
        assert!(!left.overlaps(&right));
        assert!(!right.overlaps(&left));
    }

    #[test]
    fn margins_shrink_the_far_edges() {
        let enemy = Rect::new(0.0, 0.0, 30.0, 80.0);
        let player = Rect::new(25.0, 0.0, 30.0, 90.0);
        assert!(enemy.overlaps(&player));
        assert!(!enemy.overlaps_with_margins(&player, Margins::new(10.0, 20.0)));

        let deeper = Rect::new(15.0, 0.0, 30.0, 90.0);
        assert!(enemy.overlaps_with_margins(&deeper, Margins::new(10.0, 20.0)));
    }

    #[test]
    fn proportional_margins_scale_with_size() {
        let margins = Margins::proportional(200.0, 200.0, 3.0 / 8.0);
        assert_eq!(margins, Margins::new(75.0, 75.0));
    }

    #[test]
    fn rotate_quarter_swaps_dimensions() {
        let mut rect = Rect::new(4.0, 5.0, 30.0, 90.0);
        rect.rotate_quarter();
        assert_eq!(rect, Rect::new(4.0, 5.0, 90.0, 30.0));
    }

    #[test]
    fn distance_is_euclidean() {
        let origin = Point::new(0.0, 0.0);
        assert!((origin.distance(Point::new(3.0, 4.0)) - 5.0).abs() < f32::EPSILON);
    }
}
