use crate::types::{GrainDirection, Placement};

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Size {
    pub width: f64,
    pub height: f64,
}

impl Size {
    pub fn new(width: f64, height: f64) -> Self {
        Self { width, height }
    }

    pub fn area(&self) -> f64 {
        self.width * self.height
    }

    pub fn rotated(&self) -> Self {
        Self {
            width: self.height,
            height: self.width,
        }
    }

    pub fn fits_in(&self, other: &Size) -> bool {
        self.width <= other.width && self.height <= other.height
    }
}

impl std::fmt::Display for Size {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}x{}", self.width, self.height)
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Point {
    pub x: f64,
    pub y: f64,
}

impl Point {
    pub const ORIGIN: Point = Point { x: 0.0, y: 0.0 };

    pub fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }
}

/// Axis-aligned rectangle anchored at its bottom-left corner.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Rect {
    pub x: f64,
    pub y: f64,
    pub width: f64,
    pub height: f64,
}

impl Rect {
    pub fn new(x: f64, y: f64, width: f64, height: f64) -> Self {
        Self {
            x,
            y,
            width,
            height,
        }
    }

    pub fn at(pos: Point, size: Size) -> Self {
        Self::new(pos.x, pos.y, size.width, size.height)
    }

    pub fn right(&self) -> f64 {
        self.x + self.width
    }

    pub fn top(&self) -> f64 {
        self.y + self.height
    }

    pub fn size(&self) -> Size {
        Size::new(self.width, self.height)
    }

    pub fn area(&self) -> f64 {
        self.width * self.height
    }

    /// Grow width and height by `by`, keeping the anchor.
    pub fn expanded(&self, by: f64) -> Self {
        Self::new(self.x, self.y, self.width + by, self.height + by)
    }

    pub fn contains(&self, other: &Rect) -> bool {
        other.x >= self.x
            && other.y >= self.y
            && other.right() <= self.right()
            && other.top() <= self.top()
    }
}

impl From<&Placement> for Rect {
    fn from(p: &Placement) -> Self {
        Rect::new(p.x, p.y, p.width, p.height)
    }
}

/// A candidate width/height assignment for a piece.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Orientation {
    pub width: f64,
    pub height: f64,
    pub rotated: bool,
}

impl Orientation {
    pub fn size(&self) -> Size {
        Size::new(self.width, self.height)
    }
}

/// Separating-axis test; rectangles that only touch do not overlap.
pub fn rectangles_overlap(a: &Rect, b: &Rect) -> bool {
    !(a.right() <= b.x || b.right() <= a.x || a.top() <= b.y || b.top() <= a.y)
}

pub fn is_within_bounds(rect: &Rect, bounds: Size) -> bool {
    rect.x >= 0.0 && rect.y >= 0.0 && rect.right() <= bounds.width && rect.top() <= bounds.height
}

/// Orientations a piece may be placed in, un-rotated first.
///
/// A directional grain forbids rotation whenever grain is respected, regardless of
/// the rotation flags.
pub fn get_orientations(
    width: f64,
    height: f64,
    can_rotate: bool,
    allow_rotation: bool,
    grain_direction: Option<GrainDirection>,
    respect_grain_direction: bool,
) -> Vec<Orientation> {
    let mut orientations = vec![Orientation {
        width,
        height,
        rotated: false,
    }];

    let grain_locked =
        respect_grain_direction && grain_direction.is_some_and(|g| g.is_directional());

    if allow_rotation && can_rotate && width != height && !grain_locked {
        orientations.push(Orientation {
            width: height,
            height: width,
            rotated: true,
        });
    }

    orientations
}

/// Bottom-left candidate positions derived from existing placements.
///
/// Emits the origin plus three corners per placement, sorted by y then x.
/// Duplicates are kept.
pub fn generate_candidate_positions(placements: &[Placement], kerf: f64) -> Vec<Point> {
    let mut positions = Vec::with_capacity(placements.len() * 3 + 1);
    positions.push(Point::ORIGIN);

    for p in placements {
        let right = p.x + p.width + kerf;
        let top = p.y + p.height + kerf;
        positions.push(Point::new(right, p.y));
        positions.push(Point::new(p.x, top));
        positions.push(Point::new(right, top));
    }

    positions.sort_by(|a, b| a.y.total_cmp(&b.y).then(a.x.total_cmp(&b.x)));
    positions
}
