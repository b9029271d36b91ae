use crate::expand::ExpandedPiece2D;
use crate::geometry::{
    Orientation, Point, Rect, Size, generate_candidate_positions, get_orientations,
    is_within_bounds, rectangles_overlap,
};
use crate::types::{Options2D, Placement};

/// One sheet being filled during a 2D run.
#[derive(Debug, Clone, PartialEq)]
pub struct ActiveSheet {
    pub stock_id: String,
    pub width: f64,
    pub height: f64,
    pub placements: Vec<Placement>,
}

impl ActiveSheet {
    /// Open a sheet with `piece` at the origin in the given orientation.
    pub fn new(
        stock_id: &str,
        stock: Size,
        piece: &ExpandedPiece2D,
        orientation: Orientation,
    ) -> Self {
        let mut sheet = Self {
            stock_id: stock_id.to_string(),
            width: stock.width,
            height: stock.height,
            placements: Vec::new(),
        };
        sheet.push(piece, Point::ORIGIN, orientation);
        sheet
    }

    pub fn size(&self) -> Size {
        Size::new(self.width, self.height)
    }

    pub fn used_area(&self) -> f64 {
        self.placements.iter().map(Placement::area).sum()
    }

    pub(crate) fn push(&mut self, piece: &ExpandedPiece2D, pos: Point, orientation: Orientation) {
        self.placements.push(Placement {
            piece_id: piece.id.clone(),
            order_item_id: piece.order_item_id.clone(),
            x: pos.x,
            y: pos.y,
            width: orientation.width,
            height: orientation.height,
            rotated: orientation.rotated,
        });
    }

    /// Bounds check, then a clearance check where both the candidate and every
    /// placed piece are grown by `kerf`.
    pub fn can_place_at(&self, pos: Point, size: Size, kerf: f64) -> bool {
        let candidate = Rect::at(pos, size);
        if !is_within_bounds(&candidate, self.size()) {
            return false;
        }
        let grown = candidate.expanded(kerf);
        !self
            .placements
            .iter()
            .any(|p| rectangles_overlap(&grown, &Rect::from(p).expanded(kerf)))
    }

    /// First candidate position, lowest then leftmost, that accepts `size`.
    pub fn find_bottom_left_position(&self, size: Size, kerf: f64) -> Option<Point> {
        generate_candidate_positions(&self.placements, kerf)
            .into_iter()
            .find(|&pos| self.can_place_at(pos, size, kerf))
    }

    /// Try each allowed orientation in order and place at the first bottom-left
    /// position found.
    pub fn try_place_bottom_left(&mut self, piece: &ExpandedPiece2D, options: &Options2D) -> bool {
        for orientation in piece_orientations(piece, options) {
            if let Some(pos) = self.find_bottom_left_position(orientation.size(), options.kerf) {
                self.push(piece, pos, orientation);
                return true;
            }
        }
        false
    }
}

pub fn piece_orientations(piece: &ExpandedPiece2D, options: &Options2D) -> Vec<Orientation> {
    get_orientations(
        piece.width,
        piece.height,
        piece.can_rotate,
        options.allow_rotation,
        piece.grain_direction,
        options.respect_grain_direction,
    )
}

/// First allowed orientation in which `piece` fits on an empty `stock` sheet.
pub fn opening_orientation(
    piece: &ExpandedPiece2D,
    stock: Size,
    options: &Options2D,
) -> Option<Orientation> {
    piece_orientations(piece, options)
        .into_iter()
        .find(|o| o.size().fits_in(&stock))
}
