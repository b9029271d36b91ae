//! Expansion of quantity-bearing piece lists into individually tracked units.

use crate::types::{GrainDirection, Piece1D, Piece2D};

/// A single unit expanded from a piece's quantity.
pub trait ExpandedPiece {
    /// The input shape this unit was expanded from.
    type Source;

    fn original_id(&self) -> &str;

    /// Rebuild an input-shaped piece carrying `quantity` units.
    fn to_source(&self, quantity: u32) -> Self::Source;
}

#[derive(Debug, Clone, PartialEq)]
pub struct ExpandedPiece1D {
    pub id: String,
    pub original_id: String,
    pub order_item_id: String,
    pub length: f64,
}

#[derive(Debug, Clone, PartialEq)]
pub struct ExpandedPiece2D {
    pub id: String,
    pub original_id: String,
    pub order_item_id: String,
    pub width: f64,
    pub height: f64,
    pub can_rotate: bool,
    pub grain_direction: Option<GrainDirection>,
}

impl ExpandedPiece2D {
    pub fn area(&self) -> f64 {
        self.width * self.height
    }
}

impl ExpandedPiece for ExpandedPiece1D {
    type Source = Piece1D;

    fn original_id(&self) -> &str {
        &self.original_id
    }

    fn to_source(&self, quantity: u32) -> Piece1D {
        Piece1D {
            id: self.original_id.clone(),
            length: self.length,
            quantity,
            order_item_id: self.order_item_id.clone(),
        }
    }
}

impl ExpandedPiece for ExpandedPiece2D {
    type Source = Piece2D;

    fn original_id(&self) -> &str {
        &self.original_id
    }

    fn to_source(&self, quantity: u32) -> Piece2D {
        Piece2D {
            id: self.original_id.clone(),
            width: self.width,
            height: self.height,
            quantity,
            order_item_id: self.order_item_id.clone(),
            can_rotate: self.can_rotate,
            grain_direction: self.grain_direction,
        }
    }
}

fn unit_id(id: &str, index: u32) -> String {
    format!("{id}_{index}")
}

pub fn expand_pieces_1d(pieces: &[Piece1D]) -> Vec<ExpandedPiece1D> {
    let mut expanded = Vec::new();
    for piece in pieces {
        for i in 0..piece.quantity {
            expanded.push(ExpandedPiece1D {
                id: unit_id(&piece.id, i),
                original_id: piece.id.clone(),
                order_item_id: piece.order_item_id.clone(),
                length: piece.length,
            });
        }
    }
    expanded
}

pub fn expand_pieces_2d(pieces: &[Piece2D]) -> Vec<ExpandedPiece2D> {
    let mut expanded = Vec::new();
    for piece in pieces {
        for i in 0..piece.quantity {
            expanded.push(ExpandedPiece2D {
                id: unit_id(&piece.id, i),
                original_id: piece.id.clone(),
                order_item_id: piece.order_item_id.clone(),
                width: piece.width,
                height: piece.height,
                can_rotate: piece.can_rotate,
                grain_direction: piece.grain_direction,
            });
        }
    }
    expanded
}

/// Longest first. Stable, so equal lengths keep input order.
pub fn sort_by_length_desc(pieces: &mut [ExpandedPiece1D]) {
    pieces.sort_by(|a, b| b.length.total_cmp(&a.length));
}

/// Largest area first. Stable, so equal areas keep input order.
pub fn sort_by_area_desc(pieces: &mut [ExpandedPiece2D]) {
    pieces.sort_by(|a, b| b.area().total_cmp(&a.area()));
}
