//! MaxRects packing: free space is kept as a list of maximal, possibly overlapping,
//! rectangles that are re-split around every placement.

use crate::expand::ExpandedPiece2D;
use crate::geometry::{Orientation, Point, Rect, Size, rectangles_overlap};
use crate::guillotine::{ScoreStrategy, ScoredPlacement, find_best_free_rect};
use crate::sheet::{ActiveSheet, piece_orientations};
use crate::types::Options2D;

#[derive(Debug, Clone)]
pub struct MaxRectsSheet {
    pub sheet: ActiveSheet,
    pub free_rects: Vec<Rect>,
    kerf: f64,
}

impl MaxRectsSheet {
    pub fn new(
        stock_id: &str,
        stock: Size,
        piece: &ExpandedPiece2D,
        orientation: Orientation,
        kerf: f64,
    ) -> Self {
        let mut bin = Self {
            sheet: ActiveSheet::new(stock_id, stock, piece, orientation),
            free_rects: vec![Rect::new(0.0, 0.0, stock.width, stock.height)],
            kerf,
        };
        bin.carve(Rect::at(Point::ORIGIN, orientation.size()));
        bin
    }

    pub fn find_best(
        &self,
        piece: &ExpandedPiece2D,
        options: &Options2D,
    ) -> Option<ScoredPlacement> {
        find_best_free_rect(
            &self.free_rects,
            &piece_orientations(piece, options),
            ScoreStrategy::BestAreaFit,
        )
    }

    pub fn place(&mut self, piece: &ExpandedPiece2D, scored: ScoredPlacement) {
        let free = self.free_rects[scored.free_idx];
        let pos = Point::new(free.x, free.y);
        self.sheet.push(piece, pos, scored.orientation);
        self.carve(Rect::at(pos, scored.orientation.size()));
    }

    pub fn try_place(&mut self, piece: &ExpandedPiece2D, options: &Options2D) -> bool {
        match self.find_best(piece, options) {
            Some(scored) => {
                self.place(piece, scored);
                true
            }
            None => false,
        }
    }

    /// Remove `placed`, plus a kerf of clearance on every side, from the free space.
    fn carve(&mut self, placed: Rect) {
        let occupied = Rect::new(
            placed.x - self.kerf,
            placed.y - self.kerf,
            placed.width + 2.0 * self.kerf,
            placed.height + 2.0 * self.kerf,
        );

        let mut next = Vec::with_capacity(self.free_rects.len() + 4);
        for free in &self.free_rects {
            if rectangles_overlap(free, &occupied) {
                split_around(free, &occupied, &mut next);
            } else {
                next.push(*free);
            }
        }
        self.free_rects = prune_contained(next);
    }
}

/// Up to four maximal remainders of `free` outside `occupied`.
fn split_around(free: &Rect, occupied: &Rect, out: &mut Vec<Rect>) {
    if occupied.x > free.x {
        out.push(Rect::new(free.x, free.y, occupied.x - free.x, free.height));
    }
    if occupied.right() < free.right() {
        out.push(Rect::new(
            occupied.right(),
            free.y,
            free.right() - occupied.right(),
            free.height,
        ));
    }
    if occupied.y > free.y {
        out.push(Rect::new(free.x, free.y, free.width, occupied.y - free.y));
    }
    if occupied.top() < free.top() {
        out.push(Rect::new(
            free.x,
            occupied.top(),
            free.width,
            free.top() - occupied.top(),
        ));
    }
}

/// Drop rectangles contained in another one; among equal rectangles the first survives.
fn prune_contained(rects: Vec<Rect>) -> Vec<Rect> {
    let mut kept = Vec::with_capacity(rects.len());
    for (i, r) in rects.iter().enumerate() {
        let redundant = rects.iter().enumerate().any(|(j, other)| {
            i != j && other.contains(r) && (other != r || j < i)
        });
        if !redundant {
            kept.push(*r);
        }
    }
    kept
}

#[cfg(test)]
mod tests {
    use super::*;

    fn piece(width: f64, height: f64) -> ExpandedPiece2D {
        ExpandedPiece2D {
            id: "p".into(),
            original_id: "p".into(),
            order_item_id: "o".into(),
            width,
            height,
            can_rotate: true,
            grain_direction: None,
        }
    }

    fn upright(width: f64, height: f64) -> Orientation {
        Orientation {
            width,
            height,
            rotated: false,
        }
    }

    fn opts(kerf: f64) -> Options2D {
        Options2D {
            kerf,
            allow_rotation: false,
            respect_grain_direction: false,
        }
    }

    #[test]
    fn test_initial_free_rects_are_maximal() {
        let bin = MaxRectsSheet::new(
            "sh1",
            Size::new(100.0, 100.0),
            &piece(40.0, 30.0),
            upright(40.0, 30.0),
            0.0,
        );
        assert_eq!(
            bin.free_rects,
            vec![
                Rect::new(40.0, 0.0, 60.0, 100.0),
                Rect::new(0.0, 30.0, 100.0, 70.0),
            ]
        );
    }

    #[test]
    fn test_kerf_clearance_in_free_rects() {
        let bin = MaxRectsSheet::new(
            "sh1",
            Size::new(100.0, 100.0),
            &piece(40.0, 30.0),
            upright(40.0, 30.0),
            5.0,
        );
        assert_eq!(
            bin.free_rects,
            vec![
                Rect::new(45.0, 0.0, 55.0, 100.0),
                Rect::new(0.0, 35.0, 100.0, 65.0),
            ]
        );
    }

    #[test]
    fn test_exact_fill_leaves_nothing() {
        let bin = MaxRectsSheet::new(
            "sh1",
            Size::new(100.0, 100.0),
            &piece(100.0, 100.0),
            upright(100.0, 100.0),
            0.0,
        );
        assert!(bin.free_rects.is_empty());
    }

    #[test]
    fn test_four_quarters_fill_sheet() {
        let mut bin = MaxRectsSheet::new(
            "sh1",
            Size::new(100.0, 100.0),
            &piece(50.0, 50.0),
            upright(50.0, 50.0),
            0.0,
        );
        for _ in 0..3 {
            assert!(bin.try_place(&piece(50.0, 50.0), &opts(0.0)));
        }
        assert!(bin.free_rects.is_empty());
        assert!(!bin.try_place(&piece(1.0, 1.0), &opts(0.0)));
        assert_eq!(bin.sheet.used_area(), 10_000.0);
    }

    #[test]
    fn test_best_area_fit_prefers_snug_rect() {
        let mut bin = MaxRectsSheet::new(
            "sh1",
            Size::new(100.0, 100.0),
            &piece(40.0, 30.0),
            upright(40.0, 30.0),
            0.0,
        );
        // 60x100 on the right is smaller than 100x70 on top
        assert!(bin.try_place(&piece(30.0, 30.0), &opts(0.0)));
        let p = bin.sheet.placements.last().unwrap();
        assert_eq!((p.x, p.y), (40.0, 0.0));
    }

    #[test]
    fn test_prune_keeps_first_duplicate() {
        let a = Rect::new(0.0, 0.0, 10.0, 10.0);
        let inner = Rect::new(1.0, 1.0, 2.0, 2.0);
        let pruned = prune_contained(vec![a, inner, a]);
        assert_eq!(pruned, vec![a]);
    }
}
