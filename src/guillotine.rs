use crate::expand::ExpandedPiece2D;
use crate::geometry::{Orientation, Point, Rect, Size};
use crate::sheet::{ActiveSheet, piece_orientations};
use crate::types::Options2D;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ScoreStrategy {
    /// Smallest leftover on the tighter side only.
    BestShortSideFit,
    /// Smallest leftover area, then smallest leftover on the tighter side.
    BestAreaFit,
}

impl ScoreStrategy {
    /// Lower is better.
    pub fn score(&self, piece: Size, free: &Rect) -> (f64, f64) {
        let short = f64::min(free.width - piece.width, free.height - piece.height);
        match self {
            ScoreStrategy::BestShortSideFit => (short, 0.0),
            ScoreStrategy::BestAreaFit => (free.area() - piece.area(), short),
        }
    }
}

#[derive(Debug, Clone, Copy)]
pub struct ScoredPlacement {
    pub free_idx: usize,
    pub orientation: Orientation,
    pub score: (f64, f64),
}

/// Best free rectangle and orientation for `piece`. The first minimum found wins.
pub fn find_best_free_rect(
    free_rects: &[Rect],
    orientations: &[Orientation],
    strategy: ScoreStrategy,
) -> Option<ScoredPlacement> {
    let mut best: Option<ScoredPlacement> = None;

    for (idx, free) in free_rects.iter().enumerate() {
        for &orientation in orientations {
            let size = orientation.size();
            if !size.fits_in(&free.size()) {
                continue;
            }
            let score = strategy.score(size, free);
            if best.is_none_or(|b| score < b.score) {
                best = Some(ScoredPlacement {
                    free_idx: idx,
                    orientation,
                    score,
                });
            }
        }
    }

    best
}

/// A sheet packed by guillotine cuts, tracking the untouched regions left by each split.
#[derive(Debug, Clone)]
pub struct GuillotineSheet {
    pub sheet: ActiveSheet,
    pub free_rects: Vec<Rect>,
    kerf: f64,
}

impl GuillotineSheet {
    pub fn new(
        stock_id: &str,
        stock: Size,
        piece: &ExpandedPiece2D,
        orientation: Orientation,
        kerf: f64,
    ) -> Self {
        let mut bin = Self {
            sheet: ActiveSheet::new(stock_id, stock, piece, orientation),
            free_rects: Vec::new(),
            kerf,
        };
        bin.split(Rect::new(0.0, 0.0, stock.width, stock.height), orientation.size());
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
            ScoreStrategy::BestShortSideFit,
        )
    }

    pub fn place(&mut self, piece: &ExpandedPiece2D, scored: ScoredPlacement) {
        let free = self.free_rects.remove(scored.free_idx);
        self.sheet
            .push(piece, Point::new(free.x, free.y), scored.orientation);
        self.split(free, scored.orientation.size());
    }

    /// Right remainder spans the full free height, top remainder only the placed width.
    fn split(&mut self, free: Rect, placed: Size) {
        if placed.width + self.kerf < free.width {
            self.free_rects.push(Rect::new(
                free.x + placed.width + self.kerf,
                free.y,
                free.width - placed.width - self.kerf,
                free.height,
            ));
        }
        if placed.height + self.kerf < free.height {
            self.free_rects.push(Rect::new(
                free.x,
                free.y + placed.height + self.kerf,
                placed.width,
                free.height - placed.height - self.kerf,
            ));
        }
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
}
