use crate::expand::ExpandedPiece1D;
use crate::types::{Cut, Options1D, UsableWaste};

/// One bar being filled during a 1D run.
#[derive(Debug, Clone, PartialEq)]
pub struct ActiveBar {
    pub stock_id: String,
    pub stock_length: f64,
    pub remaining_length: f64,
    pub current_position: f64,
    pub cuts: Vec<Cut>,
}

impl ActiveBar {
    /// Open a bar with `piece` cut at position 0.
    pub fn new(stock_id: &str, stock_length: f64, piece: &ExpandedPiece1D) -> Self {
        Self {
            stock_id: stock_id.to_string(),
            stock_length,
            remaining_length: stock_length - piece.length,
            current_position: piece.length,
            cuts: vec![Cut {
                piece_id: piece.id.clone(),
                order_item_id: piece.order_item_id.clone(),
                position: 0.0,
                length: piece.length,
            }],
        }
    }

    /// Kerf is only charged between cuts, never before the first one.
    fn kerf_before_next(&self, kerf: f64) -> f64 {
        if self.cuts.is_empty() { 0.0 } else { kerf }
    }

    pub fn can_fit(&self, length: f64, kerf: f64) -> bool {
        self.remaining_length >= length + self.kerf_before_next(kerf)
    }

    /// Remaining length after a hypothetical placement of `length`.
    pub fn remaining_after(&self, length: f64, kerf: f64) -> f64 {
        self.remaining_length - length - self.kerf_before_next(kerf)
    }

    /// Append a cut. The caller checks `can_fit` first.
    pub fn place(&mut self, piece: &ExpandedPiece1D, kerf: f64) {
        let gap = self.kerf_before_next(kerf);
        let required = piece.length + gap;
        self.cuts.push(Cut {
            piece_id: piece.id.clone(),
            order_item_id: piece.order_item_id.clone(),
            position: self.current_position + gap,
            length: piece.length,
        });
        self.current_position += required;
        self.remaining_length -= required;
    }

    pub fn used_length(&self) -> f64 {
        self.cuts.iter().map(|c| c.length).sum()
    }

    pub fn kerf_loss(&self, kerf: f64) -> f64 {
        kerf * self.cuts.len().saturating_sub(1) as f64
    }

    /// The tail of the bar past one more kerf, if it meets the remnant threshold.
    pub fn usable_waste(&self, options: &Options1D) -> Option<UsableWaste> {
        let length = self.remaining_length - options.kerf;
        if length > 0.0 && length >= options.min_usable_waste {
            Some(UsableWaste {
                position: self.current_position + options.kerf,
                length,
            })
        } else {
            None
        }
    }
}

/// Index of the first bar, in creation order, that can take `length`.
pub fn find_first_fit_bar(bars: &[ActiveBar], length: f64, kerf: f64) -> Option<usize> {
    bars.iter().position(|bar| bar.can_fit(length, kerf))
}

/// Index of the bar left with the least space after taking `length`.
/// The earliest bar wins ties.
pub fn find_best_fit_bar(bars: &[ActiveBar], length: f64, kerf: f64) -> Option<usize> {
    let mut best: Option<(usize, f64)> = None;
    for (idx, bar) in bars.iter().enumerate() {
        if !bar.can_fit(length, kerf) {
            continue;
        }
        let left = bar.remaining_after(length, kerf);
        if best.is_none_or(|(_, best_left)| left < best_left) {
            best = Some((idx, left));
        }
    }
    best.map(|(idx, _)| idx)
}
