use std::collections::HashMap;

use crate::expand::ExpandedPiece;

/// Collects pieces that found no room, regrouped by the piece they were expanded from.
#[derive(Debug)]
pub struct UnplacedCollector<P> {
    index: HashMap<String, usize>,
    entries: Vec<(P, u32)>,
}

impl<P> Default for UnplacedCollector<P> {
    fn default() -> Self {
        Self {
            index: HashMap::new(),
            entries: Vec::new(),
        }
    }
}

impl<P: ExpandedPiece + Clone> UnplacedCollector<P> {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn add(&mut self, piece: &P) {
        match self.index.get(piece.original_id()) {
            Some(&idx) => self.entries[idx].1 += 1,
            None => {
                self.index
                    .insert(piece.original_id().to_string(), self.entries.len());
                self.entries.push((piece.clone(), 1));
            }
        }
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Total number of unplaced units across all pieces.
    pub fn unit_count(&self) -> u32 {
        self.entries.iter().map(|(_, n)| n).sum()
    }

    /// One input-shaped piece per original id, in order of first failure.
    pub fn get_all(&self) -> Vec<P::Source> {
        self.entries
            .iter()
            .map(|(piece, count)| piece.to_source(*count))
            .collect()
    }
}
