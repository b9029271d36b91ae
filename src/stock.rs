//! Stock inventory tracking for a single optimization run.

use std::collections::HashMap;

use crate::geometry::Size;
use crate::types::{Stock1D, Stock2D};

/// Direction in which bar stock is offered when a new bar is opened.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SortOrder {
    Asc,
    Desc,
}

/// Remaining unit counts keyed by stock id.
#[derive(Debug, Clone, Default)]
struct Usage {
    remaining: HashMap<String, u32>,
}

impl Usage {
    fn new<'a>(entries: impl Iterator<Item = (&'a str, u32)>) -> Self {
        Self {
            remaining: entries.map(|(id, n)| (id.to_string(), n)).collect(),
        }
    }

    fn has(&self, id: &str) -> bool {
        self.remaining.get(id).is_some_and(|&n| n > 0)
    }

    fn remaining(&self, id: &str) -> u32 {
        self.remaining.get(id).copied().unwrap_or(0)
    }

    fn consume(&mut self, id: &str) {
        if let Some(n) = self.remaining.get_mut(id)
            && *n > 0
        {
            *n -= 1;
        }
    }
}

pub struct StockManager1D {
    stock: Vec<Stock1D>,
    usage: Usage,
}

impl StockManager1D {
    pub fn new(stock: &[Stock1D], order: SortOrder) -> Self {
        let mut stock: Vec<Stock1D> = stock.iter().filter(|s| s.available > 0).cloned().collect();
        match order {
            SortOrder::Asc => stock.sort_by(|a, b| a.length.total_cmp(&b.length)),
            SortOrder::Desc => stock.sort_by(|a, b| b.length.total_cmp(&a.length)),
        }
        let usage = Usage::new(stock.iter().map(|s| (s.id.as_str(), s.available)));
        Self { stock, usage }
    }

    /// First stock in sort order that is long enough and still has units left.
    pub fn find_available_stock(&self, required_length: f64) -> Option<&Stock1D> {
        self.stock
            .iter()
            .find(|s| s.length >= required_length && self.usage.has(&s.id))
    }

    /// Take one unit. No-op once the stock is exhausted or unknown.
    pub fn consume_stock(&mut self, id: &str) {
        self.usage.consume(id);
    }

    pub fn remaining(&self, id: &str) -> u32 {
        self.usage.remaining(id)
    }
}

pub struct StockManager2D {
    stock: Vec<Stock2D>,
    usage: Usage,
}

impl StockManager2D {
    pub fn new(stock: &[Stock2D]) -> Self {
        let mut stock: Vec<Stock2D> = stock.iter().filter(|s| s.available > 0).cloned().collect();
        stock.sort_by(|a, b| (b.width * b.height).total_cmp(&(a.width * a.height)));
        let usage = Usage::new(stock.iter().map(|s| (s.id.as_str(), s.available)));
        Self { stock, usage }
    }

    /// Largest sheet with units left that can hold `width x height` in either stock
    /// orientation and that `open` accepts. Sheets `open` rejects are skipped.
    pub fn find_available_stock<T>(
        &self,
        width: f64,
        height: f64,
        open: impl Fn(&Stock2D) -> Option<T>,
    ) -> Option<(&Stock2D, T)> {
        let piece = Size::new(width, height);
        self.stock
            .iter()
            .filter(|s| {
                let sheet = Size::new(s.width, s.height);
                (piece.fits_in(&sheet) || piece.fits_in(&sheet.rotated())) && self.usage.has(&s.id)
            })
            .find_map(|s| open(s).map(|opened| (s, opened)))
    }

    pub fn consume_stock(&mut self, id: &str) {
        self.usage.consume(id);
    }

    pub fn remaining(&self, id: &str) -> u32 {
        self.usage.remaining(id)
    }
}
