//! Waste and efficiency figures, and assembly of the final run results.

use std::collections::HashMap;

use crate::bar::ActiveBar;
use crate::sheet::ActiveSheet;
use crate::types::{
    Algorithm1D, Algorithm2D, BarResult, Options1D, Piece1D, Piece2D, Result1D, Result2D,
    SheetResult, Statistics, Stock1D, Stock2D, StockUsage,
};

/// `part / whole` as a percentage, 0 for an empty whole.
pub fn percentage(part: f64, whole: f64) -> f64 {
    if whole == 0.0 {
        return 0.0;
    }
    part / whole * 100.0
}

/// Float total starting from +0.0, so empty runs report `0` rather than `-0`.
fn total(values: impl Iterator<Item = f64>) -> f64 {
    values.fold(0.0, |acc, v| acc + v)
}

/// Per-unit counts in order of first use.
fn stock_usage<'a>(ids: impl Iterator<Item = &'a str>) -> Vec<StockUsage> {
    let mut usage: Vec<StockUsage> = Vec::new();
    for id in ids {
        match usage.iter_mut().find(|u| u.stock_id == id) {
            Some(u) => u.used += 1,
            None => usage.push(StockUsage {
                stock_id: id.to_string(),
                used: 1,
            }),
        }
    }
    usage
}

/// Sum of unit prices over opened units, `None` if none of them carries a price.
fn total_cost<'a>(
    ids: impl Iterator<Item = &'a str>,
    prices: &HashMap<&str, Option<f64>>,
) -> Option<f64> {
    ids.filter_map(|id| prices.get(id).copied().flatten())
        .fold(None, |acc, price| Some(acc.unwrap_or(0.0) + price))
}

struct Totals {
    pieces: usize,
    capacity: f64,
    used: f64,
    waste: f64,
}

impl Totals {
    fn into_statistics(self, bins: usize, cost: Option<f64>) -> Statistics {
        Statistics {
            total_pieces_placed: self.pieces,
            stock_used_count: bins,
            total_stock_capacity: self.capacity,
            total_used_capacity: self.used,
            total_waste: self.waste,
            efficiency: percentage(self.used, self.capacity),
            waste_percentage: percentage(self.waste, self.capacity),
            total_cost: cost,
            total_usable_waste: None,
            total_kerf_loss: None,
        }
    }
}

pub fn bar_result(bar: &ActiveBar, options: &Options1D) -> BarResult {
    let waste = bar.remaining_length;
    BarResult {
        stock_id: bar.stock_id.clone(),
        stock_length: bar.stock_length,
        cuts: bar.cuts.clone(),
        remaining_length: bar.remaining_length,
        waste,
        waste_percentage: percentage(waste, bar.stock_length),
        usable_waste: bar.usable_waste(options),
    }
}

pub fn sheet_result(sheet: &ActiveSheet) -> SheetResult {
    let stock_area = sheet.width * sheet.height;
    let used_area = sheet.used_area();
    let waste_area = stock_area - used_area;
    SheetResult {
        stock_id: sheet.stock_id.clone(),
        width: sheet.width,
        height: sheet.height,
        placements: sheet.placements.clone(),
        used_area,
        waste_area,
        waste_percentage: percentage(waste_area, stock_area),
    }
}

pub fn build_result_1d(
    algorithm: Algorithm1D,
    bars: &[ActiveBar],
    stock: &[Stock1D],
    options: &Options1D,
    unplaced_pieces: Vec<Piece1D>,
) -> Result1D {
    let results: Vec<BarResult> = bars.iter().map(|b| bar_result(b, options)).collect();

    let totals = Totals {
        pieces: results.iter().map(|b| b.cuts.len()).sum(),
        capacity: total(results.iter().map(|b| b.stock_length)),
        used: total(bars.iter().map(ActiveBar::used_length)),
        waste: total(results.iter().map(|b| b.waste)),
    };

    let prices: HashMap<&str, Option<f64>> =
        stock.iter().map(|s| (s.id.as_str(), s.unit_price)).collect();
    let cost = total_cost(bars.iter().map(|b| b.stock_id.as_str()), &prices);

    let mut statistics = totals.into_statistics(bars.len(), cost);
    statistics.total_usable_waste = Some(total(
        results.iter().filter_map(|b| b.usable_waste).map(|w| w.length),
    ));
    statistics.total_kerf_loss = Some(total(bars.iter().map(|b| b.kerf_loss(options.kerf))));

    Result1D {
        success: unplaced_pieces.is_empty(),
        algorithm,
        stock_usage: stock_usage(bars.iter().map(|b| b.stock_id.as_str())),
        bars: results,
        statistics,
        unplaced_pieces,
    }
}

pub fn build_result_2d(
    algorithm: Algorithm2D,
    sheets: &[ActiveSheet],
    stock: &[Stock2D],
    unplaced_pieces: Vec<Piece2D>,
) -> Result2D {
    let results: Vec<SheetResult> = sheets.iter().map(sheet_result).collect();

    let totals = Totals {
        pieces: results.iter().map(|s| s.placements.len()).sum(),
        capacity: total(results.iter().map(|s| s.width * s.height)),
        used: total(results.iter().map(|s| s.used_area)),
        waste: total(results.iter().map(|s| s.waste_area)),
    };

    let prices: HashMap<&str, Option<f64>> =
        stock.iter().map(|s| (s.id.as_str(), s.unit_price)).collect();
    let cost = total_cost(sheets.iter().map(|s| s.stock_id.as_str()), &prices);

    Result2D {
        success: unplaced_pieces.is_empty(),
        algorithm,
        stock_usage: stock_usage(sheets.iter().map(|s| s.stock_id.as_str())),
        sheets: results,
        statistics: totals.into_statistics(sheets.len(), cost),
        unplaced_pieces,
    }
}
