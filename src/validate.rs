//! Boundary validation of optimizer inputs.

use std::collections::HashSet;

use crate::error::{Result, ValidationError};
use crate::types::{Options1D, Options2D, Piece1D, Piece2D, Stock1D, Stock2D};

/// Upper bound on the total demanded quantity of one run. Every unit is expanded
/// into its own record before placement.
pub const MAX_UNITS: u64 = 100_000;

fn is_positive(value: f64) -> bool {
    value.is_finite() && value > 0.0
}

fn is_non_negative(value: f64) -> bool {
    value.is_finite() && value >= 0.0
}

fn check_kerf(kerf: f64) -> Result<()> {
    if !is_non_negative(kerf) {
        return Err(ValidationError::InvalidKerf { kerf });
    }
    Ok(())
}

fn check_piece_dimension(id: &str, field: &'static str, value: f64) -> Result<()> {
    if !is_positive(value) {
        return Err(ValidationError::InvalidPieceDimension {
            id: id.to_string(),
            field,
            value,
        });
    }
    Ok(())
}

fn check_stock_dimension(id: &str, field: &'static str, value: f64) -> Result<()> {
    if !is_positive(value) {
        return Err(ValidationError::InvalidStockDimension {
            id: id.to_string(),
            field,
            value,
        });
    }
    Ok(())
}

fn check_unit_total(quantities: impl Iterator<Item = u32>) -> Result<()> {
    let units: u64 = quantities.map(u64::from).sum();
    if units > MAX_UNITS {
        return Err(ValidationError::TooManyUnits {
            units,
            limit: MAX_UNITS,
        });
    }
    Ok(())
}

fn check_unique_stock_ids<'a>(ids: impl Iterator<Item = &'a str>) -> Result<()> {
    let mut seen = HashSet::new();
    for id in ids {
        if !seen.insert(id) {
            return Err(ValidationError::DuplicateStockId { id: id.to_string() });
        }
    }
    Ok(())
}

/// Validate a 1D request. Reports the first violation found.
pub fn validate_1d(pieces: &[Piece1D], stock: &[Stock1D], options: &Options1D) -> Result<()> {
    check_kerf(options.kerf)?;
    if !is_non_negative(options.min_usable_waste) {
        return Err(ValidationError::InvalidMinUsableWaste {
            value: options.min_usable_waste,
        });
    }

    for piece in pieces {
        check_piece_dimension(&piece.id, "length", piece.length)?;
        if piece.quantity == 0 {
            return Err(ValidationError::ZeroQuantity {
                id: piece.id.clone(),
            });
        }
    }
    check_unit_total(pieces.iter().map(|p| p.quantity))?;

    for s in stock {
        check_stock_dimension(&s.id, "length", s.length)?;
    }
    check_unique_stock_ids(stock.iter().map(|s| s.id.as_str()))
}

/// Validate a 2D request. Reports the first violation found.
pub fn validate_2d(pieces: &[Piece2D], stock: &[Stock2D], options: &Options2D) -> Result<()> {
    check_kerf(options.kerf)?;

    for piece in pieces {
        check_piece_dimension(&piece.id, "width", piece.width)?;
        check_piece_dimension(&piece.id, "height", piece.height)?;
        if piece.quantity == 0 {
            return Err(ValidationError::ZeroQuantity {
                id: piece.id.clone(),
            });
        }
    }
    check_unit_total(pieces.iter().map(|p| p.quantity))?;

    for s in stock {
        check_stock_dimension(&s.id, "width", s.width)?;
        check_stock_dimension(&s.id, "height", s.height)?;
    }
    check_unique_stock_ids(stock.iter().map(|s| s.id.as_str()))
}
