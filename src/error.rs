//! Error types for cut optimization.

use thiserror::Error;

/// Stable numeric codes for validation failures.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorCode {
    /// Kerf negative or not finite (E100)
    InvalidKerf = 100,
    /// Remnant threshold negative or not finite (E101)
    InvalidMinUsableWaste = 101,
    /// Piece dimension non-positive or not finite (E200)
    InvalidPieceDimension = 200,
    /// Piece demands zero units (E201)
    ZeroQuantity = 201,
    /// Pieces demand more units than one run will expand (E202)
    TooManyUnits = 202,
    /// Stock dimension non-positive or not finite (E300)
    InvalidStockDimension = 300,
    /// Two stock entries share an id (E301)
    DuplicateStockId = 301,
}

/// Structural precondition violations, raised before any placement work starts.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum ValidationError {
    #[error("Invalid kerf: expected a finite value >= 0, got {kerf}")]
    InvalidKerf { kerf: f64 },

    #[error("Invalid minUsableWaste: expected a finite value >= 0, got {value}")]
    InvalidMinUsableWaste { value: f64 },

    #[error("Piece {id}: {field} must be a finite value > 0, got {value}")]
    InvalidPieceDimension {
        id: String,
        field: &'static str,
        value: f64,
    },

    #[error("Piece {id}: quantity must be greater than zero")]
    ZeroQuantity { id: String },

    #[error("Pieces demand {units} units in total, at most {limit} are allowed per run")]
    TooManyUnits { units: u64, limit: u64 },

    #[error("Stock {id}: {field} must be a finite value > 0, got {value}")]
    InvalidStockDimension {
        id: String,
        field: &'static str,
        value: f64,
    },

    #[error("Stock id {id} appears more than once")]
    DuplicateStockId { id: String },
}

impl ValidationError {
    /// Get the error code for this error.
    pub fn code(&self) -> ErrorCode {
        match self {
            ValidationError::InvalidKerf { .. } => ErrorCode::InvalidKerf,
            ValidationError::InvalidMinUsableWaste { .. } => ErrorCode::InvalidMinUsableWaste,
            ValidationError::InvalidPieceDimension { .. } => ErrorCode::InvalidPieceDimension,
            ValidationError::ZeroQuantity { .. } => ErrorCode::ZeroQuantity,
            ValidationError::TooManyUnits { .. } => ErrorCode::TooManyUnits,
            ValidationError::InvalidStockDimension { .. } => ErrorCode::InvalidStockDimension,
            ValidationError::DuplicateStockId { .. } => ErrorCode::DuplicateStockId,
        }
    }

    /// Get the numeric error code value.
    pub fn code_value(&self) -> i32 {
        self.code() as i32
    }
}

/// Result type alias for optimizer operations.
pub type Result<T> = std::result::Result<T, ValidationError>;
