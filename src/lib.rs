//! cutplan - cutting-stock optimizer for bars (1D) and sheets (2D).
//!
//! Given required pieces, a finite stock inventory and a blade kerf, the optimizer
//! produces a placement plan with waste statistics and the list of pieces that could
//! not be placed.
//!
//! # Example
//!
//! ```
//! use cutplan::{Algorithm1D, Options1D, Piece1D, Stock1D, optimize_1d};
//!
//! let pieces = vec![Piece1D {
//!     id: "p1".into(),
//!     length: 100.0,
//!     quantity: 3,
//!     order_item_id: "oi-1".into(),
//! }];
//! let stock = vec![Stock1D {
//!     id: "s1".into(),
//!     length: 300.0,
//!     available: 1,
//!     unit_price: None,
//! }];
//! let result = optimize_1d(&pieces, &stock, &Options1D::default(), Algorithm1D::Ffd).unwrap();
//! assert!(result.success);
//! assert_eq!(result.bars.len(), 1);
//! ```

pub mod bar;
pub mod config;
pub mod error;
pub mod expand;
pub mod geometry;
pub mod guillotine;
pub mod maxrects;
pub mod render;
pub mod sheet;
pub mod solver;
pub mod stats;
pub mod stock;
pub mod types;
pub mod unplaced;
pub mod validate;

pub use error::{ErrorCode, Result, ValidationError};
pub use solver::{optimize_1d, optimize_2d};
pub use types::{
    Algorithm1D, Algorithm2D, BarResult, Cut, GrainDirection, Options1D, Options2D, Piece1D,
    Piece2D, Placement, Result1D, Result2D, SheetResult, Statistics, Stock1D, Stock2D,
    StockUsage, UsableWaste,
};
