//! Greedy placement passes for 1D bars and 2D sheets.
//!
//! Every algorithm runs the same loop over the sorted unit pieces: try the open
//! bars/sheets in creation order, otherwise open a fresh stock unit, otherwise record
//! the piece as unplaced. Decisions are final; nothing is revisited.

use tracing::{debug, info};

use crate::bar::{ActiveBar, find_best_fit_bar, find_first_fit_bar};
use crate::error::Result;
use crate::expand::{
    ExpandedPiece1D, ExpandedPiece2D, expand_pieces_1d, expand_pieces_2d, sort_by_area_desc,
    sort_by_length_desc,
};
use crate::geometry::{Orientation, Size};
use crate::guillotine::GuillotineSheet;
use crate::maxrects::MaxRectsSheet;
use crate::sheet::{ActiveSheet, opening_orientation};
use crate::stats::{build_result_1d, build_result_2d};
use crate::stock::{SortOrder, StockManager1D, StockManager2D};
use crate::types::{
    Algorithm1D, Algorithm2D, Options1D, Options2D, Piece1D, Piece2D, Result1D, Result2D,
    Stock1D, Stock2D,
};
use crate::unplaced::UnplacedCollector;
use crate::validate::{validate_1d, validate_2d};

type BarSelector = fn(&[ActiveBar], f64, f64) -> Option<usize>;

impl Algorithm1D {
    /// Stock order used when opening bars, and the rule for choosing an open bar.
    fn strategy(self) -> (SortOrder, BarSelector) {
        match self {
            Algorithm1D::Ffd => (SortOrder::Desc, find_first_fit_bar),
            Algorithm1D::Bfd => (SortOrder::Asc, find_best_fit_bar),
        }
    }
}

/// Cut `pieces` from bar `stock`.
///
/// Inputs are validated first; pieces that cannot be placed are reported in
/// `unplaced_pieces` rather than as an error.
pub fn optimize_1d(
    pieces: &[Piece1D],
    stock: &[Stock1D],
    options: &Options1D,
    algorithm: Algorithm1D,
) -> Result<Result1D> {
    validate_1d(pieces, stock, options)?;

    let mut units = expand_pieces_1d(pieces);
    sort_by_length_desc(&mut units);

    let (order, select) = algorithm.strategy();
    let mut stock_manager = StockManager1D::new(stock, order);
    let mut bars: Vec<ActiveBar> = Vec::new();
    let mut unplaced: UnplacedCollector<ExpandedPiece1D> = UnplacedCollector::new();

    for piece in &units {
        if let Some(idx) = select(&bars, piece.length, options.kerf) {
            bars[idx].place(piece, options.kerf);
            continue;
        }

        match stock_manager.find_available_stock(piece.length) {
            Some(s) => {
                let (stock_id, stock_length) = (s.id.clone(), s.length);
                stock_manager.consume_stock(&stock_id);
                debug!(
                    stock = %stock_id,
                    left = stock_manager.remaining(&stock_id),
                    piece = %piece.id,
                    "opened bar"
                );
                bars.push(ActiveBar::new(&stock_id, stock_length, piece));
            }
            None => {
                debug!(piece = %piece.id, length = piece.length, "no stock for piece");
                unplaced.add(piece);
            }
        }
    }

    let result = build_result_1d(algorithm, &bars, stock, options, unplaced.get_all());
    info!(
        algorithm = %algorithm,
        bars = result.bars.len(),
        unplaced = unplaced.unit_count(),
        complete = unplaced.is_empty(),
        efficiency = result.statistics.efficiency,
        "1D optimization finished"
    );
    Ok(result)
}

/// A sheet that can be filled by one 2D placement rule.
trait SheetPacker: Sized {
    fn open(
        stock_id: &str,
        stock: Size,
        piece: &ExpandedPiece2D,
        orientation: Orientation,
        options: &Options2D,
    ) -> Self;

    fn try_place(&mut self, piece: &ExpandedPiece2D, options: &Options2D) -> bool;

    fn into_sheet(self) -> ActiveSheet;
}

impl SheetPacker for ActiveSheet {
    fn open(
        stock_id: &str,
        stock: Size,
        piece: &ExpandedPiece2D,
        orientation: Orientation,
        _options: &Options2D,
    ) -> Self {
        ActiveSheet::new(stock_id, stock, piece, orientation)
    }

    fn try_place(&mut self, piece: &ExpandedPiece2D, options: &Options2D) -> bool {
        self.try_place_bottom_left(piece, options)
    }

    fn into_sheet(self) -> ActiveSheet {
        self
    }
}

impl SheetPacker for GuillotineSheet {
    fn open(
        stock_id: &str,
        stock: Size,
        piece: &ExpandedPiece2D,
        orientation: Orientation,
        options: &Options2D,
    ) -> Self {
        GuillotineSheet::new(stock_id, stock, piece, orientation, options.kerf)
    }

    fn try_place(&mut self, piece: &ExpandedPiece2D, options: &Options2D) -> bool {
        GuillotineSheet::try_place(self, piece, options)
    }

    fn into_sheet(self) -> ActiveSheet {
        self.sheet
    }
}

impl SheetPacker for MaxRectsSheet {
    fn open(
        stock_id: &str,
        stock: Size,
        piece: &ExpandedPiece2D,
        orientation: Orientation,
        options: &Options2D,
    ) -> Self {
        MaxRectsSheet::new(stock_id, stock, piece, orientation, options.kerf)
    }

    fn try_place(&mut self, piece: &ExpandedPiece2D, options: &Options2D) -> bool {
        MaxRectsSheet::try_place(self, piece, options)
    }

    fn into_sheet(self) -> ActiveSheet {
        self.sheet
    }
}

fn pack_sheets<P: SheetPacker>(
    units: &[ExpandedPiece2D],
    stock: &[Stock2D],
    options: &Options2D,
) -> (Vec<ActiveSheet>, UnplacedCollector<ExpandedPiece2D>) {
    let mut stock_manager = StockManager2D::new(stock);
    let mut sheets: Vec<P> = Vec::new();
    let mut unplaced = UnplacedCollector::new();

    for piece in units {
        if sheets.iter_mut().any(|sheet| sheet.try_place(piece, options)) {
            continue;
        }

        let opened = stock_manager
            .find_available_stock(piece.width, piece.height, |s| {
                let size = Size::new(s.width, s.height);
                opening_orientation(piece, size, options).map(|o| (size, o))
            })
            .map(|(s, (size, orientation))| (s.id.clone(), size, orientation));

        match opened {
            Some((stock_id, size, orientation)) => {
                stock_manager.consume_stock(&stock_id);
                debug!(
                    stock = %stock_id,
                    left = stock_manager.remaining(&stock_id),
                    piece = %piece.id,
                    rotated = orientation.rotated,
                    "opened sheet"
                );
                sheets.push(P::open(&stock_id, size, piece, orientation, options));
            }
            None => {
                debug!(
                    piece = %piece.id,
                    width = piece.width,
                    height = piece.height,
                    "no stock for piece"
                );
                unplaced.add(piece);
            }
        }
    }

    (sheets.into_iter().map(P::into_sheet).collect(), unplaced)
}

/// Place rectangular `pieces` on sheet `stock`.
///
/// Inputs are validated first; pieces that cannot be placed are reported in
/// `unplaced_pieces` rather than as an error.
pub fn optimize_2d(
    pieces: &[Piece2D],
    stock: &[Stock2D],
    options: &Options2D,
    algorithm: Algorithm2D,
) -> Result<Result2D> {
    validate_2d(pieces, stock, options)?;

    let mut units = expand_pieces_2d(pieces);
    sort_by_area_desc(&mut units);

    let (sheets, unplaced) = match algorithm {
        Algorithm2D::BottomLeft => pack_sheets::<ActiveSheet>(&units, stock, options),
        Algorithm2D::Guillotine => pack_sheets::<GuillotineSheet>(&units, stock, options),
        Algorithm2D::MaxRects => pack_sheets::<MaxRectsSheet>(&units, stock, options),
    };

    let result = build_result_2d(algorithm, &sheets, stock, unplaced.get_all());
    info!(
        algorithm = %algorithm,
        sheets = result.sheets.len(),
        unplaced = unplaced.unit_count(),
        complete = unplaced.is_empty(),
        efficiency = result.statistics.efficiency,
        "2D optimization finished"
    );
    Ok(result)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::ValidationError;
    use crate::geometry::{Rect, rectangles_overlap};
    use crate::types::{GrainDirection, SheetResult};

    fn piece_1d(id: &str, length: f64, quantity: u32) -> Piece1D {
        Piece1D {
            id: id.into(),
            length,
            quantity,
            order_item_id: format!("oi-{id}"),
        }
    }

    fn bar_stock(id: &str, length: f64, available: u32) -> Stock1D {
        Stock1D {
            id: id.into(),
            length,
            available,
            unit_price: None,
        }
    }

    fn piece_2d(id: &str, width: f64, height: f64, quantity: u32, can_rotate: bool) -> Piece2D {
        Piece2D {
            id: id.into(),
            width,
            height,
            quantity,
            order_item_id: format!("oi-{id}"),
            can_rotate,
            grain_direction: None,
        }
    }

    fn sheet_stock(id: &str, width: f64, height: f64, available: u32) -> Stock2D {
        Stock2D {
            id: id.into(),
            width,
            height,
            available,
            unit_price: None,
        }
    }

    fn opts_2d(kerf: f64, allow_rotation: bool) -> Options2D {
        Options2D {
            kerf,
            allow_rotation,
            respect_grain_direction: false,
        }
    }

    const ALL_2D: [Algorithm2D; 3] = [
        Algorithm2D::BottomLeft,
        Algorithm2D::Guillotine,
        Algorithm2D::MaxRects,
    ];

    /// Validates every sheet:
    /// 1. Every placement lies within the sheet
    /// 2. No two kerf-grown placements overlap
    fn assert_sheets_valid(sheets: &[SheetResult], kerf: f64) {
        for (si, sheet) in sheets.iter().enumerate() {
            for (pi, p) in sheet.placements.iter().enumerate() {
                assert!(
                    p.x >= 0.0
                        && p.y >= 0.0
                        && p.x + p.width <= sheet.width
                        && p.y + p.height <= sheet.height,
                    "sheet {si}, piece {pi} ({}) at ({}, {}) exceeds {}x{}",
                    p.piece_id, p.x, p.y, sheet.width, sheet.height
                );
            }
            for i in 0..sheet.placements.len() {
                for j in (i + 1)..sheet.placements.len() {
                    let a = Rect::from(&sheet.placements[i]).expanded(kerf);
                    let b = Rect::from(&sheet.placements[j]).expanded(kerf);
                    assert!(
                        !rectangles_overlap(&a, &b),
                        "sheet {si}: piece {i} {a:?} overlaps piece {j} {b:?}"
                    );
                }
            }
        }
    }

    #[test]
    fn test_ffd_two_bars() {
        let result = optimize_1d(
            &[piece_1d("p1", 100.0, 3), piece_1d("p2", 50.0, 2)],
            &[bar_stock("s1", 300.0, 2)],
            &Options1D::default(),
            Algorithm1D::Ffd,
        )
        .unwrap();

        assert!(result.success);
        assert_eq!(result.bars.len(), 2);
        assert_eq!(result.bars[0].cuts.len(), 3);
        assert_eq!(result.bars[0].waste, 0.0);
        assert_eq!(result.bars[1].cuts.len(), 2);
        assert_eq!(result.bars[1].waste, 200.0);
        assert_eq!(result.statistics.total_waste, 200.0);
        assert!((result.statistics.waste_percentage - 200.0 / 600.0 * 100.0).abs() < 1e-9);
    }

    #[test]
    fn test_unplaceable_bar_piece() {
        let result = optimize_1d(
            &[piece_1d("p1", 100.0, 1)],
            &[bar_stock("s1", 50.0, 5)],
            &Options1D::default(),
            Algorithm1D::Ffd,
        )
        .unwrap();
        assert!(!result.success);
        assert!(result.bars.is_empty());
        assert_eq!(result.unplaced_pieces, vec![piece_1d("p1", 100.0, 1)]);
    }

    #[test]
    fn test_bfd_prefers_tightest_stock_and_bar() {
        let stock = [bar_stock("long", 1000.0, 5), bar_stock("short", 250.0, 5)];
        let pieces = [piece_1d("a", 200.0, 1), piece_1d("b", 40.0, 1)];

        let bfd = optimize_1d(&pieces, &stock, &Options1D::default(), Algorithm1D::Bfd).unwrap();
        assert_eq!(bfd.bars.len(), 1);
        assert_eq!(bfd.bars[0].stock_id, "short");
        assert_eq!(bfd.bars[0].remaining_length, 10.0);

        let ffd = optimize_1d(&pieces, &stock, &Options1D::default(), Algorithm1D::Ffd).unwrap();
        assert_eq!(ffd.bars[0].stock_id, "long");
    }

    fn cut_lengths(result: &Result1D) -> Vec<Vec<f64>> {
        result
            .bars
            .iter()
            .map(|b| b.cuts.iter().map(|c| c.length).collect())
            .collect()
    }

    #[test]
    fn test_bfd_fills_fullest_bar() {
        // Bars end up with 30 and 5 left before the last piece; first-fit takes
        // the earlier bar, best-fit the one it fills exactly.
        let pieces = [
            piece_1d("a", 70.0, 1),
            piece_1d("b", 60.0, 1),
            piece_1d("c", 35.0, 1),
            piece_1d("d", 5.0, 1),
        ];
        let stock = [bar_stock("s", 100.0, 10)];

        let ffd = optimize_1d(&pieces, &stock, &Options1D::default(), Algorithm1D::Ffd).unwrap();
        assert_eq!(cut_lengths(&ffd), vec![vec![70.0, 5.0], vec![60.0, 35.0]]);

        let bfd = optimize_1d(&pieces, &stock, &Options1D::default(), Algorithm1D::Bfd).unwrap();
        assert_eq!(cut_lengths(&bfd), vec![vec![70.0], vec![60.0, 35.0, 5.0]]);
    }

    #[test]
    fn test_kerf_between_bar_cuts() {
        let result = optimize_1d(
            &[piece_1d("p", 100.0, 3)],
            &[bar_stock("s", 305.0, 2)],
            &Options1D {
                kerf: 3.0,
                min_usable_waste: 0.0,
            },
            Algorithm1D::Ffd,
        )
        .unwrap();
        // 100 + 3 + 100 + 3 + 100 = 306 > 305
        assert_eq!(result.bars.len(), 2);
        let positions: Vec<f64> = result.bars[0].cuts.iter().map(|c| c.position).collect();
        assert_eq!(positions, vec![0.0, 103.0]);
        assert_eq!(result.statistics.total_kerf_loss, Some(3.0));
    }

    #[test]
    fn test_stock_runs_out_partially() {
        let result = optimize_1d(
            &[piece_1d("p", 100.0, 5)],
            &[bar_stock("s", 200.0, 2)],
            &Options1D::default(),
            Algorithm1D::Ffd,
        )
        .unwrap();
        assert!(!result.success);
        assert_eq!(result.statistics.total_pieces_placed, 4);
        assert_eq!(result.unplaced_pieces, vec![piece_1d("p", 100.0, 1)]);
    }

    #[test]
    fn test_usable_remnant_reported() {
        let result = optimize_1d(
            &[piece_1d("p", 400.0, 1)],
            &[bar_stock("s", 1000.0, 1)],
            &Options1D {
                kerf: 5.0,
                min_usable_waste: 500.0,
            },
            Algorithm1D::Ffd,
        )
        .unwrap();
        let remnant = result.bars[0].usable_waste.unwrap();
        assert_eq!((remnant.position, remnant.length), (405.0, 595.0));
        assert_eq!(result.statistics.total_usable_waste, Some(595.0));
    }

    #[test]
    fn test_empty_pieces_succeed() {
        let result = optimize_1d(&[], &[], &Options1D::default(), Algorithm1D::Bfd).unwrap();
        assert!(result.success);
        assert!(result.bars.is_empty());
        let result = optimize_2d(&[], &[], &Options2D::default(), Algorithm2D::MaxRects).unwrap();
        assert!(result.success);
        assert!(result.sheets.is_empty());
    }

    #[test]
    fn test_validation_runs_first() {
        let err = optimize_1d(
            &[piece_1d("p", 100.0, 1)],
            &[bar_stock("s", 200.0, 1)],
            &Options1D {
                kerf: -1.0,
                min_usable_waste: 0.0,
            },
            Algorithm1D::Ffd,
        )
        .unwrap_err();
        assert_eq!(err, ValidationError::InvalidKerf { kerf: -1.0 });

        let err = optimize_2d(
            &[piece_2d("p", 0.0, 10.0, 1, true)],
            &[],
            &Options2D::default(),
            Algorithm2D::Guillotine,
        )
        .unwrap_err();
        assert!(matches!(err, ValidationError::InvalidPieceDimension { .. }));
    }

    #[test]
    fn test_exact_fit_sheet() {
        for algorithm in ALL_2D {
            let result = optimize_2d(
                &[piece_2d("p1", 100.0, 100.0, 1, false)],
                &[sheet_stock("sh1", 100.0, 100.0, 1)],
                &opts_2d(0.0, false),
                algorithm,
            )
            .unwrap();
            assert!(result.success, "{algorithm}");
            assert_eq!(result.sheets.len(), 1);
            let p = &result.sheets[0].placements[0];
            assert_eq!((p.x, p.y, p.width, p.height), (0.0, 0.0, 100.0, 100.0));
            assert_eq!(result.sheets[0].waste_area, 0.0);
        }
    }

    #[test]
    fn test_four_quarters_one_sheet() {
        for algorithm in ALL_2D {
            let result = optimize_2d(
                &[piece_2d("q", 50.0, 50.0, 4, false)],
                &[sheet_stock("sh", 100.0, 100.0, 3)],
                &opts_2d(0.0, false),
                algorithm,
            )
            .unwrap();
            assert_eq!(result.sheets.len(), 1, "{algorithm}");
            assert_sheets_valid(&result.sheets, 0.0);
            assert_eq!(result.statistics.efficiency, 100.0);
        }
    }

    #[test]
    fn test_kerf_reduces_capacity() {
        for algorithm in ALL_2D {
            let pieces = [piece_2d("p", 50.0, 100.0, 2, false)];
            let stock = [sheet_stock("sh", 100.0, 100.0, 5)];
            let no_kerf = optimize_2d(&pieces, &stock, &opts_2d(0.0, false), algorithm).unwrap();
            assert_eq!(no_kerf.sheets.len(), 1, "{algorithm}");

            // 50 + 5 + 50 = 105 > 100, needs 2 sheets
            let kerf = optimize_2d(&pieces, &stock, &opts_2d(5.0, false), algorithm).unwrap();
            assert_eq!(kerf.sheets.len(), 2, "{algorithm}");
            assert_sheets_valid(&kerf.sheets, 5.0);
        }
    }

    #[test]
    fn test_rotation_helps() {
        for algorithm in ALL_2D {
            // Stock 100x50, piece 50x100 only fits if rotated
            let result = optimize_2d(
                &[piece_2d("p", 50.0, 100.0, 1, true)],
                &[sheet_stock("sh", 100.0, 50.0, 1)],
                &opts_2d(0.0, true),
                algorithm,
            )
            .unwrap();
            assert!(result.success, "{algorithm}");
            assert!(result.sheets[0].placements[0].rotated);
        }
    }

    #[test]
    fn test_rotation_disabled_leaves_piece_unplaced() {
        for algorithm in ALL_2D {
            let result = optimize_2d(
                &[piece_2d("p", 50.0, 100.0, 1, true)],
                &[sheet_stock("sh", 100.0, 50.0, 1)],
                &opts_2d(0.0, false),
                algorithm,
            )
            .unwrap();
            assert!(!result.success, "{algorithm}");
            assert!(result.sheets.is_empty());
            assert_eq!(result.unplaced_pieces.len(), 1);
        }
    }

    #[test]
    fn test_grain_blocks_rotation() {
        let mut piece = piece_2d("g", 80.0, 20.0, 3, true);
        piece.grain_direction = Some(GrainDirection::Horizontal);
        let options = Options2D {
            kerf: 0.0,
            allow_rotation: true,
            respect_grain_direction: true,
        };
        for algorithm in ALL_2D {
            let result = optimize_2d(
                &[piece.clone()],
                &[sheet_stock("sh", 100.0, 100.0, 2)],
                &options,
                algorithm,
            )
            .unwrap();
            assert!(result.success, "{algorithm}");
            assert!(
                result
                    .sheets
                    .iter()
                    .flat_map(|s| &s.placements)
                    .all(|p| !p.rotated)
            );
        }
    }

    #[test]
    fn test_mixed_batch_with_kerf() {
        let pieces = [
            piece_2d("a", 700.0, 500.0, 6, true),
            piece_2d("b", 350.0, 250.0, 5, true),
            piece_2d("c", 1000.0, 400.0, 3, true),
            piece_2d("d", 450.0, 450.0, 4, false),
            piece_2d("e", 600.0, 300.0, 7, true),
        ];
        let stock = [sheet_stock("ply", 2440.0, 1220.0, 20)];
        for algorithm in ALL_2D {
            let result = optimize_2d(&pieces, &stock, &opts_2d(3.0, true), algorithm).unwrap();
            assert!(result.success, "{algorithm}");
            assert_eq!(result.statistics.total_pieces_placed, 25);
            assert_sheets_valid(&result.sheets, 3.0);

            let total_area: f64 = pieces
                .iter()
                .map(|p| p.width * p.height * p.quantity as f64)
                .sum();
            let min_sheets = (total_area / (2440.0 * 1220.0)).ceil() as usize;
            assert!(result.sheets.len() >= min_sheets);
        }
    }

    #[test]
    fn test_stock_fits_only_rotated_for_locked_piece() {
        // The only sheet fits the piece when the sheet is turned, which the piece
        // cannot mirror; nothing is consumed and the piece is reported.
        let result = optimize_2d(
            &[piece_2d("p", 90.0, 40.0, 1, false)],
            &[sheet_stock("sh", 50.0, 100.0, 1)],
            &opts_2d(0.0, true),
            Algorithm2D::BottomLeft,
        )
        .unwrap();
        assert!(result.sheets.is_empty());
        assert_eq!(result.unplaced_pieces[0].quantity, 1);
    }

    #[test]
    fn test_locked_piece_skips_to_upright_stock() {
        // "tall" is larger and offered first but holds 90x40 only when turned
        let stock = [
            sheet_stock("tall", 50.0, 100.0, 1),
            sheet_stock("wide", 95.0, 45.0, 1),
        ];
        for algorithm in ALL_2D {
            let result = optimize_2d(
                &[piece_2d("p", 90.0, 40.0, 1, false)],
                &stock,
                &Options2D::default(),
                algorithm,
            )
            .unwrap();
            assert!(result.success, "{algorithm}");
            assert_eq!(result.sheets.len(), 1);
            assert_eq!(result.sheets[0].stock_id, "wide");
            assert!(!result.sheets[0].placements[0].rotated);
            assert_eq!(result.stock_usage[0].stock_id, "wide");
        }
    }
}
