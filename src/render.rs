use crate::types::{BarResult, Placement, SheetResult};

const MAX_WIDTH: f64 = 80.0;
const MAX_HEIGHT: f64 = 40.0;

/// Character grid with line-joining: edges that cross become `+`.
struct Canvas {
    rows: Vec<Vec<char>>,
}

impl Canvas {
    fn new(width: usize, height: usize) -> Self {
        Self {
            rows: vec![vec![' '; width + 1]; height + 1],
        }
    }

    fn put(&mut self, x: usize, y: usize, ch: char) {
        let Some(cell) = self.rows.get_mut(y).and_then(|row| row.get_mut(x)) else {
            return;
        };
        *cell = match (*cell, ch) {
            ('+', _) | ('|', '-') | ('-', '|') => '+',
            _ => ch,
        };
    }

    fn frame(&mut self, x: usize, y: usize, w: usize, h: usize) {
        for i in x..=x + w {
            self.put(i, y, '-');
            self.put(i, y + h, '-');
        }
        for j in y..=y + h {
            self.put(x, j, '|');
            self.put(x + w, j, '|');
        }
        for (cx, cy) in [(x, y), (x + w, y), (x, y + h), (x + w, y + h)] {
            self.put(cx, cy, '+');
        }
    }

    /// Center `text` inside a frame, clipped to its interior.
    fn label(&mut self, x: usize, y: usize, w: usize, h: usize, text: &str) {
        let cy = y + h / 2;
        if w <= 2 || cy <= y || cy >= y + h {
            return;
        }
        let start = (x + w / 2).saturating_sub(text.chars().count() / 2);
        for (i, ch) in text.chars().enumerate() {
            let cx = start + i;
            if cx > x
                && cx < x + w
                && let Some(cell) = self.rows.get_mut(cy).and_then(|row| row.get_mut(cx))
            {
                *cell = ch;
            }
        }
    }

    fn into_string(self) -> String {
        let mut out = String::new();
        for row in self.rows {
            let line: String = row.into_iter().collect();
            out.push_str(line.trim_end());
            out.push('\n');
        }
        out
    }
}

fn scaled(value: f64, scale: f64) -> usize {
    (value * scale).round() as usize
}

fn draw_placement(canvas: &mut Canvas, p: &Placement, scale: f64) {
    let (x, y) = (scaled(p.x, scale), scaled(p.y, scale));
    let (w, h) = (scaled(p.width, scale), scaled(p.height, scale));
    if w == 0 || h == 0 {
        return;
    }
    canvas.frame(x, y, w, h);
    canvas.label(x, y, w, h, &format!("{}x{}", p.width, p.height));
}

/// ASCII drawing of a sheet layout, y growing downwards on screen.
pub fn render_sheet(sheet: &SheetResult) -> String {
    let scale = f64::min(MAX_WIDTH / sheet.width, MAX_HEIGHT / sheet.height);
    let (grid_w, grid_h) = (scaled(sheet.width, scale), scaled(sheet.height, scale));
    if grid_w == 0 || grid_h == 0 {
        return String::new();
    }

    let mut canvas = Canvas::new(grid_w, grid_h);
    canvas.frame(0, 0, grid_w, grid_h);
    for p in &sheet.placements {
        draw_placement(&mut canvas, p, scale);
    }
    canvas.into_string()
}

/// One-line drawing of a bar: `#` for cut pieces, `|` between cuts, `.` for leftover.
pub fn render_bar(bar: &BarResult) -> String {
    let scale = MAX_WIDTH / bar.stock_length;
    let width = scaled(bar.stock_length, scale);
    let mut line = vec!['.'; width];

    for cut in &bar.cuts {
        let start = scaled(cut.position, scale);
        let end = scaled(cut.position + cut.length, scale).min(width);
        for cell in line.iter_mut().take(end).skip(start) {
            *cell = '#';
        }
        if start > 0 && start <= width {
            line[start - 1] = '|';
        }
    }

    let mut result = String::with_capacity(width + 3);
    result.push('[');
    result.extend(line);
    result.push(']');
    result.push('\n');
    result
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::Cut;

    fn sheet(width: f64, height: f64, placements: Vec<Placement>) -> SheetResult {
        SheetResult {
            stock_id: "sh".into(),
            width,
            height,
            placements,
            used_area: 0.0,
            waste_area: 0.0,
            waste_percentage: 0.0,
        }
    }

    fn placement(x: f64, y: f64, width: f64, height: f64) -> Placement {
        Placement {
            piece_id: "p".into(),
            order_item_id: "o".into(),
            x,
            y,
            width,
            height,
            rotated: false,
        }
    }

    #[test]
    fn test_render_single_piece() {
        let output = render_sheet(&sheet(100.0, 50.0, vec![placement(0.0, 0.0, 100.0, 50.0)]));
        assert!(output.contains('+'));
        assert!(output.contains('-'));
        assert!(output.contains('|'));
        assert!(output.contains("100x50"));
    }

    #[test]
    fn test_render_two_pieces() {
        let output = render_sheet(&sheet(
            100.0,
            100.0,
            vec![placement(0.0, 0.0, 50.0, 100.0), placement(50.0, 0.0, 50.0, 100.0)],
        ));
        assert!(output.contains("50x100"));
    }

    #[test]
    fn test_render_empty() {
        let output = render_sheet(&sheet(100.0, 100.0, vec![]));
        // Should still draw the stock border
        assert!(output.contains('+'));
    }

    #[test]
    fn test_render_bar() {
        let bar = BarResult {
            stock_id: "s".into(),
            stock_length: 80.0,
            cuts: vec![
                Cut {
                    piece_id: "a".into(),
                    order_item_id: "o".into(),
                    position: 0.0,
                    length: 20.0,
                },
                Cut {
                    piece_id: "b".into(),
                    order_item_id: "o".into(),
                    position: 21.0,
                    length: 19.0,
                },
            ],
            remaining_length: 40.0,
            waste: 40.0,
            waste_percentage: 50.0,
            usable_waste: None,
        };
        let line = render_bar(&bar);
        assert_eq!(line.trim_end().len(), 82);
        assert_eq!(&line[1..21], "#".repeat(20));
        assert_eq!(&line[21..22], "|");
        assert!(line.ends_with(&format!("{}]\n", ".".repeat(40))));
    }
}
