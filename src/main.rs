use clap::{Parser, Subcommand};
use cutplan::render;
use cutplan::{
    Algorithm1D, Algorithm2D, GrainDirection, Options1D, Options2D, Piece1D, Piece2D, Result1D,
    Result2D, Stock1D, Stock2D, optimize_1d, optimize_2d,
};
use serde::Serialize;
use tracing::Level;

#[derive(Parser)]
#[command(
    name = "cutplan",
    about = "Cutting stock optimizer for bars (1D) and sheets (2D)"
)]
struct Cli {
    /// Print the full result as JSON
    #[arg(long, global = true)]
    json: bool,

    /// Log placement decisions to stderr
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Cut lengths from bar stock
    Bars {
        /// Stock bars as LEN:available[@price] (e.g. 6000:4 3000:10@12.5)
        #[arg(long, num_args = 1.., required = true)]
        stock: Vec<String>,

        /// Cut pieces as LEN:qty (e.g. 1200:3 800:5)
        #[arg(long = "cuts", num_args = 1.., required = true)]
        cuts: Vec<String>,

        /// Blade kerf (default: 0)
        #[arg(long, default_value_t = 0.0)]
        kerf: f64,

        /// Leftover length kept as a reusable remnant (default: 0)
        #[arg(long, default_value_t = 0.0)]
        min_usable_waste: f64,

        /// Algorithm: ffd or bfd
        #[arg(long, default_value = "ffd", value_parser = parse_algorithm_1d)]
        algorithm: Algorithm1D,

        /// Show an ASCII strip of each bar
        #[arg(long)]
        layout: bool,
    },
    /// Cut rectangles from sheet stock
    Sheets {
        /// Stock sheets as WxH:available[@price] (e.g. 2440x1220:5)
        #[arg(long, num_args = 1.., required = true)]
        stock: Vec<String>,

        /// Cut pieces as WxH:qty[:h|v] (e.g. 800x600:3 400x300:5:h)
        #[arg(long = "cuts", num_args = 1.., required = true)]
        cuts: Vec<String>,

        /// Blade kerf (default: 0)
        #[arg(long, default_value_t = 0.0)]
        kerf: f64,

        /// Disable piece rotation
        #[arg(long)]
        no_rotate: bool,

        /// Never rotate pieces that have a grain direction
        #[arg(long)]
        respect_grain: bool,

        /// Algorithm: bottom-left, guillotine or maxrects
        #[arg(long, default_value = "bottom-left", value_parser = parse_algorithm_2d)]
        algorithm: Algorithm2D,

        /// Show ASCII layout of each sheet
        #[arg(long)]
        layout: bool,
    },
}

fn parse_algorithm_1d(s: &str) -> Result<Algorithm1D, String> {
    match s.to_ascii_lowercase().as_str() {
        "ffd" => Ok(Algorithm1D::Ffd),
        "bfd" => Ok(Algorithm1D::Bfd),
        _ => Err(format!("invalid algorithm '{}', expected: ffd or bfd", s)),
    }
}

fn parse_algorithm_2d(s: &str) -> Result<Algorithm2D, String> {
    match s.to_ascii_lowercase().as_str() {
        "bottom-left" | "blf" => Ok(Algorithm2D::BottomLeft),
        "guillotine" => Ok(Algorithm2D::Guillotine),
        "maxrects" => Ok(Algorithm2D::MaxRects),
        _ => Err(format!(
            "invalid algorithm '{}', expected: bottom-left, guillotine, or maxrects",
            s
        )),
    }
}

fn parse_number(s: &str, what: &str, input: &str) -> Result<f64, String> {
    s.parse::<f64>()
        .map_err(|_| format!("invalid {} in '{}'", what, input))
}

fn parse_count(s: &str, what: &str, input: &str) -> Result<u32, String> {
    s.parse::<u32>()
        .map_err(|_| format!("invalid {} in '{}'", what, input))
}

fn parse_dimensions(s: &str, input: &str) -> Result<(f64, f64), String> {
    let parts: Vec<&str> = s.split('x').collect();
    if parts.len() != 2 {
        return Err(format!("invalid dimensions '{}', expected WxH", input));
    }
    Ok((
        parse_number(parts[0], "width", input)?,
        parse_number(parts[1], "height", input)?,
    ))
}

/// Split `SIZE:count[@price]`.
fn split_stock(s: &str) -> Result<(&str, u32, Option<f64>), String> {
    let (body, price) = match s.split_once('@') {
        Some((body, price)) => (body, Some(parse_number(price, "price", s)?)),
        None => (s, None),
    };
    let (size, count) = body
        .split_once(':')
        .ok_or_else(|| format!("invalid stock '{}', expected SIZE:available", s))?;
    Ok((size, parse_count(count, "available count", s)?, price))
}

fn parse_bar_stock(s: &str, index: usize) -> Result<Stock1D, String> {
    let (size, available, unit_price) = split_stock(s)?;
    Ok(Stock1D {
        id: format!("S{}", index + 1),
        length: parse_number(size, "length", s)?,
        available,
        unit_price,
    })
}

fn parse_sheet_stock(s: &str, index: usize) -> Result<Stock2D, String> {
    let (size, available, unit_price) = split_stock(s)?;
    let (width, height) = parse_dimensions(size, s)?;
    Ok(Stock2D {
        id: format!("S{}", index + 1),
        width,
        height,
        available,
        unit_price,
    })
}

fn parse_bar_cut(s: &str, index: usize) -> Result<Piece1D, String> {
    let parts: Vec<&str> = s.split(':').collect();
    if parts.len() != 2 {
        return Err(format!("invalid cut '{}', expected LEN:qty", s));
    }
    let id = format!("P{}", index + 1);
    Ok(Piece1D {
        length: parse_number(parts[0], "length", s)?,
        quantity: parse_count(parts[1], "quantity", s)?,
        order_item_id: id.clone(),
        id,
    })
}

fn parse_sheet_cut(s: &str, index: usize, can_rotate: bool) -> Result<Piece2D, String> {
    let parts: Vec<&str> = s.split(':').collect();
    if parts.len() != 2 && parts.len() != 3 {
        return Err(format!("invalid cut '{}', expected WxH:qty[:h|v]", s));
    }
    let (width, height) = parse_dimensions(parts[0], s)?;
    let grain_direction = match parts.get(2).map(|g| g.to_ascii_lowercase()) {
        None => None,
        Some(g) if g == "h" => Some(GrainDirection::Horizontal),
        Some(g) if g == "v" => Some(GrainDirection::Vertical),
        Some(_) => return Err(format!("invalid grain in '{}', expected h or v", s)),
    };
    let id = format!("P{}", index + 1);
    Ok(Piece2D {
        width,
        height,
        quantity: parse_count(parts[1], "quantity", s)?,
        order_item_id: id.clone(),
        id,
        can_rotate,
        grain_direction,
    })
}

fn parse_all<T>(
    items: &[String],
    parse: impl Fn(&str, usize) -> Result<T, String>,
) -> Result<Vec<T>, String> {
    items
        .iter()
        .enumerate()
        .map(|(i, s)| parse(s.as_str(), i))
        .collect()
}

fn exit_with(message: impl std::fmt::Display) -> ! {
    eprintln!("Error: {}", message);
    std::process::exit(1);
}

fn print_json<T: Serialize>(value: &T) {
    match serde_json::to_string_pretty(value) {
        Ok(json) => println!("{}", json),
        Err(e) => exit_with(e),
    }
}

fn plural(n: usize) -> &'static str {
    if n == 1 { "" } else { "s" }
}

fn print_bars(result: &Result1D, layout: bool) {
    for (i, bar) in result.bars.iter().enumerate() {
        println!("Bar {} ({}, {}):", i + 1, bar.stock_id, bar.stock_length);
        for cut in &bar.cuts {
            println!("  {} @ {} ({})", cut.length, cut.position, cut.piece_id);
        }
        if let Some(remnant) = bar.usable_waste {
            println!("  remnant {} @ {}", remnant.length, remnant.position);
        }
        if layout {
            print!("{}", render::render_bar(bar));
        }
        println!();
    }

    for piece in &result.unplaced_pieces {
        println!("Unplaced: {} x{} ({})", piece.length, piece.quantity, piece.id);
    }

    let stats = &result.statistics;
    println!(
        "Summary: {} bar{} used, {:.1}% waste, {:.1}% efficiency",
        stats.stock_used_count,
        plural(stats.stock_used_count),
        stats.waste_percentage,
        stats.efficiency,
    );
}

fn print_sheets(result: &Result2D, layout: bool) {
    for (i, sheet) in result.sheets.iter().enumerate() {
        println!(
            "Sheet {} ({}, {}x{}):",
            i + 1,
            sheet.stock_id,
            sheet.width,
            sheet.height
        );
        for p in &sheet.placements {
            let rot = if p.rotated { " [rotated]" } else { "" };
            println!("  {}x{} @ ({}, {}){}", p.width, p.height, p.x, p.y, rot);
        }
        if layout {
            print!("{}", render::render_sheet(sheet));
        }
        println!();
    }

    for piece in &result.unplaced_pieces {
        println!(
            "Unplaced: {}x{} x{} ({})",
            piece.width, piece.height, piece.quantity, piece.id
        );
    }

    let stats = &result.statistics;
    println!(
        "Summary: {} sheet{} used, {:.1}% waste",
        stats.stock_used_count,
        plural(stats.stock_used_count),
        stats.waste_percentage,
    );
}

fn main() {
    let cli = Cli::parse();

    tracing_subscriber::fmt()
        .with_writer(std::io::stderr)
        .with_target(false)
        .with_max_level(if cli.verbose { Level::DEBUG } else { Level::INFO })
        .init();

    match cli.command {
        Command::Bars {
            stock,
            cuts,
            kerf,
            min_usable_waste,
            algorithm,
            layout,
        } => {
            let stock = parse_all(&stock, parse_bar_stock).unwrap_or_else(|e| exit_with(e));
            let pieces = parse_all(&cuts, parse_bar_cut).unwrap_or_else(|e| exit_with(e));
            let options = Options1D {
                kerf,
                min_usable_waste,
            };

            let result = optimize_1d(&pieces, &stock, &options, algorithm)
                .unwrap_or_else(|e| exit_with(e));

            if cli.json {
                print_json(&result);
            } else {
                print_bars(&result, layout);
            }
        }
        Command::Sheets {
            stock,
            cuts,
            kerf,
            no_rotate,
            respect_grain,
            algorithm,
            layout,
        } => {
            let stock = parse_all(&stock, parse_sheet_stock).unwrap_or_else(|e| exit_with(e));
            let pieces = parse_all(&cuts, |s, i| parse_sheet_cut(s, i, !no_rotate))
                .unwrap_or_else(|e| exit_with(e));
            let options = Options2D {
                kerf,
                allow_rotation: !no_rotate,
                respect_grain_direction: respect_grain,
            };

            let result = optimize_2d(&pieces, &stock, &options, algorithm)
                .unwrap_or_else(|e| exit_with(e));

            if cli.json {
                print_json(&result);
            } else {
                print_sheets(&result, layout);
            }
        }
    }
}
