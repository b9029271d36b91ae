use serde::{Deserialize, Deserializer, Serialize};

/// Material grain constraint on a 2D piece.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum GrainDirection {
    Horizontal,
    Vertical,
    #[default]
    None,
}

impl GrainDirection {
    /// True for grains that pin the piece to its given orientation.
    pub fn is_directional(&self) -> bool {
        matches!(self, GrainDirection::Horizontal | GrainDirection::Vertical)
    }
}

/// A required 1D piece (bar length) with its demanded quantity.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Piece1D {
    pub id: String,
    pub length: f64,
    #[serde(deserialize_with = "deserialize_count")]
    pub quantity: u32,
    #[serde(default)]
    pub order_item_id: String,
}

/// A required 2D rectangular piece with its demanded quantity.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Piece2D {
    pub id: String,
    pub width: f64,
    pub height: f64,
    #[serde(deserialize_with = "deserialize_count")]
    pub quantity: u32,
    #[serde(default)]
    pub order_item_id: String,
    #[serde(default = "default_true")]
    pub can_rotate: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub grain_direction: Option<GrainDirection>,
}

/// Bar stock available for 1D cutting.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Stock1D {
    pub id: String,
    pub length: f64,
    #[serde(deserialize_with = "deserialize_count")]
    pub available: u32,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub unit_price: Option<f64>,
}

/// Sheet stock available for 2D cutting.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Stock2D {
    pub id: String,
    pub width: f64,
    pub height: f64,
    #[serde(deserialize_with = "deserialize_count")]
    pub available: u32,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub unit_price: Option<f64>,
}

#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct Options1D {
    pub kerf: f64,
    /// Leftover bar length at or above this threshold is reported as a reusable remnant.
    pub min_usable_waste: f64,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct Options2D {
    pub kerf: f64,
    pub allow_rotation: bool,
    pub respect_grain_direction: bool,
}

impl Default for Options2D {
    fn default() -> Self {
        Self {
            kerf: 0.0,
            allow_rotation: true,
            respect_grain_direction: false,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum Algorithm1D {
    /// First-Fit-Decreasing.
    #[default]
    #[serde(rename = "FFD")]
    Ffd,
    /// Best-Fit-Decreasing.
    #[serde(rename = "BFD")]
    Bfd,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum Algorithm2D {
    #[default]
    #[serde(rename = "BOTTOM_LEFT")]
    BottomLeft,
    #[serde(rename = "GUILLOTINE")]
    Guillotine,
    #[serde(rename = "MAXRECTS")]
    MaxRects,
}

impl std::fmt::Display for Algorithm1D {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Algorithm1D::Ffd => write!(f, "FFD"),
            Algorithm1D::Bfd => write!(f, "BFD"),
        }
    }
}

impl std::fmt::Display for Algorithm2D {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Algorithm2D::BottomLeft => write!(f, "BOTTOM_LEFT"),
            Algorithm2D::Guillotine => write!(f, "GUILLOTINE"),
            Algorithm2D::MaxRects => write!(f, "MAXRECTS"),
        }
    }
}

/// One cut on a bar, measured from the bar's start.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Cut {
    pub piece_id: String,
    pub order_item_id: String,
    pub position: f64,
    pub length: f64,
}

/// One piece placed on a sheet. `width`/`height` are the placed (possibly rotated) extents.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Placement {
    pub piece_id: String,
    pub order_item_id: String,
    pub x: f64,
    pub y: f64,
    pub width: f64,
    pub height: f64,
    pub rotated: bool,
}

impl Placement {
    pub fn area(&self) -> f64 {
        self.width * self.height
    }
}

/// Leftover bar material long enough to be kept for later jobs.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UsableWaste {
    pub position: f64,
    pub length: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BarResult {
    pub stock_id: String,
    pub stock_length: f64,
    pub cuts: Vec<Cut>,
    pub remaining_length: f64,
    pub waste: f64,
    pub waste_percentage: f64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub usable_waste: Option<UsableWaste>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SheetResult {
    pub stock_id: String,
    pub width: f64,
    pub height: f64,
    pub placements: Vec<Placement>,
    pub used_area: f64,
    pub waste_area: f64,
    pub waste_percentage: f64,
}

/// How many units of one stock entry a run consumed.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StockUsage {
    pub stock_id: String,
    pub used: u32,
}

/// Aggregate figures over every bar or sheet of a run.
///
/// Capacities are lengths for 1D runs and areas for 2D runs.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Statistics {
    pub total_pieces_placed: usize,
    pub stock_used_count: usize,
    pub total_stock_capacity: f64,
    pub total_used_capacity: f64,
    pub total_waste: f64,
    pub efficiency: f64,
    pub waste_percentage: f64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub total_cost: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub total_usable_waste: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub total_kerf_loss: Option<f64>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Result1D {
    pub success: bool,
    pub algorithm: Algorithm1D,
    pub bars: Vec<BarResult>,
    pub statistics: Statistics,
    pub stock_usage: Vec<StockUsage>,
    pub unplaced_pieces: Vec<Piece1D>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Result2D {
    pub success: bool,
    pub algorithm: Algorithm2D,
    pub sheets: Vec<SheetResult>,
    pub statistics: Statistics,
    pub stock_usage: Vec<StockUsage>,
    pub unplaced_pieces: Vec<Piece2D>,
}

fn default_true() -> bool {
    true
}

/// Accepts any JSON number holding a non-negative integer, so `3` and `3.0` both work.
pub fn deserialize_count<'de, D>(deserializer: D) -> Result<u32, D::Error>
where
    D: Deserializer<'de>,
{
    let value = f64::deserialize(deserializer)?;
    if !value.is_finite() || value < 0.0 || value.fract() != 0.0 || value > u32::MAX as f64 {
        return Err(serde::de::Error::custom(format!(
            "expected a non-negative whole number, got {value}"
        )));
    }
    Ok(value as u32)
}
