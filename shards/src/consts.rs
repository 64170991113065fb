//! Shared constants for the shards crate.

// ── Geometry ────────────────────────────────────────────────────

/// Number of outline vertices (and therefore wedges).
pub const EDGE_COUNT: usize = 5;

/// Divisor placing the upper side vertices below the apex.
pub const SHOULDER_DIVISOR: f64 = 2.5;

/// Most levels a layout holds. Floored ring offsets stop moving long before this.
pub const MAX_LEVELS: u32 = 64;

// ── Colors ──────────────────────────────────────────────────────

/// Fill for a shard that is neither hovered nor locked.
pub const NORMAL_COLOR: &str = "#009b90";

/// Fill for a hovered or locked shard.
pub const HIGHLIGHT_COLOR: &str = "#de6328";

/// Darker highlight tone. Reserved; no interaction produces it.
pub const HIGHLIGHT_SUB_COLOR: &str = "#ad5529";

/// Stroke color for the outline and every shard.
pub const STROKE_COLOR: &str = "#717073";

// ── Stroke styling ──────────────────────────────────────────────

/// Stroke width for rings drawn solid.
pub const SOLID_STROKE_WIDTH: u32 = 1;

/// Stroke width for rings drawn dashed.
pub const DASHED_STROKE_WIDTH: u32 = 2;

/// SVG `stroke-dasharray` for dashed rings.
pub const DASH_PATTERN: &str = "4 4";
