//! Geometry engine: the pentagon outline and its concentric shard polygons.
//!
//! The outline is not a regular pentagon. Its five vertices come from a fixed
//! set of expressions over the nominal width and height, optionally pulled
//! inward by an (x, y) offset, and then stretched by independent x/y scale
//! factors. Rings are produced by evaluating the same expressions at
//! increasing offsets, and every shard is the band between two consecutive
//! rings along one outline edge.
//!
//! Two indices describe a band:
//!
//! - the **ring** `i` is the construction order. Ring 1 starts at the outline
//!   itself, ring `n` is nearest the center.
//! - the **level** is the shard identity used by the cascade. Level `n` is
//!   the outermost band and level 1 the innermost: `level = n + 1 - ring`.
//!
//! The last two rings do not compute an inner pentagon; they collapse to a
//! triangle fan meeting at the center point.

#[cfg(test)]
#[path = "geometry_test.rs"]
mod geometry_test;

use serde::{Deserialize, Serialize};

use crate::consts::{DASH_PATTERN, DASHED_STROKE_WIDTH, EDGE_COUNT, MAX_LEVELS, SHOULDER_DIVISOR, SOLID_STROKE_WIDTH};

/// A point in drawing-surface coordinates.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Point {
    pub x: f64,
    pub y: f64,
}

impl Point {
    #[must_use]
    pub fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }
}

/// Five points clockwise from the apex. Index 0 is the apex.
pub type Outline = [Point; EDGE_COUNT];

/// Independent x/y stretch applied after the vertex formula.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Scale {
    pub x: f64,
    pub y: f64,
}

impl Scale {
    pub const IDENTITY: Self = Self { x: 1.0, y: 1.0 };

    #[must_use]
    pub fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }

    fn apply(self, point: Point) -> Point {
        Point { x: point.x * self.x, y: point.y * self.y }
    }
}

impl Default for Scale {
    fn default() -> Self {
        Self::IDENTITY
    }
}

/// Everything the engine and the cascade need to know about one pentagon.
///
/// Passed explicitly to each operation instead of being captured.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Layout {
    /// Nominal width before scaling.
    pub width: f64,
    /// Nominal height before scaling.
    pub height: f64,
    /// Number of concentric levels; zero means outline only.
    pub num_levels: u32,
    pub scale: Scale,
}

impl Layout {
    /// Build a layout at unit scale.
    ///
    /// The level count is clamped to `0..=MAX_LEVELS`: negative means none,
    /// anything above [`MAX_LEVELS`] is cut down to it.
    #[must_use]
    pub fn new(width: f64, height: f64, num_levels: i64) -> Self {
        let num_levels = u32::try_from(num_levels.clamp(0, i64::from(MAX_LEVELS))).unwrap_or(MAX_LEVELS);
        Self { width, height, num_levels, scale: Scale::IDENTITY }
    }

    #[must_use]
    pub fn with_scale(mut self, scale: Scale) -> Self {
        self.scale = scale;
        self
    }

    /// Whether `level` names an existing band.
    #[must_use]
    pub fn contains_level(&self, level: u32) -> bool {
        (1..=self.num_levels).contains(&level)
    }

    /// Construction ring for an identity level. Caller ensures `level` is in range.
    #[must_use]
    pub fn ring_of(&self, level: u32) -> u32 {
        self.num_levels + 1 - level
    }

    /// Identity level for a construction ring. Caller ensures `ring` is in range.
    #[must_use]
    pub fn level_of(&self, ring: u32) -> u32 {
        self.num_levels + 1 - ring
    }

    /// Position of `id` in paint order, if the shard exists.
    #[must_use]
    pub fn shard_index(&self, id: ShardId) -> Option<usize> {
        if id.edge >= EDGE_COUNT || !self.contains_level(id.level) {
            return None;
        }
        let ring = self.ring_of(id.level) as usize;
        Some((ring - 1) * EDGE_COUNT + id.edge)
    }
}

/// Identity of one shard: which outline edge it hangs off and which level.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct ShardId {
    /// Outline edge `edge -> edge + 1 (mod 5)`, in `0..5`.
    pub edge: usize,
    /// Level in `1..=num_levels`; `num_levels` is the rim.
    pub level: u32,
}

impl ShardId {
    #[must_use]
    pub fn new(edge: usize, level: u32) -> Self {
        Self { edge, level }
    }
}

/// Stroke styling for a ring.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Stroke {
    pub width: u32,
    pub dashed: bool,
}

impl Stroke {
    /// Rings alternate: solid and thin when `ring + 1` is even, dashed and thick otherwise.
    #[must_use]
    pub fn for_ring(ring: u32) -> Self {
        if (ring + 1) % 2 == 0 {
            Self { width: SOLID_STROKE_WIDTH, dashed: false }
        } else {
            Self { width: DASHED_STROKE_WIDTH, dashed: true }
        }
    }

    /// Value for the SVG `stroke-dasharray` attribute.
    #[must_use]
    pub fn dasharray(&self) -> &'static str {
        if self.dashed { DASH_PATTERN } else { "0" }
    }
}

/// One polygon of the subdivision.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Shard {
    pub id: ShardId,
    /// Construction ring this shard was built in.
    pub ring: u32,
    /// Outer edge first (`a`, `b`), then either the center or the inner edge (`b`, `a`).
    pub polygon: Vec<Point>,
    pub stroke: Stroke,
}

impl Shard {
    #[must_use]
    pub fn is_triangle(&self) -> bool {
        self.polygon.len() == 3
    }
}

/// Size of the drawing surface needed to hold the outline.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Frame {
    pub width: f64,
    pub height: f64,
}

/// A fully computed pentagon: outline, center, frame bounds and shards.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Pentagon {
    pub layout: Layout,
    pub outline: Outline,
    pub center: Point,
    pub frame: Frame,
    /// Shards in paint order: ring 1 first, edges 0..5 within a ring.
    pub shards: Vec<Shard>,
}

impl Pentagon {
    /// Compute the outline and every shard for `layout`.
    #[must_use]
    pub fn generate(layout: Layout) -> Self {
        let outline = generate_outline(layout.width, layout.height, layout.scale);
        let center = center(layout.width, layout.height, layout.scale);
        let frame = Frame { width: outline[1].x, height: outline[2].y };
        let shards = generate_shards(&layout, center);
        Self { layout, outline, center, frame, shards }
    }

    /// Look up a shard by identity.
    #[must_use]
    pub fn shard(&self, id: ShardId) -> Option<&Shard> {
        self.layout.shard_index(id).and_then(|index| self.shards.get(index))
    }
}

/// Vertices of the pentagon pulled inward by `(offset_x, offset_y)`, then scaled.
#[must_use]
pub fn generate_level_points(width: f64, height: f64, offset_x: f64, offset_y: f64, scale: Scale) -> Outline {
    let shoulder_y = (height + offset_y / 2.0) / SHOULDER_DIVISOR;
    [
        Point::new(width / 2.0, offset_y),
        Point::new(width - offset_x, shoulder_y),
        Point::new((3.0 * width) / 4.0 - offset_x / 2.0, height - offset_y),
        Point::new(width / 4.0 + offset_x / 2.0, height - offset_y),
        Point::new(offset_x, shoulder_y),
    ]
    .map(|p| scale.apply(p))
}

/// The outer boundary: level points with no offset.
#[must_use]
pub fn generate_outline(width: f64, height: f64, scale: Scale) -> Outline {
    generate_level_points(width, height, 0.0, 0.0, scale)
}

/// Shared apex of every triangle shard.
#[must_use]
pub fn center(width: f64, height: f64, scale: Scale) -> Point {
    Point::new((width * scale.x) / 2.0, (height * scale.y) / 2.0)
}

/// Inward offset of the ring boundary after `step` of `num_levels` steps.
///
/// Floored to whole units. `num_levels` must be non-zero.
#[must_use]
pub fn ring_offsets(step: u32, num_levels: u32, width: f64, height: f64) -> (f64, f64) {
    let fraction = f64::from(step) / f64::from(num_levels);
    ((fraction * (width / 2.0)).floor(), (fraction * (height / 2.0)).floor())
}

fn generate_shards(layout: &Layout, center: Point) -> Vec<Shard> {
    let n = layout.num_levels;
    let mut shards = Vec::with_capacity(n as usize * EDGE_COUNT);

    for ring in 1..=n {
        let (prev_x, prev_y) = ring_offsets(ring - 1, n, layout.width, layout.height);
        let (curr_x, curr_y) = ring_offsets(ring, n, layout.width, layout.height);
        let prev = generate_level_points(layout.width, layout.height, prev_x, prev_y, layout.scale);
        let curr = generate_level_points(layout.width, layout.height, curr_x, curr_y, layout.scale);

        // Last two rings fan into the center.
        let triangle = ring + 1 >= n;
        let stroke = Stroke::for_ring(ring);
        let level = layout.level_of(ring);

        for edge in 0..EDGE_COUNT {
            let a = edge;
            let b = (edge + 1) % EDGE_COUNT;
            let polygon = if triangle { vec![prev[a], prev[b], center] } else { vec![prev[a], prev[b], curr[b], curr[a]] };
            shards.push(Shard { id: ShardId::new(edge, level), ring, polygon, stroke });
        }
    }

    shards
}
