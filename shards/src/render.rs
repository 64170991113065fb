//! SVG observer: draws a pentagon and keeps shard fills in sync with a cascade.
//!
//! The document is built once from geometry, then updated by feeding it the
//! [`Action`]s returned from [`crate::cascade::Cascade::handle`]. Rendering
//! never reaches back into the cascade.

#[cfg(test)]
#[path = "render_test.rs"]
mod render_test;

use std::fmt;

use crate::cascade::{Action, Cascade, Fill};
use crate::consts::STROKE_COLOR;
use crate::geometry::{Frame, Layout, Outline, Pentagon, Point, Shard, ShardId};

/// Format points as an SVG `points` attribute: `x,y` pairs separated by spaces.
#[must_use]
pub fn points_to_string(points: &[Point]) -> String {
    points.iter().map(|p| format!("{},{}", p.x, p.y)).collect::<Vec<_>>().join(" ")
}

#[derive(Debug, Clone)]
struct DrawnShard {
    shard: Shard,
    fill: Fill,
}

/// A drawable SVG rendition of one pentagon.
#[derive(Debug, Clone)]
pub struct SvgDocument {
    target_id: String,
    layout: Layout,
    frame: Frame,
    outline: Outline,
    shards: Vec<DrawnShard>,
}

impl SvgDocument {
    /// Snapshot `pentagon` with every shard unlit.
    #[must_use]
    pub fn new(pentagon: &Pentagon, target_id: &str) -> Self {
        let shards = pentagon.shards.iter().map(|shard| DrawnShard { shard: shard.clone(), fill: Fill::Normal }).collect();
        Self { target_id: target_id.to_owned(), layout: pentagon.layout, frame: pentagon.frame, outline: pentagon.outline, shards }
    }

    /// Snapshot `pentagon` with the fills `cascade` currently holds.
    #[must_use]
    pub fn with_fills(pentagon: &Pentagon, cascade: &Cascade, target_id: &str) -> Self {
        let mut doc = Self::new(pentagon, target_id);
        for drawn in &mut doc.shards {
            drawn.fill = cascade.fill(drawn.shard.id).unwrap_or_default();
        }
        doc
    }

    /// Apply fill changes. Cap changes carry nothing to draw.
    pub fn apply(&mut self, actions: &[Action]) {
        for action in actions {
            if let Action::FillChanged { shard, fill } = *action {
                if let Some(drawn) = self.layout.shard_index(shard).and_then(|i| self.shards.get_mut(i)) {
                    drawn.fill = fill;
                }
            }
        }
    }

    /// Fill currently drawn for a shard.
    #[must_use]
    pub fn fill(&self, id: ShardId) -> Option<Fill> {
        self.layout.shard_index(id).and_then(|i| self.shards.get(i)).map(|d| d.fill)
    }

    #[must_use]
    pub fn frame(&self) -> Frame {
        self.frame
    }

    /// Full SVG markup.
    #[must_use]
    pub fn to_svg(&self) -> String {
        self.to_string()
    }
}

impl fmt::Display for SvgDocument {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(
            f,
            r#"<svg id="{}" xmlns="http://www.w3.org/2000/svg" width="{}" height="{}">"#,
            escape_attr(&self.target_id),
            self.frame.width,
            self.frame.height
        )?;
        writeln!(
            f,
            r#"  <polygon class="pentagon" points="{}" fill="none" stroke="{STROKE_COLOR}"/>"#,
            points_to_string(&self.outline)
        )?;
        for DrawnShard { shard, fill } in &self.shards {
            writeln!(
                f,
                r#"  <polygon class="shard shard-{edge}{ring}" data-edge="{edge}" data-level="{level}" fill="{color}" stroke="{STROKE_COLOR}" stroke-dasharray="{dash}" stroke-width="{width}" points="{points}"/>"#,
                edge = shard.id.edge,
                ring = shard.ring,
                level = shard.id.level,
                color = fill.color(),
                dash = shard.stroke.dasharray(),
                width = shard.stroke.width,
                points = points_to_string(&shard.polygon),
            )?;
        }
        write!(f, "</svg>")
    }
}

fn escape_attr(raw: &str) -> String {
    let mut out = String::with_capacity(raw.len());
    for c in raw.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '"' => out.push_str("&quot;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            _ => out.push(c),
        }
    }
    out
}
