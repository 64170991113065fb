//! Cascade controller: shard fills, per-edge caps and pointer interaction.
//!
//! Every wedge (outline edge) is a column of levels, `1` at the center and
//! `num_levels` at the rim. Hovering a shard lights it and everything further
//! out on the same edge. Leaving reverts what the hover lit, except the levels
//! at or above the edge's cap, which a click locked. Double-click clears the
//! edge and its cap.
//!
//! DESIGN
//! ======
//! The controller owns an identity-keyed fill map instead of touching drawn
//! elements. Each [`Cascade::handle`] call returns the [`Action`]s it caused,
//! so renderers observe changes rather than being driven directly. Caps are
//! written through to a [`CapStore`] on click and double-click, and read back
//! from it on leave before any fill is reverted.

#[cfg(test)]
#[path = "cascade_test.rs"]
mod cascade_test;

use std::collections::BTreeMap;
use std::ops::RangeInclusive;

use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::consts::{EDGE_COUNT, HIGHLIGHT_COLOR, HIGHLIGHT_SUB_COLOR, NORMAL_COLOR};
use crate::geometry::{Layout, ShardId};
use crate::store::{CapStore, Caps, PageKey};

/// Display fill of a shard.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Fill {
    /// Unlit.
    #[default]
    Normal,
    /// Hovered or locked.
    Highlight,
    /// Darker second highlight tone. Reserved; never produced by interaction.
    HighlightSub,
}

impl Fill {
    /// CSS color for this fill.
    #[must_use]
    pub fn color(self) -> &'static str {
        match self {
            Self::Normal => NORMAL_COLOR,
            Self::Highlight => HIGHLIGHT_COLOR,
            Self::HighlightSub => HIGHLIGHT_SUB_COLOR,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, thiserror::Error)]
pub enum CascadeError {
    /// Edge outside `0..5`, or a level/cap outside the layout's range.
    #[error("invalid shard argument: edge {edge}, level {level}")]
    InvalidArgument { edge: usize, level: u32 },
}

/// Pointer interaction on a shard.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Interaction {
    Enter,
    Leave,
    Click,
    DoubleClick,
}

/// An interaction routed back from the rendering layer.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ShardEvent {
    pub kind: Interaction,
    pub edge: usize,
    pub level: u32,
}

/// Changes produced by an interaction, for render observers to apply.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum Action {
    FillChanged { shard: ShardId, fill: Fill },
    CapChanged { edge: usize, cap: u32 },
}

/// Highlight state for one pentagon session.
#[derive(Debug, Clone)]
pub struct Cascade {
    layout: Layout,
    page: PageKey,
    fills: BTreeMap<ShardId, Fill>,
    caps: Caps,
}

impl Cascade {
    /// A session with every shard unlit and no caps.
    #[must_use]
    pub fn new(layout: Layout, page: PageKey) -> Self {
        let fills = (0..EDGE_COUNT)
            .flat_map(|edge| (1..=layout.num_levels).map(move |level| (ShardId::new(edge, level), Fill::Normal)))
            .collect();
        Self { layout, page, fills, caps: Caps::default() }
    }

    /// A session restored from `(edge, cap)` pairs.
    ///
    /// # Errors
    ///
    /// See [`Cascade::apply_persisted`].
    pub fn with_locks(layout: Layout, page: PageKey, locked_shards: &[(usize, u32)]) -> Result<Self, CascadeError> {
        let mut cascade = Self::new(layout, page);
        cascade.apply_persisted(locked_shards)?;
        Ok(cascade)
    }

    /// A session restored from whatever `store` holds for `page`.
    ///
    /// # Errors
    ///
    /// See [`Cascade::apply_persisted`].
    pub fn from_store<S: CapStore + ?Sized>(layout: Layout, page: PageKey, store: &S) -> Result<Self, CascadeError> {
        let locked = store.locked_shards(&page);
        Self::with_locks(layout, page, &locked)
    }

    // --- Queries ---

    #[must_use]
    pub fn layout(&self) -> &Layout {
        &self.layout
    }

    #[must_use]
    pub fn page(&self) -> &PageKey {
        &self.page
    }

    /// Current fill of a shard, `None` if it does not exist.
    #[must_use]
    pub fn fill(&self, shard: ShardId) -> Option<Fill> {
        self.fills.get(&shard).copied()
    }

    /// Every shard's fill, ordered by edge then level.
    pub fn fills(&self) -> impl Iterator<Item = (ShardId, Fill)> + '_ {
        self.fills.iter().map(|(id, fill)| (*id, *fill))
    }

    /// Shards that are currently lit.
    #[must_use]
    pub fn highlighted(&self) -> Vec<ShardId> {
        self.fills().filter(|(_, fill)| *fill != Fill::Normal).map(|(id, _)| id).collect()
    }

    /// No locks and nothing lit: the session holds nothing the store does not.
    #[must_use]
    pub fn is_idle(&self) -> bool {
        self.caps.iter().all(|&cap| cap == 0) && self.fills.values().all(|&fill| fill == Fill::Normal)
    }

    /// Cap for `edge`; 0 when unlocked or unknown.
    #[must_use]
    pub fn cap(&self, edge: usize) -> u32 {
        self.caps.get(edge).copied().unwrap_or(0)
    }

    #[must_use]
    pub fn caps(&self) -> Caps {
        self.caps
    }

    // --- Operations ---

    /// Light `level` and every level above it on `edge`.
    ///
    /// # Errors
    ///
    /// [`CascadeError::InvalidArgument`] when the shard does not exist.
    pub fn highlight_from(&mut self, edge: usize, level: u32) -> Result<(), CascadeError> {
        self.check_shard(edge, level)?;
        self.paint(edge, level..=self.layout.num_levels, Fill::Highlight);
        Ok(())
    }

    /// Revert hover lighting on `edge`, keeping levels at or above `cap`.
    ///
    /// A zero cap reverts the whole edge.
    ///
    /// # Errors
    ///
    /// [`CascadeError::InvalidArgument`] when `edge` is out of range.
    pub fn restore_to(&mut self, edge: usize, cap: u32) -> Result<(), CascadeError> {
        check_edge(edge, cap)?;
        let n = self.layout.num_levels;
        if cap == 0 {
            self.paint(edge, 1..=n, Fill::Normal);
        } else {
            // Caps past the rim still only touch existing levels.
            let top = cap.min(n + 1) - 1;
            self.paint(edge, 1..=top, Fill::Normal);
        }
        Ok(())
    }

    /// Lock `edge` at `level`: record it as the cap and persist it. Fills are untouched.
    ///
    /// # Errors
    ///
    /// [`CascadeError::InvalidArgument`] when the shard does not exist.
    pub fn lock<S: CapStore + ?Sized>(&mut self, edge: usize, level: u32, store: &mut S) -> Result<(), CascadeError> {
        self.check_shard(edge, level)?;
        self.caps[edge] = level;
        store.set(&self.page, edge, level);
        debug!(page = %self.page, edge, level, "edge locked");
        Ok(())
    }

    /// Clear `edge`: unlight every level and reset its cap to zero, here and in `store`.
    ///
    /// # Errors
    ///
    /// [`CascadeError::InvalidArgument`] when `edge` is out of range.
    pub fn unlock<S: CapStore + ?Sized>(&mut self, edge: usize, store: &mut S) -> Result<(), CascadeError> {
        check_edge(edge, 0)?;
        self.paint(edge, 1..=self.layout.num_levels, Fill::Normal);
        self.caps[edge] = 0;
        store.set(&self.page, edge, 0);
        debug!(page = %self.page, edge, "edge unlocked");
        Ok(())
    }

    /// Restore previously locked edges without any interaction.
    ///
    /// Every entry is validated before anything changes. With zero levels
    /// there is nothing to color and the entries are ignored.
    ///
    /// # Errors
    ///
    /// [`CascadeError::InvalidArgument`] when an edge is outside `0..5` or a
    /// cap is above the level count; such entries mean corrupted state.
    pub fn apply_persisted(&mut self, locked_shards: &[(usize, u32)]) -> Result<(), CascadeError> {
        if self.layout.num_levels == 0 {
            if !locked_shards.is_empty() {
                debug!(page = %self.page, count = locked_shards.len(), "no levels; ignoring persisted locks");
            }
            return Ok(());
        }

        for &(edge, cap) in locked_shards {
            if edge >= EDGE_COUNT || cap > self.layout.num_levels {
                return Err(CascadeError::InvalidArgument { edge, level: cap });
            }
        }

        for &(edge, cap) in locked_shards {
            if cap != 0 {
                self.paint(edge, cap..=self.layout.num_levels, Fill::Highlight);
                self.caps[edge] = cap;
            }
        }
        Ok(())
    }

    /// Route one pointer interaction and report what changed.
    ///
    /// # Errors
    ///
    /// [`CascadeError::InvalidArgument`] when the event names no shard; nothing changes.
    pub fn handle<S: CapStore + ?Sized>(&mut self, event: ShardEvent, store: &mut S) -> Result<Vec<Action>, CascadeError> {
        let ShardEvent { kind, edge, level } = event;
        self.check_shard(edge, level)?;

        let before_fills = self.fills.clone();
        let before_caps = self.caps;

        match kind {
            Interaction::Enter => self.highlight_from(edge, level)?,
            Interaction::Leave => {
                let cap = store.get(&self.page, edge);
                self.caps[edge] = cap;
                self.restore_to(edge, cap)?;
            }
            Interaction::Click => self.lock(edge, level, store)?,
            Interaction::DoubleClick => self.unlock(edge, store)?,
        }

        let mut actions: Vec<Action> = self
            .fills
            .iter()
            .filter(|&(id, fill)| before_fills.get(id) != Some(fill))
            .map(|(id, fill)| Action::FillChanged { shard: *id, fill: *fill })
            .collect();
        actions.extend(
            (0..EDGE_COUNT)
                .filter(|&e| before_caps[e] != self.caps[e])
                .map(|e| Action::CapChanged { edge: e, cap: self.caps[e] }),
        );
        Ok(actions)
    }

    // --- Internals ---

    fn check_shard(&self, edge: usize, level: u32) -> Result<(), CascadeError> {
        if edge < EDGE_COUNT && self.layout.contains_level(level) {
            Ok(())
        } else {
            Err(CascadeError::InvalidArgument { edge, level })
        }
    }

    fn paint(&mut self, edge: usize, levels: RangeInclusive<u32>, fill: Fill) {
        for level in levels {
            if let Some(slot) = self.fills.get_mut(&ShardId::new(edge, level)) {
                *slot = fill;
            }
        }
    }
}

fn check_edge(edge: usize, level: u32) -> Result<(), CascadeError> {
    if edge < EDGE_COUNT { Ok(()) } else { Err(CascadeError::InvalidArgument { edge, level }) }
}
