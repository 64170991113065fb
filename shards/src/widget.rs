//! `generate_pentagon`: one interactive pentagon, geometry and highlight state together.

#[cfg(test)]
#[path = "widget_test.rs"]
mod widget_test;

use tracing::debug;

use crate::cascade::{Action, Cascade, CascadeError, ShardEvent};
use crate::geometry::{Layout, Outline, Pentagon, Scale};
use crate::render::SvgDocument;
use crate::store::{CapStore, PageKey};

/// Construction parameters for [`generate_pentagon`].
#[derive(Debug, Clone, PartialEq)]
pub struct PentagonOptions {
    pub width: f64,
    pub height: f64,
    /// Id given to the rendered SVG element.
    pub target_id: String,
    /// Page key the pentagon's locks are stored under.
    pub page: PageKey,
    /// Levels per wedge. Zero or negative draws the outline only.
    pub num_levels: i64,
    pub scale_x: f64,
    pub scale_y: f64,
}

impl PentagonOptions {
    /// Options with no levels at unit scale.
    #[must_use]
    pub fn new(width: f64, height: f64, target_id: &str, page: PageKey) -> Self {
        Self { width, height, target_id: target_id.to_owned(), page, num_levels: 0, scale_x: 1.0, scale_y: 1.0 }
    }

    #[must_use]
    pub fn with_levels(mut self, num_levels: i64) -> Self {
        self.num_levels = num_levels;
        self
    }

    #[must_use]
    pub fn with_scale(mut self, scale_x: f64, scale_y: f64) -> Self {
        self.scale_x = scale_x;
        self.scale_y = scale_y;
        self
    }

    #[must_use]
    pub fn layout(&self) -> Layout {
        Layout::new(self.width, self.height, self.num_levels).with_scale(Scale::new(self.scale_x, self.scale_y))
    }
}

/// A live pentagon: computed shards, cascade state and the SVG kept in sync with it.
#[derive(Debug, Clone)]
pub struct PentagonWidget {
    pentagon: Pentagon,
    cascade: Cascade,
    document: SvgDocument,
}

/// Build a pentagon and restore `locked_shards` onto it.
///
/// Pass an empty slice when there is no prior state.
///
/// # Errors
///
/// [`CascadeError::InvalidArgument`] when a locked entry names an edge
/// outside `0..5` or a cap above the level count.
pub fn generate_pentagon(options: &PentagonOptions, locked_shards: &[(usize, u32)]) -> Result<PentagonWidget, CascadeError> {
    let pentagon = Pentagon::generate(options.layout());
    let cascade = Cascade::with_locks(pentagon.layout, options.page.clone(), locked_shards)?;
    let document = SvgDocument::with_fills(&pentagon, &cascade, &options.target_id);
    debug!(
        page = %options.page,
        levels = pentagon.layout.num_levels,
        shards = pentagon.shards.len(),
        "pentagon generated"
    );
    Ok(PentagonWidget { pentagon, cascade, document })
}

impl PentagonWidget {
    /// The outer five points, for label placement and bounds.
    #[must_use]
    pub fn outline(&self) -> Outline {
        self.pentagon.outline
    }

    #[must_use]
    pub fn pentagon(&self) -> &Pentagon {
        &self.pentagon
    }

    #[must_use]
    pub fn cascade(&self) -> &Cascade {
        &self.cascade
    }

    /// Route an interaction through the cascade and redraw what changed.
    ///
    /// # Errors
    ///
    /// [`CascadeError::InvalidArgument`] when the event names no shard.
    pub fn handle<S: CapStore + ?Sized>(&mut self, event: ShardEvent, store: &mut S) -> Result<Vec<Action>, CascadeError> {
        let actions = self.cascade.handle(event, store)?;
        self.document.apply(&actions);
        Ok(actions)
    }

    #[must_use]
    pub fn document(&self) -> &SvgDocument {
        &self.document
    }

    /// Current SVG markup.
    #[must_use]
    pub fn svg(&self) -> String {
        self.document.to_svg()
    }
}
