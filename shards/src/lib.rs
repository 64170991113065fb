//! Geometry and highlight engine for the interactive shard pentagon.
//!
//! A pentagon is cut into five wedges (one per outline edge), and each wedge
//! into `num_levels` concentric shards. Hovering a shard lights it and every
//! shard between it and the rim; clicking locks that span; double-clicking
//! clears the wedge. Locks survive sessions through a [`store::CapStore`].
//!
//! Nothing here touches a browser. The host layer feeds pointer events into
//! [`cascade::Cascade`] and applies the returned [`cascade::Action`]s to
//! whatever it draws with ([`render::SvgDocument`] is the bundled observer).
//!
//! ## Module layout
//!
//! | Module | Role |
//! |--------|------|
//! | [`geometry`] | Outline, ring offsets and shard polygons |
//! | [`cascade`] | Fill map, per-edge caps and interaction handling |
//! | [`store`] | Persisted caps and the hash-string codec |
//! | [`render`] | SVG observer for the fill map |
//! | [`widget`] | `generate_pentagon` entry point tying the above together |
//! | [`consts`] | Colors, stroke styling and vertex-formula constants |

pub mod cascade;
pub mod consts;
pub mod geometry;
pub mod render;
pub mod store;
pub mod widget;
