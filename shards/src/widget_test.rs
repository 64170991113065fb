#![allow(clippy::float_cmp)]

use super::*;
use crate::cascade::{Fill, Interaction};
use crate::geometry::{Point, ShardId};
use crate::store::MemoryStore;

fn options(num_levels: i64) -> PentagonOptions {
    PentagonOptions::new(100.0, 100.0, "J-svg-pentagon", PageKey::parse("values").unwrap()).with_levels(num_levels)
}

#[test]
fn defaults_are_outline_only_at_unit_scale() {
    let opts = PentagonOptions::new(80.0, 60.0, "p", PageKey::parse("p").unwrap());
    assert_eq!(opts.num_levels, 0);
    assert_eq!(opts.scale_x, 1.0);
    assert_eq!(opts.scale_y, 1.0);
    let widget = generate_pentagon(&opts, &[]).unwrap();
    assert!(widget.pentagon().shards.is_empty());
}

#[test]
fn returns_outer_outline() {
    let widget = generate_pentagon(&options(3), &[]).unwrap();
    let outline = widget.outline();
    assert_eq!(outline[0], Point::new(50.0, 0.0));
    assert_eq!(outline, widget.pentagon().outline);
}

#[test]
fn scale_flows_into_geometry() {
    let widget = generate_pentagon(&options(2).with_scale(2.0, 3.0), &[]).unwrap();
    assert_eq!(widget.outline()[0], Point::new(100.0, 0.0));
    assert_eq!(widget.pentagon().center, Point::new(100.0, 150.0));
}

#[test]
fn locked_shards_are_applied_and_drawn() {
    let widget = generate_pentagon(&options(3), &[(0, 0), (2, 2)]).unwrap();
    assert_eq!(widget.cascade().cap(2), 2);
    assert_eq!(widget.document().fill(ShardId::new(2, 2)), Some(Fill::Highlight));
    assert_eq!(widget.document().fill(ShardId::new(2, 1)), Some(Fill::Normal));
}

#[test]
fn corrupt_locks_are_rejected() {
    assert!(generate_pentagon(&options(3), &[(6, 1)]).is_err());
    assert!(generate_pentagon(&options(3), &[(0, 4)]).is_err());
}

#[test]
fn locks_ignored_without_levels() {
    let widget = generate_pentagon(&options(0), &[(0, 3)]).unwrap();
    assert!(widget.cascade().highlighted().is_empty());
}

#[test]
fn negative_levels_treated_as_zero() {
    let widget = generate_pentagon(&options(-1), &[]).unwrap();
    assert_eq!(widget.pentagon().layout.num_levels, 0);
}

#[test]
fn handle_keeps_svg_in_sync() {
    let mut widget = generate_pentagon(&options(3), &[]).unwrap();
    let mut store = MemoryStore::new();
    widget.handle(ShardEvent { kind: Interaction::Enter, edge: 4, level: 3 }, &mut store).unwrap();
    assert_eq!(widget.document().fill(ShardId::new(4, 3)), Some(Fill::Highlight));
    assert!(widget.svg().contains("fill=\"#de6328\""));

    widget.handle(ShardEvent { kind: Interaction::Leave, edge: 4, level: 3 }, &mut store).unwrap();
    assert!(!widget.svg().contains("fill=\"#de6328\""));
}
