//! Tile picking with occlusion by tall sprites.
//!
//! A tile drawn with a positive offset covers part of the tiles behind it
//! (smaller column and row), so the flat inverse projection alone picks the
//! wrong tile. [`HitTester`] starts from the flat candidate and walks down
//! the screen diagonal, keeping the last tile whose silhouette covers the
//! point.

use crate::geom::{GridPoint, GridRange, Vec2};
use crate::renderer::{Renderer, sprite_offset};

/// Resolves screen points to tiles for one grid.
#[derive(Copy, Clone, Debug)]
pub struct HitTester<'a> {
    renderer: &'a Renderer,
    bounds: GridRange,
}

impl<'a> HitTester<'a> {
    pub fn new(renderer: &'a Renderer, bounds: GridRange) -> Self {
        Self { renderer, bounds }
    }

    /// The tile the point is visually over, if any.
    ///
    /// `offset_of` gives the sprite height of an in-bounds tile; it is never
    /// called with a position outside the bounds. Negative or non-finite
    /// offsets count as zero. When every offset is zero the result is the
    /// flat lookup.
    pub fn pick<F>(&self, point: Vec2, offset_of: F) -> Option<GridPoint>
    where
        F: Fn(GridPoint) -> f64,
    {
        if !point.is_finite() || self.bounds.is_empty() {
            return None;
        }
        let anchor = self.renderer.screen_to_tile(point);
        let mut hit = anchor;

        let (first, last) = self.search_depths(anchor);
        for depth in first..=last {
            for (dc, dr) in [(depth, depth - 1), (depth - 1, depth), (depth, depth)] {
                let Some(candidate) = shifted(anchor, dc, dr) else {
                    continue;
                };
                if !self.bounds.contains(candidate) {
                    continue;
                }
                let offset = sprite_offset(offset_of(candidate));
                if self.covers(candidate, offset, point) {
                    hit = candidate;
                }
            }
        }

        log::trace!("pick {point}: anchor {anchor}, hit {hit}");
        self.bounds.contains(hit).then_some(hit)
    }

    /// Depth range worth probing from `anchor`. Depth `i` reaches cells
    /// `(column + i, row + i)` and their two back neighbours, so nothing past
    /// `min(rows - row, columns - column)` can be in bounds, and depths
    /// before the grid's top corner are skipped.
    fn search_depths(&self, anchor: GridPoint) -> (i64, i64) {
        let (c, r) = (i64::from(anchor.column), i64::from(anchor.row));
        let min = self.bounds.min;
        let max = self.bounds.max;
        let last = (i64::from(max.row) - r).min(i64::from(max.column) - c);
        let first = (i64::from(min.column) - c)
            .max(i64::from(min.row) - r)
            .max(0);
        (first, last)
    }

    /// Whether the sprite of `tile`, raised by `offset`, covers `point`.
    fn covers(&self, tile: GridPoint, offset: f64, point: Vec2) -> bool {
        let lowered = self
            .renderer
            .screen_to_tile(Vec2::new(point.x, point.y + offset));
        if lowered == tile {
            return true;
        }
        // Between the raised diamond and the flat one: check the swept shape.
        offset > 0.0
            && lowered.at_or_after(tile)
            && self.renderer.silhouette_contains(tile, offset, point)
    }
}

/// `anchor` shifted by (dc, dr), if it still fits in `i32`. Anchors of far
/// away points are saturated, so the shift is done in `i64`.
fn shifted(anchor: GridPoint, dc: i64, dr: i64) -> Option<GridPoint> {
    let column = i32::try_from(i64::from(anchor.column) + dc).ok()?;
    let row = i32::try_from(i64::from(anchor.row) + dr).ok()?;
    Some(GridPoint::new(column, row))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::projection::ProjectionParams;

    fn renderer() -> Renderer {
        Renderer::new(
            ProjectionParams::new(100.0, 50.0)
                .unwrap()
                .with_origin(600.0, 0.0)
                .unwrap(),
        )
    }

    fn bounds() -> GridRange {
        GridRange::with_size(12, 12)
    }

    fn flat(_: GridPoint) -> f64 {
        0.0
    }

    fn only(tile: GridPoint, offset: f64) -> impl Fn(GridPoint) -> f64 {
        move |p| if p == tile { offset } else { 0.0 }
    }

    #[test]
    fn anchor_of_first_tile_resolves_to_it() {
        let r = renderer();
        let ht = HitTester::new(&r, bounds());
        let p = r.tile_to_screen(GridPoint::new(0, 0));
        assert_eq!(ht.pick(p, flat), Some(GridPoint::new(0, 0)));
    }

    #[test]
    fn tall_tile_wins_over_the_tile_behind_it() {
        let r = renderer();
        let ht = HitTester::new(&r, bounds());
        // Just above the top vertex of (5, 5): flat footprint of (4, 4).
        let p = Vec2::new(600.0, 240.0);
        assert_eq!(r.screen_to_tile(p), GridPoint::new(4, 4));
        assert_eq!(
            ht.pick(p, only(GridPoint::new(5, 5), 30.0)),
            Some(GridPoint::new(5, 5))
        );
    }

    #[test]
    fn short_sprite_does_not_reach() {
        let r = renderer();
        let ht = HitTester::new(&r, bounds());
        let p = Vec2::new(600.0, 240.0);
        assert_eq!(
            ht.pick(p, only(GridPoint::new(5, 5), 5.0)),
            Some(GridPoint::new(4, 4))
        );
    }

    #[test]
    fn deeper_tile_overrides_shallower_match() {
        let r = renderer();
        let ht = HitTester::new(&r, bounds());
        let p = Vec2::new(600.0, 240.0);
        let offsets = |t: GridPoint| match (t.column, t.row) {
            (5, 5) => 30.0,
            (6, 6) => 80.0,
            _ => 0.0,
        };
        assert_eq!(ht.pick(p, offsets), Some(GridPoint::new(6, 6)));
    }

    #[test]
    fn swept_silhouette_is_hit_outside_the_raised_diamond() {
        let r = renderer();
        let ht = HitTester::new(&r, bounds());
        // Right of the top vertex of (5, 5), inside (5, 4)'s footprint.
        let p = Vec2::new(640.0, 250.0);
        assert_eq!(r.screen_to_tile(p), GridPoint::new(5, 4));
        assert_eq!(
            ht.pick(p, only(GridPoint::new(5, 5), 30.0)),
            Some(GridPoint::new(5, 5))
        );
    }

    #[test]
    fn tall_corner_tile_is_hit_above_the_grid() {
        let r = renderer();
        let ht = HitTester::new(&r, bounds());
        let p = Vec2::new(600.0, -10.0);
        assert_eq!(ht.pick(p, flat), None);
        assert_eq!(
            ht.pick(p, only(GridPoint::new(0, 0), 20.0)),
            Some(GridPoint::new(0, 0))
        );
    }

    #[test]
    fn neighbour_on_the_last_row_is_probed() {
        let r = renderer();
        let ht = HitTester::new(&r, bounds());
        // Inside (3, 11), under the raised sprite of (4, 11).
        let p = Vec2::new(240.0, 370.0);
        assert_eq!(r.screen_to_tile(p), GridPoint::new(3, 11));
        assert_eq!(
            ht.pick(p, only(GridPoint::new(4, 11), 40.0)),
            Some(GridPoint::new(4, 11))
        );
    }

    #[test]
    fn far_outside_points_miss() {
        let r = renderer();
        let ht = HitTester::new(&r, bounds());
        let tall = |_: GridPoint| 40.0;
        assert_eq!(ht.pick(Vec2::new(-200.0, -200.0), tall), None);
        assert_eq!(ht.pick(Vec2::new(5000.0, 5000.0), tall), None);
        assert_eq!(ht.pick(Vec2::new(f64::NAN, 10.0), tall), None);
        assert_eq!(ht.pick(Vec2::new(1e300, -1e300), tall), None);
    }

    #[test]
    fn flat_offsets_match_the_flat_lookup() {
        let r = renderer();
        let b = bounds();
        let ht = HitTester::new(&r, b);
        for i in -20..140 {
            for j in -20..90 {
                let p = Vec2::new(f64::from(i) * 9.3 - 20.0, f64::from(j) * 7.1 - 30.0);
                let expected = Some(r.screen_to_tile(p)).filter(|t| b.contains(*t));
                assert_eq!(ht.pick(p, flat), expected, "{p}");
            }
        }
    }

    #[test]
    fn results_stay_in_bounds_and_are_deterministic() {
        let r = renderer();
        let b = bounds();
        let ht = HitTester::new(&r, b);
        let offsets = |t: GridPoint| f64::from((t.column * 7 + t.row * 13) % 5) * 12.0;
        for i in -10..70 {
            for j in -10..50 {
                let p = Vec2::new(f64::from(i) * 19.7, f64::from(j) * 11.3);
                let first = ht.pick(p, offsets);
                if let Some(t) = first {
                    assert!(b.contains(t), "{p} -> {t}");
                }
                assert_eq!(ht.pick(p, offsets), first);
            }
        }
    }

    #[test]
    fn bad_offsets_count_as_zero() {
        let r = renderer();
        let ht = HitTester::new(&r, bounds());
        let p = Vec2::new(600.0, 240.0);
        let weird = |t: GridPoint| if t.column == 5 { f64::NAN } else { -30.0 };
        assert_eq!(ht.pick(p, weird), Some(GridPoint::new(4, 4)));
    }

    #[test]
    fn empty_grid_never_hits() {
        let r = renderer();
        let ht = HitTester::new(&r, GridRange::with_size(0, 0));
        assert_eq!(ht.pick(Vec2::new(600.0, 10.0), flat), None);
    }
}
