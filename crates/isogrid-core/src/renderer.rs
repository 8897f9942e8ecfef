//! The [`Renderer`]: screen ↔ grid conversions with the origin folded in,
//! plus the geometry the host needs to draw a tile.
//!
//! Nothing here draws. Image placement rectangles and diamond outlines are
//! handed back to the caller.

use crate::geom::{Diamond, GridPoint, Rect, Vec2};
use crate::projection::{CoordinateTransform, ProjectionParams};

/// Projection state for one grid.
#[derive(Copy, Clone, Debug, PartialEq)]
pub struct Renderer {
    params: ProjectionParams,
    transform: CoordinateTransform,
}

impl Renderer {
    pub fn new(params: ProjectionParams) -> Self {
        Self {
            params,
            transform: params.transform(),
        }
    }

    #[inline]
    pub fn projection(&self) -> &ProjectionParams {
        &self.params
    }

    /// Replace the projection. Every query recomputes from the current
    /// parameters, so nothing else needs invalidating.
    pub fn set_projection(&mut self, params: ProjectionParams) {
        *self = Self::new(params);
    }

    #[inline]
    pub fn tile_width(&self) -> f64 {
        self.params.tile_width()
    }

    #[inline]
    pub fn tile_height(&self) -> f64 {
        self.params.tile_height()
    }

    /// Screen position of the top vertex of `tile`.
    #[inline]
    pub fn tile_to_screen(&self, tile: GridPoint) -> Vec2 {
        self.transform.grid_to_screen(tile) + self.params.origin()
    }

    /// The cell whose flat footprint contains the screen point. May lie
    /// outside any grid; non-finite points always do, NaN mapping to
    /// `(i32::MIN, i32::MIN)`.
    #[inline]
    pub fn screen_to_tile(&self, screen: Vec2) -> GridPoint {
        self.transform.screen_to_grid(screen - self.params.origin())
    }

    /// Un-floored grid position of a screen point.
    #[inline]
    pub fn screen_to_world(&self, screen: Vec2) -> Vec2 {
        self.transform.screen_to_world(screen - self.params.origin())
    }

    #[inline]
    pub fn world_to_screen(&self, world: Vec2) -> Vec2 {
        self.transform.world_to_screen(world) + self.params.origin()
    }

    /// Centre of the flat footprint of `tile`.
    #[inline]
    pub fn tile_center(&self, tile: GridPoint) -> Vec2 {
        let top = self.tile_to_screen(tile);
        Vec2::new(top.x, top.y + self.tile_height() * 0.5)
    }

    /// Where to blit an image for `tile`: the footprint's bounding box
    /// stretched upward by `offset` pixels.
    pub fn image_placement(&self, tile: GridPoint, offset: f64) -> Rect {
        let top = self.tile_to_screen(tile);
        Rect::new(
            top.x - self.tile_width() * 0.5,
            top.y - offset,
            self.tile_width(),
            self.tile_height() + offset,
        )
    }

    /// Diamond outline of `tile`, raised by `offset` pixels.
    pub fn tile_shape(&self, tile: GridPoint, offset: f64) -> Diamond {
        let top = self.tile_to_screen(tile);
        let (hw, hh) = (self.tile_width() * 0.5, self.tile_height() * 0.5);
        let y = top.y - offset;
        Diamond {
            top: Vec2::new(top.x, y),
            right: Vec2::new(top.x + hw, y + hh),
            bottom: Vec2::new(top.x, y + 2.0 * hh),
            left: Vec2::new(top.x - hw, y + hh),
        }
    }

    /// Whether `point` falls inside the silhouette of `tile` drawn `offset`
    /// pixels tall: the diamond swept upward from its flat position to its
    /// raised one.
    ///
    /// At horizontal distance `dx` from the centre line the silhouette spans
    /// from the raised top edge down to the flat bottom edge. The band is
    /// widest on the centre line and narrows toward the side vertices, where
    /// it is `offset` pixels tall. Top edge inclusive, bottom edge exclusive.
    pub fn silhouette_contains(&self, tile: GridPoint, offset: f64, point: Vec2) -> bool {
        let top = self.tile_to_screen(tile);
        let (w, h) = (self.tile_width(), self.tile_height());
        let dx = (point.x - top.x).abs();
        if dx >= w * 0.5 {
            return false;
        }
        let slope = dx * h / w;
        // Measured from the raised top vertex.
        let dy = point.y - (top.y - offset);
        dy >= slope && dy < h + offset - slope
    }
}

/// Sprite height as drawn and picked: negative or non-finite offsets are flat.
#[inline]
pub(crate) fn sprite_offset(offset: f64) -> f64 {
    if offset.is_finite() && offset > 0.0 {
        offset
    } else {
        0.0
    }
}
