//! Isometric projection parameters and the pure coordinate transforms.
//!
//! Three spaces are involved:
//!
//! - **screen**: pixels, origin top-left, y growing down;
//! - **world**: the de-skewed plane, measured in tiles, so world `(x, y)` is
//!   the real-valued `(column, row)`;
//! - **grid**: integer `(column, row)` cells, `floor` of world coordinates.
//!
//! [`CoordinateTransform`] ignores the screen origin; [`Renderer`] folds it in.
//!
//! [`Renderer`]: crate::Renderer

use std::fmt;

use crate::geom::{GridPoint, Vec2};

// ---------------------------------------------------------------------------
// ProjectionError
// ---------------------------------------------------------------------------

/// Errors raised when projection parameters are rejected.
#[derive(Debug, Clone, PartialEq)]
pub enum ProjectionError {
    /// Tile width or height is zero, negative or not finite.
    InvalidTileSize { width: f64, height: f64 },
    /// The screen origin is not finite.
    InvalidOrigin { x: f64, y: f64 },
}

impl fmt::Display for ProjectionError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::InvalidTileSize { width, height } => {
                write!(f, "invalid tile size {width}x{height}: both sides must be positive")
            }
            Self::InvalidOrigin { x, y } => write!(f, "invalid screen origin ({x}, {y})"),
        }
    }
}

impl std::error::Error for ProjectionError {}

fn check_tile_size(width: f64, height: f64) -> Result<(), ProjectionError> {
    if width.is_finite() && height.is_finite() && width > 0.0 && height > 0.0 {
        Ok(())
    } else {
        log::warn!("rejecting tile size {width}x{height}");
        Err(ProjectionError::InvalidTileSize { width, height })
    }
}

fn check_origin(origin: Vec2) -> Result<(), ProjectionError> {
    if origin.is_finite() {
        Ok(())
    } else {
        log::warn!("rejecting screen origin {origin}");
        Err(ProjectionError::InvalidOrigin {
            x: origin.x,
            y: origin.y,
        })
    }
}

// ---------------------------------------------------------------------------
// ProjectionParams
// ---------------------------------------------------------------------------

/// Projected tile size plus the screen translation applied after projection.
///
/// Fields are private so the positive-size invariant always holds; use the
/// setters to change them.
#[derive(Copy, Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(try_from = "RawProjection"))]
pub struct ProjectionParams {
    tile_width: f64,
    tile_height: f64,
    origin: Vec2,
}

impl ProjectionParams {
    /// Projection with the given on-screen diamond size and a zero origin.
    pub fn new(tile_width: f64, tile_height: f64) -> Result<Self, ProjectionError> {
        check_tile_size(tile_width, tile_height)?;
        Ok(Self {
            tile_width,
            tile_height,
            origin: Vec2::ZERO,
        })
    }

    /// Classic 2:1 diamond built from a single tile size: the diamond is
    /// `2 * tile_size` wide and `tile_size` tall.
    pub fn uniform(tile_size: f64) -> Result<Self, ProjectionError> {
        Self::new(tile_size * 2.0, tile_size)
    }

    /// Projection from a cartesian tile footprint. The projected diamond is
    /// twice as wide as the footprint and as tall as it.
    pub fn from_cartesian(width: f64, height: f64) -> Result<Self, ProjectionError> {
        check_tile_size(width, height)?;
        Self::new(width * 2.0, height)
    }

    /// Set the screen origin (builder).
    pub fn with_origin(mut self, x: f64, y: f64) -> Result<Self, ProjectionError> {
        self.set_origin(x, y)?;
        Ok(self)
    }

    #[inline]
    pub fn tile_width(&self) -> f64 {
        self.tile_width
    }

    #[inline]
    pub fn tile_height(&self) -> f64 {
        self.tile_height
    }

    /// Screen position of the top vertex of tile (0, 0).
    #[inline]
    pub fn origin(&self) -> Vec2 {
        self.origin
    }

    /// Replace the tile size. On error the parameters are unchanged.
    pub fn set_tile_dimensions(&mut self, width: f64, height: f64) -> Result<(), ProjectionError> {
        check_tile_size(width, height)?;
        self.tile_width = width;
        self.tile_height = height;
        Ok(())
    }

    /// Replace the screen origin. On error the parameters are unchanged.
    pub fn set_origin(&mut self, x: f64, y: f64) -> Result<(), ProjectionError> {
        let origin = Vec2::new(x, y);
        check_origin(origin)?;
        self.origin = origin;
        Ok(())
    }

    /// The origin-free transform for these dimensions.
    #[inline]
    pub fn transform(&self) -> CoordinateTransform {
        CoordinateTransform {
            tile_width: self.tile_width,
            tile_height: self.tile_height,
        }
    }
}

#[cfg(feature = "serde")]
#[derive(serde::Deserialize)]
struct RawProjection {
    tile_width: f64,
    tile_height: f64,
    #[serde(default)]
    origin: Vec2,
}

#[cfg(feature = "serde")]
impl TryFrom<RawProjection> for ProjectionParams {
    type Error = ProjectionError;

    fn try_from(raw: RawProjection) -> Result<Self, Self::Error> {
        ProjectionParams::new(raw.tile_width, raw.tile_height)?.with_origin(raw.origin.x, raw.origin.y)
    }
}

// ---------------------------------------------------------------------------
// CoordinateTransform
// ---------------------------------------------------------------------------

/// Stateless isometric transform for one tile size.
///
/// Only obtainable from a validated [`ProjectionParams`], so both sides are
/// always positive.
#[derive(Copy, Clone, Debug, PartialEq)]
pub struct CoordinateTransform {
    tile_width: f64,
    tile_height: f64,
}

impl CoordinateTransform {
    /// World (tile units) to screen, relative to the origin.
    #[inline]
    pub fn world_to_screen(&self, world: Vec2) -> Vec2 {
        Vec2::new(
            (world.x - world.y) * self.tile_width * 0.5,
            (world.x + world.y) * self.tile_height * 0.5,
        )
    }

    /// Screen (relative to the origin) to world. Exact inverse of
    /// [`world_to_screen`](Self::world_to_screen).
    #[inline]
    pub fn screen_to_world(&self, screen: Vec2) -> Vec2 {
        let sx = screen.x / self.tile_width;
        let sy = screen.y / self.tile_height;
        Vec2::new(sy + sx, sy - sx)
    }

    /// Top vertex of a tile, relative to the origin.
    #[inline]
    pub fn grid_to_screen(&self, p: GridPoint) -> Vec2 {
        self.world_to_screen(Vec2::new(f64::from(p.column), f64::from(p.row)))
    }

    /// The cell whose flat footprint contains `screen`. Cells are half-open
    /// `[n, n + 1)` on both diagonal axes.
    ///
    /// Far away points saturate at the `i32` limits and NaN coordinates map
    /// to `i32::MIN`, so neither ever lands inside a grid.
    #[inline]
    pub fn screen_to_grid(&self, screen: Vec2) -> GridPoint {
        let w = self.screen_to_world(screen);
        GridPoint::new(floor_to_i32(w.x), floor_to_i32(w.y))
    }
}

/// `floor`, saturating at the `i32` limits. NaN maps to `i32::MIN`.
#[inline]
fn floor_to_i32(v: f64) -> i32 {
    if v.is_nan() { i32::MIN } else { v.floor() as i32 }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn approx(a: Vec2, b: Vec2) -> bool {
        (a.x - b.x).abs() < 1e-9 && (a.y - b.y).abs() < 1e-9
    }

    #[test]
    fn rejects_bad_tile_sizes() {
        assert!(ProjectionParams::new(0.0, 10.0).is_err());
        assert!(ProjectionParams::new(10.0, -1.0).is_err());
        assert!(ProjectionParams::new(f64::NAN, 10.0).is_err());
        assert!(ProjectionParams::uniform(f64::INFINITY).is_err());
        assert!(ProjectionParams::from_cartesian(0.0, 5.0).is_err());
        assert_eq!(
            ProjectionParams::new(-2.0, 3.0),
            Err(ProjectionError::InvalidTileSize {
                width: -2.0,
                height: 3.0
            })
        );
    }

    #[test]
    fn rejects_non_finite_origin() {
        let p = ProjectionParams::new(64.0, 32.0).unwrap();
        assert!(p.with_origin(f64::NAN, 0.0).is_err());
    }

    #[test]
    fn failed_setters_leave_params_unchanged() {
        let mut p = ProjectionParams::new(64.0, 32.0).unwrap().with_origin(10.0, 5.0).unwrap();
        let before = p;
        assert!(p.set_tile_dimensions(0.0, 0.0).is_err());
        assert!(p.set_origin(f64::INFINITY, 0.0).is_err());
        assert_eq!(p, before);
        p.set_tile_dimensions(100.0, 50.0).unwrap();
        assert_eq!(p.tile_width(), 100.0);
        assert_eq!(p.tile_height(), 50.0);
    }

    #[test]
    fn uniform_and_cartesian_sizes() {
        let u = ProjectionParams::uniform(40.0).unwrap();
        assert_eq!((u.tile_width(), u.tile_height()), (80.0, 40.0));
        let c = ProjectionParams::from_cartesian(32.0, 32.0).unwrap();
        assert_eq!((c.tile_width(), c.tile_height()), (64.0, 32.0));
    }

    #[test]
    fn grid_to_screen_places_top_vertex() {
        let t = ProjectionParams::new(100.0, 50.0).unwrap().transform();
        assert_eq!(t.grid_to_screen(GridPoint::new(0, 0)), Vec2::new(0.0, 0.0));
        assert_eq!(t.grid_to_screen(GridPoint::new(1, 0)), Vec2::new(50.0, 25.0));
        assert_eq!(t.grid_to_screen(GridPoint::new(0, 1)), Vec2::new(-50.0, 25.0));
        assert_eq!(t.grid_to_screen(GridPoint::new(3, 2)), Vec2::new(50.0, 125.0));
    }

    #[test]
    fn grid_roundtrip_including_negative_cells() {
        for &(w, h) in &[(100.0, 50.0), (64.0, 32.0), (37.5, 19.25)] {
            let t = ProjectionParams::new(w, h).unwrap().transform();
            for column in -6..8 {
                for row in -6..8 {
                    let p = GridPoint::new(column, row);
                    assert_eq!(t.screen_to_grid(t.grid_to_screen(p)), p, "{w}x{h} {p}");
                }
            }
        }
    }

    #[test]
    fn world_roundtrip() {
        let t = ProjectionParams::new(37.5, 19.25).unwrap().transform();
        for &(x, y) in &[(0.0, 0.0), (12.5, -3.25), (-400.0, 999.9), (0.001, 7.0)] {
            let s = Vec2::new(x, y);
            assert!(approx(t.world_to_screen(t.screen_to_world(s)), s));
            assert!(approx(t.screen_to_world(t.world_to_screen(s)), s));
        }
    }

    #[test]
    fn screen_to_grid_floors_negative_values() {
        let t = ProjectionParams::new(100.0, 50.0).unwrap().transform();
        // Just above tile (0, 0)'s top vertex: behind it on both axes.
        assert_eq!(t.screen_to_grid(Vec2::new(0.0, -1.0)), GridPoint::new(-1, -1));
        // Just left of the top vertex, inside row -1 territory.
        assert_eq!(t.screen_to_grid(Vec2::new(-1.0, 0.0)), GridPoint::new(-1, 0));
    }

    #[test]
    fn unrepresentable_points_fall_outside_any_grid() {
        let t = ProjectionParams::new(100.0, 50.0).unwrap().transform();
        let nan = t.screen_to_grid(Vec2::new(f64::NAN, 10.0));
        assert_eq!(nan, GridPoint::new(i32::MIN, i32::MIN));
        assert_eq!(t.screen_to_grid(Vec2::new(0.0, 1e300)), GridPoint::new(i32::MAX, i32::MAX));
        assert_eq!(t.screen_to_grid(Vec2::new(0.0, -1e300)), GridPoint::new(i32::MIN, i32::MIN));
        assert!(!crate::geom::GridRange::with_size(i32::MAX, i32::MAX).contains(nan));
    }

    #[test]
    fn shared_edge_goes_to_the_later_tile() {
        let t = ProjectionParams::new(100.0, 50.0).unwrap().transform();
        // Midpoint of the edge between (0, 0) and (1, 0).
        assert_eq!(t.screen_to_grid(Vec2::new(25.0, 37.5)), GridPoint::new(1, 0));
        // Bottom vertex of (0, 0) is the top vertex of (1, 1).
        assert_eq!(t.screen_to_grid(Vec2::new(0.0, 50.0)), GridPoint::new(1, 1));
    }
}
