//! The [`TileGrid`] type: dense `columns × rows` storage of caller tiles
//! plus the spatial queries built on its [`Renderer`].
//!
//! Storage is row-major and always complete: every in-bounds cell holds
//! exactly one tile. Tiles are only replaced wholesale, by [`fill`] or
//! [`set_tiles`], and mutated in place otherwise.
//!
//! [`fill`]: TileGrid::fill
//! [`set_tiles`]: TileGrid::set_tiles

use std::fmt;

use crate::geom::{GridPoint, GridRange, Rect, Vec2};
use crate::hit::HitTester;
use crate::projection::{ProjectionError, ProjectionParams};
use crate::renderer::Renderer;

/// Largest number of cells a grid may hold.
pub const MAX_CELLS: usize = 1 << 26;

// ---------------------------------------------------------------------------
// GridError
// ---------------------------------------------------------------------------

/// Errors raised when building or replacing a grid.
#[derive(Debug, Clone, PartialEq)]
pub enum GridError {
    /// The projection parameters were rejected.
    Projection(ProjectionError),
    /// Negative dimensions, or more cells than [`MAX_CELLS`].
    InvalidDimensions { columns: i64, rows: i64 },
    /// Rows passed to [`TileGrid::set_tiles`] differ in length.
    RaggedRows { row: usize, expected: usize, found: usize },
}

impl fmt::Display for GridError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Projection(e) => write!(f, "projection: {e}"),
            Self::InvalidDimensions { columns, rows } => {
                write!(f, "invalid grid dimensions {columns}x{rows}")
            }
            Self::RaggedRows {
                row,
                expected,
                found,
            } => write!(f, "row {row} has {found} tiles, expected {expected}"),
        }
    }
}

impl std::error::Error for GridError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Self::Projection(e) => Some(e),
            _ => None,
        }
    }
}

impl From<ProjectionError> for GridError {
    fn from(e: ProjectionError) -> Self {
        Self::Projection(e)
    }
}

fn check_dimensions(columns: i64, rows: i64) -> Result<GridRange, GridError> {
    let fits = columns >= 0
        && rows >= 0
        && columns <= i64::from(i32::MAX)
        && rows <= i64::from(i32::MAX)
        && (columns as u64).saturating_mul(rows as u64) <= MAX_CELLS as u64;
    if !fits {
        log::warn!("rejecting grid dimensions {columns}x{rows}");
        return Err(GridError::InvalidDimensions { columns, rows });
    }
    Ok(GridRange::with_size(columns as i32, rows as i32))
}

// ---------------------------------------------------------------------------
// GridConfig
// ---------------------------------------------------------------------------

/// Construction parameters for a [`TileGrid`].
///
/// Deserialized configs are checked on load, so a loaded config always
/// builds.
#[derive(Copy, Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(try_from = "RawGridConfig"))]
pub struct GridConfig {
    pub columns: i32,
    pub rows: i32,
    pub projection: ProjectionParams,
}

impl GridConfig {
    pub fn new(columns: i32, rows: i32, projection: ProjectionParams) -> Self {
        Self {
            columns,
            rows,
            projection,
        }
    }

    /// Check the dimensions. The projection is valid by construction.
    pub fn validate(&self) -> Result<(), GridError> {
        check_dimensions(i64::from(self.columns), i64::from(self.rows)).map(|_| ())
    }
}

#[cfg(feature = "serde")]
#[derive(serde::Deserialize)]
struct RawGridConfig {
    columns: i32,
    rows: i32,
    projection: ProjectionParams,
}

#[cfg(feature = "serde")]
impl TryFrom<RawGridConfig> for GridConfig {
    type Error = GridError;

    fn try_from(raw: RawGridConfig) -> Result<Self, Self::Error> {
        let config = GridConfig::new(raw.columns, raw.rows, raw.projection);
        config.validate()?;
        Ok(config)
    }
}

// ---------------------------------------------------------------------------
// TileGrid
// ---------------------------------------------------------------------------

/// A dense isometric grid of caller-defined tiles.
#[derive(Debug, Clone)]
pub struct TileGrid<T> {
    tiles: Vec<T>,
    bounds: GridRange,
    renderer: Renderer,
}

impl<T: Default> TileGrid<T> {
    /// Create a grid filled with `T::default()`.
    pub fn new(columns: i32, rows: i32, projection: ProjectionParams) -> Result<Self, GridError> {
        Self::from_fn(columns, rows, projection, |_| T::default())
    }
}

impl<T> TileGrid<T> {
    /// Create a grid whose tiles come from `generator`, called once per cell
    /// in row-major order.
    pub fn from_fn<F>(
        columns: i32,
        rows: i32,
        projection: ProjectionParams,
        generator: F,
    ) -> Result<Self, GridError>
    where
        F: FnMut(GridPoint) -> T,
    {
        let bounds = check_dimensions(i64::from(columns), i64::from(rows))?;
        let mut grid = Self {
            tiles: Vec::new(),
            bounds,
            renderer: Renderer::new(projection),
        };
        grid.fill(generator);
        log::debug!("created {columns}x{rows} tile grid");
        Ok(grid)
    }

    /// Create a grid from a [`GridConfig`].
    pub fn from_config<F>(config: &GridConfig, generator: F) -> Result<Self, GridError>
    where
        F: FnMut(GridPoint) -> T,
    {
        Self::from_fn(config.columns, config.rows, config.projection, generator)
    }

    /// Replace every tile with `generator(position)`, row-major.
    pub fn fill<F>(&mut self, generator: F)
    where
        F: FnMut(GridPoint) -> T,
    {
        self.tiles = self.bounds.iter_row_major().map(generator).collect();
    }

    /// Replace all tiles with `rows`, adopting its dimensions. Every row must
    /// have the same length. On error the grid is unchanged.
    pub fn set_tiles(&mut self, rows: Vec<Vec<T>>) -> Result<(), GridError> {
        let columns = rows.first().map_or(0, Vec::len);
        if let Some((row, found)) = rows
            .iter()
            .map(Vec::len)
            .enumerate()
            .find(|&(_, len)| len != columns)
        {
            return Err(GridError::RaggedRows {
                row,
                expected: columns,
                found,
            });
        }
        let to_i64 = |n: usize| i64::try_from(n).unwrap_or(i64::MAX);
        let bounds = check_dimensions(to_i64(columns), to_i64(rows.len()))?;
        self.tiles = rows.into_iter().flatten().collect();
        self.bounds = bounds;
        log::debug!("replaced tiles, grid is now {}x{}", bounds.columns(), bounds.rows());
        Ok(())
    }

    #[inline]
    pub fn columns(&self) -> i32 {
        self.bounds.columns()
    }

    #[inline]
    pub fn rows(&self) -> i32 {
        self.bounds.rows()
    }

    /// The range of valid positions.
    #[inline]
    pub fn bounds(&self) -> GridRange {
        self.bounds
    }

    #[inline]
    pub fn renderer(&self) -> &Renderer {
        &self.renderer
    }

    #[inline]
    pub fn projection(&self) -> &ProjectionParams {
        self.renderer.projection()
    }

    pub fn set_projection(&mut self, projection: ProjectionParams) {
        self.renderer.set_projection(projection);
    }

    /// Move the screen origin. On error the projection is unchanged.
    pub fn set_origin(&mut self, x: f64, y: f64) -> Result<(), GridError> {
        let mut projection = *self.projection();
        projection.set_origin(x, y)?;
        self.set_projection(projection);
        Ok(())
    }

    /// Whether `p` addresses a stored tile.
    #[inline]
    pub fn contains_tile(&self, p: GridPoint) -> bool {
        self.bounds.contains(p)
    }

    #[inline]
    fn index(&self, p: GridPoint) -> Option<usize> {
        if self.contains_tile(p) {
            Some(p.row as usize * self.columns() as usize + p.column as usize)
        } else {
            None
        }
    }

    /// The tile at `p`, or `None` if out of bounds.
    pub fn get(&self, p: GridPoint) -> Option<&T> {
        self.index(p).and_then(|i| self.tiles.get(i))
    }

    pub fn get_mut(&mut self, p: GridPoint) -> Option<&mut T> {
        self.index(p).and_then(|i| self.tiles.get_mut(i))
    }

    /// Row-major iterator over `(position, tile)` pairs.
    pub fn iter(&self) -> impl Iterator<Item = (GridPoint, &T)> + '_ {
        self.bounds.iter_row_major().zip(self.tiles.iter())
    }

    pub fn iter_mut(&mut self) -> impl Iterator<Item = (GridPoint, &mut T)> + '_ {
        self.bounds.iter_row_major().zip(self.tiles.iter_mut())
    }

    /// Call `visitor` for every tile, row-major.
    pub fn for_each<F>(&self, mut visitor: F)
    where
        F: FnMut(&T, GridPoint),
    {
        for (p, tile) in self.iter() {
            visitor(tile, p);
        }
    }

    /// Call `visitor` for every tile with mutable access, row-major.
    pub fn for_each_mut<F>(&mut self, mut visitor: F)
    where
        F: FnMut(&mut T, GridPoint),
    {
        for (p, tile) in self.iter_mut() {
            visitor(tile, p);
        }
    }

    // -- spatial queries ----------------------------------------------------

    /// Position of the tile whose flat footprint contains `(x, y)`.
    pub fn tile_at(&self, x: f64, y: f64) -> Option<GridPoint> {
        let point = Vec2::new(x, y);
        if !point.is_finite() {
            return None;
        }
        Some(self.renderer.screen_to_tile(point)).filter(|&p| self.contains_tile(p))
    }

    /// The tile whose flat footprint contains `(x, y)`, ignoring offsets.
    pub fn get_tile(&self, x: f64, y: f64) -> Option<&T> {
        self.tile_at(x, y).and_then(|p| self.get(p))
    }

    /// Position of the tile `(x, y)` is visually over, taking each tile's
    /// sprite offset into account.
    pub fn tile_at_with_offset<F>(&self, x: f64, y: f64, offset_of: F) -> Option<GridPoint>
    where
        F: Fn(&T) -> f64,
    {
        HitTester::new(&self.renderer, self.bounds).pick(Vec2::new(x, y), |p| {
            self.get(p).map_or(0.0, &offset_of)
        })
    }

    /// The tile `(x, y)` is visually over, taking offsets into account.
    pub fn get_tile_with_offset<F>(&self, x: f64, y: f64, offset_of: F) -> Option<&T>
    where
        F: Fn(&T) -> f64,
    {
        self.tile_at_with_offset(x, y, offset_of)
            .and_then(|p| self.get(p))
    }

    pub fn get_tile_with_offset_mut<F>(&mut self, x: f64, y: f64, offset_of: F) -> Option<&mut T>
    where
        F: Fn(&T) -> f64,
    {
        let p = self.tile_at_with_offset(x, y, offset_of)?;
        self.get_mut(p)
    }

    // -- extent -------------------------------------------------------------

    /// `columns × tile_width`.
    pub fn width(&self) -> f64 {
        f64::from(self.columns()) * self.renderer.tile_width()
    }

    /// `rows × tile_height`.
    pub fn height(&self) -> f64 {
        f64::from(self.rows()) * self.renderer.tile_height()
    }

    /// Screen bounding box of every flat footprint. Empty grids yield a
    /// zero-sized rectangle at the origin.
    pub fn screen_bounds(&self) -> Rect {
        let origin = self.projection().origin();
        let (columns, rows) = (f64::from(self.columns()), f64::from(self.rows()));
        if self.bounds.is_empty() {
            return Rect::new(origin.x, origin.y, 0.0, 0.0);
        }
        let (hw, hh) = (
            self.renderer.tile_width() * 0.5,
            self.renderer.tile_height() * 0.5,
        );
        Rect::new(
            origin.x - rows * hw,
            origin.y,
            (columns + rows) * hw,
            (columns + rows) * hh,
        )
    }

    /// Move the origin so the map's bounding box starts at
    /// `(margin_x, margin_y)`.
    pub fn fit_origin(&mut self, margin_x: f64, margin_y: f64) -> Result<(), GridError> {
        let x = margin_x + f64::from(self.rows()) * self.renderer.tile_width() * 0.5;
        self.set_origin(x, margin_y)
    }
}
