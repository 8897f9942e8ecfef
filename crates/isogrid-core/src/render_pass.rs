//! Back-to-front traversal of a [`TileGrid`] for drawing.
//!
//! The pass computes where each tile goes and hands it to a [`TileDrawer`]
//! supplied by the host. It never touches pixels itself.

use crate::geom::{Diamond, GridPoint, Rect, Vec2};
use crate::grid::TileGrid;
use crate::renderer::sprite_offset;

/// Traversal order of a render pass. All three draw every tile after the
/// tiles directly behind it.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum DrawOrder {
    /// Column outer, row inner.
    #[default]
    ColumnMajor,
    /// Row outer, column inner.
    RowMajor,
    /// By `column + row`, then column.
    Diagonal,
}

/// Highlight flags a host attaches to a tile.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq, Hash)]
pub struct Highlight {
    pub selected: bool,
    pub hovered: bool,
}

impl Highlight {
    pub const NONE: Self = Self {
        selected: false,
        hovered: false,
    };
}

/// Which highlight to draw over a tile.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub enum HighlightKind {
    /// Fill the outline.
    Selected,
    /// Stroke the outline.
    Hovered,
}

/// Precomputed screen geometry for one tile.
#[derive(Copy, Clone, Debug, PartialEq)]
pub struct TilePlacement {
    pub position: GridPoint,
    /// Top vertex of the flat footprint.
    pub anchor: Vec2,
    pub offset: f64,
    /// Where an image for the tile goes.
    pub image_rect: Rect,
    /// The footprint raised by `offset`.
    pub outline: Diamond,
}

/// Host-side drawing callbacks.
pub trait TileDrawer<T> {
    /// Draw the tile itself (image or filled shape).
    fn draw_tile(&mut self, tile: &T, placement: &TilePlacement);

    /// Draw a highlight over a tile that was just drawn.
    fn draw_highlight(&mut self, tile: &T, outline: &Diamond, kind: HighlightKind);
}

/// One traversal of a grid.
#[derive(Copy, Clone, Debug, Default)]
pub struct RenderPass {
    order: DrawOrder,
}

impl RenderPass {
    pub fn new(order: DrawOrder) -> Self {
        Self { order }
    }

    /// Positions of `grid` in this pass's order.
    pub fn positions<T>(&self, grid: &TileGrid<T>) -> Vec<GridPoint> {
        let bounds = grid.bounds();
        match self.order {
            DrawOrder::ColumnMajor => bounds.iter_column_major().collect(),
            DrawOrder::RowMajor => bounds.iter_row_major().collect(),
            DrawOrder::Diagonal => {
                let mut positions: Vec<_> = bounds.iter_row_major().collect();
                positions.sort_by_key(|p| (i64::from(p.column) + i64::from(p.row), p.column));
                positions
            }
        }
    }

    /// Draw every tile of `grid`, then its highlights: selected first, then
    /// hovered. Returns the number of tiles drawn.
    ///
    /// Offsets are read the same way picking reads them, so a negative or
    /// non-finite offset draws the tile flat.
    pub fn run<T, D, O, H>(&self, grid: &TileGrid<T>, offset_of: O, highlight_of: H, drawer: &mut D) -> usize
    where
        D: TileDrawer<T> + ?Sized,
        O: Fn(&T) -> f64,
        H: Fn(&T) -> Highlight,
    {
        let renderer = grid.renderer();
        let mut drawn = 0;
        for position in self.positions(grid) {
            let Some(tile) = grid.get(position) else {
                continue;
            };
            let offset = sprite_offset(offset_of(tile));
            let placement = TilePlacement {
                position,
                anchor: renderer.tile_to_screen(position),
                offset,
                image_rect: renderer.image_placement(position, offset),
                outline: renderer.tile_shape(position, offset),
            };
            drawer.draw_tile(tile, &placement);

            let highlight = highlight_of(tile);
            if highlight.selected {
                drawer.draw_highlight(tile, &placement.outline, HighlightKind::Selected);
            }
            if highlight.hovered {
                drawer.draw_highlight(tile, &placement.outline, HighlightKind::Hovered);
            }
            drawn += 1;
        }
        log::debug!("render pass ({:?}) drew {drawn} tiles", self.order);
        drawn
    }
}
