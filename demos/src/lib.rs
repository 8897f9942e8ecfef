//! Shared demo model: a random map of grass and water blocks.
//!
//! Grass blocks are drawn 15 pixels tall and water 8, so pointer picking has
//! to look past the flat footprints. The binary feeds pointer positions in
//! and writes the rendered map out as a PNG.

use image::{Rgba, RgbaImage};
use isogrid_core::{DrawOrder, GridError, GridPoint, Highlight, ProjectionParams, RenderPass, TileGrid};
use isogrid_raster::{Canvas, HighlightStyle, Paint, RasterError, block_sprite};
use rand::{Rng, SeedableRng};

pub const GRASS_OFFSET: f64 = 15.0;
pub const WATER_OFFSET: f64 = 8.0;
/// Space left around the map in the output image.
pub const MARGIN: f64 = 10.0;

const COL_BG: Rgba<u8> = Rgba([24, 24, 32, 255]);
const COL_GRASS: Rgba<u8> = Rgba([96, 168, 72, 255]);
const COL_WATER: Rgba<u8> = Rgba([64, 112, 200, 255]);
const HIGHLIGHT: HighlightStyle = HighlightStyle {
    selected_fill: Rgba([255, 240, 160, 96]),
    hover_stroke: Rgba([250, 220, 60, 255]),
};

/// One map cell.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct DemoTile {
    /// Random value in `[0, 1)`; below one half is grass.
    pub value: f64,
    pub hovered: bool,
    pub selected: bool,
}

impl DemoTile {
    pub fn is_grass(&self) -> bool {
        self.value < 0.5
    }
}

/// Sprite height of a tile.
pub fn offset_of(tile: &DemoTile) -> f64 {
    if tile.is_grass() { GRASS_OFFSET } else { WATER_OFFSET }
}

fn highlight_of(tile: &DemoTile) -> Highlight {
    Highlight {
        selected: tile.selected,
        hovered: tile.hovered,
    }
}

struct Sprites {
    grass: RgbaImage,
    water: RgbaImage,
}

impl Sprites {
    fn new(projection: &ProjectionParams) -> Self {
        let w = projection.tile_width().round().max(1.0) as u32;
        let h = projection.tile_height().round().max(1.0) as u32;
        Self {
            grass: block_sprite(w, h, GRASS_OFFSET as u32, COL_GRASS),
            water: block_sprite(w, h, WATER_OFFSET as u32, COL_WATER),
        }
    }
}

/// The demo map and its sprites.
pub struct Demo {
    grid: TileGrid<DemoTile>,
    sprites: Sprites,
}

impl Demo {
    /// Build a `columns × rows` map of 2:1 diamonds `2 * tile_size` wide,
    /// seeded deterministically.
    pub fn new(columns: i32, rows: i32, tile_size: f64, seed: u64) -> Result<Self, GridError> {
        let mut rng = rand::rngs::StdRng::seed_from_u64(seed);
        let projection = ProjectionParams::uniform(tile_size)?;
        let mut grid = TileGrid::from_fn(columns, rows, projection, |_| DemoTile {
            value: rng.random(),
            ..DemoTile::default()
        })?;
        // Room above the first row for the tallest sprite.
        grid.fit_origin(MARGIN, MARGIN + GRASS_OFFSET)?;
        log::info!("demo map {columns}x{rows}, tile size {tile_size}, seed {seed}");
        Ok(Self {
            sprites: Sprites::new(grid.projection()),
            grid,
        })
    }

    pub fn grid(&self) -> &TileGrid<DemoTile> {
        &self.grid
    }

    /// Mark the tile under the pointer as hovered, clearing the others.
    pub fn hover(&mut self, x: f64, y: f64) -> Option<GridPoint> {
        let hit = self.grid.tile_at_with_offset(x, y, offset_of);
        self.grid
            .for_each_mut(|tile, p| tile.hovered = Some(p) == hit);
        hit
    }

    /// Mark the tile under the pointer as selected, clearing the others.
    pub fn select(&mut self, x: f64, y: f64) -> Option<GridPoint> {
        let hit = self.grid.tile_at_with_offset(x, y, offset_of);
        self.grid
            .for_each_mut(|tile, p| tile.selected = Some(p) == hit);
        hit
    }

    /// Size of the output image in pixels.
    pub fn canvas_size(&self) -> (u32, u32) {
        let b = self.grid.screen_bounds();
        let w = (b.x + b.width + MARGIN).ceil().max(1.0) as u32;
        let h = (b.y + b.height + MARGIN).ceil().max(1.0) as u32;
        (w, h)
    }

    /// Draw the whole map.
    pub fn render(&self, order: DrawOrder) -> Result<RgbaImage, RasterError> {
        let (w, h) = self.canvas_size();
        let sprites = &self.sprites;
        let mut canvas = Canvas::new(w, h, COL_BG, |tile: &DemoTile| {
            Paint::Sprite(if tile.is_grass() {
                &sprites.grass
            } else {
                &sprites.water
            })
        })?
        .with_highlight(HIGHLIGHT);
        RenderPass::new(order).run(&self.grid, offset_of, highlight_of, &mut canvas);
        Ok(canvas.into_image())
    }
}
