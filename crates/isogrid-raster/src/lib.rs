//! **isogrid-raster** — a software [`TileDrawer`] that paints render passes
//! into an [`RgbaImage`].
//!
//! Tiles are painted either as flat-colored diamonds or by stretching a
//! sprite over their placement rectangle; what each tile looks like comes
//! from a caller-supplied paint accessor.

use image::{Rgba, RgbaImage};
use isogrid_core::{Diamond, HighlightKind, Rect, TileDrawer, TilePlacement, Vec2};

/// Error type for [`Canvas`] construction.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RasterError {
    /// One of the canvas sides is zero.
    EmptyCanvas { width: u32, height: u32 },
}

impl std::fmt::Display for RasterError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            RasterError::EmptyCanvas { width, height } => {
                write!(f, "canvas must not be empty, got {width}x{height}")
            }
        }
    }
}

impl std::error::Error for RasterError {}

/// How a tile is painted.
#[derive(Copy, Clone, Debug)]
pub enum Paint<'a> {
    /// Fill the raised diamond with a color.
    Color(Rgba<u8>),
    /// Stretch a sprite over the placement rectangle.
    Sprite(&'a RgbaImage),
}

/// Colors used for highlights.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub struct HighlightStyle {
    pub selected_fill: Rgba<u8>,
    pub hover_stroke: Rgba<u8>,
}

impl Default for HighlightStyle {
    fn default() -> Self {
        Self {
            selected_fill: Rgba([255, 255, 255, 51]),
            hover_stroke: Rgba([34, 34, 34, 255]),
        }
    }
}

/// A render target plus the paint accessor for tiles of type `T`.
pub struct Canvas<P> {
    image: RgbaImage,
    paint_of: P,
    highlight: HighlightStyle,
}

impl<P> Canvas<P> {
    /// Create a canvas cleared to `background`.
    pub fn new(width: u32, height: u32, background: Rgba<u8>, paint_of: P) -> Result<Self, RasterError> {
        if width == 0 || height == 0 {
            return Err(RasterError::EmptyCanvas { width, height });
        }
        log::debug!("canvas {width}x{height}");
        Ok(Self {
            image: RgbaImage::from_pixel(width, height, background),
            paint_of,
            highlight: HighlightStyle::default(),
        })
    }

    /// Set the highlight colors (builder).
    pub fn with_highlight(mut self, highlight: HighlightStyle) -> Self {
        self.highlight = highlight;
        self
    }

    pub fn image(&self) -> &RgbaImage {
        &self.image
    }

    pub fn into_image(self) -> RgbaImage {
        self.image
    }
}

impl<'a, T, P> TileDrawer<T> for Canvas<P>
where
    P: Fn(&T) -> Paint<'a>,
{
    fn draw_tile(&mut self, tile: &T, placement: &TilePlacement) {
        match (self.paint_of)(tile) {
            Paint::Color(color) => fill_diamond(&mut self.image, &placement.outline, color),
            Paint::Sprite(sprite) => blit_scaled(&mut self.image, sprite, placement.image_rect),
        }
    }

    fn draw_highlight(&mut self, _tile: &T, outline: &Diamond, kind: HighlightKind) {
        match kind {
            HighlightKind::Selected => fill_diamond(&mut self.image, outline, self.highlight.selected_fill),
            HighlightKind::Hovered => stroke_diamond(&mut self.image, outline, self.highlight.hover_stroke),
        }
    }
}

// ---------------------------------------------------------------------------
// Primitives
// ---------------------------------------------------------------------------

/// Pixel range `[lo, hi)` covering `[min, max)` on an axis of length `len`.
fn pixel_span(min: f64, max: f64, len: u32) -> (u32, u32) {
    let lo = min.floor().clamp(0.0, f64::from(len)) as u32;
    let hi = max.ceil().clamp(0.0, f64::from(len)) as u32;
    (lo, hi)
}

/// Fill every pixel whose centre lies inside `diamond`.
pub fn fill_diamond(img: &mut RgbaImage, diamond: &Diamond, color: Rgba<u8>) {
    let b = diamond.bounds();
    let (x0, x1) = pixel_span(b.x, b.x + b.width, img.width());
    let (y0, y1) = pixel_span(b.y, b.y + b.height, img.height());
    for y in y0..y1 {
        for x in x0..x1 {
            let centre = Vec2::new(f64::from(x) + 0.5, f64::from(y) + 0.5);
            if diamond.contains(centre) {
                blend_pixel(img, x, y, color);
            }
        }
    }
}

/// Draw the closed outline of `diamond`, one pixel wide.
pub fn stroke_diamond(img: &mut RgbaImage, diamond: &Diamond, color: Rgba<u8>) {
    let v = diamond.vertices();
    for i in 0..v.len() {
        line(img, v[i], v[(i + 1) % v.len()], color);
    }
}

fn line(img: &mut RgbaImage, a: Vec2, b: Vec2, color: Rgba<u8>) {
    let steps = (b.x - a.x).abs().max((b.y - a.y).abs()).ceil().max(1.0) as u32;
    for i in 0..=steps {
        let t = f64::from(i) / f64::from(steps);
        let x = (a.x + (b.x - a.x) * t).floor();
        let y = (a.y + (b.y - a.y) * t).floor();
        if x >= 0.0 && y >= 0.0 && x < f64::from(img.width()) && y < f64::from(img.height()) {
            img.put_pixel(x as u32, y as u32, color);
        }
    }
}

/// Stretch `sprite` over `rect` with nearest-neighbour sampling, blending
/// by the sprite's alpha.
pub fn blit_scaled(img: &mut RgbaImage, sprite: &RgbaImage, rect: Rect) {
    if sprite.width() == 0 || sprite.height() == 0 || rect.width <= 0.0 || rect.height <= 0.0 {
        return;
    }
    let (x0, x1) = pixel_span(rect.x, rect.x + rect.width, img.width());
    let (y0, y1) = pixel_span(rect.y, rect.y + rect.height, img.height());
    let sx = f64::from(sprite.width()) / rect.width;
    let sy = f64::from(sprite.height()) / rect.height;
    for y in y0..y1 {
        let v = (f64::from(y) + 0.5 - rect.y) * sy;
        if v < 0.0 || v >= f64::from(sprite.height()) {
            continue;
        }
        for x in x0..x1 {
            let u = (f64::from(x) + 0.5 - rect.x) * sx;
            if u < 0.0 || u >= f64::from(sprite.width()) {
                continue;
            }
            let src = *sprite.get_pixel(u as u32, v as u32);
            blend_pixel(img, x, y, src);
        }
    }
}

/// A solid block sprite for a tile `tile_width × tile_height` raised by
/// `offset`: a lit top face over two shaded side faces.
pub fn block_sprite(tile_width: u32, tile_height: u32, offset: u32, color: Rgba<u8>) -> RgbaImage {
    let (w, h, o) = (f64::from(tile_width), f64::from(tile_height), f64::from(offset));
    let mut img = RgbaImage::new(tile_width, tile_height + offset);
    let top = Diamond {
        top: Vec2::new(w * 0.5, 0.0),
        right: Vec2::new(w, h * 0.5),
        bottom: Vec2::new(w * 0.5, h),
        left: Vec2::new(0.0, h * 0.5),
    };
    let left_shade = shade(color, 0.75);
    let right_shade = shade(color, 0.55);
    for y in 0..img.height() {
        for x in 0..img.width() {
            let p = Vec2::new(f64::from(x) + 0.5, f64::from(y) + 0.5);
            // Sides: the lower half of the top face swept down by `offset`.
            let dx = (p.x - w * 0.5).abs();
            let upper = h - dx * h / w;
            let inside_sides = p.y >= h * 0.5 && p.y < upper + o && dx < w * 0.5;
            let pixel = if top.contains(p) {
                color
            } else if inside_sides {
                if p.x < w * 0.5 { left_shade } else { right_shade }
            } else {
                continue;
            };
            img.put_pixel(x, y, pixel);
        }
    }
    img
}

fn shade(c: Rgba<u8>, k: f32) -> Rgba<u8> {
    let s = |v: u8| (f32::from(v) * k) as u8;
    Rgba([s(c[0]), s(c[1]), s(c[2]), c[3]])
}

fn blend_pixel(img: &mut RgbaImage, x: u32, y: u32, src: Rgba<u8>) {
    let alpha = f32::from(src[3]) / 255.0;
    if alpha <= 0.0 {
        return;
    }
    let dst = img.get_pixel_mut(x, y);
    for i in 0..3 {
        dst[i] = blend(dst[i], src[i], alpha);
    }
    dst[3] = blend(dst[3], 255, alpha);
}

/// Simple alpha-blend of two u8 color channels.
fn blend(bg: u8, fg: u8, alpha: f32) -> u8 {
    ((1.0 - alpha) * bg as f32 + alpha * fg as f32).round() as u8
}

#[cfg(test)]
mod tests {
    use super::*;
    use isogrid_core::{DrawOrder, GridPoint, Highlight, ProjectionParams, RenderPass, TileGrid};

    const BLACK: Rgba<u8> = Rgba([0, 0, 0, 255]);
    const RED: Rgba<u8> = Rgba([255, 0, 0, 255]);
    const BLUE: Rgba<u8> = Rgba([0, 0, 255, 255]);

    fn diamond() -> Diamond {
        Diamond {
            top: Vec2::new(10.0, 0.0),
            right: Vec2::new(20.0, 5.0),
            bottom: Vec2::new(10.0, 10.0),
            left: Vec2::new(0.0, 5.0),
        }
    }

    #[test]
    fn empty_canvas_is_rejected() {
        let r = Canvas::new(0, 10, BLACK, |_: &u8| Paint::Color(RED));
        assert_eq!(r.err(), Some(RasterError::EmptyCanvas { width: 0, height: 10 }));
    }

    #[test]
    fn fill_diamond_paints_inside_only() {
        let mut img = RgbaImage::from_pixel(20, 10, BLACK);
        fill_diamond(&mut img, &diamond(), RED);
        assert_eq!(*img.get_pixel(10, 5), RED);
        assert_eq!(*img.get_pixel(0, 0), BLACK);
        assert_eq!(*img.get_pixel(19, 9), BLACK);
    }

    #[test]
    fn fill_clips_to_the_image() {
        let mut img = RgbaImage::from_pixel(4, 4, BLACK);
        let d = Diamond {
            top: Vec2::new(2.0, -50.0),
            right: Vec2::new(100.0, 2.0),
            bottom: Vec2::new(2.0, 50.0),
            left: Vec2::new(-100.0, 2.0),
        };
        fill_diamond(&mut img, &d, RED);
        assert!(img.pixels().all(|p| *p == RED));
    }

    #[test]
    fn stroke_touches_vertices() {
        let mut img = RgbaImage::from_pixel(21, 11, BLACK);
        stroke_diamond(&mut img, &diamond(), RED);
        assert_eq!(*img.get_pixel(10, 0), RED);
        assert_eq!(*img.get_pixel(0, 5), RED);
        assert_eq!(*img.get_pixel(10, 5), BLACK);
    }

    #[test]
    fn blit_stretches_sprite() {
        let sprite = RgbaImage::from_pixel(2, 2, BLUE);
        let mut img = RgbaImage::from_pixel(10, 10, BLACK);
        blit_scaled(&mut img, &sprite, Rect::new(2.0, 2.0, 4.0, 6.0));
        assert_eq!(*img.get_pixel(2, 2), BLUE);
        assert_eq!(*img.get_pixel(5, 7), BLUE);
        assert_eq!(*img.get_pixel(6, 7), BLACK);
        assert_eq!(*img.get_pixel(1, 2), BLACK);
    }

    #[test]
    fn transparent_pixels_do_not_overwrite() {
        let sprite = RgbaImage::new(2, 2);
        let mut img = RgbaImage::from_pixel(4, 4, RED);
        blit_scaled(&mut img, &sprite, Rect::new(0.0, 0.0, 4.0, 4.0));
        assert!(img.pixels().all(|p| *p == RED));
    }

    #[test]
    fn block_sprite_has_top_and_sides() {
        let s = block_sprite(20, 10, 6, RED);
        assert_eq!(s.dimensions(), (20, 16));
        assert_eq!(*s.get_pixel(10, 3), RED);
        // Left side face below the top face.
        assert_eq!(*s.get_pixel(5, 11), shade(RED, 0.75));
        assert_eq!(*s.get_pixel(15, 11), shade(RED, 0.55));
        // Corners stay transparent.
        assert_eq!(s.get_pixel(0, 0)[3], 0);
        assert_eq!(s.get_pixel(0, 15)[3], 0);
    }

    #[test]
    fn highlights_use_the_canvas_style() {
        const GREEN: Rgba<u8> = Rgba([0, 255, 0, 255]);
        let grid: TileGrid<u8> =
            TileGrid::new(1, 1, ProjectionParams::new(20.0, 10.0).unwrap().with_origin(10.0, 0.0).unwrap())
                .unwrap();
        let mut canvas = Canvas::new(20, 10, BLACK, |_: &u8| Paint::Color(RED))
            .unwrap()
            .with_highlight(HighlightStyle {
                selected_fill: BLUE,
                hover_stroke: GREEN,
            });
        RenderPass::default().run(
            &grid,
            |_| 0.0,
            |_| Highlight {
                selected: true,
                hovered: true,
            },
            &mut canvas,
        );
        let img = canvas.image();
        assert_eq!(*img.get_pixel(10, 5), BLUE);
        assert_eq!(*img.get_pixel(10, 0), GREEN);
        assert_eq!(*img.get_pixel(0, 0), BLACK);
    }

    #[test]
    fn render_pass_into_canvas() {
        let grid: TileGrid<bool> = TileGrid::from_fn(
            2,
            2,
            ProjectionParams::new(20.0, 10.0).unwrap().with_origin(20.0, 0.0).unwrap(),
            |p| p == GridPoint::new(1, 1),
        )
        .unwrap();
        let mut canvas = Canvas::new(40, 20, BLACK, |&blue: &bool| {
            Paint::Color(if blue { BLUE } else { RED })
        })
        .unwrap();
        let drawn = RenderPass::new(DrawOrder::Diagonal).run(
            &grid,
            |_| 0.0,
            |_| Highlight::NONE,
            &mut canvas,
        );
        assert_eq!(drawn, 4);
        let img = canvas.into_image();
        // Centre of (0, 0) is (20, 5); centre of (1, 1) is (20, 15).
        assert_eq!(*img.get_pixel(20, 5), RED);
        assert_eq!(*img.get_pixel(20, 15), BLUE);
        assert_eq!(*img.get_pixel(0, 0), BLACK);
    }
}
