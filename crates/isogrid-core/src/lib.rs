//! **isogrid-core** — isometric tile grids: coordinate transforms, tile
//! picking and draw order.
//!
//! The crate computes *where* tiles go and *which* tile a screen point is
//! over. Drawing is left to the host through [`TileDrawer`].
//!
//! - [`CoordinateTransform`]: pure screen ↔ world ↔ grid conversions;
//! - [`Renderer`]: the same with the screen origin folded in, plus image
//!   placement and outline geometry;
//! - [`HitTester`]: picking that accounts for tall sprites;
//! - [`TileGrid`]: dense tile storage and spatial queries;
//! - [`RenderPass`]: back-to-front traversal feeding a [`TileDrawer`].

pub mod geom;
pub mod grid;
pub mod hit;
pub mod projection;
pub mod render_pass;
pub mod renderer;

pub use geom::{Diamond, GridPoint, GridRange, Rect, Vec2};
pub use grid::{GridConfig, GridError, TileGrid};
pub use hit::HitTester;
pub use projection::{CoordinateTransform, ProjectionError, ProjectionParams};
pub use render_pass::{DrawOrder, Highlight, HighlightKind, RenderPass, TileDrawer, TilePlacement};
pub use renderer::Renderer;
