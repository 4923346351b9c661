//! A library for slippy map tile grid calculations
//!
//! ## Tile index of a point
//!
//! ```rust
//! use tile_grid::{point_to_tile, TileIndex};
//!
//! let tile = point_to_tile(48.8566, 2.3522, 10);
//! assert_eq!(tile, TileIndex::new(10, 518, 352));
//! ```
//!
//! ## Tile bounds
//!
//! ```rust
//! use tile_grid::tile_to_bbox;
//!
//! let bbox = tile_to_bbox(32, 22, 6);
//! assert_eq!(bbox.lon_min, 0.0);
//! assert_eq!(bbox.lon_max, 5.625);
//! assert!(bbox.lat_min < bbox.lat_max);
//! ```
//!
//! ## Tile ranges
//!
//! ```rust
//! use tile_grid::{Extent, TileRange};
//!
//! let extent = Extent { minx: -5.0, miny: 41.0, maxx: 10.0, maxy: 51.0 };
//! let range = TileRange::covering(&extent, 6);
//! for tile in range.iter() {
//!     println!("Tile {}", tile);
//! }
//! ```

mod grid;
mod grid_iterator;
#[cfg(test)]
mod grid_test;

pub use grid::{point_to_tile, tile_to_bbox, tiles_per_axis, Extent, TileBounds, TileIndex};
pub use grid_iterator::{TileRange, TileRangeIter};
