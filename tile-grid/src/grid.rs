//
// Copyright (c) Pirmin Kalberer. All rights reserved.
// Licensed under the MIT License. See LICENSE file in the project root for full license information.
//

//! Spherical Mercator tile grid in XYZ adressing scheme

use std::f64::consts;
use std::fmt;

/// Geographic extent in degrees (x: longitude, y: latitude)
#[derive(PartialEq, Clone, Debug)]
pub struct Extent {
    pub minx: f64,
    pub miny: f64,
    pub maxx: f64,
    pub maxy: f64,
}

impl Extent {
    /// Inclusive containment test
    pub fn contains(&self, lon: f64, lat: f64) -> bool {
        lat >= self.miny && lat <= self.maxy && lon >= self.minx && lon <= self.maxx
    }
}

/// Tile address. `y` grows southward, `2^zoom` tiles per axis.
#[derive(PartialEq, Eq, PartialOrd, Ord, Hash, Clone, Copy, Debug)]
pub struct TileIndex {
    pub zoom: u8,
    pub x: u32,
    pub y: u32,
}

impl TileIndex {
    pub fn new(zoom: u8, x: u32, y: u32) -> TileIndex {
        TileIndex { zoom, x, y }
    }
    /// Geographic rectangle covered by this tile
    pub fn bounds(&self) -> TileBounds {
        tile_to_bbox(self.x, self.y, self.zoom)
    }
}

impl fmt::Display for TileIndex {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "{}/{}/{}", self.zoom, self.x, self.y)
    }
}

/// Geographic bounding box of a tile in degrees
#[derive(PartialEq, Clone, Copy, Debug)]
pub struct TileBounds {
    /// Southern edge
    pub lat_min: f64,
    /// Northern edge
    pub lat_max: f64,
    pub lon_min: f64,
    pub lon_max: f64,
}

impl TileBounds {
    /// Center as `(lat, lon)`. Not the Mercator center, just the midpoint in degrees.
    pub fn center(&self) -> (f64, f64) {
        (
            self.lat_min + (self.lat_max - self.lat_min) / 2.0,
            self.lon_min + (self.lon_max - self.lon_min) / 2.0,
        )
    }
    pub fn lat_span(&self) -> f64 {
        self.lat_max - self.lat_min
    }
    pub fn lon_span(&self) -> f64 {
        self.lon_max - self.lon_min
    }
    /// Inclusive containment test
    pub fn contains(&self, lat: f64, lon: f64) -> bool {
        lat >= self.lat_min && lat <= self.lat_max && lon >= self.lon_min && lon <= self.lon_max
    }
}

/// Number of tiles per axis at `zoom`
pub fn tiles_per_axis(zoom: u8) -> f64 {
    (zoom as f64).exp2()
}

/// Tile containing the point at `lat`/`lon`.
///
/// The y formula diverges at the poles. No check is done here: values
/// outside `[0, 2^zoom)` saturate in the float to integer cast, so callers
/// have to restrict latitudes beforehand.
pub fn point_to_tile(lat: f64, lon: f64, zoom: u8) -> TileIndex {
    let n = tiles_per_axis(zoom);
    let x = ((lon + 180.0) / 360.0 * n).floor();
    let lat_rad = lat * consts::PI / 180.0;
    let y = ((1.0 - (lat_rad.tan() + 1.0 / lat_rad.cos()).ln() / consts::PI) / 2.0 * n).floor();
    TileIndex {
        zoom,
        x: x as u32,
        y: y as u32,
    }
}

/// Bounding box of tile `x`/`y` at `zoom`
pub fn tile_to_bbox(x: u32, y: u32, zoom: u8) -> TileBounds {
    let n = tiles_per_axis(zoom);
    TileBounds {
        lat_min: edge_latitude(y as f64 + 1.0, n),
        lat_max: edge_latitude(y as f64, n),
        lon_min: x as f64 / n * 360.0 - 180.0,
        lon_max: (x as f64 + 1.0) / n * 360.0 - 180.0,
    }
}

/// Latitude of the northern edge of tile row `y` (inverse Gudermannian)
fn edge_latitude(y: f64, n: f64) -> f64 {
    (consts::PI * (1.0 - 2.0 * y / n)).sinh().atan().to_degrees()
}
