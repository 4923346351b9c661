//
// Copyright (c) Pirmin Kalberer. All rights reserved.
// Licensed under the MIT License. See LICENSE file in the project root for full license information.
//

use crate::grid::{point_to_tile, tile_to_bbox, tiles_per_axis, Extent, TileBounds, TileIndex};
use crate::grid_iterator::TileRange;

fn assert_close(a: f64, b: f64) {
    assert!((a - b).abs() < 1e-9, "{} != {}", a, b);
}

fn region() -> Extent {
    Extent {
        minx: -5.0,
        miny: 41.0,
        maxx: 10.0,
        maxy: 51.0,
    }
}

#[test]
fn test_point_to_tile() {
    assert_eq!(point_to_tile(48.8566, 2.3522, 6), TileIndex::new(6, 32, 22));
    assert_eq!(point_to_tile(48.8566, 2.3522, 10), TileIndex::new(10, 518, 352));
    assert_eq!(
        point_to_tile(48.8566, 2.3522, 14),
        TileIndex::new(14, 8299, 5636)
    );
    assert_eq!(point_to_tile(48.0, 2.0, 10), TileIndex::new(10, 517, 355));
    assert_eq!(point_to_tile(48.01, 2.01, 10), TileIndex::new(10, 517, 355));

    // equator / greenwich
    assert_eq!(point_to_tile(0.0, 0.0, 1), TileIndex::new(1, 1, 1));
    assert_eq!(point_to_tile(0.0, -180.0, 4).x, 0);
}

#[test]
fn test_pole_saturates() {
    // ln(tan + sec) diverges at the poles; the cast saturates instead of panicking
    let north = point_to_tile(90.0, 0.0, 6);
    assert_eq!(north.x, 32);
    assert!(north.y == 0 || north.y >= tiles_per_axis(6) as u32);
}

#[test]
fn test_tile_to_bbox() {
    let bbox = tile_to_bbox(518, 352, 10);
    assert_eq!(bbox.lon_min, 2.109375);
    assert_eq!(bbox.lon_max, 2.4609375);
    assert_close(bbox.lat_min, 48.6909603909255);
    assert_close(bbox.lat_max, 48.92249926375824);

    let bbox = tile_to_bbox(517, 355, 10);
    assert_eq!(bbox.lon_min, 1.7578125);
    assert_eq!(bbox.lon_max, 2.109375);
    assert_close(bbox.lat_min, 47.98992166741417);
    assert_close(bbox.lat_max, 48.22467264956519);

    let bbox = tile_to_bbox(32, 22, 6);
    assert_eq!(bbox.lon_min, 0.0);
    assert_eq!(bbox.lon_max, 5.625);
    assert_close(bbox.lat_min, 45.089035564831015);
    assert_close(bbox.lat_max, 48.92249926375824);

    let world = tile_to_bbox(0, 0, 0);
    assert_eq!(world.lon_min, -180.0);
    assert_eq!(world.lon_max, 180.0);
    assert_close(world.lat_max, 85.0511287798066);
    assert_close(world.lat_min, -85.0511287798066);
}

#[test]
fn test_neighbour_edges_match() {
    // southern edge of row y is the northern edge of row y+1
    for y in 340..345 {
        let upper = tile_to_bbox(500, y, 10);
        let lower = tile_to_bbox(500, y + 1, 10);
        assert_eq!(upper.lat_min, lower.lat_max);
        assert!(upper.lat_min < upper.lat_max);
    }
    let west = tile_to_bbox(10, 0, 5);
    let east = tile_to_bbox(11, 0, 5);
    assert_eq!(west.lon_max, east.lon_min);
}

#[test]
fn test_center_roundtrip() {
    for zoom in 6..=14 {
        let range = TileRange::covering(&region(), zoom);
        // every tile at low zoom, a stride at high zoom
        let stride = if zoom <= 9 { 1 } else { 7 };
        for tile in range.iter().step_by(stride) {
            let TileBounds {
                lat_min,
                lat_max,
                lon_min,
                lon_max,
            } = tile.bounds();
            let (lat, lon) = tile.bounds().center();
            assert!(lat > lat_min && lat < lat_max);
            assert!(lon > lon_min && lon < lon_max);
            assert_eq!(point_to_tile(lat, lon, zoom), tile, "zoom {}", zoom);
        }
    }
}

#[test]
fn test_bounds_contain_point() {
    let points = [(48.8566, 2.3522), (43.2965, 5.3698), (47.2184, -1.5536)];
    for zoom in 6..=14 {
        for &(lat, lon) in points.iter() {
            let tile = point_to_tile(lat, lon, zoom);
            assert!(tile.bounds().contains(lat, lon), "{} {} in {}", lat, lon, tile);
        }
    }
}

#[test]
fn test_covering_range() {
    let range = TileRange::covering(&region(), 6);
    assert_eq!(
        range,
        TileRange {
            zoom: 6,
            minx: 31,
            miny: 21,
            maxx: 33,
            maxy: 23,
        }
    );
    assert_eq!(range.len(), 9);
    let tiles: Vec<TileIndex> = range.iter().collect();
    assert_eq!(tiles.len(), 9);
    assert_eq!(tiles[0], TileIndex::new(6, 31, 21));
    assert!(tiles.contains(&TileIndex::new(6, 32, 22)));
    assert!(!tiles.contains(&TileIndex::new(6, 34, 22)));

    let range = TileRange::covering(&region(), 10);
    assert_eq!((range.minx, range.miny), (497, 342));
    assert_eq!((range.maxx, range.maxy), (540, 383));
    assert_eq!(range.len(), 44 * 42);
}

#[test]
fn test_tile_display() {
    assert_eq!(TileIndex::new(10, 518, 352).to_string(), "10/518/352");
    assert!(TileIndex::new(6, 31, 23) < TileIndex::new(6, 32, 21));
    assert!(TileIndex::new(6, 40, 40) < TileIndex::new(7, 0, 0));
}

#[test]
fn test_extent_contains() {
    let extent = region();
    assert!(extent.contains(-5.0, 41.0));
    assert!(extent.contains(10.0, 51.0));
    assert!(!extent.contains(2.0, 60.0));
    assert!(!extent.contains(-5.0001, 45.0));
}
