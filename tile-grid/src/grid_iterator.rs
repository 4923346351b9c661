//
// Copyright (c) Pirmin Kalberer. All rights reserved.
// Licensed under the MIT License. See LICENSE file in the project root for full license information.
//

//! Tile ranges

use crate::grid::{point_to_tile, Extent, TileIndex};

/// Inclusive range of tile indices at one zoom level
#[derive(PartialEq, Clone, Debug)]
pub struct TileRange {
    pub zoom: u8,
    pub minx: u32,
    pub miny: u32,
    pub maxx: u32,
    pub maxy: u32,
}

impl TileRange {
    /// Tiles covering a geographic extent
    pub fn covering(extent: &Extent, zoom: u8) -> TileRange {
        // tile y grows southward: the north-west corner has the smallest indices
        let nw = point_to_tile(extent.maxy, extent.minx, zoom);
        let se = point_to_tile(extent.miny, extent.maxx, zoom);
        TileRange {
            zoom,
            minx: nw.x,
            miny: nw.y,
            maxx: se.x,
            maxy: se.y,
        }
    }
    /// Number of tiles in range
    pub fn len(&self) -> u64 {
        if self.is_empty() {
            return 0;
        }
        (self.maxx as u64 - self.minx as u64 + 1) * (self.maxy as u64 - self.miny as u64 + 1)
    }
    pub fn is_empty(&self) -> bool {
        self.minx > self.maxx || self.miny > self.maxy
    }
    pub fn iter(&self) -> TileRangeIter {
        TileRangeIter {
            range: self.clone(),
            x: self.minx,
            y: self.miny,
            finished: self.is_empty(),
        }
    }
}

/// Column-by-column iterator
pub struct TileRangeIter {
    range: TileRange,
    x: u32,
    y: u32,
    finished: bool,
}

impl Iterator for TileRangeIter {
    type Item = TileIndex;

    fn next(&mut self) -> Option<Self::Item> {
        if self.finished {
            return None;
        }
        let current = TileIndex::new(self.range.zoom, self.x, self.y);
        if self.y < self.range.maxy {
            self.y += 1;
        } else if self.x < self.range.maxx {
            self.x += 1;
            self.y = self.range.miny;
        } else {
            self.finished = true;
        }
        Some(current)
    }
}

#[test]
fn test_range_iter() {
    let range = TileRange {
        zoom: 2,
        minx: 1,
        miny: 0,
        maxx: 2,
        maxy: 1,
    };
    let tiles = range.iter().map(|t| (t.x, t.y)).collect::<Vec<_>>();
    assert_eq!(tiles, vec![(1, 0), (1, 1), (2, 0), (2, 1)]);
    assert_eq!(range.len(), 4);

    let single = TileRange {
        zoom: 0,
        minx: 0,
        miny: 0,
        maxx: 0,
        maxy: 0,
    };
    assert_eq!(single.iter().collect::<Vec<_>>(), vec![TileIndex::new(0, 0, 0)]);
}

#[test]
fn test_empty_range() {
    let range = TileRange {
        zoom: 3,
        minx: 4,
        miny: 0,
        maxx: 3,
        maxy: 1,
    };
    assert!(range.is_empty());
    assert_eq!(range.len(), 0);
    assert_eq!(range.iter().count(), 0);
}
