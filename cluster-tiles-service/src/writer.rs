//
// Copyright (c) Pirmin Kalberer. All rights reserved.
// Licensed under the MIT License. See LICENSE file in the project root for full license information.
//

//! Serialization of pyramid levels into static JSON files

use crate::pyramid::PyramidLevel;
use cluster_tiles_core::core::cluster::ClusterRecord;
use cluster_tiles_core::sink::Sink;
use cluster_tiles_core::Result;
use std::collections::BTreeMap;
use std::str::FromStr;
use tile_grid::TileIndex;

/// Output file layout
#[derive(Clone, Copy, PartialEq, Eq, Debug)]
pub enum Layout {
    /// One file per tile: `{zoom}/{x}/{y}.json`
    Tiles,
    /// One file per zoom level: `z{zoom}.json`, keyed by `"{x},{y}"`
    Bundled,
}

impl FromStr for Layout {
    type Err = String;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s {
            "tiles" => Ok(Layout::Tiles),
            "bundled" => Ok(Layout::Bundled),
            _ => Err(format!(
                "Unknown output layout '{}' (expected 'tiles' or 'bundled')",
                s
            )),
        }
    }
}

pub fn tile_path(tile: &TileIndex) -> String {
    format!("{}/{}/{}.json", tile.zoom, tile.x, tile.y)
}

pub fn bundle_path(zoom: u8) -> String {
    format!("z{}.json", zoom)
}

pub fn bundle_key(tile: &TileIndex) -> String {
    format!("{},{}", tile.x, tile.y)
}

#[derive(Clone, Copy, PartialEq, Eq, Default, Debug)]
pub struct WriteSummary {
    pub written: u64,
    pub skipped: u64,
    pub failed: u64,
}

impl WriteSummary {
    pub fn add(&mut self, other: &WriteSummary) {
        self.written += other.written;
        self.skipped += other.skipped;
        self.failed += other.failed;
    }
}

/// Write all tiles of a level. Failed writes are logged and counted.
/// `tick` is called once per tile.
pub fn write_level<S, F>(
    zoom: u8,
    level: &PyramidLevel,
    layout: Layout,
    sink: &S,
    overwrite: bool,
    mut tick: F,
) -> Result<WriteSummary>
where
    S: Sink,
    F: FnMut(),
{
    let mut summary = WriteSummary::default();
    match layout {
        Layout::Tiles => {
            for (tile, records) in level {
                let path = tile_path(tile);
                if !overwrite && sink.exists(&path) {
                    debug!("{} - Skipping existing tile", path);
                    summary.skipped += 1;
                } else {
                    let json = serde_json::to_vec(records)?;
                    store(sink, &path, &json, &mut summary);
                }
                tick();
            }
        }
        Layout::Bundled => {
            let bundle: BTreeMap<String, &Vec<ClusterRecord>> = level
                .iter()
                .map(|(tile, records)| (bundle_key(tile), records))
                .collect();
            let json = serde_json::to_vec(&bundle)?;
            store(sink, &bundle_path(zoom), &json, &mut summary);
            for _ in level {
                tick();
            }
        }
    }
    Ok(summary)
}

fn store<S: Sink>(sink: &S, path: &str, json: &[u8], summary: &mut WriteSummary) {
    match sink.write(path, json) {
        Ok(_) => summary.written += 1,
        Err(ioerr) => {
            error!("Error writing {}: {}", path, ioerr);
            summary.failed += 1;
        }
    }
}
