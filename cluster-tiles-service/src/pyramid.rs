//
// Copyright (c) Pirmin Kalberer. All rights reserved.
// Licensed under the MIT License. See LICENSE file in the project root for full license information.
//

//! Clustered tile pyramid

use crate::writer::{write_level, Layout, WriteSummary};
use cluster_tiles_core::core::cluster::{cluster, ClusterPolicy, ClusterRecord};
use cluster_tiles_core::core::point::{Point, PointTable};
use cluster_tiles_core::core::stats::Statistics;
use cluster_tiles_core::core::{ApplicationCfg, Config};
use cluster_tiles_core::sink::Sink;
use cluster_tiles_core::Result;
use pbr::ProgressBar;
use std::collections::BTreeMap;
use std::io::{stderr, Stderr, Stdout};
use std::time::Instant;
use tile_grid::{point_to_tile, Extent, TileBounds, TileIndex, TileRange};

/// Regional band of the source data in WGS84
pub const REGION_EXTENT: Extent = Extent {
    minx: -5.0,
    miny: 41.0,
    maxx: 10.0,
    maxy: 51.0,
};

/// Non-empty tiles of one zoom level
pub type PyramidLevel = BTreeMap<TileIndex, Vec<ClusterRecord>>;
pub type Pyramid = BTreeMap<u8, PyramidLevel>;

#[derive(Default, Debug)]
pub struct GenerateSummary {
    pub tiles: u64,
    pub records: u64,
    pub files: WriteSummary,
    pub stats: Statistics,
}

/// Tile of a drilldown point
#[derive(Clone, Debug)]
pub struct DrilldownTile {
    pub lon: f64,
    pub lat: f64,
    pub tile: TileIndex,
    pub bounds: TileBounds,
    /// Number of records in tile, 0 if outside of the region
    pub records: usize,
}

#[derive(Clone, Debug)]
pub struct PyramidService {
    pub minzoom: u8,
    pub maxzoom: u8,
    pub extent: Extent,
    pub policy: ClusterPolicy,
}

impl Default for PyramidService {
    fn default() -> Self {
        PyramidService {
            minzoom: 6,
            maxzoom: 14,
            extent: REGION_EXTENT,
            policy: ClusterPolicy::default(),
        }
    }
}

impl PyramidService {
    /// Build all zoom levels in memory
    pub fn build(&self, table: &PointTable) -> Pyramid {
        (self.minzoom..=self.maxzoom)
            .map(|zoom| (zoom, self.build_level(table, zoom)))
            .collect()
    }
    pub fn build_level(&self, table: &PointTable, zoom: u8) -> PyramidLevel {
        self.cluster_level(table, zoom, None)
    }
    /// Points inside the region, grouped by tile in input order
    fn tile_points<'a>(
        &self,
        table: &'a PointTable,
        zoom: u8,
    ) -> BTreeMap<TileIndex, Vec<&'a Point>> {
        let mut tiles: BTreeMap<TileIndex, Vec<&Point>> = BTreeMap::new();
        for point in &table.points {
            if !self.extent.contains(point.longitude, point.latitude) {
                continue;
            }
            tiles
                .entry(point_to_tile(point.latitude, point.longitude, zoom))
                .or_insert_with(Vec::new)
                .push(point);
        }
        tiles
    }
    fn cluster_level(
        &self,
        table: &PointTable,
        zoom: u8,
        mut stats: Option<&mut Statistics>,
    ) -> PyramidLevel {
        let mut level = PyramidLevel::new();
        for (tile, points) in self.tile_points(table, zoom) {
            let records = cluster(&points, &tile.bounds(), zoom, &table.schema, &self.policy);
            if records.is_empty() {
                continue;
            }
            if let Some(ref mut stats) = stats {
                stats.add(&format!("z{}.points_per_tile", zoom), points.len() as u64);
                stats.add(&format!("z{}.records_per_tile", zoom), records.len() as u64);
            }
            level.insert(tile, records);
        }
        level
    }
    fn progress_bar(&self, msg: &str, tiles: u64) -> ProgressBar<Stdout> {
        let mut pb = ProgressBar::new(tiles);
        pb.message(msg);
        pb.show_speed = false;
        pb.show_percent = false;
        pb.show_time_left = false;
        pb
    }
    /// Build and write zoom levels one after the other
    pub fn generate<S: Sink>(
        &self,
        table: &PointTable,
        sink: &S,
        layout: Layout,
        overwrite: bool,
        progress: bool,
    ) -> Result<GenerateSummary> {
        info!("{}", sink.info());
        info!(
            "Generating zoom levels {}-{} from {} points ({:?})",
            self.minzoom,
            self.maxzoom,
            table.len(),
            layout
        );
        let mut summary = GenerateSummary::default();
        for zoom in self.minzoom..=self.maxzoom {
            let now = Instant::now();
            let range = TileRange::covering(&self.extent, zoom);
            debug!("level {}: {:?} ({} tiles)", zoom, range, range.len());
            let level = self.cluster_level(table, zoom, Some(&mut summary.stats));
            let records: u64 = level.values().map(|r| r.len() as u64).sum();

            let mut pb = if progress {
                let mut pb = self.progress_bar(&format!("Level {}: ", zoom), level.len() as u64);
                pb.tick();
                Some(pb)
            } else {
                None
            };
            let written = write_level(zoom, &level, layout, sink, overwrite, || {
                if let Some(ref mut pb) = pb {
                    pb.inc();
                }
            })?;
            if let Some(ref mut pb) = pb {
                pb.finish();
            }
            info!(
                "Level {}: {} tiles, {} records, {} files written, {} skipped, {} failed ({}ms)",
                zoom,
                level.len(),
                records,
                written.written,
                written.skipped,
                written.failed,
                now.elapsed().as_millis()
            );
            summary.tiles += level.len() as u64;
            summary.records += records;
            summary.files.add(&written);
        }
        if progress {
            println!("");
        }
        for key in summary.stats.keys() {
            info!("{}: {:?}", key, summary.stats.results(key));
        }
        Ok(summary)
    }
    fn progress_bar_drilldown(&self, zoomlevels: u8, points: u64) -> ProgressBar<Stderr> {
        let numtiles = zoomlevels as u64 * points;
        let mut pb = ProgressBar::on(stderr(), numtiles);
        pb.message("Tile ");
        pb.show_speed = false;
        pb.show_percent = false;
        pb.show_time_left = false;
        pb
    }
    /// Tiles and cluster statistics of points given as `lon1, lat1, lon2, lat2, ...`
    pub fn drilldown(
        &self,
        table: &PointTable,
        points: &[f64],
        progress: bool,
    ) -> (Vec<DrilldownTile>, Statistics) {
        let mut stats = Statistics::new();
        let mut tiles = Vec::new();
        let mut pb = self.progress_bar_drilldown(
            self.maxzoom.saturating_sub(self.minzoom) + 1,
            points.len() as u64 / 2,
        );
        for zoom in self.minzoom..=self.maxzoom {
            let level = self.cluster_level(table, zoom, None);
            for point in points.chunks(2) {
                if point.len() < 2 {
                    continue;
                }
                let (lon, lat) = (point[0], point[1]);
                let tile = point_to_tile(lat, lon, zoom);
                let records = level.get(&tile).map_or(0, |r| r.len());
                stats.add(&format!("z{}.records_per_tile", zoom), records as u64);
                tiles.push(DrilldownTile {
                    lon,
                    lat,
                    tile,
                    bounds: tile.bounds(),
                    records,
                });
                if progress {
                    pb.inc();
                }
            }
        }
        if progress {
            eprintln!("");
        }
        (tiles, stats)
    }
}

impl<'a> Config<'a, ApplicationCfg> for PyramidService {
    fn from_config(config: &ApplicationCfg) -> std::result::Result<Self, String> {
        let cfg = &config.pyramid;
        if cfg.minzoom > cfg.maxzoom {
            return Err(format!(
                "minzoom {} is greater than maxzoom {}",
                cfg.minzoom, cfg.maxzoom
            ));
        }
        let extent = cfg
            .extent
            .as_ref()
            .map(Extent::from)
            .unwrap_or(REGION_EXTENT);
        Ok(PyramidService {
            minzoom: cfg.minzoom,
            maxzoom: cfg.maxzoom,
            extent,
            policy: ClusterPolicy::from_config(cfg)?,
        })
    }
    fn gen_config() -> String {
        let mut config = r#"
[pyramid]
minzoom = 6
maxzoom = 14"#
            .to_string();
        config.push_str(&ClusterPolicy::gen_config());
        config.push_str(
            r#"# Regional bounds of the source data
#[pyramid.extent]
#minx = -5.0
#miny = 41.0
#maxx = 10.0
#maxy = 51.0
"#,
        );
        config
    }
}
