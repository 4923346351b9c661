//
// Copyright (c) Pirmin Kalberer. All rights reserved.
// Licensed under the MIT License. See LICENSE file in the project root for full license information.
//

//! Per-tile point clustering

use crate::core::config::PyramidCfg;
use crate::core::point::{Point, SchemaFlags};
use crate::core::Config;
use serde_json::Value;
use std::cmp::Ordering;
use std::collections::BTreeMap;
use tile_grid::TileBounds;

/// Sub-grid resolution for zoom levels without an explicit entry
pub const DEFAULT_RESOLUTION: u32 = 10;

/// Cell step used for tiles with zero span
pub const MIN_CELL_STEP: f64 = 0.0001;

/// Number of sub-grid cells per tile axis
pub fn resolution(zoom: u8) -> u32 {
    match zoom {
        6 => 3,
        7 => 4,
        8 => 5,
        9 => 6,
        10 => 7,
        11 => 8,
        12 => 9,
        13 => 10,
        _ => DEFAULT_RESOLUTION,
    }
}

/// Zoom-dependent clustering policy
#[derive(Clone, Debug)]
pub struct ClusterPolicy {
    /// Points are passed through unclustered from this zoom level on
    pub passthrough_zoom: u8,
    /// Max number of points per tile at passthrough zoom levels
    pub passthrough_limit: usize,
}

impl Default for ClusterPolicy {
    fn default() -> Self {
        ClusterPolicy {
            passthrough_zoom: 14,
            passthrough_limit: 500,
        }
    }
}

impl ClusterPolicy {
    pub fn is_passthrough(&self, zoom: u8) -> bool {
        zoom >= self.passthrough_zoom
    }
}

impl<'a> Config<'a, PyramidCfg> for ClusterPolicy {
    fn from_config(cfg: &PyramidCfg) -> Result<Self, String> {
        if cfg.passthrough_limit == 0 {
            return Err("passthrough_limit must be greater than 0".to_string());
        }
        Ok(ClusterPolicy {
            passthrough_zoom: cfg.passthrough_zoom,
            passthrough_limit: cfg.passthrough_limit,
        })
    }
    fn gen_config() -> String {
        let toml = r#"
#passthrough_zoom = 14
#passthrough_limit = 500
"#;
        toml.to_string()
    }
}

/// Sub-cell of a tile. Only valid together with the tile bbox and zoom it was computed for.
#[derive(PartialEq, Eq, PartialOrd, Ord, Hash, Clone, Copy, Debug)]
pub struct ClusterCell {
    pub lat_idx: i32,
    pub lon_idx: i32,
}

/// Cell dimensions of a tile sub-grid
#[derive(PartialEq, Clone, Copy, Debug)]
pub struct CellGrid {
    pub lat_min: f64,
    pub lon_min: f64,
    pub lat_step: f64,
    pub lon_step: f64,
}

impl CellGrid {
    pub fn new(bbox: &TileBounds, zoom: u8) -> CellGrid {
        let res = resolution(zoom) as f64;
        CellGrid {
            lat_min: bbox.lat_min,
            lon_min: bbox.lon_min,
            lat_step: nonzero_step(bbox.lat_span() / res),
            lon_step: nonzero_step(bbox.lon_span() / res),
        }
    }
    /// Cell of a point. Points outside of the bbox get out of range indices.
    pub fn cell(&self, lat: f64, lon: f64) -> ClusterCell {
        ClusterCell {
            lat_idx: ((lat - self.lat_min) / self.lat_step).floor() as i32,
            lon_idx: ((lon - self.lon_min) / self.lon_step).floor() as i32,
        }
    }
}

fn nonzero_step(step: f64) -> f64 {
    if step == 0.0 {
        MIN_CELL_STEP
    } else {
        step
    }
}

/// Output record: a cluster of points or a single passed through point
#[derive(Serialize, Clone, PartialEq, Debug)]
pub struct ClusterRecord {
    pub latitude: f64,
    pub longitude: f64,
    pub count: u64,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub id: Option<Value>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub margin: Option<Value>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub type_local: Option<Value>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub address: Option<Value>,
}

impl ClusterRecord {
    /// Record of a single point
    pub fn from_point(point: &Point, schema: &SchemaFlags) -> ClusterRecord {
        ClusterRecord {
            latitude: point.latitude,
            longitude: point.longitude,
            count: 1,
            id: schema_attr(schema.has_id, &point.attrs.id),
            margin: schema_attr(schema.has_margin, &point.attrs.margin),
            type_local: schema_attr(schema.has_type, &point.attrs.type_local),
            address: schema_attr(schema.has_address, &point.attrs.address),
        }
    }
}

fn schema_attr(present: bool, value: &Option<Value>) -> Option<Value> {
    if present {
        Some(value.clone().unwrap_or(Value::Null))
    } else {
        None
    }
}

/// Running aggregate of one cell
struct CellAccumulator<'a> {
    first: &'a Point,
    lat_sum: f64,
    lon_sum: f64,
    count: u64,
    margin: Option<&'a Value>,
}

impl<'a> CellAccumulator<'a> {
    fn new(point: &'a Point) -> Self {
        CellAccumulator {
            first: point,
            lat_sum: 0.0,
            lon_sum: 0.0,
            count: 0,
            margin: None,
        }
    }
    fn add(&mut self, point: &'a Point) {
        self.lat_sum += point.latitude;
        self.lon_sum += point.longitude;
        self.count += 1;
        if let Some(margin) = point.attrs.margin.as_ref() {
            if is_greater(margin, self.margin) {
                self.margin = Some(margin);
            }
        }
    }
    fn record(&self, schema: &SchemaFlags) -> ClusterRecord {
        let count = self.count as f64;
        let mut record = ClusterRecord::from_point(self.first, schema);
        record.latitude = self.lat_sum / count;
        record.longitude = self.lon_sum / count;
        record.count = self.count;
        if schema.has_margin {
            record.margin = Some(self.margin.cloned().unwrap_or(Value::Null));
        }
        record
    }
}

/// Maximum with nulls ignored
fn is_greater(value: &Value, current: Option<&Value>) -> bool {
    let current = match current {
        None | Some(Value::Null) => return !value.is_null(),
        Some(current) => current,
    };
    let ordering = match (value, current) {
        (Value::Number(a), Value::Number(b)) => a
            .as_f64()
            .zip(b.as_f64())
            .and_then(|(a, b)| a.partial_cmp(&b)),
        (Value::String(a), Value::String(b)) => Some(a.cmp(b)),
        (Value::Bool(a), Value::Bool(b)) => Some(a.cmp(b)),
        _ => None,
    };
    ordering == Some(Ordering::Greater)
}

/// Cluster the points of one tile.
///
/// At passthrough zoom levels the first `passthrough_limit` points are returned
/// unchanged with `count = 1`. Otherwise points are aggregated per sub-grid cell.
/// Records are emitted in cell order, consumers must not rely on it.
pub fn cluster(
    points: &[&Point],
    bbox: &TileBounds,
    zoom: u8,
    schema: &SchemaFlags,
    policy: &ClusterPolicy,
) -> Vec<ClusterRecord> {
    if points.is_empty() {
        return Vec::new();
    }
    if policy.is_passthrough(zoom) {
        return points
            .iter()
            .take(policy.passthrough_limit)
            .map(|point| ClusterRecord::from_point(point, schema))
            .collect();
    }

    let grid = CellGrid::new(bbox, zoom);
    let mut cells: BTreeMap<ClusterCell, CellAccumulator> = BTreeMap::new();
    for &point in points {
        cells
            .entry(grid.cell(point.latitude, point.longitude))
            .or_insert_with(|| CellAccumulator::new(point))
            .add(point);
    }
    cells.values().map(|cell| cell.record(schema)).collect()
}
