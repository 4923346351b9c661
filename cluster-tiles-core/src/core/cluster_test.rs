//
// Copyright (c) Pirmin Kalberer. All rights reserved.
// Licensed under the MIT License. See LICENSE file in the project root for full license information.
//

use crate::core::cluster::{
    cluster, resolution, CellGrid, ClusterCell, ClusterPolicy, ClusterRecord, MIN_CELL_STEP,
};
use crate::core::point::{Point, SchemaFlags};
use tile_grid::{point_to_tile, tile_to_bbox, TileBounds};

fn refs(points: &[Point]) -> Vec<&Point> {
    points.iter().collect()
}

fn grid_points(bbox: &TileBounds, rows: usize, cols: usize) -> Vec<Point> {
    let mut points = Vec::new();
    for r in 0..rows {
        for c in 0..cols {
            let lat = bbox.lat_min + bbox.lat_span() * (r as f64 + 0.5) / rows as f64;
            let lon = bbox.lon_min + bbox.lon_span() * (c as f64 + 0.5) / cols as f64;
            points.push(Point::new(lat, lon).with_id((r * cols + c) as i64));
        }
    }
    points
}

#[test]
fn test_resolution_table() {
    let table: Vec<u32> = (6..=13).map(resolution).collect();
    assert_eq!(table, vec![3, 4, 5, 6, 7, 8, 9, 10]);
    assert_eq!(resolution(5), 10);
    assert_eq!(resolution(14), 10);
    assert_eq!(resolution(0), 10);
}

#[test]
fn test_empty_tile() {
    let bbox = tile_to_bbox(517, 355, 10);
    let policy = ClusterPolicy::default();
    assert!(cluster(&[], &bbox, 10, &SchemaFlags::all(), &policy).is_empty());
    assert!(cluster(&[], &bbox, 14, &SchemaFlags::all(), &policy).is_empty());
}

#[test]
fn test_single_point() {
    let point = Point::new(48.0, 2.0).with_id(1);
    let schema = SchemaFlags {
        has_id: true,
        ..Default::default()
    };
    for zoom in 6..=14 {
        let tile = point_to_tile(point.latitude, point.longitude, zoom);
        let records = cluster(
            &[&point],
            &tile.bounds(),
            zoom,
            &schema,
            &ClusterPolicy::default(),
        );
        assert_eq!(
            records,
            vec![ClusterRecord {
                latitude: 48.0,
                longitude: 2.0,
                count: 1,
                id: Some(json!(1)),
                margin: None,
                type_local: None,
                address: None,
            }],
            "zoom {}",
            zoom
        );
    }
}

#[test]
fn test_scenario_zoom10() {
    let points = vec![
        Point::new(48.0, 2.0).with_id(1),
        Point::new(48.01, 2.01).with_id(2),
    ];
    let tile = point_to_tile(48.0, 2.0, 10);
    let bbox = tile.bounds();
    let grid = CellGrid::new(&bbox, 10);
    assert_eq!(grid.lat_step, bbox.lat_span() / 7.0);
    assert_eq!(grid.lon_step, bbox.lon_span() / 7.0);
    assert_eq!(grid.cell(48.0, 2.0), ClusterCell { lat_idx: 0, lon_idx: 4 });
    assert_eq!(
        grid.cell(48.01, 2.01),
        ClusterCell { lat_idx: 0, lon_idx: 5 }
    );

    let schema = SchemaFlags {
        has_id: true,
        ..Default::default()
    };
    let records = cluster(&refs(&points), &bbox, 10, &schema, &ClusterPolicy::default());
    assert_eq!(records.len(), 2);
    assert_eq!(records[0].id, Some(json!(1)));
    assert_eq!(records[1].id, Some(json!(2)));
    assert!(records.iter().all(|r| r.count == 1));

    // a third point joins the first cell
    let mut points = points;
    points.push(Point::new(48.02, 2.0).with_id(3));
    let records = cluster(&refs(&points), &bbox, 10, &schema, &ClusterPolicy::default());
    assert_eq!(records.len(), 2);
    assert_eq!(records[0].count, 2);
    assert_eq!(records[0].id, Some(json!(1)));
    assert_eq!(records[0].latitude, (48.0 + 48.02) / 2.0);
    assert_eq!(records[0].longitude, 2.0);
}

#[test]
fn test_count_conservation() {
    for zoom in 6..=13 {
        let tile = point_to_tile(46.5, 3.3, zoom);
        let bbox = tile.bounds();
        let points = grid_points(&bbox, 13, 11);
        let records = cluster(
            &refs(&points),
            &bbox,
            zoom,
            &SchemaFlags::all(),
            &ClusterPolicy::default(),
        );
        let total: u64 = records.iter().map(|r| r.count).sum();
        assert_eq!(total, points.len() as u64, "zoom {}", zoom);
        let r = resolution(zoom) as usize;
        assert_eq!(records.len(), r * r, "zoom {}", zoom);
        for record in &records {
            assert!(record.count >= 1);
            assert!(bbox.contains(record.latitude, record.longitude));
        }
    }
}

#[test]
fn test_passthrough_cap() {
    let tile = point_to_tile(45.75, 4.85, 14);
    let bbox = tile.bounds();
    let policy = ClusterPolicy::default();
    let schema = SchemaFlags::default();

    let points = grid_points(&bbox, 30, 20);
    assert_eq!(points.len(), 600);
    let records = cluster(&refs(&points), &bbox, 14, &schema, &policy);
    assert_eq!(records.len(), 500);
    // first points in input order, unchanged
    for (record, point) in records.iter().zip(points.iter()) {
        assert_eq!(record.latitude, point.latitude);
        assert_eq!(record.longitude, point.longitude);
        assert_eq!(record.count, 1);
        assert_eq!(record.id, None);
    }

    let points = grid_points(&bbox, 10, 10);
    let records = cluster(&refs(&points), &bbox, 15, &schema, &policy);
    assert_eq!(records.len(), 100);

    let points = grid_points(&bbox, 25, 20);
    assert_eq!(cluster(&refs(&points), &bbox, 14, &schema, &policy).len(), 500);
}

#[test]
fn test_custom_policy() {
    let tile = point_to_tile(45.75, 4.85, 12);
    let bbox = tile.bounds();
    let policy = ClusterPolicy {
        passthrough_zoom: 12,
        passthrough_limit: 3,
    };
    let points = grid_points(&bbox, 2, 2);
    let records = cluster(&refs(&points), &bbox, 12, &SchemaFlags::default(), &policy);
    assert_eq!(records.len(), 3);
    let records = cluster(&refs(&points), &bbox, 11, &SchemaFlags::default(), &policy);
    assert_eq!(records.iter().map(|r| r.count).sum::<u64>(), 4);
}

#[test]
fn test_attribute_aggregation() {
    let tile = point_to_tile(44.84, -0.58, 8);
    let bbox = tile.bounds();
    let (lat, lon) = bbox.center();
    let points = vec![
        Point::new(lat, lon)
            .with_id("a")
            .with_margin(json!(null))
            .with_type_local("Maison")
            .with_address("1 rue A"),
        Point::new(lat + 1e-6, lon + 1e-6)
            .with_id("b")
            .with_margin(12.5)
            .with_type_local("Appartement")
            .with_address("2 rue B"),
        Point::new(lat - 1e-6, lon - 1e-6)
            .with_id("c")
            .with_margin(30)
            .with_type_local(json!(null))
            .with_address("3 rue C"),
        Point::new(lat, lon + 2e-6)
            .with_id("d")
            .with_margin(-4)
            .with_type_local("Maison")
            .with_address("4 rue D"),
    ];
    let records = cluster(
        &refs(&points),
        &bbox,
        8,
        &SchemaFlags::all(),
        &ClusterPolicy::default(),
    );
    assert_eq!(records.len(), 1);
    let record = &records[0];
    assert_eq!(record.count, 4);
    assert_eq!(record.id, Some(json!("a")));
    assert_eq!(record.margin, Some(json!(30)));
    assert_eq!(record.type_local, Some(json!("Maison")));
    assert_eq!(record.address, Some(json!("1 rue A")));
}

#[test]
fn test_margin_all_null() {
    let tile = point_to_tile(44.84, -0.58, 9);
    let bbox = tile.bounds();
    let (lat, lon) = bbox.center();
    let points = vec![
        Point::new(lat, lon).with_margin(json!(null)),
        Point::new(lat, lon).with_margin(json!(null)),
    ];
    let schema = SchemaFlags {
        has_margin: true,
        ..Default::default()
    };
    let records = cluster(&refs(&points), &bbox, 9, &schema, &ClusterPolicy::default());
    assert_eq!(records.len(), 1);
    assert_eq!(records[0].margin, Some(json!(null)));
}

#[test]
fn test_schema_omits_absent_columns() {
    let tile = point_to_tile(43.6, 1.44, 11);
    let bbox = tile.bounds();
    let points = grid_points(&bbox, 4, 4);
    let records = cluster(
        &refs(&points),
        &bbox,
        11,
        &SchemaFlags::default(),
        &ClusterPolicy::default(),
    );
    let json = serde_json::to_string(&records).unwrap();
    assert!(!json.contains("\"id\""));
    assert!(!json.contains("\"margin\""));
    assert!(json.contains("\"count\":1"));

    // column present but cell empty
    let schema = SchemaFlags {
        has_address: true,
        ..Default::default()
    };
    let point = Point::new(43.6, 1.44);
    let records = cluster(&[&point], &bbox, 11, &schema, &ClusterPolicy::default());
    assert_eq!(
        serde_json::to_string(&records).unwrap(),
        r#"[{"latitude":43.6,"longitude":1.44,"count":1,"address":null}]"#
    );
}

#[test]
fn test_degenerate_bbox() {
    let bbox = TileBounds {
        lat_min: 45.0,
        lat_max: 45.0,
        lon_min: 3.0,
        lon_max: 3.0,
    };
    let grid = CellGrid::new(&bbox, 10);
    assert_eq!(grid.lat_step, MIN_CELL_STEP);
    assert_eq!(grid.lon_step, MIN_CELL_STEP);
    let points = vec![Point::new(45.0, 3.0), Point::new(45.00005, 3.00005)];
    let records = cluster(
        &refs(&points),
        &bbox,
        10,
        &SchemaFlags::default(),
        &ClusterPolicy::default(),
    );
    assert_eq!(records.len(), 1);
    assert_eq!(records[0].count, 2);
}

#[test]
fn test_out_of_bbox_points() {
    let bbox = tile_to_bbox(517, 355, 10);
    let grid = CellGrid::new(&bbox, 10);
    let cell = grid.cell(bbox.lat_min - grid.lat_step / 2.0, bbox.lon_min - grid.lon_step * 1.5);
    assert_eq!(cell, ClusterCell { lat_idx: -1, lon_idx: -2 });
    let outside = Point::new(bbox.lat_max + 1.0, bbox.lon_min);
    let records = cluster(
        &[&outside],
        &bbox,
        10,
        &SchemaFlags::default(),
        &ClusterPolicy::default(),
    );
    assert_eq!(records.len(), 1);
}

#[test]
fn test_deterministic_order() {
    let tile = point_to_tile(47.2, -1.55, 12);
    let bbox = tile.bounds();
    let mut points = grid_points(&bbox, 9, 9);
    let first = cluster(
        &refs(&points),
        &bbox,
        12,
        &SchemaFlags::all(),
        &ClusterPolicy::default(),
    );
    let again = cluster(
        &refs(&points),
        &bbox,
        12,
        &SchemaFlags::all(),
        &ClusterPolicy::default(),
    );
    assert_eq!(first, again);
    // cell order doesn't depend on input order
    points.reverse();
    let reversed = cluster(
        &refs(&points),
        &bbox,
        12,
        &SchemaFlags::default(),
        &ClusterPolicy::default(),
    );
    let key = |r: &ClusterRecord| (r.latitude, r.longitude);
    assert_eq!(
        first.iter().map(key).collect::<Vec<_>>(),
        reversed.iter().map(key).collect::<Vec<_>>()
    );
}
