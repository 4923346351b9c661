//
// Copyright (c) Pirmin Kalberer. All rights reserved.
// Licensed under the MIT License. See LICENSE file in the project root for full license information.
//

use crate::error::Error;
use crate::input::csv::{read_points, read_points_from_str};
use std::fs;

#[test]
fn test_read_points() {
    let csv = "\
id,latitude,longitude,margin,type_local,address
1,48.0,2.0,12.5,Maison,1 rue A
2,48.01,2.01,8.0,Appartement,2 rue B
";
    let table = read_points_from_str(csv).unwrap();
    assert_eq!(table.len(), 2);
    assert_eq!(table.dropped, 0);
    assert!(table.schema.has_id);
    assert!(table.schema.has_margin);
    assert!(table.schema.has_type);
    assert!(table.schema.has_address);

    let point = &table.points[0];
    assert_eq!(point.latitude, 48.0);
    assert_eq!(point.longitude, 2.0);
    assert_eq!(point.attrs.id, Some(json!(1)));
    assert_eq!(point.attrs.margin, Some(json!(12.5)));
    assert_eq!(point.attrs.type_local, Some(json!("Maison")));
    assert_eq!(point.attrs.address, Some(json!("1 rue A")));
    assert_eq!(table.points[1].attrs.id, Some(json!(2)));
}

#[test]
fn test_read_file() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("points.csv");
    fs::write(&path, "latitude,longitude\n45.75,4.85\n").unwrap();
    let table = read_points(&path).unwrap();
    assert_eq!(table.len(), 1);
    assert_eq!(table.schema, Default::default());

    let missing = read_points(&dir.path().join("nothing.csv"));
    assert!(matches!(missing, Err(Error::Io(_))));
}

#[test]
fn test_missing_coordinate_column() {
    let result = read_points_from_str("lat,longitude\n48.0,2.0\n");
    match result {
        Err(Error::MissingColumn(name)) => assert_eq!(name, "latitude"),
        _ => panic!("expected missing column error"),
    }
    let result = read_points_from_str("latitude,lng\n48.0,2.0\n");
    assert!(matches!(result, Err(Error::MissingColumn(ref name)) if name == "longitude"));
}

#[test]
fn test_rows_without_coordinates() {
    let csv = "\
latitude,longitude,address
48.0,2.0,A
,2.1,B
48.2,,C
48.3,2.3,D
";
    let table = read_points_from_str(csv).unwrap();
    assert_eq!(table.len(), 2);
    assert_eq!(table.dropped, 2);
    assert_eq!(table.points[0].attrs.address, Some(json!("A")));
    assert_eq!(table.points[1].attrs.address, Some(json!("D")));
}

#[test]
fn test_non_numeric_coordinates() {
    let csv = "\
latitude,longitude
48.0,2.0
n/a,2.1
";
    let result = read_points_from_str(csv);
    assert!(matches!(result, Err(Error::InvalidCoordinate(ref name)) if name == "latitude"));

    let csv = "latitude,longitude,id\nforty-eight,2.0,1\nnorth,2.1,2\n";
    assert!(matches!(
        read_points_from_str(csv),
        Err(Error::InvalidCoordinate(_))
    ));

    let csv = "latitude,longitude\n48.0,east\n";
    assert!(matches!(
        read_points_from_str(csv),
        Err(Error::InvalidCoordinate(ref name)) if name == "longitude"
    ));
}

#[test]
fn test_property_id() {
    let csv = "property_id,latitude,longitude\nP-17,48.0,2.0\n";
    let table = read_points_from_str(csv).unwrap();
    assert!(table.schema.has_id);
    assert_eq!(table.points[0].attrs.id, Some(json!("P-17")));

    let csv = "property_id,id,latitude,longitude\nP-17,7,48.0,2.0\n";
    let table = read_points_from_str(csv).unwrap();
    assert_eq!(table.points[0].attrs.id, Some(json!(7)));
}

#[test]
fn test_optional_columns() {
    let csv = "\
latitude,longitude,margin
48.0,2.0,
48.1,2.1,-3
";
    let table = read_points_from_str(csv).unwrap();
    assert!(!table.schema.has_id);
    assert!(table.schema.has_margin);
    assert!(!table.schema.has_type);
    assert!(!table.schema.has_address);
    let point = &table.points[0];
    assert_eq!(point.attrs.id, None);
    assert_eq!(point.attrs.margin, Some(json!(null)));
    assert_eq!(point.attrs.address, None);
    assert_eq!(table.points[1].attrs.margin, Some(json!(-3)));
}
