//
// Copyright (c) Pirmin Kalberer. All rights reserved.
// Licensed under the MIT License. See LICENSE file in the project root for full license information.
//

//! CSV point table reader

use crate::core::point::{
    Point, PointAttrs, PointTable, SchemaFlags, ADDRESS, ID, LATITUDE, LONGITUDE, MARGIN,
    PROPERTY_ID, TYPE_LOCAL,
};
use crate::error::{Error, Result};
use polars::io::SerReader;
use polars::prelude::*;
use serde_json::{Number, Value};
use std::fs::File;
use std::io::Cursor;
use std::path::Path;

/// Read point table from a CSV file with header
pub fn read_points(path: &Path) -> Result<PointTable> {
    let file = File::open(path)?;
    let df = CsvReader::new(file).finish()?;
    points_from_dataframe(&df)
}

/// Read point table from CSV text
pub fn read_points_from_str(csv: &str) -> Result<PointTable> {
    let df = CsvReader::new(Cursor::new(csv.as_bytes())).finish()?;
    points_from_dataframe(&df)
}

/// Convert a data frame into points, dropping rows without coordinates.
pub fn points_from_dataframe(df: &DataFrame) -> Result<PointTable> {
    let names = df.get_column_names();
    let schema = SchemaFlags::from_columns(names.iter().map(|name| name.as_str()));
    debug!("Input columns: {:?} - {:?}", names, schema);

    let latitudes = coordinate_column(df, LATITUDE)?;
    let longitudes = coordinate_column(df, LONGITUDE)?;
    // `id` takes precedence over `property_id`
    let ids = match attribute_column(df, ID)? {
        Some(ids) => Some(ids),
        None => attribute_column(df, PROPERTY_ID)?,
    };
    let margins = attribute_column(df, MARGIN)?;
    let types = attribute_column(df, TYPE_LOCAL)?;
    let addresses = attribute_column(df, ADDRESS)?;

    let mut points = Vec::with_capacity(df.height());
    let mut dropped = 0;
    for (row, (lat, lon)) in latitudes.into_iter().zip(longitudes).enumerate() {
        match (lat, lon) {
            (Some(latitude), Some(longitude)) => points.push(Point {
                latitude,
                longitude,
                attrs: PointAttrs {
                    id: cell(&ids, row),
                    margin: cell(&margins, row),
                    type_local: cell(&types, row),
                    address: cell(&addresses, row),
                },
            }),
            _ => dropped += 1,
        }
    }
    if dropped > 0 {
        debug!("Dropped {} rows without coordinates", dropped);
    }
    Ok(PointTable {
        points,
        schema,
        dropped,
    })
}

fn cell(column: &Option<Vec<Value>>, row: usize) -> Option<Value> {
    column
        .as_ref()
        .map(|values| values.get(row).cloned().unwrap_or(Value::Null))
}

fn coordinate_column(df: &DataFrame, name: &str) -> Result<Vec<Option<f64>>> {
    let column = df
        .column(name)
        .map_err(|_| Error::MissingColumn(name.to_string()))?;
    let values = column.cast(&DataType::Float64)?;
    // empty cells are dropped later, unparsable values are fatal
    if values.null_count() > column.null_count() {
        return Err(Error::InvalidCoordinate(name.to_string()));
    }
    let coords = values.f64()?.into_iter().collect();
    Ok(coords)
}

/// Column values as JSON, `None` if the column doesn't exist
fn attribute_column(df: &DataFrame, name: &str) -> Result<Option<Vec<Value>>> {
    let column = match df.column(name) {
        Ok(column) => column,
        Err(_) => return Ok(None),
    };
    let dtype = column.dtype();
    let values: Vec<Value> = if dtype.is_integer() {
        column
            .cast(&DataType::Int64)?
            .i64()?
            .into_iter()
            .map(|v| v.map(Value::from).unwrap_or(Value::Null))
            .collect()
    } else if dtype.is_float() {
        column
            .cast(&DataType::Float64)?
            .f64()?
            .into_iter()
            .map(|v| {
                v.and_then(Number::from_f64)
                    .map(Value::Number)
                    .unwrap_or(Value::Null)
            })
            .collect()
    } else if dtype == &DataType::Boolean {
        column
            .bool()?
            .into_iter()
            .map(|v| v.map(Value::Bool).unwrap_or(Value::Null))
            .collect()
    } else {
        column
            .cast(&DataType::String)?
            .str()?
            .into_iter()
            .map(|v| v.map(|s| Value::String(s.to_string())).unwrap_or(Value::Null))
            .collect()
    };
    Ok(Some(values))
}
