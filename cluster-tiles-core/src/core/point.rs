//
// Copyright (c) Pirmin Kalberer. All rights reserved.
// Licensed under the MIT License. See LICENSE file in the project root for full license information.
//

//! Input points

use serde_json::Value;

pub const LATITUDE: &str = "latitude";
pub const LONGITUDE: &str = "longitude";
pub const ID: &str = "id";
pub const PROPERTY_ID: &str = "property_id";
pub const MARGIN: &str = "margin";
pub const TYPE_LOCAL: &str = "type_local";
pub const ADDRESS: &str = "address";

/// Optional attributes, carried as-is into the output.
/// `None`: column missing in source, `Some(Value::Null)`: empty cell.
#[derive(Clone, PartialEq, Debug, Default)]
pub struct PointAttrs {
    pub id: Option<Value>,
    pub margin: Option<Value>,
    pub type_local: Option<Value>,
    pub address: Option<Value>,
}

/// Geo-tagged input record
#[derive(Clone, PartialEq, Debug)]
pub struct Point {
    pub latitude: f64,
    pub longitude: f64,
    pub attrs: PointAttrs,
}

impl Point {
    pub fn new(latitude: f64, longitude: f64) -> Point {
        Point {
            latitude,
            longitude,
            attrs: PointAttrs::default(),
        }
    }
    pub fn with_id<V: Into<Value>>(mut self, id: V) -> Point {
        self.attrs.id = Some(id.into());
        self
    }
    pub fn with_margin<V: Into<Value>>(mut self, margin: V) -> Point {
        self.attrs.margin = Some(margin.into());
        self
    }
    pub fn with_type_local<V: Into<Value>>(mut self, type_local: V) -> Point {
        self.attrs.type_local = Some(type_local.into());
        self
    }
    pub fn with_address<V: Into<Value>>(mut self, address: V) -> Point {
        self.attrs.address = Some(address.into());
        self
    }
}

/// Optional columns present in the source table
#[derive(Clone, Copy, PartialEq, Eq, Debug, Default)]
pub struct SchemaFlags {
    /// `id` or `property_id` column
    pub has_id: bool,
    pub has_margin: bool,
    pub has_type: bool,
    pub has_address: bool,
}

impl SchemaFlags {
    pub fn from_columns<'a, I>(columns: I) -> SchemaFlags
    where
        I: IntoIterator<Item = &'a str>,
    {
        let mut flags = SchemaFlags::default();
        for column in columns {
            match column {
                ID | PROPERTY_ID => flags.has_id = true,
                MARGIN => flags.has_margin = true,
                TYPE_LOCAL => flags.has_type = true,
                ADDRESS => flags.has_address = true,
                _ => {}
            }
        }
        flags
    }
    pub fn all() -> SchemaFlags {
        SchemaFlags {
            has_id: true,
            has_margin: true,
            has_type: true,
            has_address: true,
        }
    }
}

/// All points of one generation run
#[derive(Clone, Debug, Default)]
pub struct PointTable {
    pub points: Vec<Point>,
    pub schema: SchemaFlags,
    /// Rows dropped because of a missing coordinate
    pub dropped: usize,
}

impl PointTable {
    pub fn new(points: Vec<Point>, schema: SchemaFlags) -> PointTable {
        PointTable {
            points,
            schema,
            dropped: 0,
        }
    }
    pub fn len(&self) -> usize {
        self.points.len()
    }
    pub fn is_empty(&self) -> bool {
        self.points.is_empty()
    }
}
