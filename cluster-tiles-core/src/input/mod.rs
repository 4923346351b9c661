//
// Copyright (c) Pirmin Kalberer. All rights reserved.
// Licensed under the MIT License. See LICENSE file in the project root for full license information.
//

pub mod csv;
pub mod download;

#[cfg(test)]
mod csv_test;

pub use self::csv::{read_points, read_points_from_str};
pub use self::download::download_file;
