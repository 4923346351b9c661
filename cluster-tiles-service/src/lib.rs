//
// Copyright (c) Pirmin Kalberer. All rights reserved.
// Licensed under the MIT License. See LICENSE file in the project root for full license information.
//

#[macro_use]
extern crate log;
#[cfg(test)]
#[macro_use]
extern crate serde_json;

pub mod pyramid;
pub mod upload;
pub mod writer;

pub use crate::pyramid::{Pyramid, PyramidLevel, PyramidService};
pub use crate::writer::Layout;
