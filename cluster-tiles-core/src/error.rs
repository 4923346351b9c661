//
// Copyright (c) Pirmin Kalberer. All rights reserved.
// Licensed under the MIT License. See LICENSE file in the project root for full license information.
//

use polars::prelude::PolarsError;
use std::io;
use thiserror::Error;

/// Fatal errors of a generation run
#[derive(Debug, Error)]
pub enum Error {
    #[error("missing required column `{0}`")]
    MissingColumn(String),
    #[error("non-numeric value in column `{0}`")]
    InvalidCoordinate(String),
    #[error("error reading point table: {0}")]
    Csv(#[from] PolarsError),
    #[error("I/O error: {0}")]
    Io(#[from] io::Error),
    #[error("JSON encoding error: {0}")]
    Json(#[from] serde_json::Error),
    #[error("download of {url} failed: {source}")]
    Download {
        url: String,
        #[source]
        source: reqwest::Error,
    },
    #[error("configuration error: {0}")]
    Config(String),
}

pub type Result<T> = std::result::Result<T, Error>;
