//
// Copyright (c) Pirmin Kalberer. All rights reserved.
// Licensed under the MIT License. See LICENSE file in the project root for full license information.
//

use regex::Regex;
use serde::Deserialize;
use std;
use std::collections::HashMap;
use std::env;
use std::error::Error;
use std::fs::File;
use std::io::prelude::*;
use tera::{Context, Tera};
use tile_grid::Extent;
use toml::Value;

pub trait Config<'a, C: Deserialize<'a>>
where
    Self: std::marker::Sized,
{
    /// Read configuration
    fn from_config(config: &C) -> Result<Self, String>;
    /// Generate configuration template
    fn gen_config() -> String;
}

#[derive(Deserialize, Clone, Debug, Default)]
pub struct ApplicationCfg {
    #[serde(default)]
    pub source: SourceCfg,
    #[serde(default)]
    pub pyramid: PyramidCfg,
    #[serde(default)]
    pub output: OutputCfg,
    pub bucket: Option<BucketCfg>,
    pub upload: Option<UploadCfg>,
    pub cors: Option<CorsCfg>,
}

#[derive(Deserialize, Clone, Debug)]
pub struct SourceCfg {
    /// Local CSV file, downloaded from `url` when missing
    #[serde(default = "default_source_path")]
    pub path: String,
    pub url: Option<String>,
}

impl Default for SourceCfg {
    fn default() -> Self {
        SourceCfg {
            path: default_source_path(),
            url: None,
        }
    }
}

#[derive(Deserialize, Clone, Debug)]
pub struct PyramidCfg {
    #[serde(default = "default_minzoom")]
    pub minzoom: u8,
    #[serde(default = "default_maxzoom")]
    pub maxzoom: u8,
    /// Zoom level from which points are passed through without clustering
    #[serde(default = "default_passthrough_zoom")]
    pub passthrough_zoom: u8,
    /// Max number of points per tile at passthrough zoom levels
    #[serde(default = "default_passthrough_limit")]
    pub passthrough_limit: usize,
    /// Regional bounds in WGS84 (Default: -5,41,10,51)
    pub extent: Option<ExtentCfg>,
}

impl Default for PyramidCfg {
    fn default() -> Self {
        PyramidCfg {
            minzoom: default_minzoom(),
            maxzoom: default_maxzoom(),
            passthrough_zoom: default_passthrough_zoom(),
            passthrough_limit: default_passthrough_limit(),
            extent: None,
        }
    }
}

#[derive(Deserialize, Clone, Debug)]
pub struct ExtentCfg {
    pub minx: f64,
    pub miny: f64,
    pub maxx: f64,
    pub maxy: f64,
}

impl From<&ExtentCfg> for Extent {
    fn from(cfg: &ExtentCfg) -> Extent {
        Extent {
            minx: cfg.minx,
            miny: cfg.miny,
            maxx: cfg.maxx,
            maxy: cfg.maxy,
        }
    }
}

#[derive(Deserialize, Clone, Debug)]
pub struct OutputCfg {
    /// `tiles` ({z}/{x}/{y}.json) or `bundled` (z{z}.json)
    #[serde(default = "default_layout")]
    pub layout: String,
    /// Output directory
    #[serde(default = "default_output_base")]
    pub base: String,
}

impl Default for OutputCfg {
    fn default() -> Self {
        OutputCfg {
            layout: default_layout(),
            base: default_output_base(),
        }
    }
}

/// S3 compatible object store
#[derive(Deserialize, Clone, Debug)]
pub struct BucketCfg {
    pub endpoint: String,
    pub bucket: String,
    pub access_key: String,
    pub secret_key: String,
    #[serde(default = "default_region")]
    pub region: String,
    pub key_prefix: Option<String>,
}

#[derive(Deserialize, Clone, Debug)]
pub struct UploadCfg {
    /// Local directory to upload (Default: output base)
    pub dir: Option<String>,
    /// Max number of concurrent uploads
    #[serde(default = "default_upload_workers")]
    pub workers: usize,
}

#[derive(Deserialize, Clone, Debug)]
pub struct CorsCfg {
    #[serde(default = "default_any")]
    pub allowed_origins: Vec<String>,
    #[serde(default = "default_cors_methods")]
    pub allowed_methods: Vec<String>,
    #[serde(default = "default_any")]
    pub allowed_headers: Vec<String>,
    #[serde(default = "default_cors_expose_headers")]
    pub expose_headers: Vec<String>,
    #[serde(default = "default_cors_max_age")]
    pub max_age_seconds: i64,
}

impl Default for CorsCfg {
    fn default() -> Self {
        CorsCfg {
            allowed_origins: default_any(),
            allowed_methods: default_cors_methods(),
            allowed_headers: default_any(),
            expose_headers: default_cors_expose_headers(),
            max_age_seconds: default_cors_max_age(),
        }
    }
}

pub fn default_source_path() -> String {
    "source_data.csv".to_string()
}
pub fn default_minzoom() -> u8 {
    6
}
pub fn default_maxzoom() -> u8 {
    14
}
pub fn default_passthrough_zoom() -> u8 {
    14
}
pub fn default_passthrough_limit() -> usize {
    500
}
pub fn default_layout() -> String {
    "tiles".to_string()
}
pub fn default_output_base() -> String {
    "static_tiles".to_string()
}
pub fn default_region() -> String {
    "auto".to_string()
}
pub fn default_upload_workers() -> usize {
    32
}
fn default_any() -> Vec<String> {
    vec!["*".to_string()]
}
fn default_cors_methods() -> Vec<String> {
    vec!["GET".to_string(), "HEAD".to_string()]
}
fn default_cors_expose_headers() -> Vec<String> {
    vec!["ETag".to_string()]
}
fn default_cors_max_age() -> i64 {
    3000
}

pub const DEFAULT_CONFIG: &'static str = r#"
[source]
path = "source_data.csv"

[pyramid]
minzoom = 6
maxzoom = 14

[output]
layout = "tiles"
base = "static_tiles"
"#;

/// Load and parse the config file into an config struct.
pub fn read_config<'a, T: Deserialize<'a>>(path: &str) -> Result<T, String> {
    let mut file = match File::open(path) {
        Ok(file) => file,
        Err(_) => {
            return Err("Could not find config file!".to_string());
        }
    };
    let mut config_toml = String::new();
    if let Err(err) = file.read_to_string(&mut config_toml) {
        return Err(format!("Error while reading config: [{}]", err));
    };

    parse_config(config_toml, path)
}

/// Parse the configuration into an config struct.
pub fn parse_config<'a, T: Deserialize<'a>>(config_toml: String, path: &str) -> Result<T, String> {
    // Check for old ${var} expressions
    let re = Regex::new(r"\$\{([[:alnum:]_]+)\}").map_err(|e| e.to_string())?;
    if re.is_match(&config_toml) {
        return Err(
            "Replace environment variable syntax ${VARNAME} with `{{env.VARNAME}}`".to_string(),
        );
    }

    // Parse template
    let mut tera = Tera::default();
    tera.add_raw_template(path, &config_toml)
        .map_err(|e| format!("Template error: {}", e))?;
    let mut context = Context::new();
    let mut env = HashMap::new();
    for (key, value) in env::vars() {
        env.insert(key, value);
    }
    context.insert("env", &env);
    let toml = tera.render(path, &context).map_err(|e| match e.source() {
        Some(source) => format!("Template error: {}", source),
        None => format!("Template error: {}", e),
    })?;

    toml.parse::<Value>()
        .and_then(|cfg| cfg.try_into::<T>())
        .map_err(|err| format!("{} - {}", path, err))
}
