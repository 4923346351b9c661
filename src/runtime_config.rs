//
// Copyright (c) Pirmin Kalberer. All rights reserved.
// Licensed under the MIT License. See LICENSE file in the project root for full license information.
//

use clap::ArgMatches;
use cluster_tiles_core::bucket::S3Bucket;
use cluster_tiles_core::core::config::{ApplicationCfg, DEFAULT_CONFIG};
use cluster_tiles_core::core::{parse_config, read_config, Config};
use cluster_tiles_core::sink::Tilesink;
use cluster_tiles_service::PyramidService;
use std::fmt::Display;
use std::process;
use std::str::FromStr;

/// Print error and terminate with exit code 1
pub fn fatal<E: Display>(msg: &str, err: E) -> ! {
    println!("{} - {}", msg, err);
    process::exit(1)
}

/// Parse optional command line argument, exit on invalid values
pub fn parse_arg<T: FromStr>(args: &ArgMatches, name: &str) -> Option<T> {
    args.value_of(name).map(|s| {
        s.parse::<T>().unwrap_or_else(|_| {
            println!("Error parsing '{}' value '{}'", name, s);
            process::exit(1)
        })
    })
}

/// Configuration from file or defaults, overridden by command line arguments
pub fn config_from_args(args: &ArgMatches) -> ApplicationCfg {
    let mut config: ApplicationCfg = if let Some(cfgpath) = args.value_of("config") {
        info!("Reading configuration from '{}'", cfgpath);
        read_config(cfgpath).unwrap_or_else(|err| fatal("Error reading configuration", err))
    } else {
        parse_config(DEFAULT_CONFIG.to_string(), "")
            .unwrap_or_else(|err| fatal("Error reading configuration", err))
    };
    if let Some(path) = args.value_of("input") {
        config.source.path = path.to_string();
    }
    if let Some(url) = args.value_of("url") {
        config.source.url = Some(url.to_string());
    }
    if let Some(dir) = args.value_of("output") {
        config.output.base = dir.to_string();
    }
    if let Some(layout) = args.value_of("layout") {
        config.output.layout = layout.to_string();
    }
    if let Some(minzoom) = parse_arg(args, "minzoom") {
        config.pyramid.minzoom = minzoom;
    }
    if let Some(maxzoom) = parse_arg(args, "maxzoom") {
        config.pyramid.maxzoom = maxzoom;
    }
    config
}

pub fn gen_config() -> String {
    let toml = r#"# cluster_tiles configuration

[source]
# Local CSV file with columns latitude, longitude and optional
# id/property_id, margin, type_local, address
path = "source_data.csv"
# Downloaded when the local file doesn't exist
#url = "https://example.com/source_data.csv"
"#;
    let mut config = toml.to_string();
    config.push_str(&PyramidService::gen_config());
    config.push_str(&Tilesink::gen_config());
    config.push_str(&S3Bucket::gen_config());
    config
}

#[test]
fn test_gen_config() {
    let toml = gen_config();
    println!("{}", toml);
    assert_eq!(Some("# cluster_tiles configuration"), toml.lines().next());

    let config: ApplicationCfg = parse_config(toml, "").unwrap();
    let service = PyramidService::from_config(&config).unwrap();
    assert_eq!(service.minzoom, 6);
    assert_eq!(service.maxzoom, 14);
    assert!(Tilesink::from_config(&config).is_ok());
    assert!(config.bucket.is_none());
    assert_eq!(config.output.layout, "tiles");
}

#[test]
fn test_config_from_args() {
    use clap::App;

    let app = App::new("test").args_from_usage(
        "-c, --config=[FILE] 'Load from custom config file'
         --input=[FILE] 'Source CSV file'
         --output=[DIR] 'Output directory'
         --layout=[tiles|bundled] 'Output layout'
         --minzoom=[LEVEL] 'Minimum zoom level'",
    );
    let args = app.get_matches_from(vec![
        "",
        "--input",
        "points.csv",
        "--output",
        "/tmp/bundled",
        "--layout",
        "bundled",
        "--minzoom",
        "8",
    ]);
    let config = config_from_args(&args);
    assert_eq!(config.source.path, "points.csv");
    assert!(config.source.url.is_none());
    assert_eq!(config.output.base, "/tmp/bundled");
    assert_eq!(config.output.layout, "bundled");
    assert_eq!(config.pyramid.minzoom, 8);
    assert_eq!(config.pyramid.maxzoom, 14);
}
