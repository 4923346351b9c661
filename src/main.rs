//
// Copyright (c) Pirmin Kalberer. All rights reserved.
// Licensed under the MIT License. See LICENSE file in the project root for full license information.
//

#[macro_use]
extern crate clap;
#[macro_use]
extern crate log;

mod runtime_config;

use crate::runtime_config::{config_from_args, fatal, gen_config, parse_arg};
use clap::{App, AppSettings, ArgMatches, SubCommand};
use cluster_tiles_core::bucket::S3Bucket;
use cluster_tiles_core::core::config::{default_upload_workers, ApplicationCfg};
use cluster_tiles_core::core::point::PointTable;
use cluster_tiles_core::core::Config;
use cluster_tiles_core::input::{download_file, read_points};
use cluster_tiles_core::sink::Tilesink;
use cluster_tiles_service::upload::{apply_cors, upload_dir};
use cluster_tiles_service::{Layout, PyramidService};
use dotenv::dotenv;
use env_logger::Builder;
use log::Record;
use std::env;
use std::io::Write;
use std::path::Path;
use time;

fn init_logger(args: &ArgMatches<'_>) {
    let mut builder = Builder::new();
    builder.format(|buf, record: &Record<'_>| {
        let t = time::now();
        writeln!(
            buf,
            "{}.{:03} {} {}",
            time::strftime("%Y-%m-%d %H:%M:%S", &t).unwrap_or_default(),
            t.tm_nsec / 1000_000,
            record.level(),
            record.args()
        )
    });

    let rust_log_env = env::var("RUST_LOG");
    let rust_log = match (args.value_of("loglevel"), rust_log_env.as_ref()) {
        (None, Ok(rust_log)) => rust_log.as_str(),
        (loglevel, _) => match loglevel.unwrap_or("info") {
            "debug" => "debug,tokio=info,hyper=info,rusoto_core=info",
            loglevel => loglevel,
        },
    };
    builder.parse_filters(rust_log);

    builder.init();
}

/// Download (if configured) and read the source table
fn load_points(config: &ApplicationCfg, force_download: bool) -> PointTable {
    let path = Path::new(&config.source.path);
    if let Some(ref url) = config.source.url {
        if let Err(err) = download_file(url, path, force_download) {
            fatal("Error downloading source data", err);
        }
    }
    let table = read_points(path)
        .unwrap_or_else(|err| fatal(&format!("Error reading {}", path.display()), err));
    info!("Read {} points from {}", table.len(), path.display());
    if table.dropped > 0 {
        info!("Dropped {} rows without coordinates", table.dropped);
    }
    table
}

fn generate(args: &ArgMatches<'_>) {
    let config = config_from_args(args);
    let force_download = parse_arg(args, "force-download").unwrap_or(false);
    let progress = parse_arg(args, "progress").unwrap_or(true);
    let overwrite = parse_arg(args, "overwrite").unwrap_or(true);
    let service = PyramidService::from_config(&config)
        .unwrap_or_else(|err| fatal("Error reading configuration", err));
    let sink = Tilesink::from_config(&config)
        .unwrap_or_else(|err| fatal("Error reading configuration", err));
    let layout: Layout = config
        .output
        .layout
        .parse()
        .unwrap_or_else(|err| fatal("Error reading configuration", err));

    let table = load_points(&config, force_download);
    let summary = service
        .generate(&table, &sink, layout, overwrite, progress)
        .unwrap_or_else(|err| fatal("Error generating tiles", err));
    info!(
        "Generated {} tiles with {} records ({} files written, {} skipped)",
        summary.tiles, summary.records, summary.files.written, summary.files.skipped
    );
    if summary.files.failed > 0 {
        warn!("{} files could not be written", summary.files.failed);
    }
}

fn upload(args: &ArgMatches<'_>) {
    let config = config_from_args(args);
    let progress = parse_arg(args, "progress").unwrap_or(true);
    let bucket = S3Bucket::from_config(&config)
        .unwrap_or_else(|err| fatal("Error reading configuration", err));
    let dir = args
        .value_of("dir")
        .map(|dir| dir.to_string())
        .or_else(|| config.upload.as_ref().and_then(|cfg| cfg.dir.clone()))
        .unwrap_or_else(|| config.output.base.clone());
    let workers = parse_arg(args, "workers")
        .or_else(|| config.upload.as_ref().map(|cfg| cfg.workers))
        .unwrap_or_else(default_upload_workers);
    let summary = upload_dir(Path::new(&dir), &bucket, workers, progress)
        .unwrap_or_else(|err| fatal("Error uploading tiles", err));
    if summary.failed > 0 {
        warn!("{} files could not be uploaded", summary.failed);
    }
}

fn cors(args: &ArgMatches<'_>) {
    let config = config_from_args(args);
    let bucket = S3Bucket::from_config(&config)
        .unwrap_or_else(|err| fatal("Error reading configuration", err));
    let cors = config.cors.clone().unwrap_or_default();
    if let Err(err) = apply_cors(&bucket, &cors) {
        fatal("Error configuring CORS", err);
    }
}

fn drilldown(args: &ArgMatches<'_>) {
    let config = config_from_args(args);
    let progress = parse_arg(args, "progress").unwrap_or(true);
    let points: Vec<f64> = match args.value_of("points") {
        Some(numlist) => numlist
            .split(',')
            .map(|v| v.trim().parse::<f64>())
            .collect::<Result<_, _>>()
            .unwrap_or_else(|err| fatal("Error parsing 'points' as list of float values", err)),
        None => fatal("Missing argument", "--points"),
    };
    if points.len() % 2 != 0 {
        fatal("Error parsing 'points'", "expected lon,lat pairs");
    }
    let service = PyramidService::from_config(&config)
        .unwrap_or_else(|err| fatal("Error reading configuration", err));
    let table = load_points(&config, false);
    let (tiles, stats) = service.drilldown(&table, &points, progress);
    println!("lon,lat,tile,lat_min,lat_max,lon_min,lon_max,records");
    for t in &tiles {
        println!(
            "{},{},{},{:.6},{:.6},{:.6},{:.6},{}",
            t.lon,
            t.lat,
            t.tile,
            t.bounds.lat_min,
            t.bounds.lat_max,
            t.bounds.lon_min,
            t.bounds.lon_max,
            t.records
        );
    }
    println!("");
    print!("{}", stats.as_csv());
}

fn main() {
    dotenv().ok();
    // http://kbknapp.github.io/clap-rs/clap/
    let mut app = App::new("cluster_tiles")
        .version(crate_version!())
        .author("Pirmin Kalberer <pka@sourcepole.ch>")
        .about("Static clustered point tiles for slippy maps")
        .subcommand(SubCommand::with_name("generate")
                        .args_from_usage("-c, --config=[FILE] 'Load from custom config file'
                                              --loglevel=[error|warn|info|debug|trace] 'Log level (Default: info)'
                                              --input=[FILE] 'Source CSV file'
                                              --url=[URL] 'Download source CSV from URL'
                                              --force-download=[false|true] 'Download source even if the local file exists'
                                              --output=[DIR] 'Output directory'
                                              --layout=[tiles|bundled] 'Output layout (Default: tiles)'
                                              --minzoom=[LEVEL] 'Minimum zoom level'
                                              --maxzoom=[LEVEL] 'Maximum zoom level'
                                              --progress=[true|false] 'Show progress bar'
                                              --overwrite=[true|false] 'Overwrite existing tile files'")
                        .about("Generate clustered tile pyramid"))
        .subcommand(SubCommand::with_name("upload")
                        .args_from_usage("-c, --config=<FILE> 'Load from custom config file'
                                              --loglevel=[error|warn|info|debug|trace] 'Log level (Default: info)'
                                              --dir=[DIR] 'Directory to upload (Default: output base)'
                                              --workers=[NUM] 'Number of concurrent uploads'
                                              --progress=[true|false] 'Show progress bar'")
                        .about("Upload generated files to S3 compatible bucket"))
        .subcommand(SubCommand::with_name("cors")
                        .args_from_usage("-c, --config=<FILE> 'Load from custom config file'
                                              --loglevel=[error|warn|info|debug|trace] 'Log level (Default: info)'")
                        .about("Apply CORS rules to bucket"))
        .subcommand(SubCommand::with_name("drilldown")
                        .setting(AppSettings::AllowLeadingHyphen)
                        .args_from_usage("-c, --config=[FILE] 'Load from custom config file'
                                              --loglevel=[error|warn|info|debug|trace] 'Log level (Default: info)'
                                              --input=[FILE] 'Source CSV file'
                                              --minzoom=[LEVEL] 'Minimum zoom level'
                                              --maxzoom=[LEVEL] 'Maximum zoom level'
                                              --points=[lon1,lat1,lon2,lat2,..] 'Drilldown points'
                                              --progress=[true|false] 'Show progress bar'")
                        .about("Tile and cluster statistics at given points"))
        .subcommand(SubCommand::with_name("genconfig")
                        .args_from_usage("--loglevel=[error|warn|info|debug|trace] 'Log level (Default: info)'")
                        .about("Generate configuration template"));

    match app.get_matches_from_safe_borrow(env::args()) {
        //app.get_matches() prohibits later call of app.print_help()
        Result::Err(e) => {
            println!("{}", e);
        }
        Result::Ok(matches) => match matches.subcommand() {
            ("generate", Some(sub_m)) => {
                init_logger(sub_m);
                generate(sub_m);
            }
            ("upload", Some(sub_m)) => {
                init_logger(sub_m);
                upload(sub_m);
            }
            ("cors", Some(sub_m)) => {
                init_logger(sub_m);
                cors(sub_m);
            }
            ("drilldown", Some(sub_m)) => {
                init_logger(sub_m);
                drilldown(sub_m);
            }
            ("genconfig", Some(sub_m)) => {
                init_logger(sub_m);
                println!("{}", gen_config());
            }
            _ => {
                let _ = app.print_help();
                println!("");
            }
        },
    }
}
