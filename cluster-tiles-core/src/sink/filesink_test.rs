//
// Copyright (c) Pirmin Kalberer. All rights reserved.
// Licensed under the MIT License. See LICENSE file in the project root for full license information.
//

use crate::core::{parse_config, ApplicationCfg, Config};
use crate::sink::{Filesink, Memsink, Sink, Tilesink};
use std::fs;
use std::path::Path;

#[test]
fn test_filesink() {
    let dir = tempfile::tempdir().unwrap();
    let basepath = format!("{}", dir.path().join("tiles").display());

    let sink = Filesink::new(&basepath);
    let path = "10/517/355.json";
    let fullpath = format!("{}/{}", sink.basepath, path);
    let obj = r#"[{"latitude":48.0,"longitude":2.0,"count":1}]"#;

    assert!(!sink.exists(path));

    // Write creates parent directories
    sink.write(path, obj.as_bytes()).unwrap();
    assert!(Path::new(&fullpath).exists());
    assert!(sink.exists(path));
    assert_eq!(fs::read_to_string(&fullpath).unwrap(), obj);

    // Overwrite
    sink.write(path, b"[]").unwrap();
    assert_eq!(fs::read_to_string(&fullpath).unwrap(), "[]");

    assert!(sink.info().contains(&basepath));
}

#[test]
fn test_memsink() {
    let sink = Memsink::new();
    assert!(sink.is_empty());
    let shared = sink.clone();
    sink.write("z6.json", b"{}").unwrap();
    sink.write("6/32/22.json", b"[]").unwrap();
    assert_eq!(shared.len(), 2);
    assert!(shared.exists("z6.json"));
    assert!(!shared.exists("z7.json"));
    assert_eq!(shared.get("6/32/22.json"), Some(b"[]".to_vec()));
    assert_eq!(shared.paths(), vec!["6/32/22.json", "z6.json"]);
}

#[test]
fn test_sink_from_config() {
    let config: ApplicationCfg =
        parse_config("[output]\nbase = \"/tmp/out\"\n".to_string(), "").unwrap();
    match Tilesink::from_config(&config) {
        Ok(Tilesink::Filesink(sink)) => assert_eq!(sink.basepath, "/tmp/out"),
        _ => panic!("Filesink expected"),
    }

    let dir = tempfile::tempdir().unwrap();
    let base = format!("{}", dir.path().join("static_tiles").display());
    let config: ApplicationCfg =
        parse_config(format!("[output]\nbase = {:?}\n", base), "").unwrap();
    let sink = Tilesink::from_config(&config).unwrap();
    assert!(!sink.exists("z6.json"));
    sink.write("z6.json", b"{}").unwrap();
    assert!(sink.exists("z6.json"));
    assert_eq!(fs::read_to_string(dir.path().join("static_tiles").join("z6.json")).unwrap(), "{}");
    assert!(sink.info().contains(&base));

    let config: ApplicationCfg =
        parse_config("[output]\nbase = \"\"\n".to_string(), "").unwrap();
    assert!(Tilesink::from_config(&config).is_err());
}
