//
// Copyright (c) Pirmin Kalberer. All rights reserved.
// Licensed under the MIT License. See LICENSE file in the project root for full license information.
//

use crate::sink::sink::Sink;
use std::fs::{self, File};
use std::io::{self, Write};
use std::path::Path;

/// Directory tree below `basepath`
#[derive(Clone)]
pub struct Filesink {
    pub basepath: String,
}

impl Filesink {
    pub fn new(basepath: &str) -> Filesink {
        Filesink {
            basepath: basepath.to_string(),
        }
    }
    fn fullpath(&self, path: &str) -> String {
        format!("{}/{}", self.basepath, path)
    }
}

impl Sink for Filesink {
    fn info(&self) -> String {
        format!("Tile output directory: {}", self.basepath)
    }
    fn write(&self, path: &str, obj: &[u8]) -> Result<(), io::Error> {
        let fullpath = self.fullpath(path);
        debug!("Filesink.write {}", fullpath);
        let p = Path::new(&fullpath);
        if let Some(dir) = p.parent() {
            fs::create_dir_all(dir)?;
        }
        let mut f = File::create(&fullpath)?;
        f.write_all(obj)
    }

    fn exists(&self, path: &str) -> bool {
        Path::new(&self.fullpath(path)).exists()
    }
}
