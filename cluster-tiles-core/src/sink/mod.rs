//
// Copyright (c) Pirmin Kalberer. All rights reserved.
// Licensed under the MIT License. See LICENSE file in the project root for full license information.
//

pub mod filesink;
pub mod memsink;
pub mod sink;

#[cfg(test)]
mod filesink_test;

pub use self::filesink::Filesink;
pub use self::memsink::Memsink;
pub use self::sink::Sink;
use crate::core::ApplicationCfg;
use crate::core::Config;
use std::io;

#[derive(Clone)]
pub enum Tilesink {
    Filesink(Filesink),
}

impl Sink for Tilesink {
    fn info(&self) -> String {
        match self {
            &Tilesink::Filesink(ref sink) => sink.info(),
        }
    }
    fn write(&self, path: &str, obj: &[u8]) -> Result<(), io::Error> {
        match self {
            &Tilesink::Filesink(ref sink) => sink.write(path, obj),
        }
    }
    fn exists(&self, path: &str) -> bool {
        match self {
            &Tilesink::Filesink(ref sink) => sink.exists(path),
        }
    }
}

impl<'a> Config<'a, ApplicationCfg> for Tilesink {
    fn from_config(config: &ApplicationCfg) -> Result<Self, String> {
        if config.output.base.is_empty() {
            return Err("Missing configuration entry base in [output]".to_string());
        }
        Ok(Tilesink::Filesink(Filesink::new(&config.output.base)))
    }
    fn gen_config() -> String {
        let toml = r#"
[output]
# tiles: {zoom}/{x}/{y}.json, bundled: z{zoom}.json
layout = "tiles"
base = "static_tiles"
"#;
        toml.to_string()
    }
}
