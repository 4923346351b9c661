//
// Copyright (c) Pirmin Kalberer. All rights reserved.
// Licensed under the MIT License. See LICENSE file in the project root for full license information.
//

use crate::sink::sink::Sink;
use std::collections::BTreeMap;
use std::io;
use std::sync::{Arc, Mutex};

/// In-memory sink. Clones share their content.
#[derive(Clone, Default)]
pub struct Memsink {
    objects: Arc<Mutex<BTreeMap<String, Vec<u8>>>>,
}

impl Memsink {
    pub fn new() -> Memsink {
        Memsink::default()
    }
    /// Written paths in sorted order
    pub fn paths(&self) -> Vec<String> {
        match self.objects.lock() {
            Ok(objects) => objects.keys().cloned().collect(),
            Err(_) => Vec::new(),
        }
    }
    pub fn get(&self, path: &str) -> Option<Vec<u8>> {
        self.objects
            .lock()
            .ok()
            .and_then(|objects| objects.get(path).cloned())
    }
    pub fn len(&self) -> usize {
        self.objects.lock().map(|o| o.len()).unwrap_or(0)
    }
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

impl Sink for Memsink {
    fn info(&self) -> String {
        "In-memory tile output".to_string()
    }
    fn write(&self, path: &str, obj: &[u8]) -> Result<(), io::Error> {
        let mut objects = self
            .objects
            .lock()
            .map_err(|e| io::Error::new(io::ErrorKind::Other, e.to_string()))?;
        objects.insert(path.to_string(), obj.to_vec());
        Ok(())
    }
    fn exists(&self, path: &str) -> bool {
        self.objects
            .lock()
            .map(|o| o.contains_key(path))
            .unwrap_or(false)
    }
}
