//
// Copyright (c) Pirmin Kalberer. All rights reserved.
// Licensed under the MIT License. See LICENSE file in the project root for full license information.
//

//! Source table download

use crate::error::{Error, Result};
use std::fs;
use std::path::Path;
use tempfile::NamedTempFile;

/// Download `url` to `path`. An existing file is kept unless `force` is set.
/// Returns `false` if the download was skipped.
pub fn download_file(url: &str, path: &Path, force: bool) -> Result<bool> {
    if !force && path.exists() {
        info!("Using existing file {}", path.display());
        return Ok(false);
    }
    let parent = match path.parent() {
        Some(dir) if !dir.as_os_str().is_empty() => dir,
        _ => Path::new("."),
    };
    fs::create_dir_all(parent)?;

    info!("Downloading {} to {}", url, path.display());
    let download_error = |source| Error::Download {
        url: url.to_string(),
        source,
    };
    let mut response = reqwest::blocking::get(url)
        .and_then(|resp| resp.error_for_status())
        .map_err(download_error)?;

    // partial downloads never replace the target
    let mut tmp = NamedTempFile::new_in(parent)?;
    let bytes = response.copy_to(&mut tmp).map_err(download_error)?;
    tmp.persist(path).map_err(|e| e.error)?;
    info!("Downloaded {} bytes", bytes);
    Ok(true)
}
