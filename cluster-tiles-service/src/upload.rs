//
// Copyright (c) Pirmin Kalberer. All rights reserved.
// Licensed under the MIT License. See LICENSE file in the project root for full license information.
//

//! Publishing of generated files to an S3 compatible bucket

use cluster_tiles_core::bucket::{S3Bucket, JSON_CONTENT_TYPE};
use cluster_tiles_core::core::config::CorsCfg;
use cluster_tiles_core::Result;
use pbr::ProgressBar;
use std::cmp;
use std::path::{Path, PathBuf};
use tokio::task;
use walkdir::WalkDir;

#[derive(Clone, Copy, PartialEq, Eq, Default, Debug)]
pub struct UploadSummary {
    pub uploaded: u64,
    pub failed: u64,
}

impl UploadSummary {
    fn count(&mut self, result: std::result::Result<bool, task::JoinError>) {
        match result {
            Ok(true) => self.uploaded += 1,
            Ok(false) => self.failed += 1,
            Err(e) => {
                error!("Upload task failed: {}", e);
                self.failed += 1;
            }
        }
    }
}

/// Files below `dir` with their `/` separated relative path, sorted by path
pub fn collect_files(dir: &Path) -> Vec<(PathBuf, String)> {
    let mut files = Vec::new();
    for entry in WalkDir::new(dir).sort_by_file_name() {
        let entry = match entry {
            Ok(entry) => entry,
            Err(e) => {
                warn!("Skipping unreadable entry: {}", e);
                continue;
            }
        };
        if !entry.file_type().is_file() {
            continue;
        }
        if let Ok(rel) = entry.path().strip_prefix(dir) {
            let rel_path = rel
                .components()
                .map(|c| c.as_os_str().to_string_lossy())
                .collect::<Vec<_>>()
                .join("/");
            files.push((entry.path().to_path_buf(), rel_path));
        }
    }
    files
}

/// Upload all files below `dir` with at most `workers` concurrent requests.
/// Failed uploads are logged and counted, never retried.
pub fn upload_dir(
    dir: &Path,
    bucket: &S3Bucket,
    workers: usize,
    progress: bool,
) -> Result<UploadSummary> {
    let files = collect_files(dir);
    info!("{}", bucket.info());
    info!("Uploading {} files from {}", files.len(), dir.display());
    let rt = tokio::runtime::Runtime::new()?;
    let summary = rt.block_on(upload_files(files, bucket, workers, progress));
    if progress {
        println!("");
    }
    info!(
        "Upload finished: {} uploaded, {} failed",
        summary.uploaded, summary.failed
    );
    Ok(summary)
}

async fn upload_files(
    files: Vec<(PathBuf, String)>,
    bucket: &S3Bucket,
    workers: usize,
    progress: bool,
) -> UploadSummary {
    let task_queue_size = cmp::max(workers, 1);
    let mut tasks = Vec::with_capacity(task_queue_size);
    let mut summary = UploadSummary::default();
    let mut pb = ProgressBar::new(files.len() as u64);
    pb.message("Upload: ");
    pb.show_speed = false;
    pb.show_percent = false;
    pb.show_time_left = false;

    for (path, key) in files {
        let bucket = bucket.clone();
        tasks.push(task::spawn(async move {
            let obj = match tokio::fs::read(&path).await {
                Ok(obj) => obj,
                Err(ioerr) => {
                    error!("Error reading {}: {}", path.display(), ioerr);
                    return false;
                }
            };
            match bucket.put(&key, obj, JSON_CONTENT_TYPE).await {
                Ok(_) => {
                    debug!("Uploaded {}", bucket.key(&key));
                    true
                }
                Err(e) => {
                    error!("Error uploading {}: {}", key, e);
                    false
                }
            }
        }));
        if tasks.len() >= task_queue_size {
            let (result, remaining) = await_one_task(tasks).await;
            tasks = remaining;
            summary.count(result);
            if progress {
                pb.inc();
            }
        }
    }
    // Finish remaining tasks
    for result in futures_util::future::join_all(tasks).await {
        summary.count(result);
        if progress {
            pb.inc();
        }
    }
    summary
}

async fn await_one_task<T>(
    tasks: Vec<task::JoinHandle<T>>,
) -> (
    std::result::Result<T, task::JoinError>,
    Vec<task::JoinHandle<T>>,
) {
    let (result, _index, remaining) = futures_util::future::select_all(tasks).await;
    (result, remaining)
}

/// Replace the CORS rules of the bucket. Failures are logged, not returned.
pub fn apply_cors(bucket: &S3Bucket, cors: &CorsCfg) -> Result<bool> {
    let rt = tokio::runtime::Runtime::new()?;
    match rt.block_on(bucket.apply_cors(cors)) {
        Ok(_) => {
            info!(
                "CORS configured for {}: origins {:?}, methods {:?}",
                bucket.info(),
                cors.allowed_origins,
                cors.allowed_methods
            );
            Ok(true)
        }
        Err(e) => {
            error!("Error configuring CORS for {}: {}", bucket.info(), e);
            Ok(false)
        }
    }
}
