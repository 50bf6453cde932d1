use std::path::{Path, PathBuf};
use std::time::Instant;

use anyhow::Result;
use ignore::Walk;
use serde::Serialize;

use crate::constants::SUPPORTED_EXTENSIONS;
use crate::coordinates::resolve_coordinates;
use crate::exif_parser::read_gps_metadata;

/// One photo pinned on the map. `Serialize` is what embeds it in the page.
#[derive(Serialize, Debug, Clone)]
pub struct PhotoRecord {
    pub name: String,
    pub path: String, // Image reference relative to the scanned root
    pub lat: f64,
    pub lng: f64,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub datetime: Option<String>,
}

/// Counters for the end-of-run report.
#[derive(Debug, Default)]
pub struct ProcessingSummary {
    pub files_checked: usize,
    pub with_gps: usize,
    pub skipped: usize,
    pub elapsed_secs: f64,
}

/// Walks `root` and collects every supported image file, in stable order so
/// reruns produce byte-identical output.
pub fn find_image_files(root: &Path) -> Vec<PathBuf> {
    let walker = Walk::new(root);
    let mut files: Vec<PathBuf> = walker
        .into_iter()
        .filter_map(|entry| entry.ok())
        .filter(|e| e.file_type().map_or(false, |ft| ft.is_file()))
        .filter(|e| !in_junk_directory(root, e.path()))
        .filter(|e| is_supported_image(e.path()))
        .map(|e| e.into_path())
        .collect();
    files.sort();
    files
}

// Exclude system directories and hidden files below the scanned root
fn in_junk_directory(root: &Path, path: &Path) -> bool {
    let relative = path.strip_prefix(root).unwrap_or(path);
    relative.components().any(|component| {
        component.as_os_str().to_str().map_or(false, |name| {
            name.starts_with('.') || name == "node_modules" || name == "target"
        })
    })
}

fn is_supported_image(path: &Path) -> bool {
    path.extension()
        .and_then(|s| s.to_str())
        .map(|s| s.to_lowercase())
        .map_or(false, |ext| SUPPORTED_EXTENSIONS.contains(&ext.as_str()))
}

/// Processes every candidate file under `root` sequentially. A file that
/// cannot be processed is reported and skipped; it never affects the rest of
/// the run.
pub fn process_directory(root: &Path) -> (Vec<PhotoRecord>, ProcessingSummary) {
    let files = find_image_files(root);
    let started = Instant::now();

    let mut records = Vec::new();
    let mut summary = ProcessingSummary {
        files_checked: files.len(),
        ..Default::default()
    };

    for path in &files {
        match process_file(path, root) {
            Ok(record) => {
                records.push(record);
                summary.with_gps += 1;
            }
            Err(err) => {
                println!("⚠️  Skipping {}: {}", path.display(), err);
                summary.skipped += 1;
            }
        }
    }

    summary.elapsed_secs = started.elapsed().as_secs_f64();
    (records, summary)
}

fn process_file(path: &Path, root: &Path) -> Result<PhotoRecord> {
    let metadata = read_gps_metadata(path);
    let Some((lat, lng)) = resolve_coordinates(&metadata) else {
        anyhow::bail!("no GPS data found");
    };

    let name = path
        .file_name()
        .and_then(|n| n.to_str())
        .ok_or_else(|| anyhow::Error::msg("invalid file name"))?;

    // Forward slashes keep the reference usable as a URL on every platform
    let relative_path = path
        .strip_prefix(root)
        .unwrap_or(path)
        .to_string_lossy()
        .replace('\\', "/");

    Ok(PhotoRecord {
        name: name.to_string(),
        path: relative_path,
        lat,
        lng,
        datetime: metadata.datetime,
    })
}
