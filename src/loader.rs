use crate::constants::MAP_EXTENSION;
use crate::error::{CatalogError, Result};
use crate::models::{MapDocument, MetadataEntry};
use std::collections::HashSet;
use std::fs;
use std::path::{Path, PathBuf};
use walkdir::WalkDir;

/// Load every map file under `maps_dir/<programme>/` and flatten the papers.
///
/// Programmes are visited in the given order and files by name, so the
/// returned entries are stable between runs. A missing programme folder is
/// skipped; a missing `maps_dir` or a malformed file aborts the load.
pub fn load_all_maps(maps_dir: &Path, programmes: &[String]) -> Result<Vec<MetadataEntry>> {
    if !maps_dir.is_dir() {
        return Err(CatalogError::MissingMapsDir(maps_dir.display().to_string()));
    }

    let mut entries = Vec::new();

    for programme in programmes {
        let programme_dir = maps_dir.join(programme);
        if !programme_dir.is_dir() {
            log::debug!("No map folder for programme '{}'", programme);
            continue;
        }

        for path in list_map_files(&programme_dir)? {
            let doc = load_map_file(&path)?;
            let before = entries.len();
            entries.extend(flatten_map(doc, &path));
            log::debug!(
                "Loaded {} papers from {}",
                entries.len() - before,
                path.display()
            );
        }
    }

    Ok(entries)
}

/// JSON files directly inside a programme folder, sorted by file name
fn list_map_files(dir: &Path) -> Result<Vec<PathBuf>> {
    let mut files = Vec::new();

    for entry in WalkDir::new(dir)
        .min_depth(1)
        .max_depth(1)
        .sort_by_file_name()
    {
        let entry = entry.map_err(|e| CatalogError::io("read directory", dir, e.into()))?;
        let is_map = entry.file_type().is_file()
            && entry
                .path()
                .extension()
                .is_some_and(|ext| ext.eq_ignore_ascii_case(MAP_EXTENSION));
        if is_map {
            files.push(entry.into_path());
        }
    }

    Ok(files)
}

/// Parse a single map document
pub fn load_map_file(path: &Path) -> Result<MapDocument> {
    let content = fs::read_to_string(path).map_err(|e| CatalogError::io("read", path, e))?;
    serde_json::from_str(&content).map_err(|source| CatalogError::MalformedMap {
        path: path.display().to_string(),
        source,
    })
}

/// Turn a map document into entries carrying its subject, stream and programme.
fn flatten_map(doc: MapDocument, path: &Path) -> Vec<MetadataEntry> {
    let mut seen = HashSet::new();
    let mut entries = Vec::with_capacity(doc.papers.len());

    for paper in doc.papers.iter().cloned() {
        if !seen.insert(paper.paper_code.clone()) {
            log::warn!(
                "Duplicate paper code {} in {}",
                paper.paper_code,
                path.display()
            );
        }
        entries.push(MetadataEntry::from_map(&doc, paper));
    }

    entries
}
