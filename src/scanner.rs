use crate::constants::PDF_EXTENSION;
use crate::error::{CatalogError, Result};
use std::fs;
use std::path::{Path, PathBuf};
use walkdir::WalkDir;

/// Recursively collect every `.pdf` file (any case) under `papers_dir`.
///
/// Paths are absolute. Entries are visited sorted by file name so that the
/// discovery order, and with it the catalog, is the same on every platform.
/// Unreadable entries are logged and skipped.
pub fn discover_pdfs(papers_dir: &Path) -> Result<Vec<PathBuf>> {
    if !papers_dir.is_dir() {
        return Err(CatalogError::MissingPapersDir(papers_dir.display().to_string()));
    }
    let root =
        fs::canonicalize(papers_dir).map_err(|e| CatalogError::io("resolve", papers_dir, e))?;

    let mut files = Vec::new();
    for entry in WalkDir::new(&root).sort_by_file_name() {
        match entry {
            Ok(entry) => {
                if entry.file_type().is_file() && is_pdf(entry.path()) {
                    files.push(entry.into_path());
                }
            }
            Err(e) => log::warn!("Failed to read entry: {e}"),
        }
    }

    log::info!("Found {} PDF files under {}", files.len(), root.display());
    Ok(files)
}

fn is_pdf(path: &Path) -> bool {
    path.extension()
        .and_then(|ext| ext.to_str())
        .is_some_and(|ext| ext.eq_ignore_ascii_case(PDF_EXTENSION))
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use tempfile::TempDir;

    fn touch(path: &Path) {
        fs::create_dir_all(path.parent().expect("parent")).expect("mkdir");
        fs::write(path, b"%PDF-1.4").expect("write");
    }

    #[test]
    fn test_finds_nested_pdfs_in_name_order() {
        let temp = TempDir::new().expect("tempdir");
        let root = temp.path();
        touch(&root.join("fyug/physics/PHY_2023.pdf"));
        touch(&root.join("fyug/chemistry/CHM_2022.PDF"));
        touch(&root.join("cbcs/2019/ENG.pdf"));
        touch(&root.join("fyug/physics/notes.txt"));

        let files = discover_pdfs(root).expect("scan");
        let canonical = fs::canonicalize(root).expect("canonicalize");
        let relative: Vec<_> = files
            .iter()
            .map(|f| {
                f.strip_prefix(&canonical)
                    .expect("under root")
                    .to_string_lossy()
                    .replace('\\', "/")
            })
            .collect();

        assert_eq!(
            relative,
            vec![
                "cbcs/2019/ENG.pdf",
                "fyug/chemistry/CHM_2022.PDF",
                "fyug/physics/PHY_2023.pdf",
            ]
        );
        assert!(files.iter().all(|f| f.is_absolute()));
    }

    #[test]
    fn test_directory_named_like_pdf_is_not_a_file() {
        let temp = TempDir::new().expect("tempdir");
        fs::create_dir_all(temp.path().join("odd.pdf")).expect("mkdir");

        let files = discover_pdfs(temp.path()).expect("scan");
        assert!(files.is_empty());
    }

    #[test]
    fn test_missing_root_is_fatal() {
        let temp = TempDir::new().expect("tempdir");
        let err = discover_pdfs(&temp.path().join("papers")).unwrap_err();
        assert!(matches!(err, CatalogError::MissingPapersDir(_)));
    }
}
