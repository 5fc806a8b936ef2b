use crate::config::Config;
use crate::error::{CatalogError, Result};
use crate::loader::load_all_maps;
use crate::matcher::{base_code, CodeMatcher, Match, YearPattern};
use crate::models::{DiscoveredFile, MatchKey, PaperRecord};
use crate::scanner::discover_pdfs;
use std::collections::{HashMap, HashSet};
use std::ffi::OsString;
use std::fs;
use std::path::{Path, PathBuf};

// ============================================================================
// Grouping
// ============================================================================

/// Accumulates matches into one record per (programme, subject, base code, year).
///
/// Records keep the order in which their key was first seen.
pub struct CatalogBuilder {
    university: String,
    records: Vec<PaperRecord>,
    index: HashMap<MatchKey, usize>,
}

impl CatalogBuilder {
    pub fn new(university: impl Into<String>) -> Self {
        CatalogBuilder {
            university: university.into(),
            records: Vec::new(),
            index: HashMap::new(),
        }
    }

    /// Fold one match into the catalog.
    ///
    /// The first match for a key creates the record and fixes its `pdf`.
    /// Later matches only append codes that are not already present.
    pub fn add(&mut self, m: Match<'_>) {
        let Some(year) = m.file.year else {
            return;
        };
        let entry = m.entry;
        let key = MatchKey {
            programme: entry.programme.clone(),
            subject: entry.subject.clone(),
            base_code: base_code(&entry.paper_code),
            year,
        };

        match self.index.get(&key) {
            Some(&idx) => {
                let record = &mut self.records[idx];
                if !record.paper_codes.contains(&entry.paper_code) {
                    record.paper_codes.push(entry.paper_code.clone());
                    record.paper_names.push(entry.paper_name.clone());
                }
                if record.pdf != m.file.relative {
                    log::debug!(
                        "{} also matches {} {} ({}), keeping {}",
                        m.file.relative,
                        key.base_code,
                        year,
                        entry.programme,
                        record.pdf
                    );
                }
            }
            None => {
                self.index.insert(key, self.records.len());
                self.records.push(PaperRecord {
                    university: self.university.clone(),
                    programme: entry.programme.clone(),
                    stream: entry.stream.clone(),
                    subject: entry.subject.clone(),
                    semester: entry.semester,
                    course_type: entry.course_type.clone(),
                    tags: entry.tags.clone(),
                    paper_codes: vec![entry.paper_code.clone()],
                    paper_names: vec![entry.paper_name.clone()],
                    year,
                    pdf: m.file.relative.clone(),
                });
            }
        }
    }

    /// Records sorted newest year first; equal years keep insertion order.
    pub fn finish(self) -> Vec<PaperRecord> {
        let mut records = self.records;
        records.sort_by(|a, b| b.year.cmp(&a.year));
        records
    }
}

/// Group a stream of matches into sorted catalog records
pub fn group_matches<'a>(
    matches: impl IntoIterator<Item = Match<'a>>,
    university: &str,
) -> Vec<PaperRecord> {
    matches
        .into_iter()
        .fold(CatalogBuilder::new(university), |mut builder, m| {
            builder.add(m);
            builder
        })
        .finish()
}

// ============================================================================
// Serialization
// ============================================================================

/// Render the catalog as pretty-printed JSON with a trailing newline
pub fn render_catalog(records: &[PaperRecord]) -> Result<String> {
    let mut json = serde_json::to_string_pretty(records)?;
    json.push('\n');
    Ok(json)
}

/// Replace `path` with `content`: write a sibling temp file, then rename it over.
pub async fn write_catalog(path: &Path, content: &str) -> Result<()> {
    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        tokio::fs::create_dir_all(parent)
            .await
            .map_err(|e| CatalogError::io("create directory", parent, e))?;
    }

    let tmp_path = temp_path(path);
    tokio::fs::write(&tmp_path, content)
        .await
        .map_err(|e| CatalogError::io("write", &tmp_path, e))?;

    if let Err(e) = tokio::fs::rename(&tmp_path, path).await {
        let _ = tokio::fs::remove_file(&tmp_path).await;
        return Err(CatalogError::io("replace", path, e));
    }

    Ok(())
}

fn temp_path(path: &Path) -> PathBuf {
    let mut name: OsString = path.as_os_str().to_owned();
    name.push(".tmp");
    PathBuf::from(name)
}

// ============================================================================
// Catalog Generation
// ============================================================================

/// What a run saw and produced
#[derive(Debug, Clone, Default, PartialEq)]
pub struct CatalogSummary {
    pub map_entries: usize,
    pub pdfs_found: usize,
    pub pdfs_without_year: usize,
    /// Published paths of dated PDFs that no paper code matched
    pub unmatched_pdfs: Vec<String>,
    /// `programme/code` of declared papers with no PDF in any year
    pub unmatched_codes: Vec<String>,
    pub records: usize,
    pub written: bool,
}

/// Load maps, scan PDFs, match and group them, and (unless `write` is false)
/// replace the output file.
///
/// Any error aborts before the output is touched.
pub async fn generate_catalog(config: &Config, write: bool) -> Result<CatalogSummary> {
    let years = YearPattern::new(&config.year_pattern)?;

    let entries = load_all_maps(&config.maps_dir, &config.programmes)?;
    println!("Loaded {} papers from map files", entries.len());

    let pdfs = discover_pdfs(&config.papers_dir)?;
    println!("Found {} PDF files", pdfs.len());

    let site_root = fs::canonicalize(&config.site_root)
        .map_err(|e| CatalogError::io("resolve", &config.site_root, e))?;
    let papers_root = fs::canonicalize(&config.papers_dir)
        .map_err(|e| CatalogError::io("resolve", &config.papers_dir, e))?;

    let files: Vec<DiscoveredFile> = pdfs
        .into_iter()
        .map(|path| years.inspect(path, &site_root, &papers_root))
        .collect();

    let mut summary = CatalogSummary {
        map_entries: entries.len(),
        pdfs_found: files.len(),
        ..Default::default()
    };

    for file in files.iter().filter(|f| f.year.is_none()) {
        log::debug!("Skipping {}: no year in path", file.relative);
        summary.pdfs_without_year += 1;
    }

    let matcher = CodeMatcher::new(&entries);
    let mut matched_files: HashSet<&str> = HashSet::new();
    let mut matched_codes: HashSet<(&str, &str)> = HashSet::new();

    let matches = matcher.matches(&files).inspect(|m| {
        log::debug!("{} -> {}", m.file.relative, m.entry.paper_code);
        matched_files.insert(m.file.relative.as_str());
        matched_codes.insert((m.entry.programme.as_str(), m.entry.paper_code.as_str()));
    });
    let records = group_matches(matches, &config.university);

    for file in files
        .iter()
        .filter(|f| f.year.is_some() && !matched_files.contains(f.relative.as_str()))
    {
        log::debug!("No paper code matches {}", file.path.display());
        summary.unmatched_pdfs.push(file.relative.clone());
    }
    summary.unmatched_codes = entries
        .iter()
        .filter(|e| !matched_codes.contains(&(e.programme.as_str(), e.paper_code.as_str())))
        .map(|e| format!("{}/{}", e.programme, e.paper_code))
        .collect();
    summary.records = records.len();

    log::info!("{} dated PDFs matched no paper", summary.unmatched_pdfs.len());
    log::info!("{} paper codes have no PDF", summary.unmatched_codes.len());

    let json = render_catalog(&records)?;
    if write {
        write_catalog(&config.output, &json).await?;
        summary.written = true;
    }

    Ok(summary)
}
