use serde::{Deserialize, Serialize};
use std::path::PathBuf;

// ============================================================================
// Map Files (maps/<programme>/*.json)
// ============================================================================

/// One authored map file: the known papers of a subject within a programme.
#[derive(Debug, Clone, Deserialize)]
pub struct MapDocument {
    pub subject: String,
    pub stream: String,
    pub programme: String,
    pub papers: Vec<MapPaper>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct MapPaper {
    pub paper_code: String,
    pub paper_name: String,
    pub semester: u32,
    pub course_type: String,
    #[serde(default)]
    pub tags: Option<Vec<String>>,
}

/// A declared paper, flattened out of its map file.
///
/// `subject`, `stream` and `programme` come from the containing document.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MetadataEntry {
    pub paper_code: String,
    pub paper_name: String,
    pub semester: u32,
    pub course_type: String,
    pub tags: Vec<String>,
    pub subject: String,
    pub stream: String,
    pub programme: String,
}

impl MetadataEntry {
    pub fn from_map(doc: &MapDocument, paper: MapPaper) -> Self {
        MetadataEntry {
            paper_code: paper.paper_code,
            paper_name: paper.paper_name,
            semester: paper.semester,
            course_type: paper.course_type,
            tags: paper.tags.unwrap_or_default(),
            subject: doc.subject.clone(),
            stream: doc.stream.clone(),
            programme: doc.programme.clone(),
        }
    }
}

// ============================================================================
// Archive Files
// ============================================================================

/// A PDF found under the papers root, with the year read from its path.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DiscoveredFile {
    /// Absolute path on disk
    pub path: PathBuf,
    /// Site-relative path with `/` separators, as published in the catalog
    pub relative: String,
    pub year: Option<u32>,
}

impl DiscoveredFile {
    /// Last component of the relative path
    pub fn file_name(&self) -> &str {
        self.relative.rsplit('/').next().unwrap_or(&self.relative)
    }
}

// ============================================================================
// Catalog
// ============================================================================

/// Grouping identity of a catalog record.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct MatchKey {
    pub programme: String,
    pub subject: String,
    pub base_code: String,
    pub year: u32,
}

/// One row of `papers.json`. Field order is the published order.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PaperRecord {
    pub university: String,
    pub programme: String,
    pub stream: String,
    pub subject: String,
    pub semester: u32,
    pub course_type: String,
    pub tags: Vec<String>,
    /// Index-aligned with `paper_names`
    pub paper_codes: Vec<String>,
    pub paper_names: Vec<String>,
    pub year: u32,
    pub pdf: String,
}
