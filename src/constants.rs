/// University name stamped on every catalog record
pub const UNIVERSITY: &str = "Assam University";

/// Programme folders under the maps directory, in load order
pub const PROGRAMMES: &[&str] = &["fyug", "cbcs"];

/// Year token searched for in PDF paths
pub const YEAR_PATTERN: &str = r"20\d\d";

// ============================================================================
// Paper Codes
// ============================================================================

/// Letters marking alternate question sets ("AT"/"BT" suffixes)
pub const VARIANT_LETTERS: &[char] = &['A', 'B'];

/// Trailing marker after the variant letter
pub const VARIANT_MARKER: char = 'T';

// ============================================================================
// Default Paths
// ============================================================================

pub const CONFIG_FILE: &str = "archive.toml";
pub const MAPS_DIR: &str = "maps";
pub const PAPERS_DIR: &str = "papers";
pub const OUTPUT_FILE: &str = "papers.json";

/// Map files are read only with this extension
pub const MAP_EXTENSION: &str = "json";

/// Archive files are discovered by this extension (case-insensitive)
pub const PDF_EXTENSION: &str = "pdf";
