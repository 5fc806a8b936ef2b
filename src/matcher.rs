use crate::constants::{VARIANT_LETTERS, VARIANT_MARKER};
use crate::error::Result;
use crate::models::{DiscoveredFile, MetadataEntry};
use regex::Regex;
use std::path::{Component, Path, PathBuf};

// ============================================================================
// Code Normalization
// ============================================================================

/// Keep ASCII letters and digits only, upper-cased.
///
/// `"phy-dsc 453 (AT)"` becomes `"PHYDSC453AT"`.
pub fn normalize(text: &str) -> String {
    text.chars()
        .filter(char::is_ascii_alphanumeric)
        .map(|c| c.to_ascii_uppercase())
        .collect()
}

/// Token searched for inside a normalized file name: the normalized code
/// with one trailing `T` removed.
pub fn match_code(paper_code: &str) -> String {
    let code = normalize(paper_code);
    match code.strip_suffix(VARIANT_MARKER) {
        Some(stripped) => stripped.to_string(),
        None => code,
    }
}

/// Grouping code: the normalized code without an `AT`/`BT` variant suffix.
///
/// A code that is nothing but the suffix is kept whole.
pub fn base_code(paper_code: &str) -> String {
    let code = normalize(paper_code);
    let mut tail = code.chars().rev();
    let is_variant = code.len() > 2
        && tail.next() == Some(VARIANT_MARKER)
        && tail.next().is_some_and(|c| VARIANT_LETTERS.contains(&c));

    if is_variant {
        code[..code.len() - 2].to_string()
    } else {
        code
    }
}

// ============================================================================
// Years and Paths
// ============================================================================

/// Finds the year token in a PDF path.
#[derive(Debug, Clone)]
pub struct YearPattern {
    re: Regex,
}

impl YearPattern {
    pub fn new(pattern: &str) -> Result<Self> {
        Ok(YearPattern {
            re: Regex::new(pattern)?,
        })
    }

    /// First match anywhere in `text`, if it parses as a number
    pub fn find(&self, text: &str) -> Option<u32> {
        self.re.find(text)?.as_str().parse().ok()
    }

    /// Describe a discovered PDF: its published path and year.
    ///
    /// Inside the site the year is read from the site-relative path, so the
    /// checkout's own location never contributes one. An archive kept outside
    /// the site is searched along its full path.
    pub fn inspect(&self, path: PathBuf, site_root: &Path, papers_root: &Path) -> DiscoveredFile {
        let relative = publish_path(&path, site_root, papers_root);
        let year = if path.starts_with(site_root) {
            self.find(&relative)
        } else {
            self.find(&slash_path(&path))
        };
        DiscoveredFile {
            path,
            relative,
            year,
        }
    }
}

/// Path relative to the site root with `/` separators.
///
/// A file outside the site is made relative to the parent of the papers
/// root, so the archive folder itself stays in the published path.
pub fn publish_path(path: &Path, site_root: &Path, papers_root: &Path) -> String {
    let archive_base = papers_root.parent().unwrap_or(papers_root);
    let relative = path
        .strip_prefix(site_root)
        .or_else(|_| path.strip_prefix(archive_base))
        .unwrap_or(path);

    slash_path(relative)
}

fn slash_path(path: &Path) -> String {
    path.components()
        .filter_map(|component| match component {
            Component::Normal(part) => Some(part.to_string_lossy()),
            _ => None,
        })
        .collect::<Vec<_>>()
        .join("/")
}

// ============================================================================
// Matching
// ============================================================================

/// A PDF that belongs to a declared paper.
#[derive(Debug, Clone, Copy)]
pub struct Match<'a> {
    pub file: &'a DiscoveredFile,
    pub entry: &'a MetadataEntry,
}

/// Matches file names against the declared paper codes.
///
/// Matching is a plain substring test on normalized text, so spacing and
/// punctuation in file names do not matter. It over-matches: a file name that
/// happens to contain another paper's code is attributed to that paper too.
pub struct CodeMatcher<'a> {
    codes: Vec<(String, &'a MetadataEntry)>,
}

impl<'a> CodeMatcher<'a> {
    pub fn new(entries: &'a [MetadataEntry]) -> Self {
        let codes = entries
            .iter()
            .filter_map(|entry| {
                let code = match_code(&entry.paper_code);
                // An empty token is a substring of every file name; such an
                // entry is left out of matching rather than claiming every PDF.
                if code.is_empty() {
                    log::warn!(
                        "Skipping paper '{}' ({}/{}): empty paper code",
                        entry.paper_name,
                        entry.programme,
                        entry.subject
                    );
                    None
                } else {
                    Some((code, entry))
                }
            })
            .collect();

        CodeMatcher { codes }
    }

    /// Every (file, entry) pair, files in the given order and entries in
    /// load order within each file. Files without a year never match.
    pub fn matches(
        &'a self,
        files: &'a [DiscoveredFile],
    ) -> impl Iterator<Item = Match<'a>> + 'a {
        files
            .iter()
            .filter(|file| file.year.is_some())
            .flat_map(move |file| {
                let token = normalize(file.file_name());
                self.codes
                    .iter()
                    .filter(move |(code, _)| token.contains(code.as_str()))
                    .map(move |(_, entry)| Match {
                        file,
                        entry: *entry,
                    })
            })
    }
}
