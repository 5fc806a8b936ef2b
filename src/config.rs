use crate::constants::{
    CONFIG_FILE, MAPS_DIR, OUTPUT_FILE, PAPERS_DIR, PROGRAMMES, UNIVERSITY, YEAR_PATTERN,
};
use crate::error::{CatalogError, Result};
use serde::Deserialize;
use std::fs;
use std::path::{Path, PathBuf};

/// Contents of `archive.toml`. Every key is optional.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct FileConfig {
    pub university: String,
    pub programmes: Vec<String>,
    pub maps_dir: PathBuf,
    pub papers_dir: PathBuf,
    pub output: PathBuf,
    pub year_pattern: String,
}

impl Default for FileConfig {
    fn default() -> Self {
        FileConfig {
            university: UNIVERSITY.to_string(),
            programmes: PROGRAMMES.iter().map(|p| p.to_string()).collect(),
            maps_dir: PathBuf::from(MAPS_DIR),
            papers_dir: PathBuf::from(PAPERS_DIR),
            output: PathBuf::from(OUTPUT_FILE),
            year_pattern: YEAR_PATTERN.to_string(),
        }
    }
}

impl FileConfig {
    pub fn parse(content: &str, path: &Path) -> Result<Self> {
        toml::from_str(content).map_err(|source| CatalogError::Config {
            path: path.display().to_string(),
            source,
        })
    }
}

/// Command-line overrides; `None` keeps the configured value.
#[derive(Debug, Clone, Default)]
pub struct Overrides {
    pub config: Option<PathBuf>,
    pub maps_dir: Option<PathBuf>,
    pub papers_dir: Option<PathBuf>,
    pub output: Option<PathBuf>,
}

/// Fully resolved settings for one run. Paths are joined onto the site root.
#[derive(Debug, Clone, PartialEq)]
pub struct Config {
    pub site_root: PathBuf,
    pub university: String,
    pub programmes: Vec<String>,
    pub maps_dir: PathBuf,
    pub papers_dir: PathBuf,
    pub output: PathBuf,
    pub year_pattern: String,
}

impl Config {
    /// Load `archive.toml` (or the `--config` file) and apply overrides.
    ///
    /// The default config file may be absent; an explicitly named one may not.
    pub fn load(site_root: &Path, overrides: Overrides) -> Result<Self> {
        let file = match overrides.config {
            Some(ref explicit) => {
                let path = site_root.join(explicit);
                if !path.is_file() {
                    return Err(CatalogError::MissingConfig(path.display().to_string()));
                }
                Some(path)
            }
            None => {
                let path = site_root.join(CONFIG_FILE);
                path.is_file().then_some(path)
            }
        };

        let file_config = match file {
            Some(path) => {
                let content =
                    fs::read_to_string(&path).map_err(|e| CatalogError::io("read", &path, e))?;
                log::debug!("Using config {}", path.display());
                FileConfig::parse(&content, &path)?
            }
            None => FileConfig::default(),
        };

        Ok(Self::resolve(site_root, file_config, overrides))
    }

    pub fn resolve(site_root: &Path, file: FileConfig, overrides: Overrides) -> Self {
        Config {
            site_root: site_root.to_path_buf(),
            university: file.university,
            programmes: file.programmes,
            maps_dir: site_root.join(overrides.maps_dir.unwrap_or(file.maps_dir)),
            papers_dir: site_root.join(overrides.papers_dir.unwrap_or(file.papers_dir)),
            output: site_root.join(overrides.output.unwrap_or(file.output)),
            year_pattern: file.year_pattern,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use tempfile::TempDir;

    #[test]
    fn test_defaults_without_config_file() {
        let temp = TempDir::new().expect("tempdir");
        let config = Config::load(temp.path(), Overrides::default()).expect("load");

        assert_eq!(config.university, "Assam University");
        assert_eq!(config.programmes, vec!["fyug", "cbcs"]);
        assert_eq!(config.maps_dir, temp.path().join("maps"));
        assert_eq!(config.papers_dir, temp.path().join("papers"));
        assert_eq!(config.output, temp.path().join("papers.json"));
        assert_eq!(config.year_pattern, r"20\d\d");
    }

    #[test]
    fn test_config_file_and_overrides() {
        let temp = TempDir::new().expect("tempdir");
        fs::write(
            temp.path().join("archive.toml"),
            "university = \"Test University\"\nprogrammes = [\"fyug\"]\noutput = \"data/papers.json\"\n",
        )
        .expect("write config");

        let overrides = Overrides {
            papers_dir: Some(PathBuf::from("archive")),
            ..Default::default()
        };
        let config = Config::load(temp.path(), overrides).expect("load");

        assert_eq!(config.university, "Test University");
        assert_eq!(config.programmes, vec!["fyug"]);
        assert_eq!(config.papers_dir, temp.path().join("archive"));
        assert_eq!(config.output, temp.path().join("data/papers.json"));
        assert_eq!(config.maps_dir, temp.path().join("maps"));
    }

    #[test]
    fn test_unknown_key_is_rejected() {
        let err = FileConfig::parse("colour = \"red\"\n", Path::new("archive.toml")).unwrap_err();
        assert!(matches!(err, CatalogError::Config { .. }));
    }

    #[test]
    fn test_explicit_config_must_exist() {
        let temp = TempDir::new().expect("tempdir");
        let overrides = Overrides {
            config: Some(PathBuf::from("missing.toml")),
            ..Default::default()
        };
        let err = Config::load(temp.path(), overrides).unwrap_err();
        assert!(matches!(err, CatalogError::MissingConfig(_)));
    }
}
