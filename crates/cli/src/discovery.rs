//! Bundle file discovery

use std::path::{Path, PathBuf};

use anyhow::{Context, Result};

/// Where to look for bundles and which files count
#[derive(Debug, Clone)]
pub struct DiscoveryConfig {
    pub dir: PathBuf,
    /// File name suffix, matched case-sensitively
    pub suffix: String,
    pub limit: Option<usize>,
}

impl DiscoveryConfig {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self {
            dir: dir.into(),
            suffix: ".json".to_string(),
            limit: None,
        }
    }

    pub fn with_limit(mut self, limit: Option<usize>) -> Self {
        self.limit = limit;
        self
    }
}

/// List matching files directly inside `config.dir`, sorted by file name
pub fn discover(config: &DiscoveryConfig) -> Result<Vec<PathBuf>> {
    let entries = std::fs::read_dir(&config.dir)
        .with_context(|| format!("Failed to list {}", config.dir.display()))?;

    let mut paths = Vec::new();
    for entry in entries {
        let entry = entry.with_context(|| format!("Failed to list {}", config.dir.display()))?;
        let path = entry.path();
        if path.is_file() && has_suffix(&path, &config.suffix) {
            paths.push(path);
        }
    }

    paths.sort_by(|a, b| a.file_name().cmp(&b.file_name()));
    if let Some(limit) = config.limit {
        paths.truncate(limit);
    }

    tracing::debug!(dir = %config.dir.display(), found = paths.len(), "Discovered bundles");
    Ok(paths)
}

fn has_suffix(path: &Path, suffix: &str) -> bool {
    path.file_name()
        .and_then(|n| n.to_str())
        .is_some_and(|n| n.ends_with(suffix))
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;

    #[test]
    fn test_discover_filters_and_sorts() {
        let dir = tempfile::tempdir().unwrap();
        for name in ["b.json", "a.json", "notes.txt", "c.JSON"] {
            fs::write(dir.path().join(name), "{}").unwrap();
        }
        fs::create_dir(dir.path().join("nested.json")).unwrap();

        let paths = discover(&DiscoveryConfig::new(dir.path())).unwrap();
        let names: Vec<_> = paths
            .iter()
            .map(|p| p.file_name().unwrap().to_str().unwrap())
            .collect();

        assert_eq!(names, vec!["a.json", "b.json"]);
    }

    #[test]
    fn test_discover_limit() {
        let dir = tempfile::tempdir().unwrap();
        for i in 0..5 {
            fs::write(dir.path().join(format!("p{i}.json")), "{}").unwrap();
        }

        let config = DiscoveryConfig::new(dir.path()).with_limit(Some(2));
        assert_eq!(discover(&config).unwrap().len(), 2);
    }

    #[test]
    fn test_discover_missing_dir() {
        let err = discover(&DiscoveryConfig::new("/no/such/dir")).unwrap_err();
        assert!(err.to_string().contains("/no/such/dir"));
    }
}
