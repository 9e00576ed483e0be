//! README writer

use crate::{Locale, ProfileDocuments, Result};
use std::fs;
use std::path::{Path, PathBuf};
use tracing::info;

#[derive(Debug, Clone)]
pub struct PublisherConfig {
    pub output_dir: PathBuf,
    /// Default document, written with the primary locale's content
    pub readme_filename: String,
    pub primary_locale: Locale,
    pub secondary_locale: Locale,
}

/// Writes the localized READMEs plus the default one
pub struct Publisher {
    config: PublisherConfig,
}

impl Publisher {
    pub fn new(config: PublisherConfig) -> Self {
        Self { config }
    }

    /// Write all three documents, returning their paths in write order
    pub fn publish(&self, documents: &ProfileDocuments) -> Result<Vec<PathBuf>> {
        let dir = &self.config.output_dir;
        if !dir.as_os_str().is_empty() && dir != Path::new(".") {
            fs::create_dir_all(dir)?;
        }

        let targets = [
            (self.config.primary_locale.file_name(), &documents.primary),
            (self.config.secondary_locale.file_name(), &documents.secondary),
            (self.config.readme_filename.clone(), &documents.primary),
        ];

        let mut written = Vec::with_capacity(targets.len());
        for (name, content) in targets {
            let path = dir.join(name);
            fs::write(&path, content)?;
            info!(path = %path.display(), "Wrote README");
            written.push(path);
        }

        Ok(written)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn config(dir: &Path) -> PublisherConfig {
        PublisherConfig {
            output_dir: dir.to_path_buf(),
            readme_filename: "README.md".to_string(),
            primary_locale: Locale::new("pt-br", "Portuguese (Brazil)"),
            secondary_locale: Locale::new("en", "English"),
        }
    }

    #[test]
    fn writes_three_files() {
        let tmp = tempfile::tempdir().unwrap();
        let publisher = Publisher::new(config(tmp.path()));
        let docs = ProfileDocuments {
            primary: "# Olá".to_string(),
            secondary: "# Hello".to_string(),
        };

        let written = publisher.publish(&docs).unwrap();
        assert_eq!(written.len(), 3);
        assert_eq!(fs::read_to_string(tmp.path().join("README.pt-br.md")).unwrap(), "# Olá");
        assert_eq!(fs::read_to_string(tmp.path().join("README.en.md")).unwrap(), "# Hello");
        assert_eq!(fs::read_to_string(tmp.path().join("README.md")).unwrap(), "# Olá");
    }

    #[test]
    fn creates_missing_output_dir() {
        let tmp = tempfile::tempdir().unwrap();
        let nested = tmp.path().join("profile").join("out");
        let publisher = Publisher::new(config(&nested));
        let docs = ProfileDocuments {
            primary: "a".to_string(),
            secondary: "b".to_string(),
        };

        publisher.publish(&docs).unwrap();
        assert!(nested.join("README.md").exists());
    }

    #[test]
    fn overwrites_existing_files() {
        let tmp = tempfile::tempdir().unwrap();
        fs::write(tmp.path().join("README.md"), "old").unwrap();
        let publisher = Publisher::new(config(tmp.path()));
        let docs = ProfileDocuments {
            primary: "new".to_string(),
            secondary: "new".to_string(),
        };

        publisher.publish(&docs).unwrap();
        assert_eq!(fs::read_to_string(tmp.path().join("README.md")).unwrap(), "new");
    }
}
